use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;

/// Pixel rectangle on the unscaled screenshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<[u32; 4]> for Rect {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<Rect> for [u32; 4] {
    fn from(rect: Rect) -> Self {
        [rect.x, rect.y, rect.width, rect.height]
    }
}

impl Rect {
    pub fn scaled(&self, factor: f32) -> Rect {
        let scale = |v: u32| (v as f32 * factor) as u32;
        Rect {
            x: scale(self.x),
            y: scale(self.y),
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}

/// How the text read from a region turns into a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Roster,
    TraitList,
    /// Round number. How to read it has not been decided, it yields nothing.
    Round,
    Freeform,
}

impl FieldKind {
    /// Kind for a bare `[x, y, w, h]` entry, decided by the words of its
    /// snake_case name.
    pub fn infer(name: &str) -> FieldKind {
        let name = name.to_ascii_lowercase();
        let mut words = name.split('_').filter(|w| !w.is_empty());
        let first = words.next().unwrap_or_default();
        match first {
            "gold" | "streak" => FieldKind::Numeric,
            "shop" => FieldKind::Roster,
            "round" => FieldKind::Round,
            "trait" | "traits" => FieldKind::TraitList,
            _ if words.any(|w| w == "trait" || w == "traits") => FieldKind::TraitList,
            _ => FieldKind::Freeform,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub rect: Rect,
    pub kind: FieldKind,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegionEntry {
    Bare(Rect),
    Tagged { rect: Rect, kind: FieldKind },
}

#[derive(thiserror::Error, Debug)]
pub enum RegionMapError {
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("serde error")]
    Serde(#[from] serde_json::Error),
}

/// Named screen regions, ordered by name. Field kinds are settled at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionMap {
    regions: BTreeMap<String, Region>,
}

impl RegionMap {
    pub fn from_json(json: &str) -> Result<Self, RegionMapError> {
        let entries: BTreeMap<String, RegionEntry> = serde_json::from_str(json)?;
        let regions = entries
            .into_iter()
            .map(|(name, entry)| {
                let region = match entry {
                    RegionEntry::Bare(rect) => Region {
                        rect,
                        kind: FieldKind::infer(&name),
                    },
                    RegionEntry::Tagged { rect, kind } => Region { rect, kind },
                };
                (name, region)
            })
            .collect();
        Ok(Self { regions })
    }

    pub async fn load(path: &Path) -> Result<Self, RegionMapError> {
        Self::from_json(&read_to_string(path).await?)
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Region)> {
        self.regions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl FromIterator<(String, Region)> for RegionMap {
    fn from_iter<T: IntoIterator<Item = (String, Region)>>(iter: T) -> Self {
        Self {
            regions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_kinds_from_names() {
        assert_eq!(FieldKind::infer("gold"), FieldKind::Numeric);
        assert_eq!(FieldKind::infer("streak"), FieldKind::Numeric);
        assert_eq!(FieldKind::infer("shop_3"), FieldKind::Roster);
        assert_eq!(FieldKind::infer("trait_1"), FieldKind::TraitList);
        assert_eq!(FieldKind::infer("active_traits"), FieldKind::TraitList);
        assert_eq!(FieldKind::infer("round"), FieldKind::Round);
        assert_eq!(FieldKind::infer("portrait_icon"), FieldKind::Freeform);
        assert_eq!(FieldKind::infer("Shop_1"), FieldKind::Roster);
        assert_eq!(FieldKind::infer("augment"), FieldKind::Freeform);
    }

    #[test]
    fn loads_bare_and_tagged_entries() {
        let map = RegionMap::from_json(
            r#"{
                "gold": [10, 20, 30, 40],
                "level": {"rect": [1, 2, 3, 4], "kind": "numeric"}
            }"#,
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("gold"),
            Some(&Region {
                rect: Rect::from([10, 20, 30, 40]),
                kind: FieldKind::Numeric,
            })
        );
        assert_eq!(map.get("level").unwrap().kind, FieldKind::Numeric);
        // iteration is name-ordered
        let names = map.iter().map(|(n, _)| n).collect::<Vec<_>>();
        assert_eq!(names, vec!["gold", "level"]);
    }

    #[tokio::test]
    async fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rectangles.json");
        std::fs::write(&path, r#"{"shop_1": [480, 930, 190, 140]}"#).unwrap();

        let map = RegionMap::load(&path).await.unwrap();
        assert_eq!(map.get("shop_1").unwrap().kind, FieldKind::Roster);

        let missing = RegionMap::load(&dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(RegionMapError::Io(_))));
    }

    #[test]
    fn rejects_short_rectangles() {
        assert!(RegionMap::from_json(r#"{"gold": [1, 2, 3]}"#).is_err());
    }

    #[test]
    fn scales_rect() {
        let rect = Rect::from([10, 5, 7, 3]).scaled(2.0);
        assert_eq!(<[u32; 4]>::from(rect), [20, 10, 14, 6]);
    }
}
