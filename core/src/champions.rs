use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChampionInfo {
    pub cost: u32,
    #[serde(default)]
    pub traits: Vec<String>,
}

/// A champion as it appears in a shop slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChampionEntry {
    pub name: String,
    pub cost: u32,
    pub traits: Vec<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ChampionTableError {
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("serde error")]
    Serde(#[from] serde_json::Error),
}

/// Reference table of the current set, keyed case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ChampionTable {
    champions: HashMap<String, (String, ChampionInfo)>,
}

impl ChampionTable {
    pub fn from_json(json: &str) -> Result<Self, ChampionTableError> {
        let raw: HashMap<String, ChampionInfo> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    pub async fn load(path: &Path) -> Result<Self, ChampionTableError> {
        Self::from_json(&read_to_string(path).await?)
    }

    pub fn lookup(&self, name: &str) -> Option<ChampionEntry> {
        let (name, info) = self.champions.get(&name.trim().to_lowercase())?;
        Some(ChampionEntry {
            name: name.clone(),
            cost: info.cost,
            traits: info.traits.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }
}

impl FromIterator<(String, ChampionInfo)> for ChampionTable {
    fn from_iter<T: IntoIterator<Item = (String, ChampionInfo)>>(iter: T) -> Self {
        Self {
            champions: iter
                .into_iter()
                .map(|(name, info)| (name.trim().to_lowercase(), (name, info)))
                .collect(),
        }
    }
}
