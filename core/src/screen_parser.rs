use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tokio::fs::read_dir;
use tracing::*;

use crate::{
    champions::ChampionTable,
    clean::{clean_numeric, clean_roster, clean_traits},
    game_data::{FieldValue, GameDataDocument, GameDataError, GameState, ACTIVE_TRAITS},
    ocr::OcrBackend,
    preprocess::{crop_region, sharpen_for_ocr, PreprocessParams},
    regions::{FieldKind, RegionMap},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractReport {
    pub processed: usize,
    pub skipped: usize,
}

pub struct ScreenshotExtractor {
    regions: RegionMap,
    champions: ChampionTable,
    ocr: Box<dyn OcrBackend>,
    params: PreprocessParams,
}

impl ScreenshotExtractor {
    pub fn new(
        regions: RegionMap,
        champions: ChampionTable,
        ocr: Box<dyn OcrBackend>,
        params: PreprocessParams,
    ) -> Self {
        Self {
            regions,
            champions,
            ocr,
            params,
        }
    }

    /// Defaults for every field the region map promises, so a record never
    /// misses a key even when nothing could be read.
    fn empty_state(&self) -> GameState {
        let mut state = GameState::new();
        for (name, region) in self.regions.iter() {
            match region.kind {
                FieldKind::Numeric => {
                    state.insert(name.to_string(), FieldValue::Integer(0));
                }
                FieldKind::Roster => {
                    state.insert(name.to_string(), FieldValue::Roster(Vec::new()));
                }
                FieldKind::TraitList => {
                    state.insert(ACTIVE_TRAITS.to_string(), FieldValue::Traits(Vec::new()));
                }
                FieldKind::Round | FieldKind::Freeform => {}
            }
        }
        state
    }

    async fn read_region(&self, name: &str, crop: image::GrayImage) -> Vec<String> {
        match self.ocr.read_text(crop).await {
            Ok(results) => results
                .into_iter()
                .filter(|r| r.confidence > self.params.confidence_threshold)
                .map(|r| r.text)
                .collect(),
            Err(e) => {
                event!(Level::WARN, field = name, "ocr failed: {e}");
                Vec::new()
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn extract(&self, img: &DynamicImage) -> GameState {
        let sharpened = sharpen_for_ocr(img, &self.params);
        let mut state = self.empty_state();
        let mut active_traits = Vec::new();

        for (name, region) in self.regions.iter() {
            if matches!(region.kind, FieldKind::Freeform) {
                continue;
            }
            let crop = crop_region(&sharpened, &region.rect.scaled(self.params.scale));
            let texts = self.read_region(name, crop).await;
            event!(Level::DEBUG, field = name, "read {texts:?}");

            match region.kind {
                FieldKind::Numeric => {
                    state.insert(name.to_string(), FieldValue::Integer(clean_numeric(&texts)));
                }
                FieldKind::Roster => {
                    state.insert(
                        name.to_string(),
                        FieldValue::Roster(clean_roster(&texts, &self.champions)),
                    );
                }
                FieldKind::TraitList => clean_traits(&texts, &mut active_traits),
                FieldKind::Round => {
                    event!(Level::DEBUG, field = name, "round fields are not interpreted");
                }
                FieldKind::Freeform => {}
            }
        }

        if state.contains_key(ACTIVE_TRAITS) {
            state.insert(ACTIVE_TRAITS.to_string(), FieldValue::Traits(active_traits));
        }
        state
    }

    /// Appends one record per readable `.png` in `dir`, in file name order.
    #[instrument(skip(self, document))]
    pub async fn extract_directory(
        &self,
        dir: &Path,
        document: &mut GameDataDocument,
    ) -> Result<ExtractReport, GameDataError> {
        let mut paths = Vec::<PathBuf>::new();
        let mut entries = read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && is_png(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = ExtractReport::default();
        for path in paths {
            // content decides the format, a misnamed jpeg still decodes
            let decoded = ImageReader::open(&path)
                .and_then(|reader| reader.with_guessed_format())
                .map_err(image::ImageError::from)
                .and_then(|reader| reader.decode());
            let img = match decoded {
                Ok(img) => img,
                Err(e) => {
                    event!(Level::WARN, path = %path.display(), "skipping unreadable image: {e}");
                    report.skipped += 1;
                    continue;
                }
            };
            let state = self.extract(&img).await;
            document.push(&state)?;
            event!(Level::INFO, path = %path.display(), "extracted game state");
            report.processed += 1;
        }
        Ok(report)
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use image::GrayImage;
    use serde_json::json;

    use super::*;
    use crate::ocr::OcrText;

    /// Hands out canned results in call order. Regions are visited by name,
    /// so the order is fixed.
    struct ScriptedOcr {
        replies: Mutex<VecDeque<anyhow::Result<Vec<OcrText>>>>,
    }

    impl ScriptedOcr {
        fn new(replies: Vec<anyhow::Result<Vec<OcrText>>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }
    }

    #[async_trait::async_trait]
    impl OcrBackend for ScriptedOcr {
        async fn read_text(&self, _img: GrayImage) -> anyhow::Result<Vec<OcrText>> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn texts(items: &[(&str, f32)]) -> anyhow::Result<Vec<OcrText>> {
        Ok(items.iter().map(|(t, c)| OcrText::new(*t, *c)).collect())
    }

    fn regions() -> RegionMap {
        RegionMap::from_json(
            r#"{
                "gold": [0, 0, 1, 1],
                "round": [0, 0, 1, 1],
                "shop_1": [0, 0, 1, 1],
                "streak": [0, 0, 1, 1],
                "trait_1": [0, 0, 1, 1],
                "trait_2": [0, 0, 1, 1],
                "augment": [0, 0, 1, 1]
            }"#,
        )
        .unwrap()
    }

    fn champions() -> ChampionTable {
        ChampionTable::from_json(r#"{"Ahri": {"cost": 3, "traits": ["Arcana", "Scholar"]}}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn one_screenshot_becomes_one_record() {
        // visit order: gold, round, shop_1, streak, trait_1, trait_2 (augment is skipped)
        let ocr = ScriptedOcr::new(vec![
            texts(&[("1 2", 0.9)]),
            texts(&[("3-2", 0.9)]),
            texts(&[("3", 0.8), ("Ahri", 0.8), ("2", 0.8), ("Noise", 0.1)]),
            Err(anyhow::anyhow!("engine crashed")),
            texts(&[("Ranger2", 0.9), ("Sniper", 0.9)]),
            texts(&[("Scholar", 0.9), ("Sniper", 0.9)]),
        ]);
        let extractor = ScreenshotExtractor::new(
            regions(),
            champions(),
            Box::new(ocr),
            PreprocessParams::default(),
        );

        let dir = tempfile::tempdir().unwrap();
        let screenshots = dir.path().join("shots");
        std::fs::create_dir(&screenshots).unwrap();
        DynamicImage::new_rgb8(1, 1)
            .save(screenshots.join("a.png"))
            .unwrap();
        std::fs::write(screenshots.join("notes.txt"), "not an image").unwrap();

        let out = dir.path().join("game_data.json");
        let mut document = GameDataDocument::load_or_create(&out).await.unwrap();
        let report = extractor
            .extract_directory(&screenshots, &mut document)
            .await
            .unwrap();
        document.save(&out).await.unwrap();

        assert_eq!(report, ExtractReport { processed: 1, skipped: 0 });
        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            json!({
                "info": [{
                    "gold": 12,
                    "shop_1": [{"name": "Ahri", "cost": 3, "traits": ["Arcana", "Scholar"]}],
                    "streak": 0,
                    "active_traits": ["Sniper", "Scholar"]
                }]
            })
        );
    }

    #[tokio::test]
    async fn empty_reads_fall_back_to_defaults() {
        let extractor = ScreenshotExtractor::new(
            regions(),
            champions(),
            Box::new(ScriptedOcr::new(Vec::new())),
            PreprocessParams::default(),
        );
        let state = extractor.extract(&DynamicImage::new_rgb8(4, 4)).await;
        assert_eq!(state.get("gold"), Some(&FieldValue::Integer(0)));
        assert_eq!(state.get("streak"), Some(&FieldValue::Integer(0)));
        assert_eq!(state.get("shop_1"), Some(&FieldValue::Roster(Vec::new())));
        assert_eq!(state.get(ACTIVE_TRAITS), Some(&FieldValue::Traits(Vec::new())));
        assert!(!state.contains_key("round"));
        assert!(!state.contains_key("augment"));
    }

    #[tokio::test]
    async fn unreadable_images_are_skipped() {
        let extractor = ScreenshotExtractor::new(
            regions(),
            champions(),
            Box::new(ScriptedOcr::new(Vec::new())),
            PreprocessParams::default(),
        );
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.PNG"), b"definitely not a png").unwrap();
        DynamicImage::new_rgb8(2, 2)
            .save(dir.path().join("ok.png"))
            .unwrap();

        let mut document = GameDataDocument::default();
        let report = extractor
            .extract_directory(dir.path(), &mut document)
            .await
            .unwrap();
        assert_eq!(report, ExtractReport { processed: 1, skipped: 1 });
        assert_eq!(document.info.len(), 1);
    }

    #[tokio::test]
    async fn jpeg_saved_as_png_is_read() {
        let extractor = ScreenshotExtractor::new(
            regions(),
            champions(),
            Box::new(ScriptedOcr::new(Vec::new())),
            PreprocessParams::default(),
        );
        let dir = tempfile::tempdir().unwrap();
        DynamicImage::new_rgb8(8, 8)
            .save_with_format(dir.path().join("capture.png"), image::ImageFormat::Jpeg)
            .unwrap();

        let mut document = GameDataDocument::default();
        let report = extractor
            .extract_directory(dir.path(), &mut document)
            .await
            .unwrap();
        assert_eq!(report, ExtractReport { processed: 1, skipped: 0 });
    }

    #[tokio::test]
    async fn confidence_at_threshold_is_dropped() {
        let params = PreprocessParams::default();
        let threshold = params.confidence_threshold;
        let regions = RegionMap::from_json(r#"{"gold": [0, 0, 1, 1], "streak": [0, 0, 1, 1]}"#)
            .unwrap();
        let ocr = ScriptedOcr::new(vec![
            texts(&[("7", threshold)]),
            texts(&[("4", threshold + 0.01)]),
        ]);
        let extractor = ScreenshotExtractor::new(regions, champions(), Box::new(ocr), params);

        let state = extractor.extract(&DynamicImage::new_rgb8(4, 4)).await;
        assert_eq!(state.get("gold"), Some(&FieldValue::Integer(0)));
        assert_eq!(state.get("streak"), Some(&FieldValue::Integer(4)));
    }
}
