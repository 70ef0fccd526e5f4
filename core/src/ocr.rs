use std::{path::Path, sync::Arc};

use image::{DynamicImage, GrayImage};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use tokio::task::spawn_blocking;

/// One piece of text found in a crop.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrText {
    pub text: String,
    pub confidence: f32,
}

impl OcrText {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

#[async_trait::async_trait]
pub trait OcrBackend: Send + Sync {
    async fn read_text(&self, img: GrayImage) -> anyhow::Result<Vec<OcrText>>;
}

/// `ocrs` with detection and recognition models read from disk.
pub struct OcrsBackend {
    engine: Arc<OcrEngine>,
}

impl OcrsBackend {
    pub fn from_model_files(detection: &Path, recognition: &Path) -> anyhow::Result<Self> {
        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(Model::load_file(detection)?),
            recognition_model: Some(Model::load_file(recognition)?),
            ..Default::default()
        })?;
        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}

#[async_trait::async_trait]
impl OcrBackend for OcrsBackend {
    // ocrs does not report a score, every line it returns counts as certain
    async fn read_text(&self, img: GrayImage) -> anyhow::Result<Vec<OcrText>> {
        if img.width() == 0 || img.height() == 0 {
            return Ok(Vec::new());
        }
        let engine = Arc::clone(&self.engine);
        spawn_blocking(move || -> anyhow::Result<Vec<OcrText>> {
            let img = DynamicImage::ImageLuma8(img).into_rgb8();
            let source = ImageSource::from_bytes(img.as_raw(), img.dimensions())?;
            let ocr_input = engine.prepare_input(source)?;
            let text = engine.get_text(&ocr_input)?;
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| OcrText::new(line, 1.0))
                .collect())
        })
        .await?
    }
}
