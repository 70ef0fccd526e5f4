use std::{path::PathBuf, time::Duration};

use ::config::{Config, ConfigError, Environment, File};
use tft_scout_core::{config::DEFAULT_REGION, preprocess::PreprocessParams, ClientConfig};

#[derive(Debug, serde::Deserialize)]
pub struct Settings {
    #[serde(default, alias = "x-riot-token")]
    pub riot_token: Option<String>,
    pub riot_region: String,
    #[serde(default)]
    pub riot_base_url: Option<String>,
    pub rate_limit_wait_secs: u64,
    pub data_path: PathBuf,
    pub regions_path: PathBuf,
    pub champions_path: PathBuf,
    pub screenshots_path: PathBuf,
    pub game_data_path: PathBuf,
    #[serde(default)]
    pub detection_model: Option<PathBuf>,
    #[serde(default)]
    pub recognition_model: Option<PathBuf>,
    pub ocr_scale: f32,
    pub sharpen_amount: f32,
    pub sharpen_sigma: f32,
    pub confidence_threshold: f32,
}

impl Settings {
    /// Defaults, then `tft_scout.toml` if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("riot_region", DEFAULT_REGION)?
            .set_default("rate_limit_wait_secs", 120)?
            .set_default("data_path", "data")?
            .set_default("regions_path", "data/rectangles.json")?
            .set_default("champions_path", "data/champions.json")?
            .set_default("screenshots_path", "data/screenshots")?
            .set_default("game_data_path", "data/game_data.json")?
            .set_default("ocr_scale", 2.0)?
            .set_default("sharpen_amount", 1.2)?
            .set_default("sharpen_sigma", 1.0)?
            .set_default("confidence_threshold", 0.3)?
            .add_source(File::with_name("tft_scout").required(false))
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::for_region(
            self.riot_token.clone().unwrap_or_default(),
            &self.riot_region,
        );
        if let Some(base_url) = &self.riot_base_url {
            config.base_url = base_url.clone();
        }
        config.rate_limit_wait = Duration::from_secs(self.rate_limit_wait_secs);
        config
    }

    pub fn preprocess_params(&self) -> PreprocessParams {
        PreprocessParams {
            scale: self.ocr_scale,
            sharpen_amount: self.sharpen_amount,
            sharpen_sigma: self.sharpen_sigma,
            confidence_threshold: self.confidence_threshold,
        }
    }
}
