pub mod batch;
pub mod config;
pub mod menu;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use crate::config::Settings;
use std::path::PathBuf;
use tft_scout_core::{
    champions::ChampionTable, ocr::OcrsBackend, regions::RegionMap, GameDataDocument,
    MatchFetcher, ScreenshotExtractor, TftClient,
};
use tracing::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tft-scout", about = "Download TFT matches and read game state off screenshots")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive menu for saving recent matches (default)
    Matches,
    /// Read every png in a directory and append the results to the game data file
    Screenshots {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;

    match cli.command.unwrap_or(Command::Matches) {
        Command::Matches => {
            let client = TftClient::new(settings.client_config())?;
            let fetcher = MatchFetcher::new(client, settings.data_path.clone());
            menu::run(&fetcher, &settings.data_path).await?;
        }
        Command::Screenshots { dir, out } => {
            let dir = dir.unwrap_or_else(|| settings.screenshots_path.clone());
            let out = out.unwrap_or_else(|| settings.game_data_path.clone());

            let regions = RegionMap::load(&settings.regions_path)
                .await
                .context(format!("reading {}", settings.regions_path.display()))?;
            let champions = ChampionTable::load(&settings.champions_path)
                .await
                .context(format!("reading {}", settings.champions_path.display()))?;
            let (Some(detection), Some(recognition)) =
                (&settings.detection_model, &settings.recognition_model)
            else {
                return Err(anyhow!(
                    "DETECTION_MODEL and RECOGNITION_MODEL must point at ocrs model files"
                ));
            };
            let ocr = OcrsBackend::from_model_files(detection, recognition)?;
            event!(
                Level::INFO,
                "loaded {} regions and {} champions",
                regions.len(),
                champions.len()
            );

            let extractor = ScreenshotExtractor::new(
                regions,
                champions,
                Box::new(ocr),
                settings.preprocess_params(),
            );
            let mut document = GameDataDocument::load_or_create(&out).await?;
            let report = extractor.extract_directory(&dir, &mut document).await?;
            document.save(&out).await?;
            event!(
                Level::INFO,
                "processed {} screenshots, skipped {}, wrote {}",
                report.processed,
                report.skipped,
                out.display()
            );
        }
    }
    Ok(())
}
