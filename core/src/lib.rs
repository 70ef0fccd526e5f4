pub mod champions;
pub mod clean;
pub mod config;
pub mod fetcher;
pub mod game_data;
pub mod ocr;
pub mod preprocess;
pub mod regions;
pub mod riot;
pub mod screen_parser;

pub use config::ClientConfig;
pub use fetcher::{MatchFetchError, MatchFetcher, SaveReport};
pub use game_data::{GameDataDocument, GameState};
pub use riot::{RiotApiError, TftClient};
pub use screen_parser::{ExtractReport, ScreenshotExtractor};
