use std::path::{Path, PathBuf};

use tokio::fs::{create_dir_all, try_exists, write};
use tracing::*;

use crate::riot::{matches::MatchQuery, RiotApiError, TftClient};

#[derive(thiserror::Error, Debug)]
pub enum MatchFetchError {
    #[error("api error")]
    Api(#[from] RiotApiError),
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("serde error")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Downloads a player's recent matches into `{data}/matches/{riot_id}#{tag}/`.
pub struct MatchFetcher {
    client: TftClient,
    data_path: PathBuf,
}

impl MatchFetcher {
    pub fn new(client: TftClient, data_path: PathBuf) -> Self {
        Self { client, data_path }
    }

    pub fn match_dir(&self, riot_id: &str, tag_line: &str) -> PathBuf {
        self.data_path
            .join("matches")
            .join(format!("{riot_id}#{tag_line}"))
    }

    pub fn match_file(dir: &Path, match_id: &str) -> PathBuf {
        dir.join(format!("match_{match_id}.json"))
    }

    /// Matches already on disk are never requested again. A failing match is
    /// logged and counted, the rest of the list still gets fetched.
    #[instrument(skip(self))]
    pub async fn save_recent_matches(
        &self,
        riot_id: &str,
        tag_line: &str,
        count: u32,
    ) -> Result<SaveReport, MatchFetchError> {
        let puuid = self.client.puuid_by_riot_id(riot_id, tag_line).await?;
        let match_ids = self
            .client
            .match_ids_by_puuid(&puuid, MatchQuery { count, start: 0 })
            .await?;

        let dir = self.match_dir(riot_id, tag_line);
        create_dir_all(&dir).await?;

        let mut report = SaveReport::default();
        for match_id in match_ids {
            let path = Self::match_file(&dir, &match_id);
            if try_exists(&path).await? {
                event!(Level::INFO, %match_id, "match already saved, skipping download");
                report.skipped += 1;
                continue;
            }
            let record = match self.client.match_details(&match_id).await {
                Ok(record) => record,
                Err(e) => {
                    event!(Level::WARN, %match_id, "error fetching match details: {e}");
                    report.failed += 1;
                    continue;
                }
            };
            write(&path, serde_json::to_vec_pretty(&record)?).await?;
            event!(Level::INFO, %match_id, "saved match data");
            report.saved += 1;
        }
        Ok(report)
    }
}
