use serde::{Deserialize, Serialize};
use tracing::*;

use super::{RiotApiError, TftClient};

/// Full match payload. Both halves are kept as raw json, nothing downstream
/// relies on their shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub metadata: serde_json::Value,
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchQuery {
    pub count: u32,
    pub start: u32,
}

impl Default for MatchQuery {
    fn default() -> Self {
        Self { count: 20, start: 0 }
    }
}

impl TftClient {
    /// TFT-MATCH-V1: most recent match ids for a player, newest first.
    #[instrument(skip(self))]
    pub async fn match_ids_by_puuid(
        &self,
        puuid: &str,
        query: MatchQuery,
    ) -> Result<Vec<String>, RiotApiError> {
        let url = self.endpoint(&["tft", "match", "v1", "matches", "by-puuid", puuid, "ids"])?;
        let request = self
            .http
            .get(url)
            .query(&[("count", query.count), ("start", query.start)]);
        self.get_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn match_details(&self, match_id: &str) -> Result<MatchRecord, RiotApiError> {
        let url = self.endpoint(&["tft", "match", "v1", "matches", match_id])?;
        self.get_json(self.http.get(url)).await
    }
}
