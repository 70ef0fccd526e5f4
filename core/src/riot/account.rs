use serde::{Deserialize, Serialize};
use tracing::*;

use super::{RiotApiError, TftClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

impl TftClient {
    /// ACCOUNT-V1: resolves a riot id (`game_name#tag_line`) to its account.
    #[instrument(skip(self))]
    pub async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, RiotApiError> {
        let url = self.endpoint(&[
            "riot",
            "account",
            "v1",
            "accounts",
            "by-riot-id",
            game_name,
            tag_line,
        ])?;
        self.get_json(self.http.get(url)).await
    }

    pub async fn puuid_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<String, RiotApiError> {
        Ok(self.account_by_riot_id(game_name, tag_line).await?.puuid)
    }
}
