use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs::{create_dir_all, read, try_exists, write};

use crate::champions::ChampionEntry;

pub const ACTIVE_TRAITS: &str = "active_traits";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Roster(Vec<ChampionEntry>),
    Traits(Vec<String>),
}

/// Everything read off one screenshot, keyed by field name.
pub type GameState = BTreeMap<String, FieldValue>;

#[derive(thiserror::Error, Debug)]
pub enum GameDataError {
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("serde error")]
    Serde(#[from] serde_json::Error),
}

/// The `{"info": [...]}` file screenshots are appended to. Keys other than
/// `info` are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameDataDocument {
    #[serde(default)]
    pub info: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl GameDataDocument {
    pub async fn load_or_create(path: &Path) -> Result<Self, GameDataError> {
        if !try_exists(path).await? {
            let document = Self::default();
            document.save(path).await?;
            return Ok(document);
        }
        Ok(serde_json::from_slice(&read(path).await?)?)
    }

    pub fn push(&mut self, state: &GameState) -> Result<(), GameDataError> {
        self.info.push(serde_json::to_value(state)?);
        Ok(())
    }

    pub async fn save(&self, path: &Path) -> Result<(), GameDataError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent).await?;
        }
        write(path, serde_json::to_vec_pretty(self)?).await?;
        Ok(())
    }
}
