pub mod account;
pub mod matches;

use http::StatusCode;
use reqwest::Url;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::*;

use crate::config::{client, ClientConfig};

#[derive(thiserror::Error, Debug)]
pub enum RiotApiError {
    #[error("api key is missing, provide a valid riot games api key")]
    MissingApiKey,
    #[error("api key is not a valid header value")]
    InvalidApiKey(#[from] http::header::InvalidHeaderValue),
    #[error("invalid base url {0}")]
    InvalidBaseUrl(String),
    #[error("riot api error {status} for {url}: {body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },
    #[error("serde error")]
    SerdeError(#[from] serde_json::Error),
    #[error("reqwest error")]
    ReqwestError(#[from] reqwest::Error),
    #[error("reqwest middleware error")]
    ReqwestMiddlewareError(#[from] reqwest_middleware::Error),
}

impl RiotApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RiotApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin wrapper over the account-v1 and tft-match-v1 endpoints.
pub struct TftClient {
    http: ClientWithMiddleware,
    base_url: Url,
}

impl TftClient {
    pub fn new(config: ClientConfig) -> Result<Self, RiotApiError> {
        let http = client(&config)?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| RiotApiError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(RiotApiError::InvalidBaseUrl(config.base_url));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RiotApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RiotApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RiotApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            event!(Level::DEBUG, %status, %url, "riot api returned an error");
            return Err(RiotApiError::Status { status, url, body });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
