use std::time::Duration;

use tokio::time::sleep;
use tracing::*;

use http::{header, Extensions, HeaderMap, HeaderValue, StatusCode};
use reqwest::{Client, Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next, Result};

use crate::riot::RiotApiError;

pub const DEFAULT_REGION: &str = "americas";
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(120);

/// Everything the api client needs, handed over by whoever owns the run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub rate_limit_wait: Duration,
}

impl ClientConfig {
    pub fn for_region(api_key: impl Into<String>, region: &str) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: format!("https://{region}.api.riotgames.com"),
            rate_limit_wait: DEFAULT_RATE_LIMIT_WAIT,
        }
    }
}

/// Sleeps once on a 429 and sends the request a second time. Whatever the
/// second response is gets handed back.
struct RetryOnceOnRateLimit {
    wait: Duration,
}

#[async_trait::async_trait]
impl Middleware for RetryOnceOnRateLimit {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let Some(retry) = req.try_clone() else {
            return next.run(req, extensions).await;
        };
        let res = next.clone().run(req, extensions).await?;
        if res.status() != StatusCode::TOO_MANY_REQUESTS {
            return Ok(res);
        }
        event!(
            Level::WARN,
            url = %res.url(),
            "rate limit exceeded, waiting {}s before retrying",
            self.wait.as_secs()
        );
        sleep(self.wait).await;
        next.run(retry, extensions).await
    }
}

pub(crate) fn client(config: &ClientConfig) -> std::result::Result<ClientWithMiddleware, RiotApiError> {
    if config.api_key.trim().is_empty() {
        return Err(RiotApiError::MissingApiKey);
    }
    let mut token = HeaderValue::from_str(config.api_key.trim())?;
    token.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert("x-riot-token", token);
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    let reqwest_client = Client::builder().default_headers(headers).build()?;

    Ok(ClientBuilder::new(reqwest_client)
        .with(RetryOnceOnRateLimit {
            wait: config.rate_limit_wait,
        })
        .build())
}
