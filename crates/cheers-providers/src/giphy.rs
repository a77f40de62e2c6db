use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::{ImageProvider, ProviderError};

/// How many search hits to pick from.
const SEARCH_LIMIT: &str = "25";

/// Giphy search client. Each fetch runs one search and picks a random hit.
pub struct GiphyClient {
    http: Client,
    api_url: String,
    api_key: String,
    query: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Gif>,
}

#[derive(Debug, Deserialize)]
struct Gif {
    images: Option<Images>,
}

#[derive(Debug, Deserialize)]
struct Images {
    original: Option<Rendition>,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    url: Option<String>,
}

impl GiphyClient {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            query: query.into(),
        }
    }

    async fn search(&self) -> Result<String, ProviderError> {
        let resp = self
            .http
            .get(&self.api_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("q", self.query.as_str()),
                ("limit", SEARCH_LIMIT),
                ("offset", "0"),
                ("rating", "g"),
                ("lang", "en"),
                ("bundle", "messaging_non_clips"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status()));
        }

        let body: SearchResponse = resp.json().await?;
        debug!("Image search returned {} results", body.data.len());

        if body.data.is_empty() {
            return Err(ProviderError::NoImage);
        }

        let idx = rand::rng().random_range(0..body.data.len());
        body.data
            .into_iter()
            .nth(idx)
            .and_then(|gif| gif.images)
            .and_then(|images| images.original)
            .and_then(|original| original.url)
            .filter(|url| !url.is_empty())
            .ok_or(ProviderError::NoImage)
    }
}

#[async_trait]
impl ImageProvider for GiphyClient {
    async fn fetch_celebration_image(&self) -> Result<String, ProviderError> {
        self.search().await.map_err(|e| {
            error!("Error fetching celebration image: {}", e);
            e
        })
    }
}
