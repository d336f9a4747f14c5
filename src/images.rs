//! Destination photos from Unsplash, memoized per query

use crate::lookup::{get_json, LookupError};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

pub const MAX_IMAGES: usize = 4;

/// Ordered photo URLs, at most [`MAX_IMAGES`]
pub type ImageSet = Vec<String>;

pub struct ImageClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    /// Successful results by exact query string. Unbounded.
    cache: Mutex<HashMap<String, Arc<ImageSet>>>,
}

impl ImageClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, base_url: &str) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint: format!("{}/search/photos", base_url.trim_end_matches('/')),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Photos for `place`. The first success for a given string is replayed
    /// for the rest of the process; failures are not cached.
    pub async fn search(&self, place: &str) -> Result<Arc<ImageSet>, LookupError> {
        if let Some(hit) = self.cached(place) {
            return Ok(hit);
        }

        let urls = Arc::new(self.fetch(place).await?);
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // A concurrent request may have filled the slot first; keep that one.
        Ok(cache.entry(place.to_string()).or_insert(urls).clone())
    }

    /// Lookup collapsed to an empty set, logged at debug level.
    pub async fn search_or_empty(&self, place: &str) -> Arc<ImageSet> {
        match self.search(place).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::debug!(place, error = %e, "No destination images");
                Arc::new(ImageSet::new())
            }
        }
    }

    fn cached(&self, place: &str) -> Option<Arc<ImageSet>> {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(place)
            .cloned()
    }

    async fn fetch(&self, place: &str) -> Result<ImageSet, LookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookupError::MissingKey("Unsplash"))?;

        let per_page = MAX_IMAGES.to_string();
        let body: SearchResponse = get_json(
            &self.http,
            &self.endpoint,
            &[
                ("query", place),
                ("client_id", api_key),
                ("per_page", &per_page),
                ("orientation", "landscape"),
            ],
        )
        .await?;

        let urls: ImageSet = body
            .results
            .into_iter()
            .take(MAX_IMAGES)
            .map(|photo| photo.urls.regular)
            .collect();

        tracing::debug!(place, count = urls.len(), "Fetched destination images");
        Ok(urls)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}
