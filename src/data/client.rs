//! Hacker News API client
//!
//! Fetches story lists, items and user profiles from the Firebase API. Every
//! lookup goes through the TTL cache first; only a miss issues an HTTP request.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Category, Story, User};
use crate::cache::{cache_key, TtlCache};
use crate::error::HnError;

/// Default base URL of the Firebase API
const API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Default time-to-live for cached responses
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Read access to Hacker News data
///
/// Implemented by [`HnClient`]; the pagination engine, comment navigator and
/// search only depend on this trait.
#[allow(async_fn_in_trait)]
pub trait HnSource {
    /// Ordered story IDs for a category
    async fn story_ids(&mut self, category: Category) -> Result<Vec<u64>, HnError>;

    /// One item by ID
    async fn item(&mut self, id: u64) -> Result<Story, HnError>;

    /// One user profile by username
    async fn user(&mut self, username: &str) -> Result<User, HnError>;

    /// Drops every cached response
    fn clear_cache(&mut self);
}

/// Client for the Hacker News Firebase API
#[derive(Debug)]
pub struct HnClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Cache consulted before every request
    cache: TtlCache,
    /// How long cached responses stay fresh
    ttl: Duration,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl HnClient {
    /// Creates a client using the given cache and TTL
    pub fn new(cache: TtlCache, ttl: Duration) -> Self {
        Self::with_base_url(cache, ttl, API_BASE_URL.to_string())
    }

    /// Creates a client against a custom base URL
    pub fn with_base_url(cache: TtlCache, ttl: Duration, base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            cache,
            ttl,
            base_url,
        }
    }

    /// The cache backing this client
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Returns the cached value for `key` or fetches and caches `url`
    async fn cached_json(&mut self, key: &str, url: &str, what: &str) -> Result<Value, HnError> {
        if let Some(value) = self.cache.get(key, self.ttl) {
            return Ok(value.clone());
        }

        let value = self.fetch_json(url).await?;
        if value.is_null() {
            return Err(HnError::NotFound(what.to_string()));
        }
        self.cache.set(key, value.clone());
        Ok(value)
    }

    /// Issues one GET request and parses the JSON body
    async fn fetch_json(&self, url: &str) -> Result<Value, HnError> {
        debug!(url, "fetching");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| HnError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HnError::Request {
                url: url.to_string(),
                reason: format!("HTTP status {status}"),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HnError::request(url, e))
    }
}

/// Decodes a cached or fetched JSON value into a model type
fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, HnError> {
    serde_json::from_value(value).map_err(|e| HnError::Malformed {
        what: what.to_string(),
        reason: e.to_string(),
    })
}

impl HnSource for HnClient {
    async fn story_ids(&mut self, category: Category) -> Result<Vec<u64>, HnError> {
        let key = cache_key("stories", &[&category]);
        let url = format!("{}/{}stories.json", self.base_url, category);
        let what = format!("{category} stories");
        let value = self.cached_json(&key, &url, &what).await?;
        decode(value, &what)
    }

    async fn item(&mut self, id: u64) -> Result<Story, HnError> {
        let key = cache_key("item", &[&id]);
        let url = format!("{}/item/{id}.json", self.base_url);
        let what = format!("item {id}");
        let value = self.cached_json(&key, &url, &what).await?;
        decode(value, &what)
    }

    async fn user(&mut self, username: &str) -> Result<User, HnError> {
        let key = cache_key("user", &[&username]);
        let url = format!("{}/user/{username}.json", self.base_url);
        let what = format!("user {username}");
        let value = self.cached_json(&key, &url, &what).await?;
        decode(value, &what)
    }

    fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
