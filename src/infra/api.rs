#![allow(dead_code)]

//! Thin asynchronous client for the shop REST API.
//!
//! - Typed accessors for customers, comics and pulls (list, get, create, update, delete).
//! - List queries go through an in-memory cache that callers invalidate after mutations.
//! - Any non-2xx response is a `FetchFailed`; nothing is retried.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{
    CacheResource, Comic, ComicPayload, Customer, CustomerPayload, NewPull, Pull, PullUpdate,
};
use crate::infra::cache::{CacheStatus, Cached, CachedPayload, QueryCache};
use crate::util::version::user_agent;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base URL cannot carry a path: {0}")]
    InvalidBase(String),
    #[error("request failed: {0}")]
    FetchFailed(#[from] reqwest::Error),
    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct ShopClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<QueryCache>>,
    ttl: Duration,
}

impl ShopClient {
    pub fn with_base_url(base: &str) -> Result<Self, ApiError> {
        Self::with_options(base, DEFAULT_TIMEOUT)
    }

    pub fn with_options(base: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBase(base.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(QueryCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Drop one cached query so the next read goes to the server.
    pub async fn invalidate(&self, resource: CacheResource) {
        tracing::debug!(%resource, "invalidating cached query");
        self.cache.lock().await.invalidate(&resource);
    }

    // ── Customers ───────────────────────────────────────────────────

    pub async fn list_customers(&self) -> Result<CachedPayload<Vec<Customer>>, ApiError> {
        {
            let cache = self.cache.lock().await;
            if let Some(payload) = cache.customers.as_ref().and_then(|e| e.if_fresh(self.ttl)) {
                return Ok(payload);
            }
        }

        let data: Vec<Customer> = self.get_json(self.url(&["customers"])?).await?;
        let fetched_at = SystemTime::now();
        self.cache.lock().await.customers = Some(Cached::new(data.clone(), fetched_at));
        Ok(CachedPayload::new(data, fetched_at, CacheStatus::Fresh))
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer, ApiError> {
        self.get_json(self.url(&["customers", id])?).await
    }

    pub async fn create_customer(&self, body: &CustomerPayload) -> Result<Customer, ApiError> {
        self.send_json(Method::POST, self.url(&["customers"])?, body)
            .await
    }

    pub async fn update_customer(
        &self,
        id: &str,
        body: &CustomerPayload,
    ) -> Result<Customer, ApiError> {
        self.send_json(Method::PUT, self.url(&["customers", id])?, body)
            .await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        self.delete(self.url(&["customers", id])?).await
    }

    // ── Comics ──────────────────────────────────────────────────────

    pub async fn list_comics(&self) -> Result<CachedPayload<Vec<Comic>>, ApiError> {
        {
            let cache = self.cache.lock().await;
            if let Some(payload) = cache.comics.as_ref().and_then(|e| e.if_fresh(self.ttl)) {
                return Ok(payload);
            }
        }
        self.fetch_comics().await
    }

    /// Always hits the server, then refreshes the cached catalog.
    pub async fn fetch_comics(&self) -> Result<CachedPayload<Vec<Comic>>, ApiError> {
        let data: Vec<Comic> = self.get_json(self.url(&["comics"])?).await?;
        let fetched_at = SystemTime::now();
        self.cache.lock().await.comics = Some(Cached::new(data.clone(), fetched_at));
        Ok(CachedPayload::new(data, fetched_at, CacheStatus::Fresh))
    }

    pub async fn get_comic(&self, id: &str) -> Result<Comic, ApiError> {
        self.get_json(self.url(&["comics", id])?).await
    }

    pub async fn create_comic(&self, body: &ComicPayload) -> Result<Comic, ApiError> {
        self.send_json(Method::POST, self.url(&["comics"])?, body)
            .await
    }

    pub async fn update_comic(&self, id: &str, body: &ComicPayload) -> Result<Comic, ApiError> {
        self.send_json(Method::PUT, self.url(&["comics", id])?, body)
            .await
    }

    pub async fn delete_comic(&self, id: &str) -> Result<(), ApiError> {
        self.delete(self.url(&["comics", id])?).await
    }

    // ── Pulls ───────────────────────────────────────────────────────

    pub async fn customer_pulls(
        &self,
        customer_id: &str,
    ) -> Result<CachedPayload<Vec<Pull>>, ApiError> {
        {
            let cache = self.cache.lock().await;
            if let Some(payload) = cache
                .pull_lists
                .get(customer_id)
                .and_then(|e| e.if_fresh(self.ttl))
            {
                return Ok(payload);
            }
        }

        let data: Vec<Pull> = self
            .get_json(self.url(&["customers", customer_id, "pulls"])?)
            .await?;
        let fetched_at = SystemTime::now();
        self.cache
            .lock()
            .await
            .pull_lists
            .insert(customer_id.to_string(), Cached::new(data.clone(), fetched_at));
        Ok(CachedPayload::new(data, fetched_at, CacheStatus::Fresh))
    }

    /// Every pull in the shop. Never cached; only the holds report reads it.
    pub async fn all_pulls(&self) -> Result<Vec<Pull>, ApiError> {
        self.get_json(self.url(&["pulls"])?).await
    }

    pub async fn get_pull(&self, id: &str) -> Result<Pull, ApiError> {
        self.get_json(self.url(&["pulls", id])?).await
    }

    pub async fn create_pull(&self, customer_id: &str, body: &NewPull) -> Result<Pull, ApiError> {
        self.send_json(
            Method::POST,
            self.url(&["customers", customer_id, "pulls"])?,
            body,
        )
        .await
    }

    pub async fn update_pull(&self, id: &str, body: &PullUpdate) -> Result<Pull, ApiError> {
        self.send_json(Method::PUT, self.url(&["pulls", id])?, body)
            .await
    }

    pub async fn delete_pull(&self, id: &str) -> Result<(), ApiError> {
        self.delete(self.url(&["pulls", id])?).await
    }

    // ── Plumbing ────────────────────────────────────────────────────

    async fn get_json<T>(&self, url: Url) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(method = "GET", %url, "api request");
        let response = self.http.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, %url, "api request");
        let response = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn delete(&self, url: Url) -> Result<(), ApiError> {
        tracing::debug!(method = "DELETE", %url, "api request");
        self.http.delete(url).send().await?.error_for_status()?;
        Ok(())
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join("api/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
