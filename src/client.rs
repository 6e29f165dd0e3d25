use std::collections::HashMap;
use std::sync::Mutex;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::banner::{BannerPayload, BannerResponse, BannersResponse};

/// Cache identity for a fetched resource, one per banner plus the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Banners,
    Banner { id: String },
}

impl CacheKey {
    pub fn banner(id: impl Into<String>) -> Self {
        Self::Banner { id: id.into() }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("api error {status}: {code}")]
    Api { status: StatusCode, code: String },
}

/// Typed wrappers over the banner API. Reads are answered from the cache
/// when a fresh entry exists; mutations invalidate every banner key before
/// storing the returned detail.
pub struct BannerClient {
    http: reqwest::Client,
    base: String,
    cache: Mutex<HashMap<CacheKey, Value>>,
}

impl BannerClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base_url.as_str().trim_end_matches('/').to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn list(&self) -> Result<BannersResponse, ClientError> {
        if let Some(hit) = self.cached(&CacheKey::Banners) {
            return Ok(hit);
        }

        let value = self
            .envelope(self.http.get(format!("{}/api/banners", self.base)))
            .await?;
        self.store(CacheKey::Banners, value.clone());
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get(&self, id: &str) -> Result<BannerResponse, ClientError> {
        let key = CacheKey::banner(id);
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let value = self
            .envelope(self.http.get(format!("{}/api/banners/{id}", self.base)))
            .await?;
        self.store(key, value.clone());
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create(&self, payload: &BannerPayload) -> Result<BannerResponse, ClientError> {
        let value = self
            .envelope(self.http.post(format!("{}/api/banners", self.base)).json(payload))
            .await?;
        self.invalidate_all();

        let response: BannerResponse = serde_json::from_value(value.clone())?;
        if let Some(banner) = &response.data.banner {
            self.store(CacheKey::banner(banner.id.clone()), value);
        }
        Ok(response)
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &BannerPayload,
    ) -> Result<BannerResponse, ClientError> {
        let value = self
            .envelope(
                self.http
                    .post(format!("{}/api/banners/{id}", self.base))
                    .json(payload),
            )
            .await?;
        self.invalidate_all();
        self.store(CacheKey::banner(id), value.clone());
        Ok(serde_json::from_value(value)?)
    }

    /// Drop every cached banner entry, list included.
    pub fn invalidate_all(&self) {
        self.cache.lock().unwrap().clear();
    }

    async fn envelope(&self, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let value: Value = response.json().await?;

        if !status.is_success() {
            let code = value
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("INTERNAL_SERVER_ERROR")
                .to_string();
            return Err(ClientError::Api { status, code });
        }
        Ok(value)
    }

    fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let cache = self.cache.lock().unwrap();
        let value = cache.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    fn store(&self, key: CacheKey, value: Value) {
        self.cache.lock().unwrap().insert(key, value);
    }
}
