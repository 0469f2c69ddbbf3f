use crate::config::BackendConfig;
use crate::error::{ConfigError, StoreError};
use crate::llm::{build_provider_client, sanitize_api_error};
use crate::model::UserProfileRecord;
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

const PROFILE_COLUMNS: &str =
    "user_id,onboarding_done,life_areas,direction,values,blockers,weekly_hours";

/// Persistence for onboarding profiles, keyed by user id.
pub trait ProfileStore: Send + Sync {
    /// `None` when the user has no row yet.
    fn fetch<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<UserProfileRecord>>;

    /// Insert or merge the row with the same `user_id`.
    fn upsert<'a>(&'a self, record: &'a UserProfileRecord) -> StoreFuture<'a, ()>;
}

/// `user_profiles` table behind a PostgREST endpoint.
pub struct PostgrestProfileStore {
    client: Client,
    table_url: String,
    anon_key: Option<String>,
    bearer: Option<String>,
}

impl PostgrestProfileStore {
    pub fn new(base_url: &str, anon_key: Option<&str>, bearer: Option<&str>) -> Self {
        Self {
            client: build_provider_client(),
            table_url: format!("{}/rest/v1/user_profiles", base_url.trim_end_matches('/')),
            anon_key: anon_key.map(String::from),
            bearer: bearer.or(anon_key).map(String::from),
        }
    }

    pub fn from_config(backend: &BackendConfig) -> Result<Self, ConfigError> {
        let base_url = backend
            .base_url()
            .ok_or_else(|| ConfigError::Validation("backend.url is not set".into()))?;
        Ok(Self::new(
            base_url,
            backend.anon_key.as_deref(),
            backend.bearer_token(),
        ))
    }

    fn authorize(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key);
        }
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Request(sanitize_api_error(&e.to_string())))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(StoreError::Rejected {
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            })
        }
    }

    async fn fetch_row(&self, user_id: &str) -> Result<Option<UserProfileRecord>, StoreError> {
        let filter = format!("eq.{user_id}");
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", PROFILE_COLUMNS), ("user_id", filter.as_str())]);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Request(sanitize_api_error(&e.to_string())))?;
        let body = Self::read_body(response).await?;
        let mut rows: Vec<UserProfileRecord> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        if rows.len() > 1 {
            tracing::warn!(user_id, rows = rows.len(), "multiple profile rows; using the first");
        }
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn upsert_row(&self, record: &UserProfileRecord) -> Result<(), StoreError> {
        let request = self
            .client
            .post(&self.table_url)
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(record);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Request(sanitize_api_error(&e.to_string())))?;
        Self::read_body(response).await.map(|_| ())
    }
}

impl ProfileStore for PostgrestProfileStore {
    fn fetch<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<UserProfileRecord>> {
        Box::pin(self.fetch_row(user_id))
    }

    fn upsert<'a>(&'a self, record: &'a UserProfileRecord) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            tracing::debug!(user_id = %record.user_id, "saving profile");
            self.upsert_row(record).await
        })
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryProfileStore {
    rows: Mutex<HashMap<String, UserProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<UserProfileRecord> {
        self.rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<UserProfileRecord>> {
        Box::pin(async move { Ok(self.get(user_id)) })
    }

    fn upsert<'a>(&'a self, record: &'a UserProfileRecord) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.rows
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(record.user_id.clone(), record.clone());
            Ok(())
        })
    }
}
