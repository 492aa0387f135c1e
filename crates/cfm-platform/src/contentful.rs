//! Contentful Management API client.
//!
//! This adapter owns transport details only: URL construction, auth and
//! version headers, HTTP error mapping, pagination, and JSON decoding into
//! the wire types.

use crate::error::{PlatformError, PlatformResult};
use crate::traits::ContentPlatform;
use crate::types::{ApiKey, Collection, Entry, Environment, EnvironmentAlias, Locale};
use async_trait::async_trait;
use cfm_core::EnvironmentId;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Default Management API endpoint
pub const DEFAULT_API_URL: &str = "https://api.contentful.com";

const CONTENT_TYPE: &str = "application/vnd.contentful.management.v1+json";
const VERSION_HEADER: &str = "X-Contentful-Version";
const SOURCE_ENV_HEADER: &str = "X-Contentful-Source-Environment";
const USER_AGENT: &str = concat!("cfm/", env!("CARGO_PKG_VERSION"));
const PAGE_SIZE: usize = 100;
const MAX_ERROR_BODY: usize = 512;

/// Management API handle bound to one space.
pub struct ContentfulClient {
    client: Client,
    base_url: String,
    space_id: String,
    access_token: String,
}

impl ContentfulClient {
    /// Build a client with an explicit request timeout.
    pub fn new(
        base_url: &str,
        space_id: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> PlatformResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PlatformError::ClientSetup(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            space_id: space_id.into(),
            access_token: access_token.into(),
        })
    }

    /// URL of a space-scoped path
    fn space_url(&self, path: &str) -> String {
        space_url(&self.base_url, &self.space_id, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.space_url(path))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
    }

    fn with_body<B: Serialize>(
        builder: RequestBuilder,
        resource: &str,
        body: &B,
    ) -> PlatformResult<RequestBuilder> {
        let bytes = serde_json::to_vec(body).map_err(|e| PlatformError::InvalidResource {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;
        Ok(builder.body(bytes))
    }

    async fn send_raw(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> PlatformResult<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| PlatformError::Transport {
                resource: resource.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(resource, status, &body))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> PlatformResult<T> {
        let response = self.send_raw(builder, resource).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| PlatformError::Transport {
                resource: resource.to_string(),
                message: e.to_string(),
            })?;
        serde_json::from_slice(&body).map_err(|e| PlatformError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }

    /// GET one page of a collection endpoint.
    fn page_request(&self, path: &str, query: &[(&str, &str)], skip: usize) -> RequestBuilder {
        let skip = skip.to_string();
        let limit = PAGE_SIZE.to_string();
        self.request(Method::GET, path)
            .query(query)
            .query(&[("skip", skip.as_str()), ("limit", limit.as_str())])
    }

    /// Fetch every page of a collection endpoint.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> PlatformResult<Vec<T>> {
        let mut items = Vec::new();
        let mut skip = 0;
        loop {
            let builder = self.page_request(path, query, skip);
            let page: Collection<T> = self.send(builder, path).await?;
            let page_len = page.items.len();
            items.extend(page.items);
            match next_skip(items.len(), page_len, page.total) {
                Some(next) => skip = next,
                None => break,
            }
        }
        Ok(items)
    }

    /// PUT guarded by the resource's current `sys.version`.
    fn versioned_put(
        &self,
        path: &str,
        version: Option<u64>,
        body: Option<&Value>,
    ) -> PlatformResult<RequestBuilder> {
        let version = require_version(path, version)?;
        let builder = self
            .request(Method::PUT, path)
            .header(VERSION_HEADER, version);
        match body {
            Some(body) => Self::with_body(builder, path, body),
            None => Ok(builder),
        }
    }

    /// PUT creating environment `id` as a clone of `source`.
    fn clone_environment_request(
        &self,
        id: &EnvironmentId,
        source: &EnvironmentId,
    ) -> PlatformResult<RequestBuilder> {
        let path = format!("environments/{}", id);
        let builder = self
            .request(Method::PUT, &path)
            .header(SOURCE_ENV_HEADER, source.as_str());
        Self::with_body(builder, &path, &json!({ "name": id.as_str() }))
    }
}

/// Offset of the next page, or `None` once the collection is exhausted.
///
/// `fetched` counts every item received so far, including the page just read.
fn next_skip(fetched: usize, page_len: usize, total: usize) -> Option<usize> {
    if page_len == 0 || fetched >= total {
        None
    } else {
        Some(fetched)
    }
}

/// `<base>/spaces/<space>/<path>`
fn space_url(base_url: &str, space_id: &str, path: &str) -> String {
    format!("{}/spaces/{}/{}", base_url, space_id, path)
}

fn map_status_error(resource: &str, status: StatusCode, body: &str) -> PlatformError {
    if status == StatusCode::NOT_FOUND {
        return PlatformError::NotFound {
            resource: resource.to_string(),
        };
    }
    PlatformError::Http {
        resource: resource.to_string(),
        status: status.as_u16(),
        message: truncate(body.trim(), MAX_ERROR_BODY),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

fn require_version(resource: &str, version: Option<u64>) -> PlatformResult<String> {
    version
        .map(|v| v.to_string())
        .ok_or_else(|| PlatformError::InvalidResource {
            resource: resource.to_string(),
            message: "missing sys.version".to_string(),
        })
}

#[async_trait]
impl ContentPlatform for ContentfulClient {
    fn space_id(&self) -> &str {
        &self.space_id
    }

    async fn get_environment(&self, id: &EnvironmentId) -> PlatformResult<Environment> {
        let path = format!("environments/{}", id);
        self.send(self.request(Method::GET, &path), &path).await
    }

    async fn delete_environment(&self, id: &EnvironmentId) -> PlatformResult<()> {
        let path = format!("environments/{}", id);
        self.send_raw(self.request(Method::DELETE, &path), &path)
            .await?;
        Ok(())
    }

    async fn create_environment(
        &self,
        id: &EnvironmentId,
        source: &EnvironmentId,
    ) -> PlatformResult<Environment> {
        let path = format!("environments/{}", id);
        let builder = self.clone_environment_request(id, source)?;
        self.send(builder, &path).await
    }

    async fn list_api_keys(&self) -> PlatformResult<Vec<ApiKey>> {
        self.fetch_all("api_keys", &[]).await
    }

    async fn update_api_key(&self, key: &ApiKey) -> PlatformResult<ApiKey> {
        let path = format!("api_keys/{}", key.sys.id);
        let body = json!({
            "name": key.name,
            "description": key.description,
            "environments": key.environments,
        });
        let builder = self.versioned_put(&path, key.sys.version, Some(&body))?;
        self.send(builder, &path).await
    }

    async fn list_locales(&self, env: &EnvironmentId) -> PlatformResult<Vec<Locale>> {
        self.fetch_all(&format!("environments/{}/locales", env), &[])
            .await
    }

    async fn list_entries(
        &self,
        env: &EnvironmentId,
        content_type: &str,
    ) -> PlatformResult<Vec<Entry>> {
        self.fetch_all(
            &format!("environments/{}/entries", env),
            &[("content_type", content_type)],
        )
        .await
    }

    async fn update_entry(&self, env: &EnvironmentId, entry: &Entry) -> PlatformResult<Entry> {
        let path = format!("environments/{}/entries/{}", env, entry.sys.id);
        let body = json!({ "fields": entry.fields });
        let builder = self.versioned_put(&path, entry.sys.version, Some(&body))?;
        self.send(builder, &path).await
    }

    async fn publish_entry(&self, env: &EnvironmentId, entry: &Entry) -> PlatformResult<Entry> {
        let path = format!("environments/{}/entries/{}/published", env, entry.sys.id);
        let builder = self.versioned_put(&path, entry.sys.version, None)?;
        self.send(builder, &path).await
    }

    async fn get_alias(&self, alias_id: &str) -> PlatformResult<EnvironmentAlias> {
        let path = format!("environment_aliases/{}", alias_id);
        self.send(self.request(Method::GET, &path), &path).await
    }

    async fn update_alias(&self, alias: &EnvironmentAlias) -> PlatformResult<EnvironmentAlias> {
        let path = format!("environment_aliases/{}", alias.sys.id);
        let body = json!({ "environment": alias.environment });
        let builder = self.versioned_put(&path, alias.sys.version, Some(&body))?;
        self.send(builder, &path).await
    }
}

#[cfg(test)]
#[path = "contentful_test.rs"]
mod tests;
