//! PostgREST-backed catalog store.

use async_trait::async_trait;
use catalog_types::{Asset, AssetFilter, AssetQuery, Category, NewDownload};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{CatalogStore, Result, StoreError};

/// Connection settings for a PostgREST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Project URL, without the `/rest/v1` suffix.
    pub url: String,
    /// Public (anonymous) API key.
    pub api_key: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

impl RestConfig {
    /// Creates settings with the default timeout.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: default_timeout(),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the catalog tables exposed through PostgREST.
///
/// Every request carries the API key both as `apikey` and as a bearer
/// token. The client is cheaply cloneable.
#[derive(Clone)]
pub struct RestStore {
    base_url: String,
    api_key: String,
    http: Client,
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestStore {
    /// Creates a client for the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &RestConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            http,
        })
    }

    /// Returns the REST endpoint root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, resource: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.base_url, resource))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn fetch_rows<T: for<'de> Deserialize<'de>>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let res = self
            .request(Method::GET, resource)
            .query(params)
            .send()
            .await?;
        let res = check(res).await?;

        res.json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// Looks up a single row, treating a rejected filter value as absent.
    async fn fetch_one<T: for<'de> Deserialize<'de>>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>> {
        match self.fetch_rows(resource, params).await {
            Ok(rows) => Ok(rows.into_iter().next()),
            Err(StoreError::Backend { status: 400, message }) => {
                debug!(resource, %message, "Lookup rejected by backend");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

async fn check(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = res.text().await.unwrap_or_default();
    if status.is_server_error() {
        warn!(status = status.as_u16(), %message, "Backend request failed");
    }
    Err(StoreError::Backend {
        status: status.as_u16(),
        message,
    })
}

/// Quotes a value for use inside a PostgREST logical filter.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Translates a filter into PostgREST query parameters.
fn filter_params(filter: &AssetFilter) -> Vec<(&'static str, String)> {
    match filter {
        AssetFilter::InCategory(id) => vec![("category_id", format!("eq.{id}"))],
        AssetFilter::Matching(_) => {
            let pattern = quote(&filter.search_pattern().unwrap_or_default());
            vec![(
                "or",
                format!("(title.ilike.{pattern},description.ilike.{pattern})"),
            )]
        }
        AssetFilter::RelatedTo {
            category_id,
            exclude,
        } => {
            let mut params = Vec::with_capacity(2);
            if let Some(id) = category_id {
                params.push(("category_id", format!("eq.{id}")));
            }
            params.push(("id", format!("neq.{exclude}")));
            params
        }
    }
}

/// Extracts the total from a `Content-Range` header such as `0-19/123`.
fn parse_total(content_range: &str) -> Result<u64> {
    content_range
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
        .ok_or_else(|| {
            StoreError::InvalidResponse(format!("unusable content-range: {content_range}"))
        })
}

#[async_trait]
impl CatalogStore for RestStore {
    async fn categories(&self) -> Result<Vec<Category>> {
        self.fetch_rows(
            "categories",
            &[
                ("select", "*".to_string()),
                ("order", "display_order.asc".to_string()),
            ],
        )
        .await
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        self.fetch_one(
            "categories",
            &[
                ("select", "*".to_string()),
                ("slug", format!("eq.{slug}")),
                ("limit", "1".to_string()),
            ],
        )
        .await
    }

    async fn assets(&self, query: &AssetQuery) -> Result<Vec<Asset>> {
        if query.filter.is_unsatisfiable() {
            return Ok(Vec::new());
        }

        let mut params = vec![("select", "*".to_string())];
        params.extend(filter_params(&query.filter));
        params.push(("order", format!("{}.desc", query.order.column())));
        params.push(("offset", query.offset.to_string()));
        params.push(("limit", query.limit.to_string()));

        self.fetch_rows("assets", &params).await
    }

    async fn count_assets(&self, filter: &AssetFilter) -> Result<u64> {
        if filter.is_unsatisfiable() {
            return Ok(0);
        }

        let mut params = vec![("select", "id".to_string())];
        params.extend(filter_params(filter));

        let res = self
            .request(Method::HEAD, "assets")
            .header("Prefer", "count=exact")
            .query(&params)
            .send()
            .await?;
        let res = check(res).await?;

        let header = res
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .ok_or_else(|| StoreError::InvalidResponse("missing content-range".into()))?
            .to_str()
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        parse_total(header)
    }

    async fn asset(&self, id: &str) -> Result<Option<Asset>> {
        self.fetch_one(
            "assets",
            &[
                ("select", "*".to_string()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_string()),
            ],
        )
        .await
    }

    async fn increment_views(&self, id: &str) -> Result<()> {
        let res = self
            .request(Method::POST, "rpc/increment")
            .json(&json!({ "row_id": id, "x": 1 }))
            .send()
            .await?;
        check(res).await?;
        debug!(asset_id = %id, "View recorded");
        Ok(())
    }

    async fn record_download(&self, asset: &Asset) -> Result<u64> {
        let res = self
            .request(Method::POST, "downloads")
            .header("Prefer", "return=minimal")
            .json(&NewDownload::for_asset(&asset.id))
            .send()
            .await?;
        check(res).await?;

        let count = asset.downloads() + 1;
        let res = self
            .request(Method::PATCH, "assets")
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{}", asset.id))])
            .json(&json!({ "downloads_count": count }))
            .send()
            .await?;
        check(res).await?;

        debug!(asset_id = %asset.id, downloads = count, "Download recorded");
        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        let res = self
            .request(Method::GET, "categories")
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_types::SortOrder;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> RestStore {
        RestStore::new(&RestConfig::new(server.uri(), "anon-key")).unwrap()
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("%cat%"), r#""%cat%""#);
        assert_eq!(quote(r#"%a"b\c%"#), r#""%a\"b\\c%""#);
    }

    #[test]
    fn test_parse_total() {
        assert_eq!(parse_total("0-19/123").unwrap(), 123);
        assert_eq!(parse_total("*/0").unwrap(), 0);
        assert!(parse_total("0-19/*").is_err());
    }

    #[test]
    fn test_base_url_trims_slash() {
        let store = RestStore::new(&RestConfig::new("https://x.example/", "k")).unwrap();
        assert_eq!(store.base_url(), "https://x.example/rest/v1");
    }

    #[tokio::test]
    async fn test_categories_sends_keys_and_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(query_param("order", "display_order.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "c1", "name": "Backgrounds", "slug": "backgrounds", "display_order": 1},
                {"id": "c2", "name": "Icons", "slug": "icons", "display_order": null}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let categories = store(&server).categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].slug, "icons");
    }

    #[tokio::test]
    async fn test_listing_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/assets"))
            .and(query_param("category_id", "eq.c1"))
            .and(query_param("order", "downloads_count.desc"))
            .and(query_param("offset", "20"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let pagination = catalog_types::Pagination::new(2, 20, 45);
        let query = AssetQuery::new(AssetFilter::in_category("c1"))
            .order(SortOrder::Trending)
            .page(&pagination);
        assert!(store(&server).assets(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_uses_or_filter() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/assets"))
            .and(query_param(
                "or",
                r#"(title.ilike."%blue sky%",description.ilike."%blue sky%")"#,
            ))
            .and(query_param("order", "created_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "a1", "title": "Blue Sky", "file_url": "f", "thumbnail_url": "t"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let query = AssetQuery::new(AssetFilter::matching("Blue Sky"));
        let found = store(&server).assets(&query).await.unwrap();
        assert_eq!(found[0].id, "a1");
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/rest/v1/assets"))
            .and(header("prefer", "count=exact"))
            .and(query_param("category_id", "eq.c1"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-range", "0-19/123"))
            .mount(&server)
            .await;

        let total = store(&server)
            .count_assets(&AssetFilter::in_category("c1"))
            .await
            .unwrap();
        assert_eq!(total, 123);
    }

    #[tokio::test]
    async fn test_related_without_category_skips_backend() {
        let server = MockServer::start().await;
        let orphan = Asset::new("a1", "Loose", "f", "t");

        let store = store(&server);
        let filter = AssetFilter::related_to(&orphan);
        assert!(store
            .assets(&AssetQuery::new(filter.clone()))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.count_assets(&filter).await.unwrap(), 0);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_asset_missing_or_rejected_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/assets"))
            .and(query_param("id", "eq.gone"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/assets"))
            .and(query_param("id", "eq.not-a-uuid"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("invalid input syntax for type uuid"),
            )
            .mount(&server)
            .await;

        let store = store(&server);
        assert!(store.asset("gone").await.unwrap().is_none());
        assert!(store.asset("not-a-uuid").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_surfaces() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = store(&server).categories().await.unwrap_err();
        assert!(matches!(err, StoreError::Backend { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_increment_views_calls_rpc() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/increment"))
            .and(body_json(json!({"row_id": "a1", "x": 1})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).increment_views("a1").await.unwrap();
    }

    #[tokio::test]
    async fn test_record_download_inserts_then_updates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/downloads"))
            .and(body_json(json!({"asset_id": "a1", "ip_address": "unknown"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/assets"))
            .and(query_param("id", "eq.a1"))
            .and(body_json(json!({"downloads_count": 8})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut asset = Asset::new("a1", "Dunes", "f", "t");
        asset.downloads_count = Some(7);
        assert_eq!(store(&server).record_download(&asset).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(store(&server).ping().await.is_ok());
    }
}
