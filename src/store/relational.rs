//! Relational backend: REST rows plus RPC functions
//!
//! Endpoints (PostgREST conventions):
//! - `POST /rest/v1/rpc/generate_unique_slug` returns a JSON string
//! - `POST /rest/v1/greetings` inserts a row
//! - `GET /rest/v1/greetings?slug=eq.<slug>` loads a row
//! - `POST /rest/v1/rpc/increment_view_count` bumps the counter

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::http::{send, send_json};
use super::{parse_timestamp, GreetingStore, GreetingSummary, StoreError, StoredGreeting};
use crate::codec::row::{lenient_count, lenient_slug, lenient_text, GreetingRow, RowMeta};
use crate::codec::Field;
use crate::config::Config;
use crate::models::Greeting;

const TABLE: &str = "greetings";
const BACKEND: &str = "relational";

pub struct RelationalStore {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryRow {
    #[serde(default, deserialize_with = "lenient_slug")]
    id: String,
    #[serde(default, deserialize_with = "lenient_slug")]
    slug: String,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    receiver_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    view_count: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    created_at: Option<String>,
}

impl RelationalStore {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: None,
            user_id: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let rel = &config.relational;
        let url = rel.url.as_deref().ok_or(StoreError::NotConfigured {
            backend: BACKEND,
            missing: "relational.url",
        })?;
        let key = rel.anon_key.as_deref().ok_or(StoreError::NotConfigured {
            backend: BACKEND,
            missing: "relational.anon_key",
        })?;

        let mut store = Self::new(url, key);
        store.access_token = rel.access_token.clone();
        store.user_id = config.user_id.clone();
        Ok(store)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn rpc<T: serde::de::DeserializeOwned>(
        &self,
        function: &str,
        args: serde_json::Value,
    ) -> Result<T, StoreError> {
        let url = self.url(&format!("rpc/{}", function));
        tracing::debug!("RPC {}", function);
        send_json(self.request(Method::POST, &url).json(&args), &url).await
    }

    async fn generate_slug(&self, greeting: &Greeting) -> Result<String, StoreError> {
        let slug: String = self
            .rpc(
                "generate_unique_slug",
                json!({
                    "sender_name": greeting.sender_name,
                    "receiver_name": greeting.receiver_name,
                    "event_name": greeting.event_name(),
                }),
            )
            .await?;
        if slug.is_empty() {
            return Err(StoreError::malformed(&self.url("rpc/generate_unique_slug"), "empty slug"));
        }
        Ok(slug)
    }
}

#[async_trait]
impl GreetingStore for RelationalStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn save(&self, greeting: &Greeting, title: Option<&str>) -> Result<String, StoreError> {
        let slug = self.generate_slug(greeting).await?;
        let row = GreetingRow::from_greeting(
            greeting,
            RowMeta {
                user_id: self.user_id.clone(),
                title: title.map(String::from),
                slug: slug.clone(),
            },
        );

        let url = self.url(TABLE);
        tracing::debug!("POST {}", url);
        let inserted: Vec<GreetingRow> = send_json(
            self.request(Method::POST, &url)
                .header("Prefer", "return=representation")
                .json(&row),
            &url,
        )
        .await?;

        Ok(inserted
            .into_iter()
            .next()
            .map(|r| r.slug)
            .filter(|s| !s.is_empty())
            .unwrap_or(slug))
    }

    async fn load_by_slug(&self, slug: &str) -> Result<Option<StoredGreeting>, StoreError> {
        let url = self.url(TABLE);
        tracing::debug!("GET {} slug={}", url, slug);
        let rows: Vec<GreetingRow> = send_json(
            self.request(Method::GET, &url).query(&[
                ("slug", format!("eq.{}", slug)),
                ("select", "*".to_string()),
                ("limit", "1".to_string()),
            ]),
            &url,
        )
        .await?;

        Ok(rows.into_iter().next().map(|row| StoredGreeting {
            id: row.id.clone().unwrap_or_default(),
            slug: row.slug.clone(),
            title: row.title.clone(),
            view_count: row.view_count,
            created_at: parse_timestamp(row.created_at.as_deref()),
            decoded: row.decode(),
        }))
    }

    async fn increment_view_count(&self, id: &str) -> Result<(), StoreError> {
        let url = self.url("rpc/increment_view_count");
        send(
            self.request(Method::POST, &url)
                .json(&json!({ "greeting_id": id })),
            &url,
        )
        .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<GreetingSummary>, StoreError> {
        let url = self.url(TABLE);
        let select = format!(
            "id,slug,title,{},{},view_count,created_at",
            Field::EventType.column(),
            Field::ReceiverName.column()
        );
        let rows: Vec<SummaryRow> = send_json(
            self.request(Method::GET, &url).query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("select", select),
                ("order", "created_at.desc".to_string()),
            ]),
            &url,
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| GreetingSummary {
                created_at: parse_timestamp(r.created_at.as_deref()),
                id: r.id,
                slug: r.slug,
                title: r.title,
                event_type: r.event_type.unwrap_or_default(),
                receiver_name: r.receiver_name.unwrap_or_default(),
                view_count: r.view_count,
            })
            .collect())
    }
}
