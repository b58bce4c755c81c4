//! Document backend over the Firestore REST API
//!
//! Writes go through `documents:commit` so that server timestamps and the
//! view counter increment are applied by the server. Reads use
//! `documents:runQuery` with a field filter.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::firestore::{document_id, from_fields, to_fields};
use super::http::send_json;
use super::{parse_timestamp, slug, GreetingStore, GreetingSummary, StoreError, StoredGreeting};
use crate::codec::document::{self, DocumentMeta};
use crate::codec::field_text;
use crate::codec::Field;
use crate::config::Config;
use crate::models::Greeting;

const BACKEND: &str = "document";

pub struct DocumentStore {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    collection: String,
    user_id: Option<String>,
}

/// A stored document as returned by the API
#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(rename = "createTime")]
    create_time: Option<String>,
}

/// One element of a `runQuery` response stream
#[derive(Debug, Deserialize)]
struct QueryResult {
    document: Option<RawDocument>,
}

impl DocumentStore {
    pub fn new(endpoint: &str, project_id: &str, api_key: &str, collection: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
            collection: collection.to_string(),
            user_id: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let doc = &config.document;
        let project_id = doc.project_id.as_deref().ok_or(StoreError::NotConfigured {
            backend: BACKEND,
            missing: "document.project_id",
        })?;
        let api_key = doc.api_key.as_deref().ok_or(StoreError::NotConfigured {
            backend: BACKEND,
            missing: "document.api_key",
        })?;

        let mut store = Self::new(&doc.endpoint, project_id, api_key, &doc.collection);
        store.user_id = config.user_id.clone();
        Ok(store)
    }

    /// Resource name prefix, e.g. `projects/p/databases/(default)/documents`
    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn document_name(&self, id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), self.collection, id)
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}:{}", self.endpoint, self.database_path(), method)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> Result<T, StoreError> {
        let url = self.url(method);
        tracing::debug!("POST {}", url);
        send_json(
            self.http
                .post(&url)
                .query(&[("key", &self.api_key)])
                .json(body),
            &url,
        )
        .await
    }

    async fn commit(&self, writes: Value) -> Result<(), StoreError> {
        let _: Value = self.post("commit", &json!({ "writes": writes })).await?;
        Ok(())
    }

    async fn run_query(
        &self,
        filter_field: &str,
        value: &str,
        extra: Map<String, Value>,
    ) -> Result<Vec<RawDocument>, StoreError> {
        let mut query = Map::new();
        query.insert("from".into(), json!([{ "collectionId": self.collection }]));
        query.insert(
            "where".into(),
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": filter_field },
                    "op": "EQUAL",
                    "value": { "stringValue": value }
                }
            }),
        );
        query.extend(extra);

        let results: Vec<QueryResult> = self
            .post("runQuery", &json!({ "structuredQuery": query }))
            .await?;
        Ok(results.into_iter().filter_map(|r| r.document).collect())
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(String::from)
}

#[async_trait]
impl GreetingStore for DocumentStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn save(&self, greeting: &Greeting, title: Option<&str>) -> Result<String, StoreError> {
        let slug = slug::with_suffix(&slug::generate(
            &greeting.sender_name,
            &greeting.receiver_name,
            greeting.event_name(),
        ));
        let doc = document::encode_with_meta(
            greeting,
            &DocumentMeta {
                slug: slug.clone(),
                title: title.map(String::from),
                user_id: self.user_id.clone(),
                is_public: true,
            },
        );

        let id = uuid::Uuid::new_v4().simple().to_string();
        self.commit(json!([{
            "update": {
                "name": self.document_name(&id),
                "fields": to_fields(&doc)
            },
            "currentDocument": { "exists": false },
            "updateTransforms": [
                { "fieldPath": document::CREATED_AT, "setToServerValue": "REQUEST_TIME" },
                { "fieldPath": document::UPDATED_AT, "setToServerValue": "REQUEST_TIME" }
            ]
        }]))
        .await?;

        Ok(slug)
    }

    async fn load_by_slug(&self, slug: &str) -> Result<Option<StoredGreeting>, StoreError> {
        let mut extra = Map::new();
        extra.insert("limit".into(), json!(1));
        let docs = self.run_query(document::SLUG, slug, extra).await?;

        Ok(docs.into_iter().next().map(|raw| {
            let fields = from_fields(&raw.fields);
            let created_at = text_field(&fields, document::CREATED_AT).or(raw.create_time);
            StoredGreeting {
                id: document_id(&raw.name).to_string(),
                slug: text_field(&fields, document::SLUG).unwrap_or_else(|| slug.to_string()),
                title: text_field(&fields, document::TITLE),
                view_count: fields
                    .get(document::VIEW_COUNT)
                    .and_then(Value::as_i64)
                    .unwrap_or(0),
                created_at: parse_timestamp(created_at.as_deref()),
                decoded: document::decode_value(&Value::Object(fields)),
            }
        }))
    }

    async fn increment_view_count(&self, id: &str) -> Result<(), StoreError> {
        self.commit(json!([{
            "transform": {
                "document": self.document_name(id),
                "fieldTransforms": [
                    { "fieldPath": document::VIEW_COUNT, "increment": { "integerValue": "1" } }
                ]
            }
        }]))
        .await
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<GreetingSummary>, StoreError> {
        let mut extra = Map::new();
        extra.insert(
            "orderBy".into(),
            json!([{ "field": { "fieldPath": document::CREATED_AT }, "direction": "DESCENDING" }]),
        );
        let docs = self.run_query(document::USER_ID, user_id, extra).await?;

        Ok(docs
            .into_iter()
            .map(|raw| {
                let fields = from_fields(&raw.fields);
                let greeting = document::decode_value(&Value::Object(fields.clone())).greeting;
                GreetingSummary {
                    id: document_id(&raw.name).to_string(),
                    slug: text_field(&fields, document::SLUG).unwrap_or_default(),
                    title: text_field(&fields, document::TITLE),
                    event_type: field_text(&greeting, Field::EventType),
                    receiver_name: greeting.receiver_name,
                    view_count: fields
                        .get(document::VIEW_COUNT)
                        .and_then(Value::as_i64)
                        .unwrap_or(0),
                    created_at: parse_timestamp(
                        text_field(&fields, document::CREATED_AT)
                            .or(raw.create_time)
                            .as_deref(),
                    ),
                }
            })
            .collect())
    }
}
