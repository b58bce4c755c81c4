//! Greeting persistence
//!
//! One [`GreetingStore`] trait, two backends:
//! - [`RelationalStore`]: REST rows with JSON text columns, slugs from a
//!   server-side RPC
//! - [`DocumentStore`]: document database, slugs generated on the client
//!
//! The free functions at the bottom are what the CLI calls. They apply the
//! degrade-don't-fail policy: backend errors are logged and turned into
//! `None` or an empty list.

mod document;
mod error;
mod firestore;
mod http;
mod relational;
pub mod slug;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::codec::Decoded;
use crate::config::{Backend, Config};
use crate::models::Greeting;

pub use document::DocumentStore;
pub use error::StoreError;
pub(crate) use http::send_json;
pub use relational::RelationalStore;

/// A greeting read back from a store
#[derive(Debug, Clone)]
pub struct StoredGreeting {
    /// Backend record id, used for view counting
    pub id: String,
    pub slug: String,
    pub title: Option<String>,
    pub view_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub decoded: Decoded,
}

/// Listing entry for a user's saved greetings
#[derive(Debug, Clone, PartialEq)]
pub struct GreetingSummary {
    pub id: String,
    pub slug: String,
    pub title: Option<String>,
    pub event_type: String,
    pub receiver_name: String,
    pub view_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// Parse a backend timestamp, ignoring values that are not RFC 3339
pub(crate) fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(|s| DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc)))
}

#[async_trait]
pub trait GreetingStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Persist a greeting and return its slug
    async fn save(&self, greeting: &Greeting, title: Option<&str>) -> Result<String, StoreError>;

    async fn load_by_slug(&self, slug: &str) -> Result<Option<StoredGreeting>, StoreError>;

    async fn increment_view_count(&self, id: &str) -> Result<(), StoreError>;

    /// Greetings owned by `user_id`, newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<GreetingSummary>, StoreError>;
}

/// Build the store selected by configuration
pub fn open_store(config: &Config) -> Result<Arc<dyn GreetingStore>, StoreError> {
    let store: Arc<dyn GreetingStore> = match config.backend {
        Backend::Relational => Arc::new(RelationalStore::from_config(config)?),
        Backend::Document => Arc::new(DocumentStore::from_config(config)?),
    };
    tracing::debug!("Using {} backend", store.backend_name());
    Ok(store)
}

/// Load a greeting by slug and count the view in the background.
///
/// The view count update never delays or fails the load. The returned
/// handle lets a short-lived caller wait for it before exiting.
pub async fn load_greeting(
    store: Arc<dyn GreetingStore>,
    slug: &str,
) -> Option<(StoredGreeting, JoinHandle<()>)> {
    let stored = match store.load_by_slug(slug).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            tracing::info!("No greeting found for slug {}", slug);
            return None;
        }
        Err(e) => {
            tracing::warn!("Failed to load greeting {}: {}", slug, e);
            return None;
        }
    };

    let id = stored.id.clone();
    let counted = tokio::spawn(async move {
        if let Err(e) = store.increment_view_count(&id).await {
            tracing::warn!("Failed to increment view count for {}: {}", id, e);
        }
    });

    Some((stored, counted))
}

/// Save a greeting, returning its slug or `None` on failure
pub async fn save_greeting(
    store: &dyn GreetingStore,
    greeting: &Greeting,
    title: Option<&str>,
) -> Option<String> {
    match store.save(greeting, title).await {
        Ok(slug) => {
            tracing::info!("Saved greeting as {}", slug);
            Some(slug)
        }
        Err(e) => {
            tracing::warn!("Failed to save greeting: {}", e);
            None
        }
    }
}

/// List a user's greetings, empty on failure
pub async fn list_greetings(store: &dyn GreetingStore, user_id: &str) -> Vec<GreetingSummary> {
    store.list_for_user(user_id).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to list greetings for {}: {}", user_id, e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::row::{GreetingRow, RowMeta};
    use std::sync::Mutex;

    /// In-memory store for exercising the load/save policy
    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<Vec<GreetingRow>>,
        fail_reads: bool,
        fail_increments: bool,
        increments: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GreetingStore for FakeStore {
        fn backend_name(&self) -> &'static str {
            "fake"
        }

        async fn save(
            &self,
            greeting: &Greeting,
            title: Option<&str>,
        ) -> Result<String, StoreError> {
            let slug = slug::generate(
                &greeting.sender_name,
                &greeting.receiver_name,
                greeting.event_name(),
            );
            let mut row = GreetingRow::from_greeting(
                greeting,
                RowMeta {
                    user_id: None,
                    title: title.map(String::from),
                    slug: slug.clone(),
                },
            );
            let mut rows = self.rows.lock().unwrap();
            row.id = Some(format!("id-{}", rows.len()));
            rows.push(row);
            Ok(slug)
        }

        async fn load_by_slug(&self, slug: &str) -> Result<Option<StoredGreeting>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::Unauthorized("fake://greetings".to_string()));
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.slug == slug).map(|row| StoredGreeting {
                id: row.id.clone().unwrap_or_default(),
                slug: row.slug.clone(),
                title: row.title.clone(),
                view_count: row.view_count,
                created_at: None,
                decoded: row.decode(),
            }))
        }

        async fn increment_view_count(&self, id: &str) -> Result<(), StoreError> {
            self.increments.lock().unwrap().push(id.to_string());
            if self.fail_increments {
                return Err(StoreError::Status {
                    status: 500,
                    url: "fake://rpc".to_string(),
                    body: "boom".to_string(),
                });
            }
            Ok(())
        }

        async fn list_for_user(&self, _user_id: &str) -> Result<Vec<GreetingSummary>, StoreError> {
            Err(StoreError::NotConfigured {
                backend: "fake",
                missing: "user table",
            })
        }
    }

    fn birthday() -> Greeting {
        let mut greeting = Greeting::for_event("birthday");
        greeting.sender_name = "Ann".to_string();
        greeting.receiver_name = "Tom".to_string();
        greeting.add_text("Happy birthday!");
        greeting
    }

    #[tokio::test]
    async fn test_save_then_load_counts_view() {
        let store = Arc::new(FakeStore::default());
        let slug = save_greeting(store.as_ref(), &birthday(), Some("For Tom"))
            .await
            .unwrap();
        assert_eq!(slug, "ann-tom-birthday");

        let (loaded, counted) = load_greeting(store.clone(), &slug).await.unwrap();
        counted.await.unwrap();
        assert_eq!(loaded.decoded.greeting, birthday_without_ids(&loaded.decoded.greeting));
        assert_eq!(loaded.title.as_deref(), Some("For Tom"));

        assert_eq!(*store.increments.lock().unwrap(), vec!["id-0".to_string()]);
    }

    /// Expected greeting with the generated text id taken from `actual`
    fn birthday_without_ids(actual: &Greeting) -> Greeting {
        let mut expected = birthday();
        expected.texts[0].id = actual.texts[0].id.clone();
        expected
    }

    #[tokio::test]
    async fn test_failed_increment_does_not_affect_load() {
        let store = Arc::new(FakeStore {
            fail_increments: true,
            ..FakeStore::default()
        });
        let slug = store.save(&birthday(), None).await.unwrap();

        let (loaded, counted) = load_greeting(store.clone(), &slug).await.unwrap();
        assert_eq!(loaded.slug, slug);
        counted.await.unwrap();
        assert_eq!(store.increments.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_slug_is_none() {
        let store = Arc::new(FakeStore::default());
        assert!(load_greeting(store.clone(), "nobody-nothing").await.is_none());
        assert!(store.increments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_degrades() {
        let store = Arc::new(FakeStore {
            fail_reads: true,
            ..FakeStore::default()
        });
        assert!(load_greeting(store.clone(), "ann-tom-birthday").await.is_none());
        assert!(list_greetings(store.as_ref(), "u1").await.is_empty());
    }

    #[test]
    fn test_open_store_requires_config() {
        let config = Config::default();
        let err = open_store(&config).err().unwrap();
        assert!(matches!(err, StoreError::NotConfigured { backend: "relational", .. }));

        let mut config = Config::default();
        config.set("backend", "document").unwrap();
        config.set("document.project_id", "cards").unwrap();
        config.set("document.api_key", "key").unwrap();
        let store = open_store(&config).unwrap();
        assert_eq!(store.backend_name(), "document");
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp(Some("2026-02-01T10:00:00.123456+00:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-02-01T10:00:00.123456+00:00");
        assert!(parse_timestamp(Some("yesterday")).is_none());
        assert!(parse_timestamp(None).is_none());
    }
}
