//! Persistence errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{backend} backend is not configured: missing {missing}. Run 'greetings-cli config set'.")]
    NotConfigured {
        backend: &'static str,
        missing: &'static str,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("401 Unauthorized for {0}. Check the configured keys.")]
    Unauthorized(String),

    #[error("HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Unexpected response from {url}: {detail}")]
    Malformed { url: String, detail: String },
}

impl StoreError {
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        StoreError::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn malformed(url: &str, detail: impl ToString) -> Self {
        StoreError::Malformed {
            url: url.to_string(),
            detail: detail.to_string(),
        }
    }
}
