//! Share links
//!
//! Two forms are produced and understood:
//! - inline: `<base>/wish?<query>`, the whole card in the query string
//! - stored: `<base>/g/<slug>`, a card saved in the configured backend

use anyhow::{bail, Result};
use url::Url;

use crate::codec::query::{self, QueryParams};
use crate::codec::{decode, Decoded};
use crate::models::Greeting;
use crate::store::slug;

const INLINE_PATH: &str = "wish";
const SLUG_PATH: &str = "g";

/// What a share link points at
#[derive(Debug, Clone, PartialEq)]
pub enum ShareTarget {
    /// Query parameters carrying the card itself
    Inline(Vec<(String, String)>),
    /// Slug of a stored card
    Slug(String),
}

impl ShareTarget {
    /// Decode an inline target. Stored targets need a store lookup.
    pub fn decode_inline(&self) -> Option<Decoded> {
        match self {
            ShareTarget::Inline(pairs) => {
                let params = QueryParams::from_pairs(pairs.iter().cloned());
                if !params.has_greeting_fields() {
                    tracing::warn!("Link carries no greeting fields, showing a blank card");
                }
                Some(decode(&params))
            }
            ShareTarget::Slug(_) => None,
        }
    }
}

pub fn inline_link(base: &str, greeting: &Greeting) -> String {
    format!(
        "{}/{}?{}",
        base.trim_end_matches('/'),
        INLINE_PATH,
        query::to_query_string(greeting)
    )
}

pub fn slug_link(base: &str, slug: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), SLUG_PATH, slug)
}

fn query_pairs(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn from_url(url: &Url, text: &str) -> Result<ShareTarget> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if let [.., SLUG_PATH, slug] = segments.as_slice() {
        if slug::is_valid(slug) {
            return Ok(ShareTarget::Slug(slug.to_string()));
        }
        bail!("Invalid greeting slug in link: {}", slug);
    }

    let pairs = url.query().map(query_pairs).unwrap_or_default();
    if pairs.is_empty() {
        bail!("Not a greeting link: {}", text);
    }
    Ok(ShareTarget::Inline(pairs))
}

/// Host and path with the scheme left off, e.g. `cards.example.org/g/slug`
fn looks_schemeless(text: &str) -> bool {
    let head = text.split('?').next().unwrap_or_default();
    !text.starts_with('?') && head.contains('/') && !head.contains('=')
}

/// Parse a link, a raw query string or a bare slug
pub fn parse_link(text: &str) -> Result<ShareTarget> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Empty link");
    }

    if let Ok(url) = Url::parse(text) {
        return from_url(&url, text);
    }

    if looks_schemeless(text) {
        if let Ok(url) = Url::parse(&format!("https://{}", text)) {
            return from_url(&url, text);
        }
    }

    if text.starts_with('?') || text.contains('=') {
        let query = text.split_once('?').map_or(text, |(_, rest)| rest);
        if !QueryParams::from_query_string(query).has_greeting_fields() {
            bail!("Query has no greeting fields: {}", text);
        }
        return Ok(ShareTarget::Inline(query_pairs(query)));
    }

    if slug::is_valid(text) {
        return Ok(ShareTarget::Slug(text.to_string()));
    }

    bail!("Not a greeting link or slug: {}", text)
}
