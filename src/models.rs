//! Data models for brand feeds and their decoded payloads.
//!
//! This module defines the structures shared by the loader, renderer and
//! orchestrator:
//! - [`SourceDescriptor`]: One configured brand feed
//! - [`Item`]: A single press release entry
//! - [`RawPayload`]: The feed document exactly as it appears on the wire
//! - [`FeedPayload`]: The decoded payload, either loaded or failed
//!
//! Feed documents are produced by an external ingestion job. Items are
//! expected newest-first and are never re-sorted here.

use serde::Deserialize;

/// Fallback shown when a failed payload carries no error text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// One brand feed known to the board.
///
/// Descriptors are defined once at startup (built-in or from a registry
/// file) and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceDescriptor {
    /// Stable identifier, e.g. `"vodafone"`.
    pub key: String,
    /// Display name used as the card heading.
    pub name: String,
    /// Resource location, absolute URL or relative to the board base.
    pub location: String,
}

impl SourceDescriptor {
    pub fn new(key: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            location: location.into(),
        }
    }
}

/// A single press release in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// ISO-8601 publish time. May be missing, null or unparseable.
    #[serde(default)]
    pub publish_datetime: Option<String>,
}

/// The feed document as written by the ingestion job.
///
/// Every field is optional on the wire; [`RawPayload::into_payload`] decides
/// which branch the renderer sees.
#[derive(Debug, Default, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<Item>>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RawPayload {
    /// Collapse the wire shape into a [`FeedPayload`].
    ///
    /// Only `status == "ok"` counts as loaded; anything else, including a
    /// missing status, is a failure carrying `error` or [`UNKNOWN_ERROR`].
    /// An empty `generated_at` is treated as absent.
    pub fn into_payload(self) -> FeedPayload {
        match self.status.as_deref() {
            Some("ok") => FeedPayload::Loaded {
                items: self.items.unwrap_or_default(),
                generated_at: self.generated_at.filter(|g| !g.is_empty()),
            },
            _ => FeedPayload::Failed {
                message: self
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            },
        }
    }
}

/// A brand's data for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPayload {
    Loaded {
        items: Vec<Item>,
        generated_at: Option<String>,
    },
    Failed {
        message: String,
    },
}

impl FeedPayload {
    pub fn failed(message: impl Into<String>) -> Self {
        FeedPayload::Failed {
            message: message.into(),
        }
    }

    /// The feed's generation timestamp, if it loaded and carries a non-empty one.
    pub fn generated_at(&self) -> Option<&str> {
        match self {
            FeedPayload::Loaded { generated_at, .. } => {
                generated_at.as_deref().filter(|g| !g.is_empty())
            }
            FeedPayload::Failed { .. } => None,
        }
    }
}
