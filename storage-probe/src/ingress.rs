//! Notifications for objects landing in a watched storage path.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use log::info;
use probe_core::{Error, Result};

/// Trigger path used when none is configured.
pub const DEFAULT_TRIGGER_PATH: &str = "silver/{name}";

/// A new object delivered by the blob trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Object name relative to the watched prefix.
    pub name: String,
    /// Full object content.
    pub payload: Bytes,
}

impl TriggerEvent {
    /// Create a new event.
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Payload length in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// The record emitted for a [`TriggerEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobNotice {
    /// Object name.
    pub name: String,
    /// Object size in bytes.
    pub size: usize,
}

impl fmt::Display for BlobNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Blob trigger processed a blob. Name: {} Size: {} Bytes",
            self.name, self.size
        )
    }
}

/// IngressNotifier reports every object the trigger delivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngressNotifier;

impl IngressNotifier {
    /// Create a new notifier.
    pub fn new() -> Self {
        Self
    }

    /// Emit exactly one `info` record for the event and return it.
    pub fn notify(&self, event: &TriggerEvent) -> BlobNotice {
        let notice = BlobNotice {
            name: event.name.clone(),
            size: event.size(),
        };
        info!(name = notice.name.as_str(), size = notice.size; "{notice}");

        notice
    }
}

/// BlobPath is a trigger path pattern of the form `{prefix}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPath {
    prefix: String,
}

impl Default for BlobPath {
    fn default() -> Self {
        Self {
            prefix: "silver".to_string(),
        }
    }
}

impl BlobPath {
    /// Parse a pattern such as `silver/{name}` or `silver/incoming/{name}`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim().trim_matches('/');
        let prefix = trimmed
            .strip_suffix("/{name}")
            .filter(|p| !p.is_empty() && !p.contains(['{', '}']))
            .ok_or_else(|| {
                Error::config_invalid(format!(
                    "blob trigger path must look like {{prefix}}/{{name}}: {pattern}"
                ))
            })?;

        Ok(Self {
            prefix: prefix.to_string(),
        })
    }

    /// Fixed part of the pattern, starting with the container.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Extract `{name}` from a concrete blob path like `silver/2022/foo.txt`.
    ///
    /// Returns `None` if the path is outside the prefix.
    pub fn name_of<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.trim_start_matches('/')
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('/')
            .filter(|name| !name.is_empty())
    }
}

impl FromStr for BlobPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BlobPath::parse(s)
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{{name}}", self.prefix)
    }
}
