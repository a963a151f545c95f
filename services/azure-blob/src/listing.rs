//! Response bodies of the List Blobs operation.
//!
//! Reference: <https://learn.microsoft.com/en-us/rest/api/storageservices/list-blobs>

use probe_core::{Error, Result};
use quick_xml::de;
use serde::Deserialize;

/// A single entry returned by List Blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobItem {
    /// A blob with its size in bytes.
    Blob {
        /// Full blob name.
        name: String,
        /// Size in bytes.
        content_length: u64,
    },
    /// A virtual directory, only returned by hierarchical listings.
    Prefix {
        /// Prefix name, ending with the delimiter.
        name: String,
    },
}

impl BlobItem {
    /// Name of the blob or prefix.
    pub fn name(&self) -> &str {
        match self {
            BlobItem::Blob { name, .. } => name,
            BlobItem::Prefix { name } => name,
        }
    }
}

/// One page of a container listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobListing {
    /// Entries in service order.
    pub items: Vec<BlobItem>,
    /// Continuation marker when the service truncated the listing.
    pub next_marker: Option<String>,
}

impl BlobListing {
    /// Parse an `EnumerationResults` document.
    pub fn from_xml(body: &str) -> Result<Self> {
        let output: EnumerationResults = de::from_str(body).map_err(|e| {
            Error::unexpected("failed to parse list blobs response").with_source(e)
        })?;

        let items = output
            .blobs
            .items
            .into_iter()
            .map(|entry| match entry {
                BlobEntry::Blob(blob) => BlobItem::Blob {
                    name: blob.name,
                    content_length: blob.properties.content_length,
                },
                BlobEntry::BlobPrefix(prefix) => BlobItem::Prefix { name: prefix.name },
            })
            .collect();

        Ok(BlobListing {
            items,
            next_marker: output.next_marker.filter(|v| !v.is_empty()),
        })
    }

    /// Number of entries in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct EnumerationResults {
    blobs: Blobs,
    next_marker: Option<String>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct Blobs {
    #[serde(rename = "$value")]
    items: Vec<BlobEntry>,
}

#[derive(Debug, Deserialize)]
enum BlobEntry {
    Blob(BlobRecord),
    BlobPrefix(PrefixRecord),
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct BlobRecord {
    name: String,
    properties: BlobProperties,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct BlobProperties {
    #[serde(rename = "Content-Length")]
    content_length: u64,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct PrefixRecord {
    name: String,
}

/// Error document returned by the Blob service.
#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct StorageErrorBody {
    pub code: String,
    pub message: String,
}

impl StorageErrorBody {
    pub(crate) fn from_xml(body: &str) -> Option<Self> {
        de::from_str::<StorageErrorBody>(body)
            .ok()
            .filter(|e| !e.code.is_empty())
    }
}
