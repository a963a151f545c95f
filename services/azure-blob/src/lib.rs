//! Azure Blob Storage access for storage probes
//!
//! This crate resolves credentials for Azure Blob Storage and lists blobs:
//! - Managed identity (App Service and VM IMDS)
//! - Entra ID client secret and workload identity
//! - SAS token and static bearer token from env
//!
//! # Example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use probe_azure_blob::{Config, ContainerClient, DefaultCredentialProvider, ListStyle};
//! use probe_core::{Context, OsEnv, ProvideCredential};
//! use probe_file_read_tokio::TokioFileRead;
//! use probe_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let config = Config::default().from_env(&ctx);
//!     let credential = DefaultCredentialProvider::new()
//!         .provide_credential(&ctx)
//!         .await?
//!         .ok_or_else(|| anyhow::anyhow!("no credential available"))?;
//!
//!     let client = ContainerClient::new(ctx, &config.endpoint()?, "silver", credential)?;
//!     let listing = client.list_blobs(&ListStyle::Flat).await?;
//!     println!("{} blobs", listing.len());
//!
//!     Ok(())
//! }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod listing;
pub use listing::{BlobItem, BlobListing};

mod client;
pub use client::{ContainerClient, ListStyle};

mod provide_credential;
pub use provide_credential::*;
