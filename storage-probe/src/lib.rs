//! Azure Functions custom handler confirming storage access of the ambient identity.
//!
//! Two functions are served:
//!
//! - `ConfirmStorageAccess` lists a container with the identity the app runs
//!   as and answers `{"access": "1"}` or `{"access": "0"}`.
//! - `BlobIngress` logs the name and size of every blob landing under the
//!   watched path.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use storage_probe::{default_context, AccessProber, ProbeRequest};
//! use storage_probe::azure::{Config, DefaultCredentialProvider};
//!
//! # async fn example() -> storage_probe::Result<()> {
//! let ctx = default_context(Duration::from_secs(30))?;
//! let config = Config::default().from_env(&ctx);
//! let prober = AccessProber::new(ctx, DefaultCredentialProvider::new(), config);
//!
//! let result = prober.probe(&ProbeRequest::new("silver")).await;
//! println!("{}", result.body());
//! # Ok(())
//! # }
//! ```

pub use probe_core::*;

/// Azure Blob Storage types re-exported for callers wiring their own prober.
pub mod azure {
    pub use probe_azure_blob::*;
}

mod config;
pub use config::{
    FunctionConfig, FUNCTIONS_CUSTOMHANDLER_PORT, STORAGE_PROBE_TIMEOUT_SECS,
    STORAGE_PROBE_TRIGGER_PATH,
};

mod context;
pub use context::default_context;

mod ingress;
pub use ingress::{BlobNotice, BlobPath, IngressNotifier, TriggerEvent, DEFAULT_TRIGGER_PATH};

mod probe;
pub use probe::{AccessProber, Denied, Granted, ProbeOutcome, ProbeRequest, ProbeResult};

pub mod host;

#[cfg(test)]
mod test_logger;
