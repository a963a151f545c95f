use std::time::Duration;

use probe_azure_blob::Config;
use probe_core::{Context, Error, Result};

use crate::ingress::BlobPath;

/// Port the Functions host forwards invocations to.
pub const FUNCTIONS_CUSTOMHANDLER_PORT: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";
/// Timeout in seconds for every backend call (token endpoints and storage).
pub const STORAGE_PROBE_TIMEOUT_SECS: &str = "STORAGE_PROBE_TIMEOUT_SECS";
/// Blob trigger path pattern, such as `silver/{name}`.
pub const STORAGE_PROBE_TRIGGER_PATH: &str = "STORAGE_PROBE_TRIGGER_PATH";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings of the custom handler process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionConfig {
    /// Loopback port to listen on.
    pub port: u16,
    /// Timeout applied to every outgoing request.
    pub timeout: Duration,
    /// Path pattern of the blob trigger.
    pub trigger_path: BlobPath,
    /// Storage account settings.
    pub blob: Config,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            trigger_path: BlobPath::default(),
            blob: Config::default(),
        }
    }
}

impl FunctionConfig {
    /// Load config from env.
    ///
    /// Unset or empty values fall back to defaults, malformed ones are rejected.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let mut cfg = FunctionConfig {
            blob: Config::default().from_env(ctx),
            ..Default::default()
        };

        if let Some(v) = ctx.env_var_set(FUNCTIONS_CUSTOMHANDLER_PORT) {
            cfg.port = v.trim().parse().map_err(|e| {
                Error::config_invalid(format!("{FUNCTIONS_CUSTOMHANDLER_PORT} is not a port: {v}"))
                    .with_source(e)
            })?;
        }

        if let Some(v) = ctx.env_var_set(STORAGE_PROBE_TIMEOUT_SECS) {
            let secs: u64 = v.trim().parse().map_err(|e| {
                Error::config_invalid(format!(
                    "{STORAGE_PROBE_TIMEOUT_SECS} is not a number of seconds: {v}"
                ))
                .with_source(e)
            })?;
            if secs == 0 {
                return Err(Error::config_invalid(format!(
                    "{STORAGE_PROBE_TIMEOUT_SECS} must be greater than zero"
                )));
            }
            cfg.timeout = Duration::from_secs(secs);
        }

        if let Some(v) = ctx.env_var_set(STORAGE_PROBE_TRIGGER_PATH) {
            cfg.trigger_path = v.parse()?;
        }

        Ok(cfg)
    }
}
