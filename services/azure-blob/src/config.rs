use probe_core::{Context, Error, Result};

use crate::constants::*;

/// Config describes which Blob Storage account a probe talks to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`FUNCTIONS_STORAGE_ACCOUNT_NAME`]
    /// - env value: [`AZURE_STORAGE_ACCOUNT_NAME`]
    pub account_name: Option<String>,
    /// `blob_endpoint` overrides the endpoint derived from the account name.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`FUNCTIONS_BLOB_SERVICE_URI`]
    /// - env value: [`AZURE_STORAGE_BLOB_ENDPOINT`]
    pub blob_endpoint: Option<String>,
    /// `endpoint_suffix` defaults to `core.windows.net`.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ENDPOINT_SUFFIX`]
    pub endpoint_suffix: Option<String>,
}

impl Config {
    /// Load config from env, keeping fields that are already set.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if self.account_name.is_none() {
            self.account_name = ctx
                .env_var_set(FUNCTIONS_STORAGE_ACCOUNT_NAME)
                .or_else(|| ctx.env_var_set(AZURE_STORAGE_ACCOUNT_NAME));
        }
        if self.blob_endpoint.is_none() {
            self.blob_endpoint = ctx
                .env_var_set(FUNCTIONS_BLOB_SERVICE_URI)
                .or_else(|| ctx.env_var_set(AZURE_STORAGE_BLOB_ENDPOINT));
        }
        if self.endpoint_suffix.is_none() {
            self.endpoint_suffix = ctx.env_var_set(AZURE_STORAGE_ENDPOINT_SUFFIX);
        }

        self
    }

    /// Set the account name.
    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    /// Set an explicit blob endpoint such as `https://pitestdatasa.blob.core.windows.net`.
    pub fn with_blob_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.blob_endpoint = Some(endpoint.into());
        self
    }

    /// Blob service endpoint without trailing slash.
    ///
    /// An explicit endpoint wins; otherwise `https://{account}.blob.{suffix}`.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = self.blob_endpoint.as_deref() {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }

        self.endpoint_for(self.account_name.as_deref())
    }

    /// Blob service endpoint for the given account, falling back to the configured one.
    pub fn endpoint_for(&self, account_name: Option<&str>) -> Result<String> {
        let account = account_name
            .or(self.account_name.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::config_invalid(format!(
                    "storage account name is not configured, set {FUNCTIONS_STORAGE_ACCOUNT_NAME}"
                ))
            })?;
        let suffix = self
            .endpoint_suffix
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);

        Ok(format!("https://{account}.blob.{suffix}"))
    }
}
