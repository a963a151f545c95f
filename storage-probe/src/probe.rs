//! Confirm that the ambient identity can read a storage container.

use std::sync::Arc;

use log::{info, warn};
use probe_azure_blob::{Config, ContainerClient, Credential, ListStyle};
use probe_core::{Context, Error, ProvideCredential, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Which container to probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Container name, possibly empty.
    pub container: String,
    /// Account overriding the configured one.
    pub account: Option<String>,
}

impl ProbeRequest {
    /// Probe `container` in the configured account.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            account: None,
        }
    }

    /// Probe in `account` instead of the configured one.
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Build a request from an HTTP call.
    ///
    /// A non-blank body names the container and wins over the `container`
    /// query parameter. A body holding a JSON string is unquoted.
    pub fn from_parts(body: Option<&str>, query: Option<&str>) -> Self {
        let from_body = body.map(str::trim).filter(|v| !v.is_empty()).map(|v| {
            serde_json::from_str::<String>(v).unwrap_or_else(|_| v.to_string())
        });

        Self::new(
            from_body
                .or_else(|| query.map(str::to_string))
                .unwrap_or_default(),
        )
    }
}

/// The container was listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Granted {
    /// Entries returned by the first listing page.
    pub entries: usize,
}

/// The container could not be listed.
#[derive(Debug)]
pub struct Denied {
    /// Why, for logging only.
    pub cause: Error,
}

/// Internal result of a probe before it is collapsed into a [`ProbeResult`].
pub type ProbeOutcome = std::result::Result<Granted, Denied>;

/// Answer returned to the caller.
///
/// Serializes as `{"access":"1"}` or `{"access":"0"}`. [`ProbeResult::body`]
/// gives the exact wire body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// Whether the listing succeeded.
    pub access_granted: bool,
}

impl ProbeResult {
    /// Flag rendered in the body.
    pub fn flag(&self) -> &'static str {
        if self.access_granted {
            "1"
        } else {
            "0"
        }
    }

    /// Response body.
    pub fn body(&self) -> &'static str {
        if self.access_granted {
            r#"{"access": "1"}"#
        } else {
            r#"{"access": "0"}"#
        }
    }
}

impl From<&ProbeOutcome> for ProbeResult {
    fn from(outcome: &ProbeOutcome) -> Self {
        ProbeResult {
            access_granted: outcome.is_ok(),
        }
    }
}

impl Serialize for ProbeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("access", self.flag())?;
        map.end()
    }
}

/// AccessProber answers whether the ambient identity can list a container.
///
/// Every probe resolves a fresh credential and builds its own client, so
/// probes share nothing but the context.
#[derive(Debug, Clone)]
pub struct AccessProber {
    ctx: Context,
    resolver: Arc<dyn ProvideCredential<Credential = Credential>>,
    config: Config,
}

impl AccessProber {
    /// Create a prober resolving credentials through `resolver`.
    pub fn new(
        ctx: Context,
        resolver: impl ProvideCredential<Credential = Credential>,
        config: Config,
    ) -> Self {
        Self {
            ctx,
            resolver: Arc::new(resolver),
            config,
        }
    }

    /// Probe and collapse the outcome into `{"access": "1"}` / `{"access": "0"}`.
    ///
    /// Logs exactly one line per call.
    pub async fn probe(&self, req: &ProbeRequest) -> ProbeResult {
        let outcome = self.try_probe(req).await;
        let endpoint = self.endpoint(req).unwrap_or_default();

        match &outcome {
            Ok(granted) => info!(
                container = req.container.as_str(),
                endpoint = endpoint.as_str(),
                access = "1",
                entries = granted.entries;
                "storage access confirmed"
            ),
            Err(denied) => {
                let kind = denied.cause.kind().to_string();
                let cause = denied.cause.report();
                warn!(
                    container = req.container.as_str(),
                    endpoint = endpoint.as_str(),
                    access = "0",
                    kind = kind.as_str(),
                    cause = cause.as_str();
                    "storage access denied"
                )
            }
        }

        ProbeResult::from(&outcome)
    }

    /// Probe and keep the cause of a failure.
    pub async fn try_probe(&self, req: &ProbeRequest) -> ProbeOutcome {
        self.list(req)
            .await
            .map(|entries| Granted { entries })
            .map_err(|cause| Denied { cause })
    }

    async fn list(&self, req: &ProbeRequest) -> Result<usize> {
        let credential = self
            .resolver
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| {
                Error::credential_invalid("no credential could be resolved from the environment")
            })?;

        let endpoint = self.endpoint(req)?;
        let client = ContainerClient::new(self.ctx.clone(), &endpoint, &req.container, credential)?;
        let listing = client.list_blobs(&ListStyle::Flat).await?;

        Ok(listing.items.into_iter().count())
    }

    fn endpoint(&self, req: &ProbeRequest) -> Result<String> {
        match req.account.as_deref() {
            Some(account) => self.config.endpoint_for(Some(account)),
            None => self.config.endpoint(),
        }
    }
}
