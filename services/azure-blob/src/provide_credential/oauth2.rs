//! Microsoft identity platform (v2) client credentials exchange.
//!
//! Reference: <https://learn.microsoft.com/en-us/entra/identity-platform/v2-oauth2-client-creds-grant-flow>

use probe_core::time::now;
use probe_core::{Context, Error, Result};

use crate::Credential;

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchange a urlencoded client credentials form for a storage bearer token.
pub(crate) async fn request_token(
    ctx: &Context,
    authority_host: &str,
    tenant_id: &str,
    form: String,
    flow: &str,
) -> Result<Credential> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        authority_host.trim_end_matches('/'),
        tenant_id
    );

    let req = http::Request::builder()
        .method(http::Method::POST)
        .uri(&url)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(bytes::Bytes::from(form))
        .map_err(|e| Error::unexpected(format!("failed to build {flow} request")).with_source(e))?;

    let resp = ctx.http_send(req).await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = String::from_utf8_lossy(resp.body());
        return Err(Error::credential_invalid(format!(
            "{flow} request failed with status {status}: {body}"
        )));
    }

    let token: TokenResponse = serde_json::from_slice(resp.body()).map_err(|e| {
        Error::unexpected(format!("failed to parse {flow} response")).with_source(e)
    })?;

    let lifetime = token
        .expires_in
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(chrono::TimeDelta::try_seconds)
        .unwrap_or_else(|| chrono::TimeDelta::minutes(10));

    Ok(Credential::with_bearer_token(
        &token.access_token,
        Some(now() + lifetime),
    ))
}
