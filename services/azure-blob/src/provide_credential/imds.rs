use async_trait::async_trait;
use probe_core::time::{now, parse_expires_on};
use probe_core::{Context, Error, ProvideCredential, Result};

use crate::constants::*;
use crate::Credential;

/// Load credential from the managed identity endpoint of the current host.
///
/// - On App Service and Azure Functions, [`IDENTITY_ENDPOINT`] and
///   [`IDENTITY_HEADER`] are injected and used with api-version `2019-08-01`.
/// - Elsewhere the VM Instance Metadata Service is queried with api-version
///   `2018-02-01`. [`AZURE_IMDS_ENDPOINT`] overrides its address.
///
/// A user-assigned identity is selected with [`AZURE_CLIENT_ID`].
///
/// Reference: <https://learn.microsoft.com/en-us/azure/app-service/overview-managed-identity?tabs=portal,http#rest-endpoint-reference>
#[derive(Debug, Default, Clone)]
pub struct ImdsCredentialProvider {
    client_id: Option<String>,
}

impl ImdsCredentialProvider {
    /// Create a new managed identity provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the user-assigned identity with this client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ImdsCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let client_id = self
            .client_id
            .clone()
            .or_else(|| ctx.env_var(AZURE_CLIENT_ID))
            .filter(|v| !v.is_empty());

        let app_service = ctx
            .env_var_set(IDENTITY_ENDPOINT)
            .zip(ctx.env_var_set(IDENTITY_HEADER));

        let req = match app_service {
            Some((endpoint, secret)) => {
                let url = token_url(&endpoint, "2019-08-01", client_id.as_deref());
                http::Request::get(url).header("X-IDENTITY-HEADER", secret)
            }
            None => {
                let endpoint = ctx
                    .env_var_set(AZURE_IMDS_ENDPOINT)
                    .unwrap_or_else(|| DEFAULT_IMDS_ENDPOINT.to_string());
                let url = token_url(&endpoint, "2018-02-01", client_id.as_deref());
                http::Request::get(url).header("Metadata", "true")
            }
        };
        let req = req
            .body(bytes::Bytes::new())
            .map_err(|e| Error::unexpected("failed to build IMDS request").with_source(e))?;

        let resp = ctx.http_send(req).await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = String::from_utf8_lossy(resp.body());
            return Err(Error::credential_invalid(format!(
                "IMDS request failed with status {status}: {body}"
            )));
        }

        let token: AccessTokenResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("failed to parse IMDS response").with_source(e))?;

        let expires_on = match token.expires_on {
            Some(serde_json::Value::String(s)) if !s.is_empty() => parse_expires_on(&s)?,
            Some(serde_json::Value::Number(n)) => parse_expires_on(&n.to_string())?,
            _ => now() + chrono::TimeDelta::minutes(10),
        };

        Ok(Some(Credential::with_bearer_token(
            &token.access_token,
            Some(expires_on),
        )))
    }
}

#[derive(serde::Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_on: Option<serde_json::Value>,
}

fn token_url(endpoint: &str, api_version: &str, client_id: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("api-version", api_version)
        .append_pair("resource", STORAGE_RESOURCE);
    if let Some(client_id) = client_id {
        query.append_pair("client_id", client_id);
    }

    format!("{endpoint}?{}", query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use probe_core::{HttpSend, StaticEnv};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct MockHttpSend {
        status: http::StatusCode,
        body: &'static str,
        seen: Arc<Mutex<Vec<http::Request<Bytes>>>>,
    }

    impl MockHttpSend {
        fn new(status: http::StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.seen.lock().unwrap().push(req);
            Ok(http::Response::builder()
                .status(self.status)
                .body(Bytes::from_static(self.body.as_bytes()))
                .unwrap())
        }
    }

    #[tokio::test]
    async fn test_app_service_identity_endpoint() {
        let http = MockHttpSend::new(
            http::StatusCode::OK,
            r#"{"access_token":"mi-token","expires_on":"1646122354","resource":"https://storage.azure.com/","token_type":"Bearer"}"#,
        );
        let ctx = Context::new()
            .with_http_send(http.clone())
            .with_env(StaticEnv::from_pairs([
                (IDENTITY_ENDPOINT, "http://127.0.0.1:41741/msi/token"),
                (IDENTITY_HEADER, "header-secret"),
            ]));

        let cred = ImdsCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();

        match cred {
            Some(Credential::BearerToken { token, expires_in }) => {
                assert_eq!(token, "mi-token");
                assert_eq!(expires_in.unwrap().timestamp(), 1646122354);
            }
            _ => panic!("Expected BearerToken credential"),
        }

        let seen = http.seen.lock().unwrap();
        assert_eq!(
            seen[0].uri().to_string(),
            "http://127.0.0.1:41741/msi/token?api-version=2019-08-01&resource=https%3A%2F%2Fstorage.azure.com%2F"
        );
        assert_eq!(seen[0].headers()["X-IDENTITY-HEADER"], "header-secret");
    }

    #[tokio::test]
    async fn test_vm_imds_with_user_assigned_identity() {
        let http = MockHttpSend::new(
            http::StatusCode::OK,
            r#"{"access_token":"vm-token","expires_on":1646122354}"#,
        );
        let ctx = Context::new()
            .with_http_send(http.clone())
            .with_env(StaticEnv::from_pairs([(AZURE_CLIENT_ID, "uami")]));

        let cred = ImdsCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_some());

        let seen = http.seen.lock().unwrap();
        assert_eq!(
            seen[0].uri().to_string(),
            "http://169.254.169.254/metadata/identity/oauth2/token?api-version=2018-02-01&resource=https%3A%2F%2Fstorage.azure.com%2F&client_id=uami"
        );
        assert_eq!(seen[0].headers()["Metadata"], "true");
    }

    #[tokio::test]
    async fn test_imds_rejects_failed_status() {
        let http = MockHttpSend::new(
            http::StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_request","error_description":"Identity not found"}"#,
        );
        let ctx = Context::new().with_http_send(http);

        let err = ImdsCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), probe_core::ErrorKind::CredentialInvalid);
    }
}
