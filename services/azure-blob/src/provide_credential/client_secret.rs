use async_trait::async_trait;
use probe_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::provide_credential::oauth2::request_token;
use crate::Credential;

/// Load credential from an Entra ID service principal secret.
///
/// Reads [`AZURE_TENANT_ID`], [`AZURE_CLIENT_ID`], [`AZURE_CLIENT_SECRET`] and
/// optionally [`AZURE_AUTHORITY_HOST`]. Returns `None` unless all three
/// required values are present.
#[derive(Debug, Default, Clone)]
pub struct ClientSecretCredentialProvider {
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl ClientSecretCredentialProvider {
    /// Create a new client secret provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant ID.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the client ID.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the client secret.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ClientSecretCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let lookup = |field: &Option<String>, key: &str| {
            field
                .clone()
                .or_else(|| ctx.env_var(key))
                .filter(|v| !v.is_empty())
        };

        let Some(tenant_id) = lookup(&self.tenant_id, AZURE_TENANT_ID) else {
            return Ok(None);
        };
        let Some(client_id) = lookup(&self.client_id, AZURE_CLIENT_ID) else {
            return Ok(None);
        };
        let Some(client_secret) = lookup(&self.client_secret, AZURE_CLIENT_SECRET) else {
            return Ok(None);
        };
        let authority_host = ctx
            .env_var_set(AZURE_AUTHORITY_HOST)
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());

        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("scope", STORAGE_SCOPE)
            .append_pair("client_id", &client_id)
            .append_pair("client_secret", &client_secret)
            .append_pair("grant_type", "client_credentials")
            .finish();

        let cred = request_token(ctx, &authority_host, &tenant_id, form, "client secret").await?;
        Ok(Some(cred))
    }
}
