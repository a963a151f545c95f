use async_trait::async_trait;
use probe_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::provide_credential::oauth2::request_token;
use crate::Credential;

/// Load credential from Azure Workload Identity.
///
/// Exchanges the federated token projected at [`AZURE_FEDERATED_TOKEN_FILE`]
/// for a storage token, using [`AZURE_TENANT_ID`] and [`AZURE_CLIENT_ID`].
///
/// Reference: <https://learn.microsoft.com/en-us/azure/aks/workload-identity-overview>
#[derive(Debug, Default, Clone)]
pub struct WorkloadIdentityCredentialProvider {
    tenant_id: Option<String>,
}

impl WorkloadIdentityCredentialProvider {
    /// Create a new workload identity provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant ID.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for WorkloadIdentityCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(tenant_id) = self
            .tenant_id
            .clone()
            .or_else(|| ctx.env_var(AZURE_TENANT_ID))
            .filter(|v| !v.is_empty())
        else {
            return Ok(None);
        };
        let Some(client_id) = ctx.env_var_set(AZURE_CLIENT_ID) else {
            return Ok(None);
        };
        let Some(token_file) = ctx.env_var_set(AZURE_FEDERATED_TOKEN_FILE) else {
            return Ok(None);
        };

        // A missing token file means this host has no projected identity.
        let federated_token = match ctx.file_read_as_string(&token_file).await {
            Ok(content) => content,
            Err(e) => {
                log::debug!("federated token file {token_file} is not readable: {e}");
                return Ok(None);
            }
        };
        if federated_token.trim().is_empty() {
            return Ok(None);
        }

        let authority_host = ctx
            .env_var_set(AZURE_AUTHORITY_HOST)
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());

        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("scope", STORAGE_SCOPE)
            .append_pair("client_id", &client_id)
            .append_pair(
                "client_assertion_type",
                "urn:ietf:params:oauth:client-assertion-type:jwt-bearer",
            )
            .append_pair("client_assertion", federated_token.trim())
            .append_pair("grant_type", "client_credentials")
            .finish();

        let cred =
            request_token(ctx, &authority_host, &tenant_id, form, "workload identity").await?;
        Ok(Some(cred))
    }
}
