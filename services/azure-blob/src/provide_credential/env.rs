use async_trait::async_trait;
use probe_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::credential::Credential;

/// Load a ready-made token from env.
///
/// - [`AZURE_STORAGE_SAS_TOKEN`] yields a SAS credential.
/// - [`AZURE_STORAGE_BEARER_TOKEN`] yields a bearer credential without expiry.
///
/// SAS tokens win when both are set.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new env credential provider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let Some(sas_token) = ctx.env_var_set(AZURE_STORAGE_SAS_TOKEN) {
            return Ok(Some(Credential::with_sas_token(&sas_token)));
        }

        if let Some(bearer_token) = ctx.env_var_set(AZURE_STORAGE_BEARER_TOKEN) {
            return Ok(Some(Credential::with_bearer_token(&bearer_token, None)));
        }

        Ok(None)
    }
}
