use async_trait::async_trait;
use probe_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

use crate::provide_credential::{
    ClientSecretCredentialProvider, EnvCredentialProvider, ImdsCredentialProvider,
    WorkloadIdentityCredentialProvider,
};
use crate::Credential;

/// Default provider that tries multiple ambient credential sources in order.
///
/// 1. Env (`AZURE_STORAGE_SAS_TOKEN`, `AZURE_STORAGE_BEARER_TOKEN`)
/// 2. Client secret (service principal)
/// 3. Workload identity (federated credentials)
/// 4. Managed identity (App Service / Functions endpoint or VM IMDS)
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(ClientSecretCredentialProvider::new())
            .push(WorkloadIdentityCredentialProvider::new())
            .push(ImdsCredentialProvider::new());

        Self { chain }
    }
}

impl DefaultCredentialProvider {
    /// Create a new default provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chain, for hosts that need a custom order.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use bytes::Bytes;
    use probe_core::{Error, HttpSend, StaticEnv};

    #[derive(Debug)]
    struct UnreachableHttpSend;

    #[async_trait]
    impl HttpSend for UnreachableHttpSend {
        async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            Err(Error::unexpected("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_env_token_comes_first() {
        let ctx = Context::new()
            .with_http_send(UnreachableHttpSend)
            .with_env(StaticEnv::from_pairs([
                (AZURE_STORAGE_SAS_TOKEN, "sv=2021-12-02&sig=abc"),
                (IDENTITY_ENDPOINT, "http://127.0.0.1:41741/msi/token"),
                (IDENTITY_HEADER, "secret"),
            ]));

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();

        assert!(matches!(cred, Some(Credential::SasToken { .. })));
    }

    #[tokio::test]
    async fn test_no_source_yields_none() {
        let _ = env_logger::builder().is_test(true).try_init();

        // Managed identity is always attempted; a refused connection is skipped.
        let ctx = Context::new()
            .with_http_send(UnreachableHttpSend)
            .with_env(StaticEnv::default());

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();

        assert!(cred.is_none());
    }
}
