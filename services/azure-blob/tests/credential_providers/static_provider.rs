use probe_azure_blob::{Credential, StaticCredentialProvider};
use probe_core::{Context, ProvideCredential, SigningCredential};

#[tokio::test]
async fn test_static_bearer_token() {
    let cred = StaticCredentialProvider::new_bearer_token("static-token")
        .provide_credential(&Context::new())
        .await
        .unwrap()
        .unwrap();

    assert!(cred.is_valid());
    assert!(matches!(cred, Credential::BearerToken { .. }));
}

#[tokio::test]
async fn test_static_sas_token() {
    let cred = StaticCredentialProvider::new_sas_token("sv=2021-12-02&sig=x")
        .provide_credential(&Context::new())
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(cred, Credential::SasToken { .. }));
}
