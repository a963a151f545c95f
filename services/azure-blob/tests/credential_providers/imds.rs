use probe_azure_blob::{Credential, ImdsCredentialProvider};
use probe_core::{Context, OsEnv, ProvideCredential, SigningCredential};
use probe_http_send_reqwest::ReqwestHttpSend;

fn is_test_enabled() -> bool {
    std::env::var("STORAGE_PROBE_TEST_IMDS").unwrap_or_default() == "on"
}

#[tokio::test]
async fn test_imds_provider() {
    if !is_test_enabled() {
        eprintln!("Skipping test: STORAGE_PROBE_TEST_IMDS is not enabled");
        return;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let cred = ImdsCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .expect("managed identity must answer")
        .expect("managed identity must return a token");

    assert!(cred.is_valid());
    assert!(matches!(cred, Credential::BearerToken { expires_in: Some(_), .. }));
}
