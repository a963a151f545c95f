use probe_azure_blob::{Credential, DefaultCredentialProvider};
use probe_core::{Context, OsEnv, ProvideCredential, StaticEnv};
use probe_file_read_tokio::TokioFileRead;
use probe_http_send_reqwest::ReqwestHttpSend;

#[tokio::test]
async fn test_default_provider_prefers_env_token() {
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(StaticEnv::from_pairs([
            ("AZURE_STORAGE_SAS_TOKEN", "sv=2021-12-02&sig=x"),
            ("IDENTITY_ENDPOINT", "http://127.0.0.1:9/msi/token"),
            ("IDENTITY_HEADER", "secret"),
        ]));

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .unwrap();

    assert!(matches!(cred, Some(Credential::SasToken { .. })));
}

#[tokio::test]
async fn test_default_provider_live() {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if std::env::var("STORAGE_PROBE_TEST").unwrap_or_default() != "on" {
        eprintln!("Skipping test: STORAGE_PROBE_TEST is not enabled");
        return;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .expect("default provider must not fail");

    assert!(cred.is_some(), "no credential found in the environment");
}
