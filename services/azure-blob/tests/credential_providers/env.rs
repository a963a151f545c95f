use probe_azure_blob::{Credential, EnvCredentialProvider};
use probe_core::{Context, ProvideCredential, StaticEnv};

#[tokio::test]
async fn test_env_provider_sas_token() {
    let ctx = Context::new().with_env(StaticEnv::from_pairs([(
        "AZURE_STORAGE_SAS_TOKEN",
        "?sv=2021-12-02&ss=b&sp=rl&sig=abc%3D",
    )]));

    let cred = EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .unwrap()
        .expect("sas token must be loaded");

    match cred {
        Credential::SasToken { token } => assert_eq!(token, "sv=2021-12-02&ss=b&sp=rl&sig=abc%3D"),
        other => panic!("expected SAS token, got {other:?}"),
    }
}

#[tokio::test]
async fn test_env_provider_bearer_token() {
    let ctx = Context::new().with_env(StaticEnv::from_pairs([
        ("AZURE_STORAGE_SAS_TOKEN", ""),
        ("AZURE_STORAGE_BEARER_TOKEN", "eyJ0eXAiOiJKV1QiLCJhbGciOi"),
    ]));

    let cred = EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .unwrap();

    assert!(matches!(cred, Some(Credential::BearerToken { .. })));
}

#[tokio::test]
async fn test_env_provider_nothing_set() {
    let ctx = Context::new().with_env(StaticEnv::default());

    let cred = EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .unwrap();

    assert!(cred.is_none());
}
