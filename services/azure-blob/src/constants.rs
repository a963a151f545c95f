// Headers used in azure services.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_ERROR_CODE: &str = "x-ms-error-code";

/// Storage service version sent with every data plane request.
pub const AZURE_STORAGE_VERSION: &str = "2021-12-02";

/// Resource (v1) and scope (v2) requested for storage tokens.
pub const STORAGE_RESOURCE: &str = "https://storage.azure.com/";
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
pub const DEFAULT_IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

// Env values used in azure services.

/// Account name bound by identity-based Functions connections.
pub const FUNCTIONS_STORAGE_ACCOUNT_NAME: &str = "AzureWebJobsStorage__accountName";
/// Blob endpoint of the `IdConn` identity-based connection.
pub const FUNCTIONS_BLOB_SERVICE_URI: &str = "IdConn__blobServiceUri";
pub const AZURE_STORAGE_ACCOUNT_NAME: &str = "AZURE_STORAGE_ACCOUNT_NAME";
pub const AZURE_STORAGE_BLOB_ENDPOINT: &str = "AZURE_STORAGE_BLOB_ENDPOINT";
pub const AZURE_STORAGE_ENDPOINT_SUFFIX: &str = "AZURE_STORAGE_ENDPOINT_SUFFIX";
pub const AZURE_STORAGE_SAS_TOKEN: &str = "AZURE_STORAGE_SAS_TOKEN";
pub const AZURE_STORAGE_BEARER_TOKEN: &str = "AZURE_STORAGE_BEARER_TOKEN";

pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
pub const AZURE_FEDERATED_TOKEN_FILE: &str = "AZURE_FEDERATED_TOKEN_FILE";

/// Managed identity endpoint injected by App Service and Azure Functions.
pub const IDENTITY_ENDPOINT: &str = "IDENTITY_ENDPOINT";
pub const IDENTITY_HEADER: &str = "IDENTITY_HEADER";
pub const AZURE_IMDS_ENDPOINT: &str = "AZURE_IMDS_ENDPOINT";

// Query encode set for azure storage.
pub static AZURE_QUERY_ENCODE_SET: percent_encoding::AsciiSet = percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
