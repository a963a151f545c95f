use bytes::Bytes;
use http::{Method, Request, StatusCode};
use log::debug;
use percent_encoding::utf8_percent_encode;
use probe_core::{Context, Error, Result, SignRequest};

use crate::constants::*;
use crate::listing::{BlobListing, StorageErrorBody};
use crate::{Credential, RequestSigner};

/// How a container is enumerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListStyle {
    /// Every blob in the container, regardless of virtual directories.
    #[default]
    Flat,
    /// Top level only, grouping deeper names into prefixes.
    Hierarchical {
        /// Delimiter separating virtual directories, usually `/`.
        delimiter: String,
    },
}

impl ListStyle {
    /// Hierarchical listing with `/` as delimiter.
    pub fn hierarchical() -> Self {
        ListStyle::Hierarchical {
            delimiter: "/".to_string(),
        }
    }
}

/// ContainerClient lists blobs of a single container with a resolved credential.
#[derive(Debug)]
pub struct ContainerClient {
    ctx: Context,
    endpoint: String,
    container: String,
    credential: Credential,
    signer: RequestSigner,
}

impl ContainerClient {
    /// Create a client for `container` under the blob service `endpoint`.
    ///
    /// Fails with `ConfigInvalid` when the container name is empty or the
    /// endpoint is not an absolute http(s) URL.
    pub fn new(
        ctx: Context,
        endpoint: &str,
        container: &str,
        credential: Credential,
    ) -> Result<Self> {
        let container = container.trim();
        if container.is_empty() {
            return Err(Error::config_invalid("container name must not be empty"));
        }

        let endpoint = endpoint.trim().trim_end_matches('/');
        let uri: http::Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid(format!("invalid blob endpoint: {endpoint}")).with_source(e)
        })?;
        if !matches!(uri.scheme_str(), Some("http" | "https")) || uri.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "blob endpoint must be an absolute http(s) url: {endpoint}"
            )));
        }

        Ok(Self {
            ctx,
            endpoint: endpoint.to_string(),
            container: container.to_string(),
            credential,
            signer: RequestSigner::new(),
        })
    }

    /// Name of the container this client targets.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// URL of the container without query.
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint,
            utf8_percent_encode(&self.container, &AZURE_QUERY_ENCODE_SET)
        )
    }

    /// List the first page of blobs in the container.
    ///
    /// Status mapping:
    ///
    /// - `401`, `403` => `CredentialDenied`
    /// - `404` => `ContainerNotFound`
    /// - other non-2xx => `Unexpected`
    pub async fn list_blobs(&self, style: &ListStyle) -> Result<BlobListing> {
        let mut url = format!("{}?restype=container&comp=list", self.url());
        if let ListStyle::Hierarchical { delimiter } = style {
            url.push_str("&delimiter=");
            url.push_str(&utf8_percent_encode(delimiter, &AZURE_QUERY_ENCODE_SET).to_string());
        }

        let req = Request::builder()
            .method(Method::GET)
            .uri(&url)
            .header(X_MS_VERSION, AZURE_STORAGE_VERSION)
            .body(Bytes::new())?;
        let (mut parts, body) = req.into_parts();
        self.signer
            .sign_request(&self.ctx, &mut parts, Some(&self.credential), None)
            .await?;
        let req = Request::from_parts(parts, body);

        let resp = self.ctx.http_send_as_string(req).await?;
        let status = resp.status();
        let error_code = resp
            .headers()
            .get(X_MS_ERROR_CODE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.into_body();
        debug!("list blobs in {} responded {status}", self.container);

        if status.is_success() {
            return BlobListing::from_xml(&body);
        }

        let code = error_code
            .or_else(|| StorageErrorBody::from_xml(&body).map(|e| e.code))
            .unwrap_or_else(|| "Unknown".to_string());
        let message = format!(
            "list blobs in container {} failed with {status} ({code})",
            self.container
        );

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::credential_denied(message),
            StatusCode::NOT_FOUND => Error::container_not_found(message),
            _ => Error::unexpected(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use probe_core::{ErrorKind, HttpSend};
    use std::sync::{Arc, Mutex};
    use test_case::test_case;

    #[derive(Debug, Clone)]
    struct MockHttpSend {
        status: StatusCode,
        headers: Vec<(&'static str, &'static str)>,
        body: &'static str,
        seen: Arc<Mutex<Vec<http::Request<Bytes>>>>,
    }

    impl MockHttpSend {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                headers: vec![],
                body,
                seen: Arc::default(),
            }
        }

        fn with_header(mut self, key: &'static str, value: &'static str) -> Self {
            self.headers.push((key, value));
            self
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.seen.lock().unwrap().push(req);
            let mut builder = http::Response::builder().status(self.status);
            for (k, v) in &self.headers {
                builder = builder.header(*k, *v);
            }
            Ok(builder.body(Bytes::from_static(self.body.as_bytes()))?)
        }
    }

    const LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?><EnumerationResults ContainerName="silver"><Blobs><Blob><Name>a.csv</Name><Properties><Content-Length>3</Content-Length></Properties></Blob></Blobs><NextMarker /></EnumerationResults>"#;

    fn client(http: MockHttpSend) -> ContainerClient {
        let ctx = Context::new().with_http_send(http);
        ContainerClient::new(
            ctx,
            "https://pitestdatasa.blob.core.windows.net/",
            "silver",
            Credential::with_bearer_token("token", None),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_container() {
        let err = ContainerClient::new(
            Context::new(),
            "https://pitestdatasa.blob.core.windows.net",
            "  ",
            Credential::with_sas_token("sig=x"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_rejects_relative_endpoint() {
        let err = ContainerClient::new(
            Context::new(),
            "pitestdatasa",
            "silver",
            Credential::with_sas_token("sig=x"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_list_blobs_flat() {
        let http = MockHttpSend::new(StatusCode::OK, LISTING);
        let seen = http.seen.clone();

        let listing = client(http).list_blobs(&ListStyle::Flat).await.unwrap();
        assert_eq!(listing.len(), 1);

        let seen = seen.lock().unwrap();
        let req = &seen[0];
        assert_eq!(req.method(), Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "https://pitestdatasa.blob.core.windows.net/silver?restype=container&comp=list"
        );
        assert_eq!(req.headers()[X_MS_VERSION], AZURE_STORAGE_VERSION);
        assert_eq!(req.headers()[http::header::AUTHORIZATION], "Bearer token");
    }

    #[tokio::test]
    async fn test_list_blobs_hierarchical() {
        let http = MockHttpSend::new(StatusCode::OK, LISTING);
        let seen = http.seen.clone();

        client(http)
            .list_blobs(&ListStyle::hierarchical())
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].uri().to_string(),
            "https://pitestdatasa.blob.core.windows.net/silver?restype=container&comp=list&delimiter=%2F"
        );
    }

    const NOT_FOUND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?><Error><Code>ContainerNotFound</Code><Message>The specified container does not exist.</Message></Error>"#;

    #[test_case(StatusCode::FORBIDDEN, Some("AuthorizationPermissionMismatch"), "", ErrorKind::CredentialDenied, "AuthorizationPermissionMismatch"; "forbidden")]
    #[test_case(StatusCode::UNAUTHORIZED, Some("InvalidAuthenticationInfo"), "", ErrorKind::CredentialDenied, "InvalidAuthenticationInfo"; "unauthorized")]
    #[test_case(StatusCode::NOT_FOUND, None, NOT_FOUND_BODY, ErrorKind::ContainerNotFound, "ContainerNotFound"; "not found from body")]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE, None, "", ErrorKind::Unexpected, "Unknown"; "server busy")]
    #[tokio::test]
    async fn test_status_mapping(
        status: StatusCode,
        error_code: Option<&'static str>,
        body: &'static str,
        kind: ErrorKind,
        code: &str,
    ) {
        let mut http = MockHttpSend::new(status, body);
        if let Some(error_code) = error_code {
            http = http.with_header(X_MS_ERROR_CODE, error_code);
        }

        let err = client(http).list_blobs(&ListStyle::Flat).await.unwrap_err();
        assert_eq!(err.kind(), kind);
        assert!(err.to_string().contains(code), "{err}");
    }
}
