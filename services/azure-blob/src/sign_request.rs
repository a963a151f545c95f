use std::time::Duration;

use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use percent_encoding::utf8_percent_encode;
use probe_core::time::{format_http_date, now, DateTime};
use probe_core::{Context, Error, Result, SignRequest, SigningMethod, SigningRequest};

use crate::constants::*;
use crate::Credential;

/// Attaches a resolved [`Credential`] to a Blob Storage request.
///
/// Bearer tokens travel in `Authorization` together with `x-ms-date`.
/// SAS tokens are appended to the query as-is. Presigning with an expiry
/// is only possible with a SAS token.
///
/// See [Authorize with Microsoft Entra ID](https://learn.microsoft.com/en-us/rest/api/storageservices/authorize-with-azure-active-directory).
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a signer that stamps requests with the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the `x-ms-date` value.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn authorize_bearer(&self, req: &mut SigningRequest, token: &str) -> Result<()> {
        let date = format_http_date(self.time.unwrap_or_else(now));
        req.headers.insert(X_MS_DATE, HeaderValue::try_from(date)?);

        let mut value = HeaderValue::try_from(format!("Bearer {token}"))?;
        value.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, value);
        Ok(())
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        parts: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| {
            Error::credential_invalid("no credential available to sign the request")
        })?;

        let mut req = SigningRequest::build(parts)?;
        // Values come back decoded and are written out verbatim.
        for (_, v) in req.query.iter_mut() {
            *v = utf8_percent_encode(v, &AZURE_QUERY_ENCODE_SET).to_string();
        }

        match (cred, SigningMethod::from_expires_in(expires_in)) {
            (Credential::SasToken { token }, _) => req.query_append(token),
            (Credential::BearerToken { token, .. }, SigningMethod::Header) => {
                self.authorize_bearer(&mut req, token)?
            }
            (Credential::BearerToken { .. }, SigningMethod::Query(_)) => {
                return Err(Error::request_invalid(
                    "bearer tokens cannot presign a query string",
                ));
            }
        }

        req.apply(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use http::Request;
    use pretty_assertions::assert_eq;
    use probe_core::ErrorKind;

    fn parts(uri: &str) -> Parts {
        Request::get(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_sas_token_goes_to_query() {
        let cred = Credential::with_sas_token(
            "sv=2021-12-02&ss=b&srt=co&sp=rl&se=2026-01-01T00:00:00Z&spr=https&sig=Zm9vYmFy%2Bx%3D",
        );
        let mut parts =
            parts("https://pitestdatasa.blob.core.windows.net/silver?restype=container&comp=list");

        RequestSigner::new()
            .sign_request(&Context::new(), &mut parts, Some(&cred), None)
            .await
            .unwrap();

        assert_eq!(
            parts.uri.to_string(),
            "https://pitestdatasa.blob.core.windows.net/silver?restype=container&comp=list&sv=2021-12-02&ss=b&srt=co&sp=rl&se=2026-01-01T00:00:00Z&spr=https&sig=Zm9vYmFy%2Bx%3D"
        );
        assert!(parts.headers.get(header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_bearer_token_goes_to_header() {
        let cred = Credential::with_bearer_token("token", None);
        let time = chrono::Utc
            .with_ymd_and_hms(2024, 5, 7, 9, 30, 0)
            .single()
            .unwrap();
        let uri = "https://pitestdatasa.blob.core.windows.net/silver?restype=container&comp=list&delimiter=%2F";
        let mut parts = parts(uri);

        RequestSigner::new()
            .with_time(time)
            .sign_request(&Context::new(), &mut parts, Some(&cred), None)
            .await
            .unwrap();

        let auth = &parts.headers[header::AUTHORIZATION];
        assert!(auth.is_sensitive());
        assert_eq!(auth, "Bearer token");
        assert_eq!(parts.headers[X_MS_DATE], "Tue, 07 May 2024 09:30:00 GMT");
        assert_eq!(parts.uri.to_string(), uri);
    }

    #[tokio::test]
    async fn test_bearer_token_cannot_presign() {
        let cred = Credential::with_bearer_token("token", None);
        let mut parts = parts("https://pitestdatasa.blob.core.windows.net/silver");

        let err = RequestSigner::new()
            .sign_request(
                &Context::new(),
                &mut parts,
                Some(&cred),
                Some(Duration::from_secs(60)),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let mut parts = parts("https://pitestdatasa.blob.core.windows.net/silver");

        let err = RequestSigner::new()
            .sign_request(&Context::new(), &mut parts, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }
}
