use std::mem;
use std::time::Duration;

use http::request::Parts;
use http::uri::{Authority, Scheme};
use http::{HeaderMap, Method, Uri};

use crate::{Error, Result};

/// A request taken apart so a signer can edit its query and headers.
///
/// [`SigningRequest::build`] moves the headers out of the request and
/// decodes the query; [`SigningRequest::apply`] writes both back. Query
/// pairs are written back verbatim, so signers must encode them.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// Scheme, `https` when the uri has none.
    pub scheme: Scheme,
    /// Host and port.
    pub authority: Authority,
    /// Path without query.
    pub path: String,
    /// Decoded query pairs in request order.
    pub query: Vec<(String, String)>,
    /// Headers, moved out of the request.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Take `parts` apart. Requests without authority can't be signed.
    pub fn build(parts: &mut Parts) -> Result<Self> {
        let uri = &parts.uri;
        let authority = uri.authority().cloned().ok_or_else(|| {
            Error::request_invalid(format!("cannot sign {uri}: request has no authority"))
        })?;
        let query = uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme().cloned().unwrap_or(Scheme::HTTPS),
            authority,
            path: uri.path().to_string(),
            query,
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Write method, uri and headers back into `parts`.
    pub fn apply(self, parts: &mut Parts) -> Result<()> {
        let mut path_and_query = self.path;
        for (i, (k, v)) in self.query.iter().enumerate() {
            path_and_query.push(if i == 0 { '?' } else { '&' });
            path_and_query.push_str(k);
            if !v.is_empty() {
                path_and_query.push('=');
                path_and_query.push_str(v);
            }
        }

        parts.uri = Uri::builder()
            .scheme(self.scheme)
            .authority(self.authority)
            .path_and_query(path_and_query)
            .build()?;
        parts.method = self.method;
        parts.headers = self.headers;
        Ok(())
    }

    /// Add a pre-encoded query string such as a SAS token.
    pub fn query_append(&mut self, query: &str) {
        self.query.push((query.to_string(), String::new()));
    }
}

/// SigningMethod is the method that used in signing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with header.
    Header,
    /// Signing with query.
    Query(Duration),
}

impl SigningMethod {
    /// Pick the signing method from an optional expiry.
    pub fn from_expires_in(expires_in: Option<Duration>) -> Self {
        match expires_in {
            Some(d) => SigningMethod::Query(d),
            None => SigningMethod::Header,
        }
    }
}
