use thiserror::Error;

/// Error returned by every fallible probe operation.
///
/// The [`ErrorKind`] tells callers what went wrong, the message says where,
/// and the optional source keeps the underlying error for logs.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// What went wrong.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No usable credential: missing, malformed or refused by the token endpoint.
    #[error("invalid credentials")]
    CredentialInvalid,
    /// Storage rejected the credential for this operation (401/403).
    #[error("credential access denied")]
    CredentialDenied,
    /// The container does not exist (404).
    #[error("container not found")]
    ContainerNotFound,
    /// The request could not be built or signed.
    #[error("invalid request")]
    RequestInvalid,
    /// Settings are missing or malformed.
    #[error("invalid configuration")]
    ConfigInvalid,
    /// Network, I/O and unclassified service failures.
    #[error("unexpected error")]
    Unexpected,
}

/// Result with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error of `kind`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// What went wrong.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether the identity itself is the problem rather than the target.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialInvalid | ErrorKind::CredentialDenied
        )
    }

    /// The message followed by every underlying cause, as `a: b: c`.
    ///
    /// A cause repeating the text before it is skipped.
    pub fn report(&self) -> String {
        let mut out = self.message.clone();
        let mut next = std::error::Error::source(self);
        while let Some(err) = next {
            let msg = err.to_string();
            if !out.ends_with(&msg) {
                out.push_str(": ");
                out.push_str(&msg);
            }
            next = err.source();
        }
        out
    }

    /// Shorthand for [`ErrorKind::CredentialInvalid`].
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Shorthand for [`ErrorKind::CredentialDenied`].
    pub fn credential_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialDenied, message)
    }

    /// Shorthand for [`ErrorKind::ContainerNotFound`].
    pub fn container_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContainerNotFound, message)
    }

    /// Shorthand for [`ErrorKind::RequestInvalid`].
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Shorthand for [`ErrorKind::ConfigInvalid`].
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Shorthand for [`ErrorKind::Unexpected`].
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

macro_rules! from_std_error {
    ($kind:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Self {
                    Self::new(ErrorKind::$kind, err.to_string()).with_source(err)
                }
            }
        )+
    };
}

from_std_error!(RequestInvalid:
    http::Error,
    http::header::InvalidHeaderValue,
    http::header::ToStrError,
    http::uri::InvalidUri,
    http::uri::InvalidUriParts,
);
from_std_error!(Unexpected: std::io::Error, std::string::FromUtf8Error);
