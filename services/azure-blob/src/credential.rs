use probe_core::time::{now, DateTime};
use probe_core::utils::Redact;
use probe_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential enum for the ways a probe can authenticate against Blob Storage.
#[derive(Clone)]
pub enum Credential {
    /// SAS (Shared Access Signature) token authentication
    SasToken {
        /// SAS token, without the leading `?`.
        token: String,
    },
    /// Bearer token for OAuth authentication (managed identity, service principal, ...)
    BearerToken {
        /// Bearer token.
        token: String,
        /// Expiration time for this credential.
        expires_in: Option<DateTime>,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::SasToken { token } => f
                .debug_struct("Credential::SasToken")
                .field("token", &Redact::from(token))
                .finish(),
            Credential::BearerToken { token, expires_in } => f
                .debug_struct("Credential::BearerToken")
                .field("token", &Redact::from(token))
                .field("expires_in", expires_in)
                .finish(),
        }
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        match self {
            Credential::SasToken { token } => !token.is_empty(),
            Credential::BearerToken { token, expires_in } => {
                // Tokens within 20s of expiry count as expired.
                let margin = chrono::TimeDelta::seconds(20);
                !token.is_empty() && expires_in.map_or(true, |at| at > now() + margin)
            }
        }
    }
}

impl Credential {
    /// Create a new credential with SAS token authentication.
    pub fn with_sas_token(sas_token: &str) -> Self {
        Self::SasToken {
            token: sas_token.trim_start_matches('?').to_string(),
        }
    }

    /// Create a new credential with bearer token authentication.
    pub fn with_bearer_token(bearer_token: &str, expires_in: Option<DateTime>) -> Self {
        Self::BearerToken {
            token: bearer_token.to_string(),
            expires_in,
        }
    }
}
