//! Building blocks shared by the storage probe crates.
//!
//! A [`Context`] gives providers and clients their file, HTTP and env access.
//! [`ProvideCredential`] resolves an identity into a [`SigningCredential`],
//! and [`SignRequest`] attaches it to an outgoing request. Several providers
//! can be tried in order with [`ProvideCredentialChain`].
//!
//! ```no_run
//! use async_trait::async_trait;
//! use probe_core::{Context, ProvideCredential, Result, SigningCredential, StaticEnv};
//!
//! #[derive(Clone, Debug)]
//! struct Token(String);
//!
//! impl SigningCredential for Token {
//!     fn is_valid(&self) -> bool {
//!         !self.0.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct FromEnv;
//!
//! #[async_trait]
//! impl ProvideCredential for FromEnv {
//!     type Credential = Token;
//!
//!     async fn provide_credential(&self, ctx: &Context) -> Result<Option<Token>> {
//!         Ok(ctx.env_var_set("PROBE_TOKEN").map(Token))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_env(StaticEnv::from_pairs([("PROBE_TOKEN", "abc")]));
//! assert!(FromEnv.provide_credential(&ctx).await?.is_some());
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, FileRead, HttpSend, OsEnv, StaticEnv, Unconfigured};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};

mod chain;
pub use chain::ProvideCredentialChain;

mod request;
pub use request::{SigningMethod, SigningRequest};
