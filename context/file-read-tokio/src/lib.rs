//! Tokio-based file reading for storage-probe.
//!
//! `TokioFileRead` implements the `FileRead` trait from `probe_core` using
//! Tokio's file system operations. Credential providers use it to read
//! federated identity tokens projected onto disk.
//!
//! ## Example
//!
//! ```no_run
//! use probe_core::Context;
//! use probe_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> probe_core::Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead);
//! let token = ctx.file_read_as_string("/var/run/secrets/azure/tokens/azure-identity-token").await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use probe_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read file: {path}")).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_core::Context;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"federated-token").unwrap();

        let ctx = Context::new().with_file_read(TokioFileRead);
        let path = file.path().to_string_lossy().to_string();

        assert_eq!(ctx.file_read_as_string(&path).await.unwrap(), "federated-token");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let ctx = Context::new().with_file_read(TokioFileRead);

        let err = ctx
            .file_read("/definitely/not/here/token")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), probe_core::ErrorKind::Unexpected);
    }
}
