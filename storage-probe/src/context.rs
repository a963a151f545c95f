use std::time::Duration;

use probe_core::{Context, OsEnv, Result};
use probe_file_read_tokio::TokioFileRead;
use probe_http_send_reqwest::ReqwestHttpSend;

/// Create a context backed by the OS environment, `tokio::fs` and a
/// `reqwest` client whose requests give up after `timeout`.
pub fn default_context(timeout: Duration) -> Result<Context> {
    Ok(Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::with_timeout(timeout)?)
        .with_env(OsEnv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_reads_os_env() {
        let ctx = default_context(Duration::from_secs(1)).unwrap();

        assert_eq!(
            ctx.env_var("PATH"),
            std::env::var("PATH").ok(),
            "context must see the process environment"
        );
    }
}
