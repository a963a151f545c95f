use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Context is the only door a probe has to the outside world.
///
/// Credential providers read token files, call token endpoints and look up
/// env vars through it, and the storage client sends its requests through
/// it. Tests swap any of the three for an in-memory version.
///
/// A fresh context is [`Unconfigured`]: file reads and HTTP calls fail and
/// the environment is empty.
///
/// ```
/// use probe_core::{Context, OsEnv};
///
/// let ctx = Context::new().with_env(OsEnv);
/// assert!(ctx.env_var("STORAGE_PROBE_SURELY_UNSET").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    files: Arc<dyn FileRead>,
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a context with nothing configured.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Unconfigured),
            http: Arc::new(Unconfigured),
            env: Arc::new(Unconfigured),
        }
    }

    /// Use `files` to read token files.
    pub fn with_file_read(mut self, files: impl FileRead) -> Self {
        self.files = Arc::new(files);
        self
    }

    /// Use `http` for token endpoints and storage calls.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Use `env` to look up settings.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Read a whole file.
    #[inline]
    pub async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        self.files.file_read(path).await
    }

    /// Read a whole file as text, replacing invalid utf-8.
    pub async fn file_read_as_string(&self, path: &str) -> Result<String> {
        let content = self.file_read(path).await?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    /// Send a request and buffer the response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Send a request and decode the response body as text.
    pub async fn http_send_as_string(
        &self,
        req: http::Request<Bytes>,
    ) -> Result<http::Response<String>> {
        let resp = self.http_send(req).await?;
        Ok(resp.map(|body| String::from_utf8_lossy(&body).into_owned()))
    }

    /// Value of an env var, `None` if unset or not utf-8.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Value of an env var, treating blank values as unset.
    ///
    /// Functions app settings are often left empty rather than removed.
    pub fn env_var_set(&self, key: &str) -> Option<String> {
        self.env_var(key).filter(|v| !v.trim().is_empty())
    }

    /// Every env var visible to this context.
    #[inline]
    pub fn env_vars(&self) -> HashMap<String, String> {
        self.env.vars()
    }
}

/// Reads token files from disk.
#[async_trait::async_trait]
pub trait FileRead: Debug + Send + Sync + 'static {
    /// Read the whole file at `path`.
    async fn file_read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Sends buffered HTTP requests.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send `req` and wait for the whole response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Source of env vars.
pub trait Env: Debug + Send + Sync + 'static {
    /// Value of `key`, `None` if unset or not utf-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Every variable with a utf-8 name and value.
    fn vars(&self) -> HashMap<String, String>;
}

/// The environment of the current process.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn vars(&self) -> HashMap<String, String> {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// A fixed set of env vars, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// Variables by name.
    pub envs: HashMap<String, String>,
}

impl StaticEnv {
    /// Build from `(name, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let envs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { envs }
    }
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn vars(&self) -> HashMap<String, String> {
        self.envs.clone()
    }
}

/// Stand-in for every component a [`Context`] was not given.
///
/// File reads and HTTP calls fail with [`crate::ErrorKind::Unexpected`];
/// the environment is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait::async_trait]
impl FileRead for Unconfigured {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        Err(Error::unexpected(format!(
            "cannot read {path}: context has no file reader"
        )))
    }
}

#[async_trait::async_trait]
impl HttpSend for Unconfigured {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(format!(
            "cannot send {} {}: context has no http client",
            req.method(),
            req.uri()
        )))
    }
}

impl Env for Unconfigured {
    fn var(&self, _: &str) -> Option<String> {
        None
    }

    fn vars(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}
