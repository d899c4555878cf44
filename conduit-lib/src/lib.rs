use serde::{Deserialize, Serialize};

/// Archive location used when nothing else is configured, relative to the working directory.
pub const DEFAULT_ARCHIVE: &str = ".conduit/upload.zip";
/// Deployment endpoint receiving the packaged project.
pub const DEFAULT_UPLOAD_URL: &str = "https://localhost:7344/upload";
/// Root of the deployment host, used by the status check.
pub const DEFAULT_CHECK_URL: &str = "https://localhost:7344/";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub config: Option<String>,
    pub root: Option<String>,
    pub archive: Option<String>,
    pub upload_url: Option<String>,
    pub check_url: Option<String>,
    pub skip: Option<Vec<String>>,
    pub compress: Option<bool>,
    pub dry: Option<bool>,
    pub log_level: Option<String>,
}

impl Config {
    /// Merge configs by priority: env < file < cli
    pub fn merge(env: Config, file: Config, cli: Config) -> Config {
        fn pick<T>(env: Option<T>, file: Option<T>, cli: Option<T>) -> Option<T> {
            cli.or(file).or(env)
        }

        Config {
            config: pick(env.config, file.config, cli.config),
            root: pick(env.root, file.root, cli.root),
            archive: pick(env.archive, file.archive, cli.archive),
            upload_url: pick(env.upload_url, file.upload_url, cli.upload_url),
            check_url: pick(env.check_url, file.check_url, cli.check_url),
            skip: pick(env.skip, file.skip, cli.skip),
            compress: pick(env.compress, file.compress, cli.compress),
            dry: pick(env.dry, file.dry, cli.dry),
            log_level: pick(env.log_level, file.log_level, cli.log_level),
        }
    }

    /// Fill every unset field that has a well-known default.
    pub fn with_defaults(mut self) -> Config {
        self.archive.get_or_insert_with(|| DEFAULT_ARCHIVE.to_string());
        self.upload_url
            .get_or_insert_with(|| DEFAULT_UPLOAD_URL.to_string());
        self.check_url.get_or_insert_with(|| DEFAULT_CHECK_URL.to_string());
        self.compress.get_or_insert(false);
        self.dry.get_or_insert(false);
        self.log_level
            .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
        self
    }

    pub fn archive(&self) -> &str {
        self.archive.as_deref().unwrap_or(DEFAULT_ARCHIVE)
    }

    pub fn upload_url(&self) -> &str {
        self.upload_url.as_deref().unwrap_or(DEFAULT_UPLOAD_URL)
    }

    pub fn check_url(&self) -> &str {
        self.check_url.as_deref().unwrap_or(DEFAULT_CHECK_URL)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn skip_patterns(&self) -> &[String] {
        self.skip.as_deref().unwrap_or_default()
    }

    pub fn is_compressed(&self) -> bool {
        self.compress.unwrap_or(false)
    }

    pub fn is_dry(&self) -> bool {
        self.dry.unwrap_or(false)
    }
}
