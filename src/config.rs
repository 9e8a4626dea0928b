use anyhow::{Context, Result, ensure};
use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::services::gcs::DEFAULT_ENDPOINT;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub bucket: String,
    pub prefix: String,
    pub credentials_file: Option<PathBuf>,
    pub storage_endpoint: String,
    pub public_url: String,
    pub request_timeout: Duration,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Paginated listing API for a Cloud Storage bucket")]
pub struct Args {
    /// Host to bind to
    #[arg(long, env = "LISTER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(long, env = "LISTER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Bucket whose objects are listed
    #[arg(long, env = "LISTER_BUCKET")]
    pub bucket: String,

    /// Only list objects whose names start with this prefix
    #[arg(long, env = "LISTER_PREFIX", default_value = "")]
    pub prefix: String,

    /// Service-account key file; requests are anonymous when unset
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials_file: Option<PathBuf>,

    /// Storage API base URL (point at an emulator for local runs)
    #[arg(long, env = "LISTER_STORAGE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub storage_endpoint: String,

    /// Scheme and authority used in next/prev links (defaults to http://localhost:{port})
    #[arg(long, env = "LISTER_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Timeout for each storage API call, in seconds
    #[arg(long, env = "LISTER_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let bucket = args.bucket.trim().to_string();
        ensure!(!bucket.is_empty(), "bucket name must not be empty");
        ensure!(
            args.request_timeout_secs > 0,
            "request timeout must be at least one second"
        );

        url::Url::parse(&args.storage_endpoint)
            .with_context(|| format!("parsing storage endpoint `{}`", args.storage_endpoint))?;

        let public_url = match args.public_url {
            Some(url) => {
                url::Url::parse(&url).with_context(|| format!("parsing public url `{url}`"))?;
                url.trim_end_matches('/').to_string()
            }
            None => format!("http://localhost:{}", args.port),
        };

        Ok(Self {
            host: args.host,
            port: args.port,
            bucket,
            prefix: args.prefix,
            credentials_file: args.credentials_file,
            storage_endpoint: args.storage_endpoint,
            public_url,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
