use std::path::PathBuf;

use anyhow::{Context, Result};

/// Request bodies above this size are rejected, uploads included.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Served at `/uploads`; doubles as the object store when no bucket is configured.
    pub upload_dir: PathBuf,
    pub aws_bucket_name: Option<String>,
    pub aws_region: String,
    pub upload_public_url: Option<String>,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(port) => port.parse().context("PORT must be a number")?,
                Err(_) => 5000,
            },
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            aws_bucket_name: non_empty_var("AWS_BUCKET_NAME"),
            aws_region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            upload_public_url: non_empty_var("UPLOAD_PUBLIC_URL"),
            max_body_bytes: match std::env::var("MAX_BODY_BYTES") {
                Ok(limit) => limit.parse().context("MAX_BODY_BYTES must be a number")?,
                Err(_) => DEFAULT_MAX_BODY_BYTES,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
