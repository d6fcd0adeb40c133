//! Static file server
//!
//! Serves the web build (`dist/` by default) over HTTP.

pub mod routes;

pub use routes::{content_type_for, create_routes, resolve_path, SiteRoot};

use crate::error::{Result, SpellError};
use crate::state::config::Config;
use axum::Router;
use log::info;
use std::path::PathBuf;
use tokio::net::TcpListener;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the site
    pub root: PathBuf,
    /// URL prefix the site is published under
    pub base: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            root: PathBuf::from("dist"),
            base: "/".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server_host(),
            port: config.server_port(),
            root: config.server_root(),
            base: config.server_base(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP server for the static site
pub struct StaticServer {
    config: ServerConfig,
}

impl StaticServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the router
    pub fn build_router(&self) -> Router {
        create_routes(SiteRoot::new(self.config.root.clone(), self.config.base.clone()))
    }

    /// Start the server, stopping when `shutdown_signal` completes
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!(
            "Starting static server on {} serving {:?}",
            addr, self.config.root
        );

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| SpellError::Server(format!("Failed to bind {}: {}", addr, e)))?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| SpellError::Server(format!("Server on {} failed: {}", addr, e)))?;

        Ok(())
    }
}
