//! sitefollow - make every user in an Azure AD tenant follow one SharePoint site.
//!
//! Signs in with the client-credentials grant, lists all users through
//! Microsoft Graph and adds the configured site to each user's followed sites.

#![deny(clippy::all)]

mod auth;
mod config;
mod error;
mod follow;
mod graph;
mod secure;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::AppError;

fn main() {
    // Load .env file (if present) before anything else
    if let Err(e) = dotenvy::dotenv() {
        // .env file is optional - only warn if it exists but could not be read
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            let err = AppError::Config(format!("{:#}", e));
            eprintln!("{}", err);
            eprintln!("{}", err.user_message());
            eprintln!("\nPlease set the following environment variables:");
            eprintln!("  AZURE_TENANT_ID=<your-tenant-id>");
            eprintln!("  AZURE_CLIENT_ID=<your-application-id>");
            eprintln!("  AZURE_CLIENT_SECRET=<your-application-secret>");
            eprintln!("  SHAREPOINT_SITE_ID=<site-id-to-follow>");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging.level);

    info!("Starting sitefollow v{}", env!("CARGO_PKG_VERSION"));

    // Single-threaded runtime: every call completes before the next one starts
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = runtime.block_on(follow::run(&config, &mut stdout)) {
        error!("Run aborted: {:#}", e);
        if let Some(app_err) = e.downcast_ref::<AppError>() {
            eprintln!("{}", app_err.user_message());
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
///
/// Logs go to stderr; stdout carries only the progress report.
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
