//! credkeep - a local credential manager.
//!
//! Registers users, verifies logins with a failed-attempt lockout, and
//! persists everything to a single JSON snapshot. Runs one interactive
//! console session at a time; no network, no daemon.

mod auth;
mod config;
mod store;
mod ui;

use std::io;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use auth::AuthService;
use config::Config;
use store::CredentialStore;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    info!("credkeep starting");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Could not read config file, using defaults");
            Config::default()
        }
    };
    config.policy.validate().context("invalid configuration")?;

    let users_path = config.users_path()?;
    let store = CredentialStore::new(users_path);
    let mut service =
        AuthService::open(store, config.policy.clone()).context("could not open the user store")?;

    if service.recovered_from_corruption() {
        println!("Warning: the user database could not be read and was reset.");
        println!("Previously registered users are gone.");
    }

    ui::run(&mut service)?;

    info!("credkeep shutting down");
    Ok(())
}
