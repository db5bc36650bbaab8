//! Config Cache - inspection tool
//!
//! Looks up the cached configuration for a profile and prints it.
//!
//! # Usage
//! `config-cache [profile]`, with the cache location taken from
//! `CONFIG_CACHE_DIR` (see `Config::from_env`).

use std::process::ExitCode;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config_cache::{CacheLookup, Config, ConfigCache, MissReason};

fn main() -> anyhow::Result<ExitCode> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "config_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let profile = std::env::args().nth(1).or_else(|| config.profile.clone());
    let cache = ConfigCache::from_config(&config);

    info!(
        "Configuration loaded: cache_dir={:?}, profile={:?}, prefix={}, extension={}",
        config.cache_dir, profile, config.prefix, config.extension
    );

    let lookup = cache
        .load(profile.as_deref())
        .context("failed to load configuration cache")?;

    match lookup {
        CacheLookup::Hit(cached) => {
            let rendered =
                serde_json::to_string_pretty(&cached).context("failed to render cached config")?;
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        CacheLookup::Miss(reason) => {
            let message = match reason {
                MissReason::NoBaseDirectory => "no cache directory configured (set CONFIG_CACHE_DIR)",
                MissReason::NotFound => "no cached configuration",
                MissReason::Expired => "cached configuration has expired",
            };
            eprintln!("miss: {}", message);
            Ok(ExitCode::from(1))
        }
    }
}
