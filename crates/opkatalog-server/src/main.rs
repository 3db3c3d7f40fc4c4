use std::env;
use std::sync::Arc;

use opkatalog_db_postgres::PostgresOperationStore;
use opkatalog_server::config::loader::load_config;
use opkatalog_server::{AppState, ServerBuilder};

#[tokio::main]
async fn main() {
    // Load .env if present, before anything reads the environment.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    let config_path = resolve_config_path();
    let cfg = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    opkatalog_server::observability::init_tracing(&cfg.logging.level);

    let state = match cfg.storage.postgres {
        Some(ref pg) => match PostgresOperationStore::new(pg) {
            Ok(store) => {
                // Create-if-missing only; a down database is reported per
                // request, never fatal at startup.
                if let Err(e) = store.init_schema().await {
                    tracing::warn!(error = %e, "Schema initialization failed, continuing");
                }
                AppState::with_storage(Arc::new(store))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Storage initialization failed");
                AppState::unconfigured(e.to_string())
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not configured, data endpoints will answer 503");
            AppState::unconfigured("DATABASE_URL not configured")
        }
    };

    let server = ServerBuilder::new(state).with_config(&cfg).build();
    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
        std::process::exit(1);
    }
}

/// Resolves the configuration file path from `--config` or
/// `OPKATALOG_CONFIG`; `None` falls back to `opkatalog.toml`.
fn resolve_config_path() -> Option<String> {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config"
            && let Some(path) = args.next()
        {
            return Some(path);
        }
    }

    env::var("OPKATALOG_CONFIG").ok().filter(|p| !p.is_empty())
}
