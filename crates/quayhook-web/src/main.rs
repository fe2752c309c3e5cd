mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use quayhook_core::{
    ConfigLoader,
    CoreContext,
};

use crate::state::AppState;

struct ServerSettings {
    config_path: PathBuf,
    port_override: Option<String>,
}

impl ServerSettings {
    fn from_env() -> Self {
        let explicit = std::env::args_os().nth(1).map(PathBuf::from);

        Self {
            config_path: ConfigLoader::resolve_config_path(explicit),
            port_override: std::env::var("PORT").ok().filter(|p| !p.is_empty()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    quayhook_core::logging::init();

    let settings = ServerSettings::from_env();

    let config = ConfigLoader::load(&settings.config_path).with_context(|| {
        format!(
            "Failed to load config from {}",
            settings.config_path.display()
        )
    })?;

    let validation = config.validate();
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    if !validation.is_ok() {
        for error in &validation.errors {
            tracing::error!("{}", error);
        }
        anyhow::bail!("Invalid configuration: {}", validation.summary());
    }

    tracing::info!("Config loaded: {}", settings.config_path.display());

    let bind_addr: SocketAddr = config
        .server
        .socket_addr_with_port(settings.port_override.as_deref())
        .context("Invalid bind address")?;

    let core = CoreContext::new(config).context("Failed to initialize dispatcher")?;
    let app = routes::router(AppState::new(&core));

    tracing::info!("Listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
