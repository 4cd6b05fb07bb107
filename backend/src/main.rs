//! Backend entry-point: loads settings, connects infrastructure, and serves
//! the discovery API.

mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use waypoint::inbound::http::health::HealthState;
use waypoint::outbound::cache::{RedisTtlCache, connect_redis_pool};
use waypoint::outbound::persistence::{DbPool, PoolConfig};
use waypoint::settings::AppSettings;

async fn connect_infrastructure(
    settings: AppSettings,
    bind_addr: SocketAddr,
) -> std::io::Result<ServerConfig> {
    let database_url = settings.database_url.clone();
    let redis_url = settings.redis_url.clone();
    let db_max_connections = settings.db_max_connections();
    let redis_max_connections = settings.redis_max_connections();
    let mut config = ServerConfig::new(bind_addr, settings);

    if let Some(url) = database_url {
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(db_max_connections))
            .await
            .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
        info!("connected to PostgreSQL");
        config = config.with_db_pool(pool);
    }

    if let Some(url) = redis_url {
        let pool = connect_redis_pool(&url, redis_max_connections)
            .await
            .map_err(|err| std::io::Error::other(format!("redis pool: {err}")))?;
        info!("using Redis for the shared cache");
        config = config.with_cache(Arc::new(RedisTtlCache::new(pool)));
    }

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load configuration: {err}")))?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|err| {
        std::io::Error::other(format!("invalid bind address {}: {err}", settings.bind_addr()))
    })?;

    let config = connect_infrastructure(settings, bind_addr).await?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
