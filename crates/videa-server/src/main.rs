mod api;
mod middleware;
mod recent;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::middleware::AuthClient;
use crate::recent::RecentIdeas;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = videa_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, "starting videa-server");

    let pool_config = videa_db::PoolConfig::from_app_config(&config);
    let pool = videa_db::connect_pool(&config.database_url, pool_config).await?;
    videa_db::run_migrations(&pool).await?;

    let youtube = Arc::new(videa_youtube::YoutubeClient::new(
        &config.youtube_api_key,
        config.youtube_request_timeout_secs,
    )?);
    let openai = Arc::new(videa_openai::OpenAiClient::new(
        &config.openai_api_key,
        &config.openai_model,
        config.openai_request_timeout_secs,
    )?);
    let trend_cache = Arc::new(videa_trends::TrendCache::default());
    let synthesizer = Arc::new(videa_ideas::IdeaSynthesizer::new(
        Arc::clone(&youtube),
        Arc::clone(&openai),
        Arc::clone(&trend_cache),
        config.openai_assistant_id.clone(),
    ));
    let auth = Arc::new(AuthClient::new(
        &config.auth_url,
        &config.auth_service_key,
        10,
    )?);

    let app = build_app(AppState {
        pool,
        youtube,
        synthesizer,
        trend_cache,
        recent_ideas: Arc::new(RecentIdeas::default()),
        auth,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
