//! TSDB server entry point: load configuration, initialize tracing,
//! build the shared series registry, and accept connections until
//! Ctrl-C.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tsdb_server::{build_registry, serve, ServerConfig};

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    // The non-blocking file appender's guard must outlive every log
    // call, so it is held in `main` for the life of the process rather
    // than dropped at the end of an init function.
    let _file_guard = init_tracing(config.log_dir.as_deref());

    tracing::info!(
        host = %config.host,
        port = config.port,
        max_line_bytes = config.max_line_bytes,
        persistence = config.persistence_path.as_deref().unwrap_or("disabled"),
        worker_threads = ?config.worker_threads,
        "starting tsdb-server"
    );

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = config.worker_threads {
        builder.worker_threads(n);
    }
    let runtime = builder.build()?;

    runtime.block_on(async {
        let registry = Arc::new(build_registry(&config).await?);
        serve(config, registry, shutdown_signal()).await
    })?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tsdb_server=info,tsdb_network=info".into());

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "tsdb-server.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
