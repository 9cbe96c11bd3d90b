use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use crate::api::routes;
use crate::config::Settings;
use crate::core::PipelineQueue;
use crate::db::Database;

/// Starts and runs the HTTP server using the Axum web framework.
/// Blocks until the listener shuts down.
pub async fn launch_server(
    settings: Arc<Settings>,
    database: Database,
    queue: PipelineQueue,
) -> Result<(), Box<dyn std::error::Error>> {
    let host: IpAddr = settings
        .app_host
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let addr = SocketAddr::from((host, settings.app_port));

    let app = routes::app(database, queue, settings);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
