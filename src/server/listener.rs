use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::Connection;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(addr = %cfg.server.listen_addr, "Listening");

    serve(listener, cfg).await
}

/// Accepts connections forever, one task per client.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    let files = Arc::new(cfg.static_file_server());
    let settings = cfg.connection_settings();
    info!(root = %files.root().display(), "Serving static files");

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "Accept failed");
                continue;
            }
        };
        tracing::debug!(%peer, "Accepted connection");

        let files = Arc::clone(&files);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, files, settings);
                if let Err(e) = conn.run().await {
                    tracing::error!(error = %e, "Connection error");
                }
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}
