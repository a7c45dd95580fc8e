use futures_util::StreamExt;
use std::{future::Future, io, net::SocketAddr, sync::Arc};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::error::HandlerError;
use crate::handler::ExchangeHandler;

/// Accepts WebSocket clients until `shutdown` resolves. Each connection runs in
/// its own task and processes its messages one at a time.
pub async fn serve<F>(listener: TcpListener, handler: Arc<ExchangeHandler>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, handler).await {
                        debug!(%peer, error = %e, "connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => {
                info!("shutdown requested, no longer accepting connections");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<ExchangeHandler>,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let ws = accept_async(stream).await?;
    info!(%peer, "client connected");

    let (mut write, mut read) = ws.split();
    while let Some(message) = read.next().await {
        match message? {
            Message::Text(text) => match handler.handle(text.as_str(), &mut write).await {
                Ok(()) => {}
                Err(HandlerError::Send(e)) => {
                    warn!(%peer, error = %e, "failed to deliver response");
                    break;
                }
                Err(e) => warn!(%peer, error = %e, "command failed"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!(%peer, "client disconnected");
    Ok(())
}
