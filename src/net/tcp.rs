//! TCP listener with a per-connection handler task.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::servers::{TcpServerOptions, TcpSocketOptions};

/// Spawn the TCP listener. Fire-and-forget: bind errors are logged and the
/// listener never acknowledges.
///
/// The socket options mirror the wire contract; tokio streams are half-open
/// tolerant and unread by default, so both flags are carried for the
/// handler's information rather than translated into socket calls.
pub(crate) fn spawn_tcp(options: TcpServerOptions, socket_options: TcpSocketOptions) {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], options.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(error) => {
                tracing::error!(port = options.port, error = %error, "Failed to bind tcp listener");
                return;
            }
        };
        tracing::info!(
            address = %addr,
            cluster = options.cluster,
            allow_half_open = socket_options.allow_half_open,
            pause_on_connect = socket_options.pause_on_connect,
            "TCP server listening"
        );
        options.on_listening.listening();

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let handler = options.handler.clone();
                    tokio::spawn(async move {
                        handler(stream, peer).await;
                    });
                }
                Err(error) => {
                    tracing::warn!(error = %error, "Failed to accept tcp connection");
                }
            }
        }
    });
}
