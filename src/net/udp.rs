//! UDP socket with a per-datagram handler task.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::UdpSocket;

use crate::config::UdpKind;
use crate::servers::UdpServerOptions;

const MAX_DATAGRAM: usize = 64 * 1024;

/// Spawn the UDP receive loop. Fire-and-forget: bind errors are logged and
/// the listener never acknowledges.
pub(crate) fn spawn_udp(options: UdpServerOptions) {
    tokio::spawn(async move {
        let addr: SocketAddr = match options.kind {
            UdpKind::Udp4 => (Ipv4Addr::UNSPECIFIED, options.port).into(),
            UdpKind::Udp6 => (Ipv6Addr::UNSPECIFIED, options.port).into(),
        };
        let socket = match UdpSocket::bind(addr).await {
            Ok(socket) => Arc::new(socket),
            Err(error) => {
                tracing::error!(port = options.port, error = %error, "Failed to bind udp socket");
                return;
            }
        };
        tracing::info!(address = %addr, cluster = options.cluster, "UDP server listening");
        options.on_listening.listening();

        let mut buffer = vec![0u8; MAX_DATAGRAM];
        loop {
            match socket.recv_from(&mut buffer).await {
                Ok((length, peer)) => {
                    let datagram = buffer[..length].to_vec();
                    let handler = options.handler.clone();
                    let socket = socket.clone();
                    tokio::spawn(async move {
                        handler(datagram, peer, socket).await;
                    });
                }
                Err(error) => {
                    tracing::warn!(error = %error, "Failed to receive udp datagram");
                }
            }
        }
    });
}
