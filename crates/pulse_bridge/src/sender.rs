//! Fire-and-forget UDP sender.
//!
//! One outbound socket, bound once at construction, one destination for
//! its whole lifetime. Send errors are logged and swallowed — loss of a
//! single update is acceptable because the next tick supersedes it.

use crate::wire;
use anyhow::{anyhow, Context, Result};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Sends intensity values to the actuator bridge as single datagrams.
pub struct PulseSender {
    socket: Option<UdpSocket>,
    dest: SocketAddr,
}

impl PulseSender {
    /// Bind an outbound socket and resolve the destination once.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let dest = (host, port)
            .to_socket_addrs()
            .with_context(|| format!("failed to resolve bridge address {}:{}", host, port))?
            .next()
            .ok_or_else(|| anyhow!("no address found for {}:{}", host, port))?;

        let socket = UdpSocket::bind("0.0.0.0:0").context("failed to bind outbound UDP socket")?;
        socket
            .set_nonblocking(true)
            .context("failed to set outbound socket non-blocking")?;

        tracing::info!("pulse sender bound, destination {}", dest);
        Ok(Self {
            socket: Some(socket),
            dest,
        })
    }

    /// The resolved destination address.
    pub fn destination(&self) -> SocketAddr {
        self.dest
    }

    /// Send one intensity datagram. Never fails: errors are logged and the
    /// update is dropped.
    pub fn send(&self, value: f32) {
        let Some(socket) = &self.socket else {
            tracing::debug!("sender closed, dropping intensity update");
            return;
        };

        if let Err(e) = socket.send_to(&wire::encode(value), self.dest) {
            tracing::warn!("dropped intensity update to {}: {}", self.dest, e);
        }
    }

    /// Release the socket. Idempotent; sends after close are ignored.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::debug!("closed pulse sender socket (destination {})", self.dest);
        }
    }
}
