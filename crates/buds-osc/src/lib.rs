pub mod packet;

use anyhow::{Context, Result};
use packet::parse_message;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Receiver for the OSC orientation stream.
///
/// Binds a UDP socket and spawns a read task that decodes datagrams,
/// filters on the configured OSC address and forwards the numeric fields
/// of each matching message. The task stops when the receiver is dropped.
pub struct OscReceiver {
    sample_rx: mpsc::UnboundedReceiver<Vec<f32>>,
    _task: tokio::task::JoinHandle<()>,
}

impl OscReceiver {
    /// Bind `host:port` and start receiving messages for `address`.
    pub async fn bind(host: &str, port: u16, address: &str) -> Result<Self> {
        let bind_addr = format!("{host}:{port}");
        let socket = UdpSocket::bind(&bind_addr)
            .await
            .with_context(|| format!("Failed to bind OSC socket on {bind_addr}"))?;
        tracing::info!(%bind_addr, address, "Listening for OSC orientation messages");

        let (sample_tx, sample_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(recv_loop(socket, address.to_string(), sample_tx));

        Ok(Self {
            sample_rx,
            _task: task,
        })
    }

    /// Next numeric-field vector, or `None` once the socket task has stopped.
    pub async fn recv(&mut self) -> Option<Vec<f32>> {
        self.sample_rx.recv().await
    }
}

/// Socket read loop: decode datagrams, filter on the configured address,
/// forward numeric fields until the consumer goes away.
async fn recv_loop(socket: UdpSocket, address: String, sample_tx: mpsc::UnboundedSender<Vec<f32>>) {
    let mut buf = [0u8; 2048];
    loop {
        let n = match socket.recv_from(&mut buf).await {
            Ok((n, _peer)) => n,
            Err(e) => {
                tracing::error!(?e, "OSC socket read error");
                break;
            }
        };

        let message = match parse_message(&buf[..n]) {
            Ok(message) => message,
            Err(e) => {
                tracing::trace!(?e, "Skipping undecodable datagram");
                continue;
            }
        };

        if message.address != address {
            tracing::trace!(address = %message.address, "Skipping message for other address");
            continue;
        }

        if sample_tx.send(message.numeric_args()).is_err() {
            break;
        }
    }
}
