//! The encrypted byte-stream boundary under the session.
//!
//! [`Transport`] is everything the protocol needs from the outside world:
//! connect, write a line, drain whatever the relay answered within a
//! bounded window, close. [`TlsTransport`] is the production
//! implementation, speaking implicit TLS from the first byte the way the
//! relay does on port 465. Tests substitute a scripted stub.

use std::{future::Future, io, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time,
};
use tokio_rustls::{
    TlsConnector,
    client::TlsStream,
    rustls::{ClientConfig, RootCertStore, pki_types::ServerName},
};

/// Errors that can occur at the transport boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// IO error during network operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TLS setup or handshake error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// An operation was attempted before `connect` succeeded.
    #[error("Transport is not connected")]
    NotConnected,
}

/// Specialized `Result` type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// A connection-oriented, already-encrypted byte stream to the relay.
pub trait Transport {
    /// Open the connection. Must succeed before any other operation.
    fn connect(&mut self, host: &str, port: u16) -> impl Future<Output = Result<()>> + Send;

    /// Write one line, terminated with CRLF.
    fn write_line(&mut self, line: &str) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `wait` for the relay to start answering, then drain
    /// whatever has arrived. An empty vec means the window elapsed silently.
    fn read_available(&mut self, wait: Duration) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Close the connection. Teardown failures have nowhere useful to go at
    /// the end of a session, so none are reported.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Implicit-TLS transport over `TcpStream`, verified against system roots.
#[derive(Default)]
pub struct TlsTransport {
    stream: Option<TlsStream<TcpStream>>,
}

impl TlsTransport {
    #[must_use]
    pub const fn new() -> Self {
        Self { stream: None }
    }
}

impl Transport for TlsTransport {
    async fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        let tcp = TcpStream::connect((host, port)).await?;

        let mut roots = RootCertStore::empty();
        let native = rustls_native_certs::load_native_certs();
        for cert in native.certs {
            roots
                .add(cert)
                .map_err(|e| TransportError::Tls(format!("Failed to add certificate: {e}")))?;
        }
        // Log errors but don't fail if some certs couldn't be loaded
        if !native.errors.is_empty() {
            tracing::warn!(?native.errors, "Some certificates could not be loaded");
        }

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        let connector = TlsConnector::from(Arc::new(config));
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| TransportError::Tls(format!("Invalid relay host: {e}")))?;

        let stream = connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| TransportError::Tls(e.to_string()))?;

        self.stream = Some(stream);
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        stream.write_all(line.as_bytes()).await?;
        stream.write_all(b"\r\n").await?;
        stream.flush().await?;

        Ok(())
    }

    async fn read_available(&mut self, wait: Duration) -> Result<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        let mut buf = [0u8; 512];
        let mut drained = Vec::new();

        let Ok(first) = time::timeout(wait, stream.read(&mut buf)).await else {
            // Window elapsed with the relay silent
            return Ok(drained);
        };

        let read = first?;
        if read == 0 {
            // Orderly EOF, nothing to drain
            return Ok(drained);
        }
        drained.extend_from_slice(&buf[..read]);

        // The reply has started arriving; sweep up anything already buffered
        while let Ok(more) = time::timeout(Duration::ZERO, stream.read(&mut buf)).await {
            let read = more?;
            if read == 0 {
                break;
            }
            drained.extend_from_slice(&buf[..read]);
        }

        Ok(drained)
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
    }
}
