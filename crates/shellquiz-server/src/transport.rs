//! Connection transport.
//!
//! [`Transport`] is the seam between the multiplexer and the network. Accepting
//! yields a pending handshake plus the peer address; the handshake itself is
//! awaited inside the session task so a slow client never stalls the accept
//! loop.
//!
//! [`TlsTransport`] is the production implementation: TCP with TLS 1.3 and
//! ALPN set to the shellquiz protocol identifier.

use std::{future::Future, io, net::SocketAddr};

use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpListener, TcpStream},
};
use tokio_rustls::TlsAcceptor;

use crate::{error::ServerError, identity::HostIdentity};

/// Source of incoming session streams.
pub trait Transport: Send + Sync + 'static {
    /// Established, encrypted byte stream.
    type Stream: AsyncRead + AsyncWrite + Send + 'static;

    /// Handshake turning an accepted connection into a [`Self::Stream`].
    type Handshake: Future<Output = io::Result<Self::Stream>> + Send + 'static;

    /// Wait for the next connection.
    fn accept(&self) -> impl Future<Output = io::Result<(Self::Handshake, SocketAddr)>> + Send;

    /// Local address the transport is bound to.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

/// TLS over TCP transport.
pub struct TlsTransport {
    listener: TcpListener,
    acceptor: TlsAcceptor,
}

impl TlsTransport {
    /// Bind `address` and present `identity` to clients.
    pub async fn bind(address: &str, identity: &HostIdentity) -> Result<Self, ServerError> {
        let acceptor = TlsAcceptor::from(identity.server_config()?);

        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind { address: address.to_string(), source })?;

        tracing::info!("TLS transport bound to {}", listener.local_addr()?);

        Ok(Self { listener, acceptor })
    }
}

impl Transport for TlsTransport {
    type Stream = tokio_rustls::server::TlsStream<TcpStream>;
    type Handshake = tokio_rustls::Accept<TcpStream>;

    async fn accept(&self) -> io::Result<(Self::Handshake, SocketAddr)> {
        let (stream, peer) = self.listener.accept().await?;
        stream.set_nodelay(true)?;
        Ok((self.acceptor.accept(stream), peer))
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let identity = HostIdentity::generate().unwrap();
        let transport = TlsTransport::bind("127.0.0.1:0", &identity).await.unwrap();
        assert_ne!(transport.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn reports_address_in_use() {
        let identity = HostIdentity::generate().unwrap();
        let first = TlsTransport::bind("127.0.0.1:0", &identity).await.unwrap();
        let address = first.local_addr().unwrap().to_string();

        let err = TlsTransport::bind(&address, &identity).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));
    }
}
