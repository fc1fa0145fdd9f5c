//! Shellquiz server.
//!
//! Serves the quiz to many remote clients at once. Each connection gets its
//! own isolated quiz session; a supervisor coordinates a bounded graceful
//! shutdown across all of them.
//!
//! # Components
//!
//! - [`Server`]: binds the listener and runs until a stop signal
//! - [`Transport`] / [`TlsTransport`]: accepted connections, TLS over TCP
//! - [`HostIdentity`]: server certificate and key, loaded or generated
//! - [`Multiplexer`]: one session task per connection
//! - [`session::serve`]: handshake and per-session runtime
//! - [`supervise`]: stop handling and the shutdown deadline

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod identity;
mod multiplexer;
pub mod session;
mod supervisor;
mod transport;

use std::{future::Future, net::SocketAddr, time::Duration};

pub use config::{
    DEFAULT_GRACE_PERIOD, DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_HOST, DEFAULT_HOST_CERT_PATH,
    DEFAULT_HOST_KEY_PATH, DEFAULT_PORT, ServerConfig,
};
pub use error::{ServerError, SessionError};
pub use identity::{GENERATED_SUBJECT, HostIdentity, load_certs, pinned_client_config};
pub use multiplexer::Multiplexer;
use shellquiz_app::QuestionBank;
pub use supervisor::{shutdown_signal, supervise};
pub use transport::{TlsTransport, Transport};

/// Shellquiz server.
///
/// Generic over the [`Transport`] so tests can serve in-memory streams; the
/// default is TLS over TCP.
pub struct Server<T = TlsTransport> {
    mux: Multiplexer<T>,
    grace_period: Duration,
}

impl Server<TlsTransport> {
    /// Load (or create) the host identity and bind the TLS listener.
    pub async fn bind(config: &ServerConfig, bank: QuestionBank) -> Result<Self, ServerError> {
        let identity =
            HostIdentity::load_or_generate(&config.host_key_path, &config.host_cert_path)?;
        let transport = TlsTransport::bind(&config.bind_address(), &identity).await?;
        Ok(Self::with_transport(transport, bank, config))
    }
}

impl<T: Transport> Server<T> {
    /// Serve `bank` over an already bound transport.
    pub fn with_transport(transport: T, bank: QuestionBank, config: &ServerConfig) -> Self {
        let mux = Multiplexer::new(transport, bank, config.quiz, config.handshake_timeout);
        Self { mux, grace_period: config.grace_period }
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.mux.local_addr()?)
    }

    /// Run until SIGINT or SIGTERM, then shut down gracefully.
    ///
    /// This method runs until the server is shut down or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `stop` resolves, then shut down gracefully.
    pub async fn run_until<F>(self, stop: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        tracing::info!("Server listening on {}", self.local_addr()?);
        supervise(self.mux, self.grace_period, stop).await
    }
}
