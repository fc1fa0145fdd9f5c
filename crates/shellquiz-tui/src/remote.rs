//! Client side of a remote quiz session.
//!
//! Connects over TLS with a pinned server certificate, announces the local
//! terminal, forwards input and copies the server's terminal output to
//! stdout until the server says goodbye.

use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
};

use crossterm::event::EventStream;
use futures::StreamExt;
use rustls::pki_types::ServerName;
use shellquiz_proto::{
    ClientFrame, ProtocolError, PtyRequest, ServerFrame, read_frame, write_frame,
};
use shellquiz_server::{GENERATED_SUBJECT, ServerError, load_certs, pinned_client_config};
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf},
    net::TcpStream,
    sync::mpsc,
};
use tokio_rustls::TlsConnector;

use crate::{input, terminal::RawTerminal};

/// Terminal type announced when `TERM` is unset.
const FALLBACK_TERM: &str = "xterm-256color";

/// Remote client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error on the connection or the local terminal.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed frame from the server.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Pinned certificate could not be loaded.
    #[error(transparent)]
    Identity(#[from] ServerError),

    /// Server name is not a valid DNS name or IP address.
    #[error("invalid server name: {0}")]
    ServerName(String),
}

/// Where and how to connect.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// `host:port` of the server.
    pub addr: String,
    /// Name the server certificate is checked against.
    pub server_name: String,
    /// PEM file holding the server certificate to trust.
    pub host_cert: PathBuf,
}

impl ConnectOptions {
    /// Options for `addr`, trusting the certificate at `host_cert`.
    pub fn new(addr: impl Into<String>, host_cert: impl Into<PathBuf>) -> Self {
        Self {
            addr: addr.into(),
            server_name: GENERATED_SUBJECT.to_string(),
            host_cert: host_cert.into(),
        }
    }
}

/// Connect and run one session on the local terminal.
///
/// Returns the diagnostics the server sent, for printing once the terminal
/// has been restored.
pub async fn connect(options: &ConnectOptions) -> Result<Vec<String>, ClientError> {
    let certs = load_certs(&options.host_cert)?;
    let config = pinned_client_config(&certs)?;
    let server_name = ServerName::try_from(options.server_name.clone())
        .map_err(|e| ClientError::ServerName(format!("{}: {e}", options.server_name)))?;

    let tcp = TcpStream::connect(&options.addr).await?;
    tcp.set_nodelay(true)?;
    let stream = TlsConnector::from(config).connect(server_name, tcp).await?;
    tracing::debug!("connected to {}", options.addr);

    let pty = if io::stdout().is_terminal() { Some(local_pty()?) } else { None };
    run_session(stream, pty).await
}

/// Run a session over an established stream.
///
/// With a `pty` the local terminal is taken over and input is forwarded;
/// without one the server's frames are only drained.
pub async fn run_session<S>(stream: S, pty: Option<PtyRequest>) -> Result<Vec<String>, ClientError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let interactive = pty.is_some();
    write_frame(&mut writer, &ClientFrame::Hello { pty }).await?;

    let (tx, mut inbound) = mpsc::channel(64);
    let pump = tokio::spawn(pump_frames(reader, tx));

    let result = if interactive {
        interact(&mut writer, &mut inbound).await
    } else {
        drain(&mut inbound).await
    };

    pump.abort();
    let _ = writer.shutdown().await;
    result
}

fn local_pty() -> io::Result<PtyRequest> {
    let (cols, rows) = crossterm::terminal::size()?;
    let term = env::var("TERM").unwrap_or_else(|_| FALLBACK_TERM.to_string());
    Ok(PtyRequest { term, cols, rows })
}

/// Forward server frames until EOF or a decode error.
///
/// `read_frame` is not cancel safe, so it runs in its own task.
async fn pump_frames<S>(mut reader: ReadHalf<S>, tx: mpsc::Sender<Result<ServerFrame, ProtocolError>>)
where
    S: AsyncRead + AsyncWrite,
{
    loop {
        let frame = match read_frame::<_, ServerFrame>(&mut reader).await {
            Ok(Some(frame)) => Ok(frame),
            Ok(None) => break,
            Err(e) => Err(e),
        };
        let failed = frame.is_err();
        if tx.send(frame).await.is_err() || failed {
            break;
        }
    }
}

async fn drain(
    inbound: &mut mpsc::Receiver<Result<ServerFrame, ProtocolError>>,
) -> Result<Vec<String>, ClientError> {
    let mut diagnostics = Vec::new();
    while let Some(frame) = inbound.recv().await {
        match frame? {
            ServerFrame::Diagnostic(text) => diagnostics.push(text),
            ServerFrame::Goodbye => break,
            ServerFrame::Output(_) => {},
        }
    }
    Ok(diagnostics)
}

async fn interact<W>(
    writer: &mut W,
    inbound: &mut mpsc::Receiver<Result<ServerFrame, ProtocolError>>,
) -> Result<Vec<String>, ClientError>
where
    W: AsyncWrite + Unpin,
{
    let _raw = RawTerminal::enter()?;
    let mut events = EventStream::new();
    let mut stdout = tokio::io::stdout();
    let mut diagnostics = Vec::new();

    loop {
        tokio::select! {
            biased;

            frame = inbound.recv() => match frame.transpose()? {
                Some(ServerFrame::Output(bytes)) => {
                    stdout.write_all(&bytes).await?;
                    stdout.flush().await?;
                },
                Some(ServerFrame::Diagnostic(text)) => diagnostics.push(text),
                Some(ServerFrame::Goodbye) | None => break,
            },

            event = events.next() => {
                let Some(event) = event else { break };
                let Some(frame) = input::client_frame(event?) else { continue };
                if let Err(e) = write_frame(writer, &frame).await {
                    // Server went away mid-keystroke; its goodbye may still be queued.
                    tracing::debug!("send failed: {e}");
                    break;
                }
            }
        }
    }

    Ok(diagnostics)
}
