//! Remote quiz sessions.
//!
//! A session owns one connection. It reads the client's `Hello`, rejects
//! clients without a terminal, then runs an isolated [`Quiz`] through the
//! generic [`Runtime`] with a [`RemoteDriver`] translating between frames
//! and quiz events.
//!
//! Frames are read by a dedicated pump task because frame decoding is not
//! cancel safe; the driver only ever receives whole frames from a channel.

use std::{
    io,
    net::SocketAddr,
    time::{Duration, Instant},
};

use bytes::Bytes;
use ratatui::{
    Terminal, TerminalOptions, Viewport as TerminalViewport,
    backend::CrosstermBackend,
    crossterm::{
        cursor::MoveTo,
        queue,
        terminal::{Clear, ClearType},
    },
    layout::Rect,
};
use shellquiz_app::{Driver, Phase, QuestionBank, Quiz, QuizConfig, QuizEvent, Runtime, ui};
use shellquiz_proto::{ClientFrame, ProtocolError, ServerFrame, read_frame, write_frame};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    sync::{mpsc, watch},
};

use crate::error::SessionError;

/// Diagnostic sent to clients that did not request a terminal.
pub const NO_TERMINAL_MESSAGE: &str = "no active terminal, skipping";

/// Widest client terminal accepted.
pub const MAX_COLS: u16 = 500;

/// Tallest client terminal accepted.
pub const MAX_ROWS: u16 = 500;

/// Inbound frames buffered between the pump and the driver.
const INBOUND_CAPACITY: usize = 64;

type Inbound = mpsc::Receiver<Result<ClientFrame, ProtocolError>>;

/// Everything a session needs besides its connection.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session number, unique per server.
    pub id: u64,
    /// Remote address.
    pub peer: SocketAddr,
    /// Shared question bank.
    pub bank: QuestionBank,
    /// Quiz tunables.
    pub quiz: QuizConfig,
    /// Limit on waiting for `Hello`.
    pub handshake_timeout: Duration,
    /// Flips to `true` when the server is shutting down.
    pub shutdown: watch::Receiver<bool>,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Terminal type the client reported.
    pub term: String,
    /// Phase the quiz ended in.
    pub phase: Phase,
    /// Questions answered.
    pub answered: usize,
    /// Score for the answers given.
    pub score: u8,
    /// Time from `Hello` to close.
    pub duration: Duration,
}

/// Serve one connection until the quiz ends or the client goes away.
///
/// # Errors
///
/// Returns [`SessionError::NoTerminal`] after telling a client without a
/// terminal why it is being disconnected, and other variants for
/// handshake, protocol and I/O failures.
pub async fn serve<S>(stream: S, ctx: SessionContext) -> Result<SessionSummary, SessionError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    let hello = tokio::time::timeout(ctx.handshake_timeout, read_frame::<_, ClientFrame>(&mut reader))
        .await
        .map_err(|_| SessionError::HandshakeTimeout)??;

    let pty = match hello {
        Some(ClientFrame::Hello { pty: Some(pty) }) => pty,
        Some(ClientFrame::Hello { pty: None }) => {
            reject(&mut writer, NO_TERMINAL_MESSAGE.to_string()).await?;
            return Err(SessionError::NoTerminal);
        },
        Some(other) => return Err(SessionError::UnexpectedFrame(frame_kind(&other))),
        None => return Err(SessionError::ClosedBeforeHello),
    };

    if pty.cols > MAX_COLS || pty.rows > MAX_ROWS {
        let message = format!(
            "terminal {}x{} is larger than the supported {MAX_COLS}x{MAX_ROWS}",
            pty.cols, pty.rows
        );
        reject(&mut writer, message).await?;
        return Err(SessionError::TerminalTooLarge { cols: pty.cols, rows: pty.rows });
    }

    let started = Instant::now();
    let size = (pty.cols, pty.rows);
    tracing::info!(term = %pty.term, cols = pty.cols, rows = pty.rows, "session started");

    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
    let pump = tokio::spawn(pump_frames(reader, inbound_tx));

    let result = match RemoteDriver::new(writer, inbound_rx, ctx.shutdown, size) {
        Ok(driver) => Runtime::new(driver, Quiz::new(ctx.bank, ctx.quiz, size)).run().await,
        Err(e) => Err(e),
    };
    pump.abort();

    let quiz = result?;
    Ok(SessionSummary {
        term: pty.term,
        phase: quiz.phase(),
        answered: quiz.answers().len(),
        score: quiz.score(),
        duration: started.elapsed(),
    })
}

/// Tell the client why it is being turned away, then close.
async fn reject<W>(writer: &mut W, message: String) -> Result<(), SessionError>
where
    W: AsyncWrite + Unpin,
{
    write_frame(writer, &ServerFrame::Diagnostic(message)).await?;
    write_frame(writer, &ServerFrame::Goodbye).await?;
    writer.shutdown().await?;
    Ok(())
}

/// Forward decoded frames until EOF, a decode error, or the driver goes away.
async fn pump_frames<R>(mut reader: R, tx: mpsc::Sender<Result<ClientFrame, ProtocolError>>)
where
    R: AsyncRead + Unpin,
{
    loop {
        match read_frame(&mut reader).await {
            Ok(Some(frame)) => {
                if tx.send(Ok(frame)).await.is_err() {
                    return;
                }
            },
            Ok(None) => return,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            },
        }
    }
}

/// Ratatui terminal drawing into memory over a fixed, client-sized area.
///
/// Never call `clear` or `resize` on it: both query the size and cursor of
/// the server process's own terminal. A size change builds a new one.
fn in_memory_terminal(area: Rect) -> io::Result<Terminal<CrosstermBackend<Vec<u8>>>> {
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(Vec::new()),
        TerminalOptions { viewport: TerminalViewport::Fixed(area) },
    )?;
    let out = terminal.backend_mut().writer_mut();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(terminal)
}

fn clamp_size(cols: u16, rows: u16) -> (u16, u16) {
    (cols.min(MAX_COLS), rows.min(MAX_ROWS))
}

fn frame_kind(frame: &ClientFrame) -> &'static str {
    match frame {
        ClientFrame::Hello { .. } => "hello",
        ClientFrame::Resize { .. } => "resize",
        ClientFrame::Key(_) => "key",
        ClientFrame::Scroll(_) => "scroll",
    }
}

/// [`Driver`] for a remote client.
///
/// Input comes from decoded client frames and the server's shutdown signal.
/// Views are drawn by ratatui into an in-memory buffer whose bytes are sent
/// to the client as `Output` frames.
pub struct RemoteDriver<W> {
    writer: W,
    inbound: Inbound,
    shutdown: watch::Receiver<bool>,
    /// Cleared once shutdown has been delivered or can no longer arrive.
    watch_shutdown: bool,
    terminal: Terminal<CrosstermBackend<Vec<u8>>>,
    area: Rect,
    window: (u16, u16),
}

impl<W> RemoteDriver<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Create a driver for a client terminal of `size` (columns, rows).
    pub fn new(
        writer: W,
        inbound: Inbound,
        shutdown: watch::Receiver<bool>,
        size: (u16, u16),
    ) -> Result<Self, SessionError> {
        let size = clamp_size(size.0, size.1);
        let area = Rect::new(0, 0, size.0, size.1);
        let terminal = in_memory_terminal(area)?;

        Ok(Self { writer, inbound, shutdown, watch_shutdown: true, terminal, area, window: size })
    }

    fn translate(&mut self, frame: ClientFrame) -> Option<QuizEvent> {
        match frame {
            ClientFrame::Key(key) => Some(QuizEvent::Key(key)),
            ClientFrame::Scroll(direction) => Some(QuizEvent::Scroll(direction)),
            ClientFrame::Resize { cols, rows } => {
                let (cols, rows) = clamp_size(cols, rows);
                self.window = (cols, rows);
                Some(QuizEvent::Resize(cols, rows))
            },
            ClientFrame::Hello { .. } => {
                tracing::debug!("ignoring repeated hello");
                None
            },
        }
    }

    async fn flush_output(&mut self) -> Result<(), SessionError> {
        let bytes = std::mem::take(self.terminal.backend_mut().writer_mut());
        if !bytes.is_empty() {
            write_frame(&mut self.writer, &ServerFrame::Output(Bytes::from(bytes))).await?;
        }
        Ok(())
    }
}

impl<W> Driver for RemoteDriver<W>
where
    W: AsyncWrite + Unpin + Send,
{
    type Error = SessionError;

    async fn poll_event(&mut self) -> Result<Option<QuizEvent>, Self::Error> {
        loop {
            let stop_requested = self.watch_shutdown && *self.shutdown.borrow_and_update();
            if stop_requested {
                self.watch_shutdown = false;
                tracing::debug!("server shutting down, ending session");
                return Ok(Some(QuizEvent::Quit));
            }

            tokio::select! {
                frame = self.inbound.recv() => match frame {
                    Some(Ok(frame)) => {
                        if let Some(event) = self.translate(frame) {
                            return Ok(Some(event));
                        }
                    },
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(None),
                },
                changed = self.shutdown.changed(), if self.watch_shutdown => {
                    if changed.is_err() {
                        self.watch_shutdown = false;
                    }
                },
            }
        }
    }

    async fn render(&mut self, quiz: &Quiz) -> Result<(), Self::Error> {
        let (cols, rows) = quiz.terminal_size();
        let area = Rect::new(0, 0, cols, rows);
        if area != self.area {
            self.flush_output().await?;
            self.terminal = in_memory_terminal(area)?;
            self.area = area;
        }

        self.terminal.draw(|frame| ui::render(frame, quiz))?;
        self.flush_output().await
    }

    fn window_size(&self) -> Result<(u16, u16), Self::Error> {
        Ok(self.window)
    }

    async fn stop(&mut self) {
        if let Err(e) = self.flush_output().await {
            tracing::debug!("failed to flush final output: {e}");
        }
        if let Err(e) = write_frame(&mut self.writer, &ServerFrame::Goodbye).await {
            tracing::debug!("failed to send goodbye: {e}");
        }
        let _ = self.writer.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use shellquiz_app::KeyInput;
    use shellquiz_proto::{PtyRequest, ScrollDirection};
    use tokio::io::{DuplexStream, ReadHalf, WriteHalf};

    use super::*;

    fn context(shutdown: watch::Receiver<bool>) -> SessionContext {
        SessionContext {
            id: 1,
            peer: "127.0.0.1:40000".parse().unwrap(),
            bank: QuestionBank::builtin(),
            quiz: QuizConfig::default(),
            handshake_timeout: Duration::from_secs(10),
            shutdown,
        }
    }

    fn client() -> (ReadHalf<DuplexStream>, WriteHalf<DuplexStream>, DuplexStream) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let (reader, writer) = tokio::io::split(client);
        (reader, writer, server)
    }

    fn hello(cols: u16, rows: u16) -> ClientFrame {
        ClientFrame::Hello { pty: Some(PtyRequest { term: "xterm-256color".into(), cols, rows }) }
    }

    /// Read server frames until `Goodbye` or EOF.
    async fn drain(reader: &mut ReadHalf<DuplexStream>) -> Vec<ServerFrame> {
        let mut frames = Vec::new();
        while let Some(frame) = read_frame::<_, ServerFrame>(reader).await.unwrap() {
            let done = frame == ServerFrame::Goodbye;
            frames.push(frame);
            if done {
                break;
            }
        }
        frames
    }

    #[tokio::test]
    async fn rejects_client_without_terminal() {
        let (_tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        write_frame(&mut writer, &ClientFrame::Hello { pty: None }).await.unwrap();

        let result = serve(server, context(rx)).await;
        assert!(matches!(result, Err(SessionError::NoTerminal)));

        let frames = drain(&mut reader).await;
        assert_eq!(frames, vec![
            ServerFrame::Diagnostic(NO_TERMINAL_MESSAGE.to_string()),
            ServerFrame::Goodbye,
        ]);
    }

    #[tokio::test]
    async fn rejects_input_before_hello() {
        let (_tx, rx) = watch::channel(false);
        let (_reader, mut writer, server) = client();
        write_frame(&mut writer, &ClientFrame::Key(KeyInput::Enter)).await.unwrap();

        let result = serve(server, context(rx)).await;
        assert!(matches!(result, Err(SessionError::UnexpectedFrame("key"))));
    }

    #[tokio::test]
    async fn closed_before_hello() {
        let (_tx, rx) = watch::channel(false);
        let (client, server) = tokio::io::duplex(1024);
        drop(client);

        let result = serve(server, context(rx)).await;
        assert!(matches!(result, Err(SessionError::ClosedBeforeHello)));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_client_times_out() {
        let (_tx, rx) = watch::channel(false);
        let (_reader, _writer, server) = client();

        let result = serve(server, context(rx)).await;
        assert!(matches!(result, Err(SessionError::HandshakeTimeout)));
    }

    #[tokio::test]
    async fn quits_on_key_and_says_goodbye() {
        let (_tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        let session = tokio::spawn(serve(server, context(rx)));

        write_frame(&mut writer, &hello(80, 24)).await.unwrap();
        write_frame(&mut writer, &ClientFrame::Scroll(ScrollDirection::Down)).await.unwrap();
        write_frame(&mut writer, &ClientFrame::Key(KeyInput::Char('q'))).await.unwrap();

        let frames = drain(&mut reader).await;
        assert!(matches!(frames.first(), Some(ServerFrame::Output(_))));
        assert_eq!(frames.last(), Some(&ServerFrame::Goodbye));

        let summary = session.await.unwrap().unwrap();
        assert_eq!(summary.term, "xterm-256color");
        assert_eq!(summary.phase, Phase::Done);
        assert_eq!(summary.answered, 0);
    }

    #[tokio::test]
    async fn shutdown_signal_ends_session() {
        let (tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        let session = tokio::spawn(serve(server, context(rx)));

        write_frame(&mut writer, &hello(80, 24)).await.unwrap();
        // First output means the session is running.
        let first = read_frame::<_, ServerFrame>(&mut reader).await.unwrap();
        assert!(matches!(first, Some(ServerFrame::Output(_))));

        tx.send(true).unwrap();

        let frames = drain(&mut reader).await;
        assert_eq!(frames.last(), Some(&ServerFrame::Goodbye));
        let summary = session.await.unwrap().unwrap();
        assert_eq!(summary.phase, Phase::Done);
    }

    #[tokio::test]
    async fn client_disconnect_ends_session() {
        let (_tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        let session = tokio::spawn(serve(server, context(rx)));

        write_frame(&mut writer, &hello(80, 24)).await.unwrap();
        writer.shutdown().await.unwrap();

        let frames = drain(&mut reader).await;
        assert_eq!(frames.last(), Some(&ServerFrame::Goodbye));
        let summary = session.await.unwrap().unwrap();
        assert_eq!(summary.phase, Phase::Intro);
    }

    const CLEAR_SCREEN: &str = "\u{1b}[2J";

    async fn next_output(reader: &mut ReadHalf<DuplexStream>) -> String {
        match read_frame(reader).await.unwrap() {
            Some(ServerFrame::Output(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_oversized_terminal() {
        let (_tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        write_frame(&mut writer, &hello(u16::MAX, u16::MAX)).await.unwrap();

        let result = serve(server, context(rx)).await;
        assert!(matches!(
            result,
            Err(SessionError::TerminalTooLarge { cols: u16::MAX, rows: u16::MAX })
        ));

        let frames = drain(&mut reader).await;
        assert_eq!(frames.len(), 2);
        let ServerFrame::Diagnostic(message) = &frames[0] else {
            panic!("expected diagnostic, got {:?}", frames[0]);
        };
        assert!(message.contains("65535x65535"));
        assert_eq!(frames[1], ServerFrame::Goodbye);
    }

    #[tokio::test]
    async fn largest_terminal_is_served() {
        let (_tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        let session = tokio::spawn(serve(server, context(rx)));

        write_frame(&mut writer, &hello(MAX_COLS, MAX_ROWS)).await.unwrap();
        assert!(next_output(&mut reader).await.contains("Welcome"));

        write_frame(&mut writer, &ClientFrame::Key(KeyInput::Char('q'))).await.unwrap();
        drain(&mut reader).await;
        assert_eq!(session.await.unwrap().unwrap().phase, Phase::Done);
    }

    #[tokio::test]
    async fn resize_is_clamped() {
        let (_tx, shutdown) = watch::channel(false);
        let (inbound_tx, inbound_rx) = mpsc::channel(4);
        let mut driver =
            RemoteDriver::new(tokio::io::sink(), inbound_rx, shutdown, (u16::MAX, 10)).unwrap();
        assert_eq!(driver.window_size().unwrap(), (MAX_COLS, 10));

        inbound_tx.send(Ok(ClientFrame::Resize { cols: 80, rows: u16::MAX })).await.unwrap();
        let event = driver.poll_event().await.unwrap();
        assert_eq!(event, Some(QuizEvent::Resize(80, MAX_ROWS)));
        assert_eq!(driver.window_size().unwrap(), (80, MAX_ROWS));
    }

    #[tokio::test]
    async fn every_size_change_redraws_from_a_cleared_screen() {
        let (_tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        let session = tokio::spawn(serve(server, context(rx)));

        write_frame(&mut writer, &hello(80, 24)).await.unwrap();
        let first = next_output(&mut reader).await;
        assert!(first.starts_with(CLEAR_SCREEN));
        assert!(first.contains("Welcome"));

        // Shrinking and growing both rebuild the in-memory terminal.
        for (cols, rows) in [(40, 12), (120, 40)] {
            write_frame(&mut writer, &ClientFrame::Resize { cols, rows }).await.unwrap();
            let redraw = next_output(&mut reader).await;
            assert!(redraw.starts_with(CLEAR_SCREEN), "{cols}x{rows}");
            assert!(redraw.contains("Welcome"), "{cols}x{rows}");
        }

        // Same size again only sends what changed.
        write_frame(&mut writer, &ClientFrame::Resize { cols: 120, rows: 40 }).await.unwrap();
        write_frame(&mut writer, &ClientFrame::Key(KeyInput::Esc)).await.unwrap();
        let frames = drain(&mut reader).await;
        for frame in &frames {
            if let ServerFrame::Output(bytes) = frame {
                assert!(!String::from_utf8_lossy(bytes).contains(CLEAR_SCREEN));
            }
        }
        session.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn output_is_terminal_escape_sequences() {
        let (_tx, rx) = watch::channel(false);
        let (mut reader, mut writer, server) = client();
        let session = tokio::spawn(serve(server, context(rx)));

        write_frame(&mut writer, &hello(80, 24)).await.unwrap();
        let Some(ServerFrame::Output(bytes)) = read_frame(&mut reader).await.unwrap() else {
            panic!("expected output");
        };
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("Welcome"));

        write_frame(&mut writer, &ClientFrame::Key(KeyInput::Esc)).await.unwrap();
        drain(&mut reader).await;
        session.await.unwrap().unwrap();
    }
}
