//! Session multiplexer.
//!
//! Accepts connections from a [`Transport`] and gives each one its own task
//! running an isolated quiz session. The accept loop never waits on a
//! client: transport handshakes and the session `Hello` happen inside the
//! session task.
//!
//! Session tasks live in a [`JoinSet`] that is only used for lifecycle:
//! spawning, reaping finished sessions, and draining or aborting them on
//! shutdown. Sessions share nothing but the read-only question bank.

use std::{io, net::SocketAddr, time::Duration};

use shellquiz_app::{QuestionBank, QuizConfig};
use tokio::{
    sync::watch,
    task::{JoinError, JoinSet},
};
use tracing::Instrument;

use crate::{
    error::SessionError,
    session::{self, SessionContext},
    transport::Transport,
};

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept loop spawning one session task per connection.
pub struct Multiplexer<T> {
    transport: T,
    bank: QuestionBank,
    quiz: QuizConfig,
    handshake_timeout: Duration,
}

impl<T: Transport> Multiplexer<T> {
    /// Create a multiplexer serving `bank` on `transport`.
    pub fn new(
        transport: T,
        bank: QuestionBank,
        quiz: QuizConfig,
        handshake_timeout: Duration,
    ) -> Self {
        Self { transport, bank, quiz, handshake_timeout }
    }

    /// Local address of the underlying transport.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Accept sessions until `shutdown` becomes `true`, then wait for the
    /// running sessions to end.
    ///
    /// Sessions receive the same shutdown signal and wind down on their own.
    /// Dropping this future aborts every session still running.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let Self { transport, bank, quiz, handshake_timeout } = self;
        let mut sessions = JoinSet::new();
        let mut next_id: u64 = 0;

        // Accepting pauses while the back-off runs; shutdown and reaping don't.
        let backoff = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(backoff);
        let mut backing_off = false;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    let stop = changed.is_err() || *shutdown.borrow_and_update();
                    if stop {
                        break;
                    }
                },

                () = &mut backoff, if backing_off => backing_off = false,

                accepted = transport.accept(), if !backing_off => match accepted {
                    Ok((handshake, peer)) => {
                        next_id += 1;
                        let ctx = SessionContext {
                            id: next_id,
                            peer,
                            bank: bank.clone(),
                            quiz,
                            handshake_timeout,
                            shutdown: shutdown.clone(),
                        };
                        let span = tracing::info_span!("session", id = next_id, %peer);
                        sessions.spawn(run_session::<T>(handshake, ctx).instrument(span));
                        tracing::debug!(active = sessions.len(), "session spawned");
                    },
                    Err(e) => {
                        tracing::warn!("accept failed: {e}");
                        backoff.as_mut().reset(tokio::time::Instant::now() + ACCEPT_BACKOFF);
                        backing_off = true;
                    },
                },

                Some(joined) = sessions.join_next() => log_join(joined),
            }
        }

        drop(transport);
        tracing::info!(active = sessions.len(), "stopped accepting connections");

        while let Some(joined) = sessions.join_next().await {
            log_join(joined);
        }
        tracing::info!("all sessions closed");
    }
}

/// Complete the transport handshake, then serve the session.
async fn run_session<T: Transport>(handshake: T::Handshake, ctx: SessionContext) {
    tracing::debug!("connection accepted");

    let stream = match tokio::time::timeout(ctx.handshake_timeout, handshake).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            tracing::warn!("transport handshake failed: {e}");
            return;
        },
        Err(_) => {
            tracing::warn!("transport handshake timed out");
            return;
        },
    };

    match session::serve(stream, ctx).await {
        Ok(summary) => tracing::info!(
            term = %summary.term,
            phase = ?summary.phase,
            answered = summary.answered,
            score = summary.score,
            duration = ?summary.duration,
            "session ended"
        ),
        Err(SessionError::NoTerminal) => tracing::info!("no active terminal, skipping"),
        Err(e @ SessionError::TerminalTooLarge { .. }) => tracing::info!("rejected: {e}"),
        Err(e) => tracing::warn!("session failed: {e}"),
    }
}

fn log_join(joined: Result<(), JoinError>) {
    match joined {
        Ok(()) => {},
        Err(e) if e.is_panic() => tracing::error!("session task panicked: {e}"),
        Err(e) => tracing::debug!("session task cancelled: {e}"),
    }
}
