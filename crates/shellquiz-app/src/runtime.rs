//! Generic runtime for quiz sessions.
//!
//! The Runtime drives one session's event loop, coordinating between:
//! - [`Quiz`]: quiz state machine
//! - [`Driver`]: platform-specific I/O
//! - the session mailbox, which carries scheduled and dispatched events
//!
//! Exactly one event is processed at a time, in arrival order. Scheduled
//! events are delivered by timer tasks owned by the runtime; they are all
//! aborted when the session ends.

use std::time::Duration;

use tokio::{sync::mpsc, task::JoinSet};

use crate::{Driver, Quiz, QuizAction, QuizEvent};

/// Generic runtime that orchestrates a Quiz and a Driver.
pub struct Runtime<D: Driver> {
    driver: D,
    quiz: Quiz,
    mailbox_tx: mpsc::UnboundedSender<QuizEvent>,
    mailbox_rx: mpsc::UnboundedReceiver<QuizEvent>,
    timers: JoinSet<()>,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime for `quiz` on top of `driver`.
    pub fn new(driver: D, quiz: Quiz) -> Self {
        let (mailbox_tx, mailbox_rx) = mpsc::unbounded_channel();
        Self { driver, quiz, mailbox_tx, mailbox_rx, timers: JoinSet::new() }
    }

    /// Run the session until the quiz quits or input closes.
    ///
    /// Returns the final quiz state.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error. Pending
    /// timers are aborted and the driver is stopped either way.
    pub async fn run(mut self) -> Result<Quiz, D::Error> {
        self.enqueue(QuizEvent::Init);

        let result = match self.driver.render(&self.quiz).await {
            Ok(()) => self.event_loop().await,
            Err(e) => Err(e),
        };

        self.timers.abort_all();
        self.driver.stop().await;

        result.map(|()| self.quiz)
    }

    async fn event_loop(&mut self) -> Result<(), D::Error> {
        loop {
            let event = tokio::select! {
                biased;

                Some(event) = self.mailbox_rx.recv() => event,

                polled = self.driver.poll_event() => match polled? {
                    Some(event) => event,
                    None => {
                        tracing::debug!("input closed");
                        return Ok(());
                    },
                },
            };

            if self.process_event(event).await? {
                return Ok(());
            }
        }
    }

    /// Feed one event through the quiz and execute its actions.
    ///
    /// Returns `true` if the session should end.
    async fn process_event(&mut self, event: QuizEvent) -> Result<bool, D::Error> {
        tracing::trace!(?event, phase = ?self.quiz.phase(), "event");

        let mut render = false;
        for action in self.quiz.handle(event) {
            match action {
                QuizAction::Render => render = true,
                QuizAction::Schedule { delay, event } => self.schedule(delay, event),
                QuizAction::ProbeWindowSize => {
                    let (cols, rows) = self.driver.window_size()?;
                    self.enqueue(QuizEvent::Resize(cols, rows));
                },
                QuizAction::Quit => return Ok(true),
            }
        }

        if render {
            self.driver.render(&self.quiz).await?;
        }
        Ok(false)
    }

    fn schedule(&mut self, delay: Duration, event: QuizEvent) {
        // Reap timers that already fired.
        while self.timers.try_join_next().is_some() {}

        let mailbox = self.mailbox_tx.clone();
        self.timers.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = mailbox.send(event);
        });
    }

    fn enqueue(&self, event: QuizEvent) {
        // The runtime holds the receiver, so the mailbox is never closed here.
        let _ = self.mailbox_tx.send(event);
    }

    /// Current quiz state.
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }
}
