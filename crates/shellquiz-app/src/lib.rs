//! Interactive quiz for terminal sessions.
//!
//! Pure state machine plus a generic runtime, so the same quiz runs on a
//! local terminal, behind a remote session, or inside a scripted test.
//!
//! # Components
//!
//! - [`Quiz`]: quiz state machine (intro, questions, results)
//! - [`Viewport`]: scrollable window over the rendered results
//! - [`compute_score`]: percentage of correct answers
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: per-session event loop using a Driver
//! - [`ui`]: ratatui views for every phase

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod event;
pub mod markup;
mod question;
mod quiz;
pub mod report;
mod runtime;
mod score;
pub mod theme;
pub mod ui;
mod viewport;

pub use action::QuizAction;
pub use driver::Driver;
pub use event::QuizEvent;
pub use question::{BankError, Question, QuestionBank};
pub use quiz::{AnswerRecord, FOOTER_HEIGHT, HEADER_HEIGHT, Phase, Quiz, QuizConfig};
pub use runtime::Runtime;
pub use score::compute_score;
pub use shellquiz_proto::{KeyInput, ScrollDirection};
pub use viewport::Viewport;
