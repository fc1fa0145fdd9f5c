//! Terminal frontend for shellquiz.
//!
//! A thin shell over [`shellquiz_app::Driver`] for the controlling terminal,
//! plus the client side of remote sessions. All quiz logic lives in
//! [`shellquiz_app`]; this crate only moves bytes and key presses.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod remote;
pub mod terminal;

pub use remote::{ClientError, ConnectOptions, connect};
pub use terminal::{RawTerminal, TerminalDriver, TerminalError};
