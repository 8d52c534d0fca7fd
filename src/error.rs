//! Error taxonomy for property and event-subscription operations.
//!
//! Soft outcomes ("property not set", "atom not found") are `Option`s at the
//! call sites, never errors. Everything here is fatal to the failing call;
//! nothing in this crate retries.

use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};
use x11rb::protocol::ErrorKind;
use x11rb::protocol::xproto::{Atom, Window};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The server does not know the given atom id.
    #[error("atom {0} is not known to the server")]
    UnknownAtom(Atom),

    /// Event name absent from the known-event table.
    #[error("unknown event name `{0}`")]
    UnknownEvent(String),

    /// A get/change property request came back with a non-success status.
    #[error("property request for `{name}` on window {window:#x} failed: {reason}")]
    PropertyRequestFailed {
        name: String,
        window: Window,
        reason: String,
    },

    /// A property sequence mixed value tags, or was empty.
    #[error("cannot infer a wire type: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The target window has been destroyed server-side. Callers selecting
    /// events on short-lived windows may choose to ignore this.
    #[error("window {0:#x} no longer exists")]
    WindowGone(Window),

    /// Transport-level failure from the underlying connection.
    #[error("connection failure: {0}")]
    Connection(String),
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<ConnectError> for Error {
    fn from(err: ConnectError) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<ReplyError> for Error {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::X11Error(ref x11) => match x11.error_kind {
                ErrorKind::Window => Error::WindowGone(x11.bad_value),
                ErrorKind::Atom => Error::UnknownAtom(x11.bad_value),
                _ => Error::Connection(err.to_string()),
            },
            ReplyError::ConnectionError(conn) => conn.into(),
        }
    }
}
