//! Typed X11 window property access and event subscription.
//!
//! Two jobs, layered over any blocking x11rb-style connection:
//!
//! - **Property marshaling**: convert between strongly typed property values
//!   (integers, atom references, window references, strings, and homogeneous
//!   lists of them) and the raw `(type, width, count, bytes)` tuples the
//!   server speaks, inferring the wire type in both directions.
//! - **Event-subscription multiplexing**: let any number of independent
//!   handlers listen to named events on the same window while the crate keeps
//!   the server-side core and RandR event masks equal to exactly what the
//!   surviving handlers require.
//!
//! [`Display`] ties a connection, the atom cache, and the subscription
//! registry together; [`WindowHandle`] is the per-window surface. Everything
//! is single-threaded and blocking: drive one connection from one thread.
//!
//! ```no_run
//! use xobj::Display;
//!
//! fn main() -> xobj::Result<()> {
//!     let (display, _screen) = Display::open()?;
//!     let win = display.window(0x400001);
//!
//!     win.set_property("_NET_WM_NAME", "scratchpad")?;
//!     if let Some(name) = win.property("_NET_WM_NAME")? {
//!         println!("named: {:?}", name.as_utf8());
//!     }
//!
//!     win.on("property_notify", |event| {
//!         println!("property {:?} changed", event.atom());
//!     })?;
//!     Ok(())
//! }
//! ```

pub mod atoms;
pub mod codec;
pub mod connection;
pub mod display;
pub mod error;
pub mod event;
pub mod property;
pub mod subscribe;
pub mod value;

#[cfg(test)]
pub(crate) mod mock;

pub use atoms::AtomRegistry;
pub use connection::{DisplayConnection, Geometry, PropertyReply};
pub use display::{Display, WindowHandle};
pub use error::{Error, Result};
pub use event::{EventKind, WindowEvent};
pub use subscribe::{HandlerId, Subscriptions};
pub use value::{Property, PropertyValue};
