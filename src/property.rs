//! Window property access: the public get/set/all surface.
//!
//! Ties the atom registry and the wire codec to one window. "Not set" is a
//! soft outcome (`None`), kept distinct from a failed request
//! (`Error::PropertyRequestFailed`).

use tracing::debug;
use x11rb::protocol::xproto::Window;

use crate::atoms::AtomRegistry;
use crate::codec;
use crate::connection::DisplayConnection;
use crate::error::{Error, Result};
use crate::value::Property;

/// Upper bound for one get-property transfer, in 32-bit words. Generous
/// enough for anything a window manager pins on a window (icons included).
const MAX_PROPERTY_WORDS: u32 = 1 << 16;

/// Read a property. `None` when the name was never interned on this
/// connection's server or the property is simply not set on the window.
pub fn get<C: DisplayConnection>(
    conn: &C,
    atoms: &AtomRegistry,
    window: Window,
    name: &str,
) -> Result<Option<Property>> {
    // A name the server has never interned cannot name a set property; skip
    // the get-property round trip entirely.
    let Some(atom) = atoms.lookup(conn, name)? else {
        return Ok(None);
    };
    let reply = conn
        .get_property(window, atom, MAX_PROPERTY_WORDS)
        .map_err(|e| request_failed(name, window, e))?;
    let Some(reply) = reply else {
        return Ok(None);
    };
    if reply.item_count == 0 {
        return Ok(None);
    }
    let type_name = atoms.name_of(conn, reply.type_atom)?;
    Ok(codec::decode(
        &type_name,
        reply.format,
        reply.item_count,
        &reply.data,
    ))
}

/// Replace a property's value and type, then flush so the change is visible
/// to subsequent reads and observers.
pub fn set<C: DisplayConnection>(
    conn: &C,
    atoms: &AtomRegistry,
    window: Window,
    name: &str,
    value: &Property,
) -> Result<()> {
    let wire = codec::encode(value)?;
    let property = atoms.intern(conn, name)?;
    let type_atom = atoms.intern(conn, &wire.type_name)?;
    debug!(
        "setting `{}` on window {:#x}: {} item(s), {}-bit {}",
        name, window, wire.item_count, wire.format, wire.type_name
    );
    conn.change_property(
        window,
        property,
        type_atom,
        wire.format,
        wire.item_count,
        &wire.data,
    )
    .map_err(|e| request_failed(name, window, e))?;
    conn.flush()
}

/// Names of every property currently set on the window.
pub fn all<C: DisplayConnection>(
    conn: &C,
    atoms: &AtomRegistry,
    window: Window,
) -> Result<Vec<String>> {
    conn.list_properties(window)?
        .into_iter()
        .map(|atom| atoms.name_of(conn, atom))
        .collect()
}

fn request_failed(name: &str, window: Window, err: Error) -> Error {
    match err {
        // A destroyed window is its own condition; callers may ignore it.
        Error::WindowGone(w) => Error::WindowGone(w),
        other => Error::PropertyRequestFailed {
            name: name.to_owned(),
            window,
            reason: other.to_string(),
        },
    }
}
