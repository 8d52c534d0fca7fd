//! Boundary with the windowing connection.
//!
//! `DisplayConnection` is the synchronous collaborator surface this crate
//! drives: atom interning, raw property transfer, event-mask selection, and a
//! handful of thin window commands. Every operation is a blocking round trip
//! or a checked void request; nothing here retries.
//!
//! The implementation for x11rb's `RustConnection` folds X11 protocol errors
//! into the crate taxonomy on the way through: `BadWindow` becomes
//! `Error::WindowGone`, `BadAtom` becomes `Error::UnknownAtom`.

use x11rb::connection::Connection;
use x11rb::rust_connection::RustConnection;
use x11rb::protocol::randr::{self, NotifyMask};
use x11rb::protocol::xproto::{
    self, Atom, AtomEnum, ChangeWindowAttributesAux, ConfigureWindowAux, EventMask, PropMode,
    StackMode, Window,
};

use crate::error::Result;

/// Raw reply of a get-property round trip: the wire tuple minus the resolved
/// type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReply {
    pub type_atom: Atom,
    /// Item width in bits (8, 16 or 32).
    pub format: u8,
    /// Number of format-sized items (bytes for 8-bit data).
    pub item_count: u32,
    pub data: Vec<u8>,
}

/// Window geometry as reported by the server, relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// Blocking request/response operations this crate needs from a windowing
/// connection. Implemented for x11rb's `RustConnection`; tests substitute a
/// recording fake.
pub trait DisplayConnection {
    /// Resolve a name to an atom. With `only_if_exists` the server never
    /// creates the atom and `None` reports its absence; without it an atom is
    /// always returned.
    fn intern_atom(&self, name: &str, only_if_exists: bool) -> Result<Option<Atom>>;

    /// Inverse lookup. Fails with `Error::UnknownAtom` for ids the server
    /// does not know.
    fn atom_name(&self, atom: Atom) -> Result<String>;

    /// Fetch up to `max_words` 32-bit words of a property, any type. `None`
    /// means the property is not set on the window.
    fn get_property(
        &self,
        window: Window,
        property: Atom,
        max_words: u32,
    ) -> Result<Option<PropertyReply>>;

    /// Replace a property's value and type wholesale.
    fn change_property(
        &self,
        window: Window,
        property: Atom,
        type_atom: Atom,
        format: u8,
        item_count: u32,
        data: &[u8],
    ) -> Result<()>;

    /// Atoms of every property currently set on the window.
    fn list_properties(&self, window: Window) -> Result<Vec<Atom>>;

    /// Replace the core event mask selected for the window.
    fn select_core_events(&self, window: Window, mask: EventMask) -> Result<()>;

    /// Replace the RandR notify mask selected for the window.
    fn select_extension_events(&self, window: Window, mask: NotifyMask) -> Result<()>;

    fn flush(&self) -> Result<()>;

    // Thin window commands (callers flush separately).
    fn map_window(&self, window: Window) -> Result<()>;
    fn unmap_window(&self, window: Window) -> Result<()>;
    fn raise_window(&self, window: Window) -> Result<()>;
    fn move_resize_window(&self, window: Window, x: i32, y: i32, width: u32, height: u32)
    -> Result<()>;
    fn window_geometry(&self, window: Window) -> Result<Geometry>;
}

// Method names intentionally mirror the xproto requests, so calls inside this
// impl are fully qualified to stay unambiguous.
impl DisplayConnection for RustConnection {
    fn intern_atom(&self, name: &str, only_if_exists: bool) -> Result<Option<Atom>> {
        let reply = xproto::ConnectionExt::intern_atom(self, only_if_exists, name.as_bytes())?
            .reply()?;
        if reply.atom == x11rb::NONE {
            Ok(None)
        } else {
            Ok(Some(reply.atom))
        }
    }

    fn atom_name(&self, atom: Atom) -> Result<String> {
        let reply = xproto::ConnectionExt::get_atom_name(self, atom)?.reply()?;
        Ok(String::from_utf8_lossy(&reply.name).into_owned())
    }

    fn get_property(
        &self,
        window: Window,
        property: Atom,
        max_words: u32,
    ) -> Result<Option<PropertyReply>> {
        let reply = xproto::ConnectionExt::get_property(
            self,
            false,
            window,
            property,
            AtomEnum::ANY,
            0,
            max_words,
        )?
        .reply()?;
        if reply.type_ == x11rb::NONE {
            return Ok(None);
        }
        Ok(Some(PropertyReply {
            type_atom: reply.type_,
            format: reply.format,
            item_count: reply.value_len,
            data: reply.value,
        }))
    }

    fn change_property(
        &self,
        window: Window,
        property: Atom,
        type_atom: Atom,
        format: u8,
        item_count: u32,
        data: &[u8],
    ) -> Result<()> {
        xproto::ConnectionExt::change_property(
            self,
            PropMode::REPLACE,
            window,
            property,
            type_atom,
            format,
            item_count,
            data,
        )?
        .check()?;
        Ok(())
    }

    fn list_properties(&self, window: Window) -> Result<Vec<Atom>> {
        let reply = xproto::ConnectionExt::list_properties(self, window)?.reply()?;
        Ok(reply.atoms)
    }

    fn select_core_events(&self, window: Window, mask: EventMask) -> Result<()> {
        xproto::ConnectionExt::change_window_attributes(
            self,
            window,
            &ChangeWindowAttributesAux::new().event_mask(mask),
        )?
        .check()?;
        Ok(())
    }

    fn select_extension_events(&self, window: Window, mask: NotifyMask) -> Result<()> {
        randr::ConnectionExt::randr_select_input(self, window, mask)?.check()?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Connection::flush(self)?;
        Ok(())
    }

    fn map_window(&self, window: Window) -> Result<()> {
        xproto::ConnectionExt::map_window(self, window)?.check()?;
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<()> {
        xproto::ConnectionExt::unmap_window(self, window)?.check()?;
        Ok(())
    }

    fn raise_window(&self, window: Window) -> Result<()> {
        xproto::ConnectionExt::configure_window(
            self,
            window,
            &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
        )?
        .check()?;
        Ok(())
    }

    fn move_resize_window(
        &self,
        window: Window,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        xproto::ConnectionExt::configure_window(
            self,
            window,
            &ConfigureWindowAux::new().x(x).y(y).width(width).height(height),
        )?
        .check()?;
        Ok(())
    }

    fn window_geometry(&self, window: Window) -> Result<Geometry> {
        let reply = xproto::ConnectionExt::get_geometry(self, window)?.reply()?;
        Ok(Geometry {
            x: reply.x,
            y: reply.y,
            width: reply.width,
            height: reply.height,
        })
    }
}
