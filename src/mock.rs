//! Recording fake of `DisplayConnection` for tests.
//!
//! Keeps a tiny in-memory model of the server (atom table, property store)
//! and records every collaborator call so tests can assert on round-trip
//! counts and selected masks.

use std::cell::RefCell;
use std::collections::HashMap;

use x11rb::protocol::randr::NotifyMask;
use x11rb::protocol::xproto::{Atom, EventMask, Window};

use crate::connection::{DisplayConnection, Geometry, PropertyReply};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InternAtom {
        name: String,
        only_if_exists: bool,
    },
    GetAtomName(Atom),
    GetProperty {
        window: Window,
        property: Atom,
    },
    ChangeProperty {
        window: Window,
        property: Atom,
        type_atom: Atom,
        format: u8,
        item_count: u32,
        data: Vec<u8>,
    },
    ListProperties(Window),
    SelectCore {
        window: Window,
        mask: u32,
    },
    SelectExtension {
        window: Window,
        mask: u32,
    },
    Flush,
    MapWindow(Window),
    UnmapWindow(Window),
    RaiseWindow(Window),
    MoveResize {
        window: Window,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    GetGeometry(Window),
}

#[derive(Default)]
pub struct RecordingConnection {
    pub calls: RefCell<Vec<Call>>,
    atoms: RefCell<HashMap<String, Atom>>,
    names: RefCell<HashMap<Atom, String>>,
    next_atom: RefCell<Atom>,
    properties: RefCell<HashMap<(Window, Atom), PropertyReply>>,
    /// Windows that answer every request with `WindowGone`.
    pub gone_windows: RefCell<Vec<Window>>,
    /// When set, the next get-property request fails at transport level.
    pub fail_next_get: RefCell<bool>,
}

impl RecordingConnection {
    /// Seed a server-side atom without recording a call.
    pub fn define_atom(&self, name: &str) -> Atom {
        self.assign_atom(name)
    }

    /// Seed a property as if another client had set it.
    pub fn define_property(&self, window: Window, name: &str, reply: PropertyReply) {
        let atom = self.assign_atom(name);
        self.properties.borrow_mut().insert((window, atom), reply);
    }

    pub fn selected_core_mask(&self, window: Window) -> Option<u32> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::SelectCore { window: w, mask } if *w == window => Some(*mask),
                _ => None,
            })
    }

    pub fn selected_extension_mask(&self, window: Window) -> Option<u32> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::SelectExtension { window: w, mask } if *w == window => Some(*mask),
                _ => None,
            })
    }

    pub fn count_selects(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::SelectCore { .. } | Call::SelectExtension { .. }))
            .count()
    }

    fn assign_atom(&self, name: &str) -> Atom {
        if let Some(&atom) = self.atoms.borrow().get(name) {
            return atom;
        }
        let mut next = self.next_atom.borrow_mut();
        *next += 1;
        let atom = *next;
        self.atoms.borrow_mut().insert(name.to_owned(), atom);
        self.names.borrow_mut().insert(atom, name.to_owned());
        atom
    }

    fn check_window(&self, window: Window) -> Result<()> {
        if self.gone_windows.borrow().contains(&window) {
            Err(Error::WindowGone(window))
        } else {
            Ok(())
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl DisplayConnection for RecordingConnection {
    fn intern_atom(&self, name: &str, only_if_exists: bool) -> Result<Option<Atom>> {
        self.record(Call::InternAtom {
            name: name.to_owned(),
            only_if_exists,
        });
        if only_if_exists {
            Ok(self.atoms.borrow().get(name).copied())
        } else {
            Ok(Some(self.assign_atom(name)))
        }
    }

    fn atom_name(&self, atom: Atom) -> Result<String> {
        self.record(Call::GetAtomName(atom));
        self.names
            .borrow()
            .get(&atom)
            .cloned()
            .ok_or(Error::UnknownAtom(atom))
    }

    fn get_property(
        &self,
        window: Window,
        property: Atom,
        _max_words: u32,
    ) -> Result<Option<PropertyReply>> {
        self.record(Call::GetProperty { window, property });
        if std::mem::take(&mut *self.fail_next_get.borrow_mut()) {
            return Err(Error::Connection("simulated transport failure".into()));
        }
        self.check_window(window)?;
        Ok(self.properties.borrow().get(&(window, property)).cloned())
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
        self.record(Call::ChangeProperty {
            window,
            property,
            type_atom,
            format,
            item_count,
            data: data.to_vec(),
        });
        self.check_window(window)?;
        self.properties.borrow_mut().insert(
            (window, property),
            PropertyReply {
                type_atom,
                format,
                item_count,
                data: data.to_vec(),
            },
        );
        Ok(())
    }

    fn list_properties(&self, window: Window) -> Result<Vec<Atom>> {
        self.record(Call::ListProperties(window));
        self.check_window(window)?;
        let mut atoms: Vec<Atom> = self
            .properties
            .borrow()
            .keys()
            .filter(|(w, _)| *w == window)
            .map(|(_, atom)| *atom)
            .collect();
        atoms.sort_unstable();
        Ok(atoms)
    }

    fn select_core_events(&self, window: Window, mask: EventMask) -> Result<()> {
        self.check_window(window)?;
        self.record(Call::SelectCore {
            window,
            mask: u32::from(mask),
        });
        Ok(())
    }

    fn select_extension_events(&self, window: Window, mask: NotifyMask) -> Result<()> {
        self.check_window(window)?;
        self.record(Call::SelectExtension {
            window,
            mask: u32::from(mask),
        });
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.record(Call::Flush);
        Ok(())
    }

    fn map_window(&self, window: Window) -> Result<()> {
        self.check_window(window)?;
        self.record(Call::MapWindow(window));
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<()> {
        self.check_window(window)?;
        self.record(Call::UnmapWindow(window));
        Ok(())
    }

    fn raise_window(&self, window: Window) -> Result<()> {
        self.check_window(window)?;
        self.record(Call::RaiseWindow(window));
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
        self.check_window(window)?;
        self.record(Call::MoveResize {
            window,
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn window_geometry(&self, window: Window) -> Result<Geometry> {
        self.check_window(window)?;
        self.record(Call::GetGeometry(window));
        Ok(Geometry {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        })
    }
}
