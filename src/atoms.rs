//! Atom registry
//!
//! Bidirectional, memoized mapping between atom names and server-assigned
//! ids, scoped to one connection. The server never retires an atom, so the
//! cache is append-only and lives as long as the connection; both directions
//! are consulted before any round trip.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;
use x11rb::protocol::xproto::Atom;

use crate::connection::DisplayConnection;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct AtomRegistry {
    by_name: RefCell<HashMap<String, Atom>>,
    by_id: RefCell<HashMap<Atom, String>>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a name to its atom, creating it server-side on first sight.
    pub fn intern<C: DisplayConnection>(&self, conn: &C, name: &str) -> Result<Atom> {
        if let Some(&atom) = self.by_name.borrow().get(name) {
            return Ok(atom);
        }
        debug!("InternAtom round trip for `{}`", name);
        match conn.intern_atom(name, false)? {
            Some(atom) => {
                self.cache(name, atom);
                Ok(atom)
            }
            // The create variant always yields an atom; treat anything else
            // as a transport fault.
            None => Err(Error::Connection(format!(
                "intern of `{name}` returned no atom"
            ))),
        }
    }

    /// Resolve a name without creating the atom; `None` when the server does
    /// not know it.
    pub fn lookup<C: DisplayConnection>(&self, conn: &C, name: &str) -> Result<Option<Atom>> {
        if let Some(&atom) = self.by_name.borrow().get(name) {
            return Ok(Some(atom));
        }
        debug!("InternAtom (only-if-exists) round trip for `{}`", name);
        match conn.intern_atom(name, true)? {
            Some(atom) => {
                self.cache(name, atom);
                Ok(Some(atom))
            }
            None => Ok(None),
        }
    }

    /// Whether the name is interned on the server, without creating it.
    pub fn exists<C: DisplayConnection>(&self, conn: &C, name: &str) -> Result<bool> {
        Ok(self.lookup(conn, name)?.is_some())
    }

    /// Inverse lookup; `Error::UnknownAtom` for ids the server rejects.
    pub fn name_of<C: DisplayConnection>(&self, conn: &C, atom: Atom) -> Result<String> {
        if let Some(name) = self.by_id.borrow().get(&atom) {
            return Ok(name.clone());
        }
        debug!("GetAtomName round trip for atom {}", atom);
        let name = conn.atom_name(atom)?;
        self.cache(&name, atom);
        Ok(name)
    }

    fn cache(&self, name: &str, atom: Atom) {
        self.by_name.borrow_mut().insert(name.to_owned(), atom);
        self.by_id.borrow_mut().insert(atom, name.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, RecordingConnection};

    #[test]
    fn intern_is_cached_after_first_round_trip() {
        let conn = RecordingConnection::default();
        let atoms = AtomRegistry::new();

        let first = atoms.intern(&conn, "FOO").unwrap();
        let second = atoms.intern(&conn, "FOO").unwrap();

        assert_eq!(first, second);
        let intern_calls = conn
            .calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::InternAtom { name, .. } if name == "FOO"))
            .count();
        assert_eq!(intern_calls, 1);
    }

    #[test]
    fn lookup_never_creates_the_atom() {
        let conn = RecordingConnection::default();
        let atoms = AtomRegistry::new();

        assert_eq!(atoms.lookup(&conn, "MISSING").unwrap(), None);
        assert!(!atoms.exists(&conn, "MISSING").unwrap());

        let calls = conn.calls.borrow();
        assert!(calls.iter().all(|c| !matches!(
            c,
            Call::InternAtom {
                only_if_exists: false,
                ..
            }
        )));
    }

    #[test]
    fn lookup_hit_is_cached_and_seen_by_intern() {
        let conn = RecordingConnection::default();
        let server_atom = conn.define_atom("EXISTING");
        let atoms = AtomRegistry::new();

        assert_eq!(atoms.lookup(&conn, "EXISTING").unwrap(), Some(server_atom));
        // Served from cache: no further round trips.
        assert_eq!(atoms.intern(&conn, "EXISTING").unwrap(), server_atom);
        assert_eq!(conn.calls.borrow().len(), 1);
    }

    #[test]
    fn name_of_round_trips_once_then_caches() {
        let conn = RecordingConnection::default();
        let atom = conn.define_atom("WM_NAME");
        let atoms = AtomRegistry::new();

        assert_eq!(atoms.name_of(&conn, atom).unwrap(), "WM_NAME");
        assert_eq!(atoms.name_of(&conn, atom).unwrap(), "WM_NAME");

        let name_calls = conn
            .calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::GetAtomName(_)))
            .count();
        assert_eq!(name_calls, 1);
        // The reverse direction is primed too.
        assert_eq!(atoms.intern(&conn, "WM_NAME").unwrap(), atom);
    }

    #[test]
    fn name_of_unknown_id_is_an_error() {
        let conn = RecordingConnection::default();
        let atoms = AtomRegistry::new();

        match atoms.name_of(&conn, 9999) {
            Err(Error::UnknownAtom(id)) => assert_eq!(id, 9999),
            other => panic!("expected UnknownAtom, got {other:?}"),
        }
    }
}
