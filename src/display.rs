//! Connection-scoped facade.
//!
//! `Display` owns the pieces that must share one connection's lifetime: the
//! atom cache and the subscription registry. It is created with the
//! connection and torn down with it; there is no process-wide state.
//! `WindowHandle` is the per-window surface over properties, subscriptions,
//! and a few thin window commands.

use std::cell::RefCell;

use tracing::info;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use crate::atoms::AtomRegistry;
use crate::connection::{DisplayConnection, Geometry};
use crate::error::Result;
use crate::event::WindowEvent;
use crate::property;
use crate::subscribe::{HandlerId, Subscriptions};
use crate::value::Property;

pub struct Display<C: DisplayConnection> {
    conn: C,
    atoms: AtomRegistry,
    subscriptions: RefCell<Subscriptions>,
}

impl Display<RustConnection> {
    /// Connect to the X server named by `$DISPLAY`. Returns the display and
    /// the default screen number.
    pub fn open() -> Result<(Self, usize)> {
        let (conn, screen) = x11rb::connect(None)?;
        info!("connected to X server, default screen {}", screen);
        Ok((Self::new(conn), screen))
    }
}

impl<C: DisplayConnection> Display<C> {
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            atoms: AtomRegistry::new(),
            subscriptions: RefCell::new(Subscriptions::new()),
        }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn atoms(&self) -> &AtomRegistry {
        &self.atoms
    }

    pub fn window(&self, id: Window) -> WindowHandle<'_, C> {
        WindowHandle { display: self, id }
    }

    /// Feed one decoded event to the handlers subscribed to it; returns how
    /// many ran. Handlers must not call back into this display's
    /// subscription surface (`on`/`off`/`dispatch`) while running.
    pub fn dispatch(&self, event: &WindowEvent) -> usize {
        self.subscriptions.borrow_mut().dispatch(event)
    }

    /// Feed one raw protocol event from an external event pump. Events this
    /// crate does not route are ignored.
    pub fn dispatch_protocol(&self, event: &Event) -> usize {
        match WindowEvent::from_protocol(event) {
            Some(decoded) => self.dispatch(&decoded),
            None => 0,
        }
    }
}

/// Per-window surface of a `Display`.
pub struct WindowHandle<'a, C: DisplayConnection> {
    display: &'a Display<C>,
    id: Window,
}

impl<C: DisplayConnection> WindowHandle<'_, C> {
    pub fn id(&self) -> Window {
        self.id
    }

    /// Read a named property; `None` when it is not set.
    pub fn property(&self, name: &str) -> Result<Option<Property>> {
        property::get(&self.display.conn, &self.display.atoms, self.id, name)
    }

    /// Replace a named property, inferring the wire type from the value.
    pub fn set_property(&self, name: &str, value: impl Into<Property>) -> Result<()> {
        property::set(
            &self.display.conn,
            &self.display.atoms,
            self.id,
            name,
            &value.into(),
        )
    }

    /// Names of every property set on this window.
    pub fn property_names(&self) -> Result<Vec<String>> {
        property::all(&self.display.conn, &self.display.atoms, self.id)
    }

    /// Subscribe a handler to a named event on this window.
    pub fn on<F>(&self, event_name: &str, handler: F) -> Result<HandlerId>
    where
        F: FnMut(&WindowEvent) + 'static,
    {
        self.display.subscriptions.borrow_mut().register(
            &self.display.conn,
            self.id,
            event_name,
            handler,
        )
    }

    /// Drop a subscription made with [`WindowHandle::on`].
    pub fn off(&self, event_name: &str, id: HandlerId) -> Result<bool> {
        self.display.subscriptions.borrow_mut().unregister(
            &self.display.conn,
            self.id,
            event_name,
            id,
        )
    }

    pub fn map(&self) -> Result<()> {
        self.display.conn.map_window(self.id)?;
        self.display.conn.flush()
    }

    pub fn unmap(&self) -> Result<()> {
        self.display.conn.unmap_window(self.id)?;
        self.display.conn.flush()
    }

    pub fn raise(&self) -> Result<()> {
        self.display.conn.raise_window(self.id)?;
        self.display.conn.flush()
    }

    pub fn move_resize(&self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.display
            .conn
            .move_resize_window(self.id, x, y, width, height)?;
        self.display.conn.flush()
    }

    pub fn geometry(&self) -> Result<Geometry> {
        self.display.conn.window_geometry(self.id)
    }
}
