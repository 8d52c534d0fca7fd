//! Per-window event subscription registry.
//!
//! Tracks which handlers want which events on which window, keeps the two
//! server-side masks (core and RandR) equal to exactly what the registered
//! handlers require, and routes decoded events to their handlers in
//! registration order.
//!
//! Mask bits are shared state: several event kinds can require the same bit,
//! so removal re-derives the masks from the surviving buckets instead of
//! keeping per-handler counts. A bit is cleared only once no bucket on the
//! window needs it.

use std::collections::HashMap;

use tracing::debug;
use x11rb::protocol::randr::NotifyMask;
use x11rb::protocol::xproto::{EventMask, Window};

use crate::connection::DisplayConnection;
use crate::error::{Error, Result};
use crate::event::{EventKind, WindowEvent};

/// Token identifying one handler registration. Registering the same closure
/// twice yields two tokens and two invocations per dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&WindowEvent)>;

struct Registration {
    id: HandlerId,
    handler: Handler,
}

struct WindowSubscriptions {
    core_mask: EventMask,
    ext_mask: NotifyMask,
    buckets: HashMap<EventKind, Vec<Registration>>,
}

impl WindowSubscriptions {
    fn new() -> Self {
        Self {
            core_mask: EventMask::NO_EVENT,
            ext_mask: NotifyMask::from(0u8),
            buckets: HashMap::new(),
        }
    }

    /// Union of the bits the surviving buckets require.
    fn required_masks(&self) -> (EventMask, NotifyMask) {
        let mut core = EventMask::NO_EVENT;
        let mut ext = NotifyMask::from(0u8);
        for kind in self.buckets.keys() {
            let (c, x) = kind.masks();
            core = core | c;
            ext = ext | x;
        }
        (core, ext)
    }
}

/// Registry of handler subscriptions for every window of one connection.
pub struct Subscriptions {
    windows: HashMap<Window, WindowSubscriptions>,
    next_id: u64,
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriptions {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            next_id: 0,
        }
    }

    /// Subscribe a handler to a named event on a window. The server-side
    /// masks are updated (and flushed) before the handler is stored, so a
    /// `WindowGone` failure leaves the registry untouched.
    pub fn register<C, F>(
        &mut self,
        conn: &C,
        window: Window,
        event_name: &str,
        handler: F,
    ) -> Result<HandlerId>
    where
        C: DisplayConnection,
        F: FnMut(&WindowEvent) + 'static,
    {
        let kind = EventKind::from_name(event_name)
            .ok_or_else(|| Error::UnknownEvent(event_name.to_owned()))?;
        let (kind_core, kind_ext) = kind.masks();

        let (cur_core, cur_ext) = match self.windows.get(&window) {
            Some(subs) => (subs.core_mask, subs.ext_mask),
            None => (EventMask::NO_EVENT, NotifyMask::from(0u8)),
        };
        let want_core = cur_core | kind_core;
        let want_ext = cur_ext | kind_ext;
        if want_core != cur_core || want_ext != cur_ext {
            Self::select(conn, window, want_core, want_ext)?;
        }

        let id = HandlerId(self.next_id);
        self.next_id += 1;
        let subs = self
            .windows
            .entry(window)
            .or_insert_with(WindowSubscriptions::new);
        subs.core_mask = want_core;
        subs.ext_mask = want_ext;
        subs.buckets.entry(kind).or_default().push(Registration {
            id,
            handler: Box::new(handler),
        });
        Ok(id)
    }

    /// Drop one registration. Returns whether anything was removed; the
    /// masks are re-derived from the remaining buckets and re-selected only
    /// when a bit actually became unnecessary. Mirrors `register`: the
    /// server is told first, and a failed re-select leaves the registry
    /// untouched.
    pub fn unregister<C: DisplayConnection>(
        &mut self,
        conn: &C,
        window: Window,
        event_name: &str,
        id: HandlerId,
    ) -> Result<bool> {
        let kind = EventKind::from_name(event_name)
            .ok_or_else(|| Error::UnknownEvent(event_name.to_owned()))?;
        let Some(subs) = self.windows.get_mut(&window) else {
            return Ok(false);
        };
        let Some(bucket) = subs.buckets.get(&kind) else {
            return Ok(false);
        };
        if !bucket.iter().any(|registration| registration.id == id) {
            return Ok(false);
        }

        // Masks as they will be once this registration is gone.
        let bucket_empties = bucket.len() == 1;
        let mut need_core = EventMask::NO_EVENT;
        let mut need_ext = NotifyMask::from(0u8);
        for k in subs.buckets.keys() {
            if bucket_empties && *k == kind {
                continue;
            }
            let (c, x) = k.masks();
            need_core = need_core | c;
            need_ext = need_ext | x;
        }
        if need_core != subs.core_mask || need_ext != subs.ext_mask {
            Self::select(conn, window, need_core, need_ext)?;
        }

        if bucket_empties {
            subs.buckets.remove(&kind);
        } else if let Some(bucket) = subs.buckets.get_mut(&kind) {
            bucket.retain(|registration| registration.id != id);
        }
        subs.core_mask = need_core;
        subs.ext_mask = need_ext;
        if subs.buckets.is_empty() {
            self.windows.remove(&window);
        }
        Ok(true)
    }

    /// Route a decoded event to every handler subscribed to its kind on its
    /// window, in registration order; returns how many ran. Handlers cannot
    /// call back into this registry while it dispatches (it is exclusively
    /// borrowed for the duration).
    pub fn dispatch(&mut self, event: &WindowEvent) -> usize {
        let Some(subs) = self.windows.get_mut(&event.window()) else {
            return 0;
        };
        let Some(bucket) = subs.buckets.get_mut(&event.kind()) else {
            return 0;
        };
        for registration in bucket.iter_mut() {
            (registration.handler)(event);
        }
        bucket.len()
    }

    fn select<C: DisplayConnection>(
        conn: &C,
        window: Window,
        core: EventMask,
        ext: NotifyMask,
    ) -> Result<()> {
        debug!(
            "window {:#x}: selecting core mask {:#x}, randr mask {:#x}",
            window,
            u32::from(core),
            u32::from(ext)
        );
        conn.select_core_events(window, core)?;
        conn.select_extension_events(window, ext)?;
        conn.flush()
    }
}
