//! Event names, mask requirements, and decoded event variants.
//!
//! Every subscribable event has a snake_case name, a required bit in the core
//! event-mask namespace and/or the RandR notify namespace, and a fixed
//! variant in `WindowEvent` with explicit named fields. The event-to-bit
//! mapping is many-to-one: the seven structure events all ride on
//! `STRUCTURE_NOTIFY`, and both focus events ride on `FOCUS_CHANGE`, so a bit
//! may be needed by several distinct event kinds at once (see `subscribe`).

use x11rb::protocol::Event;
use x11rb::protocol::randr::{self, NotifyMask};
use x11rb::protocol::xproto::{self, Atom, EventMask, Timestamp, Window};

/// Subscribable event kinds, one per routed wire event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyPress,
    KeyRelease,
    ButtonPress,
    ButtonRelease,
    MotionNotify,
    EnterNotify,
    LeaveNotify,
    FocusIn,
    FocusOut,
    Expose,
    VisibilityNotify,
    CreateNotify,
    DestroyNotify,
    UnmapNotify,
    MapNotify,
    ReparentNotify,
    ConfigureNotify,
    GravityNotify,
    CirculateNotify,
    PropertyNotify,
    ColormapNotify,
    ScreenChangeNotify,
    CrtcChangeNotify,
    OutputChangeNotify,
    OutputPropertyNotify,
}

impl EventKind {
    pub const ALL: [EventKind; 25] = [
        EventKind::KeyPress,
        EventKind::KeyRelease,
        EventKind::ButtonPress,
        EventKind::ButtonRelease,
        EventKind::MotionNotify,
        EventKind::EnterNotify,
        EventKind::LeaveNotify,
        EventKind::FocusIn,
        EventKind::FocusOut,
        EventKind::Expose,
        EventKind::VisibilityNotify,
        EventKind::CreateNotify,
        EventKind::DestroyNotify,
        EventKind::UnmapNotify,
        EventKind::MapNotify,
        EventKind::ReparentNotify,
        EventKind::ConfigureNotify,
        EventKind::GravityNotify,
        EventKind::CirculateNotify,
        EventKind::PropertyNotify,
        EventKind::ColormapNotify,
        EventKind::ScreenChangeNotify,
        EventKind::CrtcChangeNotify,
        EventKind::OutputChangeNotify,
        EventKind::OutputPropertyNotify,
    ];

    /// Look a kind up by its registration name; `None` for names outside the
    /// table.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "key_press" => Self::KeyPress,
            "key_release" => Self::KeyRelease,
            "button_press" => Self::ButtonPress,
            "button_release" => Self::ButtonRelease,
            "motion_notify" => Self::MotionNotify,
            "enter_notify" => Self::EnterNotify,
            "leave_notify" => Self::LeaveNotify,
            "focus_in" => Self::FocusIn,
            "focus_out" => Self::FocusOut,
            "expose" => Self::Expose,
            "visibility_notify" => Self::VisibilityNotify,
            "create_notify" => Self::CreateNotify,
            "destroy_notify" => Self::DestroyNotify,
            "unmap_notify" => Self::UnmapNotify,
            "map_notify" => Self::MapNotify,
            "reparent_notify" => Self::ReparentNotify,
            "configure_notify" => Self::ConfigureNotify,
            "gravity_notify" => Self::GravityNotify,
            "circulate_notify" => Self::CirculateNotify,
            "property_notify" => Self::PropertyNotify,
            "colormap_notify" => Self::ColormapNotify,
            "screen_change_notify" => Self::ScreenChangeNotify,
            "crtc_change_notify" => Self::CrtcChangeNotify,
            "output_change_notify" => Self::OutputChangeNotify,
            "output_property_notify" => Self::OutputPropertyNotify,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::KeyPress => "key_press",
            Self::KeyRelease => "key_release",
            Self::ButtonPress => "button_press",
            Self::ButtonRelease => "button_release",
            Self::MotionNotify => "motion_notify",
            Self::EnterNotify => "enter_notify",
            Self::LeaveNotify => "leave_notify",
            Self::FocusIn => "focus_in",
            Self::FocusOut => "focus_out",
            Self::Expose => "expose",
            Self::VisibilityNotify => "visibility_notify",
            Self::CreateNotify => "create_notify",
            Self::DestroyNotify => "destroy_notify",
            Self::UnmapNotify => "unmap_notify",
            Self::MapNotify => "map_notify",
            Self::ReparentNotify => "reparent_notify",
            Self::ConfigureNotify => "configure_notify",
            Self::GravityNotify => "gravity_notify",
            Self::CirculateNotify => "circulate_notify",
            Self::PropertyNotify => "property_notify",
            Self::ColormapNotify => "colormap_notify",
            Self::ScreenChangeNotify => "screen_change_notify",
            Self::CrtcChangeNotify => "crtc_change_notify",
            Self::OutputChangeNotify => "output_change_notify",
            Self::OutputPropertyNotify => "output_property_notify",
        }
    }

    /// Mask bits this event requires, in the core and RandR namespaces. One
    /// side is zero for every kind; an event never spans both.
    pub fn masks(self) -> (EventMask, NotifyMask) {
        let no_ext = NotifyMask::from(0u8);
        match self {
            Self::KeyPress => (EventMask::KEY_PRESS, no_ext),
            Self::KeyRelease => (EventMask::KEY_RELEASE, no_ext),
            Self::ButtonPress => (EventMask::BUTTON_PRESS, no_ext),
            Self::ButtonRelease => (EventMask::BUTTON_RELEASE, no_ext),
            Self::MotionNotify => (EventMask::POINTER_MOTION, no_ext),
            Self::EnterNotify => (EventMask::ENTER_WINDOW, no_ext),
            Self::LeaveNotify => (EventMask::LEAVE_WINDOW, no_ext),
            Self::FocusIn | Self::FocusOut => (EventMask::FOCUS_CHANGE, no_ext),
            Self::Expose => (EventMask::EXPOSURE, no_ext),
            Self::VisibilityNotify => (EventMask::VISIBILITY_CHANGE, no_ext),
            Self::CreateNotify => (EventMask::SUBSTRUCTURE_NOTIFY, no_ext),
            Self::DestroyNotify
            | Self::UnmapNotify
            | Self::MapNotify
            | Self::ReparentNotify
            | Self::ConfigureNotify
            | Self::GravityNotify
            | Self::CirculateNotify => (EventMask::STRUCTURE_NOTIFY, no_ext),
            Self::PropertyNotify => (EventMask::PROPERTY_CHANGE, no_ext),
            Self::ColormapNotify => (EventMask::COLOR_MAP_CHANGE, no_ext),
            Self::ScreenChangeNotify => (EventMask::NO_EVENT, NotifyMask::SCREEN_CHANGE),
            Self::CrtcChangeNotify => (EventMask::NO_EVENT, NotifyMask::CRTC_CHANGE),
            Self::OutputChangeNotify => (EventMask::NO_EVENT, NotifyMask::OUTPUT_CHANGE),
            Self::OutputPropertyNotify => (EventMask::NO_EVENT, NotifyMask::OUTPUT_PROPERTY),
        }
    }
}

/// A routed event, decoded into a fixed variant with named fields.
///
/// Fields a given wire event does not carry simply do not exist on its
/// variant; the cross-cutting accessors below answer `None` for them instead
/// of pretending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    KeyPress {
        window: Window,
        keycode: u8,
        x: i16,
        y: i16,
        state: u16,
        time: Timestamp,
    },
    KeyRelease {
        window: Window,
        keycode: u8,
        x: i16,
        y: i16,
        state: u16,
        time: Timestamp,
    },
    ButtonPress {
        window: Window,
        button: u8,
        x: i16,
        y: i16,
        state: u16,
        time: Timestamp,
    },
    ButtonRelease {
        window: Window,
        button: u8,
        x: i16,
        y: i16,
        state: u16,
        time: Timestamp,
    },
    MotionNotify {
        window: Window,
        x: i16,
        y: i16,
        state: u16,
        time: Timestamp,
    },
    EnterNotify {
        window: Window,
        x: i16,
        y: i16,
        time: Timestamp,
    },
    LeaveNotify {
        window: Window,
        x: i16,
        y: i16,
        time: Timestamp,
    },
    FocusIn {
        window: Window,
    },
    FocusOut {
        window: Window,
    },
    Expose {
        window: Window,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        count: u16,
    },
    VisibilityNotify {
        window: Window,
        state: u8,
    },
    CreateNotify {
        /// Parent the event was selected on; creation is a substructure event.
        window: Window,
        created: Window,
        x: i16,
        y: i16,
        width: u16,
        height: u16,
    },
    DestroyNotify {
        window: Window,
    },
    UnmapNotify {
        window: Window,
    },
    MapNotify {
        window: Window,
    },
    ReparentNotify {
        window: Window,
        parent: Window,
        x: i16,
        y: i16,
    },
    ConfigureNotify {
        window: Window,
        x: i16,
        y: i16,
        width: u16,
        height: u16,
        border_width: u16,
    },
    GravityNotify {
        window: Window,
        x: i16,
        y: i16,
    },
    CirculateNotify {
        window: Window,
        placed_on_top: bool,
    },
    PropertyNotify {
        window: Window,
        atom: Atom,
        time: Timestamp,
        deleted: bool,
    },
    ColormapNotify {
        window: Window,
        new_map: bool,
    },
    ScreenChangeNotify {
        window: Window,
        root: Window,
        width: u16,
        height: u16,
        mm_width: u16,
        mm_height: u16,
        time: Timestamp,
    },
    CrtcChangeNotify {
        window: Window,
        crtc: u32,
        x: i16,
        y: i16,
        width: u16,
        height: u16,
        time: Timestamp,
    },
    OutputChangeNotify {
        window: Window,
        output: u32,
        crtc: u32,
        connected: bool,
        time: Timestamp,
    },
    OutputPropertyNotify {
        window: Window,
        output: u32,
        atom: Atom,
        deleted: bool,
        time: Timestamp,
    },
}

impl WindowEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::KeyPress { .. } => EventKind::KeyPress,
            Self::KeyRelease { .. } => EventKind::KeyRelease,
            Self::ButtonPress { .. } => EventKind::ButtonPress,
            Self::ButtonRelease { .. } => EventKind::ButtonRelease,
            Self::MotionNotify { .. } => EventKind::MotionNotify,
            Self::EnterNotify { .. } => EventKind::EnterNotify,
            Self::LeaveNotify { .. } => EventKind::LeaveNotify,
            Self::FocusIn { .. } => EventKind::FocusIn,
            Self::FocusOut { .. } => EventKind::FocusOut,
            Self::Expose { .. } => EventKind::Expose,
            Self::VisibilityNotify { .. } => EventKind::VisibilityNotify,
            Self::CreateNotify { .. } => EventKind::CreateNotify,
            Self::DestroyNotify { .. } => EventKind::DestroyNotify,
            Self::UnmapNotify { .. } => EventKind::UnmapNotify,
            Self::MapNotify { .. } => EventKind::MapNotify,
            Self::ReparentNotify { .. } => EventKind::ReparentNotify,
            Self::ConfigureNotify { .. } => EventKind::ConfigureNotify,
            Self::GravityNotify { .. } => EventKind::GravityNotify,
            Self::CirculateNotify { .. } => EventKind::CirculateNotify,
            Self::PropertyNotify { .. } => EventKind::PropertyNotify,
            Self::ColormapNotify { .. } => EventKind::ColormapNotify,
            Self::ScreenChangeNotify { .. } => EventKind::ScreenChangeNotify,
            Self::CrtcChangeNotify { .. } => EventKind::CrtcChangeNotify,
            Self::OutputChangeNotify { .. } => EventKind::OutputChangeNotify,
            Self::OutputPropertyNotify { .. } => EventKind::OutputPropertyNotify,
        }
    }

    /// Window the event is routed to (the subscriber's window, not the child
    /// a substructure event reports on).
    pub fn window(&self) -> Window {
        match *self {
            Self::KeyPress { window, .. }
            | Self::KeyRelease { window, .. }
            | Self::ButtonPress { window, .. }
            | Self::ButtonRelease { window, .. }
            | Self::MotionNotify { window, .. }
            | Self::EnterNotify { window, .. }
            | Self::LeaveNotify { window, .. }
            | Self::FocusIn { window }
            | Self::FocusOut { window }
            | Self::Expose { window, .. }
            | Self::VisibilityNotify { window, .. }
            | Self::CreateNotify { window, .. }
            | Self::DestroyNotify { window }
            | Self::UnmapNotify { window }
            | Self::MapNotify { window }
            | Self::ReparentNotify { window, .. }
            | Self::ConfigureNotify { window, .. }
            | Self::GravityNotify { window, .. }
            | Self::CirculateNotify { window, .. }
            | Self::PropertyNotify { window, .. }
            | Self::ColormapNotify { window, .. }
            | Self::ScreenChangeNotify { window, .. }
            | Self::CrtcChangeNotify { window, .. }
            | Self::OutputChangeNotify { window, .. }
            | Self::OutputPropertyNotify { window, .. } => window,
        }
    }

    /// Atom named by the event, where one exists.
    pub fn atom(&self) -> Option<Atom> {
        match *self {
            Self::PropertyNotify { atom, .. } | Self::OutputPropertyNotify { atom, .. } => {
                Some(atom)
            }
            _ => None,
        }
    }

    /// Server timestamp, where the wire event carries one.
    pub fn time(&self) -> Option<Timestamp> {
        match *self {
            Self::KeyPress { time, .. }
            | Self::KeyRelease { time, .. }
            | Self::ButtonPress { time, .. }
            | Self::ButtonRelease { time, .. }
            | Self::MotionNotify { time, .. }
            | Self::EnterNotify { time, .. }
            | Self::LeaveNotify { time, .. }
            | Self::PropertyNotify { time, .. }
            | Self::ScreenChangeNotify { time, .. }
            | Self::CrtcChangeNotify { time, .. }
            | Self::OutputChangeNotify { time, .. }
            | Self::OutputPropertyNotify { time, .. } => Some(time),
            _ => None,
        }
    }

    /// Signed position carried by the event, where one exists.
    pub fn position(&self) -> Option<(i16, i16)> {
        match *self {
            Self::KeyPress { x, y, .. }
            | Self::KeyRelease { x, y, .. }
            | Self::ButtonPress { x, y, .. }
            | Self::ButtonRelease { x, y, .. }
            | Self::MotionNotify { x, y, .. }
            | Self::EnterNotify { x, y, .. }
            | Self::LeaveNotify { x, y, .. }
            | Self::CreateNotify { x, y, .. }
            | Self::ReparentNotify { x, y, .. }
            | Self::ConfigureNotify { x, y, .. }
            | Self::GravityNotify { x, y, .. }
            | Self::CrtcChangeNotify { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// Decode a raw protocol event into its routed variant; `None` for
    /// events this crate does not subscribe to.
    pub fn from_protocol(event: &Event) -> Option<Self> {
        Some(match event {
            Event::KeyPress(e) => Self::KeyPress {
                window: e.event,
                keycode: e.detail,
                x: e.event_x,
                y: e.event_y,
                state: u16::from(e.state),
                time: e.time,
            },
            Event::KeyRelease(e) => Self::KeyRelease {
                window: e.event,
                keycode: e.detail,
                x: e.event_x,
                y: e.event_y,
                state: u16::from(e.state),
                time: e.time,
            },
            Event::ButtonPress(e) => Self::ButtonPress {
                window: e.event,
                button: e.detail,
                x: e.event_x,
                y: e.event_y,
                state: u16::from(e.state),
                time: e.time,
            },
            Event::ButtonRelease(e) => Self::ButtonRelease {
                window: e.event,
                button: e.detail,
                x: e.event_x,
                y: e.event_y,
                state: u16::from(e.state),
                time: e.time,
            },
            Event::MotionNotify(e) => Self::MotionNotify {
                window: e.event,
                x: e.event_x,
                y: e.event_y,
                state: u16::from(e.state),
                time: e.time,
            },
            Event::EnterNotify(e) => Self::EnterNotify {
                window: e.event,
                x: e.event_x,
                y: e.event_y,
                time: e.time,
            },
            Event::LeaveNotify(e) => Self::LeaveNotify {
                window: e.event,
                x: e.event_x,
                y: e.event_y,
                time: e.time,
            },
            Event::FocusIn(e) => Self::FocusIn { window: e.event },
            Event::FocusOut(e) => Self::FocusOut { window: e.event },
            Event::Expose(e) => Self::Expose {
                window: e.window,
                x: e.x,
                y: e.y,
                width: e.width,
                height: e.height,
                count: e.count,
            },
            Event::VisibilityNotify(e) => Self::VisibilityNotify {
                window: e.window,
                state: u8::from(e.state),
            },
            Event::CreateNotify(e) => Self::CreateNotify {
                window: e.parent,
                created: e.window,
                x: e.x,
                y: e.y,
                width: e.width,
                height: e.height,
            },
            Event::DestroyNotify(e) => Self::DestroyNotify { window: e.event },
            Event::UnmapNotify(e) => Self::UnmapNotify { window: e.event },
            Event::MapNotify(e) => Self::MapNotify { window: e.event },
            Event::ReparentNotify(e) => Self::ReparentNotify {
                window: e.event,
                parent: e.parent,
                x: e.x,
                y: e.y,
            },
            Event::ConfigureNotify(e) => Self::ConfigureNotify {
                window: e.event,
                x: e.x,
                y: e.y,
                width: e.width,
                height: e.height,
                border_width: e.border_width,
            },
            Event::GravityNotify(e) => Self::GravityNotify {
                window: e.event,
                x: e.x,
                y: e.y,
            },
            Event::CirculateNotify(e) => Self::CirculateNotify {
                window: e.event,
                placed_on_top: e.place == xproto::Place::ON_TOP,
            },
            Event::PropertyNotify(e) => Self::PropertyNotify {
                window: e.window,
                atom: e.atom,
                time: e.time,
                deleted: e.state == xproto::Property::DELETE,
            },
            Event::ColormapNotify(e) => Self::ColormapNotify {
                window: e.window,
                new_map: e.new,
            },
            Event::RandrScreenChangeNotify(e) => Self::ScreenChangeNotify {
                window: e.request_window,
                root: e.root,
                width: e.width,
                height: e.height,
                mm_width: e.mwidth,
                mm_height: e.mheight,
                time: e.timestamp,
            },
            Event::RandrNotify(e) => {
                if e.sub_code == randr::Notify::CRTC_CHANGE {
                    let cc = e.u.as_cc();
                    Self::CrtcChangeNotify {
                        window: cc.window,
                        crtc: cc.crtc,
                        x: cc.x,
                        y: cc.y,
                        width: cc.width,
                        height: cc.height,
                        time: cc.timestamp,
                    }
                } else if e.sub_code == randr::Notify::OUTPUT_CHANGE {
                    let oc = e.u.as_oc();
                    Self::OutputChangeNotify {
                        window: oc.window,
                        output: oc.output,
                        crtc: oc.crtc,
                        connected: oc.connection == randr::Connection::CONNECTED,
                        time: oc.timestamp,
                    }
                } else if e.sub_code == randr::Notify::OUTPUT_PROPERTY {
                    let op = e.u.as_op();
                    Self::OutputPropertyNotify {
                        window: op.window,
                        output: op.output,
                        atom: op.atom,
                        deleted: op.status == xproto::Property::DELETE,
                        time: op.timestamp,
                    }
                } else {
                    return None;
                }
            }
            _ => return None,
        })
    }
}
