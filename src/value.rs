//! Property value model
//!
//! A window property holds a single tagged scalar, a non-empty homogeneous
//! list of scalars, or an opaque blob for wire types this crate does not
//! understand. The tag is attached at construction and alone decides the
//! wire representation; nothing ever probes runtime shape.

use x11rb::protocol::xproto::{Atom, Window};

/// One scalar property item. The variant fixes the wire type and item width
/// (see `codec`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Unsigned value, wire type `CARDINAL`, 32-bit.
    Cardinal(u32),
    /// Signed value, wire type `INTEGER`, 32-bit.
    Integer(i32),
    /// Reference to an interned atom, wire type `ATOM`, 32-bit.
    AtomRef(Atom),
    /// Reference to another window, wire type `WINDOW`, 32-bit.
    WindowRef(Window),
    /// Latin-1/binary string, wire type `STRING`, 8-bit.
    Latin(Vec<u8>),
    /// UTF-8 string, wire type `UTF8_STRING`, 8-bit.
    Utf8(String),
}

impl PropertyValue {
    /// Wire type name this value encodes as.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Cardinal(_) => "CARDINAL",
            PropertyValue::Integer(_) => "INTEGER",
            PropertyValue::AtomRef(_) => "ATOM",
            PropertyValue::WindowRef(_) => "WINDOW",
            PropertyValue::Latin(_) => "STRING",
            PropertyValue::Utf8(_) => "UTF8_STRING",
        }
    }

    /// Wire item width in bits.
    pub fn format(&self) -> u8 {
        match self {
            PropertyValue::Latin(_) | PropertyValue::Utf8(_) => 8,
            _ => 32,
        }
    }
}

/// A complete property value as read from or written to a window.
///
/// Decoding collapses one-item sequences into `Single`; a list is therefore
/// always two or more items on the way out, and must be non-empty and
/// homogeneous on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    Single(PropertyValue),
    List(Vec<PropertyValue>),
    /// Wire data of a type this crate does not understand, carried through
    /// byte-for-byte so callers that do understand it still can. Keeps the
    /// server-reported item count so re-encoding reproduces the wire tuple
    /// exactly.
    Opaque {
        type_name: String,
        format: u8,
        item_count: u32,
        data: Vec<u8>,
    },
}

impl Property {
    /// The scalar items, in order. Empty for opaque blobs.
    pub fn values(&self) -> &[PropertyValue] {
        match self {
            Property::Single(value) => std::slice::from_ref(value),
            Property::List(values) => values,
            Property::Opaque { .. } => &[],
        }
    }

    pub fn as_cardinal(&self) -> Option<u32> {
        match self {
            Property::Single(PropertyValue::Cardinal(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            Property::Single(PropertyValue::Utf8(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<PropertyValue> for Property {
    fn from(value: PropertyValue) -> Self {
        Property::Single(value)
    }
}

impl From<Vec<PropertyValue>> for Property {
    fn from(values: Vec<PropertyValue>) -> Self {
        Property::List(values)
    }
}

// Sign decides the numeric wire type, exactly as the get/set surface
// documents: non-negative is CARDINAL, negative is INTEGER.
impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        if value >= 0 {
            PropertyValue::Cardinal(value as u32)
        } else {
            PropertyValue::Integer(value)
        }
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Cardinal(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Utf8(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Utf8(value)
    }
}

impl From<i32> for Property {
    fn from(value: i32) -> Self {
        Property::Single(value.into())
    }
}

impl From<u32> for Property {
    fn from(value: u32) -> Self {
        Property::Single(value.into())
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::Single(value.into())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::Single(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_picks_the_numeric_type() {
        assert_eq!(PropertyValue::from(-1).type_name(), "INTEGER");
        assert_eq!(PropertyValue::from(0).type_name(), "CARDINAL");
        assert_eq!(PropertyValue::from(42).type_name(), "CARDINAL");
    }

    #[test]
    fn widths_follow_the_tag() {
        assert_eq!(PropertyValue::Utf8("x".into()).format(), 8);
        assert_eq!(PropertyValue::Latin(vec![0x78]).format(), 8);
        assert_eq!(PropertyValue::Cardinal(1).format(), 32);
        assert_eq!(PropertyValue::AtomRef(1).format(), 32);
        assert_eq!(PropertyValue::WindowRef(1).format(), 32);
    }

    #[test]
    fn single_exposes_one_value() {
        let prop = Property::from("hello");
        assert_eq!(prop.values().len(), 1);
        assert_eq!(prop.as_utf8(), Some("hello"));
        assert_eq!(prop.as_cardinal(), None);
    }
}
