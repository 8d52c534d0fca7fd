//! Wire codec for property values
//!
//! Pure, stateless conversion between a `Property` and the wire tuple
//! `(type name, item width, item count, bytes)`. No wire carries type
//! information at encode time, so the type is inferred from the value tags;
//! on decode the server-reported type name and width drive unpacking.
//!
//! Numeric items travel as 32-bit words in client byte order. String lists
//! pack as each string's bytes followed by a NUL, and their item count is the
//! resulting byte length, not the logical string count.

use tracing::warn;

use crate::error::{Error, Result};
use crate::value::{Property, PropertyValue};

/// Encoded wire form of a property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireValue {
    pub type_name: String,
    pub format: u8,
    pub item_count: u32,
    pub data: Vec<u8>,
}

/// Encode a property for a change-property request. The wire type comes from
/// the first item; heterogeneous or empty sequences fail fast with
/// `Error::TypeMismatch`.
pub fn encode(property: &Property) -> Result<WireValue> {
    if let Property::Opaque {
        type_name,
        format,
        item_count,
        data,
    } = property
    {
        return Ok(WireValue {
            type_name: type_name.clone(),
            format: *format,
            item_count: *item_count,
            data: data.clone(),
        });
    }

    let items = property.values();
    let first = items.first().ok_or(Error::TypeMismatch {
        expected: "a non-empty sequence",
        found: "an empty sequence",
    })?;
    let type_name = first.type_name();
    let format = first.format();

    let mut data = Vec::new();
    for item in items {
        if item.type_name() != type_name {
            return Err(Error::TypeMismatch {
                expected: type_name,
                found: item.type_name(),
            });
        }
        match item {
            PropertyValue::Cardinal(v) => data.extend_from_slice(&v.to_ne_bytes()),
            PropertyValue::Integer(v) => data.extend_from_slice(&v.to_ne_bytes()),
            PropertyValue::AtomRef(v) | PropertyValue::WindowRef(v) => {
                data.extend_from_slice(&v.to_ne_bytes());
            }
            PropertyValue::Latin(bytes) => {
                data.extend_from_slice(bytes);
                data.push(0);
            }
            PropertyValue::Utf8(s) => {
                data.extend_from_slice(s.as_bytes());
                data.push(0);
            }
        }
    }

    let item_count = if format == 8 {
        data.len() as u32
    } else {
        items.len() as u32
    };
    Ok(WireValue {
        type_name: type_name.to_owned(),
        format,
        item_count,
        data,
    })
}

/// Decode a get-property reply. `None` means the property decoded to zero
/// items; unrecognized type names or widths come back as `Property::Opaque`
/// rather than failing, since the data may belong to an extension the caller
/// understands.
pub fn decode(type_name: &str, format: u8, item_count: u32, data: &[u8]) -> Option<Property> {
    let mut items: Vec<PropertyValue> = match type_name {
        "STRING" => split_strings(data)
            .into_iter()
            .map(|s| PropertyValue::Latin(s.to_vec()))
            .collect(),
        "UTF8_STRING" => split_strings(data)
            .into_iter()
            .map(|s| PropertyValue::Utf8(String::from_utf8_lossy(s).into_owned()))
            .collect(),
        "CARDINAL" | "INTEGER" | "ATOM" | "WINDOW" => {
            match decode_words(type_name, format, item_count, data) {
                Some(items) => items,
                None => return Some(opaque(type_name, format, item_count, data)),
            }
        }
        _ => {
            warn!(
                "unhandled property type `{}`, passing {} bytes through",
                type_name,
                data.len()
            );
            return Some(opaque(type_name, format, item_count, data));
        }
    };

    match items.len() {
        0 => None,
        1 => items.pop().map(Property::Single),
        _ => Some(Property::List(items)),
    }
}

fn opaque(type_name: &str, format: u8, item_count: u32, data: &[u8]) -> Property {
    Property::Opaque {
        type_name: type_name.to_owned(),
        format,
        item_count,
        data: data.to_vec(),
    }
}

fn stride_for(format: u8) -> Option<usize> {
    match format {
        8 => Some(1),
        16 => Some(2),
        32 => Some(4),
        _ => None,
    }
}

/// Split NUL-separated string data, dropping the empty segment the terminal
/// NUL produces.
fn split_strings(data: &[u8]) -> Vec<&[u8]> {
    let mut parts: Vec<&[u8]> = data.split(|&b| b == 0).collect();
    if parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

fn decode_words(
    type_name: &str,
    format: u8,
    item_count: u32,
    data: &[u8],
) -> Option<Vec<PropertyValue>> {
    let stride = stride_for(format)?;
    let count = (item_count as usize).min(data.len() / stride);
    let mut items = Vec::with_capacity(count);
    for chunk in data.chunks_exact(stride).take(count) {
        let word: u32 = match stride {
            1 => u32::from(chunk[0]),
            2 => u32::from(u16::from_ne_bytes([chunk[0], chunk[1]])),
            _ => u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
        };
        items.push(match type_name {
            "INTEGER" => PropertyValue::Integer(match stride {
                1 => i32::from(chunk[0] as i8),
                2 => i32::from(i16::from_ne_bytes([chunk[0], chunk[1]])),
                _ => word as i32,
            }),
            "ATOM" => PropertyValue::AtomRef(word),
            "WINDOW" => PropertyValue::WindowRef(word),
            _ => PropertyValue::Cardinal(word),
        });
    }
    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(property: Property) {
        let wire = encode(&property).unwrap();
        let decoded = decode(&wire.type_name, wire.format, wire.item_count, &wire.data);
        assert_eq!(decoded, Some(property));
    }

    #[test]
    fn bare_values_round_trip() {
        round_trip(Property::Single(PropertyValue::Cardinal(7)));
        round_trip(Property::Single(PropertyValue::Integer(-7)));
        round_trip(Property::Single(PropertyValue::AtomRef(68)));
        round_trip(Property::Single(PropertyValue::WindowRef(0x2200001)));
        round_trip(Property::Single(PropertyValue::Latin(b"latin".to_vec())));
        round_trip(Property::Single(PropertyValue::Utf8("grün".into())));
    }

    #[test]
    fn lists_round_trip() {
        round_trip(Property::List(vec![
            PropertyValue::Cardinal(0),
            PropertyValue::Cardinal(u32::MAX),
        ]));
        round_trip(Property::List(vec![
            PropertyValue::Integer(-1),
            PropertyValue::Integer(-2),
        ]));
        round_trip(Property::List(vec![
            PropertyValue::AtomRef(1),
            PropertyValue::AtomRef(2),
            PropertyValue::AtomRef(3),
        ]));
        round_trip(Property::List(vec![
            PropertyValue::WindowRef(10),
            PropertyValue::WindowRef(20),
        ]));
        round_trip(Property::List(vec![
            PropertyValue::Utf8("a".into()),
            PropertyValue::Utf8("b".into()),
        ]));
        round_trip(Property::List(vec![
            PropertyValue::Latin(b"x".to_vec()),
            PropertyValue::Latin(b"yz".to_vec()),
        ]));
    }

    #[test]
    fn string_lists_pack_nul_separated() {
        let wire = encode(&Property::List(vec![
            PropertyValue::Utf8("a".into()),
            PropertyValue::Utf8("b".into()),
        ]))
        .unwrap();
        assert_eq!(wire.type_name, "UTF8_STRING");
        assert_eq!(wire.format, 8);
        assert_eq!(wire.data, b"a\0b\0");
        // Byte length, not string count.
        assert_eq!(wire.item_count, 4);
    }

    #[test]
    fn one_string_collapses_to_bare() {
        let decoded = decode("UTF8_STRING", 8, 2, b"a\0").unwrap();
        assert_eq!(decoded, Property::Single(PropertyValue::Utf8("a".into())));
    }

    #[test]
    fn two_strings_decode_to_a_list() {
        let decoded = decode("UTF8_STRING", 8, 4, b"a\0b\0").unwrap();
        assert_eq!(
            decoded,
            Property::List(vec![
                PropertyValue::Utf8("a".into()),
                PropertyValue::Utf8("b".into()),
            ])
        );
    }

    #[test]
    fn unterminated_final_string_still_decodes() {
        let decoded = decode("STRING", 8, 3, b"a\0b").unwrap();
        assert_eq!(
            decoded,
            Property::List(vec![
                PropertyValue::Latin(b"a".to_vec()),
                PropertyValue::Latin(b"b".to_vec()),
            ])
        );
    }

    #[test]
    fn empty_data_decodes_to_nothing() {
        assert_eq!(decode("UTF8_STRING", 8, 0, b""), None);
        assert_eq!(decode("CARDINAL", 32, 0, b""), None);
    }

    #[test]
    fn sixteen_bit_integers_are_sign_extended() {
        let data = (-2i16).to_ne_bytes();
        let decoded = decode("INTEGER", 16, 1, &data).unwrap();
        assert_eq!(decoded, Property::Single(PropertyValue::Integer(-2)));
    }

    #[test]
    fn short_data_is_not_over_read() {
        // Server claims four items but sent one word.
        let data = 5u32.to_ne_bytes();
        let decoded = decode("CARDINAL", 32, 4, &data).unwrap();
        assert_eq!(decoded, Property::Single(PropertyValue::Cardinal(5)));
    }

    #[test]
    fn unknown_type_passes_through_opaque() {
        let decoded = decode("_MOTIF_WM_HINTS", 32, 5, &[1, 2, 3, 4]).unwrap();
        let Property::Opaque {
            type_name,
            format,
            item_count,
            data,
        } = &decoded
        else {
            panic!("expected opaque passthrough, got {decoded:?}");
        };
        assert_eq!(type_name, "_MOTIF_WM_HINTS");
        assert_eq!(*format, 32);
        assert_eq!(*item_count, 5);
        assert_eq!(data, &[1, 2, 3, 4]);

        // And back out with the server-reported count intact.
        let wire = encode(&decoded).unwrap();
        assert_eq!(wire.type_name, "_MOTIF_WM_HINTS");
        assert_eq!(wire.data, vec![1, 2, 3, 4]);
        assert_eq!(wire.item_count, 5);
    }

    #[test]
    fn mixed_sequences_fail_fast() {
        let err = encode(&Property::List(vec![
            PropertyValue::Cardinal(0),
            PropertyValue::Integer(-1),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "CARDINAL",
                found: "INTEGER",
            }
        ));
    }

    #[test]
    fn empty_sequences_fail_fast() {
        assert!(matches!(
            encode(&Property::List(vec![])),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
