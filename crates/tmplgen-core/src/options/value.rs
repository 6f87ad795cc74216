//! Extension values decoded from raw options bytes.

use prost::bytes::Buf;
use prost::encoding::{decode_key, decode_varint, skip_field, DecodeContext, WireType};

use super::registry::ExtensionKind;
use crate::error::ExtensionError;

/// Value of a custom option as found in an options message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Registered, but not set on this options message
    Absent,
    String(String),
    Bool(bool),
    Int64(i64),
    /// Set, but declared with a type the accessors do not expose
    Unsupported,
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int64(value) => Some(*value),
            _ => None,
        }
    }
}

/// Decode field `number` from an options payload as `kind`.
///
/// Scalars follow protobuf merge rules: the last occurrence wins.
pub(crate) fn decode_extension(
    options: &[u8],
    number: i32,
    kind: ExtensionKind,
) -> Result<OptionValue, ExtensionError> {
    let mut buf = options;
    let mut value = OptionValue::Absent;

    while buf.has_remaining() {
        let (tag, wire_type) = decode_key(&mut buf)?;
        if i64::from(tag) != i64::from(number) {
            skip_field(wire_type, tag, &mut buf, DecodeContext::default())?;
            continue;
        }
        value = decode_value(&mut buf, tag, wire_type, number, kind)?;
    }

    Ok(value)
}

fn decode_value(
    buf: &mut &[u8],
    tag: u32,
    wire_type: WireType,
    number: i32,
    kind: ExtensionKind,
) -> Result<OptionValue, ExtensionError> {
    match kind {
        ExtensionKind::String => {
            expect_wire_type(number, WireType::LengthDelimited, wire_type)?;
            let len = decode_varint(buf)? as usize;
            if len > buf.remaining() {
                return Err(ExtensionError::Truncated { number });
            }
            let text = std::str::from_utf8(&buf[..len])
                .map_err(|_| ExtensionError::InvalidUtf8 { number })?
                .to_string();
            buf.advance(len);
            Ok(OptionValue::String(text))
        }
        ExtensionKind::Bool => {
            expect_wire_type(number, WireType::Varint, wire_type)?;
            Ok(OptionValue::Bool(decode_varint(buf)? != 0))
        }
        ExtensionKind::Int64 => {
            expect_wire_type(number, WireType::Varint, wire_type)?;
            Ok(OptionValue::Int64(decode_varint(buf)? as i64))
        }
        ExtensionKind::Sint64 => {
            expect_wire_type(number, WireType::Varint, wire_type)?;
            let raw = decode_varint(buf)?;
            Ok(OptionValue::Int64(((raw >> 1) as i64) ^ -((raw & 1) as i64)))
        }
        ExtensionKind::Sfixed64 => {
            expect_wire_type(number, WireType::SixtyFourBit, wire_type)?;
            if buf.remaining() < 8 {
                return Err(ExtensionError::Truncated { number });
            }
            Ok(OptionValue::Int64(buf.get_i64_le()))
        }
        ExtensionKind::Other(_) => {
            skip_field(wire_type, tag, buf, DecodeContext::default())?;
            Ok(OptionValue::Unsupported)
        }
    }
}

fn expect_wire_type(
    number: i32,
    expected: WireType,
    found: WireType,
) -> Result<(), ExtensionError> {
    if expected == found {
        Ok(())
    } else {
        Err(ExtensionError::WireTypeMismatch {
            number,
            expected: format!("{:?}", expected),
            found: format!("{:?}", found),
        })
    }
}
