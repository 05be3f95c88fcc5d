//! The closed attribute type vocabulary and its per-type text codec.
//!

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, UnsupportedTypeError};
use crate::localization::{TranslatedFSString, TranslatedString};

/// Kind of value an attribute carries.
///
/// The vocabulary is closed: the numeric ids are part of the on-disk format
/// and ids above [`AttributeType::MAX`] are rejected. v3 documents encode
/// attribute types by id, v4 documents by symbolic name; both mappings are
/// total bijections over this table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum AttributeType {
    /// Null type with no value
    None = 0,
    /// `uint8`
    Byte = 1,
    /// `int16`
    Short = 2,
    /// `uint16`
    UShort = 3,
    /// `int32`
    Int = 4,
    /// `uint32`
    UInt = 5,
    /// `float`
    Float = 6,
    /// `double`
    Double = 7,
    /// `ivec2`
    IVec2 = 8,
    /// `ivec3`
    IVec3 = 9,
    /// `ivec4`
    IVec4 = 10,
    /// `fvec2`
    Vec2 = 11,
    /// `fvec3`
    Vec3 = 12,
    /// `fvec4`
    Vec4 = 13,
    /// `mat2x2`, row-major
    Mat2 = 14,
    /// `mat3x3`, row-major
    Mat3 = 15,
    /// `mat3x4`, row-major
    Mat3x4 = 16,
    /// `mat4x3`, row-major
    Mat4x3 = 17,
    /// `mat4x4`, row-major
    Mat4 = 18,
    /// `bool`
    Bool = 19,
    /// `string`
    String = 20,
    /// `path`
    Path = 21,
    /// `FixedString`
    FixedString = 22,
    /// `LSString`
    LSString = 23,
    /// `uint64`
    ULongLong = 24,
    /// `ScratchBuffer`, an opaque byte buffer
    ScratchBuffer = 25,
    /// `old_int64`, kept distinct from `int64` for round-trip fidelity
    Long = 26,
    /// `int8`
    Int8 = 27,
    /// `TranslatedString`
    TranslatedString = 28,
    /// `WString`
    WString = 29,
    /// `LSWString`
    LSWString = 30,
    /// `guid`
    Uuid = 31,
    /// `int64`
    Int64 = 32,
    /// `TranslatedFSString`
    TranslatedFSString = 33,
}

impl AttributeType {
    /// Highest id defined in the type table
    pub const MAX: u32 = AttributeType::TranslatedFSString as u32;

    /// Numeric id used by v3 documents
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Symbolic name used by v4 documents
    pub fn name(self) -> &'static str {
        match self {
            AttributeType::None => "None",
            AttributeType::Byte => "uint8",
            AttributeType::Short => "int16",
            AttributeType::UShort => "uint16",
            AttributeType::Int => "int32",
            AttributeType::UInt => "uint32",
            AttributeType::Float => "float",
            AttributeType::Double => "double",
            AttributeType::IVec2 => "ivec2",
            AttributeType::IVec3 => "ivec3",
            AttributeType::IVec4 => "ivec4",
            AttributeType::Vec2 => "fvec2",
            AttributeType::Vec3 => "fvec3",
            AttributeType::Vec4 => "fvec4",
            AttributeType::Mat2 => "mat2x2",
            AttributeType::Mat3 => "mat3x3",
            AttributeType::Mat3x4 => "mat3x4",
            AttributeType::Mat4x3 => "mat4x3",
            AttributeType::Mat4 => "mat4x4",
            AttributeType::Bool => "bool",
            AttributeType::String => "string",
            AttributeType::Path => "path",
            AttributeType::FixedString => "FixedString",
            AttributeType::LSString => "LSString",
            AttributeType::ULongLong => "uint64",
            AttributeType::ScratchBuffer => "ScratchBuffer",
            AttributeType::Long => "old_int64",
            AttributeType::Int8 => "int8",
            AttributeType::TranslatedString => "TranslatedString",
            AttributeType::WString => "WString",
            AttributeType::LSWString => "LSWString",
            AttributeType::Uuid => "guid",
            AttributeType::Int64 => "int64",
            AttributeType::TranslatedFSString => "TranslatedFSString",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<AttributeType> {
        Ok(match s {
            "None" => AttributeType::None,
            "uint8" => AttributeType::Byte,
            "int16" => AttributeType::Short,
            "uint16" => AttributeType::UShort,
            "int32" => AttributeType::Int,
            "uint32" => AttributeType::UInt,
            "float" => AttributeType::Float,
            "double" => AttributeType::Double,
            "ivec2" => AttributeType::IVec2,
            "ivec3" => AttributeType::IVec3,
            "ivec4" => AttributeType::IVec4,
            "fvec2" => AttributeType::Vec2,
            "fvec3" => AttributeType::Vec3,
            "fvec4" => AttributeType::Vec4,
            "mat2x2" => AttributeType::Mat2,
            "mat3x3" => AttributeType::Mat3,
            "mat3x4" => AttributeType::Mat3x4,
            "mat4x3" => AttributeType::Mat4x3,
            "mat4x4" => AttributeType::Mat4,
            "bool" => AttributeType::Bool,
            "string" => AttributeType::String,
            "path" => AttributeType::Path,
            "FixedString" => AttributeType::FixedString,
            "LSString" => AttributeType::LSString,
            "uint64" => AttributeType::ULongLong,
            "ScratchBuffer" => AttributeType::ScratchBuffer,
            "old_int64" => AttributeType::Long,
            "int8" => AttributeType::Int8,
            "TranslatedString" => AttributeType::TranslatedString,
            "WString" => AttributeType::WString,
            "LSWString" => AttributeType::LSWString,
            "guid" => AttributeType::Uuid,
            "int64" => AttributeType::Int64,
            "TranslatedFSString" => AttributeType::TranslatedFSString,
            other => return Err(UnsupportedTypeError::Name(other.to_owned()).into()),
        })
    }
}

impl TryFrom<u32> for AttributeType {
    type Error = Error;

    fn try_from(id: u32) -> Result<AttributeType> {
        Ok(match id {
            0 => AttributeType::None,
            1 => AttributeType::Byte,
            2 => AttributeType::Short,
            3 => AttributeType::UShort,
            4 => AttributeType::Int,
            5 => AttributeType::UInt,
            6 => AttributeType::Float,
            7 => AttributeType::Double,
            8 => AttributeType::IVec2,
            9 => AttributeType::IVec3,
            10 => AttributeType::IVec4,
            11 => AttributeType::Vec2,
            12 => AttributeType::Vec3,
            13 => AttributeType::Vec4,
            14 => AttributeType::Mat2,
            15 => AttributeType::Mat3,
            16 => AttributeType::Mat3x4,
            17 => AttributeType::Mat4x3,
            18 => AttributeType::Mat4,
            19 => AttributeType::Bool,
            20 => AttributeType::String,
            21 => AttributeType::Path,
            22 => AttributeType::FixedString,
            23 => AttributeType::LSString,
            24 => AttributeType::ULongLong,
            25 => AttributeType::ScratchBuffer,
            26 => AttributeType::Long,
            27 => AttributeType::Int8,
            28 => AttributeType::TranslatedString,
            29 => AttributeType::WString,
            30 => AttributeType::LSWString,
            31 => AttributeType::Uuid,
            32 => AttributeType::Int64,
            33 => AttributeType::TranslatedFSString,
            other => return Err(UnsupportedTypeError::Id(other).into()),
        })
    }
}

/// A typed leaf value attached to a node.
///
/// The variant itself is the single source of truth for the attribute's
/// type, so a value can never disagree with its declared kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeValue {
    /// Null type, carries no value
    None,
    /// Unsigned 8-bit integer
    Byte(u8),
    /// Signed 16-bit integer
    Short(i16),
    /// Unsigned 16-bit integer
    UShort(u16),
    /// Signed 32-bit integer
    Int(i32),
    /// Unsigned 32-bit integer
    UInt(u32),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Integer vector of length 2
    IVec2([i32; 2]),
    /// Integer vector of length 3
    IVec3([i32; 3]),
    /// Integer vector of length 4
    IVec4([i32; 4]),
    /// Float vector of length 2
    Vec2([f32; 2]),
    /// Float vector of length 3
    Vec3([f32; 3]),
    /// Float vector of length 4
    Vec4([f32; 4]),
    /// 2x2 matrix, row-major
    Mat2([f32; 4]),
    /// 3x3 matrix, row-major
    Mat3([f32; 9]),
    /// 3x4 matrix, row-major
    Mat3x4([f32; 12]),
    /// 4x3 matrix, row-major
    Mat4x3([f32; 12]),
    /// 4x4 matrix, row-major
    Mat4([f32; 16]),
    /// Boolean
    Bool(bool),
    /// Plain string
    String(String),
    /// Filesystem path string
    Path(String),
    /// Interned string
    FixedString(String),
    /// Large string
    LSString(String),
    /// Unsigned 64-bit integer
    ULongLong(u64),
    /// Opaque byte buffer
    ScratchBuffer(Vec<u8>),
    /// Legacy signed 64-bit integer (`old_int64`)
    Long(i64),
    /// Signed 8-bit integer
    Int8(i8),
    /// Localized string
    TranslatedString(TranslatedString),
    /// Wide string
    WString(String),
    /// Large wide string
    LSWString(String),
    /// UUID
    Uuid(Uuid),
    /// Signed 64-bit integer
    Int64(i64),
    /// Localized template string with arguments
    TranslatedFSString(TranslatedFSString),
}

impl AttributeValue {
    /// Type tag matching this value's variant
    pub fn ty(&self) -> AttributeType {
        match self {
            AttributeValue::None => AttributeType::None,
            AttributeValue::Byte(_) => AttributeType::Byte,
            AttributeValue::Short(_) => AttributeType::Short,
            AttributeValue::UShort(_) => AttributeType::UShort,
            AttributeValue::Int(_) => AttributeType::Int,
            AttributeValue::UInt(_) => AttributeType::UInt,
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::Double(_) => AttributeType::Double,
            AttributeValue::IVec2(_) => AttributeType::IVec2,
            AttributeValue::IVec3(_) => AttributeType::IVec3,
            AttributeValue::IVec4(_) => AttributeType::IVec4,
            AttributeValue::Vec2(_) => AttributeType::Vec2,
            AttributeValue::Vec3(_) => AttributeType::Vec3,
            AttributeValue::Vec4(_) => AttributeType::Vec4,
            AttributeValue::Mat2(_) => AttributeType::Mat2,
            AttributeValue::Mat3(_) => AttributeType::Mat3,
            AttributeValue::Mat3x4(_) => AttributeType::Mat3x4,
            AttributeValue::Mat4x3(_) => AttributeType::Mat4x3,
            AttributeValue::Mat4(_) => AttributeType::Mat4,
            AttributeValue::Bool(_) => AttributeType::Bool,
            AttributeValue::String(_) => AttributeType::String,
            AttributeValue::Path(_) => AttributeType::Path,
            AttributeValue::FixedString(_) => AttributeType::FixedString,
            AttributeValue::LSString(_) => AttributeType::LSString,
            AttributeValue::ULongLong(_) => AttributeType::ULongLong,
            AttributeValue::ScratchBuffer(_) => AttributeType::ScratchBuffer,
            AttributeValue::Long(_) => AttributeType::Long,
            AttributeValue::Int8(_) => AttributeType::Int8,
            AttributeValue::TranslatedString(_) => AttributeType::TranslatedString,
            AttributeValue::WString(_) => AttributeType::WString,
            AttributeValue::LSWString(_) => AttributeType::LSWString,
            AttributeValue::Uuid(_) => AttributeType::Uuid,
            AttributeValue::Int64(_) => AttributeType::Int64,
            AttributeValue::TranslatedFSString(_) => AttributeType::TranslatedFSString,
        }
    }

    /// Decode `text` using the canonical encoding for `ty`.
    ///
    /// For the two localized string kinds only the inline text is set here;
    /// handle, version and arguments come from surrounding document
    /// structure and are filled in by the codec.
    pub fn from_text(ty: AttributeType, text: &str) -> Result<AttributeValue> {
        Ok(match ty {
            AttributeType::None => AttributeValue::None,
            AttributeType::Byte => AttributeValue::Byte(normalize_numeric(text)?.parse()?),
            AttributeType::Short => AttributeValue::Short(normalize_numeric(text)?.parse()?),
            AttributeType::UShort => AttributeValue::UShort(normalize_numeric(text)?.parse()?),
            AttributeType::Int => AttributeValue::Int(normalize_numeric(text)?.parse()?),
            AttributeType::UInt => AttributeValue::UInt(normalize_numeric(text)?.parse()?),
            AttributeType::Float => AttributeValue::Float(normalize_numeric(text)?.parse()?),
            AttributeType::Double => AttributeValue::Double(normalize_numeric(text)?.parse()?),
            AttributeType::IVec2 => AttributeValue::IVec2(parse_components(text)?),
            AttributeType::IVec3 => AttributeValue::IVec3(parse_components(text)?),
            AttributeType::IVec4 => AttributeValue::IVec4(parse_components(text)?),
            AttributeType::Vec2 => AttributeValue::Vec2(parse_components(text)?),
            AttributeType::Vec3 => AttributeValue::Vec3(parse_components(text)?),
            AttributeType::Vec4 => AttributeValue::Vec4(parse_components(text)?),
            AttributeType::Mat2 => AttributeValue::Mat2(parse_components(text)?),
            AttributeType::Mat3 => AttributeValue::Mat3(parse_components(text)?),
            AttributeType::Mat3x4 => AttributeValue::Mat3x4(parse_components(text)?),
            AttributeType::Mat4x3 => AttributeValue::Mat4x3(parse_components(text)?),
            AttributeType::Mat4 => AttributeValue::Mat4(parse_components(text)?),
            AttributeType::Bool => AttributeValue::Bool(parse_bool(text)?),
            AttributeType::String => AttributeValue::String(text.to_owned()),
            AttributeType::Path => AttributeValue::Path(text.to_owned()),
            AttributeType::FixedString => AttributeValue::FixedString(text.to_owned()),
            AttributeType::LSString => AttributeValue::LSString(text.to_owned()),
            AttributeType::ULongLong => {
                AttributeValue::ULongLong(normalize_numeric(text)?.parse()?)
            }
            AttributeType::ScratchBuffer => AttributeValue::ScratchBuffer(BASE64.decode(text)?),
            AttributeType::Long => AttributeValue::Long(normalize_numeric(text)?.parse()?),
            AttributeType::Int8 => AttributeValue::Int8(normalize_numeric(text)?.parse()?),
            AttributeType::TranslatedString => {
                AttributeValue::TranslatedString(TranslatedString {
                    handle: String::new(),
                    value: Some(text.to_owned()),
                    version: None,
                })
            }
            AttributeType::WString => AttributeValue::WString(text.to_owned()),
            AttributeType::LSWString => AttributeValue::LSWString(text.to_owned()),
            AttributeType::Uuid => AttributeValue::Uuid(Uuid::parse_str(text)?),
            AttributeType::Int64 => AttributeValue::Int64(normalize_numeric(text)?.parse()?),
            AttributeType::TranslatedFSString => {
                AttributeValue::TranslatedFSString(TranslatedFSString {
                    handle: String::new(),
                    value: text.to_owned(),
                    arguments: Vec::new(),
                })
            }
        })
    }
}

/// Canonical text encoding for each value kind.
///
/// Localized string kinds render their inline text only; the codec emits
/// handle, version and arguments through document structure instead.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::None => Ok(()),
            AttributeValue::Byte(v) => write!(f, "{v}"),
            AttributeValue::Short(v) => write!(f, "{v}"),
            AttributeValue::UShort(v) => write!(f, "{v}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::UInt(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Double(v) => write!(f, "{v}"),
            AttributeValue::IVec2(v) => fmt_components(f, v),
            AttributeValue::IVec3(v) => fmt_components(f, v),
            AttributeValue::IVec4(v) => fmt_components(f, v),
            AttributeValue::Vec2(v) => fmt_components(f, v),
            AttributeValue::Vec3(v) => fmt_components(f, v),
            AttributeValue::Vec4(v) => fmt_components(f, v),
            AttributeValue::Mat2(v) => fmt_components(f, v),
            AttributeValue::Mat3(v) => fmt_components(f, v),
            AttributeValue::Mat3x4(v) => fmt_components(f, v),
            AttributeValue::Mat4x3(v) => fmt_components(f, v),
            AttributeValue::Mat4(v) => fmt_components(f, v),
            AttributeValue::Bool(v) => f.write_str(if *v { "True" } else { "False" }),
            AttributeValue::String(v) => f.write_str(v),
            AttributeValue::Path(v) => f.write_str(v),
            AttributeValue::FixedString(v) => f.write_str(v),
            AttributeValue::LSString(v) => f.write_str(v),
            AttributeValue::ULongLong(v) => write!(f, "{v}"),
            AttributeValue::ScratchBuffer(v) => f.write_str(&BASE64.encode(v)),
            AttributeValue::Long(v) => write!(f, "{v}"),
            AttributeValue::Int8(v) => write!(f, "{v}"),
            AttributeValue::TranslatedString(v) => {
                f.write_str(v.value.as_deref().unwrap_or_default())
            }
            AttributeValue::WString(v) => f.write_str(v),
            AttributeValue::LSWString(v) => f.write_str(v),
            AttributeValue::Uuid(v) => write!(f, "{v}"),
            AttributeValue::Int64(v) => write!(f, "{v}"),
            AttributeValue::TranslatedFSString(v) => f.write_str(&v.value),
        }
    }
}

/// Numeric workarounds carried over from historical documents: empty strings
/// stand in for zero, and `0x`-prefixed values are hexadecimal.
fn normalize_numeric(text: &str) -> Result<Cow<'_, str>> {
    if text.is_empty() {
        Ok(Cow::Borrowed("0"))
    } else if let Some(hex) = text.strip_prefix("0x") {
        Ok(Cow::Owned(u64::from_str_radix(hex, 16)?.to_string()))
    } else {
        Ok(Cow::Borrowed(text))
    }
}

fn parse_bool(text: &str) -> Result<bool> {
    match text {
        "0" => Ok(false),
        "1" => Ok(true),
        _ if text.eq_ignore_ascii_case("true") => Ok(true),
        _ if text.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(Error::InvalidBool(other.to_owned())),
    }
}

/// Parse exactly `N` whitespace- or comma-separated components.
fn parse_components<T, const N: usize>(text: &str) -> Result<[T; N]>
where
    T: Copy + Default + FromStr,
    Error: From<T::Err>,
{
    let mut out = [T::default(); N];
    let mut found = 0;
    for part in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
    {
        if found < N {
            out[found] = part.parse()?;
        }
        found += 1;
    }

    if found != N {
        return Err(Error::ComponentCountMismatch {
            expected: N,
            found,
        });
    }

    Ok(out)
}

fn fmt_components<T: fmt::Display>(f: &mut fmt::Formatter<'_>, components: &[T]) -> fmt::Result {
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{component}")?;
    }
    Ok(())
}
