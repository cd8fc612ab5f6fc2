//
// Copyright (c) 2016 KAMADA Ken'ichi.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
// 1. Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
// 2. Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE AUTHOR AND CONTRIBUTORS ``AS IS'' AND
// ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED.  IN NO EVENT SHALL THE AUTHOR OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS
// OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION)
// HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT
// LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY
// OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF
// SUCH DAMAGE.
//


use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::endian::Endian;
use crate::ifd::IfdStructure;
use crate::makernote::Makernote;

/// A TIFF field type code [TIFF6 Section 2, EXIF23 4.6.2].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u16)]
pub enum EntryType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    /// An offset to a child IFD [TIFF Technical Note 1].
    Ifd = 13,
}

impl EntryType {
    /// Returns the type for a type code, or None if the code is unknown.
    #[inline]
    pub fn from_code(code: u16) -> Option<EntryType> {
        EntryType::from_u16(code)
    }

    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Returns the size in bytes of one element of this type.
    pub fn unit_size(self) -> usize {
        match self {
            EntryType::Byte | EntryType::Ascii | EntryType::SByte | EntryType::Undefined => 1,
            EntryType::Short | EntryType::SShort => 2,
            EntryType::Long | EntryType::SLong | EntryType::Float | EntryType::Ifd => 4,
            EntryType::Rational | EntryType::SRational | EntryType::Double => 8,
        }
    }

    /// Returns the number of payload bytes for `count` elements, or
    /// None if it overflows.
    #[inline]
    pub fn payload_len(self, count: u32) -> Option<usize> {
        self.unit_size().checked_mul(count as usize)
    }
}

/// An unsigned rational number, which is a pair of 32-bit unsigned integers.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: u32,
    pub denom: u32,
}

impl Rational {
    /// Converts the value to an f64.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl From<(u32, u32)> for Rational {
    fn from(t: (u32, u32)) -> Rational {
        Rational {
            num: t.0,
            denom: t.1,
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rational({}/{})", self.num, self.denom)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// A signed rational number, which is a pair of 32-bit signed integers.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SRational {
    pub num: i32,
    pub denom: i32,
}

impl SRational {
    /// Converts the value to an f64.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl From<(i32, i32)> for SRational {
    fn from(t: (i32, i32)) -> SRational {
        SRational {
            num: t.0,
            denom: t.1,
        }
    }
}

impl fmt::Debug for SRational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SRational({}/{})", self.num, self.denom)
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// The payload of a directory entry.
///
/// The type code and the count of an entry are derived from its value,
/// so they cannot disagree with the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Vector of 8-bit unsigned integers.
    Byte(Vec<u8>),
    /// The raw bytes of an ASCII field, NUL terminators included.
    ///
    /// The bytes are kept as they were read so that padding and
    /// non-conforming contents round-trip.  Use `Entry::as_ascii` for
    /// the string.
    Ascii(Vec<u8>),
    /// Vector of 16-bit unsigned integers.
    Short(Vec<u16>),
    /// Vector of 32-bit unsigned integers.
    Long(Vec<u32>),
    /// Vector of unsigned rationals.
    Rational(Vec<Rational>),
    /// Vector of 8-bit signed integers.
    SByte(Vec<i8>),
    /// Opaque bytes.
    Undefined(Vec<u8>),
    /// Vector of 16-bit signed integers.
    SShort(Vec<i16>),
    /// Vector of 32-bit signed integers.
    SLong(Vec<i32>),
    /// Vector of signed rationals.
    SRational(Vec<SRational>),
    /// Vector of 32-bit (single precision) floating-point numbers.
    Float(Vec<f32>),
    /// Vector of 64-bit (double precision) floating-point numbers.
    Double(Vec<f64>),
    /// IFD offsets that are not followed (type 13 outside the known
    /// pointer tags).
    Ifd(Vec<u32>),
    /// A child directory that the reader followed.
    SubIfd(SubIfd),
    /// A vendor makernote.
    Makernote(Box<Makernote>),
    /// Out-of-line data addressed by an offset entry (the JPEG
    /// thumbnail).  The offset is recomputed on write.
    Thumbnail(Thumbnail),
    /// An entry that could not be decoded.  It is written back as it
    /// was read.
    Opaque(Opaque),
}

/// A child directory and the type code of the pointer that led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubIfd {
    /// `Long` or `Ifd`.
    pub pointer_type: EntryType,
    pub structure: IfdStructure,
}

impl SubIfd {
    /// Returns an empty child directory with a LONG pointer.
    pub fn new() -> SubIfd {
        SubIfd {
            pointer_type: EntryType::Long,
            structure: IfdStructure::new(),
        }
    }
}

impl Default for SubIfd {
    fn default() -> SubIfd {
        SubIfd::new()
    }
}

/// Out-of-line data with the type code of its offset entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    /// `Long` normally.
    pub pointer_type: EntryType,
    pub data: Vec<u8>,
}

/// Why an entry was kept opaque.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpaqueReason {
    /// The type code is not one of the TIFF types.
    UnknownType,
    /// The payload does not fit in the buffer.
    OutOfBounds,
    /// The entry points to a directory that could not be read.
    BadDirectory,
}

/// The undecoded record of an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Opaque {
    pub type_code: u16,
    pub count: u32,
    /// The value-or-offset field exactly as it was read.
    pub field: [u8; 4],
    pub reason: OpaqueReason,
}

impl Value {
    /// Returns the type of the value as written in the entry record.
    /// Opaque values return None; their raw code is kept in `Opaque`.
    pub fn entry_type(&self) -> Option<EntryType> {
        Some(match *self {
            Value::Byte(_) => EntryType::Byte,
            Value::Ascii(_) => EntryType::Ascii,
            Value::Short(_) => EntryType::Short,
            Value::Long(_) => EntryType::Long,
            Value::Rational(_) => EntryType::Rational,
            Value::SByte(_) => EntryType::SByte,
            Value::Undefined(_) => EntryType::Undefined,
            Value::SShort(_) => EntryType::SShort,
            Value::SLong(_) => EntryType::SLong,
            Value::SRational(_) => EntryType::SRational,
            Value::Float(_) => EntryType::Float,
            Value::Double(_) => EntryType::Double,
            Value::Ifd(_) => EntryType::Ifd,
            Value::SubIfd(ref s) => s.pointer_type,
            Value::Makernote(ref m) => m.entry_type(),
            Value::Thumbnail(ref t) => t.pointer_type,
            Value::Opaque(_) => return None,
        })
    }

    /// Returns the raw type code.
    pub fn type_code(&self) -> u16 {
        match *self {
            Value::Opaque(ref o) => o.type_code,
            ref v => v.entry_type().map_or(0, EntryType::code),
        }
    }

    /// Returns the number of elements, which is what the count field
    /// of the record holds.
    pub fn count(&self) -> usize {
        match *self {
            Value::Byte(ref v) => v.len(),
            Value::Ascii(ref v) => v.len(),
            Value::Short(ref v) => v.len(),
            Value::Long(ref v) => v.len(),
            Value::Rational(ref v) => v.len(),
            Value::SByte(ref v) => v.len(),
            Value::Undefined(ref v) => v.len(),
            Value::SShort(ref v) => v.len(),
            Value::SLong(ref v) => v.len(),
            Value::SRational(ref v) => v.len(),
            Value::Float(ref v) => v.len(),
            Value::Double(ref v) => v.len(),
            Value::Ifd(ref v) => v.len(),
            Value::SubIfd(_) | Value::Thumbnail(_) => 1,
            // Only known once rendered; this is the read-time size.
            Value::Makernote(ref m) => m.len(),
            Value::Opaque(ref o) => o.count as usize,
        }
    }

    /// Returns a short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match *self {
            Value::Byte(_) => "BYTE",
            Value::Ascii(_) => "ASCII",
            Value::Short(_) => "SHORT",
            Value::Long(_) => "LONG",
            Value::Rational(_) => "RATIONAL",
            Value::SByte(_) => "SBYTE",
            Value::Undefined(_) => "UNDEFINED",
            Value::SShort(_) => "SSHORT",
            Value::SLong(_) => "SLONG",
            Value::SRational(_) => "SRATIONAL",
            Value::Float(_) => "FLOAT",
            Value::Double(_) => "DOUBLE",
            Value::Ifd(_) => "IFD",
            Value::SubIfd(_) => "sub-IFD",
            Value::Makernote(_) => "makernote",
            Value::Thumbnail(_) => "thumbnail",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Returns the unsigned integer at the given position.
    /// None is returned if the value type is not BYTE, SHORT, LONG or
    /// IFD, or the position is out of bounds.
    pub fn get_uint(&self, index: usize) -> Option<u32> {
        match *self {
            Value::Byte(ref v) => v.get(index).map(|&x| x as u32),
            Value::Short(ref v) => v.get(index).map(|&x| x as u32),
            Value::Long(ref v) | Value::Ifd(ref v) => v.get(index).copied(),
            _ => None,
        }
    }
}

/// Decodes `count` elements of type `typ` from `data[offset..]`.
/// The caller has checked that the payload fits in the buffer.
pub fn decode(typ: EntryType, e: Endian, data: &[u8], offset: usize, count: usize) -> Option<Value> {
    let end = offset.checked_add(typ.payload_len(count as u32)?)?;
    let bytes = data.get(offset..end)?;
    let unit = typ.unit_size();
    let chunks = bytes.chunks_exact(unit);
    Some(match typ {
        EntryType::Byte => Value::Byte(bytes.to_vec()),
        EntryType::Ascii => Value::Ascii(bytes.to_vec()),
        EntryType::Undefined => Value::Undefined(bytes.to_vec()),
        EntryType::SByte => Value::SByte(bytes.iter().map(|&b| b as i8).collect()),
        EntryType::Short => Value::Short(chunks.map(|c| e.loadu16(c, 0)).collect::<Option<_>>()?),
        EntryType::SShort => {
            Value::SShort(chunks.map(|c| e.loadu16(c, 0).map(|v| v as i16)).collect::<Option<_>>()?)
        }
        EntryType::Long => Value::Long(chunks.map(|c| e.loadu32(c, 0)).collect::<Option<_>>()?),
        EntryType::Ifd => Value::Ifd(chunks.map(|c| e.loadu32(c, 0)).collect::<Option<_>>()?),
        EntryType::SLong => {
            Value::SLong(chunks.map(|c| e.loadu32(c, 0).map(|v| v as i32)).collect::<Option<_>>()?)
        }
        EntryType::Float => {
            Value::Float(chunks.map(|c| e.loadu32(c, 0).map(f32::from_bits)).collect::<Option<_>>()?)
        }
        EntryType::Double => {
            Value::Double(chunks.map(|c| e.loadu64(c, 0).map(f64::from_bits)).collect::<Option<_>>()?)
        }
        EntryType::Rational => Value::Rational(
            chunks
                .map(|c| Some(Rational { num: e.loadu32(c, 0)?, denom: e.loadu32(c, 4)? }))
                .collect::<Option<_>>()?,
        ),
        EntryType::SRational => Value::SRational(
            chunks
                .map(|c| {
                    Some(SRational {
                        num: e.loadu32(c, 0)? as i32,
                        denom: e.loadu32(c, 4)? as i32,
                    })
                })
                .collect::<Option<_>>()?,
        ),
    })
}

/// Encodes a plain value.  Returns None for values whose bytes depend
/// on their position (sub-IFDs, makernotes, thumbnails) and for opaque
/// values; the writer lays those out itself.
pub fn compose(value: &Value, e: Endian) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    match *value {
        Value::Byte(ref v) | Value::Ascii(ref v) | Value::Undefined(ref v) => {
            buf.extend_from_slice(v)
        }
        Value::SByte(ref v) => buf.extend(v.iter().map(|&x| x as u8)),
        Value::Short(ref v) => v.iter().for_each(|&x| e.writeu16(&mut buf, x)),
        Value::SShort(ref v) => v.iter().for_each(|&x| e.writeu16(&mut buf, x as u16)),
        Value::Long(ref v) | Value::Ifd(ref v) => v.iter().for_each(|&x| e.writeu32(&mut buf, x)),
        Value::SLong(ref v) => v.iter().for_each(|&x| e.writeu32(&mut buf, x as u32)),
        Value::Float(ref v) => v.iter().for_each(|&x| e.writeu32(&mut buf, x.to_bits())),
        Value::Double(ref v) => v.iter().for_each(|&x| e.writeu64(&mut buf, x.to_bits())),
        Value::Rational(ref v) => v.iter().for_each(|x| {
            e.writeu32(&mut buf, x.num);
            e.writeu32(&mut buf, x.denom);
        }),
        Value::SRational(ref v) => v.iter().for_each(|x| {
            e.writeu32(&mut buf, x.num as u32);
            e.writeu32(&mut buf, x.denom as u32);
        }),
        Value::SubIfd(_) | Value::Makernote(_) | Value::Thumbnail(_) | Value::Opaque(_) => {
            return None
        }
    }
    Some(buf)
}
