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


use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// The byte order of a directory family.
///
/// TIFF declares its byte order in the first two bytes of the header and
/// makernotes may switch to their own, so the order is a runtime value
/// that is threaded through every read and write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Motorola order ("MM").
    Big,
    /// Intel order ("II").
    Little,
}

impl Endian {
    /// Returns the byte order indicated by a two-byte TIFF mark.
    pub fn from_mark(mark: &[u8]) -> Option<Endian> {
        match mark.get(..2)? {
            b"MM" => Some(Endian::Big),
            b"II" => Some(Endian::Little),
            _ => None,
        }
    }

    /// Returns the two-byte TIFF mark of this byte order.
    #[inline]
    pub fn mark(self) -> [u8; 2] {
        match self {
            Endian::Big => *b"MM",
            Endian::Little => *b"II",
        }
    }

    #[inline]
    pub fn loadu16(self, buf: &[u8], offset: usize) -> Option<u16> {
        let b = buf.get(offset..offset.checked_add(2)?)?;
        Some(match self {
            Endian::Big => BigEndian::read_u16(b),
            Endian::Little => LittleEndian::read_u16(b),
        })
    }

    #[inline]
    pub fn loadu32(self, buf: &[u8], offset: usize) -> Option<u32> {
        let b = buf.get(offset..offset.checked_add(4)?)?;
        Some(match self {
            Endian::Big => BigEndian::read_u32(b),
            Endian::Little => LittleEndian::read_u32(b),
        })
    }

    #[inline]
    pub fn loadu64(self, buf: &[u8], offset: usize) -> Option<u64> {
        let b = buf.get(offset..offset.checked_add(8)?)?;
        Some(match self {
            Endian::Big => BigEndian::read_u64(b),
            Endian::Little => LittleEndian::read_u64(b),
        })
    }

    #[inline]
    pub fn writeu16(self, out: &mut Vec<u8>, v: u16) {
        let mut b = [0; 2];
        match self {
            Endian::Big => BigEndian::write_u16(&mut b, v),
            Endian::Little => LittleEndian::write_u16(&mut b, v),
        }
        out.extend_from_slice(&b);
    }

    #[inline]
    pub fn writeu32(self, out: &mut Vec<u8>, v: u32) {
        let mut b = [0; 4];
        match self {
            Endian::Big => BigEndian::write_u32(&mut b, v),
            Endian::Little => LittleEndian::write_u32(&mut b, v),
        }
        out.extend_from_slice(&b);
    }

    #[inline]
    pub fn writeu64(self, out: &mut Vec<u8>, v: u64) {
        let mut b = [0; 8];
        match self {
            Endian::Big => BigEndian::write_u64(&mut b, v),
            Endian::Little => LittleEndian::write_u64(&mut b, v),
        }
        out.extend_from_slice(&b);
    }

    /// Overwrites two bytes at `offset`, which must already exist.
    #[inline]
    pub fn patchu16(self, out: &mut [u8], offset: usize, v: u16) {
        let b = &mut out[offset..offset + 2];
        match self {
            Endian::Big => BigEndian::write_u16(b, v),
            Endian::Little => LittleEndian::write_u16(b, v),
        }
    }

    /// Overwrites four bytes at `offset`, which must already exist.
    #[inline]
    pub fn patchu32(self, out: &mut [u8], offset: usize, v: u32) {
        let b = &mut out[offset..offset + 4];
        match self {
            Endian::Big => BigEndian::write_u32(b, v),
            Endian::Little => LittleEndian::write_u32(b, v),
        }
    }
}
