//
// Copyright (c) 2017 KAMADA Ken'ichi.
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


use crate::endian::Endian;
use crate::error::Error;
use crate::exif::Exif;
use crate::ifd::IfdStructure;
use crate::parser::{self, Parse};

/// A struct to parse TIFF/Exif directories and
/// create an `Exif` instance that holds the results.
///
/// # Examples
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use exif_ifd::{In, Reader, Tag};
/// let data = b"MM\0\x2a\0\0\0\x08\
///              \0\x01\x01\x0f\0\x02\0\0\0\x04Foo\0\0\0\0\0";
/// let exif = Reader::new().read_raw(data.to_vec())?;
/// let make = exif.get_entry(Tag::Make, In::PRIMARY).ok_or("no Make")?;
/// assert_eq!(make.as_ascii()?, "Foo");
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reader {
    options: parser::Options,
}

impl Reader {
    /// Constructs a new `Reader`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of directories followed in one chain
    /// (8 by default).  Directories past the limit are ignored.
    pub fn max_ifds(mut self, n: usize) -> Self {
        self.options.max_ifds = n;
        self
    }

    /// Sets the maximum nesting of sub-IFDs and makernotes (6 by
    /// default).  Deeper directories are kept as raw pointers.
    pub fn max_depth(mut self, n: usize) -> Self {
        self.options.max_depth = n;
        self
    }

    /// Enables or disables makernote decoding (enabled by default).
    /// Disabled makernotes are kept as raw bytes.
    pub fn decode_makernotes(mut self, yes: bool) -> Self {
        self.options.decode_makernotes = yes;
        self
    }

    /// Parses TIFF data that starts with its header.
    /// If an error occurred, `exif_ifd::Error` is returned.
    pub fn read_raw(&self, data: Vec<u8>) -> Result<Exif, Error> {
        self.read_tiff(&data)
    }

    /// Parses TIFF data that starts with its header.  The byte order is
    /// taken from the header.
    pub fn read_tiff(&self, data: &[u8]) -> Result<Exif, Error> {
        let mut parser = parser::Parser::new(self.options);
        parser.parse(data)?;
        Ok(Exif::new(parser.byte_order, parser.structure))
    }

    /// Parses the TIFF region that starts at `base_offset` in `bytes`,
    /// such as the payload of a JPEG APP1 segment after its "Exif\0\0"
    /// prefix.  The header must declare `byte_order`.
    pub fn decode_region(&self, bytes: &[u8], base_offset: usize, byte_order: Endian) -> Result<Exif, Error> {
        let data = bytes
            .get(base_offset..)
            .ok_or(Error::InvalidFormat("Region starts past the end"))?;
        let mut parser = parser::Parser::new(self.options);
        parser.parse_region(data, byte_order)?;
        Ok(Exif::new(byte_order, parser.structure))
    }

    /// Parses a directory chain that is not preceded by a TIFF header.
    /// Offsets in the directories are relative to `base`, and the first
    /// directory is at `start_offset` from it.
    pub fn parse(&self, bytes: &[u8], base: usize, start_offset: usize, byte_order: Endian) -> Result<IfdStructure, Error> {
        let data = bytes
            .get(base..)
            .ok_or(Error::InvalidFormat("Base past the end"))?;
        let mut parser = parser::Parser::new(self.options);
        parser.parse_directories(data, start_offset, byte_order)?;
        Ok(parser.structure)
    }
}
