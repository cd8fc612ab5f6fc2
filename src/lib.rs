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


//! A pure-Rust library to read, edit and rewrite TIFF/Exif image file
//! directories (IFDs).
//!
//! A TIFF region is parsed into an `IfdStructure`: the chain of
//! top-level directories, the sub-IFDs reached through pointer
//! entries, and the vendor makernote, which is decoded into a
//! directory of its own when one of the known vendors claims it.
//! Bytes of the region that no directory accounts for are kept, so an
//! unmodified structure is written back as it was read.
//!
//! # Examples
//!
//! Reading and editing a region, then writing it back:
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use exif_ifd::{In, Reader, Tag, Value};
//! let data = b"II\x2a\0\x08\0\0\0\
//!              \x01\0\x0f\x01\x02\0\x04\0\0\0Foo\0\0\0\0\0";
//! let mut exif = Reader::new().read_tiff(data)?;
//! assert_eq!(exif.to_bytes()?, data);
//!
//! exif.set_entry(Tag::Model, In::PRIMARY, Value::Ascii(b"Bar 1\0".to_vec()))?;
//! let exif = Reader::new().read_tiff(&exif.to_bytes()?)?;
//! for (tag, ifd, entry) in exif.entries() {
//!     println!("{} {} {:?}", tag, ifd, entry.value());
//! }
//! # Ok(()) }
//! ```
//!
//! Building a structure from scratch:
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use exif_ifd::{writer, Endian, Entry, IfdStructure, In, Value};
//! let mut structure = IfdStructure::new();
//! structure.set_entry(In::PRIMARY, Entry::new(0x0112, Value::Short(vec![1])));
//! let bytes = writer::encode(&structure, Endian::Big)?;
//! assert_eq!(&bytes[..4], b"MM\0\x2a");
//! # Ok(()) }
//! ```
//!
//! Finding out which vendor wrote a makernote:
//!
//! ```
//! use exif_ifd::makernote::{identify, MakernoteType};
//! assert_eq!(identify(Some("Panasonic"), b"Panasonic\0\0\0"), MakernoteType::Panasonic);
//! assert_eq!(identify(None, b"FUJIFILM\x0c\0\0\0\0\0"), MakernoteType::Fujifilm);
//! assert_eq!(identify(Some("Foo"), b"bar"), MakernoteType::Unknown);
//! ```

pub use endian::Endian;
pub use error::Error;
pub use exif::Exif;
pub use ifd::{DateTime, Directory, Entry, IfdStructure, In, PreservedBytes};
pub use makernote::{Makernote, MakernoteBase, MakernoteLayout, MakernoteType};
pub use reader::Reader;
pub use tag::{Context, Tag};
pub use tiff::is_tiff;
pub use value::{EntryType, Opaque, OpaqueReason, Rational, SRational, SubIfd, Thumbnail, Value};

#[cfg(test)]
#[macro_use]
mod tmacro;

mod endian;
mod error;
mod exif;
mod ifd;
pub mod makernote;
mod parser;
mod reader;
mod tag;
mod tiff;
mod util;
mod value;
pub mod writer;
