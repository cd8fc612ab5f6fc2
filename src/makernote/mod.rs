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


//! Vendor makernote dispatch.
//!
//! A makernote is an opaque `UNDEFINED` blob as far as Exif is
//! concerned, but most vendors store a directory inside it.  Each vendor
//! is described by a `MakernoteDecoder` that recognizes its blocks and
//! tells the reader where the directory starts, which byte order it uses
//! and which base its offsets are relative to.

use lazy_static::lazy_static;
use log::debug;

use crate::endian::Endian;
use crate::ifd::{Entry, IfdStructure, In};
use crate::value::EntryType;

pub mod canon;
pub mod fujifilm;
pub mod nikon;
pub mod olympus;
pub mod panasonic;

/// The vendor family of a makernote.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MakernoteType {
    Panasonic,
    Canon,
    Nikon,
    Olympus,
    Fujifilm,
    /// Not recognized.  The block is kept as raw bytes.
    Unknown,
}

/// What the offsets inside a makernote directory are relative to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MakernoteBase {
    /// The base of the enclosing TIFF structure.  The block must stay at
    /// its offset or be rewritten when it moves.
    Outer,
    /// The first byte of the makernote block.
    Block,
    /// A TIFF header embedded right after the vendor header.
    EmbeddedTiff,
}

/// The physical layout of a vendor makernote.
#[derive(Debug, Clone, PartialEq)]
pub struct MakernoteLayout {
    /// Vendor header bytes that precede the directory, written back
    /// verbatim.  For `EmbeddedTiff` the TIFF header is not included.
    pub header: Vec<u8>,
    /// The byte order of the directory.  Makernotes with an `Outer`
    /// base always share the byte order of the enclosing structure.
    pub byte_order: Endian,
    pub base: MakernoteBase,
    /// Whether the directory ends with a next-IFD pointer.
    pub next_pointer: bool,
    /// Vendor tags whose values point to nested directories.
    pub sub_ifd_tags: &'static [u16],
}

/// Recognizes and lays out the makernote of one vendor.
///
/// Decoders are registered once in a process-wide list and must not
/// keep state.
pub trait MakernoteDecoder: Send + Sync {
    fn kind(&self) -> MakernoteType;

    /// Lowercase substrings of the Make field that identify the vendor.
    fn makes(&self) -> &'static [&'static str];

    /// Returns true if the block starts with the vendor's signature.
    fn matches_signature(&self, block: &[u8]) -> bool;

    /// Returns the layout of the block, or None if it cannot be one of
    /// this vendor's makernotes.
    fn layout(&self, block: &[u8], outer: Endian) -> Option<MakernoteLayout>;

    /// Returns the name of a vendor tag.
    fn tag_name(&self, _number: u16) -> Option<String> {
        None
    }

    fn matches_make(&self, make: &str) -> bool {
        let make = make.to_ascii_lowercase();
        self.makes().iter().any(|m| make.contains(m))
    }
}

lazy_static! {
    static ref DECODERS: Vec<Box<dyn MakernoteDecoder>> = vec![
        Box::new(panasonic::Panasonic),
        Box::new(canon::Canon),
        Box::new(nikon::Nikon),
        Box::new(olympus::Olympus),
        Box::new(fujifilm::Fujifilm),
    ];
}

/// Returns the registered decoders.
pub fn decoders() -> &'static [Box<dyn MakernoteDecoder>] {
    &DECODERS
}

fn decoder(kind: MakernoteType) -> Option<&'static dyn MakernoteDecoder> {
    decoders().iter().find(|d| d.kind() == kind).map(|d| &**d)
}

/// Identifies the vendor of a makernote block.
///
/// # Examples
/// ```
/// use exif_ifd::makernote::{identify, MakernoteType};
/// let block = b"Panasonic\0\0\0\0\0\0\0\0\0";
/// assert_eq!(identify(Some("Panasonic"), block), MakernoteType::Panasonic);
/// assert_eq!(identify(None, block), MakernoteType::Panasonic);
/// assert_eq!(identify(Some("Panasonic"), b"junk"), MakernoteType::Unknown);
/// ```
pub fn identify(make: Option<&str>, block: &[u8]) -> MakernoteType {
    select(make, block, Endian::Little).map_or(MakernoteType::Unknown, |(kind, _)| kind)
}

/// Picks the decoder for a block: by Make first, then by signature.
pub(crate) fn select(
    make: Option<&str>,
    block: &[u8],
    outer: Endian,
) -> Option<(MakernoteType, MakernoteLayout)> {
    if let Some(make) = make {
        let mut claims = decoders().iter().filter(|d| d.matches_make(make));
        if let (Some(d), None) = (claims.next(), claims.next()) {
            if let Some(layout) = d.layout(block, outer) {
                return Some((d.kind(), layout));
            }
            debug!("{:?} makernote not recognized for Make {:?}", d.kind(), make);
        }
    }
    decoders()
        .iter()
        .filter(|d| d.matches_signature(block))
        .find_map(|d| d.layout(block, outer).map(|l| (d.kind(), l)))
}

// A bare directory has no signature.  A non-empty record table that
// fits in the block is all there is to check.
pub(crate) fn table_fits(block: &[u8], order: Endian) -> bool {
    match order.loadu16(block, 0) {
        Some(n) => n > 0 && 2 + n as usize * 12 <= block.len(),
        None => false,
    }
}

/// Returns the name of a vendor tag, if the vendor knows it.
pub fn tag_name(kind: MakernoteType, number: u16) -> Option<String> {
    decoder(kind).and_then(|d| d.tag_name(number))
}

#[derive(Debug, Clone, PartialEq)]
struct Body {
    layout: MakernoteLayout,
    structure: IfdStructure,
}

/// The value of a MakerNote entry.
///
/// The block read from disk is kept alongside its decoded directory.
/// As long as the directory is not borrowed mutably, the original bytes
/// are written back unchanged wherever that is safe.
#[derive(Debug, Clone, PartialEq)]
pub struct Makernote {
    kind: MakernoteType,
    entry_type: EntryType,
    raw: Vec<u8>,
    offset: u32,
    body: Option<Body>,
    modified: bool,
}

impl Makernote {
    /// Wraps a block that is kept as raw bytes.
    pub fn opaque(entry_type: EntryType, raw: Vec<u8>, offset: u32) -> Makernote {
        Makernote {
            kind: MakernoteType::Unknown,
            entry_type,
            raw,
            offset,
            body: None,
            modified: false,
        }
    }

    pub(crate) fn decoded(
        kind: MakernoteType,
        entry_type: EntryType,
        raw: Vec<u8>,
        offset: u32,
        layout: MakernoteLayout,
        structure: IfdStructure,
    ) -> Makernote {
        Makernote {
            kind,
            entry_type,
            raw,
            offset,
            body: Some(Body { layout, structure }),
            modified: false,
        }
    }

    /// Builds a new makernote that will be rendered from `structure`.
    pub fn new(kind: MakernoteType, layout: MakernoteLayout, structure: IfdStructure) -> Makernote {
        Makernote {
            kind,
            entry_type: EntryType::Undefined,
            raw: Vec::new(),
            offset: 0,
            body: Some(Body { layout, structure }),
            modified: true,
        }
    }

    #[inline]
    pub fn kind(&self) -> MakernoteType {
        self.kind
    }

    #[inline]
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    #[inline]
    pub fn layout(&self) -> Option<&MakernoteLayout> {
        self.body.as_ref().map(|b| &b.layout)
    }

    /// Returns the decoded directory, or None for an unknown vendor.
    #[inline]
    pub fn structure(&self) -> Option<&IfdStructure> {
        self.body.as_ref().map(|b| &b.structure)
    }

    /// Returns the decoded directory for editing.  The makernote is
    /// re-rendered from it when written.
    pub fn structure_mut(&mut self) -> Option<&mut IfdStructure> {
        match self.body {
            Some(ref mut b) => {
                self.modified = true;
                Some(&mut b.structure)
            }
            None => None,
        }
    }

    /// Returns the entry of the first makernote directory.
    pub fn get_entry(&self, tag: u16) -> Option<&Entry> {
        self.structure().and_then(|s| s.get_entry(In::PRIMARY, tag))
    }

    /// Returns the block as it was read.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Returns the offset the block was read from, relative to the base
    /// of the enclosing structure.
    #[inline]
    pub fn original_offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the length of the block as read.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    // The original bytes are still valid at `position` (relative to the
    // enclosing base) with the enclosing byte order `order`.
    pub(crate) fn can_copy_verbatim(&self, position: u32, order: Endian) -> bool {
        let body = match self.body {
            Some(ref b) => b,
            None => return true,
        };
        if self.modified || self.raw.is_empty() {
            return false;
        }
        match body.layout.base {
            MakernoteBase::Outer => position == self.offset && order == body.layout.byte_order,
            MakernoteBase::Block | MakernoteBase::EmbeddedTiff => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_takes_precedence() {
        // An Olympus signature that also reads as the count of a bare
        // directory filling the block is laid out as Canon under a
        // Canon Make.
        let mut block = b"OLYMP\0\x01\0".to_vec();
        block.resize(2 + 0x4c4f * 12, 0);
        assert_eq!(identify(Some("Canon"), &block), MakernoteType::Canon);
        assert_eq!(identify(Some("OLYMPUS IMAGING CORP."), &block), MakernoteType::Olympus);
        assert_eq!(identify(None, &block), MakernoteType::Olympus);

        // Too short for that many records.
        block.truncate(100);
        assert_eq!(identify(Some("Canon"), &block), MakernoteType::Olympus);
    }

    #[test]
    fn bare_table_check() {
        let block = b"\x01\0\x01\0\x03\0\x01\0\0\0\x02\0\0\0";
        assert!(table_fits(block, Endian::Little));
        assert!(!table_fits(&block[..13], Endian::Little));
        assert!(!table_fits(block, Endian::Big));
        assert!(!table_fits(b"\0\0\0\0", Endian::Little));
        assert!(!table_fits(b"\x01", Endian::Little));
    }

    #[test]
    fn make_is_case_insensitive() {
        let block = b"Nikon\0\x02\x10\0\0MM\0\x2a\0\0\0\x08\0\0";
        assert_eq!(identify(Some("NIKON CORPORATION"), block), MakernoteType::Nikon);
        assert_eq!(identify(Some("nikon"), block), MakernoteType::Nikon);
    }

    #[test]
    fn fallback_to_signature() {
        // Panasonic under an unknown Make.
        let block = b"Panasonic\0\0\0\0\0\0\0\0\0";
        assert_eq!(identify(Some("Leica Camera AG"), block), MakernoteType::Panasonic);
        // Known Make, wrong block, no signature.
        assert_eq!(identify(Some("FUJIFILM"), b"\0\0\0\0"), MakernoteType::Unknown);
        assert_eq!(identify(Some("Foo"), b"\x01\0\0\0"), MakernoteType::Unknown);
        assert_eq!(identify(None, b""), MakernoteType::Unknown);
    }

    #[test]
    fn identify_is_deterministic() {
        let block = b"FUJIFILM\x0c\0\0\0\0\0\0\0\0\0";
        let first = identify(Some("FUJIFILM"), block);
        for _ in 0..10 {
            assert_eq!(identify(Some("FUJIFILM"), block), first);
        }
        assert_eq!(first, MakernoteType::Fujifilm);
    }

    #[test]
    fn vendor_tag_names() {
        assert_eq!(tag_name(MakernoteType::Panasonic, 0x29).as_deref(), Some("TimeSincePowerOn"));
        assert_eq!(tag_name(MakernoteType::Fujifilm, 0x1000).as_deref(), Some("Quality"));
        assert_eq!(tag_name(MakernoteType::Unknown, 0x1000), None);
    }

    #[test]
    fn verbatim_copy_conditions() {
        let layout = MakernoteLayout {
            header: b"Panasonic\0\0\0".to_vec(),
            byte_order: Endian::Little,
            base: MakernoteBase::Outer,
            next_pointer: false,
            sub_ifd_tags: &[],
        };
        let mut mn = Makernote::decoded(
            MakernoteType::Panasonic,
            EntryType::Undefined,
            vec![0; 20],
            100,
            layout,
            IfdStructure::new(),
        );
        assert!(mn.can_copy_verbatim(100, Endian::Little));
        assert!(!mn.can_copy_verbatim(102, Endian::Little));
        assert!(!mn.can_copy_verbatim(100, Endian::Big));
        assert!(mn.structure().is_some());
        assert!(!mn.is_modified());
        mn.structure_mut();
        assert!(mn.is_modified());
        assert!(!mn.can_copy_verbatim(100, Endian::Little));

        let opaque = Makernote::opaque(EntryType::Undefined, vec![1, 2, 3], 50);
        assert!(opaque.can_copy_verbatim(0, Endian::Big));
        assert_eq!(opaque.kind(), MakernoteType::Unknown);
        assert_eq!(opaque.len(), 3);
    }
}
