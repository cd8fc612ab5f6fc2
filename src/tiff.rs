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


use log::{debug, trace, warn};

use crate::endian::Endian;
use crate::error::Error;
use crate::ifd::{Directory, Entry, IfdStructure, Span};
use crate::makernote::{self, Makernote, MakernoteBase, MakernoteLayout, MakernoteType};
use crate::parser::{Family, Parse, Parser};
use crate::tag::{Context, Tag};
use crate::value::{self, EntryType, Opaque, OpaqueReason, SubIfd, Thumbnail, Value};

// TIFF header magic numbers [EXIF23 4.5.2].
const TIFF_FORTY_TWO: u16 = 0x002a;
pub const TIFF_BE_SIG: [u8; 4] = [0x4d, 0x4d, 0x00, 0x2a];
pub const TIFF_LE_SIG: [u8; 4] = [0x49, 0x49, 0x2a, 0x00];
pub const TIFF_HEADER_LEN: usize = 8;

// Parses a TIFF region with the default options.
#[cfg(test)]
pub fn parse_tiff(data: &[u8]) -> Result<(IfdStructure, Endian), Error> {
    let mut parser = Parser::default();
    parser.parse(data)?;
    Ok((parser.structure, parser.byte_order))
}

impl Parse for Parser {
    fn parse(&mut self, data: &[u8]) -> Result<(), Error> {
        // Check the byte order and call the real parser.
        if data.len() < TIFF_HEADER_LEN {
            return Err(Error::InvalidFormat("Truncated TIFF header"));
        }
        let order =
            Endian::from_mark(&data[..2]).ok_or(Error::InvalidFormat("Invalid TIFF byte order"))?;
        self.parse_region(data, order)
    }
}

impl Parser {
    /// Parses a TIFF region that is declared to be in `order`.
    pub fn parse_region(&mut self, data: &[u8], order: Endian) -> Result<(), Error> {
        if data.len() < TIFF_HEADER_LEN {
            return Err(Error::InvalidFormat("Truncated TIFF header"));
        }
        if Endian::from_mark(&data[..2]) != Some(order) {
            return Err(Error::InvalidFormat("Byte order mismatch"));
        }
        // Parse the rest of the header (42 and the IFD offset).
        if order.loadu16(data, 2) != Some(TIFF_FORTY_TWO) {
            return Err(Error::InvalidFormat("Invalid forty two"));
        }
        let ifd_offset = order
            .loadu32(data, 4)
            .ok_or(Error::InvalidFormat("Truncated TIFF header"))?;
        let mut family = Family::new(0, order);
        family.coverage.add(0, TIFF_HEADER_LEN);
        self.parse_family(data, family, ifd_offset as usize)
    }

    /// Parses a directory chain at `offset` without a TIFF header.
    /// Offsets in the directories are relative to the start of `data`.
    pub fn parse_directories(&mut self, data: &[u8], offset: usize, order: Endian) -> Result<(), Error> {
        self.parse_family(data, Family::new(0, order), offset)
    }

    fn parse_family(&mut self, data: &[u8], mut family: Family, offset: usize) -> Result<(), Error> {
        self.byte_order = family.order;
        let mut structure = self.parse_chain(data, &mut family, offset, Context::Tiff, true)?;
        structure.set_preserved(family.coverage.gaps(data, 0, data.len(), 0));
        self.structure = structure;
        Ok(())
    }

    // Follows the next-IFD pointers from `offset`.  Only a broken first
    // directory is an error; a broken later one ends the chain.
    fn parse_chain(
        &mut self,
        data: &[u8],
        family: &mut Family,
        mut offset: usize,
        ctx: Context,
        next_pointer: bool,
    ) -> Result<IfdStructure, Error> {
        let mut structure = IfdStructure::new();
        loop {
            let first = structure.directories().is_empty();
            // Limit the number of IFDs to defend against resource
            // exhaustion attacks.
            if !first && structure.directories().len() >= self.options.max_ifds {
                warn!("{:?} chain cut at {} directories", ctx, self.options.max_ifds);
                break;
            }
            let at = family
                .base
                .checked_add(offset)
                .ok_or_else(|| Error::malformed(offset, "Offset overflow"))?;
            if !self.visited.insert(at) {
                if first {
                    return Err(Error::malformed(offset, "Directory read twice"));
                }
                warn!("{:?} chain loops back to offset {}", ctx, offset);
                break;
            }
            match self.parse_ifd(data, family, offset, ctx, next_pointer) {
                Ok((dir, next)) => {
                    structure.push_directory(dir);
                    if next == 0 {
                        break;
                    }
                    offset = next;
                }
                Err(e) if first => return Err(e),
                Err(e) => {
                    warn!("{:?} chain stopped: {}", ctx, e);
                    break;
                }
            }
        }
        Ok(structure)
    }

    // Parse IFD [EXIF23 4.6.2].
    fn parse_ifd(
        &mut self,
        data: &[u8],
        family: &mut Family,
        offset: usize,
        ctx: Context,
        next_pointer: bool,
    ) -> Result<(Directory, usize), Error> {
        let start = family.base + offset;
        // Count (the number of the entries).
        let count = family
            .order
            .loadu16(data, start)
            .ok_or_else(|| Error::malformed(offset, "Truncated IFD count"))? as usize;

        // Array of entries.  (count * 12) never overflows.
        if data.len() - start - 2 < count * 12 {
            return Err(Error::malformed(offset, "Truncated IFD"));
        }
        let table_end = start + 2 + count * 12;
        trace!("{:?} directory at {}: {} entries", ctx, offset, count);
        let next = if next_pointer {
            // Some makernotes omit the pointer at the very end of a block.
            family.order.loadu32(data, table_end).unwrap_or_else(|| {
                debug!("{:?} directory at {} has no next IFD offset", ctx, offset);
                0
            })
        } else {
            0
        };
        let table_len = ((table_end - start) + if next_pointer { 4 } else { 0 }).min(data.len() - start);
        family.coverage.add(start, table_len);

        if ctx == Context::Tiff && self.make.is_none() {
            self.make = Self::scan_make(data, family.order, start, count);
        }

        let mut dir = Directory::new();
        for i in 0..count {
            let entry = self.parse_ifd_entry(data, family, start + 2 + i * 12, ctx)?;
            let tag = entry.tag();
            if !dir.push_unique(entry) {
                warn!("Duplicate {} in {:?} directory dropped", Tag(ctx, tag), ctx);
            }
        }
        if ctx == Context::Tiff {
            Self::decode_thumbnail(data, family, &mut dir);
        }
        dir.set_origin(Span::new(offset, table_len));
        Ok((dir, next as usize))
    }

    // The Make is needed before the Exif IFD (and its makernote) is
    // followed, and the table is not always sorted.
    fn scan_make(data: &[u8], order: Endian, start: usize, count: usize) -> Option<String> {
        (0..count).find_map(|i| {
            let at = start + 2 + i * 12;
            if order.loadu16(data, at)? != Tag::Make.number() || order.loadu16(data, at + 2)? != 2 {
                return None;
            }
            let cnt = order.loadu32(data, at + 4)? as usize;
            let ofs = if cnt <= 4 { at + 8 } else { order.loadu32(data, at + 8)? as usize };
            let bytes = data.get(ofs..ofs.checked_add(cnt)?)?;
            let end = bytes.iter().position(|&c| c == 0).unwrap_or(bytes.len());
            Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
        })
    }

    fn parse_ifd_entry(
        &mut self,
        data: &[u8],
        family: &mut Family,
        offset: usize,
        ctx: Context,
    ) -> Result<Entry, Error> {
        // The size of entry has been checked in parse_ifd().
        let order = family.order;
        let truncated = || Error::malformed(offset, "Truncated entry");
        let tag = order.loadu16(data, offset).ok_or_else(truncated)?;
        let typ = order.loadu16(data, offset + 2).ok_or_else(truncated)?;
        let cnt = order.loadu32(data, offset + 4).ok_or_else(truncated)?;
        let valofs_at = offset + 8;
        let mut field = [0; 4];
        field.copy_from_slice(data.get(valofs_at..valofs_at + 4).ok_or_else(truncated)?);
        let opaque = |reason| {
            Entry::new(
                tag,
                Value::Opaque(Opaque {
                    type_code: typ,
                    count: cnt,
                    field,
                    reason,
                }),
            )
        };

        let typ = match EntryType::from_code(typ) {
            Some(t) => t,
            None => {
                debug!("{} has unknown type {}", Tag(ctx, tag), typ);
                return Ok(opaque(OpaqueReason::UnknownType));
            }
        };
        let vallen = match typ.payload_len(cnt) {
            Some(n) => n,
            None => return Ok(opaque(OpaqueReason::OutOfBounds)),
        };
        let (pos, rel) = if vallen <= 4 {
            (valofs_at, None)
        } else {
            let ofs = order.loadu32(data, valofs_at).ok_or_else(truncated)?;
            match family.base.checked_add(ofs as usize) {
                Some(pos) if pos <= data.len() && data.len() - pos >= vallen => (pos, Some(ofs)),
                _ => {
                    debug!("{} points out of the buffer", Tag(ctx, tag));
                    return Ok(opaque(OpaqueReason::OutOfBounds));
                }
            }
        };

        // No infinite recursion will occur because the depth is bounded
        // and no directory is read twice.
        if let Some(child) = self.child_context(ctx, tag) {
            if cnt == 1 && (typ == EntryType::Long || typ == EntryType::Ifd) {
                let ptr = order.loadu32(data, pos).ok_or_else(truncated)?;
                return Ok(match self.parse_child_ifd(data, family, ptr as usize, child) {
                    Ok(structure) => Entry::new(
                        tag,
                        Value::SubIfd(SubIfd {
                            pointer_type: typ,
                            structure,
                        }),
                    ),
                    Err(e) => {
                        warn!("{} not followed: {}", Tag(ctx, tag), e);
                        opaque(OpaqueReason::BadDirectory)
                    }
                });
            }
        }
        if let (Tag::MakerNote, Some(ofs)) = (Tag(ctx, tag), rel) {
            if typ.unit_size() == 1 {
                let block = &data[pos..pos + vallen];
                family.coverage.add(pos, vallen);
                let value = self.parse_makernote(data, family, block, ofs, typ);
                return Ok(Entry::new(tag, value).with_origin(Span::new(ofs as usize, vallen)));
            }
        }

        match value::decode(typ, order, data, pos, cnt as usize) {
            Some(v) => {
                if rel.is_some() {
                    family.coverage.add(pos, vallen);
                }
                let origin = rel.and_then(|ofs| Span::new(ofs as usize, vallen));
                Ok(Entry::new(tag, v).with_origin(origin))
            }
            None => Ok(opaque(OpaqueReason::OutOfBounds)),
        }
    }

    fn child_context(&self, ctx: Context, tag: u16) -> Option<Context> {
        match Tag(ctx, tag) {
            Tag::ExifIFDPointer => Some(Context::Exif),
            Tag::GPSInfoIFDPointer => Some(Context::Gps),
            Tag::InteropIFDPointer => Some(Context::Interop),
            Tag(Context::Makernote(_), t) if self.sub_ifd_tags.contains(&t) => Some(ctx),
            _ => None,
        }
    }

    fn parse_child_ifd(
        &mut self,
        data: &[u8],
        family: &mut Family,
        offset: usize,
        ctx: Context,
    ) -> Result<IfdStructure, Error> {
        if self.depth >= self.options.max_depth {
            return Err(Error::malformed(offset, "Nesting too deep"));
        }
        self.depth += 1;
        let result = self.parse_chain(data, family, offset, ctx, true);
        self.depth -= 1;
        result
    }

    fn parse_makernote(
        &mut self,
        data: &[u8],
        family: &mut Family,
        block: &[u8],
        offset: u32,
        typ: EntryType,
    ) -> Value {
        let opaque = || Value::Makernote(Box::new(Makernote::opaque(typ, block.to_vec(), offset)));
        if !self.options.decode_makernotes {
            return opaque();
        }
        let (kind, layout) = match makernote::select(self.make.as_deref(), block, family.order) {
            Some(found) => found,
            None => {
                debug!("Makernote of {:?} not recognized", self.make);
                return opaque();
            }
        };
        if self.depth >= self.options.max_depth {
            warn!("{:?} makernote not decoded: nesting too deep", kind);
            return opaque();
        }

        let saved = std::mem::replace(&mut self.sub_ifd_tags, layout.sub_ifd_tags);
        self.depth += 1;
        let result = self.parse_makernote_ifd(data, family, block, offset, kind, &layout);
        self.depth -= 1;
        self.sub_ifd_tags = saved;

        match result {
            Ok(structure) => Value::Makernote(Box::new(Makernote::decoded(
                kind,
                typ,
                block.to_vec(),
                offset,
                layout,
                structure,
            ))),
            Err(e) => {
                warn!("{:?} makernote kept as raw bytes: {}", kind, e);
                opaque()
            }
        }
    }

    fn parse_makernote_ifd(
        &mut self,
        data: &[u8],
        family: &mut Family,
        block: &[u8],
        offset: u32,
        kind: MakernoteType,
        layout: &MakernoteLayout,
    ) -> Result<IfdStructure, Error> {
        let ctx = Context::Makernote(kind);
        let start = family.base + offset as usize;
        let header_len = layout.header.len();
        // Offsets of an outer-based directory are relative to the
        // enclosing base, but its coverage is tracked apart so that the
        // vendor bytes of the block are found.
        let (base, ifd, covered) = match layout.base {
            MakernoteBase::Outer => (family.base, offset as usize + header_len, header_len),
            MakernoteBase::Block => (start, header_len, header_len),
            MakernoteBase::EmbeddedTiff => {
                let tiff = block
                    .get(header_len..header_len + TIFF_HEADER_LEN)
                    .ok_or_else(|| Error::malformed(header_len, "Truncated TIFF header"))?;
                let ifd = layout
                    .byte_order
                    .loadu32(tiff, 4)
                    .ok_or_else(|| Error::malformed(header_len, "Truncated TIFF header"))?;
                (start + header_len, ifd as usize, header_len + TIFF_HEADER_LEN)
            }
        };
        let mut inner = Family::new(base, layout.byte_order);
        inner.coverage.add(start, covered);
        let mut structure = self.parse_chain(data, &mut inner, ifd, ctx, layout.next_pointer)?;
        structure.set_preserved(inner.coverage.gaps(data, start, start + block.len(), base));
        Ok(structure)
    }

    // JPEGInterchangeFormat points to the thumbnail; carry its bytes so
    // that the writer can move them.
    fn decode_thumbnail(data: &[u8], family: &mut Family, dir: &mut Directory) {
        let ofs = match dir.get(Tag::JPEGInterchangeFormat.number()).map(Entry::value) {
            Some(Value::Long(v)) if v.len() == 1 => v[0] as usize,
            _ => return,
        };
        let len = match dir
            .get(Tag::JPEGInterchangeFormatLength.number())
            .and_then(|e| e.value().get_uint(0))
        {
            Some(n) => n as usize,
            None => return,
        };
        let start = family.base + ofs;
        let thumbnail = match start.checked_add(len).and_then(|end| data.get(start..end)) {
            Some(t) if len > 0 => t,
            _ => {
                debug!("Thumbnail at {} ({} bytes) is out of the buffer", ofs, len);
                return;
            }
        };
        family.coverage.add(start, len);
        if let Some(e) = dir.get_mut(Tag::JPEGInterchangeFormat.number()) {
            let value = Value::Thumbnail(Thumbnail {
                pointer_type: EntryType::Long,
                data: thumbnail.to_vec(),
            });
            *e = Entry::new(e.tag(), value).with_origin(Span::new(ofs, len));
        }
    }
}

pub fn is_tiff(buf: &[u8]) -> bool {
    buf.starts_with(&TIFF_BE_SIG) || buf.starts_with(&TIFF_LE_SIG)
}
