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


//! Rendering of directory trees.
//!
//! Data read from disk remembers where it was found.  A directory table,
//! payload, makernote block or preserved region that is unchanged and
//! still fits is written back at that offset, so an unmodified structure
//! is reproduced byte for byte.  Everything else (new or grown entries,
//! data that lost its place) is appended after the region the original
//! data occupied.  Appended directories are laid out the same way each
//! time: the record table is reserved first, then the out-of-line
//! payloads are appended in entry order, each on a word boundary, and
//! finally the table is written with the payload offsets filled in.

use crate::endian::Endian;
use crate::error::Error;
use crate::ifd::{Directory, Entry, IfdStructure, Span};
use crate::makernote::{Makernote, MakernoteBase, MakernoteLayout};
use crate::tiff::{TIFF_BE_SIG, TIFF_HEADER_LEN, TIFF_LE_SIG};
use crate::value::{self, Value};

/// Encodes a complete TIFF region: the 8-byte header, then the directory
/// chain and the preserved bytes of the structure.
///
/// # Examples
/// ```
/// use exif_ifd::{writer, Endian, Entry, IfdStructure, In, Value};
/// let mut s = IfdStructure::new();
/// s.set_entry(In::PRIMARY, Entry::new(0x10e, Value::Ascii(b"Sample\0".to_vec())));
/// let buf = writer::encode(&s, Endian::Big).unwrap();
/// assert_eq!(&buf[..8], b"MM\0\x2a\0\0\0\x08");
/// ```
pub fn encode(structure: &IfdStructure, order: Endian) -> Result<Vec<u8>, Error> {
    let mut w = Writer::new(0, 0, 0);
    let mut header = match order {
        Endian::Big => TIFF_BE_SIG.to_vec(),
        Endian::Little => TIFF_LE_SIG.to_vec(),
    };
    order.writeu32(&mut header, TIFF_HEADER_LEN as u32);
    w.fix(0, &header);
    w.keep_until(extent(structure));
    let ifd_offset = write_chain(&mut w, structure, order, true, None)?;
    order.patchu32(&mut w.buf, 4, ifd_offset);
    Ok(w.buf)
}

/// Renders a directory chain without a TIFF header.  The first byte of
/// the output is placed at `start_offset` relative to the base that the
/// offsets refer to, and the first directory starts there.
pub fn render(structure: &IfdStructure, order: Endian, start_offset: u32) -> Result<Vec<u8>, Error> {
    let start = start_offset as usize;
    let mut w = Writer::new(start, 0, 0);
    w.keep_until(extent(structure));
    write_chain(&mut w, structure, order, true, Some(start))?;
    Ok(w.buf)
}

// The end of the region that the data of `structure` occupied when it
// was read.  Makernote directories are not descended into; their block
// is accounted for by the MakerNote entry.
fn extent(structure: &IfdStructure) -> usize {
    let mut end = 0;
    for p in structure.preserved() {
        end = end.max(p.offset as usize + p.bytes.len());
    }
    for dir in structure.directories() {
        end = end.max(dir.origin().map_or(0, Span::end));
        for e in dir {
            end = end.max(e.origin().map_or(0, Span::end));
            if let Value::SubIfd(ref s) = *e.value() {
                end = end.max(extent(&s.structure));
            }
        }
    }
    end
}

// Output buffer.  Positions are logical: `origin` is the position of
// the first byte of `buf`, and offsets are `position - base`.
//
// Data read from disk goes back to `base + offset + shift`, as long as
// that lies in `origin..limit` and nothing else was written there.
// Appended data always goes past `limit`.
struct Writer {
    buf: Vec<u8>,
    origin: usize,
    base: usize,
    shift: i64,
    limit: usize,
    // Ranges written at fixed positions.  The flag tells whether equal
    // bytes may be written over them again.
    taken: Vec<(usize, usize, bool)>,
}

impl Writer {
    fn new(origin: usize, base: usize, shift: i64) -> Self {
        Self {
            buf: Vec::new(),
            origin,
            base,
            shift,
            limit: origin,
            taken: Vec::new(),
        }
    }

    fn pos(&self) -> usize {
        self.origin + self.buf.len()
    }

    fn offset_of(&self, pos: usize) -> Result<u32, Error> {
        pos.checked_sub(self.base)
            .and_then(|ofs| u32::try_from(ofs).ok())
            .ok_or(Error::RenderInvariantViolation("Offset out of range"))
    }

    // Aligns to the two-byte (word) boundary relative to the base and
    // returns the new position.
    fn pad(&mut self) -> usize {
        if (self.pos() - self.base) % 2 != 0 {
            self.buf.push(0);
        }
        self.pos()
    }

    // The position that `pad` would return.
    fn next_aligned(&self) -> usize {
        let pos = self.pos();
        pos + (pos - self.base) % 2
    }

    // Grows the kept region to `end`.  Must be called before anything is
    // appended.
    fn keep_until(&mut self, end: usize) {
        if end > self.limit {
            self.limit = end;
        }
        if self.limit > self.pos() {
            self.buf.resize(self.limit - self.origin, 0);
        }
    }

    // Writes at a position that must not move, such as a header.
    fn fix(&mut self, pos: usize, bytes: &[u8]) {
        self.keep_until(pos + bytes.len());
        self.write_at(pos, bytes);
        self.taken.push((pos, pos + bytes.len(), false));
    }

    fn write_at(&mut self, pos: usize, bytes: &[u8]) {
        let at = pos - self.origin;
        self.buf[at..at + bytes.len()].copy_from_slice(bytes);
    }

    fn append(&mut self, bytes: &[u8]) -> usize {
        let pos = self.pad();
        self.buf.extend_from_slice(bytes);
        pos
    }

    // Where data recorded at `span` goes back to, if it has `len` bytes
    // now and that place is inside the kept region.
    fn locate(&self, span: Option<Span>, len: usize) -> Option<usize> {
        let span = span?;
        if len > span.len as usize {
            return None;
        }
        let pos = usize::try_from(self.base as i64 + span.offset as i64 + self.shift).ok()?;
        if pos < self.origin || pos.checked_add(len)? > self.limit {
            return None;
        }
        Some(pos)
    }

    // Takes `pos..pos + len` for a directory table.
    fn reserve_at(&mut self, pos: usize, len: usize) -> bool {
        let end = pos + len;
        if self.taken.iter().any(|&(s, e, _)| s < end && pos < e) {
            return false;
        }
        self.taken.push((pos, end, false));
        true
    }

    // Writes `bytes` at `pos` unless other bytes were written there.
    fn place(&mut self, pos: usize, bytes: &[u8]) -> bool {
        let end = pos + bytes.len();
        let origin = self.origin;
        let buf = &self.buf;
        let free = self.taken.iter().filter(|&&(s, e, _)| s < end && pos < e).all(|&(s, e, shared)| {
            let (s, e) = (s.max(pos), e.min(end));
            shared && buf[s - origin..e - origin] == bytes[s - pos..e - pos]
        });
        if !free {
            return false;
        }
        self.write_at(pos, bytes);
        self.taken.push((pos, end, true));
        true
    }

    // Writes a payload back where it was read, or appends it.  Returns
    // its offset.
    fn put(&mut self, span: Option<Span>, bytes: &[u8]) -> Result<u32, Error> {
        let pos = match self.locate(span, bytes.len()) {
            Some(pos) if self.place(pos, bytes) => pos,
            _ => self.append(bytes),
        };
        self.offset_of(pos)
    }
}

// Writes a directory chain and the preserved bytes of the structure.
// The first directory is put at `first_at` if given.  Returns the
// offset of the first directory.
fn write_chain(
    w: &mut Writer,
    structure: &IfdStructure,
    order: Endian,
    next_pointer: bool,
    first_at: Option<usize>,
) -> Result<u32, Error> {
    // A chain has at least one directory.
    let empty = [Directory::new()];
    let dirs = match structure.directories() {
        [] => &empty[..],
        dirs => dirs,
    };
    if !next_pointer && dirs.len() > 1 {
        return Err(Error::RenderInvariantViolation(
            "Chained directories without next IFD offset",
        ));
    }

    let mut first = 0;
    let mut prev_next_at = None;
    for (i, dir) in dirs.iter().enumerate() {
        let at = if i == 0 { first_at } else { None };
        let (ifd_offset, next_at) = write_ifd_and_fields(w, dir, order, next_pointer, at)?;
        match prev_next_at {
            Some(at) => {
                let mut ofs = Vec::new();
                order.writeu32(&mut ofs, ifd_offset);
                w.write_at(at, &ofs);
            }
            None => first = ifd_offset,
        }
        prev_next_at = next_at;
    }
    for p in structure.preserved() {
        let span = Span::new(p.offset as usize, p.bytes.len());
        match w.locate(span, p.bytes.len()) {
            Some(pos) if w.place(pos, &p.bytes) => {}
            _ => w.buf.extend_from_slice(&p.bytes),
        }
    }
    Ok(first)
}

// Writes an IFD and its fields.  Returns the offset of the IFD and the
// position of its next IFD offset.
fn write_ifd_and_fields(
    w: &mut Writer,
    dir: &Directory,
    order: Endian,
    next_pointer: bool,
    at: Option<usize>,
) -> Result<(u32, Option<usize>), Error> {
    let count = u16::try_from(dir.len())
        .map_err(|_| Error::RenderInvariantViolation("Too many entries"))?;
    // The number of entries (2) + array of entries (12 * n) +
    // the next IFD pointer (4).
    let table_len = 2 + 12 * dir.len() + if next_pointer { 4 } else { 0 };
    let ifd_pos = match (at, w.locate(dir.origin(), table_len)) {
        (Some(pos), _) => {
            w.fix(pos, &vec![0; table_len]);
            pos
        }
        (None, Some(pos)) if w.reserve_at(pos, table_len) => pos,
        _ => {
            let pos = w.pad();
            w.buf.resize(w.buf.len() + table_len, 0);
            pos
        }
    };

    let mut ifd = Vec::with_capacity(table_len);
    order.writeu16(&mut ifd, count);
    for e in dir {
        let (typ, cnt, field) = write_value(w, e, order)?;
        order.writeu16(&mut ifd, e.tag());
        order.writeu16(&mut ifd, typ);
        order.writeu32(&mut ifd, cnt);
        ifd.extend_from_slice(&field);
    }
    let next_at = if next_pointer {
        order.writeu32(&mut ifd, 0);
        Some(ifd_pos + ifd.len() - 4)
    } else {
        None
    };
    w.write_at(ifd_pos, &ifd);
    Ok((w.offset_of(ifd_pos)?, next_at))
}

fn count(n: usize) -> Result<u32, Error> {
    u32::try_from(n).map_err(|_| Error::RenderInvariantViolation("Too long array"))
}

fn offset_field(order: Endian, ofs: u32) -> [u8; 4] {
    let mut field = [0; 4];
    order.patchu32(&mut field, 0, ofs);
    field
}

// Writes the out-of-line part of a value, if any, and returns the
// type, count, and value-or-offset field of its record.
fn write_value(w: &mut Writer, entry: &Entry, order: Endian) -> Result<(u16, u32, [u8; 4]), Error> {
    match *entry.value() {
        // Re-emitted exactly as read.
        Value::Opaque(ref o) => Ok((o.type_code, o.count, o.field)),
        Value::SubIfd(ref s) => {
            let ofs = write_chain(w, &s.structure, order, true, None)?;
            Ok((s.pointer_type.code(), 1, offset_field(order, ofs)))
        }
        Value::Thumbnail(ref t) => {
            let ofs = w.put(entry.origin(), &t.data)?;
            Ok((t.pointer_type.code(), 1, offset_field(order, ofs)))
        }
        Value::Makernote(ref m) => write_makernote(w, m, entry.origin(), order),
        ref v => {
            let valbuf = value::compose(v, order)
                .ok_or(Error::RenderInvariantViolation("Value cannot be composed"))?;
            let cnt = count(v.count())?;
            // Embed the value itself into the offset, or
            // encode as an offset and the value.
            if valbuf.len() <= 4 {
                let mut field = [0; 4];
                field[..valbuf.len()].copy_from_slice(&valbuf);
                Ok((v.type_code(), cnt, field))
            } else {
                // The value must begin on a word boundary. [TIFF6, Section 2:
                // TIFF Structure, Image File Directory, IFD Entry, p. 15]
                let ofs = w.put(entry.origin(), &valbuf)?;
                Ok((v.type_code(), cnt, offset_field(order, ofs)))
            }
        }
    }
}

// Writes a makernote block back at `span` if its bytes for that place
// still fit there, and appends it otherwise.
fn write_makernote(
    w: &mut Writer,
    m: &Makernote,
    span: Option<Span>,
    order: Endian,
) -> Result<(u16, u32, [u8; 4]), Error> {
    let typ = m.entry_type();
    let unit = typ.unit_size();
    if let Some(pos) = w.locate(span, 0) {
        let block = makernote_bytes(m, w.offset_of(pos)?, order)?;
        if w.locate(span, block.len()).is_some() && w.place(pos, &block) {
            return Ok((typ.code(), count(block.len() / unit)?, offset_field(order, w.offset_of(pos)?)));
        }
    }
    let pos = w.next_aligned();
    let block = makernote_bytes(m, w.offset_of(pos)?, order)?;
    let cnt = count(block.len() / unit)?;
    if block.len() <= 4 {
        let mut field = [0; 4];
        field[..block.len()].copy_from_slice(&block);
        return Ok((typ.code(), cnt, field));
    }
    let pos = w.append(&block);
    Ok((typ.code(), cnt, offset_field(order, w.offset_of(pos)?)))
}

// The bytes of a makernote block placed at `offset` relative to the
// enclosing base.
fn makernote_bytes(m: &Makernote, offset: u32, order: Endian) -> Result<Vec<u8>, Error> {
    match (m.layout(), m.structure()) {
        (Some(layout), Some(structure)) if !m.can_copy_verbatim(offset, order) => {
            render_makernote(m, layout, structure, offset, order)
        }
        _ => Ok(m.raw().to_vec()),
    }
}

// Renders a makernote from its directory.  The parts that were read
// from disk keep their place inside the block; the vendor header and
// the first directory stay where the layout expects them.
fn render_makernote(
    m: &Makernote,
    layout: &MakernoteLayout,
    structure: &IfdStructure,
    offset: u32,
    order: Endian,
) -> Result<Vec<u8>, Error> {
    let header_len = layout.header.len();
    let mut w = match layout.base {
        MakernoteBase::Outer => Writer::new(offset as usize, 0, offset as i64 - m.original_offset() as i64),
        MakernoteBase::Block => Writer::new(0, 0, 0),
        MakernoteBase::EmbeddedTiff => Writer::new(0, header_len, 0),
    };
    let block = w.origin;
    w.fix(block, &layout.header);
    w.keep_until(block + m.raw().len());
    match layout.base {
        MakernoteBase::Outer => {
            write_chain(&mut w, structure, order, layout.next_pointer, Some(block + header_len))?;
        }
        MakernoteBase::Block => {
            let order = layout.byte_order;
            write_chain(&mut w, structure, order, layout.next_pointer, Some(header_len))?;
        }
        MakernoteBase::EmbeddedTiff => {
            let order = layout.byte_order;
            let mut tiff = order.mark().to_vec();
            order.writeu16(&mut tiff, 42);
            order.writeu32(&mut tiff, TIFF_HEADER_LEN as u32);
            w.fix(header_len, &tiff);
            let ifd_offset = write_chain(&mut w, structure, order, layout.next_pointer, None)?;
            order.patchu32(&mut w.buf, header_len + 4, ifd_offset);
        }
    }
    Ok(w.buf)
}
