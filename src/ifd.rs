use std::borrow::Cow;
use std::fmt;

use crate::{
    makernote::Makernote,
    util::{atou16, ctou32},
    value::{EntryType, Rational, SRational, SubIfd, Thumbnail},
    Error, Value,
};

/// Where a directory table or an out-of-line payload was read, relative
/// to the base of its offsets.  The writer puts unchanged data back there.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Span {
    pub offset: u32,
    pub len: u32,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Option<Span> {
        Some(Span {
            offset: u32::try_from(offset).ok()?,
            len: u32::try_from(len).ok()?,
        })
    }

    #[inline]
    pub fn end(self) -> usize {
        self.offset as usize + self.len as usize
    }
}

/// One directory record: a tag number and its typed payload.
///
/// The type code and count written to the record are derived from the
/// payload, so replacing the value changes both at once.
#[derive(Debug, Clone)]
pub struct Entry {
    tag: u16,
    value: Value,
    // Cleared whenever the value may have changed.
    origin: Option<Span>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Entry) -> bool {
        self.tag == other.tag && self.value == other.value
    }
}

impl Entry {
    #[inline]
    pub fn new(tag: u16, value: Value) -> Entry {
        Entry {
            tag,
            value,
            origin: None,
        }
    }

    pub(crate) fn with_origin(mut self, origin: Option<Span>) -> Entry {
        self.origin = origin;
        self
    }

    #[inline]
    pub(crate) fn origin(&self) -> Option<Span> {
        self.origin
    }

    /// Returns the tag number.
    #[inline]
    pub fn tag(&self) -> u16 {
        self.tag
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut Value {
        self.origin = None;
        &mut self.value
    }

    /// Replaces the payload (and with it the type code and count).
    #[inline]
    pub fn set_value(&mut self, value: Value) -> Value {
        self.origin = None;
        std::mem::replace(&mut self.value, value)
    }

    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the type of the record, or None for opaque entries.
    #[inline]
    pub fn entry_type(&self) -> Option<EntryType> {
        self.value.entry_type()
    }

    #[inline]
    pub fn type_code(&self) -> u16 {
        self.value.type_code()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.value.count()
    }

    /// Returns true if the entry could not be decoded and is carried
    /// as raw bytes.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        matches!(self.value, Value::Opaque(_))
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.value.kind_name(),
        }
    }

    fn first<T: Copy>(&self, v: &[T], expected: &'static str) -> Result<T, Error> {
        v.first().copied().ok_or(Error::TypeMismatch {
            expected,
            found: "empty value",
        })
    }

    pub fn as_byte(&self) -> Result<u8, Error> {
        match self.value {
            Value::Byte(ref v) => self.first(v, "BYTE"),
            _ => Err(self.mismatch("BYTE")),
        }
    }

    pub fn as_short(&self) -> Result<u16, Error> {
        match self.value {
            Value::Short(ref v) => self.first(v, "SHORT"),
            _ => Err(self.mismatch("SHORT")),
        }
    }

    pub fn as_shorts(&self) -> Result<&[u16], Error> {
        match self.value {
            Value::Short(ref v) => Ok(v),
            _ => Err(self.mismatch("SHORT")),
        }
    }

    pub fn as_long(&self) -> Result<u32, Error> {
        match self.value {
            Value::Long(ref v) => self.first(v, "LONG"),
            _ => Err(self.mismatch("LONG")),
        }
    }

    pub fn as_longs(&self) -> Result<&[u32], Error> {
        match self.value {
            Value::Long(ref v) => Ok(v),
            _ => Err(self.mismatch("LONG")),
        }
    }

    pub fn as_rational(&self) -> Result<Rational, Error> {
        match self.value {
            Value::Rational(ref v) => self.first(v, "RATIONAL"),
            _ => Err(self.mismatch("RATIONAL")),
        }
    }

    pub fn as_srational(&self) -> Result<SRational, Error> {
        match self.value {
            Value::SRational(ref v) => self.first(v, "SRATIONAL"),
            _ => Err(self.mismatch("SRATIONAL")),
        }
    }

    /// Returns the string of an ASCII entry up to the first NUL.
    /// Bytes that are not UTF-8 are replaced.
    pub fn as_ascii(&self) -> Result<Cow<'_, str>, Error> {
        match self.value {
            Value::Ascii(ref v) => {
                let end = v.iter().position(|&c| c == 0).unwrap_or(v.len());
                Ok(String::from_utf8_lossy(&v[..end]))
            }
            _ => Err(self.mismatch("ASCII")),
        }
    }

    /// Returns the bytes of an UNDEFINED or BYTE entry.
    pub fn as_bytes(&self) -> Result<&[u8], Error> {
        match self.value {
            Value::Undefined(ref v) | Value::Byte(ref v) => Ok(v),
            _ => Err(self.mismatch("UNDEFINED")),
        }
    }

    pub fn as_sub_structure(&self) -> Result<&IfdStructure, Error> {
        match self.value {
            Value::SubIfd(ref s) => Ok(&s.structure),
            _ => Err(self.mismatch("sub-IFD")),
        }
    }

    pub fn as_sub_structure_mut(&mut self) -> Result<&mut IfdStructure, Error> {
        match self.value {
            Value::SubIfd(ref mut s) => Ok(&mut s.structure),
            _ => Err(self.mismatch("sub-IFD")),
        }
    }

    pub fn as_makernote(&self) -> Result<&Makernote, Error> {
        match self.value {
            Value::Makernote(ref m) => Ok(m),
            _ => Err(self.mismatch("makernote")),
        }
    }

    pub fn as_makernote_mut(&mut self) -> Result<&mut Makernote, Error> {
        match self.value {
            Value::Makernote(ref mut m) => Ok(m),
            _ => Err(self.mismatch("makernote")),
        }
    }

    pub fn as_thumbnail(&self) -> Result<&[u8], Error> {
        match self.value {
            Value::Thumbnail(ref t) => Ok(&t.data),
            _ => Err(self.mismatch("thumbnail")),
        }
    }

    /// Parses an ASCII entry holding an Exif date ("YYYY:MM:DD HH:MM:SS").
    pub fn as_datetime(&self) -> Result<DateTime, Error> {
        match self.value {
            Value::Ascii(ref v) => DateTime::from_ascii(v),
            _ => Err(self.mismatch("ASCII")),
        }
    }
}

/// A single directory: an ordered list of entries with unique tags.
///
/// The order is the order of the records on disk and is kept when the
/// directory is written back.  New entries are appended.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<Entry>,
    origin: Option<Span>,
}

impl PartialEq for Directory {
    fn eq(&self, other: &Directory) -> bool {
        self.entries == other.entries
    }
}

impl Directory {
    #[inline]
    pub fn new() -> Directory {
        Directory::default()
    }

    pub(crate) fn set_origin(&mut self, origin: Option<Span>) {
        self.origin = origin;
    }

    // The table as read.  A table that still fits is written back there.
    #[inline]
    pub(crate) fn origin(&self) -> Option<Span> {
        self.origin
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    fn position(&self, tag: u16) -> Option<usize> {
        self.entries.iter().position(|e| e.tag == tag)
    }

    #[inline]
    pub fn contains(&self, tag: u16) -> bool {
        self.position(tag).is_some()
    }

    pub fn get(&self, tag: u16) -> Option<&Entry> {
        self.position(tag).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, tag: u16) -> Option<&mut Entry> {
        match self.position(tag) {
            Some(i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Inserts an entry, replacing the one with the same tag in place.
    /// Returns the replaced entry.
    pub fn set(&mut self, entry: Entry) -> Option<Entry> {
        match self.position(entry.tag) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i], entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn remove(&mut self, tag: u16) -> Option<Entry> {
        self.position(tag).map(|i| self.entries.remove(i))
    }

    // Appends an entry read from disk.  A duplicate tag is refused.
    pub(crate) fn push_unique(&mut self, entry: Entry) -> bool {
        if self.contains(entry.tag) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    fn sub_structure_or_insert(&mut self, tag: u16) -> Result<&mut IfdStructure, Error> {
        let i = match self.position(tag) {
            Some(i) => i,
            None => {
                self.entries.push(Entry::new(tag, Value::SubIfd(SubIfd::new())));
                self.entries.len() - 1
            }
        };
        self.entries[i].as_sub_structure_mut()
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Raw bytes of a region that no directory, payload or makernote
/// referenced, such as vendor data or the target of an opaque entry.
/// They are written back at their offset, or after the structure they
/// were found in when that place is no longer part of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedBytes {
    /// The offset of the region in the original data, relative to the
    /// base of its directory family.
    pub offset: u32,
    pub bytes: Vec<u8>,
}

/// A chain of directories and the bytes around them that must survive
/// a rewrite.
///
/// Directory `In(0)` is the first directory of the chain, `In(1)` the
/// one its next-IFD pointer leads to, and so on.  Child directories
/// (Exif, GPS, Interoperability, makernote) are owned by the entries
/// that point to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IfdStructure {
    directories: Vec<Directory>,
    preserved: Vec<PreservedBytes>,
}

impl IfdStructure {
    #[inline]
    pub fn new() -> IfdStructure {
        IfdStructure::default()
    }

    /// Returns true if there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.directories.iter().all(Directory::is_empty)
    }

    #[inline]
    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    #[inline]
    pub fn directory(&self, ifd: In) -> Option<&Directory> {
        self.directories.get(ifd.index() as usize)
    }

    #[inline]
    pub fn directory_mut(&mut self, ifd: In) -> Option<&mut Directory> {
        self.directories.get_mut(ifd.index() as usize)
    }

    /// Returns the directory, appending empty directories to the chain
    /// until it exists.
    pub fn directory_or_insert(&mut self, ifd: In) -> &mut Directory {
        let i = ifd.index() as usize;
        if self.directories.len() <= i {
            self.directories.resize_with(i + 1, Directory::new);
        }
        &mut self.directories[i]
    }

    pub(crate) fn push_directory(&mut self, dir: Directory) {
        self.directories.push(dir);
    }

    /// Returns the entry at (directory, tag).
    pub fn get_entry(&self, ifd: In, tag: u16) -> Option<&Entry> {
        self.directory(ifd).and_then(|d| d.get(tag))
    }

    pub fn get_entry_mut(&mut self, ifd: In, tag: u16) -> Option<&mut Entry> {
        self.directory_mut(ifd).and_then(|d| d.get_mut(tag))
    }

    /// Adds or replaces an entry.  Returns the replaced entry.
    pub fn set_entry(&mut self, ifd: In, entry: Entry) -> Option<Entry> {
        self.directory_or_insert(ifd).set(entry)
    }

    pub fn remove_entry(&mut self, ifd: In, tag: u16) -> Option<Entry> {
        self.directory_mut(ifd).and_then(|d| d.remove(tag))
    }

    /// Returns an iterator over all entries of the chain with their
    /// directory numbers.  Child directories are not descended into.
    pub fn entries(&self) -> impl Iterator<Item = (In, &Entry)> {
        self.directories
            .iter()
            .enumerate()
            .flat_map(|(i, d)| d.iter().map(move |e| (In(i as u16), e)))
    }

    /// Returns the child structure that the entry at (directory, tag)
    /// points to.
    pub fn sub_structure(&self, ifd: In, tag: u16) -> Option<&IfdStructure> {
        self.get_entry(ifd, tag)
            .and_then(|e| e.as_sub_structure().ok())
    }

    pub fn sub_structure_mut(&mut self, ifd: In, tag: u16) -> Option<&mut IfdStructure> {
        self.get_entry_mut(ifd, tag)
            .and_then(|e| e.as_sub_structure_mut().ok())
    }

    /// Returns the child structure at (directory, tag), creating an
    /// empty one if the entry does not exist.  Used to add an Exif or
    /// GPS IFD to data that had none.
    ///
    /// If the entry exists but is not a child directory,
    /// `Error::TypeMismatch` is returned.
    pub fn sub_structure_or_insert(&mut self, ifd: In, tag: u16) -> Result<&mut IfdStructure, Error> {
        self.directory_or_insert(ifd).sub_structure_or_insert(tag)
    }

    /// Sets the JPEG thumbnail of a directory, keeping the offset and
    /// length entries consistent.
    pub fn set_thumbnail(&mut self, ifd: In, data: Vec<u8>) {
        let len = data.len() as u32;
        let dir = self.directory_or_insert(ifd);
        dir.set(Entry::new(
            crate::Tag::JPEGInterchangeFormat.number(),
            Value::Thumbnail(Thumbnail {
                pointer_type: EntryType::Long,
                data,
            }),
        ));
        dir.set(Entry::new(
            crate::Tag::JPEGInterchangeFormatLength.number(),
            Value::Long(vec![len]),
        ));
    }

    /// Returns the regions of the original data that were not part of
    /// any directory or payload.
    #[inline]
    pub fn preserved(&self) -> &[PreservedBytes] {
        &self.preserved
    }

    pub(crate) fn set_preserved(&mut self, preserved: Vec<PreservedBytes>) {
        self.preserved = preserved;
    }

    /// Drops the preserved regions, so that they are not written back.
    pub fn clear_preserved(&mut self) {
        self.preserved.clear();
    }
}

/// An IFD number.
///
/// The IFDs are indexed from 0.  The 0th IFD is for the primary image
/// and the 1st one is for the thumbnail.  Two associated constants,
/// `In::PRIMARY` and `In::THUMBNAIL`, are defined for them respectively.
///
/// # Examples
/// ```
/// use exif_ifd::In;
/// assert_eq!(In::PRIMARY.index(), 0);
/// assert_eq!(In::THUMBNAIL.index(), 1);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct In(pub u16);

impl In {
    pub const PRIMARY: In = In(0);
    pub const THUMBNAIL: In = In(1);

    /// Returns the IFD number.
    #[inline]
    pub fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Display for In {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            0 => f.pad("primary"),
            1 => f.pad("thumbnail"),
            n => f.pad(&format!("IFD{}", n)),
        }
    }
}

/// A struct used to parse a DateTime field.
///
/// # Examples
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use exif_ifd::DateTime;
/// let dt = DateTime::from_ascii(b"2009:06:26 12:58:30")?;
/// assert_eq!(dt.year, 2009);
/// assert_eq!(dt.to_string(), "2009-06-26 12:58:30");
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// The subsecond data in nanoseconds.  If the Exif attribute has
    /// more sigfinicant digits, they are rounded down.
    pub nanosecond: Option<u32>,
    /// The offset of the time zone in minutes.
    pub offset: Option<i16>,
}

impl DateTime {
    /// Parse an ASCII data of a DateTime field.  The range of a number
    /// is not validated, so, for example, 13 may be returned as the month.
    ///
    /// If the value is blank, `Error::BlankValue` is returned.
    pub fn from_ascii(data: &[u8]) -> Result<DateTime, Error> {
        // A trailing NUL is part of an ASCII value on disk.
        let data = match data.iter().position(|&c| c == 0) {
            Some(n) => &data[..n],
            None => data,
        };
        if data == b"    :  :     :  :  " || data == b"                   " {
            return Err(Error::BlankValue("DateTime is blank"));
        } else if data.len() < 19 {
            return Err(Error::InvalidFormat("DateTime too short"));
        } else if !(data[4] == b':'
            && data[7] == b':'
            && data[10] == b' '
            && data[13] == b':'
            && data[16] == b':')
        {
            return Err(Error::InvalidFormat("Invalid DateTime delimiter"));
        }
        Ok(DateTime {
            year: atou16(&data[0..4])?,
            month: atou16(&data[5..7])? as u8,
            day: atou16(&data[8..10])? as u8,
            hour: atou16(&data[11..13])? as u8,
            minute: atou16(&data[14..16])? as u8,
            second: atou16(&data[17..19])? as u8,
            nanosecond: None,
            offset: None,
        })
    }

    /// Parses an SubsecTime-like field.
    pub fn parse_subsec(&mut self, data: &[u8]) -> Result<(), Error> {
        let mut subsec = 0;
        let mut ndigits = 0;
        for &c in data {
            if c == b' ' || c == 0 {
                break;
            }
            subsec = subsec * 10 + ctou32(c)?;
            ndigits += 1;
            if ndigits >= 9 {
                break;
            }
        }
        if ndigits == 0 {
            self.nanosecond = None;
        } else {
            for _ in ndigits..9 {
                subsec *= 10;
            }
            self.nanosecond = Some(subsec);
        }
        Ok(())
    }

    /// Parses an OffsetTime-like field.
    pub fn parse_offset(&mut self, data: &[u8]) -> Result<(), Error> {
        if data == b"   :  " || data == b"      " {
            return Err(Error::BlankValue("OffsetTime is blank"));
        } else if data.len() < 6 {
            return Err(Error::InvalidFormat("OffsetTime too short"));
        } else if data[3] != b':' {
            return Err(Error::InvalidFormat("Invalid OffsetTime delimiter"));
        }
        let hour = atou16(&data[1..3])?;
        let min = atou16(&data[4..6])?;
        let offset = (hour * 60 + min) as i16;
        self.offset = Some(match data[0] {
            b'+' => offset,
            b'-' => -offset,
            _ => return Err(Error::InvalidFormat("Invalid OffsetTime sign")),
        });
        Ok(())
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Opaque, OpaqueReason};
    use crate::Tag;

    #[test]
    fn origin_follows_value() {
        let read = Entry::new(0x10f, Value::Ascii(b"Foo Bar\0".to_vec())).with_origin(Span::new(8, 8));
        assert_eq!(read.origin(), Some(Span { offset: 8, len: 8 }));
        assert_eq!(read, Entry::new(0x10f, Value::Ascii(b"Foo Bar\0".to_vec())));

        let mut e = read.clone();
        e.set_value(Value::Ascii(b"Foo Baz\0".to_vec()));
        assert_eq!(e.origin(), None);
        let mut e = read.clone();
        e.value_mut();
        assert_eq!(e.origin(), None);

        let mut dir = Directory::new();
        dir.set(read);
        let plain = dir.clone();
        dir.set_origin(Span::new(0x10, 18));
        assert_eq!(dir, plain);
        assert_eq!(Span::new(0x10, 18).map(Span::end), Some(0x22));
        assert_eq!(Span::new(usize::MAX, 1), None);
    }

    #[test]
    fn in_convert() {
        assert_eq!(In::PRIMARY.index(), 0);
        assert_eq!(In::THUMBNAIL.index(), 1);
        assert_eq!(In(2).index(), 2);
        assert_eq!(In(65535).index(), 65535);
        assert_eq!(In::PRIMARY, In(0));
    }

    #[test]
    fn in_display() {
        assert_eq!(format!("{:10}", In::PRIMARY), "primary   ");
        assert_eq!(format!("{:>10}", In::THUMBNAIL), " thumbnail");
        assert_eq!(format!("{:10}", In(2)), "IFD2      ");
        assert_eq!(format!("{:^10}", In(65535)), " IFD65535 ");
    }

    #[test]
    fn typed_accessors() {
        let e = Entry::new(0x01, Value::Short(vec![2]));
        assert_eq!(e.as_short().unwrap(), 2);
        assert_err_pat!(
            e.as_long(),
            Error::TypeMismatch { expected: "LONG", found: "SHORT" }
        );
        assert_err_pat!(e.as_ascii(), Error::TypeMismatch { .. });

        let e = Entry::new(0x29, Value::Long(vec![2286]));
        assert_eq!(e.as_long().unwrap(), 2286);
        assert_err_pat!(e.as_short(), Error::TypeMismatch { .. });

        let e = Entry::new(0x26, Value::Undefined(b"0260".to_vec()));
        assert_eq!(e.as_bytes().unwrap(), &[48, 50, 54, 48]);
        assert_err_pat!(e.as_ascii(), Error::TypeMismatch { .. });

        let e = Entry::new(0x10f, Value::Ascii(b"Panasonic\0".to_vec()));
        assert_eq!(e.as_ascii().unwrap(), "Panasonic");
        assert_err_pat!(e.as_bytes(), Error::TypeMismatch { .. });

        let e = Entry::new(0x829a, Value::Rational(vec![(10, 800).into()]));
        assert_eq!(e.as_rational().unwrap().to_f64(), 1.0 / 80.0);
        assert_err_pat!(e.as_srational(), Error::TypeMismatch { .. });

        let e = Entry::new(0x1, Value::Short(vec![]));
        assert_err_pat!(e.as_short(), Error::TypeMismatch { found: "empty value", .. });
        assert_eq!(e.as_shorts().unwrap(), &[] as &[u16]);

        let e = Entry::new(
            0x1,
            Value::Opaque(Opaque {
                type_code: 99,
                count: 1,
                field: [0; 4],
                reason: OpaqueReason::UnknownType,
            }),
        );
        assert!(e.is_opaque());
        assert_err_pat!(e.as_bytes(), Error::TypeMismatch { found: "opaque", .. });
        assert_err_pat!(e.as_sub_structure(), Error::TypeMismatch { .. });
    }

    #[test]
    fn set_value_changes_type_and_count() {
        let mut e = Entry::new(0x8827, Value::Short(vec![100]));
        assert_eq!(e.entry_type(), Some(EntryType::Short));
        assert_eq!(e.count(), 1);
        let old = e.set_value(Value::Long(vec![200, 300]));
        assert_eq!(old, Value::Short(vec![100]));
        assert_eq!(e.entry_type(), Some(EntryType::Long));
        assert_eq!(e.count(), 2);
        assert_eq!(e.type_code(), 4);
    }

    #[test]
    fn directory_keeps_order_and_uniqueness() {
        let mut dir = Directory::new();
        assert!(dir.set(Entry::new(3, Value::Short(vec![3]))).is_none());
        assert!(dir.set(Entry::new(1, Value::Short(vec![1]))).is_none());
        let old = dir.set(Entry::new(3, Value::Long(vec![33]))).unwrap();
        assert_eq!(old.as_short().unwrap(), 3);
        let tags: Vec<u16> = dir.iter().map(Entry::tag).collect();
        assert_eq!(tags, [3, 1]);
        assert!(!dir.push_unique(Entry::new(1, Value::Byte(vec![]))));
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.remove(3).unwrap().as_long().unwrap(), 33);
        assert!(dir.get(3).is_none());
        assert!(dir.remove(3).is_none());
    }

    #[test]
    fn structure_lookup() {
        let mut s = IfdStructure::new();
        assert!(s.is_empty());
        s.set_entry(In::THUMBNAIL, Entry::new(0x103, Value::Short(vec![6])));
        assert_eq!(s.directories().len(), 2);
        assert!(s.directory(In::PRIMARY).unwrap().is_empty());
        assert_eq!(s.get_entry(In::THUMBNAIL, 0x103).unwrap().as_short().unwrap(), 6);
        assert!(s.get_entry(In::PRIMARY, 0x103).is_none());
        assert!(s.get_entry(In(5), 0x103).is_none());
        let all: Vec<(In, u16)> = s.entries().map(|(i, e)| (i, e.tag())).collect();
        assert_eq!(all, [(In::THUMBNAIL, 0x103)]);
        assert!(s.remove_entry(In::THUMBNAIL, 0x103).is_some());
        assert!(s.is_empty());
    }

    #[test]
    fn sub_structure_on_demand() {
        let mut s = IfdStructure::new();
        let exif_ptr = Tag::ExifIFDPointer.number();
        s.sub_structure_or_insert(In::PRIMARY, exif_ptr)
            .unwrap()
            .set_entry(In::PRIMARY, Entry::new(0x8827, Value::Short(vec![100])));
        // Second call finds the same directory.
        s.sub_structure_or_insert(In::PRIMARY, exif_ptr)
            .unwrap()
            .set_entry(In::PRIMARY, Entry::new(0x9000, Value::Undefined(b"0230".to_vec())));
        let exif = s.sub_structure(In::PRIMARY, exif_ptr).unwrap();
        assert_eq!(exif.directory(In::PRIMARY).unwrap().len(), 2);

        s.set_entry(In::PRIMARY, Entry::new(0x8825, Value::Long(vec![0])));
        assert_err_pat!(
            s.sub_structure_or_insert(In::PRIMARY, 0x8825),
            Error::TypeMismatch { .. }
        );
    }

    #[test]
    fn thumbnail_entries() {
        let mut s = IfdStructure::new();
        s.set_thumbnail(In::THUMBNAIL, b"\xff\xd8\xff\xd9".to_vec());
        let e = s.get_entry(In::THUMBNAIL, 0x201).unwrap();
        assert_eq!(e.as_thumbnail().unwrap(), b"\xff\xd8\xff\xd9");
        assert_eq!(s.get_entry(In::THUMBNAIL, 0x202).unwrap().as_long().unwrap(), 4);
    }

    #[test]
    fn date_time() {
        let mut dt = DateTime::from_ascii(b"2016:05:04 03:02:01").unwrap();
        assert_eq!(dt.year, 2016);
        assert_eq!(dt.to_string(), "2016-05-04 03:02:01");

        let e = Entry::new(0x9003, Value::Ascii(b"2009:06:26 12:58:30\0".to_vec()));
        let dto = e.as_datetime().unwrap();
        assert_eq!((dto.year, dto.month, dto.day), (2009, 6, 26));
        assert_eq!((dto.hour, dto.minute, dto.second), (12, 58, 30));

        dt.parse_subsec(b"987").unwrap();
        assert_eq!(dt.nanosecond.unwrap(), 987000000);
        dt.parse_subsec(b"000987").unwrap();
        assert_eq!(dt.nanosecond.unwrap(), 987000);
        dt.parse_subsec(b"9876543219").unwrap();
        assert_eq!(dt.nanosecond.unwrap(), 987654321);
        dt.parse_subsec(b"130   ").unwrap();
        assert_eq!(dt.nanosecond.unwrap(), 130000000);
        dt.parse_subsec(b"").unwrap();
        assert!(dt.nanosecond.is_none());

        dt.parse_offset(b"+01:23").unwrap();
        assert_eq!(dt.offset.unwrap(), 83);
        dt.parse_offset(b"-99:99").unwrap();
        assert_eq!(dt.offset.unwrap(), -6039);
        assert_err_pat!(dt.parse_offset(b"   :  "), Error::BlankValue(_));
        assert_err_pat!(
            DateTime::from_ascii(b"    :  :     :  :  \0"),
            Error::BlankValue(_)
        );
        assert_err_pat!(DateTime::from_ascii(b"2009-06-26 12:58:30"), Error::InvalidFormat(_));
    }
}
