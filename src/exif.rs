use crate::{
    endian::Endian,
    ifd::{Entry, IfdStructure, In},
    makernote::{Makernote, MakernoteType},
    tag::{Context, Tag},
    writer, Error, Value,
};

/// A struct that holds a parsed TIFF/Exif region.
///
/// The primary chain (0th IFD, 1st IFD, ...) is the top-level
/// structure.  The Exif, GPS and Interoperability IFDs and the makernote
/// are reached through their pointer entries, so entries are looked up
/// by their `Tag`, whose context says which directory they live in.
///
/// # Examples
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use exif_ifd::{Endian, Exif, In, Reader, Tag, Value};
/// let mut exif = Exif::new(Endian::Little, Default::default());
/// exif.set_entry(Tag::Make, In::PRIMARY, Value::Ascii(b"Foo\0".to_vec()))?;
/// exif.set_entry(Tag::PhotographicSensitivity, In::PRIMARY, Value::Short(vec![100]))?;
/// let exif = Reader::new().read_tiff(&exif.to_bytes()?)?;
/// let iso = exif.get_entry(Tag::PhotographicSensitivity, In::PRIMARY).ok_or("no ISO")?;
/// assert_eq!(iso.as_short()?, 100);
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Exif {
    byte_order: Endian,
    structure: IfdStructure,
}

impl Exif {
    pub fn new(byte_order: Endian, structure: IfdStructure) -> Self {
        Self {
            byte_order,
            structure,
        }
    }

    /// Returns the byte order of the TIFF header.
    #[inline]
    pub fn byte_order(&self) -> Endian {
        self.byte_order
    }

    /// Returns true if the Exif data (TIFF structure) is in the
    /// little-endian byte order.
    #[inline]
    pub fn little_endian(&self) -> bool {
        self.byte_order == Endian::Little
    }

    /// Changes the byte order used by `to_bytes`.
    pub fn set_byte_order(&mut self, byte_order: Endian) {
        self.byte_order = byte_order;
    }

    #[inline]
    pub fn structure(&self) -> &IfdStructure {
        &self.structure
    }

    #[inline]
    pub fn structure_mut(&mut self) -> &mut IfdStructure {
        &mut self.structure
    }

    #[inline]
    pub fn into_structure(self) -> IfdStructure {
        self.structure
    }

    // The structure holding the entries of `ctx`, and the directory
    // number inside it.
    fn container(&self, ctx: Context, ifd: In) -> Option<(&IfdStructure, In)> {
        let s = &self.structure;
        Some(match ctx {
            Context::Tiff => (s, ifd),
            Context::Exif => (s.sub_structure(ifd, Tag::ExifIFDPointer.number())?, In::PRIMARY),
            Context::Gps => (s.sub_structure(ifd, Tag::GPSInfoIFDPointer.number())?, In::PRIMARY),
            Context::Interop => (
                s.sub_structure(ifd, Tag::ExifIFDPointer.number())?
                    .sub_structure(In::PRIMARY, Tag::InteropIFDPointer.number())?,
                In::PRIMARY,
            ),
            Context::Makernote(kind) => {
                let mn = self.makernote_in(ifd).filter(|m| m.kind() == kind)?;
                (mn.structure()?, In::PRIMARY)
            }
        })
    }

    /// Returns a reference to the entry specified by the tag and the IFD
    /// number.  For entries outside the primary chain, the IFD number
    /// selects the directory that holds the pointer to theirs.
    pub fn get_entry(&self, tag: Tag, ifd: In) -> Option<&Entry> {
        let (s, at) = self.container(tag.context(), ifd)?;
        s.get_entry(at, tag.number())
    }

    /// Adds or replaces an entry.  The Exif, GPS and Interoperability
    /// IFDs are created when they do not exist yet.  Returns the
    /// replaced entry.
    ///
    /// Makernote entries can only be set in a decoded makernote of the
    /// same vendor; otherwise `Error::TypeMismatch` is returned.
    pub fn set_entry(&mut self, tag: Tag, ifd: In, value: Value) -> Result<Option<Entry>, Error> {
        let entry = Entry::new(tag.number(), value);
        let exif_ptr = Tag::ExifIFDPointer.number();
        let target = match tag.context() {
            Context::Tiff => return Ok(self.structure.set_entry(ifd, entry)),
            Context::Exif => self.structure.sub_structure_or_insert(ifd, exif_ptr)?,
            Context::Gps => self
                .structure
                .sub_structure_or_insert(ifd, Tag::GPSInfoIFDPointer.number())?,
            Context::Interop => self
                .structure
                .sub_structure_or_insert(ifd, exif_ptr)?
                .sub_structure_or_insert(In::PRIMARY, Tag::InteropIFDPointer.number())?,
            Context::Makernote(kind) => self
                .makernote_mut_in(ifd)
                .filter(|m| m.kind() == kind)
                .and_then(Makernote::structure_mut)
                .ok_or(Error::TypeMismatch {
                    expected: "decoded makernote",
                    found: "none",
                })?,
        };
        Ok(target.set_entry(In::PRIMARY, entry))
    }

    /// Removes an entry and returns it.
    pub fn remove_entry(&mut self, tag: Tag, ifd: In) -> Option<Entry> {
        let number = tag.number();
        let exif_ptr = Tag::ExifIFDPointer.number();
        match tag.context() {
            Context::Tiff => self.structure.remove_entry(ifd, number),
            Context::Exif => self
                .structure
                .sub_structure_mut(ifd, exif_ptr)?
                .remove_entry(In::PRIMARY, number),
            Context::Gps => self
                .structure
                .sub_structure_mut(ifd, Tag::GPSInfoIFDPointer.number())?
                .remove_entry(In::PRIMARY, number),
            Context::Interop => self
                .structure
                .sub_structure_mut(ifd, exif_ptr)?
                .sub_structure_mut(In::PRIMARY, Tag::InteropIFDPointer.number())?
                .remove_entry(In::PRIMARY, number),
            Context::Makernote(kind) => self
                .makernote_mut_in(ifd)
                .filter(|m| m.kind() == kind)?
                .structure_mut()?
                .remove_entry(In::PRIMARY, number),
        }
    }

    fn makernote_in(&self, ifd: In) -> Option<&Makernote> {
        self.structure
            .sub_structure(ifd, Tag::ExifIFDPointer.number())?
            .get_entry(In::PRIMARY, Tag::MakerNote.number())?
            .as_makernote()
            .ok()
    }

    fn makernote_mut_in(&mut self, ifd: In) -> Option<&mut Makernote> {
        self.structure
            .sub_structure_mut(ifd, Tag::ExifIFDPointer.number())?
            .get_entry_mut(In::PRIMARY, Tag::MakerNote.number())?
            .as_makernote_mut()
            .ok()
    }

    /// Returns the makernote of the primary image.
    #[inline]
    pub fn makernote(&self) -> Option<&Makernote> {
        self.makernote_in(In::PRIMARY)
    }

    #[inline]
    pub fn makernote_mut(&mut self) -> Option<&mut Makernote> {
        self.makernote_mut_in(In::PRIMARY)
    }

    /// Returns the vendor of the primary makernote, if there is one.
    pub fn makernote_type(&self) -> Option<MakernoteType> {
        self.makernote().map(Makernote::kind)
    }

    /// Returns all entries in depth-first order, each with its tag and
    /// the IFD number of the primary chain it belongs to.
    pub fn entries(&self) -> Vec<(Tag, In, &Entry)> {
        let mut out = Vec::new();
        collect(&self.structure, Context::Tiff, None, &mut out);
        out
    }

    /// Encodes the structure as a TIFF region.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        writer::encode(&self.structure, self.byte_order)
    }
}

fn collect<'a>(s: &'a IfdStructure, ctx: Context, parent: Option<In>, out: &mut Vec<(Tag, In, &'a Entry)>) {
    for (i, e) in s.entries() {
        let ifd = parent.unwrap_or(i);
        out.push((Tag(ctx, e.tag()), ifd, e));
        match e.value() {
            Value::SubIfd(sub) => {
                let child = match Tag(ctx, e.tag()) {
                    Tag::ExifIFDPointer => Context::Exif,
                    Tag::GPSInfoIFDPointer => Context::Gps,
                    Tag::InteropIFDPointer => Context::Interop,
                    _ => ctx,
                };
                collect(&sub.structure, child, Some(ifd), out);
            }
            Value::Makernote(m) => {
                if let Some(ms) = m.structure() {
                    collect(ms, Context::Makernote(m.kind()), Some(ifd), out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;

    #[test]
    fn set_creates_sub_ifds() {
        let mut exif = Exif::new(Endian::Big, IfdStructure::new());
        exif.set_entry(Tag::InteroperabilityIndex, In::PRIMARY, Value::Ascii(b"R98\0".to_vec()))
            .unwrap();
        exif.set_entry(Tag::GPSVersionID, In::PRIMARY, Value::Byte(vec![2, 2, 0, 0]))
            .unwrap();
        let old = exif
            .set_entry(Tag::ExifVersion, In::PRIMARY, Value::Undefined(b"0230".to_vec()))
            .unwrap();
        assert!(old.is_none());

        let exif = Reader::new().read_tiff(&exif.to_bytes().unwrap()).unwrap();
        let index = exif.get_entry(Tag::InteroperabilityIndex, In::PRIMARY).unwrap();
        assert_eq!(index.as_ascii().unwrap(), "R98");
        let gps = exif.get_entry(Tag::GPSVersionID, In::PRIMARY).unwrap();
        assert_eq!(gps.as_bytes().unwrap(), &[2, 2, 0, 0]);
        assert!(exif.get_entry(Tag::GPSVersionID, In::THUMBNAIL).is_none());

        let tags: Vec<Tag> = exif.entries().iter().map(|&(t, _, _)| t).collect();
        assert_eq!(
            tags,
            [
                Tag::ExifIFDPointer,
                Tag::InteropIFDPointer,
                Tag::InteroperabilityIndex,
                Tag::ExifVersion,
                Tag::GPSInfoIFDPointer,
                Tag::GPSVersionID,
            ]
        );
    }

    #[test]
    fn makernote_entries_need_a_makernote() {
        let mut exif = Exif::new(Endian::Big, IfdStructure::new());
        let tag = Tag(Context::Makernote(MakernoteType::Canon), 0x6);
        assert_err_pat!(
            exif.set_entry(tag, In::PRIMARY, Value::Ascii(b"IMG\0".to_vec())),
            Error::TypeMismatch { .. }
        );
        assert!(exif.get_entry(tag, In::PRIMARY).is_none());
        assert!(exif.makernote_type().is_none());
    }

    #[test]
    fn remove() {
        let mut exif = Exif::new(Endian::Little, IfdStructure::new());
        exif.set_entry(Tag::ExposureTime, In::PRIMARY, Value::Rational(vec![(1, 80).into()]))
            .unwrap();
        assert!(exif.remove_entry(Tag::ExposureTime, In::PRIMARY).is_some());
        assert!(exif.remove_entry(Tag::ExposureTime, In::PRIMARY).is_none());
        assert!(exif.remove_entry(Tag::GPSVersionID, In::PRIMARY).is_none());
        // The Exif IFD stays, empty.
        assert!(exif
            .structure()
            .sub_structure(In::PRIMARY, Tag::ExifIFDPointer.number())
            .unwrap()
            .is_empty());
    }
}
