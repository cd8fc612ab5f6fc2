use num_derive::FromPrimitive;

use super::{MakernoteBase, MakernoteDecoder, MakernoteLayout, MakernoteType};
use crate::endian::Endian;

/// Olympus makernote tags.
#[derive(Debug, Copy, Clone, PartialEq, enumn::N, FromPrimitive)]
#[repr(u16)]
pub enum OlympusTag {
    MakerNoteVersion = 0x0000,
    MinoltaCameraSettingsOld = 0x0001,
    MinoltaCameraSettings = 0x0003,
    CompressedImageSize = 0x0040,
    PreviewImageData = 0x0081,
    PreviewImageStart = 0x0088,
    PreviewImageLength = 0x0089,
    ThumbnailImage = 0x0100,
    BodyFirmwareVersion = 0x0104,
    SpecialMode = 0x0200,
    Quality = 0x0201,
    Macro = 0x0202,
    BWMode = 0x0203,
    DigitalZoom = 0x0204,
    FocalPlaneDiagonal = 0x0205,
    LensDistortionParams = 0x0206,
    CameraType = 0x0207,
    TextInfo = 0x0208,
    CameraID = 0x0209,
    PreCaptureFrames = 0x0300,
    WhiteBoard = 0x0301,
    OneTouchWB = 0x0302,
    SerialNumber = 0x0404,
    PrintIM = 0x0e00,
    DataDump = 0x0f00,
    Equipment = 0x2010,
    CameraSettings = 0x2020,
    RawDevelopment = 0x2030,
    RawDevelopment2 = 0x2031,
    ImageProcessing = 0x2040,
    FocusInfo = 0x2050,
    RawInfo = 0x3000,
    MainInfo = 0x4000,
    UnknownInfo = 0x5000,
}

const SUB_IFDS: &[u16] = &[
    OlympusTag::Equipment as u16,
    OlympusTag::CameraSettings as u16,
    OlympusTag::RawDevelopment as u16,
    OlympusTag::RawDevelopment2 as u16,
    OlympusTag::ImageProcessing as u16,
    OlympusTag::FocusInfo as u16,
];

/// Olympus makernotes come in two layouts.
///
/// The old one is "OLYMP\0" and a 2-byte version, followed by a
/// directory relative to the enclosing TIFF header.  The new one is
/// "OLYMPUS\0", a byte order mark and a 2-byte version, followed by a
/// directory relative to the start of the makernote.  OM Digital
/// Solutions cameras use the new layout under "OM SYSTEM\0\0\0".
pub struct Olympus;

impl MakernoteDecoder for Olympus {
    fn kind(&self) -> MakernoteType {
        MakernoteType::Olympus
    }

    fn makes(&self) -> &'static [&'static str] {
        &["olympus", "om digital"]
    }

    fn matches_signature(&self, block: &[u8]) -> bool {
        block.starts_with(b"OLYMP\0")
            || block.starts_with(b"OLYMPUS\0")
            || block.starts_with(b"OM SYSTEM\0")
    }

    fn layout(&self, block: &[u8], outer: Endian) -> Option<MakernoteLayout> {
        let (header_len, byte_order, base) = if block.starts_with(b"OLYMPUS\0") {
            (12, Endian::from_mark(block.get(8..10)?)?, MakernoteBase::Block)
        } else if block.starts_with(b"OM SYSTEM\0\0\0") {
            (16, Endian::from_mark(block.get(12..14)?)?, MakernoteBase::Block)
        } else if block.starts_with(b"OLYMP\0") {
            (8, outer, MakernoteBase::Outer)
        } else {
            return None;
        };
        Some(MakernoteLayout {
            header: block.get(..header_len)?.to_vec(),
            byte_order,
            base,
            next_pointer: true,
            sub_ifd_tags: SUB_IFDS,
        })
    }

    fn tag_name(&self, number: u16) -> Option<String> {
        OlympusTag::n(number).map(|t| format!("{:?}", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_layout() {
        let layout = Olympus.layout(b"OLYMP\0\x01\0\0\0", Endian::Big).unwrap();
        assert_eq!(layout.header, b"OLYMP\0\x01\0");
        assert_eq!(layout.byte_order, Endian::Big);
        assert_eq!(layout.base, MakernoteBase::Outer);
        assert!(Olympus.layout(b"OLYMP\0\x01", Endian::Big).is_none());
    }

    #[test]
    fn new_layout() {
        let layout = Olympus.layout(b"OLYMPUS\0II\x03\0\0\0", Endian::Big).unwrap();
        assert_eq!(layout.header, b"OLYMPUS\0II\x03\0");
        assert_eq!(layout.byte_order, Endian::Little);
        assert_eq!(layout.base, MakernoteBase::Block);
        assert_eq!(layout.sub_ifd_tags.len(), 6);
        assert!(Olympus.layout(b"OLYMPUS\0XX\x03\0\0\0", Endian::Big).is_none());

        let layout = Olympus
            .layout(b"OM SYSTEM\0\0\0MM\x04\0\0\0", Endian::Little)
            .unwrap();
        assert_eq!(layout.header.len(), 16);
        assert_eq!(layout.byte_order, Endian::Big);
    }

    #[test]
    fn makes() {
        assert!(Olympus.matches_make("OLYMPUS IMAGING CORP."));
        assert!(Olympus.matches_make("OM Digital Solutions"));
        assert!(!Olympus.matches_make("Panasonic"));
    }
}
