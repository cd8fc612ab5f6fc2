use num_derive::FromPrimitive;

use super::{MakernoteBase, MakernoteDecoder, MakernoteLayout, MakernoteType};
use crate::endian::Endian;

/// Canon makernote tags.
#[derive(Debug, Copy, Clone, PartialEq, enumn::N, FromPrimitive)]
#[repr(u16)]
pub enum CanonTag {
    CanonCameraSettings = 0x0001,
    CanonFocalLength = 0x0002,
    CanonFlashInfo = 0x0003,
    CanonShotInfo = 0x0004,
    CanonPanorama = 0x0005,
    CanonImageType = 0x0006,
    CanonFirmwareVersion = 0x0007,
    FileNumber = 0x0008,
    OwnerName = 0x0009,
    SerialNumber = 0x000c,
    CanonCameraInfo = 0x000d,
    CanonFileLength = 0x000e,
    CustomFunctions = 0x000f,
    CanonModelID = 0x0010,
    MovieInfo = 0x0011,
    CanonAFInfo = 0x0012,
    ThumbnailImageValidArea = 0x0013,
    SerialNumberFormat = 0x0015,
    SuperMacro = 0x001a,
    DateStampMode = 0x001c,
    MyColors = 0x001d,
    FirmwareRevision = 0x001e,
    Categories = 0x0023,
    FaceDetect1 = 0x0024,
    FaceDetect2 = 0x0025,
    CanonAFInfo2 = 0x0026,
    ImageUniqueID = 0x0028,
    RawDataOffset = 0x0081,
    OriginalDecisionDataOffset = 0x0083,
    PersonalFunctions = 0x0091,
    FileInfo = 0x0093,
    LensModel = 0x0095,
    InternalSerialNumber = 0x0096,
    DustRemovalData = 0x0097,
    ProcessingInfo = 0x00a0,
    MeasuredColor = 0x00aa,
    ColorSpace = 0x00b4,
    SensorInfo = 0x00e0,
    ColorData = 0x4001,
}

/// Canon writes a bare directory with offsets relative to the enclosing
/// TIFF header.  There is no signature to look for.
pub struct Canon;

impl MakernoteDecoder for Canon {
    fn kind(&self) -> MakernoteType {
        MakernoteType::Canon
    }

    fn makes(&self) -> &'static [&'static str] {
        &["canon"]
    }

    fn matches_signature(&self, _block: &[u8]) -> bool {
        false
    }

    fn layout(&self, block: &[u8], outer: Endian) -> Option<MakernoteLayout> {
        if !super::table_fits(block, outer) {
            return None;
        }
        Some(MakernoteLayout {
            header: Vec::new(),
            byte_order: outer,
            base: MakernoteBase::Outer,
            next_pointer: true,
            sub_ifd_tags: &[],
        })
    }

    fn tag_name(&self, number: u16) -> Option<String> {
        CanonTag::n(number).map(|t| format!("{:?}", t))
    }
}
