use num_derive::FromPrimitive;

use super::{MakernoteBase, MakernoteDecoder, MakernoteLayout, MakernoteType};
use crate::endian::Endian;

const SIGNATURE: &[u8] = b"FUJIFILM";

/// Fujifilm makernote tags.
#[derive(Debug, Copy, Clone, PartialEq, enumn::N, FromPrimitive)]
#[repr(u16)]
pub enum FujifilmTag {
    Version = 0x0000,
    InternalSerialNumber = 0x0010,
    Quality = 0x1000,
    Sharpness = 0x1001,
    WhiteBalance = 0x1002,
    Saturation = 0x1003,
    Contrast = 0x1004,
    ColorTemperature = 0x1005,
    Contrast2 = 0x1006,
    WhiteBalanceFineTune = 0x100a,
    NoiseReduction = 0x100b,
    NoiseReduction2 = 0x100e,
    FujiFlashMode = 0x1010,
    FlashExposureComp = 0x1011,
    Macro = 0x1020,
    FocusMode = 0x1021,
    AFMode = 0x1022,
    FocusPixel = 0x1023,
    PrioritySettings = 0x102b,
    FocusSettings = 0x102d,
    AFCSettings = 0x102e,
    SlowSync = 0x1030,
    PictureMode = 0x1031,
    ExposureCount = 0x1032,
    EXRAuto = 0x1033,
    EXRMode = 0x1034,
    ShadowTone = 0x1040,
    HighlightTone = 0x1041,
    DigitalZoom = 0x1044,
    LensModulationOptimizer = 0x1045,
    GrainEffect = 0x1047,
    ColorChromeEffect = 0x1048,
    BWAdjustment = 0x1049,
    CropMode = 0x104d,
    ColorChromeFXBlue = 0x104e,
    ShutterType = 0x1050,
    AutoBracketing = 0x1100,
    SequenceNumber = 0x1101,
    DriveSettings = 0x1103,
    PixelShiftShots = 0x1105,
    PixelShiftOffset = 0x1106,
    PanoramaAngle = 0x1153,
    PanoramaDirection = 0x1154,
    AdvancedFilter = 0x1201,
    ColorMode = 0x1210,
    BlurWarning = 0x1300,
    FocusWarning = 0x1301,
    ExposureWarning = 0x1302,
    GEImageSize = 0x1304,
    DynamicRange = 0x1400,
    FilmMode = 0x1401,
    DynamicRangeSetting = 0x1402,
    DevelopmentDynamicRange = 0x1403,
    MinFocalLength = 0x1404,
    MaxFocalLength = 0x1405,
    MaxApertureAtMinFocal = 0x1406,
    MaxApertureAtMaxFocal = 0x1407,
    AutoDynamicRange = 0x140b,
    ImageStabilization = 0x1422,
    SceneRecognition = 0x1425,
    Rating = 0x1431,
    ImageGeneration = 0x1436,
    ImageCount = 0x1438,
    DRangePriority = 0x1443,
    DRangePriorityAuto = 0x1444,
    DRangePriorityFixed = 0x1445,
    FlickerReduction = 0x1446,
    VideoRecordingMode = 0x3803,
    PeripheralLighting = 0x3804,
    VideoCompression = 0x3806,
    FrameRate = 0x3820,
    FrameWidth = 0x3821,
    FrameHeight = 0x3822,
    FullHDHighSpeedRec = 0x3824,
    FaceElementSelected = 0x4005,
    FacesDetected = 0x4100,
    FacePositions = 0x4103,
    NumFaceElements = 0x4200,
    FaceElementTypes = 0x4201,
    FaceElementPositions = 0x4203,
    FaceRecInfo = 0x4282,
    FileSource = 0x8000,
    OrderNumber = 0x8002,
    FrameNumber = 0x8003,
    Parallax = 0xb211,
}

/// Fujifilm makernotes start with "FUJIFILM" and a little-endian 32-bit
/// offset of the directory.  The directory is always little endian and
/// its offsets are relative to the start of the makernote, whatever the
/// byte order of the enclosing file.
pub struct Fujifilm;

impl MakernoteDecoder for Fujifilm {
    fn kind(&self) -> MakernoteType {
        MakernoteType::Fujifilm
    }

    fn makes(&self) -> &'static [&'static str] {
        &["fujifilm"]
    }

    fn matches_signature(&self, block: &[u8]) -> bool {
        block.starts_with(SIGNATURE)
    }

    fn layout(&self, block: &[u8], _outer: Endian) -> Option<MakernoteLayout> {
        if !self.matches_signature(block) {
            return None;
        }
        let ifd_offset = Endian::Little.loadu32(block, SIGNATURE.len())? as usize;
        if ifd_offset < SIGNATURE.len() + 4 || block.len() < ifd_offset + 2 {
            return None;
        }
        Some(MakernoteLayout {
            header: block[..ifd_offset].to_vec(),
            byte_order: Endian::Little,
            base: MakernoteBase::Block,
            next_pointer: true,
            sub_ifd_tags: &[],
        })
    }

    fn tag_name(&self, number: u16) -> Option<String> {
        FujifilmTag::n(number).map(|t| format!("{:?}", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let block = b"FUJIFILM\x0c\0\0\0\0\0\0\0\0\0";
        let layout = Fujifilm.layout(block, Endian::Big).unwrap();
        assert_eq!(layout.header, b"FUJIFILM\x0c\0\0\0");
        assert_eq!(layout.byte_order, Endian::Little);
        assert_eq!(layout.base, MakernoteBase::Block);
        assert!(layout.next_pointer);
    }

    #[test]
    fn bad_offset() {
        // Points into the signature.
        assert!(Fujifilm.layout(b"FUJIFILM\x04\0\0\0\0\0", Endian::Big).is_none());
        // Points past the end.
        assert!(Fujifilm.layout(b"FUJIFILM\x20\0\0\0\0\0", Endian::Big).is_none());
        assert!(Fujifilm.layout(b"FUJIFILM", Endian::Big).is_none());
    }

    #[test]
    fn tags() {
        assert_eq!(FujifilmTag::n(0x1401), Some(FujifilmTag::FilmMode));
        assert_eq!(Fujifilm.tag_name(0xb211).as_deref(), Some("Parallax"));
    }
}
