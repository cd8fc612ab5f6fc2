use num_derive::FromPrimitive;

use super::{MakernoteBase, MakernoteDecoder, MakernoteLayout, MakernoteType};
use crate::endian::Endian;

const SIGNATURE: &[u8] = b"Nikon\0";

/// Nikon makernote tags (type 3 numbering, mostly shared with the older
/// types).
#[derive(Debug, Copy, Clone, PartialEq, enumn::N, FromPrimitive)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum NikonTag {
    MakerNoteVersion = 0x0001,
    ISO = 0x0002,
    ColorMode = 0x0003,
    Quality = 0x0004,
    WhiteBalance = 0x0005,
    Sharpness = 0x0006,
    FocusMode = 0x0007,
    FlashSetting = 0x0008,
    FlashType = 0x0009,
    WhiteBalanceFineTune = 0x000b,
    WB_RBLevels = 0x000c,
    ProgramShift = 0x000d,
    ExposureDifference = 0x000e,
    ISOSelection = 0x000f,
    DataDump = 0x0010,
    PreviewIFD = 0x0011,
    FlashExposureComp = 0x0012,
    ISOSetting = 0x0013,
    ImageBoundary = 0x0016,
    ImageProcessing = 0x001a,
    CropHiSpeed = 0x001b,
    SerialNumber = 0x001d,
    ColorSpace = 0x001e,
    VRInfo = 0x001f,
    ActiveDLighting = 0x0022,
    PictureControlData = 0x0023,
    WorldTime = 0x0024,
    ISOInfo = 0x0025,
    ImageAdjustment = 0x0080,
    ToneComp = 0x0081,
    AuxiliaryLens = 0x0082,
    LensType = 0x0083,
    Lens = 0x0084,
    FlashMode = 0x0087,
    AFInfo = 0x0088,
    ShootingMode = 0x0089,
    LensFStops = 0x008b,
    ContrastCurve = 0x008c,
    ColorHue = 0x008d,
    SceneMode = 0x008f,
    LightSource = 0x0090,
    ShotInfo = 0x0091,
    HueAdjustment = 0x0092,
    NEFCompression = 0x0093,
    Saturation = 0x0094,
    NoiseReduction = 0x0095,
    ColorBalance = 0x0097,
    LensData = 0x0098,
    SensorPixelSize = 0x009a,
    SerialNumber2 = 0x00a0,
    ShutterCount = 0x00a7,
    FlashInfo = 0x00a8,
    ImageOptimization = 0x00a9,
    VariProgram = 0x00ab,
    ImageStabilization = 0x00ac,
    AFResponse = 0x00ad,
    HighISONoiseReduction = 0x00b1,
    PowerUpTime = 0x00b6,
    AFInfo2 = 0x00b7,
    FileInfo = 0x00b8,
    RetouchInfo = 0x00bb,
}

/// Nikon has used three makernote layouts.
///
/// * Type 3: "Nikon\0", a 2-byte version (0x02 first), 2 bytes of
///   padding, then a complete TIFF header.  Offsets are relative to the
///   embedded header and the byte order is the one it declares.
/// * Type 2: "Nikon\0\x01\0", then a directory relative to the
///   enclosing TIFF header.
/// * Type 1: a bare directory relative to the enclosing TIFF header.
///   Only recognized through the Make field.
pub struct Nikon;

impl MakernoteDecoder for Nikon {
    fn kind(&self) -> MakernoteType {
        MakernoteType::Nikon
    }

    fn makes(&self) -> &'static [&'static str] {
        &["nikon"]
    }

    fn matches_signature(&self, block: &[u8]) -> bool {
        block.starts_with(SIGNATURE)
    }

    fn layout(&self, block: &[u8], outer: Endian) -> Option<MakernoteLayout> {
        let (header, byte_order, base) = if block.starts_with(b"Nikon\0\x02") {
            let order = Endian::from_mark(block.get(10..12)?)?;
            if order.loadu16(block, 12)? != 42 {
                return None;
            }
            (block[..10].to_vec(), order, MakernoteBase::EmbeddedTiff)
        } else if block.starts_with(b"Nikon\0\x01") {
            (block.get(..8)?.to_vec(), outer, MakernoteBase::Outer)
        } else if block.starts_with(SIGNATURE) || !super::table_fits(block, outer) {
            return None;
        } else {
            (Vec::new(), outer, MakernoteBase::Outer)
        };
        Some(MakernoteLayout {
            header,
            byte_order,
            base,
            next_pointer: true,
            sub_ifd_tags: &[NikonTag::PreviewIFD as u16],
        })
    }

    fn tag_name(&self, number: u16) -> Option<String> {
        NikonTag::n(number).map(|t| format!("{:?}", t))
    }
}
