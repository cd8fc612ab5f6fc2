use num_derive::FromPrimitive;

use super::{MakernoteBase, MakernoteDecoder, MakernoteLayout, MakernoteType};
use crate::endian::Endian;

/// "Panasonic" padded with NULs to 12 bytes.  The directory follows it
/// directly, with offsets relative to the enclosing TIFF header and no
/// next-IFD pointer.
const SIGNATURE: &[u8] = b"Panasonic\0\0\0";

/// Panasonic makernote tags.
#[derive(Debug, Copy, Clone, PartialEq, enumn::N, FromPrimitive)]
#[repr(u16)]
pub enum PanasonicTag {
    ImageQuality = 0x0001,
    FirmwareVersion = 0x0002,
    WhiteBalance = 0x0003,
    FocusMode = 0x0007,
    AFAreaMode = 0x000f,
    ImageStabilization = 0x001a,
    MacroMode = 0x001c,
    ShootingMode = 0x001f,
    Audio = 0x0020,
    DataDump = 0x0021,
    WhiteBalanceBias = 0x0023,
    FlashBias = 0x0024,
    InternalSerialNumber = 0x0025,
    PanasonicExifVersion = 0x0026,
    ColorEffect = 0x0028,
    TimeSincePowerOn = 0x0029,
    BurstMode = 0x002a,
    SequenceNumber = 0x002b,
    ContrastMode = 0x002c,
    NoiseReduction = 0x002d,
    SelfTimer = 0x002e,
    Rotation = 0x0030,
    AFAssistLamp = 0x0031,
    ColorMode = 0x0032,
    BabyAge = 0x0033,
    OpticalZoomMode = 0x0034,
    ConversionLens = 0x0035,
    TravelDay = 0x0036,
    WorldTimeLocation = 0x003a,
    TextStamp = 0x003b,
    ProgramISO = 0x003c,
    FaceDetInfo = 0x004e,
    LensType = 0x0051,
    LensSerialNumber = 0x0052,
    AccessoryType = 0x0053,
    PrintIM = 0x0e00,
    MakerNoteVersion = 0x8000,
    SceneMode = 0x8001,
}

pub struct Panasonic;

impl MakernoteDecoder for Panasonic {
    fn kind(&self) -> MakernoteType {
        MakernoteType::Panasonic
    }

    fn makes(&self) -> &'static [&'static str] {
        &["panasonic"]
    }

    fn matches_signature(&self, block: &[u8]) -> bool {
        block.starts_with(SIGNATURE)
    }

    fn layout(&self, block: &[u8], outer: Endian) -> Option<MakernoteLayout> {
        if !self.matches_signature(block) {
            return None;
        }
        Some(MakernoteLayout {
            header: SIGNATURE.to_vec(),
            byte_order: outer,
            base: MakernoteBase::Outer,
            next_pointer: false,
            sub_ifd_tags: &[],
        })
    }

    fn tag_name(&self, number: u16) -> Option<String> {
        PanasonicTag::n(number).map(|t| format!("{:?}", t))
    }
}
