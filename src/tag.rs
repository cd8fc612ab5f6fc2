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


use std::fmt;

use crate::makernote::MakernoteType;

/// A tag of a directory entry, qualified by the directory it lives in.
///
/// The same number means different things in different directories
/// (0x0001 is GPSLatitudeRef in the GPS IFD, InteroperabilityIndex in
/// the Interoperability IFD and something vendor-specific in every
/// makernote), so the context is part of the tag.
///
/// Entries themselves are keyed by the bare number; see `Tag::number`.
//
// This is not an enum to keep supporting unknown tag values without
// breaking patterns when a new constant is added.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Tag(pub Context, pub u16);

impl Tag {
    /// Returns the context of the tag.
    #[inline]
    pub fn context(self) -> Context {
        self.0
    }

    /// Returns the value of the tag.
    #[inline]
    pub fn number(self) -> u16 {
        self.1
    }

    /// Returns the description of the tag.
    #[inline]
    pub fn description(&self) -> Option<&str> {
        get_tag_info(*self).map(|ti| ti.desc)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ti) = get_tag_info(*self) {
            return f.pad(ti.name);
        }
        if let Context::Makernote(kind) = self.0 {
            if let Some(name) = crate::makernote::tag_name(kind, self.1) {
                return f.pad(&name);
            }
        }
        f.pad(&format!("{:?}", self))
    }
}

/// An enum that indicates how a tag value is interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Context {
    /// TIFF attributes defined in the TIFF Rev. 6.0 specification.
    Tiff, // 0th/1st IFD
    /// Exif attributes.
    Exif, // 0th/1st IFD -- Exif IFD
    /// GPS attributes.
    Gps, // 0th/1st IFD -- GPS IFD
    /// Interoperability attributes.
    Interop, // 0th/1st IFD -- Exif IFD -- Interoperability IFD
    /// Vendor attributes in a makernote (or one of its sub-IFDs).
    Makernote(MakernoteType),
}

macro_rules! generate_well_known_tag_constants {
    (
        $( |$ctx:path| $(
            // Copy the doc attribute to the actual definition.
            $( #[$attr:meta] )*
            ($name:ident, $num:expr, $desc:expr)
        ),+, )+
    ) => (
        // This is not a module to make the constants accessible as
        // `Tag::Make`.
        #[allow(non_upper_case_globals)]
        impl Tag {
            $($(
                $( #[$attr] )*
                pub const $name: Tag = Tag($ctx, $num);
            )+)+
        }

        mod tag_info {
            pub struct TagInfo {
                pub name: &'static str,
                pub desc: &'static str,
            }

            $($(
                #[allow(non_upper_case_globals)]
                pub static $name: TagInfo = TagInfo {
                    name: stringify!($name), desc: $desc };
            )+)+
        }

        fn get_tag_info(tag: Tag) -> Option<&'static tag_info::TagInfo> {
            match tag {
                $($(
                    Tag::$name => Some(&tag_info::$name),
                )+)+
                _ => None,
            }
        }
    )
}

// Tag constant names do not follow the Rust naming conventions but
// the Exif field names: camel cases and all-capital acronyms.
generate_well_known_tag_constants!(
    // Exif-specific IFDs [EXIF23 4.6.3].
    |Context::Tiff|

    /// A pointer to the Exif IFD.  The reader follows it and stores the
    /// directory as a `Value::SubIfd`.
    (ExifIFDPointer, 0x8769, "Exif IFD pointer"),
    /// A pointer to the GPS IFD.  The reader follows it and stores the
    /// directory as a `Value::SubIfd`.
    (GPSInfoIFDPointer, 0x8825, "GPS Info IFD pointer"),

    |Context::Exif|

    /// A pointer to the interoperability IFD.  The reader follows it
    /// and stores the directory as a `Value::SubIfd`.
    (InteropIFDPointer, 0xa005, "Interoperability IFD pointer"),

    // TIFF primary and thumbnail attributes [EXIF23 4.6.4 Table 4,
    // 4.6.8 Table 17, and 4.6.8 Table 21].
    |Context::Tiff|

    (ImageWidth, 0x100, "Image width"),
    (ImageLength, 0x101, "Image height"),
    (BitsPerSample, 0x102, "Number of bits per component"),
    (Compression, 0x103, "Compression scheme"),
    (PhotometricInterpretation, 0x106, "Pixel composition"),
    (ImageDescription, 0x10e, "Image title"),
    /// The manufacturer of the camera.  The makernote dispatcher reads
    /// it to select a vendor decoder.
    (Make, 0x10f, "Manufacturer of image input equipment"),
    (Model, 0x110, "Model of image input equipment"),
    (StripOffsets, 0x111, "Image data location"),
    (Orientation, 0x112, "Orientation of image"),
    (SamplesPerPixel, 0x115, "Number of components"),
    (RowsPerStrip, 0x116, "Number of rows per strip"),
    (StripByteCounts, 0x117, "Bytes per compressed strip"),
    (XResolution, 0x11a, "Image resolution in width direction"),
    (YResolution, 0x11b, "Image resolution in height direction"),
    (PlanarConfiguration, 0x11c, "Image data arrangement"),
    (ResolutionUnit, 0x128, "Unit of X and Y resolution"),
    (TransferFunction, 0x12d, "Transfer function"),
    (Software, 0x131, "Software used"),
    (DateTime, 0x132, "File change date and time"),
    (Artist, 0x13b, "Person who created the image"),
    (WhitePoint, 0x13e, "White point chromaticity"),
    (PrimaryChromaticities, 0x13f, "Chromaticities of primaries"),
    /// The offset of the JPEG thumbnail.  The reader loads the data it
    /// points at and stores it as a `Value::Thumbnail`.
    (JPEGInterchangeFormat, 0x201, "Offset to JPEG SOI"),
    (JPEGInterchangeFormatLength, 0x202, "Bytes of JPEG data"),
    (YCbCrCoefficients, 0x211, "Color space transformation matrix coefficients"),
    (YCbCrSubSampling, 0x212, "Subsampling ratio of Y to C"),
    (YCbCrPositioning, 0x213, "Y and C positioning"),
    (ReferenceBlackWhite, 0x214, "Pair of black and white reference values"),
    (Copyright, 0x8298, "Copyright holder"),

    // Exif IFD attributes [EXIF23 4.6.5 Table 7 and 4.6.8 Table 18].
    |Context::Exif|

    (ExposureTime, 0x829a, "Exposure time"),
    (FNumber, 0x829d, "F number"),
    (ExposureProgram, 0x8822, "Exposure program"),
    (SpectralSensitivity, 0x8824, "Spectral sensitivity"),
    /// Called ISOSpeedRatings in Exif 2.2 and earlier.
    (PhotographicSensitivity, 0x8827, "Photographic sensitivity"),
    (OECF, 0x8828, "Optoelectric conversion factor"),
    (SensitivityType, 0x8830, "Sensitivity type"),
    (ExifVersion, 0x9000, "Exif version"),
    (DateTimeOriginal, 0x9003, "Date and time of original data generation"),
    (DateTimeDigitized, 0x9004, "Date and time of digital data generation"),
    (OffsetTime, 0x9010, "Offset data of DateTime"),
    (OffsetTimeOriginal, 0x9011, "Offset data of DateTimeOriginal"),
    (OffsetTimeDigitized, 0x9012, "Offset data of DateTimeDigitized"),
    (ComponentsConfiguration, 0x9101, "Meaning of each component"),
    (CompressedBitsPerPixel, 0x9102, "Image compression mode"),
    (ShutterSpeedValue, 0x9201, "Shutter speed"),
    (ApertureValue, 0x9202, "Aperture"),
    (BrightnessValue, 0x9203, "Brightness"),
    (ExposureBiasValue, 0x9204, "Exposure bias"),
    (MaxApertureValue, 0x9205, "Maximum lens aperture"),
    (SubjectDistance, 0x9206, "Subject distance"),
    (MeteringMode, 0x9207, "Metering mode"),
    (LightSource, 0x9208, "Light source"),
    (Flash, 0x9209, "Flash"),
    (FocalLength, 0x920a, "Lens focal length"),
    (SubjectArea, 0x9214, "Subject area"),
    /// The vendor makernote.  The reader hands it to the makernote
    /// dispatcher and stores a `Value::Makernote`.
    (MakerNote, 0x927c, "Manufacturer notes"),
    (UserComment, 0x9286, "User comments"),
    (SubSecTime, 0x9290, "DateTime subseconds"),
    (SubSecTimeOriginal, 0x9291, "DateTimeOriginal subseconds"),
    (SubSecTimeDigitized, 0x9292, "DateTimeDigitized subseconds"),
    (FlashpixVersion, 0xa000, "Supported Flashpix version"),
    (ColorSpace, 0xa001, "Color space information"),
    (PixelXDimension, 0xa002, "Valid image width"),
    (PixelYDimension, 0xa003, "Valid image height"),
    (RelatedSoundFile, 0xa004, "Related audio file"),
    (FocalPlaneXResolution, 0xa20e, "Focal plane X resolution"),
    (FocalPlaneYResolution, 0xa20f, "Focal plane Y resolution"),
    (FocalPlaneResolutionUnit, 0xa210, "Focal plane resolution unit"),
    (SensingMethod, 0xa217, "Sensing method"),
    (FileSource, 0xa300, "File source"),
    (SceneType, 0xa301, "Scene type"),
    (CFAPattern, 0xa302, "CFA pattern"),
    (CustomRendered, 0xa401, "Custom image processing"),
    (ExposureMode, 0xa402, "Exposure mode"),
    (WhiteBalance, 0xa403, "White balance"),
    (DigitalZoomRatio, 0xa404, "Digital zoom ratio"),
    (FocalLengthIn35mmFilm, 0xa405, "Focal length in 35 mm film"),
    (SceneCaptureType, 0xa406, "Scene capture type"),
    (GainControl, 0xa407, "Gain control"),
    (Contrast, 0xa408, "Contrast"),
    (Saturation, 0xa409, "Saturation"),
    (Sharpness, 0xa40a, "Sharpness"),
    (SubjectDistanceRange, 0xa40c, "Subject distance range"),
    (ImageUniqueID, 0xa420, "Unique image ID"),
    (LensMake, 0xa433, "Lens manufacturer"),
    (LensModel, 0xa434, "Lens model name"),

    // GPS attributes [EXIF23 4.6.6 Table 15 and 4.6.8 Table 19].
    |Context::Gps|

    (GPSVersionID, 0x0, "GPS tag version"),
    (GPSLatitudeRef, 0x1, "North or south latitude"),
    (GPSLatitude, 0x2, "Latitude"),
    (GPSLongitudeRef, 0x3, "East or West Longitude"),
    (GPSLongitude, 0x4, "Longitude"),
    (GPSAltitudeRef, 0x5, "Altitude reference"),
    (GPSAltitude, 0x6, "Altitude"),
    (GPSTimeStamp, 0x7, "GPS time (atomic clock)"),
    (GPSSatellites, 0x8, "GPS satellites used for measurement"),
    (GPSStatus, 0x9, "GPS receiver status"),
    (GPSMeasureMode, 0xa, "GPS measurement mode"),
    (GPSDOP, 0xb, "Measurement precision"),
    (GPSSpeedRef, 0xc, "Speed unit"),
    (GPSSpeed, 0xd, "Speed of GPS receiver"),
    (GPSTrackRef, 0xe, "Reference for direction of movement"),
    (GPSTrack, 0xf, "Direction of movement"),
    (GPSImgDirectionRef, 0x10, "Reference for direction of image"),
    (GPSImgDirection, 0x11, "Direction of image"),
    (GPSMapDatum, 0x12, "Geodetic survey data used"),
    (GPSDateStamp, 0x1d, "GPS date"),

    // Interoperability attributes [EXIF23 4.6.7 Table 16 and 4.6.8 Table 20].
    |Context::Interop|

    (InteroperabilityIndex, 0x1, "Interoperability identification"),
    (InteroperabilityVersion, 0x2, "Interoperability version"),
    (RelatedImageFileFormat, 0x1000, "Related image file format"),
    (RelatedImageWidth, 0x1001, "Related image width"),
    (RelatedImageLength, 0x1002, "Related image height"),
);
