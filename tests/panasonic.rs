//
// Copyright (c) 2017 KAMADA Ken'ichi.
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

// Read, rewrite and edit the Exif region of a Panasonic DMC-FX35 shot.
// The little-endian sample has a thumbnail in the 1st IFD, an
// Interoperability IFD, and some trailing bytes after the last
// directory.

use exif_ifd::makernote::panasonic::PanasonicTag;
use exif_ifd::makernote::{identify, MakernoteType};
use exif_ifd::{
    Context, Endian, Exif, In, OpaqueReason, Rational, Reader, Tag, Value,
};

static SAMPLE: &[u8] = include_bytes!("panasonic.tif");

const MAKERNOTE_OFFSET: u32 = 0x16e;
const MAKERNOTE_LEN: usize = 0x72;
const THUMBNAIL: &[u8] = b"\xff\xd8\xff\xdb\
    \x00\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f\
    \xff\xd9";

fn pana(tag: PanasonicTag) -> Tag {
    Tag(Context::Makernote(MakernoteType::Panasonic), tag as u16)
}

fn ascii(s: &str) -> Value {
    let mut v = s.as_bytes().to_vec();
    v.push(0);
    Value::Ascii(v)
}

// Position of the record of `tag` with type `typ` in a little-endian
// directory.
fn record(data: &[u8], tag: u16, typ: u16) -> usize {
    let mut pat = tag.to_le_bytes().to_vec();
    pat.extend_from_slice(&typ.to_le_bytes());
    data.windows(4).position(|w| w == pat).unwrap()
}

fn check_exif(exif: &Exif) {
    let get = |tag| exif.get_entry(tag, In::PRIMARY).unwrap();
    assert_eq!(get(Tag::Make).as_ascii().unwrap(), "Panasonic");
    assert_eq!(get(Tag::Model).as_ascii().unwrap(), "DMC-FX35");
    assert_eq!(get(Tag::PhotographicSensitivity).as_short().unwrap(), 100);
    assert_eq!(get(Tag::ExposureTime).as_rational().unwrap(), Rational::from((10, 800)));
    assert_eq!(get(Tag::ExposureTime).as_rational().unwrap().to_f64(), 1.0 / 80.0);
    assert_eq!(get(Tag::FNumber).as_rational().unwrap().to_f64(), 2.8);
    assert_eq!(get(Tag::FocalLength).as_rational().unwrap().to_f64(), 4.4);

    for (tag, hour) in [(Tag::DateTime, 12), (Tag::DateTimeOriginal, 12), (Tag::DateTimeDigitized, 14)] {
        let dt = get(tag).as_datetime().unwrap();
        assert_eq!((dt.year, dt.month, dt.day), (2009, 6, 26));
        assert_eq!((dt.hour, dt.minute, dt.second), (hour, 58, 30));
    }
    assert_eq!(get(Tag::InteroperabilityIndex).as_ascii().unwrap(), "R98");
}

fn check_makernote(exif: &Exif) {
    assert_eq!(exif.makernote_type(), Some(MakernoteType::Panasonic));
    let get = |tag| exif.get_entry(pana(tag), In::PRIMARY).unwrap();
    assert_eq!(get(PanasonicTag::ImageQuality).as_short().unwrap(), 2);
    assert_eq!(get(PanasonicTag::WhiteBalance).as_short().unwrap(), 1);
    assert_eq!(get(PanasonicTag::FocusMode).as_short().unwrap(), 1);
    assert_eq!(get(PanasonicTag::TimeSincePowerOn).as_long().unwrap(), 2286);
    let version = get(PanasonicTag::PanasonicExifVersion);
    assert_eq!(version.value(), &Value::Undefined(vec![48, 50, 54, 48]));
    assert_eq!(
        get(PanasonicTag::InternalSerialNumber).as_bytes().unwrap(),
        b"F541006040113\0\0\0"
    );
}

#[test]
fn read_sample() {
    let exif = Reader::new().read_tiff(SAMPLE).unwrap();
    assert_eq!(exif.byte_order(), Endian::Little);
    check_exif(&exif);
    check_makernote(&exif);

    let thumbnail = exif.get_entry(Tag::JPEGInterchangeFormat, In::THUMBNAIL).unwrap();
    assert_eq!(thumbnail.as_thumbnail().unwrap(), THUMBNAIL);
    let len = exif.get_entry(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL).unwrap();
    assert_eq!(len.as_long().unwrap() as usize, THUMBNAIL.len());

    let preserved = exif.structure().preserved();
    assert_eq!(preserved.len(), 1);
    assert_eq!(preserved[0].offset as usize, SAMPLE.len() - 16);
    assert_eq!(preserved[0].bytes, b"\0\0vendor trailer");

    let mn = exif.makernote().unwrap();
    assert_eq!(mn.original_offset(), MAKERNOTE_OFFSET);
    assert_eq!(mn.len(), MAKERNOTE_LEN);
    assert!(!mn.is_modified());
}

#[test]
fn entries_are_named() {
    let exif = Reader::new().read_tiff(SAMPLE).unwrap();
    let names: Vec<String> = exif
        .entries()
        .iter()
        .filter(|&&(tag, _, _)| tag.context() == Context::Makernote(MakernoteType::Panasonic))
        .map(|&(tag, _, _)| tag.to_string())
        .collect();
    assert_eq!(
        names,
        [
            "ImageQuality",
            "WhiteBalance",
            "FocusMode",
            "AFAreaMode",
            "InternalSerialNumber",
            "PanasonicExifVersion",
            "TimeSincePowerOn",
        ]
    );
}

#[test]
fn round_trip() {
    let exif = Reader::new().read_tiff(SAMPLE).unwrap();
    assert_eq!(exif.to_bytes().unwrap(), SAMPLE);

    // The same region inside an APP1 payload.
    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(SAMPLE);
    let exif = Reader::new().decode_region(&app1, 6, Endian::Little).unwrap();
    assert_eq!(exif.to_bytes().unwrap(), SAMPLE);
}

#[test]
fn round_trip_raw_makernote() {
    let exif = Reader::new()
        .decode_makernotes(false)
        .read_tiff(SAMPLE)
        .unwrap();
    assert_eq!(exif.makernote_type(), Some(MakernoteType::Unknown));
    assert!(exif.get_entry(pana(PanasonicTag::ImageQuality), In::PRIMARY).is_none());
    assert_eq!(exif.to_bytes().unwrap(), SAMPLE);
}

#[test]
fn byte_order_change() {
    let mut exif = Reader::new().read_tiff(SAMPLE).unwrap();
    exif.set_byte_order(Endian::Big);
    let first = exif.to_bytes().unwrap();
    assert_eq!(&first[..4], b"MM\0\x2a");

    let exif = Reader::new().read_tiff(&first).unwrap();
    assert_eq!(exif.byte_order(), Endian::Big);
    check_exif(&exif);
    check_makernote(&exif);
    // The makernote directory follows the new byte order.
    let block = exif.makernote().unwrap().raw();
    assert_eq!(&block[12..14], b"\0\x07");
    assert_eq!(exif.to_bytes().unwrap(), first);
}

#[test]
fn edit_makernote() {
    let mut exif = Reader::new().read_tiff(SAMPLE).unwrap();
    let old = exif
        .set_entry(pana(PanasonicTag::TimeSincePowerOn), In::PRIMARY, Value::Long(vec![1000]))
        .unwrap()
        .unwrap();
    assert_eq!(old.as_long().unwrap(), 2286);
    exif.set_entry(pana(PanasonicTag::SequenceNumber), In::PRIMARY, Value::Long(vec![3]))
        .unwrap();
    assert!(exif.makernote().unwrap().is_modified());

    let first = exif.to_bytes().unwrap();
    let exif = Reader::new().read_tiff(&first).unwrap();
    check_exif(&exif);
    let get = |tag| exif.get_entry(pana(tag), In::PRIMARY).unwrap();
    assert_eq!(get(PanasonicTag::TimeSincePowerOn).as_long().unwrap(), 1000);
    assert_eq!(get(PanasonicTag::SequenceNumber).as_long().unwrap(), 3);
    assert_eq!(get(PanasonicTag::ImageQuality).as_short().unwrap(), 2);
    assert_eq!(get(PanasonicTag::PanasonicExifVersion).as_bytes().unwrap(), b"0260");
    assert_eq!(exif.to_bytes().unwrap(), first);
}

#[test]
fn add_exif_and_gps() {
    let mut exif = Reader::new().read_tiff(SAMPLE).unwrap();
    exif.set_entry(Tag::Artist, In::PRIMARY, ascii("Somebody")).unwrap();
    exif.set_entry(Tag::UserComment, In::PRIMARY, Value::Undefined(b"ASCII\0\0\0Hello".to_vec()))
        .unwrap();
    exif.set_entry(Tag::GPSVersionID, In::PRIMARY, Value::Byte(vec![2, 2, 0, 0]))
        .unwrap();
    exif.set_entry(Tag::GPSLatitudeRef, In::PRIMARY, ascii("N")).unwrap();
    let latitude: Vec<Rational> = vec![(35, 1).into(), (40, 1).into(), (1234, 100).into()];
    exif.set_entry(Tag::GPSLatitude, In::PRIMARY, Value::Rational(latitude.clone()))
        .unwrap();

    let first = exif.to_bytes().unwrap();
    let exif = Reader::new().read_tiff(&first).unwrap();
    check_exif(&exif);
    // The grown directories moved; the makernote stayed where it was.
    check_makernote(&exif);
    let mn = exif.makernote().unwrap();
    assert_eq!(mn.original_offset(), MAKERNOTE_OFFSET);
    assert_eq!(mn.raw(), &SAMPLE[MAKERNOTE_OFFSET as usize..][..MAKERNOTE_LEN]);

    let get = |tag| exif.get_entry(tag, In::PRIMARY).unwrap();
    assert_eq!(get(Tag::Artist).as_ascii().unwrap(), "Somebody");
    assert_eq!(get(Tag::UserComment).as_bytes().unwrap(), b"ASCII\0\0\0Hello");
    assert_eq!(get(Tag::GPSVersionID).as_bytes().unwrap(), &[2, 2, 0, 0]);
    assert_eq!(get(Tag::GPSLatitudeRef).as_ascii().unwrap(), "N");
    assert_eq!(get(Tag::GPSLatitude).value(), &Value::Rational(latitude));

    let thumbnail = exif.get_entry(Tag::JPEGInterchangeFormat, In::THUMBNAIL).unwrap();
    assert_eq!(thumbnail.as_thumbnail().unwrap(), THUMBNAIL);
    assert_eq!(&first[SAMPLE.len() - 16..SAMPLE.len()], b"\0\0vendor trailer");
    assert!(first.len() > SAMPLE.len());
    assert_eq!(exif.to_bytes().unwrap(), first);
}

#[test]
fn remove_entries() {
    let mut exif = Reader::new().read_tiff(SAMPLE).unwrap();
    assert!(exif.remove_entry(Tag::Model, In::PRIMARY).is_some());
    assert!(exif.remove_entry(pana(PanasonicTag::AFAreaMode), In::PRIMARY).is_some());

    let exif = Reader::new().read_tiff(&exif.to_bytes().unwrap()).unwrap();
    assert!(exif.get_entry(Tag::Model, In::PRIMARY).is_none());
    assert!(exif.get_entry(pana(PanasonicTag::AFAreaMode), In::PRIMARY).is_none());
    check_makernote(&exif);
}

#[test]
fn unknown_makernote() {
    // A known Make but a block without the vendor signature.
    let mut data = SAMPLE.to_vec();
    data[MAKERNOTE_OFFSET as usize] = b'Q';
    let block = &data[MAKERNOTE_OFFSET as usize..][..MAKERNOTE_LEN];
    assert_eq!(identify(Some("Panasonic"), block), MakernoteType::Unknown);
    assert_eq!(identify(Some("Panasonic"), block), MakernoteType::Unknown);

    let exif = Reader::new().read_tiff(&data).unwrap();
    let mn = exif.makernote().unwrap();
    assert_eq!(mn.kind(), MakernoteType::Unknown);
    assert!(mn.structure().is_none());
    assert_eq!(mn.raw(), block);
    check_exif(&exif);
    assert_eq!(exif.to_bytes().unwrap(), data);

    // The Make alone decides when the signature is intact.
    assert_eq!(
        identify(Some("PANASONIC"), &SAMPLE[MAKERNOTE_OFFSET as usize..]),
        MakernoteType::Panasonic
    );
}

#[test]
fn dispatch_is_deterministic() {
    let a = Reader::new().read_tiff(SAMPLE).unwrap();
    let b = Reader::new().read_tiff(SAMPLE).unwrap();
    assert_eq!(a, b);
}

#[test]
fn malformed_entries_are_contained() {
    // Unknown type for the ISO entry, whose value is inline.
    let mut data = SAMPLE.to_vec();
    let at = record(&data, Tag::PhotographicSensitivity.number(), 3);
    data[at + 2] = 0x99;
    let exif = Reader::new().read_tiff(&data).unwrap();
    let iso = exif.get_entry(Tag::PhotographicSensitivity, In::PRIMARY).unwrap();
    assert!(iso.is_opaque());
    assert_eq!(iso.type_code(), 0x99);
    assert!(iso.as_short().is_err());
    check_makernote(&exif);
    assert_eq!(exif.to_bytes().unwrap(), data);

    // FNumber points past the end of the region.
    let mut data = SAMPLE.to_vec();
    let at = record(&data, Tag::FNumber.number(), 5);
    data[at + 8..at + 12].copy_from_slice(&0xffff_fff0u32.to_le_bytes());
    let exif = Reader::new().read_tiff(&data).unwrap();
    match exif.get_entry(Tag::FNumber, In::PRIMARY).unwrap().value() {
        Value::Opaque(o) => {
            assert_eq!(o.reason, OpaqueReason::OutOfBounds);
            assert_eq!(o.field, 0xffff_fff0u32.to_le_bytes());
        }
        v => panic!("unexpected {:?}", v),
    }
    let get = |tag| exif.get_entry(tag, In::PRIMARY).unwrap();
    assert_eq!(get(Tag::ExposureTime).as_rational().unwrap().to_f64(), 1.0 / 80.0);
    assert_eq!(get(Tag::FocalLength).as_rational().unwrap().to_f64(), 4.4);
    check_makernote(&exif);
    assert_eq!(exif.to_bytes().unwrap(), data);

    let rewritten = Reader::new().read_tiff(&exif.to_bytes().unwrap()).unwrap();
    assert_eq!(
        rewritten.get_entry(Tag::FNumber, In::PRIMARY).unwrap().value(),
        exif.get_entry(Tag::FNumber, In::PRIMARY).unwrap().value()
    );
}
