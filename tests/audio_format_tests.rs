//! Sample format encode / decode tests

use usb_audio_siggen::audio::format::{ByteOrder, SampleFormat, SampleWidth};

const WIDTHS: [SampleWidth; 3] = [SampleWidth::Bits8, SampleWidth::Bits16, SampleWidth::Bits32];
const ORDERS: [ByteOrder; 2] = [ByteOrder::Little, ByteOrder::Big];

/// Value a sample should decode to at each width
fn scaled(sample: i16, width: SampleWidth) -> i32 {
    match width {
        SampleWidth::Bits8 => (sample >> 8) as i32,
        SampleWidth::Bits16 => sample as i32,
        SampleWidth::Bits32 => (sample as i32) << 16,
    }
}

#[test]
fn test_little_endian_reference_decode() {
    let fmt = SampleFormat::new(SampleWidth::Bits16, ByteOrder::Little);
    let mut out = [0u8; 2];
    for sample in [0i16, 1, -1, 12345, -12345, i16::MAX, i16::MIN] {
        fmt.encode(sample, &mut out);
        assert_eq!(i16::from_le_bytes(out), sample);
    }
}

#[test]
fn test_big_endian_reference_decode() {
    let fmt = SampleFormat::new(SampleWidth::Bits32, ByteOrder::Big);
    let mut out = [0u8; 4];
    for sample in [0i16, 1, -1, 12345, -12345, i16::MAX, i16::MIN] {
        fmt.encode(sample, &mut out);
        assert_eq!(i32::from_be_bytes(out), (sample as i32) << 16);
    }
}

#[test]
fn test_decode_matches_encode_all_formats() {
    let mut out = [0u8; 4];
    for width in WIDTHS {
        for order in ORDERS {
            let fmt = SampleFormat::new(width, order);
            for sample in [-32767i16, -300, 0, 255, 32767] {
                fmt.encode(sample, &mut out);
                assert_eq!(
                    fmt.decode(&out[..fmt.bytes_per_sample()]),
                    scaled(sample, width),
                    "{:?}",
                    fmt
                );
            }
        }
    }
}

#[test]
fn test_encode_writes_only_one_sample() {
    let fmt = SampleFormat::new(SampleWidth::Bits16, ByteOrder::Big);
    let mut out = [0xAAu8; 4];
    fmt.encode(0, &mut out);
    assert_eq!(out, [0, 0, 0xAA, 0xAA]);
}

#[test]
fn test_8bit_ignores_byte_order() {
    let mut le = [0u8; 1];
    let mut be = [0u8; 1];
    SampleFormat::new(SampleWidth::Bits8, ByteOrder::Little).encode(0x7F00, &mut le);
    SampleFormat::new(SampleWidth::Bits8, ByteOrder::Big).encode(0x7F00, &mut be);
    assert_eq!(le, be);
    assert_eq!(le[0], 0x7F);
}
