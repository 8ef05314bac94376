//! Single-family reads: each `read_*` confirms its tag before decoding.

use msgpack_codec::{MsgPackError, MsgPackPacker, MsgPackUnpacker, Reader, Value};

fn written(f: impl FnOnce(&mut MsgPackPacker)) -> Vec<u8> {
    let mut packer = MsgPackPacker::new();
    f(&mut packer);
    packer.writer.flush()
}

#[test]
fn fixed_width_writes_read_back() {
    let bytes = written(|p| {
        p.write_nil();
        p.write_bool(true);
        p.write_u8(7);
        p.write_u8(200);
        p.write_u16(7);
        p.write_u32(7);
        p.write_u64(7);
        p.write_i8(-7);
        p.write_i8(-100);
        p.write_i16(-7);
        p.write_i32(-7);
        p.write_i64(-7);
        p.write_f32(0.5);
        p.write_f64(0.25);
        p.write_str("typed").unwrap();
        p.write_bin(&[1, 2]).unwrap();
        p.write_arr_hdr(2).unwrap();
        p.write_map_hdr(20).unwrap();
    });

    let mut r = Reader::new(&bytes);
    let mut u = MsgPackUnpacker::new();
    assert_eq!(u.read_nil(&mut r), Ok(()));
    assert_eq!(u.read_bool(&mut r), Ok(true));
    assert_eq!(u.read_u8(&mut r), Ok(7));
    assert_eq!(u.read_u8(&mut r), Ok(200));
    assert_eq!(u.read_u16(&mut r), Ok(7));
    assert_eq!(u.read_u32(&mut r), Ok(7));
    assert_eq!(u.read_u64(&mut r), Ok(7));
    assert_eq!(u.read_i8(&mut r), Ok(-7));
    assert_eq!(u.read_i8(&mut r), Ok(-100));
    assert_eq!(u.read_i16(&mut r), Ok(-7));
    assert_eq!(u.read_i32(&mut r), Ok(-7));
    assert_eq!(u.read_i64(&mut r), Ok(-7));
    assert_eq!(u.read_f32(&mut r), Ok(0.5));
    assert_eq!(u.read_f64(&mut r), Ok(0.25));
    assert_eq!(u.read_str(&mut r), Ok("typed".to_owned()));
    assert_eq!(u.read_bin(&mut r), Ok(vec![1, 2]));
    assert_eq!(u.read_array_len(&mut r), Ok(2));
    assert_eq!(u.read_map_len(&mut r), Ok(20));
    assert_eq!(r.size(), 0);
}

fn rejected<T>(result: msgpack_codec::Result<T>) -> bool {
    matches!(result, Err(MsgPackError::UnsupportedValue(_)))
}

#[test]
fn mismatched_tag_is_unsupported() {
    let mut u = MsgPackUnpacker::new();
    assert!(rejected(u.read_nil(&mut Reader::new(&[0xc3]))));
    assert!(rejected(u.read_bool(&mut Reader::new(&[0xc0]))));
    assert!(rejected(u.read_u8(&mut Reader::new(&[0xff]))));
    assert!(rejected(u.read_u16(&mut Reader::new(&[0xcc, 0x01]))));
    assert!(rejected(u.read_u32(&mut Reader::new(&[0xcd, 0x00, 0x01]))));
    assert!(rejected(u.read_u64(&mut Reader::new(&[0xd3, 0, 0, 0, 0, 0, 0, 0, 0]))));
    assert!(rejected(u.read_i8(&mut Reader::new(&[0x05]))));
    assert!(rejected(u.read_i16(&mut Reader::new(&[0xcd, 0x00, 0x01]))));
    assert!(rejected(u.read_f32(&mut Reader::new(&[0xcb, 0, 0, 0, 0, 0, 0, 0, 0]))));
    assert!(rejected(u.read_str(&mut Reader::new(&[0xc4, 0x00]))));
    assert!(rejected(u.read_bin(&mut Reader::new(&[0xa0]))));
    assert!(rejected(u.read_array_len(&mut Reader::new(&[0x80]))));
    assert!(rejected(u.read_map_len(&mut Reader::new(&[0x90]))));
}

#[test]
fn mismatch_carries_the_tag_byte() {
    let mut u = MsgPackUnpacker::new();
    let mut r = Reader::new(&[0xcc, 0x01]);
    assert_eq!(
        u.read_u16(&mut r),
        Err(MsgPackError::UnsupportedValue(vec![0xcc]))
    );
    let mut r = Reader::new(&[0xd1, 0xff, 0xff]);
    assert_eq!(
        u.read_i64(&mut r),
        Err(MsgPackError::UnsupportedValue(vec![0xd1]))
    );
}

#[test]
fn typed_reads_report_truncation() {
    let mut u = MsgPackUnpacker::new();
    assert_eq!(u.read_u16(&mut Reader::new(&[0xcd])), Err(MsgPackError::NotEnoughData));
    assert_eq!(u.read_f64(&mut Reader::new(&[0xcb, 0])), Err(MsgPackError::NotEnoughData));
    assert_eq!(u.read_str(&mut Reader::new(&[0xa2, b'a'])), Err(MsgPackError::NotEnoughData));
    assert_eq!(u.read_nil(&mut Reader::new(&[])), Err(MsgPackError::NotEnoughData));
}

#[test]
fn header_reads_compose_with_unpack() {
    let bytes = MsgPackPacker::new()
        .pack(&Value::Map(vec![
            (Value::from("n"), Value::UInt(1)),
            (Value::from("s"), Value::from("two")),
        ]))
        .unwrap();
    let mut r = Reader::new(&bytes);
    let mut u = MsgPackUnpacker::new();
    assert_eq!(u.read_map_len(&mut r), Ok(2));
    assert_eq!(u.read_str(&mut r).as_deref(), Ok("n"));
    assert_eq!(u.read_u8(&mut r), Ok(1));
    assert_eq!(u.read_str(&mut r).as_deref(), Ok("s"));
    assert_eq!(u.unpack(&mut r), Ok(Value::from("two")));
}
