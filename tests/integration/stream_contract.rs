#![allow(missing_docs)]

use bstream::{Endian, Stream, StreamError, StreamOptions};

enum Sample {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
}

fn samples() -> Vec<Sample> {
    vec![
        Sample::Bool(false),
        Sample::Bool(true),
        Sample::Int(0),
        Sample::Int(-1),
        Sample::Int(0x0102030405060708),
        Sample::Int(0x1020304050607080),
        Sample::Int(i64::MIN),
        Sample::Int(i64::MAX),
        Sample::Float(0.0),
        Sample::Float(123456789e39),
        Sample::Float(-123456789e39),
        Sample::Float(f64::MIN_POSITIVE),
        Sample::Str(""),
        Sample::Str("qwertyuiopйцукенгшщй世界"),
        Sample::Str(
            "1111111111222222222233333333334444444444555555555566666666667777777777888888888899999999990000000000qqqqqqqqqqwwwwwwwwwweeeeeeeeeerrrrrrrrrr",
        ),
    ]
}

fn write_all(stream: &mut Stream, data: &[Sample]) {
    for sample in data {
        match sample {
            Sample::Bool(v) => stream.put_bool(*v),
            Sample::Int(v) => stream.put_int(*v),
            Sample::Float(v) => stream.put_float(*v),
            Sample::Str(v) => stream.put_string(v),
        }
    }
}

fn read_all(stream: &mut Stream, data: &[Sample]) {
    for (idx, sample) in data.iter().enumerate() {
        match sample {
            Sample::Bool(v) => assert_eq!(stream.get_bool().unwrap(), *v, "[{idx}]"),
            Sample::Int(v) => assert_eq!(stream.get_int().unwrap(), *v, "[{idx}]"),
            Sample::Float(v) => assert_eq!(stream.get_float().unwrap(), *v, "[{idx}]"),
            Sample::Str(v) => assert_eq!(stream.get_string().unwrap(), *v, "[{idx}]"),
        }
    }
    assert_eq!(stream.read_pos(), stream.len());
}

#[test]
fn put_get_sequence_roundtrips() {
    let data = samples();
    let mut stream = Stream::new(0);
    write_all(&mut stream, &data);
    read_all(&mut stream, &data);
}

#[test]
fn put_get_sequence_roundtrips_in_every_byte_order() {
    let data = samples();
    for endian in [Endian::Little, Endian::Big, Endian::Native] {
        let mut stream = Stream::with_options(StreamOptions::new().capacity(16).endian(endian));
        write_all(&mut stream, &data);
        read_all(&mut stream, &data);
    }
}

#[test]
fn byte_order_changes_layout_only() {
    let mut le = Stream::with_options(StreamOptions::new().endian(Endian::Little));
    let mut be = Stream::with_options(StreamOptions::new().endian(Endian::Big));
    for stream in [&mut le, &mut be] {
        stream.put_int(1);
        stream.put_string("ab");
    }
    assert_eq!(le.len(), be.len());
    assert_eq!(&le.as_bytes()[..8], &[1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&be.as_bytes()[..8], &[0, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(&le.as_bytes()[8..], &[2, 0, 0, 0, b'a', b'b']);
    assert_eq!(&be.as_bytes()[8..], &[0, 0, 0, 2, b'a', b'b']);
}

#[test]
fn three_bytes_are_not_an_integer() {
    let mut stream = Stream::new(0);
    stream.extend_from_slice(&[1, 2, 3]);
    let err = stream.get_int().unwrap_err();
    assert_eq!(
        err,
        StreamError::InsufficientBytes {
            op: "get_int",
            required: 8,
            available: 3
        }
    );
    assert!(err.to_string().contains("requires 8 bytes, has 3"));
    assert_eq!(stream.read_pos(), 0);
}

#[test]
fn every_getter_fails_cleanly_on_empty_stream() {
    let mut stream = Stream::new(0);
    assert!(stream.get_bool().unwrap_err().is_insufficient());
    assert!(stream.get_byte().unwrap_err().is_insufficient());
    assert!(stream.get_int().unwrap_err().is_insufficient());
    assert!(stream.get_float().unwrap_err().is_insufficient());
    assert!(stream.get_string().unwrap_err().is_insufficient());
    assert!(stream.get_str().unwrap_err().is_insufficient());
    assert!(stream.get_text_bytes().unwrap_err().is_insufficient());
    assert_eq!(stream.read_pos(), 0);
}

#[test]
fn partial_delivery_can_be_retried() {
    let mut source = Stream::new(0);
    source.put_string("streamed");
    source.put_int(99);
    let wire = source.into_bytes();

    let mut sink = Stream::new(0);
    let mut decoded = None;
    for chunk in wire.chunks(3) {
        sink.extend_from_slice(chunk);
        match sink.get_string() {
            Ok(text) => {
                decoded = Some(text);
                break;
            }
            Err(err) => {
                assert!(err.is_insufficient());
                assert_eq!(sink.read_pos(), 0);
            }
        }
    }
    assert_eq!(decoded.as_deref(), Some("streamed"));
}

#[test]
fn reset_then_reuse() {
    let mut stream = Stream::new(32);
    stream.put_int(5);
    stream.put_string("before");
    stream.reset();
    assert_eq!(stream.len(), 0);
    assert_eq!(stream.read_pos(), 0);
    stream.put_bool(true);
    assert!(stream.get_bool().unwrap());
    assert_eq!(stream.len(), 1);
}

#[test]
fn rereading_after_cursor_rewind() {
    let mut stream = Stream::new(0);
    stream.put_float(2.5);
    assert_eq!(stream.get_float().unwrap(), 2.5);
    stream.reset_read_pos();
    assert_eq!(stream.get_float().unwrap(), 2.5);
    stream.set_read_pos(0);
    assert_eq!(stream.unread().len(), 8);
}
