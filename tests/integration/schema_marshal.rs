#![allow(missing_docs)]

use bstream::{encoded_row_len, parse_schema, Stream, StreamError, TypeTag, Value};
use proptest::prelude::*;

const LONG_TEXT: &str = "1111111111222222222233333333334444444444555555555566666666667777777777888888888899999999990000000000qqqqqqqqqqwwwwwwwwwweeeeeeeeeerrrrrrrrrr";

/// Wide rows mixing every supported column kind and input width.
fn wide_table(rows: usize) -> (Vec<TypeTag>, Vec<Vec<Value>>) {
    let mut types = vec![TypeTag::Bool];
    types.extend([TypeTag::Int; 6]);
    types.extend([TypeTag::String; 3]);
    types.extend([TypeTag::Float; 40]);

    let data = (0..rows)
        .map(|i| {
            let mut row = vec![
                Value::from(i % 2 == 0),
                Value::from(i as i32),
                Value::from(i as u32),
                Value::from(i as i64),
                Value::from(i as u64),
                Value::from(i as isize),
                Value::from(i),
                Value::from(""),
                Value::from("qwertyuiopйцукенгшщй世界"),
                Value::from(LONG_TEXT),
            ];
            for j in 0..20u8 {
                row.push(Value::from(f32::from(j)));
                row.push(Value::from(f64::from(j)));
            }
            row
        })
        .collect();
    (types, data)
}

#[test]
fn bool_int_string_rows_roundtrip() {
    let types = parse_schema("bool,int,string").unwrap();
    let rows = vec![
        vec![Value::from(true), Value::from(7), Value::from("x")],
        vec![Value::from(false), Value::from(-7), Value::from("")],
    ];
    let mut stream = Stream::new(0);
    stream.marshal(&types, &rows).unwrap();
    assert_eq!(stream.unmarshal(&types).unwrap(), rows);
}

#[test]
fn wide_table_roundtrips_with_exact_size() {
    let (types, rows) = wide_table(1000);
    let expected_len: usize = rows.iter().map(|row| encoded_row_len(row)).sum();
    let mut stream = Stream::new(expected_len);
    stream.marshal(&types, &rows).unwrap();
    assert_eq!(stream.len(), expected_len);

    let decoded = stream.unmarshal(&types).unwrap();
    assert_eq!(decoded.len(), 1000);
    assert_eq!(decoded, rows);
    assert_eq!(stream.read_pos(), stream.len());
}

#[test]
fn repeated_unmarshal_replays_from_start() {
    let (types, rows) = wide_table(3);
    let mut stream = Stream::new(0);
    stream.marshal(&types, &rows).unwrap();
    let first = stream.unmarshal(&types).unwrap();
    let second = stream.unmarshal(&types).unwrap();
    assert_eq!(first, second);
}

#[test]
fn marshal_appends_after_existing_content() {
    let types = [TypeTag::Int];
    let mut stream = Stream::new(0);
    stream.marshal(&types, &[vec![Value::from(1)]]).unwrap();
    stream.marshal(&types, &[vec![Value::from(2)]]).unwrap();
    assert_eq!(
        stream.unmarshal(&types).unwrap(),
        vec![vec![Value::Int(1)], vec![Value::Int(2)]]
    );
}

#[test]
fn shape_mismatch_scenario() {
    let mut stream = Stream::new(0);
    let err = stream
        .marshal(&[TypeTag::Bool, TypeTag::Int], &[vec![Value::from(true)]])
        .unwrap_err();
    assert_eq!(
        err,
        StreamError::ShapeMismatch {
            row: 0,
            len: 1,
            expected: 2
        }
    );
}

#[test]
fn shape_mismatch_on_later_row_keeps_earlier_rows() {
    let types = [TypeTag::Bool];
    let rows = vec![
        vec![Value::from(true)],
        vec![Value::from(false)],
        vec![Value::from(true), Value::from(false)],
    ];
    let mut stream = Stream::new(0);
    let err = stream.marshal(&types, &rows).unwrap_err();
    assert!(matches!(
        err,
        StreamError::ShapeMismatch {
            row: 2,
            len: 2,
            expected: 1
        }
    ));
    assert_eq!(stream.as_bytes(), &[1, 0]);
}

#[test]
fn type_mismatch_scenario() {
    let mut stream = Stream::new(0);
    let err = stream
        .marshal(&[TypeTag::String], &[vec![Value::from(42)]])
        .unwrap_err();
    match &err {
        StreamError::TypeMismatch {
            row,
            column,
            value,
            actual,
            expected,
        } => {
            assert_eq!((*row, *column), (0, 0));
            assert_eq!(value, "42");
            assert_eq!(*actual, "int");
            assert_eq!(*expected, TypeTag::String);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(stream.is_empty());
}

#[test]
fn float_column_rejects_integers() {
    let mut stream = Stream::new(0);
    let err = stream
        .marshal(&[TypeTag::Float], &[vec![Value::from(1)]])
        .unwrap_err();
    assert!(matches!(
        err,
        StreamError::TypeMismatch {
            expected: TypeTag::Float,
            actual: "int",
            ..
        }
    ));
}

#[test]
fn trailing_partial_row_fails_whole_unmarshal() {
    let types = [TypeTag::Int, TypeTag::String];
    let mut stream = Stream::new(0);
    stream
        .marshal(&types, &[vec![Value::from(1), Value::from("one")]])
        .unwrap();
    stream.put_int(2);
    stream.extend_from_slice(&[3, 0]);
    let err = stream.unmarshal(&types).unwrap_err();
    assert_eq!(
        err,
        StreamError::TruncatedLengthPrefix {
            op: "get_string",
            required: 4,
            available: 2
        }
    );
}

#[test]
fn byte_tag_is_rejected_by_both_directions() {
    let types = [TypeTag::Byte];
    let mut stream = Stream::new(0);
    assert!(matches!(
        stream.marshal(&types, &[vec![Value::from(1u8)]]),
        Err(StreamError::UnsupportedColumn {
            op: "marshal",
            tag: TypeTag::Byte,
            ..
        })
    ));
    stream.put_byte(1);
    assert!(matches!(
        stream.unmarshal(&types),
        Err(StreamError::UnsupportedColumn {
            op: "unmarshal",
            ..
        })
    ));
    stream.reset_read_pos();
    assert_eq!(stream.get_byte().unwrap(), 1);
}

proptest! {
    #[test]
    fn k_rows_in_k_rows_out(
        k in 0usize..64,
        flag in any::<bool>(),
        n in any::<i64>(),
        text in ".{0,24}",
    ) {
        let types = [TypeTag::Bool, TypeTag::Int, TypeTag::String];
        let row = vec![Value::from(flag), Value::from(n), Value::from(text)];
        let rows = vec![row; k];
        let mut stream = Stream::new(0);
        stream.marshal(&types, &rows).unwrap();
        let decoded = stream.unmarshal(&types).unwrap();
        prop_assert_eq!(decoded.len(), k);
        prop_assert_eq!(stream.read_pos(), stream.len());
    }
}
