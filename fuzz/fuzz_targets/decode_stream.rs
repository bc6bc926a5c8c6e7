#![no_main]

use bstream::{Endian, Stream, StreamOptions, TypeTag};
use libfuzzer_sys::fuzz_target;

const SCHEMAS: &[&[TypeTag]] = &[
    &[TypeTag::Int],
    &[TypeTag::Bool, TypeTag::Int, TypeTag::String],
    &[TypeTag::String, TypeTag::Float],
    &[TypeTag::Float, TypeTag::Bool, TypeTag::String, TypeTag::String],
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let endian = if selector & 0x80 == 0 {
        Endian::Little
    } else {
        Endian::Big
    };
    let opts = StreamOptions::new().endian(endian);

    // arbitrary getter sequence driven by the body
    let mut stream = Stream::from_slice(body, opts);
    for &op in body.iter().take(64) {
        let before = stream.read_pos();
        let ok = match op % 6 {
            0 => stream.get_bool().is_ok(),
            1 => stream.get_byte().is_ok(),
            2 => stream.get_int().is_ok(),
            3 => stream.get_float().is_ok(),
            4 => stream.get_str().is_ok(),
            _ => stream.get_text_bytes().is_ok(),
        };
        if !ok {
            assert_eq!(stream.read_pos(), before);
        }
        assert!(stream.read_pos() <= stream.len());
    }

    let schema = SCHEMAS[usize::from(selector & 0x7f) % SCHEMAS.len()];
    let mut stream = Stream::from_slice(body, opts);
    if let Ok(rows) = stream.unmarshal(schema) {
        assert_eq!(stream.read_pos(), stream.len());
        for row in &rows {
            assert_eq!(row.len(), schema.len());
        }
        let mut again = Stream::with_options(opts);
        again
            .marshal(schema, &rows)
            .expect("decoded rows match their schema");
        assert_eq!(again.len(), body.len());
    }
});
