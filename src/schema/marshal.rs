//! Row-at-a-time encoding against a [`TypeTag`] schema.
//!
//! Rows are written back to back with no framing; the schema alone determines
//! where one row ends and the next begins. Marshal is not transactional: a
//! failing row leaves every byte appended before the failure in place.

use tracing::{debug, trace};

use super::{TypeTag, Value};
use crate::error::{Result, StreamError};
use crate::stream::Stream;

impl Stream {
    /// Appends every row, dispatching each column to the matching `put_*`.
    ///
    /// Fails before writing a row whose length differs from `types`, and
    /// mid-row on the first value whose kind does not match its column.
    /// [`TypeTag::Byte`] columns are rejected before anything is written.
    pub fn marshal<R: AsRef<[Value]>>(&mut self, types: &[TypeTag], rows: &[R]) -> Result<()> {
        validate_schema("marshal", types)?;
        let start_len = self.len();
        for (row_idx, row) in rows.iter().enumerate() {
            if let Err(err) = self.marshal_row(types, row_idx, row.as_ref()) {
                debug!(
                    row = row_idx,
                    written = self.len() - start_len,
                    error = %err,
                    "marshal halted"
                );
                return Err(err);
            }
        }
        trace!(
            rows = rows.len(),
            columns = types.len(),
            bytes = self.len() - start_len,
            "marshal complete"
        );
        Ok(())
    }

    /// Rewinds the cursor and decodes rows until the write extent is reached.
    ///
    /// Either every row decodes or the call fails without returning any. A
    /// truncated final row surfaces as the insufficient-bytes error of the
    /// column that ran out of input.
    pub fn unmarshal(&mut self, types: &[TypeTag]) -> Result<Vec<Vec<Value>>> {
        validate_schema("unmarshal", types)?;
        self.reset_read_pos();
        let end = self.len();
        if types.is_empty() {
            if end == 0 {
                return Ok(Vec::new());
            }
            return Err(StreamError::EmptySchema { remaining: end });
        }

        let mut rows = Vec::new();
        while self.read_pos() < end {
            let mut row = Vec::with_capacity(types.len());
            for (column, &tag) in types.iter().enumerate() {
                match self.get_value(column, tag) {
                    Ok(value) => row.push(value),
                    Err(err) => {
                        debug!(
                            row = rows.len(),
                            column,
                            read_pos = self.read_pos(),
                            error = %err,
                            "unmarshal halted"
                        );
                        return Err(err);
                    }
                }
            }
            rows.push(row);
        }
        trace!(rows = rows.len(), bytes = end, "unmarshal complete");
        Ok(rows)
    }

    fn marshal_row(&mut self, types: &[TypeTag], row_idx: usize, row: &[Value]) -> Result<()> {
        if row.len() != types.len() {
            return Err(StreamError::ShapeMismatch {
                row: row_idx,
                len: row.len(),
                expected: types.len(),
            });
        }
        for (column, (&tag, value)) in types.iter().zip(row).enumerate() {
            match (tag, value) {
                (TypeTag::Bool, Value::Bool(v)) => self.put_bool(*v),
                (TypeTag::Int, Value::Int(v)) => self.put_int(*v),
                (TypeTag::Float, Value::Float(v)) => self.put_float(*v),
                (TypeTag::String, Value::Str(v)) => self.put_string(v),
                _ => {
                    return Err(StreamError::TypeMismatch {
                        row: row_idx,
                        column,
                        value: value.to_string(),
                        actual: value.kind(),
                        expected: tag,
                    })
                }
            }
        }
        Ok(())
    }

    fn get_value(&mut self, column: usize, tag: TypeTag) -> Result<Value> {
        match tag {
            TypeTag::Bool => self.get_bool().map(Value::Bool),
            TypeTag::Int => self.get_int().map(Value::Int),
            TypeTag::Float => self.get_float().map(Value::Float),
            TypeTag::String => self.get_string().map(Value::Str),
            TypeTag::Byte => Err(StreamError::UnsupportedColumn {
                op: "unmarshal",
                column,
                tag,
            }),
        }
    }
}

/// Rejects schemas the row codec cannot round-trip, naming the first
/// unsupported column.
pub fn validate_schema(op: &'static str, types: &[TypeTag]) -> Result<()> {
    match types.iter().position(|tag| !tag.is_marshalable()) {
        Some(column) => Err(StreamError::UnsupportedColumn {
            op,
            column,
            tag: types[column],
        }),
        None => Ok(()),
    }
}
