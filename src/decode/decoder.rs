// Fri Oct 16 2026 - Alex

use crate::catalog::{Endian, TypeCatalog};
use crate::decode::{DecodeError, Record, Value};
use crate::structure::{FieldType, LayoutDescriptor, ScalarKind, ScalarType};
use bytes::Buf;

/// Reads raw kstat-style byte blobs through a layout.
///
/// Like a straight memory copy into the mirror struct, the blob has to be
/// exactly the layout's size; anything else means the layout is for a
/// different struct or a different ABI.
pub struct RawDecoder {
    endian: Endian,
}

impl RawDecoder {
    pub fn new(endian: Endian) -> Self {
        Self { endian }
    }

    pub fn for_catalog(catalog: &TypeCatalog) -> Self {
        Self::new(catalog.endian())
    }

    pub fn decode(&self, layout: &LayoutDescriptor, data: &[u8]) -> Result<Record, DecodeError> {
        if data.len() as u64 != layout.size() {
            return Err(DecodeError::SizeMismatch {
                layout: layout.name().to_string(),
                expected: layout.size(),
                actual: data.len(),
            });
        }
        self.decode_struct(layout, data)
    }

    /// Decodes a blob holding several records back to back.
    pub fn decode_records(&self, layout: &LayoutDescriptor, data: &[u8]) -> Result<Vec<Record>, DecodeError> {
        let size = layout.size();
        if size == 0 {
            return Err(DecodeError::EmptyLayout(layout.name().to_string()));
        }
        if data.len() as u64 % size != 0 {
            return Err(DecodeError::RaggedRecords {
                layout: layout.name().to_string(),
                record_size: size,
                actual: data.len(),
            });
        }
        log::debug!("decoding {} x {} from {} bytes", data.len() as u64 / size, layout.name(), data.len());
        data.chunks(size as usize)
            .map(|chunk| self.decode_struct(layout, chunk))
            .collect()
    }

    fn decode_struct(&self, layout: &LayoutDescriptor, data: &[u8]) -> Result<Record, DecodeError> {
        let mut record = Record::new();
        for (field, placed) in layout.fields().iter().zip(&layout.placement().fields) {
            let bytes = slice(layout, data, placed.offset, placed.end())?;

            let value = match field.field_type() {
                FieldType::Scalar(scalar) if scalar.kind() == ScalarKind::Char && field.is_array() => {
                    Value::Text(c_field_string(bytes))
                }
                FieldType::Scalar(scalar) => {
                    let mut items = bytes
                        .chunks(scalar.size().max(1) as usize)
                        .map(|chunk| self.decode_scalar(layout, field.name(), scalar, chunk))
                        .collect::<Result<Vec<_>, _>>()?;
                    if field.is_array() {
                        Value::List(items)
                    } else {
                        items.pop().unwrap_or(Value::Unsigned(0))
                    }
                }
                FieldType::Nested(name) => {
                    let nested = layout.nested_layout(name).ok_or_else(|| DecodeError::SizeMismatch {
                        layout: name.clone(),
                        expected: 0,
                        actual: bytes.len(),
                    })?;
                    let mut items = bytes
                        .chunks(nested.size().max(1) as usize)
                        .map(|chunk| self.decode_struct(nested, chunk).map(Value::Record))
                        .collect::<Result<Vec<_>, _>>()?;
                    if field.is_array() {
                        Value::List(items)
                    } else {
                        items.pop().unwrap_or_else(|| Value::Record(Record::new()))
                    }
                }
            };
            record.insert(field.name(), value);
        }
        Ok(record)
    }

    fn decode_scalar(
        &self,
        layout: &LayoutDescriptor,
        field: &str,
        scalar: &ScalarType,
        mut buf: &[u8],
    ) -> Result<Value, DecodeError> {
        let little = self.endian == Endian::Little;
        let value = match (scalar.kind(), scalar.size()) {
            (ScalarKind::Unsigned, 1) => Value::Unsigned(buf.get_u8() as u64),
            (ScalarKind::Signed | ScalarKind::Char, 1) => Value::Signed(buf.get_i8() as i64),
            (ScalarKind::Unsigned, 2) => Value::Unsigned((if little { buf.get_u16_le() } else { buf.get_u16() }) as u64),
            (ScalarKind::Signed | ScalarKind::Char, 2) => {
                Value::Signed((if little { buf.get_i16_le() } else { buf.get_i16() }) as i64)
            }
            (ScalarKind::Unsigned, 4) => Value::Unsigned((if little { buf.get_u32_le() } else { buf.get_u32() }) as u64),
            (ScalarKind::Signed | ScalarKind::Char, 4) => {
                Value::Signed((if little { buf.get_i32_le() } else { buf.get_i32() }) as i64)
            }
            (ScalarKind::Unsigned, 8) => Value::Unsigned(if little { buf.get_u64_le() } else { buf.get_u64() }),
            (ScalarKind::Signed | ScalarKind::Char, 8) => {
                Value::Signed(if little { buf.get_i64_le() } else { buf.get_i64() })
            }
            (ScalarKind::Float, 4) => Value::Float((if little { buf.get_f32_le() } else { buf.get_f32() }) as f64),
            (ScalarKind::Float, 8) => Value::Float(if little { buf.get_f64_le() } else { buf.get_f64() }),
            (_, width) => {
                return Err(DecodeError::UnsupportedWidth {
                    layout: layout.name().to_string(),
                    field: field.to_string(),
                    width,
                })
            }
        };
        Ok(value)
    }
}

fn slice<'a>(layout: &LayoutDescriptor, data: &'a [u8], start: u64, end: u64) -> Result<&'a [u8], DecodeError> {
    data.get(start as usize..end as usize)
        .ok_or_else(|| DecodeError::SizeMismatch {
            layout: layout.name().to_string(),
            expected: layout.size(),
            actual: data.len(),
        })
}

/// Text of a fixed-size C `char` field: everything before the first NUL, or
/// the whole field if it is completely full.
pub fn c_field_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
