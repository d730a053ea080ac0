// Fri Oct 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Raw data for {layout} is {actual} bytes, layout is {expected}")]
    SizeMismatch {
        layout: String,
        expected: u64,
        actual: usize,
    },
    #[error("Raw data for {layout} is {actual} bytes, not a multiple of {record_size}")]
    RaggedRecords {
        layout: String,
        record_size: u64,
        actual: usize,
    },
    #[error("Cannot decode {layout}.{field}: unsupported {width}-byte scalar")]
    UnsupportedWidth {
        layout: String,
        field: String,
        width: u64,
    },
    #[error("Layout {0} has zero size")]
    EmptyLayout(String),
}
