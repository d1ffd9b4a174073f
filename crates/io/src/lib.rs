// File I/O for inventory exports, recorded scans and Excel workbooks

pub mod csv;
pub mod encoding;
pub mod xlsx;

pub use encoding::{detect_encoding, detect_file_encoding, encoding_for_name};
