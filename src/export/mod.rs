pub mod writer;

pub use writer::{write_records, CSV_HEADER};
