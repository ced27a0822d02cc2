pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod frame;
pub mod polars_utils;
pub mod write;

pub use csv_table::{CsvTable, mangle_duplicate_headers, read_csv_blocks, read_csv_table};
pub use discovery::list_csv_files;
pub use error::IngestError;
pub use frame::dataframe_from_table;
pub use polars_utils::any_to_string;
pub use write::write_csv;
