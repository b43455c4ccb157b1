// Row sources and event sinks

pub mod csv_file;
pub mod google_sheets;
pub mod intervals_icu;
pub mod json_file;

pub use csv_file::CsvFileSource;
pub use google_sheets::GoogleSheetsSource;
pub use intervals_icu::IntervalsIcuClient;
pub use json_file::JsonFileSink;
