pub mod csv_export;
pub mod xlsx;

pub use csv_export::write_rankings_csv;
pub use csv_export::write_rankings_to_csv;
pub use xlsx::write_rankings_to_xlsx;
