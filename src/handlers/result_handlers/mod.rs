pub mod export;
pub mod list;

pub use export::{export_csv, print};
pub use list::{change_status, list, program};
