//! Output formatting for CLI results

pub mod display;
pub mod json;
pub mod table;

pub use display::{ProjectDisplay, detail_rows};
pub use json::format_json;
pub use table::{format_record, format_table};
