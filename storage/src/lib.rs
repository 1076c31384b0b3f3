//! 导出产物的读写: 按扩展名分目录, csv/json/xlsx 三种格式, 以及上游产物的读取

pub mod csv_export;
pub mod error;
pub mod input;
pub mod json_export;
pub mod output;
pub mod rows;
pub mod table;
pub mod workbook;

pub use error::{ExportError, InputError};
pub use output::OutputRouter;
pub use table::{Cell, PivotRecord, Table};
