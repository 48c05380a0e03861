pub mod encoding;
pub mod io;
pub mod localize;
pub mod merge;
pub mod string_table;
pub mod utils;

// 重新导出主要结构
pub use merge::{merge, merge_files, merge_files_with, merge_with_stats, MergeStats};
pub use string_table::{LocalizedString, StringTable, TableStats};
pub use utils::{create_backup, LocalizeError};

// 常量定义
pub const STRINGS_EXTENSION: &str = "strings";
