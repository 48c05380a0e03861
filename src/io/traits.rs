//! IO 抽象层 - trait 定义

use std::path::Path;

use crate::string_table::StringTable;
use crate::utils::LocalizeError;

/// 字符串表读取 trait
///
/// # 职责
/// - 读取并解析 `.strings` 文件（含编码识别）
pub trait TableReader {
    /// 读取字符串表
    ///
    /// # 参数
    /// * `path` - 文件路径
    fn read(&self, path: &Path) -> Result<StringTable, LocalizeError>;
}

/// 字符串表写入 trait
///
/// # 职责
/// - 将 StringTable 序列化为 UTF-8 并写入
pub trait TableWriter {
    /// 写入字符串表
    ///
    /// # 参数
    /// * `table` - 要写入的 StringTable
    /// * `path` - 目标文件路径
    fn write(&self, table: &StringTable, path: &Path) -> Result<(), LocalizeError>;
}
