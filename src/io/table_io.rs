//! 字符串表 IO 实现

use std::path::Path;

use super::traits::{TableReader, TableWriter};
use crate::string_table::StringTable;
use crate::utils::LocalizeError;

/// 默认的字符串表读取器
#[derive(Debug, Clone, Default)]
pub struct DefaultTableReader;

impl TableReader for DefaultTableReader {
    fn read(&self, path: &Path) -> Result<StringTable, LocalizeError> {
        StringTable::load(path)
    }
}

/// 默认的字符串表写入器
#[derive(Debug, Clone, Default)]
pub struct DefaultTableWriter;

impl TableWriter for DefaultTableWriter {
    fn write(&self, table: &StringTable, path: &Path) -> Result<(), LocalizeError> {
        // 确保父目录存在
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LocalizeError::file_access(parent, e))?;
        }

        table.write_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_table_reader_nonexistent() {
        let reader = DefaultTableReader;
        let result = reader.read(Path::new("nonexistent.strings"));

        assert!(matches!(result, Err(LocalizeError::FileAccess { .. })));
    }

    #[test]
    fn test_writer_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fr.lproj").join("Localizable.strings");

        let table: StringTable = "/* c */\n\"A\" = \"B\";\n".parse().unwrap();
        DefaultTableWriter.write(&table, &path).unwrap();

        let reloaded = DefaultTableReader.read(&path).unwrap();
        assert_eq!(reloaded, table);
    }
}
