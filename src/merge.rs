//! 增量合并
//!
//! 旧表保存人工翻译，新表来自最新一次源码提取。合并结果：
//! - 键集合与顺序以新表为准，仅存在于旧表的键被丢弃
//! - 两表都有的键：翻译取旧表，注释取新表（注释中通常是最新的源码位置）
//! - 仅存在于新表的键原样保留

use std::path::Path;

use crate::io::{DefaultTableReader, DefaultTableWriter, TableReader, TableWriter};
use crate::string_table::{LocalizedString, StringTable};
use crate::utils::LocalizeError;

/// 合并统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// 保留了旧翻译的条目
    pub preserved: usize,
    /// 新增（未翻译）的条目
    pub added: usize,
    /// 已从源码中移除的键
    pub dropped: usize,
    /// 新表中重复出现的键
    pub duplicates: Vec<String>,
}

impl std::fmt::Display for MergeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 合并统计 ===")?;
        writeln!(f, "保留翻译: {}", self.preserved)?;
        writeln!(f, "新增条目: {}", self.added)?;
        writeln!(f, "移除条目: {}", self.dropped)?;
        if !self.duplicates.is_empty() {
            writeln!(f, "重复的键: {}", self.duplicates.join(", "))?;
        }
        Ok(())
    }
}

/// 合并旧表和新表
pub fn merge(old: &StringTable, new: &StringTable) -> StringTable {
    merge_with_stats(old, new).0
}

/// 合并并返回统计信息
pub fn merge_with_stats(old: &StringTable, new: &StringTable) -> (StringTable, MergeStats) {
    let mut merged = StringTable::new();
    let mut stats = MergeStats::default();

    for string in new {
        let merged_string = match old.get(string.key()) {
            Some(previous) => {
                stats.preserved += 1;
                LocalizedString::combine(previous, string)
            }
            None => {
                stats.added += 1;
                string.clone()
            }
        };
        merged.push(merged_string);
    }

    stats.dropped = old.keys().filter(|key| !new.contains_key(key)).count();
    stats.duplicates = new.duplicate_keys();

    (merged, stats)
}

impl StringTable {
    /// 以 `self` 为旧表与 `new` 合并
    pub fn merge_with(&self, new: &StringTable) -> StringTable {
        merge(self, new)
    }
}

/// 读取旧文件和新文件，合并后写入 `out_path`
///
/// `out_path` 可以与任一输入相同（两个输入在写入前已完整读入）。
/// 任何读取、解析或写入错误都包装为 `LocalizeError::InvalidInput`，
/// 原始错误可通过 `source()` / `root_cause()` 获取。
pub fn merge_files(out_path: &Path, old_path: &Path, new_path: &Path) -> Result<MergeStats, LocalizeError> {
    merge_files_with(
        out_path,
        old_path,
        new_path,
        &DefaultTableReader,
        &DefaultTableWriter,
    )
}

/// 使用自定义 Reader/Writer 执行文件合并
pub fn merge_files_with(
    out_path: &Path,
    old_path: &Path,
    new_path: &Path,
    reader: &dyn TableReader,
    writer: &dyn TableWriter,
) -> Result<MergeStats, LocalizeError> {
    let run = || -> Result<MergeStats, LocalizeError> {
        let old = reader.read(old_path)?;
        let new = reader.read(new_path)?;
        let (merged, stats) = merge_with_stats(&old, &new);

        #[cfg(debug_assertions)]
        println!(
            "[merge] 旧表 {} 条，新表 {} 条，合并后 {} 条",
            old.len(),
            new.len(),
            merged.len()
        );

        writer.write(&merged, out_path)?;
        Ok(stats)
    };

    run().map_err(|e| LocalizeError::InvalidInput(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> StringTable {
        text.parse().unwrap()
    }

    const OLD: &str = "/* loc: a.m:1 */\n\"Hello\" = \"Bonjour\";\n\n/* loc: c.m:9 */\n\"Gone\" = \"Parti\";\n";
    const NEW: &str = "/* loc: a.m:5 */\n\"Hello\" = \"\";\n/* loc: b.m:2 */\n\"Bye\" = \"\";\n";

    #[test]
    fn test_merge_example_scenario() {
        let old = table("/* loc: a.m:1 */\n\"Hello\" = \"Bonjour\";\n");
        let new = table(NEW);

        let merged = merge(&old, &new);
        assert_eq!(
            merged.rebuild(),
            "/* loc: a.m:5 */\n\"Hello\" = \"Bonjour\";\n/* loc: b.m:2 */\n\"Bye\" = \"\";\n"
        );
    }

    #[test]
    fn test_merge_key_set_follows_new() {
        let old = table(OLD);
        let new = table(NEW);
        let merged = merge(&old, &new);

        for key in new.keys() {
            assert!(merged.contains_key(key), "新表中的键 {} 应该保留", key);
        }
        assert!(!merged.contains_key("Gone"), "仅存在于旧表的键应该被丢弃");
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["Hello", "Bye"]);
    }

    #[test]
    fn test_merge_preserves_translation_and_refreshes_comments() {
        let old = table(OLD);
        let new = table(NEW);
        let merged = merge(&old, &new);

        let hello = merged.get("Hello").unwrap();
        assert_eq!(hello.value(), old.get("Hello").unwrap().value());
        assert_eq!(hello.comments(), new.get("Hello").unwrap().comments());
    }

    #[test]
    fn test_merge_new_key_passthrough() {
        let old = table(OLD);
        let new = table(NEW);
        let merged = merge(&old, &new);

        assert_eq!(merged.get("Bye"), new.get("Bye"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let text = "/* A */\n\"One\" = \"Un\";\n/* multi\n   line */\n\"Two\" = \"Deux\";\n";
        let x = table(text);
        assert_eq!(merge(&x, &x), x);
    }

    #[test]
    fn test_merge_empty_tables() {
        let old = table(OLD);
        let empty = StringTable::new();

        assert!(merge(&old, &empty).is_empty());
        assert_eq!(merge(&empty, &table(NEW)), table(NEW));
    }

    #[test]
    fn test_merge_stats() {
        let (_, stats) = merge_with_stats(&table(OLD), &table(NEW));
        assert_eq!(stats.preserved, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.dropped, 1);
        assert!(stats.duplicates.is_empty());
    }

    #[test]
    fn test_merge_duplicate_keys_in_new_carry_through() {
        let old = table("/* o */\n\"Dup\" = \"Doublon\";\n");
        let new = table("/* 1 */\n\"Dup\" = \"\";\n/* x */\n\"Other\" = \"\";\n/* 2 */\n\"Dup\" = \"\";\n");

        let (merged, stats) = merge_with_stats(&old, &new);
        assert_eq!(
            merged.rebuild(),
            "/* 1 */\n\"Dup\" = \"Doublon\";\n/* x */\n\"Other\" = \"\";\n/* 2 */\n\"Dup\" = \"Doublon\";\n"
        );
        assert_eq!(stats.preserved, 2);
        assert_eq!(stats.duplicates, vec!["Dup".to_string()]);
    }

    #[test]
    fn test_merge_duplicate_keys_in_old_last_wins() {
        let old = table("/* 1 */\n\"Key\" = \"first\";\n/* 2 */\n\"Key\" = \"second\";\n");
        let new = table("/* n */\n\"Key\" = \"\";\n");

        let merged = merge(&old, &new);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.rebuild(), "/* n */\n\"Key\" = \"second\";\n");
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let old = table(OLD);
        let new = table(NEW);
        let (old_before, new_before) = (old.clone(), new.clone());

        let _ = old.merge_with(&new);
        assert_eq!(old, old_before);
        assert_eq!(new, new_before);
    }
}
