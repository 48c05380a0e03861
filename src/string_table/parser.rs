use crate::utils::LocalizeError;

use super::{strip_line_ending, LocalizedString, StringTable};

/// 单行注释块：`/* ... */`
fn is_single_line_comment(line: &str) -> bool {
    line.len() >= 4 && line.starts_with("/*") && line.ends_with("*/")
}

/// 注释块结束行：以 `*/` 结尾
fn is_comment_end(line: &str) -> bool {
    line.ends_with("*/")
}

fn is_blank(line: &str) -> bool {
    !line.is_empty() && strip_line_ending(line).is_empty()
}

/// 解析 `.strings` 文本
///
/// 每个条目由一个注释块、紧随其后的翻译行以及任意数量的空行组成：
/// 1. 当前行作为注释块起始；若不是单行注释，则继续读取直到以 `*/` 结尾的行
/// 2. 下一行必须是翻译行，否则返回 `InvalidFormat`
/// 3. 跳过随后的空行（空行不保留）
///
/// 注释行按原样保存（包括换行符）。空文本解析为空表。
pub fn parse(text: &str) -> Result<StringTable, LocalizeError> {
    let mut table = StringTable::new();
    let mut lines = text.split_inclusive('\n').peekable();
    let mut line_number = 0usize;

    while let Some(first) = lines.next() {
        line_number += 1;
        let block_start = line_number;
        let mut comments = vec![first.to_string()];

        if !is_single_line_comment(strip_line_ending(first)) {
            let mut current = first;
            while !is_comment_end(strip_line_ending(current)) {
                current = lines.next().ok_or_else(|| {
                    LocalizeError::invalid_format(
                        block_start,
                        "comment block is not terminated before end of file",
                    )
                })?;
                line_number += 1;
                comments.push(current.to_string());
            }
        }

        let translation = lines.next().ok_or_else(|| {
            LocalizeError::invalid_format(line_number + 1, "missing translation line after comment block")
        })?;
        line_number += 1;

        let string = LocalizedString::parse_at(comments, translation, line_number)?;

        #[cfg(debug_assertions)]
        if table.contains_key(string.key()) {
            eprintln!("[parse] 警告：第 {} 行的键 {:?} 重复出现", line_number, string.key());
        }

        while lines.peek().is_some_and(|line| is_blank(line)) {
            lines.next();
            line_number += 1;
        }

        table.push(string);
    }

    Ok(table)
}
