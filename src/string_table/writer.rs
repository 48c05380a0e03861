use super::StringTable;

/// 将字符串表序列化为文本
///
/// 按条目顺序输出：注释行原样写出，随后是翻译行加一个 `\n`。
/// 不排序、不插入空行，同一个表总是得到相同的输出。
pub fn serialize(table: &StringTable) -> String {
    let capacity: usize = table
        .iter()
        .map(|s| s.comments().iter().map(String::len).sum::<usize>() + s.translation_line().len() + 1)
        .sum();

    let mut buffer = String::with_capacity(capacity);
    for string in table {
        for comment in string.comments() {
            buffer.push_str(comment);
        }
        buffer.push_str(string.translation_line());
        buffer.push('\n');
    }

    buffer
}
