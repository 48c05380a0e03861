mod parser;
mod writer;


use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::encoding;
use crate::utils::LocalizeError;

pub use parser::parse;
pub use writer::serialize;

/// 翻译行语法：`"<key>" = "<value>";`
///
/// key 使用非贪婪匹配，一行中出现多个 `" = "` 时以第一个为分隔。
/// value 允许为空（新提取的未翻译条目通常为 `""`）。
fn translation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^"(.+?)" = "(.*)";$"#).expect("translation regex"))
}

/// 解析翻译行，返回 (key, value)
pub(crate) fn match_translation(line: &str) -> Option<(String, String)> {
    let caps = translation_regex().captures(line)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// 单个本地化条目：注释块 + 翻译行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedString {
    /// 注释块原文（每行保留原始换行符）
    comments: Vec<String>,
    /// 翻译行原文（不含行尾换行符）
    translation: String,
    key: String,
    value: String,
}

impl LocalizedString {
    /// 从注释块和翻译行创建条目
    ///
    /// 注释块必须能被解析器原样读回：每行以换行符结尾，只有最后一行以 `*/` 结尾。注释块不合法或翻译行不符合语法时
    /// 返回 `InvalidFormat`，行号为注释块内的行号。翻译行尾的换行符会被去除。
    pub fn new(comments: Vec<String>, translation: &str) -> Result<Self, LocalizeError> {
        validate_comment_block(&comments)?;
        Self::parse_at(comments, translation, 1)
    }

    /// 从 key/value 构造条目，翻译行按标准格式生成
    ///
    /// key 中含有 `" = "` 时无法按原样读回，返回 `InvalidFormat`。
    pub fn from_parts(comments: Vec<String>, key: &str, value: &str) -> Result<Self, LocalizeError> {
        let line_number = comments.len() + 1;
        let string = Self::new(comments, &format!("\"{}\" = \"{}\";", key, value))?;

        if string.key != key {
            return Err(LocalizeError::invalid_format(
                line_number,
                format!("key {:?} contains the \" = \" separator", key),
            ));
        }

        Ok(string)
    }

    /// 解析器内部使用，错误信息带上实际行号
    pub(crate) fn parse_at(
        comments: Vec<String>,
        translation: &str,
        line: usize,
    ) -> Result<Self, LocalizeError> {
        if comments.is_empty() {
            return Err(LocalizeError::invalid_format(line, "entry has no comment block"));
        }

        let translation = strip_line_ending(translation);
        let (key, value) = match_translation(translation).ok_or_else(|| {
            LocalizeError::invalid_format(line, format!("expected translation line, found {:?}", translation))
        })?;

        Ok(LocalizedString {
            comments,
            translation: translation.to_string(),
            key,
            value,
        })
    }

    /// 合并用构造：翻译取自 `translation_source`，注释取自 `comments_source`
    pub fn combine(translation_source: &LocalizedString, comments_source: &LocalizedString) -> Self {
        LocalizedString {
            comments: comments_source.comments.clone(),
            translation: translation_source.translation.clone(),
            key: translation_source.key.clone(),
            value: translation_source.value.clone(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn translation_line(&self) -> &str {
        &self.translation
    }

    /// value 为空视为未翻译
    pub fn is_untranslated(&self) -> bool {
        self.value.is_empty()
    }
}

/// 字符串表统计信息
#[derive(Debug, Clone)]
pub struct TableStats {
    pub entry_count: usize,
    pub unique_keys: usize,
    pub untranslated_count: usize,
    pub comment_lines: usize,
    pub duplicate_keys: Vec<String>,
}

impl std::fmt::Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 字符串表统计 ===")?;
        writeln!(f, "条目数量: {}", self.entry_count)?;
        writeln!(f, "唯一键数量: {}", self.unique_keys)?;
        writeln!(f, "未翻译条目: {}", self.untranslated_count)?;
        writeln!(f, "注释行数: {}", self.comment_lines)?;
        if !self.duplicate_keys.is_empty() {
            writeln!(f, "重复的键: {}", self.duplicate_keys.join(", "))?;
        }
        Ok(())
    }
}

/// `.strings` 字符串表
///
/// `strings` 保持文件顺序；`index` 记录每个 key 最后一次出现的位置。
/// 同一 key 重复出现时所有条目都保留在 `strings` 中，查找返回最后一个。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    strings: Vec<LocalizedString>,
    index: HashMap<String, usize>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从文件加载（自动识别 UTF-8 / UTF-16 编码）
    pub fn load(path: &Path) -> Result<Self, LocalizeError> {
        let decoded = encoding::read_text(path)?;

        #[cfg(debug_assertions)]
        println!("[load] {:?} 编码: {}", path, decoded.encoding.name());

        parse(&decoded.text)
    }

    /// 追加条目并更新索引
    pub fn push(&mut self, string: LocalizedString) {
        let position = self.strings.len();
        self.index.insert(string.key.clone(), position);
        self.strings.push(string);
    }

    pub fn get(&self, key: &str) -> Option<&LocalizedString> {
        self.index.get(key).map(|&position| &self.strings[position])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// 条目数量（包括重复的键）
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocalizedString> {
        self.strings.iter()
    }

    pub fn entries(&self) -> &[LocalizedString] {
        &self.strings
    }

    /// 按文件顺序返回不重复的键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        self.strings
            .iter()
            .map(LocalizedString::key)
            .filter(move |key| seen.insert(*key))
    }

    /// 出现多次的键（按首次出现顺序）
    pub fn duplicate_keys(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for string in &self.strings {
            *counts.entry(string.key()).or_default() += 1;
        }
        self.keys()
            .filter(|key| counts.get(key).copied().unwrap_or(0) > 1)
            .map(str::to_string)
            .collect()
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> TableStats {
        TableStats {
            entry_count: self.strings.len(),
            unique_keys: self.index.len(),
            untranslated_count: self.strings.iter().filter(|s| s.is_untranslated()).count(),
            comment_lines: self.strings.iter().map(|s| s.comments.len()).sum(),
            duplicate_keys: self.duplicate_keys(),
        }
    }

    /// 序列化为文本
    pub fn rebuild(&self) -> String {
        serialize(self)
    }

    /// 以 UTF-8 写入文件
    pub fn write_to_file(&self, path: &Path) -> Result<(), LocalizeError> {
        std::fs::write(path, self.rebuild()).map_err(|e| LocalizeError::file_access(path, e))
    }
}

impl FromStr for StringTable {
    type Err = LocalizeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse(text)
    }
}

impl<'a> IntoIterator for &'a StringTable {
    type Item = &'a LocalizedString;
    type IntoIter = std::slice::Iter<'a, LocalizedString>;

    fn into_iter(self) -> Self::IntoIter {
        self.strings.iter()
    }
}

/// 检查注释块能否被解析器原样读回
fn validate_comment_block(comments: &[String]) -> Result<(), LocalizeError> {
    if comments.is_empty() {
        return Err(LocalizeError::invalid_format(1, "entry has no comment block"));
    }

    let last = comments.len() - 1;
    for (i, line) in comments.iter().enumerate() {
        if !line.ends_with('\n') {
            return Err(LocalizeError::invalid_format(i + 1, "comment line must end with a newline"));
        }

        // 解析器在第一个以 `*/` 结尾的行结束注释块
        if strip_line_ending(line).ends_with("*/") != (i == last) {
            return Err(LocalizeError::invalid_format(
                i + 1,
                "comment block must end with `*/` on its last line only",
            ));
        }
    }

    Ok(())
}

/// 去除行尾的 `\n` 或 `\r\n`
pub(crate) fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
