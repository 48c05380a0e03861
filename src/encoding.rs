//! 文本编码处理
//!
//! 提取工具（genstrings / ibtool）输出 UTF-16 文本，版本库中保存 UTF-8。
//! 读取时按 BOM 识别编码，写出时统一为不带 BOM 的 UTF-8。

use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::utils::LocalizeError;

/// 解码后的文本
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    /// 识别出的源编码
    pub encoding: &'static Encoding,
    pub had_bom: bool,
}

/// 识别编码，返回 (编码, BOM 长度)
///
/// 无 BOM 时根据前两个字节中的 NUL 判断 UTF-16 字节序，否则按 UTF-8 处理。
pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        return (encoding, bom_length);
    }

    if bytes.len() >= 2 && bytes.len() % 2 == 0 {
        match (bytes[0], bytes[1]) {
            (lo, 0) if lo != 0 => return (UTF_16LE, 0),
            (0, hi) if hi != 0 => return (UTF_16BE, 0),
            _ => {}
        }
    }

    (UTF_8, 0)
}

/// 严格解码，遇到非法字节序列时返回识别出的编码作为错误
pub fn decode(bytes: &[u8]) -> Result<DecodedText, &'static Encoding> {
    let (encoding, bom_length) = detect_encoding(bytes);

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_length..])
        .ok_or(encoding)?;

    Ok(DecodedText {
        text: text.into_owned(),
        encoding,
        had_bom: bom_length > 0,
    })
}

/// 读取文件并解码
pub fn read_text(path: &Path) -> Result<DecodedText, LocalizeError> {
    let bytes = std::fs::read(path).map_err(|e| LocalizeError::file_access(path, e))?;

    decode(&bytes).map_err(|encoding| LocalizeError::Encoding {
        path: path.to_path_buf(),
        encoding: encoding.name(),
    })
}

/// 将文件转换为 UTF-8（无 BOM）写入 `destination`
///
/// `source` 与 `destination` 可以是同一个文件。返回源文件的编码。
pub fn convert_to_utf8(source: &Path, destination: &Path) -> Result<&'static Encoding, LocalizeError> {
    let decoded = read_text(source)?;

    std::fs::write(destination, decoded.text.as_bytes())
        .map_err(|e| LocalizeError::file_access(destination, e))?;

    #[cfg(debug_assertions)]
    println!(
        "[convert] {:?} ({}) -> {:?} (UTF-8)",
        source,
        decoded.encoding.name(),
        destination
    );

    Ok(decoded.encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    fn utf16be(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
    }

    #[test]
    fn test_detect_utf16_bom() {
        let bytes = utf16le_with_bom("\"A\" = \"B\";\n");
        let (encoding, bom_length) = detect_encoding(&bytes);
        assert_eq!(encoding, UTF_16LE);
        assert_eq!(bom_length, 2);
    }

    #[test]
    fn test_detect_utf16_without_bom() {
        let (encoding, bom_length) = detect_encoding(&utf16be("/* c */"));
        assert_eq!(encoding, UTF_16BE);
        assert_eq!(bom_length, 0);
    }

    #[test]
    fn test_decode_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("\"Hello\" = \"你好\";\n".as_bytes());

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.encoding, UTF_8);
        assert!(decoded.had_bom);
        assert_eq!(decoded.text, "\"Hello\" = \"你好\";\n");
    }

    #[test]
    fn test_decode_utf16le() {
        let decoded = decode(&utf16le_with_bom("/* Ünïcödé */\n\"K\" = \"V\";\n")).unwrap();
        assert_eq!(decoded.encoding, UTF_16LE);
        assert_eq!(decoded.text, "/* Ünïcödé */\n\"K\" = \"V\";\n");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let result = decode(&[b'/', b'*', 0xC3, 0x28, b'*', b'/']);
        assert_eq!(result.unwrap_err(), UTF_8);
    }

    #[test]
    fn test_decode_empty() {
        let decoded = decode(&[]).unwrap();
        assert!(decoded.text.is_empty());
        assert_eq!(decoded.encoding, UTF_8);
    }

    #[test]
    fn test_convert_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Localizable.strings");
        std::fs::write(&path, utf16le_with_bom("/* c */\n\"Key\" = \"Wert\";\n")).unwrap();

        let source_encoding = convert_to_utf8(&path, &path).unwrap();
        assert_eq!(source_encoding, UTF_16LE);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/* c */\n\"Key\" = \"Wert\";\n");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_text(Path::new("does/not/exist.strings"));
        assert!(matches!(result, Err(LocalizeError::FileAccess { .. })));
    }
}
