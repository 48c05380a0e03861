use thiserror::Error;
use std::path::{Path, PathBuf};

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum LocalizeError {
    /// 文件不存在、不可读或不可写
    #[error("File access error {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 字符串表语法错误（行号从1开始）
    #[error("invalid file (line {line}): {reason}")]
    InvalidFormat { line: usize, reason: String },

    #[error("Cannot decode {path:?} as {encoding}")]
    Encoding { path: PathBuf, encoding: &'static str },

    /// 合并边界的统一错误，原始错误通过 source() 保留
    #[error("input files have invalid format")]
    InvalidInput(#[source] Box<LocalizeError>),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{tool} exited with {status}")]
    ToolFailed { tool: String, status: String },

    /// 上次运行遗留的暂存文件，可能包含唯一一份翻译
    #[error("Staging file left by an earlier run: {0:?}")]
    StagingExists(PathBuf),
}

impl LocalizeError {
    /// 包装IO错误并附带路径
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LocalizeError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_format(line: usize, reason: impl Into<String>) -> Self {
        LocalizeError::InvalidFormat {
            line,
            reason: reason.into(),
        }
    }

    /// 获取最底层的原始错误（跳过 InvalidInput 包装）
    pub fn root_cause(&self) -> &LocalizeError {
        match self {
            LocalizeError::InvalidInput(inner) => inner.root_cause(),
            other => other,
        }
    }
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<PathBuf, LocalizeError> {
    if !file_path.exists() {
        return Err(LocalizeError::file_access(
            file_path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "原文件不存在"),
        ));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = with_suffix(file_path, &format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path)
        .map_err(|e| LocalizeError::file_access(&backup_path, e))?;

    Ok(backup_path)
}

/// 在完整文件名后追加后缀：`Localizable.strings` -> `Localizable.strings.old`
///
/// 与 `Path::with_extension` 不同，不会替换原有扩展名。
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// 删除文件（文件不存在时忽略）
pub fn remove_if_exists(path: &Path) -> Result<(), LocalizeError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LocalizeError::file_access(path, e)),
    }
}
