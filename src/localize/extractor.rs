use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;
use walkdir::WalkDir;

use super::config::LocalizeConfig;
use crate::utils::LocalizeError;

/// 字符串提取工具接口
///
/// 两个方法都输出提取工具原生编码（通常为 UTF-16）的字符串表，
/// 编码转换由调用方负责。
pub trait Extractor {
    /// 扫描源码文件，在 `output_dir` 下生成字符串表（genstrings）
    fn extract_sources(&self, sources: &[PathBuf], output_dir: &Path) -> Result<(), LocalizeError>;

    /// 从界面文件生成字符串表（ibtool）
    fn extract_resource(&self, resource: &Path, output: &Path) -> Result<(), LocalizeError>;
}

/// 调用外部命令的提取器
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    pub genstrings: String,
    pub ibtool: String,
}

impl CommandExtractor {
    pub fn from_config(config: &LocalizeConfig) -> Self {
        CommandExtractor {
            genstrings: config.genstrings_command.clone(),
            ibtool: config.ibtool_command.clone(),
        }
    }

    fn run(tool: &str, command: &mut Command) -> Result<(), LocalizeError> {
        #[cfg(debug_assertions)]
        println!("[extract] 执行: {:?}", command);

        let status = command
            .status()
            .map_err(|e| LocalizeError::file_access(tool, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(LocalizeError::ToolFailed {
                tool: tool.to_string(),
                status: status.to_string(),
            })
        }
    }
}

impl Extractor for CommandExtractor {
    fn extract_sources(&self, sources: &[PathBuf], output_dir: &Path) -> Result<(), LocalizeError> {
        Self::run(
            &self.genstrings,
            Command::new(&self.genstrings)
                .arg("-q")
                .arg("-o")
                .arg(output_dir)
                .args(sources),
        )
    }

    fn extract_resource(&self, resource: &Path, output: &Path) -> Result<(), LocalizeError> {
        Self::run(
            &self.ibtool,
            Command::new(&self.ibtool)
                .arg(resource)
                .arg("--generate-strings-file")
                .arg(output),
        )
    }
}

/// 收集需要扫描的源码文件（按路径排序）
///
/// `source_dirs` 中的每一项先经 [`expand_source_pattern`] 展开，再递归遍历。
/// 不存在的源码目录会被跳过。
pub fn collect_source_files(project_dir: &Path, config: &LocalizeConfig) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = config
        .source_dirs
        .iter()
        .flat_map(|pattern| expand_source_pattern(project_dir, pattern))
        .flat_map(|root| WalkDir::new(root).into_iter().filter_map(|e| e.ok()))
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.to_string_lossy())
                .is_some_and(|ext| config.source_extensions.iter().any(|wanted| *wanted == ext))
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files.dedup();
    files
}

/// 展开相对项目目录的路径模式
///
/// 路径分量中的 `*` 匹配任意字符（不跨越 `/`，不匹配以 `.` 开头的名字），
/// 例如 `Pods/Simperium-OSX/*/SPAuthentication*`。返回存在的目录或文件。
pub fn expand_source_pattern(project_dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let mut matches = vec![project_dir.to_path_buf()];

    for component in pattern.split('/').filter(|c| !c.is_empty() && *c != ".") {
        matches = match wildcard_regex(component) {
            None => matches
                .into_iter()
                .map(|path| path.join(component))
                .filter(|path| path.exists())
                .collect(),
            Some(re) => matches
                .iter()
                .filter(|path| path.is_dir())
                .flat_map(|dir| {
                    WalkDir::new(dir)
                        .min_depth(1)
                        .max_depth(1)
                        .sort_by_file_name()
                        .into_iter()
                        .filter_map(|e| e.ok())
                        .filter(|e| {
                            let name = e.file_name().to_string_lossy();
                            !name.starts_with('.') && re.is_match(&name)
                        })
                        .map(|e| e.into_path())
                        .collect::<Vec<_>>()
                })
                .collect(),
        };
    }

    matches
}

/// 含 `*` 的路径分量转换为正则，普通分量返回 None
fn wildcard_regex(component: &str) -> Option<Regex> {
    if !component.contains('*') {
        return None;
    }

    let pattern = component
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", pattern)).ok()
}
