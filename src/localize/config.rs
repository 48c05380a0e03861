use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::LocalizeError;

/// 项目本地化配置
///
/// 所有字段都有默认值，JSON 中缺省的字段使用默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizeConfig {
    /// 项目根目录下的应用目录
    pub root_folder: String,
    /// 界面文件所在目录
    pub base_folder: String,
    /// 目标语言目录
    pub language_folder: String,
    pub main_nib_file: String,
    /// 源码字符串表文件名（genstrings 输出）
    pub source_strings_file: String,
    /// 界面字符串表文件名
    pub nib_strings_file: String,
    /// ibtool 临时输出文件名
    pub temporary_strings_file: String,
    /// 扫描源码的目录（相对项目目录，路径分量中可以使用 `*`）
    pub source_dirs: Vec<String>,
    /// 源码扩展名
    pub source_extensions: Vec<String>,
    pub genstrings_command: String,
    pub ibtool_command: String,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        LocalizeConfig {
            root_folder: "Simplenote".to_string(),
            base_folder: "Base.lproj".to_string(),
            language_folder: "en.lproj".to_string(),
            main_nib_file: "MainMenu.xib".to_string(),
            source_strings_file: "Localizable.strings".to_string(),
            nib_strings_file: "MainMenu.strings".to_string(),
            temporary_strings_file: "Temporary.strings".to_string(),
            source_dirs: vec![
                "Simplenote".to_string(),
                "Pods/Simperium-OSX/*/SPAuthentication*".to_string(),
            ],
            source_extensions: vec!["m".to_string(), "swift".to_string()],
            genstrings_command: "genstrings".to_string(),
            ibtool_command: "ibtool".to_string(),
        }
    }
}

impl LocalizeConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self, LocalizeError> {
        let content = std::fs::read_to_string(path).map_err(|e| LocalizeError::file_access(path, e))?;
        let config: LocalizeConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查必填项
    pub fn validate(&self) -> Result<(), LocalizeError> {
        let required = [
            ("root_folder", &self.root_folder),
            ("language_folder", &self.language_folder),
            ("source_strings_file", &self.source_strings_file),
            ("genstrings_command", &self.genstrings_command),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(LocalizeError::Config(format!("{} 不能为空", name)));
            }
        }

        if self.source_extensions.is_empty() {
            return Err(LocalizeError::Config("source_extensions 不能为空".to_string()));
        }

        Ok(())
    }

    /// 应用目录：`<project>/<root_folder>`
    pub fn root_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.root_folder)
    }

    /// 目标语言目录：`<root>/<language_folder>`
    pub fn language_dir(&self, project_dir: &Path) -> PathBuf {
        self.root_path(project_dir).join(&self.language_folder)
    }

    /// 界面文件目录：`<root>/<base_folder>`
    pub fn base_dir(&self, project_dir: &Path) -> PathBuf {
        self.root_path(project_dir).join(&self.base_folder)
    }
}
