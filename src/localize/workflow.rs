use std::path::{Path, PathBuf};

use super::config::LocalizeConfig;
use super::extractor::{collect_source_files, Extractor};
use crate::encoding::convert_to_utf8;
use crate::merge::{merge_files, MergeStats};
use crate::string_table::StringTable;
use crate::utils::{remove_if_exists, with_suffix, LocalizeError};

/// 源码本地化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcesOutcome {
    /// 已有字符串表，与新提取结果合并
    Merged(MergeStats),
    /// 首次本地化，直接生成字符串表
    Created { entries: usize },
}

/// 项目本地化执行器
pub struct Localizer<'a> {
    config: &'a LocalizeConfig,
    extractor: &'a dyn Extractor,
    project_dir: PathBuf,
}

impl<'a> Localizer<'a> {
    pub fn new(config: &'a LocalizeConfig, extractor: &'a dyn Extractor, project_dir: PathBuf) -> Self {
        Localizer {
            config,
            extractor,
            project_dir,
        }
    }

    /// 源码字符串表路径
    pub fn source_strings_path(&self) -> PathBuf {
        self.config
            .language_dir(&self.project_dir)
            .join(&self.config.source_strings_file)
    }

    /// 界面字符串表路径
    pub fn nib_strings_path(&self) -> PathBuf {
        self.config
            .language_dir(&self.project_dir)
            .join(&self.config.nib_strings_file)
    }

    /// 本地化源码字符串
    ///
    /// 已有字符串表时：
    /// 1. 原文件重命名为 `.old`
    /// 2. 提取工具在语言目录中生成新文件（UTF-16），转换为 UTF-8 写入 `.new`
    /// 3. 合并 `.old` 与 `.new`，写回原路径
    /// 4. 合并成功后删除 `.old` / `.new`
    ///
    /// 提取或合并失败时 `.old` 会被恢复到原路径。合并失败时 `.new` 保留不删，
    /// 错误返回给调用方。
    ///
    /// `.old` 已存在（上次运行中断）时拒绝执行，返回 `StagingExists`。
    ///
    /// 没有字符串表时直接提取并转换为 UTF-8。
    pub fn localize_sources(&self) -> Result<SourcesOutcome, LocalizeError> {
        let language_dir = self.config.language_dir(&self.project_dir);
        std::fs::create_dir_all(&language_dir).map_err(|e| LocalizeError::file_access(&language_dir, e))?;

        let original = self.source_strings_path();
        let sources = collect_source_files(&self.project_dir, self.config);

        #[cfg(debug_assertions)]
        println!("[localize] 扫描 {} 个源码文件", sources.len());

        if !original.exists() {
            self.extractor.extract_sources(&sources, &language_dir)?;
            convert_to_utf8(&original, &original)?;

            let table = StringTable::load(&original)?;
            return Ok(SourcesOutcome::Created { entries: table.len() });
        }

        let old = with_suffix(&original, "old");
        let new = with_suffix(&original, "new");

        if old.exists() {
            return Err(LocalizeError::StagingExists(old));
        }

        std::fs::rename(&original, &old).map_err(|e| LocalizeError::file_access(&original, e))?;

        if let Err(e) = self.extract_into(&sources, &language_dir, &original, &new) {
            restore_original(&old, &original)?;
            remove_if_exists(&new)?;
            return Err(e);
        }

        let stats = match merge_files(&original, &old, &new) {
            Ok(stats) => stats,
            Err(e) => {
                // 原路径此时是提取工具的输出
                restore_original(&old, &original)?;
                return Err(e);
            }
        };

        remove_if_exists(&old)?;
        remove_if_exists(&new)?;

        Ok(SourcesOutcome::Merged(stats))
    }

    /// 提取并把 UTF-8 结果写入 `new`
    fn extract_into(
        &self,
        sources: &[PathBuf],
        language_dir: &Path,
        original: &Path,
        new: &Path,
    ) -> Result<(), LocalizeError> {
        self.extractor.extract_sources(sources, language_dir)?;
        convert_to_utf8(original, new)?;
        Ok(())
    }

    /// 本地化界面文件字符串
    ///
    /// ibtool 输出到临时文件，转换为 UTF-8 后写入目标文件，然后删除临时文件。
    pub fn localize_nibs(&self) -> Result<PathBuf, LocalizeError> {
        let language_dir = self.config.language_dir(&self.project_dir);
        std::fs::create_dir_all(&language_dir).map_err(|e| LocalizeError::file_access(&language_dir, e))?;

        let input = self
            .config
            .base_dir(&self.project_dir)
            .join(&self.config.main_nib_file);
        let temporary = language_dir.join(&self.config.temporary_strings_file);
        let output = self.nib_strings_path();

        self.extractor.extract_resource(&input, &temporary)?;
        convert_to_utf8(&temporary, &output)?;
        remove_if_exists(&temporary)?;

        Ok(output)
    }
}

/// 失败时恢复原字符串表
///
/// 提取工具可能已经在原路径写出了文件，此时用 `.old` 覆盖它。
fn restore_original(old: &Path, original: &Path) -> Result<(), LocalizeError> {
    std::fs::rename(old, original).map_err(|e| LocalizeError::file_access(old, e))
}
