/// 项目本地化流程模块
///
/// 在 Xcode 项目目录上执行完整的增量本地化：调用提取工具生成新的字符串表，
/// 转换为 UTF-8，并与已有翻译合并。
///
/// - **config**: 项目目录结构与工具配置
/// - **extractor**: 字符串提取工具接口（genstrings / ibtool）
/// - **workflow**: 源码与界面文件的本地化流程
///
/// # 使用示例
///
/// ```rust,ignore
/// use strings_localizer::localize::{CommandExtractor, LocalizeConfig, Localizer};
///
/// let config = LocalizeConfig::default();
/// let extractor = CommandExtractor::from_config(&config);
/// let localizer = Localizer::new(&config, &extractor, std::env::current_dir()?);
/// localizer.localize_sources()?;
/// localizer.localize_nibs()?;
/// ```
pub mod config;
pub mod extractor;
pub mod workflow;

pub use config::LocalizeConfig;
pub use extractor::{collect_source_files, CommandExtractor, Extractor};
pub use workflow::{Localizer, SourcesOutcome};
