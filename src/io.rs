/// IO 抽象层模块
///
/// 字符串表的读写接口，合并流程通过 trait 调用，便于测试时替换实现。
///
/// - **traits**: 定义 TableReader/TableWriter trait 接口
/// - **table_io**: 基于文件系统的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use strings_localizer::io::{DefaultTableReader, TableReader};
///
/// let reader = DefaultTableReader;
/// let table = reader.read(Path::new("en.lproj/Localizable.strings"))?;
/// ```
pub mod traits;
pub mod table_io;

pub use traits::{TableReader, TableWriter};
pub use table_io::{DefaultTableReader, DefaultTableWriter};
