use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use strings_localizer::localize::{CommandExtractor, LocalizeConfig, Localizer, SourcesOutcome};
use strings_localizer::{create_backup, encoding, merge_files, LocalizeError, StringTable, STRINGS_EXTENSION};

#[derive(Parser)]
#[command(name = "strings_localizer")]
#[command(about = "增量合并 .strings 本地化字符串表")]
#[command(version)]
struct Cli {
    /// 旧的（已翻译）字符串表
    #[arg(long, requires = "new")]
    old: Option<PathBuf>,

    /// 新提取的（未翻译）字符串表
    #[arg(long, requires = "old")]
    new: Option<PathBuf>,

    /// 输出文件路径（合并时默认覆盖旧文件，转换时默认覆盖原文件）
    #[arg(short, long, conflicts_with_all = ["check", "localize"])]
    output: Option<PathBuf>,

    /// 将 UTF-16 字符串表转换为 UTF-8
    #[arg(long)]
    convert: Option<PathBuf>,

    /// 检查字符串表格式并显示统计信息
    #[arg(long)]
    check: Option<PathBuf>,

    /// 对项目目录执行完整的本地化流程（genstrings + ibtool + 合并）
    #[arg(long)]
    localize: Option<PathBuf>,

    /// 本地化配置文件(JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 跳过界面文件(xib)的字符串提取
    #[arg(long)]
    skip_nibs: bool,

    /// 覆盖输出文件前创建备份
    #[arg(long)]
    backup: bool,

    /// 显示合并统计信息
    #[arg(long)]
    stats: bool,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    validate_modes(&cli)?;

    if let Some(project_dir) = &cli.localize {
        return handle_localize(&cli, project_dir);
    }

    if let Some(path) = &cli.check {
        return handle_check(&cli, path);
    }

    if let Some(path) = &cli.convert {
        return handle_convert(&cli, path);
    }

    match (&cli.old, &cli.new) {
        (Some(old), Some(new)) => handle_merge(&cli, old, new),
        _ => bail!("请指定 --old/--new、--convert、--check 或 --localize 之一"),
    }
}

/// 验证运行模式（确保只使用一种）
fn validate_modes(cli: &Cli) -> Result<()> {
    let mode_count = [
        cli.old.is_some(),
        cli.convert.is_some(),
        cli.check.is_some(),
        cli.localize.is_some(),
    ]
    .iter()
    .filter(|&&x| x)
    .count();

    if mode_count > 1 {
        bail!("只能使用一种模式：--old/--new、--convert、--check 或 --localize");
    }

    Ok(())
}

/// 验证输入文件
fn validate_input(input: &Path) -> Result<()> {
    if !input.exists() {
        bail!("输入文件不存在: {:?}", input);
    }
    Ok(())
}

/// 处理合并
fn handle_merge(cli: &Cli, old: &Path, new: &Path) -> Result<()> {
    validate_input(old)?;
    validate_input(new)?;

    let output = cli.output.clone().unwrap_or_else(|| old.to_path_buf());
    backup_if_requested(cli, &output)?;

    #[cfg(debug_assertions)]
    if !cli.quiet {
        println!("正在合并: {:?} + {:?} -> {:?}", old, new, output);
    }

    let stats = merge_files(&output, old, new)?;

    if !cli.quiet {
        if cli.stats {
            print!("{}", stats);
        }
        if !stats.duplicates.is_empty() {
            eprintln!("警告: 新字符串表中存在重复的键: {}", stats.duplicates.join(", "));
        }
        println!("合并完成，输出到: {:?}", output);
    }

    Ok(())
}

/// 处理编码转换
fn handle_convert(cli: &Cli, input: &Path) -> Result<()> {
    validate_input(input)?;

    let output = cli.output.clone().unwrap_or_else(|| input.to_path_buf());
    backup_if_requested(cli, &output)?;

    let source_encoding = encoding::convert_to_utf8(input, &output)
        .with_context(|| format!("转换失败: {:?}", input))?;

    if !cli.quiet {
        println!("已从 {} 转换为 UTF-8: {:?}", source_encoding.name(), output);
    }

    Ok(())
}

/// 处理格式检查
fn handle_check(cli: &Cli, path: &Path) -> Result<()> {
    validate_input(path)?;

    let has_strings_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(STRINGS_EXTENSION));
    if !has_strings_extension && !cli.quiet {
        eprintln!("警告: 文件扩展名不是 .{}: {:?}", STRINGS_EXTENSION, path);
    }

    let table = StringTable::load(path).with_context(|| format!("解析失败: {:?}", path))?;

    if !cli.quiet {
        print!("{}", table.get_stats());
        print_sample_entries(&table);
    }

    Ok(())
}

/// 处理完整本地化流程
fn handle_localize(cli: &Cli, project_dir: &Path) -> Result<()> {
    if !project_dir.is_dir() {
        bail!("项目目录不存在: {:?}", project_dir);
    }

    let config = match &cli.config {
        Some(path) => LocalizeConfig::load(path).with_context(|| format!("读取配置失败: {:?}", path))?,
        None => LocalizeConfig::default(),
    };
    let extractor = CommandExtractor::from_config(&config);
    let localizer = Localizer::new(&config, &extractor, project_dir.to_path_buf());

    let strings_path = localizer.source_strings_path();
    if strings_path.exists() {
        backup_if_requested(cli, &strings_path)?;
    }

    let outcome = match localizer.localize_sources() {
        Ok(outcome) => outcome,
        Err(e @ LocalizeError::StagingExists(_)) => {
            return Err(e).context("请先检查并处理上次运行遗留的 .old 文件");
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("源码本地化失败（已有的字符串表保持不变）: {:?}", strings_path)
            });
        }
    };

    if !cli.quiet {
        match &outcome {
            SourcesOutcome::Merged(stats) => {
                if cli.stats {
                    print!("{}", stats);
                }
                println!("已合并源码字符串: {:?}", strings_path);
            }
            SourcesOutcome::Created { entries } => {
                println!("已创建源码字符串表（{} 个条目）: {:?}", entries, strings_path);
            }
        }
    }

    if !cli.skip_nibs {
        let nib_strings = localizer.localize_nibs().context("界面文件本地化失败")?;
        if !cli.quiet {
            println!("已生成界面字符串: {:?}", nib_strings);
        }
    }

    Ok(())
}

fn backup_if_requested(cli: &Cli, path: &Path) -> Result<()> {
    if cli.backup && path.exists() {
        let backup_path = create_backup(path)?;
        if !cli.quiet {
            println!("已创建备份: {:?}", backup_path);
        }
    }
    Ok(())
}

/// 显示样例条目
fn print_sample_entries(table: &StringTable) {
    if table.is_empty() {
        return;
    }

    println!("\n样例条目:");
    for (i, string) in table.iter().take(3).enumerate() {
        let value = if string.value().chars().count() > 50 {
            format!("{}...", string.value().chars().take(50).collect::<String>())
        } else {
            string.value().to_string()
        };
        println!("{}. {} = \"{}\"", i + 1, string.key(), value);
    }

    if table.len() > 3 {
        println!("... 还有 {} 个条目", table.len() - 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_rejected_outside_merge_and_convert() {
        assert!(Cli::try_parse_from(["strings_localizer", "--check", "a.strings", "-o", "b.strings"]).is_err());
        assert!(Cli::try_parse_from(["strings_localizer", "--localize", ".", "--output", "b.strings"]).is_err());

        assert!(Cli::try_parse_from(["strings_localizer", "--convert", "a.strings", "-o", "b.strings"]).is_ok());
        assert!(Cli::try_parse_from(["strings_localizer", "--old", "a.strings", "--new", "b.strings", "-o", "c.strings"]).is_ok());
    }

    #[test]
    fn test_single_mode_only() {
        let cli = Cli::try_parse_from(["strings_localizer", "--check", "a.strings", "--convert", "b.strings"]).unwrap();
        assert!(validate_modes(&cli).is_err());

        let cli = Cli::try_parse_from(["strings_localizer", "--check", "a.strings"]).unwrap();
        assert!(validate_modes(&cli).is_ok());
    }

    #[test]
    fn test_old_requires_new() {
        assert!(Cli::try_parse_from(["strings_localizer", "--old", "a.strings"]).is_err());
    }
}
