use clap::Parser;
use epubmeta::{Epub, EpubMetadata, ExtractorConfig, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// 📚 epubmeta - EPUB元数据提取工具
#[derive(Parser)]
#[command(name = "epubmeta")]
#[command(about = "从EPUB文件中提取书名、作者、语言、标识符、日期和封面")]
#[command(version)]
struct Args {
    /// EPUB文件或目录
    #[arg(
        required_unless_present = "init_config",
        help = "要处理的EPUB文件或目录（目录只扫描一层）"
    )]
    paths: Vec<PathBuf>,

    /// 详细输出模式
    #[arg(short, long, help = "显示详细信息和调试日志")]
    verbose: bool,

    /// 配置文件
    #[arg(short, long, help = "YAML配置文件路径")]
    config: Option<PathBuf>,

    /// 生成默认配置文件
    #[arg(long, value_name = "PATH", help = "在指定路径生成默认配置文件后退出")]
    init_config: Option<PathBuf>,

    /// 封面输出目录
    #[arg(long, value_name = "DIR", help = "把找到的封面写入该目录")]
    cover_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Some(path) = &args.init_config {
        return match ExtractorConfig::generate_default_config(path) {
            Ok(()) => {
                println!("✅ 已生成配置文件: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ 错误: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match ExtractorConfig::load_or_default(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("使用配置: {:?}", config);

    let mut failures = 0usize;
    let mut inputs = Vec::new();

    for path in &args.paths {
        match collect_inputs(path) {
            Ok(found) => inputs.extend(found),
            Err(e) => {
                failures += 1;
                eprintln!("❌ {} 失败: {}", path.display(), e);
            }
        }
    }

    info!("共 {} 个输入文件", inputs.len());

    // 每个文件独立处理，单个失败不影响其余文件
    for input in &inputs {
        if let Err(e) = process_epub(input, &config, args.cover_dir.as_deref(), args.verbose) {
            failures += 1;
            eprintln!("❌ {} 失败: {}", input.display(), e);
        }
    }

    if failures > 0 {
        eprintln!("\n⚠️  {} 个输入处理失败", failures);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// 展开输入路径：文件原样返回，目录返回其中的文件（跳过子目录），按名称排序
fn collect_inputs(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

fn process_epub(
    path: &Path,
    config: &ExtractorConfig,
    cover_dir: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let mut epub = Epub::from_path(path)?.with_config(config.clone());

    if verbose {
        println!("\n📁 {} 内容:", path.display());
        for (i, file) in epub.list_files().iter().enumerate() {
            println!("  {}. {}", i + 1, file);
        }

        println!("📦 rootfile声明:");
        for rootfile in epub.container()?.rootfiles {
            println!(
                "  - {} ({})",
                rootfile.full_path,
                rootfile.media_type.as_deref().unwrap_or("未声明媒体类型")
            );
        }
    }

    let metadata = epub.metadata()?;
    display_metadata(path, &metadata);

    if let (Some(dir), Some(cover)) = (cover_dir, &metadata.cover) {
        fs::create_dir_all(dir)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cover".to_string());
        let extension = cover.extension().unwrap_or_else(|| "bin".to_string());
        let target = dir.join(format!("{}.{}", stem, extension));
        fs::write(&target, &cover.data)?;
        println!("  🖼️  封面已保存: {}", target.display());
    }

    Ok(())
}

/// 显示EPUB元数据信息
fn display_metadata(path: &Path, metadata: &EpubMetadata) {
    println!("\n📚 {}", path.display());
    println!("    标题: {}", metadata.title);

    match &metadata.creators {
        Some(creators) => {
            println!("    作者:");
            for (i, creator) in creators.iter().enumerate() {
                println!("      {}. {}", i + 1, creator);
            }
        }
        None => println!("    作者: (无)"),
    }

    println!("    语言: {}", metadata.language);
    println!(
        "    标识符: {} ({})",
        metadata.identifier.id, metadata.identifier.r#type
    );

    match &metadata.date {
        Some(date) => println!("    出版日期: {}", date.to_rfc3339()),
        None => println!("    出版日期: (无)"),
    }

    match &metadata.cover {
        Some(cover) => println!(
            "    封面: {} ({}, {} bytes)",
            cover.path,
            cover.media_type,
            cover.data.len()
        ),
        None => println!("    封面: (无)"),
    }
}
