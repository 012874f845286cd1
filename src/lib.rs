pub mod epub;

// === 核心API重新导出 ===

/// EPUB文件读取器（主要接口）
pub use epub::Epub;

/// 错误处理
pub use epub::{EpubError, Result};

// === 数据结构 ===

/// 提取结果
pub use epub::{CoverImage, EpubMetadata, Identifier};

/// 提取配置
pub use epub::{CoverConfig, CoverResolution, ExtractorConfig};

// === 底层组件（高级用法） ===

/// 归档访问
pub use epub::{Archive, EntryReader};

/// 流程各阶段
pub use epub::{
    Container, RootFile, extract, extract_metadata, locate_rootfile, read_container,
};

/// OPF组件
pub use epub::{Field, ManifestItem, Metadata, Node, Package};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// === 便捷函数 ===

/// 快速打开EPUB文件
///
/// 这是 `Epub::from_path` 的便捷包装函数。
///
/// # 示例
///
/// ```rust,no_run
/// let mut epub = epubmeta::open("book.epub")?;
/// let metadata = epub.metadata()?;
/// println!("书名: {}", metadata.title);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Epub<std::io::BufReader<std::fs::File>>> {
    Epub::from_path(path)
}

/// 从字节流提取元数据，使用默认配置
///
/// 流会被完整读入内存后再解析。
pub fn get_epub_metadata<S: std::io::Read>(stream: S) -> Result<EpubMetadata> {
    Epub::from_stream(stream)?.metadata()
}
