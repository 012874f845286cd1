pub mod archive;
pub mod book;
pub mod config;
pub mod container;
pub mod date;
pub mod error;
pub mod extractor;
pub mod opf;
pub mod reader;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出归档访问
pub use archive::{Archive, EntryReader};

// 重新导出容器相关
pub use container::{CONTAINER_PATH, Container, RootFile, locate_rootfile, read_container};

// 重新导出提取流程与结果
pub use book::{CoverImage, EpubMetadata, Identifier};
pub use config::{CoverConfig, CoverResolution, ExtractorConfig};
pub use date::parse_date;
pub use extractor::extract;
pub use reader::{Epub, extract_metadata};

// 重新导出OPF相关
pub use opf::{Field, ManifestItem, Metadata, Node, Package};
