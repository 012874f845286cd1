//! OPF（Open Packaging Format）文件解析模块
//!
//! 此模块提供EPUB文件中OPF包文件的解析功能，包括原始元数据和资源清单的提取。

mod manifest;
mod metadata;
mod parser;

pub use manifest::ManifestItem;
pub use metadata::{Field, Metadata, Node};
pub use parser::Package;
