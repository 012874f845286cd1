use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub元数据提取相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML解析错误: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("归档中不存在条目: {0}")]
    NotFound(String),

    #[error("缺少META-INF/container.xml")]
    MissingContainer,

    #[error("container.xml格式错误: {0}")]
    MalformedContainer(String),

    #[error("找不到rootfile: {0}")]
    MissingRootfile(String),

    #[error("OPF文件缺少必需信息: {0}")]
    MalformedPackage(String),

    #[error("无法解析日期: {0}")]
    InvalidDate(String),

    #[error("配置文件错误: {0}")]
    Config(String),
}
