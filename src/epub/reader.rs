use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use log::debug;

use crate::epub::archive::{Archive, EntryReader};
use crate::epub::book::EpubMetadata;
use crate::epub::config::ExtractorConfig;
use crate::epub::container::{Container, locate_rootfile, read_container};
use crate::epub::error::Result;
use crate::epub::extractor::extract;

/// 完整的提取流程：定位OPF文件，再提取元数据
///
/// 任一步骤失败都会终止整个提取，不返回部分结果。
pub fn extract_metadata<A: EntryReader + ?Sized>(
    archive: &mut A,
    config: &ExtractorConfig,
) -> Result<EpubMetadata> {
    let rootfile_path = locate_rootfile(archive)?;
    extract(archive, &rootfile_path, config)
}

/// 表示一个EPUB文件
pub struct Epub<R: Read + Seek> {
    archive: Archive<R>,
    config: ExtractorConfig,
}

impl<R: Read + Seek> Epub<R> {
    /// 从可寻址的读取器创建Epub实例
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: Archive::new(reader)?,
            config: ExtractorConfig::default(),
        })
    }

    /// 替换提取配置
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// 列出EPUB文件中的所有条目
    pub fn list_files(&self) -> Vec<String> {
        self.archive.entry_names()
    }

    /// 读取container.xml中的全部rootfile声明
    pub fn container(&mut self) -> Result<Container> {
        read_container(&mut self.archive)
    }

    /// 获取OPF文件路径
    ///
    /// # 返回值
    /// * `Result<String, EpubError>` - OPF文件的完整路径
    pub fn get_opf_path(&mut self) -> Result<String> {
        locate_rootfile(&mut self.archive)
    }

    /// 提取书目元数据
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use epubmeta::Epub;
    ///
    /// let mut epub = Epub::from_path("book.epub")?;
    /// let metadata = epub.metadata()?;
    /// println!("书名: {}", metadata.title);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn metadata(&mut self) -> Result<EpubMetadata> {
        let metadata = extract_metadata(&mut self.archive, &self.config)?;
        debug!("提取完成: {}", metadata.title);
        Ok(metadata)
    }
}

impl Epub<BufReader<File>> {
    /// 从文件路径创建Epub实例
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("打开EPUB文件: {}", path.as_ref().display());
        Ok(Self {
            archive: Archive::from_path(path)?,
            config: ExtractorConfig::default(),
        })
    }
}

impl Epub<Cursor<Vec<u8>>> {
    /// 从内存中的归档字节创建Epub实例
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(bytes))
    }

    /// 从不可寻址的字节流创建Epub实例
    pub fn from_stream<S: Read>(stream: S) -> Result<Self> {
        Ok(Self {
            archive: Archive::from_stream(stream)?,
            config: ExtractorConfig::default(),
        })
    }
}
