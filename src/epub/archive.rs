//! 归档访问模块
//!
//! 以条目名访问EPUB（zip）归档中的文件内容。条目名按完整路径精确匹配，区分大小写。

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use log::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::epub::error::{EpubError, Result};

/// 按名称读取归档条目的能力
///
/// 提取流程只依赖这个trait，不关心底层归档如何解压。
pub trait EntryReader {
    /// 列出归档中的所有条目名
    fn entry_names(&self) -> Vec<String>;

    /// 以UTF-8文本读取条目，条目不存在时返回 `EpubError::NotFound`
    fn read_text(&mut self, name: &str) -> Result<String>;

    /// 以二进制读取条目，条目不存在时返回 `EpubError::NotFound`
    fn read_binary(&mut self, name: &str) -> Result<Vec<u8>>;
}

/// 基于zip的归档句柄
///
/// 同一条目可以重复读取，每次都会重新解压。句柄不应在并发提取之间共享。
pub struct Archive<R: Read + Seek> {
    inner: ZipArchive<R>,
}

impl<R: Read + Seek> Archive<R> {
    /// 从可寻址的读取器打开归档
    pub fn new(reader: R) -> Result<Self> {
        let inner = ZipArchive::new(reader)?;
        debug!("打开归档，共 {} 个条目", inner.len());
        Ok(Self { inner })
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }
}

impl Archive<Cursor<Vec<u8>>> {
    /// 从内存中的完整归档字节打开
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(bytes))
    }

    /// 从任意字节流打开
    ///
    /// zip的中央目录位于文件末尾，不可寻址的流必须先完整读入内存。
    pub fn from_stream<S: Read>(mut stream: S) -> Result<Self> {
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        Self::from_bytes(bytes)
    }
}

impl Archive<BufReader<File>> {
    /// 从文件路径打开
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

/// 把zip的"文件不存在"映射为带条目名的 `NotFound`
fn map_lookup_error(name: &str, err: ZipError) -> EpubError {
    match err {
        ZipError::FileNotFound => EpubError::NotFound(name.to_string()),
        other => EpubError::Zip(other),
    }
}

impl<R: Read + Seek> EntryReader for Archive<R> {
    fn entry_names(&self) -> Vec<String> {
        self.inner.file_names().map(str::to_string).collect()
    }

    fn read_text(&mut self, name: &str) -> Result<String> {
        let mut file = self
            .inner
            .by_name(name)
            .map_err(|e| map_lookup_error(name, e))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    fn read_binary(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self
            .inner
            .by_name(name)
            .map_err(|e| map_lookup_error(name, e))?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

/// 测试用：在内存中构造zip归档
#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
