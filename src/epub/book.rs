//! 提取结果的数据结构

use chrono::{DateTime, Utc};

/// 书籍标识符
///
/// 取自 `<dc:identifier id="...">值</dc:identifier>`：`type` 是元素的 `id` 属性，
/// `id` 是元素文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub r#type: String,
    pub id: String,
}

/// 封面图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// 封面在归档中的路径
    pub path: String,
    /// 清单中声明的媒体类型
    pub media_type: String,
    /// 条目的原始字节
    pub data: Vec<u8>,
}

impl CoverImage {
    /// 根据路径推断文件扩展名（小写），没有扩展名时返回 `None`
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }
}

/// 从EPUB中提取的书目元数据
///
/// 与归档无关联，提取完成后归档可以关闭。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubMetadata {
    /// 书名，字段重复时取第一个
    pub title: String,
    /// 作者列表；`None` 表示OPF中没有 `dc:creator`
    pub creators: Option<Vec<String>>,
    /// 语言
    pub language: String,
    /// 标识符
    pub identifier: Identifier,
    /// 出版日期
    pub date: Option<DateTime<Utc>>,
    /// 封面图片
    pub cover: Option<CoverImage>,
}
