//! 清单模块
//!
//! 提供EPUB包中资源清单的结构定义。

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID，清单内唯一
    pub id: String,
    /// 文件路径
    pub href: String,
    /// 媒体类型，仅作参考
    pub media_type: String,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
        }
    }

    /// 检查是否为图片文件
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(ManifestItem::new("cover", "cover.jpg", "image/jpeg").is_image());
        assert!(!ManifestItem::new("ch1", "ch1.xhtml", "application/xhtml+xml").is_image());
        assert!(!ManifestItem::new("x", "x.bin", "").is_image());
    }
}
