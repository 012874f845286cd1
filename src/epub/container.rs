use crate::epub::archive::EntryReader;
use crate::epub::error::{EpubError, Result};
use log::debug;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// container.xml在归档中的固定位置
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFile {
    pub full_path: String,
    /// 声明的媒体类型，仅作参考，定位时不据此筛选
    pub media_type: Option<String>,
}

/// Container.xml的解析结果
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// 只收集 `container > rootfiles > rootfile` 路径下的声明，元素按本地名匹配，
    /// 忽略命名空间前缀。
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    ///
    /// # 返回值
    /// * `Result<Container, EpubError>` - 解析后的Container信息
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();
        let mut path: Vec<Vec<u8>> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let local_name = e.local_name().as_ref().to_vec();
                    let in_rootfiles = path.len() == 2
                        && path[0] == b"container"
                        && path[1] == b"rootfiles";

                    if in_rootfiles && local_name == b"rootfile" {
                        let mut full_path = String::new();
                        let mut media_type = None;

                        for attr_result in e.attributes() {
                            let attr = attr_result
                                .map_err(|e| EpubError::Xml(quick_xml::Error::InvalidAttr(e)))?;
                            match attr.key.local_name().as_ref() {
                                b"full-path" => {
                                    full_path = attr.unescape_value()?.into_owned();
                                }
                                b"media-type" => {
                                    media_type = Some(attr.unescape_value()?.into_owned());
                                }
                                _ => {}
                            }
                        }

                        rootfiles.push(RootFile {
                            full_path,
                            media_type,
                        });
                    }

                    path.push(local_name);
                }
                Event::End(_) => {
                    path.pop();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::MalformedContainer(
                "没有找到任何rootfile条目".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取OPF文件路径
    ///
    /// 只有第一个rootfile声明有效，其余声明被忽略。
    ///
    /// # 返回值
    /// * `Result<&str, EpubError>` - OPF文件在归档中的完整路径
    pub fn rootfile_path(&self) -> Result<&str> {
        let first = self.rootfiles.first().ok_or_else(|| {
            EpubError::MalformedContainer("没有找到任何rootfile条目".to_string())
        })?;

        if self.rootfiles.len() > 1 {
            debug!(
                "container.xml 声明了 {} 个rootfile，仅使用第一个: {}",
                self.rootfiles.len(),
                first.full_path
            );
        }

        if first.full_path.is_empty() {
            return Err(EpubError::MalformedContainer(
                "第一个rootfile缺少full-path属性".to_string(),
            ));
        }

        Ok(&first.full_path)
    }
}

/// 读取并解析 `META-INF/container.xml`
///
/// 条目不存在时返回 `MissingContainer`。
pub fn read_container<A: EntryReader + ?Sized>(archive: &mut A) -> Result<Container> {
    let content = archive.read_text(CONTAINER_PATH).map_err(|e| match e {
        EpubError::NotFound(_) => EpubError::MissingContainer,
        other => other,
    })?;

    Container::parse_xml(&content)
}

/// 定位OPF文件
///
/// 返回container.xml中声明的OPF路径（原样返回，稍后直接作为条目名使用）。
pub fn locate_rootfile<A: EntryReader + ?Sized>(archive: &mut A) -> Result<String> {
    let container = read_container(archive)?;
    let path = container.rootfile_path()?.to_string();
    debug!("rootfile路径: {}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::archive::{Archive, build_zip};

    #[test]
    fn test_parse_container_xml() {
        let container_xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
        <rootfile full-path="OEBPS/alt.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

        let container = Container::parse_xml(container_xml).unwrap();
        assert_eq!(container.rootfiles.len(), 2);
        assert_eq!(container.rootfiles[0].full_path, "OEBPS/content.opf");
        assert_eq!(
            container.rootfiles[0].media_type.as_deref(),
            Some("application/oebps-package+xml")
        );

        // 多个声明时只取第一个
        assert_eq!(container.rootfile_path().unwrap(), "OEBPS/content.opf");
    }

    #[test]
    fn test_parse_minimal_container() {
        let xml = r#"<container><rootfiles><rootfile full-path="OEBPS/content.opf"/></rootfiles></container>"#;
        let container = Container::parse_xml(xml).unwrap();
        assert_eq!(container.rootfiles.len(), 1);
        assert_eq!(container.rootfiles[0].media_type, None);
        assert_eq!(container.rootfile_path().unwrap(), "OEBPS/content.opf");
    }

    #[test]
    fn test_rootfile_outside_rootfiles_is_ignored() {
        let xml = r#"<container><rootfile full-path="stray.opf"/></container>"#;
        assert!(matches!(
            Container::parse_xml(xml),
            Err(EpubError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_empty_document_is_malformed() {
        assert!(matches!(
            Container::parse_xml(""),
            Err(EpubError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_malformed_xml_is_xml_error() {
        let xml = r#"<container><rootfiles></container>"#;
        assert!(matches!(Container::parse_xml(xml), Err(EpubError::Xml(_))));
    }

    #[test]
    fn test_missing_full_path_is_malformed() {
        let xml = r#"<container><rootfiles><rootfile media-type="application/oebps-package+xml"/></rootfiles></container>"#;
        let container = Container::parse_xml(xml).unwrap();
        assert!(matches!(
            container.rootfile_path(),
            Err(EpubError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_locate_rootfile() {
        let container_xml = br#"<container><rootfiles><rootfile full-path="OPS/book.opf"/></rootfiles></container>"#;
        let bytes = build_zip(&[(CONTAINER_PATH, container_xml)]);
        let mut archive = Archive::from_bytes(bytes).unwrap();
        assert_eq!(locate_rootfile(&mut archive).unwrap(), "OPS/book.opf");
    }

    #[test]
    fn test_read_container_keeps_media_type() {
        let container_xml = concat!(
            r#"<container><rootfiles>"#,
            r#"<rootfile full-path="OPS/book.opf" media-type="application/oebps-package+xml"/>"#,
            r#"<rootfile full-path="OPS/alt.opf"/>"#,
            r#"</rootfiles></container>"#
        );
        let bytes = build_zip(&[(CONTAINER_PATH, container_xml.as_bytes())]);
        let mut archive = Archive::from_bytes(bytes).unwrap();

        let container = read_container(&mut archive).unwrap();
        assert_eq!(container.rootfiles.len(), 2);
        assert_eq!(
            container.rootfiles[0].media_type.as_deref(),
            Some("application/oebps-package+xml")
        );
        assert_eq!(container.rootfiles[1].media_type, None);
    }

    #[test]
    fn test_locate_rootfile_without_container() {
        let bytes = build_zip(&[("mimetype", b"application/epub+zip")]);
        let mut archive = Archive::from_bytes(bytes).unwrap();
        assert!(matches!(
            locate_rootfile(&mut archive),
            Err(EpubError::MissingContainer)
        ));
    }
}
