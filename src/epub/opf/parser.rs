//! OPF解析器模块
//!
//! 把OPF包文件解析为原始元数据与资源清单，不做字段归一化。

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{
    manifest::ManifestItem,
    metadata::{Metadata, Node},
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;

/// OPF文件解析结果
#[derive(Debug, Clone)]
pub struct Package {
    /// EPUB版本
    pub version: String,
    /// package元素的unique-identifier属性
    pub unique_identifier: Option<String>,
    /// 原始元数据
    pub metadata: Metadata,
    /// 清单项，按文档顺序
    pub manifest: Vec<ManifestItem>,
}

impl Package {
    /// 解析OPF文件内容
    ///
    /// 元素按本地名匹配，`<dc:title>` 与 `<title>` 视为同一字段。
    ///
    /// # 参数
    /// * `xml_content` - OPF文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Package, EpubError>` - 缺少package或metadata元素时返回 `MalformedPackage`
    pub fn parse_xml(xml_content: &str) -> Result<Package> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut version = String::new();
        let mut unique_identifier = None;
        let mut metadata = Metadata::new();
        let mut manifest = Vec::new();
        let mut seen_package = false;
        let mut seen_metadata = false;

        let mut buf = Vec::new();
        let mut path: Vec<String> = Vec::new();
        // 正在读取的metadata子元素：(本地名, 属性, 文本)
        let mut current: Option<(String, HashMap<String, String>, String)> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let local_name =
                        String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                    match (path.len(), local_name.as_str()) {
                        (0, "package") => {
                            seen_package = true;
                            let attributes = Self::collect_attributes(e)?;
                            version = attributes.get("version").cloned().unwrap_or_default();
                            unique_identifier = attributes.get("unique-identifier").cloned();
                        }
                        (1, "metadata") if path[0] == "package" => {
                            seen_metadata = true;
                        }
                        (2, _) if Self::in_section(&path, "metadata") => {
                            let attributes = Self::collect_attributes(e)?;
                            current = Some((local_name.clone(), attributes, String::new()));
                        }
                        (2, "item") if Self::in_section(&path, "manifest") => {
                            if let Some(item) = Self::parse_manifest_item(e)? {
                                manifest.push(item);
                            }
                        }
                        _ => {}
                    }

                    path.push(local_name);
                }
                Event::Text(e) => {
                    if let Some((_, _, text)) = current.as_mut() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some((_, _, text)) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    path.pop();
                    if path.len() == 2 {
                        if let Some((name, attributes, text)) = current.take() {
                            metadata.add_element(name, Node { attributes, text });
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !seen_package {
            return Err(EpubError::MalformedPackage("缺少package元素".to_string()));
        }
        if !seen_metadata {
            return Err(EpubError::MalformedPackage("缺少metadata元素".to_string()));
        }

        Ok(Package {
            version,
            unique_identifier,
            metadata,
            manifest,
        })
    }

    /// 当前路径是否位于 `package > {section}` 之下
    fn in_section(path: &[String], section: &str) -> bool {
        path.len() == 2 && path[0] == "package" && path[1] == section
    }

    /// 收集元素属性，键为限定名，跳过命名空间声明
    fn collect_attributes(e: &BytesStart) -> Result<HashMap<String, String>> {
        let mut attributes = HashMap::new();
        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| EpubError::Xml(quick_xml::Error::InvalidAttr(err)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            attributes.insert(key, attr.unescape_value()?.into_owned());
        }
        Ok(attributes)
    }

    /// 解析清单项，缺少id或href的项被跳过
    fn parse_manifest_item(e: &BytesStart) -> Result<Option<ManifestItem>> {
        let mut id = String::new();
        let mut href = String::new();
        let mut media_type = String::new();

        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| EpubError::Xml(quick_xml::Error::InvalidAttr(err)))?;
            match attr.key.local_name().as_ref() {
                b"id" => id = attr.unescape_value()?.into_owned(),
                b"href" => href = attr.unescape_value()?.into_owned(),
                b"media-type" => media_type = attr.unescape_value()?.into_owned(),
                _ => {}
            }
        }

        if id.is_empty() || href.is_empty() {
            return Ok(None);
        }

        Ok(Some(ManifestItem::new(id, href, media_type)))
    }

    /// 根据ID获取清单项，ID重复时取第一个
    ///
    /// # 参数
    /// * `id` - 清单项ID
    ///
    /// # 返回值
    /// * `Option<&ManifestItem>` - 清单项引用
    pub fn get_manifest_item(&self, id: &str) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::opf::metadata::Field;

    #[test]
    fn test_simple_xml_parsing() {
        let simple_xml = concat!(
            r#"<?xml version="1.0"?>"#,
            r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">"#,
            r#"<metadata xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
            r#"<dc:title>Test Book</dc:title>"#,
            r#"<dc:creator id="author1">Test Author</dc:creator>"#,
            r#"<dc:identifier id="BookId">urn:uuid:1234</dc:identifier>"#,
            r#"</metadata>"#,
            r#"<manifest></manifest>"#,
            r#"</package>"#
        );

        let package = Package::parse_xml(simple_xml).expect("解析简单OPF失败");
        assert_eq!(package.version, "3.0");
        assert_eq!(package.unique_identifier.as_deref(), Some("BookId"));
        assert_eq!(
            package.metadata.get("title"),
            Some(&Field::Text("Test Book".to_string()))
        );

        match package.metadata.get("creator") {
            Some(Field::Node(node)) => {
                assert_eq!(node.text, "Test Author");
                assert_eq!(node.id(), Some("author1"));
            }
            other => panic!("期望Field::Node，实际: {:?}", other),
        }
        assert!(package.manifest.is_empty());
    }

    #[test]
    fn test_repeated_elements_become_sequence() {
        let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
<metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
<dc:title>Main Title</dc:title>
<dc:title id="sub">Subtitle</dc:title>
<dc:creator opf:role="aut">Alice</dc:creator>
<dc:creator opf:role="aut">Bob</dc:creator>
<dc:creator>Carol</dc:creator>
<meta name="cover" content="cover-image"/>
</metadata>
</package>"#;

        let package = Package::parse_xml(opf).unwrap();

        let title = package.metadata.get("title").unwrap();
        assert_eq!(title.len(), 2);
        assert_eq!(title.first_of(), Some("Main Title"));

        let creators = package.metadata.get("creator").unwrap();
        assert_eq!(creators.many_of(), vec!["Alice", "Bob", "Carol"]);
        match creators {
            Field::Nodes(nodes) => assert_eq!(nodes[0].attribute("opf:role"), Some("aut")),
            other => panic!("期望Field::Nodes，实际: {:?}", other),
        }
    }

    #[test]
    fn test_manifest_items() {
        let opf = r#"<package version="3.0">
<metadata><dc:title xmlns:dc="http://purl.org/dc/elements/1.1/">T</dc:title></metadata>
<manifest>
<item id="cover" href="images/cover.jpg" media-type="image/jpeg" properties="cover-image"/>
<item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml"/>
<item href="no-id.xhtml" media-type="application/xhtml+xml"/>
<item id="cover" href="duplicate.png" media-type="image/png"/>
</manifest>
</package>"#;

        let package = Package::parse_xml(opf).unwrap();
        assert_eq!(package.manifest.len(), 3);

        // 命名空间声明不算作属性
        assert_eq!(
            package.metadata.get("title"),
            Some(&Field::Text("T".to_string()))
        );

        let cover = package.get_manifest_item("cover").unwrap();
        assert_eq!(cover.href, "images/cover.jpg");
        assert_eq!(cover.media_type, "image/jpeg");
        assert!(package.get_manifest_item("missing").is_none());
    }

    #[test]
    fn test_escaped_text_and_attributes() {
        let opf = r#"<package><metadata>
<dc:title>Pride &amp; Prejudice</dc:title>
</metadata>
<manifest><item id="cover" href="a&amp;b.jpg" media-type="image/jpeg"/></manifest>
</package>"#;

        let package = Package::parse_xml(opf).unwrap();
        assert_eq!(
            package.metadata.get("title").and_then(Field::first_of),
            Some("Pride & Prejudice")
        );
        assert_eq!(package.manifest[0].href, "a&b.jpg");
    }

    #[test]
    fn test_missing_metadata() {
        let opf = r#"<package version="3.0"><manifest/></package>"#;
        assert!(matches!(
            Package::parse_xml(opf),
            Err(EpubError::MalformedPackage(_))
        ));
    }

    #[test]
    fn test_malformed_xml_is_xml_error() {
        let opf = r#"<package><metadata><dc:title>T</dc:language></metadata></package>"#;
        assert!(matches!(Package::parse_xml(opf), Err(EpubError::Xml(_))));
    }

    #[test]
    fn test_missing_package() {
        let opf = r#"<metadata><dc:title>T</dc:title></metadata>"#;
        assert!(matches!(
            Package::parse_xml(opf),
            Err(EpubError::MalformedPackage(_))
        ));
    }
}
