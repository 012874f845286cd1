//! 元数据提取模块
//!
//! 读取OPF文件，把原始元数据归一化为 [`EpubMetadata`]，并按清单解析封面。

use log::{debug, warn};

use crate::epub::archive::EntryReader;
use crate::epub::book::{CoverImage, EpubMetadata, Identifier};
use crate::epub::config::ExtractorConfig;
use crate::epub::date::parse_date;
use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{Field, Metadata, Node, Package};

const TITLE: &str = "title";
const CREATOR: &str = "creator";
const LANGUAGE: &str = "language";
const IDENTIFIER: &str = "identifier";
const DATE: &str = "date";

/// 从OPF文件提取元数据
///
/// 必需字段（书名、语言、标识符）缺失时立即失败，不返回部分结果。
///
/// # 参数
/// * `archive` - 归档
/// * `rootfile_path` - OPF文件在归档中的路径
/// * `config` - 提取配置
pub fn extract<A: EntryReader + ?Sized>(
    archive: &mut A,
    rootfile_path: &str,
    config: &ExtractorConfig,
) -> Result<EpubMetadata> {
    let content = archive.read_text(rootfile_path).map_err(|e| match e {
        EpubError::NotFound(path) => EpubError::MissingRootfile(path),
        other => other,
    })?;

    let package = Package::parse_xml(&content)?;
    debug!(
        "解析OPF完成: 版本 {}，{} 个元数据字段，{} 个清单项",
        package.version,
        package.metadata.raw_metadata().len(),
        package.manifest.len()
    );

    let metadata = &package.metadata;
    let title = required_first_of(metadata, TITLE)?;
    let creators = metadata
        .get(CREATOR)
        .map(|field| {
            field
                .many_of()
                .into_iter()
                .filter(|creator| !creator.trim().is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|creators| !creators.is_empty());
    let language = required_first_of(metadata, LANGUAGE)?;
    let identifier = extract_identifier(metadata, package.unique_identifier.as_deref())?;
    let date = metadata
        .get(DATE)
        .and_then(Field::first_of)
        .filter(|text| !text.trim().is_empty())
        .map(parse_date)
        .transpose()?;
    let cover = resolve_cover(archive, &package, rootfile_path, config)?;

    Ok(EpubMetadata {
        title,
        creators,
        language,
        identifier,
        date,
        cover,
    })
}

/// 必需字段取主值，空白值视为缺失
fn required_first_of(metadata: &Metadata, name: &str) -> Result<String> {
    metadata
        .get(name)
        .and_then(Field::first_of)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| EpubError::MalformedPackage(format!("缺少必需的元数据字段 dc:{}", name)))
}

/// 解析标识符
///
/// 标识符必须是带 `id` 属性的元素。字段重复时优先选择被 `unique-identifier` 引用的那个，
/// 否则取第一个。
fn extract_identifier(metadata: &Metadata, unique_identifier: Option<&str>) -> Result<Identifier> {
    let field = metadata.get(IDENTIFIER).ok_or_else(|| {
        EpubError::MalformedPackage(format!("缺少必需的元数据字段 dc:{}", IDENTIFIER))
    })?;

    let node: Node = match field {
        Field::Text(_) => {
            return Err(EpubError::MalformedPackage(
                "dc:identifier缺少id属性".to_string(),
            ));
        }
        Field::Node(node) => node.clone(),
        Field::Nodes(_) => {
            let nodes = field.nodes();
            let chosen = unique_identifier
                .and_then(|uid| nodes.iter().position(|node| node.id() == Some(uid)))
                .unwrap_or(0);
            nodes.into_iter().nth(chosen).ok_or_else(|| {
                EpubError::MalformedPackage(format!("缺少必需的元数据字段 dc:{}", IDENTIFIER))
            })?
        }
    };

    let r#type = node
        .id()
        .ok_or_else(|| EpubError::MalformedPackage("dc:identifier缺少id属性".to_string()))?
        .to_string();

    if node.text.trim().is_empty() {
        return Err(EpubError::MalformedPackage("dc:identifier内容为空".to_string()));
    }

    Ok(Identifier {
        r#type,
        id: node.text,
    })
}

/// 按清单解析封面
///
/// 没有封面清单项，或计算出的路径在归档中不存在时返回 `None`，不视为错误。
fn resolve_cover<A: EntryReader + ?Sized>(
    archive: &mut A,
    package: &Package,
    rootfile_path: &str,
    config: &ExtractorConfig,
) -> Result<Option<CoverImage>> {
    let Some(item) = package.get_manifest_item(&config.cover.id) else {
        debug!("清单中没有id为 {} 的封面项", config.cover.id);
        return Ok(None);
    };

    if !item.is_image() {
        warn!("封面项 {} 的媒体类型不是图片: {}", item.href, item.media_type);
    }

    let path = config.cover.resolution.resolve(rootfile_path, &item.href);
    match archive.read_binary(&path) {
        Ok(data) => {
            debug!("读取封面 {}，{} 字节", path, data.len());
            Ok(Some(CoverImage {
                path,
                media_type: item.media_type.clone(),
                data,
            }))
        }
        Err(EpubError::NotFound(_)) => {
            warn!("封面项指向的条目不存在: {}", path);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
