//! 提取配置模块
//!
//! 控制封面的识别与路径解析方式，支持从YAML文件加载。

use crate::epub::error::{EpubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认的封面清单项ID
pub const DEFAULT_COVER_ID: &str = "cover";

/// 默认的封面路径前缀
pub const DEFAULT_COVER_PREFIX: &str = "EPUB/";

/// 封面href到归档条目名的解析方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CoverResolution {
    /// 固定前缀拼接href，如 `EPUB/` + `cover.jpg`
    FixedPrefix { prefix: String },
    /// 相对OPF文件所在目录解析href
    RootfileRelative,
}

impl Default for CoverResolution {
    fn default() -> Self {
        CoverResolution::FixedPrefix {
            prefix: DEFAULT_COVER_PREFIX.to_string(),
        }
    }
}

impl CoverResolution {
    /// 计算封面在归档中的条目名
    ///
    /// # 参数
    /// * `rootfile_path` - OPF文件在归档中的路径
    /// * `href` - 清单项的href属性
    pub fn resolve(&self, rootfile_path: &str, href: &str) -> String {
        match self {
            CoverResolution::FixedPrefix { prefix } => format!("{}{}", prefix, href),
            CoverResolution::RootfileRelative => {
                let base = rootfile_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
                let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
                for segment in href.split('/') {
                    match segment {
                        "" | "." => {}
                        ".." => {
                            segments.pop();
                        }
                        other => segments.push(other),
                    }
                }
                segments.join("/")
            }
        }
    }
}

/// 封面配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// 标记封面的清单项ID
    pub id: String,
    /// href解析方式
    pub resolution: CoverResolution,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_COVER_ID.to_string(),
            resolution: CoverResolution::default(),
        }
    }
}

/// 元数据提取配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub cover: CoverConfig,
}

impl ExtractorConfig {
    /// 从YAML配置文件加载
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use epubmeta::ExtractorConfig;
    /// let config = ExtractorConfig::from_file("epubmeta.yaml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::Config(format!("无法读取配置文件: {}", e)))?;

        serde_yml::from_str(&content)
            .map_err(|e| EpubError::Config(format!("配置文件格式错误: {}", e)))
    }

    /// 生成默认配置文件
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default())
            .map_err(|e| EpubError::Config(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# EPUB元数据提取配置文件\n# cover.id: 标记封面的清单项ID\n# cover.resolution.mode: fixed_prefix（前缀+href）或 rootfile_relative（相对OPF目录）\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::Config(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 有路径时从文件加载，否则使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
