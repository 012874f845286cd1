//! 元数据处理模块
//!
//! 保存OPF `<metadata>` 中各元素的原始形态，并提供把多种形态归一化为文本的方法。

use std::collections::HashMap;

/// 带属性的元数据元素，如 `<dc:identifier id="ISBN">123</dc:identifier>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// 元素属性，键为属性的限定名（如 `id`、`opf:scheme`）
    pub attributes: HashMap<String, String>,
    /// 元素文本内容
    pub text: String,
}

impl Node {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            attributes: HashMap::new(),
            text: text.into(),
        }
    }

    /// 添加属性（构造用）
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// `id` 属性
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// 元数据字段的三种形态
///
/// 同一个语义字段在OPF中可以是纯文本、单个带属性元素或重复出现的元素序列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// 无属性的单个元素，如 `<dc:title>书名</dc:title>`
    Text(String),
    /// 带属性的单个元素
    Node(Node),
    /// 重复出现的元素，按文档顺序排列
    Nodes(Vec<Node>),
}

impl Field {
    /// 取主值：纯文本原样返回，单个元素取其文本，序列取第一个元素的文本
    ///
    /// 只有空序列会返回 `None`。
    pub fn first_of(&self) -> Option<&str> {
        match self {
            Field::Text(text) => Some(text.as_str()),
            Field::Node(node) => Some(node.text.as_str()),
            Field::Nodes(nodes) => nodes.first().map(|node| node.text.as_str()),
        }
    }

    /// 取全部值，保持文档顺序；纯文本和单个元素得到长度为1的列表
    pub fn many_of(&self) -> Vec<String> {
        match self {
            Field::Text(text) => vec![text.clone()],
            Field::Node(node) => vec![node.text.clone()],
            Field::Nodes(nodes) => nodes.iter().map(|node| node.text.clone()).collect(),
        }
    }

    /// 元素个数
    pub fn len(&self) -> usize {
        match self {
            Field::Text(_) | Field::Node(_) => 1,
            Field::Nodes(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 以元素视图遍历；纯文本视为无属性元素
    pub fn nodes(&self) -> Vec<Node> {
        match self {
            Field::Text(text) => vec![Node::new(text.clone())],
            Field::Node(node) => vec![node.clone()],
            Field::Nodes(nodes) => nodes.clone(),
        }
    }

    /// 追加同名元素，第二次出现起转为序列
    fn push(self, node: Node) -> Field {
        match self {
            Field::Text(text) => Field::Nodes(vec![Node::new(text), node]),
            Field::Node(first) => Field::Nodes(vec![first, node]),
            Field::Nodes(mut nodes) => {
                nodes.push(node);
                Field::Nodes(nodes)
            }
        }
    }
}

/// OPF文件中的原始元数据
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// key为元素本地名（如 `dc:title` 记为 `title`）
    raw_metadata: HashMap<String, Field>,
}

impl Metadata {
    /// 创建空的元数据实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个元数据元素
    ///
    /// 首次出现时，无属性的元素记为 `Field::Text`，有属性的记为 `Field::Node`；
    /// 再次出现时合并为 `Field::Nodes`。
    pub fn add_element(&mut self, name: String, node: Node) {
        let field = match self.raw_metadata.remove(&name) {
            None if node.attributes.is_empty() => Field::Text(node.text),
            None => Field::Node(node),
            Some(existing) => existing.push(node),
        };
        self.raw_metadata.insert(name, field);
    }

    /// 根据本地名查找字段
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.raw_metadata.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.raw_metadata.contains_key(name)
    }

    /// 获取原始元数据映射
    pub fn raw_metadata(&self) -> &HashMap<String, Field> {
        &self.raw_metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> Field {
        Field::Nodes(vec![
            Node::new("第一作者").with_attribute("id", "a1"),
            Node::new("第二作者").with_attribute("id", "a2"),
            Node::new("第三作者"),
        ])
    }

    #[test]
    fn test_first_of_all_shapes() {
        assert_eq!(Field::Text("书名".to_string()).first_of(), Some("书名"));
        assert_eq!(
            Field::Node(Node::new("书名").with_attribute("id", "t")).first_of(),
            Some("书名")
        );

        let seq = sequence();
        assert_eq!(seq.first_of(), Some("第一作者"));
        assert_eq!(seq.first_of(), seq.many_of().first().map(String::as_str));

        assert_eq!(Field::Nodes(Vec::new()).first_of(), None);
    }

    #[test]
    fn test_many_of_preserves_cardinality_and_order() {
        assert_eq!(Field::Text("甲".to_string()).many_of(), vec!["甲"]);
        assert_eq!(Field::Node(Node::new("乙")).many_of(), vec!["乙"]);
        assert_eq!(sequence().many_of(), vec!["第一作者", "第二作者", "第三作者"]);
        assert_eq!(sequence().len(), 3);
    }

    #[test]
    fn test_add_element_shapes() {
        let mut metadata = Metadata::new();
        metadata.add_element("title".to_string(), Node::new("书名"));
        metadata.add_element(
            "identifier".to_string(),
            Node::new("123").with_attribute("id", "ISBN"),
        );
        metadata.add_element("creator".to_string(), Node::new("作者一"));
        metadata.add_element(
            "creator".to_string(),
            Node::new("作者二").with_attribute("id", "c2"),
        );

        assert_eq!(metadata.get("title"), Some(&Field::Text("书名".to_string())));

        match metadata.get("identifier") {
            Some(Field::Node(node)) => {
                assert_eq!(node.id(), Some("ISBN"));
                assert_eq!(node.text, "123");
            }
            other => panic!("期望Field::Node，实际: {:?}", other),
        }

        match metadata.get("creator") {
            Some(Field::Nodes(nodes)) => {
                assert_eq!(nodes.len(), 2);
                assert_eq!(nodes[0].id(), None);
                assert_eq!(nodes[1].id(), Some("c2"));
            }
            other => panic!("期望Field::Nodes，实际: {:?}", other),
        }

        assert!(!metadata.contains("date"));
        assert_eq!(metadata.raw_metadata().len(), 3);
    }
}
