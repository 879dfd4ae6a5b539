use serde::{Deserialize, Serialize};

/// 单个上游条目的规范化结果
///
/// 无论来自哪个源，搜索结果都会被转换为这一结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// 上游分配的 ID（仅在所属源内唯一）
    pub id: String,
    pub title: String,
    pub poster: String,
    /// 播放地址列表（已去重，保留原始顺序）
    pub episodes: Vec<String>,
    /// 源标识（配置中的 key，不为空）
    pub source: String,
    pub source_name: String,
    /// 分类/备注
    #[serde(rename = "class", default)]
    pub class_tag: String,
    /// 四位年份，未知时为空字符串
    #[serde(default)]
    pub year: String,
    /// 已去除 HTML 标签的简介
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub douban_id: String,
}

impl SearchResult {
    /// 分组键：(标题, 年份)
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.title, &self.year)
    }

    /// 是否精确匹配给定的标题和年份
    ///
    /// 年份为 `None` 时不参与比较
    pub fn matches(&self, title: &str, year: Option<&str>) -> bool {
        self.title == title && year.map_or(true, |y| self.year == y)
    }
}

/// 分组键
///
/// 精确字符串比较，不做大小写折叠或模糊匹配
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub title: String,
    pub year: String,
}

impl GroupKey {
    pub fn new(title: &str, year: &str) -> Self {
        Self {
            title: title.to_string(),
            year: year.to_string(),
        }
    }
}
