use serde::{Deserialize, Serialize};

use super::search::{GroupKey, SearchResult};

/// 聚合后的单个影片视图
///
/// 多个源描述同一部影片时合并得到，元数据字段取信息最完整的值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledView {
    pub title: String,
    pub year: String,
    pub poster: String,
    pub desc: String,
    pub type_name: String,
    #[serde(rename = "class")]
    pub class_tag: String,
    /// 出现次数最多的豆瓣 ID
    #[serde(skip_serializing_if = "String::is_empty")]
    pub douban_id: String,
    /// 出现次数最多的集数
    pub episode_count: usize,
    /// 按源去重后的成员（同一源保留首次出现的条目）
    pub members: Vec<SearchResult>,
}

impl ReconciledView {
    /// 每个成员对应一个可选播放源
    pub fn play_sources(&self) -> Vec<PlaySource> {
        self.members.iter().map(PlaySource::from_member).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// 可选播放源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySource {
    pub source: String,
    pub source_name: String,
    pub id: String,
    pub episode_count: usize,
    /// 播放页深链接
    pub play_url: String,
}

impl PlaySource {
    pub fn from_member(member: &SearchResult) -> Self {
        let mut play_url = format!(
            "/play?source={}&id={}&title={}",
            urlencoding::encode(&member.source),
            urlencoding::encode(&member.id),
            urlencoding::encode(&member.title)
        );
        if !member.year.is_empty() {
            play_url.push_str(&format!("&year={}", urlencoding::encode(&member.year)));
        }
        play_url.push_str("&from=aggregate");

        Self {
            source: member.source.clone(),
            source_name: member.source_name.clone(),
            id: member.id.clone(),
            episode_count: member.episodes.len(),
            play_url,
        }
    }
}

/// 精确匹配的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// 唯一分组，已合并
    Merged(ReconciledView),
    /// 存在多个 (标题, 年份) 分组，需要回退到列表页
    Ambiguous { query: String },
    /// 没有匹配结果
    NotFound,
}

/// 列表页中的一个分组卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
    pub key: GroupKey,
    pub summary: ReconciledView,
}
