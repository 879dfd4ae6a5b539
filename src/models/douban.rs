use serde::{Deserialize, Serialize};

/// 豆瓣推荐条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubanItem {
    pub title: String,
    pub poster: String,
    pub rate: String,
}

/// 豆瓣推荐接口响应
#[derive(Debug, Serialize, Deserialize)]
pub struct DoubanResult {
    pub code: u16,
    pub message: String,
    pub list: Vec<DoubanItem>,
}

/// 豆瓣条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoubanKind {
    Movie,
    Tv,
}

impl DoubanKind {
    pub fn as_str(&self) -> &str {
        match self {
            DoubanKind::Movie => "movie",
            DoubanKind::Tv => "tv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(DoubanKind::Movie),
            "tv" => Some(DoubanKind::Tv),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_douban_kind_round_trip() {
        assert_eq!(DoubanKind::from_str("movie"), Some(DoubanKind::Movie));
        assert_eq!(DoubanKind::from_str("tv"), Some(DoubanKind::Tv));
        assert_eq!(DoubanKind::from_str("anime"), None);
        assert_eq!(DoubanKind::Tv.as_str(), "tv");
    }
}
