// 剧集提取器 - 从播放地址字段中解析 m3u8 链接
//
// 上游接口的 vod_play_url 字段格式为：
//   第01集$https://a/1.m3u8#第02集$https://a/2.m3u8$$$第01集$https://b/1.m3u8
// 其中 `$$$` 分隔不同的播放组，每组内是 `名称$地址` 对

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 播放组分隔符
const GROUP_DELIMITER: &str = "$$$";

/// 剧集提取器
#[derive(Clone, Copy)]
pub struct EpisodeExtractor;

impl EpisodeExtractor {
    /// 提取播放地址列表
    ///
    /// # 规则
    /// 1. 按 `$$$` 拆分播放组
    /// 2. 每组匹配所有 `$http(s)://....m3u8` 片段
    /// 3. 取匹配数量最多的一组（数量相同时保留先出现的）
    /// 4. 去掉开头的 `$`，并截断 `(` 之后的注释（如清晰度标注）
    /// 5. 去重，保留首次出现的顺序
    ///
    /// 空字段返回空列表，从不失败
    ///
    /// # 示例
    /// ```
    /// use vod_aggregator::services::EpisodeExtractor;
    ///
    /// let raw = "A$http://x/1.m3u8$$$B$http://y/2.m3u8$http://y/3.m3u8";
    /// assert_eq!(
    ///     EpisodeExtractor::extract(raw),
    ///     vec!["http://y/2.m3u8".to_string(), "http://y/3.m3u8".to_string()]
    /// );
    /// ```
    pub fn extract(raw: &str) -> Vec<String> {
        if raw.is_empty() {
            return Vec::new();
        }

        let regex = Self::m3u8_regex();

        let mut best: Vec<&str> = Vec::new();
        for group in raw.split(GROUP_DELIMITER) {
            let matches: Vec<&str> = regex.find_iter(group).map(|m| m.as_str()).collect();
            if matches.len() > best.len() {
                best = matches;
            }
        }

        let mut seen = HashSet::new();
        best.into_iter()
            .map(Self::normalize_link)
            .filter(|link| seen.insert(link.clone()))
            .collect()
    }

    /// 规范化单个匹配片段
    fn normalize_link(matched: &str) -> String {
        let link = matched.strip_prefix('$').unwrap_or(matched);
        match link.find('(') {
            Some(index) if index > 0 => link[..index].to_string(),
            _ => link.to_string(),
        }
    }

    fn m3u8_regex() -> &'static Regex {
        static M3U8_REGEX: OnceLock<Regex> = OnceLock::new();

        M3U8_REGEX.get_or_init(|| {
            Regex::new(r#"\$https?://[^"'\s]+?\.m3u8"#)
                .expect("m3u8 正则表达式编译失败")
        })
    }
}
