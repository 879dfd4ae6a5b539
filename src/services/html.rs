// HTML 清理 - 去除简介字段中的标签
//
// 上游简介（vod_content）常带有 <p>、<br> 等标签，统一在此清理

use regex::Regex;
use std::sync::OnceLock;

/// 常见实体及其替换文本
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// 去除 HTML 标签
///
/// 标签替换为换行，连续换行合并为一个，连续空白合并为一个空格，
/// 最后去掉首尾空白
pub fn clean_html_tags(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    static NEWLINES_REGEX: OnceLock<Regex> = OnceLock::new();
    static SPACES_REGEX: OnceLock<Regex> = OnceLock::new();

    let tag = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").expect("标签正则表达式编译失败"));
    let newlines =
        NEWLINES_REGEX.get_or_init(|| Regex::new(r"\n\s*").expect("换行正则表达式编译失败"));
    let spaces = SPACES_REGEX.get_or_init(|| Regex::new(r"[ \t]+").expect("空白正则表达式编译失败"));

    let stripped = tag.replace_all(text, "\n");
    let mut decoded = stripped.into_owned();
    for (entity, replacement) in ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }

    let collapsed = newlines.replace_all(&decoded, "\n");
    let collapsed = spaces.replace_all(&collapsed, " ");

    collapsed.trim().to_string()
}
