// 结果合并 - 将多个源描述的同一影片合并为一个视图
//
// 元数据采用“信息最完整”规则（取最长的非空字符串），
// 豆瓣 ID 与集数采用多数投票规则

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::models::{GroupKey, ReconciledView, Resolution, ResultGroup, SearchResult};

/// 选出信息最完整的字符串
///
/// 取字符数最多的非空值，长度相同时保留先出现的；没有可选值时返回 `None`
pub fn pick_best_string<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().fold(None, |best, value| {
        if value.is_empty() {
            return best;
        }
        match best {
            Some(current) if value.chars().count() <= current.chars().count() => Some(current),
            _ => Some(value),
        }
    })
}

/// 出现次数最多的值
///
/// 次数相同时取最先出现的值；输入为空时返回 `None`
pub fn most_frequent<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<T> = Vec::new();
    let mut counts: HashMap<T, usize> = HashMap::new();

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in order {
        let count = counts[&value];
        if best.as_ref().map_or(true, |(_, max)| count > *max) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value)
}

/// 按源去重，同一源保留首次出现的条目
pub fn dedupe_by_source(items: &[SearchResult]) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.source.as_str()))
        .cloned()
        .collect()
}

/// 合并同一分组的成员
///
/// 标题由调用方给定，不参与投票
pub fn merge_group(title: &str, items: &[SearchResult]) -> ReconciledView {
    let douban_id = most_frequent(
        items
            .iter()
            .map(|item| item.douban_id.as_str())
            .filter(|id| !id.is_empty()),
    )
    .unwrap_or_default()
    .to_string();

    let episode_count = most_frequent(
        items
            .iter()
            .map(|item| item.episodes.len())
            .filter(|count| *count > 0),
    )
    .unwrap_or(0);

    ReconciledView {
        title: title.to_string(),
        year: best_of(items, |item| &item.year),
        poster: best_of(items, |item| &item.poster),
        desc: best_of(items, |item| &item.desc),
        type_name: best_of(items, |item| &item.type_name),
        class_tag: best_of(items, |item| &item.class_tag),
        douban_id,
        episode_count,
        members: dedupe_by_source(items),
    }
}

fn best_of(items: &[SearchResult], field: fn(&SearchResult) -> &String) -> String {
    pick_best_string(items.iter().map(|item| field(item).as_str()))
        .unwrap_or_default()
        .to_string()
}

/// 聚合卡片摘要
///
/// 直接合并一组已知相关的条目，标题取第一个条目的标题；空输入返回空视图
pub fn summarize(items: &[SearchResult]) -> ReconciledView {
    match items.first() {
        Some(first) => merge_group(&first.title, items),
        None => ReconciledView::default(),
    }
}

/// 按 (标题, 年份) 分组，分组顺序为首次出现的顺序
pub fn group_by_key(items: Vec<SearchResult>) -> Vec<(GroupKey, Vec<SearchResult>)> {
    let mut groups: Vec<(GroupKey, Vec<SearchResult>)> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for item in items {
        let key = item.group_key();
        match index.get(&key) {
            Some(&position) => groups[position].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}

/// 列表页分组，每个分组生成一个摘要卡片
pub fn group_results(items: Vec<SearchResult>) -> Vec<ResultGroup> {
    group_by_key(items)
        .into_iter()
        .map(|(key, members)| ResultGroup {
            summary: summarize(&members),
            key,
        })
        .collect()
}

/// 精确匹配并合并
///
/// 1. 标题等于 `title_hint`（未提供时等于 `query`），提供年份时年份也需相等
/// 2. 按 (标题, 年份) 分组
/// 3. 多于一个分组返回 `Ambiguous`，一个分组合并，没有分组返回 `NotFound`
///
/// 空字符串的提示视为未提供
pub fn resolve(
    results: Vec<SearchResult>,
    query: &str,
    title_hint: Option<&str>,
    year_hint: Option<&str>,
) -> Resolution {
    let title = title_hint.filter(|t| !t.is_empty()).unwrap_or(query);
    let year = year_hint.filter(|y| !y.is_empty());

    let matched: Vec<SearchResult> = results
        .into_iter()
        .filter(|item| item.matches(title, year))
        .collect();

    let mut groups = group_by_key(matched);
    match groups.len() {
        0 => Resolution::NotFound,
        1 => {
            let (_, members) = groups.remove(0);
            Resolution::Merged(merge_group(title, &members))
        }
        _ => Resolution::Ambiguous {
            query: query.to_string(),
        },
    }
}
