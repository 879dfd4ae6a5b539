// 影视聚合搜索后端库
//
// 本库提供多源影视搜索与聚合的核心功能，包括：
// - API 路由
// - 源配置加载
// - 外部接口集成（资源站、豆瓣）
// - 搜索结果合并与精确匹配

pub mod api;
pub mod config;
pub mod external;
pub mod models;
pub mod services;
