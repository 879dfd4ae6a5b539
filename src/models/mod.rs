pub mod aggregate;
pub mod douban;
pub mod search;

pub use aggregate::{PlaySource, ReconciledView, Resolution, ResultGroup};
pub use douban::{DoubanItem, DoubanKind, DoubanResult};
pub use search::{GroupKey, SearchResult};
