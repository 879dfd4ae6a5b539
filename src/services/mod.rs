pub mod aggregator;
pub mod episodes;
pub mod html;
pub mod reconcile;

pub use aggregator::SearchAggregator;
pub use episodes::EpisodeExtractor;
pub use html::clean_html_tags;
pub use reconcile::{group_results, most_frequent, pick_best_string, summarize};
