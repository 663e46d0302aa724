//! AWS Resource Explorer commands

mod search;
mod views;

pub use search::{ListIndexes, ListIndexesParams, Search, SearchParams};
pub use views::{CreateView, CreateViewParams, DeleteView, DeleteViewParams, ListViews, ListViewsParams};
