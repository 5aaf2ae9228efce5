//! The history page: one month of operations with summary figures and a search box.

mod page;
mod query;

pub use page::get_history_page;
