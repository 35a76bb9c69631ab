//! CLI command implementations.

mod history;
mod rollback;
mod serve;

pub(crate) use history::HistoryArgs;
pub(crate) use rollback::RollbackArgs;
pub(crate) use serve::ServeArgs;
