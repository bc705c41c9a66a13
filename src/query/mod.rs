//! Path queries over the decoded transaction.

mod engine;
mod path;
mod shortcuts;

pub use engine::{FullTransaction, QueryResult, QueryValue, execute_query};
pub use path::{PathSegment, QueryPath};
pub use shortcuts::{expand_shortcut, is_shortcut};
