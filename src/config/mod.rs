//! Configuration types for merge requests.
//!
//! This module provides:
//! - `MergeRequest`: Validated description of a single merge
//! - `MergeStrategy`: The caller-selectable merge strategies
//! - `MergePlan`: Declarative JSON form of a request
//! - Working-convention constants shared by the strategies

mod plan;
mod request;

pub use plan::MergePlan;
pub use request::{MergeRequest, MergeStrategy};

/// Reserved name of the transient directory the distributed job writes into.
///
/// Derived from the input pattern's parent directory; a leftover directory
/// with this name is treated as stale state, never reused.
pub const MERGE_TMP_DIR: &str = "merge-tmp-dir";

/// Delimiter inserted between files by the text strategy, by default none.
pub const DEFAULT_DELIMITER: &str = "";

/// Default number of map tasks for the distributed strategy.
pub const DEFAULT_MAPPER_COUNT: usize = 1;
