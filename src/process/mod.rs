/*!
 * Process Module
 * Process records and the registry that owns them
 */

pub mod table;
pub mod types;

// Re-export for convenience
pub use table::ProcessTable;
pub use types::{Process, ProcessStatus};
