/*!
 * System Limits and Constants
 *
 * Centralized location for simulator-wide limits and defaults.
 */

use super::types::{Priority, Tick};

// =============================================================================
// RESOURCE LIMITS
// =============================================================================

/// Number of exclusive resources in the system
pub const NR_RESOURCES: usize = 32;

// =============================================================================
// PRIORITY LIMITS
// =============================================================================

/// Lowest priority a process can be created with
pub const MIN_PRIORITY: Priority = 0;

/// Highest priority a process can be created with
pub const MAX_PRIORITY: Priority = 100;

/// Priority a resource holder is raised to under the ceiling protocol.
/// Must stay above MAX_PRIORITY so a ceiling holder beats every base priority.
pub const PRIORITY_CEILING: Priority = 1000;

// =============================================================================
// SIMULATION LIMITS
// =============================================================================

/// Default simulation horizon
pub const DEFAULT_MAX_TICKS: Tick = 10_000;

/// Minimum process lifespan (a process must run at least once)
pub const MIN_LIFESPAN: u32 = 1;
