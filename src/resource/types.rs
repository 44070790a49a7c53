/*!
 * Resource Types
 * Exclusive, non-reentrant resources and the protocols that arbitrate them
 */

use crate::core::types::{Pid, ResourceId};
use crate::queue::{ProcessList, QueueId};
use serde::{Deserialize, Serialize};

/// Exclusive resource
#[derive(Debug, Clone)]
pub struct Resource {
    pub id: ResourceId,
    pub owner: Option<Pid>,
    /// Processes blocked on this resource, in arrival order
    pub waitqueue: ProcessList,
    /// This resource raised its owner's priority and has not restored it yet
    pub(crate) boosted: bool,
}

impl Resource {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            owner: None,
            waitqueue: ProcessList::new(QueueId::Wait(id)),
            boosted: false,
        }
    }

    #[inline]
    pub fn is_boosted(&self) -> bool {
        self.boosted
    }
}

/// When a prioritized protocol raises the owner's priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostMode {
    /// Never; priorities are only used for selection
    None,
    /// Raise the owner to the system ceiling as soon as it acquires
    Ceiling,
    /// Raise the owner to a contending requester's priority, if higher
    Inheritance,
}

/// Acquire/release behaviour bound to a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceProtocol {
    /// First come first served; a release wakes the oldest waiter
    Fcfs,
    /// Priority aware; a release wakes every waiter
    Prioritized(BoostMode),
}
