/*!
 * Process List
 * Intrusive doubly-linked list over the process table
 *
 * Link nodes live inside each `Process`; the list itself only stores the
 * head, tail and length. All operations are O(1) except traversal.
 */

use crate::core::errors::{SimError, SimResult};
use crate::core::types::{Pid, ResourceId};
use crate::process::ProcessTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which list a process is linked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueId {
    Ready,
    Wait(ResourceId),
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueId::Ready => write!(f, "ready queue"),
            QueueId::Wait(r) => write!(f, "wait-queue of resource {}", r),
        }
    }
}

/// Intrusive link embedded in each process
///
/// `queue` tracks membership. Head and tail nodes have a `None` neighbour, so
/// the neighbours alone cannot tell a linked node from a detached one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Link {
    queue: Option<QueueId>,
    prev: Option<Pid>,
    next: Option<Pid>,
}

impl Link {
    pub const fn new() -> Self {
        Self {
            queue: None,
            prev: None,
            next: None,
        }
    }

    /// Returns `true` if this node is not on any list
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.queue.is_none()
    }

    #[inline]
    pub fn queue(&self) -> Option<QueueId> {
        self.queue
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<Pid> {
        self.next
    }

    #[inline]
    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Doubly-linked list of processes
#[derive(Debug, Clone)]
pub struct ProcessList {
    id: QueueId,
    head: Option<Pid>,
    tail: Option<Pid>,
    len: usize,
}

impl ProcessList {
    pub fn new(id: QueueId) -> Self {
        Self {
            id,
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> QueueId {
        self.id
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.head.is_none(), self.tail.is_none());
        debug_assert_eq!(self.head.is_none(), self.len == 0);
        self.head.is_none()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Head of the list without removing it
    #[inline]
    pub fn first(&self) -> Option<Pid> {
        self.head
    }

    /// Append a detached process at the tail
    pub fn push_back(&mut self, table: &mut ProcessTable, pid: Pid) -> SimResult<()> {
        self.ensure_detached(table, pid)?;

        let old_tail = self.tail;
        {
            let link = table.link_mut(pid)?;
            link.queue = Some(self.id);
            link.prev = old_tail;
            link.next = None;
        }

        match old_tail {
            Some(tail) => table.link_mut(tail)?.next = Some(pid),
            None => self.head = Some(pid),
        }
        self.tail = Some(pid);
        self.len += 1;
        Ok(())
    }

    /// Insert a detached process at the head
    pub fn push_front(&mut self, table: &mut ProcessTable, pid: Pid) -> SimResult<()> {
        self.ensure_detached(table, pid)?;

        let old_head = self.head;
        {
            let link = table.link_mut(pid)?;
            link.queue = Some(self.id);
            link.prev = None;
            link.next = old_head;
        }

        match old_head {
            Some(head) => table.link_mut(head)?.prev = Some(pid),
            None => self.tail = Some(pid),
        }
        self.head = Some(pid);
        self.len += 1;
        Ok(())
    }

    /// Detach and return the head
    pub fn pop_front(&mut self, table: &mut ProcessTable) -> SimResult<Option<Pid>> {
        match self.head {
            Some(pid) => {
                self.remove(table, pid)?;
                Ok(Some(pid))
            }
            None => Ok(None),
        }
    }

    /// Detach `pid` from this list
    ///
    /// Returns `Ok(false)` when the process is already detached, so a second
    /// removal is a no-op. A process linked on a *different* list is an error.
    pub fn remove(&mut self, table: &mut ProcessTable, pid: Pid) -> SimResult<bool> {
        let link = *table.link(pid)?;
        match link.queue {
            None => return Ok(false),
            Some(q) if q != self.id => {
                return Err(SimError::QueueCorrupted(format!(
                    "process {} is on the {}, not the {}",
                    pid, q, self.id
                )));
            }
            Some(_) => {}
        }

        match link.prev {
            Some(prev) => table.link_mut(prev)?.next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => table.link_mut(next)?.prev = link.prev,
            None => self.tail = link.prev,
        }

        table.link_mut(pid)?.reset();
        self.len = self.len.checked_sub(1).ok_or_else(|| {
            SimError::QueueCorrupted(format!("{} length underflow", self.id))
        })?;
        Ok(true)
    }

    /// Removal-safe forward traversal
    #[inline]
    pub fn cursor(&self) -> ListCursor {
        ListCursor { next: self.head }
    }

    /// Snapshot of the list in order
    pub fn pids(&self, table: &ProcessTable) -> Vec<Pid> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.cursor();
        while let Some(pid) = cursor.next(table) {
            out.push(pid);
        }
        out
    }

    fn ensure_detached(&self, table: &ProcessTable, pid: Pid) -> SimResult<()> {
        match table.link(pid)?.queue {
            None => Ok(()),
            Some(q) => Err(SimError::QueueCorrupted(format!(
                "pushing process {} onto the {} while it is on the {}",
                pid, self.id, q
            ))),
        }
    }
}

/// Forward cursor that prefetches the successor before yielding
///
/// The element just yielded may be removed (or moved to another list)
/// without disturbing the traversal.
#[derive(Debug, Clone, Copy)]
pub struct ListCursor {
    next: Option<Pid>,
}

impl ListCursor {
    pub fn next(&mut self, table: &ProcessTable) -> Option<Pid> {
        let current = self.next?;
        self.next = table.link(current).ok().and_then(Link::next);
        Some(current)
    }
}
