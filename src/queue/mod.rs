/*!
 * Queue Module
 * List primitives shared by the ready queue and every resource wait-queue
 */

pub mod list;

pub use list::{Link, ListCursor, ProcessList, QueueId};
