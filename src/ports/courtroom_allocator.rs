//! Courtroom allocator port (§4.6): assigns an ordered candidate list to a
//! fixed courtroom set respecting per-courtroom daily capacity.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::case::Case;
use crate::domain::courtroom::{Courtroom, CourtroomId};

/// Result of one allocation pass: cases that found a courtroom, in the
/// order they were assigned, and cases that didn't fit anywhere.
pub struct AllocationOutcome {
    pub by_courtroom: HashMap<CourtroomId, Vec<Case>>,
    pub capacity_limited: Vec<Case>,
}

/// Assigns scheduling candidates to courtrooms (§4.6). Implementations must
/// be deterministic given the same ordered input and courtroom state.
pub trait CourtroomAllocator: Send + Sync {
    fn allocate(
        &self,
        ordered_candidates: Vec<Case>,
        courtrooms: &mut HashMap<CourtroomId, Courtroom>,
        courtroom_order: &[CourtroomId],
        today: NaiveDate,
    ) -> AllocationOutcome;
}
