//! Priority arithmetic for the goods of a single project.
//!
//! The active goods of a project always hold the priorities
//! `PRIORITY_BASE..PRIORITY_BASE + n` exactly once each. Every rank-changing
//! write (insert, move, remove) is expressed as a target priority plus at most
//! one [`Shift`]: a contiguous range of other active goods moved by `+1` or
//! `-1`. The repository layer applies the shift and the target inside one
//! transaction; the store checks priority uniqueness at commit, so the order
//! of the two statements does not matter.
//!
//! Requested priorities are validated once with [`validate_requested`]; the
//! planning functions themselves are infallible and clamp out-of-range input.

use crate::error::CoreError;
use crate::types::Priority;

/// The highest rank a goods item can hold.
pub const PRIORITY_BASE: Priority = 1;

/// A contiguous range of priorities displaced by `delta`.
///
/// `to` is inclusive; `None` means the range is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub from: Priority,
    pub to: Option<Priority>,
    pub delta: Priority,
}

impl Shift {
    /// Whether an item at `priority` is displaced by this shift.
    pub fn contains(&self, priority: Priority) -> bool {
        priority >= self.from && self.to.map_or(true, |to| priority <= to)
    }

    /// The priority an item ends up at after the shift.
    pub fn apply(&self, priority: Priority) -> Priority {
        if self.contains(priority) {
            priority + self.delta
        } else {
            priority
        }
    }
}

/// Reject requested priorities the data model cannot hold.
pub fn validate_requested(requested: i64) -> Result<(), CoreError> {
    if requested < 0 {
        return Err(CoreError::Validation(format!(
            "priority must be non-negative, got {requested}"
        )));
    }
    Ok(())
}

/// Position for a newly inserted active item.
///
/// `None` appends after the last item. Explicit positions are clamped into
/// `[PRIORITY_BASE, active_count + 1]`.
pub fn insert_position(requested: Option<i64>, active_count: i64) -> Priority {
    let last = active_count + 1;
    match requested {
        None => to_priority(last),
        Some(p) => to_priority(p.clamp(i64::from(PRIORITY_BASE), last)),
    }
}

/// Items displaced by inserting at `position`: everything at or below it
/// moves down by one.
pub fn insert_shift(position: Priority) -> Shift {
    Shift {
        from: position,
        to: None,
        delta: 1,
    }
}

/// Target for moving an existing active item.
///
/// Clamped into `[PRIORITY_BASE, active_count]`. `active_count` includes the
/// item being moved.
pub fn move_target(requested: i64, active_count: i64) -> Priority {
    let last = active_count.max(i64::from(PRIORITY_BASE));
    to_priority(requested.clamp(i64::from(PRIORITY_BASE), last))
}

/// Priority stored for goods created already removed. They sit outside the
/// ranking, so the requested value is kept as-is (default 0).
pub fn detached_priority(requested: Option<i64>) -> Priority {
    to_priority(requested.unwrap_or(0).max(0))
}

/// Items displaced by moving an item from `current` to `target`.
///
/// Returns `None` when the item stays where it is.
pub fn move_shift(current: Priority, target: Priority) -> Option<Shift> {
    match target.cmp(&current) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some(Shift {
            from: target,
            to: Some(current - 1),
            delta: 1,
        }),
        std::cmp::Ordering::Greater => Some(Shift {
            from: current + 1,
            to: Some(target),
            delta: -1,
        }),
    }
}

/// Items displaced by removing the item at `position`: everything below it
/// moves up by one, closing the gap.
pub fn remove_shift(position: Priority) -> Shift {
    Shift {
        from: position + 1,
        to: None,
        delta: -1,
    }
}

/// Whether `priorities` is exactly `PRIORITY_BASE..PRIORITY_BASE + len`, in
/// any order.
pub fn is_contiguous(priorities: &[Priority]) -> bool {
    let mut sorted = priorities.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .zip(PRIORITY_BASE..)
        .all(|(actual, expected)| *actual == expected)
}

fn to_priority(value: i64) -> Priority {
    Priority::try_from(value).unwrap_or(Priority::MAX)
}
