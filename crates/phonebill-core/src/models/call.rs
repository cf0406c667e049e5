//! Call record model
//!
//! Represents one phone call billed to a customer.

use crate::time::format_timestamp;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One phone call
///
/// A plain value: construction never fails and does not check the phone
/// number format or that `end` follows `begin`. Callers validate input
/// before building a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallRecord {
    /// Customer billed for the call
    pub customer: String,

    /// Number that placed the call (`nnn-nnn-nnnn`)
    pub caller: String,

    /// Number that received the call (`nnn-nnn-nnnn`)
    pub callee: String,

    /// Call start, local time, minute precision
    pub begin: NaiveDateTime,

    /// Call end, local time, minute precision
    pub end: NaiveDateTime,
}

impl CallRecord {
    pub fn new(
        customer: impl Into<String>,
        caller: impl Into<String>,
        callee: impl Into<String>,
        begin: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            customer: customer.into(),
            caller: caller.into(),
            callee: callee.into(),
            begin,
            end,
        }
    }

    /// Chronological order: begin time, then caller number
    ///
    /// Records with the same begin time and caller compare equal here even
    /// when their other fields differ, so the type does not implement `Ord`.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.begin
            .cmp(&other.begin)
            .then_with(|| self.caller.cmp(&other.caller))
    }

    /// Begin time in the canonical text pattern
    pub fn begin_string(&self) -> String {
        format_timestamp(&self.begin)
    }

    /// End time in the canonical text pattern
    pub fn end_string(&self) -> String {
        format_timestamp(&self.end)
    }

    /// Call length (negative if the record was built with end before begin)
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }

    /// Whether the call started within `[lower, upper]`
    #[inline]
    pub fn begins_between(&self, lower: &NaiveDateTime, upper: &NaiveDateTime) -> bool {
        *lower <= self.begin && self.begin <= *upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_order_by_begin_then_caller() {
        let early = CallRecord::new("Dave", "999-999-9999", "111-111-1111", at(1, 8, 0), at(1, 9, 0));
        let late = CallRecord::new("Dave", "111-111-1111", "111-111-1111", at(2, 8, 0), at(2, 9, 0));
        let tie_low = CallRecord::new("Dave", "111-111-1111", "222-222-2222", at(1, 8, 0), at(1, 8, 5));

        assert_eq!(early.chronological_cmp(&late), Ordering::Less);
        assert_eq!(tie_low.chronological_cmp(&early), Ordering::Less);
    }

    #[test]
    fn test_same_begin_and_caller_are_order_equivalent() {
        let a = CallRecord::new("Dave", "503-245-2345", "765-389-1273", at(27, 8, 56), at(27, 10, 27));
        let b = CallRecord::new("Dave", "503-245-2345", "111-222-3333", at(27, 8, 56), at(27, 8, 57));

        assert_eq!(a.chronological_cmp(&b), Ordering::Equal);
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_accepts_end_before_begin() {
        let call = CallRecord::new("Dave", "503-245-2345", "765-389-1273", at(27, 10, 0), at(27, 9, 0));
        assert_eq!(call.duration(), Duration::minutes(-60));
    }

    #[test]
    fn test_begins_between_is_inclusive() {
        let call = CallRecord::new("Dave", "503-245-2345", "765-389-1273", at(27, 8, 56), at(27, 10, 27));

        assert!(call.begins_between(&at(27, 8, 56), &at(27, 8, 56)));
        assert!(call.begins_between(&at(27, 0, 0), &at(27, 8, 56)));
        assert!(!call.begins_between(&at(27, 8, 57), &at(27, 23, 0)));
    }

    #[test]
    fn test_time_strings() {
        let call = CallRecord::new("Dave", "503-245-2345", "765-389-1273", at(27, 8, 56), at(27, 10, 27));
        assert_eq!(call.begin_string(), "02/27/2026 08:56");
        assert_eq!(call.end_string(), "02/27/2026 10:27");
        assert_eq!(call.duration(), Duration::minutes(91));
    }
}
