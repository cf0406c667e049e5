//! Phone bill aggregate
//!
//! One customer's collection of call records.

use super::call::CallRecord;
use serde::{Deserialize, Serialize};

/// A customer's phone bill
///
/// Calls are kept in insertion order internally; `calls()` always sorts on
/// read so the storage order is never observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneBill {
    customer: String,
    calls: Vec<CallRecord>,
}

impl PhoneBill {
    /// Create an empty bill for `customer`
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            calls: Vec::new(),
        }
    }

    /// Build a bill from an existing set of calls
    pub fn with_calls(customer: impl Into<String>, calls: impl IntoIterator<Item = CallRecord>) -> Self {
        let mut bill = Self::new(customer);
        bill.calls.extend(calls);
        bill
    }

    #[inline]
    pub fn customer(&self) -> &str {
        &self.customer
    }

    /// Append a call; no uniqueness or overlap check
    pub fn add_call(&mut self, call: CallRecord) {
        self.calls.push(call);
    }

    /// All calls, sorted by begin time then caller
    pub fn calls(&self) -> Vec<&CallRecord> {
        let mut calls: Vec<&CallRecord> = self.calls.iter().collect();
        calls.sort_by(|a, b| a.chronological_cmp(b));
        calls
    }

    /// Consume the bill, returning its calls sorted
    pub fn into_calls(self) -> Vec<CallRecord> {
        let mut calls = self.calls;
        calls.sort_by(|a, b| a.chronological_cmp(b));
        calls
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn at(d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn call(caller: &str, begin: NaiveDateTime) -> CallRecord {
        CallRecord::new("Dave", caller, "765-389-1273", begin, begin)
    }

    #[test]
    fn test_new_bill_is_empty() {
        let bill = PhoneBill::new("Dave");
        assert_eq!(bill.customer(), "Dave");
        assert!(bill.is_empty());
        assert!(bill.calls().is_empty());
    }

    #[test]
    fn test_calls_sorted_regardless_of_insert_order() {
        let mut bill = PhoneBill::new("Dave");
        bill.add_call(call("503-245-2345", at(3, 12, 0)));
        bill.add_call(call("503-245-2345", at(1, 9, 30)));
        bill.add_call(call("111-245-2345", at(3, 12, 0)));

        let begins: Vec<(NaiveDateTime, &str)> = bill
            .calls()
            .into_iter()
            .map(|c| (c.begin, c.caller.as_str()))
            .collect();

        assert_eq!(
            begins,
            vec![
                (at(1, 9, 30), "503-245-2345"),
                (at(3, 12, 0), "111-245-2345"),
                (at(3, 12, 0), "503-245-2345"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut bill = PhoneBill::new("Dave");
        bill.add_call(call("503-245-2345", at(1, 9, 30)));
        bill.add_call(call("503-245-2345", at(1, 9, 30)));
        assert_eq!(bill.len(), 2);
    }

    #[test]
    fn test_into_calls_matches_calls() {
        let bill = PhoneBill::with_calls(
            "Dave",
            vec![call("503-245-2345", at(2, 1, 0)), call("503-245-2345", at(1, 1, 0))],
        );
        let borrowed: Vec<CallRecord> = bill.calls().into_iter().cloned().collect();
        assert_eq!(bill.into_calls(), borrowed);
    }

    proptest! {
        #[test]
        fn prop_calls_are_sorted(entries in prop::collection::vec((0u32..3, 1u32..28, 0u32..24, 0u32..60), 0..40)) {
            let callers = ["111-111-1111", "503-245-2345", "999-000-1234"];
            let mut bill = PhoneBill::new("Dave");
            for (c, d, h, m) in &entries {
                bill.add_call(call(callers[*c as usize], at(*d, *h, *m)));
            }

            let calls = bill.calls();
            prop_assert_eq!(calls.len(), entries.len());
            for pair in calls.windows(2) {
                let key_a = (pair[0].begin, pair[0].caller.as_str());
                let key_b = (pair[1].begin, pair[1].caller.as_str());
                prop_assert!(key_a <= key_b);
            }
        }
    }
}
