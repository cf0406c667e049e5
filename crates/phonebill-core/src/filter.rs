//! Inclusive date-time range filtering over call sets

use crate::error::AppError;
use crate::models::CallRecord;
use crate::AppResult;
use chrono::NaiveDateTime;

/// Inclusive `[begin, end]` bound on a call's begin time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallRange {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CallRange {
    pub fn new(begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { begin, end }
    }

    /// Combine optional bounds
    ///
    /// Both absent is no range. Exactly one present is rejected with the
    /// name of the missing bound. A range whose end precedes its begin is
    /// accepted and simply matches nothing.
    pub fn from_bounds(
        begin: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> AppResult<Option<Self>> {
        match (begin, end) {
            (None, None) => Ok(None),
            (Some(begin), Some(end)) => Ok(Some(Self::new(begin, end))),
            (None, Some(_)) => Err(AppError::OneSidedRange { missing: "begin" }),
            (Some(_), None) => Err(AppError::OneSidedRange { missing: "end" }),
        }
    }

    #[inline]
    pub fn contains(&self, call: &CallRecord) -> bool {
        call.begins_between(&self.begin, &self.end)
    }
}

/// Keep the calls whose begin time falls within `range`
///
/// `None` keeps everything. Input order is preserved.
pub fn filter_calls<'a, I>(calls: I, range: Option<&CallRange>) -> Vec<&'a CallRecord>
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    match range {
        None => calls.into_iter().collect(),
        Some(range) => calls.into_iter().filter(|c| range.contains(c)).collect(),
    }
}
