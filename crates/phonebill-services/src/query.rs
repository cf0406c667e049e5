//! Query service boundary
//!
//! Translates raw request parameters into store, filter and codec
//! operations. Every request is validated completely before the store is
//! touched, so a rejected request never leaves a partial write behind.
//!
//! # Validation order
//!
//! Fetch: `customer` present, then a usable customer name, then
//! both-or-neither of `begin`/`end`, then both bounds parse.
//!
//! Append: `customer`, `caller`, `callee`, `begin`, `end` present (first
//! missing one is reported), then a usable customer name, then phone number
//! format, then timestamps parse, then `end` not before `begin`.
//!
//! A usable customer name has no line breaks, since every backend must be
//! able to hold it, including the text format.

use chrono::NaiveDateTime;
use phonebill_core::time::{
    format_timestamp, is_valid_customer_name, is_valid_phone_number, parse_request_timestamp,
};
use phonebill_core::{filter_calls, AppError, AppResult, BillStore, CallRange, CallRecord, PhoneBill};
use phonebill_text::encode;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::locks::CustomerLocks;

pub const CUSTOMER_PARAMETER: &str = "customer";
pub const CALLER_PARAMETER: &str = "caller";
pub const CALLEE_PARAMETER: &str = "callee";
pub const BEGIN_PARAMETER: &str = "begin";
pub const END_PARAMETER: &str = "end";

/// Confirmation and status messages returned to clients
pub mod messages {
    pub fn added_call(customer: &str) -> String {
        format!("Added phone call for {}", customer)
    }

    pub fn no_calls_found(customer: &str) -> String {
        format!("No phone calls found for {}", customer)
    }

    pub fn all_bills_deleted() -> &'static str {
        "All phone bills have been deleted"
    }
}

/// Raw Fetch parameters as received from the transport
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub customer: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
}

/// Raw Append parameters as received from the transport
#[derive(Debug, Clone, Default)]
pub struct AppendRequest {
    pub customer: Option<String>,
    pub caller: Option<String>,
    pub callee: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
}

/// Treat empty (or all-whitespace) values as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> AppResult<&'a str> {
    present(value).ok_or(AppError::MissingParameter(name))
}

fn parse_parameter(value: &str, name: &'static str) -> AppResult<NaiveDateTime> {
    parse_request_timestamp(value).ok_or_else(|| AppError::InvalidDateTime {
        parameter: name,
        value: value.to_string(),
    })
}

fn check_customer(value: &str) -> AppResult<()> {
    if is_valid_customer_name(value) {
        Ok(())
    } else {
        Err(AppError::InvalidCustomerName {
            value: value.to_string(),
        })
    }
}

fn check_phone(value: &str, name: &'static str) -> AppResult<()> {
    if is_valid_phone_number(value) {
        Ok(())
    } else {
        Err(AppError::InvalidPhoneNumber {
            parameter: name,
            value: value.to_string(),
        })
    }
}

/// A validated Fetch
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchQuery {
    customer: String,
    range: Option<CallRange>,
}

impl FetchRequest {
    fn validate(&self) -> AppResult<FetchQuery> {
        let customer = require(&self.customer, CUSTOMER_PARAMETER)?;
        check_customer(customer)?;

        let begin = present(&self.begin);
        let end = present(&self.end);
        let range = match (begin, end) {
            (None, None) => None,
            (Some(_), None) => return Err(AppError::OneSidedRange { missing: END_PARAMETER }),
            (None, Some(_)) => return Err(AppError::OneSidedRange { missing: BEGIN_PARAMETER }),
            (Some(begin), Some(end)) => CallRange::from_bounds(
                Some(parse_parameter(begin, BEGIN_PARAMETER)?),
                Some(parse_parameter(end, END_PARAMETER)?),
            )?,
        };

        Ok(FetchQuery {
            customer: customer.to_string(),
            range,
        })
    }
}

impl AppendRequest {
    fn validate(&self) -> AppResult<CallRecord> {
        let customer = require(&self.customer, CUSTOMER_PARAMETER)?;
        let caller = require(&self.caller, CALLER_PARAMETER)?;
        let callee = require(&self.callee, CALLEE_PARAMETER)?;
        let begin = require(&self.begin, BEGIN_PARAMETER)?;
        let end = require(&self.end, END_PARAMETER)?;

        check_customer(customer)?;
        check_phone(caller, CALLER_PARAMETER)?;
        check_phone(callee, CALLEE_PARAMETER)?;

        let begin = parse_parameter(begin, BEGIN_PARAMETER)?;
        let end = parse_parameter(end, END_PARAMETER)?;
        if end < begin {
            return Err(AppError::EndBeforeBegin {
                begin: format_timestamp(&begin),
                end: format_timestamp(&end),
            });
        }

        Ok(CallRecord::new(customer, caller, callee, begin, end))
    }
}

fn rejected(operation: &str, err: AppError) -> AppError {
    warn!(code = err.error_code(), "{} rejected: {}", operation, err);
    err
}

/// Render a customer's (possibly filtered) calls through the text encoder
///
/// When nothing matches, the header is followed by an explicit no-calls
/// line instead of an empty body.
pub fn render_calls(customer: &str, calls: &[&CallRecord]) -> AppResult<String> {
    let bill = PhoneBill::with_calls(customer, calls.iter().map(|&c| c.clone()));
    let mut body = encode(&bill)?;
    if bill.is_empty() {
        body.push_str(&messages::no_calls_found(customer));
        body.push('\n');
    }
    Ok(body)
}

/// Fetch, Append and Reset over an injected `BillStore`
pub struct CallQueryService {
    store: Arc<dyn BillStore>,
    locks: CustomerLocks,
}

impl CallQueryService {
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        Self {
            store,
            locks: CustomerLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn BillStore> {
        &self.store
    }

    /// Load a customer's bill, keep the calls in range and render them
    #[instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn fetch(&self, request: FetchRequest) -> AppResult<String> {
        let query = request.validate().map_err(|e| rejected("Fetch", e))?;

        let _guard = self.locks.read().await;
        let bill = self.store.load(&query.customer).await?;
        let calls = filter_calls(bill.calls(), query.range.as_ref());

        debug!(
            "Fetched {} of {} calls for {}",
            calls.len(),
            bill.len(),
            query.customer
        );
        render_calls(&query.customer, &calls)
    }

    /// Validate and record one call, returning the confirmation message
    #[instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn append(&self, request: AppendRequest) -> AppResult<String> {
        let call = request.validate().map_err(|e| rejected("Append", e))?;
        let customer = call.customer.clone();

        {
            let _guard = self.locks.append(&customer).await;
            self.store.append_call(call).await?;
        }

        info!("Added phone call for {}", customer);
        Ok(messages::added_call(&customer))
    }

    /// Remove every stored bill
    #[instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn reset(&self) -> AppResult<String> {
        let _guard = self.locks.reset().await;
        self.store.clear().await?;

        info!("All phone bills deleted");
        Ok(messages::all_bills_deleted().to_string())
    }
}
