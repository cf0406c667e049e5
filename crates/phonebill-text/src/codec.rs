//! Canonical line-oriented text representation of a phone bill
//!
//! ```text
//! Dave
//! Dave,503-245-2345,765-389-1273,02/27/2026 08:56,02/27/2026 10:27
//! ```
//!
//! The first line names the customer. Every following line is one call:
//! customer, caller, callee, begin and end, comma separated, with
//! timestamps in `MM/dd/yyyy HH:mm`. Calls are written in chronological
//! order.
//!
//! A customer name must fit on one line and not be blank; the encoder
//! refuses anything else rather than write a file it cannot read back.
//!
//! The decoder trusts the header line for the customer name. The customer
//! field embedded in each call line is read but not compared, except that a
//! name containing commas is only accepted when it is exactly the header
//! name (that is the only way a well-formed line can carry extra commas).

use chrono::NaiveDateTime;
use phonebill_core::time::{
    format_timestamp, is_valid_customer_name, is_valid_phone_number, parse_timestamp,
};
use phonebill_core::{CallRecord, ParseError, PhoneBill};
use std::io::{self, BufRead, Write};

/// Field separator within a call line
pub const FIELD_DELIMITER: char = ',';

/// Number of fields in a call line
pub const FIELD_COUNT: usize = 5;

/// Render one call as a text line (without the newline)
pub fn encode_call(customer: &str, call: &CallRecord) -> String {
    format!(
        "{customer}{d}{caller}{d}{callee}{d}{begin}{d}{end}",
        d = FIELD_DELIMITER,
        caller = call.caller,
        callee = call.callee,
        begin = format_timestamp(&call.begin),
        end = format_timestamp(&call.end),
    )
}

/// Render a bill as text
///
/// Fails with `UnencodableCustomer` when the customer name is blank or
/// spans more than one line.
pub fn encode(bill: &PhoneBill) -> Result<String, ParseError> {
    if !is_valid_customer_name(bill.customer()) {
        return Err(ParseError::UnencodableCustomer {
            customer: bill.customer().to_string(),
        });
    }

    let mut out = String::with_capacity(64 * (bill.len() + 1));
    out.push_str(bill.customer());
    out.push('\n');
    for call in bill.calls() {
        out.push_str(&encode_call(bill.customer(), call));
        out.push('\n');
    }
    Ok(out)
}

/// Write a bill as text to `writer`
pub fn write_bill<W: Write>(bill: &PhoneBill, mut writer: W) -> io::Result<()> {
    let text = encode(bill).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    writer.write_all(text.as_bytes())?;
    writer.flush()
}

/// Parse a bill from text
pub fn decode(source: &str) -> Result<PhoneBill, ParseError> {
    read_bill(source.as_bytes())
}

/// Parse a bill from a buffered reader
pub fn read_bill<R: BufRead>(reader: R) -> Result<PhoneBill, ParseError> {
    let mut lines = reader.lines();

    let customer = match lines.next() {
        Some(line) => strip_cr(line.map_err(|e| ParseError::Read(e.to_string()))?),
        None => return Err(ParseError::MissingCustomer),
    };
    if customer.trim().is_empty() {
        return Err(ParseError::MissingCustomer);
    }

    let mut bill = PhoneBill::new(customer);
    for line in lines {
        let line = strip_cr(line.map_err(|e| ParseError::Read(e.to_string()))?);
        if line.trim().is_empty() {
            continue;
        }
        let call = parse_call_line(&line, bill.customer())?;
        bill.add_call(call);
    }

    Ok(bill)
}

/// Parse a single call line for `customer`
pub fn parse_call_line(line: &str, customer: &str) -> Result<CallRecord, ParseError> {
    // Split from the right: only the customer field can legitimately hold commas.
    let fields: Vec<&str> = line.rsplitn(FIELD_COUNT, FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(malformed(line));
    }
    let (end, begin, callee, caller, embedded) = (fields[0], fields[1], fields[2], fields[3], fields[4]);
    if embedded.contains(FIELD_DELIMITER) && embedded != customer {
        return Err(malformed(line));
    }

    let caller = phone_field("caller", caller, line)?;
    let callee = phone_field("callee", callee, line)?;
    let begin = timestamp_field("begin", begin, line)?;
    let end = timestamp_field("end", end, line)?;

    Ok(CallRecord::new(customer, caller, callee, begin, end))
}

fn phone_field(field: &'static str, value: &str, line: &str) -> Result<String, ParseError> {
    let value = value.trim();
    if is_valid_phone_number(value) {
        Ok(value.to_string())
    } else {
        Err(ParseError::InvalidPhoneNumber {
            field,
            value: value.to_string(),
            line: line.to_string(),
        })
    }
}

fn timestamp_field(field: &'static str, value: &str, line: &str) -> Result<NaiveDateTime, ParseError> {
    parse_timestamp(value).ok_or_else(|| ParseError::InvalidTimestamp {
        field,
        value: value.to_string(),
        line: line.to_string(),
    })
}

fn malformed(line: &str) -> ParseError {
    ParseError::MalformedLine {
        line: line.to_string(),
    }
}

fn strip_cr(mut line: String) -> String {
    if line.ends_with('\r') {
        line.pop();
    }
    line
}
