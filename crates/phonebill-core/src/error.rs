//! Unified error handling for PhoneBill
//!
//! This module provides the error type shared by every crate in the
//! workspace, with automatic HTTP response mapping. Client-input failures
//! map to `412 Precondition Failed`, storage failures to `500`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Failures of the canonical text representation
///
/// Decoding failures carry the offending line so the caller can report
/// exactly what was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("source is empty or missing the customer name")]
    MissingCustomer,

    #[error("malformed line, expected 5 comma-separated fields: {line}")]
    MalformedLine { line: String },

    #[error("invalid {field} timestamp \"{value}\" in line: {line}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        line: String,
    },

    #[error("invalid {field} phone number \"{value}\" in line: {line}")]
    InvalidPhoneNumber {
        field: &'static str,
        value: String,
        line: String,
    },

    #[error("failed to read source: {0}")]
    Read(String),

    #[error("customer name {customer:?} cannot be written as a header line")]
    UnencodableCustomer { customer: String },
}

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Validation Errors ====================
    #[error("The required parameter \"{0}\" is missing")]
    MissingParameter(&'static str),

    #[error("The required parameter \"{missing}\" is missing: a date range needs both begin and end")]
    OneSidedRange { missing: &'static str },

    #[error("Invalid date/time format for \"{parameter}\": {value}")]
    InvalidDateTime {
        parameter: &'static str,
        value: String,
    },

    #[error("Invalid phone number for \"{parameter}\": {value} (expected nnn-nnn-nnnn)")]
    InvalidPhoneNumber {
        parameter: &'static str,
        value: String,
    },

    #[error("End time {end} is before begin time {begin}")]
    EndBeforeBegin { begin: String, end: String },

    #[error("Invalid customer name {value:?}: it must not be blank or contain line breaks")]
    InvalidCustomerName { value: String },

    #[error("Malformed request parameters: {0}")]
    InvalidRequest(String),

    // ==================== Codec Errors ====================
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Customer mismatch: expected {expected}, found {found}")]
    CustomerMismatch { expected: String, found: String },

    // ==================== Storage Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("I/O error: {0}")]
    Io(String),

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 412 Precondition Failed
            AppError::MissingParameter(_)
            | AppError::OneSidedRange { .. }
            | AppError::InvalidDateTime { .. }
            | AppError::InvalidPhoneNumber { .. }
            | AppError::EndBeforeBegin { .. }
            | AppError::InvalidCustomerName { .. }
            | AppError::InvalidRequest(_) => StatusCode::PRECONDITION_FAILED,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for logs and API consumers
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingParameter(_) => "missing_parameter",
            AppError::OneSidedRange { .. } => "one_sided_range",
            AppError::InvalidDateTime { .. } => "invalid_date_time",
            AppError::InvalidPhoneNumber { .. } => "invalid_phone_number",
            AppError::EndBeforeBegin { .. } => "end_before_begin",
            AppError::InvalidCustomerName { .. } => "invalid_customer_name",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Parse(_) => "parse_error",
            AppError::CustomerMismatch { .. } => "customer_mismatch",
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Io(_) => "io_error",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// True for client-input errors detected before any mutation
    pub fn is_validation(&self) -> bool {
        self.status_code() == StatusCode::PRECONDITION_FAILED
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .insert_header(("X-Error-Code", self.error_code()))
            .body(self.to_string())
    }
}

// ==================== From implementations ====================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => AppError::Pool(err.to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
