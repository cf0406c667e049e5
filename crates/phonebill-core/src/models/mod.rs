//! Domain models for PhoneBill

pub mod bill;
pub mod call;

pub use bill::PhoneBill;
pub use call::CallRecord;
