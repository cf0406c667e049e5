//! PhoneBill Text Layer
//!
//! The canonical text representation of a phone bill and the text-file
//! storage backend built on it:
//!
//! - `codec`: encoder and decoder with a round-trip guarantee
//! - `store`: `TextFileStore`, one file per customer

pub mod codec;
pub mod store;

pub use codec::{decode, encode, read_bill, write_bill};
pub use store::{read_bill_file, write_bill_file, TextFileStore};
