//! Storage abstraction shared by every backend
//!
//! The text-file, relational and in-memory stores all implement
//! `BillStore`; the query boundary only ever sees the trait object.

use crate::error::AppError;
use crate::models::{CallRecord, PhoneBill};
use async_trait::async_trait;

/// Load and persist phone bills keyed by customer name
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Load the bill for `customer`
    ///
    /// An unknown customer is not an error: it yields an empty bill.
    async fn load(&self, customer: &str) -> Result<PhoneBill, AppError>;

    /// Persist `bill`
    async fn persist(&self, bill: &PhoneBill) -> Result<(), AppError>;

    /// Record one new call for its customer
    ///
    /// The default loads the current bill, appends and persists it, which
    /// suits stores whose `persist` replaces what was stored.
    async fn append_call(&self, call: CallRecord) -> Result<(), AppError> {
        let mut bill = self.load(&call.customer).await?;
        bill.add_call(call);
        self.persist(&bill).await
    }

    /// Remove every stored bill
    async fn clear(&self) -> Result<(), AppError>;
}
