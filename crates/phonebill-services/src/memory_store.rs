//! Process-local bill storage

use async_trait::async_trait;
use parking_lot::RwLock;
use phonebill_core::{AppResult, BillStore, CallRecord, PhoneBill};
use std::collections::HashMap;
use tracing::{debug, info};

/// `BillStore` keeping every bill in a map keyed by customer name
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBillStore {
    bills: RwLock<HashMap<String, PhoneBill>>,
}

impl MemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of customers with a stored bill
    pub fn customer_count(&self) -> usize {
        self.bills.read().len()
    }
}

#[async_trait]
impl BillStore for MemoryBillStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, customer: &str) -> AppResult<PhoneBill> {
        let bill = self
            .bills
            .read()
            .get(customer)
            .cloned()
            .unwrap_or_else(|| PhoneBill::new(customer));
        debug!("Loaded {} calls for {}", bill.len(), customer);
        Ok(bill)
    }

    async fn persist(&self, bill: &PhoneBill) -> AppResult<()> {
        self.bills
            .write()
            .insert(bill.customer().to_string(), bill.clone());
        Ok(())
    }

    async fn append_call(&self, call: CallRecord) -> AppResult<()> {
        let mut bills = self.bills.write();
        bills
            .entry(call.customer.clone())
            .or_insert_with(|| PhoneBill::new(call.customer.clone()))
            .add_call(call);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let removed = {
            let mut bills = self.bills.write();
            let n = bills.len();
            bills.clear();
            n
        };
        info!("Removed {} in-memory bills", removed);
        Ok(())
    }
}
