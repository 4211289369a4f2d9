//! Interstate determination from GST state codes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::SupplierRef;

/// Two-character GST state code (the first two characters of a GSTIN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateCode(String);

impl StateCode {
    /// Build a state code from a state field value; blank values give `None`
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_ascii_uppercase()))
        }
    }

    /// Extract the state code from the first two characters of a GSTIN
    pub fn from_gstin(gstin: &str) -> Option<Self> {
        let prefix: String = gstin.trim().chars().take(2).collect();
        if prefix.chars().count() < 2 {
            None
        } else {
            Some(Self(prefix.to_ascii_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplier state code, from the state field or else from the GSTIN
pub fn supplier_state_code(supplier: &SupplierRef) -> Option<StateCode> {
    supplier
        .state
        .as_deref()
        .and_then(StateCode::new)
        .or_else(|| supplier.gstin.as_deref().and_then(StateCode::from_gstin))
}

/// Whether a purchase from `supplier` is inter-state for the business.
///
/// Missing business GSTIN or supplier state information is treated as an
/// intra-state supply.
pub fn is_inter_state(business_gstin: Option<&str>, supplier: &SupplierRef) -> bool {
    let business = business_gstin.and_then(StateCode::from_gstin);
    let supplier_code = supplier_state_code(supplier);

    match (business, supplier_code) {
        (Some(business), Some(supplier_code)) => business != supplier_code,
        (business, supplier_code) => {
            tracing::debug!(
                business = ?business,
                supplier = ?supplier_code,
                supplier_id = supplier.id.as_str(),
                "state code missing, treating purchase as intra-state"
            );
            false
        }
    }
}
