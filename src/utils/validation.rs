//! Validation utilities

use bigdecimal::BigDecimal;

use crate::tax::gst::{GstCategory, GstError};
use crate::traits::*;
use crate::types::*;

/// Validate that a GSTIN is well formed: 15 alphanumeric characters
/// starting with a state code between 01 and 38
pub fn validate_gstin(gstin: &str) -> Result<(), GstError> {
    let gstin = gstin.trim();

    if gstin.len() != 15 {
        return Err(GstError::InvalidGstin(format!(
            "'{}' must be 15 characters long",
            gstin
        )));
    }

    if !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(GstError::InvalidGstin(format!(
            "'{}' can only contain letters and digits",
            gstin
        )));
    }

    let state: u8 = gstin[..2].parse().map_err(|_| {
        GstError::InvalidGstin(format!("'{}' must start with a numeric state code", gstin))
    })?;
    if !(1..=38).contains(&state) {
        return Err(GstError::InvalidGstin(format!(
            "'{}' has unknown state code {:02}",
            gstin, state
        )));
    }

    Ok(())
}

/// Validate that a cancellation or rejection reason is present
pub fn validate_reason(reason: &str) -> PurchaseResult<()> {
    if reason.trim().is_empty() {
        return Err(PurchaseError::Validation("Reason cannot be empty".to_string()));
    }

    if reason.len() > 500 {
        return Err(PurchaseError::Validation(
            "Reason cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a tax rate is one of the standard GST slabs
pub fn validate_standard_rate(rate: &BigDecimal) -> PurchaseResult<GstCategory> {
    GstCategory::from_rate(rate).ok_or_else(|| {
        PurchaseError::Validation(format!("{}% is not a standard GST rate", rate))
    })
}

/// Stricter line validator: on top of the default rules every line must have
/// an item selected, use a standard GST slab, and carry an expiry date when a
/// batch number is given.
pub struct StrictLineItemValidator;

impl LineItemValidator for StrictLineItemValidator {
    fn validate_line_item(&self, item: &LineItem) -> PurchaseResult<()> {
        if !item.is_selected() {
            return Err(PurchaseError::Validation(format!(
                "No item selected for line '{}'",
                item.description
            )));
        }

        DefaultLineItemValidator.validate_line_item(item)?;
        validate_standard_rate(&item.tax_rate)?;

        if item.batch_number.is_some() && item.expiry_date.is_none() {
            return Err(PurchaseError::Validation(format!(
                "Batch for '{}' needs an expiry date",
                item.description
            )));
        }

        Ok(())
    }

    fn validate_adjustments(&self, adjustments: &DocumentAdjustments) -> PurchaseResult<()> {
        DefaultLineItemValidator.validate_adjustments(adjustments)
    }
}
