//! Per-line discount and tax computation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::money;
use crate::settings::NegativeAmountPolicy;
use crate::tax::gst::{GstRate, TaxSplit};
use crate::types::{DiscountType, LineItem, PurchaseError, PurchaseResult};

/// Computed amounts for a single line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTotal {
    /// Quantity x rate
    pub base_amount: BigDecimal,
    /// Discount as a flat amount
    pub discount_amount: BigDecimal,
    pub taxable_value: BigDecimal,
    pub tax_amount: BigDecimal,
    /// Taxable value plus tax
    pub total: BigDecimal,
}

/// Line totals together with the GST rate and tax split used for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTaxBreakdown {
    #[serde(flatten)]
    pub line: LineTotal,
    pub gst_rate: GstRate,
    #[serde(flatten)]
    pub split: TaxSplit,
}

/// Flat equivalent of a line's discount, before any clamping
pub fn discount_amount(item: &LineItem) -> BigDecimal {
    match item.discount_type {
        DiscountType::Flat => item.discount.clone(),
        DiscountType::Percentage => money::percent_of(&item.base_amount(), &item.discount),
    }
}

/// Compute taxable value, tax and total for one line.
///
/// No intermediate rounding is applied. A discount larger than the line
/// amount is handled according to `policy`.
pub fn compute_line_total(
    item: &LineItem,
    policy: NegativeAmountPolicy,
) -> PurchaseResult<LineTotal> {
    let base_amount = item.base_amount();
    let mut discount = discount_amount(item);

    if discount > base_amount {
        match policy {
            NegativeAmountPolicy::Clamp => {
                tracing::warn!(
                    item = item.description.as_str(),
                    %discount,
                    %base_amount,
                    "discount exceeds line amount, clamping taxable value to zero"
                );
                discount = base_amount.clone();
            }
            NegativeAmountPolicy::Reject => {
                return Err(PurchaseError::Calculation(format!(
                    "Discount {} exceeds line amount {} for '{}'",
                    discount, base_amount, item.description
                )));
            }
        }
    }

    let taxable_value = &base_amount - &discount;
    let tax_amount = money::percent_of(&taxable_value, &item.tax_rate);
    let total = &taxable_value + &tax_amount;

    Ok(LineTotal {
        base_amount,
        discount_amount: discount,
        taxable_value,
        tax_amount,
        total,
    })
}

/// Compute a line and split its tax for the given supply type
pub fn compute_line_breakdown(
    item: &LineItem,
    is_inter_state: bool,
    policy: NegativeAmountPolicy,
) -> PurchaseResult<LineTaxBreakdown> {
    let line = compute_line_total(item, policy)?;
    let gst_rate = GstRate::for_supply(item.tax_rate.clone(), is_inter_state);
    gst_rate.validate()?;
    let split = TaxSplit::of(&line.tax_amount, is_inter_state);

    Ok(LineTaxBreakdown {
        line,
        gst_rate,
        split,
    })
}
