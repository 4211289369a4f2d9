//! GST rate structures, tax splits and standard slabs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Component rates applied to one line, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRate {
    pub total_rate: BigDecimal,
    pub cgst_rate: BigDecimal,
    pub sgst_rate: BigDecimal,
    pub igst_rate: BigDecimal,
}

impl GstRate {
    /// Half of `total_rate` each to CGST and SGST
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            total_rate,
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::from(0),
        }
    }

    /// All of `total_rate` to IGST
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            igst_rate: total_rate.clone(),
            total_rate,
            cgst_rate: BigDecimal::from(0),
            sgst_rate: BigDecimal::from(0),
        }
    }

    /// Pick the intra-state or inter-state structure for a supply
    pub fn for_supply(total_rate: BigDecimal, is_inter_state: bool) -> Self {
        if is_inter_state {
            Self::inter_state(total_rate)
        } else {
            Self::intra_state(total_rate)
        }
    }

    /// The total rate must lie within 0..=100
    pub fn validate(&self) -> Result<(), GstError> {
        if self.total_rate < BigDecimal::from(0) || self.total_rate > BigDecimal::from(100) {
            return Err(GstError::InvalidRate(format!(
                "GST rate must be between 0 and 100, got {}",
                self.total_rate
            )));
        }
        Ok(())
    }
}

/// A tax amount divided between CGST, SGST and IGST
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSplit {
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
}

impl TaxSplit {
    /// Inter-state tax goes entirely to IGST; intra-state tax is halved
    /// between CGST and SGST
    pub fn of(tax_amount: &BigDecimal, is_inter_state: bool) -> Self {
        if is_inter_state {
            Self {
                cgst: BigDecimal::from(0),
                sgst: BigDecimal::from(0),
                igst: tax_amount.clone(),
            }
        } else {
            let half = tax_amount / BigDecimal::from(2);
            Self {
                cgst: half.clone(),
                sgst: half,
                igst: BigDecimal::from(0),
            }
        }
    }

    pub fn total(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }
}

/// Standard GST slabs: 0, 5, 12, 18 and 28 percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstCategory {
    Essential,
    Reduced,
    Standard,
    Higher,
    Luxury,
}

impl GstCategory {
    pub const ALL: [GstCategory; 5] = [
        GstCategory::Essential,
        GstCategory::Reduced,
        GstCategory::Standard,
        GstCategory::Higher,
        GstCategory::Luxury,
    ];

    pub fn rate(&self) -> BigDecimal {
        match self {
            GstCategory::Essential => BigDecimal::from(0),
            GstCategory::Reduced => BigDecimal::from(5),
            GstCategory::Standard => BigDecimal::from(12),
            GstCategory::Higher => BigDecimal::from(18),
            GstCategory::Luxury => BigDecimal::from(28),
        }
    }

    /// Find the standard slab matching a rate, if any
    pub fn from_rate(rate: &BigDecimal) -> Option<Self> {
        Self::ALL.into_iter().find(|category| &category.rate() == rate)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),
    #[error("Invalid GSTIN: {0}")]
    InvalidGstin(String),
}
