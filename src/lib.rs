//! # Purchase Core
//!
//! Deterministic business core for purchasing in a small business billing
//! application: line tax, GST split, document totals, document lifecycle,
//! purchase return approvals and draft autosave.
//!
//! ## Features
//!
//! - **Line tax**: flat or percentage discounts, taxable value and tax per line
//! - **GST split**: CGST + SGST for intra-state supplies, IGST for inter-state supplies
//! - **Document totals**: bill discount, charges, TDS, round-off and outstanding balance
//! - **Lifecycle**: draft, finalize, cancel, payments and goods receipts
//! - **Approvals**: multi-level approval workflow for purchase returns
//! - **Drafts**: autosave with a pluggable storage backend
//! - **Storage abstraction**: database-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use purchase_core::{compute_line_total, LineItem, NegativeAmountPolicy};
//! use bigdecimal::BigDecimal;
//!
//! let item = LineItem::new(
//!     Some("sku-1".to_string()),
//!     "Copper wire".to_string(),
//!     BigDecimal::from(10),
//!     BigDecimal::from(100),
//!     BigDecimal::from(18),
//! );
//! let line = compute_line_total(&item, NegativeAmountPolicy::Clamp).unwrap();
//! assert_eq!(line.total, BigDecimal::from(1180));
//! ```

pub mod draft;
pub mod money;
pub mod purchase;
pub mod request;
pub mod settings;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use draft::*;
pub use purchase::*;
pub use request::*;
pub use settings::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
