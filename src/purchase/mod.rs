//! Purchase documents: totals, lifecycle, approvals and the purchase book

pub mod aggregator;
pub mod approval;
pub mod book;
pub mod document;
pub mod totals;

pub use aggregator::*;
pub use approval::*;
pub use book::*;
pub use document::*;
pub use totals::*;
