//! Purchase invoice totals: line taxes, GST split and round-off

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use purchase_core::{
    is_inter_state, utils::init_tracing, utils::MemoryStorage, CalculatorConfig, DiscountType,
    DocumentAdjustments, DocumentKind, DocumentParams, LineItem, PurchaseBook, SupplierRef,
};
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");
    println!("🧾 Purchase Core - Invoice Totals\n");

    let config = CalculatorConfig::load()?;
    let mut book = PurchaseBook::with_config(MemoryStorage::new(), config);

    let business_gstin = "27AAPFU0939F1ZV".to_string();
    let suppliers = [
        SupplierRef::new("sup-1".to_string(), "Pune Hardware".to_string())
            .with_gstin("27AAGCB7383J1Z4".to_string()),
        SupplierRef::new("sup-2".to_string(), "Chennai Textiles".to_string())
            .with_state("33".to_string()),
    ];

    let items = vec![
        LineItem::new(
            Some("cable-2.5".to_string()),
            "Copper cable 2.5mm".to_string(),
            BigDecimal::from(10),
            BigDecimal::from(100),
            BigDecimal::from(18),
        ),
        LineItem::new(
            Some("switch-6a".to_string()),
            "Modular switch 6A".to_string(),
            BigDecimal::from(24),
            BigDecimal::from_str("42.50")?,
            BigDecimal::from(12),
        )
        .with_discount(BigDecimal::from(5), DiscountType::Percentage),
    ];

    // 1. Per-line breakdown
    println!("📊 Line breakdown (intra-state):");
    for item in &items {
        let breakdown = book.calculator().line_breakdown(item, false)?;
        println!(
            "  {:<20} taxable ₹{:>8}  CGST ₹{:>6}  SGST ₹{:>6}  total ₹{}",
            item.description,
            breakdown.line.taxable_value,
            breakdown.split.cgst,
            breakdown.split.sgst,
            breakdown.line.total
        );
    }
    println!();

    // 2. Same lines against a local and an outstation supplier
    for (index, supplier) in suppliers.into_iter().enumerate() {
        let inter = is_inter_state(Some(&business_gstin), &supplier);
        let name = supplier.name.clone();

        let document = book
            .create_draft(
                DocumentParams::new(
                    DocumentKind::Purchase,
                    format!("INV-{:03}", index + 1),
                    NaiveDate::from_ymd_opt(2024, 8, 1).ok_or("invalid date")?,
                    supplier,
                )
                .business_gstin(business_gstin.clone())
                .line_item(items[0].clone())
                .line_item(items[1].clone())
                .adjustments(DocumentAdjustments {
                    bill_discount: BigDecimal::from(50),
                    shipping_charges: BigDecimal::from(120),
                    packing_charges: BigDecimal::from_str("15.35")?,
                    ..Default::default()
                }),
            )
            .await?;

        let totals = &document.totals;
        println!(
            "🏢 {} ({}):",
            name,
            if inter { "inter-state" } else { "intra-state" }
        );
        println!("  Subtotal:        ₹{}", totals.aggregates.subtotal);
        println!("  Item discount:   ₹{}", totals.aggregates.item_discount);
        println!("  CGST:            ₹{}", totals.aggregates.total_cgst);
        println!("  SGST:            ₹{}", totals.aggregates.total_sgst);
        println!("  IGST:            ₹{}", totals.aggregates.total_igst);
        println!("  Before round-off ₹{}", totals.before_round_off);
        println!("  Round-off:       ₹{}", totals.round_off);
        println!("  Total:           ₹{}", totals.total_amount);
        println!();
    }

    // 3. Record a payment on the first invoice
    let invoices = book
        .list_documents(Some(DocumentKind::Purchase), None)
        .await?;
    if let Some(first) = invoices.first() {
        book.finalize(&first.id).await?;
        let paid = book.record_payment(&first.id, BigDecimal::from(1000)).await?;
        println!(
            "💰 {} paid ₹{}, outstanding ₹{}",
            paid.number, paid.paid_amount, paid.totals.outstanding_amount
        );
        println!("{}", serde_json::to_string_pretty(&paid.totals)?);
    }

    Ok(())
}
