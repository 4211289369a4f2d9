//! Purchase return approval and draft autosave

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use purchase_core::{
    draft_key,
    utils::{init_tracing, MemoryDraftStorage, MemoryStorage},
    ApprovalProgress, CalculatorConfig, DocumentKind, DocumentParams, DraftManager, LineItem,
    PurchaseBook, PurchaseDocument, PurchaseError, RequestState, SupplierRef,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("debug");
    println!("↩️  Purchase Core - Return Approval\n");

    let config = CalculatorConfig::default();
    let mut drafts = DraftManager::new(MemoryDraftStorage::new(), &config)?;
    let mut book = PurchaseBook::with_config(MemoryStorage::new(), config);

    let supplier = SupplierRef::new("sup-7".to_string(), "Nashik Paints".to_string())
        .with_gstin("27AAGCN1234K1Z2".to_string());
    let lines = vec![LineItem::new(
        Some("paint-20l".to_string()),
        "Exterior emulsion 20L".to_string(),
        BigDecimal::from(2),
        BigDecimal::from(3200),
        BigDecimal::from(18),
    )];

    // 1. Autosave the form while it is being filled in
    let key = draft_key(DocumentKind::PurchaseReturn, "new");
    let now = Utc::now().naive_utc();
    println!("💾 Autosaved: {}", drafts.autosave(&key, &lines, now).await?);
    println!("💾 Autosaved again: {}", drafts.autosave(&key, &lines, now).await?);

    let restored: Vec<LineItem> = drafts.restore(&key).await?.unwrap_or_default();
    println!("📂 Restored {} line(s) from draft\n", restored.len());

    // 2. Submit the return through a two level approval
    let mut params = DocumentParams::new(
        DocumentKind::PurchaseReturn,
        "PR-2024-014".to_string(),
        NaiveDate::from_ymd_opt(2024, 8, 14).ok_or("invalid date")?,
        supplier,
    )
    .business_gstin("27AAPFU0939F1ZV".to_string());
    for line in restored {
        params = params.line_item(line);
    }

    let mut state: RequestState<PurchaseDocument, PurchaseError> = RequestState::Loading;
    println!("⏳ Submitting (loading: {})", state.is_loading());
    state = book.create_draft(params).await.into();
    let document = match state.value() {
        Some(document) => document.clone(),
        None => return Err("return could not be created".into()),
    };
    drafts.clear(&key).await?;

    println!(
        "📄 {} total ₹{} (CGST ₹{} + SGST ₹{})",
        document.number,
        document.totals.total_amount,
        document.totals.aggregates.total_cgst,
        document.totals.aggregates.total_sgst
    );

    book.submit_return(
        &document.id,
        vec!["store-manager".to_string(), "accounts-head".to_string()],
    )
    .await?;

    for approver in ["store-manager", "accounts-head"] {
        let (_, progress) = book
            .approve_return(&document.id, approver, Some("Damaged in transit".to_string()))
            .await?;
        match progress {
            ApprovalProgress::Advanced { next_level } => {
                println!("  ✅ {} approved, waiting on level {}", approver, next_level)
            }
            ApprovalProgress::Approved => println!("  ✅ {} approved, return fully approved", approver),
        }
    }

    let completed = book.complete_return(&document.id).await?;
    println!("\n📦 Return {} is {}", completed.number, completed.status);

    // 3. A request against a document that does not exist
    let missing: RequestState<PurchaseDocument, PurchaseError> =
        book.complete_return("unknown").await.into();
    if let Some(err) = missing.error() {
        println!("⚠️  {}", err);
    }

    Ok(())
}
