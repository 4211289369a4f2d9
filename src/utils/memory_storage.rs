//! In-memory storage implementations for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

fn read_lock<'a, T>(lock: &'a RwLock<T>, name: &str) -> PurchaseResult<RwLockReadGuard<'a, T>> {
    lock.read()
        .map_err(|_| PurchaseError::Storage(format!("{} lock poisoned", name)))
}

fn write_lock<'a, T>(lock: &'a RwLock<T>, name: &str) -> PurchaseResult<RwLockWriteGuard<'a, T>> {
    lock.write()
        .map_err(|_| PurchaseError::Storage(format!("{} lock poisoned", name)))
}

/// In-memory document storage for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    documents: Arc<RwLock<HashMap<String, PurchaseDocument>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> PurchaseResult<()> {
        write_lock(&self.documents, "documents")?.clear();
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn save_document(&mut self, document: &PurchaseDocument) -> PurchaseResult<()> {
        let mut documents = write_lock(&self.documents, "documents")?;
        if documents.contains_key(&document.id) {
            return Err(PurchaseError::Storage(format!(
                "Document '{}' already exists",
                document.id
            )));
        }
        documents.insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn get_document(&self, document_id: &str) -> PurchaseResult<Option<PurchaseDocument>> {
        Ok(read_lock(&self.documents, "documents")?
            .get(document_id)
            .cloned())
    }

    async fn list_documents(
        &self,
        kind: Option<DocumentKind>,
        status: Option<DocumentStatus>,
    ) -> PurchaseResult<Vec<PurchaseDocument>> {
        let documents = read_lock(&self.documents, "documents")?;
        let mut filtered: Vec<PurchaseDocument> = documents
            .values()
            .filter(|document| kind.is_none_or(|k| document.kind == k))
            .filter(|document| status.is_none_or(|s| document.status == s))
            .cloned()
            .collect();

        filtered.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.number.cmp(&b.number))
        });
        Ok(filtered)
    }

    async fn update_document(&mut self, document: &PurchaseDocument) -> PurchaseResult<()> {
        let mut documents = write_lock(&self.documents, "documents")?;
        match documents.get_mut(&document.id) {
            Some(existing) => {
                *existing = document.clone();
                Ok(())
            }
            None => Err(PurchaseError::DocumentNotFound(document.id.clone())),
        }
    }

    async fn delete_document(&mut self, document_id: &str) -> PurchaseResult<()> {
        if write_lock(&self.documents, "documents")?
            .remove(document_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(PurchaseError::DocumentNotFound(document_id.to_string()))
        }
    }
}

/// In-memory draft storage, the test double for browser or file storage
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStorage {
    drafts: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drafts currently held
    pub fn len(&self) -> usize {
        self.drafts.read().map(|drafts| drafts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DraftStorage for MemoryDraftStorage {
    async fn save_draft(&mut self, key: &str, payload: &str) -> PurchaseResult<()> {
        write_lock(&self.drafts, "drafts")?.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    async fn load_draft(&self, key: &str) -> PurchaseResult<Option<String>> {
        Ok(read_lock(&self.drafts, "drafts")?.get(key).cloned())
    }

    async fn remove_draft(&mut self, key: &str) -> PurchaseResult<bool> {
        Ok(write_lock(&self.drafts, "drafts")?.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purchase::document::DocumentParams;
    use crate::purchase::totals::PurchaseCalculator;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn document(kind: DocumentKind, number: &str, day: u32) -> PurchaseDocument {
        let params = DocumentParams::new(
            kind,
            number.to_string(),
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            SupplierRef::new("sup-1".to_string(), "Acme Traders".to_string()),
        )
        .line_item(LineItem::new(
            Some("sku".to_string()),
            "Widget".to_string(),
            BigDecimal::from(1),
            BigDecimal::from(100),
            BigDecimal::from(5),
        ));
        PurchaseDocument::draft(params, &PurchaseCalculator::default()).unwrap()
    }

    #[tokio::test]
    async fn test_save_rejects_duplicates() {
        let mut storage = MemoryStorage::new();
        let doc = document(DocumentKind::Purchase, "B-1", 1);

        storage.save_document(&doc).await.unwrap();
        assert!(matches!(
            storage.save_document(&doc).await,
            Err(PurchaseError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_by_date() {
        let mut storage = MemoryStorage::new();
        storage
            .save_document(&document(DocumentKind::Purchase, "B-2", 9))
            .await
            .unwrap();
        storage
            .save_document(&document(DocumentKind::Purchase, "B-1", 2))
            .await
            .unwrap();
        storage
            .save_document(&document(DocumentKind::PurchaseOrder, "PO-1", 5))
            .await
            .unwrap();

        let purchases = storage
            .list_documents(Some(DocumentKind::Purchase), None)
            .await
            .unwrap();
        let numbers: Vec<&str> = purchases.iter().map(|d| d.number.as_str()).collect();
        assert_eq!(numbers, vec!["B-1", "B-2"]);

        let drafts = storage
            .list_documents(None, Some(DocumentStatus::Draft))
            .await
            .unwrap();
        assert_eq!(drafts.len(), 3);

        storage.clear().unwrap();
        assert!(storage.list_documents(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let mut storage = MemoryStorage::new();
        let doc = document(DocumentKind::Purchase, "B-3", 3);

        assert!(matches!(
            storage.update_document(&doc).await,
            Err(PurchaseError::DocumentNotFound(_))
        ));
        assert!(matches!(
            storage.delete_document(&doc.id).await,
            Err(PurchaseError::DocumentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_draft_storage() {
        let mut drafts = MemoryDraftStorage::new();
        assert!(drafts.is_empty());

        drafts.save_draft("purchase:new", "{}").await.unwrap();
        assert_eq!(
            drafts.load_draft("purchase:new").await.unwrap().as_deref(),
            Some("{}")
        );
        assert!(drafts.remove_draft("purchase:new").await.unwrap());
        assert!(!drafts.remove_draft("purchase:new").await.unwrap());
    }
}
