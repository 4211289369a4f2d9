//! Multi-level approval workflow for purchase returns

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::purchase::totals::PurchaseCalculator;
use crate::types::*;

/// Decision recorded at one approval level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// One level in the approval chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalLevel {
    /// 1-based position in the chain
    pub level: u32,
    pub approver: String,
    pub status: ApprovalStatus,
    pub comments: Option<String>,
    pub acted_at: Option<NaiveDateTime>,
}

/// Result of approving the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalProgress {
    /// More levels remain; `next_level` is now current
    Advanced { next_level: u32 },
    /// Every level has approved
    Approved,
}

/// Ordered approval levels, processed one at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalWorkflow {
    pub levels: Vec<ApprovalLevel>,
}

impl ApprovalWorkflow {
    /// Build a chain with one pending level per approver, in order
    pub fn new(approvers: Vec<String>) -> PurchaseResult<Self> {
        if approvers.is_empty() {
            return Err(PurchaseError::Validation(
                "At least one approval level is required".to_string(),
            ));
        }
        if approvers.iter().any(|approver| approver.trim().is_empty()) {
            return Err(PurchaseError::Validation(
                "Approver cannot be empty".to_string(),
            ));
        }

        let levels = approvers
            .into_iter()
            .enumerate()
            .map(|(index, approver)| ApprovalLevel {
                level: index as u32 + 1,
                approver,
                status: ApprovalStatus::Pending,
                comments: None,
                acted_at: None,
            })
            .collect();

        Ok(Self { levels })
    }

    pub fn is_rejected(&self) -> bool {
        self.levels
            .iter()
            .any(|level| level.status == ApprovalStatus::Rejected)
    }

    pub fn is_approved(&self) -> bool {
        !self.levels.is_empty()
            && self
                .levels
                .iter()
                .all(|level| level.status == ApprovalStatus::Approved)
    }

    /// The lowest pending level, unless the chain has been rejected
    pub fn current_level(&self) -> Option<&ApprovalLevel> {
        self.current_index().map(|index| &self.levels[index])
    }

    /// Position of the first pending level in `levels`. Stored level numbers
    /// are display values and are never used for indexing.
    fn current_index(&self) -> Option<usize> {
        if self.is_rejected() {
            return None;
        }
        self.levels
            .iter()
            .position(|level| level.status == ApprovalStatus::Pending)
    }

    fn current_index_for(&self, approver: &str) -> PurchaseResult<usize> {
        let index = self.current_index().ok_or_else(|| {
            PurchaseError::Validation("No approval level is awaiting a decision".to_string())
        })?;

        let current = &self.levels[index];
        if current.approver != approver {
            return Err(PurchaseError::Validation(format!(
                "Level {} is assigned to '{}', not '{}'",
                current.level, current.approver, approver
            )));
        }

        Ok(index)
    }

    /// Approve the current level on behalf of its approver
    pub fn approve(
        &mut self,
        approver: &str,
        comments: Option<String>,
        at: NaiveDateTime,
    ) -> PurchaseResult<ApprovalProgress> {
        let index = self.current_index_for(approver)?;
        let level = &mut self.levels[index];
        level.status = ApprovalStatus::Approved;
        level.comments = comments;
        level.acted_at = Some(at);

        Ok(match self.current_level() {
            Some(next) => ApprovalProgress::Advanced {
                next_level: next.level,
            },
            None => ApprovalProgress::Approved,
        })
    }

    /// Reject the current level, halting the chain. Returns the rejected level.
    pub fn reject(
        &mut self,
        approver: &str,
        comments: Option<String>,
        at: NaiveDateTime,
    ) -> PurchaseResult<u32> {
        let index = self.current_index_for(approver)?;
        let level = &mut self.levels[index];
        level.status = ApprovalStatus::Rejected;
        level.comments = comments;
        level.acted_at = Some(at);
        Ok(level.level)
    }
}

impl PurchaseDocument {
    /// Send a draft purchase return for approval by `approvers`, in order
    pub fn submit_for_approval(
        &mut self,
        approvers: Vec<String>,
        calculator: &PurchaseCalculator,
    ) -> PurchaseResult<()> {
        self.ensure_return()?;
        self.ensure_status(&[DocumentStatus::Draft], "submit for approval")?;
        self.ensure_has_lines()?;

        let workflow = ApprovalWorkflow::new(approvers)?;
        self.recalculate(calculator)?;
        self.approval = Some(workflow);
        self.set_status(DocumentStatus::PendingApproval);
        Ok(())
    }

    /// Approve the current level; the return becomes approved after the last level
    pub fn approve(
        &mut self,
        approver: &str,
        comments: Option<String>,
    ) -> PurchaseResult<ApprovalProgress> {
        self.ensure_return()?;
        self.ensure_status(&[DocumentStatus::PendingApproval], "approve")?;

        let now = chrono::Utc::now().naive_utc();
        let progress = self.workflow_mut()?.approve(approver, comments, now)?;

        match progress {
            ApprovalProgress::Advanced { next_level } => {
                tracing::info!(
                    document = self.number.as_str(),
                    approver,
                    next_level,
                    "approval level passed"
                );
                self.updated_at = now;
            }
            ApprovalProgress::Approved => self.set_status(DocumentStatus::Approved),
        }
        Ok(progress)
    }

    /// Reject at the current level; the whole return becomes rejected
    pub fn reject(&mut self, approver: &str, comments: Option<String>) -> PurchaseResult<()> {
        self.ensure_return()?;
        self.ensure_status(&[DocumentStatus::PendingApproval], "reject")?;

        let now = chrono::Utc::now().naive_utc();
        let level = self.workflow_mut()?.reject(approver, comments, now)?;
        tracing::info!(
            document = self.number.as_str(),
            approver,
            level,
            "return rejected"
        );
        self.set_status(DocumentStatus::Rejected);
        Ok(())
    }

    /// Mark an approved return as completed
    pub fn complete(&mut self) -> PurchaseResult<()> {
        self.ensure_return()?;
        self.ensure_status(&[DocumentStatus::Approved], "complete")?;
        self.set_status(DocumentStatus::Completed);
        Ok(())
    }

    fn ensure_return(&self) -> PurchaseResult<()> {
        if self.kind.requires_approval() {
            Ok(())
        } else {
            Err(PurchaseError::Validation(format!(
                "{} documents do not use approvals",
                self.kind
            )))
        }
    }

    fn workflow_mut(&mut self) -> PurchaseResult<&mut ApprovalWorkflow> {
        self.approval.as_mut().ok_or_else(|| {
            PurchaseError::Validation("Document has no approval workflow".to_string())
        })
    }
}
