//! Visitor model
//!
//! Walk-in candidates registered at the reception kiosk. A visitor carries the
//! candidate classification computed at registration and an HR-driven status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// How a visitor relates to earlier records of the same person
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "candidate_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateType {
    New,
    Rejoining,
    Reapply,
}

impl CandidateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateType::New => "NEW",
            CandidateType::Rejoining => "REJOINING",
            CandidateType::Reapply => "REAPPLY",
        }
    }

    /// Classify a registration that was not blocked by an active employee.
    ///
    /// A former (offboarded) employee wins over a previously rejected visitor.
    pub fn classify(matches_offboarded_employee: bool, matches_rejected_visitor: bool) -> Self {
        if matches_offboarded_employee {
            CandidateType::Rejoining
        } else if matches_rejected_visitor {
            CandidateType::Reapply
        } else {
            CandidateType::New
        }
    }
}

/// Visitor status - maps to the `visitor_status` enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "visitor_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitorStatus {
    Pending,
    Selected,
    Rejected,
    Blocked,
}

impl VisitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorStatus::Pending => "PENDING",
            VisitorStatus::Selected => "SELECTED",
            VisitorStatus::Rejected => "REJECTED",
            VisitorStatus::Blocked => "BLOCKED",
        }
    }

    /// Allowed HR status changes.
    ///
    /// PENDING moves to any decision, REJECTED/BLOCKED can be reopened to
    /// PENDING, SELECTED is final. Re-applying the current status is allowed
    /// so remarks can be edited.
    pub fn can_transition_to(self, next: VisitorStatus) -> bool {
        use VisitorStatus::*;
        match (self, next) {
            (current, next) if current == next => true,
            (Pending, Selected | Rejected | Blocked) => true,
            (Rejected | Blocked, Pending) => true,
            _ => false,
        }
    }
}

/// Visitor row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Visitor {
    pub id: Uuid,
    pub company_id: Uuid,
    pub hr_id: Option<Uuid>,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub aadhaar_number: String,
    pub address: Option<String>,
    pub candidate_type: CandidateType,
    pub status: VisitorStatus,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for inserting a visitor; status is always PENDING
#[derive(Debug, Clone)]
pub struct NewVisitor {
    pub company_id: Uuid,
    pub hr_id: Option<Uuid>,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub aadhaar_number: String,
    pub address: Option<String>,
    pub candidate_type: CandidateType,
    pub remarks: Option<String>,
}

/// Listing filters; `None` means "any"
#[derive(Debug, Clone, Default)]
pub struct VisitorFilter {
    pub company_id: Option<Uuid>,
    pub status: Option<VisitorStatus>,
    pub candidate_type: Option<CandidateType>,
    pub hr_id: Option<Uuid>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl VisitorFilter {
    pub fn matches(&self, visitor: &Visitor) -> bool {
        self.company_id.map_or(true, |c| visitor.company_id == c)
            && self.status.map_or(true, |s| visitor.status == s)
            && self.candidate_type.map_or(true, |t| visitor.candidate_type == t)
            && self.hr_id.map_or(true, |h| visitor.hr_id == Some(h))
            && self.created_from.map_or(true, |from| visitor.created_at >= from)
            && self.created_before.map_or(true, |before| visitor.created_at < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_without_matches_is_new() {
        assert_eq!(CandidateType::classify(false, false), CandidateType::New);
    }

    #[test]
    fn test_classify_offboarded_wins_over_rejected() {
        assert_eq!(CandidateType::classify(true, false), CandidateType::Rejoining);
        assert_eq!(CandidateType::classify(true, true), CandidateType::Rejoining);
        assert_eq!(CandidateType::classify(false, true), CandidateType::Reapply);
    }

    #[test]
    fn test_status_transitions() {
        use VisitorStatus::*;
        assert!(Pending.can_transition_to(Selected));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Blocked));
        assert!(Rejected.can_transition_to(Pending));
        assert!(Blocked.can_transition_to(Pending));
        assert!(Selected.can_transition_to(Selected));
        assert!(!Selected.can_transition_to(Rejected));
        assert!(!Selected.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Selected));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(serde_json::to_string(&VisitorStatus::Pending).unwrap(), "\"PENDING\"");
        let parsed: CandidateType = serde_json::from_str("\"REJOINING\"").unwrap();
        assert_eq!(parsed, CandidateType::Rejoining);
    }
}
