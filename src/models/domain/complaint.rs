use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Pending,
    Viewed,
    Solved,
}

impl ComplaintStatus {
    /// Transitions the receiving faculty may make through a regular status update.
    pub fn can_advance_to(&self, next: ComplaintStatus) -> bool {
        matches!(
            (self, next),
            (ComplaintStatus::Pending, ComplaintStatus::Viewed)
                | (ComplaintStatus::Pending, ComplaintStatus::Solved)
                | (ComplaintStatus::Viewed, ComplaintStatus::Solved)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Complaint {
    pub id: String,
    pub student_id: String,
    pub teacher_id: String,
    pub heading: String,
    pub description: String,
    pub complaint_type: String,
    pub urgency: Urgency,
    pub status: ComplaintStatus,
    /// Reason recorded when a decision is amended.
    pub amendment_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    pub fn new(
        student_id: &str,
        teacher_id: &str,
        heading: &str,
        description: &str,
        complaint_type: &str,
        urgency: Urgency,
    ) -> Self {
        let now = Utc::now();
        Complaint {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            teacher_id: teacher_id.to_string(),
            heading: heading.to_string(),
            description: description.to_string(),
            complaint_type: complaint_type.to_string(),
            urgency,
            status: ComplaintStatus::Pending,
            amendment_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ComplaintStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complaint_starts_pending() {
        let c = Complaint::new("s-1", "f-1", "Broken projector", "Room 204", "infrastructure", Urgency::High);
        assert!(c.is_pending());
    }

    #[test]
    fn forward_transitions_only() {
        use ComplaintStatus::*;
        assert!(Pending.can_advance_to(Viewed));
        assert!(Pending.can_advance_to(Solved));
        assert!(Viewed.can_advance_to(Solved));
        assert!(!Solved.can_advance_to(Viewed));
        assert!(!Viewed.can_advance_to(Pending));
        assert!(!Pending.can_advance_to(Pending));
    }
}
