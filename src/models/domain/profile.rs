use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::user::UserRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Aiml,
    Cse,
    Csd,
    Cst,
    It,
    Ece,
    Eee,
    Ce,
    Me,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stream {
    Computing,
    NonComputing,
    Unknown,
}

impl Branch {
    pub const ALL: [Branch; 9] = [
        Branch::Aiml,
        Branch::Cse,
        Branch::Csd,
        Branch::Cst,
        Branch::It,
        Branch::Ece,
        Branch::Eee,
        Branch::Ce,
        Branch::Me,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Branch::Aiml => "aiml",
            Branch::Cse => "cse",
            Branch::Csd => "csd",
            Branch::Cst => "cst",
            Branch::It => "it",
            Branch::Ece => "ece",
            Branch::Eee => "eee",
            Branch::Ce => "ce",
            Branch::Me => "me",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Branch::Aiml => "AI & ML",
            Branch::Cse => "CSE",
            Branch::Csd => "CSD",
            Branch::Cst => "CST",
            Branch::It => "IT",
            Branch::Ece => "ECE",
            Branch::Eee => "EEE",
            Branch::Ce => "Civil Engineering",
            Branch::Me => "Mechanical",
        }
    }

    pub fn stream(&self) -> Stream {
        match self {
            Branch::Aiml | Branch::Cse | Branch::Csd | Branch::Cst | Branch::It => {
                Stream::Computing
            }
            Branch::Ece | Branch::Eee | Branch::Ce | Branch::Me => Stream::NonComputing,
        }
    }

    pub fn from_code(code: &str) -> Option<Branch> {
        Branch::ALL.into_iter().find(|b| b.code() == code)
    }
}

impl Stream {
    pub fn code(&self) -> &'static str {
        match self {
            Stream::Computing => "computing",
            Stream::NonComputing => "non-computing",
            Stream::Unknown => "unknown",
        }
    }
}

/// One per user. Role-specific fields are left empty for the other role.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub user_id: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub linkedin: Option<String>,
    // student
    pub roll_no: Option<String>,
    pub year: Option<u8>,
    pub branch: Option<Branch>,
    pub codechef: Option<String>,
    pub leetcode: Option<String>,
    // faculty
    pub teacher_id: Option<String>,
    pub department: Option<String>,
    pub experience_years: Option<u32>,
    pub subjects_teaching: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(user_id: &str, role: UserRole) -> Self {
        Profile {
            user_id: user_id.to_string(),
            role,
            phone: None,
            avatar_url: None,
            linkedin: None,
            roll_no: None,
            year: None,
            branch: None,
            codechef: None,
            leetcode: None,
            teacher_id: None,
            department: None,
            experience_years: None,
            subjects_teaching: None,
            created_at: Some(Utc::now()),
        }
    }

    /// What a user gets when their profile row has gone missing.
    pub fn default_for(user_id: &str) -> Self {
        Profile::new(user_id, UserRole::Student)
    }

    pub fn stream(&self) -> Stream {
        self.branch.map(|b| b.stream()).unwrap_or(Stream::Unknown)
    }

    pub fn is_faculty(&self) -> bool {
        self.role == UserRole::Faculty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_follows_branch() {
        let mut profile = Profile::new("u-1", UserRole::Student);
        assert_eq!(profile.stream(), Stream::Unknown);

        profile.branch = Some(Branch::Cst);
        assert_eq!(profile.stream(), Stream::Computing);

        profile.branch = Some(Branch::Ce);
        assert_eq!(profile.stream(), Stream::NonComputing);
    }

    #[test]
    fn branch_codes_round_trip() {
        for branch in Branch::ALL {
            assert_eq!(Branch::from_code(branch.code()), Some(branch));
        }
        assert_eq!(Branch::from_code("law"), None);
    }

    #[test]
    fn stream_serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Stream::NonComputing).unwrap(),
            "\"non-computing\""
        );
    }

    #[test]
    fn default_profile_is_student() {
        let profile = Profile::default_for("u-9");
        assert!(!profile.is_faculty());
        assert_eq!(profile.user_id, "u-9");
    }
}
