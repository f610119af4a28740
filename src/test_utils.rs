use chrono::NaiveDate;

use crate::{
    auth::Caller,
    models::domain::{
        profile::{Branch, Profile},
        user::{User, UserRole},
    },
};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    pub fn test_user(username: &str) -> User {
        User::new(
            "Test",
            username,
            username,
            &format!("{}@example.com", username),
            "hash",
        )
    }

    /// A student in third year CSE with a roll number.
    pub fn student_with_profile(username: &str) -> (User, Profile) {
        let user = test_user(username);
        let mut profile = Profile::new(&user.id, UserRole::Student);
        profile.roll_no = Some(format!("R-{}", username));
        profile.year = Some(3);
        profile.branch = Some(Branch::Cse);
        (user, profile)
    }

    pub fn faculty_with_profile(username: &str) -> (User, Profile) {
        let user = test_user(username);
        let profile = Profile::new(&user.id, UserRole::Faculty);
        (user, profile)
    }

    pub fn caller_for(user: &User, role: UserRole) -> Caller {
        Caller {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role,
            is_admin: false,
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use crate::models::domain::user::UserRole;
    use actix_web::http::StatusCode;

    #[test]
    fn student_fixture_carries_student_fields() {
        let (user, profile) = student_with_profile("asha");
        assert_eq!(profile.user_id, user.id);
        assert_eq!(profile.role, UserRole::Student);
        assert_eq!(profile.year, Some(3));
        assert_eq!(user.email, "asha@example.com");
    }

    #[test]
    fn caller_fixture_matches_user() {
        let (user, _) = faculty_with_profile("prof");
        let caller = caller_for(&user, UserRole::Faculty);
        assert!(caller.is_faculty());
        assert_eq!(caller.username, "prof");
    }

    #[test]
    fn status_helpers_accept_matching_codes() {
        assert_error_status(StatusCode::CONFLICT);
        assert_success_status(StatusCode::CREATED);
        assert_eq!(date("2024-01-15").to_string(), "2024-01-15");
    }
}
