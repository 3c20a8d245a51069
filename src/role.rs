//! Canonical roles and redirect destinations.
//!
//! The wire format carries two spellings of the learner role, `user`
//! and `student`. They are collapsed into [`Role::Student`] exactly
//! once, at the deserialization edge; everything past that point
//! compares canonical values only.

use serde::{Deserialize, Serialize};

/// Canonical role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Authorized for every gated area unconditionally.
    Admin,
    Mentor,
    Student,
}

impl Role {
    /// Maps a raw role string to its canonical role.
    ///
    /// `user` and `student` are semantically identical and both map to
    /// [`Role::Student`]. Unrecognized values yield `None`; the guard
    /// treats those as unroutable and falls back to the login boundary.
    pub fn canonicalize(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "mentor" => Some(Self::Mentor),
            "user" | "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// Canonical wire spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Mentor => "mentor",
            Self::Student => "student",
        }
    }

    /// Default landing area for the role.
    pub fn home(&self) -> Destination {
        match self {
            Self::Admin => Destination::AdminHome,
            Self::Mentor => Destination::MentorHome,
            Self::Student => Destination::StudentHome,
        }
    }
}

/// Navigation target of a guard redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    AdminHome,
    MentorHome,
    StudentHome,
}

impl Destination {
    /// Landing area for a denied visitor with the given canonical role.
    ///
    /// Mentors land on the mentor home, students on the student home.
    /// Anything else (including an unrecognized role) goes to login.
    pub fn fallback_for(role: Option<Role>) -> Self {
        match role {
            Some(Role::Mentor) => Self::MentorHome,
            Some(Role::Student) => Self::StudentHome,
            _ => Self::Login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_and_student_are_one_role() {
        assert_eq!(Role::canonicalize("user"), Some(Role::Student));
        assert_eq!(Role::canonicalize("student"), Some(Role::Student));
        assert_eq!(Role::canonicalize("user"), Role::canonicalize("student"));
    }

    #[test]
    fn test_admin_and_mentor_pass_through() {
        assert_eq!(Role::canonicalize("admin"), Some(Role::Admin));
        assert_eq!(Role::canonicalize("mentor"), Some(Role::Mentor));
    }

    #[test]
    fn test_unknown_role_is_none() {
        assert_eq!(Role::canonicalize("superuser"), None);
        assert_eq!(Role::canonicalize(""), None);
        assert_eq!(Role::canonicalize("Admin"), None);
    }

    #[test]
    fn test_as_str_is_canonical() {
        assert_eq!(Role::Student.as_str(), "student");
        let round_trip = Role::canonicalize(Role::Mentor.as_str());
        assert_eq!(round_trip, Some(Role::Mentor));
    }

    #[test]
    fn test_fallback_destinations() {
        assert_eq!(
            Destination::fallback_for(Some(Role::Mentor)),
            Destination::MentorHome
        );
        assert_eq!(
            Destination::fallback_for(Some(Role::Student)),
            Destination::StudentHome
        );
        assert_eq!(Destination::fallback_for(None), Destination::Login);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Mentor).unwrap();
        assert_eq!(json, "\"mentor\"");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
