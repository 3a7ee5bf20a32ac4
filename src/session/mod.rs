//! The logged in user, kept in an encrypted cookie between requests.

mod cookie;
mod middleware;
mod token;

use serde::{Deserialize, Serialize};

use crate::UserType;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_session_cookie, set_session_cookie};
pub use middleware::{SessionState, session_guard, session_guard_hx};

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;

/// The user stored in the session: what kind of account they have and their email.
///
/// Route handlers behind the session middleware receive it with
/// `Extension(user): Extension<SessionUser>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Whether the user logged in as an employee or an admin.
    #[serde(rename = "type")]
    pub user_type: UserType,
    /// The email the user logged in with.
    pub email: String,
}

impl SessionUser {
    /// Whether the user may see the bills and attachments sent by `email`.
    pub fn can_view_bills_of(&self, email: &str) -> bool {
        self.user_type == UserType::Admin || self.email == email
    }
}

#[cfg(test)]
mod tests {
    use crate::UserType;

    use super::SessionUser;

    #[test]
    fn serializes_user_type_as_type() {
        let user = SessionUser {
            user_type: UserType::Employee,
            email: "employee@test.tld".to_owned(),
        };

        let json = serde_json::to_string(&user).unwrap();

        assert_eq!(json, r#"{"type":"Employee","email":"employee@test.tld"}"#);
    }

    #[test]
    fn employees_only_view_their_own_bills() {
        let employee = SessionUser {
            user_type: UserType::Employee,
            email: "a@test.tld".to_owned(),
        };
        let admin = SessionUser {
            user_type: UserType::Admin,
            email: "admin@test.tld".to_owned(),
        };

        assert!(employee.can_view_bills_of("a@test.tld"));
        assert!(!employee.can_view_bills_of("b@test.tld"));
        assert!(admin.can_view_bills_of("b@test.tld"));
    }
}
