// Session is the authenticated viewer as the rest of the application sees it.
//
// Notes
// - session_id is the opaque token carried by the browser cookie or the
//   GraphQL bearer header.
// - signed_in_at is epoch milliseconds.

use crate::modules::attendance::core::record::RecordOwner;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub display_label: String,
    pub signed_in_at: i64,
}

impl Session {
    pub fn owner(&self) -> RecordOwner {
        RecordOwner {
            id: self.user_id.clone(),
            label: self.display_label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Emails compare case-insensitively and without surrounding whitespace.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_attribute_records_to_the_signed_in_user() {
        let session = Session {
            session_id: "s-1".into(),
            user_id: "user-fixed-0001".into(),
            display_label: "alice@example.com".into(),
            signed_in_at: 1,
        };
        assert_eq!(
            session.owner(),
            RecordOwner {
                id: "user-fixed-0001".into(),
                label: "alice@example.com".into(),
            }
        );
    }

    #[rstest]
    #[case(" Alice@Example.com ", "alice@example.com")]
    #[case("bob@example.com", "bob@example.com")]
    fn it_should_normalize_the_email(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Credentials::new(raw, "pw").normalized_email(), expected);
    }

    #[rstest]
    fn it_should_serialize_in_camel_case() {
        let session = Session {
            session_id: "s-1".into(),
            user_id: "u-1".into(),
            display_label: "alice@example.com".into(),
            signed_in_at: 5,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["sessionId"], "s-1");
        assert_eq!(json["displayLabel"], "alice@example.com");
    }
}
