use serde::{Deserialize, Serialize};

/// A user as stored by the backend. `id` is assigned server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Request body for create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl From<&UserRecord> for UserDraft {
    fn from(u: &UserRecord) -> Self {
        Self {
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_backend_field_names() {
        let u: UserRecord =
            serde_json::from_str(r#"{"id":7,"name":"A","email":"a@x.com"}"#).unwrap();
        assert_eq!(
            u,
            UserRecord { id: 7, name: "A".into(), email: "a@x.com".into() }
        );
    }

    #[test]
    fn draft_serializes_without_id() {
        let body = serde_json::to_value(UserDraft::new("A", "a@x.com")).unwrap();
        assert_eq!(body, serde_json::json!({"name": "A", "email": "a@x.com"}));
    }
}
