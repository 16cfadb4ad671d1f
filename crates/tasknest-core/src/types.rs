use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Users
// =============================================================================

/// A registered account.
///
/// Serialized with the exact keys of the persisted `users.json` array:
/// `id`, `userName`, `email`, `password`. The `password` field always holds
/// a PHC-format hash, never the plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque unique identifier.
    pub id: String,
    /// Display name.
    pub user_name: String,
    /// Login email, case-sensitive as stored.
    pub email: String,
    /// Salted one-way hash of the password.
    pub password: String,
}

impl User {
    /// Build a new user with a freshly generated opaque id.
    pub fn new(user_name: String, email: String, password_hash: String) -> Self {
        Self {
            id: new_opaque_id(),
            user_name,
            email,
            password: password_hash,
        }
    }
}

/// Random 32-character lowercase hex identifier.
pub fn new_opaque_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// =============================================================================
// Todos
// =============================================================================

/// A todo item.
///
/// `title` and `checked` are always set on creation. A client may later
/// overwrite either with an explicit JSON `null`, which is stored as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: Option<String>,
    pub checked: Option<bool>,
}

impl Todo {
    /// A fresh, unchecked todo.
    pub fn new(id: u64, title: String) -> Self {
        Self {
            id,
            title: Some(title),
            checked: Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_camel_case_keys() {
        let user = User {
            id: "abc".to_string(),
            user_name: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "$argon2id$v=19$...".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["userName"], "ada");
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("user_name").is_none());
    }

    #[test]
    fn test_user_new_assigns_distinct_ids() {
        let a = User::new("a".into(), "a@x.io".into(), "h".into());
        let b = User::new("b".into(), "b@x.io".into(), "h".into());
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 32);
    }

    #[test]
    fn test_new_todo_is_unchecked() {
        let todo = Todo::new(1, "Buy milk".to_string());
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "title": "Buy milk", "checked": false}));
    }

    #[test]
    fn test_todo_null_fields_round_trip() {
        let todo: Todo = serde_json::from_str(r#"{"id":7,"title":null,"checked":null}"#).unwrap();
        assert_eq!(todo.title, None);
        assert_eq!(todo.checked, None);
        assert_eq!(
            serde_json::to_string(&todo).unwrap(),
            r#"{"id":7,"title":null,"checked":null}"#
        );
    }
}
