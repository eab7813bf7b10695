use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// One message in a session transcript. Immutable once created.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    role: Role,
    content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: &str) -> Self {
        ChatTurn {
            role,
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_serialization() {
        let turn = ChatTurn::user("Xin chào");
        assert_eq!(
            serde_json::to_string(&turn).unwrap(),
            r#"{"role":"user","content":"Xin chào"}"#
        );
    }

    #[test]
    fn test_turn_deserialization() {
        let json = r#"{"role":"assistant","content":"Hi there"}"#;
        let turn: ChatTurn = serde_json::from_str(json).unwrap();
        assert_eq!(turn.role(), Role::Assistant);
        assert_eq!(turn.content(), "Hi there");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"role":"system","content":"nope"}"#;
        assert!(serde_json::from_str::<ChatTurn>(json).is_err());
    }
}
