use serde::{Deserialize, Serialize};

/// Who is speaking in a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

/// One turn of the transcript sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        assert_eq!(ChatTurn::system("be brief").role, TurnRole::System);
        assert_eq!(ChatTurn::user("hi").role, TurnRole::User);
        assert_eq!(ChatTurn::assistant("hello").role, TurnRole::Assistant);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = ChatTurn::assistant("hello");
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "hello");
    }
}
