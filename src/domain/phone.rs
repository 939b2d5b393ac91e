use serde::Serialize;
use std::fmt;

/// A phone number owned by exactly one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phone {
    /// Store-assigned identity
    id: i64,
    /// Area code, e.g. "11"
    area_code: String,
    /// Local number
    number: String,
}

impl Phone {
    /// Create a phone from its stored values
    pub fn new(id: i64, area_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id,
            area_code: area_code.into(),
            number: number.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn area_code(&self) -> &str {
        &self.area_code
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.area_code, self.number)
    }
}
