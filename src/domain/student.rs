use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::phone::Phone;
use crate::errors::ModelError;

/// A student record and the phones it owns
///
/// A student without an `id` has never been persisted. Once the store
/// assigns an identity it cannot be replaced: `define_id` consumes the
/// unpersisted value and hands back the persisted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    /// Store-assigned identity, `None` until the first insert
    id: Option<i64>,
    /// Full name
    name: String,
    /// Birth date, no time component
    birth_date: NaiveDate,
    /// Owned phones, in load order
    phones: Vec<Phone>,
}

impl Student {
    /// Create a student that has not been persisted yet
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            phones: Vec::new(),
        }
    }

    /// Create a student that already exists in the store
    pub fn persisted(id: i64, name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name, birth_date)
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    /// Whether the store has assigned an identity to this student
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Assign the store-generated identity
    ///
    /// # Errors
    ///
    /// Returns `ModelError::IdAlreadyDefined` if the student already has one.
    pub fn define_id(self, id: i64) -> Result<Self, ModelError> {
        match self.id {
            Some(existing) => Err(ModelError::IdAlreadyDefined {
                existing,
                requested: id,
            }),
            None => Ok(Self {
                id: Some(id),
                ..self
            }),
        }
    }

    /// Append a phone. No deduplication.
    pub fn add_phone(&mut self, phone: Phone) {
        self.phones.push(phone);
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{} {} ({})", id, self.name, self.birth_date),
            None => write!(f, "{} ({}, unsaved)", self.name, self.birth_date),
        }
    }
}
