use std::collections::BTreeMap;

use crate::profile::ProfileField;

/// Field-scoped validation messages for one save attempt.
///
/// Recomputed wholesale on every attempt; an empty set means the save
/// may proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<ProfileField, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, keeping the first one if the field
    /// already failed.
    pub fn insert(&mut self, field: ProfileField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: ProfileField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = ProfileField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, &str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}
