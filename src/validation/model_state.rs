//! Ordered collection of validation errors keyed by field name.
//!
//! The empty key holds model-level errors that do not belong to a single
//! field.

use std::collections::BTreeMap;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Key used by `validator` for struct-level (`schema`) errors.
const SCHEMA_KEY: &str = "__all__";

/// One field and the messages recorded against it, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStateEntry {
    pub key: String,
    pub errors: Vec<String>,
}

/// Field name → ordered error messages. Keys are unique and keep the order
/// in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelState {
    entries: Vec<ModelStateEntry>,
}

impl ModelState {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an error message against `key`, appending to the key's list if
    /// it already exists.
    pub fn add_model_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        let entry = self.entry_mut(key.into());
        entry.errors.push(message);
    }

    /// Record `key` as bound without errors. Existing errors are kept.
    pub fn mark_valid(&mut self, key: impl Into<String>) {
        self.entry_mut(key.into());
    }

    /// True when no key carries an error.
    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|e| e.errors.is_empty())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ModelStateEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.errors.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten `validator` errors into a model state.
    ///
    /// Nested structs become `parent.child`, list items `parent[i].child`,
    /// and struct-level errors land on the parent path (the empty key at the
    /// top level). `validator` stores errors in a hash map, so keys are
    /// sorted to keep the output stable.
    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        let mut flat = BTreeMap::new();
        flatten_into(&mut flat, "", errors);

        let mut state = Self::new();
        for (key, messages) in flat {
            for message in messages {
                state.add_model_error(key.clone(), message);
            }
        }
        state
    }

    fn entry_mut(&mut self, key: String) -> &mut ModelStateEntry {
        let idx = match self.entries.iter().position(|e| e.key == key) {
            Some(idx) => idx,
            None => {
                self.entries.push(ModelStateEntry {
                    key,
                    errors: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }
}

impl<K, I> FromIterator<(K, I)> for ModelState
where
    K: Into<String>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut state = Self::new();
        for (key, messages) in iter {
            let key = key.into();
            state.mark_valid(key.clone());
            for message in messages {
                state.add_model_error(key.clone(), message);
            }
        }
        state
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    match (prefix.is_empty(), field == SCHEMA_KEY) {
        (_, true) => prefix.to_string(),
        (true, false) => field.to_string(),
        (false, false) => format!("{prefix}.{field}"),
    }
}

fn flatten_into(out: &mut BTreeMap<String, Vec<String>>, prefix: &str, errors: &ValidationErrors) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = out.entry(path.clone()).or_default();
                for err in field_errors {
                    let message = match &err.message {
                        Some(m) => m.to_string(),
                        None => default_message(&path),
                    };
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten_into(out, &path, nested),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    flatten_into(out, &format!("{path}[{idx}]"), nested);
                }
            }
        }
    }
}

fn default_message(path: &str) -> String {
    if path.is_empty() {
        "The submitted form is invalid.".to_string()
    } else {
        format!("The {path} field is invalid.")
    }
}
