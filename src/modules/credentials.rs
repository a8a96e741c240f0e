// In-memory credential list behind the "Save Password" dialog.
// Nothing here is encrypted or persisted; it lives as long as the process.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: Vec<Credential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the pair if both fields are non-empty. Duplicates are kept.
    /// Returns whether anything was stored.
    pub fn add(&mut self, identifier: impl Into<String>, secret: impl Into<String>) -> bool {
        let identifier = identifier.into();
        let secret = secret.into();
        if identifier.is_empty() || secret.is_empty() {
            return false;
        }
        self.entries.push(Credential { identifier, secret });
        true
    }

    /// Everything saved so far, oldest first.
    pub fn list_all(&self) -> &[Credential] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
