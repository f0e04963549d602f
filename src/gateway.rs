use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dictionary::Dictionary;
use crate::error::GatewayError;

/// A single word and its definition as exchanged with clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub word: String,
    pub definition: String,
}

/// Body of an add request. Both fields are optional on the wire so that a
/// missing field is reported as an invalid request rather than a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct AddRequest {
    pub word: Option<String>,
    pub definition: Option<String>,
}

impl AddRequest {
    /// Request carrying both fields.
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        AddRequest {
            word: Some(word.into()),
            definition: Some(definition.into()),
        }
    }

    fn validate(self) -> Result<Entry, GatewayError> {
        let word = match self.word {
            Some(w) if !w.is_empty() => w,
            _ => return Err(GatewayError::InvalidRequest("missing field `word`".into())),
        };
        let definition = match self.definition {
            Some(d) if !d.is_empty() => d,
            _ => {
                return Err(GatewayError::InvalidRequest(
                    "missing field `definition`".into(),
                ));
            }
        };
        Ok(Entry { word, definition })
    }
}

/// Transport-independent CRUD surface over a [`Dictionary`].
///
/// Validation lives here; the store itself only ever sees well-formed entries.
#[derive(Clone, Debug)]
pub struct Gateway {
    dict: Dictionary,
    snapshot_path: Option<PathBuf>,
}

impl Gateway {
    /// Gateway over `dict` with persistence disabled.
    pub fn new(dict: Dictionary) -> Self {
        Gateway {
            dict,
            snapshot_path: None,
        }
    }

    /// Enable `save`/`load` against the file at `path`.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// The underlying store.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Every entry, sorted by word.
    pub fn list(&self) -> Vec<Entry> {
        self.dict
            .entries()
            .into_iter()
            .map(|(word, definition)| Entry { word, definition })
            .collect()
    }

    /// Entry for `word`, or `NotFound` when absent.
    pub fn get(&self, word: &str) -> Result<Entry, GatewayError> {
        self.dict
            .get(word)
            .map(|definition| Entry {
                word: word.to_string(),
                definition,
            })
            .ok_or_else(|| GatewayError::NotFound(word.to_string()))
    }

    /// Validate `req` and upsert it, returning the stored entry.
    pub fn add(&self, req: AddRequest) -> Result<Entry, GatewayError> {
        let entry = req.validate()?;
        debug!("add {:?}", entry.word);
        self.dict.add(entry.word.clone(), entry.definition.clone());
        Ok(entry)
    }

    /// Delete `word`; absent words are acknowledged all the same.
    pub fn remove(&self, word: &str) {
        debug!("remove {:?}", word);
        self.dict.remove(word);
    }

    /// Save to the configured snapshot path, returning the number of words written.
    pub fn save(&self) -> Result<usize, GatewayError> {
        let path = self
            .snapshot_path
            .as_ref()
            .ok_or(GatewayError::PersistenceDisabled)?;
        Ok(self.dict.save(path)?)
    }

    /// Reload from the configured snapshot path, returning the number of words loaded.
    pub fn load(&self) -> Result<usize, GatewayError> {
        let path = self
            .snapshot_path
            .as_ref()
            .ok_or(GatewayError::PersistenceDisabled)?;
        Ok(self.dict.load(path)?)
    }
}
