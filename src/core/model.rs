use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize, ser::Error as _};
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::remote::Document;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl LinkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two collections mirrored from the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Projects,
    Links,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Projects => f.write_str("projects"),
            CollectionKind::Links => f.write_str("links"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub(super) _guard: (),
}

/// A URL filed under a project. `project_id` does not own the project; a link
/// whose project is gone is an orphan and is left out of every project view.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub title: String,
    pub url: String,
    pub project_id: ProjectId,
    pub created_at: OffsetDateTime,
    pub(super) _guard: (),
}

/// Wire shape of a project document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFields {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Wire shape of a link document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFields {
    pub title: String,
    pub url: String,
    pub project_id: ProjectId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields written when a project is renamed.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPatch<'a> {
    pub name: &'a str,
}

/// Fields written when a link is edited. The owning project never changes.
#[derive(Debug, Clone, Serialize)]
pub struct LinkPatch<'a> {
    pub title: &'a str,
    pub url: &'a str,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),
}

/// A typed record rebuilt from a remote document.
pub trait Record: Sized {
    const COLLECTION: CollectionKind;

    fn from_document(document: &Document) -> Result<Self, DecodeError>;

    /// Text the mirror is ordered by.
    fn sort_key(&self) -> &str;

    fn record_id(&self) -> &str;
}

impl Record for Project {
    const COLLECTION: CollectionKind = CollectionKind::Projects;

    fn from_document(document: &Document) -> Result<Self, DecodeError> {
        let fields: ProjectFields = serde_json::from_value(Value::Object(document.fields.clone()))?;
        if fields.name.is_empty() {
            return Err(DecodeError::EmptyField("name"));
        }
        Ok(Project {
            id: ProjectId::new(document.id.clone()),
            name: fields.name,
            created_at: fields.created_at,
            _guard: (),
        })
    }

    fn sort_key(&self) -> &str {
        &self.name
    }

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Link {
    const COLLECTION: CollectionKind = CollectionKind::Links;

    fn from_document(document: &Document) -> Result<Self, DecodeError> {
        let fields: LinkFields = serde_json::from_value(Value::Object(document.fields.clone()))?;
        if fields.title.is_empty() {
            return Err(DecodeError::EmptyField("title"));
        }
        if fields.url.is_empty() {
            return Err(DecodeError::EmptyField("url"));
        }
        if fields.project_id.as_str().is_empty() {
            return Err(DecodeError::EmptyField("projectId"));
        }
        Ok(Link {
            id: LinkId::new(document.id.clone()),
            title: fields.title,
            url: fields.url,
            project_id: fields.project_id,
            created_at: fields.created_at,
            _guard: (),
        })
    }

    fn sort_key(&self) -> &str {
        &self.title
    }

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Serialize a wire struct into the field map sent to the remote store.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(serde_json::Error::custom(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Ordering for project names and link titles.
///
/// Text is compared case-insensitively first. Strings that differ only in case
/// put the lowercase spelling first, the way an English locale collates them.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}
