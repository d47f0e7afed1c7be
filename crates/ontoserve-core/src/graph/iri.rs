//! Validated class identifiers.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::NamedNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An absolute IRI identifying a class node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri(String);

impl Iri {
    /// Validate and wrap an identifier.
    pub fn parse(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        match NamedNode::new(value.as_str()) {
            Ok(_) => Ok(Self(value)),
            Err(_) => Err(IriError::Invalid(value)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.0
    }
}

/// Raised when an identifier is not an absolute IRI.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IriError {
    #[error("'{0}' is not a valid IRI")]
    Invalid(String),
}
