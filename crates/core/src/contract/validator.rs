//! Candidate validation and backing conversion
//!
//! A sequence is built with a [`Validator`] that every incoming value must
//! pass, and a [`Converter`] that turns a member into the item the backing
//! sequence stores.

use crate::contract::Ownable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Custom validation check
pub type CheckFn<E> = dyn Fn(&E) -> Result<(), String> + Send + Sync;

/// Accept/reject rule for sequence members
///
/// The kind-checking variant compares [`Ownable::kind`] against an allowed
/// set; the predicate variant runs arbitrary code and carries a name so it
/// can be identified again after persistence.
pub enum Validator<E> {
    /// Accept every candidate
    Any,
    /// Accept candidates whose kind is in the set
    Kinds(Vec<String>),
    /// Accept candidates the check approves
    Predicate {
        /// Name identifying the check
        name: String,
        /// The check itself
        check: Arc<CheckFn<E>>,
    },
}

impl<E> Validator<E> {
    /// Validator that accepts everything
    pub fn any() -> Self {
        Validator::Any
    }

    /// Validator accepting a single kind
    pub fn kind(kind: impl Into<String>) -> Self {
        Validator::Kinds(vec![kind.into()])
    }

    /// Validator accepting any of several kinds
    pub fn kinds<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::Kinds(kinds.into_iter().map(Into::into).collect())
    }

    /// Validator from a boolean predicate
    pub fn predicate<F>(name: impl Into<String>, check: F) -> Self
    where
        E: 'static,
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        Validator::Predicate {
            name,
            check: Arc::new(move |candidate: &E| {
                if check(candidate) {
                    Ok(())
                } else {
                    Err(format!("rejected by `{}`", label))
                }
            }),
        }
    }

    /// Validator from a check that explains its rejections
    pub fn try_predicate<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&E) -> Result<(), String> + Send + Sync + 'static,
    {
        Validator::Predicate {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Serializable description of this validator
    pub fn spec(&self) -> ValidatorSpec {
        match self {
            Validator::Any => ValidatorSpec::Any,
            Validator::Kinds(kinds) => ValidatorSpec::Kinds {
                kinds: kinds.clone(),
            },
            Validator::Predicate { name, .. } => ValidatorSpec::Predicate { name: name.clone() },
        }
    }
}

impl<E: Ownable> Validator<E> {
    /// Check a candidate, returning the rejection reason on failure
    pub fn accepts(&self, candidate: &E) -> Result<(), String> {
        match self {
            Validator::Any => Ok(()),
            Validator::Kinds(kinds) => {
                let kind = candidate.kind();
                if kinds.iter().any(|k| k == kind) {
                    Ok(())
                } else {
                    Err(format!("expected one of [{}], got {}", kinds.join(", "), kind))
                }
            }
            Validator::Predicate { check, .. } => check(candidate),
        }
    }
}

impl<E> Clone for Validator<E> {
    fn clone(&self) -> Self {
        match self {
            Validator::Any => Validator::Any,
            Validator::Kinds(kinds) => Validator::Kinds(kinds.clone()),
            Validator::Predicate { name, check } => Validator::Predicate {
                name: name.clone(),
                check: Arc::clone(check),
            },
        }
    }
}

impl<E> Default for Validator<E> {
    fn default() -> Self {
        Validator::Any
    }
}

impl<E> fmt::Debug for Validator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Any => write!(f, "Validator::Any"),
            Validator::Kinds(kinds) => f.debug_tuple("Validator::Kinds").field(kinds).finish(),
            Validator::Predicate { name, .. } => f
                .debug_struct("Validator::Predicate")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

/// Persistable description of a [`Validator`]
///
/// Predicates cannot be serialized; only their name is kept and the caller
/// supplies the check again on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidatorSpec {
    /// [`Validator::Any`]
    Any,
    /// [`Validator::Kinds`]
    Kinds {
        /// Allowed kinds
        kinds: Vec<String>,
    },
    /// [`Validator::Predicate`]
    Predicate {
        /// Predicate name
        name: String,
    },
}

/// Conversion function type
pub type ConvertFn<E, B> = dyn Fn(&E) -> B + Send + Sync;

/// Maps a member to the item stored in the backing sequence
pub struct Converter<E, B> {
    convert: Arc<ConvertFn<E, B>>,
}

impl<E, B> Converter<E, B> {
    /// Wrap a conversion function
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&E) -> B + Send + Sync + 'static,
    {
        Converter {
            convert: Arc::new(convert),
        }
    }

    /// Convert a member
    pub fn convert(&self, element: &E) -> B {
        (self.convert)(element)
    }
}

impl<E: Clone + 'static> Converter<E, E> {
    /// Store members in the backing as-is
    pub fn identity() -> Self {
        Converter::new(E::clone)
    }
}

impl<E, B> Clone for Converter<E, B> {
    fn clone(&self) -> Self {
        Converter {
            convert: Arc::clone(&self.convert),
        }
    }
}

impl<E, B> fmt::Debug for Converter<E, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").finish_non_exhaustive()
    }
}
