//! Sequence configuration and builder

use crate::sequence::SyncedSequence;
use serde::{Deserialize, Serialize};
use syncseq_core::{Converter, Ownable, Result, Validator};

/// Construction-time options for a [`SyncedSequence`]
///
/// Fixed for the lifetime of the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Run the attach/detach protocol for members
    pub attach_members: bool,
    /// Name used in log events
    pub label: Option<String>,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        SequenceOptions {
            attach_members: true,
            label: None,
        }
    }
}

impl SequenceOptions {
    /// Options for plain-data members: attachment off
    pub fn detached() -> Self {
        SequenceOptions {
            attach_members: false,
            ..Self::default()
        }
    }

    /// Set the log label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Log label, or `"sequence"` when unset
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("sequence")
    }
}

/// Builder for [`SyncedSequence`]
///
/// # Example
///
/// ```
/// use syncseq_core::{Inert, Validator};
/// use syncseq_primitives::{SequenceBuilder, SyncedSequence};
///
/// let seq = SequenceBuilder::converting(|v: &Inert<u32>| u64::from(v.0))
///     .attach_members(false)
///     .label("limits")
///     .elements([Inert(1), Inert(2)])
///     .build()?;
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq.label(), "limits");
/// # Ok::<(), syncseq_core::SequenceError>(())
/// ```
pub struct SequenceBuilder<E, B = E> {
    validator: Validator<E>,
    converter: Converter<E, B>,
    options: SequenceOptions,
    elements: Vec<E>,
}

impl<E: Ownable + Clone + 'static> SequenceBuilder<E, E> {
    /// Builder with the identity converter and default options
    pub fn new() -> Self {
        Self::with_parts(Converter::identity())
    }
}

impl<E: Ownable + Clone + 'static> Default for SequenceBuilder<E, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Ownable, B> SequenceBuilder<E, B> {
    /// Builder with a custom backing conversion
    pub fn converting<F>(convert: F) -> Self
    where
        F: Fn(&E) -> B + Send + Sync + 'static,
    {
        Self::with_parts(Converter::new(convert))
    }

    fn with_parts(converter: Converter<E, B>) -> Self {
        SequenceBuilder {
            validator: Validator::Any,
            converter,
            options: SequenceOptions::default(),
            elements: Vec::new(),
        }
    }

    /// Admission rule for members
    pub fn validator(mut self, validator: Validator<E>) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the backing conversion, changing the backing item type
    pub fn converter<C, F>(self, convert: F) -> SequenceBuilder<E, C>
    where
        F: Fn(&E) -> C + Send + Sync + 'static,
    {
        SequenceBuilder {
            validator: self.validator,
            converter: Converter::new(convert),
            options: self.options,
            elements: self.elements,
        }
    }

    /// Enable or disable the attach/detach protocol
    pub fn attach_members(mut self, enabled: bool) -> Self {
        self.options.attach_members = enabled;
        self
    }

    /// Name used in log events
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    /// Replace all options at once
    pub fn options(mut self, options: SequenceOptions) -> Self {
        self.options = options;
        self
    }

    /// Initial members, appended in order at build time
    pub fn elements<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        self.elements.extend(elements);
        self
    }

    /// Build the sequence, validating and appending the initial members
    ///
    /// # Errors
    /// The first error `append` reports for an initial member.
    pub fn build(self) -> Result<SyncedSequence<E, B>> {
        let mut sequence = SyncedSequence::from_parts(self.validator, self.converter, self.options);
        sequence.extend(self.elements)?;
        Ok(sequence)
    }
}
