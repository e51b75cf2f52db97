//! Form submission data and the form-step result type.
//!
//! The HTML rendering and field widgets live in the host framework; this
//! module only models what the providers need: the form-encoded key/value
//! payload of a submission, per-field validation errors for re-rendering,
//! and [`FormOutcome`], the tagged result of a form step. A completed
//! submission is an ordinary `RedirectTo` value, not an exception or a
//! sentinel error.

use std::collections::BTreeMap;
use std::collections::HashMap;

use url::Url;

/// Form-encoded data submitted by the payer.
///
/// Absent on the first render; present (possibly invalid) on submission.
#[derive(Debug, Clone, Default)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// A field value with surrounding whitespace stripped, `None` when the
    /// field is missing or blank.
    pub fn get_trimmed(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        FormData(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Per-field validation errors, keyed by field name.
///
/// `BTreeMap` keeps error rendering order deterministic.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Result of a form step.
///
/// `Form` carries a (re-)renderable form: either unbound on first render or
/// bound with validation errors attached. `RedirectTo` means the step is
/// complete and the caller must stop rendering and issue an HTTP redirect.
#[derive(Debug)]
pub enum FormOutcome<F> {
    /// Render (or re-render) this form to the payer.
    Form(F),
    /// Submission succeeded; send the payer to this URL.
    RedirectTo(Url),
}

impl<F> FormOutcome<F> {
    /// The redirect target, if the step completed.
    pub fn redirect_url(&self) -> Option<&Url> {
        match self {
            FormOutcome::Form(_) => None,
            FormOutcome::RedirectTo(url) => Some(url),
        }
    }
}
