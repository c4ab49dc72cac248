//! Label naming rules and per-request label value providers.

use std::fmt;
use std::sync::Arc;

use super::context::RequestContext;

/// Why a label name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LabelNameViolation {
    #[error("label names must not be empty")]
    Empty,
    #[error("label names must not start with a digit")]
    LeadingDigit,
    #[error("'{0}' is not allowed; use ASCII letters, digits and underscores")]
    InvalidCharacter(char),
    #[error("names starting with '__' are reserved for internal use")]
    Reserved,
}

/// Checks a label name against `[a-zA-Z_][a-zA-Z0-9_]*`, excluding the
/// reserved `__` prefix.
pub fn validate_label_name(name: &str) -> Result<(), LabelNameViolation> {
    let first = name.chars().next().ok_or(LabelNameViolation::Empty)?;
    if first.is_ascii_digit() {
        return Err(LabelNameViolation::LeadingDigit);
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(LabelNameViolation::InvalidCharacter(c));
    }
    if name.starts_with("__") {
        return Err(LabelNameViolation::Reserved);
    }
    Ok(())
}

/// Metric names follow the label rule but also admit colons.
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Computes a label value from the current request.
///
/// Runs on every instrumented request, so implementations should be cheap
/// and free of side effects.
pub trait LabelValueProvider: Send + Sync {
    fn evaluate(&self, request: &RequestContext<'_>) -> String;
}

impl<F> LabelValueProvider for F
where
    F: Fn(&RequestContext<'_>) -> String + Send + Sync,
{
    fn evaluate(&self, request: &RequestContext<'_>) -> String {
        self(request)
    }
}

/// Provider returning the same value for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticValue(String);

impl StaticValue {
    pub fn new(value: impl Into<String>) -> Self {
        StaticValue(value.into())
    }
}

impl LabelValueProvider for StaticValue {
    fn evaluate(&self, _request: &RequestContext<'_>) -> String {
        self.0.clone()
    }
}

/// Label name to value provider map.
///
/// Keys are unique and keep their insertion order; replacing a provider
/// keeps the label in its original position.
#[derive(Clone, Default)]
pub struct LabelProviders {
    entries: Vec<(String, Arc<dyn LabelValueProvider>)>,
}

impl LabelProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a provider, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        provider: Arc<dyn LabelValueProvider>,
    ) -> Option<Arc<dyn LabelValueProvider>> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, provider)),
            None => {
                self.entries.push((name, provider));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn LabelValueProvider>> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn LabelValueProvider>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, provider)| provider)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn LabelValueProvider>)> {
        self.entries
            .iter()
            .map(|(name, provider)| (name.as_str(), provider))
    }

    /// Evaluates every provider against `request`, in insertion order.
    pub fn evaluate<'s>(&'s self, request: &RequestContext<'_>) -> Vec<(&'s str, String)> {
        self.entries
            .iter()
            .map(|(name, provider)| (name.as_str(), provider.evaluate(request)))
            .collect()
    }
}

impl fmt::Debug for LabelProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
