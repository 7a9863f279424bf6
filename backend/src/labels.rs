//! Index → label mapping for the model's output vector.

use std::collections::HashSet;

use crate::error::ConfigError;

pub const DEFAULT_CLASS_LABELS: [&str; 3] = ["Early_blight", "Late_blight", "healthy"];

/// Ordered class labels. Position `i` names score `i` of a prediction vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    labels: Vec<String>,
}

impl ClassLabels {
    /// Builds the mapping, rejecting empty sets, blank and duplicated labels.
    pub fn new<I, S>(labels: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(ConfigError::EmptyLabels);
        }

        let mut seen = HashSet::new();
        for (index, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(ConfigError::BlankLabel(index));
            }
            if !seen.insert(label.as_str()) {
                return Err(ConfigError::DuplicateLabel(label.clone()));
            }
        }

        Ok(Self { labels })
    }

    /// Parses a comma separated list such as `Early_blight,Late_blight,healthy`.
    pub fn parse(list: &str) -> Result<Self, ConfigError> {
        Self::new(list.split(',').map(str::trim))
    }

    /// Checks the mapping against the number of scores the model emits.
    pub fn validate_width(&self, outputs: usize) -> Result<(), ConfigError> {
        if self.labels.len() != outputs {
            return Err(ConfigError::WidthMismatch {
                labels: self.labels.len(),
                outputs,
            });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        Self {
            labels: DEFAULT_CLASS_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
