use std::fmt;

use crate::core::error::SubmitError;

const LIST_SEPARATOR: &str = ";";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportValue {
    Scalar(String),
    List(Vec<String>),
}

impl ExportValue {
    fn serialize(&self) -> String {
        match self {
            ExportValue::Scalar(value) => value.clone(),
            ExportValue::List(values) => values.join(LIST_SEPARATOR),
        }
    }

    fn items(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            ExportValue::Scalar(value) => std::slice::from_ref(value),
            ExportValue::List(values) => values,
        };
        items.iter().map(String::as_str)
    }
}

impl From<&str> for ExportValue {
    fn from(value: &str) -> Self {
        ExportValue::Scalar(value.to_string())
    }
}

impl From<String> for ExportValue {
    fn from(value: String) -> Self {
        ExportValue::Scalar(value)
    }
}

impl From<u64> for ExportValue {
    fn from(value: u64) -> Self {
        ExportValue::Scalar(value.to_string())
    }
}

impl<S: Into<String>> From<Vec<S>> for ExportValue {
    fn from(values: Vec<S>) -> Self {
        ExportValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Variables handed to the job script through `sbatch --export`.
///
/// Keys keep insertion order and are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportMapping {
    entries: Vec<(String, ExportValue)>,
}

impl ExportMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ExportValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for ExportMapping
where
    K: Into<String>,
    V: Into<ExportValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = ExportMapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl fmt::Display for ExportMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={}", value.serialize())?;
        }
        Ok(())
    }
}

/// Serialize `exports` as `k1=v1,k2=a;b`.
///
/// Nothing is escaped, so keys may not contain `=` or `,` and values may not contain `,`.
pub fn make_exports_string(exports: &ExportMapping) -> Result<String, SubmitError> {
    for (key, value) in exports.iter() {
        if key.is_empty() || key.contains(['=', ',']) {
            return Err(SubmitError::InvalidExport {
                key: key.to_string(),
                message: "keys must be non-empty and may not contain '=' or ','".to_string(),
            });
        }
        if value.items().any(|item| item.contains(',')) {
            return Err(SubmitError::InvalidExport {
                key: key.to_string(),
                message: "values may not contain ','".to_string(),
            });
        }
    }

    Ok(exports.to_string())
}

pub fn make_job_params(input: impl Into<String>, events: u64, odir: impl Into<String>) -> ExportMapping {
    let mut params = ExportMapping::new();
    params.insert("input", ExportValue::Scalar(input.into()));
    params.insert("events", events);
    params.insert("odir", ExportValue::Scalar(odir.into()));
    params
}
