use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PaginateError, Result};
use crate::host::StringRequest;

const BUILTIN_EN: &[(&str, &str, &str)] = &[
    ("moodle", "previous", "Previous page"),
    ("moodle", "next", "Next page"),
    ("block_quizonepagepaginate", "pluginname", "One Page Paginate"),
    (
        "block_quizonepagepaginate",
        "config_questionsperpage",
        "Show this many questions at a time",
    ),
];

/// Localised strings keyed by component, then key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    components: BTreeMap<String, BTreeMap<String, String>>,
}

impl StringTable {
    pub fn english() -> Self {
        let mut table = Self::default();
        for (component, key, text) in BUILTIN_EN {
            table.insert(component, key, text);
        }
        table
    }

    /// English strings with the entries of a YAML language file laid on top.
    ///
    /// ```yaml
    /// moodle:
    ///   previous: Zurück
    ///   next: Weiter
    /// ```
    pub fn load_overrides(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let overrides: StringTable = serde_yaml::from_str(&content)?;
        let mut table = Self::english();
        table.merge(overrides);
        Ok(table)
    }

    pub fn insert(&mut self, component: &str, key: &str, text: &str) {
        self.components
            .entry(component.to_string())
            .or_default()
            .insert(key.to_string(), text.to_string());
    }

    pub fn merge(&mut self, other: StringTable) {
        for (component, strings) in other.components {
            self.components.entry(component).or_default().extend(strings);
        }
    }

    pub fn get(&self, component: &str, key: &str) -> Option<&str> {
        self.components
            .get(component)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
    }

    /// Look up every request, in order. Fails on the first unknown string.
    pub fn resolve(&self, requests: &[StringRequest]) -> Result<Vec<String>> {
        requests
            .iter()
            .map(|r| {
                self.get(&r.component, &r.key)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        PaginateError::Strings(format!("unknown string {}/{}", r.component, r.key))
                    })
            })
            .collect()
    }
}

/// Moodle's stand-in for a string it could not find.
pub fn missing_string_marker(request: &StringRequest) -> String {
    format!("[[{},{}]]", request.key, request.component)
}

/// Match what a string service answered against `requests`: one text per
/// request, in order, and none of them a missing-string marker.
pub fn checked_answers(
    requests: &[StringRequest],
    answers: Vec<Option<String>>,
) -> Result<Vec<String>> {
    if answers.len() != requests.len() {
        return Err(PaginateError::Strings(format!(
            "asked for {} strings, got {}",
            requests.len(),
            answers.len()
        )));
    }
    requests
        .iter()
        .zip(answers)
        .map(|(request, answer)| match answer {
            Some(text) if text != missing_string_marker(request) => Ok(text),
            _ => Err(PaginateError::Strings(format!(
                "no string {}/{}",
                request.component, request.key
            ))),
        })
        .collect()
}
