//! Minimal INI reader: global keys, `[section]` headers and comments.

use std::collections::HashMap;

use log::warn;

/// Parsed key/value document. Later keys overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    global: HashMap<String, String>,
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniDocument {
    /// Parse INI text. Malformed lines are logged and skipped.
    pub fn parse(text: &str) -> Self {
        let mut document = Self::default();
        let mut current: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                let name = name.trim().to_string();
                document.sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("ignoring line {}: {}", index + 1, line);
                continue;
            };

            let table = match &current {
                Some(name) => document.sections.entry(name.clone()).or_default(),
                None => &mut document.global,
            };
            table.insert(key.trim().to_string(), value.trim().to_string());
        }

        document
    }

    /// Look up `key` in `section`, or among the global keys for `None`.
    pub fn get(&self, section: Option<&str>, key: &str) -> Option<&str> {
        let table = match section {
            Some(name) => self.sections.get(name)?,
            None => &self.global,
        };
        table.get(key).map(String::as_str)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }
}
