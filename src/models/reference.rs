//! Reference data used to scope overtime policies.

use serde::{Deserialize, Serialize};

/// A `{code, name}` pair selected from a reference list (subsidiary, location, category).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub code: String,
    pub name: String,
}

impl Reference {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Label shown in combo boxes and tables.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Lookup lists the policy form selects from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub subsidiaries: Vec<Reference>,
    #[serde(default)]
    pub locations: Vec<Reference>,
    #[serde(default)]
    pub employee_categories: Vec<Reference>,
}

impl ReferenceData {
    /// Resolve an employee category code to its display name, falling back to the code.
    pub fn category_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.employee_categories
            .iter()
            .find(|r| r.code == code)
            .map(|r| r.name.as_str())
            .unwrap_or(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceData {
        ReferenceData {
            subsidiaries: vec![Reference::new("SUB001", "Subsidiary One")],
            locations: vec![Reference::new("LOC001", "Bangalore")],
            employee_categories: vec![Reference::new("WKM", "Workman")],
        }
    }

    #[test]
    fn test_category_name_falls_back_to_code() {
        let data = sample();
        assert_eq!(data.category_name("WKM"), "Workman");
        assert_eq!(data.category_name("STF"), "STF");
    }

    #[test]
    fn test_label() {
        assert_eq!(Reference::new("LOC001", "Bangalore").label(), "LOC001 - Bangalore");
    }
}
