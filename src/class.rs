use serde::{Deserialize, Serialize};

/// A roster entry. `weight` is the number of percentage points deducted from
/// the class's remaining attendance for every recorded absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub code: String,
    pub name: String,
    pub weight: f64,
}

impl Class {
    /// Build a roster entry, normalizing the code to upper case.
    pub fn new(code: impl AsRef<str>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            code: normalize_code(code.as_ref()),
            name: name.into(),
            weight,
        }
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
