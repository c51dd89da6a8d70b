use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse column type families used to decide which filter operators apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnTypeCategory {
    String,
    Number,
    Date,
    Boolean,
    Any,
}

impl ColumnTypeCategory {
    /// Classifies a vendor column type name such as `varchar(255)`,
    /// `numeric(10,2)` or `timestamp with time zone`.
    ///
    /// Matching is a substring heuristic rather than a lookup table, so type
    /// names this function has never seen fall back to `String`.
    pub fn classify(type_name: &str) -> Self {
        let normalized = normalize_type_name(type_name);

        if is_numeric_type(&normalized) {
            ColumnTypeCategory::Number
        } else if is_date_type(&normalized) {
            ColumnTypeCategory::Date
        } else if is_boolean_type(&normalized) {
            ColumnTypeCategory::Boolean
        } else {
            ColumnTypeCategory::String
        }
    }

    /// Whether an operator tagged with `self` can be offered for a column of
    /// category `column`.
    pub fn admits(&self, column: ColumnTypeCategory) -> bool {
        *self == ColumnTypeCategory::Any || *self == column
    }
}

impl fmt::Display for ColumnTypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTypeCategory::String => write!(f, "string"),
            ColumnTypeCategory::Number => write!(f, "number"),
            ColumnTypeCategory::Date => write!(f, "date"),
            ColumnTypeCategory::Boolean => write!(f, "boolean"),
            ColumnTypeCategory::Any => write!(f, "any"),
        }
    }
}

fn normalize_type_name(type_name: &str) -> String {
    type_name.trim().to_lowercase()
}

fn is_numeric_type(name: &str) -> bool {
    const FRAGMENTS: [&str; 7] = ["int", "numeric", "decimal", "real", "double", "float", "money"];
    const EXACT: [&str; 4] = ["bigint", "smallint", "tinyint", "number"];

    EXACT.contains(&name) || FRAGMENTS.iter().any(|fragment| name.contains(fragment))
}

fn is_date_type(name: &str) -> bool {
    name.contains("date") || name.contains("time")
}

fn is_boolean_type(name: &str) -> bool {
    name.contains("bool") || name == "bit" || name.starts_with("bit(")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numeric() {
        for name in ["integer", "BIGINT", "numeric(10,2)", "double precision", "money", "number"] {
            assert_eq!(ColumnTypeCategory::classify(name), ColumnTypeCategory::Number, "{name}");
        }
    }

    #[test]
    fn test_classify_date() {
        for name in ["date", "timestamp with time zone", "datetime2", "time"] {
            assert_eq!(ColumnTypeCategory::classify(name), ColumnTypeCategory::Date, "{name}");
        }
    }

    #[test]
    fn test_classify_boolean() {
        for name in ["bool", "boolean", "bit"] {
            assert_eq!(ColumnTypeCategory::classify(name), ColumnTypeCategory::Boolean, "{name}");
        }
    }

    #[test]
    fn test_classify_falls_back_to_string() {
        for name in ["varchar(255)", "text", "uuid", "jsonb", "geography", ""] {
            assert_eq!(ColumnTypeCategory::classify(name), ColumnTypeCategory::String, "{name}");
        }
    }
}
