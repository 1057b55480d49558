//! Declarative field constraints for each record kind.
//!
//! Every record kind is described by a static table of [`FieldSpec`]s. The
//! tables are the single source of truth for presence, type, range, length,
//! and default rules; [`super::validate`] checks them uniformly.

use core::fmt;

use serde_json::Value;

/// JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A string.
    Text,
    /// Any JSON number.
    Number,
    /// A whole number (`30` or `30.0`).
    Integer,
    /// `true` or `false`.
    Boolean,
    /// An array whose elements are all strings.
    TextList,
}

impl FieldType {
    /// Human-readable name used in failure messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "a number",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::TextList => "a list of text",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Value substituted when an optional field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Leave the field out of the record.
    Absent,
    /// Fill in a boolean.
    Bool(bool),
}

impl FieldDefault {
    /// The JSON value to insert, if any.
    #[must_use]
    pub const fn value(self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Bool(b) => Some(Value::Bool(b)),
        }
    }
}

/// Constraints on a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// JSON key.
    pub name: &'static str,
    /// Expected JSON type.
    pub ty: FieldType,
    /// Whether the field must be present and non-null.
    pub required: bool,
    /// Inclusive lower bound for numeric fields.
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric fields.
    pub max: Option<f64>,
    /// Inclusive lower bound on text length, in characters.
    pub min_len: Option<usize>,
    /// Inclusive upper bound on text length, in characters.
    pub max_len: Option<usize>,
    /// Value used when the field is absent.
    pub default: FieldDefault,
}

impl FieldSpec {
    /// A field that must be present.
    #[must_use]
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
            min: None,
            max: None,
            min_len: None,
            max_len: None,
            default: FieldDefault::Absent,
        }
    }

    /// A field that may be absent or null.
    #[must_use]
    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    #[must_use]
    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub const fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    #[must_use]
    pub const fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Make the field optional with a boolean default.
    #[must_use]
    pub const fn default_bool(mut self, value: bool) -> Self {
        self.required = false;
        self.default = FieldDefault::Bool(value);
        self
    }
}

/// Maximum length of an inquiry message, in characters.
pub const INQUIRY_MESSAGE_MAX_LEN: usize = 2000;

/// Minimum length of an inquiry message, in characters.
pub const INQUIRY_MESSAGE_MIN_LEN: usize = 5;

pub(crate) const MENU_ITEM: &[FieldSpec] = &[
    FieldSpec::required("name", FieldType::Text).min_len(1),
    FieldSpec::optional("description", FieldType::Text),
    FieldSpec::required("price", FieldType::Number).min(0.0),
    FieldSpec::required("category", FieldType::Text).min_len(1),
    FieldSpec::optional("tags", FieldType::TextList),
    FieldSpec::optional("image", FieldType::Text),
];

pub(crate) const INQUIRY: &[FieldSpec] = &[
    FieldSpec::required("name", FieldType::Text),
    FieldSpec::required("email", FieldType::Text),
    FieldSpec::required("message", FieldType::Text)
        .min_len(INQUIRY_MESSAGE_MIN_LEN)
        .max_len(INQUIRY_MESSAGE_MAX_LEN),
    FieldSpec::optional("subject", FieldType::Text),
];

pub(crate) const USER: &[FieldSpec] = &[
    FieldSpec::required("name", FieldType::Text),
    FieldSpec::required("email", FieldType::Text),
    FieldSpec::required("address", FieldType::Text),
    FieldSpec::optional("age", FieldType::Integer)
        .min(0.0)
        .max(120.0),
    FieldSpec::required("is_active", FieldType::Boolean).default_bool(true),
];

pub(crate) const PRODUCT: &[FieldSpec] = &[
    FieldSpec::required("title", FieldType::Text),
    FieldSpec::optional("description", FieldType::Text),
    FieldSpec::required("price", FieldType::Number).min(0.0),
    FieldSpec::required("category", FieldType::Text),
    FieldSpec::required("in_stock", FieldType::Boolean).default_bool(true),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_clears_required() {
        let spec = FieldSpec::optional("subject", FieldType::Text);
        assert!(!spec.required);
        assert_eq!(spec.default, FieldDefault::Absent);
    }

    #[test]
    fn test_default_bool_makes_field_optional() {
        let spec = FieldSpec::required("in_stock", FieldType::Boolean).default_bool(true);
        assert!(!spec.required);
        assert_eq!(spec.default.value(), Some(Value::Bool(true)));
    }

    #[test]
    fn test_inquiry_message_bounds() {
        let message = INQUIRY
            .iter()
            .find(|f| f.name == "message")
            .copied()
            .map(|f| (f.min_len, f.max_len));
        assert_eq!(message, Some((Some(5), Some(2000))));
    }

    #[test]
    fn test_field_names_unique_per_table() {
        for table in [MENU_ITEM, INQUIRY, USER, PRODUCT] {
            let mut names: Vec<_> = table.iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), table.len());
        }
    }
}
