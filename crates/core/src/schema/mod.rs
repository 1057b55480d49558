//! Record schemas and validation.
//!
//! Each record kind has a constraint table in [`constraints`], a typed
//! record in [`records`], and a collection whose name is the kind name
//! lowercased (`MenuItem` → `menuitem`).
//!
//! ```
//! use midori_core::schema::{MenuItem, Schema};
//! use serde_json::json;
//!
//! let item = MenuItem::validate(&json!({"name": "Matcha Latte", "price": 4.5, "category": "Tea"}));
//! assert!(item.is_ok());
//!
//! let err = MenuItem::validate(&json!({"name": "Matcha Latte", "price": -1})).unwrap_err();
//! assert_eq!(err.failures().len(), 2); // price out of range, category missing
//! ```

pub mod constraints;
pub mod records;
pub mod validate;

use core::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use constraints::{FieldDefault, FieldSpec, FieldType};
pub use records::{Inquiry, MenuItem, Product, User};
pub use validate::{FailureReason, FieldFailure, ValidationError};

/// The kinds of record the backend knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    MenuItem,
    Inquiry,
    User,
    Product,
}

impl RecordKind {
    /// All record kinds.
    pub const ALL: [Self; 4] = [Self::MenuItem, Self::Inquiry, Self::User, Self::Product];

    /// The kind's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MenuItem => "MenuItem",
            Self::Inquiry => "Inquiry",
            Self::User => "User",
            Self::Product => "Product",
        }
    }

    /// Collection holding records of this kind.
    #[must_use]
    pub fn collection_name(self) -> String {
        self.name().to_ascii_lowercase()
    }

    /// Constraint table for this kind.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::MenuItem => constraints::MENU_ITEM,
            Self::Inquiry => constraints::INQUIRY,
            Self::User => constraints::USER,
            Self::Product => constraints::PRODUCT,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    /// Accepts the kind name or its collection name, ignoring case and `-`/`_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.collection_name() == wanted)
            .ok_or_else(|| format!("unknown record kind: {s}"))
    }
}

/// A typed record with a constraint table.
pub trait Schema: Serialize + DeserializeOwned {
    /// Kind whose constraints apply.
    const KIND: RecordKind;

    /// Validate untyped input into a typed record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing field.
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        let normalized = validate::check(Self::KIND, input)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| ValidationError::undecodable(Self::KIND, &e))
    }

    /// Collection holding records of this kind.
    #[must_use]
    fn collection_name() -> String {
        Self::KIND.collection_name()
    }
}

/// A validated record of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    MenuItem(MenuItem),
    Inquiry(Inquiry),
    User(User),
    Product(Product),
}

impl Record {
    /// Validate untyped input as the given kind.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing field.
    pub fn validate(kind: RecordKind, input: &Value) -> Result<Self, ValidationError> {
        Ok(match kind {
            RecordKind::MenuItem => Self::MenuItem(MenuItem::validate(input)?),
            RecordKind::Inquiry => Self::Inquiry(Inquiry::validate(input)?),
            RecordKind::User => Self::User(User::validate(input)?),
            RecordKind::Product => Self::Product(Product::validate(input)?),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::MenuItem(_) => RecordKind::MenuItem,
            Self::Inquiry(_) => RecordKind::Inquiry,
            Self::User(_) => RecordKind::User,
            Self::Product(_) => RecordKind::Product,
        }
    }

    /// Collection holding this record.
    #[must_use]
    pub fn collection_name(&self) -> String {
        self.kind().collection_name()
    }
}
