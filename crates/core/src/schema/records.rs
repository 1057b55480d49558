//! Typed records produced by validation.
//!
//! Fields are private: the way to obtain a record from untrusted input is
//! [`Schema::validate`](super::Schema::validate). `Deserialize` exists for
//! reading documents back out of the store.

use serde::{Deserialize, Serialize};

use super::{RecordKind, Schema};

/// A café menu item. Collection: `menuitem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    price: f64,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl Schema for MenuItem {
    const KIND: RecordKind = RecordKind::MenuItem;
}

impl MenuItem {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Price in local currency.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Category such as Tea, Coffee, Pastry, Seasonal.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Tags like matcha, vegan, iced.
    #[must_use]
    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    /// Image URL.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// A contact form submission. Collection: `inquiry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    name: String,
    email: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
}

impl Schema for Inquiry {
    const KIND: RecordKind = RecordKind::Inquiry;
}

impl Inquiry {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sender email. Not format-checked.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// A user profile. Collection: `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: String,
    email: String,
    address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<u8>,
    is_active: bool,
}

impl Schema for User {
    const KIND: RecordKind = RecordKind::User;
}

impl User {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Age in years.
    #[must_use]
    pub const fn age(&self) -> Option<u8> {
        self.age
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }
}

/// A shop product. Collection: `product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    price: f64,
    category: String,
    in_stock: bool,
}

impl Schema for Product {
    const KIND: RecordKind = RecordKind::Product;
}

impl Product {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Price in dollars.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.in_stock
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_menu_item_validate() {
        let item = MenuItem::validate(&json!({
            "name": "Matcha Latte",
            "price": 4.5,
            "category": "Tea",
            "tags": ["matcha", "iced"],
        }))
        .unwrap();

        assert_eq!(item.name(), "Matcha Latte");
        assert_eq!(item.price(), 4.5);
        assert_eq!(item.category(), "Tea");
        assert_eq!(item.tags(), Some(&["matcha".to_owned(), "iced".to_owned()][..]));
        assert_eq!(item.description(), None);
        assert_eq!(item.image(), None);
    }

    #[test]
    fn test_menu_item_integer_price() {
        let item = MenuItem::validate(&json!({"name": "Espresso", "price": 3, "category": "Coffee"}))
            .unwrap();
        assert_eq!(item.price(), 3.0);
    }

    #[test]
    fn test_menu_item_rejects_negative_price() {
        let err = MenuItem::validate(&json!({"name": "Espresso", "price": -0.01, "category": "Coffee"}))
            .unwrap_err();
        assert!(err.has_failure("price"));
    }

    #[test]
    fn test_menu_item_rejects_empty_name_and_category() {
        let err = MenuItem::validate(&json!({"name": "", "price": 1, "category": ""})).unwrap_err();
        assert!(err.has_failure("name"));
        assert!(err.has_failure("category"));
    }

    #[test]
    fn test_menu_item_serializes_without_unset_optionals() {
        let item = MenuItem::validate(&json!({"name": "Sencha", "price": 3.2, "category": "Tea"}))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"name": "Sencha", "price": 3.2, "category": "Tea"})
        );
    }

    #[test]
    fn test_inquiry_short_message() {
        let err = Inquiry::validate(&json!({"name": "A", "email": "a@b.com", "message": "Hi"}))
            .unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert!(err.has_failure("message"));
    }

    #[test]
    fn test_inquiry_email_not_format_checked() {
        let inquiry = Inquiry::validate(&json!({
            "name": "A",
            "email": "not-an-email",
            "message": "Do you have oat milk?",
            "subject": "Milk",
        }))
        .unwrap();
        assert_eq!(inquiry.email(), "not-an-email");
        assert_eq!(inquiry.subject(), Some("Milk"));
    }

    #[test]
    fn test_user_defaults() {
        let user = User::validate(&json!({"name": "Aiko", "email": "aiko@example.com", "address": "Hauptstr. 1"}))
            .unwrap();
        assert!(user.is_active());
        assert_eq!(user.age(), None);
    }

    #[test]
    fn test_user_age() {
        let user = User::validate(&json!({
            "name": "Aiko",
            "email": "aiko@example.com",
            "address": "Hauptstr. 1",
            "age": 120,
            "is_active": false,
        }))
        .unwrap();
        assert_eq!(user.age(), Some(120));
        assert!(!user.is_active());
    }

    #[test]
    fn test_product_defaults() {
        let product = Product::validate(&json!({"title": "Chasen", "price": 19.9, "category": "Tools"}))
            .unwrap();
        assert!(product.in_stock());
        assert_eq!(product.title(), "Chasen");
    }
}
