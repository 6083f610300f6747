//! Presentation/binding layer: reads form fields from a [`Surface`],
//! calls the database, and renders HTML fragments back into named
//! containers. Pure glue, no invariants of its own; storage failures are
//! logged and the surface is left as it was.

mod edit;
mod forms;
mod surface;
mod tables;

pub use surface::{MemorySurface, Surface};

use crate::db::Database;
use std::sync::Arc;

// Container ids. Matching markup addresses these by the same strings.
pub const OUTPUT: &str = "output";
pub const USERS_TABLE: &str = "users-table";
pub const PRODUCTS_TABLE: &str = "products-table";
pub const ORDERS_TABLE: &str = "orders-table";

// Form field ids.
pub const USER_NAME_FIELD: &str = "user-name";
pub const USER_EMAIL_FIELD: &str = "user-email";
pub const PRODUCT_NAME_FIELD: &str = "product-name";
pub const PRODUCT_PRICE_FIELD: &str = "product-price";
pub const ORDER_USER_ID_FIELD: &str = "order-user-id";
pub const ORDER_PRODUCT_ID_FIELD: &str = "order-product-id";
pub const ORDER_QUANTITY_FIELD: &str = "order-quantity";

pub(crate) struct EditState {
    pub collection: String,
    pub id: u64,
    /// Field names the edit form rendered, in form order.
    pub fields: Vec<String>,
}

/// One page worth of UI state: the injected database handle, the surface
/// being rendered into, and the edit workflow state (`idle` when `None`).
pub struct Ui<S: Surface> {
    db: Arc<Database>,
    surface: S,
    edit: Option<EditState>,
}

impl<S: Surface> Ui<S> {
    pub fn new(db: Arc<Database>, surface: S) -> Self {
        Self {
            db,
            surface,
            edit: None,
        }
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Whether an inline edit is in progress.
    pub fn editing(&self) -> bool {
        self.edit.is_some()
    }

    pub(crate) fn field(&self, id: &str) -> String {
        self.surface.field_value(id).unwrap_or_default()
    }
}

/// Edit/delete controls embedded in every rendered row, wired to named
/// handlers by string interpolation.
pub(crate) fn action_buttons(collection: &str, id: u64) -> String {
    format!(
        "<button class=\"btn btn-sm btn-warning me-2\" onclick=\"startEdit('{collection}', {id})\">Edit</button>\
         <button class=\"btn btn-sm btn-danger\" onclick=\"deleteRecord('{collection}', {id})\">Delete</button>"
    )
}

/// Escapes a value for interpolation into an HTML attribute, so stored
/// text containing quotes or angle brackets cannot break the markup.
pub(crate) fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("users"), "Users");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape_attr("a<b&c>d"), "a&lt;b&amp;c&gt;d");
        assert_eq!(escape_attr("plain"), "plain");
    }

    #[test]
    fn test_action_buttons_reference_the_id() {
        let html = action_buttons("orders", 7);
        assert!(html.contains("startEdit('orders', 7)"));
        assert!(html.contains("deleteRecord('orders', 7)"));
    }
}
