//! Fixed schema for the storefront demo: three collections, two
//! non-unique secondary indexes on orders. Created idempotently on first
//! open; a database already at [`SCHEMA_VERSION`] is left untouched.

pub const SCHEMA_VERSION: u32 = 1;

pub const USERS: &str = "users";
pub const PRODUCTS: &str = "products";
pub const ORDERS: &str = "orders";

#[derive(Debug, Clone, Copy)]
pub struct CollectionDef {
    pub name: &'static str,
    /// Non-id fields, in display order.
    pub fields: &'static [&'static str],
    /// Fields carrying a non-unique secondary index.
    pub indexes: &'static [&'static str],
}

pub const COLLECTIONS: &[CollectionDef] = &[
    CollectionDef {
        name: USERS,
        fields: &["name", "email"],
        indexes: &[],
    },
    CollectionDef {
        name: PRODUCTS,
        fields: &["name", "price"],
        indexes: &[],
    },
    CollectionDef {
        name: ORDERS,
        fields: &["userId", "productId", "quantity"],
        indexes: &["userId", "productId"],
    },
];

pub fn collection(name: &str) -> Option<&'static CollectionDef> {
    COLLECTIONS.iter().find(|def| def.name == name)
}
