use std::sync::Arc;
use storefront_db::Database;
use storefront_db::ui::{
    MemorySurface, ORDER_PRODUCT_ID_FIELD, ORDER_QUANTITY_FIELD, ORDER_USER_ID_FIELD,
    ORDERS_TABLE, PRODUCT_NAME_FIELD, PRODUCT_PRICE_FIELD, PRODUCTS_TABLE, USER_EMAIL_FIELD,
    USER_NAME_FIELD, USERS_TABLE, Ui,
};

/// Scripted demo: seed one user, one product and one order through the
/// form bindings, then print the rendered tables.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let db_path = "storefront_data";
    if std::path::Path::new(db_path).exists() {
        println!("Removing old database directory for a clean run...");
        std::fs::remove_dir_all(db_path)?;
    }

    let db = Arc::new(Database::open(db_path)?);
    println!("Database opened at '{}'", db_path);

    let mut ui = Ui::new(db, MemorySurface::new());

    ui.surface_mut().set_field(USER_NAME_FIELD, "Ana");
    ui.surface_mut().set_field(USER_EMAIL_FIELD, "ana@x.com");
    ui.add_user().await;

    ui.surface_mut().set_field(PRODUCT_NAME_FIELD, "Widget");
    ui.surface_mut().set_field(PRODUCT_PRICE_FIELD, "9.99");
    ui.add_product().await;

    ui.surface_mut().set_field(ORDER_USER_ID_FIELD, "1");
    ui.surface_mut().set_field(ORDER_PRODUCT_ID_FIELD, "1");
    ui.surface_mut().set_field(ORDER_QUANTITY_FIELD, "3");
    ui.add_order().await;

    ui.render_users().await;
    ui.render_products().await;
    ui.render_orders().await;

    println!("\nUsers:\n{}", ui.surface().container(USERS_TABLE));
    println!("\nProducts:\n{}", ui.surface().container(PRODUCTS_TABLE));
    println!("\nOrders:\n{}", ui.surface().container(ORDERS_TABLE));

    Ok(())
}
