use super::{
    ORDER_PRODUCT_ID_FIELD, ORDER_QUANTITY_FIELD, ORDER_USER_ID_FIELD, PRODUCT_NAME_FIELD,
    PRODUCT_PRICE_FIELD, Surface, USER_EMAIL_FIELD, USER_NAME_FIELD, Ui,
};
use crate::schema;
use crate::types::{Record, Value};
use log::{error, info};

/// Create-from-form bindings, one per collection. Field values are read
/// as raw strings; numeric fields go through [`Value::coerce`], so
/// non-numeric input is stored verbatim rather than rejected. No
/// validation, no user-visible error: failures end up in the log.
impl<S: Surface> Ui<S> {
    pub async fn add_user(&mut self) {
        let record = Record::new()
            .with("name", self.field(USER_NAME_FIELD))
            .with("email", self.field(USER_EMAIL_FIELD));
        self.insert_logged(schema::USERS, record).await;
    }

    pub async fn add_product(&mut self) {
        let record = Record::new()
            .with("name", self.field(PRODUCT_NAME_FIELD))
            .with("price", Value::coerce(&self.field(PRODUCT_PRICE_FIELD)));
        self.insert_logged(schema::PRODUCTS, record).await;
    }

    pub async fn add_order(&mut self) {
        let record = Record::new()
            .with("userId", Value::coerce(&self.field(ORDER_USER_ID_FIELD)))
            .with(
                "productId",
                Value::coerce(&self.field(ORDER_PRODUCT_ID_FIELD)),
            )
            .with("quantity", Value::coerce(&self.field(ORDER_QUANTITY_FIELD)));
        self.insert_logged(schema::ORDERS, record).await;
    }

    async fn insert_logged(&mut self, collection: &str, record: Record) {
        match self.db.insert(collection, record).await {
            Ok(id) => info!("added record {} to {}", id, collection),
            Err(e) => error!("error adding to {}: {}", collection, e),
        }
    }
}
