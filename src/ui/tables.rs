use super::{ORDERS_TABLE, OUTPUT, PRODUCTS_TABLE, Surface, USERS_TABLE, Ui, action_buttons, capitalize};
use crate::schema;
use crate::types::Value;
use log::error;

/// Render-list bindings. Every render rebuilds its container from
/// scratch off a cursor scan, appending one fragment per record.
impl<S: Surface> Ui<S> {
    pub async fn render_users(&mut self) {
        self.render_table(schema::USERS, USERS_TABLE).await;
    }

    pub async fn render_products(&mut self) {
        self.render_table(schema::PRODUCTS, PRODUCTS_TABLE).await;
    }

    /// Orders table with display names joined in: for each order, two
    /// point lookups substitute the user and product names for the raw
    /// foreign keys. A dangling or non-numeric reference falls back to
    /// the literal stored value, rendered as `ID <value>`.
    pub async fn render_orders(&mut self) {
        self.surface.set_fragment(ORDERS_TABLE, "");
        let cursor = match self.db.scan(schema::ORDERS) {
            Ok(cursor) => cursor,
            Err(e) => {
                error!("error reading {}: {}", schema::ORDERS, e);
                return;
            }
        };

        for item in cursor {
            let order = match item {
                Ok(record) => record,
                Err(e) => {
                    error!("cursor error on {}: {}", schema::ORDERS, e);
                    break;
                }
            };
            let id = order.id.unwrap_or_default();
            let user = self.reference_name(schema::USERS, order.get("userId")).await;
            let product = self
                .reference_name(schema::PRODUCTS, order.get("productId"))
                .await;

            let row = format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                user,
                product,
                order.display("quantity"),
                action_buttons(schema::ORDERS, id)
            );
            self.surface.append_fragment(ORDERS_TABLE, &row);
        }
    }

    /// Generic cursor-driven render of any collection into the output
    /// container: heading, then one JSON block per record with its
    /// edit/delete controls. Rewriting the output container cancels any
    /// edit in progress.
    pub async fn show_collection(&mut self, collection: &str) {
        self.edit = None;
        self.surface
            .set_fragment(OUTPUT, &format!("<h5>{}:</h5>", capitalize(collection)));

        let cursor = match self.db.scan(collection) {
            Ok(cursor) => cursor,
            Err(e) => {
                error!("error reading {}: {}", collection, e);
                return;
            }
        };

        for item in cursor {
            let record = match item {
                Ok(record) => record,
                Err(e) => {
                    error!("cursor error on {}: {}", collection, e);
                    break;
                }
            };
            let json = match serde_json::to_string_pretty(&record) {
                Ok(json) => json,
                Err(e) => {
                    error!("error rendering record from {}: {}", collection, e);
                    continue;
                }
            };
            let fragment = format!(
                "<div class=\"mb-3 p-2 border border-light rounded\"><pre>{}</pre>{}</div>",
                json,
                action_buttons(collection, record.id.unwrap_or_default())
            );
            self.surface.append_fragment(OUTPUT, &fragment);
        }
    }

    /// Buffered variant: the whole collection as one pretty-printed JSON
    /// block under a title.
    pub async fn dump_collection(&mut self, title: &str, collection: &str) {
        self.edit = None;
        let records = match self.db.get_all(collection).await {
            Ok(records) => records,
            Err(e) => {
                error!("error reading {}: {}", collection, e);
                return;
            }
        };
        let json = match serde_json::to_string_pretty(&records) {
            Ok(json) => json,
            Err(e) => {
                error!("error rendering {}: {}", collection, e);
                return;
            }
        };
        self.surface
            .set_fragment(OUTPUT, &format!("<h5>{}:</h5><pre>{}</pre>", title, json));
    }

    async fn render_table(&mut self, collection: &str, container: &str) {
        let Some(def) = schema::collection(collection) else {
            error!("unknown collection: {}", collection);
            return;
        };
        self.surface.set_fragment(container, "");

        let cursor = match self.db.scan(collection) {
            Ok(cursor) => cursor,
            Err(e) => {
                error!("error reading {}: {}", collection, e);
                return;
            }
        };

        for item in cursor {
            let record = match item {
                Ok(record) => record,
                Err(e) => {
                    error!("cursor error on {}: {}", collection, e);
                    break;
                }
            };
            let id = record.id.unwrap_or_default();
            let mut row = format!("<tr><td>{}</td>", id);
            for field in def.fields {
                row.push_str(&format!("<td>{}</td>", record.display(field)));
            }
            row.push_str(&format!("<td>{}</td></tr>", action_buttons(collection, id)));
            self.surface.append_fragment(container, &row);
        }
    }

    async fn reference_name(&self, collection: &str, value: Option<&Value>) -> String {
        if let Some(id) = value.and_then(Value::as_u64) {
            match self.db.get(collection, id).await {
                Ok(Some(record)) => return record.display("name"),
                Ok(None) => {}
                Err(e) => error!("error resolving {} {}: {}", collection, id, e),
            }
        }
        match value {
            Some(v) => format!("ID {}", v),
            None => "ID ?".to_string(),
        }
    }
}
