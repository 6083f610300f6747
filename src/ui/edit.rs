use super::{EditState, OUTPUT, Surface, Ui, escape_attr};
use log::{error, info, warn};
use crate::types::{Record, Value};

/// Inline edit workflow: `idle -> editing(collection, id) -> idle`.
/// Starting a second edit discards the first form's state; rewriting the
/// output container is an implicit cancel.
impl<S: Surface> Ui<S> {
    /// Fetches the record and renders an edit form into the output
    /// container: one text input per non-id field, pre-populated with
    /// the stored value, plus a save button. Stays idle if the record is
    /// missing or the fetch fails.
    pub async fn start_edit(&mut self, collection: &str, id: u64) {
        self.edit = None;
        let record = match self.db.get(collection, id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("no record {} in {} to edit", id, collection);
                return;
            }
            Err(e) => {
                error!("error loading {} {} for edit: {}", collection, id, e);
                return;
            }
        };

        let fields: Vec<String> = record.fields.keys().cloned().collect();
        let mut html = format!("<h5>Editing {}</h5>", collection);
        for field in &fields {
            let value = record.display(field);
            html.push_str(&format!(
                "<input id=\"edit-{field}\" class=\"form-control mb-2\" value=\"{}\" />",
                escape_attr(&value)
            ));
            // The form field itself holds the unescaped text.
            self.surface.set_field_value(&format!("edit-{field}"), &value);
        }
        html.push_str("<button class=\"btn btn-success\" onclick=\"saveEdit()\">Save</button>");
        self.surface.set_fragment(OUTPUT, &html);

        self.edit = Some(EditState {
            collection: collection.to_string(),
            id,
            fields,
        });
    }

    /// Reads the edit form back, reattaches the primary key, coerces
    /// each numeric-parseable value to a number, and stores the full
    /// replacement record. Re-renders the collection afterwards, which
    /// returns the workflow to idle.
    pub async fn save_edit(&mut self) {
        let Some(state) = self.edit.take() else {
            warn!("save requested with no edit in progress");
            return;
        };

        let mut record = Record::new();
        record.id = Some(state.id);
        for field in &state.fields {
            let raw = self.field(&format!("edit-{field}"));
            record.set(field.clone(), Value::coerce(&raw));
        }

        match self.db.update(&state.collection, record).await {
            Ok(()) => info!("updated record {} in {}", state.id, state.collection),
            Err(e) => error!(
                "error updating {} in {}: {}",
                state.id, state.collection, e
            ),
        }
        self.show_collection(&state.collection).await;
    }

    /// Delete binding for row controls. A missing id is a logged no-op,
    /// same as the storage contract.
    pub async fn delete_record(&mut self, collection: &str, id: u64) {
        match self.db.delete(collection, id).await {
            Ok(()) => info!("deleted record {} from {}", id, collection),
            Err(e) => error!("error deleting {} from {}: {}", id, collection, e),
        }
    }
}
