use std::collections::{BTreeMap, HashMap};

/// The document surface the binding layer talks to: form fields read by
/// fixed string ids, HTML fragments written into named containers. A
/// browser DOM satisfies this; tests and the demo binary use
/// [`MemorySurface`].
pub trait Surface {
    /// Current value of a form field, `None` if no such field exists.
    fn field_value(&self, id: &str) -> Option<String>;

    /// Sets a form field's value, as rendering an `<input value="..">`
    /// would.
    fn set_field_value(&mut self, id: &str, value: &str);

    /// Replaces a container's content with the fragment.
    fn set_fragment(&mut self, container: &str, html: &str);

    /// Appends the fragment to a container's content.
    fn append_fragment(&mut self, container: &str, html: &str);
}

/// In-memory surface: fields and containers are plain string maps.
#[derive(Debug, Default)]
pub struct MemorySurface {
    fields: HashMap<String, String>,
    containers: BTreeMap<String, String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, id: &str, value: &str) {
        self.fields.insert(id.to_string(), value.to_string());
    }

    /// Rendered content of a container, empty if nothing was written.
    pub fn container(&self, id: &str) -> &str {
        self.containers.get(id).map(String::as_str).unwrap_or("")
    }
}

impl Surface for MemorySurface {
    fn field_value(&self, id: &str) -> Option<String> {
        self.fields.get(id).cloned()
    }

    fn set_field_value(&mut self, id: &str, value: &str) {
        self.set_field(id, value);
    }

    fn set_fragment(&mut self, container: &str, html: &str) {
        self.containers.insert(container.to_string(), html.to_string());
    }

    fn append_fragment(&mut self, container: &str, html: &str) {
        self.containers
            .entry(container.to_string())
            .or_default()
            .push_str(html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_after_set() {
        let mut surface = MemorySurface::new();
        surface.set_fragment("output", "<h5>Users:</h5>");
        surface.append_fragment("output", "<tr></tr>");
        assert_eq!(surface.container("output"), "<h5>Users:</h5><tr></tr>");
    }

    #[test]
    fn test_missing_container_is_empty() {
        let surface = MemorySurface::new();
        assert_eq!(surface.container("output"), "");
    }
}
