use serde::Deserialize;

/// A package-insert record as supplied by a [`crate::loader::DocumentLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    /// Registration identifier. May hold a comma separated list, see [`Document::registration_id`].
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Raw HTML body.
    #[serde(default, alias = "raw_html", alias = "content")]
    pub html: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, html: Option<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            html,
        }
    }

    /// The identifier used in association strings.
    ///
    /// Records registered under several numbers list them comma separated; the first one wins.
    /// Returns `None` when no non-empty identifier is present.
    pub fn registration_id(&self) -> Option<&str> {
        self.id
            .split(',')
            .next()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_id_takes_first_entry() {
        let doc = Document::new(" 54321, 12345", "Aspirin", None);
        assert_eq!(doc.registration_id(), Some("54321"));
    }

    #[test]
    fn registration_id_rejects_blank() {
        assert_eq!(Document::new("", "", None).registration_id(), None);
        assert_eq!(Document::new(" ,123", "", None).registration_id(), None);
    }

    #[test]
    fn deserialises_with_null_body() {
        let doc: Document =
            serde_json::from_str(r#"{"id": "1", "title": "A", "html": null}"#).unwrap();
        assert_eq!(doc.html, None);

        let doc: Document = serde_json::from_str(r#"{"id": "2", "content": "<p/>"}"#).unwrap();
        assert_eq!(doc.title, "");
        assert_eq!(doc.html.as_deref(), Some("<p/>"));
    }
}
