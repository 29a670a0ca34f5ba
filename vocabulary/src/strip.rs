//! Removal of boilerplate from the HTML body of a package insert.
//!
//! What gets removed is described by a [`RemovalRule`] list: each rule is a CSS selector and a
//! flag telling whether the selector must match. Every matching node is detached from the tree.
//! The stripped tree is kept (not flattened) so that sections can be located afterwards.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::{error::ExtractionError, Error, Result};

/// Trailing sections that do not describe the drug itself (packaging, registration, dates).
const TRAILING_SECTIONS: &[&str] = &[
    "section17",
    "section18",
    "section19",
    "section20",
    "section21",
    "Section7750",
    "Section7800",
    "Section7850",
    "Section8000",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemovalRule {
    pub selector: String,

    /// A document without a match for a required selector is rejected.
    #[serde(default)]
    pub required: bool,
}

impl RemovalRule {
    pub fn required(selector: &str) -> Self {
        Self {
            selector: selector.to_owned(),
            required: true,
        }
    }

    pub fn optional(selector: &str) -> Self {
        Self {
            selector: selector.to_owned(),
            required: false,
        }
    }

    /// Title, owner company, trailing sections and footer.
    pub fn defaults() -> Vec<Self> {
        let mut rules = vec![
            Self::required("div.MonTitle"),
            Self::required("div.ownerCompany"),
        ];
        rules.extend(
            TRAILING_SECTIONS
                .iter()
                .map(|id| Self::optional(&format!("div#{}", id))),
        );
        rules.push(Self::optional("p.footer"));
        rules
    }
}

struct CompiledRule {
    selector: Selector,
    source: String,
    required: bool,
}

pub struct HtmlSectionStripper {
    rules: Vec<CompiledRule>,
    line_break: Regex,
}

impl HtmlSectionStripper {
    /// Compile the removal policy. Invalid selectors are a configuration error.
    pub fn new(policy: &[RemovalRule]) -> Result<Self> {
        let rules = policy
            .iter()
            .map(|rule| {
                let selector = Selector::parse(&rule.selector).map_err(|e| {
                    Error::Config(format!("invalid selector {:?}: {}", rule.selector, e))
                })?;
                Ok(CompiledRule {
                    selector,
                    source: rule.selector.clone(),
                    required: rule.required,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            line_break: Regex::new(r"(?i)<br\s*/?>")?,
        })
    }

    /// Strip the given markup.
    ///
    /// Returns `Ok(None)` for a missing or blank body.
    pub fn strip(&self, raw: Option<&str>) -> Result<Option<StrippedDocument>, ExtractionError> {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(None),
        };

        let mut html = Html::parse_document(&self.line_break.replace_all(raw, " "));

        for rule in &self.rules {
            let matches = html
                .select(&rule.selector)
                .map(|element| element.id())
                .collect::<Vec<_>>();

            if matches.is_empty() && rule.required {
                return Err(ExtractionError::MissingNode {
                    selector: rule.source.clone(),
                });
            }

            for id in matches {
                if let Some(mut node) = html.tree.get_mut(id) {
                    node.detach();
                }
            }
        }

        Ok(Some(StrippedDocument { html }))
    }
}

/// HTML tree with the boilerplate removed.
pub struct StrippedDocument {
    html: Html,
}

impl StrippedDocument {
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Text of the whole document.
    pub fn text(&self) -> String {
        flatten(self.html.root_element())
    }
}

/// Text of an element and its descendants, text nodes joined by a single space.
pub fn flatten(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSERT: &str = r#"
        <html><body>
        <div class="MonTitle">Aspirin Cardio</div>
        <div class="ownerCompany">Bayer AG</div>
        <div class="paragraph" id="section3">Kopfschmerzen<br/>Fieber</div>
        <div class="paragraph" id="section18">Packungen</div>
        <div class="paragraph" id="Section8000">Stand der Information</div>
        <p class="footer">Footer</p>
        </body></html>"#;

    fn stripper() -> HtmlSectionStripper {
        HtmlSectionStripper::new(&RemovalRule::defaults()).unwrap()
    }

    #[test]
    fn removes_boilerplate_and_trailing_sections() {
        let doc = stripper().strip(Some(INSERT)).unwrap().unwrap();
        let text = doc.text();

        assert_eq!(text, "Kopfschmerzen Fieber");
    }

    #[test]
    fn line_breaks_become_spaces() {
        let raw = r#"<div class="MonTitle"></div><div class="ownerCompany"></div><p>eins<BR>zwei<br />drei</p>"#;
        let doc = stripper().strip(Some(raw)).unwrap().unwrap();
        assert_eq!(doc.text(), "eins zwei drei");
    }

    #[test]
    fn missing_required_node_is_an_error() {
        let raw = r#"<div class="MonTitle">Titel</div><p>Text</p>"#;
        assert_eq!(
            stripper().strip(Some(raw)).err(),
            Some(ExtractionError::MissingNode {
                selector: "div.ownerCompany".to_owned()
            })
        );
    }

    #[test]
    fn empty_body_yields_nothing() {
        assert!(stripper().strip(None).unwrap().is_none());
        assert!(stripper().strip(Some("  \n")).unwrap().is_none());
    }

    #[test]
    fn invalid_selector_is_a_config_error() {
        let result = HtmlSectionStripper::new(&[RemovalRule::required("div[")]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn default_policy_shape() {
        let rules = RemovalRule::defaults();
        assert_eq!(rules.len(), 2 + TRAILING_SECTIONS.len() + 1);
        assert!(rules[0].required && rules[1].required);
        assert!(rules[2..].iter().all(|r| !r.required));
    }
}
