//! Attribute application.
//!
//! Rules, checked in order for every key except `children`:
//!
//! 1. `on*` keys holding a handler register a listener for the lowercased
//!    event name.
//! 2. Aliased props (`className`, `htmlFor`) are written under the platform
//!    attribute name.
//! 3. A style map under the style key is flattened into one declaration
//!    string.
//! 4. Every scalar value is then written under its literal key. Aliased
//!    props therefore end up on the node twice, once per name.

use crate::config::RenderConfig;
use crate::host::Host;
use crate::node::{AttrValue, Attributes, CHILDREN};

/// Apply `attributes` to the display element `node`.
pub fn apply_attributes<H: Host>(
    host: &mut H,
    node: &H::Handle,
    attributes: &Attributes,
    config: &RenderConfig,
) {
    for (key, value) in attributes {
        if key == CHILDREN {
            continue;
        }

        match value {
            AttrValue::Handler(handler) => {
                if let Some(event) = event_name(key, &config.event_prefix) {
                    host.add_event_listener(node, &event, handler.clone());
                }
            }
            AttrValue::Style(style) if *key == config.style_key => {
                host.set_attribute(node, key, &style.to_css());
            }
            _ => {
                let alias = config.aliases.get(key);
                if let (Some(platform), Some(literal)) = (alias, value.as_literal()) {
                    host.set_attribute(node, platform, &literal);
                }
            }
        }

        if let Some(literal) = value.as_literal() {
            host.set_attribute(node, key, &literal);
        }
    }
}

/// `onClick` → `click`. `None` if the key lacks the prefix or names no event.
fn event_name(key: &str, prefix: &str) -> Option<String> {
    let name = key.strip_prefix(prefix)?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryDocument;
    use crate::node::{EventHandler, Style};

    fn apply(attributes: Attributes) -> (MemoryDocument, crate::host::NodeHandle) {
        let mut doc = MemoryDocument::new();
        let node = doc.create_element("div");
        apply_attributes(&mut doc, &node, &attributes, &RenderConfig::default());
        (doc, node)
    }

    #[test]
    fn handlers_become_listeners() {
        let mut attributes = Attributes::new();
        attributes.insert("onDoubleClick".into(), EventHandler::new(|_| {}).into());
        let (doc, node) = apply(attributes);

        assert_eq!(doc.listeners(&node, "doubleclick").len(), 1);
        assert_eq!(doc.attribute(node, "onDoubleClick"), None);
    }

    #[test]
    fn aliases_are_written_twice() {
        let mut attributes = Attributes::new();
        attributes.insert("className".into(), "card".into());
        attributes.insert("htmlFor".into(), "name".into());
        let (doc, node) = apply(attributes);

        assert_eq!(doc.attribute(node, "class"), Some("card"));
        assert_eq!(doc.attribute(node, "className"), Some("card"));
        assert_eq!(doc.attribute(node, "for"), Some("name"));
        assert_eq!(doc.attribute(node, "htmlFor"), Some("name"));
    }

    #[test]
    fn style_is_flattened() {
        let mut attributes = Attributes::new();
        attributes.insert(
            "style".into(),
            Style::new([("color", "red"), ("padding", "4px")]).into(),
        );
        let (doc, node) = apply(attributes);

        assert_eq!(doc.attribute(node, "style"), Some("color: red; padding: 4px"));
    }

    #[test]
    fn scalars_are_written_literally() {
        let mut attributes = Attributes::new();
        attributes.insert("id".into(), "main".into());
        attributes.insert("tabindex".into(), 2.into());
        attributes.insert("hidden".into(), true.into());
        let (doc, node) = apply(attributes);

        assert_eq!(doc.attribute(node, "id"), Some("main"));
        assert_eq!(doc.attribute(node, "tabindex"), Some("2"));
        assert_eq!(doc.attribute(node, "hidden"), Some("true"));
    }

    #[test]
    fn children_key_is_skipped() {
        let mut attributes = Attributes::new();
        attributes.insert(CHILDREN.into(), "ignored".into());
        let (doc, node) = apply(attributes);

        assert_eq!(doc.attribute(node, CHILDREN), None);
    }

    #[test]
    fn prefix_without_handler_is_plain_attribute() {
        let mut attributes = Attributes::new();
        attributes.insert("one".into(), "1".into());
        attributes.insert("on".into(), EventHandler::new(|_| {}).into());
        let (doc, node) = apply(attributes);

        assert_eq!(doc.attribute(node, "one"), Some("1"));
        assert!(doc.listeners(&node, "").is_empty());
    }
}
