//! Initial mount.
//!
//! Turns a description tree into display nodes. Component nodes are pure
//! expansion steps: they are invoked with their props and the result is
//! mounted in their place, so no component survives into the display tree.

use tracing::trace;

use super::attributes::apply_attributes;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::node::{Component, NodeDescription, NodeKind};

/// Mount `description` as the last child of `container`.
///
/// An absent container is a no-op.
pub fn mount<H: Host>(
    host: &mut H,
    description: &NodeDescription,
    container: Option<&H::Handle>,
    config: &RenderConfig,
) -> Result<()> {
    let Some(container) = container else {
        trace!(identity = %description.identity(), "no container, skipping mount");
        return Ok(());
    };
    let node = materialize(host, description, config)?;
    host.append_child(container, &node);
    Ok(())
}

/// Build the display subtree for `description` without attaching it.
pub fn materialize<H: Host>(
    host: &mut H,
    description: &NodeDescription,
    config: &RenderConfig,
) -> Result<H::Handle> {
    materialize_at(host, description, config, 0)
}

fn materialize_at<H: Host>(
    host: &mut H,
    description: &NodeDescription,
    config: &RenderConfig,
    depth: usize,
) -> Result<H::Handle> {
    match description.kind() {
        NodeKind::Component(component) => {
            check_depth(component, depth, config)?;
            let expanded = component.render(&description.props());
            materialize_at(host, &expanded, config, depth + 1)
        }
        NodeKind::Text => {
            let value = description.node_value().ok_or(Error::MissingNodeValue {
                identity: description.identity(),
            })?;
            Ok(host.create_text(value))
        }
        NodeKind::Element(tag) => {
            validate_tag(tag)?;
            let node = host.create_element(tag);
            host.set_attribute(
                &node,
                &config.identity_attribute,
                &description.identity().to_string(),
            );
            apply_attributes(host, &node, description.attributes(), config);
            for child in description.children() {
                let child_node = materialize_at(host, child, config, 0)?;
                host.append_child(&node, &child_node);
            }
            Ok(node)
        }
    }
}

/// Expand every component node in place, depth-first in tree order.
///
/// The result contains only element and text nodes. Each component's
/// output keeps the identity it was constructed with.
pub fn resolve(description: NodeDescription, config: &RenderConfig) -> Result<NodeDescription> {
    resolve_at(description, config, 0)
}

fn resolve_at(
    mut description: NodeDescription,
    config: &RenderConfig,
    depth: usize,
) -> Result<NodeDescription> {
    if let NodeKind::Component(component) = description.kind() {
        check_depth(component, depth, config)?;
        let expanded = component.render(&description.props());
        return resolve_at(expanded, config, depth + 1);
    }

    let children = description
        .take_children()
        .into_iter()
        .map(|child| resolve_at(child, config, 0))
        .collect::<Result<Vec<_>>>()?;
    description.set_children(children);
    Ok(description)
}

fn check_depth(component: &Component, depth: usize, config: &RenderConfig) -> Result<()> {
    if depth >= config.max_component_depth {
        return Err(Error::ComponentDepthExceeded {
            component: component.name().to_string(),
            limit: config.max_component_depth,
        });
    }
    Ok(())
}

/// Reject tags no platform could create.
fn validate_tag(tag: &str) -> Result<()> {
    let valid = !tag.is_empty()
        && !tag
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '\'' | '/' | '='));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidTag {
            tag: tag.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryDocument;
    use crate::node::{Identity, Style};

    #[test]
    fn mounts_elements_and_text() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let tree = NodeDescription::element("div")
            .with_identity(Identity::from(1))
            .with_attr("id", "root")
            .with_child(NodeDescription::element("span").with_child("hello"))
            .with_child("world");

        mount(&mut doc, &tree, Some(&body), &RenderConfig::default()).unwrap();

        let div = doc.children(body)[0];
        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.attribute(div, "id"), Some("root"));
        assert_eq!(doc.attribute(div, "data-lattice-id"), Some("1"));
        assert_eq!(doc.children(div).len(), 2);
        assert_eq!(doc.text_content(div), "helloworld");
    }

    #[test]
    fn absent_container_is_noop() {
        let mut doc = MemoryDocument::new();
        let before = doc.node_count();

        mount(&mut doc, &NodeDescription::element("div"), None, &RenderConfig::default()).unwrap();

        assert_eq!(doc.node_count(), before);
    }

    #[test]
    fn components_expand_with_props() {
        let greeting = Component::new("Greeting", |props| {
            let name = props
                .get("name")
                .and_then(|v| v.as_text())
                .unwrap_or("nobody")
                .to_string();
            NodeDescription::element("p").with_child(format!("Hello, {name}"))
        });
        let tree = NodeDescription::element("main")
            .with_child(NodeDescription::component(&greeting).with_attr("name", "Ada"));

        let mut doc = MemoryDocument::new();
        let body = doc.body();
        mount(&mut doc, &tree, Some(&body), &RenderConfig::default()).unwrap();

        assert!(doc.to_html().starts_with("<main "));
        assert_eq!(doc.text_content(body), "Hello, Ada");
        assert!(doc.elements_by_tag("Greeting").is_empty());
    }

    #[test]
    fn invalid_tag_fails_fast() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();

        let err = mount(
            &mut doc,
            &NodeDescription::element("not a tag"),
            Some(&body),
            &RenderConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::InvalidTag { .. }));
        assert!(doc.children(body).is_empty());
    }

    #[test]
    fn text_without_value_fails() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let bare = NodeDescription::new(NodeKind::Text);

        let err = mount(&mut doc, &bare, Some(&body), &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingNodeValue { .. }));
    }

    #[test]
    fn self_expanding_component_hits_depth_limit() {
        use std::sync::{Arc, OnceLock};

        let slot: Arc<OnceLock<Component>> = Arc::new(OnceLock::new());
        let inner = slot.clone();
        let looping = Component::new("Loop", move |_| match inner.get() {
            Some(me) => NodeDescription::component(me),
            None => NodeDescription::element("div"),
        });
        let _ = slot.set(looping.clone());

        let config = RenderConfig::default().with_max_component_depth(4);
        let err = resolve(NodeDescription::component(&looping), &config).unwrap_err();
        assert!(matches!(err, Error::ComponentDepthExceeded { limit: 4, .. }));
    }

    #[test]
    fn resolve_removes_components() {
        let badge = Component::new("Badge", |_| {
            NodeDescription::element("span").with_style(Style::new([("color", "red")]))
        });
        let tree = NodeDescription::element("div")
            .with_child(NodeDescription::component(&badge))
            .with_child(NodeDescription::component(&badge));

        let resolved = resolve(tree, &RenderConfig::default()).unwrap();

        assert_eq!(resolved.children().len(), 2);
        assert!(resolved.children().iter().all(|c| c.tag() == Some("span")));
    }
}
