//! Entities: atomic content islands embedded in the document.
//!
//! An entity wrapper is an element carrying the classes
//! `_Entity _EType_<type> _EId_<id>` and, when it must not be edited,
//! `_EReadonly_1` plus `contenteditable="false"`.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::dom::{Dom, NodeId};

pub const ENTITY_INFO_NAME: &str = "_Entity";
pub const ENTITY_TYPE_PREFIX: &str = "_EType_";
pub const ENTITY_ID_PREFIX: &str = "_EId_";
pub const ENTITY_READONLY_PREFIX: &str = "_EReadonly_";

/// Tag of the element standing in for a tracked entity in serialized HTML.
pub const ENTITY_PLACEHOLDER_TAG: &str = "entity-placeholder";

/// An entity as read from its wrapper element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub wrapper: NodeId,
    pub id: SmolStr,
    pub entity_type: SmolStr,
    pub is_readonly: bool,
}

/// Read the entity stored on `wrapper`, if it is an entity wrapper.
pub fn get_entity_from_element(dom: &Dom, wrapper: NodeId) -> Option<Entity> {
    let element = dom.element(wrapper)?;
    if !element.has_class(ENTITY_INFO_NAME) {
        return None;
    }

    let mut entity = Entity {
        wrapper,
        id: SmolStr::default(),
        entity_type: SmolStr::default(),
        is_readonly: element.attribute("contenteditable") == Some("false"),
    };
    for class in element.classes() {
        if let Some(t) = class.strip_prefix(ENTITY_TYPE_PREFIX) {
            entity.entity_type = SmolStr::new(t);
        } else if let Some(id) = class.strip_prefix(ENTITY_ID_PREFIX) {
            entity.id = SmolStr::new(id);
        } else if let Some(flag) = class.strip_prefix(ENTITY_READONLY_PREFIX) {
            entity.is_readonly |= flag == "1";
        }
    }

    (!entity.entity_type.is_empty()).then_some(entity)
}

/// Mark `wrapper` as an entity of the given type.
pub fn commit_entity(
    dom: &mut Dom,
    wrapper: NodeId,
    entity_type: &str,
    is_readonly: bool,
    id: &str,
) -> Entity {
    let mut classes = vec![
        ENTITY_INFO_NAME.to_string(),
        format!("{ENTITY_TYPE_PREFIX}{entity_type}"),
    ];
    if !id.is_empty() {
        classes.push(format!("{ENTITY_ID_PREFIX}{id}"));
    }
    classes.push(format!(
        "{ENTITY_READONLY_PREFIX}{}",
        if is_readonly { 1 } else { 0 }
    ));
    dom.set_attribute(wrapper, "class", classes.join(" "));

    if is_readonly {
        dom.set_attribute(wrapper, "contenteditable", "false");
    } else {
        dom.remove_attribute(wrapper, "contenteditable");
    }

    Entity {
        wrapper,
        id: SmolStr::new(id),
        entity_type: SmolStr::new(entity_type),
        is_readonly,
    }
}

/// Move `fragment` into `container`, replacing its previous children.
///
/// Before moving, every `<entity-placeholder id=…>` and every entity
/// wrapper whose id is in `entities` is swapped for the tracked live node,
/// so entity state (and node identity) survives a content replacement.
pub fn restore_content_with_entity_placeholder(
    dom: &mut Dom,
    fragment: NodeId,
    container: NodeId,
    entities: &BTreeMap<String, NodeId>,
) {
    if !entities.is_empty() {
        for node in dom.descendants(fragment) {
            if !dom.contains(fragment, node) {
                // Inside something already replaced.
                continue;
            }
            let key = if dom.tag(node) == Some(ENTITY_PLACEHOLDER_TAG) {
                dom.element_id(node).map(str::to_string)
            } else {
                get_entity_from_element(dom, node).map(|e| e.id.to_string())
            };
            let Some(&live) = key.as_ref().and_then(|k| entities.get(k)) else {
                continue;
            };
            if live != node {
                tracing::trace!(%live, "restoring tracked entity");
                dom.replace_node(node, live);
            }
        }
    }

    dom.remove_children(container);
    dom.append_child(container, fragment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_and_read_entity() {
        let mut dom = Dom::new();
        let span = dom.create_element("span");
        let committed = commit_entity(&mut dom, span, "mention", true, "m1");
        assert_eq!(
            dom.attribute(span, "class"),
            Some("_Entity _EType_mention _EId_m1 _EReadonly_1")
        );
        assert_eq!(dom.attribute(span, "contenteditable"), Some("false"));
        assert_eq!(get_entity_from_element(&dom, span), Some(committed));

        let plain = dom.create_element_with("span", &[("class", "_Entity")]);
        assert_eq!(get_entity_from_element(&dom, plain), None);
    }

    #[test]
    fn test_restore_placeholders() {
        let mut dom = Dom::new();
        let container = dom.create_element("div");
        let old = dom.parse_fragment(
            r#"<p>old <span class="_Entity _EType_chip _EId_c1 _EReadonly_1" contenteditable="false">chip</span></p>"#,
        );
        dom.append_child(container, old);
        let live = dom.query_class(container, "_Entity")[0];

        let mut entities = BTreeMap::new();
        entities.insert("c1".to_string(), live);

        let fragment = dom.parse_fragment(
            r#"<p>new <entity-placeholder id="c1"></entity-placeholder></p><p><entity-placeholder id="unknown"></entity-placeholder></p>"#,
        );
        restore_content_with_entity_placeholder(&mut dom, fragment, container, &entities);

        let first = dom.child(container, 0).unwrap();
        assert_eq!(dom.child(first, 1), Some(live));
        assert_eq!(dom.children(container).len(), 2);
        assert_eq!(dom.text_content(container), "new chip");
        assert_eq!(
            dom.inner_html(dom.child(container, 1).unwrap()),
            r#"<entity-placeholder id="unknown"></entity-placeholder>"#
        );
    }

    #[test]
    fn test_restore_tracked_wrapper() {
        let mut dom = Dom::new();
        let container = dom.create_element("div");
        let live = dom.create_element("span");
        commit_entity(&mut dom, live, "chip", true, "c2");
        let text = dom.create_text("live");
        dom.append_child(live, text);

        let mut entities = BTreeMap::new();
        entities.insert("c2".to_string(), live);

        let fragment = dom.parse_fragment(
            r#"<p><span class="_Entity _EType_chip _EId_c2 _EReadonly_1">serialized <b>copy</b></span></p>"#,
        );
        restore_content_with_entity_placeholder(&mut dom, fragment, container, &entities);
        assert_eq!(dom.text_content(container), "live");
        assert_eq!(dom.parent(live), dom.child(container, 0));
    }
}
