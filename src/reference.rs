//! `<use>` resolution.

use crate::dom::{SvgDocument, SvgElement, SvgNode};
use kurbo::Vec2;

/// A `<use>` expanded into a private copy of its target.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    /// Name of the outer synthetic group: `Use <id of the use element>`, or
    /// just `Use` when the element has no id.
    pub name: String,
    /// Id the reference points at.
    pub target: String,
    /// The reference's `x`/`y` attributes.
    pub offset: Vec2,
    /// Deep clone of the target. A symbol target comes back as a group.
    pub content: SvgNode,
}

/// The local `#id` a reference node points at, without the `#`.
pub fn reference_target(node: &SvgNode) -> Option<&str> {
    match &node.element {
        SvgElement::Reference { href, .. } => href.as_deref()?.trim().strip_prefix('#'),
        _ => None,
    }
}

/// Looks up the target of a reference node. Returns `None` when the node is
/// not a reference, its href is not a local `#id`, or nothing carries that id.
pub fn resolve_reference(document: &SvgDocument, node: &SvgNode) -> Option<ResolvedReference> {
    let SvgElement::Reference { x, y, .. } = &node.element else {
        return None;
    };
    let id = reference_target(node)?;
    let target = document.find_by_id(id)?;

    let mut content = target.clone();
    if content.element == SvgElement::Symbol {
        content.element = SvgElement::Group;
    }
    let name = match &node.id {
        Some(own_id) => format!("Use {}", own_id),
        None => "Use".to_string(),
    };
    Some(ResolvedReference {
        name,
        target: id.to_string(),
        offset: Vec2::new(*x, *y),
        content,
    })
}
