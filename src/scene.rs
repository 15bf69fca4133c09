//! # Scene Module
//!
//! Walks one document and produces the nested Lottie group items for it.
//!
//! Every rendered node becomes a `gr` item ending in its own `tr` item, so
//! the SVG nesting and per-node transforms survive as-is. Hidden subtrees
//! and containers without any rendered content are pruned.

use crate::config::ConvertOptions;
use crate::dom::{SvgDocument, SvgElement, SvgNode};
use crate::errors::ConvertError;
use crate::path_data::ParseMode;
use crate::reference::{reference_target, resolve_reference};
use crate::shapes::convert_shape;
use crate::style::{StyleResolver, StyleValues};
use crate::transform::DecomposedTransform;
use lottie_data::model::{GroupShape, Shape};
use std::cell::Cell;
use tracing::{debug, instrument, warn};

pub struct SceneGraphBuilder<'a> {
    document: &'a SvgDocument,
    resolver: &'a dyn StyleResolver,
    options: &'a ConvertOptions,
    /// `<use>` elements expanded so far in this document.
    expansions: Cell<usize>,
}

impl<'a> SceneGraphBuilder<'a> {
    pub fn new(document: &'a SvgDocument, resolver: &'a dyn StyleResolver, options: &'a ConvertOptions) -> Self {
        Self {
            document,
            resolver,
            options,
            expansions: Cell::new(0),
        }
    }

    /// Top-level items for the document. The root element's style is
    /// inherited by its children; its transform is ignored.
    #[instrument(level = "debug", skip(self), fields(children = self.document.root.children.len()))]
    pub fn build(&self) -> Result<Vec<Shape>, ConvertError> {
        let root = &self.document.root;
        let style = self.resolver.resolve(root, &StyleValues::default())?;
        if !style.is_rendered() {
            debug!("root element is hidden");
            return Ok(Vec::new());
        }
        self.expansions.set(0);
        let mut ancestors = Vec::new();
        self.visit_children(root, &style, 0, &mut ancestors)
    }

    fn visit_children(
        &self,
        node: &SvgNode,
        style: &StyleValues,
        depth: usize,
        ancestors: &mut Vec<String>,
    ) -> Result<Vec<Shape>, ConvertError> {
        let mut items = Vec::new();
        for child in &node.children {
            items.extend(self.visit(child, style, depth, ancestors)?);
        }
        Ok(items)
    }

    /// `depth` counts the `<use>` expansions above `node`; `ancestors` holds
    /// the ids of the nodes being visited above it.
    fn visit(
        &self,
        node: &SvgNode,
        inherited: &StyleValues,
        depth: usize,
        ancestors: &mut Vec<String>,
    ) -> Result<Vec<Shape>, ConvertError> {
        let Some(id) = &node.id else {
            return self.visit_node(node, inherited, depth, ancestors);
        };
        ancestors.push(id.clone());
        let items = self.visit_node(node, inherited, depth, ancestors);
        ancestors.pop();
        items
    }

    fn visit_node(
        &self,
        node: &SvgNode,
        inherited: &StyleValues,
        depth: usize,
        ancestors: &mut Vec<String>,
    ) -> Result<Vec<Shape>, ConvertError> {
        let style = self.resolver.resolve(node, inherited)?;
        if !style.is_rendered() {
            debug!(node = node.name(), "skipping hidden node");
            return Ok(Vec::new());
        }

        match &node.element {
            SvgElement::Group => {
                let items = self.visit_children(node, &style, depth, ancestors)?;
                if items.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(vec![group(node.name(), items, &style)])
            }
            SvgElement::Symbol | SvgElement::Unsupported => {
                debug!(tag = %node.tag, "skipping element");
                Ok(Vec::new())
            }
            SvgElement::Reference { .. } => self.visit_reference(node, &style, depth, ancestors),
            SvgElement::Rect { .. }
            | SvgElement::Circle { .. }
            | SvgElement::Ellipse { .. }
            | SvgElement::Line { .. }
            | SvgElement::Polyline { .. }
            | SvgElement::Polygon { .. }
            | SvgElement::Path { .. } => {
                let mut items = convert_shape(&node.element, self.options)?;
                items.extend(style.paint_shapes());
                Ok(vec![group(node.name(), items, &style)])
            }
        }
    }

    /// `Use <id>` (the reference's transform) wrapping `Use Offset` (its x/y)
    /// wrapping the cloned target.
    ///
    /// A reference is cut when its target is one of its own ancestors, when
    /// `max_reference_depth` nested expansions are already open, or when the
    /// document has used up `max_reference_expansions`.
    fn visit_reference(
        &self,
        node: &SvgNode,
        style: &StyleValues,
        depth: usize,
        ancestors: &mut Vec<String>,
    ) -> Result<Vec<Shape>, ConvertError> {
        let depth_limit = self.options.max_reference_depth;
        if depth >= depth_limit {
            return self.cut_reference(node, ConvertError::RecursionLimit(depth_limit), "reference depth limit reached");
        }
        if let Some(target) = reference_target(node) {
            if ancestors.iter().any(|id| id == target) {
                return self.cut_reference(node, ConvertError::RecursionLimit(depth_limit), "reference cycle");
            }
        }

        let Some(resolved) = resolve_reference(self.document, node) else {
            debug!(node = node.name(), "unresolved reference");
            return Ok(Vec::new());
        };

        let budget = self.options.max_reference_expansions;
        if self.expansions.get() >= budget {
            return self.cut_reference(node, ConvertError::ExpansionLimit(budget), "reference expansion budget spent");
        }
        self.expansions.set(self.expansions.get() + 1);

        let content = self.visit(&resolved.content, style, depth + 1, ancestors)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let offset = GroupShape::new(
            "Use Offset",
            content,
            DecomposedTransform::translation(resolved.offset).to_lottie(),
        );
        Ok(vec![group(&resolved.name, vec![Shape::Group(offset)], style)])
    }

    /// Strict mode fails with `error`; lenient mode drops the reference.
    fn cut_reference(&self, node: &SvgNode, error: ConvertError, reason: &str) -> Result<Vec<Shape>, ConvertError> {
        if self.options.parse_mode() == ParseMode::Strict {
            return Err(error);
        }
        warn!(node = node.name(), %error, "{}, dropping", reason);
        Ok(Vec::new())
    }
}

fn group(name: &str, items: Vec<Shape>, style: &StyleValues) -> Shape {
    let transform = DecomposedTransform::decompose(style.transform, style.transform_origin);
    Shape::Group(GroupShape::new(name, items, transform.to_lottie()))
}
