//! # DOM Module
//!
//! Owned SVG node tree handed to the converter.
//!
//! ## Responsibilities
//! - **Parsing**: XML text to [`SvgDocument`] via `roxmltree`.
//! - **Typing**: element names to the closed [`SvgElement`] variant, with
//!   geometry attributes already read as numbers.
//! - **Lookup**: id search for reference resolution.
//!
//! Presentation attributes are kept as raw strings on each node; turning them
//! into style values is the job of a [`crate::style::StyleResolver`].

use crate::errors::ConvertError;
use std::collections::BTreeMap;
use std::str::FromStr;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// The supported element kinds. Everything else is `Unsupported` and is kept
/// only so that ids inside it can still be referenced.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    Group,
    /// Rendered only through a reference.
    Symbol,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: Option<f64>,
        ry: Option<f64>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: String,
    },
    Polygon {
        points: String,
    },
    Path {
        d: String,
    },
    /// `<use>`: `href` is the raw attribute, e.g. `#star`.
    Reference {
        href: Option<String>,
        x: f64,
        y: f64,
    },
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub tag: String,
    pub id: Option<String>,
    pub element: SvgElement,
    /// Un-namespaced attributes, verbatim.
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<SvgNode>,
}

impl SvgNode {
    pub fn new(tag: impl Into<String>, element: SvgElement) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            element,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: SvgNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Id if present, tag otherwise. Used to name emitted groups.
    pub fn name(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.tag)
    }

    /// Depth-first search of this subtree, including the node itself.
    pub fn find_by_id(&self, id: &str) -> Option<&SvgNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }
}

/// One parsed source image.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    /// The `<svg>` element.
    pub root: SvgNode,
}

impl SvgDocument {
    /// Parses SVG markup. DTDs are allowed; the root element must be `<svg>`.
    pub fn parse(text: &str) -> Result<Self, ConvertError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        let root = doc.root_element();
        let tag = root.tag_name().name();
        if tag != "svg" {
            return Err(ConvertError::MissingSvgRoot(tag.to_string()));
        }
        Ok(Self { root: build_node(root) })
    }

    pub fn from_root(root: SvgNode) -> Self {
        Self { root }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SvgNode> {
        self.root.find_by_id(id)
    }

    /// Canvas size from the `viewBox`, falling back to `width`/`height`.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        if let Some(view_box) = self
            .root
            .attribute("viewBox")
            .and_then(|v| svgtypes::ViewBox::from_str(v).ok())
        {
            return Some((view_box.w, view_box.h));
        }
        let width = self.root.attribute("width").and_then(absolute_length)?;
        let height = self.root.attribute("height").and_then(absolute_length)?;
        Some((width, height))
    }
}

fn absolute_length(value: &str) -> Option<f64> {
    svgtypes::Length::from_str(value)
        .ok()
        .filter(|len| len.unit != svgtypes::LengthUnit::Percent && len.number > 0.0)
        .map(|len| len.number)
}

fn build_node(node: roxmltree::Node) -> SvgNode {
    let tag = node.tag_name().name().to_string();
    let element = element_for(&tag, node);
    let attributes = node
        .attributes()
        .filter(|attr| attr.namespace().is_none())
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect();
    let children = node
        .children()
        .filter(|child| child.is_element())
        .map(build_node)
        .collect();

    SvgNode {
        id: node.attribute("id").map(str::to_string),
        tag,
        element,
        attributes,
        children,
    }
}

fn element_for(tag: &str, node: roxmltree::Node) -> SvgElement {
    let num = |name: &str| number(node.attribute(name)).unwrap_or(0.0);
    let text = |name: &str| node.attribute(name).unwrap_or_default().to_string();

    match tag {
        "g" => SvgElement::Group,
        "symbol" => SvgElement::Symbol,
        "rect" => SvgElement::Rect {
            x: num("x"),
            y: num("y"),
            width: num("width"),
            height: num("height"),
            rx: number(node.attribute("rx")),
            ry: number(node.attribute("ry")),
        },
        "circle" => SvgElement::Circle {
            cx: num("cx"),
            cy: num("cy"),
            r: num("r"),
        },
        "ellipse" => SvgElement::Ellipse {
            cx: num("cx"),
            cy: num("cy"),
            rx: num("rx"),
            ry: num("ry"),
        },
        "line" => SvgElement::Line {
            x1: num("x1"),
            y1: num("y1"),
            x2: num("x2"),
            y2: num("y2"),
        },
        "polyline" => SvgElement::Polyline { points: text("points") },
        "polygon" => SvgElement::Polygon { points: text("points") },
        "path" => SvgElement::Path { d: text("d") },
        "use" => SvgElement::Reference {
            href: node
                .attribute("href")
                .or_else(|| node.attribute((XLINK_NS, "href")))
                .map(str::to_string),
            x: num("x"),
            y: num("y"),
        },
        _ => SvgElement::Unsupported,
    }
}

/// Reads a numeric attribute, ignoring any unit.
fn number(value: Option<&str>) -> Option<f64> {
    svgtypes::Length::from_str(value?.trim()).ok().map(|len| len.number)
}
