use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub type Vec2 = [f64; 2];
pub type Vec3 = [f64; 3];
pub type Vec4 = [f64; 4];

/// Lottie schema version written into every document.
pub const SCHEMA_VERSION: &str = "5.7.1";

/// Layer type tag for shape layers.
pub const SHAPE_LAYER: u8 = 4;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Animation {
    pub v: String,
    pub fr: f64,
    pub ip: f64,
    pub op: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub ddd: u8,
    #[serde(default)]
    pub assets: Vec<Asset>,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Animation {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Layer {
    #[serde(default)]
    pub ddd: u8,
    pub ind: u32,
    pub ty: u8,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default = "default_stretch")]
    pub sr: f64,
    pub ks: Transform,
    #[serde(default)]
    pub ao: u8,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    pub ip: f64,
    pub op: f64,
    #[serde(default)]
    pub st: f64,
    #[serde(default)]
    pub bm: u8,
}

fn default_stretch() -> f64 {
    1.0
}

impl Layer {
    /// A 2D shape layer visible in `[ip, op)`.
    pub fn shape_layer(ind: u32, nm: impl Into<String>, ks: Transform, shapes: Vec<Shape>, ip: f64, op: f64) -> Self {
        Layer {
            ddd: 0,
            ind,
            ty: SHAPE_LAYER,
            nm: Some(nm.into()),
            sr: 1.0,
            ks,
            ao: 0,
            shapes,
            ip,
            op,
            st: 0.0,
            bm: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub w: Option<f64>,
    #[serde(default)]
    pub h: Option<f64>,
    #[serde(default)]
    pub u: Option<String>,
    #[serde(default)]
    pub p: Option<String>,
    #[serde(default)]
    pub layers: Option<Vec<Layer>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Marker {
    pub cm: String,
    pub tm: f64,
    #[serde(default)]
    pub dr: f64,
}

// Shapes

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "ty")]
pub enum Shape {
    #[serde(rename = "gr")]
    Group(GroupShape),
    #[serde(rename = "sh")]
    Path(PathShape),
    #[serde(rename = "rc")]
    Rect(RectShape),
    #[serde(rename = "el")]
    Ellipse(EllipseShape),
    #[serde(rename = "fl")]
    Fill(FillShape),
    #[serde(rename = "st")]
    Stroke(StrokeShape),
    #[serde(rename = "tr")]
    Transform(TransformShape),
}

impl Shape {
    /// The `ty` tag this item serializes with.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Shape::Group(_) => "gr",
            Shape::Path(_) => "sh",
            Shape::Rect(_) => "rc",
            Shape::Ellipse(_) => "el",
            Shape::Fill(_) => "fl",
            Shape::Stroke(_) => "st",
            Shape::Transform(_) => "tr",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroupShape {
    #[serde(default)]
    pub nm: Option<String>,
    pub it: Vec<Shape>,
}

impl GroupShape {
    /// Builds a group whose item list ends with `transform`, as players expect
    /// geometry, then styles, then exactly one transform.
    pub fn new(nm: impl Into<String>, mut items: Vec<Shape>, transform: Transform) -> Self {
        items.push(Shape::Transform(TransformShape {
            nm: Some("Transform".to_string()),
            t: transform,
        }));
        GroupShape {
            nm: Some(nm.into()),
            it: items,
        }
    }

    /// The trailing transform item, if the group is well formed.
    pub fn transform(&self) -> Option<&Transform> {
        match self.it.last() {
            Some(Shape::Transform(tr)) => Some(&tr.t),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathShape {
    #[serde(default)]
    pub nm: Option<String>,
    pub ks: Property<BezierPath>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RectShape {
    #[serde(default)]
    pub nm: Option<String>,
    pub p: Property<Vec2>,
    pub s: Property<Vec2>,
    pub r: Property<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EllipseShape {
    #[serde(default)]
    pub nm: Option<String>,
    pub p: Property<Vec2>,
    pub s: Property<Vec2>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FillShape {
    #[serde(default)]
    pub nm: Option<String>,
    pub c: Property<Vec4>,
    pub o: Property<f64>,
    #[serde(default = "default_fill_rule")]
    pub r: u8,
}

fn default_fill_rule() -> u8 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StrokeShape {
    #[serde(default)]
    pub nm: Option<String>,
    pub c: Property<Vec4>,
    pub o: Property<f64>,
    pub w: Property<f64>,
    #[serde(default)]
    pub lc: u8,
    #[serde(default)]
    pub lj: u8,
    #[serde(default)]
    pub ml: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransformShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(flatten)]
    pub t: Transform,
}

/// Layer (`ks`) and group (`tr`) transform. Groups additionally carry skew
/// and skew axis, layers omit them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transform {
    pub o: Property<f64>, // Opacity
    pub r: Property<f64>, // Rotation
    pub p: Property<Vec3>, // Position, z = 0
    pub a: Property<Vec3>, // Anchor, z = 0
    pub s: Property<Vec3>, // Scale, z = 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sk: Option<Property<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sa: Option<Property<f64>>,
}

impl Transform {
    /// Static transform with the schema's property indices.
    pub fn new(anchor: Vec2, position: Vec2, scale: Vec2, rotation: f64) -> Self {
        Transform {
            o: Property::indexed(100.0, 11),
            r: Property::indexed(rotation, 10),
            p: Property::indexed([position[0], position[1], 0.0], 2),
            a: Property::indexed([anchor[0], anchor[1], 0.0], 1),
            s: Property::indexed([scale[0], scale[1], 100.0], 6),
            sk: None,
            sa: None,
        }
    }

    /// Adds the zero skew / skew axis pair required on group transforms.
    pub fn with_zero_skew(mut self) -> Self {
        self.sk = Some(Property::indexed(0.0, 4));
        self.sa = Some(Property::indexed(0.0, 5));
        self
    }

    pub fn anchor(&self) -> Vec3 {
        self.a.k
    }

    pub fn position(&self) -> Vec3 {
        self.p.k
    }

    pub fn scale(&self) -> Vec3 {
        self.s.k
    }

    pub fn rotation(&self) -> f64 {
        self.r.k
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::new([0.0, 0.0], [0.0, 0.0], [100.0, 100.0], 0.0)
    }
}

/// A static (non-animated) property: `{ "a": 0, "k": value }`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Property<T> {
    #[serde(default)]
    pub a: u8,
    #[serde(bound(deserialize = "T: DeserializeOwned"))]
    pub k: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ix: Option<u32>,
}

impl<T> Property<T> {
    pub fn fixed(k: T) -> Self {
        Property { a: 0, k, ix: None }
    }

    pub fn indexed(k: T, ix: u32) -> Self {
        Property { a: 0, k, ix: Some(ix) }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BezierPath {
    #[serde(default)]
    pub c: bool,
    #[serde(default)]
    pub i: Vec<Vec2>,
    #[serde(default)]
    pub o: Vec<Vec2>,
    #[serde(default)]
    pub v: Vec<Vec2>,
}

impl BezierPath {
    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }
}
