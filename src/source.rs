//! Serde model of a design-tool file as returned by the files API.
//!
//! Only the fields the layout pass reads are modelled. Everything is
//! optional and unknown fields are ignored, so partially populated
//! documents deserialize without complaint.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Top-level file response: a name plus the document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FigmaFile {
    pub name: Option<String>,
    pub document: Option<DocumentNode>,
}

impl FigmaFile {
    /// Parse a file from JSON text.
    ///
    /// Design trees nest well past serde_json's default recursion cap, so
    /// parsing is neither capped nor bound by the call stack.
    pub fn from_json(json: &str) -> Result<Self> {
        crate::json::from_str(json)
    }

    /// Interpret an already-decoded JSON value (e.g. a cached raw document).
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        crate::json::from_value(value)
    }

    /// The ordered page list, or `MalformedInput` when the document has none.
    pub fn pages(&self) -> Result<&[SourceNode]> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| Error::MalformedInput("missing `document` root".into()))?;
        document
            .children
            .as_deref()
            .ok_or_else(|| Error::MalformedInput("document has no page list".into()))
    }
}

/// The DOCUMENT node. Its children are the pages (CANVAS nodes).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentNode {
    pub name: Option<String>,
    pub children: Option<Vec<SourceNode>>,
}

/// Node type tag. Unrecognized tags are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text,
    Vector,
    Rectangle,
    Ellipse,
    Line,
    BooleanOperation,
    Star,
    RegularPolygon,
    Slice,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Document => "DOCUMENT",
            NodeType::Canvas => "CANVAS",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Section => "SECTION",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Text => "TEXT",
            NodeType::Vector => "VECTOR",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::Line => "LINE",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Star => "STAR",
            NodeType::RegularPolygon => "REGULAR_POLYGON",
            NodeType::Slice => "SLICE",
            NodeType::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "DOCUMENT" => NodeType::Document,
            "CANVAS" => NodeType::Canvas,
            "FRAME" => NodeType::Frame,
            "GROUP" => NodeType::Group,
            "SECTION" => NodeType::Section,
            "COMPONENT" => NodeType::Component,
            "COMPONENT_SET" => NodeType::ComponentSet,
            "INSTANCE" => NodeType::Instance,
            "TEXT" => NodeType::Text,
            "VECTOR" => NodeType::Vector,
            "RECTANGLE" => NodeType::Rectangle,
            "ELLIPSE" => NodeType::Ellipse,
            "LINE" => NodeType::Line,
            "BOOLEAN_OPERATION" => NodeType::BooleanOperation,
            "STAR" => NodeType::Star,
            "REGULAR_POLYGON" => NodeType::RegularPolygon,
            "SLICE" => NodeType::Slice,
            _ => NodeType::Other(tag),
        }
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        NodeType::from(tag.to_string())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(NodeType::from)
    }
}

/// Absolute bounding box in document space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Color with channels in 0..=1. Channels may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Color {
    pub r: Option<f64>,
    pub g: Option<f64>,
    pub b: Option<f64>,
    pub a: Option<f64>,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: Some(r),
            g: Some(g),
            b: Some(b),
            a: None,
        }
    }

    /// `{}`: no channel present at all
    pub fn is_empty(&self) -> bool {
        self.r.is_none() && self.g.is_none() && self.b.is_none() && self.a.is_none()
    }
}

/// A fill or stroke paint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: Option<String>,
    pub color: Option<Color>,
    pub opacity: Option<f64>,
}

impl Paint {
    pub fn is_solid(&self) -> bool {
        self.paint_type.as_deref() == Some("SOLID")
    }
}

/// Visual effect (shadows, blurs)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: Option<String>,
}

impl Effect {
    pub fn is_drop_shadow(&self) -> bool {
        self.effect_type.as_deref() == Some("DROP_SHADOW")
    }
}

/// Text-specific style block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub text_align_horizontal: Option<String>,
    pub line_height_px: Option<f64>,
}

/// One node of the design tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceNode {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<NodeType>,
    pub name: Option<String>,
    pub absolute_bounding_box: Option<Rect>,

    pub layout_mode: Option<String>,
    pub item_spacing: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,

    #[serde(deserialize_with = "null_as_empty")]
    pub fills: Vec<Paint>,
    #[serde(deserialize_with = "null_as_empty")]
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub corner_radius: Option<f64>,
    #[serde(deserialize_with = "null_as_empty")]
    pub effects: Vec<Effect>,

    pub style: Option<TypeStyle>,
    pub characters: Option<String>,

    #[serde(deserialize_with = "null_as_empty")]
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    /// Shorthand used by tests and fixtures
    pub fn new(node_type: impl Into<NodeType>, name: &str) -> Self {
        Self {
            node_type: Some(node_type.into()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.absolute_bounding_box = Some(Rect { x, y, width, height });
        self
    }

    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_type(&self, ty: &NodeType) -> bool {
        self.node_type.as_ref() == Some(ty)
    }

    /// Absolute box, or the zero box when the node carries none
    pub fn bounds(&self) -> Rect {
        self.absolute_bounding_box.unwrap_or_default()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
