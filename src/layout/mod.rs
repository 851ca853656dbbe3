//! Layout normalization: design tree in, web-oriented layout schema out.
//!
//! The output shape defined here is the contract handed to code generators
//! and cached alongside the raw document, so field names are kept short and
//! stable.

pub mod color;
pub mod normalize;
pub mod screens;

use serde::{Deserialize, Serialize};

use crate::source::{FigmaFile, NodeType};
use crate::{Result, ScreenPolicy};

pub use color::to_hex;
pub use normalize::normalize;
pub use screens::extract_screens;

/// Integer pixel box. For nodes `x`/`y` are relative to the parent's
/// absolute origin; for screens they are absolute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

/// Four-sided padding, unset sides are `null`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub t: Option<f64>,
    pub b: Option<f64>,
    pub l: Option<f64>,
    pub r: Option<f64>,
}

/// Auto-layout descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub dir: String,
    pub gap: Option<f64>,
    pub padding: Padding,
    pub align: Option<String>,
    pub cross: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: Option<String>,
    pub width: Option<f64>,
}

/// Typography attributes. Present as a whole on TEXT nodes; every key is
/// emitted, `null` when unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: Option<f64>,
    pub weight: Option<f64>,
    pub align: Option<String>,
    pub line: Option<f64>,
    pub color: Option<String>,
}

const TEXT_STYLE_KEYS: [&str; 5] = ["size", "weight", "align", "line", "color"];

/// Visual style. Serializes to a flat map containing only what the node has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StyleRepr")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

// Text keys are only meaningful as a group, so their presence (even as
// nulls) decides whether `text` comes back as `Some`.
#[derive(Deserialize)]
struct StyleRepr {
    bg: Option<String>,
    opacity: Option<f64>,
    border: Option<Border>,
    radius: Option<f64>,
    shadow: Option<bool>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl From<StyleRepr> for Style {
    fn from(repr: StyleRepr) -> Self {
        let has_text = TEXT_STYLE_KEYS.iter().any(|k| repr.rest.contains_key(*k));
        let text = if has_text {
            serde_json::from_value(serde_json::Value::Object(repr.rest)).ok()
        } else {
            None
        };
        Style {
            bg: repr.bg,
            opacity: repr.opacity,
            border: repr.border,
            radius: repr.radius,
            shadow: repr.shadow,
            text,
        }
    }
}

/// One normalized design node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    #[serde(rename = "type")]
    pub node_type: Option<NodeType>,
    pub name: Option<String>,
    #[serde(rename = "box")]
    pub bounds: PixelBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, serialize_with = "crate::json::serialize_nested")]
    pub children: Vec<NormalizedNode>,
}

impl NormalizedNode {
    /// Number of nodes in this subtree, itself included
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(n) = stack.pop() {
            total += 1;
            stack.extend(n.children.iter());
        }
        total
    }
}

/// A top-level frame and its normalized contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub screen: Option<String>,
    #[serde(rename = "box")]
    pub bounds: PixelBox,
    pub tree: Vec<NormalizedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page: Option<String>,
    pub screens: Vec<Screen>,
}

/// The artifact handed to downstream consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub pages: Vec<Page>,
}

impl LayoutDocument {
    pub fn screen_count(&self) -> usize {
        self.pages.iter().map(|p| p.screens.len()).sum()
    }

    pub fn has_screens(&self) -> bool {
        self.pages.iter().any(|p| !p.screens.is_empty())
    }

    /// All screens in page order, paired with their page name
    pub fn screens(&self) -> impl Iterator<Item = (Option<&str>, &Screen)> {
        self.pages
            .iter()
            .flat_map(|p| p.screens.iter().map(move |s| (p.page.as_deref(), s)))
    }
}

/// Assembles a `LayoutDocument` from a design file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutBuilder {
    policy: ScreenPolicy,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ScreenPolicy) -> Self {
        Self { policy }
    }

    /// Build the layout for every page, in order.
    ///
    /// Fails only when the file has no document root or page list. Pages
    /// without qualifying screens are kept with an empty screen list.
    pub fn build(&self, file: &FigmaFile) -> Result<LayoutDocument> {
        let pages = file
            .pages()?
            .iter()
            .map(|page| Page {
                page: page.name.clone(),
                screens: extract_screens(page, self.policy),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "built layout: {} pages, {} screens",
            pages.len(),
            pages.iter().map(|p| p.screens.len()).sum::<usize>()
        );
        Ok(LayoutDocument { pages })
    }
}

/// Build with the default screen policy
pub fn build(file: &FigmaFile) -> Result<LayoutDocument> {
    LayoutBuilder::new().build(file)
}

/// Round to integer pixels, ties to even
pub(crate) fn px(v: f64) -> i64 {
    v.round_ties_even() as i64
}
