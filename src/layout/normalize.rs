//! Converts design nodes into normalized layout nodes.
//!
//! The walk keeps its own stack of partially built nodes instead of
//! recursing, so arbitrarily deep documents cannot exhaust the call stack.

use super::color::to_hex;
use super::{px, Border, Layout, NormalizedNode, Padding, PixelBox, Style, TextStyle};
use crate::source::{NodeType, SourceNode};

/// A node whose children are still being visited
struct Pending<'a> {
    source: &'a SourceNode,
    out: NormalizedNode,
    next_child: usize,
}

/// Normalize `node` and its subtree. `parent_x`/`parent_y` is the absolute
/// origin of the containing node; every level below uses its own parent's
/// absolute origin.
pub fn normalize(node: &SourceNode, parent_x: f64, parent_y: f64) -> NormalizedNode {
    let mut current = Pending {
        source: node,
        out: shallow(node, parent_x, parent_y),
        next_child: 0,
    };
    // ancestors of `current`, innermost last
    let mut ancestors: Vec<Pending> = Vec::new();

    loop {
        let source = current.source;
        if let Some(child) = source.children.get(current.next_child) {
            current.next_child += 1;
            let origin = source.bounds();
            let child = Pending {
                source: child,
                out: shallow(child, origin.x, origin.y),
                next_child: 0,
            };
            ancestors.push(std::mem::replace(&mut current, child));
            continue;
        }

        match ancestors.pop() {
            Some(mut parent) => {
                parent.out.children.push(current.out);
                current = parent;
            }
            None => return current.out,
        }
    }
}

/// Everything about a node except its children
fn shallow(node: &SourceNode, parent_x: f64, parent_y: f64) -> NormalizedNode {
    let bb = node.bounds();
    let is_text = node.is_type(&NodeType::Text);

    NormalizedNode {
        node_type: node.node_type.clone(),
        name: node.name.clone(),
        bounds: PixelBox {
            x: px(bb.x - parent_x),
            y: px(bb.y - parent_y),
            w: px(bb.width),
            h: px(bb.height),
        },
        layout: auto_layout(node),
        style: style(node, is_text),
        text: if is_text { node.characters.clone() } else { None },
        children: Vec::with_capacity(node.children.len()),
    }
}

/// Auto-layout descriptor for containers with a layout mode.
///
/// `"NONE"` is the design tool's marker for a plain frame and is treated
/// like an absent mode, so such frames carry no `layout` block.
fn auto_layout(node: &SourceNode) -> Option<Layout> {
    let dir = node
        .layout_mode
        .as_deref()
        .filter(|m| !m.is_empty() && *m != "NONE")?;

    Some(Layout {
        dir: dir.to_string(),
        gap: node.item_spacing,
        padding: Padding {
            t: node.padding_top,
            b: node.padding_bottom,
            l: node.padding_left,
            r: node.padding_right,
        },
        align: node.primary_axis_align_items.clone(),
        cross: node.counter_axis_align_items.clone(),
    })
}

fn style(node: &SourceNode, is_text: bool) -> Style {
    let mut style = Style::default();

    // last solid fill wins
    for fill in node.fills.iter().filter(|f| f.is_solid()) {
        style.bg = to_hex(fill.color.as_ref());
        style.opacity = Some(fill.opacity.unwrap_or(1.0));
    }

    // first stroke only
    if let Some(stroke) = node.strokes.first() {
        style.border = Some(Border {
            color: to_hex(stroke.color.as_ref()),
            width: node.stroke_weight,
        });
    }

    style.radius = node.corner_radius;

    if node.effects.iter().any(|e| e.is_drop_shadow()) {
        style.shadow = Some(true);
    }

    if is_text {
        let ts = node.style.clone().unwrap_or_default();
        style.text = Some(TextStyle {
            size: ts.font_size,
            weight: ts.font_weight,
            align: ts.text_align_horizontal,
            line: ts.line_height_px,
            // first fill, of any paint type
            color: node.fills.first().and_then(|f| to_hex(f.color.as_ref())),
        });
    }

    style
}
