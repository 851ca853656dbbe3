//! Screen selection for one page

use super::normalize::normalize;
use super::{px, PixelBox, Screen};
use crate::source::{NodeType, SourceNode};
use crate::ScreenPolicy;

impl ScreenPolicy {
    /// Whether a direct child of a page counts as a screen
    pub fn accepts(&self, node: &SourceNode) -> bool {
        match (self, node.node_type.as_ref()) {
            (_, Some(NodeType::Frame)) => true,
            (ScreenPolicy::FramesAndComponents, Some(NodeType::Instance | NodeType::Component)) => true,
            _ => false,
        }
    }
}

/// Extract the screens among `page`'s direct children, in order.
///
/// A screen's own box stays in absolute document coordinates; its children
/// are normalized against the screen's absolute origin.
pub fn extract_screens(page: &SourceNode, policy: ScreenPolicy) -> Vec<Screen> {
    page.children
        .iter()
        .filter(|child| policy.accepts(child))
        .map(|frame| {
            let bb = frame.bounds();
            let tree: Vec<_> = frame
                .children
                .iter()
                .map(|child| normalize(child, bb.x, bb.y))
                .collect();
            log::debug!(
                "screen {:?}: {} nodes",
                frame.name.as_deref().unwrap_or(""),
                tree.iter().map(|n| n.count()).sum::<usize>()
            );
            Screen {
                screen: frame.name.clone(),
                bounds: PixelBox {
                    x: px(bb.x),
                    y: px(bb.y),
                    w: px(bb.width),
                    h: px(bb.height),
                },
                tree,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_at_screen_corner_is_at_origin() {
        let page = SourceNode::new("CANVAS", "Page").with_child(
            SourceNode::new("FRAME", "Screen")
                .with_box(-200.0, 340.0, 375.0, 812.0)
                .with_child(SourceNode::new("RECTANGLE", "bg").with_box(-200.0, 340.0, 375.0, 812.0)),
        );

        let screens = extract_screens(&page, ScreenPolicy::FramesOnly);
        assert_eq!(screens.len(), 1);
        assert_eq!(screens[0].bounds, PixelBox { x: -200, y: 340, w: 375, h: 812 });
        assert_eq!(screens[0].tree[0].bounds, PixelBox { x: 0, y: 0, w: 375, h: 812 });
    }

    #[test]
    fn non_frames_are_skipped() {
        let page = SourceNode::new("CANVAS", "Page")
            .with_child(SourceNode::new("VECTOR", "arrow"))
            .with_child(SourceNode::new("VECTOR", "logo"));
        assert!(extract_screens(&page, ScreenPolicy::FramesOnly).is_empty());
    }

    #[test]
    fn components_only_count_when_policy_allows() {
        let page = SourceNode::new("CANVAS", "Page")
            .with_child(SourceNode::new("COMPONENT", "Button"))
            .with_child(SourceNode::new("FRAME", "Home"))
            .with_child(SourceNode::new("INSTANCE", "Card"))
            .with_child(SourceNode::new("GROUP", "Loose"));

        let narrow = extract_screens(&page, ScreenPolicy::FramesOnly);
        assert_eq!(narrow.len(), 1);
        assert_eq!(narrow[0].screen.as_deref(), Some("Home"));

        let wide = extract_screens(&page, ScreenPolicy::FramesAndComponents);
        let names: Vec<_> = wide.iter().filter_map(|s| s.screen.as_deref()).collect();
        assert_eq!(names, ["Button", "Home", "Card"]);
    }

    #[test]
    fn nested_frames_are_not_screens() {
        let page = SourceNode::new("CANVAS", "Page").with_child(
            SourceNode::new("GROUP", "wrapper").with_child(SourceNode::new("FRAME", "Inner")),
        );
        assert!(extract_screens(&page, ScreenPolicy::FramesOnly).is_empty());
    }
}
