//! The mounted, screen-styled preview surface.

use crate::preview::tree::{Node, NodeKind, RenderTree, Style};

/// Screen presentation of the preview paper.
pub fn screen_style() -> Style {
    Style {
        background: Some("#ffffff".to_string()),
        color: Some("#222222".to_string()),
        font_family: Some("Inter, Helvetica, Arial, sans-serif".to_string()),
        box_shadow: Some("0 4px 24px rgba(0, 0, 0, 0.12)".to_string()),
        border_radius_px: Some(8.0),
        animation: Some("fadeIn 0.3s ease-in".to_string()),
        max_width_px: Some(816.0),
        padding_pt: Some(36.0),
        ..Style::default()
    }
}

/// Wraps a projected tree in a `Surface` root ready to be shown in the editor.
pub fn mount(tree: &RenderTree) -> Node {
    Node {
        kind: NodeKind::Surface,
        style: screen_style(),
        children: vec![tree.root.clone()],
    }
}
