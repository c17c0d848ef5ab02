//! Builds the print-ready copy of a preview surface.
//!
//! Pure: nothing here touches the mounted surface. `prepare` deep-copies the
//! surface, drops editing chrome and replaces every node's presentation with
//! the canonical print stylesheet.

use crate::preview::tree::{Node, NodeKind, Style};

/// Canonical print presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStylesheet {
    pub background: &'static str,
    pub text_color: &'static str,
    pub link_color: &'static str,
    pub font_family: String,
    pub body_size_pt: f32,
    pub line_height: f32,
    pub name_size_pt: f32,
    pub section_size_pt: f32,
    pub item_size_pt: f32,
}

impl PrintStylesheet {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            background: "#ffffff",
            text_color: "#333333",
            link_color: "#0066cc",
            font_family: font_family.into(),
            body_size_pt: 11.5,
            line_height: 1.5,
            name_size_pt: 18.0,
            section_size_pt: 14.0,
            item_size_pt: 12.5,
        }
    }

    /// Print style for a node kind. Screen-only properties are never set.
    pub fn style_for(&self, kind: &NodeKind) -> Style {
        match kind {
            NodeKind::Surface => Style {
                background: Some(self.background.to_string()),
                color: Some(self.text_color.to_string()),
                font_family: Some(self.font_family.clone()),
                font_size_pt: Some(self.body_size_pt),
                line_height: Some(self.line_height),
                ..Style::default()
            },
            NodeKind::Name => Style {
                font_size_pt: Some(self.name_size_pt),
                ..Style::default()
            },
            NodeKind::SectionHeading => Style {
                font_size_pt: Some(self.section_size_pt),
                ..Style::default()
            },
            NodeKind::ItemHeading => Style {
                font_size_pt: Some(self.item_size_pt),
                ..Style::default()
            },
            NodeKind::Link { .. } => Style {
                color: Some(self.link_color.to_string()),
                text_decoration: Some("none".to_string()),
                ..Style::default()
            },
            _ => Style::default(),
        }
    }
}

/// Deep copy of the surface. The copy owns all of its nodes.
pub fn isolate(surface: &Node) -> Node {
    surface.clone()
}

/// Drops editing chrome and applies the print stylesheet, in place.
pub fn normalize(node: &mut Node, sheet: &PrintStylesheet) {
    node.children
        .retain(|child| !matches!(child.kind, NodeKind::Chrome { .. }));
    node.style = sheet.style_for(&node.kind);
    for child in &mut node.children {
        normalize(child, sheet);
    }
}

/// `isolate` then `normalize`. A chrome root has nothing printable and yields an
/// empty surface.
pub fn prepare(surface: &Node, sheet: &PrintStylesheet) -> Node {
    let mut copy = isolate(surface);
    if matches!(copy.kind, NodeKind::Chrome { .. }) {
        copy = Node::new(NodeKind::Surface);
    }
    normalize(&mut copy, sheet);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, SectionName};
    use crate::preview::{mount, project, ChromeKind};

    fn sheet() -> PrintStylesheet {
        PrintStylesheet::new("serif")
    }

    fn mounted_with_chrome() -> Node {
        let doc = Document::new()
            .update_field(SectionName::Contact, "fullName", "Ada".to_string(), None)
            .document
            .update_field(
                SectionName::Contact,
                "github",
                "https://github.com/ada".to_string(),
                None,
            )
            .document;
        let mut surface = mount(&project(&doc));
        surface.children.insert(
            0,
            Node::with_children(
                NodeKind::Chrome {
                    chrome: ChromeKind::Toolbar,
                },
                vec![Node::text("Download PDF")],
            ),
        );
        surface.children.push(Node::new(NodeKind::Chrome {
            chrome: ChromeKind::FormPanel,
        }));
        surface
    }

    fn all_nodes(node: &Node) -> Vec<&Node> {
        node.find_all(&|_| true)
    }

    #[test]
    fn test_prepare_does_not_touch_the_surface() {
        let surface = mounted_with_chrome();
        let before = surface.clone();
        let _ = prepare(&surface, &sheet());
        assert_eq!(surface, before);
    }

    #[test]
    fn test_prepare_removes_chrome() {
        let printed = prepare(&mounted_with_chrome(), &sheet());
        assert!(printed
            .find_all(&|n| matches!(n.kind, NodeKind::Chrome { .. }))
            .is_empty());
        assert!(!printed.plain_text().contains("Download PDF"));
        assert!(printed.plain_text().contains("Ada"));
    }

    #[test]
    fn test_prepare_strips_screen_only_styles() {
        let printed = prepare(&mounted_with_chrome(), &sheet());
        for node in all_nodes(&printed) {
            assert!(!node.style.has_screen_only(), "{:?}", node.kind);
        }
        assert_eq!(printed.style.background.as_deref(), Some("#ffffff"));
        assert_eq!(printed.style.color.as_deref(), Some("#333333"));
        assert_eq!(printed.style.font_size_pt, Some(11.5));
    }

    #[test]
    fn test_prepare_styles_names_and_links() {
        let printed = prepare(&mounted_with_chrome(), &sheet());
        let name = printed.find_all(&|n| n.kind == NodeKind::Name);
        assert_eq!(name[0].style.font_size_pt, Some(18.0));
        let links = printed.find_all(&|n| matches!(n.kind, NodeKind::Link { .. }));
        assert_eq!(links[0].style.color.as_deref(), Some("#0066cc"));
        assert_eq!(links[0].style.text_decoration.as_deref(), Some("none"));
    }

    #[test]
    fn test_prepare_chrome_root_yields_empty_surface() {
        let root = Node::with_children(
            NodeKind::Chrome {
                chrome: ChromeKind::TabNavigation,
            },
            vec![Node::text("Contact")],
        );
        let printed = prepare(&root, &sheet());
        assert_eq!(printed.kind, NodeKind::Surface);
        assert!(printed.children.is_empty());
    }
}
