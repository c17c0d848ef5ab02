//! Render tree types shared by the preview and export stages.

use serde::Serialize;

use crate::document::SectionName;

/// Editing chrome that may end up inside a captured surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromeKind {
    Toolbar,
    TabNavigation,
    FormPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of a mounted preview.
    Surface,
    /// Root of a projected document.
    Document,
    Header,
    Section { section: SectionName },
    SectionHeading,
    Name,
    JobTitle,
    ContactLine,
    Item,
    ItemHeading,
    /// A line of inline content (text, strong text, links, separators).
    Line,
    BulletList,
    Bullet,
    Text { text: String },
    Strong { text: String },
    Link { href: String, label: String },
    /// Inline `" | "` between contact items.
    Separator,
    Chrome { chrome: ChromeKind },
}

/// Presentation attached to a node. `None` means inherited.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_pt: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

impl Style {
    /// True if any screen-only property is set.
    pub fn has_screen_only(&self) -> bool {
        self.box_shadow.is_some()
            || self.border_radius_px.is_some()
            || self.animation.is_some()
            || self.max_width_px.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "is_default_style")]
    pub style: Style,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

fn is_default_style(style: &Style) -> bool {
    *style == Style::default()
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            style: Style::default(),
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            style: Style::default(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text { text: text.into() })
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Strong { text: text.into() })
    }

    pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(NodeKind::Link {
            href: href.into(),
            label: label.into(),
        })
    }

    /// A `Line` holding the given inline nodes.
    pub fn line(inline: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Line, inline)
    }

    /// Concatenated inline text of this subtree, in document order.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { text } | NodeKind::Strong { text } => out.push_str(text),
            NodeKind::Link { label, .. } => out.push_str(label),
            NodeKind::Separator => out.push_str(" | "),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search for every node matching `pred`.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Node) -> bool) -> Vec<&'a Node> {
        let mut found = Vec::new();
        self.walk(&mut |n| {
            if pred(n) {
                found.push(n);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Output of the preview projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    pub root: Node,
}

impl RenderTree {
    /// The rendered section node, if the section was populated.
    pub fn section(&self, name: SectionName) -> Option<&Node> {
        self.root
            .children
            .iter()
            .find(|n| matches!(n.kind, NodeKind::Section { section } if section == name))
    }

    /// Sections in render order.
    pub fn sections(&self) -> Vec<SectionName> {
        self.root
            .children
            .iter()
            .filter_map(|n| match n.kind {
                NodeKind::Section { section } => Some(section),
                _ => None,
            })
            .collect()
    }
}
