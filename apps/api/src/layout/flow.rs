//! Flows a print-styled node tree into a single column of positioned lines.
//!
//! Word wrap is greedy, the same algorithm the metric tables were built for:
//! words are placed left to right and a word that would cross the column edge
//! starts a new line. Every laid-out line keeps its top offset and height so
//! pagination can break between lines instead of through them.

use serde::Serialize;

use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable};
use crate::preview::tree::{Node, NodeKind, Style};

/// Left indent of bullet text; the bullet glyph hangs in the gutter.
pub const BULLET_INDENT_PT: f32 = 14.0;
const SECTION_GAP_PT: f32 = 10.0;
const ITEM_GAP_PT: f32 = 4.0;
const RULE_GAP_PT: f32 = 2.0;

const FALLBACK_SIZE_PT: f32 = 11.5;
const FALLBACK_LINE_HEIGHT: f32 = 1.5;
const FALLBACK_COLOR: &str = "#333333";

/// A styled span of text at a fixed horizontal position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub x_pt: f32,
    pub text: String,
    pub size_pt: f32,
    pub bold: bool,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidLine {
    pub top_pt: f32,
    pub height_pt: f32,
    pub baseline_pt: f32,
    pub runs: Vec<Run>,
}

impl LaidLine {
    pub fn bottom_pt(&self) -> f32 {
        self.top_pt + self.height_pt
    }
}

/// A horizontal rule under a section heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub y_pt: f32,
    pub x0_pt: f32,
    pub x1_pt: f32,
    pub color: String,
}

/// The laid-out document: one column, as tall as its content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub width_pt: f32,
    pub height_pt: f32,
    pub font: FontFamily,
    pub background: String,
    pub lines: Vec<LaidLine>,
    pub rules: Vec<Rule>,
}

/// Inherited presentation while walking the tree.
#[derive(Debug, Clone)]
struct Inherited {
    size_pt: f32,
    line_height: f32,
    color: String,
    centered: bool,
}

impl Inherited {
    fn apply(&self, style: &Style) -> Inherited {
        Inherited {
            size_pt: style.font_size_pt.unwrap_or(self.size_pt),
            line_height: style.line_height.unwrap_or(self.line_height),
            color: style.color.clone().unwrap_or_else(|| self.color.clone()),
            centered: self.centered,
        }
    }
}

/// One word plus the style it is drawn with.
#[derive(Debug, Clone)]
struct Piece {
    text: String,
    space_before: bool,
    size_pt: f32,
    bold: bool,
    color: String,
    href: Option<String>,
}

pub fn flow(root: &Node, font: FontFamily, width_pt: f32) -> Column {
    let mut flow = Flow {
        metrics: get_metrics(font),
        width_pt,
        cursor_pt: 0.0,
        lines: Vec::new(),
        rules: Vec::new(),
        sections_seen: 0,
    };
    let base = Inherited {
        size_pt: FALLBACK_SIZE_PT,
        line_height: FALLBACK_LINE_HEIGHT,
        color: FALLBACK_COLOR.to_string(),
        centered: false,
    };
    flow.block(root, &base);

    Column {
        width_pt,
        height_pt: flow.cursor_pt,
        font,
        background: root
            .style
            .background
            .clone()
            .unwrap_or_else(|| "#ffffff".to_string()),
        lines: flow.lines,
        rules: flow.rules,
    }
}

struct Flow {
    metrics: &'static FontMetricTable,
    width_pt: f32,
    cursor_pt: f32,
    lines: Vec<LaidLine>,
    rules: Vec<Rule>,
    sections_seen: usize,
}

impl Flow {
    fn block(&mut self, node: &Node, inherited: &Inherited) {
        let ctx = inherited.apply(&node.style);
        match &node.kind {
            NodeKind::Chrome { .. } => {}
            NodeKind::Header => {
                let ctx = Inherited {
                    centered: true,
                    ..ctx
                };
                self.children(node, &ctx);
                self.cursor_pt += ITEM_GAP_PT;
            }
            NodeKind::Section { .. } => {
                if self.sections_seen > 0 {
                    self.cursor_pt += SECTION_GAP_PT;
                }
                self.sections_seen += 1;
                self.children(node, &ctx);
            }
            NodeKind::Item => {
                self.children(node, &ctx);
                self.cursor_pt += ITEM_GAP_PT;
            }
            NodeKind::SectionHeading => {
                self.paragraph(node, &ctx, true, 0.0);
                self.cursor_pt += RULE_GAP_PT;
                self.rules.push(Rule {
                    y_pt: self.cursor_pt,
                    x0_pt: 0.0,
                    x1_pt: self.width_pt,
                    color: ctx.color.clone(),
                });
                self.cursor_pt += RULE_GAP_PT;
            }
            NodeKind::Name => self.paragraph(node, &ctx, true, 0.0),
            NodeKind::JobTitle | NodeKind::ContactLine | NodeKind::ItemHeading | NodeKind::Line => {
                self.paragraph(node, &ctx, false, 0.0)
            }
            NodeKind::Bullet => self.paragraph(node, &ctx, false, BULLET_INDENT_PT),
            NodeKind::Text { .. }
            | NodeKind::Strong { .. }
            | NodeKind::Link { .. }
            | NodeKind::Separator => {
                // Stray inline content directly under a container gets its own line.
                let wrapper = Node::line(vec![node.clone()]);
                self.paragraph(&wrapper, &ctx, false, 0.0);
            }
            NodeKind::Surface | NodeKind::Document | NodeKind::BulletList => {
                self.children(node, &ctx)
            }
        }
    }

    fn children(&mut self, node: &Node, ctx: &Inherited) {
        for child in &node.children {
            self.block(child, ctx);
        }
    }

    /// Lays out the inline children of a block node.
    fn paragraph(&mut self, node: &Node, ctx: &Inherited, bold: bool, indent_pt: f32) {
        let mut pieces = Vec::new();
        let mut pending_space = false;
        for child in &node.children {
            collect_pieces(child, ctx, bold, &mut pieces, &mut pending_space);
        }
        if pieces.is_empty() {
            return;
        }
        let bullet = indent_pt > 0.0;
        for (i, line) in self.wrap(&pieces, indent_pt).into_iter().enumerate() {
            let mut runs = line;
            if bullet && i == 0 {
                runs.insert(
                    0,
                    Run {
                        x_pt: indent_pt * 0.35,
                        text: "•".to_string(),
                        size_pt: ctx.size_pt,
                        bold: false,
                        color: ctx.color.clone(),
                        href: None,
                    },
                );
            }
            self.push_line(runs, ctx);
        }
    }

    /// Greedy word wrap. Adjacent words with the same style merge into one run.
    fn wrap(&self, pieces: &[Piece], indent_pt: f32) -> Vec<Vec<Run>> {
        let max_x = self.width_pt;
        let mut lines: Vec<Vec<Run>> = Vec::new();
        let mut current: Vec<Run> = Vec::new();
        let mut x = indent_pt;
        let available = (max_x - indent_pt).max(0.0);
        let pieces: Vec<Piece> = pieces
            .iter()
            .flat_map(|p| self.fit_to_width(p, available))
            .collect();

        for piece in &pieces {
            let word_w = self.metrics.measure_pt(&piece.text, piece.size_pt, piece.bold);
            let space_w = if piece.space_before && !current.is_empty() {
                self.metrics.space_pt(piece.size_pt)
            } else {
                0.0
            };

            if !current.is_empty() && x + space_w + word_w > max_x {
                lines.push(std::mem::take(&mut current));
                x = indent_pt;
                current.push(run_for(piece, x));
                x += word_w;
                continue;
            }

            match current.last_mut() {
                Some(last) if same_style(last, piece) => {
                    if space_w > 0.0 {
                        last.text.push(' ');
                    }
                    last.text.push_str(&piece.text);
                }
                _ => current.push(run_for(piece, x + space_w)),
            }
            x += space_w + word_w;
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Hard-breaks a word wider than `available` at character boundaries.
    /// Every chunk holds at least one character.
    fn fit_to_width(&self, piece: &Piece, available: f32) -> Vec<Piece> {
        if self.metrics.measure_pt(&piece.text, piece.size_pt, piece.bold) <= available {
            return vec![piece.clone()];
        }
        let mut chunks = Vec::new();
        let mut chunk = String::new();
        let mut width = 0.0;
        let mut buf = [0u8; 4];
        for c in piece.text.chars() {
            let char_w = self
                .metrics
                .measure_pt(c.encode_utf8(&mut buf), piece.size_pt, piece.bold);
            if !chunk.is_empty() && width + char_w > available {
                chunks.push(chunk_of(piece, std::mem::take(&mut chunk), chunks.is_empty()));
                width = 0.0;
            }
            chunk.push(c);
            width += char_w;
        }
        if !chunk.is_empty() {
            chunks.push(chunk_of(piece, chunk, chunks.is_empty()));
        }
        chunks
    }

    fn push_line(&mut self, mut runs: Vec<Run>, ctx: &Inherited) {
        let size = runs
            .iter()
            .map(|r| r.size_pt)
            .fold(ctx.size_pt, f32::max);
        let height = size * ctx.line_height;

        if ctx.centered {
            let right = runs
                .iter()
                .map(|r| r.x_pt + self.metrics.measure_pt(&r.text, r.size_pt, r.bold))
                .fold(0.0, f32::max);
            let shift = ((self.width_pt - right) / 2.0).max(0.0);
            for run in &mut runs {
                run.x_pt += shift;
            }
        }

        let top = self.cursor_pt;
        let line = LaidLine {
            top_pt: top,
            height_pt: height,
            // Centre the em box in the line box; the baseline sits ~0.8em below its top.
            baseline_pt: top + (height - size) / 2.0 + size * 0.8,
            runs,
        };
        self.cursor_pt = line.bottom_pt();
        self.lines.push(line);
    }
}

fn run_for(piece: &Piece, x_pt: f32) -> Run {
    Run {
        x_pt,
        text: piece.text.clone(),
        size_pt: piece.size_pt,
        bold: piece.bold,
        color: piece.color.clone(),
        href: piece.href.clone(),
    }
}

/// Only the first chunk of a split word keeps the word's leading space.
fn chunk_of(piece: &Piece, text: String, first: bool) -> Piece {
    Piece {
        text,
        space_before: first && piece.space_before,
        size_pt: piece.size_pt,
        bold: piece.bold,
        color: piece.color.clone(),
        href: piece.href.clone(),
    }
}

fn same_style(run: &Run, piece: &Piece) -> bool {
    run.size_pt == piece.size_pt
        && run.bold == piece.bold
        && run.color == piece.color
        && run.href == piece.href
}

fn collect_pieces(
    node: &Node,
    inherited: &Inherited,
    bold: bool,
    out: &mut Vec<Piece>,
    pending_space: &mut bool,
) {
    let ctx = inherited.apply(&node.style);
    let (text, bold, href) = match &node.kind {
        NodeKind::Text { text } => (text.as_str(), bold, None),
        NodeKind::Strong { text } => (text.as_str(), true, None),
        NodeKind::Link { href, label } => (label.as_str(), bold, Some(href.clone())),
        NodeKind::Separator => (" | ", bold, None),
        _ => {
            for child in &node.children {
                collect_pieces(child, &ctx, bold, out, pending_space);
            }
            return;
        }
    };

    let mut first = true;
    for word in text.split_whitespace() {
        // Whitespace between words, or leading whitespace / a previous node ending in a space.
        let space_before = if first {
            *pending_space || text.starts_with(char::is_whitespace)
        } else {
            true
        };
        out.push(Piece {
            text: word.to_string(),
            space_before,
            size_pt: ctx.size_pt,
            bold,
            color: ctx.color.clone(),
            href: href.clone(),
        });
        first = false;
    }
    *pending_space = if first {
        *pending_space || !text.is_empty()
    } else {
        text.ends_with(char::is_whitespace)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_size(size: f32) -> Style {
        Style {
            font_size_pt: Some(size),
            ..Style::default()
        }
    }

    fn texts(column: &Column) -> Vec<String> {
        column
            .lines
            .iter()
            .map(|l| {
                l.runs
                    .iter()
                    .map(|r| r.text.as_str())
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect()
    }

    #[test]
    fn test_short_line_stays_on_one_line() {
        let root = Node::with_children(
            NodeKind::Document,
            vec![Node::line(vec![Node::text("Hello world")])],
        );
        let column = flow(&root, FontFamily::Inter, 540.0);
        assert_eq!(texts(&column), vec!["Hello world"]);
        assert!((column.lines[0].height_pt - 11.5 * 1.5).abs() < 1e-3);
        assert!((column.height_pt - column.lines[0].height_pt).abs() < 1e-3);
    }

    #[test]
    fn test_long_text_wraps_greedily() {
        let text = "word ".repeat(60);
        let root = Node::line(vec![Node::text(text)]);
        let column = flow(&root, FontFamily::Inter, 200.0);
        assert!(column.lines.len() > 1);
        let metrics = get_metrics(FontFamily::Inter);
        for line in &column.lines {
            for run in &line.runs {
                let right = run.x_pt + metrics.measure_pt(&run.text, run.size_pt, run.bold);
                assert!(right <= 200.0 + 1e-3, "run overflows: {right}");
            }
        }
        // Lines stack without gaps.
        for pair in column.lines.windows(2) {
            assert!((pair[0].bottom_pt() - pair[1].top_pt).abs() < 1e-3);
        }
    }

    #[test]
    fn test_overlong_word_is_broken_within_column() {
        let token = "a1b2c3d4e5".repeat(15);
        let root = Node::line(vec![Node::text(format!("hash {token} end"))]);
        let column = flow(&root, FontFamily::Inter, 540.0);
        let metrics = get_metrics(FontFamily::Inter);
        for line in &column.lines {
            for run in &line.runs {
                let right = run.x_pt + metrics.measure_pt(&run.text, run.size_pt, run.bold);
                assert!(right <= 540.0 + 1e-3, "run overflows: {right}");
            }
        }
        assert!(column.lines.len() >= 2);
        let laid: String = column
            .lines
            .iter()
            .flat_map(|l| l.runs.iter().map(|r| r.text.replace(' ', "")))
            .collect();
        assert_eq!(laid, format!("hash{token}end"));
    }

    #[test]
    fn test_overlong_word_in_bullet_respects_indent() {
        let root = Node::with_children(
            NodeKind::Bullet,
            vec![Node::text("x".repeat(400))],
        );
        let column = flow(&root, FontFamily::ComputerModern, 200.0);
        let metrics = get_metrics(FontFamily::ComputerModern);
        for line in &column.lines {
            for run in line.runs.iter().filter(|r| r.text != "•") {
                assert!(run.x_pt >= BULLET_INDENT_PT);
                let right = run.x_pt + metrics.measure_pt(&run.text, run.size_pt, run.bold);
                assert!(right <= 200.0 + 1e-3, "run overflows: {right}");
            }
        }
    }

    #[test]
    fn test_mixed_runs_keep_spacing() {
        let root = Node::line(vec![Node::strong("Technical:"), Node::text(" Rust, Go")]);
        let column = flow(&root, FontFamily::ComputerModern, 540.0);
        let runs = &column.lines[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Technical:");
        assert!(runs[0].bold);
        assert_eq!(runs[1].text, "Rust, Go");
        assert!(runs[1].x_pt > runs[0].x_pt);
    }

    #[test]
    fn test_link_run_keeps_href() {
        let root = Node::line(vec![
            Node::strong("Site"),
            Node::text(" "),
            Node::link("https://x.dev", "Link"),
        ]);
        let column = flow(&root, FontFamily::Inter, 540.0);
        let link = column.lines[0].runs.last().unwrap();
        assert_eq!(link.text, "Link");
        assert_eq!(link.href.as_deref(), Some("https://x.dev"));
    }

    #[test]
    fn test_bullets_are_indented_with_glyph() {
        let root = Node::with_children(
            NodeKind::BulletList,
            vec![Node::with_children(
                NodeKind::Bullet,
                vec![Node::text("Shipped it")],
            )],
        );
        let column = flow(&root, FontFamily::Inter, 540.0);
        let runs = &column.lines[0].runs;
        assert_eq!(runs[0].text, "•");
        assert_eq!(runs[1].x_pt, BULLET_INDENT_PT);
    }

    #[test]
    fn test_font_size_is_inherited_and_overridden() {
        let mut name = Node::with_children(NodeKind::Name, vec![Node::text("Ada")]);
        name.style = style_size(18.0);
        let mut root = Node::with_children(
            NodeKind::Document,
            vec![name, Node::line(vec![Node::text("body")])],
        );
        root.style = style_size(10.0);
        let column = flow(&root, FontFamily::Inter, 540.0);
        assert_eq!(column.lines[0].runs[0].size_pt, 18.0);
        assert!(column.lines[0].runs[0].bold);
        assert_eq!(column.lines[1].runs[0].size_pt, 10.0);
    }

    #[test]
    fn test_section_heading_draws_rule() {
        let root = Node::with_children(
            NodeKind::SectionHeading,
            vec![Node::text("SKILLS")],
        );
        let column = flow(&root, FontFamily::Inter, 540.0);
        assert_eq!(column.rules.len(), 1);
        assert!(column.rules[0].y_pt > column.lines[0].top_pt);
    }

    #[test]
    fn test_chrome_is_not_laid_out() {
        let root = Node::with_children(
            NodeKind::Surface,
            vec![Node::with_children(
                NodeKind::Chrome {
                    chrome: crate::preview::ChromeKind::Toolbar,
                },
                vec![Node::line(vec![Node::text("Download PDF")])],
            )],
        );
        assert!(flow(&root, FontFamily::Inter, 540.0).lines.is_empty());
    }
}
