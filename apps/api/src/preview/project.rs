//! Projection from a `Document` snapshot to a `RenderTree`.
//!
//! Pure and deterministic: the same snapshot always yields the same tree, and the
//! document is only read.

use crate::document::model::{
    filled, Certificate, Contact, Education, Experience, Language, Project, Skills,
};
use crate::document::{Document, SectionName};
use crate::preview::text::{is_url, is_valid_email, normalize_entry};
use crate::preview::tree::{Node, NodeKind, RenderTree};

pub const EMAIL_UNAVAILABLE: &str = "not available";

pub fn project(doc: &Document) -> RenderTree {
    let sections = SectionName::ALL
        .into_iter()
        .filter(|&s| doc.is_populated(s))
        .filter_map(|s| project_section(doc, s))
        .collect();
    RenderTree {
        root: Node::with_children(NodeKind::Document, sections),
    }
}

/// `None` when nothing in the section survives normalization.
fn project_section(doc: &Document, section: SectionName) -> Option<Node> {
    let body: Vec<Node> = match section {
        SectionName::Contact => {
            let header = contact_header(&doc.contact);
            if header.children.is_empty() {
                Vec::new()
            } else {
                vec![header]
            }
        }
        SectionName::Summary => vec![Node::line(vec![Node::text(doc.summary.trim())])],
        SectionName::Education => doc.education.iter().filter_map(|e| education_item(e)).collect(),
        SectionName::Experience => doc.experience.iter().filter_map(|e| experience_item(e)).collect(),
        SectionName::Projects => doc.projects.iter().filter_map(|p| project_item(p)).collect(),
        SectionName::Skills => skill_lines(&doc.skills),
        SectionName::Certificates => {
            list_section(doc.certificates.iter().filter_map(|c| certificate_bullet(c)))
        }
        SectionName::Languages => {
            list_section(doc.languages.iter().filter_map(|l| language_bullet(l)))
        }
    };
    if body.is_empty() {
        return None;
    }

    let mut children = Vec::with_capacity(body.len() + 1);
    if let Some(title) = heading_for(section) {
        children.push(Node::with_children(
            NodeKind::SectionHeading,
            vec![Node::text(title)],
        ));
    }
    children.extend(body);
    Some(Node::with_children(NodeKind::Section { section }, children))
}

fn heading_for(section: SectionName) -> Option<&'static str> {
    match section {
        SectionName::Contact => None,
        SectionName::Summary => Some("SUMMARY"),
        SectionName::Education => Some("EDUCATION"),
        SectionName::Experience => Some("EXPERIENCE"),
        SectionName::Projects => Some("PROJECTS"),
        SectionName::Skills => Some("SKILLS"),
        SectionName::Certificates => Some("CERTIFICATIONS"),
        SectionName::Languages => Some("LANGUAGES"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contact header
// ────────────────────────────────────────────────────────────────────────────

fn contact_header(contact: &Contact) -> Node {
    let mut children = Vec::new();
    if filled(&contact.full_name) {
        children.push(Node::with_children(
            NodeKind::Name,
            vec![Node::text(contact.full_name.trim())],
        ));
    }
    if filled(&contact.job_title) {
        children.push(Node::with_children(
            NodeKind::JobTitle,
            vec![Node::text(contact.job_title.trim())],
        ));
    }

    let first = vec![
        plain_item(&contact.phone),
        email_item(&contact.email),
        link_item(&contact.linkedin, "LinkedIn"),
        link_item(&contact.github, "GitHub"),
    ];
    let second = vec![
        link_item(&contact.portfolio, "Portfolio"),
        link_item(&contact.blogs, "Blogs"),
        twitter_item(&contact.twitter),
    ];
    for row in [first, second] {
        let items: Vec<Node> = row.into_iter().flatten().collect();
        if !items.is_empty() {
            children.push(Node::with_children(
                NodeKind::ContactLine,
                join_with_separator(items),
            ));
        }
    }

    Node::with_children(NodeKind::Header, children)
}

fn join_with_separator(items: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(Node::new(NodeKind::Separator));
        }
        out.push(item);
    }
    out
}

fn plain_item(value: &str) -> Option<Node> {
    filled(value).then(|| Node::text(value.trim()))
}

/// Malformed addresses are replaced rather than echoed.
fn email_item(value: &str) -> Option<Node> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(Node::text(if is_valid_email(value) {
        value
    } else {
        EMAIL_UNAVAILABLE
    }))
}

/// URLs render as an anchor with a fixed label, anything else as plain text.
fn link_item(value: &str, label: &str) -> Option<Node> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else if is_url(value) {
        Some(Node::link(value, label))
    } else {
        Some(Node::text(value))
    }
}

fn twitter_item(value: &str) -> Option<Node> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let href = if is_url(value) {
        value.to_string()
    } else {
        format!("https://twitter.com/{}", value.trim_start_matches('@'))
    };
    Some(Node::link(href, "Twitter"))
}

// ────────────────────────────────────────────────────────────────────────────
// Items
// ────────────────────────────────────────────────────────────────────────────

fn item(children: Vec<Node>) -> Node {
    Node::with_children(NodeKind::Item, children)
}

fn item_heading(inline: Vec<Node>) -> Node {
    Node::with_children(NodeKind::ItemHeading, inline)
}

fn education_item(edu: &Education) -> Option<Node> {
    if !edu.is_populated() {
        return None;
    }
    let mut heading = vec![Node::strong(edu.degree.trim())];
    if filled(&edu.year) {
        heading.push(Node::text(format!(" • {}", edu.year.trim())));
    }

    let mut children = vec![item_heading(heading)];
    let mut second = Vec::new();
    if filled(&edu.university) {
        second.push(Node::text(edu.university.trim()));
    }
    if filled(&edu.cgpa) {
        if !second.is_empty() {
            second.push(Node::text(", "));
        }
        second.push(Node::strong(format!("CGPA: {}", edu.cgpa.trim())));
    }
    if !second.is_empty() {
        children.push(Node::line(second));
    }
    Some(item(children))
}

fn experience_item(exp: &Experience) -> Option<Node> {
    if !exp.is_populated() {
        return None;
    }
    let mut heading = vec![Node::strong(exp.title.trim())];
    if filled(&exp.company) {
        heading.push(Node::text(format!(" at {}", exp.company.trim())));
    }
    if filled(&exp.duration) {
        heading.push(Node::text(format!(" ({})", exp.duration.trim())));
    }

    let mut children = vec![item_heading(heading)];
    if filled(&exp.location) {
        children.push(Node::line(vec![Node::text(exp.location.trim())]));
    }
    let bullets: Vec<Node> = exp
        .responsibilities
        .iter()
        .filter(|r| filled(r))
        .map(|r| Node::with_children(NodeKind::Bullet, vec![Node::text(r.trim())]))
        .collect();
    if !bullets.is_empty() {
        children.push(Node::with_children(NodeKind::BulletList, bullets));
    }
    Some(item(children))
}

/// Project titles go through the free-text normalization rules; a title that
/// normalizes to noise drops the whole item.
fn project_item(proj: &Project) -> Option<Node> {
    if !proj.is_populated() {
        return None;
    }
    let entry = normalize_entry(&proj.title)?;

    let mut heading = vec![Node::strong(entry.heading)];
    if filled(&proj.link) {
        heading.push(Node::text(" "));
        heading.push(Node::link(proj.link.trim(), "Link"));
    }

    let mut children = vec![item_heading(heading)];
    children.extend(
        entry
            .details
            .into_iter()
            .map(|d| Node::line(vec![Node::text(d)])),
    );
    if filled(&proj.tech_stack) {
        children.push(Node::line(vec![Node::text(format!(
            "Tech Stack: {}",
            proj.tech_stack.trim()
        ))]));
    }
    if filled(&proj.description) {
        children.push(Node::line(vec![Node::text(proj.description.trim())]));
    }
    Some(item(children))
}

fn skill_lines(skills: &Skills) -> Vec<Node> {
    [("Technical:", &skills.technical), ("Soft:", &skills.soft)]
        .into_iter()
        .filter_map(|(label, list)| {
            let joined = list
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then(|| {
                Node::line(vec![Node::strong(label), Node::text(format!(" {joined}"))])
            })
        })
        .collect()
}

fn list_section(bullets: impl Iterator<Item = Node>) -> Vec<Node> {
    let bullets: Vec<Node> = bullets.collect();
    if bullets.is_empty() {
        Vec::new()
    } else {
        vec![Node::with_children(NodeKind::BulletList, bullets)]
    }
}

fn certificate_bullet(cert: &Certificate) -> Option<Node> {
    if !cert.is_populated() {
        return None;
    }
    let mut inline = vec![Node::strong(cert.name.trim())];
    if filled(&cert.issuer) {
        inline.push(Node::text(format!(" by {}", cert.issuer.trim())));
    }
    if filled(&cert.date) {
        inline.push(Node::text(format!(" ({})", cert.date.trim())));
    }
    Some(Node::with_children(NodeKind::Bullet, inline))
}

fn language_bullet(lang: &Language) -> Option<Node> {
    if !lang.is_populated() {
        return None;
    }
    let mut inline = vec![Node::strong(lang.name.trim())];
    if filled(&lang.proficiency) {
        inline.push(Node::text(format!(" ({})", lang.proficiency.trim())));
    }
    Some(Node::with_children(NodeKind::Bullet, inline))
}
