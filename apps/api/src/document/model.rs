//! Resume document types.
//!
//! A `Document` is an immutable snapshot. Every section sits behind an `Arc`, and
//! every element of an array section sits behind its own `Arc`, so a mutation only
//! copies the path it touches and shares the rest with the previous snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An array section: ordered, positionally addressed, never empty.
pub type Entries<T> = Arc<Vec<Arc<T>>>;

// ────────────────────────────────────────────────────────────────────────────
// Section names
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Contact,
    Summary,
    Education,
    Experience,
    Projects,
    Skills,
    Certificates,
    Languages,
}

impl SectionName {
    /// Display order used by the preview.
    pub const ALL: [SectionName; 8] = [
        SectionName::Contact,
        SectionName::Summary,
        SectionName::Education,
        SectionName::Experience,
        SectionName::Projects,
        SectionName::Skills,
        SectionName::Certificates,
        SectionName::Languages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionName::Contact => "contact",
            SectionName::Summary => "summary",
            SectionName::Education => "education",
            SectionName::Experience => "experience",
            SectionName::Projects => "projects",
            SectionName::Skills => "skills",
            SectionName::Certificates => "certificates",
            SectionName::Languages => "languages",
        }
    }

    pub fn is_array(self) -> bool {
        matches!(
            self,
            SectionName::Education
                | SectionName::Experience
                | SectionName::Projects
                | SectionName::Certificates
                | SectionName::Languages
        )
    }
}

/// Lists nested one level below a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedList {
    /// `experience[i].responsibilities`
    Responsibilities,
    /// `skills.technical`
    Technical,
    /// `skills.soft`
    Soft,
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// Scalar field access by form field name.
///
/// Field names are accepted in both the form's camelCase spelling and snake_case.
/// Returns `false` when the record has no scalar field of that name.
pub trait Record {
    fn set_field(&mut self, field: &str, value: String) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(alias = "fullName")]
    pub full_name: String,
    #[serde(alias = "jobTitle")]
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub blogs: String,
    /// Bare handle or full URL.
    pub twitter: String,
}

impl Record for Contact {
    fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "fullName" | "full_name" => &mut self.full_name,
            "jobTitle" | "job_title" => &mut self.job_title,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address" => &mut self.address,
            "linkedin" => &mut self.linkedin,
            "github" => &mut self.github,
            "portfolio" => &mut self.portfolio,
            "blogs" => &mut self.blogs,
            "twitter" => &mut self.twitter,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl Contact {
    /// Address is kept for the form but never shown in the header, so it does
    /// not make the contact section visible on its own.
    pub fn is_populated(&self) -> bool {
        [
            &self.full_name,
            &self.job_title,
            &self.email,
            &self.phone,
            &self.linkedin,
            &self.github,
            &self.portfolio,
            &self.blogs,
            &self.twitter,
        ]
        .into_iter()
        .any(|v| filled(v))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub university: String,
    pub year: String,
    pub cgpa: String,
}

impl Record for Education {
    fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "degree" => &mut self.degree,
            "university" => &mut self.university,
            "year" => &mut self.year,
            "cgpa" => &mut self.cgpa,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl Education {
    pub fn is_populated(&self) -> bool {
        filled(&self.degree) || filled(&self.university)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    pub responsibilities: Vec<String>,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            duration: String::new(),
            location: String::new(),
            responsibilities: vec![String::new()],
        }
    }
}

impl Record for Experience {
    fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "title" => &mut self.title,
            "company" => &mut self.company,
            "duration" => &mut self.duration,
            "location" => &mut self.location,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl Experience {
    pub fn is_populated(&self) -> bool {
        filled(&self.title) || filled(&self.company)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub link: String,
    #[serde(alias = "techStack")]
    pub tech_stack: String,
    pub description: String,
}

impl Record for Project {
    fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "title" => &mut self.title,
            "link" => &mut self.link,
            "techStack" | "tech_stack" => &mut self.tech_stack,
            "description" => &mut self.description,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl Project {
    pub fn is_populated(&self) -> bool {
        filled(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

impl Default for Skills {
    fn default() -> Self {
        Self {
            technical: vec![String::new()],
            soft: vec![String::new()],
        }
    }
}

impl Skills {
    pub fn is_populated(&self) -> bool {
        self.technical.iter().chain(&self.soft).any(|s| filled(s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificate {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

impl Record for Certificate {
    fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "issuer" => &mut self.issuer,
            "date" => &mut self.date,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl Certificate {
    pub fn is_populated(&self) -> bool {
        filled(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub name: String,
    pub proficiency: String,
}

impl Record for Language {
    fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "proficiency" => &mut self.proficiency,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl Language {
    pub fn is_populated(&self) -> bool {
        filled(&self.name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Elements (values for insert_element)
// ────────────────────────────────────────────────────────────────────────────

/// One element of an array section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Education(Education),
    Experience(Experience),
    Project(Project),
    Certificate(Certificate),
    Language(Language),
}

impl Element {
    pub fn section(&self) -> SectionName {
        match self {
            Element::Education(_) => SectionName::Education,
            Element::Experience(_) => SectionName::Experience,
            Element::Project(_) => SectionName::Projects,
            Element::Certificate(_) => SectionName::Certificates,
            Element::Language(_) => SectionName::Languages,
        }
    }

    /// The empty element a fresh form row starts with. `None` for non-array sections.
    pub fn empty(section: SectionName) -> Option<Element> {
        Some(match section {
            SectionName::Education => Element::Education(Education::default()),
            SectionName::Experience => Element::Experience(Experience::default()),
            SectionName::Projects => Element::Project(Project::default()),
            SectionName::Certificates => Element::Certificate(Certificate::default()),
            SectionName::Languages => Element::Language(Language::default()),
            _ => return None,
        })
    }

    /// Builds an element for `section` from a loosely shaped JSON value.
    ///
    /// Missing fields take their empty value. Returns `None` if the value is not an
    /// object of the section's shape or the section is not an array section.
    pub fn from_json(section: SectionName, value: Value) -> Option<Element> {
        if !value.is_object() {
            return None;
        }
        let element = match section {
            SectionName::Education => Element::Education(serde_json::from_value(value).ok()?),
            SectionName::Experience => {
                let mut exp: Experience = serde_json::from_value(value).ok()?;
                if exp.responsibilities.is_empty() {
                    exp.responsibilities.push(String::new());
                }
                Element::Experience(exp)
            }
            SectionName::Projects => Element::Project(serde_json::from_value(value).ok()?),
            SectionName::Certificates => {
                Element::Certificate(serde_json::from_value(value).ok()?)
            }
            SectionName::Languages => Element::Language(serde_json::from_value(value).ok()?),
            _ => return None,
        };
        Some(element)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// Root aggregate. Cloning is cheap: it copies eight `Arc`s.
///
/// Only constructed through `Document::new` and the mutation API, which is what
/// keeps every array section non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub contact: Arc<Contact>,
    pub summary: Arc<str>,
    pub education: Entries<Education>,
    pub experience: Entries<Experience>,
    pub projects: Entries<Project>,
    pub skills: Arc<Skills>,
    pub certificates: Entries<Certificate>,
    pub languages: Entries<Language>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A session-start document: empty scalars and one empty element per array section.
    pub fn new() -> Self {
        Self {
            contact: Arc::new(Contact::default()),
            summary: Arc::from(""),
            education: single(Education::default()),
            experience: single(Experience::default()),
            projects: single(Project::default()),
            skills: Arc::new(Skills::default()),
            certificates: single(Certificate::default()),
            languages: single(Language::default()),
        }
    }

    /// Number of elements in an array section, `None` for scalar sections.
    pub fn len_of(&self, section: SectionName) -> Option<usize> {
        match section {
            SectionName::Education => Some(self.education.len()),
            SectionName::Experience => Some(self.experience.len()),
            SectionName::Projects => Some(self.projects.len()),
            SectionName::Certificates => Some(self.certificates.len()),
            SectionName::Languages => Some(self.languages.len()),
            _ => None,
        }
    }

    /// Whether a section has anything worth showing in the preview.
    pub fn is_populated(&self, section: SectionName) -> bool {
        match section {
            SectionName::Contact => self.contact.is_populated(),
            SectionName::Summary => filled(&self.summary),
            SectionName::Education => self.education.iter().any(|e| e.is_populated()),
            SectionName::Experience => self.experience.iter().any(|e| e.is_populated()),
            SectionName::Projects => self.projects.iter().any(|p| p.is_populated()),
            SectionName::Skills => self.skills.is_populated(),
            SectionName::Certificates => self.certificates.iter().any(|c| c.is_populated()),
            SectionName::Languages => self.languages.iter().any(|l| l.is_populated()),
        }
    }

    /// Display name of the document owner, if any.
    pub fn owner_name(&self) -> Option<&str> {
        let name = self.contact.full_name.trim();
        (!name.is_empty()).then_some(name)
    }
}

fn single<T>(value: T) -> Entries<T> {
    Arc::new(vec![Arc::new(value)])
}

/// Non-empty after trimming whitespace.
pub fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_one_element_per_array_section() {
        let doc = Document::new();
        for section in SectionName::ALL {
            if section.is_array() {
                assert_eq!(doc.len_of(section), Some(1), "{section:?}");
            } else {
                assert_eq!(doc.len_of(section), None);
            }
        }
        assert_eq!(doc.experience[0].responsibilities, vec![String::new()]);
        assert_eq!(doc.skills.technical.len(), 1);
        assert_eq!(doc.skills.soft.len(), 1);
    }

    #[test]
    fn test_new_document_is_unpopulated() {
        let doc = Document::new();
        assert!(SectionName::ALL.iter().all(|s| !doc.is_populated(*s)));
    }

    #[test]
    fn test_whitespace_only_fields_do_not_populate() {
        let mut edu = Education::default();
        edu.degree = "   ".to_string();
        edu.year = "2020".to_string();
        assert!(!edu.is_populated());
        edu.university = "MIT".to_string();
        assert!(edu.is_populated());
    }

    #[test]
    fn test_contact_set_field_accepts_both_spellings() {
        let mut contact = Contact::default();
        assert!(contact.set_field("fullName", "Ada".to_string()));
        assert!(contact.set_field("job_title", "Engineer".to_string()));
        assert!(!contact.set_field("favouriteColour", "blue".to_string()));
        assert_eq!(contact.full_name, "Ada");
        assert_eq!(contact.job_title, "Engineer");
    }

    #[test]
    fn test_element_from_json_fills_missing_fields() {
        let el = Element::from_json(
            SectionName::Projects,
            serde_json::json!({ "title": "Compiler" }),
        );
        match el {
            Some(Element::Project(p)) => {
                assert_eq!(p.title, "Compiler");
                assert!(p.link.is_empty());
            }
            other => panic!("expected project, got {other:?}"),
        }
    }

    #[test]
    fn test_element_from_json_accepts_form_spelling() {
        let el = Element::from_json(
            SectionName::Projects,
            serde_json::json!({ "title": "Shop", "techStack": "Rust, axum" }),
        );
        match el {
            Some(Element::Project(p)) => assert_eq!(p.tech_stack, "Rust, axum"),
            other => panic!("expected project, got {other:?}"),
        }

        let contact: Contact =
            serde_json::from_value(serde_json::json!({ "fullName": "Ada", "jobTitle": "Analyst" }))
                .unwrap();
        assert_eq!(contact.full_name, "Ada");
        assert_eq!(contact.job_title, "Analyst");
    }

    #[test]
    fn test_address_alone_does_not_populate_contact() {
        let contact = Contact {
            address: "12 Analytical Row".to_string(),
            ..Contact::default()
        };
        assert!(!contact.is_populated());
    }

    #[test]
    fn test_element_from_json_experience_keeps_one_responsibility() {
        let el = Element::from_json(
            SectionName::Experience,
            serde_json::json!({ "title": "SRE", "responsibilities": [] }),
        );
        match el {
            Some(Element::Experience(e)) => assert_eq!(e.responsibilities.len(), 1),
            other => panic!("expected experience, got {other:?}"),
        }
    }

    #[test]
    fn test_element_from_json_rejects_wrong_shapes() {
        assert!(Element::from_json(SectionName::Education, serde_json::json!("x")).is_none());
        assert!(Element::from_json(
            SectionName::Languages,
            serde_json::json!({ "name": 42 })
        )
        .is_none());
        assert!(Element::from_json(SectionName::Summary, serde_json::json!({})).is_none());
    }

    #[test]
    fn test_owner_name_trims_and_falls_back() {
        let mut doc = Document::new();
        assert_eq!(doc.owner_name(), None);
        doc.contact = Arc::new(Contact {
            full_name: "  Grace Hopper ".to_string(),
            ..Contact::default()
        });
        assert_eq!(doc.owner_name(), Some("Grace Hopper"));
    }
}
