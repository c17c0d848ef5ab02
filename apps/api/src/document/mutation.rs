//! Mutation API for `Document`.
//!
//! Every operation is total: it never fails and never panics. It returns a new
//! snapshot together with an `Outcome`. A rejected mutation (`Outcome::Noop`)
//! returns a snapshot equal to, and sharing all storage with, the input.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::model::{
    Document, Element, Entries, NestedList, Record, SectionName, Skills,
};

/// A single form edit, as sent by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    UpdateField {
        section: SectionName,
        field: String,
        value: String,
        #[serde(default)]
        index: Option<usize>,
    },
    InsertElement {
        section: SectionName,
        #[serde(default)]
        default_value: Option<Value>,
    },
    RemoveElement {
        section: SectionName,
        index: usize,
    },
    InsertNestedElement {
        section: SectionName,
        #[serde(default)]
        index: Option<usize>,
        nested_field: NestedList,
        #[serde(default)]
        default_value: String,
    },
    RemoveNestedElement {
        section: SectionName,
        #[serde(default)]
        index: Option<usize>,
        nested_field: NestedList,
        nested_index: usize,
    },
    UpdateNestedElement {
        section: SectionName,
        #[serde(default)]
        index: Option<usize>,
        nested_field: NestedList,
        nested_index: usize,
        value: String,
    },
}

/// Why a mutation was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// The index does not address an existing element (e.g. a stale index after a removal).
    IndexOutOfBounds,
    /// Removing would leave the list empty.
    LastElement,
    /// The record has no scalar field of that name.
    UnknownField,
    /// The operation does not fit the section (index on a scalar section, wrong nested list, ...).
    WrongSectionShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Noop(NoopReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// The snapshot produced by a mutation.
#[derive(Debug, Clone)]
pub struct Mutated {
    pub document: Document,
    pub outcome: Outcome,
}

use Outcome::{Applied, Noop};

impl Document {
    /// Dispatches a `Mutation` to the matching operation.
    pub fn apply(&self, mutation: &Mutation) -> Mutated {
        match mutation {
            Mutation::UpdateField {
                section,
                field,
                value,
                index,
            } => self.update_field(*section, field, value.clone(), *index),
            Mutation::InsertElement {
                section,
                default_value,
            } => {
                let element = match default_value {
                    Some(value) => Element::from_json(*section, value.clone()),
                    None => Element::empty(*section),
                };
                match element {
                    Some(element) => self.insert_element(*section, element),
                    None => self.rejected(NoopReason::WrongSectionShape),
                }
            }
            Mutation::RemoveElement { section, index } => self.remove_element(*section, *index),
            Mutation::InsertNestedElement {
                section,
                index,
                nested_field,
                default_value,
            } => self.insert_nested_element(*section, *index, *nested_field, default_value.clone()),
            Mutation::RemoveNestedElement {
                section,
                index,
                nested_field,
                nested_index,
            } => self.remove_nested_element(*section, *index, *nested_field, *nested_index),
            Mutation::UpdateNestedElement {
                section,
                index,
                nested_field,
                nested_index,
                value,
            } => self.update_nested_element(
                *section,
                *index,
                *nested_field,
                *nested_index,
                value.clone(),
            ),
        }
    }

    /// Sets a scalar field on a top-level record (`index` = `None`) or on the
    /// `index`-th element of an array section.
    ///
    /// `skills` has no scalar fields; `update_field(Skills, "technical", v, Some(i))`
    /// is accepted as an alias for `update_nested_element`.
    pub fn update_field(
        &self,
        section: SectionName,
        field: &str,
        value: String,
        index: Option<usize>,
    ) -> Mutated {
        let mut next = self.clone();
        let outcome = match (section, index) {
            (SectionName::Contact, None) => {
                let mut contact = (*next.contact).clone();
                if contact.set_field(field, value) {
                    next.contact = Arc::new(contact);
                    Applied
                } else {
                    Noop(NoopReason::UnknownField)
                }
            }
            (SectionName::Summary, None) => {
                if field.is_empty() || field == "summary" {
                    next.summary = Arc::from(value);
                    Applied
                } else {
                    Noop(NoopReason::UnknownField)
                }
            }
            (SectionName::Skills, Some(i)) => {
                let nested = match field {
                    "technical" => NestedList::Technical,
                    "soft" => NestedList::Soft,
                    _ => return self.rejected(NoopReason::UnknownField),
                };
                return self.update_nested_element(section, None, nested, i, value);
            }
            (SectionName::Education, Some(i)) => set_entry_field(&mut next.education, i, field, value),
            (SectionName::Experience, Some(i)) => {
                set_entry_field(&mut next.experience, i, field, value)
            }
            (SectionName::Projects, Some(i)) => set_entry_field(&mut next.projects, i, field, value),
            (SectionName::Certificates, Some(i)) => {
                set_entry_field(&mut next.certificates, i, field, value)
            }
            (SectionName::Languages, Some(i)) => set_entry_field(&mut next.languages, i, field, value),
            _ => Noop(NoopReason::WrongSectionShape),
        };
        self.finish(next, outcome)
    }

    /// Appends `element` to `section`. No upper bound.
    pub fn insert_element(&self, section: SectionName, element: Element) -> Mutated {
        if element.section() != section {
            return self.rejected(NoopReason::WrongSectionShape);
        }
        let mut next = self.clone();
        match element {
            Element::Education(e) => push_entry(&mut next.education, e),
            Element::Experience(e) => push_entry(&mut next.experience, e),
            Element::Project(p) => push_entry(&mut next.projects, p),
            Element::Certificate(c) => push_entry(&mut next.certificates, c),
            Element::Language(l) => push_entry(&mut next.languages, l),
        }
        self.finish(next, Applied)
    }

    /// Removes the element at `index` if the section holds more than one element.
    /// Later elements shift down by one.
    pub fn remove_element(&self, section: SectionName, index: usize) -> Mutated {
        let mut next = self.clone();
        let outcome = match section {
            SectionName::Education => remove_entry(&mut next.education, index),
            SectionName::Experience => remove_entry(&mut next.experience, index),
            SectionName::Projects => remove_entry(&mut next.projects, index),
            SectionName::Certificates => remove_entry(&mut next.certificates, index),
            SectionName::Languages => remove_entry(&mut next.languages, index),
            _ => Noop(NoopReason::WrongSectionShape),
        };
        self.finish(next, outcome)
    }

    pub fn insert_nested_element(
        &self,
        section: SectionName,
        index: Option<usize>,
        nested: NestedList,
        value: String,
    ) -> Mutated {
        self.edit_nested(section, index, nested, |list| {
            list.push(value);
            Applied
        })
    }

    pub fn remove_nested_element(
        &self,
        section: SectionName,
        index: Option<usize>,
        nested: NestedList,
        nested_index: usize,
    ) -> Mutated {
        self.edit_nested(section, index, nested, |list| {
            if list.len() <= 1 {
                Noop(NoopReason::LastElement)
            } else if nested_index >= list.len() {
                Noop(NoopReason::IndexOutOfBounds)
            } else {
                list.remove(nested_index);
                Applied
            }
        })
    }

    pub fn update_nested_element(
        &self,
        section: SectionName,
        index: Option<usize>,
        nested: NestedList,
        nested_index: usize,
        value: String,
    ) -> Mutated {
        self.edit_nested(section, index, nested, |list| match list.get_mut(nested_index) {
            Some(slot) => {
                *slot = value;
                Applied
            }
            None => Noop(NoopReason::IndexOutOfBounds),
        })
    }

    /// Runs `edit` against a copy of the addressed nested list and installs the copy
    /// only when the edit applied.
    fn edit_nested(
        &self,
        section: SectionName,
        index: Option<usize>,
        nested: NestedList,
        edit: impl FnOnce(&mut Vec<String>) -> Outcome,
    ) -> Mutated {
        let mut next = self.clone();
        let outcome = match (section, nested) {
            (SectionName::Experience, NestedList::Responsibilities) => {
                let Some(i) = index else {
                    return self.rejected(NoopReason::WrongSectionShape);
                };
                let Some(current) = next.experience.get(i) else {
                    return self.rejected(NoopReason::IndexOutOfBounds);
                };
                let mut entry = (**current).clone();
                let outcome = edit(&mut entry.responsibilities);
                if outcome.is_applied() {
                    Arc::make_mut(&mut next.experience)[i] = Arc::new(entry);
                }
                outcome
            }
            (SectionName::Skills, NestedList::Technical | NestedList::Soft) => {
                let mut skills: Skills = (*next.skills).clone();
                let list = if nested == NestedList::Technical {
                    &mut skills.technical
                } else {
                    &mut skills.soft
                };
                let outcome = edit(list);
                if outcome.is_applied() {
                    next.skills = Arc::new(skills);
                }
                outcome
            }
            _ => Noop(NoopReason::WrongSectionShape),
        };
        self.finish(next, outcome)
    }

    fn finish(&self, next: Document, outcome: Outcome) -> Mutated {
        match outcome {
            Applied => Mutated {
                document: next,
                outcome,
            },
            Noop(reason) => self.rejected(reason),
        }
    }

    fn rejected(&self, reason: NoopReason) -> Mutated {
        Mutated {
            document: self.clone(),
            outcome: Noop(reason),
        }
    }
}

fn set_entry_field<T: Record + Clone>(
    entries: &mut Entries<T>,
    index: usize,
    field: &str,
    value: String,
) -> Outcome {
    let Some(current) = entries.get(index) else {
        return Noop(NoopReason::IndexOutOfBounds);
    };
    let mut entry = (**current).clone();
    if !entry.set_field(field, value) {
        return Noop(NoopReason::UnknownField);
    }
    Arc::make_mut(entries)[index] = Arc::new(entry);
    Applied
}

fn push_entry<T>(entries: &mut Entries<T>, value: T) {
    Arc::make_mut(entries).push(Arc::new(value));
}

fn remove_entry<T>(entries: &mut Entries<T>, index: usize) -> Outcome {
    if entries.len() <= 1 {
        return Noop(NoopReason::LastElement);
    }
    if index >= entries.len() {
        return Noop(NoopReason::IndexOutOfBounds);
    }
    Arc::make_mut(entries).remove(index);
    Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::{Education, Experience, Language};

    fn edu(degree: &str) -> Element {
        Element::Education(Education {
            degree: degree.to_string(),
            ..Education::default()
        })
    }

    fn degrees(doc: &Document) -> Vec<String> {
        doc.education.iter().map(|e| e.degree.clone()).collect()
    }

    #[test]
    fn test_update_contact_field() {
        let doc = Document::new();
        let m = doc.update_field(SectionName::Contact, "fullName", "Ada".to_string(), None);
        assert_eq!(m.outcome, Applied);
        assert_eq!(m.document.contact.full_name, "Ada");
        // The input snapshot is untouched.
        assert!(doc.contact.full_name.is_empty());
    }

    #[test]
    fn test_update_summary() {
        let doc = Document::new();
        let m = doc.update_field(SectionName::Summary, "summary", "Hi".to_string(), None);
        assert_eq!(&*m.document.summary, "Hi");
    }

    #[test]
    fn test_update_field_out_of_bounds_is_noop() {
        let doc = Document::new();
        let m = doc.update_field(SectionName::Education, "degree", "BSc".to_string(), Some(3));
        assert_eq!(m.outcome, Noop(NoopReason::IndexOutOfBounds));
        assert_eq!(m.document, doc);
        assert!(Arc::ptr_eq(&m.document.education, &doc.education));
    }

    #[test]
    fn test_update_field_unknown_field_is_noop() {
        let doc = Document::new();
        let m = doc.update_field(SectionName::Projects, "stars", "5".to_string(), Some(0));
        assert_eq!(m.outcome, Noop(NoopReason::UnknownField));
    }

    #[test]
    fn test_update_field_missing_index_on_array_section_is_noop() {
        let doc = Document::new();
        let m = doc.update_field(SectionName::Languages, "name", "French".to_string(), None);
        assert_eq!(m.outcome, Noop(NoopReason::WrongSectionShape));
    }

    #[test]
    fn test_update_field_shares_untouched_subtrees() {
        let doc = Document::new()
            .insert_element(SectionName::Education, edu("BSc"))
            .document;
        let m = doc.update_field(SectionName::Education, "degree", "MSc".to_string(), Some(0));
        assert!(Arc::ptr_eq(&m.document.contact, &doc.contact));
        assert!(Arc::ptr_eq(&m.document.experience, &doc.experience));
        assert!(Arc::ptr_eq(&m.document.skills, &doc.skills));
        // Sibling element in the touched section is shared too.
        assert!(Arc::ptr_eq(&m.document.education[1], &doc.education[1]));
        assert!(!Arc::ptr_eq(&m.document.education[0], &doc.education[0]));
    }

    #[test]
    fn test_insert_element_appends_in_order() {
        let doc = Document::new()
            .insert_element(SectionName::Education, edu("A"))
            .document
            .insert_element(SectionName::Education, edu("B"))
            .document;
        assert_eq!(degrees(&doc), vec!["", "A", "B"]);
    }

    #[test]
    fn test_insert_element_wrong_section_is_noop() {
        let doc = Document::new();
        let m = doc.insert_element(SectionName::Languages, edu("A"));
        assert_eq!(m.outcome, Noop(NoopReason::WrongSectionShape));
        assert_eq!(m.document.languages.len(), 1);
    }

    #[test]
    fn test_remove_last_element_is_rejected() {
        let doc = Document::new();
        for section in SectionName::ALL.into_iter().filter(|s| s.is_array()) {
            let m = doc.remove_element(section, 0);
            assert_eq!(m.outcome, Noop(NoopReason::LastElement), "{section:?}");
            assert_eq!(m.document.len_of(section), Some(1));
        }
    }

    #[test]
    fn test_remove_sequence_never_empties_section() {
        let mut doc = Document::new();
        for i in 0..4 {
            doc = doc
                .insert_element(SectionName::Languages, Element::Language(Language::default()))
                .document;
            assert_eq!(doc.languages.len(), i + 2);
        }
        for index in [0, 3, 0, 0, 0, 7, 0, 1] {
            doc = doc.remove_element(SectionName::Languages, index).document;
            assert!(!doc.languages.is_empty());
        }
        assert_eq!(doc.languages.len(), 1);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut doc = Document::new()
            .update_field(SectionName::Education, "degree", "A".to_string(), Some(0))
            .document;
        for d in ["B", "C", "D"] {
            doc = doc.insert_element(SectionName::Education, edu(d)).document;
        }
        doc = doc.insert_element(SectionName::Education, edu("E")).document;
        // Remove a non-adjacent element (not the one just inserted).
        doc = doc.remove_element(SectionName::Education, 1).document;
        assert_eq!(degrees(&doc), vec!["A", "C", "D", "E"]);
    }

    #[test]
    fn test_stale_index_after_removal_is_noop() {
        let doc = Document::new()
            .insert_element(SectionName::Education, edu("B"))
            .document
            .remove_element(SectionName::Education, 0)
            .document;
        let m = doc.update_field(SectionName::Education, "degree", "late".to_string(), Some(1));
        assert_eq!(m.outcome, Noop(NoopReason::IndexOutOfBounds));
        assert_eq!(degrees(&m.document), vec!["B"]);
    }

    #[test]
    fn test_remove_element_on_scalar_section_is_noop() {
        let doc = Document::new();
        let m = doc.remove_element(SectionName::Summary, 0);
        assert_eq!(m.outcome, Noop(NoopReason::WrongSectionShape));
    }

    #[test]
    fn test_nested_responsibilities_insert_update_remove() {
        let doc = Document::new();
        let doc = doc
            .insert_nested_element(
                SectionName::Experience,
                Some(0),
                NestedList::Responsibilities,
                "Shipped v2".to_string(),
            )
            .document;
        assert_eq!(doc.experience[0].responsibilities, vec!["", "Shipped v2"]);

        let doc = doc
            .update_nested_element(
                SectionName::Experience,
                Some(0),
                NestedList::Responsibilities,
                0,
                "Led team".to_string(),
            )
            .document;
        let doc = doc
            .remove_nested_element(SectionName::Experience, Some(0), NestedList::Responsibilities, 1)
            .document;
        assert_eq!(doc.experience[0].responsibilities, vec!["Led team"]);

        let m = doc.remove_nested_element(
            SectionName::Experience,
            Some(0),
            NestedList::Responsibilities,
            0,
        );
        assert_eq!(m.outcome, Noop(NoopReason::LastElement));
    }

    #[test]
    fn test_nested_on_missing_experience_is_noop() {
        let doc = Document::new();
        let m = doc.insert_nested_element(
            SectionName::Experience,
            Some(5),
            NestedList::Responsibilities,
            String::new(),
        );
        assert_eq!(m.outcome, Noop(NoopReason::IndexOutOfBounds));
    }

    #[test]
    fn test_nested_shape_mismatch_is_noop() {
        let doc = Document::new();
        let m = doc.insert_nested_element(
            SectionName::Education,
            Some(0),
            NestedList::Responsibilities,
            String::new(),
        );
        assert_eq!(m.outcome, Noop(NoopReason::WrongSectionShape));
        let m = doc.insert_nested_element(
            SectionName::Skills,
            None,
            NestedList::Responsibilities,
            String::new(),
        );
        assert_eq!(m.outcome, Noop(NoopReason::WrongSectionShape));
    }

    #[test]
    fn test_skills_lists_are_independent() {
        let doc = Document::new()
            .insert_nested_element(SectionName::Skills, None, NestedList::Soft, "Mentoring".into())
            .document;
        assert_eq!(doc.skills.soft, vec!["", "Mentoring"]);
        assert_eq!(doc.skills.technical, vec![""]);
    }

    #[test]
    fn test_update_field_on_skills_aliases_nested_update() {
        let doc = Document::new();
        let m = doc.update_field(SectionName::Skills, "technical", "Rust".to_string(), Some(0));
        assert_eq!(m.outcome, Applied);
        assert_eq!(m.document.skills.technical, vec!["Rust"]);
    }

    #[test]
    fn test_apply_dispatches_json_mutations() {
        let doc = Document::new();
        let mutation: Mutation = serde_json::from_value(serde_json::json!({
            "op": "insert_element",
            "section": "experience",
            "default_value": { "title": "Engineer", "company": "Acme" }
        }))
        .unwrap();
        let m = doc.apply(&mutation);
        assert_eq!(m.outcome, Applied);
        assert_eq!(m.document.experience.len(), 2);
        assert_eq!(
            *m.document.experience[1],
            Experience {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                ..Experience::default()
            }
        );
    }

    #[test]
    fn test_apply_insert_with_mismatched_default_is_noop() {
        let doc = Document::new();
        let mutation = Mutation::InsertElement {
            section: SectionName::Certificates,
            default_value: Some(serde_json::json!(["not", "an", "object"])),
        };
        assert_eq!(
            doc.apply(&mutation).outcome,
            Noop(NoopReason::WrongSectionShape)
        );
    }

    #[test]
    fn test_outcome_serializes_with_reason() {
        let json = serde_json::to_value(Noop(NoopReason::LastElement)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "noop", "reason": "last_element" })
        );
        let json = serde_json::to_value(Applied).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "applied" }));
    }
}
