//! In-memory editing sessions.
//!
//! A session exclusively owns its Document. Mutations for one session are
//! serialized by the session's lock, which is only held for the synchronous
//! mutate-and-project step and never across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::document::{Document, Mutated, Mutation};
use crate::export::ExportControl;
use crate::preview::{mount, project, Node, RenderTree};

#[derive(Debug, Default)]
struct Editor {
    document: Document,
    /// The mounted preview surface, if the editor has opened the preview.
    surface: Option<Arc<Node>>,
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    editor: Mutex<Editor>,
    export: Arc<ExportControl>,
}

/// Serializable view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub document: Document,
    pub preview_mounted: bool,
    pub export_enabled: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            editor: Mutex::new(Editor::default()),
            export: Arc::new(ExportControl::new()),
        }
    }

    fn editor(&self) -> MutexGuard<'_, Editor> {
        // A panic while holding the lock cannot leave a half-applied mutation:
        // the document is only ever replaced wholesale.
        self.editor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies one mutation. When the preview is mounted and the mutation
    /// applied, the surface is re-projected and re-mounted.
    pub fn apply(&self, mutation: &Mutation) -> Mutated {
        let mut editor = self.editor();
        let result = editor.document.apply(mutation);
        if result.outcome.is_applied() {
            editor.document = result.document.clone();
            if editor.surface.is_some() {
                editor.surface = Some(Arc::new(mount(&project(&editor.document))));
            }
        } else {
            debug!(session_id = %self.id, outcome = ?result.outcome, "Mutation ignored");
        }
        result
    }

    /// Projects the latest snapshot and mounts it as the preview surface.
    pub fn mount_preview(&self) -> RenderTree {
        let mut editor = self.editor();
        let tree = project(&editor.document);
        editor.surface = Some(Arc::new(mount(&tree)));
        tree
    }

    /// Returns `true` if a surface was mounted.
    pub fn unmount_preview(&self) -> bool {
        self.editor().surface.take().is_some()
    }

    pub fn surface(&self) -> Option<Arc<Node>> {
        self.editor().surface.clone()
    }

    pub fn export_control(&self) -> &Arc<ExportControl> {
        &self.export
    }

    /// Surface and owner name taken under one lock, so an export sees a consistent pair.
    pub fn export_input(&self) -> (Option<Arc<Node>>, Option<String>) {
        let editor = self.editor();
        (
            editor.surface.clone(),
            editor.document.owner_name().map(str::to_string),
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let editor = self.editor();
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            document: editor.document.clone(),
            preview_mounted: editor.surface.is_some(),
            export_enabled: self.export.is_enabled(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// All live sessions, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        self.write().insert(session.id, Arc::clone(&session));
        info!(session_id = %session.id, "Session created");
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.read().get(&id).cloned()
    }

    /// Ends a session; its Document is dropped with the last reference.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.write().remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, Arc<Session>>> {
        self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Arc<Session>>> {
        self.sessions.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NoopReason, Outcome, SectionName};

    fn set_name(name: &str) -> Mutation {
        Mutation::UpdateField {
            section: SectionName::Contact,
            field: "fullName".to_string(),
            value: name.to_string(),
            index: None,
        }
    }

    #[test]
    fn test_new_session_starts_with_default_document() {
        let session = Session::new();
        assert_eq!(session.snapshot().document, Document::new());
        assert!(session.surface().is_none());
        assert!(session.export_control().is_enabled());
    }

    #[test]
    fn test_apply_updates_latest_snapshot() {
        let session = Session::new();
        let result = session.apply(&set_name("Ada"));
        assert_eq!(result.outcome, Outcome::Applied);
        assert_eq!(session.snapshot().document.contact.full_name, "Ada");
    }

    #[test]
    fn test_noop_keeps_snapshot() {
        let session = Session::new();
        let before = session.snapshot().document;
        let result = session.apply(&Mutation::RemoveElement {
            section: SectionName::Education,
            index: 0,
        });
        assert_eq!(result.outcome, Outcome::Noop(NoopReason::LastElement));
        assert_eq!(session.snapshot().document, before);
    }

    #[test]
    fn test_mounted_preview_follows_mutations() {
        let session = Session::new();
        assert!(session.mount_preview().root.children.is_empty());
        session.apply(&set_name("Ada"));
        let surface = session.surface().unwrap();
        assert!(surface.plain_text().contains("Ada"));

        assert!(session.unmount_preview());
        session.apply(&set_name("Grace"));
        assert!(session.surface().is_none());
        assert!(!session.unmount_preview());
    }

    #[test]
    fn test_export_input_pairs_surface_and_owner() {
        let session = Session::new();
        session.apply(&set_name("  Ada "));
        let (surface, owner) = session.export_input();
        assert!(surface.is_none());
        assert_eq!(owner.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_store_create_get_remove() {
        let store = SessionStore::new();
        let session = store.create();
        assert_eq!(store.len(), 1);
        assert!(Arc::ptr_eq(&store.get(session.id).unwrap(), &session));
        assert!(store.remove(session.id));
        assert!(store.get(session.id).is_none());
        assert!(!store.remove(session.id));
    }
}
