//! Remote project persistence seam.
//!
//! The store itself lives outside the editor. The editor only hands it a
//! [`Project`] built from `get_canvas_state`, and loads whatever it returns.

use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One saved canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Serialized canvas state, watermarks already stripped.
    pub canvas: Value,
    #[serde(default)]
    pub updated_at_ms: u64,
}

/// A key-value document store.
pub trait ProjectStore {
    fn get_by_id(&self, id: &str) -> EditorResult<Option<Project>>;
    fn save(&mut self, project: Project) -> EditorResult<()>;
}

/// In-process store, also used to simulate an unreachable backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: HashMap<String, Project>,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every request fails.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    fn check(&self) -> EditorResult<()> {
        if self.offline {
            return Err(EditorError::store("store is offline"));
        }
        Ok(())
    }
}

impl ProjectStore for MemoryStore {
    fn get_by_id(&self, id: &str) -> EditorResult<Option<Project>> {
        self.check()?;
        Ok(self.projects.get(id).cloned())
    }

    fn save(&mut self, project: Project) -> EditorResult<()> {
        self.check()?;
        self.projects.insert(project.id.clone(), project);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn project(id: &str) -> Project {
        Project {
            id: id.into(),
            name: "February".into(),
            canvas: json!({"width": 794, "height": 1123, "objects": []}),
            updated_at_ms: 1,
        }
    }

    #[test]
    fn save_then_get() {
        let mut store = MemoryStore::new();
        store.save(project("p1")).unwrap();
        assert_eq!(store.get_by_id("p1").unwrap(), Some(project("p1")));
        assert_eq!(store.get_by_id("missing").unwrap(), None);
    }

    #[test]
    fn offline_store_fails_every_request() {
        let mut store = MemoryStore::offline();
        assert!(matches!(store.save(project("p1")), Err(EditorError::Store(_))));
        assert!(store.get_by_id("p1").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn project_json_is_camel_case() {
        let v = serde_json::to_value(project("p2")).unwrap();
        assert_eq!(v["updatedAtMs"], 1);
    }
}
