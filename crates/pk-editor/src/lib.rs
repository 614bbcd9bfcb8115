pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod factory;
pub mod history;
pub mod identity;
pub mod persistence;
pub mod rebuild;
pub mod scene;
pub mod snapshot;

pub use config::EditorConfig;
pub use context::{Clock, EditorContext, ManualClock, SystemClock};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use history::{History, HistoryEntry};
pub use persistence::{MemoryStore, Project, ProjectStore};
pub use scene::{SceneGraph, SceneObject};
