use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for element IDs: fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for canvas elements.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern a string as an ElementId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}

// ─── Id sources ──────────────────────────────────────────────────────────

/// Hands out fresh element IDs. Injected into the editor instead of living
/// in a module-level counter, so tests can predict the sequence.
pub trait IdSource {
    fn next_id(&mut self, prefix: &str) -> ElementId;

    /// Make sure future IDs never collide with `id`, which already exists
    /// in a loaded document.
    fn reserve(&mut self, _id: ElementId) {}
}

/// Sequential `prefix_N` IDs, unique within one source. Skips IDs already used by a loaded document
/// only when told to via [`IdSource::reserve`].
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> ElementId {
        let n = self.counter;
        self.counter += 1;
        ElementId::intern(&format!("{prefix}_{n}"))
    }

    /// Only IDs following the `prefix_N` pattern can collide.
    fn reserve(&mut self, id: ElementId) {
        if let Some((_, n)) = id.as_str().rsplit_once('_')
            && let Ok(n) = n.parse::<u64>()
        {
            self.counter = self.counter.max(n.saturating_add(1));
        }
    }
}

/// `prefix_N` IDs drawn from one counter shared by the whole process, so
/// two canvases never hand out the same ID. The default for editors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessIds;

static PROCESS_COUNTER: AtomicU64 = AtomicU64::new(0);

impl IdSource for ProcessIds {
    fn next_id(&mut self, prefix: &str) -> ElementId {
        let n = PROCESS_COUNTER.fetch_add(1, Ordering::Relaxed);
        ElementId::intern(&format!("{prefix}_{n}"))
    }

    fn reserve(&mut self, id: ElementId) {
        if let Some((_, n)) = id.as_str().rsplit_once('_')
            && let Ok(n) = n.parse::<u64>()
        {
            PROCESS_COUNTER.fetch_max(n.saturating_add(1), Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("calendar_grid_1");
        let b = ElementId::intern("calendar_grid_1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "calendar_grid_1");
    }

    #[test]
    fn sequential_ids_are_unique() {
        let mut ids = SequentialIds::new();
        let a = ids.next_id("table");
        let b = ids.next_id("table");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "table_0");
    }

    #[test]
    fn process_ids_are_shared_between_sources() {
        let a = ProcessIds.next_id("table");
        let b = ProcessIds.next_id("table");
        assert_ne!(a, b);
    }

    #[test]
    fn process_ids_skip_reserved() {
        let mut ids = ProcessIds;
        ids.reserve(ElementId::intern("note_900000"));
        let n: u64 = ids.next_id("note").as_str()["note_".len()..].parse().unwrap();
        assert!(n > 900_000);
    }

    #[test]
    fn reserve_skips_loaded_ids() {
        let mut ids = SequentialIds::new();
        ids.reserve(ElementId::intern("note_41"));
        assert_eq!(ids.next_id("note").as_str(), "note_42");
    }
}
