//! Collaborators injected into the editor.
//!
//! The holiday provider, ID generator, clock and image cache are passed in
//! explicitly instead of living in module-level state, so a test can pin
//! every one of them.

use chrono::NaiveDate;
use pk_core::{BuildContext, HolidayProvider, IdSource, ImageCache, NoHolidays, ProcessIds};
use std::cell::Cell;
use std::rc::Rc;

// ─── Clocks ──────────────────────────────────────────────────────────────

/// Millisecond time source driving the history debounce.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ─── Editor context ──────────────────────────────────────────────────────

pub struct EditorContext {
    pub holidays: Box<dyn HolidayProvider>,
    pub ids: Box<dyn IdSource>,
    pub clock: Box<dyn Clock>,
    pub images: ImageCache,
    /// Highlighted as "today" by date-aware builders. Set by the host.
    pub today: Option<NaiveDate>,
}

impl EditorContext {
    /// No holidays, process-wide IDs, wall-clock time.
    pub fn new() -> Self {
        Self {
            holidays: Box::new(NoHolidays),
            ids: Box::new(ProcessIds),
            clock: Box::new(SystemClock),
            images: ImageCache::new(),
            today: None,
        }
    }

    pub fn with_holidays(mut self, holidays: impl HolidayProvider + 'static) -> Self {
        self.holidays = Box::new(holidays);
        self
    }

    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_today(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    /// What builders get to see.
    pub fn build_context(&self) -> BuildContext<'_> {
        BuildContext::new(self.holidays.as_ref())
            .with_today(self.today)
            .with_images(&self.images)
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorContext")
            .field("images", &self.images.len())
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}
