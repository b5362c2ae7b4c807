//! Compact-View Style Injection
//!
//! Compact density is realized by a single style block, identified by a fixed
//! marker id, that overrides the layout's CSS variables. The document is
//! reached through [`StyleHost`] so the injector can run against any host.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Marker id of the compact view style block
pub const COMPACT_VIEW_MARKER: &str = "compact-view-styles";

/// Density overrides applied while compact view is active
pub const COMPACT_VIEW_CSS: &str = ":root {
  --spacing-unit: 0.25rem;
  --font-size-base: 0.8125rem;
  --table-row-height: 2rem;
  --card-padding: 0.75rem;
  --sidebar-item-height: 2.25rem;
}
";

/// A document that can hold identified style blocks
pub trait StyleHost: Send {
    fn contains(&self, id: &str) -> bool;

    /// Append a style block. Callers check [`contains`](Self::contains) first.
    fn append_style(&mut self, id: &str, css: &str);

    /// Remove the element with `id`, returning whether one was present
    fn remove(&mut self, id: &str) -> bool;
}

/// In-process document holding style blocks by id
#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    styles: BTreeMap<String, String>,
    appended: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// CSS text of the block with `id`
    pub fn style(&self, id: &str) -> Option<&str> {
        self.styles.get(id).map(String::as_str)
    }

    /// Number of style blocks currently present
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// Total appends over the document's lifetime
    pub fn append_count(&self) -> usize {
        self.appended
    }
}

impl StyleHost for MemoryDocument {
    fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    fn append_style(&mut self, id: &str, css: &str) {
        self.styles.insert(id.to_string(), css.to_string());
        self.appended += 1;
    }

    fn remove(&mut self, id: &str) -> bool {
        self.styles.remove(id).is_some()
    }
}

/// Idempotent style acquisition keyed by marker id
///
/// The registry serializes check-then-append on one host, so concurrent
/// callers can never leave two blocks with the same id.
pub struct StyleRegistry<H: StyleHost> {
    host: Arc<Mutex<H>>,
}

impl<H: StyleHost> Clone for StyleRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
        }
    }
}

impl<H: StyleHost> StyleRegistry<H> {
    pub fn new(host: H) -> Self {
        Self {
            host: Arc::new(Mutex::new(host)),
        }
    }

    /// Inject `css` under `id` unless a block with that id exists
    ///
    /// Returns true when a new block was appended.
    pub fn ensure(&self, id: &str, css: &str) -> bool {
        let mut host = match self.host.lock() {
            Ok(host) => host,
            Err(poisoned) => poisoned.into_inner(),
        };
        if host.contains(id) {
            return false;
        }
        host.append_style(id, css);
        tracing::debug!(id, "Style block injected");
        true
    }

    /// Remove the block with `id`, returning whether one was present
    pub fn release(&self, id: &str) -> bool {
        let mut host = match self.host.lock() {
            Ok(host) => host,
            Err(poisoned) => poisoned.into_inner(),
        };
        let removed = host.remove(id);
        if removed {
            tracing::debug!(id, "Style block removed");
        }
        removed
    }

    pub fn is_active(&self, id: &str) -> bool {
        match self.host.lock() {
            Ok(host) => host.contains(id),
            Err(poisoned) => poisoned.into_inner().contains(id),
        }
    }

    /// Run `f` with the host borrowed
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        match self.host.lock() {
            Ok(host) => f(&*host),
            Err(poisoned) => f(&*poisoned.into_inner()),
        }
    }
}

/// Compact view toggle
pub struct CompactView<H: StyleHost> {
    registry: StyleRegistry<H>,
}

impl<H: StyleHost> CompactView<H> {
    pub fn new(registry: StyleRegistry<H>) -> Self {
        Self { registry }
    }

    /// Inject the compact density block; no-op when already active
    pub fn enable(&self) {
        self.registry.ensure(COMPACT_VIEW_MARKER, COMPACT_VIEW_CSS);
    }

    /// Remove the compact density block; no-op when inactive
    pub fn disable(&self) {
        self.registry.release(COMPACT_VIEW_MARKER);
    }

    /// Match the stored `compactView` preference
    pub fn sync(&self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.registry.is_active(COMPACT_VIEW_MARKER)
    }
}
