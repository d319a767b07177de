//! Navigation capability.

use std::sync::RwLock;

/// Options for a single navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub fn push() -> Self {
        Self { replace: false }
    }

    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// Access to the visible location and the ability to move it.
///
/// Implementations without a visible location return `None` from
/// [`current_path`](Navigator::current_path); callers then skip any
/// location-dependent redirect.
pub trait Navigator: Send + Sync {
    /// Path of the current location, if one is visible.
    fn current_path(&self) -> Option<String>;

    /// Move to `path`.
    fn navigate(&self, path: &str, options: NavigateOptions);
}

/// Navigator for contexts with no visible location, such as a server process.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedNavigator;

impl Navigator for DetachedNavigator {
    fn current_path(&self) -> Option<String> {
        None
    }

    fn navigate(&self, path: &str, _options: NavigateOptions) {
        tracing::debug!(path, "navigation ignored: no visible location");
    }
}

/// A navigation issued through a [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub replace: bool,
}

#[derive(Debug)]
struct HistoryInner {
    entries: Vec<String>,
    log: Vec<Navigation>,
}

/// In-memory history stack.
///
/// Replace navigations overwrite the top entry, so they never grow the
/// stack. Every navigation is also recorded in order.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: RwLock<HistoryInner>,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial_path`.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(HistoryInner {
                entries: vec![initial_path.into()],
                log: Vec::new(),
            }),
        }
    }

    /// All history entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|h| h.entries.clone())
            .unwrap_or_default()
    }

    /// Every navigation issued so far, in order.
    pub fn navigations(&self) -> Vec<Navigation> {
        self.inner
            .read()
            .map(|h| h.log.clone())
            .unwrap_or_default()
    }

    /// Number of navigations to `path`.
    pub fn navigations_to(&self, path: &str) -> usize {
        self.inner
            .read()
            .map(|h| h.log.iter().filter(|n| n.path == path).count())
            .unwrap_or(0)
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryHistory {
    fn current_path(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|h| h.entries.last().cloned())
    }

    fn navigate(&self, path: &str, options: NavigateOptions) {
        let Ok(mut history) = self.inner.write() else {
            tracing::warn!(path, "history lock poisoned, navigation dropped");
            return;
        };
        if options.replace {
            history.entries.pop();
        }
        history.entries.push(path.to_string());
        history.log.push(Navigation {
            path: path.to_string(),
            replace: options.replace,
        });
    }
}
