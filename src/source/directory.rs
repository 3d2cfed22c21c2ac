use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::source::wire::{SourceDiscovery, VideoSource};

const LABEL_MAX_CHARS: usize = 30;
const LABEL_HEAD_CHARS: usize = 3;
const LABEL_TAIL_CHARS: usize = 24;

#[derive(Debug, Default)]
struct Listing {
    sources: Vec<VideoSource>,
    // Name of the last resolved or selected source; `cycle_next` advances from here.
    cursor: Option<String>,
}

/// Last enumerated set of video sources, plus name resolution and UI cycling over it.
///
/// Shared between the host thread (listing, cycling) and the retry driver (refresh, resolve).
pub struct SourceDirectory {
    discovery: Arc<dyn SourceDiscovery>,
    listing: Mutex<Listing>,
}

impl std::fmt::Debug for SourceDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDirectory")
            .field("listing", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl SourceDirectory {
    /// Create an empty directory over `discovery`. Nothing is enumerated until [`refresh`].
    ///
    /// [`refresh`]: Self::refresh
    pub fn new(discovery: Arc<dyn SourceDiscovery>) -> Self {
        Self {
            discovery,
            listing: Mutex::new(Listing::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Listing> {
        self.listing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-enumerate and replace the listing wholesale. Returns the number of sources found.
    ///
    /// Discovery failures are logged and leave an empty listing.
    pub fn refresh(&self) -> usize {
        let found = self
            .discovery
            .refresh()
            .and_then(|()| self.discovery.current_sources());
        let sources = match found {
            Ok(sources) => sources,
            Err(err) => {
                tracing::error!(error = %err, "source enumeration failed");
                Vec::new()
            }
        };
        tracing::debug!(count = sources.len(), "refreshed video sources");
        for s in &sources {
            tracing::trace!(name = %s.name, "  source");
        }

        let mut listing = self.lock();
        listing.sources = sources;
        listing.sources.len()
    }

    /// Names from the last refresh, in enumeration order.
    pub fn names(&self) -> Vec<String> {
        self.lock().sources.iter().map(|s| s.name.clone()).collect()
    }

    /// Exact-name lookup in the last refreshed listing. Does not refresh.
    pub fn resolve(&self, name: &str) -> Option<VideoSource> {
        let mut listing = self.lock();
        let found = listing.sources.iter().find(|s| s.name == name).cloned()?;
        listing.cursor = Some(found.name.clone());
        Some(found)
    }

    /// Move the cycling cursor to `name`; an empty name clears it.
    pub fn select(&self, name: &str) {
        self.lock().cursor = (!name.is_empty()).then(|| name.to_string());
    }

    /// Next name after the cursor in enumeration order, wrapping around.
    ///
    /// An empty listing is refreshed once; `None` if it is still empty.
    pub fn cycle_next(&self) -> Option<String> {
        let empty = self.lock().sources.is_empty();
        if empty && self.refresh() == 0 {
            self.lock().cursor = None;
            return None;
        }

        let mut listing = self.lock();
        if listing.sources.is_empty() {
            listing.cursor = None;
            return None;
        }
        let next = match listing
            .cursor
            .as_deref()
            .and_then(|c| listing.sources.iter().position(|s| s.name == c))
        {
            Some(pos) => (pos + 1) % listing.sources.len(),
            None => 0,
        };
        let name = listing.sources[next].name.clone();
        listing.cursor = Some(name.clone());
        Some(name)
    }

    /// Close the underlying discovery capability.
    pub fn close(&self) {
        self.discovery.close();
    }
}

/// Short UI label for a source name.
///
/// Long names keep their first 3 and last 24 characters around an ellipsis.
pub fn display_label(name: &str) -> String {
    if name.is_empty() {
        return "No source".to_string();
    }
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= LABEL_MAX_CHARS {
        return name.to_string();
    }
    let head: String = chars[..LABEL_HEAD_CHARS].iter().collect();
    let tail: String = chars[chars.len() - LABEL_TAIL_CHARS..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
#[path = "../../tests/unit/source/directory.rs"]
mod tests;
