use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::{NavError, NavResult};

use super::traits::PageRef;

pub type PageFactory = Arc<dyn Fn() -> BoxFuture<'static, NavResult<PageRef>> + Send + Sync>;

enum SubPageSlot {
    /// Cached registration whose single instance has not been built yet.
    Lazy(PageFactory),
    Cached(PageRef),
    Uncached(PageFactory),
}

pub(crate) enum InstanceSource {
    Cached(PageRef),
    Build { factory: PageFactory, cache: bool },
}

pub(crate) struct SubPageLookup {
    pub(crate) canonical: String,
    pub(crate) source: InstanceSource,
}

/// Canonical segment -> sub-page slot, plus alias -> canonical segment.
///
/// A segment is never both a canonical key and an alias of a different key;
/// `register` rejects registrations that would make recognition ambiguous.
#[derive(Default)]
pub(crate) struct SubPageTable {
    slots: HashMap<String, SubPageSlot>,
    aliases: HashMap<String, String>,
}

impl SubPageTable {
    pub(crate) fn register(
        &mut self,
        segments: &[&str],
        factory: PageFactory,
        cache: bool,
    ) -> NavResult<()> {
        let Some((canonical, aliases)) = segments.split_first() else {
            return Err(NavError::invalid_argument(
                "sub-page registration needs at least one segment",
            ));
        };

        if self
            .aliases
            .get(*canonical)
            .is_some_and(|target| target != canonical)
        {
            return Err(NavError::RegistrationConflict {
                segment: canonical.to_string(),
                existing: "alias",
            });
        }
        for alias in aliases.iter().filter(|alias| *alias != canonical) {
            if self.slots.contains_key(*alias) {
                return Err(NavError::RegistrationConflict {
                    segment: alias.to_string(),
                    existing: "canonical segment",
                });
            }
            if self
                .aliases
                .get(*alias)
                .is_some_and(|target| target != canonical)
            {
                return Err(NavError::RegistrationConflict {
                    segment: alias.to_string(),
                    existing: "alias",
                });
            }
        }

        let slot = if cache {
            SubPageSlot::Lazy(factory)
        } else {
            SubPageSlot::Uncached(factory)
        };
        self.slots.insert(canonical.to_string(), slot);
        for alias in aliases.iter().filter(|alias| *alias != canonical) {
            self.aliases.insert(alias.to_string(), canonical.to_string());
        }
        Ok(())
    }

    pub(crate) fn lookup(&self, segment: &str) -> Option<SubPageLookup> {
        let canonical = if self.slots.contains_key(segment) {
            segment
        } else {
            self.aliases.get(segment)?.as_str()
        };
        let source = match self.slots.get(canonical)? {
            SubPageSlot::Cached(instance) => InstanceSource::Cached(instance.clone()),
            SubPageSlot::Lazy(factory) => InstanceSource::Build {
                factory: Arc::clone(factory),
                cache: true,
            },
            SubPageSlot::Uncached(factory) => InstanceSource::Build {
                factory: Arc::clone(factory),
                cache: false,
            },
        };
        Some(SubPageLookup {
            canonical: canonical.to_string(),
            source,
        })
    }

    /// Records the instance built for a cached slot, dropping its factory.
    /// Returns the instance that now owns the slot.
    pub(crate) fn store_cached(&mut self, canonical: &str, instance: PageRef) -> PageRef {
        match self.slots.get_mut(canonical) {
            Some(SubPageSlot::Cached(existing)) => existing.clone(),
            Some(slot @ SubPageSlot::Lazy(_)) => {
                *slot = SubPageSlot::Cached(instance.clone());
                instance
            }
            Some(SubPageSlot::Uncached(_)) | None => instance,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, segment: &str) -> bool {
        self.lookup(segment)
            .is_some_and(|lookup| matches!(lookup.source, InstanceSource::Cached(_)))
    }
}
