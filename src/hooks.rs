//! Enrichment hooks: optional secondary fetches declared by name in a report spec.
//!
//! Hooks are registered explicitly under a lookup key at startup. A spec
//! variant names the key; older dotted names such as
//! `"TechTypeManager.get_tech_type_detail"` resolve by their final segment.
//! [`HookRegistry::validate`] turns a spec naming an unregistered hook into an
//! error before anything is rendered.
//!
//! Hooks run synchronously, once per element, in input order. Batching or
//! parallel fetches belong to the transport layer and are not attempted here.

use crate::element::MetadataElement;
use crate::error::{ReportError, ReportResult};
use crate::extract::ColumnValues;
use crate::spec::{ResolvedSpec, SpecRegistry};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Secondary data fetch for one element.
///
/// The returned map is merged into the element's columns: declared keys are
/// overwritten, new keys are appended. Errors abort the whole render.
pub trait EnrichmentHook: Send + Sync {
    fn enrich(
        &self,
        element: &MetadataElement,
        columns: &ColumnValues,
    ) -> anyhow::Result<Map<String, Value>>;
}

impl<F> EnrichmentHook for F
where
    F: Fn(&MetadataElement, &ColumnValues) -> anyhow::Result<Map<String, Value>> + Send + Sync,
{
    fn enrich(
        &self,
        element: &MetadataElement,
        columns: &ColumnValues,
    ) -> anyhow::Result<Map<String, Value>> {
        self(element, columns)
    }
}

/// Lookup key for a declared hook name: its final dotted segment
pub fn hook_key(declared: &str) -> &str {
    declared.rsplit('.').next().unwrap_or(declared).trim()
}

/// A hook together with the name it was resolved under
#[derive(Clone)]
pub struct NamedHook {
    pub name: String,
    pub hook: Arc<dyn EnrichmentHook>,
}

impl fmt::Debug for NamedHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedHook").field("name", &self.name).finish()
    }
}

/// Hooks available to report specs, keyed by lookup name
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn EnrichmentHook>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.names())
            .finish()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook object under `name` (dotted names are keyed by their last segment)
    pub fn register<H>(&mut self, name: &str, hook: H) -> &mut Self
    where
        H: EnrichmentHook + 'static,
    {
        self.register_arc(name, Arc::new(hook))
    }

    /// Register a closure or function
    pub fn register_fn<F>(&mut self, name: &str, hook: F) -> &mut Self
    where
        F: Fn(&MetadataElement, &ColumnValues) -> anyhow::Result<Map<String, Value>>
            + Send
            + Sync
            + 'static,
    {
        self.register_arc(name, Arc::new(hook))
    }

    pub fn register_arc(&mut self, name: &str, hook: Arc<dyn EnrichmentHook>) -> &mut Self {
        let key = hook_key(name).to_string();
        if self.hooks.insert(key.clone(), hook).is_some() {
            tracing::debug!("Replaced enrichment hook '{}'", key);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn EnrichmentHook>> {
        self.hooks.get(hook_key(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(hook_key(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hooks.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Check that every hook named by a registered spec is available
    pub fn validate(&self, specs: &SpecRegistry) -> ReportResult<()> {
        for spec in specs.specs() {
            for variant in &spec.formats {
                if let Some(hook) = &variant.enrichment_hook {
                    if !self.contains(hook) {
                        return Err(ReportError::MissingHook {
                            spec: spec.name.clone(),
                            hook: hook.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The hook a resolved spec variant declares, if any
    pub fn resolve(&self, resolved: &ResolvedSpec) -> ReportResult<Option<NamedHook>> {
        let Some(declared) = resolved.hook_name() else {
            return Ok(None);
        };
        let hook = self.get(declared).ok_or_else(|| ReportError::MissingHook {
            spec: resolved.spec().name.clone(),
            hook: declared.to_string(),
        })?;
        Ok(Some(NamedHook {
            name: hook_key(declared).to_string(),
            hook,
        }))
    }
}
