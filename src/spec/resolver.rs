//! Spec resolution: pick exactly one spec variant for a render.
//!
//! Priority, first match wins:
//! 1. a named spec (registry lookup by name or alias)
//! 2. an inline spec object supplied by the caller
//! 3. the requested entity type
//! 4. the caller's fallback entity type
//! 5. the registry's Default spec
//!
//! A candidate only matches when it has a variant serving the requested format.
//! Missing the Default spec is a configuration error rather than a silent gap.

use super::registry::{SpecRegistry, DEFAULT_SPEC_NAME};
use super::{Column, FormatSpec, FormatVariant, OutputFormat};
use crate::error::{ReportError, ReportResult};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied report spec: a registry name or a spec object
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSpecRef {
    Named(String),
    Inline(FormatSpec),
}

impl From<&str> for ReportSpecRef {
    fn from(name: &str) -> Self {
        ReportSpecRef::Named(name.to_string())
    }
}

impl From<String> for ReportSpecRef {
    fn from(name: String) -> Self {
        ReportSpecRef::Named(name)
    }
}

impl From<FormatSpec> for ReportSpecRef {
    fn from(spec: FormatSpec) -> Self {
        ReportSpecRef::Inline(spec)
    }
}

/// Which resolution step produced the spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ResolutionSource {
    NamedSpec,
    InlineSpec,
    EntityType,
    FallbackType,
    Default,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolutionSource::NamedSpec => "named spec",
            ResolutionSource::InlineSpec => "inline spec",
            ResolutionSource::EntityType => "entity type",
            ResolutionSource::FallbackType => "fallback entity type",
            ResolutionSource::Default => "default spec",
        };
        f.write_str(label)
    }
}

/// A spec together with the variant chosen for one output format
#[derive(Debug, Clone)]
pub struct ResolvedSpec {
    spec: Arc<FormatSpec>,
    variant: usize,
    format: OutputFormat,
    source: ResolutionSource,
}

impl ResolvedSpec {
    fn try_new(
        spec: Arc<FormatSpec>,
        format: OutputFormat,
        source: ResolutionSource,
    ) -> Option<Self> {
        let variant = spec.variant_index(format)?;
        Some(Self {
            spec,
            variant,
            format,
            source,
        })
    }

    pub fn spec(&self) -> &FormatSpec {
        &self.spec
    }

    pub fn variant(&self) -> &FormatVariant {
        // variant index was validated when the resolution was built
        &self.spec.formats[self.variant]
    }

    /// The column template; renders copy it, never write to it
    pub fn columns(&self) -> &[Column] {
        &self.variant().columns
    }

    pub fn hook_name(&self) -> Option<&str> {
        self.variant().enrichment_hook.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn source(&self) -> ResolutionSource {
        self.source
    }

    /// True when nothing more specific than the Default spec matched
    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::Default
    }
}

/// Resolve the spec variant for a render
pub fn resolve(
    registry: &SpecRegistry,
    report_spec: Option<&ReportSpecRef>,
    entity_type: Option<&str>,
    fallback_type: Option<&str>,
    format: OutputFormat,
) -> ReportResult<ResolvedSpec> {
    match report_spec {
        Some(ReportSpecRef::Named(name)) => {
            match registry.get(name) {
                Some(spec) => {
                    if let Some(resolved) =
                        ResolvedSpec::try_new(spec, format, ResolutionSource::NamedSpec)
                    {
                        return Ok(resolved);
                    }
                    tracing::debug!("Report spec '{}' has no {} variant", name, format);
                }
                None => tracing::debug!("Report spec '{}' is not registered", name),
            }
        }
        Some(ReportSpecRef::Inline(spec)) => {
            if let Some(resolved) = ResolvedSpec::try_new(
                Arc::new(spec.clone()),
                format,
                ResolutionSource::InlineSpec,
            ) {
                return Ok(resolved);
            }
            tracing::debug!("Inline report spec '{}' has no {} variant", spec.name, format);
        }
        None => {}
    }

    let by_type = [
        (entity_type, ResolutionSource::EntityType),
        (fallback_type, ResolutionSource::FallbackType),
    ];
    for (candidate, source) in by_type {
        let Some(type_name) = candidate.filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        if let Some(spec) = registry.find_for_entity_type(type_name, format) {
            if let Some(resolved) = ResolvedSpec::try_new(spec, format, source) {
                return Ok(resolved);
            }
        }
        tracing::debug!("No {} report spec registered for type '{}'", format, type_name);
    }

    let default = registry
        .default_spec()
        .and_then(|spec| ResolvedSpec::try_new(spec, format, ResolutionSource::Default))
        .ok_or_else(|| ReportError::MissingDefaultSpec {
            format: format.to_string(),
        })?;

    if fallback_is_notable(report_spec, entity_type, default.spec()) {
        tracing::warn!(
            "Falling back to the {} report spec for {} output (requested spec: {:?}, entity type: {:?})",
            DEFAULT_SPEC_NAME,
            format,
            report_spec.map(spec_label),
            entity_type
        );
    } else {
        tracing::debug!("Using the {} report spec for {} output", DEFAULT_SPEC_NAME, format);
    }
    Ok(default)
}

/// A Default fallback is worth a warning only when the caller asked for
/// something the Default spec does not already stand for
fn fallback_is_notable(
    report_spec: Option<&ReportSpecRef>,
    entity_type: Option<&str>,
    default: &FormatSpec,
) -> bool {
    report_spec.is_some()
        || entity_type
            .map(str::trim)
            .is_some_and(|t| !t.is_empty() && !default.targets(t))
}

fn spec_label(spec: &ReportSpecRef) -> &str {
    match spec {
        ReportSpecRef::Named(name) => name,
        ReportSpecRef::Inline(spec) => &spec.name,
    }
}
