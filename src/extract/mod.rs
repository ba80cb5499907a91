//! Column extraction: the generic populator, per-entity extractors and the
//! relationship augmenter.

pub mod catalog_target;
pub mod columns;
pub mod engine_action;
pub mod governance_action;
pub mod parameters;
pub mod relationships;
pub mod technology_type;

pub use catalog_target::CatalogTargetExtractor;
pub use columns::{populate, value_text, ColumnValue, ColumnValues};
pub use engine_action::EngineActionExtractor;
pub use governance_action::GovernanceActionExtractor;
pub use relationships::{augment, join_related_names, related_name, DIAGRAM_COLUMN};
pub use technology_type::TechnologyTypeExtractor;

use crate::element::{fold_name, MetadataElement};

/// Layers entity-specific fields onto an element's columns.
///
/// Implementations are tolerant: missing nested data leaves a column unset
/// (or empty), it never fails.
pub trait Extractor: Send + Sync {
    /// Short name used in log events
    fn name(&self) -> &'static str;

    /// Bind columns for one element; runs the generic populator as part of it
    fn extract(&self, element: &MetadataElement, columns: &mut ColumnValues);
}

/// Extractor for entity kinds without specific fields
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExtractor;

impl Extractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, element: &MetadataElement, columns: &mut ColumnValues) {
        populate(element, columns);
    }
}

/// Entity kinds with a dedicated extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    TechnologyType,
    EngineAction,
    GovernanceAction,
    CatalogTarget,
    Generic,
}

impl EntityKind {
    /// Classify a type name or report-spec style label
    pub fn from_type_name(name: &str) -> Self {
        match fold_name(name).as_str() {
            "technologytype" | "technologytypes" | "techtype" | "techtypes"
            | "validtechnologytype" => EntityKind::TechnologyType,
            "engineaction" | "engineactions" => EntityKind::EngineAction,
            "governanceactiontype"
            | "governanceactiontypes"
            | "governanceactionprocess"
            | "governanceactionprocesses"
            | "governanceactionprocessstep" => EntityKind::GovernanceAction,
            "catalogtarget" | "catalogtargets" => EntityKind::CatalogTarget,
            _ => EntityKind::Generic,
        }
    }

    pub fn extractor(self) -> &'static dyn Extractor {
        match self {
            EntityKind::TechnologyType => &TechnologyTypeExtractor,
            EntityKind::EngineAction => &EngineActionExtractor,
            EntityKind::GovernanceAction => &GovernanceActionExtractor,
            EntityKind::CatalogTarget => &CatalogTargetExtractor,
            EntityKind::Generic => &GenericExtractor,
        }
    }
}

/// Pick the extractor for an element.
///
/// The caller's entity type decides when it names a known kind; otherwise the
/// element's own type name does.
pub fn extractor_for(entity_type: &str, element: &MetadataElement) -> &'static dyn Extractor {
    let requested = EntityKind::from_type_name(entity_type);
    let kind = if requested == EntityKind::Generic {
        element
            .type_name()
            .map(EntityKind::from_type_name)
            .unwrap_or(EntityKind::Generic)
    } else {
        requested
    };
    kind.extractor()
}
