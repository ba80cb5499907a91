/// Catalog targets render through the generic pipeline only
use super::columns::{populate, ColumnValues};
use super::Extractor;
use crate::element::MetadataElement;

#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogTargetExtractor;

impl Extractor for CatalogTargetExtractor {
    fn name(&self) -> &'static str {
        "catalog_target"
    }

    fn extract(&self, element: &MetadataElement, columns: &mut ColumnValues) {
        populate(element, columns);
    }
}
