use super::{Column, FormatSpec, FormatVariant, DEFAULT_SPEC_NAME};

const TABULAR: &[&str] = &["TABLE", "LIST", "DICT", "HTML"];
const NARRATIVE: &[&str] = &["REPORT", "MD", "FORM", "MERMAID"];

fn col(key: &str, label: &str) -> Column {
    Column::labeled(key, label)
}

/// Spec set available in every registry built with `include_builtin`
pub(super) fn builtin_specs() -> Vec<FormatSpec> {
    vec![
        default_spec(),
        collections(),
        projects(),
        glossaries(),
        engine_actions(),
        tech_types(),
        governance_action_types(),
        governance_action_processes(),
        catalog_targets(),
    ]
}

fn default_spec() -> FormatSpec {
    FormatSpec::new(DEFAULT_SPEC_NAME, "Referenceable")
        .with_heading("Elements")
        .with_description("Columns rendered when no more specific spec applies")
        .with_variant(FormatVariant::new(&["ALL"]).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("type_name", "Type Name"),
            col("guid", "GUID"),
            col("description", "Description"),
        ]))
}

fn collections() -> FormatSpec {
    FormatSpec::new("Collections", "Collection")
        .with_alias("Collection")
        .with_alias("Folders")
        .with_heading("Collections")
        .with_family("Collection Manager")
        .with_variant(FormatVariant::new(TABULAR).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("category", "Category"),
            col("description", "Description").with_width(40),
            col("classifications", "Classifications"),
        ]))
        .with_variant(FormatVariant::new(NARRATIVE).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("category", "Category"),
            col("description", "Description"),
            col("classifications", "Classifications"),
            col("collection_members", "Members"),
            col("guid", "GUID"),
            col("mermaid", "Mermaid"),
        ]))
}

fn projects() -> FormatSpec {
    FormatSpec::new("Projects", "Project")
        .with_alias("Project")
        .with_heading("Projects")
        .with_family("Project Manager")
        .with_variant(FormatVariant::new(&["ALL"]).with_columns([
            col("display_name", "Display Name"),
            col("identifier", "Identifier"),
            col("project_status", "Status"),
            col("project_phase", "Phase"),
            col("start_date", "Start Date"),
            col("planned_end_date", "Planned End"),
            col("description", "Description"),
            col("assigned_actors", "Assigned Actors"),
        ]))
}

fn glossaries() -> FormatSpec {
    FormatSpec::new("Glossaries", "Glossary")
        .with_alias("Glossary")
        .with_heading("Glossaries")
        .with_family("Glossary Manager")
        .with_variant(FormatVariant::new(&["ALL"]).with_columns([
            col("display_name", "Glossary Name"),
            col("qualified_name", "Qualified Name"),
            col("language", "Language"),
            col("usage", "Usage"),
            col("description", "Description"),
            col("categories", "Categories"),
        ]))
}

fn engine_actions() -> FormatSpec {
    FormatSpec::new("Engine-Actions", "EngineAction")
        .with_alias("EngineAction")
        .with_heading("Engine Actions")
        .with_family("Automated Curation")
        .with_variant(FormatVariant::new(&["ALL"]).with_columns([
            col("display_name", "Display Name"),
            col("guid", "GUID"),
            col("action_status", "Status"),
            col("process_name", "Process Name"),
            col("request_type", "Request Type"),
            col("governance_engine_name", "Engine"),
            col("received_guards", "Received Guards"),
            col("completion_guards", "Completion Guards"),
            col("start_time", "Start Time"),
            col("completion_time", "Completion Time"),
        ]))
}

fn tech_types() -> FormatSpec {
    FormatSpec::new("Tech-Types", "TechnologyType")
        .with_alias("Technology-Types")
        .with_alias("TechnologyType")
        .with_heading("Technology Types")
        .with_family("Automated Curation")
        .with_variant(FormatVariant::new(&["TABLE", "LIST", "HTML"]).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("description", "Description").with_width(50),
        ]))
        .with_variant(FormatVariant::new(&["DICT"]).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("description", "Description"),
            col("catalog_templates_raw", "Catalog Templates"),
            col("governance_processes_raw", "Governance Processes"),
        ]))
        .with_variant(FormatVariant::new(NARRATIVE).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("guid", "GUID"),
            col("description", "Description"),
            col("catalog_templates", "Catalog Templates"),
            col("governance_processes", "Governance Processes"),
            col("external_references", "External References"),
            col("mermaid", "Mermaid"),
        ]))
}

fn governance_action_types() -> FormatSpec {
    FormatSpec::new("Governance-Action-Types", "GovernanceActionType")
        .with_alias("GovernanceActionType")
        .with_heading("Governance Action Types")
        .with_family("Automated Curation")
        .with_variant(FormatVariant::new(&["ALL"]).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("domain_identifier", "Domain"),
            col("process_status", "Status"),
            col("step_count", "Steps"),
            col("supported_request_parameters", "Request Parameters"),
            col("description", "Description"),
        ]))
}

fn governance_action_processes() -> FormatSpec {
    FormatSpec::new("Governance-Action-Processes", "GovernanceActionProcess")
        .with_alias("GovernanceActionProcess")
        .with_heading("Governance Action Processes")
        .with_family("Automated Curation")
        .with_variant(FormatVariant::new(TABULAR).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("process_status", "Status"),
            col("step_count", "Steps"),
            col("first_step", "First Step"),
        ]))
        .with_variant(FormatVariant::new(NARRATIVE).with_columns([
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("guid", "GUID"),
            col("process_status", "Status"),
            col("step_count", "Steps"),
            col("first_step", "First Step"),
            col("supported_request_parameters", "Request Parameters"),
            col("description", "Description"),
            col("mermaid", "Mermaid"),
        ]))
}

fn catalog_targets() -> FormatSpec {
    FormatSpec::new("Catalog-Targets", "CatalogTarget")
        .with_alias("CatalogTarget")
        .with_heading("Catalog Targets")
        .with_family("Automated Curation")
        .with_variant(FormatVariant::new(&["ALL"]).with_columns([
            col("catalog_target_name", "Catalog Target Name"),
            col("display_name", "Display Name"),
            col("qualified_name", "Qualified Name"),
            col("type_name", "Type Name"),
            col("connection_name", "Connection Name"),
            col("guid", "GUID"),
        ]))
}
