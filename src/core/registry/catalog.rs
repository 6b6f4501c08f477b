//! Embedded artifact catalog.
//!
//! The field set of the archaeological artifact collection: one
//! catch-all search field, 21 per-field searches, 14 limited facets,
//! 16 result-list fields, 48 record fields and 3 sort options.

use super::field::{FieldDefinition, FieldRegistry, FieldRole};
use crate::core::error::{Result, VitrineError};
use once_cell::sync::Lazy;
use std::sync::Arc;

const SEARCH: FieldRole = FieldRole::Searchable;
const FACET: FieldRole = FieldRole::Facetable;
const INDEX: FieldRole = FieldRole::IndexDisplayed;
const SHOW: FieldRole = FieldRole::ShowDisplayed;

/// (name, label, roles) in display order
const CATALOG_FIELDS: &[(&str, &str, &[FieldRole])] = &[
    ("text", "Any field", &[SEARCH]),
    ("id", "Id", &[INDEX]),
    ("mmap_artifact_id_s", "Artifact Id", &[SEARCH, INDEX, SHOW]),
    ("site_name_s", "Site Name", &[SEARCH, FACET, INDEX, SHOW]),
    ("date_discovered_s", "Date Discovered", &[SEARCH, FACET, SHOW]),
    ("bag_id_s", "Bag Id", &[SEARCH, FACET, INDEX, SHOW]),
    ("artifact_condition_s", "Artifact Condition", &[SEARCH, SHOW]),
    ("artifact_class_s", "Artifact Class", &[SEARCH, FACET, INDEX, SHOW]),
    ("maximum_dimension_s", "Maximum Dimension", &[SEARCH, INDEX, SHOW]),
    ("weight_s", "Weight", &[SEARCH, INDEX, SHOW]),
    ("count_s", "Count", &[SEARCH, INDEX, SHOW]),
    ("burial_no_s", "Burial No", &[SEARCH, INDEX, SHOW]),
    ("period_s", "Period", &[SEARCH, FACET, INDEX, SHOW]),
    ("material_s", "Material", &[SEARCH, FACET, INDEX, SHOW]),
    ("comments_s", "Comments", &[SEARCH, SHOW]),
    ("bur_phase_s", "Bur Phase", &[SEARCH, FACET, SHOW]),
    ("level_s", "Level", &[SEARCH, FACET, INDEX, SHOW]),
    ("depcontext_s", "Depcontext", &[SEARCH, SHOW]),
    ("square_s", "Square", &[SEARCH, FACET, INDEX, SHOW]),
    ("quad_s", "Quad", &[SEARCH, FACET, INDEX, SHOW]),
    ("layer_s", "Layer", &[SEARCH, FACET, INDEX, SHOW]),
    ("feano_s", "Feano", &[SEARCH, FACET, INDEX, SHOW]),
    ("featype_s", "Featype", &[SEARCH, FACET, SHOW]),
    ("burassoc_s", "Burassoc", &[SHOW]),
    ("blocation_s", "Blocation", &[SHOW]),
    ("bodypart_s", "Bodypart", &[SHOW]),
    ("sherd_sample?_s", "Sherd Sample?", &[SHOW]),
    ("sherd_samp_location_s", "Sherd Sample Location", &[SHOW]),
    ("thin_section_s", "Thin Section", &[SHOW]),
    ("ts_location_s", "Ts Location", &[SHOW]),
    ("ts_no_s", "Ts No", &[SHOW]),
    ("met_sample_s", "Metal Sample", &[SHOW]),
    ("met_samp_loc_s", "Metal Sample Location", &[SHOW]),
    ("sample_comment_s", "Sample Comment", &[SHOW]),
    ("artloc_s", "Artloc", &[SHOW]),
    ("conserved_s", "Conserved", &[SHOW]),
    ("glass_sample_s", "Glass Sample", &[SHOW]),
    ("gl_samp_s", "Glass Sample No", &[SHOW]),
    ("gl_tech_s", "Gl Tech", &[SHOW]),
    ("gl_analy_date_s", "Gl Analy Date", &[SHOW]),
    ("entered_by_s", "Entered By", &[SHOW]),
    ("initial_date_s", "Initial Date", &[SHOW]),
    ("date_last_modified_s", "Date Last Modified", &[SHOW]),
    ("txtimagename1_s", "Txtimagename1", &[SHOW]),
    ("txtimagename2_s", "Txtimagename2", &[SHOW]),
    ("txtimagename3_s", "Txtimagename3", &[SHOW]),
    ("txtimagename4_s", "Txtimagename4", &[SHOW]),
    ("txtimagename5_s", "Txtimagename5", &[SHOW]),
    ("txtdrawingname_s", "Txtdrawingname", &[SHOW]),
    ("flag_for_check_s", "Flag For Check", &[FACET, SHOW]),
];

/// (field, sort menu label)
const CATALOG_SORTS: &[(&str, &str)] = &[
    ("site_name_s", "Site"),
    ("bag_id_s", "Bag ID"),
    ("mmap_artifact_id_s", "Artifact ID"),
];

static ARTIFACT_CATALOG: Lazy<std::result::Result<Arc<FieldRegistry>, String>> =
    Lazy::new(|| build_artifact_registry().map(Arc::new).map_err(|e| e.to_string()));

/// Shared artifact catalog registry
pub fn artifact_registry() -> Result<Arc<FieldRegistry>> {
    ARTIFACT_CATALOG
        .as_ref()
        .map(Arc::clone)
        .map_err(|e| VitrineError::ConfigError(format!("Embedded catalog is invalid: {e}")))
}

fn build_artifact_registry() -> Result<FieldRegistry> {
    let mut builder = FieldRegistry::builder()
        .title_field("mmap_artifact_id_s")
        .thumbnail_field(Some("THUMBNAIL_s".to_string()))
        .id_field("id")
        .default_search_field("text")
        .sort_order(CATALOG_SORTS.iter().map(|(name, _)| *name));

    for (name, label, roles) in CATALOG_FIELDS {
        let mut field = FieldDefinition::new(*name, *label);
        for role in *roles {
            field = field.with_role(*role);
        }
        if field.has_role(FieldRole::Facetable) {
            field.facet_limited = true;
        }
        if let Some((_, sort_label)) = CATALOG_SORTS.iter().find(|(f, _)| f == name) {
            field = field.sortable(*sort_label);
        }
        builder.register(field)?;
    }

    builder.build()
}
