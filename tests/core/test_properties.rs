// Property-based tests for the query builder, response projector and local search

use crate::common::sample_services;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;
use vitrine::core::config::SearchConfig;
use vitrine::core::error::VitrineError;
use vitrine::core::registry::{artifact_registry, ActionRegistry, FieldRole};
use vitrine::core::search::{QueryBuilder, ResponseProjector};
use vitrine::core::services::Services;
use vitrine::core::types::{IndexQueryResult, Operator, RawDocument, SearchRequest};

const FACETS: [&str; 4] = ["site_name_s", "material_s", "period_s", "bag_id_s"];

fn builder() -> QueryBuilder {
    QueryBuilder::new(artifact_registry().unwrap(), SearchConfig::default())
}

fn projector() -> ResponseProjector {
    ResponseProjector::new(
        artifact_registry().unwrap(),
        Arc::new(ActionRegistry::artifact_catalog()),
    )
}

// One loaded collection shared by every generated search
static LOADED: Lazy<(Arc<Services>, TempDir, tokio::runtime::Runtime)> = Lazy::new(|| {
    let (services, temp) = sample_services();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    (services, temp, runtime)
});

/// Search box input mixing catalog words with parser keywords and comparators
fn free_text_strategy() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        4 => "[a-z]{1,8}",
        1 => Just("bronze".to_string()),
        1 => prop::sample::select(vec!["AND", "OR", "NOT", "IN"]).prop_map(str::to_string),
        1 => prop::sample::select(vec!["<", ">", "=", ">=", "<="]).prop_map(str::to_string),
        1 => "[a-z]{1,4}[<>=]{1,2}[a-z0-9]{0,3}",
        1 => "\"[a-z]{1,6} (AND|OR) [a-z]{1,6}\"",
    ];
    prop::collection::vec(token, 1..8).prop_map(|tokens| tokens.join(" "))
}

fn counts_strategy() -> impl Strategy<Value = Vec<(String, u64)>> {
    prop::collection::vec(("[a-z]{1,6}", 0u64..50), 0..30)
}

fn records_strategy() -> impl Strategy<Value = Vec<RawDocument>> {
    prop::collection::vec(
        (1u32..10_000, "[A-Z]{3}-[0-9]{4}", "[A-Za-z ]{0,12}"),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(id, title, site)| {
                let mut doc = RawDocument::new();
                doc.insert("id".to_string(), id.to_string().into());
                doc.insert("mmap_artifact_id_s".to_string(), title.into());
                doc.insert("site_name_s".to_string(), site.into());
                doc
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_start_follows_page_and_rows(page in 1usize..10_000, size_index in 0usize..4) {
        let per_page = SearchConfig::default().per_page_options[size_index];
        let request = SearchRequest::default().with_page(page).with_per_page(per_page);

        let query = builder().build(&request).unwrap();
        prop_assert_eq!(query.rows, per_page);
        prop_assert_eq!(query.start, (page - 1) * per_page);
        prop_assert_eq!(query.page(), page);
    }

    #[test]
    fn prop_only_allowed_page_sizes(per_page in 0usize..2_000) {
        let allowed = SearchConfig::default().per_page_options;
        let result = builder().build(&SearchRequest::default().with_per_page(per_page));

        if allowed.contains(&per_page) {
            prop_assert!(result.is_ok());
        } else {
            let is_page_size_error = matches!(result, Err(VitrineError::InvalidPageSize { .. }));
            prop_assert!(is_page_size_error);
        }
    }

    #[test]
    fn prop_non_facet_filter_rejected(field in "[a-z]{3,10}_[a-z]{1,2}", value in "[a-z]{1,8}") {
        let registry = artifact_registry().unwrap();
        prop_assume!(!registry.is_facetable(&field));

        let request = SearchRequest::default().with_filter(field.clone(), value);
        let result = builder().build(&request);
        let rejected = matches!(result, Err(VitrineError::UnknownFacetField(f)) if f == field);
        prop_assert!(rejected);
    }

    #[test]
    fn prop_filters_only_name_facets(
        picks in prop::collection::vec((0usize..FACETS.len(), "[A-Za-z ]{0,8}"), 0..8)
    ) {
        let mut request = SearchRequest::default();
        for (index, value) in &picks {
            request = request.with_filter(FACETS[*index], value.clone());
        }

        let registry = artifact_registry().unwrap();
        let query = builder().build(&request).unwrap();
        for clause in &query.filters {
            prop_assert!(registry.has_role(&clause.field, FieldRole::Facetable));
            prop_assert!(!clause.values.is_empty());
            prop_assert!(clause.values.iter().all(|v| !v.trim().is_empty()));
        }
    }

    #[test]
    fn prop_facet_values_bounded_and_ordered(counts in counts_strategy()) {
        let query = builder().build(&SearchRequest::default()).unwrap();
        let mut facet_counts = BTreeMap::new();
        facet_counts.insert("site_name_s".to_string(), counts.clone());
        let raw = IndexQueryResult {
            facet_counts,
            ..Default::default()
        };

        let facet = projector().facet_field(&query, &raw, "site_name_s");
        let limit = SearchConfig::default().default_facet_limit;
        prop_assert_eq!(facet.limit, Some(limit));
        prop_assert!(facet.values.len() <= limit);
        prop_assert!(facet.values.iter().all(|v| v.count >= query.facet_mincount));

        for pair in facet.values.windows(2) {
            let ordered = pair[0].count > pair[1].count
                || (pair[0].count == pair[1].count && pair[0].value <= pair[1].value);
            prop_assert!(ordered, "{:?} before {:?}", pair[0], pair[1]);
        }

        let eligible = counts.iter().filter(|(_, c)| *c >= query.facet_mincount).count();
        prop_assert_eq!(facet.has_more, eligible > limit);
    }

    #[test]
    fn prop_projection_is_deterministic(docs in records_strategy(), spelling in prop::collection::vec("[a-z]{2,6}", 0..8)) {
        let query = builder().build(&SearchRequest::new("bronze")).unwrap();
        let raw = IndexQueryResult {
            num_found: docs.len() as u64,
            docs,
            spelling,
            ..Default::default()
        };

        let projector = projector();
        let first = projector.project(&query, &raw).unwrap();
        let second = projector.project(&query, &raw).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.documents.len(), raw.docs.len());
        prop_assert!(first.spelling.len() <= SearchConfig::default().spell_max);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_free_text_always_searchable(text in free_text_strategy(), or in any::<bool>()) {
        let (services, _temp, runtime) = &*LOADED;
        let mut request = SearchRequest::new(text.clone());
        if or {
            request = request.with_operator(Operator::Or);
        }

        let result = runtime.block_on(services.catalog.search(&request));
        prop_assert!(result.is_ok(), "{:?} -> {:?}", text, result.err());
    }
}
