// Integration tests for catalog search over a local collection

use crate::common::{
    assert_valid_stats, create_test_services, create_test_services_with, ingest_export,
    sample_services, ArtifactExport,
};
use vitrine::core::error::VitrineError;
use vitrine::core::registry::ActionKind;
use vitrine::core::types::{Operator, SearchRequest, SortClause, SortDirection, SortRequest};

#[tokio::test]
async fn test_browse_everything() {
    let (services, _temp) = create_test_services();
    let stats = ingest_export(&services, &ArtifactExport::sample());
    assert_valid_stats(&stats, 12);

    let response = services
        .catalog
        .search(&SearchRequest::default())
        .await
        .expect("Search failed");

    assert_eq!(response.query, "");
    assert_eq!(response.total, 12);
    assert_eq!(response.documents.len(), 12);
    assert_eq!(response.page.total_pages, 1);
    assert_eq!(
        response.sort,
        SortClause::Field {
            field: "site_name_s".to_string(),
            direction: SortDirection::Asc,
        }
    );
    let sites: Vec<&str> = response
        .documents
        .iter()
        .filter_map(|d| d.field("site_name_s"))
        .map(|f| f.values[0].as_str())
        .collect();
    assert_eq!(sites.len(), 12);
    assert!(sites.windows(2).all(|w| w[0] <= w[1]), "{sites:?}");
    assert!(response.spelling.is_empty());
    assert!(response.tools.contains(&ActionKind::SortWidget));

    let sites = response.facet("site_name_s").expect("site facet");
    assert_eq!(sites.label, "Site Name");
    assert_eq!(sites.values.len(), 8);
    assert_eq!(sites.values[0].value, "Megiddo");
    assert_eq!(sites.values[0].count, 3);
    assert!(!sites.has_more);
}

#[tokio::test]
async fn test_megiddo_filter() {
    let (services, _temp) = sample_services();
    let request = SearchRequest::default().with_filter("site_name_s", "Megiddo");
    let response = services.catalog.search(&request).await.expect("Search failed");

    assert_eq!(response.total, 3);
    for doc in &response.documents {
        assert_eq!(doc.field("site_name_s").unwrap().values, vec!["Megiddo"]);
    }

    let sites = response.facet("site_name_s").unwrap();
    assert_eq!(sites.values.len(), 1);
    assert!(sites.values[0].selected);

    let materials = response.facet("material_s").unwrap();
    let names: Vec<&str> = materials.values.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(names, vec!["bronze", "ceramic", "glass"]);
    assert!(materials.values.iter().all(|v| !v.selected));
}

#[tokio::test]
async fn test_site_facet_over_limit_then_expanded() {
    let (services, _temp) = create_test_services();
    ingest_export(&services, &ArtifactExport::many_sites(12));

    let response = services
        .catalog
        .search(&SearchRequest::default())
        .await
        .expect("Search failed");
    let sites = response.facet("site_name_s").unwrap();
    assert_eq!(sites.values.len(), 10);
    assert_eq!(sites.limit, Some(10));
    assert!(sites.has_more);
    assert_eq!(sites.values[0].value, "Megiddo");
    assert_eq!(sites.values[0].count, 2);
    // Ties ordered by value
    assert_eq!(sites.values[1].value, "Site 00");

    let expanded = services
        .catalog
        .facet(&SearchRequest::default(), "site_name_s")
        .await
        .expect("Facet failed");
    assert_eq!(expanded.values.len(), 13);
    assert_eq!(expanded.limit, Some(100));
    assert!(!expanded.has_more);
}

#[tokio::test]
async fn test_filters_or_within_and_across_fields() {
    let (services, _temp) = sample_services();

    let request = SearchRequest::default()
        .with_filter("site_name_s", "Megiddo")
        .with_filter("site_name_s", "Hazor");
    let response = services.catalog.search(&request).await.unwrap();
    assert_eq!(response.total, 5);

    let request = request.with_filter("material_s", "bronze");
    let response = services.catalog.search(&request).await.unwrap();
    assert_eq!(response.total, 2);
}

#[tokio::test]
async fn test_operator() {
    let (services, _temp) = sample_services();

    let and = services
        .catalog
        .search(&SearchRequest::new("bronze bead"))
        .await
        .unwrap();
    assert_eq!(and.total, 1);
    assert_eq!(and.documents[0].title, "MEG-0001");

    let or = services
        .catalog
        .search(&SearchRequest::new("bronze bead").with_operator(Operator::Or))
        .await
        .unwrap();
    // "Late Bronze" periods match too
    assert_eq!(or.total, 7);
    assert_eq!(or.documents[0].title, "MEG-0001");
}

#[tokio::test]
async fn test_operator_words_and_comparators_in_free_text() {
    let (services, _temp) = sample_services();
    let bronze = services
        .catalog
        .search(&SearchRequest::new("bronze"))
        .await
        .unwrap()
        .total;

    for text in ["bronze OR", "bronze AND", "AND bronze", "bronze NOT", "bronze >"] {
        let response = services
            .catalog
            .search(&SearchRequest::new(text))
            .await
            .unwrap_or_else(|e| panic!("{text:?} failed: {e}"));
        assert_eq!(response.total, bronze, "{text:?}");
    }

    for text in ["OR", "NOT", "IN", "x > y", "<", "a = b", "objects IN situ"] {
        let result = services.catalog.search(&SearchRequest::new(text)).await;
        assert!(result.is_ok(), "{text:?}: {result:?}");
    }

    // Kept as an operator between two terms
    let either = services
        .catalog
        .search(&SearchRequest::new("bronze OR glass"))
        .await
        .unwrap();
    assert!(either.total > bronze);
}

#[tokio::test]
async fn test_search_single_field() {
    let (services, _temp) = sample_services();

    // "Late Bronze" periods do not match a material search
    let request = SearchRequest::new("bronze").with_search_field("material_s");
    let response = services.catalog.search(&request).await.unwrap();
    assert_eq!(response.total, 3);

    let request = SearchRequest::new("x").with_search_field("burassoc_s");
    assert!(matches!(
        services.catalog.search(&request).await,
        Err(VitrineError::UnknownSearchField(_))
    ));
}

#[tokio::test]
async fn test_sort_and_pagination() {
    let (services, _temp) = sample_services();

    let request = SearchRequest::default().with_sort(SortRequest::desc("bag_id_s"));
    let response = services.catalog.search(&request).await.unwrap();
    assert_eq!(response.documents[0].id, "12");
    assert_eq!(
        response.sort,
        SortClause::Field {
            field: "bag_id_s".to_string(),
            direction: SortDirection::Desc,
        }
    );

    let page_two = SearchRequest::default().with_page(2);
    let response = services.catalog.search(&page_two).await.unwrap();
    assert_eq!(response.total, 12);
    assert!(response.documents.is_empty());
    assert_eq!(response.page.offset, 80);

    let request = SearchRequest::default().with_per_page(25);
    assert!(matches!(
        services.catalog.search(&request).await,
        Err(VitrineError::InvalidPageSize { requested: 25, .. })
    ));

    let request = SearchRequest::default().with_sort(SortRequest::asc("comments_s"));
    assert!(matches!(
        services.catalog.search(&request).await,
        Err(VitrineError::InvalidSortField(_))
    ));
}

#[tokio::test]
async fn test_spelling_suggestion() {
    let (services, _temp) = sample_services();
    let response = services
        .catalog
        .search(&SearchRequest::new("bronz"))
        .await
        .unwrap();

    assert_eq!(response.total, 0);
    assert!(response.spelling.contains(&"bronze".to_string()));
}

#[tokio::test]
async fn test_unknown_facet_filter() {
    let (services, _temp) = sample_services();
    let request = SearchRequest::default().with_filter("colour_s", "red");
    assert!(matches!(
        services.catalog.search(&request).await,
        Err(VitrineError::UnknownFacetField(f)) if f == "colour_s"
    ));
}

#[tokio::test]
async fn test_show_record() {
    let (services, _temp) = sample_services();
    let view = services.catalog.document("1").await.expect("Record missing");

    assert_eq!(view.id, "1");
    assert_eq!(view.title, "MEG-0001");
    assert_eq!(view.thumbnail.as_deref(), Some("thumbs/1.jpg"));
    assert_eq!(view.field("comments_s").unwrap().label, "Comments");
    assert_eq!(view.actions, vec![ActionKind::Bookmark]);
    // Fields absent from the record are omitted
    assert!(view.field("burassoc_s").is_none());

    assert!(matches!(
        services.catalog.document("999").await,
        Err(VitrineError::DocumentNotFound(_))
    ));
}

#[tokio::test]
async fn test_record_without_title() {
    let (services, _temp) = create_test_services();
    ingest_export(
        &services,
        &ArtifactExport::with_rows(&["77\t\tMegiddo\tbone\t\t\t\tneedle\t\t"]),
    );

    let view = services.catalog.document("77").await.unwrap();
    assert_eq!(view.title, "");
    assert!(view.thumbnail.is_none());
}

#[tokio::test]
async fn test_suggest() {
    let (services, _temp) = create_test_services_with(|config| {
        config.autocomplete.enabled = true;
        config.autocomplete.max_suggestions = 3;
    });
    ingest_export(&services, &ArtifactExport::sample());

    let suggestions = services.catalog.suggest("BRO").await.unwrap();
    assert_eq!(suggestions[0], "bronze");
    assert!(suggestions.len() <= 3);
    assert!(suggestions.iter().all(|s| s.starts_with("bro")));

    assert!(services.catalog.suggest("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_collection_is_not_retried_into_empty_result() {
    let (services, _temp) = create_test_services();
    assert!(matches!(
        services.catalog.search(&SearchRequest::default()).await,
        Err(VitrineError::CollectionNotFound(_))
    ));
}
