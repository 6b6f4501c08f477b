//! Embedded Tantivy backend.
//!
//! Answers catalog queries from a local collection. Each request opens
//! the collection and runs on the blocking thread pool.

use super::SearchBackend;
use crate::core::error::{Result, VitrineError};
use crate::core::registry::FieldRegistry;
use crate::core::search::{escape_query, is_quoted, query_terms};
use crate::core::storage::tantivy::{
    exact_field_name, tokenized_field_name, CATCH_ALL_FIELD, SOURCE_FIELD,
};
use crate::core::storage::{StorageManager, TantivyIndex};
use crate::core::types::{
    value_strings, FacetRequest, IndexQuery, IndexQueryResult, Operator, RawDocument, SortClause,
    SortDirection,
};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tantivy::collector::{Count, DocSetCollector, TopDocs};
use tantivy::query::{AllQuery, BooleanQuery, BoostQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{DocAddress, Searcher, TantivyDocument, Term};

/// Extra weight of the whole-phrase clause over single terms
const PHRASE_BOOST: f32 = 2.0;

/// Maximum edit distance for spelling suggestions
const MAX_EDIT_DISTANCE: usize = 2;

pub struct LocalBackend {
    storage: Arc<StorageManager>,
    collection: String,
    registry: Arc<FieldRegistry>,
}

impl LocalBackend {
    pub fn new(storage: Arc<StorageManager>, collection: String, registry: Arc<FieldRegistry>) -> Self {
        Self {
            storage,
            collection,
            registry,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run `work` against the open collection on the blocking pool
    async fn with_index<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&TantivyIndex, &FieldRegistry) -> Result<T> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let registry = Arc::clone(&self.registry);
        let collection = self.collection.clone();

        tokio::task::spawn_blocking(move || {
            let index = storage.open_collection(&collection)?;
            work(&index, &registry)
        })
        .await
        .map_err(|e| VitrineError::SearchFailed(format!("Search task failed: {e}")))?
    }
}

#[async_trait]
impl SearchBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn search(&self, query: &IndexQuery) -> Result<IndexQueryResult> {
        let query = query.clone();
        self.with_index(move |index, registry| execute_search(index, registry, &query))
            .await
    }

    async fn document(&self, id: &str) -> Result<Option<RawDocument>> {
        let id = id.to_string();
        self.with_index(move |index, registry| fetch_document(index, registry, &id))
            .await
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let prefix = prefix.to_string();
        self.with_index(move |index, _| prefix_terms(index, &prefix, limit))
            .await
    }
}

fn searcher(index: &TantivyIndex) -> Result<Searcher> {
    let reader = index
        .reader()
        .map_err(|e| VitrineError::SearchFailed(format!("Failed to create reader: {e}")))?;
    Ok(reader.searcher())
}

fn search_err(e: tantivy::TantivyError) -> VitrineError {
    VitrineError::SearchFailed(format!("Search failed: {e}"))
}

fn execute_search(
    index: &TantivyIndex,
    registry: &FieldRegistry,
    query: &IndexQuery,
) -> Result<IndexQueryResult> {
    let searcher = searcher(index)?;
    let compiled = compile_query(index, query)?;

    let num_found = searcher.search(&*compiled, &Count).map_err(search_err)? as u64;

    // Facets and field sorts need every matching record
    let needs_scan = !query.facets.is_empty() || matches!(query.sort, SortClause::Field { .. });
    let matches = if needs_scan {
        let addresses = searcher
            .search(&*compiled, &DocSetCollector)
            .map_err(search_err)?;
        let mut loaded = Vec::with_capacity(addresses.len());
        for address in addresses {
            loaded.push((address, load_source(&searcher, index, address)?));
        }
        loaded
    } else {
        Vec::new()
    };

    let docs = match &query.sort {
        SortClause::Relevance => {
            if query.rows == 0 {
                Vec::new()
            } else {
                let top = TopDocs::with_limit(query.rows).and_offset(query.start);
                let hits = searcher.search(&*compiled, &top).map_err(search_err)?;
                hits.into_iter()
                    .map(|(_, address)| load_source(&searcher, index, address))
                    .collect::<Result<Vec<_>>>()?
            }
        }
        SortClause::Field { field, direction } => {
            sort_by_field(&matches, registry.id_field(), field, *direction)
                .into_iter()
                .skip(query.start)
                .take(query.rows)
                .cloned()
                .collect()
        }
    };

    let facet_counts = query
        .facets
        .iter()
        .map(|facet| (facet.field.clone(), count_facet(&matches, facet, query.facet_mincount)))
        .collect();

    let spelling = match (&query.q, query.spellcheck_count) {
        (Some(text), Some(count)) if count > 0 => spelling_suggestions(index, &searcher, text, count)?,
        _ => Vec::new(),
    };

    tracing::debug!(
        q = query.effective_query(),
        num_found,
        returned = docs.len(),
        "Local search complete"
    );

    Ok(IndexQueryResult {
        docs,
        num_found,
        facet_counts,
        spelling,
    })
}

/// Translate an index query into a Tantivy query
fn compile_query(index: &TantivyIndex, query: &IndexQuery) -> Result<Box<dyn Query>> {
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

    match &query.q {
        None => clauses.push((Occur::Must, Box::new(AllQuery))),
        Some(text) => clauses.push((Occur::Must, text_query(index, query, text)?)),
    }

    for filter in &query.filters {
        let field = index.field(&exact_field_name(&filter.field))?;
        let alternatives: Vec<(Occur, Box<dyn Query>)> = filter
            .values
            .iter()
            .map(|value| {
                let term = Term::from_field_text(field, value);
                let q: Box<dyn Query> = Box::new(TermQuery::new(term, IndexRecordOption::Basic));
                (Occur::Should, q)
            })
            .collect();
        clauses.push((Occur::Must, Box::new(BooleanQuery::new(alternatives))));
    }

    Ok(Box::new(BooleanQuery::new(clauses)))
}

/// Tokenized schema field that serves a searchable field
fn search_target(index: &TantivyIndex, field: &str) -> Result<Field> {
    if field == CATCH_ALL_FIELD {
        index.field(CATCH_ALL_FIELD)
    } else {
        index.field(&tokenized_field_name(field))
    }
}

fn text_query(index: &TantivyIndex, query: &IndexQuery, text: &str) -> Result<Box<dyn Query>> {
    let mut fields = Vec::with_capacity(query.query_fields.len());
    for weighted in &query.query_fields {
        fields.push((search_target(index, &weighted.field)?, weighted.weight));
    }

    let mut parser = QueryParser::for_index(index.index(), fields.iter().map(|(f, _)| *f).collect());
    for (field, weight) in &fields {
        parser.set_field_boost(*field, *weight);
    }
    if query.operator == Operator::And {
        parser.set_conjunction_by_default();
    }

    let escaped = escape_query(text);
    let (main, errors) = parser.parse_query_lenient(&escaped);
    if !errors.is_empty() {
        tracing::debug!(query = %escaped, ?errors, "Parts of the query were ignored");
    }

    let terms = query_terms(text);
    if terms.len() < 2 || is_quoted(text) || query.phrase_fields.is_empty() {
        return Ok(main);
    }

    // Records containing the words as a phrase rank above scattered matches
    let mut phrase_fields = Vec::with_capacity(query.phrase_fields.len());
    for weighted in &query.phrase_fields {
        phrase_fields.push(search_target(index, &weighted.field)?);
    }
    let phrase_parser = QueryParser::for_index(index.index(), phrase_fields);
    let phrase = phrase_parser
        .parse_query(&format!("\"{}\"", terms.join(" ")))
        .map_err(|e| VitrineError::InvalidQuery(format!("Failed to parse phrase: {e}")))?;

    Ok(Box::new(BooleanQuery::new(vec![
        (Occur::Must, main),
        (Occur::Should, Box::new(BoostQuery::new(phrase, PHRASE_BOOST))),
    ])))
}

fn load_source(searcher: &Searcher, index: &TantivyIndex, address: DocAddress) -> Result<RawDocument> {
    let source_field = index.field(SOURCE_FIELD)?;
    let doc: TantivyDocument = searcher
        .doc(address)
        .map_err(|e| VitrineError::SearchFailed(format!("Failed to retrieve document: {e}")))?;

    let json = doc
        .get_first(source_field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| VitrineError::MalformedResponse("Stored record has no source".to_string()))?;

    match serde_json::from_str(json)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(VitrineError::MalformedResponse(
            "Stored record is not an object".to_string(),
        )),
    }
}

fn count_facet(
    matches: &[(DocAddress, RawDocument)],
    facet: &FacetRequest,
    mincount: u64,
) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for (_, doc) in matches {
        if let Some(value) = doc.get(&facet.field) {
            for v in value_strings(value) {
                *counts.entry(v).or_insert(0) += 1;
            }
        }
    }

    let mut counts: Vec<(String, u64)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= mincount)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if let Some(limit) = facet.limit {
        counts.truncate(limit);
    }
    counts
}

/// Order records by the first value of `field`; records without one go last
fn sort_by_field<'a>(
    matches: &'a [(DocAddress, RawDocument)],
    id_field: &str,
    field: &str,
    direction: SortDirection,
) -> Vec<&'a RawDocument> {
    let key = |doc: &RawDocument, name: &str| {
        doc.get(name)
            .map(value_strings)
            .and_then(|v| v.into_iter().next())
    };

    let mut keyed: Vec<(Option<String>, String, &RawDocument)> = matches
        .iter()
        .map(|(_, doc)| (key(doc, field), key(doc, id_field).unwrap_or_default(), doc))
        .collect();

    keyed.sort_by(|a, b| {
        let primary = match (&a.0, &b.0) {
            (Some(x), Some(y)) => match direction {
                SortDirection::Asc => x.cmp(y),
                SortDirection::Desc => y.cmp(x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        primary.then_with(|| a.1.cmp(&b.1))
    });

    keyed.into_iter().map(|(_, _, doc)| doc).collect()
}

fn fetch_document(
    index: &TantivyIndex,
    registry: &FieldRegistry,
    id: &str,
) -> Result<Option<RawDocument>> {
    let searcher = searcher(index)?;
    let id_field = index.field(&exact_field_name(registry.id_field()))?;
    let query = TermQuery::new(Term::from_field_text(id_field, id), IndexRecordOption::Basic);

    let hits = searcher
        .search(&query, &TopDocs::with_limit(1))
        .map_err(search_err)?;

    match hits.into_iter().next() {
        Some((_, address)) => Ok(Some(load_source(&searcher, index, address)?)),
        None => Ok(None),
    }
}

/// Document frequency of every catch-all term accepted by `keep`
fn scan_terms<F>(index: &TantivyIndex, searcher: &Searcher, prefix: &str, mut keep: F) -> Result<BTreeMap<String, u64>>
where
    F: FnMut(&str) -> bool,
{
    let text_field = index.field(CATCH_ALL_FIELD)?;
    let mut freqs: BTreeMap<String, u64> = BTreeMap::new();

    for segment in searcher.segment_readers() {
        let inverted = segment
            .inverted_index(text_field)
            .map_err(|e| VitrineError::SearchFailed(format!("Failed to read terms: {e}")))?;
        let mut stream = inverted
            .terms()
            .range()
            .ge(prefix.as_bytes())
            .into_stream()
            .map_err(|e| VitrineError::SearchFailed(format!("Failed to read terms: {e}")))?;

        while stream.advance() {
            let Ok(term) = std::str::from_utf8(stream.key()) else {
                continue;
            };
            if !term.starts_with(prefix) {
                break;
            }
            if keep(term) {
                *freqs.entry(term.to_string()).or_insert(0) += u64::from(stream.value().doc_freq);
            }
        }
    }

    Ok(freqs)
}

fn prefix_terms(index: &TantivyIndex, prefix: &str, limit: usize) -> Result<Vec<String>> {
    let searcher = searcher(index)?;
    let freqs = scan_terms(index, &searcher, prefix, |_| true)?;

    let mut terms: Vec<(String, u64)> = freqs.into_iter().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(terms.into_iter().take(limit).map(|(t, _)| t).collect())
}

/// Close dictionary terms for query words the collection does not contain
fn spelling_suggestions(
    index: &TantivyIndex,
    searcher: &Searcher,
    text: &str,
    count: usize,
) -> Result<Vec<String>> {
    let text_field = index.field(CATCH_ALL_FIELD)?;
    let mut suggestions = Vec::new();

    for word in query_terms(text) {
        let freq = searcher
            .doc_freq(&Term::from_field_text(text_field, &word))
            .map_err(search_err)?;
        if freq > 0 || word.chars().count() <= MAX_EDIT_DISTANCE {
            continue;
        }

        let candidates = scan_terms(index, searcher, "", |term| {
            strsim::levenshtein(term, &word) <= MAX_EDIT_DISTANCE
        })?;

        let mut ranked: Vec<(usize, u64, String)> = candidates
            .into_iter()
            .map(|(term, freq)| (strsim::levenshtein(&term, &word), freq, term))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)).then_with(|| a.2.cmp(&b.2)));

        for (_, _, term) in ranked {
            if !suggestions.contains(&term) {
                suggestions.push(term);
            }
            if suggestions.len() >= count {
                return Ok(suggestions);
            }
        }
    }

    Ok(suggestions)
}
