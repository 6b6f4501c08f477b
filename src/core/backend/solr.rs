//! Remote Solr backend.
//!
//! Queries are sent to the core's `select` handler as edismax
//! requests; suggestions come from the configured suggest handler.

use super::SearchBackend;
use crate::core::error::{Result, VitrineError};
use crate::core::registry::FieldRegistry;
use crate::core::types::{IndexQuery, IndexQueryResult, RawDocument, WeightedField};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct SolrBackend {
    client: Client,
    select_url: Url,
    suggest_url: Url,
    registry: Arc<FieldRegistry>,
}

impl SolrBackend {
    /// Create a backend for the core at `base_url`
    ///
    /// # Errors
    ///
    /// `ConfigError` if the URL cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, suggest_path: &str, registry: Arc<FieldRegistry>) -> Result<Self> {
        let base = base_url.trim().trim_end_matches('/');
        let parse = |path: &str| {
            Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))
                .map_err(|e| VitrineError::ConfigError(format!("Invalid Solr URL '{base_url}': {e}")))
        };

        let client = Client::builder()
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VitrineError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            select_url: parse("select")?,
            suggest_url: parse(suggest_path)?,
            registry,
        })
    }

    async fn get_json(&self, url: &Url, params: &[(String, String)]) -> Result<Value> {
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| VitrineError::Transport(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(classify_status(status, message));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| VitrineError::MalformedResponse(format!("Response is not JSON: {e}")))
    }
}

#[async_trait]
impl SearchBackend for SolrBackend {
    fn name(&self) -> &'static str {
        "solr"
    }

    async fn search(&self, query: &IndexQuery) -> Result<IndexQueryResult> {
        let params = select_params(query);
        tracing::debug!(q = query.effective_query(), params = params.len(), "Solr select");
        let body = self.get_json(&self.select_url, &params).await?;
        parse_select(&body)
    }

    async fn document(&self, id: &str) -> Result<Option<RawDocument>> {
        let params = document_params(self.registry.id_field(), id);
        let body = self.get_json(&self.select_url, &params).await?;
        let result = parse_select(&body)?;
        Ok(result.docs.into_iter().next())
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let params = vec![
            ("q".to_string(), prefix.to_string()),
            ("wt".to_string(), "json".to_string()),
        ];
        let body = self.get_json(&self.suggest_url, &params).await?;
        let mut terms = parse_suggest(&body)?;
        terms.truncate(limit);
        Ok(terms)
    }
}

fn classify_status(status: StatusCode, message: String) -> VitrineError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        VitrineError::Transport(format!("Solr returned {status}: {message}"))
    } else {
        VitrineError::SearchFailed(format!("Solr returned {status}: {message}"))
    }
}

/// `error.msg` of a Solr error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/msg")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn weighted_list(fields: &[WeightedField]) -> String {
    fields
        .iter()
        .map(|f| format!("{}^{}", f.field, f.weight))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote a filter value as a Solr phrase
fn quote_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Request parameters for a catalog query
pub(crate) fn select_params(query: &IndexQuery) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    let mut push = |k: &str, v: String| params.push((k.to_string(), v));

    if let Some(q) = &query.q {
        push("q", q.clone());
    }
    push("q.alt", query.q_alt.clone());
    push("defType", "edismax".to_string());
    push("df", "text".to_string());
    push("q.op", query.operator.as_str().to_string());
    push("qf", weighted_list(&query.query_fields));
    push("pf", weighted_list(&query.phrase_fields));

    for filter in &query.filters {
        let values: Vec<String> = filter.values.iter().map(|v| quote_value(v)).collect();
        push("fq", format!("{}:({})", filter.field, values.join(" OR ")));
    }

    if !query.facets.is_empty() {
        push("facet", "true".to_string());
        push("facet.mincount", query.facet_mincount.to_string());
        for facet in &query.facets {
            push("facet.field", facet.field.clone());
            let limit = facet.limit.map_or_else(|| "-1".to_string(), |l| l.to_string());
            push(&format!("f.{}.facet.limit", facet.field), limit);
        }
    }

    push("start", query.start.to_string());
    push("rows", query.rows.to_string());
    push("sort", query.sort.to_string());
    push("fl", "*,score".to_string());

    if let Some(count) = query.spellcheck_count {
        push("spellcheck", "true".to_string());
        push("spellcheck.count", count.to_string());
    }

    push("wt", "json".to_string());
    params
}

pub(crate) fn document_params(id_field: &str, id: &str) -> Vec<(String, String)> {
    vec![
        ("qt".to_string(), "document".to_string()),
        ("q".to_string(), format!("{{!term f={id_field} v=$id}}")),
        ("id".to_string(), id.to_string()),
        ("rows".to_string(), "1".to_string()),
        ("fl".to_string(), "*".to_string()),
        ("wt".to_string(), "json".to_string()),
    ]
}

/// Parse a `select` response body
pub(crate) fn parse_select(body: &Value) -> Result<IndexQueryResult> {
    let malformed = |what: &str| VitrineError::MalformedResponse(what.to_string());

    let response = body
        .get("response")
        .ok_or_else(|| malformed("missing 'response'"))?;
    let num_found = response
        .get("numFound")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("missing 'response.numFound'"))?;
    let docs = response
        .get("docs")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing 'response.docs'"))?
        .iter()
        .map(|doc| match doc {
            Value::Object(map) => Ok(map.clone()),
            _ => Err(malformed("document is not an object")),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut facet_counts = BTreeMap::new();
    if let Some(fields) = body.pointer("/facet_counts/facet_fields").and_then(Value::as_object) {
        for (field, flat) in fields {
            facet_counts.insert(field.clone(), parse_facet_pairs(flat)?);
        }
    }

    let spelling = body
        .pointer("/spellcheck/suggestions")
        .map(parse_spelling)
        .unwrap_or_default();

    Ok(IndexQueryResult {
        docs,
        num_found,
        facet_counts,
        spelling,
    })
}

/// Facet counts arrive as `[value, count, value, count, ...]`
fn parse_facet_pairs(flat: &Value) -> Result<Vec<(String, u64)>> {
    let items = flat
        .as_array()
        .ok_or_else(|| VitrineError::MalformedResponse("facet counts are not a list".to_string()))?;

    items
        .chunks(2)
        .map(|pair| match pair {
            [value, count] => {
                let count = count.as_u64().ok_or_else(|| {
                    VitrineError::MalformedResponse("facet count is not a number".to_string())
                })?;
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Ok((value, count))
            }
            _ => Err(VitrineError::MalformedResponse(
                "facet counts have an odd length".to_string(),
            )),
        })
        .collect()
}

/// Alternate spellings from either the flat-list or the map layout
fn parse_spelling(suggestions: &Value) -> Vec<String> {
    let entries: Vec<&Value> = match suggestions {
        Value::Array(items) => items.iter().skip(1).step_by(2).collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    };

    let mut words = Vec::new();
    for entry in entries {
        let Some(list) = entry.get("suggestion").and_then(Value::as_array) else {
            continue;
        };
        for item in list {
            let word = match item {
                Value::String(s) => Some(s.as_str()),
                other => other.get("word").and_then(Value::as_str),
            };
            if let Some(word) = word {
                words.push(word.to_string());
            }
        }
    }
    words
}

/// Terms of a suggest handler response, across all dictionaries
pub(crate) fn parse_suggest(body: &Value) -> Result<Vec<String>> {
    let dictionaries = body
        .get("suggest")
        .and_then(Value::as_object)
        .ok_or_else(|| VitrineError::MalformedResponse("missing 'suggest'".to_string()))?;

    let mut terms = Vec::new();
    for by_query in dictionaries.values() {
        let Some(by_query) = by_query.as_object() else {
            continue;
        };
        for result in by_query.values() {
            let Some(suggestions) = result.get("suggestions").and_then(Value::as_array) else {
                continue;
            };
            for s in suggestions {
                if let Some(term) = s.get("term").and_then(Value::as_str) {
                    terms.push(term.to_string());
                }
            }
        }
    }
    Ok(terms)
}
