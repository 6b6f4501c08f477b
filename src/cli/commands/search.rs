//! Search command - search the catalog

use crate::cli::output::{
    colors, display_title, format_field_values, format_page_summary, print_facet,
};
use crate::cli::OutputFormat;
use crate::core::error::VitrineError;
use crate::core::services::Services;
use crate::core::types::{SearchRequest, SearchResponse, SortRequest};
use clap::Args;
use std::sync::Arc;

/// Request options shared by `search` and `facet`
#[derive(Args, Debug, Default)]
pub struct RequestArgs {
    /// Search text (omit to browse everything)
    #[arg(default_value = "")]
    pub query: String,

    /// Field to search instead of all text
    #[arg(long = "field", short = 'F')]
    pub search_field: Option<String>,

    /// Facet filter as FIELD=VALUE (repeatable)
    #[arg(long = "filter", short = 'f', value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Page number, starting at 1
    #[arg(long, short = 'p', default_value = "1")]
    pub page: usize,

    /// Results per page (one of the configured page sizes)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Sort as "FIELD [asc|desc]" or "relevance"
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Word matching: AND or OR
    #[arg(long)]
    pub operator: Option<String>,
}

impl RequestArgs {
    /// Build the catalog request
    pub fn to_request(&self) -> Result<SearchRequest, VitrineError> {
        let mut request = SearchRequest::new(self.query.clone()).with_page(self.page);

        if let Some(field) = &self.search_field {
            request = request.with_search_field(field.clone());
        }
        for (field, value) in &self.filters {
            request = request.with_filter(field.clone(), value.clone());
        }
        if let Some(per_page) = self.per_page {
            request = request.with_per_page(per_page);
        }
        if let Some(sort) = self.sort.as_deref().map(SortRequest::parse).transpose()?.flatten() {
            request = request.with_sort(sort);
        }
        if let Some(operator) = &self.operator {
            request = request.with_operator(operator.parse()?);
        }

        Ok(request)
    }
}

/// Parse a FIELD=VALUE filter argument
pub fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    Ok((field.to_string(), value.trim().to_string()))
}

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Show more values for one facet
    #[arg(long)]
    pub expand: Option<String>,

    /// Hide the facet summary
    #[arg(long)]
    pub no_facets: bool,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = args.request.to_request()?;
    if let Some(facet) = &args.expand {
        request = request.expand(facet.clone());
    }

    let response = services.catalog.search(&request).await?;

    match format {
        OutputFormat::Human => print_human(&response, !args.no_facets),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &SearchResponse, show_facets: bool) {
    if response.documents.is_empty() {
        if response.query.is_empty() {
            println!("No artifacts found");
        } else {
            println!("No artifacts found for '{}'", colors::label(&response.query));
        }
    } else {
        println!(
            "{}\n",
            format_page_summary(response.total, response.page.page, response.page.total_pages)
        );

        for (i, doc) in response.documents.iter().enumerate() {
            let rank = response.page.offset + i + 1;
            println!(
                "[{}] {} {}",
                colors::rank(&rank.to_string()),
                colors::title(display_title(&doc.id, &doc.title)),
                colors::dim(&format!("(id: {})", doc.id))
            );
            for field in &doc.fields {
                println!(
                    "    {}: {}",
                    colors::label(&field.label),
                    format_field_values(&field.values)
                );
            }
            println!();
        }
    }

    if !response.spelling.is_empty() {
        println!(
            "{} {}",
            colors::label("Did you mean:"),
            response.spelling.join(", ")
        );
    }

    if show_facets {
        for facet in response.facets.iter().filter(|f| !f.values.is_empty()) {
            print_facet(facet);
        }
    }
}
