//! Fields command - list registered catalog fields

use crate::cli::output::{colors, print_header};
use crate::cli::OutputFormat;
use crate::core::registry::{FieldDefinition, FieldRole};
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Field role filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoleArg {
    Searchable,
    Facetable,
    Sortable,
    Index,
    Show,
}

impl From<RoleArg> for FieldRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Searchable => FieldRole::Searchable,
            RoleArg::Facetable => FieldRole::Facetable,
            RoleArg::Sortable => FieldRole::Sortable,
            RoleArg::Index => FieldRole::IndexDisplayed,
            RoleArg::Show => FieldRole::ShowDisplayed,
        }
    }
}

/// Arguments for the list-fields command
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Only fields with this role
    #[arg(long, short = 'r', value_enum)]
    pub role: Option<RoleArg>,
}

#[derive(Debug, Serialize)]
pub struct FieldItem {
    pub name: String,
    pub label: String,
    pub roles: Vec<&'static str>,
    pub weight: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_label: Option<String>,
}

impl From<&FieldDefinition> for FieldItem {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            roles: field.roles.iter().map(FieldRole::as_str).collect(),
            weight: field.effective_weight(),
            sort_label: field.sort_label.clone(),
        }
    }
}

/// Execute the list-fields command
pub async fn execute(
    args: FieldsArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = &services.registry;
    let fields: Vec<FieldItem> = match args.role {
        Some(role) => registry
            .fields_with_role(role.into())
            .into_iter()
            .map(FieldItem::from)
            .collect(),
        None => registry.fields().iter().map(FieldItem::from).collect(),
    };

    match format {
        OutputFormat::Human => {
            print_header(&format!("Fields ({}):", fields.len()));
            let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
            for field in &fields {
                println!(
                    "  {}  {}  {}",
                    colors::collection_id(&format!("{:<width$}", field.name)),
                    field.label,
                    colors::dim(&format!("[{}]", field.roles.join(", ")))
                );
            }
            println!(
                "\n  {}: {}  {}: {}",
                colors::label("Title"),
                registry.title_field(),
                colors::label("Id"),
                registry.id_field()
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
    }

    Ok(())
}
