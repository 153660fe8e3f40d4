//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use mifir_cli::ingest::read_csv;
use mifir_map::MappingResolver;
use mifir_model::{Constants, CustomFieldRegistry, FieldCatalog, Mapping};
use mifir_report::{CustomOnlyGenerator, ReportGenerator};

use crate::cli::{GenerateArgs, SuggestArgs};

/// Proposed configuration written by `suggest --output`, consumable by
/// `generate --mapping`/`--constants` after splitting.
#[derive(Serialize)]
struct SuggestBundle {
    mapping: Mapping,
    constants: Constants,
}

pub fn run_suggest(args: &SuggestArgs) -> Result<()> {
    let dataset = read_csv(&args.input)?;
    let catalog = FieldCatalog::standard();
    let resolver = MappingResolver::new(&catalog, &dataset);
    let suggestions = resolver.suggest();
    let constants = resolver.suggest_constants();

    for (field, column) in suggestions.iter() {
        let confidence = suggestions.confidence(field).unwrap_or(0.0);
        let explanation = suggestions.explanation(field).unwrap_or("");
        println!("{field:32} <- {column:24} {confidence:>5.2}  {explanation}");
    }
    let unmapped = catalog
        .fields()
        .iter()
        .filter(|f| !suggestions.has_field(&f.name))
        .count();
    info!(
        mapped = suggestions.len(),
        unmapped, "mapping suggestion complete"
    );

    if let Some(path) = &args.output {
        let bundle = SuggestBundle {
            mapping: suggestions.to_mapping(),
            constants,
        };
        let json = serde_json::to_string_pretty(&bundle)
            .context("failed to serialize suggestions")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

pub fn run_generate(args: &GenerateArgs) -> Result<()> {
    let dataset = read_csv(&args.input)?;
    let mapping: Mapping = load_json_or_default(args.mapping.as_deref())?;
    let constants: Constants = load_json_or_default(args.constants.as_deref())?;

    let mut registry = CustomFieldRegistry::new();
    if let Some(path) = &args.custom_fields {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let count = registry
            .import_json(&json)
            .with_context(|| format!("invalid custom fields in {}", path.display()))?;
        info!(count, "loaded custom field definitions");
    }

    let xml = if args.custom_only {
        CustomOnlyGenerator::new().generate(&dataset, &mapping, &constants, &registry)?
    } else {
        ReportGenerator::new().generate(&dataset, &mapping, &constants, &registry)?
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("xml"));
    fs::write(&output, xml)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("wrote {}", output.display());
    Ok(())
}

/// Loads a JSON configuration file, or the type's default when no path
/// was given.
fn load_json_or_default<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid JSON in {}", path.display()))
}
