pub mod catalog;
pub mod cli;
pub mod codec;
pub mod model;
pub mod session;
pub mod transform;

use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use std::io::Read;

pub use catalog::{CATALOG, FieldSpec, Operator, ValueKind};
pub use cli::{Cli, Commands, cli_parse};
pub use codec::{DecodeError, decode, encode, try_decode};
pub use model::{FilterRow, FilterSet, FilterValue, ModelError};
pub use session::{FILTERS_PARAM, FilterSession, MemoryPort, QueryPort};
pub use transform::{Predicate, TransformedFilters, transform};

fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

/// Warn about rows a restored parameter carries that the catalog no longer
/// understands. Such rows stay visible but inert; the warnings help users spot
/// hand-edited or stale URLs.
fn print_restore_warnings(set: &FilterSet) {
    let known: Vec<&str> = catalog::keys().collect();
    for row in set.rows() {
        if !row.key.is_empty() && row.spec().is_none() {
            eprintln!(
                "{}",
                format!(
                    "Warning: Unknown filter field '{}'. Known fields are: {:?}",
                    row.key, known
                )
                .yellow()
            );
        }
        if let (Some(spec), Some(unit)) = (row.spec(), row.unit.as_deref())
            && !spec.units.contains(&unit)
        {
            eprintln!(
                "{}",
                format!(
                    "Warning: Unknown unit '{}' for field '{}'. Known units are: {:?}",
                    unit, row.key, spec.units
                )
                .yellow()
            );
        }
    }
}

fn join_values(values: &[FilterValue]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decode a `--filters` argument, warning (rather than failing) on malformed
/// input, the same way a hosting page would fall back to no filters.
fn decode_argument(filters: &Option<String>) -> FilterSet {
    match filters.as_deref() {
        None | Some("") => FilterSet::default(),
        Some(value) => match codec::try_decode(value) {
            Ok(set) => set,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Warning: {}. Falling back to no filters.", e).yellow()
                );
                FilterSet::default()
            }
        },
    }
}

fn read_input(path: &std::path::Path) -> Result<String, Box<dyn std::error::Error>> {
    if path.to_str() == Some("-") {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read input file '{}': {}", path.display(), e).into())
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli_parse();

    match &cli.command {
        Commands::Fields => {
            let mut table = create_styled_table(&["Field", "Kind", "Values", "Operators", "Units"]);
            for spec in CATALOG {
                let operators = spec
                    .operators()
                    .iter()
                    .map(|op| op.glyph())
                    .collect::<Vec<_>>()
                    .join(" ");
                table.add_row(vec![
                    Cell::new(spec.key),
                    Cell::new(spec.kind.label()),
                    Cell::new(spec.domain.join(", ")),
                    Cell::new(operators),
                    Cell::new(spec.units.join(", ")),
                ]);
            }
            println!("{table}");
        }
        Commands::Show { filters } => {
            let set = decode_argument(filters);
            print_restore_warnings(&set);

            if !set.rows().iter().any(|row| row.is_complete()) {
                println!("{}", "No active filters.".bright_black());
                return Ok(());
            }

            let mut table = create_styled_table(&["#", "Field", "Op", "Values", "Unit"]);
            for (index, row) in set.rows().iter().enumerate() {
                table.add_row(vec![
                    Cell::new(index + 1),
                    Cell::new(&row.key),
                    Cell::new(row.operator.glyph()),
                    Cell::new(join_values(&row.values)),
                    Cell::new(row.unit.as_deref().unwrap_or("")),
                ]);
            }
            println!("{table}");
        }
        Commands::Transform { filters } => {
            let set = decode_argument(filters);
            print_restore_warnings(&set);

            let transformed = transform(&set);
            println!("{}", serde_json::to_string_pretty(&transformed)?);
        }
        Commands::Encode { input } => {
            let raw = read_input(input)?;
            let rows: Vec<FilterRow> = serde_json::from_str(&raw)
                .map_err(|e| format!("Invalid filter row JSON: {}", e))?;

            let encoded = codec::encode(&FilterSet::from_rows(rows));
            if encoded.is_empty() {
                eprintln!(
                    "{}",
                    format!("No complete filter rows; omit the '{FILTERS_PARAM}' parameter.")
                        .bright_black()
                );
            } else {
                println!("{encoded}");
            }
        }
    }

    Ok(())
}
