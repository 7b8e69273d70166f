use anyhow::{Result, anyhow};
use serde_json::{Value, json};

use crate::cli::PrintArgs;
use crate::commands::Inputs;
use crate::output::print_json;

pub fn print(args: &PrintArgs, inputs: &Inputs) -> Result<()> {
    let rendered = render(args.operation.as_deref(), inputs)?;
    print_json(&rendered, args.compact)
}

/// Builds the value `print` writes: the whole operation map, or a single
/// operation's document and variables.
fn render(operation: Option<&str>, inputs: &Inputs) -> Result<Value> {
    let map = inputs.operation_map()?;
    match operation {
        None => Ok(serde_json::to_value(&map)?),
        Some(name) => {
            let query = map
                .query(name)
                .ok_or_else(|| anyhow!("operation '{name}' is not referenced by the manifest"))?;
            Ok(json!({
                "operation": name,
                "variables": map.variables(name),
                "query": query,
            }))
        }
    }
}
