use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use restgql_core::{Manifest, OperationMap, SdlSchema};
use restgql_router::{ExecutionConfig, ExecutionRequest, ExecutionResult, RouterConfig, build_router};
use tracing::info;

use crate::commands::Inputs;
use crate::output::print_success;

/// Synthesizes every operation and registers every route without serving,
/// then lists the endpoints.
pub fn check(inputs: Inputs, router: &RouterConfig) -> Result<()> {
    let map = inputs.operation_map()?;
    validate_routes(inputs.schema, &inputs.manifest, &map, router)?;

    for line in endpoint_lines(&inputs.manifest, &map) {
        println!("  {line}");
    }
    info!(
        endpoints = inputs.manifest.endpoint_count(),
        operations = map.len(),
        "Manifest checked"
    );
    print_success(&format!(
        "{} endpoints, {} operations",
        inputs.manifest.endpoint_count(),
        map.len()
    ));
    Ok(())
}

fn validate_routes(
    schema: SdlSchema,
    manifest: &Manifest,
    map: &OperationMap,
    router: &RouterConfig,
) -> Result<()> {
    let execution = ExecutionConfig::new(Arc::new(schema), |_: ExecutionRequest<SdlSchema>| async {
        ExecutionResult::default()
    })
    .with_router_config(router.clone());
    build_router(manifest, map, execution)?;
    Ok(())
}

/// One `METHOD path -> operation(vars)` line per endpoint.
fn endpoint_lines(manifest: &Manifest, map: &OperationMap) -> Vec<String> {
    manifest
        .iter()
        .map(|(path, method, endpoint)| {
            let vars = map
                .variables(&endpoint.operation)
                .map(|v| v.names().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            format!(
                "{:<6} {} -> {}({})",
                method.to_ascii_uppercase().cyan(),
                path,
                endpoint.operation.bold(),
                vars
            )
        })
        .collect()
}
