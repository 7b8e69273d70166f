pub mod check;
pub mod print;

use std::path::Path;

use anyhow::{Context, Result, bail};
use restgql_core::{Manifest, OperationMap, ScalarSet, SdlSchema, build_operation_map};
use tracing::debug;

use crate::cli::InputArgs;
use crate::config::AppConfig;

/// Schema, manifest, and scalar set resolved from flags and configuration.
pub struct Inputs {
    pub schema: SdlSchema,
    pub manifest: Manifest,
    pub scalars: ScalarSet,
}

impl Inputs {
    /// Loads the inputs; command-line flags take precedence over the config file.
    pub fn load(args: &InputArgs, config: &AppConfig) -> Result<Self> {
        let schema_path = pick_path(args.schema.as_deref(), config.schema.as_deref(), "schema")?;
        let manifest_path =
            pick_path(args.manifest.as_deref(), config.manifest.as_deref(), "manifest")?;

        let schema = SdlSchema::from_file(schema_path)
            .with_context(|| format!("loading schema {}", schema_path.display()))?;
        let manifest = Manifest::load(manifest_path)
            .with_context(|| format!("loading manifest {}", manifest_path.display()))?;

        let names = config
            .synthesis
            .custom_scalars
            .iter()
            .chain(&args.scalars)
            .cloned();
        let mut scalars = ScalarSet::new(names)?;
        if args.schema_scalars || config.synthesis.schema_scalars {
            scalars = scalars.with_schema_scalars(&schema);
        }
        debug!(scalars = ?scalars.iter().collect::<Vec<_>>(), "Resolved scalar set");

        Ok(Self {
            schema,
            manifest,
            scalars,
        })
    }

    pub fn operation_map(&self) -> Result<OperationMap> {
        Ok(build_operation_map(
            &self.manifest,
            &self.schema,
            &self.scalars,
        )?)
    }
}

fn pick_path<'a>(flag: Option<&'a Path>, config: Option<&'a Path>, what: &str) -> Result<&'a Path> {
    match flag.or(config) {
        Some(path) => Ok(path),
        None => bail!("no {what} given: pass --{what} or set `{what}` in the config file"),
    }
}
