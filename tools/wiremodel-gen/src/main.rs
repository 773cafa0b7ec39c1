// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! wiremodel-gen CLI
//!
//! Turns a type catalog into protocol-buffer schema files.
//!
//! # Usage
//!
//! ```bash
//! # Export with defaults (proto2, ./proto)
//! wiremodel-gen export --catalog types.yaml
//!
//! # Using configuration file, overriding the dialect
//! wiremodel-gen export --catalog types.yaml --config wiremodel.toml --dialect proto3
//!
//! # Show the resolved model
//! wiremodel-gen inspect --catalog types.yaml
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wiremodel::{Dialect, GeneratorConfig, Target};
use wiremodel_gen::{ModelView, Pipeline};

/// Schema generator
#[derive(Parser, Debug)]
#[command(name = "wiremodel-gen")]
#[command(about = "Cross-language schema generator - type catalog to .proto files")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate schema files from a catalog
    Export {
        /// Type catalog (.yaml, .json or .toml)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Configuration file path
        #[arg(short = 'f', long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field-label dialect (proto2, proto3)
        #[arg(long)]
        dialect: Option<Dialect>,

        /// Naming target (default, flatten)
        #[arg(long)]
        target: Option<Target>,

        /// Package prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Do not import a file's own namespace
        #[arg(long)]
        no_self_import: bool,

        /// Render service blocks for actions
        #[arg(long)]
        services: bool,

        /// Compiler program to run on the generated files
        #[arg(long)]
        compile: Option<String>,

        /// Fail when any error diagnostic was recorded
        #[arg(long)]
        strict: bool,
    },

    /// Print the resolved model
    Inspect {
        /// Type catalog (.yaml, .json or .toml)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Configuration file path
        #[arg(short = 'f', long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "wiremodel.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Commands::Export {
            catalog,
            config,
            output,
            dialect,
            target,
            prefix,
            no_self_import,
            services,
            compile,
            strict,
        } => {
            let mut pipeline = Pipeline::load(&catalog, config.as_deref())?;
            let cfg = &mut pipeline.config;
            if let Some(output) = output {
                cfg.output_dir = output;
            }
            if let Some(dialect) = dialect {
                cfg.dialect = dialect;
            }
            if let Some(target) = target {
                cfg.target = target;
            }
            if let Some(prefix) = prefix {
                cfg.package_prefix = prefix;
            }
            if no_self_import {
                cfg.include_self_import = false;
            }
            if services {
                cfg.emit_services = true;
            }
            if let Some(program) = compile {
                cfg.compiler = Some(wiremodel::SchemaCompiler::new(program));
            }
            cmd_export(&pipeline, strict)
        }
        Commands::Inspect {
            catalog,
            config,
            json,
        } => cmd_inspect(&catalog, config.as_deref(), json),
        Commands::GenConfig { output } => cmd_gen_config(&output),
        Commands::Validate { config } => cmd_validate(&config),
    }
}

fn cmd_export(pipeline: &Pipeline, strict: bool) -> Result<()> {
    let outcome = pipeline.run()?;
    let report = &outcome.report;

    println!(
        "[OK] {} schema file(s) written to {}",
        report.written.len(),
        pipeline.config.output_dir.display()
    );
    for failed in &report.failed {
        println!("  [FAILED] {}: {}", failed.namespace, failed.error);
    }
    if !report.unknown_mappings.is_empty() {
        println!("  Unknown types: {}", report.unknown_mappings.join(", "));
    }
    println!(
        "  Diagnostics: {} warning(s), {} error(s)",
        outcome.manifest.diagnostics.warnings, outcome.manifest.diagnostics.errors
    );
    println!("  Manifest: {}", outcome.manifest_path.display());

    if strict && outcome.has_errors() {
        bail!("export finished with errors (strict mode)");
    }
    Ok(())
}

fn cmd_inspect(catalog: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let pipeline = Pipeline::load(catalog, config)?;
    let (registry, _) = pipeline.build()?;
    let view = ModelView::from_registry(&registry, &pipeline.config.reserved_prefixes);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.render_text());
    }
    Ok(())
}

fn cmd_gen_config(output: &Path) -> Result<()> {
    let content = GeneratorConfig::example()?;
    std::fs::write(output, content)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Generated example configuration: {}", output.display());
    Ok(())
}

fn cmd_validate(config: &Path) -> Result<()> {
    match GeneratorConfig::from_file(config) {
        Ok(cfg) => {
            println!("Configuration is valid.");
            println!("  Output: {}", cfg.output_dir.display());
            println!("  Dialect: {:?}", cfg.dialect);
            println!("  Target: {:?}", cfg.target);
            if !cfg.package_prefix.is_empty() {
                println!("  Prefix: {}", cfg.package_prefix);
            }
            Ok(())
        }
        Err(e) => bail!("Configuration error: {}", e),
    }
}
