// Copyright (c) 2025 - Cowboy AI, Inc.
//! OCCI Render
//!
//! Builds an entity from an inbound JSON document and prints its rendering,
//! or the automation model for an action.
//!
//! ```text
//! occi-render vm.json
//! occi-render --mixins mixins.json --model create vm.json
//! cat vm.json | occi-render --strict
//! ```
//!
//! The input document is `{"kind": ..., "attributes": {...}, "mixins": [titles]}`.
//! Mixin titles refer to the definitions loaded with `--mixins` (a JSON array).
//!
//! Environment: `OCCI_ID_PREFIX`, `OCCI_STRICT_KINDS`, `OCCI_VARIABLES_ENDPOINT`,
//! `OCCI_STORE_TIMEOUT_SECS`, `RUST_LOG`.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use occi_engine::builder::EntityRequest;
use occi_engine::config::EngineConfig;
use occi_engine::domain::MixinDefinition;
use occi_engine::service::InstanceService;
use occi_engine::store::{InMemoryStore, VariableStore};

#[derive(Debug, Parser)]
#[command(name = "occi-render", version, about = "Render OCCI entities and automation models")]
struct Args {
    /// Entity document; stdin when omitted
    input: Option<PathBuf>,

    /// Mixin definitions available to the document (JSON array)
    #[arg(long, value_name = "FILE")]
    mixins: Option<PathBuf>,

    /// Print the automation model for this action instead of the rendering
    #[arg(long, value_name = "ACTION")]
    model: Option<String>,

    /// Persist the entity and print it as read back from the store
    #[arg(long, conflicts_with = "model")]
    create: bool,

    /// Reject kinds without a registered builder
    #[arg(long)]
    strict: bool,

    /// Prefix for generated entity identifiers
    #[arg(long, value_name = "PREFIX")]
    id_prefix: Option<String>,

    /// Use the cloud automation variables endpoint instead of an in-memory store
    #[cfg(feature = "http")]
    #[arg(long)]
    remote: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg_attr(not(feature = "http"), allow(unused_variables))]
fn open_store(args: &Args, config: &EngineConfig) -> Result<Arc<dyn VariableStore>> {
    #[cfg(feature = "http")]
    {
        if args.remote {
            let store = occi_engine::store::HttpVariableStore::new(config)
                .context("Failed to create variable store client")?;
            return Ok(Arc::new(store));
        }
    }

    Ok(Arc::new(InMemoryStore::new()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("occi_engine=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::from_env().context("Invalid engine configuration")?;
    config.strict_kinds |= args.strict;
    if let Some(prefix) = &args.id_prefix {
        config.id_prefix = prefix.clone();
    }
    debug!(?config, "loaded configuration");

    let store = open_store(&args, &config)?;
    let service = InstanceService::new(store, &config);

    if let Some(path) = &args.mixins {
        let definitions: Vec<MixinDefinition> = serde_json::from_str(&read_input(Some(path))?)
            .with_context(|| format!("Malformed mixin definitions in {}", path.display()))?;
        for definition in &definitions {
            service
                .mixins()
                .add_mixin(definition)
                .with_context(|| format!("Invalid mixin {}", definition.title))?;
        }
        info!(count = definitions.len(), "loaded mixin definitions");
    }

    let request: EntityRequest = serde_json::from_str(&read_input(args.input.as_ref())?)
        .context("Malformed entity document")?;
    let entity = service
        .build_entity(&request)
        .with_context(|| format!("Failed to build {} entity", request.kind))?;

    let output = if let Some(action) = &args.model {
        let model = service.transformers().to_model(&entity, action)?;
        serde_json::to_string_pretty(&model)?
    } else if args.create {
        let stored = service.create(&entity, entity.transformer_type())?;
        serde_json::to_string_pretty(&stored.render())?
    } else {
        serde_json::to_string_pretty(&entity.render())?
    };

    println!("{output}");
    Ok(())
}
