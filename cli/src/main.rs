use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use pgweave_core::{
    Registry, SqlObject, build_all_sql, build_composite_sql, build_enum_sql, build_schema_sql,
    build_table_sql,
};
use pgweave_loader::{
    GenerateConfig, collect_definition_paths, load_definitions, parse_definition_files,
};

/// Output format for the `list` subcommand.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ListFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pgweave")]
#[command(about = "Generate ordered Postgres DDL from declarative schema definitions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a full DDL script from a directory of definition files.
    Generate(GenerateArgs),
    /// Render the DDL for a single object to stdout.
    Render(RenderArgs),
    /// Parse and validate definition files without generating anything.
    Validate(ValidateArgs),
    /// List the objects declared in the definition files.
    List(ListArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// YAML config file holding generation settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory containing definition files (overrides the config file).
    #[arg(long)]
    definitions: Option<PathBuf>,
    /// Output path for the generated SQL script (overrides the config file).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Do not descend into subdirectories.
    #[arg(long)]
    flat: bool,
    /// Emit DROP SCHEMA ... CASCADE statements before the creates.
    #[arg(long)]
    drop_schemas: bool,
    /// Banner comment written at the top of the script.
    #[arg(long)]
    header: Option<String>,
}

#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("target").required(true)))]
struct RenderArgs {
    /// Directory containing definition files.
    #[arg(long)]
    definitions: PathBuf,
    /// Do not descend into subdirectories.
    #[arg(long)]
    flat: bool,
    /// Qualified name of a table to render.
    #[arg(long, group = "target")]
    table: Option<String>,
    /// Qualified name of a composite type to render.
    #[arg(long, group = "target")]
    composite: Option<String>,
    /// Qualified name of an enum to render.
    #[arg(long = "enum", group = "target")]
    enum_type: Option<String>,
    /// Name of a schema to render.
    #[arg(long, group = "target")]
    schema: Option<String>,
    /// Include the object's transitive dependencies, in creation order.
    #[arg(long)]
    with_dependencies: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Definition files and/or directories containing definition files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Directory containing definition files.
    #[arg(long)]
    definitions: PathBuf,
    /// Do not descend into subdirectories.
    #[arg(long)]
    flat: bool,
    /// Output format (default: table).
    #[arg(long, default_value = "table")]
    format: ListFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pgweave_loader=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Render(args) => run_render(args),
        Command::Validate(args) => run_validate(args),
        Command::List(args) => run_list(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let mut config = match args.config {
        Some(path) => GenerateConfig::load(&path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => {
            let definitions = args
                .definitions
                .clone()
                .ok_or("Specify --definitions (or --config)")?;
            let output = args.output.clone().ok_or("Specify --output (or --config)")?;
            GenerateConfig::new(definitions, output)
        }
    };
    // Command-line flags override config file settings.
    if let Some(definitions) = args.definitions {
        config.definitions = definitions;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.flat {
        config.recursive = false;
    }
    if args.drop_schemas {
        config.drop_schemas = true;
    }
    if let Some(header) = args.header {
        config.header = header;
    }

    let registry = load_registry(&config.definitions, config.recursive)?;
    let objects = build_all_sql(&registry).map_err(|err| err.to_string())?;

    let mut script = String::new();
    script.push_str(&config.header);
    script.push('\n');
    if config.drop_schemas {
        script.push('\n');
        for schema in registry.schemas() {
            script.push_str(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE;\n"));
        }
    }
    for block in render_blocks(&objects) {
        script.push('\n');
        script.push_str(&block);
    }

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    fs::write(&config.output, &script).map_err(|err| {
        format!(
            "Failed to write script to '{}': {err}",
            config.output.display()
        )
    })?;

    println!(
        "Wrote {} statement block(s) to {}",
        objects.len(),
        config.output.display()
    );
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<(), String> {
    let registry = load_registry(&args.definitions, !args.flat)?;

    let objects = if let Some(name) = args.table.as_deref() {
        build_table_sql(&registry, Some(&|n| n == name), args.with_dependencies)
            .map_err(|err| err.to_string())?
    } else if let Some(name) = args.composite.as_deref() {
        build_composite_sql(&registry, Some(&|n| n == name), args.with_dependencies)
            .map_err(|err| err.to_string())?
    } else if let Some(name) = args.enum_type.as_deref() {
        build_enum_sql(&registry, Some(&|n| n == name))
    } else if let Some(name) = args.schema.as_deref() {
        build_schema_sql(&registry, Some(&|n| n == name))
    } else {
        unreachable!("clap enforces exactly one render target");
    };

    if objects.is_empty() {
        return Err("No matching object found in the loaded definitions".to_string());
    }

    print!("{}", render_blocks(&objects).join("\n"));
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut paths = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            paths.extend(
                collect_definition_paths(input, true).map_err(|err| err.to_string())?,
            );
        } else if input.is_file() {
            let is_yaml = input.extension() == Some(OsStr::new("yaml"))
                || input.extension() == Some(OsStr::new("yml"));
            if !is_yaml {
                return Err(format!(
                    "Definition file '{}' must end in .yaml or .yml",
                    input.display()
                ));
            }
            paths.push(input.clone());
        } else {
            return Err(format!(
                "Definition path '{}' does not exist",
                input.display()
            ));
        }
    }

    let collections = parse_definition_files(&paths).map_err(|err| err.to_string())?;

    // Structural checks passed; duplicates across files are caught by the merge.
    let mut registry = Registry::new();
    registry
        .merge(collections)
        .map_err(|errors| pgweave_loader::LoaderError::Merge(errors).to_string())?;

    println!("{} definition file(s) OK", paths.len());
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let registry = load_registry(&args.definitions, !args.flat)?;

    match args.format {
        ListFormat::Table => {
            for (name, def) in registry.enums() {
                println!("{:<10} {:<40} {} item(s)", "enum", name, def.items.len());
            }
            for (name, def) in registry.composites() {
                println!(
                    "{:<10} {:<40} {} column(s)",
                    "composite",
                    name,
                    def.columns.len()
                );
            }
            for (name, def) in registry.tables() {
                println!("{:<10} {:<40} {} column(s)", "table", name, def.columns.len());
            }
            for name in registry.schemas() {
                println!("{:<10} {name}", "schema");
            }
        }
        ListFormat::Json => {
            let listing = serde_json::json!({
                "enums": registry.enums().map(|(name, def)| serde_json::json!({
                    "name": name,
                    "items": def.items.len(),
                })).collect::<Vec<_>>(),
                "composites": registry.composites().map(|(name, def)| serde_json::json!({
                    "name": name,
                    "columns": def.columns.len(),
                })).collect::<Vec<_>>(),
                "tables": registry.tables().map(|(name, def)| serde_json::json!({
                    "name": name,
                    "columns": def.columns.len(),
                })).collect::<Vec<_>>(),
                "schemas": registry.schemas().collect::<Vec<_>>(),
            });
            let rendered = serde_json::to_string_pretty(&listing)
                .map_err(|err| format!("JSON serialization failed: {err}"))?;
            println!("{rendered}");
        }
    }
    Ok(())
}

fn load_registry(definitions: &Path, recursive: bool) -> Result<Registry, String> {
    let mut registry = Registry::new();
    load_definitions(&mut registry, definitions, recursive).map_err(|err| err.to_string())?;
    Ok(registry)
}

/// Renders each object into a newline-terminated statement block.
fn render_blocks(objects: &[SqlObject<'_>]) -> Vec<String> {
    objects
        .iter()
        .map(|object| {
            let mut block = object.render_create_statement();
            if !block.ends_with('\n') {
                block.push('\n');
            }
            block
        })
        .collect()
}
