use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use kotori::{EngineOptions, PackageIndex, Referers, Renderer};
use serde_json::{Map, Value};

#[derive(Parser, Debug)]
#[command(
    name = "kotori",
    about = "Render a Jinja template from directories or a package",
    version,
    long_about = None
)]
#[command(group(ArgGroup::new("source").required(true).args(["dirs", "package"])))]
struct Cli {
    /// Template path relative to the template directories
    template: String,

    /// Template directory, searched in the order given
    #[arg(short, long = "dir", value_name = "DIR")]
    dirs: Vec<PathBuf>,

    /// Dotted package path; the last segment is the template directory
    #[arg(short, long, value_name = "a.b.view")]
    package: Option<String>,

    /// Directory under which package modules are looked up
    #[arg(long = "package-root", value_name = "DIR", requires = "package")]
    package_roots: Vec<PathBuf>,

    /// Engine options as YAML
    #[arg(short, long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Template variables as a JSON object
    #[arg(short, long, value_name = "FILE")]
    context: Option<PathBuf>,

    /// Template variable; the value is parsed as JSON, else taken as a string
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    vars: Vec<(String, Value)>,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output = run(&cli)?;
    print!("{}", output);

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "kotori=warn",
        1 => "kotori=info",
        _ => "kotori=debug",
    };
    let filter = EnvFilter::try_from_env("KOTORI_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<String> {
    let options = match &cli.options {
        Some(path) => EngineOptions::from_file(path)
            .with_context(|| format!("failed to load engine options from {}", path.display()))?,
        None => EngineOptions::default(),
    };

    let packages = cli
        .package_roots
        .iter()
        .fold(PackageIndex::new(), |index, root| index.with_search_root(root));

    let renderer = Renderer::builder(referers(cli)?)
        .options(options)
        .packages(packages)
        .build()?;

    let context = build_context(cli.context.as_ref(), &cli.vars)?;
    tracing::info!(template = %cli.template, "rendering");

    renderer
        .render(&cli.template, context)
        .with_context(|| format!("failed to render {}", cli.template))
}

fn referers(cli: &Cli) -> Result<Referers> {
    match &cli.package {
        Some(path) => Ok(Referers::dotted(path)),
        None if !cli.dirs.is_empty() => Ok(Referers::directories(cli.dirs.iter())),
        None => bail!("either --dir or --package is required"),
    }
}

/// Loads the JSON context file, then applies `--var` overrides on top.
fn build_context(file: Option<&PathBuf>, vars: &[(String, Value)]) -> Result<Value> {
    let mut context = match file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read context file {}", path.display()))?;
            match serde_json::from_str::<Value>(&raw)
                .with_context(|| format!("invalid JSON in {}", path.display()))?
            {
                Value::Object(map) => map,
                _ => bail!("context file {} must hold a JSON object", path.display()),
            }
        }
        None => Map::new(),
    };

    for (key, value) in vars {
        context.insert(key.clone(), value.clone());
    }

    Ok(Value::Object(context))
}

fn parse_var(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("missing variable name in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
