//! drizzle-gen: generate Drizzle ORM schema modules from a datamodel file
//!
//! Reads the parsed datamodel (camelCase JSON) and writes one TypeScript
//! module per table, enum and relations declaration, plus a schema root.
//! An `--output` ending in `.ts` writes everything into that single file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use prisma_gen_drizzle::{Config, Datamodel, GeneratorError, generate_modules};
use tracing_subscriber::EnvFilter;

mod error;
mod writer;

use error::{CliError, CliResult};

#[derive(Parser, Debug)]
#[command(name = "drizzle-gen")]
#[command(about = "Generate Drizzle ORM schema modules from a datamodel")]
struct Args {
    /// Datamodel JSON file
    datamodel: PathBuf,

    /// Target dialect (postgresql, mysql, sqlite)
    #[arg(short, long)]
    provider: String,

    /// Output directory, or a `.ts` file for single-file output
    #[arg(short, long, default_value = "./drizzle")]
    output: String,

    /// How DateTime columns surface in TypeScript (date, string)
    #[arg(long)]
    date_mode: Option<String>,

    /// Import path style for generated modules (bundler, nodenext)
    #[arg(long)]
    module_resolution: Option<String>,

    /// Skip relations declarations
    #[arg(long)]
    no_relational_query: bool,

    /// Print the generated modules instead of writing them
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    /// The same string configuration the plugin receives
    fn config(&self) -> Result<Config, GeneratorError> {
        let mut values = BTreeMap::new();
        values.insert("provider".to_string(), self.provider.clone());
        values.insert("output".to_string(), self.output.clone());
        values.insert(
            "relationalQuery".to_string(),
            (!self.no_relational_query).to_string(),
        );
        if let Some(mode) = &self.date_mode {
            values.insert("dateMode".to_string(), mode.clone());
        }
        if let Some(resolution) = &self.module_resolution {
            values.insert("moduleResolution".to_string(), resolution.clone());
        }
        Config::from_map(&values)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> CliResult<()> {
    let config = args.config()?;
    let datamodel = read_datamodel(&args.datamodel)?;

    let output = PathBuf::from(&config.output);
    let mode = config.output_mode();
    let modules = generate_modules(datamodel, config)?;
    let paths = writer::plan(&output, &mode, &modules);

    for (module, path) in modules.iter().zip(&paths) {
        if args.dry_run {
            println!("// {}\n{}", path.display(), module.code);
        } else {
            writer::write(path, &module.code)?;
            tracing::debug!(path = %path.display(), "wrote module");
        }
    }

    if !args.dry_run {
        tracing::info!(files = paths.len(), output = %output.display(), "wrote drizzle schema");
    }
    Ok(())
}

fn read_datamodel(path: &Path) -> CliResult<Datamodel> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| CliError::Generate(GeneratorError::from(e)))
}
