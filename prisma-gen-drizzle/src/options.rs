//! Generator configuration
//!
//! The host hands the generator a flat string map (the generator block of the
//! schema). It is parsed once per run into a typed `Config`; unknown keys are
//! ignored, invalid values are configuration errors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{GeneratorError, Result};

/// Default output location when none is configured
pub const DEFAULT_OUTPUT: &str = "./drizzle";

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectId {
    /// PostgreSQL (`drizzle-orm/pg-core`)
    Postgres,
    /// MySQL (`drizzle-orm/mysql-core`)
    Mysql,
    /// SQLite (`drizzle-orm/sqlite-core`)
    Sqlite,
}

impl DialectId {
    /// Canonical identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            DialectId::Postgres => "postgresql",
            DialectId::Mysql => "mysql",
            DialectId::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectId {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(DialectId::Postgres),
            "mysql" => Ok(DialectId::Mysql),
            "sqlite" => Ok(DialectId::Sqlite),
            other => Err(GeneratorError::Configuration(format!(
                "unknown provider: {}",
                other
            ))),
        }
    }
}

/// How DateTime columns surface in TypeScript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateMode {
    /// `Date` objects
    #[default]
    Date,
    /// ISO strings
    String,
}

impl FromStr for DateMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "date" => Ok(DateMode::Date),
            "string" => Ok(DateMode::String),
            other => Err(format!("expected `date` or `string`, got `{}`", other)),
        }
    }
}

/// Import path style for generated sibling modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleResolution {
    /// `./users`
    #[default]
    Bundler,
    /// `./users.js` (node16 / nodenext ESM)
    NodeNext,
}

impl ModuleResolution {
    /// Interpret a `moduleResolution` value
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "nodenext" | "node16" => ModuleResolution::NodeNext,
            _ => ModuleResolution::Bundler,
        }
    }
}

/// Where the generated modules go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// One file per module inside a directory
    Directory,
    /// Every declaration in one file; carries the module name (file stem)
    SingleFile(String),
}

/// Parsed generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Target dialect
    pub provider: DialectId,

    /// Output directory or `.ts` file
    pub output: String,

    /// Whether relation declarations are generated
    pub relational_query: bool,

    /// Default DateTime mode
    pub date_mode: DateMode,

    /// Import path style
    pub module_resolution: ModuleResolution,
}

impl Config {
    /// Configuration with defaults for everything but the dialect
    pub fn new(provider: DialectId) -> Self {
        Self {
            provider,
            output: DEFAULT_OUTPUT.to_string(),
            relational_query: true,
            date_mode: DateMode::Date,
            module_resolution: ModuleResolution::Bundler,
        }
    }

    /// Parse the host's string configuration
    pub fn from_map(values: &BTreeMap<String, String>) -> Result<Self> {
        let provider = values
            .get("provider")
            .ok_or_else(|| GeneratorError::Configuration("missing `provider`".to_string()))?
            .parse::<DialectId>()?;

        let mut config = Config::new(provider);

        if let Some(output) = values.get("output") {
            if output.trim().is_empty() {
                return Err(GeneratorError::Configuration(
                    "`output` must not be empty".to_string(),
                ));
            }
            config.output = output.clone();
        }

        if let Some(value) = values.get("relationalQuery") {
            config.relational_query = match value.as_str() {
                "true" => true,
                "false" => false,
                other => {
                    return Err(GeneratorError::Configuration(format!(
                        "`relationalQuery` must be `true` or `false`, got `{}`",
                        other
                    )));
                }
            };
        }

        if let Some(value) = values.get("dateMode") {
            config.date_mode = value.parse().map_err(|e| {
                GeneratorError::Configuration(format!("invalid `dateMode`: {}", e))
            })?;
        }

        if let Some(value) = values.get("moduleResolution") {
            config.module_resolution = ModuleResolution::parse(value);
        }

        Ok(config)
    }

    /// Output mode inferred from the `output` suffix
    pub fn output_mode(&self) -> OutputMode {
        let path = Path::new(&self.output);
        match (path.extension(), path.file_stem()) {
            (Some(ext), Some(stem)) if ext == "ts" => {
                OutputMode::SingleFile(stem.to_string_lossy().into_owned())
            }
            _ => OutputMode::Directory,
        }
    }
}
