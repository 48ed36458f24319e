//! prisma-gen-drizzle
//!
//! A schema generator that turns a parsed datamodel into Drizzle ORM schema
//! modules for PostgreSQL, MySQL and SQLite.
//!
//! Usage as a plugin:
//!   echo '{"datamodel": {...}, "config": {"provider": "postgresql"}}' | prisma-gen-drizzle
//!
//! Usage as a library:
//!
//! ```no_run
//! use prisma_gen_drizzle::{Config, Datamodel, DialectId, generate_modules};
//!
//! let datamodel: Datamodel = serde_json::from_str("{\"models\": []}").unwrap();
//! for module in generate_modules(datamodel, Config::new(DialectId::Postgres)).unwrap() {
//!     println!("// {}.ts\n{}", module.name, module.code);
//! }
//! ```

#![deny(missing_docs)]

pub mod adapters;
pub mod codegen;
pub mod definition;
pub mod directive;
pub mod error;
pub mod ir;
pub mod naming;
pub mod options;

pub use codegen::{
    GenerateRequest, GenerateResponse, GeneratedFile, Module, generate, generate_from_bytes,
    generate_modules,
};
pub use error::{GeneratorError, Result};
pub use ir::Datamodel;
pub use options::{Config, DateMode, DialectId, ModuleResolution, OutputMode};
