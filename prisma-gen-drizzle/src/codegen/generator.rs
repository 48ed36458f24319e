//! Code generation orchestration
//!
//! Builds the generation context, walks the datamodel in a fixed order and
//! assembles the modules. Also defines the plugin's request/response types.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::package::{self, Module};
use super::{GeneratorContext, enum_gen, relation, table};
use crate::definition::Definition;
use crate::error::{GeneratorError, Result};
use crate::ir::Datamodel;
use crate::naming;
use crate::options::{Config, OutputMode};

/// Plugin input: the parsed datamodel and the host's string configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    /// Models and enums to generate
    pub datamodel: Datamodel,
    /// Generator options as written in the schema's generator block
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

/// A file to write, relative to the output location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// File name, `users.ts` or the single-file name
    pub name: String,
    /// TypeScript source
    pub content: String,
}

/// Plugin output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateResponse {
    /// Generated files, empty on error
    pub files: Vec<GeneratedFile>,
    /// Why generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// A response carrying only an error
    pub fn from_error(error: &GeneratorError) -> Self {
        Self {
            files: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Generate every module for a datamodel
///
/// Directory mode order: tables (input order), enums, relations (model
/// order), each join table followed by its relations, then the schema root.
/// Single-file mode declares enums first so tables can use them.
pub fn generate_modules(datamodel: Datamodel, config: Config) -> Result<Vec<Module>> {
    let ctx = GeneratorContext::new(datamodel, config)?;
    let resolution = ctx.config.module_resolution;

    let mut tables = Vec::new();
    for model in ctx.input_models() {
        tables.push((naming::table_module(&model.name), table::generate(&ctx, model)?));
    }

    let enums: Vec<(String, Definition)> = ctx
        .enums
        .iter()
        .filter_map(|e| enum_gen::generate(&ctx, e).map(|d| (naming::enum_module(&e.name), d)))
        .collect();

    let mut relations = Vec::new();
    if ctx.config.relational_query {
        for model in ctx.input_models() {
            if let Some(decl) = relation::generate(&ctx, model)? {
                relations.push((naming::relations_module(&model.name), decl));
            }
        }
    }

    let mut join_tables = Vec::new();
    let mut join_relations = Vec::new();
    for model in ctx.join_models() {
        join_tables.push((naming::table_module(&model.name), table::generate(&ctx, model)?));
        let decl = if ctx.config.relational_query {
            relation::generate(&ctx, model)?.map(|d| (naming::relations_module(&model.name), d))
        } else {
            None
        };
        join_relations.push(decl);
    }

    let modules = match ctx.config.output_mode() {
        OutputMode::Directory => {
            let mut modules: Vec<Module> = tables
                .into_iter()
                .chain(enums)
                .chain(relations)
                .chain(
                    join_tables
                        .into_iter()
                        .zip(join_relations)
                        .flat_map(|(table, relations)| std::iter::once(table).chain(relations)),
                )
                .map(|(name, decl)| package::assemble_module(name, vec![decl], resolution))
                .collect();
            modules.push(package::schema_root(&modules, resolution));
            modules
        }
        OutputMode::SingleFile(name) => {
            let declarations = enums
                .into_iter()
                .chain(tables)
                .chain(join_tables)
                .chain(relations)
                .chain(join_relations.into_iter().flatten())
                .map(|(_, decl)| decl)
                .collect();
            vec![package::assemble_single_file(name, declarations, resolution)]
        }
    };

    tracing::info!(
        dialect = %ctx.adapter.dialect(),
        models = ctx.input_models().len(),
        join_tables = ctx.join_models().len(),
        enums = ctx.enums.len(),
        modules = modules.len(),
        "generated drizzle schema"
    );
    Ok(modules)
}

/// Run a plugin request
pub fn generate(request: GenerateRequest) -> Result<GenerateResponse> {
    let config = Config::from_map(&request.config)?;
    let single_file = match config.output_mode() {
        OutputMode::SingleFile(_) => Path::new(&config.output)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
        OutputMode::Directory => None,
    };

    let modules = generate_modules(request.datamodel, config)?;
    let files = modules
        .into_iter()
        .map(|module| GeneratedFile {
            name: single_file
                .clone()
                .unwrap_or_else(|| format!("{}.ts", module.name)),
            content: module.code,
        })
        .collect();

    Ok(GenerateResponse { files, error: None })
}

/// Run a plugin request from raw JSON bytes
pub fn generate_from_bytes(bytes: &[u8]) -> Result<GenerateResponse> {
    let request: GenerateRequest = serde_json::from_slice(bytes)?;
    generate(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::test_support::{id, model, scalar};

    fn datamodel() -> Datamodel {
        Datamodel {
            models: vec![model("User", vec![id("id", "Int"), scalar("name", "String")])],
            enums: vec![],
        }
    }

    #[test]
    fn test_directory_mode_files() {
        let request = GenerateRequest {
            datamodel: datamodel(),
            config: [("provider".to_string(), "postgresql".to_string())].into(),
        };
        let response = generate(request).unwrap();
        let names: Vec<_> = response.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["users.ts", "schema.ts"]);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_single_file_mode_file_name() {
        let request = GenerateRequest {
            datamodel: datamodel(),
            config: [
                ("provider".to_string(), "sqlite".to_string()),
                ("output".to_string(), "./src/db/schema.ts".to_string()),
            ]
            .into(),
        };
        let response = generate(request).unwrap();
        assert_eq!(response.files.len(), 1);
        assert_eq!(response.files[0].name, "schema.ts");
        assert!(
            response.files[0]
                .content
                .ends_with("export const schema = { users };\n")
        );
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = generate_from_bytes(b"{not json").unwrap_err();
        assert!(matches!(err, GeneratorError::Decode(_)));
    }

    #[test]
    fn test_error_response_has_no_files() {
        let err = GeneratorError::Configuration("boom".to_string());
        let response = GenerateResponse::from_error(&err);
        assert!(response.files.is_empty());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({ "files": [], "error": "configuration error: boom" })
        );
    }
}
