//! Module assembly
//!
//! A module is a list of declarations serialized as one TypeScript file:
//! the aggregated import block, a blank line, then the declarations
//! separated by blank lines.

use crate::definition::{Definition, Entry, ImportRequirement, ModuleSpecifier, aggregate};
use crate::naming;
use crate::options::ModuleResolution;

/// Name of the module re-exporting every generated declaration
pub const SCHEMA_MODULE: &str = "schema";

/// A generated source module
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Module name, without extension (`users`, `role-enum`)
    pub name: String,
    /// Declarations in emission order
    pub declarations: Vec<Definition>,
    /// Aggregated imports
    pub imports: Vec<ImportRequirement>,
    /// Serialized source
    pub code: String,
}

impl Module {
    /// Names of the bindings this module declares
    pub fn bindings(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().filter_map(Definition::name)
    }
}

/// Assemble a module from its declarations
pub fn assemble_module(
    name: impl Into<String>,
    declarations: Vec<Definition>,
    resolution: ModuleResolution,
) -> Module {
    let name = name.into();
    let imports = aggregate(
        declarations
            .iter()
            .flat_map(Definition::imports)
            .filter(|i| i.module != ModuleSpecifier::Local(name.clone())),
    );
    build(name, declarations, imports, resolution)
}

/// Assemble every declaration into one module; sibling imports disappear
pub fn assemble_single_file(
    name: impl Into<String>,
    mut declarations: Vec<Definition>,
    resolution: ModuleResolution,
) -> Module {
    let imports = aggregate(
        declarations
            .iter()
            .flat_map(Definition::imports)
            .filter(|i| !i.module.is_local()),
    );
    let bindings: Vec<Entry> = declarations
        .iter()
        .filter_map(Definition::name)
        .map(|b| Entry::Shorthand(b.to_string()))
        .collect();
    declarations.push(schema_declaration(bindings));
    build(name.into(), declarations, imports, resolution)
}

/// The schema root: a wildcard import of every module, spread into `schema`
pub fn schema_root(modules: &[Module], resolution: ModuleResolution) -> Module {
    let mut imports = Vec::with_capacity(modules.len());
    let mut entries = Vec::with_capacity(modules.len());
    for module in modules {
        let alias = naming::module_alias(&module.name);
        imports.push(ImportRequirement::wildcard(
            alias.as_str(),
            ModuleSpecifier::Local(module.name.clone()),
        ));
        entries.push(Entry::Spread(Definition::var_ref(alias)));
    }
    build(
        SCHEMA_MODULE.to_string(),
        vec![schema_declaration(entries)],
        aggregate(imports),
        resolution,
    )
}

fn schema_declaration(entries: Vec<Entry>) -> Definition {
    Definition::const_decl(SCHEMA_MODULE, Definition::object(entries), true)
}

fn build(
    name: String,
    declarations: Vec<Definition>,
    imports: Vec<ImportRequirement>,
    resolution: ModuleResolution,
) -> Module {
    let mut code = String::new();
    for import in &imports {
        code.push_str(&Definition::import(import, resolution).render());
        code.push('\n');
    }
    if !imports.is_empty() {
        code.push('\n');
    }
    let body: Vec<String> = declarations.iter().map(Definition::render).collect();
    code.push_str(&body.join("\n\n"));
    code.push('\n');

    Module {
        name,
        declarations,
        imports,
        code,
    }
}
