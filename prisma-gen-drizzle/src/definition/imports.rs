//! Import requirements and their aggregation
//!
//! Every Definition may carry import requirements. Before a module is
//! serialized the requirements of all its declarations are merged into a
//! minimal list: named imports from the same module become one statement,
//! everything else is deduplicated by identity. Output order is the order in
//! which modules were first seen, so regenerated files stay diff-stable.

use crate::options::ModuleResolution;

/// Where an import comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleSpecifier {
    /// A third-party module path (e.g. `drizzle-orm/pg-core`)
    Package(String),
    /// A sibling module produced by the same generation run
    Local(String),
}

impl ModuleSpecifier {
    /// Path as written in an import statement
    pub fn path(&self, resolution: ModuleResolution) -> String {
        match self {
            ModuleSpecifier::Package(path) => path.clone(),
            ModuleSpecifier::Local(name) => match resolution {
                ModuleResolution::Bundler => format!("./{}", name),
                ModuleResolution::NodeNext => format!("./{}.js", name),
            },
        }
    }

    /// Whether the module is generated alongside the importer
    pub fn is_local(&self) -> bool {
        matches!(self, ModuleSpecifier::Local(_))
    }
}

/// What an import brings into scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import { a, b } from '...'`
    Named(Vec<String>),
    /// `import a from '...'`
    Default(String),
    /// `import * as a from '...'`
    Wildcard(String),
}

/// A single import requirement contributed by a Definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportRequirement {
    /// Imported bindings
    pub kind: ImportKind,
    /// Source module
    pub module: ModuleSpecifier,
}

impl ImportRequirement {
    /// Named import from a package
    pub fn named<I, S>(names: I, module: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ImportKind::Named(names.into_iter().map(Into::into).collect()),
            module: ModuleSpecifier::Package(module.into()),
        }
    }

    /// Named import of a binding from a sibling generated module
    pub fn local(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            kind: ImportKind::Named(vec![name.into()]),
            module: ModuleSpecifier::Local(module.into()),
        }
    }

    /// Wildcard import of a sibling generated module
    pub fn wildcard(alias: impl Into<String>, module: ModuleSpecifier) -> Self {
        Self {
            kind: ImportKind::Wildcard(alias.into()),
            module,
        }
    }

    /// Render as an import statement
    pub fn render(&self, resolution: ModuleResolution) -> String {
        let path = self.module.path(resolution);
        match &self.kind {
            ImportKind::Named(names) => {
                format!("import {{ {} }} from '{}';", names.join(", "), path)
            }
            ImportKind::Default(name) => format!("import {} from '{}';", name, path),
            ImportKind::Wildcard(alias) => format!("import * as {} from '{}';", alias, path),
        }
    }
}

/// Merge import requirements into the minimal ordered set of statements
pub fn aggregate<I>(requirements: I) -> Vec<ImportRequirement>
where
    I: IntoIterator<Item = ImportRequirement>,
{
    let mut merged: Vec<ImportRequirement> = Vec::new();

    for requirement in requirements {
        match requirement.kind {
            ImportKind::Named(names) => {
                // Named imports merge into the first statement for the module
                let existing = merged.iter_mut().find(|m| {
                    m.module == requirement.module && matches!(m.kind, ImportKind::Named(_))
                });
                match existing {
                    Some(ImportRequirement {
                        kind: ImportKind::Named(existing_names),
                        ..
                    }) => {
                        for name in names {
                            if !existing_names.contains(&name) {
                                existing_names.push(name);
                            }
                        }
                    }
                    _ => {
                        let mut unique: Vec<String> = Vec::with_capacity(names.len());
                        for name in names {
                            if !unique.contains(&name) {
                                unique.push(name);
                            }
                        }
                        merged.push(ImportRequirement {
                            kind: ImportKind::Named(unique),
                            module: requirement.module,
                        });
                    }
                }
            }
            kind => {
                let requirement = ImportRequirement {
                    kind,
                    module: requirement.module,
                };
                if !merged.contains(&requirement) {
                    merged.push(requirement);
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_imports_merge() {
        let merged = aggregate(vec![
            ImportRequirement::named(["a"], "m"),
            ImportRequirement::named(["b"], "m"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].render(ModuleResolution::Bundler),
            "import { a, b } from 'm';"
        );
    }

    #[test]
    fn test_named_imports_dedupe_in_first_seen_order() {
        let merged = aggregate(vec![
            ImportRequirement::named(["pgTable", "text"], "drizzle-orm/pg-core"),
            ImportRequirement::named(["relations"], "drizzle-orm"),
            ImportRequirement::named(["integer", "text"], "drizzle-orm/pg-core"),
        ]);
        let rendered: Vec<String> = merged
            .iter()
            .map(|m| m.render(ModuleResolution::Bundler))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "import { pgTable, text, integer } from 'drizzle-orm/pg-core';",
                "import { relations } from 'drizzle-orm';",
            ]
        );
    }

    #[test]
    fn test_local_and_package_with_same_name_stay_apart() {
        let merged = aggregate(vec![
            ImportRequirement::named(["users"], "users"),
            ImportRequirement::local("users", "users"),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_wildcards_not_merged_across_aliases() {
        let module = ModuleSpecifier::Local("users".to_string());
        let merged = aggregate(vec![
            ImportRequirement::wildcard("users", module.clone()),
            ImportRequirement::wildcard("people", module.clone()),
            ImportRequirement::wildcard("users", module),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_default_import_render() {
        let import = ImportRequirement {
            kind: ImportKind::Default("Decimal".to_string()),
            module: ModuleSpecifier::Package("decimal.js".to_string()),
        };
        assert_eq!(
            import.render(ModuleResolution::Bundler),
            "import Decimal from 'decimal.js';"
        );
    }

    #[test]
    fn test_local_path_resolution() {
        let import = ImportRequirement::local("users", "users");
        assert_eq!(
            import.render(ModuleResolution::Bundler),
            "import { users } from './users';"
        );
        assert_eq!(
            import.render(ModuleResolution::NodeNext),
            "import { users } from './users.js';"
        );
    }
}
