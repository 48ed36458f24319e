//! Drizzle schema generation
//!
//! Turns a parsed datamodel into TypeScript modules:
//! - one table module per model (`users.ts`)
//! - one module per enum, on dialects with native enums
//! - one relations module per model with relation fields
//! - join table modules for implicit many-to-many relations
//! - a schema root re-exporting everything

pub mod column;
pub mod enum_gen;
pub mod generator;
pub mod join;
pub mod package;
pub mod relation;
pub mod table;

use std::collections::{BTreeMap, BTreeSet};

use crate::adapters::{Adapter, get_adapter};
use crate::error::Result;
use crate::ir::{Datamodel, Enum, Model};
use crate::options::Config;

pub use generator::{GenerateRequest, GenerateResponse, GeneratedFile, generate, generate_from_bytes, generate_modules};
pub use package::Module;

/// Everything a generation pass reads; built once and never mutated
pub struct GeneratorContext {
    /// Parsed configuration
    pub config: Config,

    /// Adapter for the configured dialect
    pub adapter: Box<dyn Adapter>,

    /// Input models (implicit many-to-many fields rewritten) followed by join models
    models: Vec<Model>,

    /// Number of leading entries of `models` that came from the input
    input_count: usize,

    /// Schema enums in declaration order
    pub enums: Vec<Enum>,

    /// Distinct relation names per unordered model pair
    relation_names: BTreeMap<(String, String), BTreeSet<String>>,
}

impl GeneratorContext {
    /// Build the context: resolve the adapter, synthesize join models and
    /// check every relation field
    pub fn new(datamodel: Datamodel, config: Config) -> Result<Self> {
        let adapter = get_adapter(config.provider);
        let (mut models, joins) = join::synthesize(&datamodel.models)?;
        let input_count = models.len();
        models.extend(joins);

        let mut relation_names: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
        for model in &models {
            for field in model.relation_fields() {
                if let Some(rel) = field.relation() {
                    relation_names
                        .entry(model_pair(&model.name, rel.related_model))
                        .or_default()
                        .insert(rel.relation_name.to_string());
                }
            }
        }

        let ctx = Self {
            config,
            adapter,
            models,
            input_count,
            enums: datamodel.enums,
            relation_names,
        };

        // relations are checked even when no relations modules are emitted
        for model in &ctx.models {
            for field in model.relation_fields() {
                relation::resolve(&ctx, model, field)?;
            }
        }

        Ok(ctx)
    }

    /// Models from the input, in declaration order
    pub fn input_models(&self) -> &[Model] {
        &self.models[..self.input_count]
    }

    /// Synthesized join models, in first-seen order
    pub fn join_models(&self) -> &[Model] {
        &self.models[self.input_count..]
    }

    /// Look up any model, input or synthesized
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Number of distinct relation names connecting two models
    pub fn relation_count(&self, a: &str, b: &str) -> usize {
        self.relation_names
            .get(&model_pair(a, b))
            .map_or(0, BTreeSet::len)
    }
}

fn model_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ir::{Field, FieldKind, Model};

    pub fn scalar(name: &str, type_name: &str) -> Field {
        Field {
            name: name.to_string(),
            kind: FieldKind::Scalar,
            type_name: type_name.to_string(),
            is_required: true,
            ..Default::default()
        }
    }

    pub fn id(name: &str, type_name: &str) -> Field {
        Field {
            is_id: true,
            ..scalar(name, type_name)
        }
    }

    /// Holder side: `field Related @relation(name, fields: [from], references: [to])`
    pub fn holder(name: &str, related: &str, relation: &str, from: &str, to: &str) -> Field {
        Field {
            name: name.to_string(),
            kind: FieldKind::Object,
            type_name: related.to_string(),
            is_required: true,
            relation_name: Some(relation.to_string()),
            relation_from_fields: vec![from.to_string()],
            relation_to_fields: vec![to.to_string()],
            ..Default::default()
        }
    }

    /// Virtual side without foreign-key fields
    pub fn back(name: &str, related: &str, relation: &str, is_list: bool) -> Field {
        Field {
            name: name.to_string(),
            kind: FieldKind::Object,
            type_name: related.to_string(),
            is_list,
            relation_name: Some(relation.to_string()),
            ..Default::default()
        }
    }

    pub fn model(name: &str, fields: Vec<Field>) -> Model {
        Model {
            name: name.to_string(),
            fields,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::GeneratorError;
    use crate::options::DialectId;

    #[test]
    fn test_relation_to_unknown_model_fails_without_relational_query() {
        let datamodel = Datamodel {
            models: vec![model(
                "Post",
                vec![
                    id("id", "Int"),
                    scalar("authorId", "Int"),
                    holder("author", "Ghost", "PostToGhost", "authorId", "id"),
                ],
            )],
            enums: vec![],
        };
        let mut config = Config::new(DialectId::Postgres);
        config.relational_query = false;
        match GeneratorContext::new(datamodel, config) {
            Err(GeneratorError::UnresolvedRelation { model, field, reason }) => {
                assert_eq!(model, "Post");
                assert_eq!(field, "author");
                assert!(reason.contains("Ghost"));
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("expected UnresolvedRelation"),
        }
    }

    #[test]
    fn test_relation_count_is_symmetric() {
        let datamodel = Datamodel {
            models: vec![
                model(
                    "User",
                    vec![
                        id("id", "Int"),
                        back("written", "Post", "author", true),
                        back("reviewed", "Post", "reviewer", true),
                    ],
                ),
                model(
                    "Post",
                    vec![
                        id("id", "Int"),
                        scalar("authorId", "Int"),
                        scalar("reviewerId", "Int"),
                        holder("author", "User", "author", "authorId", "id"),
                        holder("reviewer", "User", "reviewer", "reviewerId", "id"),
                    ],
                ),
            ],
            enums: vec![],
        };
        let ctx = GeneratorContext::new(datamodel, Config::new(DialectId::Postgres)).unwrap();
        assert_eq!(ctx.relation_count("User", "Post"), 2);
        assert_eq!(ctx.relation_count("Post", "User"), 2);
        assert_eq!(ctx.relation_count("User", "User"), 0);
        assert_eq!(ctx.input_models().len(), 2);
        assert!(ctx.join_models().is_empty());
    }
}
