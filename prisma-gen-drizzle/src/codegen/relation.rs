//! Relations declarations
//!
//! ```text
//! export const postsRelations = relations(posts, (helpers) => { return {
//!     author: helpers.one(users, { fields: [ posts.authorId ], references: [ users.id ] }),
//!     comments: helpers.many(comments),
//! }; });
//! ```
//!
//! The side holding the foreign key lists `fields`/`references`; the other
//! side only names the related table. `relationName` is added when two
//! models are connected by more than one relation, and for self-relations,
//! so Drizzle can pair both sides.

use super::{GeneratorContext, join};
use crate::definition::{Definition, ImportRequirement};
use crate::error::{GeneratorError, Result};
use crate::ir::{Field, Model, RelationMeta};
use crate::naming;

/// Generate the relations declaration of a model, `None` when it has no relation fields
pub fn generate(ctx: &GeneratorContext, model: &Model) -> Result<Option<Definition>> {
    let entries = model
        .relation_fields()
        .map(|field| Ok((field.name.as_str(), relation_entry(ctx, model, field)?)))
        .collect::<Result<Vec<_>>>()?;
    if entries.is_empty() {
        return Ok(None);
    }

    let binding = naming::table_binding(&model.name);
    let value = Definition::call(
        "relations",
        vec![
            Definition::var_ref(binding.as_str()),
            Definition::lambda(["helpers"], Definition::object_of(entries)),
        ],
    )
    .with_imports([
        ImportRequirement::named(["relations"], "drizzle-orm"),
        ImportRequirement::local(binding.as_str(), naming::table_module(&model.name)),
    ]);

    Ok(Some(Definition::const_decl(
        naming::relations_binding(&model.name),
        value,
        true,
    )))
}

/// A relation field whose related model, key columns and other side all exist
pub(crate) struct Resolved<'a> {
    /// Relation metadata of the field
    pub rel: RelationMeta<'a>,
    /// The model on the other side
    pub related: &'a Model,
}

/// Check a relation field against the models of the context
pub(crate) fn resolve<'a>(
    ctx: &'a GeneratorContext,
    model: &'a Model,
    field: &'a Field,
) -> Result<Resolved<'a>> {
    let unresolved = |reason: String| GeneratorError::UnresolvedRelation {
        model: model.name.clone(),
        field: field.name.clone(),
        reason,
    };
    let rel = field
        .relation()
        .ok_or_else(|| unresolved("not a relation field".to_string()))?;
    let related = ctx
        .model(rel.related_model)
        .ok_or_else(|| unresolved(format!("unknown model {}", rel.related_model)))?;

    if rel.is_holder() {
        if rel.from_fields.len() != rel.to_fields.len() {
            return Err(unresolved(format!(
                "{} foreign-key fields but {} referenced fields",
                rel.from_fields.len(),
                rel.to_fields.len()
            )));
        }
        if let Some(name) = missing_column(model, rel.from_fields) {
            return Err(unresolved(format!("unknown foreign-key field {}", name)));
        }
        if let Some(name) = missing_column(related, rel.to_fields) {
            return Err(unresolved(format!(
                "unknown referenced field {}.{}",
                related.name, name
            )));
        }
    } else if join::opposite_field(model, field, related).is_none() {
        return Err(unresolved(format!("no opposite field on {}", related.name)));
    }

    Ok(Resolved { rel, related })
}

fn missing_column<'n>(model: &Model, names: &'n [String]) -> Option<&'n String> {
    names
        .iter()
        .find(|name| !model.field(name).is_some_and(|f| f.relation().is_none()))
}

fn relation_entry(ctx: &GeneratorContext, model: &Model, field: &Field) -> Result<Definition> {
    let Resolved { rel, related } = resolve(ctx, model, field)?;

    let related_binding = naming::table_binding(&related.name);
    let target = Definition::var_ref(related_binding.as_str()).with_imports([
        ImportRequirement::local(related_binding.as_str(), naming::table_module(&related.name)),
    ]);
    let relation_name = needs_relation_name(ctx, model, &rel)
        .then(|| ("relationName", Definition::string(rel.relation_name)));

    if rel.is_holder() {
        let own_binding = naming::table_binding(&model.name);
        let options = relation_name.into_iter().chain([
            ("fields", column_refs(&own_binding, rel.from_fields)),
            ("references", column_refs(&related_binding, rel.to_fields)),
        ]);
        return Ok(Definition::call(
            "helpers.one",
            vec![target, Definition::object_of(options)],
        ));
    }

    let mut args = vec![target];
    if let Some(option) = relation_name {
        args.push(Definition::object_of([option]));
    }
    let helper = if rel.is_list { "helpers.many" } else { "helpers.one" };
    Ok(Definition::call(helper, args))
}

/// Whether Drizzle needs `relationName` to pair this relation with its other side
fn needs_relation_name(ctx: &GeneratorContext, model: &Model, rel: &RelationMeta<'_>) -> bool {
    rel.related_model == model.name || ctx.relation_count(&model.name, rel.related_model) > 1
}

/// `[ binding.column, ... ]`
fn column_refs(binding: &str, names: &[String]) -> Definition {
    Definition::array(
        names
            .iter()
            .map(|name| Definition::var_ref(format!("{}.{}", binding, name)))
            .collect(),
    )
}
