//! Implicit many-to-many join models
//!
//! Two list relation fields without foreign keys pointing at each other form
//! an implicit many-to-many relation. The database stores it in a join table
//! `_<relationName>` with columns `A` and `B`, where `A` references the model
//! whose name sorts first. This module synthesizes that join table as an
//! ordinary model and rewrites both endpoint fields into one-to-many
//! relations to it, so the rest of the pipeline never sees the implicit form.
//!
//! For a self-relation both columns reference the same model; the endpoint
//! field whose name sorts first maps to `A`.

use std::collections::{BTreeMap, BTreeSet};

use heck::ToLowerCamelCase;

use crate::error::{GeneratorError, Result};
use crate::ir::{Field, FieldKind, Model};

/// How an endpoint field is rewritten
struct Rewrite {
    join_model: String,
    relation_name: String,
}

/// Rewrite implicit many-to-many endpoints and synthesize their join models
///
/// Returns the rewritten input models (same order) and the join models in
/// first-seen order.
pub fn synthesize(models: &[Model]) -> Result<(Vec<Model>, Vec<Model>)> {
    let mut seen = BTreeSet::new();
    let mut joins = Vec::new();
    let mut rewrites: BTreeMap<(String, String), Rewrite> = BTreeMap::new();

    for model in models {
        for field in model.relation_fields() {
            let Some(rel) = field.relation() else {
                continue;
            };
            if !field.is_list || rel.is_holder() {
                continue;
            }
            let related = find_model(models, model, field, rel.related_model)?;
            let opposite = opposite_field(model, field, related).ok_or_else(|| {
                unresolved(model, field, format!("no opposite field on {}", related.name))
            })?;
            if !opposite.is_list || !opposite.relation_from_fields.is_empty() {
                continue;
            }
            if !seen.insert(rel.relation_name.to_string()) {
                continue;
            }

            let join = join_model(rel.relation_name, model, field, related)?;
            for (owner, endpoint, relation_name) in
                endpoint_relations(rel.relation_name, model, field, related, opposite)
            {
                rewrites.insert(
                    (owner, endpoint),
                    Rewrite {
                        join_model: join.name.clone(),
                        relation_name,
                    },
                );
            }
            tracing::debug!(
                relation = rel.relation_name,
                join = %join.name,
                "synthesized implicit many-to-many join model"
            );
            joins.push(join);
        }
    }

    let rewritten = models
        .iter()
        .map(|model| {
            let mut model = model.clone();
            for field in &mut model.fields {
                if let Some(rewrite) = rewrites.get(&(model.name.clone(), field.name.clone())) {
                    field.type_name = rewrite.join_model.clone();
                    field.relation_name = Some(rewrite.relation_name.clone());
                    field.relation_from_fields.clear();
                    field.relation_to_fields.clear();
                    field.is_list = true;
                }
            }
            model
        })
        .collect();

    Ok((rewritten, joins))
}

fn find_model<'a>(models: &'a [Model], model: &Model, field: &Field, name: &str) -> Result<&'a Model> {
    models
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| unresolved(model, field, format!("unknown model {}", name)))
}

/// The field on `related` that forms the other side of `field`'s relation
pub fn opposite_field<'a>(model: &Model, field: &Field, related: &'a Model) -> Option<&'a Field> {
    related.relation_fields().find(|f| {
        f.relation_name == field.relation_name
            && f.type_name == model.name
            && !(related.name == model.name && f.name == field.name)
    })
}

fn unresolved(model: &Model, field: &Field, reason: String) -> GeneratorError {
    GeneratorError::UnresolvedRelation {
        model: model.name.clone(),
        field: field.name.clone(),
        reason,
    }
}

/// `(owner model, endpoint field, relation name towards the join model)` for both endpoints
fn endpoint_relations(
    relation_name: &str,
    model: &Model,
    field: &Field,
    related: &Model,
    opposite: &Field,
) -> [(String, String, String); 2] {
    if model.name == related.name {
        // endpoint sorting first pairs with column A
        let (a, b) = if field.name <= opposite.name {
            (field, opposite)
        } else {
            (opposite, field)
        };
        return [
            (model.name.clone(), a.name.clone(), format!("{}_A", relation_name)),
            (model.name.clone(), b.name.clone(), format!("{}_B", relation_name)),
        ];
    }
    [
        (model.name.clone(), field.name.clone(), relation_name.to_string()),
        (related.name.clone(), opposite.name.clone(), relation_name.to_string()),
    ]
}

fn join_model<'a>(
    relation_name: &str,
    model: &'a Model,
    field: &Field,
    related: &'a Model,
) -> Result<Model> {
    let (a, b) = if model.name <= related.name {
        (model, related)
    } else {
        (related, model)
    };
    let id_of = |endpoint: &'a Model| -> Result<&'a Field> {
        endpoint.id_field().ok_or_else(|| {
            unresolved(
                model,
                field,
                format!(
                    "implicit many-to-many requires a single @id field on {}",
                    endpoint.name
                ),
            )
        })
    };
    let a_id = id_of(a)?;
    let b_id = id_of(b)?;

    let (a_field, b_field, a_relation, b_relation) = if a.name == b.name {
        let base = a.name.to_lower_camel_case();
        (
            format!("{}A", base),
            format!("{}B", base),
            format!("{}_A", relation_name),
            format!("{}_B", relation_name),
        )
    } else {
        (
            a.name.to_lower_camel_case(),
            b.name.to_lower_camel_case(),
            relation_name.to_string(),
            relation_name.to_string(),
        )
    };

    Ok(Model {
        name: format!("_{}", relation_name),
        db_name: None,
        fields: vec![
            key_column("A", a_id),
            key_column("B", b_id),
            holder_field(a_field, &a.name, a_relation, "A", &a_id.name),
            holder_field(b_field, &b.name, b_relation, "B", &b_id.name),
        ],
        primary_key: None,
        documentation: None,
    })
}

fn key_column(name: &str, id: &Field) -> Field {
    Field {
        name: name.to_string(),
        kind: id.kind,
        type_name: id.type_name.clone(),
        is_required: true,
        ..Default::default()
    }
}

fn holder_field(name: String, related: &str, relation_name: String, from: &str, to: &str) -> Field {
    Field {
        name,
        kind: FieldKind::Object,
        type_name: related.to_string(),
        is_required: true,
        relation_name: Some(relation_name),
        relation_from_fields: vec![from.to_string()],
        relation_to_fields: vec![to.to_string()],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::test_support::{back, holder, id, model, scalar};

    fn posts_and_tags() -> Vec<Model> {
        vec![
            model(
                "Tag",
                vec![id("id", "Int"), back("posts", "Post", "PostToTag", true)],
            ),
            model(
                "Post",
                vec![id("id", "String"), back("tags", "Tag", "PostToTag", true)],
            ),
        ]
    }

    #[test]
    fn test_join_model_shape() {
        let (models, joins) = synthesize(&posts_and_tags()).unwrap();
        assert_eq!(joins.len(), 1);
        let join = &joins[0];
        assert_eq!(join.name, "_PostToTag");

        // Post sorts before Tag, so A references posts
        let a = join.field("A").unwrap();
        assert_eq!(a.type_name, "String");
        assert!(a.is_required);
        assert_eq!(join.field("B").unwrap().type_name, "Int");

        let post = join.field("post").unwrap();
        assert_eq!(post.type_name, "Post");
        assert_eq!(post.relation_from_fields, vec!["A"]);
        assert_eq!(post.relation_to_fields, vec!["id"]);
        let tag = join.field("tag").unwrap();
        assert_eq!(tag.relation_from_fields, vec!["B"]);

        let tags = models[1].field("tags").unwrap();
        assert_eq!(tags.type_name, "_PostToTag");
        assert!(tags.is_list);
        assert_eq!(tags.relation_name.as_deref(), Some("PostToTag"));
        assert_eq!(models[0].field("posts").unwrap().type_name, "_PostToTag");
    }

    #[test]
    fn test_self_relation() {
        let user = model(
            "User",
            vec![
                id("id", "Int"),
                back("following", "User", "Follows", true),
                back("followers", "User", "Follows", true),
            ],
        );
        let (models, joins) = synthesize(&[user]).unwrap();
        assert_eq!(joins.len(), 1);
        let join = &joins[0];
        assert_eq!(join.field("userA").unwrap().relation_name.as_deref(), Some("Follows_A"));
        assert_eq!(join.field("userB").unwrap().relation_name.as_deref(), Some("Follows_B"));

        // `followers` sorts before `following`
        let user = &models[0];
        assert_eq!(
            user.field("followers").unwrap().relation_name.as_deref(),
            Some("Follows_A")
        );
        assert_eq!(
            user.field("following").unwrap().relation_name.as_deref(),
            Some("Follows_B")
        );
    }

    #[test]
    fn test_explicit_relations_untouched() {
        let models = vec![
            model(
                "User",
                vec![id("id", "Int"), back("posts", "Post", "PostToUser", true)],
            ),
            model(
                "Post",
                vec![
                    id("id", "Int"),
                    scalar("authorId", "Int"),
                    holder("author", "User", "PostToUser", "authorId", "id"),
                ],
            ),
        ];
        let (rewritten, joins) = synthesize(&models).unwrap();
        assert!(joins.is_empty());
        assert_eq!(rewritten, models);
    }

    #[test]
    fn test_missing_id_is_unresolved() {
        let mut models = posts_and_tags();
        models[0].fields[0].is_id = false;
        let err = synthesize(&models).unwrap_err();
        match err {
            GeneratorError::UnresolvedRelation { reason, .. } => {
                assert!(reason.contains("Tag"), "{}", reason)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_opposite_is_unresolved() {
        let models = vec![model(
            "Post",
            vec![id("id", "Int"), back("tags", "Tag", "PostToTag", true)],
        )];
        assert!(matches!(
            synthesize(&models).unwrap_err(),
            GeneratorError::UnresolvedRelation { .. }
        ));
    }
}
