//! Column generation
//!
//! A column is the adapter's base constructor followed by modifiers, always in
//! this order: `.$type<T>()`, primary key, `.notNull()`, `.unique()`, default,
//! `.$onUpdate()`.

use serde_json::Value;

use super::GeneratorContext;
use crate::definition::{Definition, Entry};
use crate::directive::{self, FieldDirectives};
use crate::error::{GeneratorError, Result};
use crate::ir::{Field, FieldDefault, Model, ScalarKind, SemanticType};
use crate::naming;
use crate::options::DateMode;

/// Build the full column definition of a non-relation field
pub fn build_column(ctx: &GeneratorContext, model: &Model, field: &Field) -> Result<Definition> {
    let directives = directive::field_directives(model, field)?;
    let date_mode = directives.date_mode.unwrap_or(ctx.config.date_mode);

    let mut column = ctx.adapter.resolve_field(model, field, date_mode)?;

    if let Some(custom) = &directives.custom {
        if let Some(type_name) = &custom.type_name {
            column = column.chain(
                Definition::call_generic("$type", type_name.as_str(), vec![])?
                    .with_imports(custom.imports.iter().cloned()),
            );
        }
    }

    if field.is_id {
        column = column.chain(ctx.adapter.primary_key(is_autoincrement(field)));
    } else if field.is_required {
        column = column.chain(Definition::call("notNull", vec![]));
    }

    if field.is_unique && !field.is_id {
        column = column.chain(Definition::call("unique", vec![]));
    }

    if let Some(default) = default_modifier(ctx, model, field, &directives, date_mode)? {
        column = column.chain(default);
    }

    if field.is_updated_at {
        column = column.chain(Definition::call(
            "$onUpdate",
            vec![Definition::thunk(Definition::var_ref(now_expr(date_mode)))],
        ));
    }

    Ok(column)
}

fn is_autoincrement(field: &Field) -> bool {
    matches!(&field.default, Some(FieldDefault::Function { name, .. }) if name == "autoincrement")
}

fn now_expr(date_mode: DateMode) -> &'static str {
    match date_mode {
        DateMode::Date => "new Date()",
        DateMode::String => "new Date().toISOString()",
    }
}

fn default_modifier(
    ctx: &GeneratorContext,
    model: &Model,
    field: &Field,
    directives: &FieldDirectives,
    date_mode: DateMode,
) -> Result<Option<Definition>> {
    if let Some((expr, imports)) = directives.default_expr() {
        return Ok(Some(
            Definition::call("$defaultFn", vec![Definition::thunk(Definition::var_ref(expr))])
                .with_imports(imports.iter().cloned()),
        ));
    }

    match &field.default {
        None => Ok(None),
        Some(FieldDefault::Function { name, .. }) => match name.as_str() {
            "now" => Ok(Some(ctx.adapter.default_now(date_mode))),
            "autoincrement" => Ok(ctx.adapter.autoincrement()),
            other => {
                tracing::debug!(
                    model = %model.name,
                    field = %field.name,
                    function = other,
                    "database-side default not emitted"
                );
                Ok(None)
            }
        },
        Some(FieldDefault::Value(value)) => {
            let literal = literal_default(model, field, value, date_mode)?;
            Ok(Some(Definition::call("default", vec![literal])))
        }
    }
}

/// Literal `@default(...)` value as a TypeScript expression of the column's type
fn literal_default(
    model: &Model,
    field: &Field,
    value: &Value,
    date_mode: DateMode,
) -> Result<Definition> {
    if let Value::Array(items) = value {
        return items
            .iter()
            .map(|item| literal_default(model, field, item, date_mode))
            .collect::<Result<Vec<_>>>()
            .map(Definition::array);
    }

    let kind = match field.semantic_type() {
        Some(SemanticType::Scalar(kind)) => kind,
        _ => return Ok(json_literal(value)),
    };

    Ok(match (kind, value) {
        (ScalarKind::BigInt, Value::String(s)) => {
            Definition::call("BigInt", vec![Definition::string(s.as_str())])
        }
        (ScalarKind::BigInt, Value::Number(n)) => {
            Definition::call("BigInt", vec![Definition::string(n.to_string())])
        }
        (ScalarKind::DateTime, Value::String(s)) if date_mode == DateMode::Date => {
            Definition::var_ref(format!("new Date({})", Definition::string(s.as_str())))
        }
        (ScalarKind::Decimal, Value::Number(n)) => Definition::string(n.to_string()),
        (ScalarKind::Json, Value::String(s)) => {
            let parsed: Value = serde_json::from_str(s).map_err(|e| {
                GeneratorError::Decode(format!(
                    "invalid JSON default on {}.{}: {}",
                    model.name, field.name, e
                ))
            })?;
            json_literal(&parsed)
        }
        (ScalarKind::Bytes, Value::String(s)) => Definition::var_ref(format!(
            "Buffer.from({}, 'base64')",
            Definition::string(s.as_str())
        )),
        (_, value) => json_literal(value),
    })
}

fn number_literal(n: &serde_json::Number) -> Definition {
    match n.as_i64() {
        Some(i) => Definition::int(i),
        None => Definition::float(n.as_f64().unwrap_or_default()),
    }
}

/// Any JSON value as a TypeScript literal
fn json_literal(value: &Value) -> Definition {
    match value {
        Value::Null => Definition::var_ref("null"),
        Value::Bool(b) => Definition::boolean(*b),
        Value::Number(n) => number_literal(n),
        Value::String(s) => Definition::string(s.as_str()),
        Value::Array(items) => Definition::array(items.iter().map(json_literal).collect()),
        Value::Object(map) => Definition::object(
            map.iter()
                .map(|(k, v)| Entry::Property(property_key(k), json_literal(v)))
                .collect(),
        ),
    }
}

/// Object keys that are not plain identifiers are quoted
fn property_key(key: &str) -> String {
    if naming::is_identifier(key) {
        key.to_string()
    } else {
        Definition::string(key).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::test_support::{id, model, scalar};
    use crate::definition::ImportRequirement;
    use crate::ir::{Datamodel, FieldKind};
    use crate::options::{Config, DialectId};

    fn ctx(dialect: DialectId) -> GeneratorContext {
        GeneratorContext::new(Datamodel::default(), Config::new(dialect)).unwrap()
    }

    fn render(dialect: DialectId, field: Field) -> String {
        let ctx = ctx(dialect);
        let m = model("T", vec![field.clone()]);
        build_column(&ctx, &m, &field).unwrap().render()
    }

    fn function_default(name: &str) -> Option<FieldDefault> {
        Some(FieldDefault::Function {
            name: name.to_string(),
            args: vec![],
        })
    }

    #[test]
    fn test_required_and_id() {
        assert_eq!(
            render(DialectId::Postgres, scalar("name", "String")),
            "text('name').notNull()"
        );
        assert_eq!(
            render(DialectId::Postgres, id("id", "Int")),
            "integer('id').primaryKey()"
        );
        let mut optional = scalar("bio", "String");
        optional.is_required = false;
        assert_eq!(render(DialectId::Postgres, optional), "text('bio')");
    }

    #[test]
    fn test_unique_after_not_null() {
        let mut email = scalar("email", "String");
        email.is_unique = true;
        assert_eq!(
            render(DialectId::Mysql, email),
            "text('email').notNull().unique()"
        );
    }

    #[test]
    fn test_autoincrement_per_dialect() {
        let mut field = id("id", "Int");
        field.default = function_default("autoincrement");
        assert_eq!(
            render(DialectId::Postgres, field.clone()),
            "integer('id').primaryKey().generatedByDefaultAsIdentity()"
        );
        assert_eq!(
            render(DialectId::Mysql, field.clone()),
            "int('id').primaryKey().autoincrement()"
        );
        assert_eq!(
            render(DialectId::Sqlite, field),
            "integer('id', { mode: 'number' }).primaryKey({ autoIncrement: true })"
        );
    }

    #[test]
    fn test_now_default() {
        let mut field = scalar("createdAt", "DateTime");
        field.default = function_default("now");
        assert_eq!(
            render(DialectId::Postgres, field.clone()),
            "timestamp('createdAt', { mode: 'date', precision: 3 }).notNull().defaultNow()"
        );
        assert_eq!(
            render(DialectId::Sqlite, field),
            "integer('createdAt', { mode: 'timestamp_ms' }).notNull().$defaultFn(() => { return new Date(); })"
        );
    }

    #[test]
    fn test_unknown_database_function_is_skipped() {
        let mut field = id("id", "String");
        field.default = function_default("uuid");
        assert_eq!(render(DialectId::Postgres, field), "text('id').primaryKey()");
    }

    #[test]
    fn test_literal_defaults() {
        let mut active = scalar("active", "Boolean");
        active.default = Some(FieldDefault::Value(Value::Bool(true)));
        assert_eq!(
            render(DialectId::Postgres, active),
            "boolean('active').notNull().default(true)"
        );

        let mut big = scalar("views", "BigInt");
        big.default = Some(FieldDefault::Value(Value::String("10".to_string())));
        assert_eq!(
            render(DialectId::Postgres, big),
            "bigint('views', { mode: 'bigint' }).notNull().default(BigInt('10'))"
        );

        let mut role = Field {
            name: "role".to_string(),
            kind: FieldKind::Enum,
            type_name: "Role".to_string(),
            is_required: true,
            ..Default::default()
        };
        role.default = Some(FieldDefault::Value(Value::String("USER".to_string())));
        assert_eq!(
            render(DialectId::Postgres, role),
            "roleEnum('role').notNull().default('USER')"
        );
    }

    #[test]
    fn test_bigint_number_default_keeps_every_digit() {
        let mut big = scalar("quota", "BigInt");
        big.default = Some(FieldDefault::Value(serde_json::json!(u64::MAX)));
        assert_eq!(
            render(DialectId::Postgres, big),
            "bigint('quota', { mode: 'bigint' }).notNull().default(BigInt('18446744073709551615'))"
        );
    }

    #[test]
    fn test_updated_at_with_now_default_still_refreshes() {
        let mut field = scalar("updatedAt", "DateTime");
        field.is_updated_at = true;
        field.default = function_default("now");
        assert_eq!(
            render(DialectId::Postgres, field),
            "timestamp('updatedAt', { mode: 'date', precision: 3 }).notNull().defaultNow().$onUpdate(() => { return new Date(); })"
        );
    }

    #[test]
    fn test_unknown_drizzle_tag_is_plain_documentation() {
        let mut bio = scalar("bio", "String");
        bio.documentation = Some("drizzle.orm docs: see the website".to_string());
        assert_eq!(render(DialectId::Postgres, bio), "text('bio').notNull()");
    }

    #[test]
    fn test_json_default_is_parsed() {
        let mut meta = scalar("meta", "Json");
        meta.default = Some(FieldDefault::Value(Value::String(
            r#"{"tags":[],"max-size":3}"#.to_string(),
        )));
        assert_eq!(
            render(DialectId::Postgres, meta),
            "jsonb('meta').notNull().default({ 'max-size': 3, tags: [] })"
        );
    }

    #[test]
    fn test_list_default() {
        let mut tags = scalar("tags", "String");
        tags.is_list = true;
        tags.default = Some(FieldDefault::Value(serde_json::json!(["a", "b"])));
        assert_eq!(
            render(DialectId::Postgres, tags),
            "text('tags').array().notNull().default([ 'a', 'b' ])"
        );
    }

    #[test]
    fn test_custom_type_and_default_directive() {
        let mut field = id("id", "String");
        field.documentation = Some(
            "Primary key\ndrizzle.custom {\"imports\": [{\"name\": \"UserId\", \"module\": \"~/ids\"}], \"$type\": \"UserId\"}\ndrizzle.default @paralleldrive/cuid2::createId".to_string(),
        );
        let ctx = ctx(DialectId::Postgres);
        let m = model("User", vec![field.clone()]);
        let column = build_column(&ctx, &m, &field).unwrap();
        assert_eq!(
            column.render(),
            "text('id').$type<UserId>().primaryKey().$defaultFn(() => { return createId(); })"
        );
        assert_eq!(
            column.imports(),
            vec![
                ImportRequirement::named(["text"], "drizzle-orm/pg-core"),
                ImportRequirement::named(["UserId"], "~/ids"),
                ImportRequirement::named(["createId"], "@paralleldrive/cuid2"),
            ]
        );
    }

    #[test]
    fn test_date_mode_directive_overrides_config() {
        let mut field = scalar("updatedAt", "DateTime");
        field.is_updated_at = true;
        field.documentation = Some("drizzle.dateMode string".to_string());
        assert_eq!(
            render(DialectId::Postgres, field),
            "timestamp('updatedAt', { mode: 'string', precision: 3 }).notNull().$onUpdate(() => { return new Date().toISOString(); })"
        );
    }

    #[test]
    fn test_invalid_directive_echoes_documentation() {
        let mut field = scalar("name", "String");
        field.documentation = Some("drizzle.custom { \"$type\": ".to_string());
        let ctx = ctx(DialectId::Postgres);
        let m = model("User", vec![field.clone()]);
        match build_column(&ctx, &m, &field).unwrap_err() {
            GeneratorError::InvalidDirective {
                model,
                field,
                documentation,
                ..
            } => {
                assert_eq!(model, "User");
                assert_eq!(field, "name");
                assert_eq!(documentation, "drizzle.custom { \"$type\": ");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_property_key_quoting() {
        assert_eq!(property_key("tags"), "tags");
        assert_eq!(property_key("max-size"), "'max-size'");
        assert_eq!(property_key("1st"), "'1st'");
    }
}
