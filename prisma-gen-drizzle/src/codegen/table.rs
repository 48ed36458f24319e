//! Table declarations
//!
//! ```text
//! export const users = pgTable('User', { id: integer('id').primaryKey(), ... });
//! ```
//!
//! A compound `@@id` adds the table's extra-config callback:
//! `(table) => { return { pk: primaryKey({ columns: [ table.a, table.b ] }) }; }`

use super::{GeneratorContext, column};
use crate::definition::Definition;
use crate::error::{GeneratorError, Result};
use crate::ir::{CompoundKey, Model};
use crate::naming;

/// Generate the table declaration of a model
pub fn generate(ctx: &GeneratorContext, model: &Model) -> Result<Definition> {
    let columns = model
        .columns()
        .map(|field| Ok((field.name.as_str(), column::build_column(ctx, model, field)?)))
        .collect::<Result<Vec<_>>>()?;

    let table_function = ctx.adapter.table_function();
    let mut args = vec![
        Definition::string(model.table_name()),
        Definition::object_of(columns),
    ];
    if let Some(key) = model.primary_key.as_ref().filter(|k| !k.fields.is_empty()) {
        args.push(compound_key(ctx, model, key)?);
    }

    let value = Definition::call(table_function, args)
        .with_imports([ctx.adapter.core_import(table_function)]);
    Ok(Definition::const_decl(
        naming::table_binding(&model.name),
        value,
        true,
    ))
}

fn compound_key(ctx: &GeneratorContext, model: &Model, key: &CompoundKey) -> Result<Definition> {
    let columns = key
        .fields
        .iter()
        .map(|name| match model.field(name) {
            Some(field) if field.relation().is_none() => {
                Ok(Definition::var_ref(format!("table.{}", field.name)))
            }
            _ => Err(GeneratorError::Configuration(format!(
                "compound key of {} references unknown column {}",
                model.name, name
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut options = Vec::new();
    if let Some(name) = &key.name {
        options.push(("name", Definition::string(name.as_str())));
    }
    options.push(("columns", Definition::array(columns)));

    let pk = Definition::call("primaryKey", vec![Definition::object_of(options)])
        .with_imports([ctx.adapter.core_import("primaryKey")]);
    Ok(Definition::lambda(
        ["table"],
        Definition::object_of([("pk", pk)]),
    ))
}
