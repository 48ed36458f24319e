//! Dialect adapters
//!
//! Each adapter maps semantic field types to Drizzle column constructors for
//! one SQL dialect. Column constructors and their default options are
//! table-driven (`ColumnSpec`); everything structural that differs between
//! dialects (enums, lists, key modifiers) is a trait method.

mod mysql;
mod postgres;
mod sqlite;

use crate::definition::{Definition, ImportRequirement};
use crate::error::{GeneratorError, Result};
use crate::ir::{Enum, Field, Model, ScalarKind, SemanticType};
use crate::naming;
use crate::options::{DateMode, DialectId};

pub use mysql::MysqlAdapter;
pub use postgres::PostgresAdapter;
pub use sqlite::SqliteAdapter;

/// A column option value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue {
    /// Rendered as a quoted string
    Str(&'static str),
    /// Rendered as a number
    Int(i64),
}

impl OptionValue {
    fn to_definition(self) -> Definition {
        match self {
            OptionValue::Str(s) => Definition::string(s),
            OptionValue::Int(i) => Definition::int(i),
        }
    }
}

/// A column constructor and its dialect-specific default options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    /// Constructor exported by the dialect's core module
    pub function: &'static str,
    /// Options object passed after the column name; empty means none
    pub options: &'static [(&'static str, OptionValue)],
}

impl ColumnSpec {
    /// Spec without options
    pub const fn plain(function: &'static str) -> Self {
        Self {
            function,
            options: &[],
        }
    }
}

/// A code generation adapter for one SQL dialect
pub trait Adapter: Send + Sync {
    /// Dialect this adapter targets
    fn dialect(&self) -> DialectId;

    /// Module exporting the dialect's column and table constructors
    fn core_module(&self) -> &'static str;

    /// Table constructor (e.g. `pgTable`)
    fn table_function(&self) -> &'static str;

    /// Column constructor for a scalar, `None` when the dialect has no mapping
    fn column_spec(&self, kind: ScalarKind, date_mode: DateMode) -> Option<ColumnSpec>;

    /// Enum declaration value, `None` when the dialect has no native enums
    fn enum_declaration(&self, enum_def: &Enum) -> Option<Definition>;

    /// Whether scalar lists map to array columns
    fn supports_lists(&self) -> bool {
        false
    }

    /// Primary key modifier
    fn primary_key(&self, _autoincrement: bool) -> Definition {
        Definition::call("primaryKey", vec![])
    }

    /// Modifier for `@default(autoincrement())`, `None` when folded into the primary key
    fn autoincrement(&self) -> Option<Definition>;

    /// Modifier for `@default(now())`
    fn default_now(&self, _date_mode: DateMode) -> Definition {
        Definition::call("defaultNow", vec![])
    }

    /// Whether enum columns can be generated
    fn supports_enums(&self) -> bool {
        true
    }

    /// Named import from the core module
    fn core_import(&self, name: &str) -> ImportRequirement {
        ImportRequirement::named([name], self.core_module())
    }

    /// Base column definition for a field (constructor call, plus `.array()` for lists)
    fn resolve_field(&self, model: &Model, field: &Field, date_mode: DateMode) -> Result<Definition> {
        let unsupported = || GeneratorError::UnsupportedFieldType {
            dialect: self.dialect().to_string(),
            model: model.name.clone(),
            field: field.name.clone(),
            field_type: if field.is_list {
                format!("{}[]", field.type_name)
            } else {
                field.type_name.clone()
            },
        };

        let base = match field.semantic_type() {
            Some(SemanticType::Scalar(kind)) => {
                let spec = self.column_spec(kind, date_mode).ok_or_else(unsupported)?;
                self.column_call(spec, field)
            }
            Some(SemanticType::Enum) => {
                if !self.supports_enums() {
                    return Err(unsupported());
                }
                let binding = naming::enum_binding(&field.type_name);
                Definition::call(binding.clone(), vec![Definition::string(field.column_name())])
                    .with_imports([ImportRequirement::local(
                        binding,
                        naming::enum_module(&field.type_name),
                    )])
            }
            Some(SemanticType::Unsupported) => return Err(unsupported()),
            None => {
                return Err(GeneratorError::Configuration(format!(
                    "relation field {}.{} cannot be a column",
                    model.name, field.name
                )));
            }
        };

        if field.is_list {
            if !self.supports_lists() {
                return Err(unsupported());
            }
            return Ok(base.chain(Definition::call("array", vec![])));
        }
        Ok(base)
    }

    /// `function('column', { ...options })`
    fn column_call(&self, spec: ColumnSpec, field: &Field) -> Definition {
        let mut args = vec![Definition::string(field.column_name())];
        if !spec.options.is_empty() {
            args.push(Definition::object_of(
                spec.options.iter().map(|(k, v)| (*k, v.to_definition())),
            ));
        }
        Definition::call(spec.function, args).with_imports([self.core_import(spec.function)])
    }
}

/// Get the adapter for a dialect
pub fn get_adapter(dialect: DialectId) -> Box<dyn Adapter> {
    match dialect {
        DialectId::Postgres => Box::new(PostgresAdapter),
        DialectId::Mysql => Box::new(MysqlAdapter),
        DialectId::Sqlite => Box::new(SqliteAdapter),
    }
}

/// Enum values as an array of string literals
fn enum_values(enum_def: &Enum) -> Definition {
    Definition::array(
        enum_def
            .values
            .iter()
            .map(|v| Definition::string(v.stored_value()))
            .collect(),
    )
}
