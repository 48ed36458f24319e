//! PostgreSQL adapter (`drizzle-orm/pg-core`)

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{Adapter, ColumnSpec, OptionValue, enum_values};
use crate::definition::Definition;
use crate::ir::{Enum, ScalarKind};
use crate::options::{DateMode, DialectId};

const CORE_MODULE: &str = "drizzle-orm/pg-core";

static COLUMNS: Lazy<HashMap<ScalarKind, ColumnSpec>> = Lazy::new(|| {
    HashMap::from([
        (ScalarKind::Int, ColumnSpec::plain("integer")),
        (ScalarKind::Float, ColumnSpec::plain("doublePrecision")),
        (ScalarKind::String, ColumnSpec::plain("text")),
        (ScalarKind::Boolean, ColumnSpec::plain("boolean")),
        (
            ScalarKind::Decimal,
            ColumnSpec {
                function: "decimal",
                options: &[("precision", OptionValue::Int(65)), ("scale", OptionValue::Int(30))],
            },
        ),
        (
            ScalarKind::BigInt,
            ColumnSpec {
                function: "bigint",
                options: &[("mode", OptionValue::Str("bigint"))],
            },
        ),
        (ScalarKind::Json, ColumnSpec::plain("jsonb")),
        (ScalarKind::Bytes, ColumnSpec::plain("bytea")),
    ])
});

const TIMESTAMP_DATE: ColumnSpec = ColumnSpec {
    function: "timestamp",
    options: &[("mode", OptionValue::Str("date")), ("precision", OptionValue::Int(3))],
};

const TIMESTAMP_STRING: ColumnSpec = ColumnSpec {
    function: "timestamp",
    options: &[("mode", OptionValue::Str("string")), ("precision", OptionValue::Int(3))],
};

/// PostgreSQL adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresAdapter;

impl Adapter for PostgresAdapter {
    fn dialect(&self) -> DialectId {
        DialectId::Postgres
    }

    fn core_module(&self) -> &'static str {
        CORE_MODULE
    }

    fn table_function(&self) -> &'static str {
        "pgTable"
    }

    fn column_spec(&self, kind: ScalarKind, date_mode: DateMode) -> Option<ColumnSpec> {
        match (kind, date_mode) {
            (ScalarKind::DateTime, DateMode::Date) => Some(TIMESTAMP_DATE),
            (ScalarKind::DateTime, DateMode::String) => Some(TIMESTAMP_STRING),
            (kind, _) => COLUMNS.get(&kind).copied(),
        }
    }

    /// `pgEnum('Role', [ ... ])`: the database type name is bound here
    fn enum_declaration(&self, enum_def: &Enum) -> Option<Definition> {
        Some(
            Definition::call(
                "pgEnum",
                vec![Definition::string(enum_def.type_name()), enum_values(enum_def)],
            )
            .with_imports([self.core_import("pgEnum")]),
        )
    }

    fn supports_lists(&self) -> bool {
        true
    }

    fn autoincrement(&self) -> Option<Definition> {
        Some(Definition::call("generatedByDefaultAsIdentity", vec![]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{model, scalar};
    use crate::ir::EnumValue;

    fn render(type_name: &str, mode: DateMode) -> String {
        PostgresAdapter
            .resolve_field(&model("T"), &scalar("c", type_name), mode)
            .unwrap()
            .render()
    }

    #[test]
    fn test_column_table() {
        assert_eq!(render("Int", DateMode::Date), "integer('c')");
        assert_eq!(render("Float", DateMode::Date), "doublePrecision('c')");
        assert_eq!(render("Boolean", DateMode::Date), "boolean('c')");
        assert_eq!(
            render("Decimal", DateMode::Date),
            "decimal('c', { precision: 65, scale: 30 })"
        );
        assert_eq!(render("BigInt", DateMode::Date), "bigint('c', { mode: 'bigint' })");
        assert_eq!(render("Json", DateMode::Date), "jsonb('c')");
        assert_eq!(render("Bytes", DateMode::Date), "bytea('c')");
    }

    #[test]
    fn test_timestamp_modes() {
        assert_eq!(
            render("DateTime", DateMode::Date),
            "timestamp('c', { mode: 'date', precision: 3 })"
        );
        assert_eq!(
            render("DateTime", DateMode::String),
            "timestamp('c', { mode: 'string', precision: 3 })"
        );
    }

    #[test]
    fn test_enum_declaration_binds_type_name() {
        let role = Enum {
            name: "Role".to_string(),
            values: vec![
                EnumValue {
                    name: "ADMIN".to_string(),
                    db_name: None,
                },
                EnumValue {
                    name: "USER".to_string(),
                    db_name: Some("user".to_string()),
                },
            ],
            ..Default::default()
        };
        let decl = PostgresAdapter.enum_declaration(&role).unwrap();
        assert_eq!(decl.render(), "pgEnum('Role', [ 'ADMIN', 'user' ])");
    }
}
