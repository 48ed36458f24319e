//! MySQL adapter (`drizzle-orm/mysql-core`)

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{Adapter, ColumnSpec, OptionValue, enum_values};
use crate::definition::Definition;
use crate::ir::{Enum, ScalarKind};
use crate::options::{DateMode, DialectId};

const CORE_MODULE: &str = "drizzle-orm/mysql-core";

static COLUMNS: Lazy<HashMap<ScalarKind, ColumnSpec>> = Lazy::new(|| {
    HashMap::from([
        (ScalarKind::Int, ColumnSpec::plain("int")),
        (ScalarKind::Float, ColumnSpec::plain("double")),
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
        (ScalarKind::Json, ColumnSpec::plain("json")),
        (ScalarKind::Bytes, ColumnSpec::plain("binary")),
    ])
});

const DATETIME_DATE: ColumnSpec = ColumnSpec {
    function: "datetime",
    options: &[("mode", OptionValue::Str("date")), ("fsp", OptionValue::Int(3))],
};

const DATETIME_STRING: ColumnSpec = ColumnSpec {
    function: "datetime",
    options: &[("mode", OptionValue::Str("string")), ("fsp", OptionValue::Int(3))],
};

/// MySQL adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlAdapter;

impl Adapter for MysqlAdapter {
    fn dialect(&self) -> DialectId {
        DialectId::Mysql
    }

    fn core_module(&self) -> &'static str {
        CORE_MODULE
    }

    fn table_function(&self) -> &'static str {
        "mysqlTable"
    }

    fn column_spec(&self, kind: ScalarKind, date_mode: DateMode) -> Option<ColumnSpec> {
        match (kind, date_mode) {
            (ScalarKind::DateTime, DateMode::Date) => Some(DATETIME_DATE),
            (ScalarKind::DateTime, DateMode::String) => Some(DATETIME_STRING),
            (kind, _) => COLUMNS.get(&kind).copied(),
        }
    }

    /// MySQL enums are declared per column, so the declaration defers the
    /// column name: `(name: string) => { return mysqlEnum(name, [ ... ]); }`
    fn enum_declaration(&self, enum_def: &Enum) -> Option<Definition> {
        let constructor = Definition::call(
            "mysqlEnum",
            vec![Definition::var_ref("name"), enum_values(enum_def)],
        )
        .with_imports([self.core_import("mysqlEnum")]);
        Some(Definition::lambda(["name: string"], constructor))
    }

    fn autoincrement(&self) -> Option<Definition> {
        Some(Definition::call("autoincrement", vec![]))
    }
}
