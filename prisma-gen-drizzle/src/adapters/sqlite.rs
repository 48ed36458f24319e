//! SQLite adapter (`drizzle-orm/sqlite-core`)
//!
//! SQLite has no native enums and no array columns.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{Adapter, ColumnSpec, OptionValue};
use crate::definition::Definition;
use crate::ir::{Enum, ScalarKind};
use crate::options::{DateMode, DialectId};

const CORE_MODULE: &str = "drizzle-orm/sqlite-core";

static COLUMNS: Lazy<HashMap<ScalarKind, ColumnSpec>> = Lazy::new(|| {
    HashMap::from([
        (
            ScalarKind::Int,
            ColumnSpec {
                function: "integer",
                options: &[("mode", OptionValue::Str("number"))],
            },
        ),
        (ScalarKind::Float, ColumnSpec::plain("real")),
        (ScalarKind::String, ColumnSpec::plain("text")),
        (
            ScalarKind::Boolean,
            ColumnSpec {
                function: "integer",
                options: &[("mode", OptionValue::Str("boolean"))],
            },
        ),
        (ScalarKind::Decimal, ColumnSpec::plain("numeric")),
        (
            ScalarKind::BigInt,
            ColumnSpec {
                function: "blob",
                options: &[("mode", OptionValue::Str("bigint"))],
            },
        ),
        (
            ScalarKind::Json,
            ColumnSpec {
                function: "text",
                options: &[("mode", OptionValue::Str("json"))],
            },
        ),
        (
            ScalarKind::Bytes,
            ColumnSpec {
                function: "blob",
                options: &[("mode", OptionValue::Str("buffer"))],
            },
        ),
    ])
});

const TIMESTAMP_MS: ColumnSpec = ColumnSpec {
    function: "integer",
    options: &[("mode", OptionValue::Str("timestamp_ms"))],
};

/// SQLite adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteAdapter;

impl Adapter for SqliteAdapter {
    fn dialect(&self) -> DialectId {
        DialectId::Sqlite
    }

    fn core_module(&self) -> &'static str {
        CORE_MODULE
    }

    fn table_function(&self) -> &'static str {
        "sqliteTable"
    }

    fn column_spec(&self, kind: ScalarKind, date_mode: DateMode) -> Option<ColumnSpec> {
        match (kind, date_mode) {
            (ScalarKind::DateTime, DateMode::Date) => Some(TIMESTAMP_MS),
            (ScalarKind::DateTime, DateMode::String) => Some(ColumnSpec::plain("text")),
            (kind, _) => COLUMNS.get(&kind).copied(),
        }
    }

    fn enum_declaration(&self, _enum_def: &Enum) -> Option<Definition> {
        None
    }

    fn supports_enums(&self) -> bool {
        false
    }

    fn primary_key(&self, autoincrement: bool) -> Definition {
        if autoincrement {
            Definition::call(
                "primaryKey",
                vec![Definition::object_of([("autoIncrement", Definition::boolean(true))])],
            )
        } else {
            Definition::call("primaryKey", vec![])
        }
    }

    fn autoincrement(&self) -> Option<Definition> {
        None
    }

    fn default_now(&self, date_mode: DateMode) -> Definition {
        let now = match date_mode {
            DateMode::Date => "new Date()",
            DateMode::String => "new Date().toISOString()",
        };
        Definition::call(
            "$defaultFn",
            vec![Definition::thunk(Definition::var_ref(now))],
        )
    }
}
