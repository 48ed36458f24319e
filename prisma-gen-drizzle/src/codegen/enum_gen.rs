//! Enum declarations

use super::GeneratorContext;
use crate::definition::Definition;
use crate::ir::Enum;
use crate::naming;

/// Generate the enum declaration, `None` when the dialect has no native enums
pub fn generate(ctx: &GeneratorContext, enum_def: &Enum) -> Option<Definition> {
    let Some(value) = ctx.adapter.enum_declaration(enum_def) else {
        tracing::debug!(
            name = %enum_def.name,
            dialect = %ctx.adapter.dialect(),
            "dialect has no native enums, skipping enum module"
        );
        return None;
    };
    Some(Definition::const_decl(
        naming::enum_binding(&enum_def.name),
        value,
        true,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Datamodel, EnumValue};
    use crate::options::{Config, DialectId};

    fn role() -> Enum {
        Enum {
            name: "Role".to_string(),
            values: ["ADMIN", "USER"]
                .iter()
                .map(|v| EnumValue {
                    name: v.to_string(),
                    db_name: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn render(dialect: DialectId) -> Option<String> {
        let ctx = GeneratorContext::new(Datamodel::default(), Config::new(dialect)).unwrap();
        generate(&ctx, &role()).map(|d| d.render())
    }

    #[test]
    fn test_postgres_binds_type_name() {
        assert_eq!(
            render(DialectId::Postgres).unwrap(),
            "export const roleEnum = pgEnum('Role', [ 'ADMIN', 'USER' ]);"
        );
    }

    #[test]
    fn test_mysql_defers_column_name() {
        assert_eq!(
            render(DialectId::Mysql).unwrap(),
            "export const roleEnum = (name: string) => { return mysqlEnum(name, [ 'ADMIN', 'USER' ]); };"
        );
    }

    #[test]
    fn test_sqlite_skips() {
        assert!(render(DialectId::Sqlite).is_none());
    }
}
