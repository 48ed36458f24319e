//! Field directives embedded in documentation comments
//!
//! A directive is a documentation line starting with `drizzle.<tag>`:
//!
//! ```text
//! /// drizzle.custom { "imports": [{ "name": ["UserId"], "module": "~/types" }], "$type": "UserId" }
//! /// drizzle.default @paralleldrive/cuid2::createId
//! /// drizzle.default { "imports": [{ "name": "nanoid", "module": "nanoid" }], "expr": "nanoid(12)" }
//! /// drizzle.dateMode string
//! ```
//!
//! Lines that do not start with one of these tags are ordinary documentation
//! and are ignored. A recognized tag with a malformed payload is an error.

use serde::Deserialize;

use crate::definition::ImportRequirement;
use crate::error::{GeneratorError, Result};
use crate::ir::{Field, Model};
use crate::naming;
use crate::options::DateMode;

const DIRECTIVE_PREFIX: &str = "drizzle.";

/// Why a directive could not be parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectiveError {
    /// A recognized tag with nothing after it
    #[error("`drizzle.{0}` requires a payload")]
    MissingPayload(&'static str),

    /// The same tag on two lines
    #[error("`drizzle.{0}` appears more than once")]
    Duplicate(&'static str),

    /// The payload does not match the tag's grammar
    #[error("malformed `drizzle.{tag}` payload: {message}")]
    Malformed {
        /// Directive tag
        tag: &'static str,
        /// Parser message
        message: String,
    },

    /// `drizzle.dateMode` with an unknown mode
    #[error("invalid date mode: {0}")]
    DateMode(String),
}

/// Directive tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Custom,
    Default,
    DateMode,
}

impl Tag {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "custom" => Some(Tag::Custom),
            "default" => Some(Tag::Default),
            "dateMode" => Some(Tag::DateMode),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Tag::Custom => "custom",
            Tag::Default => "default",
            Tag::DateMode => "dateMode",
        }
    }
}

/// One or several imported names
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Names {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportSpec {
    name: Names,
    module: String,
    /// `import type`; emitted as a plain named import, which TypeScript accepts for types too
    #[serde(default, rename = "type")]
    #[allow(dead_code)]
    type_only: bool,
}

impl ImportSpec {
    fn into_requirement(self, tag: Tag) -> std::result::Result<ImportRequirement, DirectiveError> {
        let names = match self.name {
            Names::One(name) => vec![name],
            Names::Many(names) => names,
        };
        if names.is_empty() || names.iter().any(|n| n.trim().is_empty()) || self.module.is_empty() {
            return Err(DirectiveError::Malformed {
                tag: tag.as_str(),
                message: "imports need a module and at least one name".to_string(),
            });
        }
        Ok(ImportRequirement::named(names, self.module))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CustomPayload {
    #[serde(default)]
    imports: Vec<ImportSpec>,
    #[serde(rename = "$type")]
    type_name: Option<String>,
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefaultPayload {
    #[serde(default)]
    imports: Vec<ImportSpec>,
    expr: String,
}

/// `drizzle.custom`: type narrowing and/or a default expression
#[derive(Debug, Clone, PartialEq)]
pub struct CustomType {
    /// Imports the type or expression needs
    pub imports: Vec<ImportRequirement>,
    /// Type passed to `.$type<T>()`
    pub type_name: Option<String>,
    /// Expression returned by `.$defaultFn()`
    pub default: Option<String>,
}

/// `drizzle.default`: a runtime default expression
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultFn {
    /// Imports the expression needs
    pub imports: Vec<ImportRequirement>,
    /// Expression returned by `.$defaultFn()`
    pub expr: String,
}

/// All directives found on one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDirectives {
    /// `drizzle.custom`
    pub custom: Option<CustomType>,
    /// `drizzle.default`
    pub default: Option<DefaultFn>,
    /// `drizzle.dateMode`, overriding the configured mode
    pub date_mode: Option<DateMode>,
}

impl FieldDirectives {
    /// Default expression, preferring `drizzle.default` over `drizzle.custom`
    pub fn default_expr(&self) -> Option<(&str, &[ImportRequirement])> {
        if let Some(default) = &self.default {
            return Some((default.expr.as_str(), default.imports.as_slice()));
        }
        self.custom
            .as_ref()
            .and_then(|c| c.default.as_deref().map(|expr| (expr, c.imports.as_slice())))
    }
}

/// Parse every directive in a documentation string
pub fn parse(documentation: &str) -> std::result::Result<FieldDirectives, DirectiveError> {
    let mut directives = FieldDirectives::default();

    for line in documentation.lines() {
        let Some(rest) = line.trim().strip_prefix(DIRECTIVE_PREFIX) else {
            continue;
        };
        let (word, payload) = match rest.find(char::is_whitespace) {
            Some(at) => (&rest[..at], rest[at..].trim()),
            None => (rest, ""),
        };
        let Some(tag) = Tag::parse(word) else {
            tracing::debug!(word, "ignoring documentation line with unknown drizzle tag");
            continue;
        };
        if payload.is_empty() {
            return Err(DirectiveError::MissingPayload(tag.as_str()));
        }

        match tag {
            Tag::Custom => {
                if directives.custom.is_some() {
                    return Err(DirectiveError::Duplicate(tag.as_str()));
                }
                directives.custom = Some(parse_custom(payload)?);
            }
            Tag::Default => {
                if directives.default.is_some() {
                    return Err(DirectiveError::Duplicate(tag.as_str()));
                }
                directives.default = Some(parse_default(payload)?);
            }
            Tag::DateMode => {
                if directives.date_mode.is_some() {
                    return Err(DirectiveError::Duplicate(tag.as_str()));
                }
                directives.date_mode = Some(payload.parse().map_err(DirectiveError::DateMode)?);
            }
        }
    }

    Ok(directives)
}

/// Parse the directives of a field, attaching field context to failures
pub fn field_directives(model: &Model, field: &Field) -> Result<FieldDirectives> {
    let Some(documentation) = field.documentation.as_deref() else {
        return Ok(FieldDirectives::default());
    };
    parse(documentation).map_err(|e| GeneratorError::InvalidDirective {
        model: model.name.clone(),
        field: field.name.clone(),
        documentation: documentation.to_string(),
        reason: e.to_string(),
    })
}

fn parse_json<T: for<'de> Deserialize<'de>>(
    tag: Tag,
    payload: &str,
) -> std::result::Result<T, DirectiveError> {
    serde_json::from_str(payload).map_err(|e| DirectiveError::Malformed {
        tag: tag.as_str(),
        message: e.to_string(),
    })
}

fn parse_imports(
    tag: Tag,
    specs: Vec<ImportSpec>,
) -> std::result::Result<Vec<ImportRequirement>, DirectiveError> {
    specs.into_iter().map(|s| s.into_requirement(tag)).collect()
}

fn parse_custom(payload: &str) -> std::result::Result<CustomType, DirectiveError> {
    let parsed: CustomPayload = parse_json(Tag::Custom, payload)?;
    if parsed.type_name.is_none() && parsed.default.is_none() {
        return Err(DirectiveError::Malformed {
            tag: Tag::Custom.as_str(),
            message: "expected `$type` or `default`".to_string(),
        });
    }
    if parsed.type_name.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(DirectiveError::Malformed {
            tag: Tag::Custom.as_str(),
            message: "`$type` must not be empty".to_string(),
        });
    }
    Ok(CustomType {
        imports: parse_imports(Tag::Custom, parsed.imports)?,
        type_name: parsed.type_name,
        default: parsed.default,
    })
}

fn parse_default(payload: &str) -> std::result::Result<DefaultFn, DirectiveError> {
    if payload.starts_with('{') {
        let parsed: DefaultPayload = parse_json(Tag::Default, payload)?;
        if parsed.expr.trim().is_empty() {
            return Err(DirectiveError::Malformed {
                tag: Tag::Default.as_str(),
                message: "`expr` must not be empty".to_string(),
            });
        }
        return Ok(DefaultFn {
            imports: parse_imports(Tag::Default, parsed.imports)?,
            expr: parsed.expr,
        });
    }

    // `<module>::<export>` imports `export` and calls it
    let malformed = || DirectiveError::Malformed {
        tag: Tag::Default.as_str(),
        message: format!("expected `<module>::<function>` or a JSON object, got `{}`", payload),
    };
    let (module, export) = payload.rsplit_once("::").ok_or_else(malformed)?;
    if module.is_empty() || !naming::is_identifier(export) {
        return Err(malformed());
    }

    Ok(DefaultFn {
        imports: vec![ImportRequirement::named([export], module)],
        expr: format!("{}()", export),
    })
}
