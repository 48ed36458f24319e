//! Input datamodel
//!
//! A backend-agnostic description of the parsed schema, as handed over by the
//! upstream schema parser (camelCase JSON). Models, fields and enums keep the
//! shape of the parser output; the typed views (`SemanticType`, `RelationMeta`)
//! are derived on demand.

use serde::{Deserialize, Serialize};

/// The whole parsed schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Datamodel {
    /// Models in declaration order
    pub models: Vec<Model>,

    /// Enums in declaration order
    pub enums: Vec<Enum>,
}

/// A database model (table)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Model name
    pub name: String,

    /// Database table name, when mapped
    #[serde(default)]
    pub db_name: Option<String>,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Compound primary key (`@@id`)
    #[serde(default)]
    pub primary_key: Option<CompoundKey>,

    /// Documentation comment
    #[serde(default)]
    pub documentation: Option<String>,
}

impl Model {
    /// Table name in the database
    pub fn table_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that become columns
    pub fn columns(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind != FieldKind::Object)
    }

    /// Fields that are relations
    pub fn relation_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Object)
    }

    /// The single `@id` field, if the model has one
    pub fn id_field(&self) -> Option<&Field> {
        let mut ids = self.fields.iter().filter(|f| f.is_id);
        match (ids.next(), ids.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        }
    }
}

/// A compound key (`@@id([a, b])`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundKey {
    /// Constraint name, when given
    #[serde(default)]
    pub name: Option<String>,

    /// Field names in key order
    pub fields: Vec<String>,
}

/// Field kinds reported by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Built-in scalar type
    #[default]
    Scalar,
    /// Reference to a schema enum
    Enum,
    /// Relation to another model
    Object,
    /// `Unsupported("...")` native type
    Unsupported,
}

/// A field of a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name
    pub name: String,

    /// Column name in the database, when mapped
    #[serde(default)]
    pub db_name: Option<String>,

    /// Field kind
    #[serde(default)]
    pub kind: FieldKind,

    /// Scalar type name, enum name or related model name depending on `kind`
    #[serde(rename = "type")]
    pub type_name: String,

    /// `@id`
    #[serde(default)]
    pub is_id: bool,

    /// Not optional
    #[serde(default)]
    pub is_required: bool,

    /// `[]`
    #[serde(default)]
    pub is_list: bool,

    /// `@unique`
    #[serde(default)]
    pub is_unique: bool,

    /// `@updatedAt`
    #[serde(default)]
    pub is_updated_at: bool,

    /// The `@default` value
    #[serde(default)]
    pub default: Option<FieldDefault>,

    /// Documentation comment (may carry directives)
    #[serde(default)]
    pub documentation: Option<String>,

    /// Relation name (relation fields only)
    #[serde(default)]
    pub relation_name: Option<String>,

    /// Foreign-key fields on this model (holder side only)
    #[serde(default)]
    pub relation_from_fields: Vec<String>,

    /// Referenced fields on the related model (holder side only)
    #[serde(default)]
    pub relation_to_fields: Vec<String>,
}

impl Field {
    /// Column name in the database
    pub fn column_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }

    /// Semantic type of a column field, `None` for relations
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self.kind {
            FieldKind::Scalar => ScalarKind::parse(&self.type_name)
                .map(SemanticType::Scalar)
                .or(Some(SemanticType::Unsupported)),
            FieldKind::Enum => Some(SemanticType::Enum),
            FieldKind::Unsupported => Some(SemanticType::Unsupported),
            FieldKind::Object => None,
        }
    }

    /// Relation view of a relation field
    pub fn relation(&self) -> Option<RelationMeta<'_>> {
        if self.kind != FieldKind::Object {
            return None;
        }
        Some(RelationMeta {
            relation_name: self.relation_name.as_deref().unwrap_or(""),
            is_list: self.is_list,
            from_fields: &self.relation_from_fields,
            to_fields: &self.relation_to_fields,
            related_model: &self.type_name,
        })
    }
}

/// A `@default(...)` value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDefault {
    /// A database function such as `now()` or `autoincrement()`
    Function {
        /// Function name
        name: String,
        /// Function arguments
        #[serde(default)]
        args: Vec<serde_json::Value>,
    },
    /// A literal value
    Value(serde_json::Value),
}

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    /// 32-bit integer
    Int,
    /// Double precision float
    Float,
    /// Text
    String,
    /// Boolean
    Boolean,
    /// Timestamp
    DateTime,
    /// Arbitrary precision decimal
    Decimal,
    /// 64-bit integer
    BigInt,
    /// JSON document
    Json,
    /// Binary data
    Bytes,
}

impl ScalarKind {
    /// Parse a scalar type name as written in the schema
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "Int" => ScalarKind::Int,
            "Float" => ScalarKind::Float,
            "String" => ScalarKind::String,
            "Boolean" => ScalarKind::Boolean,
            "DateTime" => ScalarKind::DateTime,
            "Decimal" => ScalarKind::Decimal,
            "BigInt" => ScalarKind::BigInt,
            "Json" => ScalarKind::Json,
            "Bytes" => ScalarKind::Bytes,
            _ => return None,
        })
    }
}

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// Built-in scalar
    Scalar(ScalarKind),
    /// Schema enum
    Enum,
    /// Anything no dialect can represent
    Unsupported,
}

/// Relation metadata of a relation field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationMeta<'a> {
    /// Relation name shared by both sides
    pub relation_name: &'a str,
    /// Whether this side sees many records
    pub is_list: bool,
    /// Foreign-key fields on this model
    pub from_fields: &'a [String],
    /// Referenced fields on the related model
    pub to_fields: &'a [String],
    /// Related model name
    pub related_model: &'a str,
}

impl RelationMeta<'_> {
    /// Whether this side stores the foreign key
    pub fn is_holder(&self) -> bool {
        !self.from_fields.is_empty() && !self.to_fields.is_empty()
    }
}

/// A schema enum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    /// Enum name
    pub name: String,

    /// Database enum name, when mapped
    #[serde(default)]
    pub db_name: Option<String>,

    /// Values in declaration order
    #[serde(default)]
    pub values: Vec<EnumValue>,

    /// Documentation comment
    #[serde(default)]
    pub documentation: Option<String>,
}

impl Enum {
    /// Enum type name in the database
    pub fn type_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }
}

/// An enum value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// Value name
    pub name: String,

    /// Database value, when mapped
    #[serde(default)]
    pub db_name: Option<String>,
}

impl EnumValue {
    /// Value as stored in the database
    pub fn stored_value(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }
}
