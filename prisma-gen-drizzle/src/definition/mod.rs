//! Definition IR
//!
//! A `Definition` is an immutable, renderable fragment of TypeScript source
//! together with the imports it needs. Definitions compose by containment:
//! a call owns its arguments, an object owns its values, a chain owns its
//! links. Rendering is pure and never fails.
//!
//! Rendering rules:
//! - strings are single-quoted, with `\`, `'`, newlines and carriage returns escaped
//! - `{}` for empty objects, `{ k: v, k2: v2 }` otherwise
//! - `[]` for empty arrays, `[ a, b ]` otherwise
//! - `name(a, b)`, `name<Type>(a)` for calls, `a().b(1)` for chains
//! - `(params) => { return body; }` for lambdas
//! - `export const name = value;` for declarations

pub mod imports;

use std::fmt;

use crate::error::{GeneratorError, Result};
use crate::options::ModuleResolution;
pub use imports::{ImportKind, ImportRequirement, ModuleSpecifier, aggregate};

/// A renderable source fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    node: Node,
    /// Imports required by this node itself (children carry their own)
    imports: Vec<ImportRequirement>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    VarRef(String),
    Object(Vec<Entry>),
    Array(Vec<Definition>),
    Call {
        name: String,
        generic: Option<String>,
        args: Vec<Definition>,
    },
    Chain(Vec<Definition>),
    Lambda {
        params: Vec<String>,
        body: Box<Definition>,
    },
    Const {
        name: String,
        value: Box<Definition>,
        export: bool,
    },
    Import(String),
}

/// An object literal entry
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `key: value`
    Property(String, Definition),
    /// `...value`
    Spread(Definition),
    /// `name` (shorthand for `name: name`)
    Shorthand(String),
}

impl Definition {
    fn from_node(node: Node) -> Self {
        Self {
            node,
            imports: Vec::new(),
        }
    }

    /// String literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::from_node(Node::Str(value.into()))
    }

    /// Integer literal
    pub fn int(value: i64) -> Self {
        Self::from_node(Node::Int(value))
    }

    /// Floating point literal
    pub fn float(value: f64) -> Self {
        Self::from_node(Node::Float(value))
    }

    /// Boolean literal
    pub fn boolean(value: bool) -> Self {
        Self::from_node(Node::Bool(value))
    }

    /// Reference to a binding, or a verbatim expression
    pub fn var_ref(name: impl Into<String>) -> Self {
        Self::from_node(Node::VarRef(name.into()))
    }

    /// Object literal
    pub fn object(entries: Vec<Entry>) -> Self {
        Self::from_node(Node::Object(entries))
    }

    /// Object literal made only of `key: value` properties
    pub fn object_of<K: Into<String>>(properties: impl IntoIterator<Item = (K, Definition)>) -> Self {
        Self::object(
            properties
                .into_iter()
                .map(|(k, v)| Entry::Property(k.into(), v))
                .collect(),
        )
    }

    /// Array literal
    pub fn array(items: Vec<Definition>) -> Self {
        Self::from_node(Node::Array(items))
    }

    /// Function call
    pub fn call(name: impl Into<String>, args: Vec<Definition>) -> Self {
        Self::from_node(Node::Call {
            name: name.into(),
            generic: None,
            args,
        })
    }

    /// Function call with a generic type annotation, `name<Type>(args)`
    pub fn call_generic(
        name: impl Into<String>,
        generic: impl Into<String>,
        args: Vec<Definition>,
    ) -> Result<Self> {
        let name = name.into();
        let generic = generic.into();
        if name.is_empty() {
            return Err(GeneratorError::Configuration(format!(
                "generic call <{}> has no function name",
                generic
            )));
        }
        Ok(Self::from_node(Node::Call {
            name,
            generic: Some(generic),
            args,
        }))
    }

    /// Arrow function returning `body`
    pub fn lambda<S: Into<String>>(params: impl IntoIterator<Item = S>, body: Definition) -> Self {
        Self::from_node(Node::Lambda {
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        })
    }

    /// Arrow function without parameters
    pub fn thunk(body: Definition) -> Self {
        Self::lambda(Vec::<String>::new(), body)
    }

    /// `const name = value;`, optionally exported
    pub fn const_decl(name: impl Into<String>, value: Definition, export: bool) -> Self {
        Self::from_node(Node::Const {
            name: name.into(),
            value: Box::new(value),
            export,
        })
    }

    /// An import statement
    pub fn import(requirement: &ImportRequirement, resolution: ModuleResolution) -> Self {
        Self::from_node(Node::Import(requirement.render(resolution)))
    }

    /// Attach import requirements to this definition
    pub fn with_imports(mut self, imports: impl IntoIterator<Item = ImportRequirement>) -> Self {
        self.imports.extend(imports);
        self
    }

    /// Append a link to a method chain, returning the longer chain
    pub fn chain(self, next: Definition) -> Self {
        match self.node {
            Node::Chain(mut links) => {
                links.push(next);
                Self {
                    node: Node::Chain(links),
                    imports: self.imports,
                }
            }
            node => Self::from_node(Node::Chain(vec![
                Self {
                    node,
                    imports: self.imports,
                },
                next,
            ])),
        }
    }

    /// Declared binding name, for const declarations
    pub fn name(&self) -> Option<&str> {
        match &self.node {
            Node::Const { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Render to TypeScript source
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Every import required by this definition and its children, in render order
    pub fn imports(&self) -> Vec<ImportRequirement> {
        let mut out = Vec::new();
        self.collect_imports(&mut out);
        out
    }

    fn collect_imports(&self, out: &mut Vec<ImportRequirement>) {
        out.extend(self.imports.iter().cloned());
        match &self.node {
            Node::Object(entries) => {
                for entry in entries {
                    match entry {
                        Entry::Property(_, value) | Entry::Spread(value) => {
                            value.collect_imports(out)
                        }
                        Entry::Shorthand(_) => {}
                    }
                }
            }
            Node::Array(items) | Node::Chain(items) => {
                for item in items {
                    item.collect_imports(out);
                }
            }
            Node::Call { args, .. } => {
                for arg in args {
                    arg.collect_imports(out);
                }
            }
            Node::Lambda { body, .. } => body.collect_imports(out),
            Node::Const { value, .. } => value.collect_imports(out),
            Node::Str(_)
            | Node::Int(_)
            | Node::Float(_)
            | Node::Bool(_)
            | Node::VarRef(_)
            | Node::Import(_) => {}
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, items: &[Definition], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Str(value) => write_escaped(f, value),
            Node::Int(value) => write!(f, "{}", value),
            Node::Float(value) => write!(f, "{}", value),
            Node::Bool(value) => write!(f, "{}", value),
            Node::VarRef(name) => f.write_str(name),
            Node::Object(entries) => {
                if entries.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match entry {
                        Entry::Property(key, value) => write!(f, "{}: {}", key, value)?,
                        Entry::Spread(value) => write!(f, "...{}", value)?,
                        Entry::Shorthand(name) => f.write_str(name)?,
                    }
                }
                f.write_str(" }")
            }
            Node::Array(items) => {
                if items.is_empty() {
                    return f.write_str("[]");
                }
                f.write_str("[ ")?;
                write_separated(f, items, ", ")?;
                f.write_str(" ]")
            }
            Node::Call {
                name,
                generic,
                args,
            } => {
                f.write_str(name)?;
                if let Some(generic) = generic {
                    write!(f, "<{}>", generic)?;
                }
                f.write_str("(")?;
                write_separated(f, args, ", ")?;
                f.write_str(")")
            }
            Node::Chain(links) => write_separated(f, links, "."),
            Node::Lambda { params, body } => {
                write!(f, "({}) => {{ return {}; }}", params.join(", "), body)
            }
            Node::Const {
                name,
                value,
                export,
            } => {
                if *export {
                    f.write_str("export ")?;
                }
                write!(f, "const {} = {};", name, value)
            }
            Node::Import(statement) => f.write_str(statement),
        }
    }
}
