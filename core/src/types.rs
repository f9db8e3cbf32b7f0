//! Schema object model for declarative Postgres definitions.
//!
//! These types mirror the YAML definition document contract: a document is a
//! [`SchemaCollection`] of enumerated types, composite types, and tables. The
//! types are plain serde records; behavior lives in the registry, walker, and
//! renderer modules.

use serde::{Deserialize, Serialize};

/// Default schema for objects that do not declare one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Sigil marking a column type string as a reference to a declared user type.
pub const TYPE_REFERENCE_SIGIL: char = '$';

/// A column's declared SQL type, classified once at parse time.
///
/// A type string starting with `$` references a declared user type by
/// qualified name (e.g. `$public.color`); anything else is a literal SQL
/// type expression passed through to the DDL verbatim (e.g. `varchar(64)`).
/// Only references participate in dependency resolution.
///
/// # Examples
///
/// ```
/// use pgweave_core::SqlType;
///
/// let reference = SqlType::from("$public.color".to_string());
/// assert_eq!(reference, SqlType::Reference("public.color".to_string()));
/// assert_eq!(reference.name(), "public.color");
///
/// let literal = SqlType::from("varchar(64)".to_string());
/// assert_eq!(literal.name(), "varchar(64)");
/// assert!(literal.as_reference().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SqlType {
    /// Reference to a declared enum, composite, or table by qualified name
    /// (sigil already stripped).
    Reference(String),
    /// Literal SQL type expression, emitted as-is.
    Literal(String),
}

impl SqlType {
    /// Creates a literal type from a plain SQL type expression.
    pub fn literal(text: &str) -> Self {
        SqlType::Literal(text.to_string())
    }

    /// Creates a reference to a declared user type by qualified name.
    pub fn reference(qualified_name: &str) -> Self {
        SqlType::Reference(qualified_name.to_string())
    }

    /// Returns the type text as it appears in DDL, with the sigil stripped.
    pub fn name(&self) -> &str {
        match self {
            SqlType::Reference(name) | SqlType::Literal(name) => name,
        }
    }

    /// Returns the referenced qualified name, or `None` for literals.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            SqlType::Reference(name) => Some(name),
            SqlType::Literal(_) => None,
        }
    }
}

impl From<String> for SqlType {
    fn from(raw: String) -> Self {
        match raw.strip_prefix(TYPE_REFERENCE_SIGIL) {
            Some(name) => SqlType::Reference(name.to_string()),
            None => SqlType::Literal(raw),
        }
    }
}

impl From<SqlType> for String {
    fn from(value: SqlType) -> Self {
        match value {
            SqlType::Reference(name) => format!("{TYPE_REFERENCE_SIGIL}{name}"),
            SqlType::Literal(text) => text,
        }
    }
}

/// A column of a table or composite type.
///
/// # Examples
///
/// ```
/// use pgweave_core::{ColumnDef, SqlType};
///
/// let id = ColumnDef::new("id", SqlType::literal("int")).with_identity();
/// assert!(id.is_identity());
///
/// // A column named exactly `id` is the identity column by convention.
/// let by_name = ColumnDef::new("id", SqlType::literal("bigint"));
/// assert!(by_name.is_identity());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name; must consist of `[A-Za-z0-9_]` characters.
    pub name: String,
    /// Declared SQL type (literal or user-type reference).
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    /// Whether the column accepts NULL. Defaults to true.
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Explicit identity/primary-key marker.
    #[serde(default)]
    pub identity: bool,
    /// Optional column comment, rendered as `COMMENT ON COLUMN`.
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnDef {
    /// Creates a nullable, non-identity column.
    pub fn new(name: &str, sql_type: SqlType) -> Self {
        Self {
            name: name.to_string(),
            sql_type,
            nullable: true,
            identity: false,
            comment: None,
        }
    }

    /// Marks the column as the generated identity primary key.
    pub fn with_identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Marks the column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Adds a column comment.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Returns `true` if this column renders the identity clause, either by
    /// the `id` naming convention or the explicit `identity` flag.
    pub fn is_identity(&self) -> bool {
        self.identity || self.name == "id"
    }
}

/// An enumerated type declaration.
///
/// # Examples
///
/// ```
/// use pgweave_core::EnumDef;
///
/// let color = EnumDef::new("public", "color", &["red", "green"]);
/// assert_eq!(color.qualified_name(), "public.color");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Schema the type is created in. Defaults to `public`.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Type name.
    pub name: String,
    /// Type comment, rendered as `COMMENT ON TYPE`.
    #[serde(default)]
    pub comment: String,
    /// Enum labels, emitted in declared order.
    pub items: Vec<String>,
}

impl EnumDef {
    /// Creates an enum declaration with the given labels.
    pub fn new(schema: &str, name: &str, items: &[&str]) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            comment: String::new(),
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    }

    /// Adds a type comment.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Returns the `schema.name` qualified name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// A composite type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeDef {
    /// Schema the type is created in. Defaults to `public`.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Type name.
    pub name: String,
    /// Type comment, rendered as `COMMENT ON TYPE`.
    #[serde(default)]
    pub comment: String,
    /// Attribute columns; may be empty.
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

impl CompositeDef {
    /// Creates a composite declaration with no columns.
    pub fn new(schema: &str, name: &str) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            comment: String::new(),
            columns: Vec::new(),
        }
    }

    /// Adds a type comment.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Adds an attribute column.
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Returns the `schema.name` qualified name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Table-level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableOptions {
    /// Create the table as UNLOGGED (no WAL, not crash-safe).
    #[serde(default)]
    pub unlogged: bool,
}

/// A table declaration.
///
/// # Examples
///
/// ```
/// use pgweave_core::{ColumnDef, SqlType, TableDef};
///
/// let users = TableDef::new("public", "users")
///     .with_column(ColumnDef::new("id", SqlType::literal("int")))
///     .with_column(ColumnDef::new("name", SqlType::literal("text")));
/// assert_eq!(users.qualified_name(), "public.users");
/// assert_eq!(users.identity_columns(), vec!["id"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// Schema the table is created in. Defaults to `public`.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Table name.
    pub name: String,
    /// Table comment, rendered as `COMMENT ON TABLE`.
    #[serde(default)]
    pub comment: String,
    /// Table-level options.
    #[serde(default)]
    pub options: TableOptions,
    /// Table columns; must be non-empty.
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Creates a table declaration with no columns.
    pub fn new(schema: &str, name: &str) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            comment: String::new(),
            options: TableOptions::default(),
            columns: Vec::new(),
        }
    }

    /// Adds a table comment.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Adds a column.
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Marks the table as UNLOGGED.
    pub fn unlogged(mut self) -> Self {
        self.options.unlogged = true;
        self
    }

    /// Returns the `schema.name` qualified name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Returns the names of all columns that qualify as identity columns.
    pub fn identity_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.is_identity())
            .map(|column| column.name.as_str())
            .collect()
    }
}

/// The objects gathered from one definition document.
///
/// Documents are unordered on input; multiple collections merge into a
/// [`Registry`](crate::Registry) which indexes every object by qualified
/// name.
///
/// # Examples
///
/// ```
/// use pgweave_core::SchemaCollection;
///
/// let yaml = r#"
/// enums:
///   - name: color
///     items: [red, green]
/// tables:
///   - name: flowers
///     columns:
///       - { name: id, type: int }
///       - { name: color, type: $public.color }
/// "#;
/// let collection: SchemaCollection = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(collection.enums.len(), 1);
/// assert_eq!(collection.tables.len(), 1);
/// assert!(collection.composites.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaCollection {
    /// Table declarations.
    #[serde(default)]
    pub tables: Vec<TableDef>,
    /// Composite type declarations.
    #[serde(default)]
    pub composites: Vec<CompositeDef>,
    /// Enumerated type declarations.
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

impl SchemaCollection {
    /// Returns `true` if the collection declares no objects.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.composites.is_empty() && self.enums.is_empty()
    }

    /// Returns the total number of declared objects.
    pub fn len(&self) -> usize {
        self.tables.len() + self.composites.len() + self.enums.len()
    }
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_type_classification() {
        assert_eq!(
            SqlType::from("$sales.address".to_string()),
            SqlType::Reference("sales.address".to_string())
        );
        assert_eq!(
            SqlType::from("timestamptz".to_string()),
            SqlType::Literal("timestamptz".to_string())
        );
    }

    #[test]
    fn test_sql_type_round_trips_sigil() {
        let reference = SqlType::from("$public.color".to_string());
        assert_eq!(String::from(reference), "$public.color");

        let literal = SqlType::from("text[]".to_string());
        assert_eq!(String::from(literal), "text[]");
    }

    #[test]
    fn test_identity_by_name_and_flag() {
        let by_name = ColumnDef::new("id", SqlType::literal("int"));
        assert!(by_name.is_identity());

        let by_flag = ColumnDef::new("user_id", SqlType::literal("int")).with_identity();
        assert!(by_flag.is_identity());

        let plain = ColumnDef::new("label", SqlType::literal("text"));
        assert!(!plain.is_identity());
    }

    #[test]
    fn test_column_defaults_from_yaml() {
        let column: ColumnDef = serde_yaml::from_str("{ name: label, type: text }").unwrap();
        assert!(column.nullable);
        assert!(!column.identity);
        assert!(column.comment.is_none());
    }

    #[test]
    fn test_schema_defaults_to_public() {
        let yaml = "name: color\nitems: [red]\n";
        let parsed: EnumDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.schema, "public");
        assert_eq!(parsed.qualified_name(), "public.color");
    }

    #[test]
    fn test_table_identity_columns_combines_both_conventions() {
        let table = TableDef::new("public", "t")
            .with_column(ColumnDef::new("id", SqlType::literal("int")))
            .with_column(ColumnDef::new("uid", SqlType::literal("int")).with_identity())
            .with_column(ColumnDef::new("label", SqlType::literal("text")));
        assert_eq!(table.identity_columns(), vec!["id", "uid"]);
    }

    #[test]
    fn test_collection_counts() {
        let mut collection = SchemaCollection::default();
        assert!(collection.is_empty());
        collection.enums.push(EnumDef::new("public", "color", &["red"]));
        assert_eq!(collection.len(), 1);
        assert!(!collection.is_empty());
    }
}
