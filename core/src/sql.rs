//! SQL object wrapper and DDL renderer.
//!
//! [`SqlObject`] binds one schema object (or an inferred schema name) to its
//! qualified name and renders it into a single idempotent DDL statement
//! block. Wrappers are constructed on demand by the build functions and the
//! dependency walker, never mutated, and discarded after rendering.
//!
//! The renderer targets one dialect: Postgres. `CREATE TABLE`/`CREATE
//! SCHEMA` statements are guarded with `IF NOT EXISTS`; type statements are
//! not (Postgres has no `CREATE TYPE IF NOT EXISTS`).

use std::fmt::Write as _;

use crate::{CompositeDef, EnumDef, TableDef};

/// Discriminant of a wrapped schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SqlObjectKind {
    /// Enumerated type.
    Enum,
    /// Composite type.
    Composite,
    /// Table.
    Table,
    /// Inferred schema (namespace), wrapped as its bare name.
    Schema,
}

#[derive(Debug, Clone, PartialEq)]
enum SqlDef<'a> {
    Enum(&'a EnumDef),
    Composite(&'a CompositeDef),
    Table(&'a TableDef),
    Schema(&'a str),
}

/// One schema object bound to its qualified name, ready for rendering.
///
/// This is a sum type over the four object kinds, so every wrapped value is
/// renderable by construction and dispatch in
/// [`render_create_statement`](SqlObject::render_create_statement) is an
/// exhaustive match.
///
/// # Examples
///
/// ```
/// use pgweave_core::{EnumDef, SqlObject, SqlObjectKind};
///
/// let color = EnumDef::new("public", "color", &["red", "green"]).with_comment("c");
/// let object = SqlObject::from_enum(&color);
/// assert_eq!(object.kind(), SqlObjectKind::Enum);
/// assert_eq!(object.qualified_name(), "public.color");
/// assert_eq!(
///     object.render_create_statement(),
///     "CREATE TYPE public.color AS ENUM\n\t('red','green');\nCOMMENT ON TYPE public.color IS 'c';\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SqlObject<'a> {
    qualified_name: String,
    def: SqlDef<'a>,
}

impl<'a> SqlObject<'a> {
    /// Wraps an enumerated type.
    pub fn from_enum(def: &'a EnumDef) -> Self {
        Self {
            qualified_name: def.qualified_name(),
            def: SqlDef::Enum(def),
        }
    }

    /// Wraps a composite type.
    pub fn from_composite(def: &'a CompositeDef) -> Self {
        Self {
            qualified_name: def.qualified_name(),
            def: SqlDef::Composite(def),
        }
    }

    /// Wraps a table.
    pub fn from_table(def: &'a TableDef) -> Self {
        Self {
            qualified_name: def.qualified_name(),
            def: SqlDef::Table(def),
        }
    }

    /// Wraps an inferred schema name.
    pub fn from_schema(name: &'a str) -> Self {
        Self {
            qualified_name: name.to_string(),
            def: SqlDef::Schema(name),
        }
    }

    /// Returns the object kind.
    pub fn kind(&self) -> SqlObjectKind {
        match self.def {
            SqlDef::Enum(_) => SqlObjectKind::Enum,
            SqlDef::Composite(_) => SqlObjectKind::Composite,
            SqlDef::Table(_) => SqlObjectKind::Table,
            SqlDef::Schema(_) => SqlObjectKind::Schema,
        }
    }

    /// Returns the qualified name (`schema.name`, or the bare schema name
    /// for schema wrappers).
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Returns the wrapped table, if this wraps one.
    pub fn as_table(&self) -> Option<&'a TableDef> {
        match self.def {
            SqlDef::Table(def) => Some(def),
            _ => None,
        }
    }

    /// Returns the wrapped composite type, if this wraps one.
    pub fn as_composite(&self) -> Option<&'a CompositeDef> {
        match self.def {
            SqlDef::Composite(def) => Some(def),
            _ => None,
        }
    }

    /// Renders the object into its DDL statement block.
    ///
    /// Pure function of the wrapped value: calling it repeatedly yields
    /// byte-identical output.
    pub fn render_create_statement(&self) -> String {
        let name = &self.qualified_name;
        let mut sql = String::new();

        match self.def {
            SqlDef::Enum(def) => {
                let items: Vec<String> =
                    def.items.iter().map(|item| format!("'{item}'")).collect();
                let _ = writeln!(sql, "CREATE TYPE {name} AS ENUM");
                let _ = writeln!(sql, "\t({});", items.join(","));
                let _ = writeln!(sql, "COMMENT ON TYPE {name} IS '{}';", def.comment);
            }
            SqlDef::Composite(def) => {
                let _ = writeln!(sql, "CREATE TYPE {name} AS");
                sql.push_str("(\n");
                let last = def.columns.len().saturating_sub(1);
                for (index, column) in def.columns.iter().enumerate() {
                    let separator = if index == last { "" } else { "," };
                    let _ = writeln!(
                        sql,
                        "\t{} {}{separator}",
                        column.name,
                        column.sql_type.name()
                    );
                }
                sql.push_str(");\n");
                let _ = writeln!(sql, "COMMENT ON TYPE {name} IS '{}';", def.comment);
            }
            SqlDef::Table(def) => {
                let persistence = if def.options.unlogged { "UNLOGGED " } else { "" };
                let _ = writeln!(sql, "CREATE {persistence}TABLE IF NOT EXISTS {name}");
                sql.push_str("(\n");
                let last = def.columns.len().saturating_sub(1);
                for (index, column) in def.columns.iter().enumerate() {
                    let _ = write!(sql, "\t{} {}", column.name, column.sql_type.name());
                    if column.is_identity() {
                        // Identity implies NOT NULL; no separate clause.
                        sql.push_str(" generated always as identity primary key");
                    } else if !column.nullable {
                        sql.push_str(" not null");
                    }
                    if index != last {
                        sql.push_str(",\n");
                    }
                }
                sql.push_str("\n);\n");
                let _ = writeln!(sql, "COMMENT ON TABLE {name} IS '{}';", def.comment);
                for column in &def.columns {
                    if let Some(comment) = &column.comment {
                        let _ = writeln!(
                            sql,
                            "COMMENT ON COLUMN {name}.{} IS '{comment}';",
                            column.name
                        );
                    }
                }
            }
            SqlDef::Schema(schema) => {
                let _ = write!(sql, "CREATE SCHEMA IF NOT EXISTS {schema};");
            }
        }

        sql
    }
}
