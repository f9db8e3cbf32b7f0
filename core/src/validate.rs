//! Structural validation of parsed definition documents.
//!
//! Validates one [`SchemaCollection`] at a time, catching problems that would
//! otherwise surface as broken DDL: empty or malformed identifiers, enums
//! without labels, tables without columns, duplicate column names, and
//! tables with more than one identity column.
//!
//! Cross-document problems (duplicate qualified names) are caught later by
//! [`Registry::merge`](crate::Registry::merge).
//!
//! # Examples
//!
//! ```
//! use pgweave_core::{validate_collection, EnumDef, SchemaCollection};
//!
//! let mut collection = SchemaCollection::default();
//! collection.enums.push(EnumDef::new("public", "color", &["red", "green"]));
//! assert!(validate_collection(&collection).is_empty());
//!
//! // Invalid: enum with no labels
//! let mut bad = SchemaCollection::default();
//! bad.enums.push(EnumDef::new("public", "color", &[]));
//! assert!(!validate_collection(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ColumnDef, SchemaCollection};

/// Structural problems found in a definition document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An object has an empty name or schema.
    #[error("{kind} has an empty name or schema")]
    EmptyName {
        /// Object category (enum, composite type, table).
        kind: &'static str,
    },
    /// An identifier contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid identifier '{identifier}' in {object}")]
    InvalidIdentifier {
        /// The offending identifier.
        identifier: String,
        /// Qualified name (or best-effort label) of the containing object.
        object: String,
    },
    /// An enum declares no labels.
    #[error("enum {0} has no items")]
    EmptyEnumItems(String),
    /// A table declares no columns.
    #[error("table {0} has no columns")]
    EmptyTableColumns(String),
    /// Two columns of the same object share a name.
    #[error("duplicate column '{column}' in {object}")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
        /// Qualified name of the containing object.
        object: String,
    },
    /// A table has more than one identity column (by `id` name or flag).
    #[error("table {table} has multiple identity columns: {columns}")]
    MultipleIdentityColumns {
        /// Qualified name of the table.
        table: String,
        /// Comma-joined identity column names.
        columns: String,
    },
}

/// Validates a single definition document.
///
/// Returns every problem found; an empty vector means the collection is
/// structurally sound and safe to merge into a registry.
pub fn validate_collection(collection: &SchemaCollection) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for def in &collection.enums {
        if def.schema.is_empty() || def.name.is_empty() {
            errors.push(ValidationError::EmptyName { kind: "enum" });
            continue;
        }
        let object = def.qualified_name();
        check_identifier(&def.schema, &object, &mut errors);
        check_identifier(&def.name, &object, &mut errors);
        if def.items.is_empty() {
            errors.push(ValidationError::EmptyEnumItems(object));
        }
    }

    for def in &collection.composites {
        if def.schema.is_empty() || def.name.is_empty() {
            errors.push(ValidationError::EmptyName {
                kind: "composite type",
            });
            continue;
        }
        let object = def.qualified_name();
        check_identifier(&def.schema, &object, &mut errors);
        check_identifier(&def.name, &object, &mut errors);
        check_columns(&def.columns, &object, &mut errors);
    }

    for def in &collection.tables {
        if def.schema.is_empty() || def.name.is_empty() {
            errors.push(ValidationError::EmptyName { kind: "table" });
            continue;
        }
        let object = def.qualified_name();
        check_identifier(&def.schema, &object, &mut errors);
        check_identifier(&def.name, &object, &mut errors);
        if def.columns.is_empty() {
            errors.push(ValidationError::EmptyTableColumns(object.clone()));
        }
        check_columns(&def.columns, &object, &mut errors);

        let identity = def.identity_columns();
        if identity.len() > 1 {
            errors.push(ValidationError::MultipleIdentityColumns {
                table: object,
                columns: identity.join(", "),
            });
        }
    }

    errors
}

fn check_columns(columns: &[ColumnDef], object: &str, errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for column in columns {
        if column.name.is_empty() {
            errors.push(ValidationError::InvalidIdentifier {
                identifier: String::new(),
                object: object.to_string(),
            });
            continue;
        }
        check_identifier(&column.name, object, errors);
        if !seen.insert(column.name.as_str()) {
            errors.push(ValidationError::DuplicateColumn {
                column: column.name.clone(),
                object: object.to_string(),
            });
        }
    }
}

fn check_identifier(identifier: &str, object: &str, errors: &mut Vec<ValidationError>) {
    let valid = identifier
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !valid {
        errors.push(ValidationError::InvalidIdentifier {
            identifier: identifier.to_string(),
            object: object.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnDef, CompositeDef, EnumDef, SqlType, TableDef};

    fn collection_with_table(table: TableDef) -> SchemaCollection {
        SchemaCollection {
            tables: vec![table],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_collection_passes() {
        let collection = SchemaCollection {
            enums: vec![EnumDef::new("public", "color", &["red", "green"])],
            composites: vec![
                CompositeDef::new("public", "address")
                    .with_column(ColumnDef::new("city", SqlType::literal("text"))),
            ],
            tables: vec![
                TableDef::new("sales", "orders")
                    .with_column(ColumnDef::new("id", SqlType::literal("int")))
                    .with_column(ColumnDef::new("total", SqlType::literal("numeric"))),
            ],
        };
        assert!(validate_collection(&collection).is_empty());
    }

    #[test]
    fn test_empty_enum_items_rejected() {
        let collection = SchemaCollection {
            enums: vec![EnumDef::new("public", "color", &[])],
            ..Default::default()
        };
        let errors = validate_collection(&collection);
        assert_eq!(
            errors,
            vec![ValidationError::EmptyEnumItems("public.color".to_string())]
        );
    }

    #[test]
    fn test_table_without_columns_rejected() {
        let errors = validate_collection(&collection_with_table(TableDef::new("public", "t")));
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::EmptyTableColumns(name) if name == "public.t"))
        );
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let table = TableDef::new("public", "t")
            .with_column(ColumnDef::new("bad-name", SqlType::literal("int")));
        let errors = validate_collection(&collection_with_table(table));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidIdentifier { identifier, .. } if identifier == "bad-name"
        )));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let table = TableDef::new("public", "t")
            .with_column(ColumnDef::new("label", SqlType::literal("text")))
            .with_column(ColumnDef::new("label", SqlType::literal("int")));
        let errors = validate_collection(&collection_with_table(table));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::DuplicateColumn { column, .. } if column == "label"
        )));
    }

    #[test]
    fn test_multiple_identity_columns_rejected() {
        // One by naming convention, one by explicit flag.
        let table = TableDef::new("public", "t")
            .with_column(ColumnDef::new("id", SqlType::literal("int")))
            .with_column(ColumnDef::new("uid", SqlType::literal("int")).with_identity());
        let errors = validate_collection(&collection_with_table(table));
        assert_eq!(
            errors,
            vec![ValidationError::MultipleIdentityColumns {
                table: "public.t".to_string(),
                columns: "id, uid".to_string(),
            }]
        );
    }

    #[test]
    fn test_zero_identity_columns_is_legal() {
        let table = TableDef::new("public", "t")
            .with_column(ColumnDef::new("label", SqlType::literal("text")));
        assert!(validate_collection(&collection_with_table(table)).is_empty());
    }
}
