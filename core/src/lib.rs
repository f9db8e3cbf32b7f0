//! Core schema model and DDL generation for declarative Postgres definitions.
//!
//! This crate defines the foundational types and algorithms for turning
//! declarative schema documents into ordered Postgres DDL:
//!
//! - [`SchemaCollection`] — the objects of one definition document (enums,
//!   composite types, tables).
//! - [`EnumDef`], [`CompositeDef`], [`TableDef`], [`ColumnDef`] — the object
//!   model, with [`SqlType`] classifying each column type as a literal SQL
//!   expression or a `$`-sigiled reference to a declared user type.
//! - [`Registry`] — qualified-name index over merged collections, with the
//!   schema set inferred from declarations.
//! - [`walk`] — transitive dependency expansion with cycle detection.
//! - [`build_schema_sql`], [`build_enum_sql`], [`build_composite_sql`],
//!   [`build_table_sql`], [`build_all_sql`] — ordered, deduplicated
//!   [`SqlObject`] sequences whose rendered concatenation is valid DDL.
//!
//! Validation ([`validate_collection`]) catches structural errors such as
//! malformed identifiers, empty enums, and multiple identity columns before
//! anything reaches the registry.
//!
//! # Example
//!
//! ```
//! use pgweave_core::*;
//!
//! let yaml = r#"
//! enums:
//!   - name: color
//!     items: [red, green, blue]
//! tables:
//!   - name: flowers
//!     columns:
//!       - { name: id, type: int }
//!       - { name: color, type: $public.color }
//! "#;
//! let collection: SchemaCollection = serde_yaml::from_str(yaml).unwrap();
//! assert!(validate_collection(&collection).is_empty());
//!
//! let mut registry = Registry::new();
//! registry.merge(vec![collection]).unwrap();
//!
//! let objects = build_all_sql(&registry).unwrap();
//! let names: Vec<&str> = objects.iter().map(|o| o.qualified_name()).collect();
//! assert_eq!(names, vec!["public", "public.color", "public.flowers"]);
//! assert!(objects[1].render_create_statement().starts_with("CREATE TYPE public.color AS ENUM"));
//! ```

mod build;
mod registry;
mod sql;
mod types;
mod validate;
mod walk;

pub use build::{
    NameFilter, build_all_sql, build_composite_sql, build_enum_sql, build_schema_sql,
    build_table_sql,
};
pub use registry::{MergeError, Registry};
pub use sql::{SqlObject, SqlObjectKind};
pub use types::*;
pub use validate::{ValidationError, validate_collection};
pub use walk::{WalkError, walk};
