//! Name-keyed registry of declared schema objects.
//!
//! The [`Registry`] owns three qualified-name-keyed mappings (enums,
//! composites, tables) plus the set of distinct schema names inferred from
//! them. It is populated by merging validated [`SchemaCollection`]s and read
//! by the dependency walker and the build functions.
//!
//! Ordered maps keep iteration deterministic, so build output is stable
//! across runs regardless of document order on disk.
//!
//! Mutation discipline: one writer during load (`merge`/`clear` take
//! `&mut self`), any number of readers during build (everything else takes
//! `&self`).

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::{CompositeDef, EnumDef, SchemaCollection, SqlObject, TableDef};

/// Errors raised while merging collections into a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Two documents declare the same qualified name within one category.
    #[error("duplicate {kind} definition: {name}")]
    DuplicateDefinition {
        /// Object category (enum, composite type, table).
        kind: &'static str,
        /// The qualified name declared twice.
        name: String,
    },
}

/// In-memory index of every declared schema object, keyed by qualified name.
///
/// # Examples
///
/// ```
/// use pgweave_core::{EnumDef, Registry, SchemaCollection, TableDef, ColumnDef, SqlType};
///
/// let mut registry = Registry::new();
/// let collection = SchemaCollection {
///     enums: vec![EnumDef::new("public", "color", &["red"])],
///     tables: vec![TableDef::new("sales", "orders")
///         .with_column(ColumnDef::new("id", SqlType::literal("int")))],
///     ..Default::default()
/// };
/// registry.merge(vec![collection]).unwrap();
///
/// assert!(registry.enum_def("public.color").is_some());
/// assert_eq!(registry.schemas().collect::<Vec<_>>(), vec!["public", "sales"]);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    enums: BTreeMap<String, EnumDef>,
    composites: BTreeMap<String, CompositeDef>,
    tables: BTreeMap<String, TableDef>,
    schemas: BTreeSet<String>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties all mappings and the schema set, permitting a reload.
    pub fn clear(&mut self) {
        self.enums.clear();
        self.composites.clear();
        self.tables.clear();
        self.schemas.clear();
    }

    /// Merges validated collections into the registry.
    ///
    /// Objects are indexed by qualified name. A qualified name already
    /// present in its category (in the incoming collections or from an
    /// earlier merge) is fatal: every duplicate is collected and reported
    /// together, and a failed merge leaves the registry untouched.
    ///
    /// On success the schema set is recomputed as the union of all observed
    /// `schema` fields.
    ///
    /// # Errors
    ///
    /// Returns every [`MergeError::DuplicateDefinition`] found.
    pub fn merge(&mut self, collections: Vec<SchemaCollection>) -> Result<(), Vec<MergeError>> {
        // Pass 1: detect duplicates against existing keys and within the
        // incoming collections, without mutating anything.
        let mut errors = Vec::new();
        let enum_names = collections
            .iter()
            .flat_map(|c| c.enums.iter().map(EnumDef::qualified_name));
        let composite_names = collections
            .iter()
            .flat_map(|c| c.composites.iter().map(CompositeDef::qualified_name));
        let table_names = collections
            .iter()
            .flat_map(|c| c.tables.iter().map(TableDef::qualified_name));

        detect_duplicates("enum", &self.enums, enum_names, &mut errors);
        detect_duplicates("composite type", &self.composites, composite_names, &mut errors);
        detect_duplicates("table", &self.tables, table_names, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        // Pass 2: insert everything, then recompute the schema set.
        for collection in collections {
            for def in collection.enums {
                self.enums.insert(def.qualified_name(), def);
            }
            for def in collection.composites {
                self.composites.insert(def.qualified_name(), def);
            }
            for def in collection.tables {
                self.tables.insert(def.qualified_name(), def);
            }
        }

        self.schemas = self
            .enums
            .values()
            .map(|def| def.schema.clone())
            .chain(self.composites.values().map(|def| def.schema.clone()))
            .chain(self.tables.values().map(|def| def.schema.clone()))
            .collect();

        Ok(())
    }

    /// Looks up an enum by qualified name.
    pub fn enum_def(&self, qualified_name: &str) -> Option<&EnumDef> {
        self.enums.get(qualified_name)
    }

    /// Looks up a composite type by qualified name.
    pub fn composite_def(&self, qualified_name: &str) -> Option<&CompositeDef> {
        self.composites.get(qualified_name)
    }

    /// Looks up a table by qualified name.
    pub fn table_def(&self, qualified_name: &str) -> Option<&TableDef> {
        self.tables.get(qualified_name)
    }

    /// Resolves a type reference to a wrapped object.
    ///
    /// Lookup priority is enums, then composites, then tables; table lookup
    /// only happens when `include_tables` is set (table columns may
    /// reference tables, composite columns may not).
    pub fn resolve_reference(&self, name: &str, include_tables: bool) -> Option<SqlObject<'_>> {
        if let Some(def) = self.enums.get(name) {
            return Some(SqlObject::from_enum(def));
        }
        if let Some(def) = self.composites.get(name) {
            return Some(SqlObject::from_composite(def));
        }
        if include_tables {
            if let Some(def) = self.tables.get(name) {
                return Some(SqlObject::from_table(def));
            }
        }
        None
    }

    /// Iterates enums in qualified-name order.
    pub fn enums(&self) -> impl Iterator<Item = (&str, &EnumDef)> {
        self.enums.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Iterates composite types in qualified-name order.
    pub fn composites(&self) -> impl Iterator<Item = (&str, &CompositeDef)> {
        self.composites
            .iter()
            .map(|(name, def)| (name.as_str(), def))
    }

    /// Iterates tables in qualified-name order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableDef)> {
        self.tables.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Iterates the inferred schema names in sorted order.
    pub fn schemas(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(String::as_str)
    }

    /// Returns `(enums, composites, tables, schemas)` counts.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.enums.len(),
            self.composites.len(),
            self.tables.len(),
            self.schemas.len(),
        )
    }

    /// Returns `true` if no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.composites.is_empty() && self.tables.is_empty()
    }
}

fn detect_duplicates<T>(
    kind: &'static str,
    existing: &BTreeMap<String, T>,
    incoming: impl Iterator<Item = String>,
    errors: &mut Vec<MergeError>,
) {
    let mut seen: BTreeSet<String> = existing.keys().cloned().collect();
    for name in incoming {
        if !seen.insert(name.clone()) {
            errors.push(MergeError::DuplicateDefinition { kind, name });
        }
    }
}
