//! Build orchestration: registry selection, dependency expansion, ordering.
//!
//! Each build function selects objects from a [`Registry`] by an optional
//! name predicate and returns an ordered sequence of [`SqlObject`]s whose
//! rendered concatenation is valid DDL: every referenced user type or table
//! appears before its first referencing object.
//!
//! A predicate matching nothing yields an empty sequence, never an error.

use std::collections::HashSet;

use crate::{Registry, SqlObject, WalkError, walk};

/// Optional qualified-name predicate used to select registry objects.
pub type NameFilter<'f> = &'f dyn Fn(&str) -> bool;

fn selected(filter: Option<NameFilter<'_>>, name: &str) -> bool {
    filter.is_none_or(|predicate| predicate(name))
}

/// Keeps the first occurrence of every qualified name.
fn dedup_first<'a>(objects: impl Iterator<Item = SqlObject<'a>>) -> Vec<SqlObject<'a>> {
    let mut seen: HashSet<String> = HashSet::new();
    objects
        .filter(|object| seen.insert(object.qualified_name().to_string()))
        .collect()
}

/// Builds `CREATE SCHEMA` objects for the inferred schema names.
///
/// Schemas have no dependencies; the result is in sorted name order.
pub fn build_schema_sql<'a>(
    registry: &'a Registry,
    filter: Option<NameFilter<'_>>,
) -> Vec<SqlObject<'a>> {
    registry
        .schemas()
        .filter(|name| selected(filter, name))
        .map(SqlObject::from_schema)
        .collect()
}

/// Builds enum objects in selection (sorted qualified-name) order.
///
/// Enums are terminal: no dependency expansion applies.
///
/// # Examples
///
/// ```
/// use pgweave_core::{build_enum_sql, EnumDef, Registry, SchemaCollection};
///
/// let mut registry = Registry::new();
/// registry.merge(vec![SchemaCollection {
///     enums: vec![
///         EnumDef::new("public", "color", &["red"]),
///         EnumDef::new("public", "size", &["s", "m"]),
///     ],
///     ..Default::default()
/// }]).unwrap();
///
/// assert_eq!(build_enum_sql(&registry, None).len(), 2);
///
/// let only_color = build_enum_sql(&registry, Some(&|name| name == "public.color"));
/// assert_eq!(only_color[0].qualified_name(), "public.color");
/// assert_eq!(only_color.len(), 1);
/// ```
pub fn build_enum_sql<'a>(
    registry: &'a Registry,
    filter: Option<NameFilter<'_>>,
) -> Vec<SqlObject<'a>> {
    registry
        .enums()
        .filter(|(name, _)| selected(filter, name))
        .map(|(_, def)| SqlObject::from_enum(def))
        .collect()
}

/// Builds composite type objects, optionally expanded with dependencies.
///
/// With `with_dependencies`, each selected composite is expanded through
/// [`walk`]; the concatenated walks are reversed and deduplicated by
/// qualified name (first surviving occurrence kept), which places every
/// shared dependency exactly once, before all of its dependents.
///
/// # Errors
///
/// Returns [`WalkError::CycleDetected`] if dependency expansion encounters
/// a reference cycle.
pub fn build_composite_sql<'a>(
    registry: &'a Registry,
    filter: Option<NameFilter<'_>>,
    with_dependencies: bool,
) -> Result<Vec<SqlObject<'a>>, WalkError> {
    let roots = registry
        .composites()
        .filter(|(name, _)| selected(filter, name))
        .map(|(_, def)| SqlObject::from_composite(def));

    if !with_dependencies {
        return Ok(roots.collect());
    }

    let mut collected = Vec::new();
    for root in roots {
        collected.extend(walk(registry, root)?);
    }
    Ok(dedup_first(collected.into_iter().rev()))
}

/// Builds table objects, optionally expanded with dependencies.
///
/// Ordering and deduplication behave as in [`build_composite_sql`]; table
/// columns may additionally reference other tables.
///
/// # Errors
///
/// Returns [`WalkError::CycleDetected`] if dependency expansion encounters
/// a reference cycle.
pub fn build_table_sql<'a>(
    registry: &'a Registry,
    filter: Option<NameFilter<'_>>,
    with_dependencies: bool,
) -> Result<Vec<SqlObject<'a>>, WalkError> {
    let roots = registry
        .tables()
        .filter(|(name, _)| selected(filter, name))
        .map(|(_, def)| SqlObject::from_table(def));

    if !with_dependencies {
        return Ok(roots.collect());
    }

    let mut collected = Vec::new();
    for root in roots {
        collected.extend(walk(registry, root)?);
    }
    Ok(dedup_first(collected.into_iter().rev()))
}

/// Builds the full dump: schemas, enums, composites, then tables, with
/// dependency expansion and global deduplication (first occurrence kept).
///
/// The result renders to a complete, forward-reference-safe DDL script:
/// every enum precedes the composites, every composite ordering is
/// dependency-safe, and table dependencies were all emitted by the earlier
/// sections or by the table section itself.
///
/// # Errors
///
/// Returns [`WalkError::CycleDetected`] if any dependency expansion
/// encounters a reference cycle.
pub fn build_all_sql<'a>(registry: &'a Registry) -> Result<Vec<SqlObject<'a>>, WalkError> {
    let mut combined = build_schema_sql(registry, None);
    combined.extend(build_enum_sql(registry, None));
    combined.extend(build_composite_sql(registry, None, true)?);
    combined.extend(build_table_sql(registry, None, true)?);
    Ok(dedup_first(combined.into_iter()))
}
