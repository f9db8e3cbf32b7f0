//! Transitive dependency walker.
//!
//! Given a root object, [`walk`] produces the root followed by every object
//! transitively reachable through its columns' type references, in
//! depth-first pre-order driven by an explicit stack. The raw output is
//! root-first: callers reverse it (and deduplicate) to obtain a
//! dependency-safe emission order — see [`crate::build`].
//!
//! Each stack frame carries its ancestor trail, so a reference cycle fails
//! fast with [`WalkError::CycleDetected`] instead of looping forever.
//! Diamond-shaped sharing (one dependency reached through two siblings) is
//! not a cycle: the shared object is yielded once per path, and the
//! reverse-dedup step keeps the occurrence nearest its deepest use.

use thiserror::Error;

use crate::{Registry, SqlObject};

/// Errors raised during a dependency walk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    /// A column type reference leads back to one of its own ancestors.
    #[error("dependency cycle detected at {name} (reached via {path})")]
    CycleDetected {
        /// Qualified name of the object that closed the cycle.
        name: String,
        /// The reference path that reached it, ` -> `-joined.
        path: String,
    },
}

/// Walks the dependency closure of `root`, pre-order, root first.
///
/// A popped composite or table pushes the resolved references of its
/// columns in declaration order (so among immediate children, the last
/// column's dependency is visited first). Enums and schema wrappers are
/// terminal. Unresolved references contribute no node: a literal type, or a
/// reference with no registry match, is treated as a native type.
///
/// # Errors
///
/// Returns [`WalkError::CycleDetected`] as soon as a reference chain
/// revisits one of its ancestors.
///
/// # Examples
///
/// ```
/// use pgweave_core::{walk, ColumnDef, EnumDef, Registry, SchemaCollection, SqlObject, SqlType, TableDef};
///
/// let mut registry = Registry::new();
/// registry.merge(vec![SchemaCollection {
///     enums: vec![EnumDef::new("public", "color", &["red"])],
///     tables: vec![TableDef::new("public", "flowers")
///         .with_column(ColumnDef::new("id", SqlType::literal("int")))
///         .with_column(ColumnDef::new("color", SqlType::reference("public.color")))],
///     ..Default::default()
/// }]).unwrap();
///
/// let root = SqlObject::from_table(registry.table_def("public.flowers").unwrap());
/// let sequence = walk(&registry, root).unwrap();
/// let names: Vec<&str> = sequence.iter().map(|o| o.qualified_name()).collect();
/// assert_eq!(names, vec!["public.flowers", "public.color"]);
/// ```
pub fn walk<'a>(
    registry: &'a Registry,
    root: SqlObject<'a>,
) -> Result<Vec<SqlObject<'a>>, WalkError> {
    let mut output = Vec::new();
    let mut stack: Vec<(SqlObject<'a>, Vec<String>)> = vec![(root, Vec::new())];

    while let Some((object, trail)) = stack.pop() {
        let (columns, include_tables) = if let Some(table) = object.as_table() {
            (table.columns.as_slice(), true)
        } else if let Some(composite) = object.as_composite() {
            (composite.columns.as_slice(), false)
        } else {
            (&[][..], false)
        };

        if !columns.is_empty() {
            let mut child_trail = trail;
            child_trail.push(object.qualified_name().to_string());
            for column in columns {
                let Some(name) = column.sql_type.as_reference() else {
                    continue;
                };
                let Some(dependency) = registry.resolve_reference(name, include_tables) else {
                    continue;
                };
                if child_trail
                    .iter()
                    .any(|ancestor| ancestor == dependency.qualified_name())
                {
                    return Err(WalkError::CycleDetected {
                        name: dependency.qualified_name().to_string(),
                        path: child_trail.join(" -> "),
                    });
                }
                stack.push((dependency, child_trail.clone()));
            }
        }

        output.push(object);
    }

    Ok(output)
}
