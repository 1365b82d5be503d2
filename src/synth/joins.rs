//! Join planning over the catalog's declared join keys.
//!
//! The schema is small and star-shaped, so planning is a hub lookup with a
//! one-hop fallback rather than a general path search.

use std::collections::BTreeSet;

use tracing::debug;

use super::{SchemaResolutionError, SynthResult};
use crate::catalog::{Catalog, ColumnRef, JoinKey};

/// A table joined onto the plan, with the key that links it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedJoin<'c> {
    pub table: String,
    pub key: &'c JoinKey,
}

/// FROM table plus INNER JOINs, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlan<'c> {
    pub base: String,
    pub joins: Vec<PlannedJoin<'c>>,
}

impl<'c> JoinPlan<'c> {
    fn single(table: &str) -> Self {
        Self {
            base: table.to_string(),
            joins: vec![],
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base.as_str()).chain(self.joins.iter().map(|j| j.table.as_str()))
    }

    /// Whether rows of `table` can be repeated by the joins.
    ///
    /// Walking out from `table`, crossing a key from its primary-key side to a
    /// non-key side multiplies rows.
    pub fn fans_out(&self, catalog: &Catalog, table: &str) -> bool {
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut stack = vec![table];
        visited.insert(table);

        while let Some(current) = stack.pop() {
            for join in &self.joins {
                let key = join.key;
                let (near, far) = if key.left.table == current {
                    (&key.left, &key.right)
                } else if key.right.table == current {
                    (&key.right, &key.left)
                } else {
                    continue;
                };
                if visited.contains(far.table.as_str()) {
                    continue;
                }
                if is_primary_key(catalog, near) && !is_primary_key(catalog, far) {
                    return true;
                }
                visited.insert(far.table.as_str());
                stack.push(far.table.as_str());
            }
        }
        false
    }
}

fn is_primary_key(catalog: &Catalog, column: &ColumnRef) -> bool {
    catalog
        .table(&column.table)
        .is_some_and(|t| t.primary_key == column.column)
}

/// Plan the joins needed to reach every table in `required`.
///
/// `required` must be deduplicated and in catalog order.
pub fn plan_joins<'c>(catalog: &'c Catalog, required: &[String]) -> SynthResult<JoinPlan<'c>> {
    let plan = match required {
        [] => JoinPlan::single(&catalog.default_table),
        [only] => JoinPlan::single(only),
        _ => hub_plan(catalog, required)
            .or_else(|| one_hop_plan(catalog, required))
            .ok_or_else(|| SchemaResolutionError::NoJoinPath {
                tables: required.to_vec(),
            })?,
    };

    debug!(
        base = %plan.base,
        joins = ?plan.joins.iter().map(|j| j.table.as_str()).collect::<Vec<_>>(),
        "planned joins"
    );
    Ok(plan)
}

/// A table with a direct key to every other required table.
///
/// Required tables are tried first, the most connected one first, so a fact
/// table wins over the dimensions it links.
fn hub_plan<'c>(catalog: &'c Catalog, required: &[String]) -> Option<JoinPlan<'c>> {
    let key_count = |table: &str| {
        catalog
            .join_keys
            .iter()
            .filter(|k| k.left.table == table || k.right.table == table)
            .count()
    };
    let mut candidates: Vec<&String> = required.iter().collect();
    candidates.sort_by_key(|t| std::cmp::Reverse(key_count(t.as_str())));

    let others = catalog
        .tables
        .iter()
        .map(|t| &t.name)
        .filter(|name| !required.contains(name));

    candidates.into_iter().chain(others).find_map(|hub| {
        let joins = required
            .iter()
            .filter(|table| *table != hub)
            .map(|table| {
                catalog.join_key(hub, table).map(|key| PlannedJoin {
                    table: table.clone(),
                    key,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(JoinPlan {
            base: hub.clone(),
            joins,
        })
    })
}

/// Start from a required table and reach each other one directly or through one intermediate.
fn one_hop_plan<'c>(catalog: &'c Catalog, required: &[String]) -> Option<JoinPlan<'c>> {
    required.iter().find_map(|base| {
        let mut plan = JoinPlan::single(base);

        for target in required {
            if plan.tables().any(|t| t == target.as_str()) {
                continue;
            }

            let direct = plan
                .tables()
                .find_map(|joined| catalog.join_key(joined, target));
            if let Some(key) = direct {
                plan.joins.push(PlannedJoin {
                    table: target.clone(),
                    key,
                });
                continue;
            }

            let hop = plan.tables().find_map(|joined| {
                catalog.tables.iter().find_map(|middle| {
                    let first = catalog.join_key(joined, &middle.name)?;
                    let second = catalog.join_key(&middle.name, target)?;
                    Some((middle.name.clone(), first, second))
                })
            });
            let (middle, first, second) = hop?;
            if !plan.tables().any(|t| t == middle.as_str()) {
                plan.joins.push(PlannedJoin {
                    table: middle,
                    key: first,
                });
            }
            plan.joins.push(PlannedJoin {
                table: target.clone(),
                key: second,
            });
        }

        Some(plan)
    })
}
