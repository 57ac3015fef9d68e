use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::warehouse::WarehouseModel;

/// Summary of FK graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Load ordering derived from the warehouse foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOrderReport {
    pub summary: FkGraphSummary,
    pub load_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Order tables so every table holding a foreign key is loaded before the
/// tables it references.
///
/// Foreign keys are attached while the referenced table is loaded, which
/// needs the referencing table to exist already. Ties break alphabetically.
pub fn build_load_order(model: &WarehouseModel) -> LoadOrderReport {
    let graph = build_adjacency(model);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = FkGraphSummary { nodes, edges };

    match toposort(&graph) {
        Ok(order) => LoadOrderReport {
            summary,
            load_order: Some(order),
            cycle: None,
        },
        Err(cycle) => LoadOrderReport {
            summary,
            load_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(model: &WarehouseModel) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for table in &model.tables {
        graph.entry(table.name.clone()).or_default();
        for fk in table.foreign_keys() {
            graph.entry(fk.parent_table.clone()).or_default();
            graph
                .entry(fk.child_table.clone())
                .or_default()
                .insert(fk.parent_table.clone());
        }
    }

    graph
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> =
        graph.keys().map(|node| (node.clone(), 0)).collect();

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter_map(|(node, count)| (*count == 0).then(|| node.clone()))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(target.clone());
                    }
                }
            }
        }
        order.push(node);
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        Err(indegree
            .into_iter()
            .filter_map(|(node, count)| (count > 0).then_some(node))
            .collect())
    }
}
