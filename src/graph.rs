use crate::error::{Error, Result};
use crate::schema::SchemaRegistry;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Wrapper for BinaryHeap to make it a min-heap on registration index,
/// so tables with no edge between them keep registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MinHeapItem {
    reg_index: usize,
}

impl Ord for MinHeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap behavior
        other.reg_index.cmp(&self.reg_index)
    }
}

impl PartialOrd for MinHeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the dependency edges referenced-table -> referencing-table.
/// Self-references do not create an ordering edge. A foreign key naming
/// an unregistered table is a configuration error.
fn build_edges(registry: &SchemaRegistry) -> Result<HashMap<usize, Vec<usize>>> {
    let index_of: HashMap<&str, usize> = registry
        .tables()
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name(), i))
        .collect();

    let mut adj: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for (i, table) in registry.tables().iter().enumerate() {
        for fk in table.foreign_keys() {
            let Some(&referenced) = index_of.get(fk.references_table.as_str()) else {
                return Err(Error::unknown_table(&fk.references_table));
            };
            if referenced == i {
                continue;
            }
            if seen.insert((referenced, i)) {
                adj.entry(referenced).or_default().push(i);
            }
        }
    }

    Ok(adj)
}

/// Topological sort of the registry's dependency graph using Kahn's
/// algorithm with a priority queue. Every table appears after all tables
/// it foreign-keys to; ties break by registration order.
pub fn dependency_order(registry: &SchemaRegistry) -> Result<Vec<String>> {
    let tables = registry.tables();
    if tables.is_empty() {
        return Ok(Vec::new());
    }

    let adj = build_edges(registry)?;

    let mut in_degree = vec![0usize; tables.len()];
    for targets in adj.values() {
        for &t in targets {
            in_degree[t] += 1;
        }
    }

    let mut heap: BinaryHeap<MinHeapItem> = BinaryHeap::new();
    for (i, degree) in in_degree.iter().copied().enumerate() {
        if degree == 0 {
            heap.push(MinHeapItem { reg_index: i });
        }
    }

    let mut result = Vec::with_capacity(tables.len());
    while let Some(item) = heap.pop() {
        result.push(tables[item.reg_index].name().to_string());

        if let Some(neighbors) = adj.get(&item.reg_index) {
            for &neighbor in neighbors {
                in_degree[neighbor] -= 1;
                if in_degree[neighbor] == 0 {
                    heap.push(MinHeapItem { reg_index: neighbor });
                }
            }
        }
    }

    if result.len() != tables.len() {
        return Err(Error::CyclicDependency {
            path: extract_cycle(registry, &adj),
        });
    }

    Ok(result)
}

/// DFS over the unprocessed graph to name one concrete cycle for the
/// error message.
fn extract_cycle(registry: &SchemaRegistry, adj: &HashMap<usize, Vec<usize>>) -> Vec<String> {
    let n = registry.tables().len();
    let mut visited: HashSet<usize> = HashSet::new();

    for start in 0..n {
        if visited.contains(&start) {
            continue;
        }
        let mut rec_stack: HashSet<usize> = HashSet::new();
        let mut path: Vec<usize> = Vec::new();
        if dfs_cycle(adj, start, &mut visited, &mut rec_stack, &mut path) {
            // The cycle is the suffix of the path starting at the repeated node
            if let Some(&repeated) = path.last() {
                if let Some(pos) = path.iter().position(|&x| x == repeated) {
                    return path[pos..]
                        .iter()
                        .map(|&i| registry.tables()[i].name().to_string())
                        .collect();
                }
            }
        }
    }

    Vec::new()
}

fn dfs_cycle(
    adj: &HashMap<usize, Vec<usize>>,
    node: usize,
    visited: &mut HashSet<usize>,
    rec_stack: &mut HashSet<usize>,
    path: &mut Vec<usize>,
) -> bool {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = adj.get(&node) {
        for &neighbor in neighbors {
            if !visited.contains(&neighbor) {
                if dfs_cycle(adj, neighbor, visited, rec_stack, path) {
                    return true;
                }
            } else if rec_stack.contains(&neighbor) {
                path.push(neighbor);
                return true;
            }
        }
    }

    rec_stack.remove(&node);
    path.pop();
    false
}
