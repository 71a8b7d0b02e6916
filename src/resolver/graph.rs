//! Module graph - the reachable part of the registry as a petgraph DiGraph.
//!
//! Edges point from a dependent to its dependency and carry the visibility
//! of the declaration that produced them. Nodes are added in discovery order
//! and edges in declaration order, so every walk over the graph is
//! deterministic for a given registry and root list.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::core::{ModuleRegistry, Visibility};
use crate::resolver::errors::{similar_names, ResolveError};

/// What to do with a dependency name the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Fail with `UnknownModule`
    Error,
    /// Leave the name out of the graph
    Skip,
}

/// Dependency graph reachable from a list of root modules.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    graph: DiGraph<String, Visibility>,
    nodes: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl ModuleGraph {
    /// Walk the registry from `roots`.
    ///
    /// With `Visibility::Public` only public edges are followed; with
    /// `Visibility::Private` every edge is. External modules are leaves.
    pub fn build<'a>(
        registry: &ModuleRegistry,
        roots: impl IntoIterator<Item = &'a str>,
        scope: Visibility,
        unknown: UnknownPolicy,
    ) -> Result<Self, ResolveError> {
        let mut this = ModuleGraph {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            roots: Vec::new(),
        };
        let mut queue = VecDeque::new();

        for root in roots {
            if !registry.contains(root) {
                if unknown == UnknownPolicy::Skip {
                    continue;
                }
                return Err(unknown_module(registry, root, None));
            }
            let (node, added) = this.add_node(root);
            if added {
                queue.push_back(node);
            }
            if !this.roots.contains(&node) {
                this.roots.push(node);
            }
        }

        while let Some(node) = queue.pop_front() {
            let name = this.graph[node].clone();
            let Some(module) = registry.get(&name) else {
                // external leaf
                continue;
            };

            for (dep, visibility) in module.edges() {
                if scope == Visibility::Public && visibility == Visibility::Private {
                    continue;
                }
                if !registry.contains(dep) {
                    if unknown == UnknownPolicy::Skip {
                        continue;
                    }
                    return Err(unknown_module(registry, dep, Some(&name)));
                }

                let (dep_node, added) = this.add_node(dep);
                if added {
                    queue.push_back(dep_node);
                }
                if this.graph.find_edge(node, dep_node).is_none() {
                    this.graph.add_edge(node, dep_node, visibility);
                }
            }
        }

        Ok(this)
    }

    fn add_node(&mut self, name: &str) -> (NodeIndex, bool) {
        if let Some(&node) = self.nodes.get(name) {
            return (node, false);
        }
        let node = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), node);
        (node, true)
    }

    /// Module names in discovery order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Check if a module was reached.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of modules reached.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if nothing was reached.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Outgoing edges of a node in declaration order.
    fn edges_in_order(&self, node: NodeIndex) -> Vec<(EdgeIndex, NodeIndex, Visibility)> {
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|e| (e.id(), e.target(), *e.weight()))
            .collect();
        edges.sort_by_key(|(id, _, _)| id.index());
        edges
    }

    /// Direct dependencies of a module that are part of this graph.
    pub fn dependencies(&self, name: &str) -> Vec<(&str, Visibility)> {
        match self.nodes.get(name) {
            Some(&node) => self
                .edges_in_order(node)
                .into_iter()
                .map(|(_, target, vis)| (self.graph[target].as_str(), vis))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Modules with dependencies before dependents.
    ///
    /// Roots are visited in order and each module's dependencies in
    /// declaration order, so `Engine -> Core` yields `[Core, Engine]`.
    pub fn topological_order(&self) -> Result<Vec<String>, ResolveError> {
        if let Some(cycle) = self.find_cycle() {
            return Err(ResolveError::CyclicDependency { cycle });
        }

        let mut order = Vec::with_capacity(self.len());
        let mut done = HashSet::new();

        for &root in &self.roots {
            if done.contains(&root) {
                continue;
            }
            // (node, children already pushed)
            let mut stack = vec![(root, false)];
            while let Some((node, expanded)) = stack.pop() {
                if expanded {
                    if done.insert(node) {
                        order.push(self.graph[node].clone());
                    }
                    continue;
                }
                if done.contains(&node) {
                    continue;
                }
                stack.push((node, true));
                for (_, dep, _) in self.edges_in_order(node).into_iter().rev() {
                    if !done.contains(&dep) {
                        stack.push((dep, false));
                    }
                }
            }
        }

        Ok(order)
    }

    /// A cycle in the graph as `[a, b, ..., a]`, if there is one.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let start = toposort(&self.graph, None).err()?.node_id();

        let scc = tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| scc.contains(&start))
            .unwrap_or_else(|| vec![start]);

        let first = scc.iter().copied().min_by_key(|n| n.index()).unwrap_or(start);
        let members: HashSet<NodeIndex> = scc.into_iter().collect();
        Some(self.cycle_through(first, &members))
    }

    /// Does a cycle pass through `name`?
    pub fn cycle_through_module(&self, name: &str) -> Option<Vec<String>> {
        let &node = self.nodes.get(name)?;
        let scc = tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| scc.contains(&node))?;

        let self_loop = self.graph.find_edge(node, node).is_some();
        if scc.len() == 1 && !self_loop {
            return None;
        }
        let members: HashSet<NodeIndex> = scc.into_iter().collect();
        Some(self.cycle_through(node, &members))
    }

    /// Shortest path `start -> ... -> start` inside one strongly connected component.
    fn cycle_through(&self, start: NodeIndex, members: &HashSet<NodeIndex>) -> Vec<String> {
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        let mut last = start;

        'search: while let Some(node) = queue.pop_front() {
            for (_, dep, _) in self.edges_in_order(node) {
                if dep == start {
                    last = node;
                    break 'search;
                }
                if members.contains(&dep) && !parent.contains_key(&dep) && dep != start {
                    parent.insert(dep, node);
                    queue.push_back(dep);
                }
            }
        }

        let mut middle = Vec::new();
        let mut node = last;
        while node != start {
            middle.push(self.graph[node].clone());
            match parent.get(&node) {
                Some(&p) => node = p,
                None => break,
            }
        }
        middle.reverse();

        let mut path = vec![self.graph[start].clone()];
        path.extend(middle);
        path.push(self.graph[start].clone());
        path
    }

    /// The chain from a root to `name`, with the visibility of each hop.
    ///
    /// The first step is the root and carries no visibility.
    pub fn path_to(&self, name: &str) -> Option<Vec<(String, Option<Visibility>)>> {
        let &goal = self.nodes.get(name)?;
        let mut parent: HashMap<NodeIndex, (NodeIndex, Visibility)> = HashMap::new();
        let mut seen: HashSet<NodeIndex> = self.roots.iter().copied().collect();
        let mut queue: VecDeque<NodeIndex> = self.roots.iter().copied().collect();

        while let Some(node) = queue.pop_front() {
            if node == goal {
                break;
            }
            for (_, dep, vis) in self.edges_in_order(node) {
                if seen.insert(dep) {
                    parent.insert(dep, (node, vis));
                    queue.push_back(dep);
                }
            }
        }

        if !seen.contains(&goal) {
            return None;
        }

        let mut chain = Vec::new();
        let mut node = goal;
        while let Some(&(prev, vis)) = parent.get(&node) {
            chain.push((self.graph[node].clone(), Some(vis)));
            node = prev;
        }
        chain.push((self.graph[node].clone(), None));
        chain.reverse();
        Some(chain)
    }
}

fn unknown_module(registry: &ModuleRegistry, name: &str, required_by: Option<&str>) -> ResolveError {
    ResolveError::UnknownModule {
        module: name.to_string(),
        required_by: required_by.map(str::to_string),
        suggestions: similar_names(name, registry.known_names()),
    }
}
