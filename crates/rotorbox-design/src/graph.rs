//! Composition graph
//!
//! Every intermediate and final solid is a [`Part`] that declares which
//! other parts it is built from. The build order is a topological sort of
//! the parts the policy exports, so adding a part means declaring its
//! dependencies rather than editing a fixed sequence.

use crate::error::{DesignError, Result};
use crate::params::CompositionPolicy;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Part {
    ImuPosts,
    FeatherPosts,
    BatteryBay,
    /// The baseplate disc on its own
    BaseplateDisc,
    /// Baseplate disc fused with posts and bay, the exported baseplate
    Baseplate,
    BodyShell,
    Body,
    Cover,
}

impl Part {
    pub const ALL: [Part; 8] = [
        Part::ImuPosts,
        Part::FeatherPosts,
        Part::BatteryBay,
        Part::BaseplateDisc,
        Part::Baseplate,
        Part::BodyShell,
        Part::Body,
        Part::Cover,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Part::ImuPosts => "IMU posts",
            Part::FeatherPosts => "feather posts",
            Part::BatteryBay => "battery bay",
            Part::BaseplateDisc => "baseplate disc",
            Part::Baseplate => "baseplate",
            Part::BodyShell => "body shell",
            Part::Body => "body",
            Part::Cover => "cover",
        }
    }

    /// File name without extension, for parts that are exported
    pub fn file_stem(self) -> Option<&'static str> {
        match self {
            Part::Body => Some("body"),
            Part::Cover => Some("cover"),
            Part::Baseplate => Some("baseplate"),
            _ => None,
        }
    }

    /// Parts this one is composed from under `policy`
    pub fn dependencies(self, policy: CompositionPolicy) -> &'static [Part] {
        match (self, policy) {
            (Part::Baseplate, _) => &[
                Part::BaseplateDisc,
                Part::ImuPosts,
                Part::FeatherPosts,
                Part::BatteryBay,
            ],
            (Part::Body, CompositionPolicy::SubtractBaseplate) => {
                &[Part::BodyShell, Part::Baseplate]
            }
            (Part::Body, CompositionPolicy::UnionIntoBody) => &[
                Part::BodyShell,
                Part::ImuPosts,
                Part::FeatherPosts,
                Part::BatteryBay,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final parts written to disk under `policy`
pub fn outputs(policy: CompositionPolicy) -> &'static [Part] {
    match policy {
        CompositionPolicy::SubtractBaseplate => &[Part::Body, Part::Cover, Part::Baseplate],
        CompositionPolicy::UnionIntoBody => &[Part::Body, Part::Cover],
    }
}

/// Dependency edges restricted to what `outputs` actually needs
pub type Graph = BTreeMap<Part, Vec<Part>>;

pub fn graph(policy: CompositionPolicy) -> Graph {
    let mut graph = Graph::new();
    let mut pending: Vec<Part> = outputs(policy).to_vec();
    while let Some(part) = pending.pop() {
        if graph.contains_key(&part) {
            continue;
        }
        let deps = part.dependencies(policy).to_vec();
        pending.extend(deps.iter().copied());
        graph.insert(part, deps);
    }
    graph
}

/// Kahn's algorithm. Ties are broken by `Part` order so the sequence is
/// stable between runs.
pub fn build_order(graph: &Graph) -> Result<Vec<Part>> {
    let mut remaining: BTreeMap<Part, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<Part, Vec<Part>> = BTreeMap::new();
    for (&part, deps) in graph {
        remaining.insert(part, deps.len());
        for &dep in deps {
            if !graph.contains_key(&dep) {
                return Err(DesignError::MissingDependency { part, missing: dep });
            }
            dependents.entry(dep).or_default().push(part);
        }
    }

    let mut ready: BTreeSet<Part> = remaining
        .iter()
        .filter(|&(_, &n)| n == 0)
        .map(|(&p, _)| p)
        .collect();
    let mut order = Vec::with_capacity(graph.len());

    while let Some(part) = ready.pop_first() {
        order.push(part);
        for &dependent in dependents.get(&part).into_iter().flatten() {
            if let Some(n) = remaining.get_mut(&dependent) {
                *n -= 1;
                if *n == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() < graph.len() {
        let stuck = remaining
            .iter()
            .find(|&(_, &n)| n > 0)
            .map_or(Part::Body, |(&p, _)| p);
        return Err(DesignError::Cycle(stuck));
    }
    Ok(order)
}

/// Build order for `policy`
pub fn plan(policy: CompositionPolicy) -> Result<Vec<Part>> {
    build_order(&graph(policy))
}
