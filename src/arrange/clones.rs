//! Dependency resolution for reference (clone) nodes
//!
//! A reference node renders its source offset by its own position, so when a
//! source moves, every reference downstream of it moves too. Before placing
//! anything, [`resolve`] walks the source chain of every reference node in
//! the selection (including references nested in selected groups) and builds
//! a [`DependencyTable`]:
//!
//! - the first non-reference source of each chain is recorded as an
//!   *ancestral* entry: it is never retargeted, but the translation it
//!   receives while other nodes are placed is credited to it;
//! - every reference on the chain is recorded as a *dependent* entry, with
//!   the ids of all sources upstream of it. Summing their translations gives
//!   how far the node was dragged by its sources.
//!
//! Sources are always inserted before the nodes that depend on them, so
//! iterating the table in order visits a chain from its root downwards.

use std::collections::HashMap;

use super::bounds;
use super::error::ArrangeError;
use super::snapshot::Snapshot;
use super::types::{NodeId, Point, Rect};

/// Role of a node in the dependency table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyRole {
    /// A non-reference source; never placed by the reference pass
    Ancestral,
    /// A reference node that must be re-anchored after its sources moved
    Dependent,
}

/// One node of the dependency graph, as frozen at resolution time
#[derive(Debug, Clone)]
pub struct DependencyRecord {
    pub id: NodeId,
    pub role: DependencyRole,
    pub position: Point,
    /// Corrected geometry, `None` for nodes without geometry
    pub bounds: Option<Rect>,
    /// Upstream sources, nearest first, whose translation this node inherits
    pub ancestors: Vec<NodeId>,
}

impl DependencyRecord {
    pub fn is_ancestral(&self) -> bool {
        self.role == DependencyRole::Ancestral
    }
}

/// Arena of dependency records keyed by node id, sources before dependents
#[derive(Debug, Clone, Default)]
pub struct DependencyTable {
    records: Vec<DependencyRecord>,
    index: HashMap<NodeId, usize>,
}

impl DependencyTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&DependencyRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Position of a record in processing order
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Records in processing order (sources first)
    pub fn records(&self) -> &[DependencyRecord] {
        &self.records
    }

    fn insert(&mut self, record: DependencyRecord) {
        if self.index.contains_key(&record.id) {
            return;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }
}

/// Build the dependency table for the selection captured in `snapshot`.
pub fn resolve(snapshot: &Snapshot) -> Result<DependencyTable, ArrangeError> {
    let mut clones: Vec<&NodeId> = Vec::new();
    for id in snapshot.selection() {
        if snapshot.get(id)?.kind.is_reference() {
            clones.push(id);
        }
    }
    for id in snapshot.selection() {
        for child in &snapshot.get(id)?.descendants {
            if snapshot.get(child)?.kind.is_reference() {
                clones.push(child);
            }
        }
    }

    let mut resolver = Resolver {
        snapshot,
        table: DependencyTable::default(),
        in_progress: Vec::new(),
    };
    for id in clones {
        let mut chain = Vec::new();
        resolver.visit(id, &mut chain, 0)?;
    }

    Ok(resolver.table)
}

struct Resolver<'a> {
    snapshot: &'a Snapshot,
    table: DependencyTable,
    /// Reference nodes on the chain currently being walked
    in_progress: Vec<NodeId>,
}

impl Resolver<'_> {
    /// Record `id` and, first, everything upstream of it.
    ///
    /// `chain` collects the sources met so far along this walk; the entry
    /// for the node at `depth` inherits `chain[depth..]`, i.e. exactly the
    /// sources upstream of it.
    fn visit(
        &mut self,
        id: &NodeId,
        chain: &mut Vec<NodeId>,
        depth: usize,
    ) -> Result<(), ArrangeError> {
        if self.in_progress.contains(id) {
            let mut cycle = self.in_progress.clone();
            cycle.push(id.clone());
            return Err(ArrangeError::cyclic(cycle));
        }

        let node = self.snapshot.get(id)?;
        let source_id = node
            .source
            .clone()
            .ok_or_else(|| ArrangeError::MissingSource { id: id.clone() })?;
        let source = self.snapshot.get(&source_id)?;
        chain.push(source_id.clone());

        if source.kind.is_reference() {
            self.in_progress.push(id.clone());
            let result = self.visit(&source_id, chain, depth + 1);
            self.in_progress.pop();
            result?;
        } else if !self.table.contains(&source_id) {
            self.table.insert(DependencyRecord {
                id: source_id.clone(),
                role: DependencyRole::Ancestral,
                position: source.position,
                bounds: bounds::try_geometry(self.snapshot, &source_id)?,
                ancestors: Vec::new(),
            });
        }

        if !self.table.contains(id) {
            self.table.insert(DependencyRecord {
                id: id.clone(),
                role: DependencyRole::Dependent,
                position: node.position,
                bounds: bounds::geometry(self.snapshot, id)?,
                ancestors: chain[depth..].to_vec(),
            });
        }

        Ok(())
    }
}
