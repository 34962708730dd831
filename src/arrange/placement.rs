//! Applying computed target positions to the host
//!
//! Placement runs in two strict phases:
//!
//! 1. Every non-reference target is applied. Nodes with descendants (groups,
//!    or layers carrying masks) push the same translation down to every
//!    unlocked descendant. Translations received by nodes registered in the
//!    [`DependencyTable`] are credited to them.
//! 2. Reference nodes are placed in table order, sources first. Each one is
//!    moved to its target (or kept at its frozen position when it was not
//!    targeted) minus the translation its sources received, which keeps it
//!    anchored where the engine meant it to be.
//!
//! Phase two reads translations that only phase one produces, so the order
//! is required for correctness.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::clones::DependencyTable;
use super::error::ArrangeError;
use super::host::Host;
use super::snapshot::Snapshot;
use super::types::{NodeId, Point};

/// Target position for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: NodeId,
    pub position: Point,
}

/// Ordered target positions produced by an engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    targets: Vec<Target>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId, position: Point) {
        self.targets.push(Target { id, position });
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Target for a node, if the plan has one
    pub fn target_of(&self, id: &NodeId) -> Option<Point> {
        self.targets
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.position)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Mutable bookkeeping for one dependency record during placement
#[derive(Debug, Clone)]
struct LedgerEntry {
    position: Point,
    translation: Point,
    moved_with_group: bool,
    target: Option<Point>,
}

/// Apply `plan` to `host`. Returns the number of nodes whose position
/// changed.
pub fn execute<H: Host + ?Sized>(
    host: &mut H,
    snapshot: &Snapshot,
    table: &DependencyTable,
    plan: &Plan,
) -> Result<usize, ArrangeError> {
    let ledger = table
        .records()
        .iter()
        .map(|r| LedgerEntry {
            position: r.position,
            translation: Point::zero(),
            moved_with_group: false,
            target: None,
        })
        .collect();

    let mut executor = Executor {
        host,
        snapshot,
        table,
        ledger,
        positions: HashMap::new(),
    };

    executor.place_nodes(plan)?;
    executor.place_references()?;

    let moved = executor
        .positions
        .iter()
        .filter(|(id, p)| snapshot.node(id).is_some_and(|n| n.position != **p))
        .count();
    debug!(moved, references = table.len(), "placement finished");
    Ok(moved)
}

struct Executor<'a, H: ?Sized> {
    host: &'a mut H,
    snapshot: &'a Snapshot,
    table: &'a DependencyTable,
    ledger: Vec<LedgerEntry>,
    /// Positions written so far
    positions: HashMap<NodeId, Point>,
}

impl<H: Host + ?Sized> Executor<'_, H> {
    fn current(&self, id: &NodeId) -> Result<Point, ArrangeError> {
        match self.positions.get(id) {
            Some(p) => Ok(*p),
            None => Ok(self.snapshot.get(id)?.position),
        }
    }

    fn move_to(&mut self, id: &NodeId, position: Point) -> Result<(), ArrangeError> {
        trace!(node = %id, %position, "move");
        self.host.set_position(id, position)?;
        self.positions.insert(id.clone(), position);
        Ok(())
    }

    /// Translate every unlocked descendant of `owner` by `delta`,
    /// regardless of visibility.
    fn cascade(&mut self, owner: &NodeId, delta: Point) -> Result<(), ArrangeError> {
        let snapshot = self.snapshot;
        for child in &snapshot.get(owner)?.descendants {
            if snapshot.get(child)?.locked {
                continue;
            }
            let to = self.current(child)? + delta;
            self.move_to(child, to)?;

            if let Some(i) = self.table.index_of(child) {
                let entry = &mut self.ledger[i];
                entry.moved_with_group = true;
                entry.position = to;
                entry.translation += delta;
            }
        }
        Ok(())
    }

    /// Phase one: everything but reference nodes
    fn place_nodes(&mut self, plan: &Plan) -> Result<(), ArrangeError> {
        let snapshot = self.snapshot;
        for target in plan.targets() {
            let node = snapshot.get(&target.id)?;

            if node.kind.is_reference() {
                // Deferred to phase two
                let i = self
                    .table
                    .index_of(&target.id)
                    .ok_or_else(|| ArrangeError::unknown(&target.id))?;
                self.ledger[i].target = Some(target.position);
                continue;
            }
            if node.locked {
                continue;
            }

            let delta = target.position - self.current(&target.id)?;
            if !node.descendants.is_empty() {
                self.cascade(&target.id, delta)?;
            }
            if let Some(i) = self.table.index_of(&target.id) {
                self.ledger[i].translation += delta;
            }
            self.move_to(&target.id, target.position)?;
        }
        Ok(())
    }

    /// Phase two: reference nodes, sources first
    fn place_references(&mut self) -> Result<(), ArrangeError> {
        let snapshot = self.snapshot;
        let table = self.table;

        for (i, record) in table.records().iter().enumerate() {
            if record.is_ancestral() || snapshot.get(&record.id)?.locked {
                continue;
            }

            let inherited = record
                .ancestors
                .iter()
                .filter_map(|a| table.index_of(a))
                .fold(Point::zero(), |sum, j| sum + self.ledger[j].translation);

            let entry = &self.ledger[i];
            let raw = entry.target.unwrap_or(entry.position);
            let visual = raw - entry.position;
            let position = raw - inherited;
            trace!(
                node = %record.id,
                %raw,
                %inherited,
                moved_with_group = entry.moved_with_group,
                "re-anchoring reference"
            );

            self.cascade(&record.id, visual)?;
            self.move_to(&record.id, position)?;

            let entry = &mut self.ledger[i];
            entry.translation += position - entry.position;
            entry.position = position;
        }
        Ok(())
    }
}
