//! `Grid`: bounded occupancy index over a `width × height` lattice.
//!
//! The grid does not own agents.  It only answers "who is at this cell?" and
//! "where is this agent?"; the simulation's vehicle and requester stores own
//! the agents themselves.  Several agents may share a cell.

use td_core::{AgentRef, Position, SimRng};

use crate::{SpatialError, SpatialResult};

#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;
#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;

/// Bounded 2D occupancy index.  No wraparound.
#[derive(Debug, Clone)]
pub struct Grid {
    width:     u32,
    height:    u32,
    /// Cell → agents in placement order.  Empty cells have no entry.
    occupants: Map<Position, Vec<AgentRef>>,
    /// Reverse index: agent → cell.
    locations: Map<AgentRef, Position>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            occupants: Map::default(),
            locations: Map::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` if `pos` lies inside `[0, width) × [0, height)`.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.within(self.width, self.height)
    }

    /// Return `Ok(())` if `pos` is on the grid, `OutOfBounds` otherwise.
    pub fn check(&self, pos: Position) -> SpatialResult<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(SpatialError::OutOfBounds {
                pos,
                width:  self.width,
                height: self.height,
            })
        }
    }

    /// Put `agent` at `pos`.  An agent that is already placed is relocated.
    pub fn place(&mut self, agent: impl Into<AgentRef>, pos: Position) -> SpatialResult<()> {
        let agent = agent.into();
        self.check(pos)?;
        self.detach(agent);
        self.occupants.entry(pos).or_default().push(agent);
        self.locations.insert(agent, pos);
        Ok(())
    }

    /// Move an already-placed `agent` to `pos`.
    ///
    /// Fails with `OutOfBounds` (leaving the agent where it was) or with
    /// `NotPlaced` if the agent is not on the grid.
    pub fn move_to(&mut self, agent: impl Into<AgentRef>, pos: Position) -> SpatialResult<()> {
        let agent = agent.into();
        self.check(pos)?;
        if !self.locations.contains_key(&agent) {
            return Err(SpatialError::NotPlaced(agent));
        }
        self.place(agent, pos)
    }

    /// Take `agent` off the grid, returning the cell it occupied.
    pub fn remove(&mut self, agent: impl Into<AgentRef>) -> Option<Position> {
        self.detach(agent.into())
    }

    /// Agents currently at `pos`, in placement order.  Empty for unoccupied
    /// or out-of-bounds cells.
    pub fn occupants_at(&self, pos: Position) -> &[AgentRef] {
        self.occupants.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell currently occupied by `agent`.
    pub fn position_of(&self, agent: impl Into<AgentRef>) -> Option<Position> {
        self.locations.get(&agent.into()).copied()
    }

    /// Number of placed agents.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// A uniformly random cell on this grid.
    pub fn random_cell(&self, rng: &mut SimRng) -> Position {
        rng.cell(self.width, self.height)
    }

    fn detach(&mut self, agent: AgentRef) -> Option<Position> {
        let old = self.locations.remove(&agent)?;
        if let Some(cell) = self.occupants.get_mut(&old) {
            cell.retain(|&a| a != agent);
            if cell.is_empty() {
                self.occupants.remove(&old);
            }
        }
        Some(old)
    }
}
