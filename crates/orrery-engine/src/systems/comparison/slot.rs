use glam::Vec3;

use crate::api::types::{NodeId, Slot};
use crate::assets::registry::BodyInstance;
use crate::extensions::tween::TweenId;

/// Lifecycle of one comparison slot. The slot owns whatever instance its
/// state carries; no instance is ever held by two slots.
#[derive(Debug, Default)]
pub enum SlotState {
    #[default]
    Empty,
    /// Enter animation in flight.
    Populating { occupant: BodyInstance },
    /// At rest, visible and fully opaque.
    Active { occupant: BodyInstance },
    /// Exit animation in flight; `next` spawns once it finishes.
    Despawning {
        outgoing: BodyInstance,
        next: String,
        exit_to: Vec3,
    },
}

/// State tag without the owned instance, for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    Empty,
    Populating,
    Active,
    Despawning,
}

impl SlotState {
    pub fn phase(&self) -> SlotPhase {
        match self {
            SlotState::Empty => SlotPhase::Empty,
            SlotState::Populating { .. } => SlotPhase::Populating,
            SlotState::Active { .. } => SlotPhase::Active,
            SlotState::Despawning { .. } => SlotPhase::Despawning,
        }
    }

    /// The instance currently attached for this slot, if any.
    pub fn instance(&self) -> Option<&BodyInstance> {
        match self {
            SlotState::Empty => None,
            SlotState::Populating { occupant } | SlotState::Active { occupant } => Some(occupant),
            SlotState::Despawning { outgoing, .. } => Some(outgoing),
        }
    }

    /// The name this slot is heading toward: its occupant, or the body
    /// queued behind an exit.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            SlotState::Empty => None,
            SlotState::Populating { occupant } | SlotState::Active { occupant } => {
                Some(occupant.name())
            }
            SlotState::Despawning { next, .. } => Some(next.as_str()),
        }
    }

    /// Neither entering nor leaving.
    pub fn is_settled(&self) -> bool {
        matches!(self, SlotState::Empty | SlotState::Active { .. })
    }
}

/// One comparison display position.
#[derive(Debug)]
pub struct ComparisonSlot {
    pub slot: Slot,
    pub(super) state: SlotState,
    /// Bumped by every request that changes the target. Completions that
    /// captured an older value are stale.
    pub(super) generation: u64,
}

impl ComparisonSlot {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            state: SlotState::Empty,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn phase(&self) -> SlotPhase {
        self.state.phase()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target_name(&self) -> Option<&str> {
        self.state.target_name()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.state.instance().map(BodyInstance::node)
    }

    /// Start a new transition. Returns the generation it owns.
    pub(super) fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(super) fn take_state(&mut self) -> SlotState {
        std::mem::take(&mut self.state)
    }
}

/// Which half of a slot change an animation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Exit,
    Enter,
}

/// A slot change waiting on an animation completion.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub slot: Slot,
    pub generation: u64,
    pub phase: Phase,
    pub tween: TweenId,
}
