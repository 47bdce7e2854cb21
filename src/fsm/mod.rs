//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌────────────────┬───────────┬──────────┬──────────────────┐ │
//! │  │ OperatingState │ on_enter  │ on_exit  │ on_update        │ │
//! │  ├────────────────┼───────────┼──────────┼──────────────────┤ │
//! │  │ Standby        │ fn(ctx)   │ -        │ fn(ctx)->Option<>│ │
//! │  │ Preheating     │ fn(ctx)   │ -        │ fn(ctx)->Option<>│ │
//! │  │ Maintaining    │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<>│ │
//! │  │ EmergencyStop  │ fn(ctx)   │ -        │ fn(ctx)->Option<>│ │
//! │  └────────────────┴───────────┴──────────┴──────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each cycle the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the current
//! pointer; the next cycle dispatches to the new state's handler.
//!
//! Gas-emergency restore uses [`Fsm::restore`], which moves the pointer
//! without running any enter/exit actions.

pub mod context;
pub mod states;

use core::fmt;

use context::ControllerContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all controller states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum OperatingState {
    Standby = 0,
    Preheating = 1,
    Maintaining = 2,
    /// Terminal: entered only through the hardware emergency latch.
    EmergencyStop = 3,
}

impl OperatingState {
    /// Total number of states.  Sizes the table array.
    pub const COUNT: usize = 4;

    /// Operator-facing label.  The display and the logs both use this.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standby => "STANDBY",
            Self::Preheating => "PREHEATING",
            Self::Maintaining => "MAINTAINING",
            Self::EmergencyStop => "EMERGENCY STOP",
        }
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut ControllerContext);

/// Signature for the per-cycle update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut ControllerContext) -> Option<OperatingState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: OperatingState,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `OperatingState as usize`.
    table: [StateDescriptor; OperatingState::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; OperatingState::COUNT], initial: OperatingState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ControllerContext) {
        info!("FSM starting in state: {}", self.current_state());
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run the current state's handler once and apply any transition it
    /// requests.  Returns the state that was entered, if any.
    pub fn tick(&mut self, ctx: &mut ControllerContext) -> Option<OperatingState> {
        let next = (self.table[self.current].on_update)(ctx)?;
        if next as usize == self.current {
            return None;
        }
        self.transition(next, ctx);
        Some(next)
    }

    /// Force an immediate transition (the emergency latch uses this to
    /// jump to `EmergencyStop` regardless of what `on_update` returned).
    pub fn force_transition(&mut self, next: OperatingState, ctx: &mut ControllerContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// Move the state pointer back to `state` without running enter/exit
    /// actions.  Used when a gas emergency clears.
    pub fn restore(&mut self, state: OperatingState) {
        if state as usize != self.current {
            info!("FSM restore: {} -> {}", self.current_state(), state);
            self.current = state as usize;
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> OperatingState {
        self.table[self.current].id
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: OperatingState, ctx: &mut ControllerContext) {
        let next_idx = next as usize;

        info!("FSM transition: {} -> {}", self.current_state(), next);

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
