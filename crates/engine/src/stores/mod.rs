//! In-process coordination state.

mod generation_gate;

pub use generation_gate::{GateBusy, GenerationGate, GenerationSlot};
