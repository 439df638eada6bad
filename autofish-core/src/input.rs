//! Sources for the per-tick "is the player actuating" signal.

use crate::state::MinigameState;

pub trait ActuationInput {
    fn is_engaged(&mut self, tick: u32, state: &MinigameState) -> bool;
}

impl<F> ActuationInput for F
where
    F: FnMut(u32, &MinigameState) -> bool,
{
    fn is_engaged(&mut self, tick: u32, state: &MinigameState) -> bool {
        self(tick, state)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Released;

impl ActuationInput for Released {
    fn is_engaged(&mut self, _tick: u32, _state: &MinigameState) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Held;

impl ActuationInput for Held {
    fn is_engaged(&mut self, _tick: u32, _state: &MinigameState) -> bool {
        true
    }
}

/// Presses for `duty` ticks out of every `period`.
#[derive(Clone, Copy, Debug)]
pub struct Pulse {
    pub period: u32,
    pub duty: u32,
}

impl ActuationInput for Pulse {
    fn is_engaged(&mut self, tick: u32, _state: &MinigameState) -> bool {
        self.period > 0 && tick % self.period < self.duty
    }
}

/// Replays a recorded press sequence, released once it runs out.
#[derive(Clone, Debug)]
pub struct Recorded<'a> {
    presses: &'a [bool],
}

impl<'a> Recorded<'a> {
    pub fn new(presses: &'a [bool]) -> Self {
        Self { presses }
    }
}

impl ActuationInput for Recorded<'_> {
    fn is_engaged(&mut self, tick: u32, _state: &MinigameState) -> bool {
        self.presses.get(tick as usize).copied().unwrap_or(false)
    }
}
