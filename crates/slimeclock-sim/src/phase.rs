//! Animation phase

/// Which forces apply to the particles this frame.
///
/// Legal transitions: `Idle → Enter` (presence rising edge), `Enter → Show`
/// (choreography end time reached while still seen), `Enter/Show → Idle`
/// (presence-loss decay completed). `Enter` is never entered from `Show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No viewer: ambient jitter only
    #[default]
    Idle,
    /// Entrance choreography in flight
    Enter,
    /// Steady display with ambient wobble
    Show,
}

impl Phase {
    pub fn is_idle(self) -> bool {
        matches!(self, Phase::Idle)
    }
}
