/// Duplex engine lifecycle state.
///
/// State transitions:
/// ```text
/// stopped ──start()──▶ started ──stop()──▶ stopped
/// ```
///
/// There is no paused state. Ducking is a property of what the render
/// path last played, not a state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Started,
}

impl EngineState {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stopped() {
        let state = EngineState::default();
        assert!(state.is_stopped());
        assert!(!state.is_started());
    }

    #[test]
    fn started_predicates() {
        assert!(EngineState::Started.is_started());
        assert!(!EngineState::Started.is_stopped());
    }
}
