use crate::error::PhaseError;

/// Controller lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Record and taxonomy fetches outstanding
    Loading,
    /// Operator may edit and submit
    Ready,
    /// Update in flight; inputs disabled
    Submitting,
    /// Update accepted, operator sent to the listing
    Navigated,
}

/// Validates a phase transition.
pub fn validate_transition(from: Phase, to: Phase) -> Result<(), PhaseError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(PhaseError::IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: Phase) -> Vec<Phase> {
    use Phase::*;
    match from {
        Loading => vec![Ready],
        Ready => vec![Submitting],
        Submitting => vec![Navigated, Ready],
        Navigated => vec![],
    }
}

fn allowed(from: Phase, to: Phase) -> bool {
    allowed_transitions(from).into_iter().any(|p| p == to)
}
