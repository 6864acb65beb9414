//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{State, Transition};
use crate::engine::Machine;

/// Builder for constructing a [`Machine`] with a fluent API.
///
/// Collects the name, an optional initial state and transitions, then
/// validates and registers everything in one step. The built machine is ready
/// to be shared for evaluation.
pub struct MachineBuilder<I = ()> {
    name: String,
    initial: Option<State>,
    transitions: Vec<Transition<I>>,
}

impl<I> MachineBuilder<I> {
    /// Create a new builder for a machine called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: None,
            transitions: Vec::new(),
        }
    }

    /// Set the declared initial state (optional).
    pub fn initial(mut self, state: impl Into<State>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Add a transition.
    pub fn transition(mut self, transition: Transition<I>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition<I>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Build the machine.
    /// Returns the first name, state or registration error encountered.
    pub fn build(self) -> Result<Machine<I>, BuildError> {
        let mut machine = Machine::new(&self.name)?;
        if let Some(initial) = self.initial {
            machine.set_initial(initial)?;
        }
        for transition in self.transitions {
            machine.register(transition)?;
        }
        Ok(machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MachineError;
    use crate::error::ErrorKind;

    #[test]
    fn fluent_api_builds_machine() {
        let machine: Machine = MachineBuilder::new("transfer-intent")
            .initial("PENDING")
            .transition(Transition::new("PENDING", "SUBMIT", "SUBMITTED"))
            .transitions(vec![
                Transition::new("SUBMITTED", "APPROVE", "APPROVED"),
                Transition::new("SUBMITTED", "REJECT", "REJECTED"),
            ])
            .build()
            .unwrap();

        assert_eq!(machine.name(), "transfer-intent");
        assert_eq!(machine.initial(), Some(&State::new("PENDING")));
        assert_eq!(machine.len(), 3);
    }

    #[test]
    fn builder_validates_name() {
        let result = MachineBuilder::<()>::new("  ").build();
        assert!(matches!(
            result,
            Err(BuildError::Machine(MachineError::InvalidMachineName(_)))
        ));
    }

    #[test]
    fn builder_validates_initial_state() {
        let result = MachineBuilder::<()>::new("orders").initial("NOT VALID").build();
        assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::InvalidState));
    }

    #[test]
    fn builder_rejects_duplicates() {
        let result = MachineBuilder::<()>::new("orders")
            .transition(Transition::new("A", "GO", "B"))
            .transition(Transition::new("A", "GO", "C"))
            .build();

        assert_eq!(
            result.err().map(|e| e.kind()),
            Some(ErrorKind::DuplicateTransition)
        );
    }

    #[test]
    fn empty_machine_is_allowed() {
        let machine = MachineBuilder::<()>::new("orders").build().unwrap();
        assert!(machine.is_empty());
        assert!(machine.initial().is_none());
    }
}
