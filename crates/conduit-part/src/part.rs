//! Part descriptors and per-instance state.
//!
//! A [`PartKind`] is an immutable descriptor of capability: the fixed set
//! of aspects the part exposes. [`PartState`] is the mutable per-instance
//! data, exclusively owned by the container slot it occupies.

use conduit_evaluate::{BindError, EvalError, Value, VariableId, VariableRegistry};

use crate::{AspectId, AspectRegistry, Error, Result};

/// Immutable descriptor of a part's capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartKind {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// The aspects this kind exposes.
    pub aspects: &'static [AspectId],
}

impl PartKind {
    /// Whether this kind exposes the given aspect.
    pub fn exposes(&self, aspect: AspectId) -> bool {
        self.aspects.contains(&aspect)
    }
}

/// Mutable per-instance part data.
///
/// Tracks aspect selection, the bound target variable, the activation flag
/// with its transition counters, the part's applied effect (signal level /
/// enabled flag) and the diagnostic surface for evaluation failures.
#[derive(Debug)]
pub struct PartState {
    kind: PartKind,
    selected: Option<AspectId>,
    target: Option<VariableId>,
    in_network: bool,
    active: bool,
    activations: u64,
    deactivations: u64,
    signal: i64,
    enabled: bool,
    last_value: Option<Value>,
    last_error: Option<EvalError>,
}

impl PartState {
    /// Fresh state for a newly attached part.
    pub fn new(kind: PartKind) -> Self {
        Self {
            kind,
            selected: None,
            target: None,
            in_network: false,
            active: false,
            activations: 0,
            deactivations: 0,
            signal: 0,
            enabled: false,
            last_value: None,
            last_error: None,
        }
    }

    /// The immutable descriptor.
    pub fn kind(&self) -> PartKind {
        self.kind
    }

    /// The currently selected aspect.
    pub fn selected(&self) -> Option<AspectId> {
        self.selected
    }

    /// The bound target variable.
    pub fn target(&self) -> Option<VariableId> {
        self.target
    }

    /// Whether the selected write aspect is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the owning position is a member of a network.
    pub fn in_network(&self) -> bool {
        self.in_network
    }

    /// Number of `on_activate` calls fired so far.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Number of `on_deactivate` calls fired so far.
    pub fn deactivations(&self) -> u64 {
        self.deactivations
    }

    /// The applied signal level.
    pub fn signal(&self) -> i64 {
        self.signal
    }

    /// Set the applied signal level.
    pub fn set_signal(&mut self, level: i64) {
        self.signal = level;
    }

    /// The applied enabled flag.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the applied enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The last successfully written value.
    pub fn last_value(&self) -> Option<&Value> {
        self.last_value.as_ref()
    }

    /// The last evaluation failure, if the most recent write failed.
    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    /// Record a successful write.
    pub fn record_success(&mut self, value: Value) {
        self.last_value = Some(value);
        self.last_error = None;
    }

    /// Record an evaluation failure for the diagnostic surface.
    ///
    /// Failures are never escalated; the part simply yields no effect.
    pub fn record_failure(&mut self, error: EvalError) {
        self.last_error = Some(error);
    }

    /// Select an aspect (or clear the selection), routing through the
    /// activation lifecycle.
    ///
    /// Selecting the already-selected aspect fires no hooks.
    pub fn select_aspect(
        &mut self,
        aspects: &AspectRegistry,
        selection: Option<AspectId>,
    ) -> Result<()> {
        if let Some(id) = selection {
            if !self.kind.exposes(id) {
                return Err(Error::ForeignAspect {
                    part: self.kind.id,
                    aspect: id,
                });
            }
            if !aspects.contains(id) {
                return Err(Error::UnknownAspect(id));
            }
        }
        if selection == self.selected {
            return Ok(());
        }
        self.deactivate(aspects);
        self.selected = selection;
        self.sync_active(aspects);
        Ok(())
    }

    /// Bind a target variable against one of this part's aspects.
    ///
    /// The variable's declared type must match the aspect's; mismatches
    /// fail here, at composition time, never at evaluation time.
    pub fn bind_variable(
        &mut self,
        aspects: &AspectRegistry,
        variables: &VariableRegistry,
        aspect: AspectId,
        variable: VariableId,
    ) -> Result<()> {
        if !self.kind.exposes(aspect) {
            return Err(Error::ForeignAspect {
                part: self.kind.id,
                aspect,
            });
        }
        let expected = aspects.value_type(aspect).ok_or(Error::UnknownAspect(aspect))?;
        let found = variables
            .value_type(variable)
            .ok_or(Error::Bind(BindError::UnknownVariable(variable)))?;
        if found != expected {
            return Err(Error::Bind(BindError::TypeMismatch { expected, found }));
        }
        self.target = Some(variable);
        Ok(())
    }

    /// Clear the bound target variable.
    pub fn unbind_variable(&mut self) {
        self.target = None;
    }

    /// Inform the part of its position's network membership.
    ///
    /// A no-op membership change fires no hooks; a transition routes
    /// through the activation lifecycle.
    pub fn apply_membership(&mut self, aspects: &AspectRegistry, in_network: bool) {
        if self.in_network == in_network {
            return;
        }
        self.in_network = in_network;
        self.sync_active(aspects);
    }

    /// Force-deactivate the selected write aspect, if active.
    ///
    /// Used before the part leaves its slot or its network.
    pub fn deactivate(&mut self, aspects: &AspectRegistry) {
        if !self.active {
            return;
        }
        if let Some(aspect) = self.selected.and_then(|id| aspects.write(id)) {
            aspect.on_deactivate(self);
            self.deactivations += 1;
        }
        self.active = false;
    }

    /// Reconcile the activation flag with membership and selection,
    /// firing hooks exactly once per transition.
    fn sync_active(&mut self, aspects: &AspectRegistry) {
        let should = self.in_network && self.selected.is_some_and(|id| aspects.is_write(id));
        if should == self.active {
            return;
        }
        if should {
            if let Some(aspect) = self.selected.and_then(|id| aspects.write(id)) {
                aspect.on_activate(self);
                self.activations += 1;
            }
            self.active = true;
        } else {
            self.deactivate(aspects);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::{self, ACTUATOR, SENSOR, SIGNAL_ENABLE, SIGNAL_LEVEL, SIGNAL_STORED};
    use conduit_evaluate::ValueType;

    fn registry() -> AspectRegistry {
        AspectRegistry::with_builtins()
    }

    #[test]
    fn fresh_state_is_inert() {
        let state = PartState::new(ACTUATOR);
        assert!(!state.is_active());
        assert_eq!(state.selected(), None);
        assert_eq!(state.activations(), 0);
        assert_eq!(state.deactivations(), 0);
    }

    #[test]
    fn activation_requires_membership_and_selection() {
        let aspects = registry();
        let mut state = PartState::new(ACTUATOR);

        // Selection alone: no network, stays inactive
        state.select_aspect(&aspects, Some(SIGNAL_LEVEL)).unwrap();
        assert!(!state.is_active());

        // Membership completes the condition
        state.apply_membership(&aspects, true);
        assert!(state.is_active());
        assert_eq!(state.activations(), 1);

        // Leaving the network deactivates
        state.apply_membership(&aspects, false);
        assert!(!state.is_active());
        assert_eq!(state.deactivations(), 1);
    }

    #[test]
    fn redundant_membership_changes_fire_nothing() {
        let aspects = registry();
        let mut state = PartState::new(ACTUATOR);
        state.select_aspect(&aspects, Some(SIGNAL_LEVEL)).unwrap();

        state.apply_membership(&aspects, true);
        state.apply_membership(&aspects, true);
        state.apply_membership(&aspects, true);
        assert_eq!(state.activations(), 1);

        state.apply_membership(&aspects, false);
        state.apply_membership(&aspects, false);
        assert_eq!(state.deactivations(), 1);
    }

    #[test]
    fn activate_then_deactivate_fires_exactly_once_each() {
        let aspects = registry();
        let mut state = PartState::new(ACTUATOR);
        state.select_aspect(&aspects, Some(SIGNAL_LEVEL)).unwrap();

        state.apply_membership(&aspects, true);
        state.apply_membership(&aspects, false);

        assert_eq!(state.activations(), 1);
        assert_eq!(state.deactivations(), 1);
    }

    #[test]
    fn reselecting_same_aspect_is_a_no_op() {
        let aspects = registry();
        let mut state = PartState::new(ACTUATOR);
        state.select_aspect(&aspects, Some(SIGNAL_LEVEL)).unwrap();
        state.apply_membership(&aspects, true);

        state.select_aspect(&aspects, Some(SIGNAL_LEVEL)).unwrap();
        assert_eq!(state.activations(), 1);
        assert_eq!(state.deactivations(), 0);
    }

    #[test]
    fn switching_aspects_deactivates_then_activates() {
        let aspects = registry();
        let mut state = PartState::new(ACTUATOR);
        state.select_aspect(&aspects, Some(SIGNAL_LEVEL)).unwrap();
        state.apply_membership(&aspects, true);

        state.select_aspect(&aspects, Some(SIGNAL_ENABLE)).unwrap();
        assert!(state.is_active());
        assert_eq!(state.activations(), 2);
        assert_eq!(state.deactivations(), 1);

        // Clearing the selection deactivates
        state.select_aspect(&aspects, None).unwrap();
        assert!(!state.is_active());
        assert_eq!(state.deactivations(), 2);
    }

    #[test]
    fn selecting_read_aspects_never_activates() {
        let aspects = registry();
        let mut state = PartState::new(SENSOR);
        state.select_aspect(&aspects, Some(SIGNAL_STORED)).unwrap();
        state.apply_membership(&aspects, true);

        assert!(!state.is_active());
        assert_eq!(state.activations(), 0);
    }

    #[test]
    fn foreign_and_unknown_aspects_are_rejected() {
        let aspects = registry();
        let mut state = PartState::new(SENSOR);

        // A write aspect the sensor kind does not expose
        assert_eq!(
            state.select_aspect(&aspects, Some(SIGNAL_LEVEL)),
            Err(Error::ForeignAspect {
                part: SENSOR.id,
                aspect: SIGNAL_LEVEL,
            })
        );

        // An exposed aspect missing from the registry
        let mut actuator = PartState::new(ACTUATOR);
        assert_eq!(
            actuator.select_aspect(&AspectRegistry::new(), Some(SIGNAL_LEVEL)),
            Err(Error::UnknownAspect(SIGNAL_LEVEL))
        );
    }

    #[test]
    fn bind_checks_types_at_composition_time() {
        let aspects = registry();
        let mut variables = VariableRegistry::new();
        let mut state = PartState::new(ACTUATOR);

        let flag = variables.constant(conduit_evaluate::Value::Boolean(true));
        // Integer write aspect against a boolean variable: fails at bind,
        // never at evaluation.
        assert_eq!(
            state.bind_variable(&aspects, &variables, SIGNAL_LEVEL, flag),
            Err(Error::Bind(BindError::TypeMismatch {
                expected: ValueType::Integer,
                found: ValueType::Boolean,
            }))
        );
        assert_eq!(state.target(), None);

        let level = variables.constant(conduit_evaluate::Value::Integer(8));
        state
            .bind_variable(&aspects, &variables, SIGNAL_LEVEL, level)
            .unwrap();
        assert_eq!(state.target(), Some(level));
    }

    #[test]
    fn read_aspect_bind_mismatch_detected_before_evaluation() {
        let aspects = registry();
        let mut variables = VariableRegistry::new();
        let mut state = PartState::new(SENSOR);

        let flag = variables.constant(conduit_evaluate::Value::Boolean(false));
        assert_eq!(
            state.bind_variable(&aspects, &variables, aspects::NETWORK_SIZE, flag),
            Err(Error::Bind(BindError::TypeMismatch {
                expected: ValueType::Integer,
                found: ValueType::Boolean,
            }))
        );
    }
}
