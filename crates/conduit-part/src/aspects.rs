//! Builtin aspects and part kinds.
//!
//! The builtin set exercises both aspect classes over network and signal
//! state: sensors observe the owning network, actuators apply evaluated
//! variables to their output signal.

use conduit_evaluate::{EvalContext, EvalError, Value, ValueType, VariableId};

use crate::{Aspect, AspectContext, AspectId, AspectRegistry, PartKind, PartState, Readable, Writable};

/// Integer read: number of positions in the owning network (0 without one).
pub const NETWORK_SIZE: AspectId = AspectId("network.size");
/// Boolean read: whether the position is a member of a network.
pub const NETWORK_PRESENT: AspectId = AspectId("network.present");
/// Integer read: the part's currently applied signal level.
pub const SIGNAL_STORED: AspectId = AspectId("signal.stored");
/// Integer write: apply the evaluated variable as the signal level.
pub const SIGNAL_LEVEL: AspectId = AspectId("signal.level");
/// Boolean write: apply the evaluated variable as the enabled flag.
pub const SIGNAL_ENABLE: AspectId = AspectId("signal.enable");

/// A part observing its network and signal state.
pub const SENSOR: PartKind = PartKind {
    id: "sensor",
    name: "Sensor",
    aspects: &[NETWORK_SIZE, NETWORK_PRESENT, SIGNAL_STORED],
};

/// A part applying evaluated variables to its output.
pub const ACTUATOR: PartKind = PartKind {
    id: "actuator",
    name: "Actuator",
    aspects: &[SIGNAL_LEVEL, SIGNAL_ENABLE],
};

/// Register the builtin aspect set.
pub fn register_builtins(registry: &mut AspectRegistry) {
    registry.register_read(Box::new(NetworkSize));
    registry.register_read(Box::new(NetworkPresent));
    registry.register_read(Box::new(SignalStored));
    registry.register_write(Box::new(SignalLevel));
    registry.register_write(Box::new(SignalEnable));
}

struct NetworkSize;

impl Aspect for NetworkSize {
    fn id(&self) -> AspectId {
        NETWORK_SIZE
    }

    fn value_type(&self) -> ValueType {
        ValueType::Integer
    }
}

impl Readable for NetworkSize {
    fn read(&self, _state: &PartState, ctx: &AspectContext<'_>) -> Result<Value, EvalError> {
        let size = ctx.network.map_or(0, |n| n.position_count());
        Ok(Value::Integer(size as i64))
    }
}

struct NetworkPresent;

impl Aspect for NetworkPresent {
    fn id(&self) -> AspectId {
        NETWORK_PRESENT
    }

    fn value_type(&self) -> ValueType {
        ValueType::Boolean
    }
}

impl Readable for NetworkPresent {
    fn read(&self, _state: &PartState, ctx: &AspectContext<'_>) -> Result<Value, EvalError> {
        Ok(Value::Boolean(ctx.network.is_some()))
    }
}

struct SignalStored;

impl Aspect for SignalStored {
    fn id(&self) -> AspectId {
        SIGNAL_STORED
    }

    fn value_type(&self) -> ValueType {
        ValueType::Integer
    }
}

impl Readable for SignalStored {
    fn read(&self, state: &PartState, _ctx: &AspectContext<'_>) -> Result<Value, EvalError> {
        Ok(Value::Integer(state.signal()))
    }
}

struct SignalLevel;

impl Aspect for SignalLevel {
    fn id(&self) -> AspectId {
        SIGNAL_LEVEL
    }

    fn value_type(&self) -> ValueType {
        ValueType::Integer
    }
}

impl Writable for SignalLevel {
    fn write(
        &self,
        state: &mut PartState,
        ctx: &mut EvalContext<'_>,
        variable: VariableId,
    ) -> Result<(), EvalError> {
        let value = ctx.evaluate(variable)?;
        // Bind-time checking makes a non-integer here unreachable
        let level = value
            .as_integer()
            .ok_or_else(|| EvalError::Failure(format!("{SIGNAL_LEVEL} applied to {value}")))?;
        state.set_signal(level);
        state.record_success(value);
        Ok(())
    }

    fn on_activate(&self, state: &mut PartState) {
        state.set_signal(0);
    }

    fn on_deactivate(&self, state: &mut PartState) {
        state.set_signal(0);
    }
}

struct SignalEnable;

impl Aspect for SignalEnable {
    fn id(&self) -> AspectId {
        SIGNAL_ENABLE
    }

    fn value_type(&self) -> ValueType {
        ValueType::Boolean
    }
}

impl Writable for SignalEnable {
    fn write(
        &self,
        state: &mut PartState,
        ctx: &mut EvalContext<'_>,
        variable: VariableId,
    ) -> Result<(), EvalError> {
        let value = ctx.evaluate(variable)?;
        let enabled = value
            .as_boolean()
            .ok_or_else(|| EvalError::Failure(format!("{SIGNAL_ENABLE} applied to {value}")))?;
        state.set_enabled(enabled);
        state.record_success(value);
        Ok(())
    }

    fn on_activate(&self, _state: &mut PartState) {}

    fn on_deactivate(&self, state: &mut PartState) {
        state.set_enabled(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_evaluate::VariableRegistry;
    use conduit_topology::{Pos, Side};

    struct FixedView {
        positions: usize,
        elements: usize,
    }

    impl crate::NetworkView for FixedView {
        fn position_count(&self) -> usize {
            self.positions
        }

        fn element_count(&self) -> usize {
            self.elements
        }
    }

    fn ctx_with<'a>(network: Option<&'a dyn crate::NetworkView>) -> AspectContext<'a> {
        AspectContext {
            pos: Pos::ORIGIN,
            side: Side::Up,
            network,
        }
    }

    #[test]
    fn network_reads_reflect_membership() {
        let registry = AspectRegistry::with_builtins();
        let state = PartState::new(SENSOR);
        let view = FixedView {
            positions: 3,
            elements: 2,
        };

        let size = registry.read(NETWORK_SIZE).unwrap();
        assert_eq!(
            size.read(&state, &ctx_with(Some(&view))),
            Ok(Value::Integer(3))
        );
        assert_eq!(size.read(&state, &ctx_with(None)), Ok(Value::Integer(0)));

        let present = registry.read(NETWORK_PRESENT).unwrap();
        assert_eq!(
            present.read(&state, &ctx_with(Some(&view))),
            Ok(Value::Boolean(true))
        );
        assert_eq!(
            present.read(&state, &ctx_with(None)),
            Ok(Value::Boolean(false))
        );
    }

    #[test]
    fn signal_write_applies_evaluated_value() {
        let registry = AspectRegistry::with_builtins();
        let mut variables = VariableRegistry::new();
        let mut state = PartState::new(ACTUATOR);
        let level = variables.constant(Value::Integer(12));

        let aspect = registry.write(SIGNAL_LEVEL).unwrap();
        let mut ctx = conduit_evaluate::EvalContext::new(&variables);
        aspect.write(&mut state, &mut ctx, level).unwrap();

        assert_eq!(state.signal(), 12);
        assert_eq!(state.last_value(), Some(&Value::Integer(12)));
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn write_failures_propagate_untouched() {
        let registry = AspectRegistry::with_builtins();
        let mut variables = VariableRegistry::new();
        let mut state = PartState::new(ACTUATOR);

        let n = variables.constant(Value::Integer(1));
        let zero = variables.constant(Value::Integer(0));
        let broken = variables
            .operation(conduit_evaluate::Op::Div, vec![n, zero])
            .unwrap();

        let aspect = registry.write(SIGNAL_LEVEL).unwrap();
        let mut ctx = conduit_evaluate::EvalContext::new(&variables);
        let err = aspect.write(&mut state, &mut ctx, broken).unwrap_err();

        // The originating failure, not a wrapped one
        assert_eq!(err, EvalError::DivisionByZero);
        assert_eq!(state.last_value(), None);
    }

    #[test]
    fn deactivate_hooks_reset_outputs() {
        let registry = AspectRegistry::with_builtins();
        let mut state = PartState::new(ACTUATOR);

        state.set_signal(9);
        registry.write(SIGNAL_LEVEL).unwrap().on_deactivate(&mut state);
        assert_eq!(state.signal(), 0);

        state.set_enabled(true);
        registry.write(SIGNAL_ENABLE).unwrap().on_deactivate(&mut state);
        assert!(!state.is_enabled());
    }

    #[test]
    fn element_count_view_is_exposed() {
        let view = FixedView {
            positions: 1,
            elements: 4,
        };
        assert_eq!(crate::NetworkView::element_count(&view), 4);
    }
}
