//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns the FSM, the gas monitor, the shared context and
//! the three hardware ports.  One call to [`ControlService::cycle`] is one
//! pass of the control loop; it never blocks.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │      ControlService      │
//! ActuatorPort ◀──│  Latch · Gas · FSM       │──▶ DisplayPort
//!                 └──────────────────────────┘
//! ```
//!
//! Precedence each cycle: emergency latch, then gas override, then the
//! handler for the current operating state.

use log::{debug, error, info, warn};

use crate::config::ControlConfig;
use crate::display::{DisplayGate, Frame};
use crate::emergency::EmergencyLatch;
use crate::error::{Result, SensorError};
use crate::fsm::context::{ActuatorCommands, ControllerContext, Indicator, SensorSnapshot};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, OperatingState};
use crate::safety::{GasEdge, GasLevel, GasMonitor};

use super::events::{AppEvent, SensorKind, TelemetryData};
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};

/// Status label shown while the gas override is in force.
pub const GAS_WARNING_LABEL: &str = "GAS WARNING!";

/// Second line of the emergency screen.
pub const EMERGENCY_MESSAGE: &str = "HW STOP ACTIVATED";

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService<'l, S, A, D> {
    fsm: Fsm,
    ctx: ControllerContext,
    gas: GasMonitor,
    gate: DisplayGate,
    latch: &'l EmergencyLatch,
    sensors: S,
    actuators: A,
    display: D,
    /// Bitmask of sensors whose last read failed (see [`SensorKind`]).
    sensor_faults: u8,
    emergency_reported: bool,
    cycle_count: u64,
}

impl<'l, S, A, D> ControlService<'l, S, A, D>
where
    S: SensorPort,
    A: ActuatorPort,
    D: DisplayPort,
{
    /// Construct the service around its ports.
    ///
    /// Does **not** read anything or touch outputs; call [`begin`](Self::begin) next.
    pub fn new(
        config: ControlConfig,
        sensors: S,
        actuators: A,
        display: D,
        latch: &'l EmergencyLatch,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            fsm: Fsm::new(build_state_table(), OperatingState::Standby),
            gas: GasMonitor::new(&config),
            ctx: ControllerContext::new(config),
            gate: DisplayGate::new(),
            latch,
            sensors,
            actuators,
            display,
            sensor_faults: 0,
            emergency_reported: false,
            cycle_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Read the initial sensors, enter STANDBY and draw the first frame.
    pub fn begin(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.ctx.now_ms = now_ms;
        self.ctx.commands = ActuatorCommands::default();
        self.ctx.pulse.cancel();
        self.ctx.prior_to_emergency = OperatingState::Standby;
        self.gas.reset();
        self.gate.invalidate();
        self.sensor_faults = 0;
        self.emergency_reported = false;
        self.cycle_count = 0;

        let gas_reading = self.read_inputs(sink);
        self.ctx.reset_trend_baseline();

        self.fsm = Fsm::new(build_state_table(), OperatingState::Standby);
        self.fsm.start(&mut self.ctx);

        self.apply_actuators();
        let frame = self.status_frame(OperatingState::Standby.label());
        self.gate.render(frame, &mut self.display);

        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "ControlService started in {}: T={:.1} setpoint={:.1} gas={:?}",
            self.fsm.current_state(),
            self.ctx.sensors.temperature_c,
            self.ctx.sensors.setpoint_c,
            gas_reading
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle: latch → gas → FSM → actuators → display.
    pub fn cycle(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.cycle_count += 1;
        self.ctx.now_ms = now_ms;
        let prev_state = self.fsm.current_state();

        // 1. Hardware emergency wins over everything.
        if self.latch.is_active() {
            self.run_emergency(sink);
            self.emit_state_change(prev_state, sink);
            return;
        }

        // 2. Inputs and gas classification
        let gas_reading = self.read_inputs(sink);
        match self.gas.evaluate(gas_reading) {
            GasEdge::Entered => {
                self.ctx.prior_to_emergency = prev_state;
                self.ctx.pulse.cancel();
                sink.emit(&AppEvent::GasAlarm {
                    reading: gas_reading,
                    prior: prev_state,
                });
            }
            GasEdge::Cleared => {
                let restored = self.ctx.prior_to_emergency;
                self.fsm.restore(restored);
                sink.emit(&AppEvent::GasCleared {
                    reading: self.ctx.sensors.gas_raw,
                    restored,
                });
            }
            GasEdge::None => {}
        }

        // 3. Override or dispatch
        let label = if self.gas.in_emergency() {
            self.ctx.commands.heater = false;
            self.ctx.commands.indicator = Indicator::Danger;
            self.ctx.commands.alarm = true;
            GAS_WARNING_LABEL
        } else {
            self.ctx.commands.alarm = false;
            self.dispatch(sink);
            if self.gas.level() == GasLevel::Low {
                self.ctx.commands.indicator = Indicator::Danger;
            }
            self.fsm.current_state().label()
        };

        // 4. Outputs
        self.apply_actuators();
        self.emit_state_change(prev_state, sink);

        // 5. Display
        let frame = self.status_frame(label);
        self.gate.render(frame, &mut self.display);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            uptime_ms: self.ctx.now_ms,
            state: self.fsm.current_state(),
            temperature_c: self.ctx.sensors.temperature_c,
            setpoint_c: self.ctx.sensors.setpoint_c,
            gas_raw: self.ctx.sensors.gas_raw,
            gas_level: self.gas.level(),
            heater: self.ctx.commands.heater,
            indicator: self.ctx.commands.indicator,
            alarm: self.ctx.commands.alarm,
            trend_c_per_s: self.ctx.trend.value(),
            pulse_active: self.ctx.pulse.is_active(),
            emergency_latched: self.latch.is_active(),
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> OperatingState {
        self.fsm.current_state()
    }

    /// State that will be restored when the gas emergency clears.
    pub fn prior_to_emergency(&self) -> OperatingState {
        self.ctx.prior_to_emergency
    }

    pub fn in_gas_emergency(&self) -> bool {
        self.gas.in_emergency()
    }

    pub fn gas_level(&self) -> GasLevel {
        self.gas.level()
    }

    /// Commands applied on the last cycle.
    pub fn commands(&self) -> ActuatorCommands {
        self.ctx.commands
    }

    /// Inputs used on the last cycle (after fail-closed substitution).
    pub fn readings(&self) -> SensorSnapshot {
        self.ctx.sensors
    }

    pub fn pulse_started_ms(&self) -> Option<u64> {
        self.ctx.pulse.started_ms()
    }

    pub fn config(&self) -> &ControlConfig {
        &self.ctx.config
    }

    /// Cycles executed since [`begin`](Self::begin).
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_emergency(&mut self, sink: &mut impl EventSink) {
        if self.fsm.current_state() != OperatingState::EmergencyStop {
            error!(
                "Emergency latch observed in {} (triggers={})",
                self.fsm.current_state(),
                self.latch.trigger_count()
            );
            self.fsm
                .force_transition(OperatingState::EmergencyStop, &mut self.ctx);
        }
        if !self.emergency_reported {
            self.emergency_reported = true;
            sink.emit(&AppEvent::EmergencyStop);
        }

        self.fsm.tick(&mut self.ctx);
        self.apply_actuators();
        self.gate.render(Frame::Emergency(EMERGENCY_MESSAGE), &mut self.display);
    }

    /// Run the current state's handler and report pulse edges.
    fn dispatch(&mut self, sink: &mut impl EventSink) {
        let pulse_before = self.ctx.pulse.is_active();
        self.fsm.tick(&mut self.ctx);
        let pulse_after = self.ctx.pulse.is_active();

        if !pulse_before && pulse_after {
            sink.emit(&AppEvent::PulseStarted {
                trend_c_per_s: self.ctx.trend.value(),
            });
        } else if pulse_before && !pulse_after {
            sink.emit(&AppEvent::PulseEnded);
        }
    }

    /// Read every input, holding the last good value on failure.
    /// Returns the gas reading, or `None` if the gas sensor failed.
    fn read_inputs(&mut self, sink: &mut impl EventSink) -> Option<u16> {
        match self.sensors.temperature() {
            Ok(t) => {
                self.ctx.sensors.temperature_c = t;
                self.clear_sensor_fault(SensorKind::Temperature);
            }
            Err(e) => self.sensor_fault(SensorKind::Temperature, e, sink),
        }

        match self.sensors.setpoint() {
            Ok(sp) => {
                self.ctx.sensors.setpoint_c = sp;
                self.clear_sensor_fault(SensorKind::Setpoint);
            }
            Err(e) => self.sensor_fault(SensorKind::Setpoint, e, sink),
        }

        match self.sensors.gas_level() {
            Ok(raw) => {
                self.ctx.sensors.gas_raw = raw;
                self.clear_sensor_fault(SensorKind::Gas);
                Some(raw)
            }
            Err(e) => {
                self.sensor_fault(SensorKind::Gas, e, sink);
                None
            }
        }
    }

    fn sensor_fault(&mut self, kind: SensorKind, err: SensorError, sink: &mut impl EventSink) {
        let mask = sensor_mask(kind);
        if self.sensor_faults & mask == 0 {
            warn!("SENSOR FAULT SET: {kind:?} ({err}), failing closed");
            sink.emit(&AppEvent::SensorFault(kind));
        }
        self.sensor_faults |= mask;
    }

    fn clear_sensor_fault(&mut self, kind: SensorKind) {
        let mask = sensor_mask(kind);
        if self.sensor_faults & mask != 0 {
            info!("SENSOR FAULT CLEARED: {kind:?}");
        }
        self.sensor_faults &= !mask;
    }

    /// Translate the cycle's commands into port calls.
    fn apply_actuators(&mut self) {
        let cmds = self.ctx.commands;
        self.actuators.set_heater(cmds.heater);
        self.actuators.set_indicator(cmds.indicator);
        self.actuators.set_alarm(cmds.alarm);
        self.actuators.tick(self.ctx.now_ms);
    }

    fn status_frame(&self, label: &'static str) -> Frame {
        Frame::Status {
            label,
            temperature_c: self.ctx.sensors.temperature_c,
            setpoint_c: self.ctx.sensors.setpoint_c,
            gas_raw: self.ctx.sensors.gas_raw,
        }
    }

    fn emit_state_change(&self, prev: OperatingState, sink: &mut impl EventSink) {
        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::StateChanged { from: prev, to: now });
        } else {
            debug!("cycle {}: {} heater={}", self.cycle_count, now, self.ctx.commands.heater);
        }
    }
}

fn sensor_mask(kind: SensorKind) -> u8 {
    match kind {
        SensorKind::Temperature => 1 << 0,
        SensorKind::Gas => 1 << 1,
        SensorKind::Setpoint => 1 << 2,
    }
}
