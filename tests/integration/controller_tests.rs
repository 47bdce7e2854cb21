//! End-to-end controller scenarios against mock hardware.

use fermenter::app::events::{AppEvent, SensorKind};
use fermenter::app::service::GAS_WARNING_LABEL;
use fermenter::config::ControlConfig;
use fermenter::emergency::EmergencyLatch;
use fermenter::error::SensorError;
use fermenter::fsm::OperatingState;
use fermenter::fsm::context::Indicator;
use fermenter::safety::GasLevel;

use crate::mock_hw::{ActuatorCall, Controller, RecordingSink, controller, gas_test_config};

/// Walk a fresh controller from STANDBY into MAINTAINING.
/// Leaves it at t = 1000 with the trend baseline at 25.0 °C.
fn into_maintaining(c: &mut Controller<'_>, sink: &mut RecordingSink) {
    c.cycle(100, sink);
    assert_eq!(c.state(), OperatingState::Preheating);
    c.cycle(200, sink);
    assert!(c.actuators().heater_on());

    c.sensors_mut().temperature = Ok(25.0);
    c.cycle(1_000, sink);
    assert_eq!(c.state(), OperatingState::Maintaining);
    assert!(!c.actuators().heater_on());
}

fn count(sink: &RecordingSink, pred: impl Fn(&AppEvent) -> bool) -> usize {
    sink.events.iter().filter(|e| pred(e)).count()
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn begin_enters_standby_with_heater_off() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);

    assert_eq!(c.state(), OperatingState::Standby);
    assert!(!c.actuators().heater_on());
    assert!(!c.actuators().alarm_on());
    assert_eq!(c.actuators().indicator(), Indicator::Safe);
    assert_eq!(sink.events, vec![AppEvent::Started(OperatingState::Standby)]);
    assert_eq!(c.display().last_label(), Some("STANDBY"));
}

// ── Hysteresis band ───────────────────────────────────────────

#[test]
fn setpoint_within_hysteresis_stays_in_standby() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 24.6, 100, 25.0, &mut sink);

    for t in (100..=5_000).step_by(100) {
        c.cycle(t, &mut sink);
    }

    assert_eq!(c.state(), OperatingState::Standby);
    assert!(!c.actuators().heater_on());
    assert_eq!(c.actuators().indicator(), Indicator::Safe);
}

// ── Cold start ────────────────────────────────────────────────

#[test]
fn cold_start_preheats_then_maintains() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 18.0, 100, 25.0, &mut sink);

    c.cycle(100, &mut sink);
    assert_eq!(c.state(), OperatingState::Preheating);

    c.sensors_mut().temperature = Ok(24.9);
    c.cycle(200, &mut sink);
    assert!(c.actuators().heater_on());
    assert_eq!(c.actuators().indicator(), Indicator::Danger);
    assert_eq!(c.display().last_label(), Some("PREHEATING"));

    c.sensors_mut().temperature = Ok(25.0);
    c.cycle(300, &mut sink);
    assert_eq!(c.state(), OperatingState::Maintaining);
    assert!(!c.actuators().heater_on());
    assert_eq!(c.actuators().indicator(), Indicator::Safe);

    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: OperatingState::Standby,
        to: OperatingState::Preheating,
    }));
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: OperatingState::Preheating,
        to: OperatingState::Maintaining,
    }));
}

// ── Predictive pulses ─────────────────────────────────────────

#[test]
fn falling_trend_fires_fixed_pulse() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    into_maintaining(&mut c, &mut sink);

    // -0.02 °C/s: not steep enough.
    c.sensors_mut().temperature = Ok(24.96);
    c.cycle(3_000, &mut sink);
    assert!(!c.actuators().heater_on());
    assert_eq!(c.pulse_started_ms(), None);

    // -0.08 °C/s below the setpoint: pulse.
    c.sensors_mut().temperature = Ok(24.80);
    c.cycle(5_000, &mut sink);
    assert!(c.actuators().heater_on());
    assert_eq!(c.pulse_started_ms(), Some(5_000));
    assert_eq!(c.state(), OperatingState::Maintaining);

    // Readings during the pulse do not shorten or extend it.
    c.sensors_mut().temperature = Ok(24.95);
    c.cycle(6_000, &mut sink);
    assert!(c.actuators().heater_on());
    c.sensors_mut().temperature = Ok(24.6);
    c.cycle(6_999, &mut sink);
    assert!(c.actuators().heater_on());

    c.cycle(7_000, &mut sink);
    assert!(!c.actuators().heater_on());
    assert_eq!(c.pulse_started_ms(), None);

    assert_eq!(count(&sink, |e| matches!(e, AppEvent::PulseStarted { .. })), 1);
    assert_eq!(count(&sink, |e| matches!(e, AppEvent::PulseEnded)), 1);
}

#[test]
fn no_pulse_at_or_above_setpoint() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    into_maintaining(&mut c, &mut sink);

    // Steep fall but still above the setpoint.
    c.sensors_mut().temperature = Ok(26.0);
    c.cycle(3_000, &mut sink);
    c.sensors_mut().temperature = Ok(25.5);
    c.cycle(5_000, &mut sink);
    assert!(c.build_telemetry().trend_c_per_s < -0.2);

    assert!(!c.actuators().heater_on());
    assert_eq!(c.pulse_started_ms(), None);
}

#[test]
fn large_drop_falls_back_to_preheating() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    into_maintaining(&mut c, &mut sink);

    c.sensors_mut().temperature = Ok(24.4);
    c.cycle(1_500, &mut sink);
    assert_eq!(c.state(), OperatingState::Preheating);

    c.cycle(1_600, &mut sink);
    assert!(c.actuators().heater_on());
    assert_eq!(c.actuators().indicator(), Indicator::Danger);
}

#[test]
fn pulse_and_fallback_on_same_cycle_hands_over_to_preheating() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    into_maintaining(&mut c, &mut sink);

    // 25.0 -> 24.0 over 12.5 s is -0.08 °C/s, and 24.0 is below the band.
    c.sensors_mut().temperature = Ok(24.0);
    c.cycle(13_500, &mut sink);
    assert!((c.build_telemetry().trend_c_per_s - -0.08).abs() < 1e-4);

    assert_eq!(c.state(), OperatingState::Preheating);
    assert!(c.actuators().heater_on());
    assert_eq!(c.pulse_started_ms(), None);
    assert_eq!(count(&sink, |e| matches!(e, AppEvent::PulseStarted { .. })), 0);
    assert_eq!(count(&sink, |e| matches!(e, AppEvent::PulseEnded)), 0);

    c.cycle(13_600, &mut sink);
    assert!(c.actuators().heater_on());
    assert_eq!(c.actuators().indicator(), Indicator::Danger);
}

// ── Gas interlock ─────────────────────────────────────────────

#[test]
fn low_gas_lights_danger_only() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, gas_test_config(), 25.0, 100, 25.0, &mut sink);

    c.sensors_mut().gas = Ok(650);
    c.cycle(100, &mut sink);

    assert_eq!(c.gas_level(), GasLevel::Low);
    assert_eq!(c.state(), OperatingState::Standby);
    assert_eq!(c.actuators().indicator(), Indicator::Danger);
    assert!(!c.actuators().heater_on());
    assert!(!c.actuators().alarm_on());
    assert!(!c.in_gas_emergency());
}

#[test]
fn high_gas_overrides_and_restores_prior_state() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, gas_test_config(), 20.0, 100, 25.0, &mut sink);
    into_maintaining(&mut c, &mut sink);

    c.sensors_mut().gas = Ok(650);
    c.cycle(1_100, &mut sink);
    assert_eq!(c.actuators().indicator(), Indicator::Danger);
    assert!(!c.actuators().alarm_on());

    c.sensors_mut().gas = Ok(760);
    c.cycle(1_200, &mut sink);
    assert!(c.in_gas_emergency());
    assert_eq!(c.prior_to_emergency(), OperatingState::Maintaining);
    assert!(!c.actuators().heater_on());
    assert!(c.actuators().alarm_on());
    assert_eq!(c.actuators().indicator(), Indicator::Danger);
    assert_eq!(c.display().last_label(), Some(GAS_WARNING_LABEL));

    // Temperature changes while overridden are ignored by the FSM.
    c.sensors_mut().temperature = Ok(20.0);
    c.cycle(1_300, &mut sink);
    assert_eq!(c.state(), OperatingState::Maintaining);
    assert!(!c.actuators().heater_on());

    c.sensors_mut().temperature = Ok(25.0);
    c.sensors_mut().gas = Ok(500);
    c.cycle(1_400, &mut sink);
    assert!(!c.in_gas_emergency());
    assert_eq!(c.state(), OperatingState::Maintaining);
    assert!(!c.actuators().alarm_on());
    assert_eq!(c.actuators().indicator(), Indicator::Safe);
    assert_eq!(c.display().last_label(), Some("MAINTAINING"));

    assert!(sink.events.contains(&AppEvent::GasAlarm {
        reading: Some(760),
        prior: OperatingState::Maintaining,
    }));
    assert!(sink.events.contains(&AppEvent::GasCleared {
        reading: 500,
        restored: OperatingState::Maintaining,
    }));
}

#[test]
fn gas_alarm_cancels_pulse_in_flight() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, gas_test_config(), 20.0, 100, 25.0, &mut sink);
    into_maintaining(&mut c, &mut sink);

    c.sensors_mut().temperature = Ok(24.8);
    c.cycle(3_000, &mut sink);
    assert!(c.pulse_started_ms().is_some());

    c.sensors_mut().gas = Ok(900);
    c.cycle(3_100, &mut sink);
    assert_eq!(c.pulse_started_ms(), None);
    assert!(!c.actuators().heater_on());
}

#[test]
fn gas_exactly_at_high_threshold_triggers_override() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, gas_test_config(), 20.0, 100, 25.0, &mut sink);
    c.cycle(100, &mut sink);
    assert_eq!(c.state(), OperatingState::Preheating);

    c.sensors_mut().gas = Ok(750);
    c.cycle(200, &mut sink);
    assert!(c.in_gas_emergency());
    assert_eq!(c.prior_to_emergency(), OperatingState::Preheating);
    assert!(!c.actuators().heater_on());
}

// ── Hardware emergency stop ───────────────────────────────────

#[test]
fn emergency_latch_is_terminal() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    c.cycle(100, &mut sink);
    c.cycle(200, &mut sink);
    assert!(c.actuators().heater_on());

    latch.trigger();
    c.cycle(300, &mut sink);
    assert_eq!(c.state(), OperatingState::EmergencyStop);
    assert!(!c.actuators().heater_on());
    assert!(c.actuators().alarm_on());
    assert_eq!(c.actuators().indicator(), Indicator::Danger);

    // Nothing brings it back.
    c.sensors_mut().gas = Ok(0);
    c.sensors_mut().temperature = Ok(10.0);
    for t in (400..=3_000).step_by(100) {
        c.cycle(t, &mut sink);
        assert_eq!(c.state(), OperatingState::EmergencyStop);
        assert!(!c.actuators().heater_on());
        assert!(c.actuators().alarm_on());
    }

    assert_eq!(count(&sink, |e| matches!(e, AppEvent::EmergencyStop)), 1);
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: OperatingState::Preheating,
        to: OperatingState::EmergencyStop,
    }));
    assert!(c.build_telemetry().emergency_latched);
}

#[test]
fn emergency_latch_beats_gas_override() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);

    c.sensors_mut().gas = Ok(1_000);
    latch.trigger();
    c.cycle(100, &mut sink);

    assert_eq!(c.state(), OperatingState::EmergencyStop);
    assert!(!c.in_gas_emergency(), "gas is not evaluated once latched");
    assert_eq!(count(&sink, |e| matches!(e, AppEvent::GasAlarm { .. })), 0);
    assert_eq!(c.display().emergency_draws(), 1);
}

#[test]
fn first_latched_cycle_starts_alarm_before_tick() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    c.actuators_mut().calls.clear();

    latch.trigger();
    c.cycle(100, &mut sink);

    let calls = &c.actuators().calls;
    let alarm = calls.iter().position(|a| *a == ActuatorCall::Alarm(true));
    let tick = calls.iter().position(|a| *a == ActuatorCall::Tick(100));
    assert!(alarm.is_some() && tick.is_some());
    assert!(alarm < tick);
}

#[test]
fn siren_keeps_ticking_while_latched() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    latch.trigger();

    let before = c.actuators().ticks();
    for t in 1..=10 {
        c.cycle(t * 15, &mut sink);
    }
    assert_eq!(c.actuators().ticks(), before + 10);
}

// ── Sensor faults ─────────────────────────────────────────────

#[test]
fn temperature_fault_reported_once_and_value_held() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 23.0, 100, 25.0, &mut sink);

    c.sensors_mut().temperature = Err(SensorError::AdcReadFailed);
    for t in 1..=5 {
        c.cycle(t * 100, &mut sink);
    }
    assert!((c.readings().temperature_c - 23.0).abs() < f32::EPSILON);
    assert_eq!(
        count(&sink, |e| matches!(e, AppEvent::SensorFault(SensorKind::Temperature))),
        1
    );

    // Recovery then a second failure is a fresh onset.
    c.sensors_mut().temperature = Ok(23.5);
    c.cycle(600, &mut sink);
    c.sensors_mut().temperature = Err(SensorError::OutOfRange);
    c.cycle(700, &mut sink);
    assert_eq!(
        count(&sink, |e| matches!(e, AppEvent::SensorFault(SensorKind::Temperature))),
        2
    );
}

#[test]
fn gas_fault_fails_closed_and_recovers() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    c.cycle(100, &mut sink);
    c.cycle(200, &mut sink);
    assert!(c.actuators().heater_on());

    c.sensors_mut().gas = Err(SensorError::AdcReadFailed);
    c.cycle(300, &mut sink);
    assert!(c.in_gas_emergency());
    assert!(!c.actuators().heater_on());
    assert!(sink.events.contains(&AppEvent::GasAlarm {
        reading: None,
        prior: OperatingState::Preheating,
    }));

    c.sensors_mut().gas = Ok(100);
    c.cycle(400, &mut sink);
    assert!(!c.in_gas_emergency());
    assert_eq!(c.state(), OperatingState::Preheating);
    assert!(c.actuators().heater_on());
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn steady_inputs_give_steady_outputs() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);
    into_maintaining(&mut c, &mut sink);

    let events_before = sink.events.len();
    let commands = c.commands();
    for t in (1_100..=20_000).step_by(100) {
        c.cycle(t, &mut sink);
        assert_eq!(c.commands(), commands);
        assert_eq!(c.state(), OperatingState::Maintaining);
    }
    assert_eq!(sink.events.len(), events_before);
}
