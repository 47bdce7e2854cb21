//! Operator display behaviour: redraw gating and what ends up on the rows.

use fermenter::adapters::console_lcd::ConsoleLcd;
use fermenter::app::service::{ControlService, EMERGENCY_MESSAGE};
use fermenter::config::ControlConfig;
use fermenter::drivers::lcd::{EMERGENCY_HEADER, LcdDisplay};
use fermenter::emergency::EmergencyLatch;

use crate::mock_hw::{
    DisplayCall, MockActuators, MockSensors, RecordingSink, controller, gas_test_config,
};

// ── Redraw gating ─────────────────────────────────────────────

#[test]
fn unchanged_snapshot_is_not_redrawn() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 25.0, 100, 25.0, &mut sink);
    assert_eq!(c.display().calls.len(), 1);

    for t in 1..=50 {
        c.cycle(t * 10, &mut sink);
    }
    assert_eq!(c.display().calls.len(), 1);
}

#[test]
fn any_displayed_value_change_redraws() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 25.0, 100, 25.0, &mut sink);

    c.sensors_mut().gas = Ok(101);
    c.cycle(10, &mut sink);
    c.sensors_mut().temperature = Ok(25.2);
    c.cycle(20, &mut sink);
    c.sensors_mut().setpoint = Ok(25.1);
    c.cycle(30, &mut sink);

    assert_eq!(c.display().calls.len(), 4);
    assert_eq!(
        c.display().calls.last(),
        Some(&DisplayCall::Status {
            label: "STANDBY".to_owned(),
            temperature_c: 25.2,
            setpoint_c: 25.1,
            gas_raw: 101,
        })
    );
}

#[test]
fn state_change_alone_redraws() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 20.0, 100, 25.0, &mut sink);

    c.cycle(10, &mut sink);
    c.cycle(20, &mut sink);

    assert_eq!(c.display().calls.len(), 2);
    assert_eq!(c.display().last_label(), Some("PREHEATING"));
}

#[test]
fn gas_warning_replaces_state_label() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, gas_test_config(), 25.0, 100, 25.0, &mut sink);

    c.sensors_mut().gas = Ok(800);
    c.cycle(10, &mut sink);
    c.cycle(20, &mut sink);

    assert_eq!(c.display().last_label(), Some("GAS WARNING!"));
    assert_eq!(c.display().calls.len(), 2);
}

#[test]
fn emergency_message_drawn_once() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = controller(&latch, ControlConfig::DEFAULT, 25.0, 100, 25.0, &mut sink);

    latch.trigger();
    for t in 1..=20 {
        c.sensors_mut().temperature = Ok(25.0 + t as f32);
        c.cycle(t * 10, &mut sink);
    }

    assert_eq!(c.display().emergency_draws(), 1);
    assert_eq!(
        c.display().calls.last(),
        Some(&DisplayCall::Emergency(EMERGENCY_MESSAGE.to_owned()))
    );
}

// ── Character rows ────────────────────────────────────────────

#[test]
fn console_rows_follow_controller() {
    let latch = EmergencyLatch::new();
    let mut sink = RecordingSink::default();
    let mut c = ControlService::new(
        ControlConfig::DEFAULT,
        MockSensors::new(18.0, 412, 25.0),
        MockActuators::default(),
        LcdDisplay::new(ConsoleLcd::new()),
        &latch,
    )
    .expect("valid config");

    c.begin(0, &mut sink);
    assert_eq!(c.display().lcd().row(0), "T:18.0 S:25.0");
    assert_eq!(c.display().lcd().row(1), "STANDBY    G:412");

    c.cycle(10, &mut sink);
    assert_eq!(c.display().lcd().row(1), "PREHEATIN  G:412");

    latch.trigger();
    c.cycle(20, &mut sink);
    assert_eq!(c.display().lcd().row(0), EMERGENCY_HEADER);
    assert_eq!(c.display().lcd().row(1), "HW STOP ACTIVATE");
}
