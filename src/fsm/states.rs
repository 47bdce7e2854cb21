//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  STANDBY ──[setpoint > T + hyst]──▶ PREHEATING
//!     ▲                                   │
//!     │                            [T >= setpoint]
//!     │                                   ▼
//!     │        PREHEATING ◀──[T < setpoint - hyst]── MAINTAINING
//!     │                                               (trend pulses)
//!
//!  Any state ──[emergency latch]──▶ EMERGENCY STOP  (terminal)
//! ```
//!
//! MAINTAINING never returns to STANDBY on its own; only a reboot does.

use super::context::{ActuatorCommands, ControllerContext, Indicator};
use super::{OperatingState, StateDescriptor};
use log::{debug, error, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; OperatingState::COUNT] {
    [
        // Index 0: Standby
        StateDescriptor {
            id: OperatingState::Standby,
            on_enter: Some(standby_enter),
            on_exit: None,
            on_update: standby_update,
        },
        // Index 1: Preheating
        StateDescriptor {
            id: OperatingState::Preheating,
            on_enter: Some(preheating_enter),
            on_exit: None,
            on_update: preheating_update,
        },
        // Index 2: Maintaining
        StateDescriptor {
            id: OperatingState::Maintaining,
            on_enter: Some(maintaining_enter),
            on_exit: Some(maintaining_exit),
            on_update: maintaining_update,
        },
        // Index 3: EmergencyStop
        StateDescriptor {
            id: OperatingState::EmergencyStop,
            on_enter: Some(emergency_enter),
            on_exit: None,
            on_update: emergency_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  STANDBY: heater off, waiting for a setpoint above the band
// ═══════════════════════════════════════════════════════════════════════════

fn standby_enter(ctx: &mut ControllerContext) {
    ctx.commands.heater = false;
    ctx.commands.indicator = Indicator::Safe;
    info!(
        "STANDBY: T={:.1} setpoint={:.1}",
        ctx.sensors.temperature_c, ctx.sensors.setpoint_c
    );
}

fn standby_update(ctx: &mut ControllerContext) -> Option<OperatingState> {
    ctx.commands.heater = false;
    ctx.commands.indicator = Indicator::Safe;

    if ctx.sensors.setpoint_c > ctx.sensors.temperature_c + ctx.config.hysteresis_c {
        info!(
            "STANDBY: setpoint {:.1} above T {:.1} + {:.1} → preheating",
            ctx.sensors.setpoint_c, ctx.sensors.temperature_c, ctx.config.hysteresis_c
        );
        return Some(OperatingState::Preheating);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PREHEATING: heater on until the setpoint is reached
// ═══════════════════════════════════════════════════════════════════════════

fn preheating_enter(ctx: &mut ControllerContext) {
    info!(
        "PREHEATING: heating from {:.1} to {:.1}",
        ctx.sensors.temperature_c, ctx.sensors.setpoint_c
    );
}

fn preheating_update(ctx: &mut ControllerContext) -> Option<OperatingState> {
    ctx.commands.heater = true;
    ctx.commands.indicator = Indicator::Danger;

    if ctx.sensors.temperature_c >= ctx.sensors.setpoint_c {
        return Some(OperatingState::Maintaining);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  MAINTAINING: predictive pulses hold the setpoint
// ═══════════════════════════════════════════════════════════════════════════

fn maintaining_enter(ctx: &mut ControllerContext) {
    ctx.commands.heater = false;
    ctx.commands.indicator = Indicator::Safe;
    ctx.pulse.cancel();
    ctx.reset_trend_baseline();
    info!(
        "MAINTAINING: setpoint {:.1} reached, trend baseline reset",
        ctx.sensors.setpoint_c
    );
}

fn maintaining_exit(ctx: &mut ControllerContext) {
    ctx.pulse.cancel();
}

fn maintaining_update(ctx: &mut ControllerContext) -> Option<OperatingState> {
    let now = ctx.now_ms;
    let temp = ctx.sensors.temperature_c;

    if ctx.pulse.is_active() {
        if ctx.pulse.expire(now) {
            ctx.commands.heater = false;
            debug!("MAINTAINING: pulse ended");
        } else {
            ctx.commands.heater = true;
        }
    } else {
        ctx.commands.heater = false;
        if let Some(trend) = ctx.trend.sample(now, temp) {
            if trend < ctx.config.trend_threshold_c_per_s && temp < ctx.sensors.setpoint_c {
                ctx.commands.heater = true;
                ctx.pulse.start(now);
                info!("MAINTAINING: trend {trend:.3} °C/s, heat pulse started");
            }
        }
    }

    ctx.commands.indicator = Indicator::Safe;

    // Fallback: the pulses could not keep up.
    if temp < ctx.sensors.setpoint_c - ctx.config.hysteresis_c {
        info!(
            "MAINTAINING: T {:.1} below band (setpoint {:.1}) → preheating",
            temp, ctx.sensors.setpoint_c
        );
        return Some(OperatingState::Preheating);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  EMERGENCY STOP: terminal, outputs held in the fail-safe posture
// ═══════════════════════════════════════════════════════════════════════════

fn emergency_enter(ctx: &mut ControllerContext) {
    ctx.commands = ActuatorCommands::fail_safe();
    ctx.pulse.cancel();
    error!("EMERGENCY STOP: heater disabled, reboot required");
}

fn emergency_update(ctx: &mut ControllerContext) -> Option<OperatingState> {
    ctx.commands = ActuatorCommands::fail_safe();
    None
}
