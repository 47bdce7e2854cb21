//! Fermenter firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorHub<EspAdc>   ActuatorBank<RawGpio, LedcTone>           │
//! │  (SensorPort)        (ActuatorPort)                            │
//! │  LcdDisplay<Screen>  LogEventSink        MonotonicClock        │
//! │  (DisplayPort)       (EventSink)                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlService (pure logic)                 │    │
//! │  │  Emergency latch · Gas monitor · FSM · Display gate    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Emergency button ISR ──▶ static EmergencyLatch                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop never sleeps: every pass reads the clock once and runs one
//! control cycle.
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::Delay;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use fermenter::adapters::console_lcd::ConsoleLcd;
use fermenter::adapters::hardware::ActuatorBank;
use fermenter::adapters::log_sink::LogEventSink;
use fermenter::adapters::time::{Interval, MonotonicClock};
use fermenter::app::events::AppEvent;
use fermenter::app::ports::EventSink;
use fermenter::app::service::ControlService;
use fermenter::config::ControlConfig;
use fermenter::drivers::hw_init::{self, EspAdc, LedcTone, RawGpio};
use fermenter::drivers::lcd::{CharacterLcd, LcdDisplay};
use fermenter::drivers::pcf8574_lcd::{self, Pcf8574Lcd};
use fermenter::drivers::siren::SirenSweep;
use fermenter::emergency::EmergencyLatch;
use fermenter::error::Error;
use fermenter::pins;
use fermenter::sensors::SensorHub;

/// Written only by the emergency button ISR.
static EMERGENCY: EmergencyLatch = EmergencyLatch::with_fail_safe(hw_init::fail_safe_outputs);

// ── Screen selection ──────────────────────────────────────────

/// The I²C LCD if one answered at boot, else the serial console.
enum Screen {
    Lcd(Pcf8574Lcd<I2cDriver<'static>, Delay>),
    Console(ConsoleLcd),
}

impl CharacterLcd for Screen {
    fn clear(&mut self) -> Result<(), Error> {
        match self {
            Self::Lcd(lcd) => lcd.clear(),
            Self::Console(lcd) => lcd.clear(),
        }
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Error> {
        match self {
            Self::Lcd(lcd) => lcd.write_line(row, text),
            Self::Console(lcd) => lcd.write_line(row, text),
        }
    }
}

fn open_screen(peripherals: Peripherals) -> Screen {
    // SDA = pins::I2C_SDA_GPIO, SCL = pins::I2C_SCL_GPIO
    let config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));
    let i2c = match I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8,
        peripherals.pins.gpio9,
        &config,
    ) {
        Ok(i2c) => i2c,
        Err(e) => {
            warn!("I2C init failed ({e}), using console display");
            return Screen::Console(ConsoleLcd::new());
        }
    };

    let mut lcd = Pcf8574Lcd::new(i2c, Delay::new_default(), pcf8574_lcd::DEFAULT_ADDRESS);
    match lcd.init() {
        Ok(()) => {
            info!("LCD found at 0x{:02x}", pcf8574_lcd::DEFAULT_ADDRESS);
            Screen::Lcd(lcd)
        }
        Err(e) => {
            warn!("LCD init failed ({e}), using console display");
            Screen::Console(ConsoleLcd::new())
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Fermenter v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = ControlConfig::DEFAULT;
    config.validate()?;

    // ── 2. Peripherals and the emergency interrupt ────────────
    hw_init::init_peripherals(config.siren_min_hz)?;
    hw_init::init_emergency_isr(&EMERGENCY)?;

    let peripherals = Peripherals::take()?;
    let screen = open_screen(peripherals);

    // ── 3. Adapters ───────────────────────────────────────────
    let sensors = SensorHub::new(EspAdc, &config);
    let actuators = ActuatorBank::new(
        RawGpio::new(pins::HEATER_GPIO),
        RawGpio::new(pins::GREEN_LED_GPIO),
        RawGpio::new(pins::RED_LED_GPIO),
        SirenSweep::new(LedcTone, &config),
    );
    let display = LcdDisplay::new(screen);
    let mut log_sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    // ── 4. Controller ─────────────────────────────────────────
    let mut controller = ControlService::new(config, sensors, actuators, display, &EMERGENCY)?;
    controller.begin(clock.now_ms(), &mut log_sink);

    let mut telemetry = Interval::new(config.telemetry_interval_ms, clock.now_ms());

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now = clock.now_ms();
        controller.cycle(now, &mut log_sink);

        if telemetry.elapsed(now) {
            log_sink.emit(&AppEvent::Telemetry(controller.build_telemetry()));
        }
    }
}
