//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures ADC channels, GPIO directions, the piezo LEDC channel and the
//! emergency-button interrupt using raw ESP-IDF sys calls.  Called once
//! from `main()` before the control loop starts.  The small wrappers at
//! the bottom adapt the raw calls to the `embedded-hal` and port traits
//! the adapters are generic over.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(feature = "espidf")]
use log::info;

#[cfg(feature = "espidf")]
use crate::emergency::EmergencyLatch;
#[cfg(feature = "espidf")]
use crate::error::{ActuatorError, SensorError};
#[cfg(feature = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={rc})"),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={rc})"),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(feature = "espidf")]
pub fn init_peripherals(siren_start_hz: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
        init_emergency_input()?;
        init_ledc(siren_start_hz)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(feature = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(feature = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(feature = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [
        pins::TEMP_ADC_CHANNEL,
        pins::GAS_ADC_CHANNEL,
        pins::SETPOINT_ADC_CHANNEL,
    ] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=temp, CH{}=gas, CH{}=setpoint)",
        pins::TEMP_ADC_CHANNEL,
        pins::GAS_ADC_CHANNEL,
        pins::SETPOINT_ADC_CHANNEL
    );
    Ok(())
}

#[cfg(feature = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::HEATER_GPIO, pins::GREEN_LED_GPIO, pins::RED_LED_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (heater, green, red)");
    Ok(())
}

#[cfg(feature = "espidf")]
unsafe fn init_emergency_input() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::EMERGENCY_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(feature = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioWriteFailed);
    }
    Ok(())
}

// ── LEDC (piezo) ──────────────────────────────────────────────

#[cfg(feature = "espidf")]
const PIEZO_TIMER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_0;
#[cfg(feature = "espidf")]
const PIEZO_CHANNEL: ledc_channel_t = ledc_channel_t_LEDC_CHANNEL_0;
#[cfg(feature = "espidf")]
const PIEZO_HALF_DUTY: u32 = 1 << (pins::PIEZO_DUTY_BITS - 1);

#[cfg(feature = "espidf")]
unsafe fn init_ledc(start_hz: u32) -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: PIEZO_TIMER,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
        freq_hz: start_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: Called from single main-task context via init_peripherals().
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: PIEZO_CHANNEL,
            timer_sel: PIEZO_TIMER,
            gpio_num: pins::PIEZO_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!("hw_init: LEDC configured (piezo=CH0 @ {start_hz} Hz, silent)");
    Ok(())
}

#[cfg(feature = "espidf")]
fn piezo_duty(duty: u32) -> Result<(), ActuatorError> {
    // SAFETY: the channel was configured in init_ledc(); the LEDC driver
    // guards its registers with a critical section.
    let ret = unsafe {
        let r = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, PIEZO_CHANNEL, duty);
        if r == ESP_OK as i32 {
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, PIEZO_CHANNEL)
        } else {
            r
        }
    };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::ToneWriteFailed);
    }
    Ok(())
}

// ── Emergency fail-safe and ISR ───────────────────────────────

/// Drive the pins to the fail-safe posture: heater off, red on, green off.
/// GPIO level writes only; safe in interrupt context.  The siren is left
/// to the first control cycle that observes the latch.
#[cfg(feature = "espidf")]
pub fn fail_safe_outputs() {
    // SAFETY: plain register writes on pins configured at boot.
    unsafe {
        gpio_set_level(pins::HEATER_GPIO, 0);
        gpio_set_level(pins::RED_LED_GPIO, 1);
        gpio_set_level(pins::GREEN_LED_GPIO, 0);
    }
}

#[cfg(feature = "espidf")]
unsafe extern "C" fn emergency_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static EmergencyLatch` registered in
    // init_emergency_isr(); it outlives every interrupt.
    let latch = unsafe { &*(arg as *const EmergencyLatch) };
    latch.trigger();
}

/// Install the GPIO ISR service and route the emergency button's falling
/// edge to `latch.trigger()`.
#[cfg(feature = "espidf")]
pub fn init_emergency_isr(latch: &'static EmergencyLatch) -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handler only touches the atomic
    // latch and output registers.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let arg = core::ptr::from_ref(latch).cast_mut().cast::<core::ffi::c_void>();
        let ret = gpio_isr_handler_add(pins::EMERGENCY_BUTTON_GPIO, Some(emergency_gpio_isr), arg);
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::EMERGENCY_BUTTON_GPIO);

        // A button already held at boot latches immediately.
        if gpio_get_level(pins::EMERGENCY_BUTTON_GPIO) == 0 {
            latch.trigger();
        }
    }
    info!("hw_init: emergency ISR installed on GPIO{}", pins::EMERGENCY_BUTTON_GPIO);
    Ok(())
}

// ── Trait wrappers ────────────────────────────────────────────

/// A configured output pin, written through `gpio_set_level`.
#[cfg(feature = "espidf")]
pub struct RawGpio {
    pin: i32,
}

#[cfg(feature = "espidf")]
impl RawGpio {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

#[cfg(feature = "espidf")]
#[derive(Debug)]
pub struct GpioWriteError;

#[cfg(feature = "espidf")]
impl embedded_hal::digital::Error for GpioWriteError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[cfg(feature = "espidf")]
impl embedded_hal::digital::ErrorType for RawGpio {
    type Error = GpioWriteError;
}

#[cfg(feature = "espidf")]
impl embedded_hal::digital::OutputPin for RawGpio {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, false).map_err(|_| GpioWriteError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, true).map_err(|_| GpioWriteError)
    }
}

/// Piezo square wave on the LEDC channel.
#[cfg(feature = "espidf")]
pub struct LedcTone;

#[cfg(feature = "espidf")]
impl crate::drivers::siren::ToneOutput for LedcTone {
    fn tone(&mut self, freq_hz: u32) -> Result<(), ActuatorError> {
        // SAFETY: timer configured in init_ledc(); main-loop only.
        let ret = unsafe { ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, PIEZO_TIMER, freq_hz) };
        if ret != ESP_OK as i32 {
            return Err(ActuatorError::ToneWriteFailed);
        }
        piezo_duty(PIEZO_HALF_DUTY)
    }

    fn silence(&mut self) -> Result<(), ActuatorError> {
        piezo_duty(0)
    }
}

/// ADC1 oneshot reader for the three analog inputs.
#[cfg(feature = "espidf")]
pub struct EspAdc;

#[cfg(feature = "espidf")]
impl crate::sensors::AnalogReader for EspAdc {
    fn read_raw(&mut self, channel: crate::sensors::AnalogChannel) -> Result<u16, SensorError> {
        use crate::sensors::AnalogChannel;
        let ch = match channel {
            AnalogChannel::Temperature => pins::TEMP_ADC_CHANNEL,
            AnalogChannel::Gas => pins::GAS_ADC_CHANNEL,
            AnalogChannel::Setpoint => pins::SETPOINT_ADC_CHANNEL,
        };
        adc1_read(ch)
    }

    fn read_millivolts(&mut self, channel: crate::sensors::AnalogChannel) -> Result<u16, SensorError> {
        let raw = u32::from(self.read_raw(channel)?);
        Ok((raw * pins::ADC_FULL_SCALE_MV / u32::from(crate::sensors::gas::ADC_MAX_RAW)) as u16)
    }
}
