//! pmod-24io-demo
//!
//! LED demo for a TCA6424A 24-I/O PMOD board on the Raspberry Pi Pico 2.
//! Resets the expander, switches all 24 pins to outputs and then plays the
//! demo pattern program forever.
//!
//! A failed cycle is logged; the expander is reconfigured and the program
//! starts again after a short pause.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use tca6424a::{ExpanderConfig, PatternEngine, ResetLine, Tca6424a, DEMO_PROGRAM};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Pause before retrying after a failed cycle.
const RETRY_DELAY: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("pmod-24io-demo starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA → GP20  (p.PIN_20)
    // I2C_SCL → GP21  (p.PIN_21)
    // RESET   → GP18  (p.PIN_18)  active-low
    // ———————————————————————————————————————————————————————————————————————

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    // Single board at 0x22. Use ExpanderConfig::stacked() for a second
    // board strapped to 0x23.
    let config = ExpanderConfig::default();

    let mut reset = ResetLine::new(Output::new(p.PIN_18, Level::Low));
    let mut delay = Delay;
    if reset.pulse(&mut delay, &config).await.is_err() {
        warn!("Reset line could not be driven");
    }

    let expander = Tca6424a::new(i2c, &config);
    let mut engine = PatternEngine::new(expander, delay);

    match engine.expander_mut().probe().await {
        Ok(()) => info!("TCA6424A found at {=[u8]:#x}", engine.expander().addresses()),
        Err(e) => error!("Expander probe failed: {}", e),
    }

    loop {
        let result = match engine.expander_mut().configure_all_outputs().await {
            Ok(()) => engine.run_program(DEMO_PROGRAM).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!("Demo cycle failed: {}", e);
            Timer::after(RETRY_DELAY).await;
        }
    }
}
