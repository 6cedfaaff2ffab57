//! LED animation patterns.
//!
//! A pattern is a short, deterministic sequence of port writes separated by
//! delays. [`PatternState`] produces the sequence as [`Step`]s without
//! touching the bus; [`PatternEngine`] drains it against a [`Tca6424a`] and
//! a delay provider.
//!
//! In [`Mode::Lighting`] every frame is inverted before it is written, so a
//! set bit in the frame pulls its pin low. [`Mode::Clearing`] writes frames
//! unchanged.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::error::ExpanderError;
use crate::expander::Tca6424a;
use crate::pins::Level;
use crate::registers::{Port, PORT_COUNT};

// ── Mode ─────────────────────────────────────────────────────────────────

/// How frames map onto pin levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Frames are inverted; pins rest high.
    Lighting,
    /// Frames are written as-is; pins rest low.
    Clearing,
}

impl Mode {
    /// Port byte a pattern restores when it ends.
    pub const fn resting(self) -> u8 {
        match self {
            Mode::Lighting => 0xFF,
            Mode::Clearing => 0x00,
        }
    }

    /// Byte written for frame `frame`.
    pub const fn show(self, frame: u8) -> u8 {
        match self {
            Mode::Lighting => !frame,
            Mode::Clearing => frame,
        }
    }

    /// Opposite mapping of [`show`](Self::show), used by the decrementing fill.
    pub const fn show_reversed(self, frame: u8) -> u8 {
        match self {
            Mode::Lighting => frame,
            Mode::Clearing => !frame,
        }
    }
}

// ── Pattern ──────────────────────────────────────────────────────────────

/// The available animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern {
    /// One pin walks across all 24 pins, port by port.
    Move1,
    /// One pin walks through each port, all three ports in step.
    Move1In8,
    /// Two pins four apart walk through each port, all ports in step.
    Move1In4,
    /// Pins fill up one at a time until the whole port is set.
    Incr1In8,
    /// Fill running from the opposite resting level.
    Decr1In8,
    /// `0xAA` then `0x55` on every port.
    Alternate,
}

impl Pattern {
    /// Frames shown per group (per port for [`Pattern::Move1`]).
    const fn frames(self) -> u8 {
        match self {
            Pattern::Move1In4 => 4,
            Pattern::Alternate => 2,
            _ => 8,
        }
    }
}

/// One action of a running pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Write the byte to all three ports, one port at a time.
    Fill(u8),
    /// Write the byte to one port.
    Port(Port, u8),
    /// Wait for the frame delay.
    Delay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Frame,
    Pause,
    RestorePort,
    Finish,
    Done,
}

// ── PatternState ─────────────────────────────────────────────────────────

/// Sequencer for one run of a pattern.
///
/// Yields the [`Step`]s of the pattern in order and then `None`. The state
/// lives only for a single run.
///
/// # Example
///
/// ```
/// use tca6424a::{Mode, Pattern, PatternState, Step};
///
/// let mut steps = PatternState::new(Pattern::Alternate, Mode::Lighting);
/// assert_eq!(steps.next(), Some(Step::Fill(0xAA)));
/// assert_eq!(steps.next(), Some(Step::Delay));
/// assert_eq!(steps.next(), Some(Step::Fill(0x55)));
/// ```
#[derive(Debug, Clone)]
pub struct PatternState {
    pattern: Pattern,
    mode: Mode,
    stage: Stage,
    step: u8,
    port: u8,
    accumulator: u8,
}

impl PatternState {
    /// Start a run of `pattern` in `mode`. Nothing is produced until
    /// [`next`](Iterator::next) is called.
    pub fn new(pattern: Pattern, mode: Mode) -> Self {
        let stage = match pattern {
            Pattern::Alternate => Stage::Frame,
            _ => Stage::Start,
        };

        Self {
            pattern,
            mode,
            stage,
            step: 0,
            port: 0,
            accumulator: 0,
        }
    }

    /// Current frame before mode mapping.
    pub fn accumulator(&self) -> u8 {
        self.accumulator
    }

    /// Index of the current frame within its group.
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Port the walking pin is on ([`Pattern::Move1`] only).
    pub fn port(&self) -> u8 {
        self.port
    }

    /// Pattern being sequenced.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Frame mapping in use.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn frame(&mut self) -> Step {
        let bit = 1u8 << self.step;
        let mode = self.mode;

        match self.pattern {
            Pattern::Move1 => {
                self.accumulator = bit;
                // port < PORT_COUNT while frames are produced
                let port = Port::ALL[self.port as usize % PORT_COUNT];
                Step::Port(port, mode.show(self.accumulator))
            }
            Pattern::Move1In8 => {
                self.accumulator = bit;
                Step::Fill(mode.show(self.accumulator))
            }
            Pattern::Move1In4 => {
                self.accumulator = 0x11 << self.step;
                Step::Fill(mode.show(self.accumulator))
            }
            Pattern::Incr1In8 => {
                self.accumulator |= bit;
                Step::Fill(mode.show(self.accumulator))
            }
            Pattern::Decr1In8 => {
                self.accumulator |= bit;
                Step::Fill(mode.show_reversed(self.accumulator))
            }
            Pattern::Alternate => {
                self.accumulator = if self.step == 0 { 0xAA } else { 0x55 };
                Step::Fill(self.accumulator)
            }
        }
    }
}

impl Iterator for PatternState {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let rest = self.mode.resting();

        match self.stage {
            Stage::Start => {
                self.stage = Stage::Frame;
                let first = match self.pattern {
                    Pattern::Decr1In8 => !rest,
                    _ => rest,
                };
                Some(Step::Fill(first))
            }
            Stage::Frame => {
                self.stage = Stage::Pause;
                Some(self.frame())
            }
            Stage::Pause => {
                if self.step + 1 < self.pattern.frames() {
                    self.step += 1;
                    self.stage = Stage::Frame;
                } else {
                    self.stage = match self.pattern {
                        Pattern::Move1 => Stage::RestorePort,
                        Pattern::Alternate => Stage::Done,
                        _ => Stage::Finish,
                    };
                }
                Some(Step::Delay)
            }
            Stage::RestorePort => {
                let port = Port::ALL[self.port as usize % PORT_COUNT];
                if (self.port as usize) + 1 < PORT_COUNT {
                    self.port += 1;
                    self.step = 0;
                    self.stage = Stage::Frame;
                } else {
                    self.stage = Stage::Done;
                }
                Some(Step::Port(port, rest))
            }
            Stage::Finish => {
                self.stage = Stage::Done;
                Some(Step::Fill(rest))
            }
            Stage::Done => None,
        }
    }
}

impl core::iter::FusedIterator for PatternState {}

// ── Demo program ─────────────────────────────────────────────────────────

/// One entry of a pattern program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drive every pin to a level.
    SetAll(Level),
    /// Do nothing for a while.
    Wait(Duration),
    /// Run a pattern `times` times back to back.
    Run {
        pattern: Pattern,
        mode: Mode,
        delay: Duration,
        times: u8,
    },
}

const BLINK: Duration = Duration::from_millis(500);
const STEP: Duration = Duration::from_millis(50);

const fn run(pattern: Pattern, mode: Mode, times: u8) -> Action {
    Action::Run {
        pattern,
        mode,
        delay: STEP,
        times,
    }
}

/// The PMOD board demo cycle.
pub const DEMO_PROGRAM: &[Action] = &[
    Action::SetAll(Level::Low),
    Action::Wait(BLINK),
    Action::SetAll(Level::High),
    Action::Wait(BLINK),
    Action::SetAll(Level::Low),
    Action::Wait(BLINK),
    Action::SetAll(Level::High),
    Action::Wait(BLINK),
    run(Pattern::Move1, Mode::Lighting, 6),
    run(Pattern::Move1, Mode::Clearing, 5),
    run(Pattern::Move1In8, Mode::Lighting, 16),
    run(Pattern::Move1In8, Mode::Clearing, 6),
    run(Pattern::Incr1In8, Mode::Lighting, 1),
    run(Pattern::Incr1In8, Mode::Clearing, 1),
    run(Pattern::Incr1In8, Mode::Lighting, 1),
    run(Pattern::Incr1In8, Mode::Clearing, 1),
    run(Pattern::Incr1In8, Mode::Lighting, 1),
    run(Pattern::Incr1In8, Mode::Clearing, 1),
    run(Pattern::Incr1In8, Mode::Lighting, 1),
    run(Pattern::Incr1In8, Mode::Clearing, 1),
    run(Pattern::Move1In4, Mode::Lighting, 24),
    run(Pattern::Move1In4, Mode::Clearing, 10),
    Action::Run {
        pattern: Pattern::Alternate,
        mode: Mode::Lighting,
        delay: Duration::from_millis(200),
        times: 10,
    },
    Action::Wait(BLINK),
];

// ── PatternEngine ────────────────────────────────────────────────────────

/// Plays patterns on an expander.
///
/// Owns the expander and the delay provider. Patterns run to completion
/// one at a time; the first failed write aborts the pattern and leaves the
/// pins as they were at that point.
///
/// # Example
///
/// ```no_run
/// use embassy_time::Duration;
/// use tca6424a::{ExpanderConfig, Mode, PatternEngine, Tca6424a};
///
/// # async fn example(
/// #     i2c: impl embedded_hal_async::i2c::I2c,
/// #     delay: impl embedded_hal_async::delay::DelayNs,
/// # ) {
/// let expander = Tca6424a::new(i2c, &ExpanderConfig::default());
/// let mut engine = PatternEngine::new(expander, delay);
///
/// engine.expander_mut().configure_all_outputs().await.unwrap();
/// engine.move1_in8(Mode::Lighting, Duration::from_millis(50)).await.unwrap();
/// # }
/// ```
pub struct PatternEngine<I2C, D> {
    expander: Tca6424a<I2C>,
    delay: D,
}

impl<I2C, D> PatternEngine<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create an engine. No I2C traffic is generated; call
    /// [`Tca6424a::configure_all_outputs`] before the first pattern.
    ///
    /// # Arguments
    /// * `expander` — controller the frames are written to
    /// * `delay` — delay provider awaited between frames
    pub fn new(expander: Tca6424a<I2C>, delay: D) -> Self {
        Self { expander, delay }
    }

    /// Shared access to the controller.
    pub fn expander(&self) -> &Tca6424a<I2C> {
        &self.expander
    }

    /// Direct access to the controller between patterns.
    pub fn expander_mut(&mut self) -> &mut Tca6424a<I2C> {
        &mut self.expander
    }

    /// Give back the expander and the delay provider.
    pub fn release(self) -> (Tca6424a<I2C>, D) {
        (self.expander, self.delay)
    }

    /// Run one pattern to completion.
    ///
    /// # Arguments
    /// * `pattern` — animation to play
    /// * `mode` — frame mapping ([`Pattern::Alternate`] ignores it)
    /// * `delay` — pause after each visible frame
    ///
    /// # Errors
    /// Any bus error from the underlying writes; the pattern stops at the
    /// failing write.
    pub async fn run(
        &mut self,
        pattern: Pattern,
        mode: Mode,
        delay: Duration,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("pattern {} {}", pattern, mode);

        for step in PatternState::new(pattern, mode) {
            match step {
                Step::Fill(value) => self.expander.write_all_ports(value).await?,
                Step::Port(port, value) => self.expander.write_output(port, value).await?,
                Step::Delay => self.pause(delay).await,
            }
        }

        Ok(())
    }

    /// One pin walks across all 24 pins; see [`Pattern::Move1`].
    pub async fn move1(
        &mut self,
        mode: Mode,
        delay: Duration,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.run(Pattern::Move1, mode, delay).await
    }

    /// One pin per port walks in step; see [`Pattern::Move1In8`].
    pub async fn move1_in8(
        &mut self,
        mode: Mode,
        delay: Duration,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.run(Pattern::Move1In8, mode, delay).await
    }

    /// Two pins per port walk in step; see [`Pattern::Move1In4`].
    pub async fn move1_in4(
        &mut self,
        mode: Mode,
        delay: Duration,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.run(Pattern::Move1In4, mode, delay).await
    }

    /// Ports fill up pin by pin; see [`Pattern::Incr1In8`].
    pub async fn incr1_in8(
        &mut self,
        mode: Mode,
        delay: Duration,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.run(Pattern::Incr1In8, mode, delay).await
    }

    /// Fill from the opposite resting level; see [`Pattern::Decr1In8`].
    pub async fn decr1_in8(
        &mut self,
        mode: Mode,
        delay: Duration,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.run(Pattern::Decr1In8, mode, delay).await
    }

    /// `0xAA` then `0x55` on every port, regardless of mode.
    pub async fn alternate(&mut self, delay: Duration) -> Result<(), ExpanderError<I2C::Error>> {
        self.run(Pattern::Alternate, Mode::Lighting, delay).await
    }

    /// Execute a program once, front to back.
    pub async fn run_program(
        &mut self,
        program: &[Action],
    ) -> Result<(), ExpanderError<I2C::Error>> {
        for action in program {
            match *action {
                Action::SetAll(level) => self.expander.set_all(level).await?,
                Action::Wait(duration) => self.pause(duration).await,
                Action::Run {
                    pattern,
                    mode,
                    delay,
                    times,
                } => {
                    for _ in 0..times {
                        self.run(pattern, mode, delay).await?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn pause(&mut self, duration: Duration) {
        let us = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(us).await;
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
