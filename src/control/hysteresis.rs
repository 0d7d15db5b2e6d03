//! On/off fan control with a dead-band, plus the water-alarm edges.
//!
//! [`ControllerState::step`] is a pure function: it takes the previous
//! state and this tick's averaged inputs and returns the next state
//! together with the [`Actions`] to apply.  The caller owns the state
//! value and is the only writer, which is what keeps the water edges
//! firing exactly once.
//!
//! ```text
//!              avg < set - tol                      tank empties
//!   FanOff ───────────────────▶ FanOn     HasWater ─────────────▶ OutOfWater
//!          ◀───────────────────                  ◀─────────────
//!              avg >= set - tol                     tank refilled
//! ```
//!
//! While out of water the fan is held off and the humidity rule is not
//! evaluated.

/// Dead-band below the setpoint, in the units of the humidity average.
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// Everything the controller remembers between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    pub fan_on: bool,
    pub out_of_water: bool,
    /// `out_of_water` as of the end of the previous tick.
    pub last_out_of_water: bool,
    /// Target humidity (%).
    pub set_humidity: f64,
}

impl ControllerState {
    /// Fan off, tank assumed full.
    pub fn new(set_humidity: f64) -> Self {
        Self {
            fan_on: false,
            out_of_water: false,
            last_out_of_water: false,
            set_humidity,
        }
    }

    /// Evaluate one control tick.
    pub fn step(self, inputs: TickInputs, tolerance: f64) -> (Self, Actions) {
        let mut next = self;
        let mut actions = Actions::default();
        next.out_of_water = inputs.out_of_water;

        if !next.out_of_water {
            if inputs.avg_humidity < self.set_humidity - tolerance {
                if !next.fan_on {
                    next.fan_on = true;
                    actions.fan = Some(FanCommand::On);
                }
            } else if next.fan_on {
                next.fan_on = false;
                actions.fan = Some(FanCommand::Off);
            }

            if self.last_out_of_water {
                actions.water_light = Some(false);
            }
        } else if !self.last_out_of_water {
            if next.fan_on {
                next.fan_on = false;
                actions.fan = Some(FanCommand::Off);
            }
            actions.water_light = Some(true);
            actions.sound_alarm = true;
        }

        next.last_out_of_water = next.out_of_water;
        (next, actions)
    }
}

/// Averaged measurements fed into [`ControllerState::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInputs {
    pub avg_humidity: f64,
    pub out_of_water: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanCommand {
    On,
    Off,
}

/// Edge-triggered outputs of one tick.  `None` / `false` = leave alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actions {
    pub fan: Option<FanCommand>,
    pub water_light: Option<bool>,
    pub sound_alarm: bool,
}

impl Actions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
