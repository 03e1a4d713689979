//! Simulation constants and tunable configuration.
//!
//! The physics constants below are part of the chamber contract: chamber
//! programs are written against these coordinate bounds and timings.

/// Chamber-local x spans [0, 1); y spans [0, CHAMBER_HEIGHT).
pub const CHAMBER_HEIGHT: f32 = 0.7;

/// Radius of every simulation-spawned ball.
pub const BALL_RADIUS: f32 = 0.025;

/// Vertical acceleration applied each tick (negative y is down).
pub const GRAVITY: f32 = -9.832;

/// Upper bound on ball speed; velocities are rescaled to this after
/// integration.
pub const MAX_SPEED: f32 = 2.5;

/// Length of one simulation tick in nanoseconds (~600 Hz).
pub const STEP_LEN_NS: u64 = 1_666_666;

/// Tick length in seconds, as passed to chamber programs.
pub const STEP_DT: f32 = STEP_LEN_NS as f32 / 1e9;

/// Fraction of the normal velocity component lost in a perpendicular
/// collision; grazing hits lose proportionally less.
pub const COLLISION_DAMPING: f32 = 0.15;

/// Simulation configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    /// Number of balls in the simulation. Fixed at init; constrained
    /// deployments use 5.
    pub num_balls: usize,
    /// Grid width of the chamber torus. Constrained deployments use 1.
    pub chambers_per_row: usize,
    /// Maximum number of chamber programs that may be registered.
    pub max_chambers: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_balls: 20,
            chambers_per_row: 2,
            max_chambers: 128,
        }
    }
}

impl SimConfig {
    /// Validate configuration. Returns Err with description if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_balls == 0 {
            return Err("num_balls must be > 0".to_string());
        }
        if self.chambers_per_row == 0 {
            return Err("chambers_per_row must be > 0".to_string());
        }
        if self.max_chambers == 0 {
            return Err("max_chambers must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_balls_invalid() {
        let mut config = SimConfig::default();
        config.num_balls = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_row_width_invalid() {
        let mut config = SimConfig::default();
        config.chambers_per_row = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_chambers_invalid() {
        let mut config = SimConfig::default();
        config.max_chambers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn step_dt_matches_tick_length() {
        assert!((STEP_DT - 0.001_666_666).abs() < 1e-9);
    }
}
