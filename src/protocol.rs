//! Wire-format snapshot types consumed by the hosting layer.
//!
//! The simulation itself has no network surface; the outer program polls
//! `Simulation::snapshot` and serializes the result. Values are rounded to
//! four decimals to keep payloads small.

/// One ball on the wire.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallWire {
    pub pos: [f32; 2],
    pub r: f32,
    pub velocity: [f32; 2],
    /// Index of the chamber currently owning the ball's coordinates.
    pub owner: u32,
}

/// Full simulation state snapshot.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStateMsg {
    pub num_steps_taken: u64,
    pub chambers_per_row: u32,
    pub num_chambers: u32,
    pub balls: Vec<BallWire>,
}

fn round4(v: f32) -> f32 {
    (v * 10_000.0).round() / 10_000.0
}

pub fn ball_to_wire(ball: &crate::ball::Ball, owner: u32) -> BallWire {
    BallWire {
        pos: [round4(ball.pos.x), round4(ball.pos.y)],
        r: ball.r,
        velocity: [round4(ball.velocity.x), round4(ball.velocity.y)],
        owner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::Ball;
    use crate::vec2::{Pos2, Vec2};

    #[test]
    fn wire_values_are_rounded() {
        let ball = Ball::new(
            Pos2::new(0.123456, 0.654321),
            0.025,
            Vec2::new(-1.999999, 0.000049),
        );
        let wire = ball_to_wire(&ball, 3);
        assert_eq!(wire.pos, [0.1235, 0.6543]);
        assert_eq!(wire.velocity, [-2.0, 0.0]);
        assert_eq!(wire.owner, 3);
        assert_eq!(wire.r, 0.025);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let msg = SimulationStateMsg {
            num_steps_taken: 12,
            chambers_per_row: 2,
            num_chambers: 4,
            balls: vec![ball_to_wire(
                &Ball::new(Pos2::new(0.5, 0.35), 0.025, Vec2::ZERO),
                0,
            )],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"numStepsTaken\":12"));
        assert!(json.contains("\"chambersPerRow\":2"));
        assert!(json.contains("\"numChambers\":4"));
        assert!(json.contains("\"owner\":0"));

        let back: SimulationStateMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
