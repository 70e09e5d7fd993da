//! World state and core simulation types
//!
//! Everything the frame driver mutates lives in one [`World`] owned by the
//! host. Components borrow the parts they need for the duration of a call.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::ArenaBounds;
use super::boost;
use super::match_state::{GamePhase, MatchState, Outcome, Score};
use crate::consts::*;
use crate::heading_dir;
use crate::settings::MatchSettings;

/// Position/velocity pair shared by the ball and every car
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl RigidBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Teleport and stop
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: RigidBody,
    pub radius: f32,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            body: RigidBody::new(Self::kickoff_spot()),
            radius: BALL_RADIUS,
        }
    }
}

impl Ball {
    /// Center spot, resting on the ground
    pub fn kickoff_spot() -> Vec3 {
        Vec3::new(0.0, BALL_RADIUS, 0.0)
    }

    pub fn reset(&mut self) {
        self.body.place(Self::kickoff_spot());
    }
}

/// Teams. Orange is the human player's team and defends the +z end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Orange,
    Blue,
}

impl Team {
    pub fn opponent(&self) -> Team {
        match self {
            Team::Orange => Team::Blue,
            Team::Blue => Team::Orange,
        }
    }

    /// Sign of z at the end wall this team defends
    pub fn defended_end(&self) -> f32 {
        match self {
            Team::Orange => 1.0,
            Team::Blue => -1.0,
        }
    }

    /// Team that scores when the ball crosses the end wall on side `z_sign`
    pub fn scoring_at_end(z_sign: f32) -> Team {
        if z_sign > 0.0 { Team::Blue } else { Team::Orange }
    }

    /// Heading facing the opposing goal
    pub fn attack_heading(&self) -> f32 {
        match self {
            Team::Orange => std::f32::consts::PI,
            Team::Blue => 0.0,
        }
    }
}

/// Per-frame driving controls, identical for human and AI cars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub boost: bool,
}

impl ControlIntent {
    /// +1 forward, -1 reverse, 0 coasting
    pub fn throttle(&self) -> f32 {
        (self.forward as i8 - self.backward as i8) as f32
    }

    /// +1 turns left (heading increases), -1 turns right
    pub fn steer(&self) -> f32 {
        (self.left as i8 - self.right as i8) as f32
    }
}

/// A car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarState {
    pub id: u32,
    pub team: Team,
    /// Driven by the human player (otherwise by an AI source)
    pub is_player: bool,
    pub body: RigidBody,
    /// Yaw in radians, see [`heading_dir`]
    pub heading: f32,
    pub boost_fuel: f32,
    /// Boosting this frame (for render effects)
    #[serde(default)]
    pub boosting: bool,
    pub demolished: bool,
    pub demo_respawn_timer: f32,
    /// Whether the renderer should draw this car
    pub visible: bool,
    /// Controls for the current frame
    pub intent: ControlIntent,
    /// Kickoff position for this car's slot
    pub kickoff_spot: Vec3,
}

impl CarState {
    pub fn new(id: u32, team: Team, is_player: bool, kickoff_spot: Vec3) -> Self {
        Self {
            id,
            team,
            is_player,
            body: RigidBody::new(kickoff_spot),
            heading: team.attack_heading(),
            boost_fuel: BOOST_SPAWN_AMOUNT,
            boosting: false,
            demolished: false,
            demo_respawn_timer: 0.0,
            visible: true,
            intent: ControlIntent::default(),
            kickoff_spot,
        }
    }

    /// Unit vector the car's nose points along
    pub fn forward(&self) -> Vec3 {
        heading_dir(self.heading)
    }

    /// Wheels on the ground
    pub fn grounded(&self) -> bool {
        self.body.position.y <= CAR_RIDE_HEIGHT + 1.0e-3
    }

    /// Participates in driving, collisions and pickups
    pub fn is_active(&self) -> bool {
        !self.demolished
    }

    /// Put the car back on the field at `spot`, facing the opposing goal
    pub fn respawn_at(&mut self, spot: Vec3) {
        self.body.place(spot);
        self.heading = self.team.attack_heading();
        self.boost_fuel = BOOST_SPAWN_AMOUNT;
        self.boosting = false;
        self.demolished = false;
        self.demo_respawn_timer = 0.0;
        self.visible = true;
        self.intent = ControlIntent::default();
    }

    /// Add fuel, keeping it within [0, 100]
    pub fn add_boost(&mut self, amount: f32) {
        self.boost_fuel = (self.boost_fuel + amount).clamp(0.0, BOOST_MAX);
    }
}

/// A boost pad on the field floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostPad {
    pub id: u32,
    /// Ground position (x, z)
    pub position: Vec2,
    pub big: bool,
    pub active: bool,
    pub respawn_timer: f32,
}

impl BoostPad {
    pub fn new(id: u32, position: Vec2, big: bool) -> Self {
        Self {
            id,
            position,
            big,
            active: true,
            respawn_timer: 0.0,
        }
    }

    pub fn pickup_radius(&self) -> f32 {
        if self.big {
            BIG_PAD_PICKUP_RADIUS
        } else {
            SMALL_PAD_PICKUP_RADIUS
        }
    }

    pub fn respawn_secs(&self) -> f32 {
        if self.big {
            BIG_PAD_RESPAWN_SECS
        } else {
            SMALL_PAD_RESPAWN_SECS
        }
    }
}

/// Notifications for the host (HUD, celebrations, sounds, pad visuals)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    GoalScored { scorer: Team, score: Score },
    OvertimeStarted,
    MatchEnded { outcome: Outcome, score: Score },
    BallTouched { car_id: u32 },
    CarDemolished { car_id: u32, by: Option<u32> },
    CarRespawned { car_id: u32 },
    PadCollected { pad_id: u32, car_id: u32 },
    PadRespawned { pad_id: u32 },
}

/// Read-only view handed to renderers and the HUD
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub time_ticks: u64,
    pub bounds: &'a ArenaBounds,
    pub match_state: &'a MatchState,
    pub clock_display: String,
    pub ball: &'a Ball,
    pub cars: &'a [CarState],
    pub pads: &'a [BoostPad],
}

/// The whole simulation: ball, cars, pads and match state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: MatchSettings,
    pub bounds: ArenaBounds,
    pub ball: Ball,
    /// Cars sorted by id; the player car is always id 0
    pub cars: Vec<CarState>,
    pub pads: Vec<BoostPad>,
    pub match_state: MatchState,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    /// Frames simulated since the world was built
    pub time_ticks: u64,
    rng: Pcg32,
}

impl World {
    /// Build a world in the menu phase for the given settings
    pub fn new(settings: MatchSettings) -> Self {
        let settings = settings.normalized();
        let bounds = settings.stadium.bounds();
        let cars = Self::spawn_cars(&settings, &bounds);
        let pads = boost::pad_layout(&bounds);

        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            match_state: MatchState::new(&settings),
            settings,
            bounds,
            ball: Ball::default(),
            cars,
            pads,
            events: Vec::new(),
            time_ticks: 0,
        }
    }

    /// Kickoff spots for one team, nearest the center first
    pub fn kickoff_spots(bounds: &ArenaBounds, team: Team, count: usize) -> Vec<Vec3> {
        let z = team.defended_end() * bounds.half_length() * 0.5;
        match count {
            0 => Vec::new(),
            1 => vec![Vec3::new(0.0, CAR_RIDE_HEIGHT, z)],
            _ => {
                let spread = bounds.half_width() * 0.4;
                (0..count)
                    .map(|i| {
                        let t = i as f32 / (count - 1) as f32;
                        let x = -spread + 2.0 * spread * t;
                        Vec3::new(x, CAR_RIDE_HEIGHT, z)
                    })
                    .collect()
            }
        }
    }

    /// Places a demolished car may reappear for `team`
    pub fn respawn_spots(bounds: &ArenaBounds, team: Team) -> [Vec3; 3] {
        let z = team.defended_end() * (bounds.half_length() - bounds.corner_radius);
        let x = bounds.goal_half_width() + CAR_LENGTH;
        [
            Vec3::new(-x, CAR_RIDE_HEIGHT, z),
            Vec3::new(0.0, CAR_RIDE_HEIGHT, z),
            Vec3::new(x, CAR_RIDE_HEIGHT, z),
        ]
    }

    fn spawn_cars(settings: &MatchSettings, bounds: &ArenaBounds) -> Vec<CarState> {
        let per_team = settings.team_size.cars_per_team();
        let orange = Self::kickoff_spots(bounds, Team::Orange, per_team);
        let blue = Self::kickoff_spots(bounds, Team::Blue, per_team);

        let mut cars = Vec::with_capacity(per_team * 2);
        for (i, spot) in orange.into_iter().enumerate() {
            cars.push(CarState::new(cars.len() as u32, Team::Orange, i == 0, spot));
        }
        for spot in blue {
            cars.push(CarState::new(cars.len() as u32, Team::Blue, false, spot));
        }
        cars
    }

    /// Start (or restart) a match: fresh score and clock, kickoff positions, countdown
    pub fn start_match(&mut self) {
        self.match_state = MatchState::new(&self.settings);
        for pad in &mut self.pads {
            pad.active = true;
            pad.respawn_timer = 0.0;
        }
        self.reset_kickoff();
        let from = self.match_state.phase;
        self.match_state.begin_countdown();
        self.events.push(GameEvent::PhaseChanged {
            from,
            to: GamePhase::Countdown,
        });
        log::info!(
            "Match started: {} stadium, {} per team, duration {:?}, win score {:?}",
            self.settings.stadium.as_str(),
            self.settings.team_size.cars_per_team(),
            self.settings.match_duration_secs,
            self.settings.win_score
        );
    }

    /// Ball to center spot, every car to its kickoff slot
    pub fn reset_kickoff(&mut self) {
        self.ball.reset();
        for car in &mut self.cars {
            let spot = car.kickoff_spot;
            car.respawn_at(spot);
        }
    }

    /// Pick a respawn point for `team`
    pub fn pick_respawn_spot(&mut self, team: Team) -> Vec3 {
        let spots = Self::respawn_spots(&self.bounds, team);
        spots[self.rng.random_range(0..spots.len())]
    }

    pub fn player_car(&self) -> Option<&CarState> {
        self.cars.iter().find(|c| c.is_player)
    }

    pub fn car_mut(&mut self, id: u32) -> Option<&mut CarState> {
        self.cars.iter_mut().find(|c| c.id == id)
    }

    /// Hand all pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            time_ticks: self.time_ticks,
            bounds: &self.bounds,
            match_state: &self.match_state,
            clock_display: self.match_state.clock_display(),
            ball: &self.ball,
            cars: &self.cars,
            pads: &self.pads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TeamSize;

    #[test]
    fn test_one_vs_one_roster() {
        let world = World::new(MatchSettings::default());
        assert_eq!(world.cars.len(), 2);
        assert!(world.cars[0].is_player);
        assert_eq!(world.cars[0].team, Team::Orange);
        assert_eq!(world.cars[1].team, Team::Blue);
        assert_eq!(world.match_state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_two_vs_two_roster() {
        let world = World::new(MatchSettings {
            team_size: TeamSize::TwoVsTwo,
            ..Default::default()
        });
        assert_eq!(world.cars.len(), 4);
        assert_eq!(world.cars.iter().filter(|c| c.is_player).count(), 1);
        assert_eq!(world.cars.iter().filter(|c| c.team == Team::Blue).count(), 2);
        for car in &world.cars {
            assert!(world.bounds.contains(crate::flat(car.body.position), CAR_HALF_WIDTH));
        }
    }

    #[test]
    fn test_start_match_enters_countdown() {
        let mut world = World::new(MatchSettings::default());
        world.start_match();
        assert_eq!(world.match_state.phase, GamePhase::Countdown);
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::PhaseChanged {
                from: GamePhase::Menu,
                to: GamePhase::Countdown
            }]
        );
        assert!(world.events.is_empty());
    }

    #[test]
    fn test_scoring_end() {
        assert_eq!(Team::scoring_at_end(1.0), Team::Blue);
        assert_eq!(Team::scoring_at_end(-1.0), Team::Orange);
        assert_eq!(Team::scoring_at_end(Team::Orange.defended_end()), Team::Blue);
    }

    #[test]
    fn test_add_boost_clamps() {
        let mut car = CarState::new(0, Team::Orange, true, Vec3::ZERO);
        car.add_boost(500.0);
        assert_eq!(car.boost_fuel, BOOST_MAX);
        car.add_boost(-500.0);
        assert_eq!(car.boost_fuel, 0.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let world = World::new(MatchSettings::default());
        let json = serde_json::to_string(&world.snapshot()).unwrap();
        assert!(json.contains("\"cars\""));
        assert!(json.contains("\"phase\":\"Menu\""));
    }
}
