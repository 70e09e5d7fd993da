//! Match settings chosen before kickoff
//!
//! Handed to the simulation by the host (menu UI, URL params, tests) as JSON.
//! Persisting them is the host's job; this module only parses and sanitizes.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ArenaBounds;

/// Stadium variants, each with its own field dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Stadium {
    #[default]
    Standard,
    Compact,
    Wide,
}

impl Stadium {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stadium::Standard => "Standard",
            Stadium::Compact => "Compact",
            Stadium::Wide => "Wide",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "std" => Some(Stadium::Standard),
            "compact" | "small" => Some(Stadium::Compact),
            "wide" => Some(Stadium::Wide),
            _ => None,
        }
    }

    /// Arena geometry for this stadium
    pub fn bounds(&self) -> ArenaBounds {
        match self {
            Stadium::Standard => ArenaBounds {
                field_width: FIELD_WIDTH,
                field_length: FIELD_LENGTH,
                corner_radius: CORNER_RADIUS,
                goal_width: GOAL_WIDTH,
                wall_height: WALL_HEIGHT,
            },
            Stadium::Compact => ArenaBounds {
                field_width: 64.0,
                field_length: 96.0,
                corner_radius: 10.0,
                goal_width: 16.0,
                wall_height: 16.0,
            },
            Stadium::Wide => ArenaBounds {
                field_width: 100.0,
                field_length: 130.0,
                corner_radius: 16.0,
                goal_width: 22.0,
                wall_height: 22.0,
            },
        }
    }
}

/// How boost fuel is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoostMode {
    /// Boosting drains fuel; pads refill it
    #[default]
    Standard,
    /// Boost never runs out
    Unlimited,
}

/// Cars per team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TeamSize {
    /// Player vs one AI car
    #[default]
    OneVsOne,
    /// Player plus an AI teammate vs two AI cars
    TwoVsTwo,
}

impl TeamSize {
    pub fn cars_per_team(&self) -> usize {
        match self {
            TeamSize::OneVsOne => 1,
            TeamSize::TwoVsTwo => 2,
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Regulation length in seconds (`None` = no time limit, clock counts up)
    pub match_duration_secs: Option<f32>,
    /// Goals needed to win outright (`None` = no score limit)
    pub win_score: Option<u32>,
    pub boost_mode: BoostMode,
    pub team_size: TeamSize,
    pub stadium: Stadium,
    /// Let cars drive during the kickoff countdown (ball stays frozen either way)
    pub cars_move_during_countdown: bool,
    /// Seed for respawn spot selection
    pub seed: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            match_duration_secs: Some(DEFAULT_MATCH_SECS),
            win_score: None,
            boost_mode: BoostMode::Standard,
            team_size: TeamSize::OneVsOne,
            stadium: Stadium::Standard,
            cars_move_during_countdown: false,
            seed: 0,
        }
    }
}

impl MatchSettings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse settings handed over by the host; blank input means defaults
    pub fn from_host(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            Ok(Self::default())
        } else {
            Self::from_json(json)
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Replace values the simulation can't run with safe defaults
    pub fn normalized(mut self) -> Self {
        if let Some(duration) = self.match_duration_secs {
            if duration.is_infinite() && duration > 0.0 {
                self.match_duration_secs = None;
            } else if !duration.is_finite() || duration <= 0.0 {
                log::warn!(
                    "Invalid match duration {}, using {}s",
                    duration,
                    DEFAULT_MATCH_SECS
                );
                self.match_duration_secs = Some(DEFAULT_MATCH_SECS);
            }
        }

        if self.win_score == Some(0) {
            log::warn!("Win score of 0 ignored, playing without a score limit");
            self.win_score = None;
        }

        self
    }

    /// Whether boost fuel is never consumed
    pub fn unlimited_boost(&self) -> bool {
        self.boost_mode == BoostMode::Unlimited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_negative_duration() {
        let settings = MatchSettings {
            match_duration_secs: Some(-30.0),
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings.match_duration_secs, Some(DEFAULT_MATCH_SECS));
    }

    #[test]
    fn test_normalize_infinite_duration_means_unlimited() {
        let settings = MatchSettings {
            match_duration_secs: Some(f32::INFINITY),
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings.match_duration_secs, None);

        let nan = MatchSettings {
            match_duration_secs: Some(f32::NAN),
            ..Default::default()
        }
        .normalized();
        assert_eq!(nan.match_duration_secs, Some(DEFAULT_MATCH_SECS));
    }

    #[test]
    fn test_normalize_zero_win_score() {
        let settings = MatchSettings {
            win_score: Some(0),
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings.win_score, None);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let settings =
            MatchSettings::from_json(r#"{"win_score": 3, "team_size": "TwoVsTwo"}"#).unwrap();
        assert_eq!(settings.win_score, Some(3));
        assert_eq!(settings.team_size, TeamSize::TwoVsTwo);
        assert_eq!(settings.match_duration_secs, Some(DEFAULT_MATCH_SECS));
        assert_eq!(settings.stadium, Stadium::Standard);
    }

    #[test]
    fn test_blank_host_settings_are_defaults() {
        for blank in ["", "   ", "\n"] {
            let settings = MatchSettings::from_host(blank).unwrap();
            assert_eq!(settings.match_duration_secs, Some(DEFAULT_MATCH_SECS));
            assert_eq!(settings.team_size, TeamSize::OneVsOne);
        }
        let wide = MatchSettings::from_host(r#"{"stadium": "Wide"}"#).unwrap();
        assert_eq!(wide.stadium, Stadium::Wide);
        assert!(MatchSettings::from_host("{not json").is_err());
    }

    #[test]
    fn test_stadium_from_str() {
        assert_eq!(Stadium::from_str("WIDE"), Some(Stadium::Wide));
        assert_eq!(Stadium::from_str("moon"), None);
    }

    #[test]
    fn test_stadium_bounds_leave_room_for_goal() {
        for stadium in [Stadium::Standard, Stadium::Compact, Stadium::Wide] {
            let b = stadium.bounds();
            assert!(b.goal_width / 2.0 < b.half_width() - b.corner_radius);
            assert!(b.corner_radius > CAR_HALF_WIDTH);
        }
    }
}
