//! Match state machine
//!
//! Menu → Countdown → Playing ⇄ Goal → Playing | OvertimeAnnounce → Playing → GameOver
//!
//! Every timed phase keeps a plain countdown in `phase_timer` that only the
//! current phase reads. Changing phase simply stops reading it, so nothing is
//! left pending after a reset.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, Team};
use crate::consts::*;
use crate::settings::MatchSettings;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for the host to start a match
    Menu,
    /// Kickoff countdown, ball frozen
    Countdown,
    /// Active gameplay
    Playing,
    /// Goal celebration, gameplay frozen
    Goal,
    /// Regulation ended tied, golden goal about to start
    OvertimeAnnounce,
    /// Match over until a new one is started
    GameOver,
}

/// Goals per team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub orange: u32,
    pub blue: u32,
}

impl Score {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Orange => self.orange,
            Team::Blue => self.blue,
        }
    }

    fn add(&mut self, team: Team) {
        match team {
            Team::Orange => self.orange += 1,
            Team::Blue => self.blue += 1,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.orange == self.blue
    }
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    OrangeWins,
    BlueWins,
    Draw,
}

impl Outcome {
    pub fn from_score(score: Score) -> Self {
        use std::cmp::Ordering;
        match score.orange.cmp(&score.blue) {
            Ordering::Greater => Outcome::OrangeWins,
            Ordering::Less => Outcome::BlueWins,
            Ordering::Equal => Outcome::Draw,
        }
    }

    /// Scoreboard label
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::OrangeWins => "Orange wins!",
            Outcome::BlueWins => "Blue wins!",
            Outcome::Draw => "Draw",
        }
    }
}

/// A phase transition that happened during a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Authoritative match state (one per world)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: GamePhase,
    pub score: Score,
    /// Seconds remaining with a time limit, seconds elapsed without one or in overtime
    pub clock: f32,
    /// Regulation length (`None` = unlimited)
    pub match_duration: Option<f32>,
    /// Goals needed to win (`None` = unlimited)
    pub win_score: Option<u32>,
    /// Golden goal mode
    pub overtime: bool,
    /// Countdown for the current timed phase
    pub phase_timer: f32,
    pub last_scorer: Option<Team>,
    /// Set when the match ends
    pub outcome: Option<Outcome>,
    /// The current goal celebration ends the match
    decided: bool,
}

impl MatchState {
    pub fn new(settings: &MatchSettings) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: Score::default(),
            clock: settings.match_duration_secs.unwrap_or(0.0),
            match_duration: settings.match_duration_secs,
            win_score: settings.win_score,
            overtime: false,
            phase_timer: 0.0,
            last_scorer: None,
            outcome: None,
            decided: false,
        }
    }

    /// Enter the kickoff countdown
    pub fn begin_countdown(&mut self) {
        self.phase = GamePhase::Countdown;
        self.phase_timer = COUNTDOWN_SECS;
    }

    /// Whether the clock counts down toward a limit
    pub fn counts_down(&self) -> bool {
        self.match_duration.is_some() && !self.overtime
    }

    fn set_phase(&mut self, to: GamePhase, events: &mut Vec<GameEvent>) -> PhaseChange {
        let from = self.phase;
        self.phase = to;
        events.push(GameEvent::PhaseChanged { from, to });
        log::info!("Phase {:?} -> {:?}", from, to);
        PhaseChange { from, to }
    }

    /// Advance timers and the clock by `dt`, returning any phase transition
    pub fn advance(&mut self, dt: f32, events: &mut Vec<GameEvent>) -> Option<PhaseChange> {
        match self.phase {
            GamePhase::Menu | GamePhase::GameOver => None,
            GamePhase::Countdown => {
                self.phase_timer -= dt;
                (self.phase_timer <= 0.0).then(|| self.set_phase(GamePhase::Playing, events))
            }
            GamePhase::Playing => {
                if self.counts_down() {
                    self.clock = (self.clock - dt).max(0.0);
                    if self.clock <= 0.0 {
                        return Some(self.end_of_regulation(events));
                    }
                } else {
                    self.clock += dt;
                }
                None
            }
            GamePhase::Goal => {
                self.phase_timer -= dt;
                if self.phase_timer > 0.0 {
                    return None;
                }
                if self.decided {
                    Some(self.finish(events))
                } else {
                    Some(self.set_phase(GamePhase::Playing, events))
                }
            }
            GamePhase::OvertimeAnnounce => {
                self.phase_timer -= dt;
                (self.phase_timer <= 0.0).then(|| self.set_phase(GamePhase::Playing, events))
            }
        }
    }

    /// Regulation time ran out
    fn end_of_regulation(&mut self, events: &mut Vec<GameEvent>) -> PhaseChange {
        if !self.score.is_tied() {
            return self.finish(events);
        }
        log::info!("Regulation ended tied {}-{}, overtime", self.score.orange, self.score.blue);
        self.overtime = true;
        self.clock = 0.0;
        self.phase_timer = OVERTIME_ANNOUNCE_SECS;
        events.push(GameEvent::OvertimeStarted);
        self.set_phase(GamePhase::OvertimeAnnounce, events)
    }

    /// Credit a goal to `scorer`. Ignored outside `Playing`.
    pub fn on_goal(&mut self, scorer: Team, events: &mut Vec<GameEvent>) -> Option<PhaseChange> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        self.score.add(scorer);
        self.last_scorer = Some(scorer);
        let reached_win = self
            .win_score
            .is_some_and(|target| self.score.get(scorer) >= target);
        self.decided = self.overtime || reached_win;
        self.phase_timer = GOAL_CELEBRATION_SECS;

        log::info!(
            "Goal {:?}! {}-{}{}",
            scorer,
            self.score.orange,
            self.score.blue,
            if self.decided { " (match decided)" } else { "" }
        );
        events.push(GameEvent::GoalScored {
            scorer,
            score: self.score,
        });
        Some(self.set_phase(GamePhase::Goal, events))
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) -> PhaseChange {
        let outcome = Outcome::from_score(self.score);
        self.outcome = Some(outcome);
        self.decided = false;
        log::info!(
            "Match over: {} ({}-{})",
            outcome.label(),
            self.score.orange,
            self.score.blue
        );
        events.push(GameEvent::MatchEnded {
            outcome,
            score: self.score,
        });
        self.set_phase(GamePhase::GameOver, events)
    }

    /// Outcome from the current score (final once in `GameOver`)
    pub fn outcome(&self) -> Outcome {
        self.outcome.unwrap_or_else(|| Outcome::from_score(self.score))
    }

    /// Clock as `m:ss`, prefixed with `+` in overtime
    pub fn clock_display(&self) -> String {
        let secs = if self.counts_down() {
            self.clock.ceil()
        } else {
            self.clock.floor()
        } as u32;
        let prefix = if self.overtime { "+" } else { "" };
        format!("{}{}:{:02}", prefix, secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(settings: MatchSettings) -> (MatchState, Vec<GameEvent>) {
        let mut state = MatchState::new(&settings.normalized());
        let mut events = Vec::new();
        state.begin_countdown();
        state.advance(COUNTDOWN_SECS + 0.01, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        events.clear();
        (state, events)
    }

    fn run(state: &mut MatchState, secs: f32, events: &mut Vec<GameEvent>) {
        let steps = (secs / SIM_DT).ceil() as u32;
        for _ in 0..steps {
            state.advance(SIM_DT, events);
        }
    }

    #[test]
    fn test_menu_is_idle() {
        let mut state = MatchState::new(&MatchSettings::default());
        let mut events = Vec::new();
        assert_eq!(state.advance(10.0, &mut events), None);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(events.is_empty());
    }

    #[test]
    fn test_countdown_to_playing() {
        let mut state = MatchState::new(&MatchSettings::default());
        let mut events = Vec::new();
        state.begin_countdown();
        assert_eq!(state.advance(1.0, &mut events), None);
        assert_eq!(state.phase, GamePhase::Countdown);
        let change = state.advance(2.5, &mut events);
        assert_eq!(
            change,
            Some(PhaseChange {
                from: GamePhase::Countdown,
                to: GamePhase::Playing
            })
        );
    }

    #[test]
    fn test_goal_increments_only_scorer() {
        let (mut state, mut events) = playing(MatchSettings::default());
        state.on_goal(Team::Orange, &mut events);
        assert_eq!(state.phase, GamePhase::Goal);
        assert_eq!(state.score, Score { orange: 1, blue: 0 });
        assert!(events.contains(&GameEvent::GoalScored {
            scorer: Team::Orange,
            score: Score { orange: 1, blue: 0 }
        }));
    }

    #[test]
    fn test_alternating_goals_accumulate() {
        let (mut state, mut events) = playing(MatchSettings::default());
        for scorer in [Team::Orange, Team::Blue, Team::Orange] {
            assert!(state.on_goal(scorer, &mut events).is_some());
            run(&mut state, GOAL_CELEBRATION_SECS + 0.1, &mut events);
            assert_eq!(state.phase, GamePhase::Playing);
        }
        assert_eq!(state.score, Score { orange: 2, blue: 1 });
    }

    #[test]
    fn test_goal_ignored_outside_playing() {
        let mut state = MatchState::new(&MatchSettings::default());
        let mut events = Vec::new();
        assert_eq!(state.on_goal(Team::Blue, &mut events), None);
        state.begin_countdown();
        assert_eq!(state.on_goal(Team::Blue, &mut events), None);
        assert_eq!(state.score, Score::default());
    }

    #[test]
    fn test_time_up_with_lead_ends_match() {
        let (mut state, mut events) = playing(MatchSettings {
            match_duration_secs: Some(10.0),
            ..Default::default()
        });
        state.on_goal(Team::Blue, &mut events);
        run(&mut state, GOAL_CELEBRATION_SECS + 0.1, &mut events);
        run(&mut state, 10.5, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.outcome(), Outcome::BlueWins);
        assert!(!events.contains(&GameEvent::OvertimeStarted));
    }

    #[test]
    fn test_time_up_tied_goes_to_overtime() {
        let (mut state, mut events) = playing(MatchSettings {
            match_duration_secs: Some(5.0),
            ..Default::default()
        });
        let mut saw_game_over = false;
        let steps = (5.0 / SIM_DT) as u32 + 2;
        for _ in 0..steps {
            if let Some(change) = state.advance(SIM_DT, &mut events) {
                saw_game_over |= change.to == GamePhase::GameOver;
            }
        }
        assert!(!saw_game_over);
        assert_eq!(state.phase, GamePhase::OvertimeAnnounce);
        assert!(state.overtime);

        run(&mut state, OVERTIME_ANNOUNCE_SECS + 0.1, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.clock > 0.0);
        assert!(state.clock_display().starts_with('+'));
    }

    #[test]
    fn test_golden_goal_ends_match() {
        let (mut state, mut events) = playing(MatchSettings {
            match_duration_secs: Some(1.0),
            ..Default::default()
        });
        run(&mut state, 1.1, &mut events);
        run(&mut state, OVERTIME_ANNOUNCE_SECS + 0.1, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);

        state.on_goal(Team::Orange, &mut events);
        run(&mut state, GOAL_CELEBRATION_SECS + 0.1, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.outcome, Some(Outcome::OrangeWins));
    }

    #[test]
    fn test_win_score_ends_after_celebration() {
        let (mut state, mut events) = playing(MatchSettings {
            match_duration_secs: None,
            win_score: Some(2),
            ..Default::default()
        });
        state.on_goal(Team::Blue, &mut events);
        run(&mut state, GOAL_CELEBRATION_SECS + 0.1, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);

        state.on_goal(Team::Blue, &mut events);
        assert_eq!(state.phase, GamePhase::Goal);
        run(&mut state, GOAL_CELEBRATION_SECS + 0.1, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.outcome(), Outcome::BlueWins);
        assert_eq!(state.outcome().label(), "Blue wins!");
    }

    #[test]
    fn test_unlimited_clock_counts_up() {
        let (mut state, mut events) = playing(MatchSettings {
            match_duration_secs: None,
            ..Default::default()
        });
        run(&mut state, 65.5, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.clock >= 65.0);
        assert_eq!(state.clock_display(), "1:05");
    }

    #[test]
    fn test_clock_display_counts_down() {
        let state = MatchState::new(&MatchSettings::default());
        assert_eq!(state.clock_display(), "5:00");
    }

    #[test]
    fn test_draw_label() {
        assert_eq!(Outcome::from_score(Score { orange: 2, blue: 2 }), Outcome::Draw);
    }
}
