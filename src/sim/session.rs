//! Run state: score, stage, berries and lifetime records
//!
//! Title → Running → GameOver. GameOver is terminal; a new run is a fresh
//! session built by `World::reload`.

use serde::{Deserialize, Serialize};

use crate::config::{SessionConfig, ThemeConfig};
use crate::consts::MAX_STAGE;
use crate::persistence::{KeyValueStore, best_effort, keys};
use crate::platform::{PlatformQueue, PlatformRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, waiting for the first tap
    Title,
    Running,
    GameOver,
}

/// Visuals for the current stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageStyle {
    pub stage: u32,
    /// Background sprite, `None` if no backgrounds exist
    pub background_index: Option<usize>,
    /// Score text colour (RGBA)
    pub ui_color: [f32; 4],
    /// Berry sprite, changes every two stages
    pub berry_sprite_index: Option<usize>,
}

/// Score text alpha
const UI_TEXT_ALPHA: f32 = 0.6;

impl StageStyle {
    pub fn for_stage(stage: u32, theme: &ThemeConfig) -> Self {
        let index = stage.saturating_sub(1) as usize;
        let [r, g, b] = theme.ui_colors.get(index).copied().unwrap_or([1.0, 1.0, 1.0]);
        Self {
            stage,
            background_index: (theme.background_count > 0)
                .then(|| index % theme.background_count),
            ui_color: [r, g, b, UI_TEXT_ALPHA],
            berry_sprite_index: (theme.berry_sprite_count > 0)
                .then(|| (index / 2) % theme.berry_sprite_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Run began; hide the title UI
    Started,
    ScoreChanged { score: u32 },
    /// Stage changed; restyle background and UI
    StageChanged { stage: u32, style: StageStyle },
    BerriesChanged { session: u32, total: u32 },
    /// Run ended; show the game-over UI
    GameOver { score: u32, best: u32, new_best: bool },
    NicknameChanged(String),
}

/// Stage reached at `score`
pub fn stage_for_score(score: u32, score_per_stage: u32) -> u32 {
    (score / score_per_stage.max(1) + 1).min(MAX_STAGE)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: SessionPhase,
    pub score: u32,
    /// 1..=10, never decreases within a session
    pub stage: u32,
    pub session_berries: u32,
    /// Lifetime berries (persisted)
    pub total_berries: u32,
    /// Persisted best score as of the last update
    pub best_score: u32,
    /// Persisted play count as of the last update
    pub games_played: u32,
    pub nickname: Option<String>,
    pub score_per_stage: u32,
    theme: ThemeConfig,
}

fn read_count(store: &dyn KeyValueStore, key: &str) -> u32 {
    store.get_int(key, 0).clamp(0, u32::MAX as i64) as u32
}

impl GameSession {
    /// Fresh session at the title screen, with lifetime records from `store`
    pub fn load(config: &SessionConfig, theme: ThemeConfig, store: &dyn KeyValueStore) -> Self {
        let session = Self {
            phase: SessionPhase::Title,
            score: 0,
            stage: 1,
            session_berries: 0,
            total_berries: read_count(store, keys::TOTAL_BERRIES),
            best_score: read_count(store, keys::BEST_SCORE),
            games_played: read_count(store, keys::GAMES_PLAYED),
            nickname: store.get_string(keys::USER_NICKNAME),
            score_per_stage: config.score_per_stage,
            theme,
        };
        log::info!(
            "Session ready (best {}, played {}, berries {})",
            session.best_score,
            session.games_played,
            session.total_berries
        );
        session
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn stage_style(&self) -> StageStyle {
        StageStyle::for_stage(self.stage, &self.theme)
    }

    /// Leave the title screen; only the first call has any effect
    pub fn start_game_from_title(
        &mut self,
        store: &mut dyn KeyValueStore,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        if self.phase != SessionPhase::Title {
            return false;
        }

        self.games_played = read_count(store, keys::GAMES_PLAYED) + 1;
        best_effort(
            store.set_int(keys::GAMES_PLAYED, i64::from(self.games_played)),
            "games played",
        );
        best_effort(store.flush(), "games played");

        self.phase = SessionPhase::Running;
        log::info!("Game started");
        events.push(SessionEvent::Started);
        true
    }

    /// One point per wall bounce; advances the stage every `score_per_stage`
    pub fn add_score(&mut self, events: &mut Vec<SessionEvent>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.score += 1;
        events.push(SessionEvent::ScoreChanged { score: self.score });

        let new_stage = stage_for_score(self.score, self.score_per_stage);
        if new_stage != self.stage {
            self.stage = new_stage;
            log::info!("Stage {}", self.stage);
            events.push(SessionEvent::StageChanged {
                stage: self.stage,
                style: self.stage_style(),
            });
        }
        true
    }

    /// End the run; repeated calls do nothing
    pub fn game_over(
        &mut self,
        store: &mut dyn KeyValueStore,
        platform: &mut PlatformQueue,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        if self.is_over() {
            return false;
        }
        self.phase = SessionPhase::GameOver;

        let best = read_count(store, keys::BEST_SCORE);
        let new_best = self.score > best;
        if new_best {
            best_effort(
                store.set_int(keys::BEST_SCORE, i64::from(self.score)),
                "best score",
            );
            best_effort(store.flush(), "best score");
        }
        self.best_score = best.max(self.score);

        platform.push(PlatformRequest::SubmitScore(self.score));

        log::info!(
            "Game over: score {} (best {}{})",
            self.score,
            self.best_score,
            if new_best { ", new record" } else { "" }
        );
        events.push(SessionEvent::GameOver {
            score: self.score,
            best: self.best_score,
            new_best,
        });
        true
    }

    pub fn add_berry(&mut self, store: &mut dyn KeyValueStore, events: &mut Vec<SessionEvent>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.session_berries += 1;
        self.total_berries += 1;
        best_effort(
            store.set_int(keys::TOTAL_BERRIES, i64::from(self.total_berries)),
            "total berries",
        );
        events.push(SessionEvent::BerriesChanged {
            session: self.session_berries,
            total: self.total_berries,
        });
        true
    }

    /// Player-entered nickname; empty names are ignored
    pub fn update_nickname(
        &mut self,
        name: &str,
        store: &mut dyn KeyValueStore,
        platform: &mut PlatformQueue,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        best_effort(store.set_string(keys::USER_NICKNAME, name), "nickname");
        best_effort(store.flush(), "nickname");
        platform.push(PlatformRequest::SyncNickname(name.to_string()));
        self.set_nickname(name, events);
        true
    }

    /// Nickname from the platform profile
    pub fn set_nickname(&mut self, name: &str, events: &mut Vec<SessionEvent>) {
        if self.nickname.as_deref() == Some(name) {
            return;
        }
        log::info!("Nickname updated: {}", name);
        self.nickname = Some(name.to_string());
        events.push(SessionEvent::NicknameChanged(name.to_string()));
    }

    /// Ranking button
    pub fn open_leaderboard(&self, platform: &mut PlatformQueue) {
        platform.push(PlatformRequest::OpenLeaderboard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn running_session(store: &mut MemoryStore) -> GameSession {
        let mut session =
            GameSession::load(&SessionConfig::default(), ThemeConfig::default(), store);
        session.start_game_from_title(store, &mut Vec::new());
        session
    }

    #[test]
    fn test_start_counts_games_played_once() {
        let mut store = MemoryStore::with_entries([(keys::GAMES_PLAYED, "4")]);
        let mut session = GameSession::load(&SessionConfig::default(), ThemeConfig::default(), &store);
        let mut events = Vec::new();
        assert!(session.start_game_from_title(&mut store, &mut events));
        assert!(!session.start_game_from_title(&mut store, &mut events));
        assert_eq!(session.games_played, 5);
        assert_eq!(events, vec![SessionEvent::Started]);
        assert_eq!((&store as &dyn KeyValueStore).get_int(keys::GAMES_PLAYED, 0), 5);
    }

    #[test]
    fn test_score_ignored_outside_running() {
        let store = MemoryStore::new();
        let mut session = GameSession::load(&SessionConfig::default(), ThemeConfig::default(), &store);
        let mut events = Vec::new();
        assert!(!session.add_score(&mut events));
        assert_eq!(session.score, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_stage_change_restyles_exactly_once() {
        let mut store = MemoryStore::new();
        let mut session = running_session(&mut store);
        let mut events = Vec::new();
        for _ in 0..14 {
            session.add_score(&mut events);
        }
        assert_eq!(session.stage, 1);
        events.clear();

        session.add_score(&mut events);
        assert_eq!(session.score, 15);
        assert_eq!(session.stage, 2);
        let restyles = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::StageChanged { .. }))
            .count();
        assert_eq!(restyles, 1);

        events.clear();
        session.add_score(&mut events);
        assert_eq!(events, vec![SessionEvent::ScoreChanged { score: 16 }]);
    }

    #[test]
    fn test_stage_capped_at_ten() {
        let mut store = MemoryStore::new();
        let mut session = running_session(&mut store);
        for _ in 0..500 {
            session.add_score(&mut Vec::new());
        }
        assert_eq!(session.stage, MAX_STAGE);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut store = MemoryStore::with_entries([(keys::BEST_SCORE, "2")]);
        let mut session = running_session(&mut store);
        for _ in 0..3 {
            session.add_score(&mut Vec::new());
        }
        let mut platform = PlatformQueue::new();
        let mut events = Vec::new();
        let writes_before = store.writes;

        assert!(session.game_over(&mut store, &mut platform, &mut events));
        assert!(!session.game_over(&mut store, &mut platform, &mut events));

        assert_eq!(store.writes, writes_before + 1);
        assert_eq!((&store as &dyn KeyValueStore).get_int(keys::BEST_SCORE, 0), 3);
        assert_eq!(platform.len(), 1);
        assert_eq!(
            events,
            vec![SessionEvent::GameOver {
                score: 3,
                best: 3,
                new_best: true
            }]
        );
        // Dead runs don't score
        assert!(!session.add_score(&mut events));
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut store = MemoryStore::with_entries([(keys::BEST_SCORE, "40")]);
        let mut session = running_session(&mut store);
        session.add_score(&mut Vec::new());
        let mut events = Vec::new();
        session.game_over(&mut store, &mut PlatformQueue::new(), &mut events);
        assert_eq!(session.best_score, 40);
        assert_eq!((&store as &dyn KeyValueStore).get_int(keys::BEST_SCORE, 0), 40);
    }

    #[test]
    fn test_berries_persist_lifetime_total() {
        let mut store = MemoryStore::with_entries([(keys::TOTAL_BERRIES, "10")]);
        let mut session = running_session(&mut store);
        let mut events = Vec::new();
        session.add_berry(&mut store, &mut events);
        session.add_berry(&mut store, &mut events);
        assert_eq!(session.session_berries, 2);
        assert_eq!(session.total_berries, 12);
        assert_eq!((&store as &dyn KeyValueStore).get_int(keys::TOTAL_BERRIES, 0), 12);
    }

    #[test]
    fn test_nickname_update() {
        let mut store = MemoryStore::new();
        let mut session = running_session(&mut store);
        let mut platform = PlatformQueue::new();
        let mut events = Vec::new();
        assert!(!session.update_nickname("   ", &mut store, &mut platform, &mut events));
        assert!(session.update_nickname("birdie", &mut store, &mut platform, &mut events));
        assert_eq!(session.nickname.as_deref(), Some("birdie"));
        assert_eq!(
            platform.iter().next(),
            Some(&PlatformRequest::SyncNickname("birdie".to_string()))
        );
        assert_eq!(events, vec![SessionEvent::NicknameChanged("birdie".to_string())]);
    }

    #[test]
    fn test_stage_style_indices() {
        let theme = ThemeConfig {
            background_count: 3,
            berry_sprite_count: 2,
            ui_colors: vec![[1.0, 0.0, 0.0]],
        };
        let first = StageStyle::for_stage(1, &theme);
        assert_eq!(first.background_index, Some(0));
        assert_eq!(first.ui_color, [1.0, 0.0, 0.0, 0.6]);
        assert_eq!(first.berry_sprite_index, Some(0));

        let fifth = StageStyle::for_stage(5, &theme);
        assert_eq!(fifth.background_index, Some(1));
        assert_eq!(fifth.ui_color, [1.0, 1.0, 1.0, 0.6]);
        assert_eq!(fifth.berry_sprite_index, Some(0));
        assert_eq!(StageStyle::for_stage(3, &theme).berry_sprite_index, Some(1));

        let bare = StageStyle::for_stage(2, &ThemeConfig {
            background_count: 0,
            berry_sprite_count: 0,
            ui_colors: Vec::new(),
        });
        assert_eq!(bare.background_index, None);
        assert_eq!(bare.berry_sprite_index, None);
    }

    proptest! {
        #[test]
        fn prop_stage_tracks_score(score_per_stage in 1u32..40, bounces in 0usize..400) {
            let mut store = MemoryStore::new();
            let config = SessionConfig { score_per_stage };
            let mut session = GameSession::load(&config, ThemeConfig::default(), &store);
            session.start_game_from_title(&mut store, &mut Vec::new());
            let mut last_stage = session.stage;
            for _ in 0..bounces {
                session.add_score(&mut Vec::new());
                prop_assert_eq!(
                    session.stage,
                    (session.score / score_per_stage + 1).min(10)
                );
                prop_assert!(session.stage >= last_stage);
                last_stage = session.stage;
            }
        }
    }
}
