//! Game flow: turns taps into board operations and tracks the session.
//!
//! The core is synchronous. Each accepted action returns one [`Effects`]
//! batch for the host to render and marks the game busy; the host calls
//! [`Game::complete`] exactly once when the batch has finished playing.
//! Until then every tap and booster activation is ignored.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::rng::GameRng;
use crate::scoring::{booster_score, group_score};
use crate::types::{Cell, CollapseMove, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoosterKind {
    Bomb,
    Teleport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputMode {
    Normal,
    /// The next tap detonates a bomb.
    Bomb,
    TeleportSelectFirst,
    /// First teleport cell chosen; the next tap picks its partner.
    TeleportSelectSecond { first: Cell },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeKind {
    Win,
    Loss,
    /// Reshuffles ran out without producing a playable board.
    Stalemate,
}

impl OutcomeKind {
    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::Win => "Victory!",
            OutcomeKind::Loss => "Defeat!",
            OutcomeKind::Stalemate => "Game over!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub label: &'static str,
    pub score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuperSpawn {
    /// Position before the collapse; follow `moves` for where it lands.
    pub cell: Cell,
    pub kind: TileKind,
}

/// One batch of visual work produced by a resolved tap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Effects {
    /// Teleport pair, swapped before anything else plays.
    pub swap: Option<(Cell, Cell)>,
    /// The swap was undone; nothing else changed.
    pub rejected: bool,
    pub removed: Vec<Cell>,
    pub super_spawn: Option<SuperSpawn>,
    pub moves: Vec<CollapseMove>,
    pub score_gained: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum TapResult {
    Ignored,
    TeleportArmed(Cell),
    Dispatched(Effects),
}

/// What happened when the host reported a batch as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Settle {
    /// Nothing was outstanding.
    Idle,
    /// Input is accepted again.
    Ready,
    /// The board was shuffled; resync the view and call `complete` again.
    Reshuffled { attempt: u32 },
    Finished(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// Removal and collapse are playing; check the game state afterwards.
    Collapse,
    /// A rejected teleport is swapping back.
    SwapBack,
    /// A reshuffle is being shown; re-check availability afterwards.
    Resync,
}

pub struct Game {
    config: GameConfig,
    board: Board,
    score: u64,
    moves_left: u32,
    boosters: HashMap<BoosterKind, u32>,
    input_mode: InputMode,
    reshuffle_count: u32,
    pending: Option<Pending>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Start a game on a random board.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, GameRng::new())
    }

    pub fn with_rng(config: GameConfig, rng: GameRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.rows, config.cols, config.color_count, rng);
        Ok(Self::assemble(config, board))
    }

    /// Start a game on a prepared board whose size must match the config.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.rows() != config.rows || board.cols() != config.cols {
            return Err(ConfigError::Validation(format!(
                "board is {}x{} but config expects {}x{}",
                board.rows(),
                board.cols(),
                config.rows,
                config.cols
            )));
        }
        Ok(Self::assemble(config, board))
    }

    fn assemble(config: GameConfig, board: Board) -> Self {
        let boosters = HashMap::from([
            (BoosterKind::Bomb, config.bomb_max_count),
            (BoosterKind::Teleport, config.teleport_max_count),
        ]);
        Self {
            moves_left: config.max_moves,
            config,
            board,
            score: 0,
            boosters,
            input_mode: InputMode::Normal,
            reshuffle_count: 0,
            pending: None,
            outcome: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn booster_count(&self, kind: BoosterKind) -> u32 {
        self.boosters.get(&kind).copied().unwrap_or(0)
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn reshuffle_count(&self) -> u32 {
        self.reshuffle_count
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// A batch is still playing, or the game is over.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.outcome.is_some()
    }

    /// Arm a booster for the next tap. Re-arming replaces the current mode.
    ///
    /// Returns `false` without changing anything when the game is busy or the
    /// booster is used up.
    pub fn activate_booster(&mut self, kind: BoosterKind) -> bool {
        if self.is_busy() || self.booster_count(kind) == 0 {
            return false;
        }
        self.input_mode = match kind {
            BoosterKind::Bomb => InputMode::Bomb,
            BoosterKind::Teleport => InputMode::TeleportSelectFirst,
        };
        debug!("booster {kind:?} armed");
        true
    }

    pub fn tap(&mut self, cell: Cell) -> TapResult {
        if self.is_busy() || !self.board.in_bounds(cell.row, cell.col) {
            return TapResult::Ignored;
        }

        match self.input_mode {
            InputMode::Normal => self.tap_normal(cell),
            InputMode::Bomb => {
                self.input_mode = InputMode::Normal;
                self.detonate(cell)
            }
            InputMode::TeleportSelectFirst => {
                self.input_mode = InputMode::TeleportSelectSecond { first: cell };
                TapResult::TeleportArmed(cell)
            }
            InputMode::TeleportSelectSecond { first } => {
                self.input_mode = InputMode::Normal;
                self.teleport(first, cell)
            }
        }
    }

    fn tap_normal(&mut self, cell: Cell) -> TapResult {
        if self.moves_left == 0 {
            return TapResult::Ignored;
        }
        let Some(tile) = self.board.tile_at(cell) else {
            return TapResult::Ignored;
        };

        match tile.kind {
            TileKind::SuperRow => {
                let line = self.board.row_cells(cell.row);
                return self.clear_line(line);
            }
            TileKind::SuperColumn => {
                let line = self.board.column_cells(cell.col);
                return self.clear_line(line);
            }
            TileKind::Normal => {}
        }

        let group = self.board.find_group(cell.row, cell.col);
        if group.len() < self.config.min_group {
            return TapResult::Ignored;
        }

        self.moves_left -= 1;
        let gained = group_score(group.len());
        self.score = self.score.saturating_add(gained);

        if group.len() >= self.config.super_tile_threshold {
            let removed: Vec<Cell> = group.into_iter().filter(|&c| c != cell).collect();
            self.board.remove(&removed);
            let kind = self.board.roll_super_kind();
            self.board.set_kind(cell.row, cell.col, kind);
            debug!("super tile {kind:?} spawned at {cell:?}");
            return self.dispatch(Effects {
                removed,
                super_spawn: Some(SuperSpawn { cell, kind }),
                score_gained: gained,
                ..Effects::default()
            });
        }

        self.board.remove(&group);
        self.dispatch(Effects {
            removed: group,
            score_gained: gained,
            ..Effects::default()
        })
    }

    /// Super tile activation: costs a move, scores at the booster rate.
    fn clear_line(&mut self, line: Vec<Cell>) -> TapResult {
        self.moves_left -= 1;
        let gained = booster_score(line.len());
        self.score = self.score.saturating_add(gained);
        self.board.remove(&line);
        self.dispatch(Effects {
            removed: line,
            score_gained: gained,
            ..Effects::default()
        })
    }

    /// Bomb: costs the booster only, never a move.
    fn detonate(&mut self, cell: Cell) -> TapResult {
        let cells = self
            .board
            .cells_in_radius(cell.row, cell.col, self.config.bomb_radius);
        if cells.is_empty() {
            return TapResult::Ignored;
        }

        let gained = booster_score(cells.len());
        self.score = self.score.saturating_add(gained);
        self.use_booster(BoosterKind::Bomb);
        self.board.remove(&cells);
        self.dispatch(Effects {
            removed: cells,
            score_gained: gained,
            ..Effects::default()
        })
    }

    /// Teleport: swap, then keep the swap only if it forms a clearable group
    /// between two differently colored normal tiles. Costs the booster only.
    fn teleport(&mut self, first: Cell, second: Cell) -> TapResult {
        self.board.swap(first, second);
        let group1 = self.board.find_group(first.row, first.col);
        let group2 = self.board.find_group(second.row, second.col);
        let min = self.config.min_group;

        let accepted = match (self.board.tile_at(first), self.board.tile_at(second)) {
            (Some(a), Some(b)) => {
                (group1.len() >= min || group2.len() >= min)
                    && a.color != b.color
                    && !a.kind.is_super()
                    && !b.kind.is_super()
            }
            _ => false,
        };

        if !accepted {
            self.board.swap(first, second);
            self.pending = Some(Pending::SwapBack);
            debug!("teleport {first:?} <-> {second:?} rejected");
            return TapResult::Dispatched(Effects {
                swap: Some((first, second)),
                rejected: true,
                ..Effects::default()
            });
        }

        let removed: Vec<Cell> = [group1, group2]
            .into_iter()
            .filter(|g| g.len() >= min)
            .flatten()
            .collect();
        let gained = group_score(removed.len());
        self.score = self.score.saturating_add(gained);
        self.use_booster(BoosterKind::Teleport);
        self.board.remove(&removed);
        self.dispatch(Effects {
            swap: Some((first, second)),
            removed,
            score_gained: gained,
            ..Effects::default()
        })
    }

    fn use_booster(&mut self, kind: BoosterKind) {
        let count = self.boosters.entry(kind).or_insert(0);
        *count = count.saturating_sub(1);
    }

    fn dispatch(&mut self, mut effects: Effects) -> TapResult {
        effects.moves = self.board.collapse();
        self.pending = Some(Pending::Collapse);
        debug!(
            "dispatched: {} removed, {} moves, +{} (score {}, moves left {})",
            effects.removed.len(),
            effects.moves.len(),
            effects.score_gained,
            self.score,
            self.moves_left
        );
        TapResult::Dispatched(effects)
    }

    /// Host signal that the last dispatched batch finished playing.
    pub fn complete(&mut self) -> Settle {
        match self.pending.take() {
            None => Settle::Idle,
            Some(Pending::SwapBack) => Settle::Ready,
            Some(Pending::Collapse) => self.check_game_state(),
            Some(Pending::Resync) => {
                if self.board.has_available_moves() {
                    Settle::Ready
                } else {
                    self.try_reshuffle()
                }
            }
        }
    }

    fn check_game_state(&mut self) -> Settle {
        if self.score >= self.config.target_score {
            return self.finish(OutcomeKind::Win);
        }
        if self.moves_left == 0 {
            return self.finish(OutcomeKind::Loss);
        }
        if !self.board.has_available_moves() {
            return self.try_reshuffle();
        }
        Settle::Ready
    }

    fn try_reshuffle(&mut self) -> Settle {
        if self.reshuffle_count >= self.config.max_reshuffle {
            return self.finish(OutcomeKind::Stalemate);
        }
        self.reshuffle_count += 1;
        info!("no moves left, reshuffle {}", self.reshuffle_count);
        self.board.shuffle();
        self.pending = Some(Pending::Resync);
        Settle::Reshuffled {
            attempt: self.reshuffle_count,
        }
    }

    fn finish(&mut self, kind: OutcomeKind) -> Settle {
        let outcome = Outcome {
            kind,
            label: kind.label(),
            score: self.score,
        };
        info!("{} final score {}", outcome.label, outcome.score);
        self.outcome = Some(outcome);
        Settle::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_layout;
    use crate::types::TileColor;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn game_with(lines: &[&str], tweak: impl FnOnce(&mut GameConfig)) -> Game {
        init_logs();
        let layout = parse_layout(lines);
        let mut config = GameConfig {
            rows: layout.len(),
            cols: layout[0].len(),
            ..GameConfig::default()
        };
        tweak(&mut config);
        let board = Board::from_rows(layout, config.color_count, GameRng::from_seed(11)).unwrap();
        Game::with_board(config, board).unwrap()
    }

    fn game(lines: &[&str]) -> Game {
        game_with(lines, |_| {})
    }

    fn game_with_kind(lines: &[&str], at: Cell, kind: TileKind) -> Game {
        let mut g = game(lines);
        assert!(g.board.set_kind(at.row, at.col, kind));
        g
    }

    fn effects(result: TapResult) -> Effects {
        match result {
            TapResult::Dispatched(effects) => effects,
            other => panic!("expected a dispatched batch, got {other:?}"),
        }
    }

    fn sorted(mut cells: Vec<Cell>) -> Vec<Cell> {
        cells.sort();
        cells
    }

    fn column(game: &Game, col: usize) -> Vec<i8> {
        (0..game.board().rows())
            .map(|r| game.board().get(r, col).map_or(-1, |t| t.color.code()))
            .collect()
    }

    #[test]
    fn test_vertical_triple_clears_and_refills_column() {
        let mut g = game(&[
            "bgr",
            "byg",
            "brp",
        ]);
        let untouched = (column(&g, 1), column(&g, 2));

        let fx = effects(g.tap(Cell::new(1, 0)));
        assert_eq!(g.moves_left(), 19);
        assert_eq!(g.score(), 45);
        assert_eq!(fx.score_gained, 45);
        assert_eq!(
            sorted(fx.removed),
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
        );
        assert_eq!(
            fx.moves,
            vec![
                CollapseMove { from_row: -1, to_row: 2, col: 0 },
                CollapseMove { from_row: -1, to_row: 1, col: 0 },
                CollapseMove { from_row: -1, to_row: 0, col: 0 },
            ]
        );
        assert_eq!((column(&g, 1), column(&g, 2)), untouched);
        assert!(column(&g, 0).iter().all(|&c| c >= 0));

        assert!(g.is_busy());
        assert_eq!(g.tap(Cell::new(0, 1)), TapResult::Ignored);
        assert!(matches!(g.complete(), Settle::Ready | Settle::Reshuffled { .. }));
    }

    #[test]
    fn test_singleton_tap_is_ignored() {
        let mut g = game(&["bg", "gb"]);
        let before = g.board().snapshot();
        assert_eq!(g.tap(Cell::new(0, 0)), TapResult::Ignored);
        assert_eq!(g.moves_left(), 20);
        assert_eq!(g.score(), 0);
        assert!(!g.is_busy());
        assert_eq!(g.board().snapshot(), before);
        assert_eq!(g.complete(), Settle::Idle);
    }

    #[test]
    fn test_out_of_bounds_tap_is_ignored() {
        let mut g = game(&["bb", "gr"]);
        assert_eq!(g.tap(Cell::new(2, 0)), TapResult::Ignored);
        assert!(g.activate_booster(BoosterKind::Teleport));
        assert_eq!(g.tap(Cell::new(0, 9)), TapResult::Ignored);
        assert_eq!(g.input_mode(), InputMode::TeleportSelectFirst);
    }

    #[test]
    fn test_large_group_leaves_super_tile() {
        let mut g = game(&[
            "bbbgr",
            "bbyrg",
            "gypyp",
        ]);
        let tapped = Cell::new(1, 1);
        let fx = effects(g.tap(tapped));

        assert_eq!(fx.removed.len(), 4);
        assert!(!fx.removed.contains(&tapped));
        let spawn = fx.super_spawn.expect("group of five spawns a super tile");
        assert_eq!(spawn.cell, tapped);
        assert!(spawn.kind.is_super());
        assert_eq!(g.score(), 125);
        assert_eq!(g.moves_left(), 19);

        // Column 1 keeps the super tile in place: only row 0 above it was cleared.
        let tile = g.board().get(1, 1).unwrap();
        assert_eq!(tile.kind, spawn.kind);
        assert_eq!(tile.color, TileColor::Blue);
        assert!(!fx.moves.iter().any(|m| m.col == 1 && m.from_row == 1));
    }

    #[test]
    fn test_super_row_clears_whole_row() {
        let mut g = game_with_kind(&["bgr", "ypb", "gbp"], Cell::new(1, 1), TileKind::SuperRow);

        let fx = effects(g.tap(Cell::new(1, 1)));
        assert_eq!(fx.removed, vec![Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)]);
        assert_eq!(fx.score_gained, booster_score(3));
        assert_eq!(g.score(), 15);
        assert_eq!(g.moves_left(), 19);
        assert!(fx.super_spawn.is_none());
    }

    #[test]
    fn test_super_column_clears_whole_column() {
        let mut g = game_with_kind(&["bg", "yp", "gb"], Cell::new(2, 1), TileKind::SuperColumn);

        let fx = effects(g.tap(Cell::new(2, 1)));
        assert_eq!(fx.removed, vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)]);
        assert_eq!(fx.moves.iter().filter(|m| m.is_spawn()).count(), 3);
        assert!(fx.moves.iter().all(|m| m.col == 1));
        assert_eq!(g.moves_left(), 19);
    }

    #[test]
    fn test_bomb_costs_booster_not_move() {
        let mut g = game(&[
            "bgr",
            "ypb",
            "gbp",
        ]);
        assert!(g.activate_booster(BoosterKind::Bomb));
        assert_eq!(g.input_mode(), InputMode::Bomb);

        let fx = effects(g.tap(Cell::new(1, 1)));
        assert_eq!(fx.removed.len(), 9);
        assert_eq!(g.score(), 135);
        assert_eq!(g.moves_left(), 20);
        assert_eq!(g.booster_count(BoosterKind::Bomb), 1);
        assert_eq!(g.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_booster_clamps_at_zero() {
        let mut g = game_with(&["bgr", "ypb", "gbp"], |c| c.bomb_max_count = 1);
        assert!(g.activate_booster(BoosterKind::Bomb));
        effects(g.tap(Cell::new(0, 0)));
        assert_eq!(g.booster_count(BoosterKind::Bomb), 0);
        g.complete();

        assert!(!g.activate_booster(BoosterKind::Bomb));
        assert_eq!(g.input_mode(), InputMode::Normal);
        assert_eq!(g.booster_count(BoosterKind::Bomb), 0);
    }

    #[test]
    fn test_boosters_refused_while_busy() {
        let mut g = game(&["bb", "gr"]);
        effects(g.tap(Cell::new(0, 0)));
        assert!(!g.activate_booster(BoosterKind::Teleport));
        assert_eq!(g.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_teleport_forms_group() {
        let mut g = game(&[
            "bgg",
            "gry",
            "ybp",
        ]);
        assert!(g.activate_booster(BoosterKind::Teleport));
        assert_eq!(g.tap(Cell::new(0, 0)), TapResult::TeleportArmed(Cell::new(0, 0)));
        assert_eq!(
            g.input_mode(),
            InputMode::TeleportSelectSecond { first: Cell::new(0, 0) }
        );

        let fx = effects(g.tap(Cell::new(1, 0)));
        assert_eq!(fx.swap, Some((Cell::new(0, 0), Cell::new(1, 0))));
        assert!(!fx.rejected);
        // The moved blue tile forms no group, so only the greens go.
        assert_eq!(
            sorted(fx.removed),
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]
        );
        assert_eq!(g.score(), 45);
        assert_eq!(g.moves_left(), 20);
        assert_eq!(g.booster_count(BoosterKind::Teleport), 1);
        assert_eq!(g.input_mode(), InputMode::Normal);
        assert_eq!(g.board().get(1, 0).map(|t| t.color), Some(TileColor::Blue));
    }

    fn assert_teleport_rejected(mut g: Game, a: Cell, b: Cell) {
        let before = g.board().snapshot();
        let kinds: Vec<_> = (0..g.board().rows())
            .flat_map(|r| (0..g.board().cols()).map(move |c| (r, c)))
            .map(|(r, c)| g.board().get(r, c).map(|t| t.kind))
            .collect();

        assert!(g.activate_booster(BoosterKind::Teleport));
        g.tap(a);
        let fx = effects(g.tap(b));
        assert!(fx.rejected);
        assert!(fx.removed.is_empty() && fx.moves.is_empty());
        assert_eq!(g.board().snapshot(), before);
        let after: Vec<_> = (0..g.board().rows())
            .flat_map(|r| (0..g.board().cols()).map(move |c| (r, c)))
            .map(|(r, c)| g.board().get(r, c).map(|t| t.kind))
            .collect();
        assert_eq!(after, kinds);
        assert_eq!(g.booster_count(BoosterKind::Teleport), 2);
        assert_eq!(g.score(), 0);
        assert_eq!(g.input_mode(), InputMode::Normal);

        assert!(g.is_busy());
        assert_eq!(g.complete(), Settle::Ready);
        assert!(!g.is_busy());
    }

    #[test]
    fn test_teleport_rejects_same_color() {
        let g = game(&["bgg", "gry", "ybp"]);
        assert_teleport_rejected(g, Cell::new(0, 0), Cell::new(2, 1));
    }

    #[test]
    fn test_teleport_rejects_without_group() {
        let g = game(&["bgg", "gry", "ybp"]);
        assert_teleport_rejected(g, Cell::new(1, 1), Cell::new(2, 2));
    }

    #[test]
    fn test_teleport_rejects_super_tile() {
        let g = game_with_kind(&["bgg", "gry", "ybp"], Cell::new(0, 0), TileKind::SuperRow);
        assert_teleport_rejected(g, Cell::new(0, 0), Cell::new(1, 0));
    }

    #[test]
    fn test_reaching_target_wins_and_freezes() {
        let mut g = game_with(&["bbg", "gry", "ybp"], |c| c.target_score = 20);
        effects(g.tap(Cell::new(0, 0)));
        let settle = g.complete();
        let Settle::Finished(outcome) = settle else {
            panic!("expected a finished game, got {settle:?}");
        };
        assert_eq!(outcome.kind, OutcomeKind::Win);
        assert_eq!(outcome.label, "Victory!");
        assert_eq!(outcome.score, 20);
        assert_eq!(g.outcome(), Some(outcome));

        assert!(g.is_busy());
        assert_eq!(g.tap(Cell::new(2, 2)), TapResult::Ignored);
        assert!(!g.activate_booster(BoosterKind::Bomb));
        assert_eq!(g.complete(), Settle::Idle);
    }

    #[test]
    fn test_last_move_without_target_loses() {
        let mut g = game_with(&["bbg", "gry", "ybp"], |c| c.max_moves = 1);
        effects(g.tap(Cell::new(0, 1)));
        assert_eq!(g.moves_left(), 0);
        match g.complete() {
            Settle::Finished(outcome) => {
                assert_eq!(outcome.kind, OutcomeKind::Loss);
                assert_eq!(outcome.label, "Defeat!");
            }
            other => panic!("expected a loss, got {other:?}"),
        }
    }

    #[test]
    fn test_reshuffle_runs_out_into_stalemate() {
        // A lone cell can never have a neighbor, so no shuffle can help.
        let mut g = game_with(&["b"], |c| {
            c.min_group = 1;
            c.super_tile_threshold = 5;
        });
        effects(g.tap(Cell::new(0, 0)));

        for attempt in 1..=3 {
            assert_eq!(g.complete(), Settle::Reshuffled { attempt });
            assert!(g.is_busy());
        }
        match g.complete() {
            Settle::Finished(outcome) => {
                assert_eq!(outcome.kind, OutcomeKind::Stalemate);
                assert_eq!(outcome.label, "Game over!");
                assert_eq!(outcome.score, 5);
            }
            other => panic!("expected a stalemate, got {other:?}"),
        }
        assert_eq!(g.reshuffle_count(), 3);
    }

    #[test]
    fn test_teleport_joins_both_groups() {
        let mut g = game(&[
            "gbr",
            "bgp",
            "yry",
        ]);
        assert!(g.activate_booster(BoosterKind::Teleport));
        g.tap(Cell::new(0, 0));
        let fx = effects(g.tap(Cell::new(1, 0)));

        assert!(!fx.rejected);
        assert_eq!(
            sorted(fx.removed),
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );
        assert_eq!(fx.score_gained, group_score(4));
        assert_eq!(g.score(), 80);
        assert_eq!(g.moves_left(), 20);
        assert_eq!(g.booster_count(BoosterKind::Teleport), 1);
    }

    #[test]
    fn test_group_clears_same_colored_super_tile() {
        let mut g = game_with_kind(&["bbg", "gry", "ybp"], Cell::new(0, 1), TileKind::SuperColumn);

        let fx = effects(g.tap(Cell::new(0, 0)));
        assert_eq!(sorted(fx.removed), vec![Cell::new(0, 0), Cell::new(0, 1)]);
        assert_eq!(fx.score_gained, group_score(2));
        assert_eq!(g.moves_left(), 19);
        let supers_left = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .filter(|&(r, c)| g.board().get(r, c).is_some_and(|t| t.kind.is_super()))
            .count();
        assert_eq!(supers_left, 0);
    }

    #[test]
    fn test_huge_group_score_does_not_overflow() {
        init_logs();
        let config = GameConfig {
            rows: 200,
            cols: 200,
            color_count: 1,
            ..GameConfig::default()
        };
        let mut g = Game::with_rng(config, GameRng::from_seed(3)).unwrap();

        let fx = effects(g.tap(Cell::new(0, 0)));
        assert_eq!(fx.removed.len(), 39_999);
        assert_eq!(fx.score_gained, 8_000_000_000);
        assert_eq!(g.score(), 8_000_000_000);
        assert!(matches!(g.complete(), Settle::Finished(o) if o.kind == OutcomeKind::Win));
    }

    #[test]
    fn test_with_board_rejects_size_mismatch() {
        let board = Board::from_rows(parse_layout(&["bg"]), 5, GameRng::from_seed(0)).unwrap();
        assert!(Game::with_board(GameConfig::default(), board).is_err());
    }

    #[test]
    fn test_new_game_uses_config() {
        let g = Game::with_rng(GameConfig::default(), GameRng::from_seed(1)).unwrap();
        assert_eq!((g.board().rows(), g.board().cols()), (9, 9));
        assert_eq!(g.moves_left(), 20);
        assert_eq!(g.booster_count(BoosterKind::Bomb), 2);
        assert_eq!(g.booster_count(BoosterKind::Teleport), 2);
        assert_eq!(g.input_mode(), InputMode::Normal);
        assert!(!g.is_busy());
    }
}
