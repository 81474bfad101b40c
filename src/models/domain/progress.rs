use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

use crate::models::domain::checkpoint::MapCheckpoint;

/// A user's position on the map.
///
/// `current_checkpoint` is `None` either before any checkpoint exists or once
/// the last checkpoint has been completed. It only becomes `Some` again through
/// [`UserProgress::restart`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct UserProgress {
    pub current_checkpoint: Option<i32>,
    pub problems_solved_at_current: i32,
    pub total_checkpoints_completed: i32,
    pub total_map_problems_solved: i32,
    /// Problems already counted at the current checkpoint, so a re-sent
    /// answer is not counted twice.
    #[graphql(skip)]
    #[serde(default)]
    pub counted_problem_ids: Vec<String>,
    /// Bumped on every write; used as the compare-and-swap token.
    #[graphql(skip)]
    #[serde(default)]
    pub version: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Advancement {
    pub completed_checkpoint: i32,
    pub points_reward: i64,
    pub next_checkpoint: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// No current checkpoint; nothing changed.
    Idle,
    /// The problem was already counted at this checkpoint.
    AlreadyCounted,
    Counted { advanced: Option<Advancement> },
}

impl SolveOutcome {
    pub fn advancement(&self) -> Option<&Advancement> {
        match self {
            SolveOutcome::Counted { advanced } => advanced.as_ref(),
            _ => None,
        }
    }
}

impl UserProgress {
    pub fn starting_at(first: Option<&MapCheckpoint>) -> Self {
        UserProgress {
            current_checkpoint: first.map(|c| c.checkpoint_number),
            problems_solved_at_current: 0,
            total_checkpoints_completed: 0,
            total_map_problems_solved: 0,
            counted_problem_ids: Vec::new(),
            version: 0,
        }
    }

    pub fn is_journey_complete(&self) -> bool {
        self.current_checkpoint.is_none() && self.total_checkpoints_completed > 0
    }

    pub fn current<'a>(&self, map: &'a [MapCheckpoint]) -> Option<&'a MapCheckpoint> {
        let number = self.current_checkpoint?;
        map.iter().find(|c| c.checkpoint_number == number)
    }

    fn next<'a>(&self, map: &'a [MapCheckpoint]) -> Option<&'a MapCheckpoint> {
        let number = self.current_checkpoint?.checked_add(1)?;
        map.iter().find(|c| c.checkpoint_number == number)
    }

    pub fn can_advance(&self, map: &[MapCheckpoint]) -> bool {
        self.current(map)
            .is_some_and(|c| self.problems_solved_at_current >= c.problems_to_unlock)
    }

    pub fn has_counted(&self, problem_id: &str) -> bool {
        self.counted_problem_ids.iter().any(|id| id == problem_id)
    }

    /// Counts one solved problem at the current checkpoint and advances when
    /// the quota is reached.
    pub fn record_solve(&mut self, problem_id: &str, map: &[MapCheckpoint]) -> SolveOutcome {
        self.count_solve(problem_id, map, false)
    }

    /// Like [`UserProgress::record_solve`], but a problem already counted at
    /// this checkpoint counts again. For when no uncounted problem is left.
    pub fn record_repeat_solve(&mut self, problem_id: &str, map: &[MapCheckpoint]) -> SolveOutcome {
        self.count_solve(problem_id, map, true)
    }

    fn count_solve(&mut self, problem_id: &str, map: &[MapCheckpoint], allow_repeat: bool) -> SolveOutcome {
        if self.current(map).is_none() {
            return SolveOutcome::Idle;
        }
        if self.has_counted(problem_id) {
            if !allow_repeat {
                return SolveOutcome::AlreadyCounted;
            }
        } else {
            self.counted_problem_ids.push(problem_id.to_string());
        }

        self.problems_solved_at_current += 1;
        self.total_map_problems_solved += 1;

        let advanced = if self.can_advance(map) {
            self.advance(map)
        } else {
            None
        };

        SolveOutcome::Counted { advanced }
    }

    /// Moves past the current checkpoint. The reward is the reward of the
    /// checkpoint being completed.
    pub fn advance(&mut self, map: &[MapCheckpoint]) -> Option<Advancement> {
        if !self.can_advance(map) {
            return None;
        }
        let completed = self.current(map)?;
        let next_checkpoint = self.next(map).map(|c| c.checkpoint_number);

        let advancement = Advancement {
            completed_checkpoint: completed.checkpoint_number,
            points_reward: completed.points_reward,
            next_checkpoint,
        };

        self.current_checkpoint = next_checkpoint;
        self.problems_solved_at_current = 0;
        self.counted_problem_ids.clear();
        self.total_checkpoints_completed += 1;

        Some(advancement)
    }

    /// Explicitly puts the pointer back on the first checkpoint. Lifetime
    /// totals are kept.
    pub fn restart(&mut self, first: Option<&MapCheckpoint>) {
        self.current_checkpoint = first.map(|c| c.checkpoint_number);
        self.problems_solved_at_current = 0;
        self.counted_problem_ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> Vec<MapCheckpoint> {
        vec![
            MapCheckpoint::test_checkpoint(1, 3, 10),
            MapCheckpoint::test_checkpoint(2, 4, 15),
        ]
    }

    fn solve_n(progress: &mut UserProgress, map: &[MapCheckpoint], prefix: &str, n: usize) -> Vec<SolveOutcome> {
        (0..n)
            .map(|i| progress.record_solve(&format!("{}-{}", prefix, i), map))
            .collect()
    }

    #[test]
    fn starts_at_first_checkpoint_or_none() {
        let map = map();
        assert_eq!(UserProgress::starting_at(map.first()).current_checkpoint, Some(1));
        assert_eq!(UserProgress::starting_at(None).current_checkpoint, None);
    }

    #[test]
    fn required_solves_trigger_exactly_one_advance() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());

        let outcomes = solve_n(&mut progress, &map, "p", 3);
        let advances: Vec<_> = outcomes
            .iter()
            .filter_map(|o| match o {
                SolveOutcome::Counted { advanced: Some(a) } => Some(*a),
                _ => None,
            })
            .collect();

        assert_eq!(
            advances,
            vec![Advancement {
                completed_checkpoint: 1,
                points_reward: 10,
                next_checkpoint: Some(2),
            }]
        );
        assert_eq!(progress.current_checkpoint, Some(2));
        assert_eq!(progress.problems_solved_at_current, 0);
        assert_eq!(progress.total_checkpoints_completed, 1);
        assert_eq!(progress.total_map_problems_solved, 3);
    }

    #[test]
    fn one_extra_solve_does_not_advance_again() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());

        let outcomes = solve_n(&mut progress, &map, "p", 4);

        assert_eq!(outcomes[3], SolveOutcome::Counted { advanced: None });
        assert_eq!(progress.current_checkpoint, Some(2));
        assert_eq!(progress.problems_solved_at_current, 1);
        assert_eq!(progress.total_checkpoints_completed, 1);
    }

    #[test]
    fn same_problem_is_counted_once_per_checkpoint() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());

        progress.record_solve("p-1", &map);
        assert_eq!(progress.record_solve("p-1", &map), SolveOutcome::AlreadyCounted);
        assert_eq!(progress.problems_solved_at_current, 1);
    }

    #[test]
    fn repeat_solve_counts_a_problem_again() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());

        progress.record_solve("p-1", &map);
        progress.record_solve("p-2", &map);
        let outcome = progress.record_repeat_solve("p-1", &map);

        assert_eq!(outcome.advancement().map(|a| a.completed_checkpoint), Some(1));
        assert_eq!(progress.current_checkpoint, Some(2));
        assert!(!progress.has_counted("p-1"));
        assert_eq!(progress.total_map_problems_solved, 3);
    }

    #[test]
    fn repeat_solve_of_a_new_problem_is_an_ordinary_solve() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());

        assert_eq!(
            progress.record_repeat_solve("p-1", &map),
            SolveOutcome::Counted { advanced: None }
        );
        assert!(progress.has_counted("p-1"));
        assert_eq!(progress.counted_problem_ids.len(), 1);
    }

    #[test]
    fn advance_requires_quota() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());
        progress.record_solve("p-1", &map);

        assert!(!progress.can_advance(&map));
        assert_eq!(progress.advance(&map), None);
        assert_eq!(progress.current_checkpoint, Some(1));
    }

    #[test]
    fn completing_last_checkpoint_is_terminal() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());

        solve_n(&mut progress, &map, "a", 3);
        let outcomes = solve_n(&mut progress, &map, "b", 4);

        assert_eq!(
            outcomes.last(),
            Some(&SolveOutcome::Counted {
                advanced: Some(Advancement {
                    completed_checkpoint: 2,
                    points_reward: 15,
                    next_checkpoint: None,
                })
            })
        );
        assert_eq!(progress.current_checkpoint, None);
        assert!(progress.is_journey_complete());
        assert!(!progress.can_advance(&map));
        assert_eq!(progress.advance(&map), None);
        assert_eq!(progress.record_solve("c-1", &map), SolveOutcome::Idle);
        assert_eq!(progress.total_map_problems_solved, 7);
    }

    #[test]
    fn restart_reassigns_pointer_and_keeps_totals() {
        let map = map();
        let mut progress = UserProgress::starting_at(map.first());
        solve_n(&mut progress, &map, "a", 3);
        solve_n(&mut progress, &map, "b", 4);

        progress.restart(map.first());

        assert_eq!(progress.current_checkpoint, Some(1));
        assert_eq!(progress.problems_solved_at_current, 0);
        assert_eq!(progress.total_checkpoints_completed, 2);
    }

    #[test]
    fn gap_in_numbering_ends_the_journey() {
        let map = vec![
            MapCheckpoint::test_checkpoint(1, 1, 10),
            MapCheckpoint::test_checkpoint(3, 1, 30),
        ];
        let mut progress = UserProgress::starting_at(map.first());
        progress.record_solve("p", &map);

        assert_eq!(progress.current_checkpoint, None);
    }
}
