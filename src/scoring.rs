// Heuristic scoring and final move selection
//
// Scores are additive on top of a distance signal: the average Euclidean
// distance from the candidate cell to the first few segments of our own
// body. Food is avoided when healthy and sought when starving; hazards are
// penalized. Selection picks the best candidate, breaking near-ties at random
// so close decisions are not predictable.

use rand::Rng;
use std::cmp::Ordering;

use crate::config::{ScoringConfig, SolveOptions};
use crate::error::SolveError;
use crate::grid::Candidate;
use crate::types::{Battlesnake, Board, Coord, Direction, RulesetKind};

/// The outcome of selection: always a direction, plus the error when the
/// direction is only a random fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub direction: Direction,
    pub error: Option<SolveError>,
}

impl Selection {
    fn chosen(direction: Direction) -> Self {
        Selection { direction, error: None }
    }

    /// A uniformly random direction paired with `NoPossibleMove`
    pub fn fallback<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Selection {
            direction: random_direction(rng),
            error: Some(SolveError::NoPossibleMove),
        }
    }

    pub fn into_result(self) -> Result<Direction, SolveError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.direction),
        }
    }
}

/// Uniform choice over the four directions
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    let all = Direction::all();
    all[rng.random_range(0..all.len())]
}

/// Average distance from `coord` to the first `segments` cells of `body`
pub fn average_distance(body: &[Coord], segments: usize, coord: &Coord) -> f64 {
    let window = &body[..body.len().min(segments)];
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|b| b.distance(coord)).sum::<f64>() / window.len() as f64
}

/// Heuristic value of stepping onto `coord`. Higher is better.
pub fn score_coord(
    coord: &Coord,
    you: &Battlesnake,
    board: &Board,
    options: &SolveOptions,
    scoring: &ScoringConfig,
) -> f64 {
    let mut score = average_distance(&you.body, scoring.body_segments, coord);

    if board.has_food(coord) {
        if you.health >= scoring.satiated_health {
            score -= options.food_reward as f64;
        }
        if you.health <= scoring.starving_health {
            score += options.food_reward as f64;
        }
    }

    if board.is_hazard(coord) {
        score -= options.hazard_penalty as f64;
    }

    score
}

/// Scores every candidate, returning fresh annotated candidates in the same order
pub fn score_moves(
    candidates: &[Candidate],
    you: &Battlesnake,
    board: &Board,
    options: &SolveOptions,
    scoring: &ScoringConfig,
) -> Vec<Candidate> {
    candidates
        .iter()
        .map(|c| c.with_score(score_coord(&c.coord, you, board, options, scoring)))
        .collect()
}

/// Sorts candidates by descending score. Equal scores keep their order.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score_or_zero()
            .partial_cmp(&a.score_or_zero())
            .unwrap_or(Ordering::Equal)
    });
}

/// Chooses the direction to play from the surviving candidates.
///
/// * none: `NoPossibleMove` with a random fallback direction
/// * one: that candidate
/// * several: the best, unless the runner-up is within the confident margin,
///   in which case one of the two at random. Under the wrapped ruleset any
///   survivor may be chosen. `use_single_best_option` always takes the best.
pub fn pick_move<R: Rng + ?Sized>(
    candidates: &[Candidate],
    options: &SolveOptions,
    scoring: &ScoringConfig,
    ruleset: RulesetKind,
    rng: &mut R,
) -> Selection {
    match candidates {
        [] => Selection::fallback(rng),
        [only] => Selection::chosen(only.direction),
        _ => {
            let mut ranked = candidates.to_vec();
            rank(&mut ranked);

            if options.use_single_best_option {
                return Selection::chosen(ranked[0].direction);
            }

            if ruleset.wraps() {
                let idx = rng.random_range(0..ranked.len());
                return Selection::chosen(ranked[idx].direction);
            }

            let lead = ranked[0].score_or_zero() - ranked[1].score_or_zero();
            if lead >= scoring.confident_margin {
                return Selection::chosen(ranked[0].direction);
            }

            let idx = rng.random_range(0..2);
            Selection::chosen(ranked[idx].direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn c(x: i32, y: i32) -> Coord {
        Coord { x, y }
    }

    fn open_board() -> Board {
        Board {
            width: 11,
            height: 11,
            food: vec![],
            snakes: vec![],
            hazards: vec![],
        }
    }

    fn scored(direction: Direction, score: f64) -> Candidate {
        Candidate::new(direction.apply(&c(5, 5)), direction).with_score(score)
    }

    #[test]
    fn test_average_distance_uses_first_segments_only() {
        let body: Vec<Coord> = (0..12).map(|y| c(0, y)).collect();
        let near = average_distance(&body, 8, &c(3, 0));
        let window: f64 = (0..8).map(|y| c(0, y).distance(&c(3, 0))).sum::<f64>() / 8.0;
        assert!((near - window).abs() < 1e-9);
        assert_eq!(average_distance(&[], 8, &c(1, 1)), 0.0);
    }

    #[test]
    fn test_moving_away_from_body_scores_higher() {
        let you = Battlesnake::new("me", 100, vec![c(5, 5), c(4, 5), c(3, 5), c(2, 5), c(1, 5)]);
        let board = open_board();
        let options = SolveOptions::default();
        let scoring = ScoringConfig::default();

        let away = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        let sideways = score_coord(&c(5, 6), &you, &board, &options, &scoring);
        assert!(away > sideways);
    }

    #[test]
    fn test_food_is_avoided_when_satiated() {
        let you = Battlesnake::new("me", 70, vec![c(5, 5), c(4, 5)]);
        let mut board = open_board();
        let options = SolveOptions::default();
        let scoring = ScoringConfig::default();

        let without = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        board.food = vec![c(6, 5)];
        let with = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        assert!((without - with - options.food_reward as f64).abs() < 1e-9);
    }

    #[test]
    fn test_food_is_sought_when_starving() {
        let you = Battlesnake::new("me", 30, vec![c(5, 5), c(4, 5)]);
        let mut board = open_board();
        let options = SolveOptions::default();
        let scoring = ScoringConfig::default();

        let without = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        board.food = vec![c(6, 5)];
        let with = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        assert!((with - without - options.food_reward as f64).abs() < 1e-9);
    }

    #[test]
    fn test_food_is_neutral_at_moderate_health() {
        let you = Battlesnake::new("me", 50, vec![c(5, 5), c(4, 5)]);
        let mut board = open_board();
        let options = SolveOptions::default();
        let scoring = ScoringConfig::default();

        let without = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        board.food = vec![c(6, 5)];
        assert_eq!(score_coord(&c(6, 5), &you, &board, &options, &scoring), without);
    }

    #[test]
    fn test_hazard_is_penalized() {
        let you = Battlesnake::new("me", 50, vec![c(5, 5), c(4, 5)]);
        let mut board = open_board();
        let options = SolveOptions::default();
        let scoring = ScoringConfig::default();

        let without = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        board.hazards = vec![c(6, 5)];
        let with = score_coord(&c(6, 5), &you, &board, &options, &scoring);
        assert!((without - with - options.hazard_penalty as f64).abs() < 1e-9);
    }

    #[test]
    fn test_scoring_is_repeatable() {
        let you = Battlesnake::new("me", 100, vec![c(5, 5), c(5, 4), c(4, 4)]);
        let board = open_board();
        let options = SolveOptions::default();
        let scoring = ScoringConfig::default();
        let candidates: Vec<Candidate> = [Direction::Up, Direction::Left, Direction::Right]
            .iter()
            .map(|&d| c(5, 5).project(d))
            .collect();

        let mut first = score_moves(&candidates, &you, &board, &options, &scoring);
        let mut second = score_moves(&candidates, &you, &board, &options, &scoring);
        rank(&mut first);
        rank(&mut second);

        let a: Vec<_> = first.iter().map(|c| (c.direction, c.score)).collect();
        let b: Vec<_> = second.iter().map(|c| (c.direction, c.score)).collect();
        assert_eq!(a, b);
        assert!(candidates.iter().all(|c| c.score.is_none()));
    }

    #[test]
    fn test_rank_sorts_descending() {
        let mut candidates = vec![
            scored(Direction::Up, 1.0),
            scored(Direction::Down, 7.0),
            scored(Direction::Left, 3.0),
        ];
        rank(&mut candidates);
        let order: Vec<_> = candidates.iter().map(|c| c.direction).collect();
        assert_eq!(order, vec![Direction::Down, Direction::Left, Direction::Up]);
    }

    #[test]
    fn test_pick_move_empty_falls_back() {
        let mut rng = StdRng::seed_from_u64(7);
        let selection = pick_move(
            &[],
            &SolveOptions::default(),
            &ScoringConfig::default(),
            RulesetKind::Standard,
            &mut rng,
        );
        assert_eq!(selection.error, Some(SolveError::NoPossibleMove));
        assert!(Direction::all().contains(&selection.direction));
        assert!(selection.into_result().is_err());
    }

    #[test]
    fn test_pick_move_single_candidate() {
        let mut rng = StdRng::seed_from_u64(7);
        let selection = pick_move(
            &[scored(Direction::Left, -100.0)],
            &SolveOptions::default(),
            &ScoringConfig::default(),
            RulesetKind::Standard,
            &mut rng,
        );
        assert_eq!(selection.into_result(), Ok(Direction::Left));
    }

    #[test]
    fn test_pick_move_confident_margin() {
        let candidates = [
            scored(Direction::Up, 1.0),
            scored(Direction::Right, 9.0),
            scored(Direction::Down, 4.9),
        ];
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = pick_move(
                &candidates,
                &SolveOptions::default(),
                &ScoringConfig::default(),
                RulesetKind::Standard,
                &mut rng,
            );
            assert_eq!(selection.into_result(), Ok(Direction::Right));
        }
    }

    #[test]
    fn test_pick_move_tie_chooses_between_top_two() {
        let candidates = [
            scored(Direction::Up, 5.0),
            scored(Direction::Right, 6.0),
            scored(Direction::Down, -10.0),
        ];
        let mut seen = HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = pick_move(
                &candidates,
                &SolveOptions::default(),
                &ScoringConfig::default(),
                RulesetKind::Standard,
                &mut rng,
            );
            seen.insert(selection.into_result().unwrap());
        }
        let expected: HashSet<Direction> = [Direction::Up, Direction::Right].into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_pick_move_single_best_option_is_deterministic() {
        let candidates = [scored(Direction::Up, 5.0), scored(Direction::Right, 6.0)];
        let options = SolveOptions {
            use_single_best_option: true,
            ..SolveOptions::default()
        };
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = pick_move(
                &candidates,
                &options,
                &ScoringConfig::default(),
                RulesetKind::Standard,
                &mut rng,
            );
            assert_eq!(selection.direction, Direction::Right);
        }
    }

    #[test]
    fn test_pick_move_wrapped_ignores_margin() {
        let candidates = [
            scored(Direction::Up, 100.0),
            scored(Direction::Right, 1.0),
            scored(Direction::Down, 0.0),
        ];
        let mut seen = HashSet::new();
        for seed in 0..128 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = pick_move(
                &candidates,
                &SolveOptions::default(),
                &ScoringConfig::default(),
                RulesetKind::Wrapped,
                &mut rng,
            );
            seen.insert(selection.direction);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_move_same_seed_same_choice() {
        let candidates = [scored(Direction::Up, 5.0), scored(Direction::Right, 6.0)];
        let pick = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            pick_move(
                &candidates,
                &SolveOptions::default(),
                &ScoringConfig::default(),
                RulesetKind::Standard,
                &mut rng,
            )
        };
        assert_eq!(pick(42), pick(42));
    }
}
