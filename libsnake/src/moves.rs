use std::collections::{BinaryHeap, HashMap, HashSet};

use rayon::prelude::*;

use crate::linear::compare;
use crate::snake::Snake;
use crate::DiffError;

/// A run of inserted elements, addressed by the snake that carries it
#[derive(Eq, PartialEq, Debug, Clone, Ord, PartialOrd, Hash)]
pub struct InsertedRun {
    /// Which diff of the batch the run belongs to
    pub diff_idx: usize,
    /// Index of the carrying snake in that diff's snake list
    pub snake_idx: usize,
    /// Where in dest the inserted content is
    pub b_idx: usize,
    /// How many elements
    pub length: usize,
}

/// A run of deleted elements, addressed by the snake that carries it
#[derive(Eq, PartialEq, Debug, Clone, Ord, PartialOrd, Hash)]
pub struct DeletedRun {
    /// Which diff of the batch the run belongs to
    pub diff_idx: usize,
    /// Index of the carrying snake in that diff's snake list
    pub snake_idx: usize,
    /// Where in source the deleted content was
    pub a_idx: usize,
    /// How many elements
    pub length: usize,
}

/// A deletion and an insertion whose contents are the same elements; the
/// pair reads as content moved from one place to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveMatch {
    pub removal: DeletedRun,
    pub insertion: InsertedRun,
}

/// Every move found across the given diffs. Purely derived from the snake
/// lists; the lists themselves are never altered.
#[derive(Debug, Default)]
pub struct MatchedMoves {
    pub matches: Vec<MoveMatch>,
}

impl MatchedMoves {
    /// Whether any matched removal lives in the given snake
    pub fn removal_matched(&self, diff_idx: usize, snake_idx: usize) -> bool {
        self.matches
            .iter()
            .any(|m| m.removal.diff_idx == diff_idx && m.removal.snake_idx == snake_idx)
    }

    /// Whether any matched insertion lives in the given snake
    pub fn insertion_matched(&self, diff_idx: usize, snake_idx: usize) -> bool {
        self.matches
            .iter()
            .any(|m| m.insertion.diff_idx == diff_idx && m.insertion.snake_idx == snake_idx)
    }
}

/// Pull the insertion and removal runs out of a batch of snake lists,
/// remembering which snake each run came from
#[allow(clippy::type_complexity)]
fn runs_from_snakes(diffs: &[Vec<Snake>]) -> (Vec<InsertedRun>, Vec<DeletedRun>) {
    let mut insertions = Vec::new();
    let mut removals = Vec::new();
    for (diff_idx, snakes) in diffs.iter().enumerate() {
        for (snake_idx, snake) in snakes.iter().enumerate() {
            if snake.deleted > 0 {
                let a_idx = if snake.forward {
                    snake.x_start
                } else {
                    snake.x_mid()
                };
                removals.push(DeletedRun {
                    diff_idx,
                    snake_idx,
                    a_idx: a_idx as usize,
                    length: snake.deleted as usize,
                });
            }
            if snake.inserted > 0 {
                let b_idx = if snake.forward {
                    snake.y_start
                } else {
                    snake.y_mid()
                };
                insertions.push(InsertedRun {
                    diff_idx,
                    snake_idx,
                    b_idx: b_idx as usize,
                    length: snake.inserted as usize,
                });
            }
        }
    }
    (insertions, removals)
}

/// How similar the insertion and removal contents are. Score is the share
/// of elements that show up on both sides
fn run_match_score<T>(insertion: &InsertedRun, removal: &DeletedRun, a: &[T], b: &[T]) -> f32
where
    T: PartialEq,
{
    let removal_content = &a[removal.a_idx..removal.a_idx + removal.length];
    let total = (insertion.b_idx..insertion.b_idx + insertion.length).fold(0.0, |acc, b_idx| {
        if removal_content.contains(&b[b_idx]) {
            acc + 1.0
        } else {
            acc
        }
    });

    total / (removal.length + insertion.length) as f32
}

#[derive(PartialEq, Debug)]
struct MatchCandidate {
    score: f32,
    insertion: InsertedRun,
    removal: DeletedRun,
}

impl Eq for MatchCandidate {}

impl PartialOrd for MatchCandidate {
    fn partial_cmp(&self, rhs: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Ord for MatchCandidate {
    fn cmp(&self, rhs: &Self) -> std::cmp::Ordering {
        // Only the score orders candidates; the formula never yields NaN
        self.score.partial_cmp(&rhs.score).unwrap()
    }
}

/// Score every insertion against every removal in parallel, keeping the
/// candidates with any overlap at all
fn score_all_pairs<T, C>(
    insertions: &[InsertedRun],
    removals: &[DeletedRun],
    sources: &[C],
    dests: &[C],
) -> BinaryHeap<MatchCandidate>
where
    T: PartialEq + Sync,
    C: AsRef<[T]> + Sync,
{
    let mut combinations = Vec::with_capacity(insertions.len() * removals.len());
    for insertion_idx in 0..insertions.len() {
        for removal_idx in 0..removals.len() {
            combinations.push((insertion_idx, removal_idx));
        }
    }

    combinations
        .into_par_iter()
        .filter_map(|(insertion_idx, removal_idx)| {
            let insertion = &insertions[insertion_idx];
            let removal = &removals[removal_idx];

            let score = run_match_score(
                insertion,
                removal,
                sources[removal.diff_idx].as_ref(),
                dests[insertion.diff_idx].as_ref(),
            );

            if score > 0.0 {
                Some(MatchCandidate {
                    insertion: insertion.clone(),
                    removal: removal.clone(),
                    score,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Diff the removal content against the insertion content and cut both runs
/// into pieces that either fully match or do not match at all
#[allow(clippy::type_complexity)]
fn split_run_pair<T, C>(
    insertion: &InsertedRun,
    removal: &DeletedRun,
    sources: &[C],
    dests: &[C],
) -> Result<(Vec<InsertedRun>, Vec<DeletedRun>), DiffError>
where
    T: PartialEq,
    C: AsRef<[T]>,
{
    let insertion_content =
        &dests[insertion.diff_idx].as_ref()[insertion.b_idx..insertion.b_idx + insertion.length];
    let removal_content =
        &sources[removal.diff_idx].as_ref()[removal.a_idx..removal.a_idx + removal.length];

    // Matching runs in the diff of the two contents pair up one split
    // removal with one split insertion; leftover axis runs stay unpaired
    let results = compare(removal_content, insertion_content)?;

    let mut out_insertions = Vec::new();
    let mut out_removals = Vec::new();

    for snake in results.snakes.iter() {
        if snake.deleted > 0 {
            let a_idx = if snake.forward {
                snake.x_start
            } else {
                snake.x_mid()
            };
            out_removals.push(DeletedRun {
                a_idx: removal.a_idx + a_idx as usize,
                length: snake.deleted as usize,
                ..removal.clone()
            });
        }
        if snake.inserted > 0 {
            let b_idx = if snake.forward {
                snake.y_start
            } else {
                snake.y_mid()
            };
            out_insertions.push(InsertedRun {
                b_idx: insertion.b_idx + b_idx as usize,
                length: snake.inserted as usize,
                ..insertion.clone()
            });
        }
        if snake.diagonal_length > 0 {
            let (a_idx, b_idx) = if snake.forward {
                (snake.x_mid(), snake.y_mid())
            } else {
                (snake.x_end(), snake.y_end())
            };
            out_removals.push(DeletedRun {
                a_idx: removal.a_idx + a_idx as usize,
                length: snake.diagonal_length as usize,
                ..removal.clone()
            });
            out_insertions.push(InsertedRun {
                b_idx: insertion.b_idx + b_idx as usize,
                length: snake.diagonal_length as usize,
                ..insertion.clone()
            });
        }
    }

    Ok((out_insertions, out_removals))
}

fn replace_run_with_splits<U: PartialEq>(run: &U, splits: Vec<U>, runs: &mut Vec<U>) {
    let position = runs.iter().position(|r| r == run).unwrap();
    runs.splice(position..position + 1, splits);
}

/// Find moved content within and across the provided diffs.
///
/// Long runs are cut into smaller pieces until every candidate pair either
/// matches completely or not at all; complete pairs are reported as moves.
pub fn match_moves<'a, T, C>(
    diffs: &[Vec<Snake>],
    sources: &[C],
    dests: &[C],
) -> Result<MatchedMoves, DiffError>
where
    T: PartialEq + Sync + 'a,
    C: AsRef<[T]> + Sync,
{
    let (mut insertions, mut removals) = runs_from_snakes(diffs);

    let mut candidates = score_all_pairs(&insertions, &removals, sources, dests);

    let mut insertion_matches: HashMap<InsertedRun, DeletedRun> = HashMap::new();
    let mut removal_matches = HashSet::new();

    let mut ignored_removals = HashSet::new();
    let mut ignored_insertions = HashSet::new();

    while let Some(candidate) = candidates.pop() {
        if insertion_matches.contains_key(&candidate.insertion) {
            continue;
        }
        if removal_matches.contains(&candidate.removal) {
            continue;
        }
        if ignored_removals.contains(&candidate.removal) {
            continue;
        }
        if ignored_insertions.contains(&candidate.insertion) {
            continue;
        }

        let (mut split_insertions, mut split_removals) =
            split_run_pair(&candidate.insertion, &candidate.removal, sources, dests)?;

        if split_insertions.len() == 1 && split_removals.len() == 1 {
            insertion_matches.insert(split_insertions.pop().unwrap(), split_removals[0].clone());
            removal_matches.insert(split_removals.pop().unwrap());
            continue;
        }

        if split_removals.len() > 1 {
            replace_run_with_splits(&candidate.removal, split_removals.clone(), &mut removals);

            // Re-score the new removals against everything
            let new_candidates = score_all_pairs(&insertions, &split_removals, sources, dests);
            candidates.extend(new_candidates);

            ignored_removals.insert(candidate.removal.clone());
        }

        if split_insertions.len() > 1 {
            replace_run_with_splits(
                &candidate.insertion,
                split_insertions.clone(),
                &mut insertions,
            );

            let new_candidates = score_all_pairs(&split_insertions, &removals, sources, dests);
            candidates.extend(new_candidates);

            ignored_insertions.insert(candidate.insertion.clone());
        }
    }

    let mut matches: Vec<MoveMatch> = insertion_matches
        .into_iter()
        .map(|(insertion, removal)| MoveMatch { removal, insertion })
        .collect();
    matches.sort_by(|lhs, rhs| {
        (&lhs.removal, &lhs.insertion).cmp(&(&rhs.removal, &rhs.insertion))
    });

    Ok(MatchedMoves { matches })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::linear::compare;

    fn match_moves_unfailable<'a, T, C>(
        diffs: &[Vec<Snake>],
        sources: &[C],
        dests: &[C],
    ) -> MatchedMoves
    where
        T: PartialEq + Sync + 'a,
        C: AsRef<[T]> + Sync,
    {
        match_moves(diffs, sources, dests).expect("failed to match moves")
    }

    #[test]
    fn no_moves_in_identical_sequences() {
        let a = [1, 2, 3, 4];
        let b = [1, 2, 3, 4];
        let diff = compare(&a, &b).expect("diff failed").snakes;
        let matched = match_moves_unfailable(&[diff], &[a.as_slice()], &[b.as_slice()]);
        assert!(matched.matches.is_empty());
    }

    #[test]
    fn moved_block_is_matched() {
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        let b = [1, 2, 3, 6, 7, 8, 4, 5];
        let diff = compare(&a, &b).expect("diff failed").snakes;
        let matched = match_moves_unfailable(&[diff], &[a.as_slice()], &[b.as_slice()]);

        // the moved 4, 5 block is carried by one snake per element, so the
        // matches come out piecewise
        assert_eq!(matched.matches.len(), 2);
        let m0 = &matched.matches[0];
        assert_eq!((m0.removal.a_idx, m0.removal.length), (3, 1));
        assert_eq!((m0.insertion.b_idx, m0.insertion.length), (6, 1));
        let m1 = &matched.matches[1];
        assert_eq!((m1.removal.a_idx, m1.removal.length), (4, 1));
        assert_eq!((m1.insertion.b_idx, m1.insertion.length), (7, 1));
    }

    #[test]
    fn partial_overlap_is_split_before_matching() {
        let a1 = [4, 5, 6];
        let b1: [i32; 0] = [];
        let a2: [i32; 0] = [];
        let b2 = [4, 5];
        let diffs = vec![
            compare(&a1, &b1).expect("diff failed").snakes,
            compare(&a2, &b2).expect("diff failed").snakes,
        ];
        let matched = match_moves_unfailable(
            &diffs,
            &[a1.as_slice(), &a2],
            &[b1.as_slice(), &b2],
        );

        // the length-3 removal only shares its 4, 5 prefix with the
        // insertion; the run is cut and just the prefix matched
        assert_eq!(matched.matches.len(), 1);
        let m = &matched.matches[0];
        assert_eq!(
            (m.removal.diff_idx, m.removal.a_idx, m.removal.length),
            (0, 0, 2)
        );
        assert_eq!(
            (m.insertion.diff_idx, m.insertion.b_idx, m.insertion.length),
            (1, 0, 2)
        );
    }

    #[test]
    fn reordered_block_matches_elementwise() {
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        let b = [1, 2, 3, 6, 7, 8, 5, 4];
        let diff = compare(&a, &b).expect("diff failed").snakes;
        let matched = match_moves_unfailable(&[diff], &[a.as_slice()], &[b.as_slice()]);

        assert_eq!(matched.matches.len(), 2);
        for m in &matched.matches {
            assert_eq!(m.removal.length, 1);
            assert_eq!(m.insertion.length, 1);
        }
    }

    #[test]
    fn cross_diff_move() {
        let a1 = [1, 2, 3, 4, 5, 6, 7, 8];
        let b1 = [1, 2, 3, 4, 7, 8];
        let a2 = [1, 2, 3];
        let b2 = [1, 2, 5, 6, 3];
        let diffs = vec![
            compare(&a1, &b1).expect("diff failed").snakes,
            compare(&a2, &b2).expect("diff failed").snakes,
        ];
        let matched = match_moves_unfailable(
            &diffs,
            &[a1.as_slice(), &a2],
            &[b1.as_slice(), &b2],
        );

        assert_eq!(matched.matches.len(), 2);
        for m in &matched.matches {
            assert_eq!(m.removal.diff_idx, 0);
            assert_eq!(m.insertion.diff_idx, 1);
            assert_eq!((m.removal.length, m.insertion.length), (1, 1));
        }
        assert_eq!(
            (matched.matches[0].removal.a_idx, matched.matches[0].insertion.b_idx),
            (4, 2)
        );
        assert_eq!(
            (matched.matches[1].removal.a_idx, matched.matches[1].insertion.b_idx),
            (5, 3)
        );
    }

    #[test]
    fn matched_runs_point_back_at_their_snakes() {
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        let b = [1, 2, 3, 6, 7, 8, 4, 5];
        let diff = compare(&a, &b).expect("diff failed").snakes;
        let matched =
            match_moves_unfailable(std::slice::from_ref(&diff), &[a.as_slice()], &[b.as_slice()]);

        let m = &matched.matches[0];
        assert!(matched.removal_matched(0, m.removal.snake_idx));
        assert!(matched.insertion_matched(0, m.insertion.snake_idx));
        assert!(diff[m.removal.snake_idx].deleted > 0);
        assert!(diff[m.insertion.snake_idx].inserted > 0);
    }
}
