use crate::search::{forward_step, reverse_step};
use crate::snake::{Snake, SnakeBuilder};
use crate::vbuf::KLineVec;
use crate::{DiffError, DiffResults};

/// Diff two sequences with the greedy forward search.
///
/// Keeps a frontier snapshot per iteration and rebuilds the snake list by
/// walking the snapshots backward from the far corner, validating each hop
/// against the recorded frontier.
pub fn compare_greedy<T: PartialEq>(source: &[T], dest: &[T]) -> Result<DiffResults, DiffError> {
    let n = source.len() as i64;
    let m = dest.len() as i64;

    let mut v = KLineVec::full(n, m, true);
    v.init_stub(n, m);

    let mut vs = Vec::new();
    let mut finished = false;
    for d in 0..=n + m {
        let snake = forward_step(source, n, dest, m, &mut v, d);
        if let Ok(copy) = v.create_copy(d, true, 0) {
            vs.push(copy);
        }
        if snake.is_some() {
            finished = true;
            break;
        }
    }
    if !finished {
        return Err(DiffError::SearchExhausted { max_d: n + m });
    }

    let snakes = solve_forward(source, n, dest, m, &vs)?;
    Ok(DiffResults {
        snakes,
        forward_vs: vs,
        reverse_vs: Vec::new(),
    })
}

/// Reverse-direction counterpart of [`compare_greedy`]; walks the snapshots
/// forward from the near corner instead.
pub fn compare_greedy_reverse<T: PartialEq>(
    source: &[T],
    dest: &[T],
) -> Result<DiffResults, DiffError> {
    let n = source.len() as i64;
    let m = dest.len() as i64;

    let mut v = KLineVec::full(n, m, false);
    v.init_stub(n, m);
    let delta = v.delta();

    let mut vs = Vec::new();
    let mut finished = false;
    for d in 0..=n + m {
        let snake = reverse_step(source, n, dest, m, &mut v, d);
        if let Ok(copy) = v.create_copy(d, false, delta) {
            vs.push(copy);
        }
        if snake.is_some() {
            finished = true;
            break;
        }
    }
    if !finished {
        return Err(DiffError::SearchExhausted { max_d: n + m });
    }

    let snakes = solve_reverse(source, n, dest, m, &vs)?;
    Ok(DiffResults {
        snakes,
        forward_vs: Vec::new(),
        reverse_vs: vs,
    })
}

fn solve_forward<T: PartialEq>(
    source: &[T],
    n: i64,
    dest: &[T],
    m: i64,
    vs: &[KLineVec],
) -> Result<Vec<Snake>, DiffError> {
    let mut builder = SnakeBuilder::default();
    let mut p = (n, m);
    let mut d = vs.len() as i64 - 1;

    while d >= 0 && p != (0, 0) {
        let v = &vs[d as usize];
        let k = p.0 - p.1;
        let x_end = v.get(k);
        let y_end = v.y(k);
        if (x_end, y_end) != p {
            return Err(DiffError::TraceMismatch {
                d,
                k,
                expected: p,
                actual: (x_end, y_end),
            });
        }

        let snake = Snake::calculate(v, k, d, source, 0, n, dest, 0, m);
        if snake.end_point() != p {
            return Err(DiffError::TraceMismatch {
                d,
                k,
                expected: p,
                actual: snake.end_point(),
            });
        }

        p = snake.start_point();
        builder.prepend(snake);
        d -= 1;
    }

    if p != (0, 0) {
        return Err(DiffError::TraceMismatch {
            d: 0,
            k: p.0 - p.1,
            expected: (0, 0),
            actual: p,
        });
    }
    Ok(builder.into_vec())
}

fn solve_reverse<T: PartialEq>(
    source: &[T],
    n: i64,
    dest: &[T],
    m: i64,
    vs: &[KLineVec],
) -> Result<Vec<Snake>, DiffError> {
    let mut builder = SnakeBuilder::default();
    let mut p = (0, 0);
    let mut d = vs.len() as i64 - 1;

    while d >= 0 && p != (n, m) {
        let v = &vs[d as usize];
        let k = p.0 - p.1;
        let x_end = v.get(k);
        let y_end = v.y(k);
        if (x_end, y_end) != p {
            return Err(DiffError::TraceMismatch {
                d,
                k,
                expected: p,
                actual: (x_end, y_end),
            });
        }

        let snake = Snake::calculate(v, k, d, source, 0, n, dest, 0, m);
        if snake.end_point() != p {
            return Err(DiffError::TraceMismatch {
                d,
                k,
                expected: p,
                actual: snake.end_point(),
            });
        }

        p = snake.start_point();
        builder.push(snake);
        d -= 1;
    }

    if p != (n, m) {
        return Err(DiffError::TraceMismatch {
            d: 0,
            k: p.0 - p.1,
            expected: (n, m),
            actual: p,
        });
    }
    Ok(builder.into_vec())
}
