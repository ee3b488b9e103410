use crate::search::middle;
use crate::snake::{Snake, SnakeBuilder, SnakePair};
use crate::vbuf::KLineVec;
use crate::{DiffError, DiffResults};

/// Diff two sequences with the linear-space divide-and-conquer search.
///
/// The result holds the snakes in left-to-right order together with the
/// frontier snapshots recorded while splitting the top-level rectangle.
pub fn compare<T: PartialEq>(source: &[T], dest: &[T]) -> Result<DiffResults, DiffError> {
    let n = source.len() as i64;
    let m = dest.len() as i64;

    let mut v_forward = KLineVec::linear(n, m, true);
    let mut v_reverse = KLineVec::linear(n, m, false);
    let mut snakes = SnakeBuilder::default();
    let mut forward_vs = Vec::new();
    let mut reverse_vs = Vec::new();

    compare_rect(
        0,
        &mut snakes,
        Some(&mut forward_vs),
        Some(&mut reverse_vs),
        source,
        0,
        n,
        dest,
        0,
        m,
        &mut v_forward,
        &mut v_reverse,
    )?;

    Ok(DiffResults {
        snakes: snakes.into_vec(),
        forward_vs,
        reverse_vs,
    })
}

/// Solve one sub-rectangle: find its middle snake, recurse on what is left
/// above and below, and stitch everything onto the snake list in order.
///
/// The two frontier buffers are shared by every recursion level; the middle
/// search re-seeds them, and the strictly depth-first order means no two
/// live rectangles ever use them at once.
#[allow(clippy::too_many_arguments)]
fn compare_rect<T: PartialEq>(
    depth: u32,
    snakes: &mut SnakeBuilder,
    forward_vs: Option<&mut Vec<KLineVec>>,
    reverse_vs: Option<&mut Vec<KLineVec>>,
    source: &[T],
    a0: i64,
    n: i64,
    dest: &[T],
    b0: i64,
    m: i64,
    v_forward: &mut KLineVec,
    v_reverse: &mut KLineVec,
) -> Result<(), DiffError> {
    if m == 0 && n > 0 {
        snakes.push(Snake::run(true, a0, b0, n, 0, 0));
        return Ok(());
    }
    if n == 0 && m > 0 {
        snakes.push(Snake::run(true, a0, b0, 0, m, 0));
        return Ok(());
    }
    if n <= 0 || m <= 0 {
        return Ok(());
    }

    let SnakePair {
        d,
        mut forward,
        mut reverse,
    } = middle(
        source, a0, n, dest, b0, m, v_forward, v_reverse, forward_vs, reverse_vs,
    )?;

    if depth == 0 {
        if let Some(f) = forward.as_mut() {
            f.is_middle = true;
        }
        if let Some(r) = reverse.as_mut() {
            r.is_middle = true;
        }
    }

    if d > 1 {
        // top-left corner of the unsolved area above the middle snake,
        // bottom-right corner of the one below it
        let (x, y) = match (forward.as_ref(), reverse.as_ref()) {
            (Some(f), _) => f.start_point(),
            (_, Some(r)) => r.end_point(),
            _ => panic!("middle snake search returned an empty pair"),
        };
        let (u, w) = match (reverse.as_ref(), forward.as_ref()) {
            (Some(r), _) => r.start_point(),
            (_, Some(f)) => f.end_point(),
            _ => panic!("middle snake search returned an empty pair"),
        };

        compare_rect(
            depth + 1,
            snakes,
            None,
            None,
            source,
            a0,
            x - a0,
            dest,
            b0,
            y - b0,
            v_forward,
            v_reverse,
        )?;
        if let Some(f) = forward {
            snakes.push(f);
        }
        if let Some(r) = reverse {
            snakes.push(r);
        }
        compare_rect(
            depth + 1,
            snakes,
            None,
            None,
            source,
            u,
            a0 + n - u,
            dest,
            w,
            b0 + m - w,
            v_forward,
            v_reverse,
        )?;
    } else {
        // the whole rectangle is one snake plus at most a pure matching run
        // on the leading (forward) or trailing (reverse) diagonal
        if let Some(f) = forward {
            if f.x_start > a0 {
                if f.x_start - a0 != f.y_start - b0 {
                    return Err(DiffError::TraceMismatch {
                        d,
                        k: f.x_start - f.y_start,
                        expected: (f.x_start, b0 + (f.x_start - a0)),
                        actual: (f.x_start, f.y_start),
                    });
                }
                snakes.push(Snake::run(true, a0, b0, 0, 0, f.x_start - a0));
            }
            snakes.push(f);
        } else if let Some(r) = reverse {
            let trailing = (r.x_start, r.y_start);
            snakes.push(r);
            if trailing.0 < a0 + n {
                if a0 + n - trailing.0 != b0 + m - trailing.1 {
                    return Err(DiffError::TraceMismatch {
                        d,
                        k: trailing.0 - trailing.1,
                        expected: (trailing.0, b0 + m - (a0 + n - trailing.0)),
                        actual: trailing,
                    });
                }
                snakes.push(Snake::run(
                    true,
                    trailing.0,
                    trailing.1,
                    0,
                    0,
                    a0 + n - trailing.0,
                ));
            }
        }
    }

    Ok(())
}
