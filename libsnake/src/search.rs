use crate::snake::{Snake, SnakePair};
use crate::vbuf::KLineVec;
use crate::DiffError;

/// Run one forward iteration over the diagonals of the full rectangle.
///
/// Advances the frontier on every k-line of iteration d and reports the
/// snake that reached the far corner, if any did.
pub(crate) fn forward_step<T: PartialEq>(
    source: &[T],
    n: i64,
    dest: &[T],
    m: i64,
    v: &mut KLineVec,
    d: i64,
) -> Option<Snake> {
    let mut k = -d;
    while k <= d {
        let snake = Snake::calculate(v, k, d, source, 0, n, dest, 0, m);
        v.set(k, snake.x_end());
        if snake.x_end() >= n && snake.y_end() >= m {
            return Some(snake);
        }
        k += 2;
    }
    None
}

/// Reverse counterpart of [`forward_step`]; terminates at the near corner.
pub(crate) fn reverse_step<T: PartialEq>(
    source: &[T],
    n: i64,
    dest: &[T],
    m: i64,
    v: &mut KLineVec,
    d: i64,
) -> Option<Snake> {
    let delta = v.delta();
    let mut k = -d + delta;
    while k <= d + delta {
        let snake = Snake::calculate(v, k, d, source, 0, n, dest, 0, m);
        v.set(k, snake.x_end());
        if snake.x_end() <= 0 && snake.y_end() <= 0 {
            return Some(snake);
        }
        k += 2;
    }
    None
}

/// Find the middle snake of the rectangle (a0, n) x (b0, m).
///
/// Forward and reverse searches alternate one iteration at a time until
/// their frontiers cross. When n - m is odd the crossing can only show up
/// during a forward pass (total cost 2d - 1); when it is even, only during
/// a reverse pass (total cost 2d). A windowed copy of the advancing
/// frontier is recorded after every executed pass, including the one that
/// found the crossing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn middle<T: PartialEq>(
    source: &[T],
    a0: i64,
    n: i64,
    dest: &[T],
    b0: i64,
    m: i64,
    v_forward: &mut KLineVec,
    v_reverse: &mut KLineVec,
    mut forward_vs: Option<&mut Vec<KLineVec>>,
    mut reverse_vs: Option<&mut Vec<KLineVec>>,
) -> Result<SnakePair, DiffError> {
    let max_d = (n + m + 1) / 2;
    let delta = n - m;
    let even = delta % 2 == 0;

    v_forward.init_stub(n, m);
    v_reverse.init_stub(n, m);

    for d in 0..=max_d {
        let mut found = None;
        let mut k = -d;
        while k <= d {
            let snake = Snake::calculate(v_forward, k, d, source, a0, n, dest, b0, m);
            v_forward.set(k, snake.x_end() - a0);
            if !even
                && k >= delta - (d - 1)
                && k <= delta + (d - 1)
                && v_forward.get(k) >= v_reverse.get(k)
            {
                found = Some(snake);
                break;
            }
            k += 2;
        }
        if let Some(vs) = forward_vs.as_mut() {
            if let Ok(copy) = v_forward.create_copy(d, true, 0) {
                vs.push(copy);
            }
        }
        if let Some(snake) = found {
            return Ok(SnakePair {
                d: 2 * d - 1,
                forward: Some(snake),
                reverse: None,
            });
        }

        let mut found = None;
        let mut k = -d + delta;
        while k <= d + delta {
            let snake = Snake::calculate(v_reverse, k, d, source, a0, n, dest, b0, m);
            v_reverse.set(k, snake.x_end() - a0);
            if even && k >= -d && k <= d && v_reverse.get(k) <= v_forward.get(k) {
                found = Some(snake);
                break;
            }
            k += 2;
        }
        if let Some(vs) = reverse_vs.as_mut() {
            if let Ok(copy) = v_reverse.create_copy(d, false, delta) {
                vs.push(copy);
            }
        }
        if let Some(snake) = found {
            return Ok(SnakePair {
                d: 2 * d,
                forward: None,
                reverse: Some(snake),
            });
        }
    }

    Err(DiffError::SearchExhausted { max_d })
}

#[cfg(test)]
mod test {
    use super::*;

    fn run_middle(source: &[u8], dest: &[u8]) -> SnakePair {
        let n = source.len() as i64;
        let m = dest.len() as i64;
        let mut v_forward = KLineVec::linear(n, m, true);
        let mut v_reverse = KLineVec::linear(n, m, false);
        middle(
            source,
            0,
            n,
            dest,
            0,
            m,
            &mut v_forward,
            &mut v_reverse,
            None,
            None,
        )
        .expect("middle snake not found")
    }

    #[test]
    fn odd_delta_is_found_on_the_forward_pass() {
        let pair = run_middle(b"abcabba", b"cbabac");
        assert_eq!(pair.d % 2, 1);
        assert!(pair.forward.is_some());
        assert!(pair.reverse.is_none());
    }

    #[test]
    fn even_delta_is_found_on_the_reverse_pass() {
        let pair = run_middle(b"abcabba", b"cbabacx");
        assert_eq!(pair.d % 2, 0);
        assert!(pair.forward.is_none());
        assert!(pair.reverse.is_some());
    }

    #[test]
    fn equal_sequences_cross_at_zero_cost() {
        let pair = run_middle(b"abc", b"abc");
        assert_eq!(pair.d, 0);
        let snake = pair.reverse.expect("reverse snake");
        assert_eq!(snake.diagonal_length, 3);
        assert_eq!(snake.start_point(), (3, 3));
        assert_eq!(snake.end_point(), (0, 0));
    }

    #[test]
    fn snapshots_cover_every_executed_pass() {
        let source = b"abcabba";
        let dest = b"cbabac";
        let n = source.len() as i64;
        let m = dest.len() as i64;
        let mut v_forward = KLineVec::linear(n, m, true);
        let mut v_reverse = KLineVec::linear(n, m, false);
        let mut forward_vs = Vec::new();
        let mut reverse_vs = Vec::new();
        let pair = middle(
            source,
            0,
            n,
            dest,
            0,
            m,
            &mut v_forward,
            &mut v_reverse,
            Some(&mut forward_vs),
            Some(&mut reverse_vs),
        )
        .expect("middle snake not found");

        // crossing on the forward pass of iteration d: d + 1 forward
        // snapshots (one per executed pass), d reverse snapshots
        let d = (pair.d + 1) / 2;
        assert_eq!(forward_vs.len() as i64, d + 1);
        assert_eq!(reverse_vs.len() as i64, d);
        for (i, copy) in forward_vs.iter().enumerate() {
            assert_eq!(copy.max_size(), (i as i64).max(1));
        }
    }
}
