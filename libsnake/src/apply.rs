use crate::snake::Snake;

/// Rebuild the destination sequence from the source and a snake list.
///
/// Deleted elements are skipped by construction; every snake contributes
/// its inserted destination run and its matching source run, in the order
/// the snake's own geometry dictates.
pub fn apply<T: Clone>(snakes: &[Snake], source: &[T], dest: &[T]) -> Vec<T> {
    let mut out = Vec::new();
    for snake in snakes {
        if snake.forward {
            let y0 = snake.y_start as usize;
            out.extend_from_slice(&dest[y0..y0 + snake.inserted as usize]);
            let x0 = snake.x_mid() as usize;
            out.extend_from_slice(&source[x0..x0 + snake.diagonal_length as usize]);
        } else {
            let x0 = snake.x_end() as usize;
            out.extend_from_slice(&source[x0..x0 + snake.diagonal_length as usize]);
            let y0 = snake.y_mid() as usize;
            out.extend_from_slice(&dest[y0..y0 + snake.inserted as usize]);
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::snake::Snake;

    #[test]
    fn forward_snake_emits_insertion_then_match() {
        let source = b"abXcd";
        let dest = b"abYcd";
        let snakes = vec![
            Snake::run(true, 0, 0, 0, 0, 2),
            Snake::run(true, 2, 2, 1, 1, 2),
        ];
        assert_eq!(apply(&snakes, source, dest), dest);
    }

    #[test]
    fn reverse_snake_emits_match_then_insertion() {
        let source = b"cd";
        let dest = b"cdy";
        // reverse snake starting at the far corner: one insertion, then a
        // matching run back to the origin
        let snakes = vec![Snake::run(false, 2, 3, 0, 1, 2)];
        assert_eq!(apply(&snakes, source, dest), dest);
    }
}
