use crate::vbuf::KLineVec;

/// One segment of a diff path: up to one axis move (a deletion from the
/// source or an insertion from the destination), followed by a run of
/// matching elements.
///
/// Coordinates are absolute within the top-level rectangle. A forward snake
/// extends down-right from its start, a reverse snake up-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// x of the starting vertex
    pub x_start: i64,
    /// y of the starting vertex
    pub y_start: i64,
    /// How many source elements the axis move removes
    pub deleted: i64,
    /// How many destination elements the axis move inserts
    pub inserted: i64,
    /// Length of the matching run after the axis move
    pub diagonal_length: i64,
    /// Search direction this snake was found in
    pub forward: bool,
    /// Offset between forward and reverse diagonals of the rectangle the
    /// snake was found in. Zero for forward snakes.
    pub delta: i64,
    /// Whether this snake split the top-level rectangle
    pub is_middle: bool,
    /// Iteration count the snake was found at, when known
    pub d: Option<i64>,
}

impl Snake {
    /// A snake with explicit move counts and no axis/diagonal derivation.
    pub(crate) fn run(
        forward: bool,
        x_start: i64,
        y_start: i64,
        deleted: i64,
        inserted: i64,
        diagonal_length: i64,
    ) -> Snake {
        Snake {
            x_start,
            y_start,
            deleted,
            inserted,
            diagonal_length,
            forward,
            delta: 0,
            is_middle: false,
            d: None,
        }
    }

    fn axis_move(
        forward: bool,
        delta: i64,
        x_start: i64,
        y_start: i64,
        down: bool,
        diagonal_length: i64,
    ) -> Snake {
        Snake {
            x_start,
            y_start,
            deleted: if down { 0 } else { 1 },
            inserted: if down { 1 } else { 0 },
            diagonal_length,
            forward,
            delta,
            is_middle: false,
            d: None,
        }
    }

    /// Advance one step from the frontier on diagonal k at iteration d.
    ///
    /// Picks the adjacent diagonal to move from, takes the single axis move,
    /// then follows matching elements as far as they go. (a0, b0) translate
    /// the rectangle-local frontier coordinates into absolute ones.
    pub(crate) fn calculate<T: PartialEq>(
        v: &KLineVec,
        k: i64,
        d: i64,
        source: &[T],
        a0: i64,
        n: i64,
        dest: &[T],
        b0: i64,
        m: i64,
    ) -> Snake {
        let mut snake = if v.is_forward() {
            let down = k == -d || (k != d && v.get(k - 1) < v.get(k + 1));
            let x_start = if down { v.get(k + 1) } else { v.get(k - 1) };
            let y_start = x_start - if down { k + 1 } else { k - 1 };
            let mut x_end = if down { x_start } else { x_start + 1 };
            let mut y_end = x_end - k;

            let mut diagonal = 0;
            while x_end < n
                && y_end < m
                && source[(x_end + a0) as usize] == dest[(y_end + b0) as usize]
            {
                x_end += 1;
                y_end += 1;
                diagonal += 1;
            }

            Snake::axis_move(true, 0, x_start + a0, y_start + b0, down, diagonal)
        } else {
            let delta = v.delta();
            let up = k == d + delta || (k != -d + delta && v.get(k - 1) < v.get(k + 1));
            let x_start = if up { v.get(k - 1) } else { v.get(k + 1) };
            let y_start = x_start - if up { k - 1 } else { k + 1 };
            let mut x_end = if up { x_start } else { x_start - 1 };
            let mut y_end = x_end - k;

            let mut diagonal = 0;
            while x_end > 0
                && y_end > 0
                && source[(x_end + a0 - 1) as usize] == dest[(y_end + b0 - 1) as usize]
            {
                x_end -= 1;
                y_end -= 1;
                diagonal += 1;
            }

            Snake::axis_move(false, delta, x_start + a0, y_start + b0, up, diagonal)
        };
        snake.d = Some(d);
        snake.remove_stubs(a0, n, b0, m);
        snake
    }

    /// Cancel the phantom insertion the frontier stubs introduce at the
    /// rectangle boundary.
    ///
    /// The forward stub makes the very first step look like an insertion
    /// from (a0, b0 - 1); the reverse stub mirrors it at (a0 + n, b0 + m + 1).
    /// Idempotent: a corrected snake no longer matches either pattern.
    pub(crate) fn remove_stubs(&mut self, a0: i64, n: i64, b0: i64, m: i64) {
        if self.inserted != 1 {
            return;
        }
        if self.forward {
            if self.x_start == a0 && self.y_start == b0 - 1 {
                self.y_start += 1;
                self.inserted = 0;
            }
        } else if self.x_start == a0 + n && self.y_start == b0 + m + 1 {
            self.y_start -= 1;
            self.inserted = 0;
        }
    }

    /// x after the axis move
    pub fn x_mid(&self) -> i64 {
        if self.forward {
            self.x_start + self.deleted
        } else {
            self.x_start - self.deleted
        }
    }

    /// y after the axis move
    pub fn y_mid(&self) -> i64 {
        if self.forward {
            self.y_start + self.inserted
        } else {
            self.y_start - self.inserted
        }
    }

    /// x after the matching run
    pub fn x_end(&self) -> i64 {
        if self.forward {
            self.x_mid() + self.diagonal_length
        } else {
            self.x_mid() - self.diagonal_length
        }
    }

    /// y after the matching run
    pub fn y_end(&self) -> i64 {
        if self.forward {
            self.y_mid() + self.diagonal_length
        } else {
            self.y_mid() - self.diagonal_length
        }
    }

    pub fn start_point(&self) -> (i64, i64) {
        (self.x_start, self.y_start)
    }

    pub fn end_point(&self) -> (i64, i64) {
        (self.x_end(), self.y_end())
    }

    /// Absorb a neighboring snake into this one.
    ///
    /// Both must run in the same direction and move along the same axis. The
    /// merged record keeps a single matching run, so the segment earlier
    /// along the path direction has to be axis-only; otherwise the merge
    /// would re-order moves and change what the path keeps. Returns false
    /// and leaves self untouched when the records cannot merge.
    pub fn append(&mut self, other: &Snake) -> bool {
        if self.forward != other.forward {
            return false;
        }

        let same_axis = (self.deleted > 0) == (other.deleted > 0)
            && (self.inserted > 0) == (other.inserted > 0);
        let has_axis = self.deleted > 0 || self.inserted > 0;
        let combined = (self.deleted > 0 && self.inserted > 0)
            || (other.deleted > 0 && other.inserted > 0);
        if !same_axis || !has_axis || combined {
            return false;
        }

        let leading_diagonal = if self.forward {
            self.diagonal_length
        } else {
            other.diagonal_length
        };
        if leading_diagonal != 0 {
            return false;
        }

        self.deleted += other.deleted;
        self.inserted += other.inserted;
        self.diagonal_length += other.diagonal_length;
        let contract = if self.forward {
            other.x_start < self.x_start
        } else {
            other.x_start > self.x_start
        };
        if contract {
            self.x_start = other.x_start;
            self.y_start = other.y_start;
        }
        true
    }
}

/// Outcome of a middle-snake search: the iteration count the frontiers
/// crossed at, and the snake of whichever pass noticed the crossing.
#[derive(Debug, Clone)]
pub struct SnakePair {
    pub d: i64,
    pub forward: Option<Snake>,
    pub reverse: Option<Snake>,
}

/// Helper to assemble a snake sequence, merging a new snake into the
/// neighboring end of the list whenever the records allow it.
#[derive(Debug, Default)]
pub(crate) struct SnakeBuilder {
    seq: Vec<Snake>,
}

impl SnakeBuilder {
    pub(crate) fn push(&mut self, snake: Snake) {
        if let Some(tail) = self.seq.last_mut() {
            if tail.append(&snake) {
                return;
            }
        }
        self.seq.push(snake);
    }

    pub(crate) fn prepend(&mut self, mut snake: Snake) {
        if let Some(head) = self.seq.first() {
            if snake.append(head) {
                self.seq[0] = snake;
                return;
            }
        }
        self.seq.insert(0, snake);
    }

    pub(crate) fn into_vec(self) -> Vec<Snake> {
        self.seq
    }
}
