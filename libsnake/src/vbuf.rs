use crate::DiffError;

/// Furthest-reaching frontier of a search, indexed by diagonal.
///
/// Diagonal k holds the largest (forward) or smallest (reverse) x reached on
/// the line x - y = k so far. The buffer is dense; a signed k is mapped to a
/// slot with a fixed offset so no per-access branching is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KLineVec {
    forward: bool,
    source_size: i64,
    dest_size: i64,
    max_size: i64,
    delta: i64,
    data: Box<[i64]>,
}

impl KLineVec {
    /// Frontier sized for the divide-and-conquer comparator, which never
    /// iterates past half the rectangle perimeter.
    pub(crate) fn linear(source_size: i64, dest_size: i64, forward: bool) -> KLineVec {
        let max_size = ((source_size + dest_size) / 2 + 1).max(1);
        Self::with_max_size(source_size, dest_size, forward, max_size)
    }

    /// Frontier sized for the greedy comparator, which may walk the whole
    /// perimeter of the rectangle.
    pub(crate) fn full(source_size: i64, dest_size: i64, forward: bool) -> KLineVec {
        let max_size = (source_size + dest_size).max(1);
        Self::with_max_size(source_size, dest_size, forward, max_size)
    }

    fn with_max_size(source_size: i64, dest_size: i64, forward: bool, max_size: i64) -> KLineVec {
        assert!(source_size >= 0);
        assert!(dest_size >= 0);
        KLineVec {
            forward,
            source_size,
            dest_size,
            max_size,
            delta: 0,
            data: vec![0; (2 * max_size + 1) as usize].into(),
        }
    }

    fn idx(&self, k: i64) -> usize {
        let idx = k - self.delta + self.max_size;
        debug_assert!(idx >= 0 && idx < self.data.len() as i64);
        idx as usize
    }

    pub fn get(&self, k: i64) -> i64 {
        self.data[self.idx(k)]
    }

    pub fn set(&mut self, k: i64, x: i64) {
        let idx = self.idx(k);
        self.data[idx] = x;
    }

    /// y-coordinate implied by the frontier entry on diagonal k.
    pub fn y(&self, k: i64) -> i64 {
        self.get(k) - k
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn max_size(&self) -> i64 {
        self.max_size
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// Seed the frontier for a (sub-)rectangle of the given size.
    ///
    /// The forward stub at k = 1 lets the first iteration start from (0, -1);
    /// the reverse stub at k = delta - 1 starts from (n, m + 1). Re-invoked
    /// on every recursion level, so only the stub slot is touched.
    pub(crate) fn init_stub(&mut self, source_size: i64, dest_size: i64) {
        if self.forward {
            self.delta = 0;
            self.set(1, 0);
        } else {
            self.delta = source_size - dest_size;
            self.set(self.delta - 1, source_size);
        }
    }

    /// Deep-copy the window of the frontier that iteration d has touched.
    ///
    /// The copy spans diagonals [delta - d', delta + d'] with d' = max(d, 1),
    /// which is everything trace reconstruction needs to re-derive the
    /// advance taken at d. Fails when the window would not fit in this
    /// buffer; the caller may skip the snapshot in that case.
    pub fn create_copy(
        &self,
        d: i64,
        forward: bool,
        delta_size: i64,
    ) -> Result<KLineVec, DiffError> {
        debug_assert!(!(forward && delta_size != 0));
        let dd = d.max(1);
        if dd > self.max_size {
            return Err(DiffError::SnapshotOverCapacity {
                requested: dd,
                capacity: self.max_size,
            });
        }

        let delta = if forward { 0 } else { delta_size };
        let start = (self.max_size - delta_size) - (dd - delta);
        let mut data = vec![0; (2 * dd + 1) as usize].into_boxed_slice();
        for (i, slot) in data.iter_mut().enumerate() {
            *slot = self.data[i + start as usize];
        }

        Ok(KLineVec {
            forward,
            source_size: self.source_size,
            dest_size: self.dest_size,
            max_size: dd,
            delta,
            data,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stubs() {
        let mut forward = KLineVec::linear(4, 3, true);
        forward.init_stub(4, 3);
        assert_eq!(forward.delta(), 0);
        assert_eq!(forward.get(1), 0);

        let mut reverse = KLineVec::linear(4, 3, false);
        reverse.init_stub(4, 3);
        assert_eq!(reverse.delta(), 1);
        assert_eq!(reverse.get(0), 4);
    }

    #[test]
    fn signed_k_round_trip() {
        let mut v = KLineVec::full(3, 3, true);
        for k in -3..=3 {
            v.set(k, k * 10);
        }
        for k in -3..=3 {
            assert_eq!(v.get(k), k * 10);
            assert_eq!(v.y(k), k * 10 - k);
        }
    }

    #[test]
    fn copy_keeps_center_aligned() {
        let mut v = KLineVec::linear(5, 5, true);
        v.init_stub(5, 5);
        for k in (-2..=2).step_by(2) {
            v.set(k, k + 3);
        }

        let copy = v.create_copy(2, true, 0).expect("copy failed");
        assert_eq!(copy.max_size(), 2);
        assert_eq!(copy.delta(), 0);
        for k in (-2..=2).step_by(2) {
            assert_eq!(copy.get(k), v.get(k));
        }
        // center slot of the window equals the frontier on the delta line
        assert_eq!(copy.get(copy.delta()), v.get(v.delta()));
    }

    #[test]
    fn copy_of_reverse_window() {
        let mut v = KLineVec::linear(6, 4, false);
        v.init_stub(6, 4);
        let delta = v.delta();
        for k in (delta - 2..=delta + 2).step_by(2) {
            v.set(k, k + 7);
        }

        let copy = v.create_copy(2, false, delta).expect("copy failed");
        assert_eq!(copy.delta(), delta);
        for k in (delta - 2..=delta + 2).step_by(2) {
            assert_eq!(copy.get(k), v.get(k));
        }
        assert_eq!(copy.get(copy.delta()), v.get(delta));
    }

    #[test]
    fn copy_window_floors_at_one() {
        let mut v = KLineVec::linear(2, 2, true);
        v.init_stub(2, 2);
        let copy = v.create_copy(0, true, 0).expect("copy failed");
        assert_eq!(copy.max_size(), 1);
        assert_eq!(copy.get(1), 0);
    }

    #[test]
    fn copy_over_capacity_is_an_error() {
        let v = KLineVec::linear(2, 2, true);
        assert!(matches!(
            v.create_copy(10, true, 0),
            Err(DiffError::SnapshotOverCapacity { requested: 10, capacity: 3 })
        ));
    }
}
