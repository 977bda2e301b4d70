//! Static row partitioning across workers.

/// Contiguous half-open range of matrix rows assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `[0, rows)` into `workers` contiguous, non-overlapping ranges.
///
/// Worker `i` gets `[i * base, (i + 1) * base)` with `base = rows / workers`;
/// the last range absorbs the `rows % workers` remainder. When
/// `workers > rows`, the excess ranges are empty — such workers still take
/// part in every barrier rendezvous but filter nothing.
pub fn partition_rows(rows: usize, workers: usize) -> Vec<RowRange> {
    debug_assert!(rows >= 1);
    debug_assert!(workers >= 1);

    let base = rows / workers;
    let mut ranges = Vec::with_capacity(workers);
    for i in 0..workers {
        let start = i * base;
        let end = if i == workers - 1 { rows } else { start + base };
        ranges.push(RowRange { start, end });
    }
    ranges
}
