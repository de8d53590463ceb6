/// Bubble sort, one visible swap at a time.
use rand::Rng;

pub const BAR_COUNT: usize = 15;
pub const MIN_BAR: u32 = 10;
/// Exclusive upper bound on bar height.
pub const MAX_BAR: u32 = 60;

/// Pause after each swap when the sort is animated.
pub const SWAP_DELAY_MS: u64 = 150;

/// `BAR_COUNT` random heights in `[MIN_BAR, MAX_BAR)`.
pub fn random_bars(rng: &mut impl Rng) -> Vec<u32> {
    (0..BAR_COUNT).map(|_| rng.random_range(MIN_BAR..MAX_BAR)).collect()
}

/// A swap that was just applied, and the array after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapFrame {
    /// Left index of the swapped pair; the right one is `left + 1`.
    pub left: usize,
    pub values: Vec<u32>,
}

/// Resumable bubble sort. Only swaps produce frames; comparisons that leave
/// the pair in place are skipped silently.
#[derive(Debug, Clone)]
pub struct BubbleSort {
    values: Vec<u32>,
    /// Outer pass.
    pass: usize,
    /// Inner position within the pass.
    pos: usize,
    swaps: usize,
    comparisons: usize,
}

impl BubbleSort {
    pub fn new(values: Vec<u32>) -> Self {
        BubbleSort {
            values,
            pass: 0,
            pos: 0,
            swaps: 0,
            comparisons: 0,
        }
    }

    /// Run forward to the next out-of-order adjacent pair, swap it, and
    /// return the frame. `None` once the array is sorted.
    pub fn next_swap(&mut self) -> Option<SwapFrame> {
        let n = self.values.len();
        while n > 1 && self.pass < n - 1 {
            if self.pos >= n - self.pass - 1 {
                self.pass += 1;
                self.pos = 0;
                continue;
            }

            let j = self.pos;
            self.pos += 1;
            self.comparisons += 1;
            if self.values[j] > self.values[j + 1] {
                self.values.swap(j, j + 1);
                self.swaps += 1;
                return Some(SwapFrame {
                    left: j,
                    values: self.values.clone(),
                });
            }
        }
        None
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn swaps(&self) -> usize {
        self.swaps
    }

    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// True when the values are in non-decreasing order. That can happen
    /// before `next_swap` has run its last pass.
    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

impl Iterator for BubbleSort {
    type Item = SwapFrame;

    fn next(&mut self) -> Option<SwapFrame> {
        self.next_swap()
    }
}
