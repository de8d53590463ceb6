/// The two small animations: central-limit histogram and bubble sort.
use rand::Rng;
use shoestring_core::clt::{self, CltHistogram, BUCKET_COUNT};
use shoestring_core::sorting::{self, BubbleSort};
use std::time::Duration;

const HISTOGRAM_ROWS: usize = 12;

/// Vertical bar chart, tallest bucket = `rows` rows.
pub fn render_histogram(hist: &CltHistogram, rows: usize) -> String {
    let heights: Vec<usize> = hist
        .heights_percent()
        .iter()
        .map(|pct| (pct / 100.0 * rows as f64).round() as usize)
        .collect();

    let mut out = String::new();
    for row in (1..=rows).rev() {
        for &h in &heights {
            out.push_str(if h >= row { "██ " } else { "   " });
        }
        out.push('\n');
    }
    out.push_str(&"── ".repeat(BUCKET_COUNT));
    out.push('\n');
    out.push_str(&format!("{} samples\n", hist.sample_count()));
    out
}

/// One horizontal bar per value; the swapped pair is marked.
pub fn render_bars(values: &[u32], swapped: Option<usize>) -> String {
    let mut out = String::new();
    for (idx, &v) in values.iter().enumerate() {
        let marker = match swapped {
            Some(left) if idx == left || idx == left + 1 => '>',
            _ => ' ',
        };
        out.push_str(&format!("{marker}{:>3} {}\n", v, "█".repeat((v / 2) as usize)));
    }
    out
}

fn redraw(frame: &str) {
    // home the cursor and clear the screen before each frame
    print!("\x1b[H\x1b[2J{frame}");
}

pub async fn run_clt(batches: usize, no_delay: bool, rng: &mut impl Rng) {
    let mut hist = CltHistogram::new();
    for _ in 0..batches {
        for _ in 0..clt::BATCH_SIZE {
            hist.add_sample(rng);
            if !no_delay {
                redraw(&render_histogram(&hist, HISTOGRAM_ROWS));
                tokio::time::sleep(Duration::from_millis(clt::SAMPLE_DELAY_MS)).await;
            }
        }
    }
    if no_delay {
        print!("{}", render_histogram(&hist, HISTOGRAM_ROWS));
    }
    if let Some(mean) = hist.mean() {
        println!("Mean of sample means: {mean:.3} (expected 0.500)");
    }
}

pub async fn run_sort(no_delay: bool, rng: &mut impl Rng) {
    let mut sorter = BubbleSort::new(sorting::random_bars(rng));
    if !no_delay {
        redraw(&render_bars(sorter.values(), None));
    }

    while let Some(frame) = sorter.next_swap() {
        if !no_delay {
            redraw(&render_bars(&frame.values, Some(frame.left)));
            tokio::time::sleep(Duration::from_millis(sorting::SWAP_DELAY_MS)).await;
        }
    }

    if no_delay {
        print!("{}", render_bars(sorter.values(), None));
    }
    println!("Sorted with {} swaps over {} comparisons", sorter.swaps(), sorter.comparisons());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_histogram_has_rows_axis_and_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut hist = CltHistogram::new();
        hist.add_samples(&mut rng, 100);
        let text = render_histogram(&hist, 8);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8 + 2);
        // the tallest bucket reaches the top row
        assert!(lines[0].contains('█'));
        assert_eq!(lines[9], "100 samples");
    }

    #[test]
    fn test_empty_histogram_is_blank() {
        let text = render_histogram(&CltHistogram::new(), 4);
        assert!(!text.contains('█'));
    }

    #[test]
    fn test_bars_mark_swapped_pair() {
        let text = render_bars(&[10, 20, 30], Some(1));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with(' '));
        assert!(lines[1].starts_with('>'));
        assert!(lines[2].starts_with('>'));
        assert_eq!(lines[0].matches('█').count(), 5);
    }
}
