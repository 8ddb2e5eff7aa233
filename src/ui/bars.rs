use ratatui::symbols::bar::NINE_LEVELS;

/// Height of one bar: `whole` full cells plus `eighths`/8 of the next cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarHeight {
    pub whole: usize,
    pub eighths: u8,
}

impl BarHeight {
    /// Glyph for the cell `row` cells above the baseline.
    pub fn cell(&self, row: usize) -> &'static str {
        if row < self.whole {
            NINE_LEVELS.full
        } else if row == self.whole {
            glyph(self.eighths)
        } else {
            NINE_LEVELS.empty
        }
    }
}

/// Partial-fill glyph for 0..=8 eighths of a cell.
pub fn glyph(eighths: u8) -> &'static str {
    match eighths {
        0 => NINE_LEVELS.empty,
        1 => NINE_LEVELS.one_eighth,
        2 => NINE_LEVELS.one_quarter,
        3 => NINE_LEVELS.three_eighths,
        4 => NINE_LEVELS.half,
        5 => NINE_LEVELS.five_eighths,
        6 => NINE_LEVELS.three_quarters,
        7 => NINE_LEVELS.seven_eighths,
        _ => NINE_LEVELS.full,
    }
}

/// Scale `series` so its maximum fills `available_height` cells.
///
/// An all-zero (or non-positive) series scales to empty bars. Negative values
/// render empty; the maximum lands exactly on `available_height`.
pub fn scale(series: &[f64], available_height: usize) -> Vec<BarHeight> {
    let max = series.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 || !max.is_finite() {
        return vec![BarHeight::default(); series.len()];
    }

    let height = available_height as f64;
    series
        .iter()
        .map(|&value| {
            let scaled = (value / max * height).clamp(0.0, height);
            if scaled.is_nan() {
                return BarHeight::default();
            }
            let whole = scaled.floor();
            let eighths = ((scaled - whole) * 8.0).floor() as u8;
            BarHeight {
                whole: whole as usize,
                eighths: eighths.min(7),
            }
        })
        .collect()
}
