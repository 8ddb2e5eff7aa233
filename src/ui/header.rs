use ratatui::symbols::line;

use crate::app::App;
use crate::system::rate::TrackedField;
use crate::ui::style::span;

/// Visible width of the interface column.
const INTERFACE_COL: usize = 28;
/// Visible width of one direction's column: ` <bps:10> <pps:10> `.
const DIRECTION_COL: usize = 23;

/// Column labels:
///
///   Interface                    │ RX bps            pps │ TX bps            pps
pub fn label_row(app: &App) -> String {
    let cs = &app.color_scheme;
    format!(
        "{} {} {} {} {}",
        span(cs.interface, format!("{:<w$}", "Interface", w = INTERFACE_COL)),
        line::VERTICAL,
        span(cs.rx, format!("{:<10} {:>10}", "RX bps", "pps")),
        line::VERTICAL,
        span(cs.tx, format!("{:<10} {:>10}", "TX bps", "pps")),
    )
}

/// Instantaneous rates from the newest sample, under the labels.
pub fn value_row(app: &App) -> String {
    let cs = &app.color_scheme;
    let s = &app.latest;
    format!(
        "{} {} {} {} {}",
        span(
            cs.interface,
            format!("{:<w$}", format!("{}/{}", app.device, app.port), w = INTERFACE_COL)
        ),
        line::VERTICAL,
        span(
            cs.rx,
            format!(
                "{:>10} {:>10}",
                format_bytes_rate(s.get(TrackedField::RxBytes)),
                format_count_rate(s.get(TrackedField::RxPackets))
            )
        ),
        line::VERTICAL,
        span(
            cs.tx,
            format!(
                "{:>10} {:>10}",
                format_bytes_rate(s.get(TrackedField::TxBytes)),
                format_count_rate(s.get(TrackedField::TxPackets))
            )
        ),
    )
}

/// Rule under the header, joining the column separators.
pub fn separator_row() -> String {
    format!(
        "{}{}{}{}{}",
        line::HORIZONTAL.repeat(INTERFACE_COL + 1),
        line::HORIZONTAL_UP,
        line::HORIZONTAL.repeat(DIRECTION_COL),
        line::HORIZONTAL_UP,
        line::HORIZONTAL.repeat(DIRECTION_COL),
    )
}

/// Format a byte rate with binary suffixes: `512.00B`, `1.50KiB`, `3.25GiB`.
pub fn format_bytes_rate(num: f64) -> String {
    let mut num = num;
    for unit in ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"] {
        if num.abs() < 1024.0 {
            return format!("{:.2}{}B", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}YiB", num)
}

/// Format a count rate with decimal suffixes: `999.00`, `1.50K`, `2.00B`.
pub fn format_count_rate(num: f64) -> String {
    let mut num = num;
    for unit in ["", "K", "M", "B", "T"] {
        if num.abs() < 1000.0 {
            return format!("{:.2}{}", num, unit);
        }
        num /= 1000.0;
    }
    format!("{:.1}?", num)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_scheme::ColorSchemeId;
    use crate::system::rate::RateSample;
    use crate::ui::style::visible_width;

    #[test]
    fn bytes_use_binary_multiples() {
        assert_eq!(format_bytes_rate(0.0), "0.00B");
        assert_eq!(format_bytes_rate(1023.0), "1023.00B");
        assert_eq!(format_bytes_rate(1536.0), "1.50KiB");
        assert_eq!(format_bytes_rate(4608.0), "4.50KiB");
        assert_eq!(format_bytes_rate(12.5 * 1024.0 * 1024.0 * 1024.0), "12.50GiB");
        assert_eq!(format_bytes_rate(2.0 * 1024f64.powi(8)), "2.0YiB");
        assert_eq!(format_bytes_rate(-2048.0), "-2.00KiB");
    }

    #[test]
    fn counts_use_decimal_multiples() {
        assert_eq!(format_count_rate(999.0), "999.00");
        assert_eq!(format_count_rate(1500.0), "1.50K");
        assert_eq!(format_count_rate(2_000_000_000.0), "2.00B");
        assert_eq!(format_count_rate(5e15), "5.0?");
    }

    #[test]
    fn header_rows_have_fixed_width() {
        let mut app = App::new("mlx5_0", 1, 120, 30, ColorSchemeId::Default);
        app.record(RateSample::from_values([4000.0, 2000.0, 10.0, 20.0]));

        let labels = visible_width(&label_row(&app));
        assert_eq!(labels, INTERFACE_COL + 2 * DIRECTION_COL + 2);
        assert_eq!(visible_width(&value_row(&app)), labels);
        assert!(visible_width(&separator_row()) > labels);
    }

    #[test]
    fn column_separators_meet_the_rule() {
        let mut app = App::new("mlx5_0", 1, 120, 30, ColorSchemeId::Monochrome);
        app.record(RateSample::from_values([4000.0, 2000.0, 10.0, 20.0]));

        let rule: Vec<char> = separator_row().chars().collect();
        for row in [label_row(&app), value_row(&app)] {
            let cols: Vec<usize> = row
                .chars()
                .enumerate()
                .filter(|(_, c)| *c == '│')
                .map(|(i, _)| i)
                .collect();
            assert_eq!(cols, vec![29, 53]);
            for i in cols {
                assert_eq!(rule[i], '┴');
            }
        }
    }

    #[test]
    fn value_row_shows_formatted_rates() {
        let mut app = App::new("mlx5_0", 1, 120, 30, ColorSchemeId::Monochrome);
        app.record(RateSample::from_values([1536.0, 0.0, 1500.0, 0.0]));
        let row = value_row(&app);
        assert!(row.starts_with("mlx5_0/1 "));
        assert!(row.contains("1.50KiB"));
        assert!(row.contains("1.50K"));
    }
}
