pub mod bars;
pub mod chart;
pub mod header;
pub mod style;

use ratatui::symbols::border;

use crate::app::App;
use style::fit_to_width;

/// Header rows between the top border and the chart: labels, values, rule.
pub const HEADER_ROWS: usize = 3;

/// Render the complete frame: exactly `app.rows` lines, each exactly
/// `app.cols` columns wide.
///
/// ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┓
/// ┃Interface  │ RX bps  pps │ TX bps  pps┃
/// ┃mlx5_0     │ 3.91KiB 10  │ 1.95KiB 20 ┃
/// ┃───────────┴─────────────┴────────────┃
/// ┃    ▂▄▆█ ██▆▄▂                        ┃   (chart, one row per cell of height)
/// ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛
pub fn draw(app: &App) -> Vec<String> {
    let cols = app.cols as usize;
    let rows = app.rows as usize;
    let inner = cols.saturating_sub(2);
    let set = border::THICK;

    let mut lines = Vec::with_capacity(rows);
    lines.push(rule(set.top_left, set.horizontal_top, set.top_right, inner));

    // Space between the borders; header rows drop off on very short terminals.
    let middle = rows.saturating_sub(2);
    let header_lines = [
        header::label_row(app),
        header::value_row(app),
        fit_to_width(&header::separator_row(), inner, '─'),
    ];
    let header_rows = HEADER_ROWS.min(middle);
    for text in header_lines.iter().take(header_rows) {
        lines.push(boxed(text, inner, set.vertical_left, set.vertical_right));
    }

    let chart_height = middle - header_rows;
    for text in chart::chart_rows(app, inner, chart_height) {
        lines.push(boxed(&text, inner, set.vertical_left, set.vertical_right));
    }

    // Padding up to the bottom border
    while lines.len() < rows.saturating_sub(1) {
        lines.push(boxed("", inner, set.vertical_left, set.vertical_right));
    }

    lines.push(rule(set.bottom_left, set.horizontal_bottom, set.bottom_right, inner));
    lines
}

fn rule(left: &str, fill: &str, right: &str, inner: usize) -> String {
    format!("{}{}{}", left, fill.repeat(inner), right)
}

fn boxed(text: &str, inner: usize, left: &str, right: &str) -> String {
    format!("{}{}{}", left, fit_to_width(text, inner, ' '), right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_scheme::ColorSchemeId;
    use crate::system::rate::RateSample;
    use crate::ui::style::visible_width;

    fn busy_app(cols: u16, rows: u16, scheme: ColorSchemeId) -> App {
        let mut app = App::new("mlx5_0", 1, cols, rows, scheme);
        for i in 0..200 {
            let v = (i % 17) as f64 * 1e9;
            app.record(RateSample::from_values([v, v / 2.0, v / 4096.0, v / 8192.0]));
        }
        app
    }

    #[test]
    fn every_line_is_exactly_terminal_width() {
        for scheme in ColorSchemeId::all() {
            for (cols, rows) in [(80, 24), (81, 25), (200, 60), (40, 10), (20, 6), (2, 2), (3, 3)] {
                let frame = draw(&busy_app(cols, rows, *scheme));
                assert_eq!(frame.len(), rows as usize, "{cols}x{rows}");
                for line in &frame {
                    assert_eq!(visible_width(line), cols as usize, "{cols}x{rows}: {line:?}");
                }
            }
        }
    }

    #[test]
    fn frame_structure() {
        let frame = draw(&busy_app(80, 24, ColorSchemeId::Monochrome));
        assert!(frame[0].starts_with('┏') && frame[0].ends_with('┓'));
        assert!(frame[1].starts_with("┃Interface"));
        assert!(frame[2].starts_with("┃mlx5_0"));
        assert!(frame[3].starts_with("┃─────"));
        assert!(frame[3].contains('┴'));
        assert!(frame[23].starts_with('┗') && frame[23].ends_with('┛'));
        // 24 rows - 2 borders - 3 header rows
        let chart: Vec<&String> = frame[4..23].iter().collect();
        assert_eq!(chart.len(), 19);
        assert!(chart.iter().all(|l| l.starts_with('┃') && l.ends_with('┃')));
    }

    #[test]
    fn styling_never_leaks_past_a_row() {
        let frame = draw(&busy_app(80, 24, ColorSchemeId::Default));
        let reset = crossterm::style::ResetColor.to_string();
        for line in &frame {
            if let Some(last_set) = line.rfind("\x1b[38") {
                let tail = &line[last_set..];
                assert!(tail.contains(&reset), "unterminated span in {line:?}");
            }
        }
    }

    #[test]
    fn monochrome_frame_has_no_escapes() {
        let frame = draw(&busy_app(80, 24, ColorSchemeId::Monochrome));
        assert!(frame.iter().all(|l| !l.contains('\x1b')));
    }

    #[test]
    fn short_terminal_keeps_borders() {
        let frame = draw(&busy_app(30, 4, ColorSchemeId::Monochrome));
        assert_eq!(frame.len(), 4);
        assert!(frame[0].starts_with('┏'));
        assert!(frame[1].starts_with("┃Interface"));
        assert!(frame[2].starts_with("┃mlx5_0"));
        assert!(frame[3].starts_with('┗'));
    }
}
