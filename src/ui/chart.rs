use crate::app::App;
use crate::system::rate::TrackedField;
use crate::ui::bars::{scale, BarHeight};
use crate::ui::style::span;

/// Split of the inner width into receive columns, an optional gutter, transmit
/// columns. Each side is at most `capacity` wide so every retained sample
/// that sets a side's scale is also drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub rx_width: usize,
    pub gutter: usize,
    pub tx_width: usize,
}

impl ChartLayout {
    pub fn new(inner: usize, capacity: usize) -> Self {
        // The gutter only appears when both full-capacity sides leave room for it.
        let gutter = usize::from(inner > 2 * capacity);
        let rx_width = capacity.min((inner - gutter) / 2);
        Self {
            rx_width,
            gutter,
            tx_width: inner - gutter - rx_width,
        }
    }
}

/// Mirrored bar chart rows, top to bottom.
///
/// Receive bars sit left of the middle and transmit bars right of it, newest
/// sample adjacent to the middle on both sides. Each side is scaled against
/// its own maximum over the whole window.
pub fn chart_rows(app: &App, inner: usize, height: usize) -> Vec<String> {
    let layout = ChartLayout::new(inner, app.history.capacity());
    let rx = scale(&app.history.values_for(TrackedField::RxBytes), height);
    let tx = scale(&app.history.values_for(TrackedField::TxBytes), height);
    let cs = &app.color_scheme;

    (0..height)
        .map(|top| {
            let row = height - 1 - top;
            let mut rx_cells: Vec<&str> = newest_first(&rx, layout.rx_width, row);
            rx_cells.reverse();
            let tx_cells = newest_first(&tx, layout.tx_width, row);

            format!(
                "{}{}{}",
                span(cs.rx, rx_cells.concat()),
                " ".repeat(layout.gutter),
                span(cs.tx, tx_cells.concat())
            )
        })
        .collect()
}

/// `width` cells for `row`, newest bar first, blank where history runs out.
fn newest_first(heights: &[BarHeight], width: usize, row: usize) -> Vec<&'static str> {
    let mut cells: Vec<&'static str> = heights.iter().rev().take(width).map(|h| h.cell(row)).collect();
    cells.resize(width, " ");
    cells
}
