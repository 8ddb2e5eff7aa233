use crate::color_scheme::{ColorScheme, ColorSchemeId};
use crate::system::history::HistoryWindow;
use crate::system::rate::RateSample;

/// Main application state
pub struct App {
    /// RDMA device name, e.g. `mlx5_0`
    pub device: String,
    pub port: u32,

    // Terminal size, read once at startup
    pub cols: u16,
    pub rows: u16,

    // Rate data
    pub history: HistoryWindow,
    pub latest: RateSample,

    pub color_scheme: ColorScheme,

    // Tick counter for refresh
    pub tick: u64,
}

impl App {
    pub fn new(device: &str, port: u32, cols: u16, rows: u16, color_scheme_id: ColorSchemeId) -> Self {
        Self {
            device: device.to_string(),
            port,
            cols,
            rows,
            history: HistoryWindow::for_terminal_width(cols),
            latest: RateSample::default(),
            color_scheme: ColorScheme::from_id(color_scheme_id),
            tick: 0,
        }
    }

    /// Store the newest rate sample.
    pub fn record(&mut self, sample: RateSample) {
        self.latest = sample;
        self.history.push(sample);
        self.tick += 1;
    }
}
