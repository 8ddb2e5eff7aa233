use std::fs::File;
use std::io::Write;
use std::time::Instant;

use anyhow::Result;

use crate::app::App;
use crate::system::counters::CounterSnapshot;
use crate::system::csv_export::CsvExporter;
use crate::system::rate::RateComputer;

/// Turns each tick's counter snapshot into a rate sample and hands it to the
/// App (and the CSV export, when enabled).
pub struct Collector<W: Write = File> {
    rates: RateComputer,
    csv: Option<CsvExporter<W>>,
}

impl<W: Write> Collector<W> {
    pub fn new(byte_multiplier: f64, csv: Option<CsvExporter<W>>) -> Self {
        Self {
            rates: RateComputer::new(byte_multiplier),
            csv,
        }
    }

    /// Feed one snapshot through the pipeline and populate the App
    pub fn refresh(&mut self, app: &mut App, snapshot: &CounterSnapshot) -> Result<()> {
        self.refresh_at(app, snapshot, Instant::now())
    }

    pub fn refresh_at(
        &mut self,
        app: &mut App,
        snapshot: &CounterSnapshot,
        at: Instant,
    ) -> Result<()> {
        let sample = self.rates.feed_at(snapshot, at);
        if let Some(csv) = self.csv.as_mut() {
            csv.write_sample(&sample)?;
        }
        app.record(sample);
        Ok(())
    }

    /// Close the CSV export, if any, and return how many rows it holds.
    pub fn finish(self) -> Result<Option<u64>> {
        match self.csv {
            Some(csv) => {
                let rows = csv.rows();
                csv.into_inner()?;
                Ok(Some(rows))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_scheme::ColorSchemeId;
    use crate::system::rate::TrackedField;
    use std::time::Duration;

    fn snapshot(rx: i128, tx: i128) -> CounterSnapshot {
        let mut snap = CounterSnapshot::new();
        snap.insert("port_rcv_data".into(), rx);
        snap.insert("port_xmit_data".into(), tx);
        snap.insert("port_rcv_packets".into(), 0);
        snap.insert("port_xmit_packets".into(), 0);
        snap
    }

    #[test]
    fn refresh_records_rates_and_exports_rows() {
        let mut app = App::new("mlx5_0", 1, 80, 24, ColorSchemeId::Default);
        let csv = CsvExporter::new(Vec::new()).expect("exporter");
        let mut collector = Collector::new(4.0, Some(csv));

        let t0 = Instant::now();
        collector.refresh_at(&mut app, &snapshot(0, 0), t0).expect("tick");
        collector
            .refresh_at(&mut app, &snapshot(1000, 500), t0 + Duration::from_secs(1))
            .expect("tick");

        assert_eq!(app.tick, 2);
        assert_eq!(app.history.len(), 2);
        assert_eq!(app.latest.get(TrackedField::RxBytes), 4000.0);
        assert_eq!(app.latest.get(TrackedField::TxBytes), 2000.0);
        assert_eq!(collector.finish().expect("finish"), Some(2));
    }

    #[test]
    fn refresh_without_csv() {
        let mut app = App::new("mlx5_0", 1, 80, 24, ColorSchemeId::Default);
        let mut collector: Collector<Vec<u8>> = Collector::new(4.0, None);
        collector.refresh(&mut app, &snapshot(5, 5)).expect("tick");
        assert_eq!(app.history.len(), 1);
        assert_eq!(collector.finish().expect("finish"), None);
    }
}
