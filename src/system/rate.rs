use std::time::Instant;

use crate::system::counters::{CounterSnapshot, CounterValue};

/// Port counters the dashboard tracks, in display/CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    RxBytes,
    TxBytes,
    RxPackets,
    TxPackets,
}

impl TrackedField {
    pub fn all() -> &'static [TrackedField] {
        &[
            TrackedField::RxBytes,
            TrackedField::TxBytes,
            TrackedField::RxPackets,
            TrackedField::TxPackets,
        ]
    }

    /// sysfs counter file name
    pub fn counter_name(&self) -> &'static str {
        match self {
            TrackedField::RxBytes => "port_rcv_data",
            TrackedField::TxBytes => "port_xmit_data",
            TrackedField::RxPackets => "port_rcv_packets",
            TrackedField::TxPackets => "port_xmit_packets",
        }
    }

    /// Byte counters are reported in lane-width units and need scaling.
    pub fn is_byte_count(&self) -> bool {
        matches!(self, TrackedField::RxBytes | TrackedField::TxBytes)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Per-second rate for every tracked field, from one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateSample {
    values: [f64; 4],
}

impl RateSample {
    pub fn get(&self, field: TrackedField) -> f64 {
        self.values[field.index()]
    }

    pub fn set(&mut self, field: TrackedField, value: f64) {
        self.values[field.index()] = value;
    }

    /// Build a sample from values listed in `TrackedField::all()` order.
    #[cfg(test)]
    pub fn from_values(values: [f64; 4]) -> Self {
        Self { values }
    }
}

/// Converts successive cumulative snapshots into per-second rates.
///
/// Owns the previous snapshot (tracked fields only). The interval used for
/// each rate is the real time since the previous `feed`, so a late tick does
/// not inflate the rate.
#[derive(Debug)]
pub struct RateComputer {
    byte_multiplier: f64,
    previous: Option<([CounterValue; 4], Instant)>,
}

impl RateComputer {
    pub fn new(byte_multiplier: f64) -> Self {
        Self {
            byte_multiplier,
            previous: None,
        }
    }

    /// Turn `snapshot`, taken at `at`, into per-second rates against the
    /// previous snapshot. The first call has nothing to compare to and yields
    /// all zeros.
    ///
    /// Tracked fields missing from `snapshot` read as 0; callers validate the
    /// counter set once at startup.
    pub fn feed_at(&mut self, snapshot: &CounterSnapshot, at: Instant) -> RateSample {
        let mut current = [0 as CounterValue; 4];
        for field in TrackedField::all() {
            current[field.index()] = snapshot.get(field.counter_name()).copied().unwrap_or(0);
        }

        let mut sample = RateSample::default();
        if let Some((previous, prev_at)) = &self.previous {
            let elapsed = at.saturating_duration_since(*prev_at).as_secs_f64();
            if elapsed > 0.0 {
                for field in TrackedField::all() {
                    // Negative deltas (counter reset) are passed through unclamped.
                    let delta = counter_delta(current[field.index()], previous[field.index()]);
                    let scaled = if field.is_byte_count() {
                        delta * self.byte_multiplier
                    } else {
                        delta
                    };
                    sample.set(*field, scaled / elapsed);
                }
            }
        }

        self.previous = Some((current, at));
        sample
    }
}

/// `current - previous` as a float. Exact while the difference fits in
/// `i128`; otherwise computed in `f64`.
fn counter_delta(current: CounterValue, previous: CounterValue) -> f64 {
    match current.checked_sub(previous) {
        Some(delta) => delta as f64,
        None => current as f64 - previous as f64,
    }
}
