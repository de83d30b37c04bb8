use std::collections::VecDeque;

use crate::model::ChartSample;

/// Sliding window of the two traffic series. Both series always hold
/// exactly `points` values, oldest first.
#[derive(Debug, Clone)]
pub struct TrafficChart {
    normal: VecDeque<f64>,
    attack: VecDeque<f64>,
}

impl TrafficChart {
    pub const NORMAL_LABEL: &'static str = "NORMAL";
    pub const ATTACK_LABEL: &'static str = "ATTACK";

    /// Zero-filled series of `points` values (at least one).
    pub fn new(points: usize) -> Self {
        let points = points.max(1);
        Self {
            normal: VecDeque::from(vec![0.0; points]),
            attack: VecDeque::from(vec![0.0; points]),
        }
    }

    /// Append one value per series and drop the oldest.
    pub fn push(&mut self, sample: ChartSample) {
        for (series, value) in [
            (&mut self.normal, sample.normal),
            (&mut self.attack, sample.attack),
        ] {
            series.pop_front();
            series.push_back(value);
        }
    }

    pub fn points(&self) -> usize {
        self.normal.len()
    }

    pub fn normal(&self) -> impl Iterator<Item = f64> + '_ {
        self.normal.iter().copied()
    }

    pub fn attack(&self) -> impl Iterator<Item = f64> + '_ {
        self.attack.iter().copied()
    }

    /// Largest value across both series; `0.0` for an all-zero chart.
    pub fn peak(&self) -> f64 {
        self.normal().chain(self.attack()).fold(0.0, f64::max)
    }
}
