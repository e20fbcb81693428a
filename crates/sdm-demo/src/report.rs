//! Recall reports.
//!
//! Sweeps feed their observations into owned report values that the caller
//! prints or serializes once the sweep is done.

use sdm_core::BitVector;
use serde::Serialize;

/// Bit-level confusion counts of recalled vectors against their originals,
/// collected at one probe noise level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecallReport {
    pub noise: f64,
    pub trials: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    pub probe_distance_total: usize,
    pub recall_distance_total: usize,
    pub exact_recalls: usize,
}

impl RecallReport {
    pub fn new(noise: f64) -> Self {
        Self {
            noise,
            ..Self::default()
        }
    }

    /// Record one probe/recall pair against the original vector.
    pub fn record(&mut self, original: &BitVector, probe: &BitVector, recalled: &BitVector) {
        for (expected, got) in original.iter().zip(recalled.iter()) {
            match (expected, got) {
                (true, true) => self.true_positives += 1,
                (false, true) => self.false_positives += 1,
                (false, false) => self.true_negatives += 1,
                (true, false) => self.false_negatives += 1,
            }
        }
        let recall_distance = original.distance(recalled);
        self.probe_distance_total += original.distance(probe);
        self.recall_distance_total += recall_distance;
        if recall_distance == 0 {
            self.exact_recalls += 1;
        }
        self.trials += 1;
    }

    pub fn mean_probe_distance(&self) -> f64 {
        ratio(self.probe_distance_total, self.trials)
    }

    pub fn mean_recall_distance(&self) -> f64 {
        ratio(self.recall_distance_total, self.trials)
    }

    /// Fraction of bits recalled correctly.
    pub fn accuracy(&self) -> f64 {
        let correct = self.true_positives + self.true_negatives;
        ratio(correct, correct + self.false_positives + self.false_negatives)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }
}

/// Mean recall error after storing a given number of patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityPoint {
    pub patterns: usize,
    pub mean_recall_distance: f64,
    pub exact_recalls: usize,
}

/// Everything a demo run measured.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub locations: usize,
    pub dimension: usize,
    pub noise: Vec<RecallReport>,
    pub capacity: Vec<CapacityPoint>,
}

impl SweepReport {
    /// Plain-text tables for both sweeps.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.noise.is_empty() {
            out.push_str("noise  probe_d  recall_d  exact  accuracy  precision  recall\n");
            for r in &self.noise {
                out.push_str(&format!(
                    "{:>5.2}  {:>7.1}  {:>8.1}  {:>2}/{:<2}  {:>8.3}  {:>9.3}  {:>6.3}\n",
                    r.noise,
                    r.mean_probe_distance(),
                    r.mean_recall_distance(),
                    r.exact_recalls,
                    r.trials,
                    r.accuracy(),
                    r.precision(),
                    r.recall(),
                ));
            }
        }
        if !self.capacity.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("patterns  recall_d  exact\n");
            for c in &self.capacity {
                out.push_str(&format!(
                    "{:>8}  {:>8.1}  {:>2}/{:<2}\n",
                    c.patterns, c.mean_recall_distance, c.exact_recalls, c.patterns
                ));
            }
        }
        out
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_counts() {
        let original = BitVector::from_bits(&[1, 1, 0, 0]).unwrap();
        let probe = BitVector::from_bits(&[1, 0, 0, 1]).unwrap();
        let recalled = BitVector::from_bits(&[1, 0, 1, 0]).unwrap();

        let mut report = RecallReport::new(0.5);
        report.record(&original, &probe, &recalled);

        assert_eq!(report.true_positives, 1);
        assert_eq!(report.false_negatives, 1);
        assert_eq!(report.false_positives, 1);
        assert_eq!(report.true_negatives, 1);
        assert_eq!(report.mean_probe_distance(), 2.0);
        assert_eq!(report.mean_recall_distance(), 2.0);
        assert_eq!(report.accuracy(), 0.5);
        assert_eq!(report.exact_recalls, 0);
    }

    #[test]
    fn test_empty_report_has_zero_rates() {
        let report = RecallReport::new(0.1);
        assert_eq!(report.accuracy(), 0.0);
        assert_eq!(report.mean_recall_distance(), 0.0);
    }

    #[test]
    fn test_render_lists_every_row() {
        let mut report = SweepReport::default();
        report.noise.push(RecallReport::new(0.1));
        report.noise.push(RecallReport::new(0.2));
        report.capacity.push(CapacityPoint {
            patterns: 1,
            mean_recall_distance: 0.0,
            exact_recalls: 1,
        });
        let text = report.render();
        assert_eq!(text.lines().count(), 2 + 1 + 1 + 2);
    }

    #[test]
    fn test_serializes_to_json() {
        let report = SweepReport {
            locations: 10,
            dimension: 256,
            ..SweepReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["locations"], 10);
        assert!(json["noise"].as_array().unwrap().is_empty());
    }
}
