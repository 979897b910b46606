//! Chart specifications
//!
//! Consumers describe charts as data; rendering is left to whatever front end
//! receives them.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Histogram { bins: Vec<HistogramBin> },
    GroupedHistogram { groups: Vec<HistogramGroup> },
    BoxPlot { groups: Vec<BoxStats> },
    Pie { slices: Vec<Slice> },
    Bar { bars: Vec<Bar> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramGroup {
    pub group: String,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl ChartSpec {
    pub fn new(title: &str, x_label: &str, y_label: &str, data: ChartData) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            data,
        }
    }

    /// One-line description for text reports.
    pub fn summary(&self) -> String {
        match &self.data {
            ChartData::Histogram { bins } => format!(
                "histogram, {} bins, {} values",
                bins.len(),
                bins.iter().map(|b| b.count).sum::<usize>()
            ),
            ChartData::GroupedHistogram { groups } => {
                format!("histogram per group ({})", groups.iter().map(|g| &g.group).join(", "))
            }
            ChartData::BoxPlot { groups } => groups
                .iter()
                .map(|g| format!("{} median {:.0}", g.group, g.median))
                .join("; "),
            ChartData::Pie { slices } => slices
                .iter()
                .map(|s| format!("{}: {}", s.label, s.count))
                .join(", "),
            ChartData::Bar { bars } => bars
                .iter()
                .map(|b| format!("{} ({:.1})", b.label, b.value))
                .join(", "),
        }
    }
}

/// Equal-width histogram over the data's own range.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    match values.iter().copied().minmax().into_option() {
        Some((lo, hi)) => histogram_in_range(values, bins, lo, hi),
        None => Vec::new(),
    }
}

/// Equal-width histogram over `[lo, hi]`; the last bin is closed on the right.
pub fn histogram_in_range(values: &[f64], bins: usize, lo: f64, hi: f64) -> Vec<HistogramBin> {
    if bins == 0 {
        return Vec::new();
    }
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };
    let mut counts = vec![0usize; bins];
    for value in values {
        if *value < lo || *value > hi {
            continue;
        }
        let index = (((value - lo) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Five-number summary with linearly interpolated quartiles.
pub fn box_stats(group: &str, values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let sorted: Vec<f64> = values.iter().copied().sorted_by(|a, b| a.total_cmp(b)).collect();
    Some(BoxStats {
        group: group.to_string(),
        count: sorted.len(),
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Value counts, most frequent first, ties broken by label.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Slice> {
    values
        .into_iter()
        .counts()
        .into_iter()
        .map(|(label, count)| Slice {
            label: label.to_string(),
            count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let values = vec![0.0, 1.0, 2.5, 9.9, 10.0];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins[4].count, 2);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        let single = histogram(&[3.0, 3.0], 4);
        assert_eq!(single[0].count, 2);
    }

    #[test]
    fn test_box_stats() {
        let stats = box_stats("Sales", &[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.max, 5.0);
        assert!(box_stats("Empty", &[]).is_none());
    }

    #[test]
    fn test_value_counts_order() {
        let slices = value_counts(["Male", "Female", "Male", "Non-binary", "Female", "Male"]);
        assert_eq!(slices[0], Slice { label: "Male".to_string(), count: 3 });
        assert_eq!(slices[1].label, "Female");
        assert_eq!(slices[2].count, 1);
    }

    #[test]
    fn test_chart_spec_serializes_kind_tag() {
        let spec = ChartSpec::new(
            "Workforce Gender Distribution",
            "Gender",
            "Count",
            ChartData::Pie { slices: value_counts(["HR"]) },
        );
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["data"]["kind"], "pie");
        assert_eq!(json["data"]["slices"][0]["label"], "HR");
    }
}
