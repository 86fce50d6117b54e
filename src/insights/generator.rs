//! Insight generation over a finished report

use crate::models::analytics::{AnalyticsReport, ComparisonTrend, Insight, InsightType, TrendResult};
use crate::models::period::Metric;

use super::thresholds::InsightThresholds;

pub struct InsightGenerator {
    thresholds: InsightThresholds,
}

impl InsightGenerator {
    pub fn new(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &InsightThresholds {
        &self.thresholds
    }

    /// Derive insights from the trend, volatility, correlation and period
    /// comparison sections of `report`. The report's own `insights` field is
    /// ignored.
    pub fn generate(&self, report: &AnalyticsReport) -> Vec<Insight> {
        let mut insights = Vec::new();

        if let Some(trend) = report.trends.get(&Metric::TotalVolume) {
            insights.push(Self::volume_trend(*trend));
        }

        if report.volatility > self.thresholds.high_volatility {
            insights.push(Insight::new(
                InsightType::Warning,
                "High volatility",
                format!(
                    "Period volume varies by {:.1}% around its mean (coefficient of variation {:.2}).",
                    report.volatility * 100.0,
                    report.volatility
                ),
            ));
        }

        let current = &report.period_comparison.current;
        if current.totals.transaction_count > 0 {
            insights.push(self.success_rate(current.success_rate));
        }

        if report.correlation.abs() > self.thresholds.strong_correlation {
            let direction = if report.correlation > 0.0 {
                "positive"
            } else {
                "negative"
            };
            insights.push(Insight::new(
                InsightType::Info,
                "Strong correlation",
                format!(
                    "Transaction count and volume show a strong {} correlation (r = {:.2}).",
                    direction, report.correlation
                ),
            ));
        }

        if let Some(volume) = report.period_comparison.comparison.get(&Metric::TotalVolume) {
            match volume.trend {
                ComparisonTrend::Up => insights.push(Insight::new(
                    InsightType::Positive,
                    "Volume up on previous period",
                    format!("Volume rose {:.1}% against the preceding range.", volume.change_pct),
                )),
                ComparisonTrend::Down => insights.push(Insight::new(
                    InsightType::Warning,
                    "Volume down on previous period",
                    format!(
                        "Volume fell {:.1}% against the preceding range.",
                        volume.change_pct.abs()
                    ),
                )),
                ComparisonTrend::Stable => {}
            }
        }

        insights
    }

    fn volume_trend(trend: TrendResult) -> Insight {
        match trend {
            TrendResult::Upward => Insight::new(
                InsightType::Positive,
                "Volume trending up",
                "Period volume rose in most consecutive periods.",
            ),
            TrendResult::Downward => Insight::new(
                InsightType::Warning,
                "Volume trending down",
                "Period volume fell in most consecutive periods.",
            ),
            TrendResult::Stable => Insight::new(
                InsightType::Neutral,
                "Volume stable",
                "No dominant direction in period volume.",
            ),
            TrendResult::InsufficientData => Insight::new(
                InsightType::Info,
                "Not enough data",
                "At least three periods are needed to classify the volume trend.",
            ),
        }
    }

    fn success_rate(&self, rate: f64) -> Insight {
        if rate >= self.thresholds.healthy_success_rate {
            Insight::new(
                InsightType::Positive,
                "Healthy success rate",
                format!("{:.1}% of transactions completed successfully.", rate),
            )
        } else if rate < self.thresholds.poor_success_rate {
            Insight::new(
                InsightType::Warning,
                "Low success rate",
                format!(
                    "Only {:.1}% of transactions completed; failures need attention.",
                    rate
                ),
            )
        } else {
            Insight::new(
                InsightType::Neutral,
                "Success rate within range",
                format!("{:.1}% of transactions completed successfully.", rate),
            )
        }
    }
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(InsightThresholds::default())
    }
}
