//! Offline analytics report
//!
//! Usage: `report <request.json> [--json]`
//!
//! The request file has the same shape as `POST /api/analytics`.

use std::env;
use std::fs;

use dotenvy::dotenv;
use txanalytics::config::AnalyticsConfig;
use txanalytics::core::http::{abort_after, AnalyzeRequest};
use txanalytics::logging;
use txanalytics::models::{AnalyticsReport, Forecast, Metric};
use txanalytics::AnalyticsEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or("usage: report <request.json> [--json]")?;

    if !as_json {
        logging::init_logging();
    }

    let request: AnalyzeRequest = serde_json::from_str(&fs::read_to_string(path)?)?;
    let engine = AnalyticsEngine::new(AnalyticsConfig::from_env());
    let window = request.window.resolve(&engine)?;
    let report = engine.analyze(&request.records, &window, &abort_after(request.timeout_ms))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    println!(
        "Window: {} .. {} ({})",
        report.window.start_date(),
        report.window.end_date(),
        report.window.granularity()
    );
    println!("  Periods: {}", report.period_series.len());
    println!(
        "  Amounts: mean {:.2}, median {:.2}, p95 {:.2}, max {:.2}",
        report.statistics.mean,
        report.statistics.percentiles.p50,
        report.statistics.percentiles.p95,
        report.statistics.max
    );
    println!("  Volatility: {:.3}", report.volatility);
    println!("  Count/volume correlation: {:.3}", report.correlation);

    println!("  Trends:");
    for (metric, trend) in &report.trends {
        println!("    {}: {:?}", metric.label(), trend);
    }

    if let Some(growth) = report.growth_rates.get(&Metric::TotalVolume) {
        println!(
            "  Volume growth: {:.2}% per period ({:.2} -> {:.2})",
            growth.growth_rate, growth.start_value, growth.end_value
        );
    }

    match &report.forecast {
        Forecast::Projected(forecast) => {
            println!(
                "  Forecast: slope {:.2}, R² {:.3}",
                forecast.slope, forecast.r_squared
            );
            for point in &forecast.points {
                let key = point
                    .period_key
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| format!("#{}", point.period));
                println!(
                    "    {}: {:.2} (confidence {:.0}%)",
                    key,
                    point.projected_volume,
                    point.confidence * 100.0
                );
            }
        }
        Forecast::InsufficientData { periods, required } => {
            println!("  Forecast: not enough data ({} of {} periods)", periods, required);
        }
    }

    println!("  Insights:");
    for (i, insight) in report.insights.iter().enumerate() {
        println!(
            "    {}. [{:?}] {}: {}",
            i + 1,
            insight.kind,
            insight.title,
            insight.description
        );
    }
}
