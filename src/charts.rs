// Chart rendering. Draws the derived tables to PNG files with plotters.
use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::aggregate::{FighterSummary, Metric, TimeSeriesPoint, WeightClassAggregate};
use crate::io::{FightRecord, FightResult, FinishMethod};
use crate::report;

const CHART_SIZE: (u32, u32) = (1000, 600);

/// Horizontal bar chart of the top fighters by wins.
/// One bar per fighter, fighter names as Y tick labels.
pub fn plot_top_fighters(
    summaries: &[FighterSummary],
    limit: usize,
    out: &Path,
) -> Result<()> {
    let mut ranked = report::rank_by_wins(summaries);
    ranked.truncate(limit);

    let names: Vec<&str> = ranked.iter().map(|s| s.fighter.as_str()).collect();
    let count = ranked.len();

    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    if count == 0 {
        root.present()?;
        return Ok(());
    }

    let max_wins = ranked.iter().map(|s| s.wins).max().unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Top Fighters by Wins", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(200)
        .build_cartesian_2d(0u32..max_wins + 1, 0..count)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .y_labels(count)
        .y_label_formatter(&|idx| {
            let i = *idx;
            if i < count {
                names[i].to_string()
            } else {
                String::new()
            }
        })
        .x_desc("Wins")
        .y_desc("Fighter")
        .draw()?;

    chart.draw_series(ranked.iter().enumerate().map(|(i, summary)| {
        Rectangle::new([(0, i), (summary.wins, i + 1)], BLUE.mix(0.5).filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Vertical bar chart of fight counts per weight class.
pub fn plot_weight_class_fights(aggs: &[WeightClassAggregate], out: &Path) -> Result<()> {
    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    if aggs.is_empty() {
        root.present()?;
        return Ok(());
    }

    let labels: Vec<&str> = aggs.iter().map(|a| a.weight_class.label()).collect();
    let count = aggs.len();
    let max_fights = aggs.iter().map(|a| a.fights).max().unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Fights per Weight Class", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..count, 0..max_fights + 1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(count)
        .x_label_formatter(&|idx| {
            let i = *idx;
            if i < count {
                labels[i].to_string()
            } else {
                String::new()
            }
        })
        .x_desc("Weight Class")
        .y_desc("Fights")
        .draw()?;

    chart.draw_series(aggs.iter().enumerate().map(|(i, agg)| {
        Rectangle::new([(i, 0), (i + 1, agg.fights)], BLUE.mix(0.5).filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Line chart of one metric across time buckets.
pub fn plot_trend(points: &[TimeSeriesPoint], metric: Metric, out: &Path) -> Result<()> {
    let series: Vec<(&str, f64)> = points
        .iter()
        .filter(|p| p.metric == metric)
        .map(|p| (p.bucket.as_str(), p.value))
        .collect();

    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    if series.is_empty() {
        root.present()?;
        return Ok(());
    }

    let count = series.len();
    let max_value = series.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Trend: {}", metric.label()), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..count, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(count)
        .x_label_formatter(&|idx| {
            let i = *idx;
            if i < count {
                series[i].0.to_string()
            } else {
                String::new()
            }
        })
        .x_desc("Bucket")
        .y_desc(metric.label())
        .draw()?;

    chart.draw_series(LineSeries::new(
        series.iter().enumerate().map(|(i, (_, v))| (i, *v)),
        &BLUE,
    ))?;
    chart.draw_series(
        series
            .iter()
            .enumerate()
            .map(|(i, (_, v))| Circle::new((i, *v), 3, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Bar chart of how wins were earned across the whole dataset.
pub fn plot_finish_methods(records: &[FightRecord], out: &Path) -> Result<()> {
    let mut counts = [0usize; FinishMethod::ALL.len()];
    for rec in records {
        if rec.result == FightResult::Win {
            let idx = match rec.method {
                FinishMethod::KoTko => 0,
                FinishMethod::Submission => 1,
                FinishMethod::Decision => 2,
                FinishMethod::Other => 3,
            };
            counts[idx] += 1;
        }
    }

    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let max_count = counts.iter().copied().max().unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Win Methods", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..FinishMethod::ALL.len(), 0..max_count + 1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(FinishMethod::ALL.len())
        .x_label_formatter(&|idx| {
            FinishMethod::ALL
                .get(*idx)
                .map(|m| m.label().to_string())
                .unwrap_or_default()
        })
        .x_desc("Method")
        .y_desc("Wins")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        Rectangle::new([(i, 0), (i + 1, count)], BLUE.mix(0.5).filled())
    }))?;

    root.present()?;
    Ok(())
}
