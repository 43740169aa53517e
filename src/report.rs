// Text summaries built from the aggregate tables.
use std::collections::HashSet;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::aggregate::{self, FighterSummary, Metric};
use crate::io::FightRecord;

/// Dataset-level counts shown before any per-entity summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    pub records: usize,
    pub fighters: usize,
    pub weight_classes: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

pub fn overview(records: &[FightRecord]) -> Option<DatasetOverview> {
    let first = records.first()?;

    let mut fighters: HashSet<&str> = HashSet::new();
    let mut weight_classes = HashSet::new();
    let mut first_date = first.date;
    let mut last_date = first.date;
    for rec in records {
        fighters.insert(rec.fighter.as_str());
        if !rec.opponent.is_empty() {
            fighters.insert(rec.opponent.as_str());
        }
        weight_classes.insert(rec.weight_class);
        first_date = first_date.min(rec.date);
        last_date = last_date.max(rec.date);
    }

    Some(DatasetOverview {
        records: records.len(),
        fighters: fighters.len(),
        weight_classes: weight_classes.len(),
        first_date,
        last_date,
    })
}

/// Fighter summaries ranked by wins, ties broken by name so the order is
/// stable across runs.
pub fn rank_by_wins(summaries: &[FighterSummary]) -> Vec<&FighterSummary> {
    let mut ranked: Vec<&FighterSummary> = summaries.iter().collect();
    ranked.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.fighter.cmp(&b.fighter)));
    ranked
}

pub fn build_report(records: &[FightRecord]) -> String {
    let summaries = aggregate::summarize_by_fighter(records);
    let weight_classes = aggregate::summarize_by_weight_class(records);
    let trends = aggregate::summarize_over_time(records, aggregate::by_year);

    let mut output = String::new();
    let _ = writeln!(output, "# Fight Record Report");
    let _ = writeln!(output);

    match overview(records) {
        Some(ov) => {
            let _ = writeln!(output, "## Dataset");
            let _ = writeln!(output, "- Records: {}", ov.records);
            let _ = writeln!(output, "- Fighters: {}", ov.fighters);
            let _ = writeln!(output, "- Weight classes: {}", ov.weight_classes);
            let _ = writeln!(output, "- Date range: {} to {}", ov.first_date, ov.last_date);
        }
        None => {
            let _ = writeln!(output, "No fight records in this dataset.");
            return output;
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Fighters by Wins");
    for summary in rank_by_wins(&summaries).iter().take(10) {
        let _ = writeln!(
            output,
            "- {}: {}-{}-{} ({} fights, win rate {:.0}%, strike accuracy {:.0}%)",
            summary.fighter,
            summary.wins,
            summary.losses,
            summary.draws,
            summary.fights,
            summary.win_rate * 100.0,
            summary.strike_accuracy * 100.0,
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weight Classes");
    for agg in &weight_classes {
        let _ = writeln!(
            output,
            "- {}: {} fights, {:.1} strikes landed per fight, takedown accuracy {:.0}%",
            agg.weight_class,
            agg.fights,
            agg.mean_strikes_landed,
            agg.mean_takedown_accuracy * 100.0,
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Fights per Year");
    for point in trends.iter().filter(|p| p.metric == Metric::Fights) {
        let finishes = trends
            .iter()
            .find(|p| p.bucket == point.bucket && p.metric == Metric::Finishes)
            .map(|p| p.value)
            .unwrap_or(0.0);
        let _ = writeln!(
            output,
            "- {}: {:.0} fights, {:.0} finishes",
            point.bucket, point.value, finishes
        );
    }

    output
}

/// Side-by-side comparison of two fighters, ending with which one leads on
/// win rate, strike accuracy, and knockout rate.
pub fn head_to_head(a: &FighterSummary, b: &FighterSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{} vs {}", a.fighter, b.fighter);
    for summary in [a, b] {
        let _ = writeln!(
            output,
            "  {}: {}-{}-{}, win rate {:.1}%, strike accuracy {:.1}%, \
             takedown accuracy {:.1}%, KO rate {:.1}%, submission rate {:.1}%, \
             avg fight time {:.1} min",
            summary.fighter,
            summary.wins,
            summary.losses,
            summary.draws,
            summary.win_rate * 100.0,
            summary.strike_accuracy * 100.0,
            summary.takedown_accuracy * 100.0,
            summary.ko_rate() * 100.0,
            summary.sub_rate() * 100.0,
            summary.avg_fight_time,
        );
    }

    let _ = writeln!(
        output,
        "  Higher win rate: {}",
        leader(a, b, |s| s.win_rate)
    );
    let _ = writeln!(
        output,
        "  Better striking accuracy: {}",
        leader(a, b, |s| s.strike_accuracy)
    );
    let _ = writeln!(
        output,
        "  Higher knockout rate: {}",
        leader(a, b, |s| s.ko_rate())
    );

    output
}

fn leader<'a>(
    a: &'a FighterSummary,
    b: &'a FighterSummary,
    metric: impl Fn(&FighterSummary) -> f64,
) -> &'a str {
    if metric(a) >= metric(b) {
        &a.fighter
    } else {
        &b.fighter
    }
}
