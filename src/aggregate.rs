// Summary statistics over loaded fight records. Every function here is a
// pure function of the record slice: empty input gives empty output, and
// nothing is cached or mutated between calls.
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::io::{FightRecord, FightResult, FinishMethod, WeightClass};

/// Career totals for one fighter.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterSummary {
    pub fighter: String,
    pub fights: usize,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub no_contests: u32,
    pub ko_wins: u32,
    pub sub_wins: u32,
    pub strikes_landed: u64,
    pub strikes_attempted: u64,
    pub takedowns_landed: u64,
    pub takedowns_attempted: u64,
    pub strike_accuracy: f64,
    pub takedown_accuracy: f64,
    pub win_rate: f64,
    pub avg_fight_time: f64,
}

impl FighterSummary {
    fn new(fighter: String) -> Self {
        FighterSummary {
            fighter,
            fights: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            no_contests: 0,
            ko_wins: 0,
            sub_wins: 0,
            strikes_landed: 0,
            strikes_attempted: 0,
            takedowns_landed: 0,
            takedowns_attempted: 0,
            strike_accuracy: 0.0,
            takedown_accuracy: 0.0,
            win_rate: 0.0,
            avg_fight_time: 0.0,
        }
    }

    /// Share of wins that came by knockout. Zero when the fighter has no wins.
    pub fn ko_rate(&self) -> f64 {
        ratio(self.ko_wins as u64, self.wins as u64)
    }

    /// Share of wins that came by submission. Zero when the fighter has no wins.
    pub fn sub_rate(&self) -> f64 {
        ratio(self.sub_wins as u64, self.wins as u64)
    }
}

/// Per-division aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightClassAggregate {
    pub weight_class: WeightClass,
    pub fights: usize,
    pub mean_strikes_landed: f64,
    pub mean_takedown_accuracy: f64,
    pub mean_submission_attempts: f64,
}

/// Metrics tracked per time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Fights,
    StrikesLanded,
    TakedownAccuracy,
    Finishes,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Fights,
        Metric::StrikesLanded,
        Metric::TakedownAccuracy,
        Metric::Finishes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Fights => "fights",
            Metric::StrikesLanded => "mean strikes landed",
            Metric::TakedownAccuracy => "mean takedown accuracy",
            Metric::Finishes => "finishes",
        }
    }
}

/// One (bucket, metric) aggregate for trend charts.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub bucket: String,
    pub metric: Metric,
    pub value: f64,
}

/// Landed over attempted, with a zero denominator pinned to 0.0 rather
/// than NaN. Applied everywhere an accuracy ratio is computed.
fn ratio(landed: u64, attempted: u64) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        landed as f64 / attempted as f64
    }
}

/// Group records by fighter name and accumulate career totals. Output
/// order is first appearance in the input.
pub fn summarize_by_fighter(records: &[FightRecord]) -> Vec<FighterSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<FighterSummary> = Vec::new();
    // (total minutes, fights with a recorded duration), parallel to `out`
    let mut durations: Vec<(f64, u32)> = Vec::new();

    for rec in records {
        let idx = match index.get(&rec.fighter) {
            Some(&i) => i,
            None => {
                index.insert(rec.fighter.clone(), out.len());
                out.push(FighterSummary::new(rec.fighter.clone()));
                durations.push((0.0, 0));
                out.len() - 1
            }
        };

        let summary = &mut out[idx];
        summary.fights += 1;
        match rec.result {
            FightResult::Win => {
                summary.wins += 1;
                match rec.method {
                    FinishMethod::KoTko => summary.ko_wins += 1,
                    FinishMethod::Submission => summary.sub_wins += 1,
                    _ => {}
                }
            }
            FightResult::Loss => summary.losses += 1,
            FightResult::Draw => summary.draws += 1,
            FightResult::NoContest => summary.no_contests += 1,
        }
        summary.strikes_landed += rec.strikes_landed as u64;
        summary.strikes_attempted += rec.strikes_attempted as u64;
        summary.takedowns_landed += rec.takedowns_landed as u64;
        summary.takedowns_attempted += rec.takedowns_attempted as u64;

        if let Some(minutes) = rec.time_minutes {
            durations[idx].0 += minutes;
            durations[idx].1 += 1;
        }
    }

    for (summary, (minutes, timed)) in out.iter_mut().zip(durations) {
        summary.strike_accuracy = ratio(summary.strikes_landed, summary.strikes_attempted);
        summary.takedown_accuracy = ratio(summary.takedowns_landed, summary.takedowns_attempted);
        summary.win_rate = ratio(summary.wins as u64, summary.fights as u64);
        summary.avg_fight_time = if timed > 0 { minutes / timed as f64 } else { 0.0 };
    }

    out
}

/// Group records by weight class. Output order is first appearance in the
/// input; callers sort if they want a fixed order.
pub fn summarize_by_weight_class(records: &[FightRecord]) -> Vec<WeightClassAggregate> {
    #[derive(Default)]
    struct Acc {
        fights: usize,
        strikes_landed: u64,
        takedown_accuracy_sum: f64,
        submission_attempts: u64,
    }

    let mut index: HashMap<WeightClass, usize> = HashMap::new();
    let mut order: Vec<WeightClass> = Vec::new();
    let mut accs: Vec<Acc> = Vec::new();

    for rec in records {
        let idx = match index.get(&rec.weight_class) {
            Some(&i) => i,
            None => {
                index.insert(rec.weight_class, accs.len());
                order.push(rec.weight_class);
                accs.push(Acc::default());
                accs.len() - 1
            }
        };
        let acc = &mut accs[idx];
        acc.fights += 1;
        acc.strikes_landed += rec.strikes_landed as u64;
        acc.takedown_accuracy_sum +=
            ratio(rec.takedowns_landed as u64, rec.takedowns_attempted as u64);
        acc.submission_attempts += rec.submission_attempts as u64;
    }

    order
        .into_iter()
        .zip(accs)
        .map(|(weight_class, acc)| {
            let n = acc.fights as f64;
            WeightClassAggregate {
                weight_class,
                fights: acc.fights,
                mean_strikes_landed: acc.strikes_landed as f64 / n,
                mean_takedown_accuracy: acc.takedown_accuracy_sum / n,
                mean_submission_attempts: acc.submission_attempts as f64 / n,
            }
        })
        .collect()
}

/// Group records into time buckets using the caller-supplied bucketing
/// function and emit one point per (bucket, metric) pair. Points come out
/// sorted by bucket label ascending, metrics in declaration order.
pub fn summarize_over_time<F>(records: &[FightRecord], bucket: F) -> Vec<TimeSeriesPoint>
where
    F: Fn(NaiveDate) -> String,
{
    #[derive(Default)]
    struct Acc {
        fights: usize,
        strikes_landed: u64,
        takedown_accuracy_sum: f64,
        finishes: u32,
    }

    let mut buckets: BTreeMap<String, Acc> = BTreeMap::new();
    for rec in records {
        let acc = buckets.entry(bucket(rec.date)).or_default();
        acc.fights += 1;
        acc.strikes_landed += rec.strikes_landed as u64;
        acc.takedown_accuracy_sum +=
            ratio(rec.takedowns_landed as u64, rec.takedowns_attempted as u64);
        if rec.result == FightResult::Win
            && matches!(rec.method, FinishMethod::KoTko | FinishMethod::Submission)
        {
            acc.finishes += 1;
        }
    }

    let mut points = Vec::with_capacity(buckets.len() * Metric::ALL.len());
    for (label, acc) in buckets {
        let n = acc.fights as f64;
        for metric in Metric::ALL {
            let value = match metric {
                Metric::Fights => n,
                Metric::StrikesLanded => acc.strikes_landed as f64 / n,
                Metric::TakedownAccuracy => acc.takedown_accuracy_sum / n,
                Metric::Finishes => acc.finishes as f64,
            };
            points.push(TimeSeriesPoint {
                bucket: label.clone(),
                metric,
                value,
            });
        }
    }
    points
}

/// Bucket a date by calendar year, e.g. "2019".
pub fn by_year(date: NaiveDate) -> String {
    date.year().to_string()
}

/// Bucket a date by calendar quarter, e.g. "2019-Q3".
pub fn by_quarter(date: NaiveDate) -> String {
    format!("{}-Q{}", date.year(), date.month0() / 3 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fighter: &str, result: FightResult, landed: u32, attempted: u32) -> FightRecord {
        FightRecord {
            fighter: fighter.to_string(),
            opponent: "Opponent".to_string(),
            date: NaiveDate::from_ymd_opt(2020, 5, 9).unwrap(),
            weight_class: WeightClass::Lightweight,
            strikes_landed: landed,
            strikes_attempted: attempted,
            takedowns_landed: 1,
            takedowns_attempted: 2,
            submission_attempts: 0,
            result,
            method: FinishMethod::Decision,
            time_minutes: None,
        }
    }

    #[test]
    fn result_counts_sum_to_fight_count() {
        let records = vec![
            record("A", FightResult::Win, 10, 20),
            record("A", FightResult::Loss, 5, 25),
            record("A", FightResult::Draw, 0, 0),
            record("A", FightResult::NoContest, 3, 9),
            record("B", FightResult::Win, 7, 14),
        ];

        let summaries = summarize_by_fighter(&records);
        for summary in &summaries {
            let total = summary.wins + summary.losses + summary.draws + summary.no_contests;
            assert_eq!(total as usize, summary.fights);
        }
        assert_eq!(summaries[0].fights, 4);
        assert_eq!(summaries[1].fights, 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(summarize_by_fighter(&[]).is_empty());
        assert!(summarize_by_weight_class(&[]).is_empty());
        assert!(summarize_over_time(&[], by_year).is_empty());
    }

    #[test]
    fn zero_attempts_give_zero_accuracy() {
        let records = vec![record("A", FightResult::Win, 0, 0)];
        let summaries = summarize_by_fighter(&records);
        assert_eq!(summaries[0].strike_accuracy, 0.0);
    }

    #[test]
    fn fighter_accuracy_is_ratio_of_summed_totals() {
        // A beats B landing 10 of 20, then loses to C landing 5 of 25:
        // one summary with wins=1, losses=1, accuracy 15/45.
        let mut win = record("A", FightResult::Win, 10, 20);
        win.opponent = "B".to_string();
        let mut loss = record("A", FightResult::Loss, 5, 25);
        loss.opponent = "C".to_string();

        let summaries = summarize_by_fighter(&[win, loss]);
        assert_eq!(summaries.len(), 1);
        let a = &summaries[0];
        assert_eq!(a.wins, 1);
        assert_eq!(a.losses, 1);
        assert!((a.strike_accuracy - 15.0 / 45.0).abs() < 1e-9);
        assert!((a.win_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn summaries_are_idempotent() {
        let records = vec![
            record("A", FightResult::Win, 10, 20),
            record("B", FightResult::Loss, 5, 25),
        ];
        assert_eq!(summarize_by_fighter(&records), summarize_by_fighter(&records));
        assert_eq!(
            summarize_by_weight_class(&records),
            summarize_by_weight_class(&records)
        );
        assert_eq!(
            summarize_over_time(&records, by_year),
            summarize_over_time(&records, by_year)
        );
    }

    #[test]
    fn ko_and_sub_wins_are_counted_separately() {
        let mut ko = record("A", FightResult::Win, 10, 20);
        ko.method = FinishMethod::KoTko;
        let mut sub = record("A", FightResult::Win, 10, 20);
        sub.method = FinishMethod::Submission;
        // a knockout loss is the opponent's knockout, not ours
        let mut ko_loss = record("A", FightResult::Loss, 2, 9);
        ko_loss.method = FinishMethod::KoTko;

        let summaries = summarize_by_fighter(&[ko, sub, ko_loss]);
        let a = &summaries[0];
        assert_eq!(a.ko_wins, 1);
        assert_eq!(a.sub_wins, 1);
        assert!((a.ko_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn fighters_keep_first_appearance_order() {
        let records = vec![
            record("Zed", FightResult::Win, 1, 2),
            record("Amy", FightResult::Loss, 1, 2),
            record("Zed", FightResult::Win, 1, 2),
        ];
        let summaries = summarize_by_fighter(&records);
        let names: Vec<&str> = summaries.iter().map(|s| s.fighter.as_str()).collect();
        assert_eq!(names, ["Zed", "Amy"]);
    }

    #[test]
    fn weight_classes_keep_first_appearance_order() {
        let mut heavy = record("A", FightResult::Win, 40, 80);
        heavy.weight_class = WeightClass::Heavyweight;
        let light = record("B", FightResult::Loss, 10, 20);
        let mut heavy2 = record("C", FightResult::Win, 20, 80);
        heavy2.weight_class = WeightClass::Heavyweight;

        let aggs = summarize_by_weight_class(&[heavy, light, heavy2]);
        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].weight_class, WeightClass::Heavyweight);
        assert_eq!(aggs[0].fights, 2);
        assert!((aggs[0].mean_strikes_landed - 30.0).abs() < 1e-9);
        assert_eq!(aggs[1].weight_class, WeightClass::Lightweight);
    }

    #[test]
    fn weight_class_takedown_accuracy_is_mean_of_per_fight_ratios() {
        // 1/2 and 0/0 average to 0.25 under the zero-denominator policy
        let full = record("A", FightResult::Win, 0, 0);
        let mut none = record("B", FightResult::Loss, 0, 0);
        none.takedowns_landed = 0;
        none.takedowns_attempted = 0;

        let aggs = summarize_by_weight_class(&[full, none]);
        assert!((aggs[0].mean_takedown_accuracy - 0.25).abs() < 1e-9);
    }

    #[test]
    fn time_series_buckets_come_out_sorted() {
        let mut late = record("A", FightResult::Win, 10, 20);
        late.date = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
        late.method = FinishMethod::KoTko;
        let mut early = record("B", FightResult::Loss, 4, 8);
        early.date = NaiveDate::from_ymd_opt(2019, 2, 1).unwrap();

        let points = summarize_over_time(&[late, early], by_year);
        assert_eq!(points.len(), 2 * Metric::ALL.len());
        assert_eq!(points[0].bucket, "2019");
        assert_eq!(points[0].metric, Metric::Fights);
        assert_eq!(points[0].value, 1.0);

        let finishes_2021 = points
            .iter()
            .find(|p| p.bucket == "2021" && p.metric == Metric::Finishes)
            .unwrap();
        assert_eq!(finishes_2021.value, 1.0);
    }

    #[test]
    fn quarter_buckets_are_labeled_by_year_and_quarter() {
        assert_eq!(by_quarter(NaiveDate::from_ymd_opt(2019, 1, 15).unwrap()), "2019-Q1");
        assert_eq!(by_quarter(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()), "2019-Q4");
    }
}
