// Command line driver. Loads the csv once, runs the requested summaries,
// and writes reports and charts.
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

mod aggregate;
mod charts;
mod io;
mod report;

use aggregate::{FighterSummary, Metric};

#[derive(Parser)]
#[command(name = "fight-stats")]
#[command(about = "Descriptive statistics and charts over UFC fight records", long_about = None)]
struct Cli {
    /// Path to the fight record csv
    #[arg(long, default_value = "data/ufc_fights.csv")]
    csv: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Bucketing {
    Year,
    Quarter,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dataset-level counts
    Overview,
    /// Rank fighters by wins
    Fighters {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Aggregate per weight class
    WeightClasses,
    /// Aggregate per time bucket
    Trends {
        #[arg(long, value_enum, default_value = "year")]
        bucket: Bucketing,
    },
    /// Compare two fighters head to head
    Compare { fighter1: String, fighter2: String },
    /// Write the markdown report and all charts to a directory
    Report {
        #[arg(long, default_value = "reports")]
        out: PathBuf,
    },
}

fn find_fighter<'a>(
    summaries: &'a [FighterSummary],
    name: &str,
) -> anyhow::Result<&'a FighterSummary> {
    summaries
        .iter()
        .find(|s| s.fighter == name)
        .ok_or_else(|| anyhow::anyhow!("no fights found for {}", name))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let records = io::load_csv(&cli.csv)
        .with_context(|| format!("failed to load fight records from {}", cli.csv.display()))?;
    println!("Loaded {} fight records from {}", records.len(), cli.csv.display());

    match cli.command {
        Commands::Overview => match report::overview(&records) {
            Some(ov) => {
                println!("Records:        {}", ov.records);
                println!("Fighters:       {}", ov.fighters);
                println!("Weight classes: {}", ov.weight_classes);
                println!("Date range:     {} to {}", ov.first_date, ov.last_date);
            }
            None => println!("No fight records to summarize."),
        },
        Commands::Fighters { limit } => {
            let summaries = aggregate::summarize_by_fighter(&records);
            for summary in report::rank_by_wins(&summaries).iter().take(limit) {
                println!(
                    "{:<28} {:>3}-{:<3}-{:<3} win rate {:>5.1}%  strike accuracy {:>5.1}%",
                    summary.fighter,
                    summary.wins,
                    summary.losses,
                    summary.draws,
                    summary.win_rate * 100.0,
                    summary.strike_accuracy * 100.0,
                );
            }
        }
        Commands::WeightClasses => {
            for agg in aggregate::summarize_by_weight_class(&records) {
                println!(
                    "{:<22} {:>5} fights  {:>6.1} strikes landed/fight  \
                     takedown accuracy {:>5.1}%  {:>4.2} submission attempts/fight",
                    agg.weight_class.label(),
                    agg.fights,
                    agg.mean_strikes_landed,
                    agg.mean_takedown_accuracy * 100.0,
                    agg.mean_submission_attempts,
                );
            }
        }
        Commands::Trends { bucket } => {
            let points = match bucket {
                Bucketing::Year => aggregate::summarize_over_time(&records, aggregate::by_year),
                Bucketing::Quarter => {
                    aggregate::summarize_over_time(&records, aggregate::by_quarter)
                }
            };
            // points come out bucket-major, one entry per metric
            for chunk in points.chunks(Metric::ALL.len()) {
                let values = chunk
                    .iter()
                    .map(|p| format!("{} {:.2}", p.metric.label(), p.value))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}: {}", chunk[0].bucket, values);
            }
        }
        Commands::Compare { fighter1, fighter2 } => {
            if fighter1 == fighter2 {
                anyhow::bail!("pick two different fighters to compare");
            }
            let summaries = aggregate::summarize_by_fighter(&records);
            let a = find_fighter(&summaries, &fighter1)?;
            let b = find_fighter(&summaries, &fighter2)?;
            print!("{}", report::head_to_head(a, b));
        }
        Commands::Report { out } => {
            fs::create_dir_all(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;

            let report_path = out.join("report.md");
            fs::write(&report_path, report::build_report(&records))?;
            println!("Wrote {}", report_path.display());

            let summaries = aggregate::summarize_by_fighter(&records);
            let weight_classes = aggregate::summarize_by_weight_class(&records);
            let points = aggregate::summarize_over_time(&records, aggregate::by_year);

            let fighters_png = out.join("top_fighters.png");
            charts::plot_top_fighters(&summaries, 10, &fighters_png)?;
            println!("Wrote {}", fighters_png.display());

            let classes_png = out.join("weight_classes.png");
            charts::plot_weight_class_fights(&weight_classes, &classes_png)?;
            println!("Wrote {}", classes_png.display());

            let trend_png = out.join("fights_per_year.png");
            charts::plot_trend(&points, Metric::Fights, &trend_png)?;
            println!("Wrote {}", trend_png.display());

            let methods_png = out.join("win_methods.png");
            charts::plot_finish_methods(&records, &methods_png)?;
            println!("Wrote {}", methods_png.display());
        }
    }

    Ok(())
}
