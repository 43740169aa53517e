// Module for loading and validating fight records. It reads the csv file,
// checks the header row against the expected schema, and handles missing data.
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use thiserror::Error;

/// Columns that must be present in the header row. `method` and
/// `time_minutes` are optional and zero/`Other`-filled when absent.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "fighter",
    "opponent",
    "date",
    "weight_class",
    "strikes_landed",
    "strikes_attempted",
    "takedowns_landed",
    "takedowns_attempted",
    "submission_attempts",
    "result",
];

/// Accepted date formats, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("no usable fight records in {path}")]
    Empty { path: String },
}

/// Weight class enum, covering the men's and women's divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightClass {
    Strawweight,
    Flyweight,
    Bantamweight,
    Featherweight,
    Lightweight,
    Welterweight,
    Middleweight,
    LightHeavyweight,
    Heavyweight,
    WomensStrawweight,
    WomensFlyweight,
    WomensBantamweight,
    WomensFeatherweight,
}

impl FromStr for WeightClass {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Strawweight" => Ok(WeightClass::Strawweight),
            "Flyweight" => Ok(WeightClass::Flyweight),
            "Bantamweight" => Ok(WeightClass::Bantamweight),
            "Featherweight" => Ok(WeightClass::Featherweight),
            "Lightweight" => Ok(WeightClass::Lightweight),
            "Welterweight" => Ok(WeightClass::Welterweight),
            "Middleweight" => Ok(WeightClass::Middleweight),
            "Light Heavyweight" => Ok(WeightClass::LightHeavyweight),
            "Heavyweight" => Ok(WeightClass::Heavyweight),
            "Women's Strawweight" => Ok(WeightClass::WomensStrawweight),
            "Women's Flyweight" => Ok(WeightClass::WomensFlyweight),
            "Women's Bantamweight" => Ok(WeightClass::WomensBantamweight),
            "Women's Featherweight" => Ok(WeightClass::WomensFeatherweight),
            other => Err(format!("unknown weight class: {}", other)),
        }
    }
}

impl WeightClass {
    pub fn label(&self) -> &'static str {
        match self {
            WeightClass::Strawweight => "Strawweight",
            WeightClass::Flyweight => "Flyweight",
            WeightClass::Bantamweight => "Bantamweight",
            WeightClass::Featherweight => "Featherweight",
            WeightClass::Lightweight => "Lightweight",
            WeightClass::Welterweight => "Welterweight",
            WeightClass::Middleweight => "Middleweight",
            WeightClass::LightHeavyweight => "Light Heavyweight",
            WeightClass::Heavyweight => "Heavyweight",
            WeightClass::WomensStrawweight => "Women's Strawweight",
            WeightClass::WomensFlyweight => "Women's Flyweight",
            WeightClass::WomensBantamweight => "Women's Bantamweight",
            WeightClass::WomensFeatherweight => "Women's Featherweight",
        }
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one bout from the row fighter's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightResult {
    Win,
    Loss,
    Draw,
    NoContest,
}

impl FromStr for FightResult {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(FightResult::Win),
            "loss" => Ok(FightResult::Loss),
            "draw" => Ok(FightResult::Draw),
            "no contest" | "nc" => Ok(FightResult::NoContest),
            other => Err(format!("unknown result: {}", other)),
        }
    }
}

/// How the bout ended. The source data spells KO/TKO and submissions a
/// dozen ways, so labels are normalized by keyword instead of parsed
/// strictly. Anything unrecognized lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishMethod {
    KoTko,
    Submission,
    Decision,
    Other,
}

impl FinishMethod {
    pub const ALL: [FinishMethod; 4] = [
        FinishMethod::KoTko,
        FinishMethod::Submission,
        FinishMethod::Decision,
        FinishMethod::Other,
    ];

    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        if lower.contains("ko") || lower.contains("knockout") {
            FinishMethod::KoTko
        } else if lower.contains("sub")
            || lower.contains("choke")
            || lower.contains("armbar")
            || lower.contains("triangle")
            || lower.contains("guillotine")
            || lower.contains("kimura")
        {
            FinishMethod::Submission
        } else if lower.contains("dec") {
            FinishMethod::Decision
        } else {
            FinishMethod::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FinishMethod::KoTko => "KO/TKO",
            FinishMethod::Submission => "Submission",
            FinishMethod::Decision => "Decision",
            FinishMethod::Other => "Other",
        }
    }
}

impl fmt::Display for FinishMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row per bout-fighter pairing.
#[derive(Debug, Clone)]
pub struct FightRecord {
    pub fighter: String,
    pub opponent: String,
    pub date: NaiveDate,
    pub weight_class: WeightClass,
    pub strikes_landed: u32,
    pub strikes_attempted: u32,
    pub takedowns_landed: u32,
    pub takedowns_attempted: u32,
    pub submission_attempts: u32,
    pub result: FightResult,
    pub method: FinishMethod,
    pub time_minutes: Option<f64>,
}

/// Raw csv row before validation. Numeric cells may be empty; the `method`
/// and `time_minutes` columns may be absent entirely.
#[derive(Debug, Deserialize)]
struct RawRow {
    fighter: String,
    opponent: String,
    date: String,
    weight_class: String,
    strikes_landed: Option<u32>,
    strikes_attempted: Option<u32>,
    takedowns_landed: Option<u32>,
    takedowns_attempted: Option<u32>,
    submission_attempts: Option<u32>,
    result: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    time_minutes: Option<f64>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s.trim(), fmt) {
            return Ok(date);
        }
    }
    Err(format!("unrecognized date: {}", s))
}

impl FightRecord {
    /// Validate a raw row. Missing numeric cells are coerced to zero;
    /// anything that breaks an invariant rejects the whole row.
    fn from_raw(raw: RawRow) -> Result<Self, String> {
        let fighter = raw.fighter.trim().to_string();
        let opponent = raw.opponent.trim().to_string();
        if fighter.is_empty() {
            return Err("empty fighter name".into());
        }

        let date = parse_date(&raw.date)?;
        let weight_class: WeightClass = raw.weight_class.parse()?;
        let result: FightResult = raw.result.parse()?;

        let strikes_landed = raw.strikes_landed.unwrap_or(0);
        let strikes_attempted = raw.strikes_attempted.unwrap_or(0);
        let takedowns_landed = raw.takedowns_landed.unwrap_or(0);
        let takedowns_attempted = raw.takedowns_attempted.unwrap_or(0);

        if strikes_landed > strikes_attempted {
            return Err(format!(
                "strikes landed ({}) exceed strikes attempted ({})",
                strikes_landed, strikes_attempted
            ));
        }
        if takedowns_landed > takedowns_attempted {
            return Err(format!(
                "takedowns landed ({}) exceed takedowns attempted ({})",
                takedowns_landed, takedowns_attempted
            ));
        }

        let method = raw
            .method
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map(FinishMethod::from_label)
            .unwrap_or(FinishMethod::Other);

        Ok(FightRecord {
            fighter,
            opponent,
            date,
            weight_class,
            strikes_landed,
            strikes_attempted,
            takedowns_landed,
            takedowns_attempted,
            submission_attempts: raw.submission_attempts.unwrap_or(0),
            result,
            method,
            time_minutes: raw.time_minutes,
        })
    }
}

fn check_schema(headers: &StringRecord) -> Result<(), SchemaError> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == required) {
            return Err(SchemaError::MissingColumn(required));
        }
    }
    Ok(())
}

pub fn load_csv(path: &Path) -> Result<Vec<FightRecord>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .has_headers(true)
        .from_reader(file);

    // Grab and own the header row. The schema is checked once, up front,
    // so a column mismatch fails here instead of deep in aggregation.
    let headers = rdr.headers()?.clone();
    check_schema(&headers)?;
    let expected_len = headers.len();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let raw: StringRecord = result?;

        // Skip completely empty lines without counting them as bad rows.
        if raw.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        if raw.len() != expected_len {
            eprintln!(
                "skipping line {}: expected {} fields, found {}",
                raw.position().map(|p| p.line()).unwrap_or(0),
                expected_len,
                raw.len(),
            );
            skipped += 1;
            continue;
        }

        let row: RawRow = match raw.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                eprintln!(
                    "skipping malformed record at line {}: {}",
                    raw.position().map(|p| p.line()).unwrap_or(0),
                    e
                );
                skipped += 1;
                continue;
            }
        };

        match FightRecord::from_raw(row) {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                eprintln!(
                    "skipping record at line {}: {}",
                    raw.position().map(|p| p.line()).unwrap_or(0),
                    reason
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        eprintln!("skipped {} unusable rows", skipped);
    }
    if records.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.display().to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;

    const HEADER: &str = concat!(
        "fighter,opponent,date,weight_class,",
        "strikes_landed,strikes_attempted,",
        "takedowns_landed,takedowns_attempted,",
        "submission_attempts,result,method,time_minutes",
    );

    fn write_fixture(name: &str, lines: &[&str]) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).expect("create fixture");
        for line in lines {
            writeln!(&mut f, "{}", line).expect("write fixture");
        }
        path
    }

    #[test]
    fn loads_well_formed_record() {
        let path = write_fixture(
            "fight_stats_load_ok.csv",
            &[
                HEADER,
                "Jon Jones,Daniel Cormier,2015-01-03,Light Heavyweight,58,135,2,5,1,win,Decision,25.0",
            ],
        );

        let recs = load_csv(&path).expect("load");
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.fighter, "Jon Jones");
        assert_eq!(r.opponent, "Daniel Cormier");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2015, 1, 3).unwrap());
        assert_eq!(r.weight_class, WeightClass::LightHeavyweight);
        assert_eq!(r.strikes_landed, 58);
        assert_eq!(r.result, FightResult::Win);
        assert_eq!(r.method, FinishMethod::Decision);
        assert_eq!(r.time_minutes, Some(25.0));
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let path = write_fixture(
            "fight_stats_missing_col.csv",
            &[
                "fighter,opponent,date,strikes_landed,strikes_attempted,\
                 takedowns_landed,takedowns_attempted,submission_attempts,result",
                "A,B,2020-05-09,10,20,1,2,0,win",
            ],
        );

        match load_csv(&path) {
            Err(DataLoadError::Schema(SchemaError::MissingColumn(col))) => {
                assert_eq!(col, "weight_class");
            }
            other => panic!("expected schema error, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn skips_rows_that_break_invariants() {
        let path = write_fixture(
            "fight_stats_invariants.csv",
            &[
                HEADER,
                // landed > attempted, must be dropped
                "A,B,2020-05-09,Lightweight,30,20,1,2,0,win,KO,8.5",
                "C,D,2020-05-09,Lightweight,10,20,1,2,0,loss,KO,8.5",
            ],
        );

        let recs = load_csv(&path).expect("load");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].fighter, "C");
    }

    #[test]
    fn zero_fills_missing_numeric_cells() {
        let path = write_fixture(
            "fight_stats_zero_fill.csv",
            &[HEADER, "A,B,2020-05-09,Heavyweight,,,,,,win,,"],
        );

        let recs = load_csv(&path).expect("load");
        let r = &recs[0];
        assert_eq!(r.strikes_landed, 0);
        assert_eq!(r.strikes_attempted, 0);
        assert_eq!(r.takedowns_attempted, 0);
        assert_eq!(r.submission_attempts, 0);
        assert_eq!(r.method, FinishMethod::Other);
        assert_eq!(r.time_minutes, None);
    }

    #[test]
    fn accepts_optional_columns_being_absent() {
        let path = write_fixture(
            "fight_stats_no_optional.csv",
            &[
                "fighter,opponent,date,weight_class,strikes_landed,strikes_attempted,\
                 takedowns_landed,takedowns_attempted,submission_attempts,result",
                "A,B,2020-05-09,Flyweight,12,30,0,0,2,loss",
            ],
        );

        let recs = load_csv(&path).expect("load");
        assert_eq!(recs[0].method, FinishMethod::Other);
        assert_eq!(recs[0].time_minutes, None);
    }

    #[test]
    fn empty_data_section_is_an_error() {
        let path = write_fixture("fight_stats_empty.csv", &[HEADER]);
        assert!(matches!(load_csv(&path), Err(DataLoadError::Empty { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("fight_stats_does_not_exist.csv");
        assert!(matches!(load_csv(&path), Err(DataLoadError::Io { .. })));
    }

    #[test]
    fn parses_fallback_date_format() {
        assert_eq!(
            parse_date("01/03/2015").unwrap(),
            NaiveDate::from_ymd_opt(2015, 1, 3).unwrap()
        );
        assert!(parse_date("Jan 3 2015").is_err());
    }

    #[test]
    fn normalizes_finish_method_variants() {
        for label in ["KO", "TKO", "KO/TKO", "Knockout", "Technical Knockout"] {
            assert_eq!(FinishMethod::from_label(label), FinishMethod::KoTko);
        }
        for label in ["Submission", "Rear Naked Choke", "Guillotine", "Triangle", "Armbar"] {
            assert_eq!(FinishMethod::from_label(label), FinishMethod::Submission);
        }
        assert_eq!(
            FinishMethod::from_label("Unanimous Decision"),
            FinishMethod::Decision
        );
        assert_eq!(FinishMethod::from_label("DQ"), FinishMethod::Other);
    }
}
