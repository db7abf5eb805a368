// Source table loading: per-player stats, per-player averages, and names.
//
// All three are CSV. Headers and fields are trimmed. The stats and averages
// exports carry a secondary header row directly under the real one, so their
// first data row is always dropped.

use crate::category::{Category, CategoryValues};
use crate::player_id::PlayerId;
use csv::StringRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Column holding the player identifier in every source.
pub const PLAYER_ID_COLUMN: &str = "Player_ID";

/// Column holding the display name in the name source.
pub const NAME_COLUMN: &str = "Name";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One row of the primary stats source.
#[derive(Debug, Clone)]
pub struct RawPlayerRecord {
    pub player_id: PlayerId,
    /// `None` where the source value was missing or not a number.
    pub stats: CategoryValues<Option<f64>>,
}

/// Raw per-game averages keyed by canonical player ID.
#[derive(Debug, Clone, Default)]
pub struct AveragesTable {
    by_id: HashMap<String, CategoryValues<Option<f64>>>,
    /// Categories with no column in the source file.
    pub missing_columns: Vec<Category>,
    /// Data rows read, after the dropped metadata row.
    pub rows: usize,
}

impl AveragesTable {
    pub fn get(&self, id: &PlayerId) -> Option<&CategoryValues<Option<f64>>> {
        self.entry(id).map(|(_, values)| values)
    }

    /// The stored canonical ID together with its averages.
    pub fn entry(&self, id: &PlayerId) -> Option<(&str, &CategoryValues<Option<f64>>)> {
        id.as_str()
            .and_then(|key| self.by_id.get_key_value(key))
            .map(|(key, values)| (key.as_str(), values))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Display names keyed by canonical player ID.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    by_id: HashMap<String, Option<String>>,
    /// Data rows read.
    pub rows: usize,
}

impl NameTable {
    /// The name for `id`, or `None` if the player is unknown or nameless.
    pub fn get(&self, id: &PlayerId) -> Option<&str> {
        id.as_str()
            .and_then(|key| self.by_id.get(key))
            .and_then(|name| name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} is missing required column `{column}`")]
    MissingColumn { path: String, column: String },
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawName {
    #[serde(default)]
    Player_ID: String,
    #[serde(default)]
    Name: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a cell as a finite number. Anything else is absent.
fn coerce_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn reader_for<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr)
}

fn column_index(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| h == column)
}

fn require_column(headers: &StringRecord, column: &str, origin: &str) -> Result<usize, SourceError> {
    column_index(headers, column).ok_or_else(|| SourceError::MissingColumn {
        path: origin.to_string(),
        column: column.to_string(),
    })
}

fn read_category_cells(
    record: &StringRecord,
    columns: &CategoryValues<Option<usize>>,
) -> CategoryValues<Option<f64>> {
    columns.map(|_, idx| idx.and_then(|i| record.get(i)).and_then(coerce_number))
}

fn csv_error(origin: &str) -> impl Fn(csv::Error) -> SourceError + '_ {
    move |e| SourceError::Csv {
        path: origin.to_string(),
        source: e,
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (crate-private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_stats_from_reader<R: Read>(rdr: R, origin: &str) -> Result<Vec<RawPlayerRecord>, SourceError> {
    let mut reader = reader_for(rdr);
    let headers = reader.headers().map_err(csv_error(origin))?.clone();

    let id_col = require_column(&headers, PLAYER_ID_COLUMN, origin)?;
    let mut columns: CategoryValues<Option<usize>> = CategoryValues::default();
    for category in Category::ALL {
        columns[category] = Some(require_column(&headers, category.code(), origin)?);
    }

    let mut records = Vec::new();
    for result in reader.records().skip(1) {
        let record = result.map_err(csv_error(origin))?;
        let raw_id = record.get(id_col).unwrap_or("");
        let player_id = PlayerId::parse(raw_id);
        if !player_id.is_parseable() {
            warn!("stats row has unparseable Player_ID '{}'", raw_id);
        }
        records.push(RawPlayerRecord {
            player_id,
            stats: read_category_cells(&record, &columns),
        });
    }
    Ok(records)
}

pub(crate) fn load_averages_from_reader<R: Read>(rdr: R, origin: &str) -> Result<AveragesTable, SourceError> {
    let mut reader = reader_for(rdr);
    let headers = reader.headers().map_err(csv_error(origin))?.clone();

    let id_col = require_column(&headers, PLAYER_ID_COLUMN, origin)?;
    let columns = CategoryValues::from_fn(|c| column_index(&headers, c.code()));
    let missing_columns: Vec<Category> = columns
        .iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(c, _)| c)
        .collect();
    for category in &missing_columns {
        warn!("{} has no `{}` column; its raw values will be null", origin, category);
    }

    let mut table = AveragesTable {
        missing_columns,
        ..AveragesTable::default()
    };
    for result in reader.records().skip(1) {
        let record = result.map_err(csv_error(origin))?;
        table.rows += 1;
        let raw_id = record.get(id_col).unwrap_or("");
        let Some(key) = PlayerId::parse(raw_id).as_str().map(str::to_string) else {
            warn!("skipping averages row with unparseable Player_ID '{}'", raw_id);
            continue;
        };
        if table.by_id.contains_key(&key) {
            warn!("duplicate averages row for Player_ID {}, keeping the first", key);
            continue;
        }
        table.by_id.insert(key, read_category_cells(&record, &columns));
    }
    Ok(table)
}

pub(crate) fn load_names_from_reader<R: Read>(rdr: R, origin: &str) -> Result<NameTable, SourceError> {
    let mut reader = reader_for(rdr);
    let headers = reader.headers().map_err(csv_error(origin))?.clone();
    require_column(&headers, PLAYER_ID_COLUMN, origin)?;
    require_column(&headers, NAME_COLUMN, origin)?;

    let mut table = NameTable::default();
    for result in reader.deserialize::<RawName>() {
        let raw = result.map_err(csv_error(origin))?;
        table.rows += 1;
        let id = PlayerId::parse_name_source(&raw.Player_ID);
        let Some(key) = id.as_str().map(str::to_string) else {
            continue;
        };
        let name = Some(raw.Name.trim().to_string()).filter(|n| !n.is_empty());
        if let Some(existing) = table.by_id.get(&key) {
            warn!(
                "duplicate name row for Player_ID {} ({:?}), keeping {:?}",
                key, name, existing
            );
            continue;
        }
        table.by_id.insert(key, name);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, SourceError> {
    std::fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the primary per-player stats source.
pub fn load_stats(path: &Path) -> Result<Vec<RawPlayerRecord>, SourceError> {
    load_stats_from_reader(open(path)?, &path.display().to_string())
}

/// Load the per-player averages source.
pub fn load_averages(path: &Path) -> Result<AveragesTable, SourceError> {
    load_averages_from_reader(open(path)?, &path.display().to_string())
}

/// Load the player ID → display name source.
pub fn load_names(path: &Path) -> Result<NameTable, SourceError> {
    load_names_from_reader(open(path)?, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const STATS_HEADER: &str = "Player_ID,FG_PCT,FG3_PCT,FT_PCT,REB,AST,STL,BLK,TOV,PF,PTS";

    fn stats_csv(rows: &[&str]) -> String {
        let mut out = String::from(STATS_HEADER);
        out.push_str("\nPlayer_ID,FG_PCT,FG3_PCT,FT_PCT,REB,AST,STL,BLK,TOV,PF,PTS");
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    // -- Stats source --

    #[test]
    fn stats_first_data_row_is_dropped() {
        let csv_data = stats_csv(&["2544,0.5,0.4,0.7,7.3,8.3,1.3,0.5,3.5,1.1,25.7"]);
        let records = load_stats_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player_id.as_str(), Some("2544"));
        assert_eq!(records[0].stats[Category::Points], Some(25.7));
        assert_eq!(records[0].stats[Category::Assists], Some(8.3));
    }

    #[test]
    fn stats_non_numeric_cells_are_absent() {
        let csv_data = stats_csv(&["201939,0.45,,0.9,abc,6.1,NaN,0.4,3.0,2.0,26.4"]);
        let records = load_stats_from_reader(csv_data.as_bytes(), "test").unwrap();
        let stats = &records[0].stats;
        assert_eq!(stats[Category::ThreePointPct], None);
        assert_eq!(stats[Category::Rebounds], None);
        assert_eq!(stats[Category::Steals], None);
        assert_eq!(stats[Category::FreeThrowPct], Some(0.9));
    }

    #[test]
    fn stats_headers_and_ids_trimmed() {
        let csv_data = "\
 Player_ID , FG_PCT ,FG3_PCT,FT_PCT,REB,AST,STL,BLK,TOV,PF, PTS
meta,meta,meta,meta,meta,meta,meta,meta,meta,meta,meta
 2544.0 ,0.5,0.4,0.7,7.3,8.3,1.3,0.5,3.5,1.1, 25.7 ";
        let records = load_stats_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(records[0].player_id.as_str(), Some("2544"));
        assert_eq!(records[0].stats[Category::Points], Some(25.7));
    }

    #[test]
    fn stats_unparseable_id_is_kept_as_sentinel() {
        let csv_data = stats_csv(&["n/a,0.5,0.4,0.7,7.3,8.3,1.3,0.5,3.5,1.1,25.7"]);
        let records = load_stats_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].player_id.is_parseable());
    }

    #[test]
    fn stats_extra_columns_ignored() {
        let csv_data = "\
Player_ID,GP,FG_PCT,FG3_PCT,FT_PCT,REB,AST,STL,BLK,TOV,PF,PTS,MIN
x,x,x,x,x,x,x,x,x,x,x,x,x
1,70,0.5,0.4,0.7,7.3,8.3,1.3,0.5,3.5,1.1,25.7,35.0";
        let records = load_stats_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(records[0].stats[Category::FieldGoalPct], Some(0.5));
        assert_eq!(records[0].stats[Category::Points], Some(25.7));
    }

    #[test]
    fn stats_missing_category_column_is_fatal() {
        let csv_data = "\
Player_ID,FG_PCT,FG3_PCT,FT_PCT,REB,AST,STL,BLK,TOV,PF
x,x,x,x,x,x,x,x,x,x
1,0.5,0.4,0.7,7.3,8.3,1.3,0.5,3.5,1.1";
        match load_stats_from_reader(csv_data.as_bytes(), "stats.csv").unwrap_err() {
            SourceError::MissingColumn { column, path } => {
                assert_eq!(column, "PTS");
                assert_eq!(path, "stats.csv");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn stats_ragged_row_is_fatal() {
        let csv_data = stats_csv(&["1,0.5,0.4"]);
        let err = load_stats_from_reader(csv_data.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, SourceError::Csv { .. }));
    }

    #[test]
    fn stats_header_only_is_empty() {
        let records = load_stats_from_reader(STATS_HEADER.as_bytes(), "test").unwrap();
        assert!(records.is_empty());
    }

    // -- Averages source --

    #[test]
    fn averages_keyed_by_canonical_id() {
        let csv_data = "\
Player_ID,PTS,AST
meta,meta,meta
2544.0,25.7,8.3
201939,26.4,6.1";
        let table = load_averages_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows, 2);
        let (key, lebron) = table.entry(&PlayerId::parse("2544.00")).unwrap();
        assert_eq!(key, "2544");
        assert_eq!(lebron[Category::Points], Some(25.7));
        assert_eq!(lebron[Category::Rebounds], None);
    }

    #[test]
    fn averages_missing_category_columns_are_recorded() {
        let csv_data = "\
Player_ID,PTS
meta,meta
1,10.0";
        let table = load_averages_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.missing_columns.len(), 9);
        assert!(!table.missing_columns.contains(&Category::Points));
    }

    #[test]
    fn averages_missing_id_column_is_fatal() {
        let csv_data = "ID,PTS\nx,x\n1,10.0";
        let err = load_averages_from_reader(csv_data.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { .. }));
    }

    #[test]
    fn averages_duplicate_keeps_first() {
        let csv_data = "\
Player_ID,PTS
meta,meta
1,10.0
1.0,20.0";
        let table = load_averages_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&PlayerId::parse("1")).unwrap()[Category::Points], Some(10.0));
    }

    #[test]
    fn averages_unparseable_ids_never_match() {
        let csv_data = "\
Player_ID,PTS
meta,meta
abc,10.0";
        let table = load_averages_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert!(table.is_empty());
        assert!(table.get(&PlayerId::parse("abc")).is_none());
    }

    // -- Name source --

    #[test]
    fn names_keep_first_row() {
        let csv_data = "\
Player_ID,Name
2544,LeBron James
201939.0, Stephen Curry ";
        let table = load_names_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.rows, 2);
        assert_eq!(table.get(&PlayerId::parse("2544")), Some("LeBron James"));
        assert_eq!(table.get(&PlayerId::parse("201939")), Some("Stephen Curry"));
    }

    #[test]
    fn names_unparseable_ids_collapse_to_zero_first_wins() {
        let csv_data = "\
Player_ID,Name
,Unknown One
junk,Unknown Two";
        let table = load_names_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&PlayerId::parse("0")), Some("Unknown One"));
    }

    #[test]
    fn names_blank_name_is_absent() {
        let csv_data = "Player_ID,Name\n7,\n";
        let table = load_names_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&PlayerId::parse("7")), None);
    }

    #[test]
    fn names_header_only_is_empty() {
        let table = load_names_from_reader("Player_ID,Name\n".as_bytes(), "test").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.rows, 0);
    }

    #[test]
    fn names_missing_name_column_is_fatal() {
        let csv_data = "Player_ID,Full\n1,A";
        match load_names_from_reader(csv_data.as_bytes(), "test").unwrap_err() {
            SourceError::MissingColumn { column, .. } => assert_eq!(column, NAME_COLUMN),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_stats(Path::new("/nonexistent/skillboard/stats.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
