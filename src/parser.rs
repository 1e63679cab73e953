use std::fs::File;
use std::io::Read;
use std::path::Path;
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::{debug, warn};
use crate::schedule::{Day, Location, ProjectionError, Schedule, UnknownDay, UnknownLocation};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("could not read roster: {0}")]
    Csv(#[from] csv::Error),

    #[error("roster is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("line {line}: {source}")]
    Day { line: u64, source: UnknownDay },

    #[error("line {line}: {source}")]
    Location { line: u64, source: UnknownLocation },

    #[error("line {line}: {source}")]
    Projection { line: u64, source: ProjectionError },
}

struct Columns {
    day: usize,
    location: usize,
    employee: Option<usize>,
    sales_projection: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, RosterError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Ok(Columns {
            day: find("day").ok_or(RosterError::MissingColumn("day"))?,
            location: find("location").ok_or(RosterError::MissingColumn("location"))?,
            employee: find("employee"),
            sales_projection: find("sales_projection"),
        })
    }
}

/// Loads a roster CSV (`day,location,employee,sales_projection`) into a fresh schedule.
///
/// Rows are replayed in file order: a non-empty `employee` is added to the cell,
/// then a non-empty `sales_projection` replaces the cell's projection.
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Schedule, RosterError> {
    let file = File::open(csv_path).map_err(csv::Error::from)?;
    load_roster_from_reader(file)
}

pub fn load_roster_from_reader<R: Read>(input: R) -> Result<Schedule, RosterError> {
    let reader = ReaderBuilder::new().flexible(true).from_reader(input);
    apply_roster(reader, Schedule::new())
}

fn apply_roster<R: Read>(mut reader: Reader<R>, mut schedule: Schedule) -> Result<Schedule, RosterError> {
    let columns = Columns::locate(reader.headers()?)?;
    let mut rows = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let day_raw = field(Some(columns.day));
        let location_raw = field(Some(columns.location));
        if day_raw.is_empty() && location_raw.is_empty() {
            continue; // blank line
        }

        let day: Day = day_raw
            .parse()
            .map_err(|source| RosterError::Day { line, source })?;
        let location: Location = location_raw
            .parse()
            .map_err(|source| RosterError::Location { line, source })?;

        let employee = field(columns.employee);
        if !employee.is_empty() {
            schedule = schedule.add_employee(day, location, employee);
        }

        let projection = field(columns.sales_projection);
        if !projection.is_empty() {
            schedule = schedule
                .set_sales_projection(day, location, projection)
                .map_err(|source| {
                    warn!(line, value = projection, "rejected sales projection");
                    RosterError::Projection { line, source }
                })?;
        }
        rows += 1;
    }

    debug!(rows, "loaded roster");
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use super::*;

    #[test]
    fn rows_apply_in_order() {
        let csv = "\
day,location,employee,sales_projection
Tuesday,Downtown,Carla,
tuesday,downtown,Ben,350
Tuesday,Downtown,,400
Monday,Suburb,Dee,
";
        let schedule = load_roster_from_reader(csv.as_bytes()).unwrap();
        let cell = schedule.cell(Day::Tuesday, Location::Downtown);
        assert_eq!(cell.shifts, ["Carla", "Ben"]);
        assert_eq!(cell.sales_projection.value(), 400.0);
        assert_eq!(schedule.cell(Day::Monday, Location::Suburb).shifts, ["Dee"]);
    }

    #[test]
    fn columns_can_be_reordered_or_missing() {
        let csv = "location,day,employee\nUptown,Sunday,Eve\n";
        let schedule = load_roster_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(schedule.cell(Day::Sunday, Location::Uptown).shifts, ["Eve"]);
    }

    #[test]
    fn errors_carry_the_line() {
        let csv = "day,location,employee,sales_projection\nMonday,Downtown,Al,\nMonday,Harbor,Bo,\n";
        let err = load_roster_from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 3: unknown location 'Harbor'");

        let csv = "day,location,employee,sales_projection\nMonday,Downtown,,-20\n";
        let err = load_roster_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::Projection { line: 2, .. }));
    }

    #[test]
    fn missing_required_column() {
        let err = load_roster_from_reader("employee\nAl\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::MissingColumn("day")));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "day,location,employee,sales_projection").unwrap();
        writeln!(file, "Friday,Midtown,Gil,100").unwrap();
        let schedule = load_roster(file.path()).unwrap();
        assert_eq!(schedule.cell(Day::Friday, Location::Midtown).shifts, ["Gil"]);
    }
}
