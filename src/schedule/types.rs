use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

/// Day of the week a schedule is partitioned by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Day {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day '{0}'")]
pub struct UnknownDay(pub String);

impl FromStr for Day {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Day::ALL
            .into_iter()
            .find(|day| day.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDay(s.to_string()))
    }
}

/// Site an employee can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Downtown,
    Midtown,
    Uptown,
    Suburb,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Downtown,
        Location::Midtown,
        Location::Uptown,
        Location::Suburb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Location::Downtown => "Downtown",
            Location::Midtown => "Midtown",
            Location::Uptown => "Uptown",
            Location::Suburb => "Suburb",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown location '{0}'")]
pub struct UnknownLocation(pub String);

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Location::ALL
            .into_iter()
            .find(|loc| loc.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLocation(s.to_string()))
    }
}

/// Why a raw projection value was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("sales projection '{0}' is not a number")]
    NotANumber(String),

    #[error("sales projection must be a finite number")]
    NotFinite,

    #[error("sales projection cannot be negative (got {0})")]
    Negative(String),
}

/// Projected sales for one location on one day. Always finite and >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct SalesProjection(f64);

impl SalesProjection {
    pub const ZERO: SalesProjection = SalesProjection(0.0);

    pub fn new(value: f64) -> Result<Self, ProjectionError> {
        if !value.is_finite() {
            return Err(ProjectionError::NotFinite);
        }
        if value < 0.0 {
            return Err(ProjectionError::Negative(value.to_string()));
        }
        // normalizes -0.0
        Ok(SalesProjection(value + 0.0))
    }

    /// Parses the text of a number field. A cleared field counts as zero.
    pub fn parse(raw: &str) -> Result<Self, ProjectionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(SalesProjection::ZERO);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ProjectionError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for SalesProjection {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SalesProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

/// Assigned employees and projected sales for a single location/day cell
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LocationEntry {
    pub shifts: Vec<String>, // insertion order, duplicates allowed
    pub sales_projection: SalesProjection,
}

/// Schedule for a single day, one entry per location
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    entries: [Arc<LocationEntry>; 4],
}

impl DaySchedule {
    pub fn empty() -> Self {
        DaySchedule {
            entries: std::array::from_fn(|_| Arc::new(LocationEntry::default())),
        }
    }

    pub fn entry(&self, location: Location) -> &LocationEntry {
        &self.entries[location.index()]
    }

    pub(crate) fn entry_arc(&self, location: Location) -> &Arc<LocationEntry> {
        &self.entries[location.index()]
    }

    /// Copy of this day sharing every entry except `location`
    pub(crate) fn replace(&self, location: Location, entry: LocationEntry) -> Self {
        let mut entries = self.entries.clone();
        entries[location.index()] = Arc::new(entry);
        DaySchedule { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, &LocationEntry)> {
        Location::ALL.into_iter().map(move |loc| (loc, self.entry(loc)))
    }
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self::empty()
    }
}

/// The whole week: one day schedule per day, fully populated from the start
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    days: [Arc<DaySchedule>; 7],
}

impl Schedule {
    pub fn new() -> Self {
        Schedule {
            days: std::array::from_fn(|_| Arc::new(DaySchedule::empty())),
        }
    }

    pub fn day(&self, day: Day) -> &DaySchedule {
        &self.days[day.index()]
    }

    pub(crate) fn day_arc(&self, day: Day) -> &Arc<DaySchedule> {
        &self.days[day.index()]
    }

    /// Copy of this schedule sharing every day except `day`
    pub(crate) fn replace_day(&self, day: Day, schedule: DaySchedule) -> Self {
        let mut days = self.days.clone();
        days[day.index()] = Arc::new(schedule);
        Schedule { days }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_parse_case_insensitively() {
        assert_eq!("tuesday".parse::<Day>(), Ok(Day::Tuesday));
        assert_eq!(" SUNDAY ".parse::<Day>(), Ok(Day::Sunday));
        assert_eq!("Funday".parse::<Day>(), Err(UnknownDay("Funday".to_string())));
    }

    #[test]
    fn locations_parse_and_display() {
        for loc in Location::ALL {
            assert_eq!(loc.to_string().parse::<Location>(), Ok(loc));
        }
        assert!("Airport".parse::<Location>().is_err());
    }

    #[test]
    fn projection_parse_policy() {
        assert_eq!(SalesProjection::parse(""), Ok(SalesProjection::ZERO));
        assert_eq!(SalesProjection::parse("  350 ").map(SalesProjection::value), Ok(350.0));
        assert_eq!(SalesProjection::parse("12.5").map(SalesProjection::value), Ok(12.5));
        assert_eq!(
            SalesProjection::parse("abc"),
            Err(ProjectionError::NotANumber("abc".to_string()))
        );
        assert_eq!(SalesProjection::parse("NaN"), Err(ProjectionError::NotFinite));
        assert_eq!(SalesProjection::parse("inf"), Err(ProjectionError::NotFinite));
        assert!(matches!(SalesProjection::parse("-1"), Err(ProjectionError::Negative(_))));
    }

    #[test]
    fn negative_zero_is_zero() {
        let p = SalesProjection::parse("-0").unwrap();
        assert_eq!(p, SalesProjection::ZERO);
        assert!(p.value().is_sign_positive());
    }

    #[test]
    fn projection_display_drops_trailing_zeros() {
        assert_eq!(SalesProjection::new(350.0).unwrap().to_string(), "350");
        assert_eq!(SalesProjection::new(12.5).unwrap().to_string(), "12.50");
    }
}
