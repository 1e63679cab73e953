use serde::Serialize;
use super::staffing::{is_understaffed, required_staff};
use super::types::{Day, Location, SalesProjection, Schedule};

/// Element id of the container the page renders the day into and the exporter captures
pub const RENDER_TARGET_ID: &str = "scheduler";

/// One location card of the day view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub location: Location,
    pub shifts: Vec<String>,
    pub sales_projection: SalesProjection,
    pub required_staff: u32,
    pub understaffed: bool,
}

/// Everything needed to draw one day, derived fresh from the schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub day: Day,
    pub render_target: &'static str,
    pub locations: Vec<LocationView>,
}

impl DayView {
    pub fn build(schedule: &Schedule, day: Day) -> Self {
        let locations = schedule
            .day(day)
            .iter()
            .map(|(location, entry)| LocationView {
                location,
                shifts: entry.shifts.clone(),
                sales_projection: entry.sales_projection,
                required_staff: required_staff(entry.sales_projection),
                understaffed: is_understaffed(entry.shifts.len(), entry.sales_projection),
            })
            .collect();

        DayView {
            day,
            render_target: RENDER_TARGET_ID,
            locations,
        }
    }

    pub fn understaffed_count(&self) -> usize {
        self.locations.iter().filter(|l| l.understaffed).count()
    }
}
