use super::types::{Day, DaySchedule, Location, LocationEntry, ProjectionError, SalesProjection, Schedule};

impl Schedule {
    /// Read-only view of one location/day cell
    pub fn cell(&self, day: Day, location: Location) -> &LocationEntry {
        self.day(day).entry(location)
    }

    /// Appends `name` to the cell's shifts. Blank names leave the schedule as is.
    #[must_use]
    pub fn add_employee(&self, day: Day, location: Location, name: &str) -> Schedule {
        if name.trim().is_empty() {
            return self.clone();
        }
        self.update_cell(day, location, |entry| entry.shifts.push(name.to_string()))
    }

    /// Removes the shift at `index`; an index past the end is ignored.
    #[must_use]
    pub fn remove_employee(&self, day: Day, location: Location, index: usize) -> Schedule {
        if index >= self.cell(day, location).shifts.len() {
            return self.clone();
        }
        self.update_cell(day, location, |entry| {
            entry.shifts.remove(index);
        })
    }

    /// Parses the raw field text and stores it as the cell's projection.
    pub fn set_sales_projection(
        &self,
        day: Day,
        location: Location,
        raw: &str,
    ) -> Result<Schedule, ProjectionError> {
        let projection = SalesProjection::parse(raw)?;
        Ok(self.with_sales_projection(day, location, projection))
    }

    #[must_use]
    pub fn with_sales_projection(
        &self,
        day: Day,
        location: Location,
        projection: SalesProjection,
    ) -> Schedule {
        self.update_cell(day, location, |entry| entry.sales_projection = projection)
    }

    // Builds the successor schedule: one new entry, one new day, everything else shared.
    fn update_cell<F>(&self, day: Day, location: Location, edit: F) -> Schedule
    where
        F: FnOnce(&mut LocationEntry),
    {
        let current: &DaySchedule = self.day_arc(day);
        let mut entry = current.entry_arc(location).as_ref().clone();
        edit(&mut entry);
        self.replace_day(day, current.replace(location, entry))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use super::*;

    fn shifts(schedule: &Schedule, day: Day, location: Location) -> Vec<&str> {
        schedule.cell(day, location).shifts.iter().map(String::as_str).collect()
    }

    #[test]
    fn fresh_schedule_has_every_cell_empty() {
        let schedule = Schedule::new();
        for day in Day::ALL {
            for loc in Location::ALL {
                let cell = schedule.cell(day, loc);
                assert!(cell.shifts.is_empty());
                assert_eq!(cell.sales_projection, SalesProjection::ZERO);
            }
        }
    }

    #[test]
    fn blank_names_are_ignored() {
        let schedule = Schedule::new();
        let after = schedule
            .add_employee(Day::Monday, Location::Downtown, "")
            .add_employee(Day::Monday, Location::Downtown, "   ");
        assert!(after.cell(Day::Monday, Location::Downtown).shifts.is_empty());
        assert_eq!(after, schedule);
    }

    #[test]
    fn adds_keep_insertion_order_and_duplicates() {
        let schedule = Schedule::new()
            .add_employee(Day::Friday, Location::Uptown, "Alice")
            .add_employee(Day::Friday, Location::Uptown, "Bob")
            .add_employee(Day::Friday, Location::Uptown, "Alice");
        assert_eq!(shifts(&schedule, Day::Friday, Location::Uptown), ["Alice", "Bob", "Alice"]);
    }

    #[test]
    fn remove_shifts_later_entries_left() {
        let schedule = Schedule::new()
            .add_employee(Day::Monday, Location::Midtown, "Alice")
            .add_employee(Day::Monday, Location::Midtown, "Bob")
            .add_employee(Day::Monday, Location::Midtown, "Cleo");

        let first_gone = schedule.remove_employee(Day::Monday, Location::Midtown, 0);
        assert_eq!(shifts(&first_gone, Day::Monday, Location::Midtown), ["Bob", "Cleo"]);

        let middle_gone = schedule.remove_employee(Day::Monday, Location::Midtown, 1);
        assert_eq!(shifts(&middle_gone, Day::Monday, Location::Midtown), ["Alice", "Cleo"]);
    }

    #[test]
    fn remove_out_of_bounds_is_noop() {
        let schedule = Schedule::new().add_employee(Day::Monday, Location::Suburb, "Alice");
        let after = schedule.remove_employee(Day::Monday, Location::Suburb, 5);
        assert_eq!(after, schedule);
        let empty = Schedule::new().remove_employee(Day::Sunday, Location::Suburb, 0);
        assert_eq!(empty, Schedule::new());
    }

    #[test]
    fn invalid_projection_leaves_schedule_untouched() {
        let schedule = Schedule::new()
            .set_sales_projection(Day::Monday, Location::Downtown, "250")
            .unwrap();
        assert!(schedule.set_sales_projection(Day::Monday, Location::Downtown, "-5").is_err());
        assert!(schedule.set_sales_projection(Day::Monday, Location::Downtown, "lots").is_err());
        assert_eq!(schedule.cell(Day::Monday, Location::Downtown).sales_projection.value(), 250.0);
    }

    #[test]
    fn mutation_touches_only_its_cell() {
        let before = Schedule::new()
            .add_employee(Day::Tuesday, Location::Uptown, "Dana")
            .set_sales_projection(Day::Wednesday, Location::Suburb, "120")
            .unwrap();
        let after = before.add_employee(Day::Tuesday, Location::Downtown, "Carla");

        for day in Day::ALL {
            for loc in Location::ALL {
                if (day, loc) == (Day::Tuesday, Location::Downtown) {
                    continue;
                }
                assert_eq!(after.cell(day, loc), before.cell(day, loc));
                assert!(Arc::ptr_eq(
                    after.day_arc(day).entry_arc(loc),
                    before.day_arc(day).entry_arc(loc)
                ));
            }
            if day != Day::Tuesday {
                assert!(Arc::ptr_eq(after.day_arc(day), before.day_arc(day)));
            }
        }
        // the predecessor is still intact
        assert!(before.cell(Day::Tuesday, Location::Downtown).shifts.is_empty());
        assert_eq!(shifts(&after, Day::Tuesday, Location::Downtown), ["Carla"]);
    }
}
