use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::schedule::DayView;

/// Formats an employee list the way the cards show it
pub fn format_shifts(shifts: &[String]) -> String {
    if shifts.is_empty() {
        "[NOBODY]".to_string()
    } else {
        shifts.join(", ")
    }
}

/// Plain-text rendering of a day view, one block per location
pub struct DayText<'a>(pub &'a DayView);

impl fmt::Display for DayText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "=== {} Schedule ===", view.day)?;
        for loc in &view.locations {
            let flag = if loc.understaffed { "  ⚠ Understaffed" } else { "" };
            writeln!(
                f,
                "{:<10} ${:>8}  staff {}/{}{}",
                loc.location.label(),
                loc.sales_projection.to_string(),
                loc.shifts.len(),
                loc.required_staff,
                flag
            )?;
            writeln!(f, "           {}", format_shifts(&loc.shifts))?;
        }
        let understaffed = view.understaffed_count();
        if understaffed > 0 {
            writeln!(f, "{} location(s) understaffed", understaffed)?;
        }
        Ok(())
    }
}

pub fn render_day_text(view: &DayView) -> String {
    DayText(view).to_string()
}

/// Prints a day view in a readable format
pub fn print_day_schedule(view: &DayView) {
    println!("\n{}", render_day_text(view));
}

/// Writes the text rendering of a day to `path`
pub fn write_schedule_to_file(view: &DayView, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write!(file, "{}", DayText(view))
}
