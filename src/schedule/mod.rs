pub mod types;
pub mod store;
pub mod staffing;
pub mod view;

pub use types::{Day, Location, ProjectionError, Schedule, UnknownDay, UnknownLocation};
pub use view::{DayView, LocationView};
