pub mod requests;

pub use requests::{AddEmployeeRequest, ExportQuery, ProjectionRequest, SelectDayRequest};
