use serde::Deserialize;
use crate::export::ExportFormat;
use crate::schedule::{Day, Location, UnknownDay, UnknownLocation};

/// Day selector change from the page
#[derive(Debug, Deserialize)]
pub struct SelectDayRequest {
    pub day: String,
}

impl SelectDayRequest {
    pub fn day(&self) -> Result<Day, UnknownDay> {
        self.day.parse()
    }
}

/// "Add Employee" button on a location card
#[derive(Debug, Deserialize)]
pub struct AddEmployeeRequest {
    pub location: String,
    #[serde(default)]
    pub name: String,
}

impl AddEmployeeRequest {
    pub fn location(&self) -> Result<Location, UnknownLocation> {
        self.location.parse()
    }
}

/// Sales projection field, committed on every change. `value` is the raw field text.
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    pub location: String,
    #[serde(default, deserialize_with = "field_text")]
    pub value: String,
}

impl ProjectionRequest {
    pub fn location(&self) -> Result<Location, UnknownLocation> {
        self.location.parse()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<ExportFormat>,
}

// Number inputs may post either a string or a JSON number
fn field_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
        Null(()),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
        Text::Null(()) => String::new(),
    })
}
