//! Timeline document model
//!
//! Mirrors the JSON document edited by users: a view (mode + range), the
//! lanes items are grouped into, and the items themselves.
//!
//! The model is deliberately tolerant. Sections may be missing, the view mode
//! may hold an unsupported value and timestamps may hold unparseable text, so
//! that the validator can report every problem instead of the parse failing
//! on the first one.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Axis granularity of the timeline view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewMode {
    Day,
    Hour,
    /// A mode value the renderer does not understand, kept verbatim
    Unsupported(String),
}

impl ViewMode {
    /// Modes accepted by the validator, in the order they are reported
    pub const SUPPORTED: [&'static str; 2] = ["day", "hour"];

    pub fn as_str(&self) -> &str {
        match self {
            ViewMode::Day => "day",
            ViewMode::Hour => "hour",
            ViewMode::Unsupported(raw) => raw,
        }
    }

    /// Returns true for `day` and `hour`
    pub fn is_supported(&self) -> bool {
        !matches!(self, ViewMode::Unsupported(_))
    }

    /// Returns true if the axis should be laid out in hours
    pub fn is_hour(&self) -> bool {
        matches!(self, ViewMode::Hour)
    }
}

impl From<&str> for ViewMode {
    fn from(value: &str) -> Self {
        match value {
            "day" => ViewMode::Day,
            "hour" => ViewMode::Hour,
            other => ViewMode::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ViewMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ViewMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Non-string modes (numbers, objects) are kept as their JSON text
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => ViewMode::from(s.as_str()),
            other => ViewMode::Unsupported(other.to_string()),
        })
    }
}

/// A point in time as written in the document
///
/// Either a parsed instant (with its original UTC offset) or the raw text
/// that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Valid(DateTime<FixedOffset>),
    Invalid(String),
}

impl Timestamp {
    /// Parses an ISO-8601 timestamp, keeping the raw text when it is not one
    ///
    /// Accepts full RFC 3339, minute precision (`2024-01-01T00:00Z`),
    /// offset-less date-times and bare dates. Offset-less values are read as UTC.
    pub fn parse(raw: &str) -> Self {
        match parse_instant(raw) {
            Some(instant) => Timestamp::Valid(instant),
            None => Timestamp::Invalid(raw.to_string()),
        }
    }

    /// Returns the instant if the timestamp parsed
    pub fn instant(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Timestamp::Valid(instant) => Some(*instant),
            Timestamp::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Timestamp::Valid(_))
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Timestamp::Valid(instant)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Valid(instant) => {
                f.write_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Timestamp::Invalid(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => Timestamp::parse(&s),
            other => Timestamp::Invalid(other.to_string()),
        })
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(instant);
    }

    // Minute precision with an offset: `2024-01-01T00:00Z`, `2024-01-01T09:30+02:00`
    let zoned = match s.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => s.to_string(),
    };
    if let Ok(instant) = DateTime::parse_from_str(&zoned, "%Y-%m-%dT%H:%M%:z") {
        return Some(instant);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Reads an explicit JSON `null` as the field's default
///
/// Lets the validator report `"label": null` as a missing label instead of
/// the whole document failing to parse.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Start/end window of the whole timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
}

impl TimelineRange {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Returns both instants when both are present and valid
    pub fn instants(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let start = self.start.as_ref()?.instant()?;
        let end = self.end.as_ref()?.instant()?;
        Some((start, end))
    }
}

/// How the timeline is displayed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ViewMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<TimelineRange>,
}

impl TimelineView {
    pub fn new(mode: ViewMode, range: TimelineRange) -> Self {
        Self {
            mode: Some(mode),
            range: Some(range),
        }
    }
}

/// A horizontal track that items are placed on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineLane {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub label: String,

    /// Display hint only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TimelineLane {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Label to show for the lane, falling back to its id
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// A time-bounded entry on exactly one lane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineItem {
    /// Generated on parse when missing
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub lane_id: String,

    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,

    /// Real-valued day count; 0.5 is twelve hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimelineItem {
    pub fn new(id: impl Into<String>, lane_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lane_id: lane_id.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_start(mut self, start: DateTime<FixedOffset>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: DateTime<FixedOffset>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_duration_days(mut self, days: f64) -> Self {
        self.duration_days = Some(days);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Start instant, if present and valid
    pub fn start_instant(&self) -> Option<DateTime<FixedOffset>> {
        self.start.as_ref().and_then(Timestamp::instant)
    }

    /// End instant, if present and valid
    pub fn end_instant(&self) -> Option<DateTime<FixedOffset>> {
        self.end.as_ref().and_then(Timestamp::instant)
    }

    /// Label to show for the item, falling back to its id
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// Root of a timeline document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<TimelineView>,

    #[serde(deserialize_with = "null_as_default")]
    pub lanes: Vec<TimelineLane>,

    /// `None` when the `items` array is missing, which is a validation error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TimelineItem>>,
}

impl TimelineDocument {
    pub fn new(view: TimelineView, lanes: Vec<TimelineLane>, items: Vec<TimelineItem>) -> Self {
        Self {
            view: Some(view),
            lanes,
            items: Some(items),
        }
    }

    /// Items of the document, empty when the section is missing
    pub fn items(&self) -> &[TimelineItem] {
        self.items.as_deref().unwrap_or_default()
    }

    /// View mode, if the view declares one
    pub fn mode(&self) -> Option<&ViewMode> {
        self.view.as_ref()?.mode.as_ref()
    }

    /// View range instants, when both are present and valid
    pub fn range_instants(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        self.view.as_ref()?.range.as_ref()?.instants()
    }

    /// Returns a copy of this document with the given items
    pub fn with_items(&self, items: Vec<TimelineItem>) -> Self {
        Self {
            view: self.view.clone(),
            lanes: self.lanes.clone(),
            items: Some(items),
        }
    }
}
