//! Report, location, department and status types shared by every crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a citizen report.
///
/// Reports move forward only: `Pending → In Progress → Resolved`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub fn all() -> &'static [ReportStatus] {
        &[Self::Pending, Self::InProgress, Self::Resolved]
    }

    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Resolved => 2,
        }
    }

    /// Whether a report in this status may be moved to `next`.
    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        next.rank() >= self.rank()
    }

    /// Open reports are the only ones eligible for clustering.
    pub fn is_open(self) -> bool {
        self == Self::Pending
    }

    /// Parse a status label, accepting both the spaced and compact spellings.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Pending" => Some(Self::Pending),
            "In Progress" | "InProgress" => Some(Self::InProgress),
            "Resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Resolved => write!(f, "Resolved"),
        }
    }
}

/// Municipal department a cluster can be routed to.
///
/// Declaration order is the enumeration order used for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Roads,
    Water,
    Waste,
    Electricity,
    Parks,
}

impl Department {
    pub fn all() -> &'static [Department] {
        &[
            Self::Roads,
            Self::Water,
            Self::Waste,
            Self::Electricity,
            Self::Parks,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roads => "roads",
            Self::Water => "water",
            Self::Waste => "waste",
            Self::Electricity => "electricity",
            Self::Parks => "parks",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::all().iter().copied().find(|d| d.as_str() == name)
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// GeoJSON-style point as submitted by clients: `coordinates` is `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default = "default_location_kind")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

fn default_location_kind() -> String {
    "Point".into()
}

impl Location {
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            kind: default_location_kind(),
            coordinates: vec![lon, lat],
        }
    }

    /// The coordinate pair, if at least two values were supplied.
    pub fn geo_point(&self) -> Option<GeoPoint> {
        match self.coordinates.as_slice() {
            [lon, lat, ..] => Some(GeoPoint::new(*lon, *lat)),
            _ => None,
        }
    }
}

/// A citizen-submitted civic complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
    #[serde(rename = "voiceMsg", default, skip_serializing_if = "Option::is_none")]
    pub voice_msg: Option<String>,
}

impl Report {
    /// Create a pending report with no location.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            description: Some(description.into()),
            location: None,
            created_at,
            author: String::new(),
            status: ReportStatus::Pending,
            address: None,
            media: Vec::new(),
            voice_msg: None,
        }
    }

    pub fn with_location(mut self, lon: f64, lat: f64) -> Self {
        self.location = Some(Location::point(lon, lat));
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn geo_point(&self) -> Option<GeoPoint> {
        self.location.as_ref().and_then(Location::geo_point)
    }
}
