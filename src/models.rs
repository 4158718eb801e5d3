use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Wire format of the `start` field: a naive timestamp treated as UTC
/// end to end. The rendered page localizes it in the browser.
pub const START_FORMAT: &str = "%Y-%m-%d %H:%M";

fn default_team() -> String {
    "TBD".to_string()
}

fn default_channel_name() -> String {
    "Link".to_string()
}

fn default_channel_link() -> String {
    "#".to_string()
}

fn default_region() -> String {
    "xx".to_string()
}

/// One viewing source attached to an event.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    #[serde(rename = "channel_name", default = "default_channel_name")]
    pub name: String,
    #[serde(rename = "url", default = "default_channel_link")]
    pub link: String,
    #[serde(rename = "channel_code", default = "default_region")]
    pub region: String,
}

/// One scheduled fixture with teams, start time, status and channels.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Event {
    #[serde(default)]
    pub id: String, // stable hash: category|home|away|start
    #[serde(default)]
    pub category: String,
    #[serde(rename = "homeTeam", default = "default_team")]
    pub home_team: String,
    #[serde(rename = "awayTeam", default = "default_team")]
    pub away_team: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Event {
    /// Parses `start` under the fixed wire format. `None` means the
    /// timestamp is unusable for any time-window decision.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.start.trim(), START_FORMAT).ok()
    }

    pub fn is_live(&self) -> bool {
        self.status.eq_ignore_ascii_case("live")
    }

    pub fn is_finished(&self) -> bool {
        self.status.eq_ignore_ascii_case("finished")
    }

    /// Stable identifier derived from the fields that name the fixture.
    /// Incoming feeds may carry their own ids (or none); those are never
    /// trusted, so the store key is always re-derived here.
    pub fn derive_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.category.as_bytes());
        hasher.update(b"|");
        hasher.update(self.home_team.as_bytes());
        hasher.update(b"|");
        hasher.update(self.away_team.as_bytes());
        hasher.update(b"|");
        hasher.update(self.start.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
