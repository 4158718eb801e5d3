pub mod normalize;
pub mod similarity;

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::config::AppConfig;
use crate::models::{Channel, Event};

/// Result of one reconciliation cycle: the store contents for the next
/// run, and the display subset pre-grouped by category with events
/// sorted by start and channels sorted by region priority.
pub struct Outcome {
    pub persisted: BTreeMap<String, Event>,
    pub display: BTreeMap<String, Vec<Event>>,
}

/// Runs the ingest → deduplicate/merge → retain cycle. Owns nothing
/// mutable itself; each call works on the store snapshot it is given.
pub struct Reconciler<'a> {
    config: &'a AppConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// One full cycle against an explicit `now` (naive, UTC).
    pub fn run(
        &self,
        now: NaiveDateTime,
        previous: BTreeMap<String, Event>,
        batch: Vec<Event>,
    ) -> Outcome {
        let mut working = previous;
        for incoming in batch {
            self.ingest(&mut working, incoming);
        }
        self.retain(now, working)
    }

    /// Merges one incoming record into the working set, or admits it as
    /// new under a freshly derived id.
    pub fn ingest(&self, working: &mut BTreeMap<String, Event>, mut incoming: Event) {
        if let Some(existing) = working
            .values_mut()
            .find(|event| self.are_duplicates(event, &incoming))
        {
            merge_into(existing, &incoming);
            return;
        }
        incoming.id = incoming.derive_id();
        working.insert(incoming.id.clone(), incoming);
    }

    /// Same-fixture decision: category gate, then time gate, then name
    /// similarity. All three must hold. Unparseable timestamps fail
    /// closed; uncertain time data never merges two records.
    pub fn are_duplicates(&self, a: &Event, b: &Event) -> bool {
        if a.category != b.category {
            return false;
        }
        let (start_a, start_b) = match (a.start_time(), b.start_time()) {
            (Some(start_a), Some(start_b)) => (start_a, start_b),
            _ => return false,
        };
        let delta = start_a.signed_duration_since(start_b).num_seconds().abs();
        if delta > self.config.duplicate_window_min * 60 {
            return false;
        }
        let (key_a, key_b) = (matchup_key(a), matchup_key(b));
        if key_a.is_empty() || key_b.is_empty() {
            // Names made entirely of noise tokens carry no identity;
            // two empty keys would otherwise score 1.0.
            return false;
        }
        similarity::ratio(&key_a, &key_b) > self.config.similarity_threshold
    }

    /// Partitions the merged working set into the persist set and the
    /// display subset.
    fn retain(&self, now: NaiveDateTime, working: BTreeMap<String, Event>) -> Outcome {
        let mut persisted = BTreeMap::new();
        let mut display: BTreeMap<String, Vec<Event>> = BTreeMap::new();

        for (id, event) in working {
            if event.is_finished() {
                continue;
            }
            let start = match event.start_time() {
                Some(start) => start,
                None => {
                    // Fail open for storage, never for display.
                    persisted.insert(id, event);
                    continue;
                }
            };
            let elapsed_hours =
                now.signed_duration_since(start).num_seconds() as f64 / 3600.0;
            if elapsed_hours < -self.config.max_future_hours {
                // A start this far ahead is a feed error, not a fixture.
                continue;
            }
            if elapsed_hours >= self.config.persist_hours(&event.category) {
                continue;
            }
            if elapsed_hours < self.config.display_window_hours && !event.channels.is_empty() {
                let mut shown = event.clone();
                sort_channels(&mut shown.channels, &self.config.preferred_regions);
                display.entry(shown.category.clone()).or_default().push(shown);
            }
            persisted.insert(id, event);
        }

        for group in display.values_mut() {
            group.sort_by(|a, b| a.start.cmp(&b.start));
        }

        Outcome { persisted, display }
    }
}

/// Folds `incoming` into `existing` in place: channel union keyed by
/// link (append only, existing order untouched), and display names
/// replaced as a pair iff the incoming home name is strictly longer.
pub fn merge_into(existing: &mut Event, incoming: &Event) {
    for channel in &incoming.channels {
        if !existing.channels.iter().any(|c| c.link == channel.link) {
            existing.channels.push(channel.clone());
        }
    }
    // Character count, not byte length: an accent must not make a name
    // "longer" than an equal-length unaccented spelling.
    if incoming.home_team.chars().count() > existing.home_team.chars().count() {
        existing.home_team = incoming.home_team.clone();
        existing.away_team = incoming.away_team.clone();
    }
}

fn matchup_key(event: &Event) -> String {
    normalize::comparison_key(&format!("{} {}", event.home_team, event.away_team))
}

/// Preferred-region channels first; `sort_by_key` is stable, so ties
/// keep their merge order.
fn sort_channels(channels: &mut [Channel], preferred: &[String]) {
    channels.sort_by_key(|channel| Reverse(region_priority(&channel.region, preferred)));
}

fn region_priority(region: &str, preferred: &[String]) -> i32 {
    if preferred.iter().any(|p| p.eq_ignore_ascii_case(region)) {
        10
    } else {
        1
    }
}
