use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// Permanent route as the RUSA data API returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub pid: String,
    pub name: String,
    pub dist: u32,
    #[serde(default)]
    pub climbing: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    pub startstate: String,
    #[serde(default)]
    pub startcity: Option<String>,
    #[serde(default)]
    pub states: Option<String>,
    pub active: bool,
    /// Super Randonnée course.
    #[serde(default)]
    pub sr: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub id: String,
    pub name: String,
    pub distance_km: u32,
    pub climbing_ft: Option<u32>,
    pub start_state: String,
    pub start_city: String,
    pub description: String,
    pub states: Vec<String>,
}

impl From<RouteRecord> for RouteSummary {
    fn from(record: RouteRecord) -> Self {
        let states = record
            .states
            .as_deref()
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            id: record.pid,
            name: record.name,
            distance_km: record.dist,
            climbing_ft: record.climbing,
            start_state: record.startstate,
            start_city: record.startcity.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            states,
        }
    }
}

/// A start region offered on the search step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateOption {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DistanceBand {
    All,
    Km100,
    Km200,
    Km300,
    Km400,
}

impl DistanceBand {
    pub const BANDS: [DistanceBand; 5] = [
        DistanceBand::All,
        DistanceBand::Km100,
        DistanceBand::Km200,
        DistanceBand::Km300,
        DistanceBand::Km400,
    ];

    pub fn lower_km(&self) -> u32 {
        match self {
            Self::All => 0,
            Self::Km100 => 100,
            Self::Km200 => 200,
            Self::Km300 => 300,
            Self::Km400 => 400,
        }
    }

    pub fn contains(&self, distance_km: u32) -> bool {
        match self {
            Self::All => true,
            band => {
                let lower = band.lower_km();
                (lower..=lower + 99).contains(&distance_km)
            }
        }
    }
}

impl Default for DistanceBand {
    fn default() -> Self {
        Self::All
    }
}

impl TryFrom<u32> for DistanceBand {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::All),
            100 => Ok(Self::Km100),
            200 => Ok(Self::Km200),
            300 => Ok(Self::Km300),
            400 => Ok(Self::Km400),
            _ => Err(invalid_input_error()),
        }
    }
}

impl From<DistanceBand> for u32 {
    fn from(band: DistanceBand) -> Self {
        band.lower_km()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteFilter {
    pub start_state: Option<String>,
    pub distance_band: DistanceBand,
    pub name_contains: Option<String>,
}

impl RouteFilter {
    /// Blank inputs are treated as "no filter".
    pub fn new(
        start_state: Option<String>,
        distance_band: DistanceBand,
        name_contains: Option<String>,
    ) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            start_state: clean(start_state),
            distance_band,
            name_contains: clean(name_contains),
        }
    }

    /// The only key sent to the gateway. Everything else is narrowed locally.
    pub fn gateway_key(&self) -> Option<(&'static str, String)> {
        self.start_state
            .as_ref()
            .map(|state| ("startstate", state.clone()))
    }

    pub fn matches(&self, record: &RouteRecord) -> bool {
        if !record.active || record.sr {
            return false;
        }

        if let Some(state) = &self.start_state {
            if &record.startstate != state {
                return false;
            }
        }

        if !self.distance_band.contains(record.dist) {
            return false;
        }

        match &self.name_contains {
            Some(needle) => record
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }

    /// Keeps upstream order.
    pub fn apply(&self, records: Vec<RouteRecord>) -> Vec<RouteSummary> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .map(RouteSummary::from)
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn record(pid: &str, name: &str, state: &str, dist: u32) -> RouteRecord {
    RouteRecord {
        pid: pid.into(),
        name: name.into(),
        dist,
        climbing: Some(5000),
        description: Some(format!("{} description", name)),
        startstate: state.into(),
        startcity: Some("Davis".into()),
        states: Some(state.into()),
        active: true,
        sr: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_zero_keeps_every_distance() {
        let filter = RouteFilter::default();
        let records = vec![
            record("1", "Short", "CA", 100),
            record("2", "Long", "CA", 1200),
            record("3", "Odd", "CA", 57),
        ];

        assert_eq!(filter.apply(records).len(), 3);
    }

    #[test]
    fn band_is_inclusive_hundred_km_window() {
        let filter = RouteFilter::new(None, DistanceBand::Km200, None);
        let records = vec![
            record("1", "a", "CA", 199),
            record("2", "b", "CA", 200),
            record("3", "c", "CA", 299),
            record("4", "d", "CA", 300),
        ];

        let ids: Vec<String> = filter.apply(records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn state_and_band_pick_only_the_matching_route() {
        let filter = RouteFilter::new(Some("CA".into()), DistanceBand::Km200, None);
        let records = vec![
            record("150", "Foothills", "CA", 150),
            record("250", "Delta", "CA", 250),
            record("251", "Cascades", "OR", 250),
        ];

        let result = filter.apply(records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "250");
        assert_eq!(result[0].distance_km, 250);
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let filter = RouteFilter::new(None, DistanceBand::All, Some("DELTA".into()));
        let records = vec![
            record("1", "Sacramento delta loop", "CA", 200),
            record("2", "Foothills", "CA", 200),
            record("3", "Deltaville", "VA", 300),
        ];

        let result = filter.apply(records);
        assert_eq!(result.len(), 2);
        assert!(result
            .iter()
            .all(|r| r.name.to_lowercase().contains("delta")));
    }

    #[test]
    fn inactive_and_super_randonnee_routes_are_dropped() {
        let mut inactive = record("1", "Retired", "CA", 200);
        inactive.active = false;
        let mut sr = record("2", "Mountains SR", "CA", 600);
        sr.sr = true;
        let kept = record("3", "Valley", "CA", 200);

        let result = RouteFilter::default().apply(vec![inactive, sr, kept]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "3");
    }

    #[test]
    fn blank_inputs_do_not_filter() {
        let filter = RouteFilter::new(Some("  ".into()), DistanceBand::All, Some("".into()));
        assert_eq!(filter.start_state, None);
        assert_eq!(filter.name_contains, None);
        assert_eq!(filter.gateway_key(), None);
    }

    #[test]
    fn only_state_goes_upstream() {
        let filter = RouteFilter::new(Some("CA".into()), DistanceBand::Km300, Some("x".into()));
        assert_eq!(filter.gateway_key(), Some(("startstate", "CA".to_string())));
    }

    #[test]
    fn unknown_band_is_rejected() {
        assert!(DistanceBand::try_from(150).is_err());
        assert_eq!(DistanceBand::try_from(400).unwrap(), DistanceBand::Km400);
        assert!(serde_json::from_str::<DistanceBand>("250").is_err());
        assert_eq!(serde_json::to_string(&DistanceBand::Km100).unwrap(), "100");
    }

    #[test]
    fn summary_splits_state_list() {
        let mut r = record("9", "Border run", "CA", 300);
        r.states = Some("CA, NV OR".into());
        r.startcity = None;

        let summary = RouteSummary::from(r);
        assert_eq!(summary.states, vec!["CA", "NV", "OR"]);
        assert_eq!(summary.start_city, "");
    }
}
