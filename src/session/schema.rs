use serde::{Deserialize, Serialize};

/// Parameters for mode 1 (orbit tracing), matching `ARBITRARY_MAPPING` in the reference
/// implementation's `SETTINGS_BY_MODES`. Expressions are stored as their last-entered string
/// form so they round-trip through re-parsing on the next launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitraryMappingSettings {
    pub x_mapping: String,
    pub y_mapping: String,
    pub start_point: (f64, f64),
    pub iterations: u32,
    #[serde(rename = "@ID")]
    pub id: u32,
}

/// Parameters for mode 2 (chain-recurrent set localisation), matching `CR_SET_LOCALIZING`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrSetLocalizingSettings {
    pub x_mapping: String,
    pub y_mapping: String,
    pub area_bounds: (f64, f64, f64, f64),
    pub cell_density: u32,
    pub depth: u32,
    pub topsort_enabled: bool,
    #[serde(rename = "@ID")]
    pub id: u32,
}

/// One mode's entry in the session file. Untagged: the mode name is the map key, not a
/// discriminant field, so serde distinguishes variants structurally by which fields are
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeSettings {
    Orbit(ArbitraryMappingSettings),
    Localiser(CrSetLocalizingSettings),
}

impl ModeSettings {
    pub fn orbit(
        id: u32,
        x_mapping: impl Into<String>,
        y_mapping: impl Into<String>,
        start_point: (f64, f64),
        iterations: u32,
    ) -> Self {
        ModeSettings::Orbit(ArbitraryMappingSettings {
            x_mapping: x_mapping.into(),
            y_mapping: y_mapping.into(),
            start_point,
            iterations,
            id,
        })
    }

    pub fn localiser(
        id: u32,
        x_mapping: impl Into<String>,
        y_mapping: impl Into<String>,
        area_bounds: (f64, f64, f64, f64),
        cell_density: u32,
        depth: u32,
        topsort_enabled: bool,
    ) -> Self {
        ModeSettings::Localiser(CrSetLocalizingSettings {
            x_mapping: x_mapping.into(),
            y_mapping: y_mapping.into(),
            area_bounds,
            cell_density,
            depth,
            topsort_enabled,
            id,
        })
    }
}

/// Built-in fallbacks mirroring the reference implementation's `SETTINGS_BY_MODES`, used when
/// no session file exists yet.
pub fn default_sessions() -> super::Sessions {
    let mut sessions = super::Sessions::new();
    sessions.insert(
        "ARBITRARY_MAPPING".to_string(),
        ModeSettings::orbit(1, "x + y", "y - x", (1.0, -1.5), 100),
    );
    sessions.insert(
        "CR_SET_LOCALIZING".to_string(),
        ModeSettings::localiser(2, "x", "y", (0.0, 0.0, 1.0, 1.0), 100, 5, false),
    );
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_round_trips_both_variants() {
        let orbit = ModeSettings::orbit(1, "x + y", "y - x", (1.0, -1.5), 100);
        let json = serde_json::to_string(&orbit).unwrap();
        let parsed: ModeSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, orbit);

        let localiser = ModeSettings::localiser(2, "x", "y", (0.0, 0.0, 1.0, 1.0), 100, 5, false);
        let json = serde_json::to_string(&localiser).unwrap();
        let parsed: ModeSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, localiser);
    }
}
