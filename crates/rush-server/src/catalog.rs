//! Areas and roads the prediction model was trained on.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Area {
    pub area: &'static str,
    pub roads: &'static [&'static str],
}

pub const AREAS: &[Area] = &[
    Area {
        area: "Indiranagar",
        roads: &["100 Feet Road", "12th Main Road", "CMH Road", "Old Airport Road"],
    },
    Area {
        area: "Koramangala",
        roads: &["5th Block", "6th Block", "7th Block", "Intermediate Ring Road"],
    },
    Area {
        area: "Whitefield",
        roads: &["ITPL Main Road", "Varthur Road", "Whitefield Main Road", "Hope Farm Junction"],
    },
    Area {
        area: "Electronic City",
        roads: &[
            "Hosur Road",
            "Electronic City Phase 1",
            "Electronic City Phase 2",
            "Bommasandra Road",
        ],
    },
    Area {
        area: "Hebbal",
        roads: &["Outer Ring Road", "Bellary Road", "Hebbal Flyover", "Nagawara"],
    },
    Area {
        area: "BTM Layout",
        roads: &["BTM 1st Stage", "BTM 2nd Stage", "Bannerghatta Road", "Silk Board"],
    },
    Area {
        area: "Marathahalli",
        roads: &["Marathahalli Bridge", "Outer Ring Road", "Varthur Road", "Kundalahalli"],
    },
    Area {
        area: "Jayanagar",
        roads: &["4th Block", "9th Block", "South End Circle", "Jayanagar Shopping Complex"],
    },
];

pub const WEATHER_OPTIONS: &[&str] = &["Clear", "Cloudy", "Rainy", "Foggy"];
pub const ROADWORK_OPTIONS: &[&str] = &["Yes", "No"];
