use crate::constants::NAVIGATION_SAMPLE_DIVISOR;
use crate::models::{Coordinates, Loop};

/// Intermediate `"lat,lng"` stops for a multi-stop directions link.
///
/// Keeps every `len / 10`-th point plus the last one, then drops the first and
/// last picks since origin and destination are passed separately.
pub fn export_stops(path: &[Coordinates]) -> Vec<String> {
    export_stops_with_divisor(path, NAVIGATION_SAMPLE_DIVISOR)
}

pub fn export_stops_with_divisor(path: &[Coordinates], divisor: usize) -> Vec<String> {
    let n = path.len();
    // Paths shorter than the divisor keep every point
    let step = (n / divisor.max(1)).max(1);

    let selected: Vec<&Coordinates> = path
        .iter()
        .enumerate()
        .filter(|(i, _)| i % step == 0 || *i == n - 1)
        .map(|(_, point)| point)
        .collect();

    if selected.len() <= 2 {
        return Vec::new();
    }

    selected[1..selected.len() - 1]
        .iter()
        .map(|point| format!("{},{}", point.lat, point.lng))
        .collect()
}

/// Builds walking-directions deep links for stored loops
#[derive(Debug, Clone)]
pub struct NavigationExporter {
    base_url: String,
}

impl NavigationExporter {
    pub fn new(base_url: String) -> Self {
        NavigationExporter { base_url }
    }

    /// Link that starts and ends at the loop's address, via sampled stops
    pub fn deep_link(&self, record: &Loop) -> String {
        let address = urlencoding::encode(&record.address);
        let mut url = format!(
            "{}?api=1&origin={}&destination={}&travelmode=walking",
            self.base_url, address, address
        );

        let stops = export_stops(&record.path);
        if !stops.is_empty() {
            url.push_str("&waypoints=");
            url.push_str(&urlencoding::encode(&stops.join("|")));
        }

        url
    }
}
