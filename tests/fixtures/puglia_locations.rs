//! Locations around the operator's depot in the Bari hinterland.
//!
//! Depot and disposal sites are the operator's fixed points; client
//! locations are town centres in the service area.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

pub const DEPOT: Location = Location::new("MAGAZZINO", 40.88662985769151, 16.852016478389977);

// ============================================================================
// Disposal Sites
// ============================================================================

pub const DISPOSAL_SITES: &[Location] = &[
    Location::new("AMB", 41.09647057134329, 16.738474937175116),
    Location::new("NET", 41.089966857437396, 16.806883067859623),
    Location::new("DIM", 41.097295471343244, 16.91459969669557),
    Location::new("APU", 40.99342696525014, 16.783615667855507),
    Location::new("MTL", 41.04061857135102, 16.863863967857515),
];

// ============================================================================
// Clients
// ============================================================================

pub const CLIENTS: &[Location] = &[
    Location::new("Acquaviva delle Fonti", 40.8972, 16.8425),
    Location::new("Cassano delle Murge", 40.8869, 16.7681),
    Location::new("Sammichele di Bari", 40.8858, 16.9479),
    Location::new("Casamassima", 40.9560, 16.9192),
    Location::new("Adelfia", 41.0037, 16.8721),
    Location::new("Grumo Appula", 40.9995, 16.7058),
    Location::new("Bitetto", 41.0405, 16.7470),
    Location::new("Gioia del Colle", 40.7988, 16.9232),
];

pub fn disposal_site(name: &str) -> &'static Location {
    DISPOSAL_SITES
        .iter()
        .find(|site| site.name == name)
        .expect("known disposal site")
}
