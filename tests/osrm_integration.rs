//! OSRM-backed planning against a real road network.
//!
//! Needs Docker and a prepared MLD dataset for southern Italy in
//! `OSRM_DATA_DIR` (default `osrm-data/sud`), containing
//! `sud-latest.osrm*`. Run with `cargo test -- --ignored`.

mod fixtures;

use std::env;
use std::path::PathBuf;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use pickup_planner::cache::CachedDistances;
use pickup_planner::config::PlannerConfig;
use pickup_planner::osrm::{OsrmClient, OsrmConfig};
use pickup_planner::planner::{PlanRequest, Planner};
use pickup_planner::repository::InMemoryStops;
use pickup_planner::traits::GraphDistanceProvider;

use fixtures::{CLIENTS, DEPOT};

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_dir = PathBuf::from(env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data/sud".to_string()));
    let data_dir = if data_dir.is_absolute() {
        data_dir
    } else {
        env::current_dir()
            .map_err(|err| TestcontainersError::other(format!("no working directory: {}", err)))?
            .join(data_dir)
    };
    if !data_dir.join("sud-latest.osrm.partition").exists() {
        return Err(TestcontainersError::other(format!(
            "no prepared OSRM dataset in {}",
            data_dir.display()
        )));
    }

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(data_dir.to_string_lossy().to_string(), "/data"))
        .with_cmd(vec!["osrm-routed", "--algorithm", "mld", "/data/sud-latest.osrm"])
        .with_container_name("osrm-sud-mld")
        .with_startup_timeout(std::time::Duration::from_secs(60))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    Ok((container, format!("http://127.0.0.1:{}", port)))
}

/// Polls the nearest service until osrm-routed answers.
fn wait_until_ready(client: &OsrmClient) {
    let start = std::time::Instant::now();
    while start.elapsed() < std::time::Duration::from_secs(30) {
        if client.nearest_node(DEPOT.lat, DEPOT.lon).is_ok() {
            return;
        }
        std::thread::sleep(std::time::Duration::from_millis(500));
    }
    panic!("OSRM did not become ready");
}

#[test]
#[ignore = "needs Docker and a prepared OSRM dataset"]
fn test_plan_over_osrm() {
    let (container, base_url) = osrm_container().expect("start OSRM container");
    let client = OsrmClient::new(OsrmConfig {
        base_url,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");
    wait_until_ready(&client);

    let mut stops = InMemoryStops::new();
    for location in CLIENTS.iter().take(5) {
        stops
            .add_from_text(location.name, &format!("{}, {}", location.lat, location.lon))
            .expect("valid coordinates");
    }
    stops.set_urgent([CLIENTS[3].name]);

    let planner = Planner::new(PlannerConfig::default(), CachedDistances::new(client));
    let planned = planner
        .plan(
            &stops,
            &PlanRequest {
                disposal_site: Some("MTL"),
                forced_first_stop: None,
            },
        )
        .expect("plan over OSRM");

    assert_eq!(planned.itinerary.pickup_labels().len(), 5);
    assert_eq!(planned.itinerary.pickup_labels()[0], CLIENTS[3].name);
    assert!(planned.itinerary.total_km() > 10.0);
    assert!(planned.report.to_text().contains("MTL"));

    drop(container);
}
