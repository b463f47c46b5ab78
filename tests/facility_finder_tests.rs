use scalewise::config::{DetourCostConfig, FacilitySearchConfig};
use scalewise::models::SearchPool;
use scalewise::services::facility_finder::FacilityFinder;
use scalewise::services::geometry;
use scalewise::AppError;

mod common;
use common::{coords, create_test_facility, test_catalog, test_finder};

#[test]
fn test_selects_nearby_corridor_facility() {
    let origin = coords(36.0, -89.0);
    let destination = coords(38.0, -90.5);
    let catalog = vec![
        create_test_facility("1001", "TN", "Ridgely", 36.2, -89.3),
        create_test_facility("3003", "OK", "Muskogee", 36.0, -95.0),
    ];

    let selection = test_finder()
        .find_best(&origin, &destination, &catalog, 0.2, None)
        .unwrap()
        .expect("corridor facility should qualify");

    assert_eq!(selection.facility().catalog_number, "1001");
    assert_eq!(selection.deviation_cap, 0.15);
    assert!(selection.candidate.path_deviation < 0.05);
    assert!(selection.detour_cost() >= 14.0);

    let cost = &selection.candidate.cost;
    assert!((cost.total_cost - (cost.facility_fee + cost.driver_cost + cost.mileage_cost)).abs() < 1e-9);
}

#[test]
fn test_far_off_route_facility_is_excluded() {
    let catalog = vec![create_test_facility("3003", "OK", "Muskogee", 36.0, -95.0)];
    let result = test_finder()
        .find_best(&coords(36.0, -89.0), &coords(38.0, -90.5), &catalog, 0.2, None)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_origin_state_pool_is_tried_first() {
    let origin = coords(36.0, -89.0);
    let destination = coords(38.0, -90.5);
    let catalog = test_catalog();

    // Across the whole catalog the Sikeston stop scores best...
    let open = test_finder()
        .find_best(&origin, &destination, &catalog, 0.1, None)
        .unwrap()
        .unwrap();
    assert_eq!(open.facility().catalog_number, "2002");
    assert_eq!(open.pool, SearchPool::FullCatalog);

    // ...but a qualifying in-state facility wins when the origin state is known
    let regional = test_finder()
        .find_best(&origin, &destination, &catalog, 0.1, Some("tn"))
        .unwrap()
        .unwrap();
    assert_eq!(regional.facility().catalog_number, "1001");
    assert_eq!(regional.pool, SearchPool::OriginState);
}

#[test]
fn test_falls_back_to_full_catalog_when_state_has_nothing() {
    let selection = test_finder()
        .find_best(&coords(36.0, -89.0), &coords(38.0, -90.5), &test_catalog(), 0.1, Some("OK"))
        .unwrap()
        .unwrap();
    assert_eq!(selection.pool, SearchPool::FullCatalog);
    assert_ne!(selection.facility().state, "OK");
}

#[test]
fn test_selection_never_exceeds_deviation_cap() {
    let origin = coords(36.0, -89.0);
    let destination = coords(38.0, -90.5);
    let finder = test_finder();
    let catalog = test_catalog();

    for risk in [0.0, 0.4, 0.7, 1.0] {
        if let Some(selection) = finder.find_best(&origin, &destination, &catalog, risk, None).unwrap() {
            let deviation =
                geometry::path_deviation(&selection.coordinates(), &origin, &destination).unwrap();
            assert!(deviation <= selection.deviation_cap);
        }
    }
}

#[test]
fn test_cap_loosens_on_long_routes() {
    // Memphis area to Denver area is well over 800 miles
    let origin = coords(35.15, -90.05);
    let destination = coords(39.74, -104.99);
    let direct = geometry::distance(&origin, &destination).unwrap();
    assert!(direct > 500.0 && direct <= 1000.0);

    let catalog = vec![create_test_facility("5005", "KS", "Salina", 38.84, -97.61)];
    let selection = test_finder()
        .find_best(&origin, &destination, &catalog, 0.3, Some("TN"))
        .unwrap()
        .unwrap();
    assert_eq!(selection.deviation_cap, 0.20);
}

#[test]
fn test_tighter_cap_from_config_excludes_more() {
    let finder = FacilityFinder::new(
        FacilitySearchConfig {
            short_route_deviation_cap: 0.001,
            ..FacilitySearchConfig::default()
        },
        DetourCostConfig::default(),
    );
    let catalog = vec![create_test_facility("1001", "TN", "Ridgely", 36.2, -89.3)];
    let result = finder
        .find_best(&coords(36.0, -89.0), &coords(38.0, -90.5), &catalog, 0.2, None)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_degenerate_route_is_an_error() {
    let here = coords(36.0, -89.0);
    let result = test_finder().find_best(&here, &here, &test_catalog(), 0.2, None);
    assert!(matches!(result, Err(AppError::DegenerateRoute(_))));
}
