use std::collections::HashMap;
use trailguide_core::{
    load_dataset, load_routes, load_wildlife, open_db_in_memory, LoadError, QueryOptions,
    ResourcePattern, ResourceRouter, Route, SqliteResourceRouter, NO_DESCRIPTION, NO_IMAGE,
    SURFACE_UNKNOWN,
};

const DESCRIPTIONS_CSV: &str = "\
route_no,description
7,Coastal loop past the old harbour
120,Forestry track above the glen
";

const ROUTES_JSON: &str = r#"{
  "features": [
    {
      "properties": {"route_no": 12, "path_type": "footpath", "length": 2400, "surface": null},
      "geometry": {"coordinates": [[-2.84, 55.95], [-2.83, 55.96]]}
    },
    {
      "properties": {"route_no": 7, "path_type": "core path", "length": 5200, "surface": "NULL"},
      "geometry": {"coordinates": [-2.81, 55.94]}
    },
    {
      "properties": {"route_no": 120, "path_type": "bridleway", "length": 900, "surface": "gravel"},
      "geometry": {"coordinates": [[[-2.8, 55.9], [-2.79, 55.91], [-2.8, 55.9]]]}
    }
  ]
}"#;

const WILDLIFE_CSV: &str = "\
East Lothian wildlife reference,,,,,,
id,name,category,description,found on routes,when seen,image
1,Otter,Mammal,Shy resident of quiet burns,\"12.1, 7\",All year,otter.png
2,Red Squirrel,Mammal,\"Found in pine, oak and beech woods\",\"99\",Early morning,
";

fn query_all(router: &SqliteResourceRouter<'_>, pattern: ResourcePattern) -> trailguide_core::RowSet {
    router.query(&pattern, &QueryOptions::default()).unwrap()
}

#[test]
fn full_load_populates_routes_wildlife_and_links() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    let summary = load_dataset(
        &router,
        DESCRIPTIONS_CSV.as_bytes(),
        ROUTES_JSON.as_bytes(),
        WILDLIFE_CSV.as_bytes(),
    )
    .unwrap();

    assert_eq!(summary.descriptions, 2);
    assert_eq!(summary.routes, 3);
    assert_eq!(summary.wildlife, 2);
    assert_eq!(summary.route_links, 2);
    assert_eq!(summary.skipped_rows, 0);
    assert_eq!(summary.skipped_links, 1);
}

#[test]
fn null_surfaces_become_the_unknown_sentinel() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);
    load_dataset(
        &router,
        DESCRIPTIONS_CSV.as_bytes(),
        ROUTES_JSON.as_bytes(),
        "h1\nh2\n".as_bytes(),
    )
    .unwrap();

    let rows = query_all(&router, ResourcePattern::Routes);
    let mut surfaces = HashMap::new();
    for index in 0..rows.len() {
        surfaces.insert(
            rows.integer(index, "route_number").unwrap(),
            rows.text(index, "surface").unwrap().to_string(),
        );
    }

    assert_eq!(surfaces.get(&12).map(String::as_str), Some(SURFACE_UNKNOWN));
    assert_eq!(surfaces.get(&7).map(String::as_str), Some(SURFACE_UNKNOWN));
    assert_eq!(surfaces.get(&120).map(String::as_str), Some("gravel"));
}

#[test]
fn missing_descriptions_fall_back_to_the_sentinel() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);
    load_dataset(
        &router,
        DESCRIPTIONS_CSV.as_bytes(),
        ROUTES_JSON.as_bytes(),
        "h1\nh2\n".as_bytes(),
    )
    .unwrap();

    let rows = query_all(&router, ResourcePattern::Routes);
    let mut descriptions = HashMap::new();
    for index in 0..rows.len() {
        descriptions.insert(
            rows.integer(index, "route_number").unwrap(),
            rows.text(index, "description").unwrap().to_string(),
        );
    }

    assert_eq!(
        descriptions.get(&7).map(String::as_str),
        Some("Coastal loop past the old harbour")
    );
    assert_eq!(descriptions.get(&12).map(String::as_str), Some(NO_DESCRIPTION));
}

#[test]
fn coordinates_are_preserved_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);
    load_routes(ROUTES_JSON.as_bytes(), &HashMap::new(), &router).unwrap();

    let rows = query_all(&router, ResourcePattern::Routes);
    let mut coordinates = HashMap::new();
    for index in 0..rows.len() {
        coordinates.insert(
            rows.integer(index, "route_number").unwrap(),
            rows.text(index, "coordinates").unwrap().to_string(),
        );
    }

    assert_eq!(
        coordinates.get(&12).map(String::as_str),
        Some("[[-2.84,55.95],[-2.83,55.96]]")
    );
    assert_eq!(coordinates.get(&7).map(String::as_str), Some("[-2.81,55.94]"));
}

#[test]
fn malformed_geometry_commits_nothing() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    let malformed = r#"{"features": [{"properties": {"route_no": 3}}]}"#;
    let err = load_routes(malformed.as_bytes(), &HashMap::new(), &router).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));

    assert!(query_all(&router, ResourcePattern::Routes).is_empty());
}

#[test]
fn wildlife_links_resolve_through_prefix_matching() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);
    load_dataset(
        &router,
        DESCRIPTIONS_CSV.as_bytes(),
        ROUTES_JSON.as_bytes(),
        WILDLIFE_CSV.as_bytes(),
    )
    .unwrap();

    let routes = query_all(&router, ResourcePattern::Routes);
    let mut route_ids = HashMap::new();
    for index in 0..routes.len() {
        route_ids.insert(
            routes.integer(index, "route_number").unwrap(),
            routes.integer(index, "id").unwrap(),
        );
    }

    // `"12.1, 7"` resolves to the routes numbered 12 and 7, exactly.
    let links = query_all(&router, ResourcePattern::WildlifeOnRoute);
    assert_eq!(links.len(), 2);
    let linked: Vec<i64> = (0..links.len())
        .map(|index| links.integer(index, "route_id").unwrap())
        .collect();
    assert!(linked.contains(route_ids.get(&12).unwrap()));
    assert!(linked.contains(route_ids.get(&7).unwrap()));
}

#[test]
fn unresolvable_route_reference_keeps_the_wildlife_row() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    let wildlife_csv = "\
h1\nh2\n3,Skylark,Bird,Song flight over rough grassland,\"[44, 45]\",Spring,skylark.png\n";
    let stats = load_wildlife(wildlife_csv.as_bytes(), &router).unwrap();

    assert_eq!(stats.wildlife, 1);
    assert_eq!(stats.route_links, 0);
    assert_eq!(stats.skipped_links, 2);

    let rows = query_all(&router, ResourcePattern::Wildlife);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.text(0, "name"), Some("Skylark"));
    assert!(rows.integer(0, "id").is_some());
    assert!(query_all(&router, ResourcePattern::WildlifeOnRoute).is_empty());
}

#[test]
fn optional_image_field_defaults_to_the_no_image_sentinel() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);
    load_dataset(
        &router,
        DESCRIPTIONS_CSV.as_bytes(),
        ROUTES_JSON.as_bytes(),
        WILDLIFE_CSV.as_bytes(),
    )
    .unwrap();

    let rows = query_all(&router, ResourcePattern::Wildlife);
    let mut images = HashMap::new();
    for index in 0..rows.len() {
        images.insert(
            rows.text(index, "name").unwrap().to_string(),
            rows.text(index, "image_name").unwrap().to_string(),
        );
    }

    assert_eq!(images.get("Otter").map(String::as_str), Some("otter.png"));
    assert_eq!(
        images.get("Red Squirrel").map(String::as_str),
        Some(NO_IMAGE)
    );
}

#[test]
fn quoted_description_field_is_not_split_on_internal_commas() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);
    load_dataset(
        &router,
        DESCRIPTIONS_CSV.as_bytes(),
        ROUTES_JSON.as_bytes(),
        WILDLIFE_CSV.as_bytes(),
    )
    .unwrap();

    let rows = query_all(&router, ResourcePattern::Wildlife);
    let description = (0..rows.len())
        .find(|index| rows.text(*index, "name") == Some("Red Squirrel"))
        .and_then(|index| rows.text(index, "description"))
        .unwrap();
    assert_eq!(description, "\"Found in pine, oak and beech woods\"");
}

#[test]
fn short_wildlife_rows_are_skipped() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    let wildlife_csv = "h1\nh2\n4,OnlyName,Mammal,Description,[1]\n";
    let stats = load_wildlife(wildlife_csv.as_bytes(), &router).unwrap();

    assert_eq!(stats.wildlife, 0);
    assert_eq!(stats.skipped_rows, 1);
    assert!(query_all(&router, ResourcePattern::Wildlife).is_empty());
}

#[test]
fn prefix_tie_break_prefers_exact_then_lowest_id() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    // Two routes share the `12` prefix and neither matches exactly.
    for number in [120, 125] {
        let route = Route {
            id: None,
            route_number: number,
            coordinates: "[]".to_string(),
            path_type: "footpath".to_string(),
            length: 100,
            surface: "grass".to_string(),
            description: "test".to_string(),
        };
        router
            .insert(&ResourcePattern::Routes, &route.to_record())
            .unwrap();
    }

    let wildlife_csv = "h1\nh2\n5,Roe Deer,Mammal,Browses at woodland edges,\"12.1\",Dusk,deer.png\n";
    let stats = load_wildlife(wildlife_csv.as_bytes(), &router).unwrap();
    assert_eq!(stats.route_links, 1);

    let routes = query_all(&router, ResourcePattern::Routes);
    let lowest_id_of_120 = (0..routes.len())
        .find(|index| routes.integer(*index, "route_number") == Some(120))
        .and_then(|index| routes.integer(index, "id"))
        .unwrap();

    let links = query_all(&router, ResourcePattern::WildlifeOnRoute);
    assert_eq!(links.integer(0, "route_id"), Some(lowest_id_of_120));
}

#[test]
fn exact_route_number_wins_over_longer_prefix_matches() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    for number in [120, 12] {
        let route = Route {
            id: None,
            route_number: number,
            coordinates: "[]".to_string(),
            path_type: "footpath".to_string(),
            length: 100,
            surface: "grass".to_string(),
            description: "test".to_string(),
        };
        router
            .insert(&ResourcePattern::Routes, &route.to_record())
            .unwrap();
    }

    let wildlife_csv = "h1\nh2\n6,Badger,Mammal,Forages along hedgerows,\"12\",Night,badger.png\n";
    load_wildlife(wildlife_csv.as_bytes(), &router).unwrap();

    let routes = query_all(&router, ResourcePattern::Routes);
    let exact_id = (0..routes.len())
        .find(|index| routes.integer(*index, "route_number") == Some(12))
        .and_then(|index| routes.integer(index, "id"))
        .unwrap();

    let links = query_all(&router, ResourcePattern::WildlifeOnRoute);
    assert_eq!(links.integer(0, "route_id"), Some(exact_id));
}

#[test]
fn malformed_descriptions_are_contained_by_the_full_load() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    let summary = load_dataset(
        &router,
        "header\nseven,not numeric\n".as_bytes(),
        ROUTES_JSON.as_bytes(),
        "h1\nh2\n".as_bytes(),
    )
    .unwrap();

    assert_eq!(summary.descriptions, 0);
    assert_eq!(summary.routes, 3);

    // Every route degrades to the description sentinel.
    let rows = query_all(&router, ResourcePattern::Routes);
    for index in 0..rows.len() {
        assert_eq!(rows.text(index, "description"), Some(NO_DESCRIPTION));
    }
}

#[test]
fn reloading_appends_rows() {
    let conn = open_db_in_memory().unwrap();
    let router = SqliteResourceRouter::new(&conn);

    for _ in 0..2 {
        load_routes(ROUTES_JSON.as_bytes(), &HashMap::new(), &router).unwrap();
    }

    assert_eq!(query_all(&router, ResourcePattern::Routes).len(), 6);
}
