//! Integration tests for resolver + route table working together.

use forecast_core::{ApiError, Revision, RevisionSet};
use forecast_router::{RouteDescriptor, RouteTable, VersionResolver};
use http::Method;
use proptest::prelude::*;

const V1: Revision = Revision::new(1, 0);
const V2: Revision = Revision::new(2, 0);

fn declared() -> RevisionSet {
    RevisionSet::new([V1, V2])
}

fn forecast_table() -> RouteTable {
    let mut table = RouteTable::new(declared());
    table
        .register(
            RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast", "getWeatherForecast")
                .revisions([V1, V2]),
        )
        .unwrap();
    table
        .register(
            RouteDescriptor::new(
                Method::GET,
                "/api/v{revision}/weatherforecast/summaries",
                "getWeatherSummaries",
            )
            .revisions([V2]),
        )
        .unwrap();
    table
}

#[test]
fn revision_gated_routes_end_to_end() {
    let table = forecast_table();
    assert_eq!(table.routes_for(V1).len(), 1);
    assert_eq!(table.routes_for(V2).len(), 2);

    let resolver = VersionResolver::new(declared(), V1).unwrap();
    let err = resolver.resolve("/api/v9.9/weatherforecast").unwrap_err();
    assert!(matches!(err, ApiError::UnsupportedRevision { .. }));
}

#[test]
fn resolved_revision_drives_dispatch() {
    let table = forecast_table();
    let resolver = VersionResolver::new(declared(), V1).unwrap();

    let path = "/api/v2/weatherforecast/summaries";
    let resolved = resolver.resolve(path).unwrap();
    let m = table.dispatch(resolved.revision, &Method::GET, path).unwrap();
    assert_eq!(m.operation_id(), "getWeatherSummaries");

    // Summaries are not part of the default revision.
    let path = "/api/weatherforecast/summaries";
    let resolved = resolver.resolve(path).unwrap();
    assert!(!resolved.explicit);
    assert!(table.dispatch(resolved.revision, &Method::GET, path).is_err());
}

proptest! {
    #[test]
    fn every_served_route_dispatches_under_its_revision_tokens(
        major in 1u32..5,
        minor in 0u32..3,
        long_form in any::<bool>(),
    ) {
        let revision = Revision::new(major, minor);
        let declared = RevisionSet::new([revision]);
        let mut table = RouteTable::new(declared.clone());
        table
            .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/items/{id}", "getItem"))
            .unwrap();

        let token = if long_form { format!("v{revision}") } else { revision.group_name() };
        let path = format!("/api/{token}/items/42");

        let resolver = VersionResolver::new(declared, revision).unwrap();
        let resolved = resolver.resolve(&path).unwrap();
        prop_assert_eq!(resolved.revision, revision);

        let m = table.dispatch(resolved.revision, &Method::GET, &path).unwrap();
        prop_assert_eq!(m.param("id"), Some("42"));
    }
}
