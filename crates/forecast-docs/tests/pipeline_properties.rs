//! Property tests for synthesis + filtering across revisions and origins.

use forecast_core::{Revision, RevisionSet, REVISION_PARAMETER, REVISION_PLACEHOLDER};
use forecast_docs::{DocumentSynthesizer, FilterChain, OpenApi, RequestOrigin};
use forecast_router::{ParameterSpec, RouteDescriptor, RouteTable};
use http::Method;
use proptest::prelude::*;

fn declared() -> Vec<Revision> {
    vec![
        Revision::new(1, 0),
        Revision::new(1, 1),
        Revision::new(2, 0),
        Revision::new(3, 5),
    ]
}

fn synthesizer() -> DocumentSynthesizer {
    let revisions = declared();
    let mut table = RouteTable::new(RevisionSet::new(revisions.clone()));
    table
        .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast", "list"))
        .unwrap();
    table
        .register(RouteDescriptor::new(Method::POST, "/api/v{revision}/weatherforecast", "create"))
        .unwrap();
    table
        .register(
            RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast/summaries", "summaries")
                .revisions(revisions[2..].iter().copied()),
        )
        .unwrap();
    table
        .register(
            RouteDescriptor::new(Method::PUT, "/api/v{revision}/weatherforecast/{date}", "update")
                .parameter(ParameterSpec::query("unit")),
        )
        .unwrap();
    table
        .register(RouteDescriptor::new(Method::DELETE, "/api/v{revision}/weatherforecast/{date}", "delete"))
        .unwrap();
    DocumentSynthesizer::new(table).title("Weather Forecast API")
}

fn revision_params(doc: &OpenApi) -> usize {
    doc.paths
        .values()
        .map(|item| {
            item.parameters.iter().filter(|p| p.name == REVISION_PARAMETER).count()
                + item
                    .operations()
                    .flat_map(|op| op.parameters.iter())
                    .filter(|p| p.name == REVISION_PARAMETER)
                    .count()
        })
        .sum()
}

fn revision_strategy() -> impl Strategy<Value = Revision> {
    prop::sample::select(declared())
}

fn origin_strategy() -> impl Strategy<Value = Option<RequestOrigin>> {
    prop::option::of(
        (
            prop::sample::select(vec!["http", "https"]),
            "[a-z]{1,12}(\\.[a-z]{2,6}){0,2}(:[0-9]{2,5})?",
        )
            .prop_map(|(scheme, host)| RequestOrigin::new(scheme, host)),
    )
}

#[test]
fn server_injection_uses_request_origin() {
    let raw = synthesizer().synthesize(Revision::new(1, 0)).unwrap();
    let origin = RequestOrigin::new("https", "api.example.com");
    let doc = FilterChain::standard().apply(raw, Some(&origin)).unwrap();
    let urls: Vec<_> = doc.servers.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["https://api.example.com"]);
}

#[test]
fn literalized_paths_are_unique_for_every_revision() {
    let synth = synthesizer();
    for revision in declared() {
        let raw = synth.synthesize(revision).unwrap();
        let raw_count = raw.paths.len();
        let doc = FilterChain::standard().apply(raw, None).unwrap();
        assert_eq!(doc.paths.len(), raw_count);
        for key in doc.paths.keys() {
            assert!(key.contains(&format!("/v{revision}/")), "{key}");
        }
    }
}

proptest! {
    #[test]
    fn raw_documents_carry_one_revision_parameter_per_operation(revision in revision_strategy()) {
        let raw = synthesizer().synthesize(revision).unwrap();
        prop_assert_eq!(revision_params(&raw), raw.operations().count());
    }

    #[test]
    fn pruning_removes_every_revision_parameter(revision in revision_strategy()) {
        let raw = synthesizer().synthesize(revision).unwrap();
        let doc = FilterChain::new()
            .with(forecast_docs::DocumentFilter::PruneRevisionParameter)
            .apply(raw, None)
            .unwrap();
        prop_assert_eq!(revision_params(&doc), 0);
    }

    #[test]
    fn no_placeholder_survives_literalization(revision in revision_strategy()) {
        let raw = synthesizer().synthesize(revision).unwrap();
        let doc = FilterChain::standard().apply(raw, None).unwrap();
        prop_assert!(doc.paths.keys().all(|k| !k.contains(REVISION_PLACEHOLDER)));
    }

    #[test]
    fn chain_is_idempotent(revision in revision_strategy(), origin in origin_strategy()) {
        let chain = FilterChain::standard();
        let raw = synthesizer().synthesize(revision).unwrap();
        let once = chain.apply(raw, origin.as_ref()).unwrap();
        let twice = chain.apply(once.clone(), origin.as_ref()).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn synthesis_is_deterministic(revision in revision_strategy()) {
        let synth = synthesizer();
        let a = serde_json::to_string(&synth.synthesize(revision).unwrap()).unwrap();
        let b = serde_json::to_string(&synth.synthesize(revision).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }
}
