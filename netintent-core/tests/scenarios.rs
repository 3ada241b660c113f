use netintent_core::intent::{Intent, IntentKind, IntentSet};
use netintent_core::oracle::Oracle;
use netintent_core::topology::{Link, Topology};
use netintent_core::{Driver, RunConfig};
use std::time::Duration;

fn triangle_with_chord() -> Topology {
    Topology {
        routers: vec!["A".into(), "B".into(), "C".into()],
        links: vec![
            Link { node1: "A".into(), node2: "B".into() },
            Link { node1: "B".into(), node2: "C".into() },
            Link { node1: "A".into(), node2: "C".into() },
        ],
    }
}

fn path(nodes: &[&str]) -> Vec<String> {
    nodes.iter().map(|s| s.to_string()).collect()
}

fn run_all(topology: Topology, intents: Vec<Intent>) -> netintent_core::AnalysisResult {
    let n = intents.len();
    let config = RunConfig {
        timeout: Duration::from_secs(30),
        max_results: 50,
        ..RunConfig::default()
    };
    let z3_config = z3::Config::new();
    let ctx = z3::Context::new(&z3_config);
    let oracle = Oracle::new(&ctx, topology, IntentSet::new(intents));
    Driver::new(&oracle, n, config).run()
}

#[test]
fn pair_conflict_tight_triangle_yields_one_mus_two_msses() {
    let topology = triangle_with_chord();
    let intents = vec![
        Intent {
            id: "I1".into(),
            kind: IntentKind::PathPreference {
                primary: path(&["A", "C"]),
                secondary: path(&["A", "B", "C"]),
            },
        },
        Intent {
            id: "I2".into(),
            kind: IntentKind::PathPreference {
                primary: path(&["A", "B", "C"]),
                secondary: path(&["A", "C"]),
            },
        },
    ];
    let result = run_all(topology, intents);

    assert_eq!(result.muses.len(), 1);
    assert_eq!(result.muses[0].len(), 2);

    assert_eq!(result.msses.len(), 2);
    for mss in &result.msses {
        assert_eq!(mss.len(), 1);
    }
}

#[test]
fn ecmp_vs_simple_conflict() {
    let topology = triangle_with_chord();
    let intents = vec![
        Intent {
            id: "I1".into(),
            kind: IntentKind::Ecmp {
                paths: vec![path(&["A", "C"]), path(&["A", "B", "C"])],
            },
        },
        Intent {
            id: "I2".into(),
            kind: IntentKind::Simple { path: path(&["A", "C"]) },
        },
    ];
    let result = run_all(topology, intents);

    assert_eq!(result.muses.len(), 1);
    assert_eq!(result.muses[0].len(), 2);
}

#[test]
fn all_sat_star_topology_baseline() {
    let topology = Topology {
        routers: vec!["HUB".into(), "L1".into(), "L2".into(), "L3".into()],
        links: vec![
            Link { node1: "HUB".into(), node2: "L1".into() },
            Link { node1: "HUB".into(), node2: "L2".into() },
            Link { node1: "HUB".into(), node2: "L3".into() },
        ],
    };
    let intents = vec![
        Intent {
            id: "I1".into(),
            kind: IntentKind::Simple { path: path(&["HUB", "L1"]) },
        },
        Intent {
            id: "I2".into(),
            kind: IntentKind::Simple { path: path(&["HUB", "L2"]) },
        },
        Intent {
            id: "I3".into(),
            kind: IntentKind::Simple { path: path(&["HUB", "L3"]) },
        },
    ];
    let result = run_all(topology, intents);

    assert!(result.muses.is_empty());
    assert_eq!(result.msses.len(), 1);
    assert_eq!(result.msses[0].len(), 3);
}

#[test]
fn empty_intent_set_is_trivially_satisfiable() {
    let topology = triangle_with_chord();
    let result = run_all(topology, vec![]);
    assert!(result.muses.is_empty());
    assert_eq!(result.msses.len(), 1);
    assert!(result.msses[0].is_empty());
}
