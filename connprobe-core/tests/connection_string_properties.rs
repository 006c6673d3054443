//! Property tests for parsing, diagnostics and variant generation.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use connprobe_core::config::AtSplit;
use connprobe_core::diagnostics::DiagnosticAnalyzer;
use connprobe_core::parser::{parse_connection_string, parse_with_split};
use connprobe_core::variations::VariantGenerator;
use connprobe_core::ConnProbeError;
use proptest::prelude::*;

/// Components free of every grammar delimiter.
fn component() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{1,16}"
}

fn host() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}\\.[a-z]{2,8}\\.net"
}

proptest! {
    #[test]
    fn well_formed_strings_round_trip(
        user in component(),
        pass in component(),
        host in host(),
        db in component(),
        key in "[A-Za-z]{1,10}",
        value in component(),
    ) {
        let raw = format!("mongodb+srv://{user}:{pass}@{host}/{db}?{key}={value}");
        let parsed = parse_connection_string(&raw).unwrap();

        prop_assert_eq!(parsed.scheme(), "mongodb+srv");
        prop_assert_eq!(parsed.username(), user.as_str());
        prop_assert_eq!(parsed.password(), pass.as_str());
        prop_assert_eq!(parsed.host(), host.as_str());
        prop_assert_eq!(parsed.database(), db.as_str());
        prop_assert_eq!(parsed.query_parameter(&key), Some(value.as_str()));
        prop_assert_eq!(parsed.to_connection_string(), raw);
    }

    #[test]
    fn parsing_is_idempotent(raw in "[ -~]{0,64}") {
        let first = parse_connection_string(&raw);
        let second = parse_connection_string(&raw);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(ConnProbeError::MalformedUri { .. }), Err(ConnProbeError::MalformedUri { .. })) => {
                prop_assert!(!raw.contains("://"));
            }
            _ => prop_assert!(false, "parse results diverged"),
        }
    }

    #[test]
    fn single_at_reports_count_and_position(
        user in component(),
        pass in component(),
        host in host(),
    ) {
        let raw = format!("mongodb+srv://{user}:{pass}@{host}/db");
        let report = DiagnosticAnalyzer::default().analyze(&raw);

        prop_assert_eq!(report.at_symbol_count, 1);
        prop_assert!(report.at_symbol_position >= 0);
    }

    #[test]
    fn surrounding_whitespace_is_flagged(
        lead in "[ \t\n]{0,3}",
        trail in "[ \t\n]{0,3}",
        host in host(),
    ) {
        prop_assume!(!lead.is_empty() || !trail.is_empty());
        let raw = format!("{lead}mongodb+srv://u:p@{host}/db{trail}");
        let report = DiagnosticAnalyzer::default().analyze(&raw);

        prop_assert!(report.has_extra_spaces);
        prop_assert!(report.trimmed_length < report.length);
    }

    #[test]
    fn analyzer_never_panics(raw in "\\PC{0,80}") {
        let report = DiagnosticAnalyzer::default().analyze(&raw);
        prop_assert_eq!(report.length, raw.chars().count());
    }

    #[test]
    fn variant_generation_is_deterministic(
        user in component(),
        pass in "[A-Za-z0-9@%]{1,12}",
        host in host(),
        db in "[a-z]{0,8}",
    ) {
        let raw = format!("mongodb+srv://{user}:{pass}@{host}/{db}");
        let base = parse_connection_string(&raw).unwrap();
        let generator = VariantGenerator::new(&base).with_alternate_host(Some("alt.mongodb.net"));

        let first: Vec<_> = generator.iter().collect();
        let second: Vec<_> = generator.iter().collect();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.first().map(|v| v.candidate.as_str()), Some(raw.as_str()));
    }

    #[test]
    fn split_strategies_agree_without_extra_at(
        user in component(),
        pass in component(),
        host in host(),
    ) {
        let raw = format!("mongodb+srv://{user}:{pass}@{host}/db");
        prop_assert_eq!(
            parse_with_split(&raw, AtSplit::First).unwrap(),
            parse_with_split(&raw, AtSplit::Last).unwrap()
        );
    }
}

#[test]
fn scenario_missing_separator_is_malformed() {
    let result = parse_connection_string("mongodb+srv:/alice:pw@cluster0.mongodb.net");
    assert!(matches!(result, Err(ConnProbeError::MalformedUri { .. })));
}

#[test]
fn scenario_two_at_symbols() {
    let raw = "mongodb+srv://alice:p@ss@cluster0.mongodb.net/mydb";
    let parsed = parse_connection_string(raw).unwrap();
    let report = DiagnosticAnalyzer::default().analyze(raw);

    assert_eq!(parsed.password(), "p@ss");
    assert_eq!(parsed.host(), "cluster0.mongodb.net");
    assert_eq!(parsed.database(), "mydb");
    assert_eq!(report.at_symbol_count, 2);
    assert!(report.warnings.iter().any(|w| w.contains("multiple @")));
}

#[test]
fn scenario_srv_with_explicit_port() {
    let report =
        DiagnosticAnalyzer::default().analyze("mongodb+srv://u:p@cluster0.mongodb.net:27017/db");

    assert!(report.contains_port);
    assert!(report.warnings.iter().any(|w| w.contains("colon")));
}
