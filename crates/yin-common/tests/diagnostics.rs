use yin_common::diagnostics::{CollectingSink, DiagnosticSink};
use yin_common::{Error, ErrorKind, Position};

#[test]
fn sink_preserves_report_order() {
    let mut sink = CollectingSink::new();
    sink.report(&Error::new(ErrorKind::MissArg, Position::new(1), "first"));
    sink.report(&Error::new(ErrorKind::InArg, Position::new(2), "second"));

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics[0].message, "first");
    assert_eq!(diagnostics[1].message, "second");
}

#[test]
fn atoms_are_stable_across_many_interns() {
    let mut interner = yin_common::Interner::new();
    let names = ["module", "container", "leaf", "list", "choice", "uses", "grouping"];
    let first_pass: Vec<_> = names.iter().map(|n| interner.intern(n)).collect();
    let second_pass: Vec<_> = names.iter().map(|n| interner.intern(n)).collect();
    assert_eq!(first_pass, second_pass);
}
