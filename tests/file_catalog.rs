use std::error::Error;

use segflow::catalog::{resolve_url_to_file, File, FileAttrs, FileIdentity, FileList};
use segflow::errors::WorkflowError;
use segflow::segment::Segment;

type TestResult = Result<(), Box<dyn Error>>;

fn attrs(start: i64, end: i64) -> FileAttrs {
    FileAttrs::new(
        vec!["H1".to_string()],
        "FRAME",
        Segment::new(start, end).expect("test segment"),
    )
}

fn bare_file(name: &str, start: i64, end: i64) -> File {
    File::new(FileIdentity::new(
        vec!["H1".to_string()],
        name,
        Segment::new(start, end).expect("test segment"),
        Vec::new(),
    ))
}

#[test]
fn resolve_file_url_with_embedded_span() -> TestResult {
    let file = resolve_url_to_file(
        "file://localhost/data/H1-FRAME-1000-100.gwf",
        &attrs(950, 1200),
    )?;

    assert_eq!(file.name(), "H1-FRAME-1000-100.gwf");
    assert_eq!(*file.segment(), Segment::new(1000, 1100)?);
    assert_eq!(file.pfns().len(), 1);
    assert_eq!(file.pfns()[0].site, "local");
    assert_eq!(
        file.local_path().map(|p| p.to_string_lossy().into_owned()),
        Some("/data/H1-FRAME-1000-100.gwf".to_string())
    );
    Ok(())
}

#[test]
fn resolve_plain_path_without_span_uses_requested_segment() -> TestResult {
    let file = resolve_url_to_file("/data/sky_points.txt", &attrs(0, 1000))?;
    assert_eq!(file.name(), "sky_points.txt");
    assert_eq!(*file.segment(), Segment::new(0, 1000)?);
    Ok(())
}

#[test]
fn resolve_rejects_unsupported_scheme() {
    let err = resolve_url_to_file("gsiftp://remote/data/frame.gwf", &attrs(0, 100)).unwrap_err();
    assert!(matches!(err, WorkflowError::UnsupportedScheme { .. }));
}

#[test]
fn resolve_rejects_non_intersecting_embedded_span() {
    let err =
        resolve_url_to_file("file:///data/H1-FRAME-5000-100.gwf", &attrs(0, 100)).unwrap_err();
    match err {
        WorkflowError::SpanMismatch {
            found_start,
            found_end,
            want_start,
            want_end,
            ..
        } => {
            assert_eq!((found_start, found_end), (5000, 5100));
            assert_eq!((want_start, want_end), (0, 100));
        }
        other => panic!("expected SpanMismatch, got {other:?}"),
    }
}

#[test]
fn add_pfn_is_idempotent() {
    let mut file = bare_file("a.hdf", 0, 100);
    file.add_pfn("file:///data/a.hdf", "local");
    file.add_pfn("file:///data/a.hdf", "local");
    assert_eq!(file.pfns().len(), 1);

    // Same URL at another site is a distinct replica.
    file.add_pfn("file:///data/a.hdf", "CIT");
    assert_eq!(file.pfns().len(), 2);
}

#[test]
fn resolve_pfn_prefers_site_then_registration_order() -> TestResult {
    let mut file = bare_file("a.hdf", 0, 100);
    file.add_pfn("file:///syr/a.hdf", "SYR");
    file.add_pfn("file:///cit/a.hdf", "CIT");

    assert_eq!(file.resolve_pfn("CIT")?.url, "file:///cit/a.hdf");
    // Unknown preferred site falls back to the first registered PFN,
    // deterministically.
    assert_eq!(file.resolve_pfn("LHO")?.url, "file:///syr/a.hdf");
    assert_eq!(file.resolve_pfn("LHO")?.url, "file:///syr/a.hdf");
    Ok(())
}

#[test]
fn resolve_pfn_on_unmaterialized_file_fails() {
    let file = bare_file("never-written.hdf", 0, 100);
    let err = file.resolve_pfn("local").unwrap_err();
    assert!(matches!(err, WorkflowError::Unmaterialized { name } if name == "never-written.hdf"));
}

#[test]
fn identity_ignores_replicas() {
    let mut a = bare_file("a.hdf", 0, 100);
    let b = bare_file("a.hdf", 0, 100);
    a.add_pfn("file:///data/a.hdf", "local");
    assert_eq!(a.identity(), b.identity());
}

#[test]
fn file_list_set_operations_key_on_identity() {
    let mut all = FileList::new();
    all.push(bare_file("a.hdf", 0, 100));
    all.push(bare_file("b.hdf", 100, 200));
    all.push(bare_file("c.hdf", 200, 300));

    let mut partial = FileList::new();
    partial.push(bare_file("b.hdf", 100, 200));

    let missing = all.difference(&partial);
    assert_eq!(missing.len(), 2);
    assert!(missing.iter().all(|f| f.name() != "b.hdf"));

    let common = all.intersection(&partial);
    assert_eq!(common.len(), 1);
    assert_eq!(common.files()[0].name(), "b.hdf");
}

#[test]
fn file_list_filters() -> TestResult {
    let mut files = FileList::new();
    files.push(bare_file("a.hdf", 0, 100));
    let mut tagged = File::new(FileIdentity::new(
        vec!["L1".to_string()],
        "b.hdf",
        Segment::new(500, 600)?,
        vec!["INJ".to_string()],
    ));
    tagged.add_pfn("file:///data/b.hdf", "local");
    files.push(tagged);

    assert_eq!(files.for_source("L1").len(), 1);
    assert_eq!(files.with_tag("INJ").len(), 1);
    assert_eq!(files.overlapping(&Segment::new(50, 550)?).len(), 2);
    assert_eq!(files.overlapping(&Segment::new(100, 500)?).len(), 0);
    Ok(())
}
