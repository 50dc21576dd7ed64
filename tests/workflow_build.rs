use std::error::Error;
use std::fs;

use segflow::cli::CliArgs;
use segflow::config::load_and_validate;
use segflow::locator::{DataLocator, StaticLocator};
use segflow::segment::SegmentDict;
use segflow::stages;
use segflow::workflow::Workflow;

type TestResult = Result<(), Box<dyn Error>>;

const CONFIG: &str = r#"
[workflow]
start-time = 1000000000
end-time = 1000003600
instruments = ["H1", "L1"]
stage-order = ["condition_strain", "merge_triggers"]
min-segment-length = 100

[executable.condition_strain]
path = "/usr/bin/condition_strain"

[executable.condition_strain.options]
sample-rate = "4096"

[executable.merge_triggers]
path = "/usr/bin/merge_triggers"
memory-mb = 512

[site.CIT.segments]
H1 = [[1000000000, 1000002000]]
L1 = [[1000000000, 1000003600]]

[site.CIT.frames]
H1 = "file:///data/CIT/H1-FRAME-{start}-{duration}.gwf"
L1 = "file:///data/CIT/L1-FRAME-{start}-{duration}.gwf"

[site.SYR.segments]
H1 = [[1000000000, 1000002000]]

[site.SYR.frames]
H1 = "file:///data/SYR/H1-FRAME-{start}-{duration}.gwf"
"#;

fn write_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("Segflow.toml");
    fs::write(&path, CONFIG).expect("writing test config");
    path
}

#[test]
fn end_to_end_run_writes_a_plan() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config_path = write_config(&dir);
    let plan_path = dir.path().join("plan.json");

    let args = CliArgs {
        config: config_path.to_string_lossy().into_owned(),
        output: plan_path.to_string_lossy().into_owned(),
        log_level: None,
        dry_run: false,
    };
    segflow::run(args)?;

    let plan: serde_json::Value = serde_json::from_str(&fs::read_to_string(&plan_path)?)?;
    let jobs = plan["jobs"].as_array().expect("jobs array");

    // One condition node per instrument, then one merge node per instrument.
    assert_eq!(jobs.len(), 4);
    assert_eq!(jobs[0]["role"], "condition_strain");
    assert_eq!(jobs[1]["role"], "condition_strain");
    assert_eq!(jobs[2]["role"], "merge_triggers");
    assert_eq!(jobs[3]["role"], "merge_triggers");

    // Each merge consumes its instrument's conditioned file.
    let edges = plan["edges"].as_array().expect("edges array");
    assert_eq!(edges.len(), 2);
    Ok(())
}

#[test]
fn construction_is_reproducible() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config_path = write_config(&dir);

    let build = || -> anyhow::Result<String> {
        let path = dir.path().join("plan.json");
        segflow::run(CliArgs {
            config: config_path.to_string_lossy().into_owned(),
            output: path.to_string_lossy().into_owned(),
            log_level: None,
            dry_run: false,
        })?;
        Ok(fs::read_to_string(path)?)
    };

    assert_eq!(build()?, build()?);
    Ok(())
}

#[test]
fn datafind_trims_science_to_served_coverage() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = load_and_validate(write_config(&dir))?;
    let mut workflow = Workflow::new(cfg)?;

    let locators = StaticLocator::from_config(workflow.config());
    let syr = locators
        .iter()
        .find(|l| l.site() == "SYR")
        .expect("SYR locator");

    let mut science = SegmentDict::new();
    for locator in locators.iter() {
        let view = stages::discover_science_segments(&workflow, locator)?;
        for (instrument, segs) in view.iter() {
            let merged = match science.get(instrument) {
                Some(existing) => existing.union(segs),
                None => segs.clone(),
            };
            science.insert(instrument.to_string(), merged);
        }
    }

    let (files, trimmed) = stages::run_datafind(&mut workflow, &science, syr)?;

    // SYR only serves H1, so its L1 view collapses to nothing.
    assert_eq!(files.len(), 1);
    assert_eq!(trimmed.get("H1").map(|l| l.total_duration()), Some(2000));
    assert_eq!(trimmed.get("L1").map(|l| l.total_duration()), Some(0));
    Ok(())
}

#[test]
fn same_frame_at_two_sites_merges_into_replicas() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_config(&dir);

    let cfg = load_and_validate(&path)?;
    let mut workflow = Workflow::new(cfg)?;
    let locators = StaticLocator::from_config(workflow.config());

    let mut science = SegmentDict::new();
    for locator in locators.iter() {
        let view = stages::discover_science_segments(&workflow, locator)?;
        for (instrument, segs) in view.iter() {
            let merged = match science.get(instrument) {
                Some(existing) => existing.union(segs),
                None => segs.clone(),
            };
            science.insert(instrument.to_string(), merged);
        }
    }

    for locator in locators.iter() {
        stages::run_datafind(&mut workflow, &science, locator)?;
    }

    // Both sites serve the same logical H1 frame (same basename and span),
    // so the catalog holds one file with a replica PFN per site.
    let h1 = workflow.files().for_source("H1");
    assert_eq!(h1.len(), 1);
    assert_eq!(h1.files()[0].pfns().len(), 2);
    assert_eq!(h1.files()[0].pfns()[0].site, "CIT");
    assert_eq!(h1.files()[0].pfns()[1].site, "SYR");
    Ok(())
}

#[test]
fn invalid_configs_fail_validation() -> TestResult {
    let dir = tempfile::tempdir()?;

    let backwards = CONFIG.replace("end-time = 1000003600", "end-time = 999999999");
    let path = dir.path().join("backwards.toml");
    fs::write(&path, backwards)?;
    assert!(load_and_validate(&path).is_err());

    let unknown_stage = CONFIG.replace(
        "stage-order = [\"condition_strain\", \"merge_triggers\"]",
        "stage-order = [\"nonexistent\"]",
    );
    let path = dir.path().join("unknown_stage.toml");
    fs::write(&path, unknown_stage)?;
    assert!(load_and_validate(&path).is_err());

    let bad_site_pair = CONFIG.replace(
        "H1 = [[1000000000, 1000002000]]\n\n[site.SYR.frames]",
        "H1 = [[1000002000, 1000000000]]\n\n[site.SYR.frames]",
    );
    let path = dir.path().join("bad_site.toml");
    fs::write(&path, bad_site_pair)?;
    assert!(load_and_validate(&path).is_err());
    Ok(())
}
