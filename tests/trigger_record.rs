use std::error::Error;

use segflow::config::Config;
use segflow::errors::WorkflowError;
use segflow::segment::Segment;
use segflow::trigger::TriggerRecord;
use segflow::workflow::Workflow;

type TestResult = Result<(), Box<dyn Error>>;

const TRIGGERED_CONFIG: &str = r#"
[workflow]
start-time = 1187008682
end-time = 1187012282
instruments = ["H1", "L1"]
ra = 197.45
dec = -23.38
trigger-time = 1187008882
trigger-name = "GRB170817A"
trigger-network = "Fermi"
"#;

fn config(toml: &str) -> Config {
    toml::from_str(toml).expect("test config parses")
}

#[test]
fn record_builds_from_config_with_typed_defaults() -> TestResult {
    let cfg = config(TRIGGERED_CONFIG);
    let record = TriggerRecord::from_config(&cfg.workflow)?.expect("triggered run");

    assert_eq!(record.trigger_name, "GRB170817A");
    assert_eq!(record.trigger_time, 1187008882);
    assert_eq!(record.ra, 197.45);
    assert_eq!(record.dec, -23.38);
    assert_eq!(record.network, "Fermi");

    // Undeclared fields fall back to their per-kind defaults.
    assert_eq!(record.error_radius, 0.0);
    assert_eq!(record.event_number, 0);
    Ok(())
}

#[test]
fn absent_trigger_fields_mean_an_untriggered_run() -> TestResult {
    let untriggered = r#"
[workflow]
start-time = 0
end-time = 100
instruments = ["H1"]
"#;
    let cfg = config(untriggered);
    assert!(TriggerRecord::from_config(&cfg.workflow)?.is_none());
    Ok(())
}

#[test]
fn partial_trigger_fields_fail_at_construction() {
    let partial = TRIGGERED_CONFIG.replace("trigger-name = \"GRB170817A\"\n", "");
    let cfg = config(&partial);

    let err = TriggerRecord::from_config(&cfg.workflow).unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Trigger { field, .. } if field == "trigger-name"
    ));
}

#[test]
fn out_of_range_coordinates_are_rejected() {
    let err = TriggerRecord::new("GRB000000", 0, 400.0, 0.0).unwrap_err();
    assert!(matches!(err, WorkflowError::Trigger { field, .. } if field == "ra"));

    let err = TriggerRecord::new("GRB000000", 0, 0.0, -91.0).unwrap_err();
    assert!(matches!(err, WorkflowError::Trigger { field, .. } if field == "dec"));

    let err = TriggerRecord::new("", 0, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, WorkflowError::Trigger { field, .. } if field == "trigger-name"));
}

#[test]
fn record_registers_as_a_catalogued_file() -> TestResult {
    let cfg = config(TRIGGERED_CONFIG);
    let record = TriggerRecord::from_config(&cfg.workflow)?.expect("triggered run");

    let mut workflow = Workflow::new(cfg)?;
    let sources = workflow.instruments().to_vec();
    let file = record.to_file(&sources, workflow.analysis_time(), "output");
    workflow.register_file(file);

    let files = workflow.files();
    assert_eq!(files.len(), 1);
    let file = &files.files()[0];
    assert_eq!(file.name(), "triggerGRB170817A.xml");
    assert_eq!(*file.segment(), Segment::new(1187008682, 1187012282)?);
    assert_eq!(file.sources(), ["H1", "L1"]);
    assert_eq!(
        file.resolve_pfn("local")?.url,
        "file://output/triggerGRB170817A.xml"
    );
    Ok(())
}
