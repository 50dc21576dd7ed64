use std::error::Error;

use segflow::catalog::{File, FileIdentity, FileList};
use segflow::dag::DagAssembler;
use segflow::errors::WorkflowError;
use segflow::job::{Node, ResourceSpec};
use segflow::segment::Segment;

type TestResult = Result<(), Box<dyn Error>>;

const RESOURCE: ResourceSpec = ResourceSpec {
    memory_mb: 1024,
    wallclock_minutes: 60,
};

fn product(name: &str) -> File {
    let mut file = File::new(FileIdentity::new(
        vec!["H1".to_string()],
        name,
        Segment::new(0, 100).expect("test segment"),
        Vec::new(),
    ));
    file.add_pfn(format!("file:///data/{name}"), "local");
    file
}

fn node(role: &str, inputs: &[File], outputs: &[File]) -> Node {
    Node::new(
        role,
        format!("/usr/bin/{role}"),
        Vec::new(),
        inputs.iter().cloned().collect::<FileList>(),
        outputs.iter().cloned().collect::<FileList>(),
        RESOURCE,
    )
}

#[test]
fn edges_are_inferred_from_file_identity() -> TestResult {
    let mut dag = DagAssembler::new();
    let raw = product("raw.gwf");
    let conditioned = product("conditioned.hdf");
    let analysed = product("analysed.hdf");

    let a = dag.add_node(node("condition", &[raw], &[conditioned.clone()]))?;
    let b = dag.add_node(node("analyse", &[conditioned], &[analysed]))?;

    assert_eq!(dag.edges(), &[(a, b)]);
    Ok(())
}

#[test]
fn external_inputs_create_no_edges() -> TestResult {
    let mut dag = DagAssembler::new();
    // raw.gwf has no registered producer: it pre-exists on disk.
    dag.add_node(node("condition", &[product("raw.gwf")], &[product("c.hdf")]))?;
    assert!(dag.edges().is_empty());
    Ok(())
}

#[test]
fn duplicate_output_identity_fails_and_leaves_graph_unchanged() -> TestResult {
    let mut dag = DagAssembler::new();
    let out = product("c.hdf");

    dag.add_node(node("condition", &[], &[out.clone()]))?;
    let err = dag
        .add_node(node("rogue", &[], &[product("other.hdf"), out]))
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::DuplicateOutput { name, producer_role }
            if name == "c.hdf" && producer_role == "condition"
    ));
    // Atomic rejection: neither the node nor its first output landed.
    assert_eq!(dag.node_count(), 1);
    assert!(dag.edges().is_empty());
    let retry = dag.add_node(node("other", &[], &[product("other.hdf")]));
    assert!(retry.is_ok());
    Ok(())
}

#[test]
fn finalize_emits_insertion_order_topologically() -> TestResult {
    let mut dag = DagAssembler::new();
    let c1 = product("c1.hdf");
    let c2 = product("c2.hdf");
    let merged = product("merged.hdf");

    dag.add_node(node("condition", &[product("raw1.gwf")], &[c1.clone()]))?;
    dag.add_node(node("condition", &[product("raw2.gwf")], &[c2.clone()]))?;
    dag.add_node(node("merge", &[c1, c2], &[merged]))?;

    let plan = dag.finalize("local")?;

    let roles: Vec<&str> = plan.jobs.iter().map(|j| j.role.as_str()).collect();
    assert_eq!(roles, vec!["condition", "condition", "merge"]);
    assert_eq!(plan.edges, vec![(0, 2), (1, 2)]);

    // Every edge points forward: producers come before consumers.
    assert!(plan.edges.iter().all(|(from, to)| from < to));
    Ok(())
}

#[test]
fn withdraw_removes_an_unconsumed_node() -> TestResult {
    let mut dag = DagAssembler::new();
    let kept = dag.add_node(node("condition", &[], &[product("a.hdf")]))?;
    let doomed = dag.add_node(node("condition", &[], &[product("b.hdf")]))?;

    let removed = dag.withdraw(doomed)?;
    assert_eq!(removed.role(), "condition");
    assert_eq!(dag.node_count(), 1);

    // Its output identity is free again.
    dag.add_node(node("replacement", &[], &[product("b.hdf")]))?;

    // Ids renumber compactly in the plan, preserving insertion order.
    let plan = dag.finalize("local")?;
    assert_eq!(plan.jobs.len(), 2);
    assert_eq!(plan.jobs[0].id, 0);
    assert_eq!(plan.jobs[0].role, "condition");
    assert_eq!(plan.jobs[1].role, "replacement");
    let _ = kept;
    Ok(())
}

#[test]
fn withdraw_of_consumed_node_is_refused() -> TestResult {
    let mut dag = DagAssembler::new();
    let out = product("c.hdf");
    let producer = dag.add_node(node("condition", &[], &[out.clone()]))?;
    dag.add_node(node("analyse", &[out], &[product("a.hdf")]))?;

    let err = dag.withdraw(producer).unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::OutputConsumed { role, output, consumer_role }
            if role == "condition" && output == "c.hdf" && consumer_role == "analyse"
    ));
    assert_eq!(dag.node_count(), 2);
    Ok(())
}

#[test]
fn withdraw_of_unknown_id_fails() {
    let mut dag = DagAssembler::new();
    let err = dag.withdraw(7).unwrap_err();
    assert!(matches!(err, WorkflowError::UnknownNode { id: 7 }));
}

#[test]
fn plan_resolves_pfns_at_the_preferred_site() -> TestResult {
    let mut dag = DagAssembler::new();
    let mut input = product("raw.gwf");
    input.add_pfn("file:///cit/raw.gwf", "CIT");

    dag.add_node(node("condition", &[input], &[product("c.hdf")]))?;
    let plan = dag.finalize("CIT")?;

    assert_eq!(plan.jobs[0].inputs, vec!["file:///cit/raw.gwf".to_string()]);
    // Output only exists at "local"; fallback is deterministic.
    assert_eq!(plan.jobs[0].outputs, vec!["file:///data/c.hdf".to_string()]);
    Ok(())
}

#[test]
fn plan_serializes_to_json() -> TestResult {
    let mut dag = DagAssembler::new();
    dag.add_node(node("condition", &[], &[product("c.hdf")]))?;
    let plan = dag.finalize("local")?;

    let value: serde_json::Value = serde_json::from_str(&plan.to_json()?)?;
    assert_eq!(value["jobs"][0]["role"], "condition");
    assert_eq!(value["jobs"][0]["memory_mb"], 1024);
    assert_eq!(value["edges"].as_array().map(Vec::len), Some(0));
    Ok(())
}
