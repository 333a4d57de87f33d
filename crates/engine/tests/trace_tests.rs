use serde_json::json;
use tracewalk_common::StepRecord;
use tracewalk_engine::{
    parse_trace, render_with_tree, InteractiveSession, MemoryView, ScriptedCommands, SessionState,
    StackView, StorageView, TraceRenderer, TraceTree, DEFAULT_WINDOW_RADIUS,
};
use tracing::info;

/// Presenter that keeps only the selected opcode of every render
#[derive(Default)]
struct SelectedOps {
    ops: Vec<String>,
    farewell: Option<String>,
}

impl tracewalk_engine::Presenter for SelectedOps {
    fn present(
        &mut self,
        payload: &tracewalk_engine::DisplayPayload,
    ) -> Result<(), tracewalk_engine::SessionError> {
        let selected = payload.opcodes.iter().find(|line| line.selected).unwrap();
        self.ops.push(selected.op.clone());
        Ok(())
    }

    fn farewell(&mut self, message: &str) -> Result<(), tracewalk_engine::SessionError> {
        self.farewell = Some(message.to_string());
        Ok(())
    }
}

fn call_scenario() -> Vec<StepRecord> {
    parse_trace(json!([
        { "op": "CALL", "depth": 1, "stack": ["0x1", "0x2", "0x3"] },
        { "op": "PUSH1", "depth": 2, "memory": "" },
        { "op": "STOP", "depth": 2, "storage": { "0x0": "0x2a", "0x1": "0x01" } },
        { "op": "RETURN", "depth": 1, "memory": ["abc", "0"] }
    ]))
    .unwrap()
    .struct_logs
}

#[test]
fn test_call_scenario_tree() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let steps = call_scenario();
    let tree = TraceTree::build(&steps);

    let roots: Vec<_> = tree.roots().iter().map(|node| node.step.op.as_str()).collect();
    assert_eq!(roots, vec!["CALL", "RETURN"]);
    let children: Vec<_> =
        tree.roots()[0].children.iter().map(|node| node.step.op.as_str()).collect();
    assert_eq!(children, vec!["PUSH1", "STOP"]);
    assert_eq!(tree.call_path(1), vec!["CALL"]);
}

#[test]
fn test_call_scenario_rendering() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let steps = call_scenario();
    let tree = TraceTree::build(&steps);

    let first = render_with_tree(&tree, 0, DEFAULT_WINDOW_RADIUS);
    assert_eq!(first.position.to_string(), "1 of 4");
    assert_eq!(first.stack, StackView::Values(vec!["0x3".into(), "0x2".into(), "0x1".into()]));
    assert_eq!(first.opcodes.len(), 3);

    let push = render_with_tree(&tree, 1, DEFAULT_WINDOW_RADIUS);
    assert_eq!(push.call_path, vec!["CALL".to_string()]);
    assert_eq!(push.memory, MemoryView::NoData);
    assert_eq!(push.stack, StackView::Empty);

    let stop = render_with_tree(&tree, 2, DEFAULT_WINDOW_RADIUS);
    assert_eq!(
        stop.storage,
        StorageView::Entries(vec!["0x0: 0x2a".into(), "0x1: 0x01".into()])
    );

    let ret = render_with_tree(&tree, 3, DEFAULT_WINDOW_RADIUS);
    let MemoryView::Lines(lines) = &ret.memory else { panic!("expected memory lines") };
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.len() == 64));
    assert!(lines[0].ends_with("abc"));
    assert!(ret.call_path.is_empty());
}

#[test]
fn test_call_scenario_session() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let steps = call_scenario();
    let tree = TraceTree::build(&steps);
    let mut session = InteractiveSession::with_tree(&tree, TraceRenderer::default()).unwrap();
    let mut presenter = SelectedOps::default();
    let mut script = ScriptedCommands::parse("next next next next previous next quit");

    let summary = session.run(&mut script, &mut presenter).unwrap();

    assert_eq!(summary.state, SessionState::Terminated);
    assert_eq!(summary.last_rendered_index, 3);
    assert_eq!(
        presenter.ops,
        vec!["CALL", "PUSH1", "STOP", "RETURN", "RETURN", "STOP", "RETURN"]
    );
    assert_eq!(presenter.farewell.as_deref(), Some("Exiting..."));
    assert_eq!(script.remaining(), 0);
}
