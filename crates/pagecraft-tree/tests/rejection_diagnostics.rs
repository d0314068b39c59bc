//! Rejected transitions surface as warn-level tracing events.

use std::fmt;
use std::sync::{Arc, Mutex};

use pagecraft_tree::{EditorAction, EditorState, Node, NodeType, Props, reduce};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, registry};

#[derive(Clone, Default)]
struct WarnCapture {
    lines: Arc<Mutex<Vec<String>>>,
}

struct FieldVisitor(Vec<String>);

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push(format!("{}={:?}", field.name(), value));
    }
}

impl<S: Subscriber> Layer<S> for WarnCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.lines
            .lock()
            .expect("capture lock")
            .push(visitor.0.join(" "));
    }
}

fn node(id: &str, node_type: NodeType) -> Node {
    Node::new(id, node_type, Props::new())
}

#[test]
fn illegal_insert_emits_one_warning() {
    let capture = WarnCapture::default();
    let subscriber = registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut state = EditorState::default();
        for action in [
            EditorAction::insert(None, node("s1", NodeType::Section)),
            EditorAction::insert(Some("s1".into()), node("r1", NodeType::Row)),
            EditorAction::insert(Some("r1".into()), node("c1", NodeType::Column)),
        ] {
            state = reduce(&state, action).state;
        }
        let rejected = reduce(
            &state,
            EditorAction::insert(Some("c1".into()), node("r2", NodeType::Row)),
        );
        assert_eq!(rejected.state, state);
    });

    let lines = capture.lines.lock().expect("capture lock");
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("INSERT_NODE"), "{}", lines[0]);
    assert!(lines[0].contains("not allowed inside column c1"), "{}", lines[0]);
}

#[test]
fn missing_id_update_is_silent() {
    let capture = WarnCapture::default();
    let subscriber = registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let _ = reduce(
            &EditorState::default(),
            EditorAction::update("missing".into(), Props::new()),
        );
    });

    assert!(capture.lines.lock().expect("capture lock").is_empty());
}
