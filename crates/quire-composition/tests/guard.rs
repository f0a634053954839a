use pretty_assertions::assert_eq;
use quire_composition::{
    CompositionPhase, CompositionPlugin, CompositionState, composition_phase, composition_state,
    delete_content_backward, end_delete,
};
use quire_core::{Doc, EditorState, EditorView, Mark, Node, Selection, Slice};

/// "hi @ there" where `@` is a mention atom at 3.
fn mention_doc() -> Doc {
    let mut tr = EditorState::builder(Doc::from_text("hi  there")).build().tr();
    tr.insert(3, Slice::atom(Node::new("mention"))).unwrap();
    tr.doc().clone()
}

fn view(doc: Doc, selection: Selection) -> EditorView {
    EditorView::new(
        EditorState::builder(doc)
            .selection(selection)
            .plugin(CompositionPlugin::new())
            .build(),
    )
}

fn selection_churn(view: &EditorView, selection: Selection) -> quire_core::ApplyResult {
    let mut tr = view.state().tr();
    tr.set_selection(selection);
    view.state().apply_transaction(tr)
}

#[test]
fn test_single_shot_correction_and_reset() {
    let mut view = view(mention_doc(), Selection::cursor(4));

    assert!(view.run(delete_content_backward()));
    assert_eq!(view.state().doc().text_content(), "hi  there");
    assert_eq!(composition_phase(view.state()), CompositionPhase::Deleting);

    assert!(view.run(end_delete(Selection::cursor(3))));
    assert_eq!(
        composition_state(view.state()),
        CompositionState {
            delete_in_progress: false,
            active: true,
            selection: Some(Selection::cursor(3)),
            last_transaction_filtered: false,
        }
    );

    let result = selection_churn(&view, Selection::cursor(9));
    assert_eq!(result.transactions.len(), 2);
    assert_eq!(result.state.selection(), Selection::cursor(3));
    assert!(composition_state(&result.state).last_transaction_filtered);
    view.update_state(result.state);

    let result = selection_churn(&view, Selection::cursor(9));
    assert_eq!(result.transactions.len(), 1);
    assert_eq!(result.state.selection(), Selection::cursor(9));
    assert_eq!(
        composition_state(&result.state),
        CompositionState::default()
    );
}

#[test]
fn test_document_change_does_not_trigger_correction() {
    let mut view = view(mention_doc(), Selection::cursor(4));
    assert!(view.run(delete_content_backward()));
    assert!(view.run(end_delete(Selection::cursor(3))));

    let mut tr = view.state().tr();
    tr.insert(0, Slice::text(">")).unwrap();
    let result = view.state().apply_transaction(tr);
    assert_eq!(result.transactions.len(), 1);
    assert_eq!(
        composition_phase(&result.state),
        CompositionPhase::Pending {
            selection: Selection::cursor(4)
        }
    );
}

#[test]
fn test_end_delete_requires_guarded_deletion() {
    let mut view = view(Doc::from_text("plain"), Selection::cursor(5));
    assert!(!view.run(end_delete(Selection::cursor(2))));
    assert!(!view.run(delete_content_backward()));
    assert_eq!(view.state().doc().text_content(), "plain");
}

#[test]
fn test_marked_text_deletes_one_grapheme() {
    let mut tr = EditorState::builder(Doc::from_text("cafe\u{301}")).build().tr();
    tr.add_mark(0, 5, Mark::new("bold")).unwrap();
    let mut view = view(tr.doc().clone(), Selection::cursor(5));

    assert!(view.can_run(delete_content_backward()));
    assert!(view.run(delete_content_backward()));
    assert_eq!(view.state().doc().text_content(), "caf");
    assert_eq!(view.state().selection(), Selection::cursor(3));
}

#[test]
fn test_selection_touching_atom_is_deleted() {
    let mut view = view(mention_doc(), Selection::new(4, 6));
    assert!(view.run(delete_content_backward()));
    assert_eq!(view.state().doc().text_content(), "hi \u{FFFC}here");
    assert_eq!(view.state().selection(), Selection::cursor(4));
}

#[test]
fn test_without_plugin_nothing_applies() {
    let state = EditorState::builder(mention_doc())
        .selection(Selection::cursor(4))
        .build();
    let mut view = EditorView::new(state);
    assert!(!view.run(delete_content_backward()));
    assert_eq!(composition_state(view.state()), CompositionState::default());
}

#[test]
fn test_dry_run_agrees_with_run() {
    let cases = [
        (Selection::cursor(4), true),
        (Selection::new(4, 6), true),
        (Selection::new(9, 3), true),
        (Selection::cursor(7), false),
        (Selection::cursor(0), false),
    ];
    for (selection, expected) in cases {
        let mut view = view(mention_doc(), selection);
        let dry = view.can_run(delete_content_backward());
        assert_eq!(view.state().doc().text_content(), "hi \u{FFFC} there");
        assert_eq!(dry, view.run(delete_content_backward()), "{selection:?}");
        assert_eq!(dry, expected, "{selection:?}");
    }
}
