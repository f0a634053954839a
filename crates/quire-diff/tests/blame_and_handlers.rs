use quire_core::{Doc, EditorState, EditorView, Selection, Slice};
use quire_diff::{CommitRange, DiffOptions, DiffPlugin, Span, blame_map, commit_change};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

fn assert_covers(spans: &[Span], size: usize) {
    let mut pos = 0;
    for span in spans {
        assert_eq!(span.from, pos, "gap or overlap in {spans:?}");
        assert!(span.from < span.to, "empty span in {spans:?}");
        pos = span.to;
    }
    assert_eq!(pos, size, "blame map {spans:?} does not reach {size}");
}

#[test]
fn test_blame_map_partitions_document() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let state = EditorState::builder(Doc::from_text("the quick brown fox"))
        .plugin(DiffPlugin::default())
        .build();
    let mut view = EditorView::new(state);

    for round in 0..150 {
        let mut tr = view.state().tr();
        for _ in 0..rng.gen_range(1..4) {
            let size = tr.doc().content_size();
            let from = rng.gen_range(0..=size);
            let to = rng.gen_range(from..=size.min(from + 4));
            let text: String = (0..rng.gen_range(0..4))
                .map(|_| rng.gen_range(b'a'..=b'z') as char)
                .collect();
            tr.replace(from, to, Slice::text(&text)).unwrap();
        }
        view.dispatch(tr);
        if round % 3 == 0 {
            view.run(commit_change(format!("round {round}")));
        }

        let size = view.state().doc().content_size();
        assert_covers(blame_map(view.state()), size);
    }
}

#[test]
fn test_multi_step_transaction_is_attributed_once() {
    let state = EditorState::builder(Doc::from_text("abcdef"))
        .plugin(DiffPlugin::default())
        .build();
    let mut view = EditorView::new(state);

    let mut tr = view.state().tr();
    tr.insert(1, Slice::text("XY")).unwrap();
    tr.delete(2, 3).unwrap();
    tr.insert(7, Slice::text("Z")).unwrap();
    view.dispatch(tr);
    assert_eq!(view.state().doc().text_content(), "aXbcdefZ");

    assert_eq!(
        blame_map(view.state()),
        &[
            Span::new(0, 1, None),
            Span::new(1, 2, Some(0)),
            Span::new(2, 7, None),
            Span::new(7, 8, Some(0)),
        ]
    );
}

type Log = Rc<RefCell<Vec<String>>>;

fn logging_view(text: &str) -> (EditorView, Log) {
    let log: Log = Rc::default();
    let (select, deselect, over, leave) = (log.clone(), log.clone(), log.clone(), log.clone());
    let options = DiffOptions::default()
        .on_select_commits(move |current: &[CommitRange], previous: &[CommitRange]| {
            select
                .borrow_mut()
                .push(format!("select {} (was {})", current.len(), previous.len()));
        })
        .on_deselect_commits(move |previous: &[CommitRange]| {
            let line = format!("deselect {}", previous.len());
            deselect.borrow_mut().push(line);
        })
        .on_mouse_over_commit(move |range: &CommitRange| {
            over.borrow_mut().push(format!("over {}", range.commit));
        })
        .on_mouse_leave_commit(move |range: &CommitRange| {
            leave.borrow_mut().push(format!("leave {}", range.commit));
        });
    let state = EditorState::builder(Doc::from_text(text))
        .plugin(DiffPlugin::new(options))
        .build();
    (EditorView::new(state), log)
}

fn select(view: &mut EditorView, selection: Selection) {
    let mut tr = view.state().tr();
    tr.set_selection(selection);
    view.dispatch(tr);
}

#[test]
fn test_selection_handlers() {
    let (mut view, log) = logging_view("hello world");
    let mut tr = view.state().tr();
    tr.insert(11, Slice::text("!!")).unwrap();
    view.dispatch(tr);
    assert!(view.run(commit_change("shout")));
    log.borrow_mut().clear();

    select(&mut view, Selection::new(10, 12));
    select(&mut view, Selection::new(10, 13));
    select(&mut view, Selection::cursor(2));

    assert_eq!(
        *log.borrow(),
        vec!["select 1 (was 0)".to_string(), "deselect 1".to_string()]
    );
}

#[test]
fn test_cursor_touching_span_counts_as_selected() {
    let (mut view, log) = logging_view("abc");
    let mut tr = view.state().tr();
    tr.insert(0, Slice::text("xy")).unwrap();
    view.dispatch(tr);
    log.borrow_mut().clear();

    select(&mut view, Selection::cursor(4));
    select(&mut view, Selection::cursor(2));
    assert_eq!(
        *log.borrow(),
        vec!["deselect 1".to_string(), "select 1 (was 0)".to_string()]
    );
}

#[test]
fn test_mouse_hover() {
    let (mut view, log) = logging_view("abc");
    let mut tr = view.state().tr();
    tr.insert(3, Slice::text("def")).unwrap();
    view.dispatch(tr);
    log.borrow_mut().clear();

    let (plugin, _) = view.state().plugin_with_state::<DiffPlugin>().unwrap();
    assert!(!plugin.mouse_over(view.state(), 1));
    assert!(plugin.mouse_over(view.state(), 4));
    assert!(plugin.mouse_leave(view.state(), 4));
    assert!(!plugin.mouse_leave(view.state(), 6));

    assert_eq!(
        *log.borrow(),
        vec!["over 0".to_string(), "leave 0".to_string()]
    );
}
