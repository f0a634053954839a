use pretty_assertions::assert_eq;
use quire_core::{Doc, EditorState, EditorView, Mark, Node, Selection, Slice};
use quire_suggest::{
    ChangeReason, ExitReason, SuggestChangeProps, SuggestDecoration, SuggestError, SuggestEvent,
    SuggestPlugin, Suggester, SuggesterConfig, active_match, add_ignored, clear_ignored,
    ignore_match, ignore_next_exit, remove_ignored, suggest_state,
};
use std::cell::RefCell;
use std::rc::Rc;

type Calls = Rc<RefCell<Vec<(String, SuggestEvent)>>>;

fn view_with(configs: Vec<SuggesterConfig>, text: &str, cursor: usize) -> (EditorView, Calls) {
    let calls: Calls = Rc::default();
    let suggesters = configs
        .into_iter()
        .map(|config| {
            let sink = calls.clone();
            Suggester::new(config).unwrap().on_change(
                move |props: &SuggestChangeProps, _tr| {
                    sink.borrow_mut()
                        .push((props.suggest_match.suggester.clone(), props.event));
                },
            )
        })
        .collect();
    let state = EditorState::builder(Doc::from_text(text))
        .selection(Selection::cursor(cursor))
        .plugin(SuggestPlugin::new(suggesters).unwrap())
        .build();
    (EditorView::new(state), calls)
}

fn mention() -> SuggesterConfig {
    SuggesterConfig::new("mention", "@")
}

fn select(view: &mut EditorView, selection: Selection) {
    let mut tr = view.state().tr();
    tr.set_selection(selection);
    view.dispatch(tr);
}

fn last_event(calls: &Calls) -> Option<SuggestEvent> {
    calls.borrow().last().map(|(_, event)| *event)
}

fn exited(reason: ExitReason) -> Option<SuggestEvent> {
    Some(SuggestEvent::Exit(reason))
}

fn changed(reason: ChangeReason) -> Option<SuggestEvent> {
    Some(SuggestEvent::Change(reason))
}

#[test]
fn test_initial_match_and_move() {
    let (mut view, calls) = view_with(vec![mention()], "hi @bob", 7);
    assert_eq!(active_match(view.state()).unwrap().query.full, "bob");

    select(&mut view, Selection::cursor(5));
    assert_eq!(last_event(&calls), changed(ChangeReason::Move));
    assert_eq!(active_match(view.state()).unwrap().query.partial, "b");
}

#[test]
fn test_move_out_of_either_side() {
    let (mut view, calls) = view_with(vec![mention()], "hi @bob x", 7);
    select(&mut view, Selection::cursor(9));
    assert_eq!(last_event(&calls), exited(ExitReason::MoveEnd));

    select(&mut view, Selection::cursor(5));
    assert_eq!(last_event(&calls), changed(ChangeReason::Start));
    select(&mut view, Selection::cursor(1));
    assert_eq!(last_event(&calls), exited(ExitReason::MoveStart));
}

#[test]
fn test_jump_between_matches() {
    let (mut view, calls) = view_with(vec![mention()], "@ann @bob", 3);
    select(&mut view, Selection::cursor(8));
    assert_eq!(
        calls.borrow()[calls.borrow().len() - 2..].to_vec(),
        vec![
            ("mention".to_string(), SuggestEvent::Exit(ExitReason::JumpForward)),
            ("mention".to_string(), SuggestEvent::Change(ChangeReason::JumpForward)),
        ]
    );
    select(&mut view, Selection::cursor(2));
    assert_eq!(last_event(&calls), changed(ChangeReason::JumpBackward));
}

#[test]
fn test_deleting_the_match() {
    let (mut view, calls) = view_with(vec![mention()], "hi @bob", 7);
    let mut tr = view.state().tr();
    tr.delete(3, 7).unwrap();
    view.dispatch(tr);
    assert_eq!(last_event(&calls), exited(ExitReason::Delete));
}

#[test]
fn test_splitting_the_match() {
    let (mut view, calls) = view_with(vec![mention()], "@abcd", 5);
    let mut tr = view.state().tr();
    tr.insert(3, Slice::text(" ")).unwrap();
    view.dispatch(tr);
    assert_eq!(view.state().doc().text_content(), "@ab cd");
    assert_eq!(last_event(&calls), exited(ExitReason::Split));
}

#[test]
fn test_invalid_prefix_split() {
    let (mut view, calls) = view_with(vec![mention()], "@abc", 4);
    let mut tr = view.state().tr();
    tr.insert(0, Slice::text("x")).unwrap();
    view.dispatch(tr);
    assert_eq!(last_event(&calls), exited(ExitReason::InvalidSplit));
}

#[test]
fn test_invalid_mark_over_match_is_invalid_split() {
    let mut config = mention();
    config.invalid_marks = vec!["code".to_string()];
    let (mut view, calls) = view_with(vec![config], "hi @bob", 7);
    let mut tr = view.state().tr();
    tr.add_mark(3, 7, Mark::new("code")).unwrap();
    view.dispatch(tr);
    assert!(active_match(view.state()).is_none());
    assert_eq!(last_event(&calls), exited(ExitReason::InvalidSplit));
}

#[test]
fn test_ignoring_active_match_ends_it() {
    let (mut view, calls) = view_with(vec![mention()], "hi @bob", 7);
    assert!(view.run(add_ignored(3, "mention", true)));
    assert!(active_match(view.state()).is_none());
    assert_eq!(
        *calls.borrow(),
        vec![("mention".to_string(), SuggestEvent::Exit(ExitReason::End))]
    );
}

#[test]
fn test_ignoring_top_suggester_starts_the_next() {
    let people = SuggesterConfig::new("people", "@").with_priority(20);
    let teams = SuggesterConfig::new("teams", "@").with_priority(10);
    let (mut view, calls) = view_with(vec![people, teams], "@dev", 4);
    assert!(view.run(add_ignored(0, "people", true)));
    assert_eq!(
        *calls.borrow(),
        vec![("teams".to_string(), SuggestEvent::Change(ChangeReason::Start))]
    );
}

#[test]
fn test_ignored_trigger_stays_ignored_across_edits() {
    let (mut view, calls) = view_with(vec![mention()], "hi @bob", 7);
    assert!(view.run(add_ignored(3, "mention", true)));
    assert!(active_match(view.state()).is_none());
    calls.borrow_mut().clear();

    let mut tr = view.state().tr();
    tr.insert(0, Slice::text(">> ")).unwrap();
    view.dispatch(tr);
    select(&mut view, Selection::cursor(9));
    assert!(active_match(view.state()).is_none());
    assert!(calls.borrow().is_empty());

    let ignored: Vec<_> = suggest_state(view.state())
        .unwrap()
        .ignored()
        .iter()
        .map(|d| (d.from, d.to))
        .collect();
    assert_eq!(ignored, vec![(6, 7)]);

    assert!(!view.run(remove_ignored(3, "mention")));
    assert!(view.run(remove_ignored(6, "mention")));
    select(&mut view, Selection::cursor(10));
    assert_eq!(active_match(view.state()).unwrap().query.full, "bob");
}

#[test]
fn test_non_specific_ignore_covers_shared_trigger() {
    let people = SuggesterConfig::new("people", "@").with_priority(20);
    let teams = SuggesterConfig::new("teams", "@").with_priority(10);

    let (mut view, _) = view_with(vec![people.clone(), teams.clone()], "@dev", 4);
    assert!(view.run(add_ignored(0, "people", true)));
    assert_eq!(active_match(view.state()).unwrap().suggester, "teams");

    let (mut view, _) = view_with(vec![people, teams], "@dev", 4);
    assert!(view.run(add_ignored(0, "people", false)));
    assert!(active_match(view.state()).is_none());

    assert!(!view.run(clear_ignored(Some("teams"))));
    assert!(view.run(clear_ignored(None)));
    select(&mut view, Selection::cursor(3));
    assert_eq!(active_match(view.state()).unwrap().suggester, "people");
}

#[test]
fn test_add_ignored_rejects_unknown_suggester() {
    let (mut view, _) = view_with(vec![mention()], "@x", 2);
    assert!(!view.run(add_ignored(0, "nobody", false)));
    assert!(!view.run(add_ignored(9, "mention", false)));

    let plugin = view.state().plugin::<SuggestPlugin>().unwrap();
    let err = plugin
        .ignore_action(view.state().doc(), 0, "nobody", false)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown suggester `nobody`");
}

#[test]
fn test_ignore_next_exit() {
    let (mut view, calls) = view_with(vec![mention()], "@x y", 2);
    assert!(view.run(ignore_next_exit()));
    assert!(suggest_state(view.state()).unwrap().ignores_next_exit());
    calls.borrow_mut().clear();

    select(&mut view, Selection::cursor(4));
    assert!(calls.borrow().is_empty());
    assert!(!suggest_state(view.state()).unwrap().ignores_next_exit());

    select(&mut view, Selection::cursor(1));
    select(&mut view, Selection::cursor(4));
    assert_eq!(last_event(&calls), exited(ExitReason::MoveEnd));
}

#[test]
fn test_active_match_decoration() {
    let mut config = mention();
    config.suggest_class_name = "mention-query".to_string();
    let (view, _) = view_with(vec![config], "hi @bob", 7);

    let decorations = suggest_state(view.state()).unwrap().decorations();
    let found: Vec<_> = decorations
        .iter()
        .map(|d| (d.from, d.to, d.attrs.class.clone(), d.spec.clone()))
        .collect();
    assert_eq!(
        found,
        vec![(
            3,
            7,
            Some("mention-query".to_string()),
            SuggestDecoration::Active("mention".to_string())
        )]
    );

    let mut quiet = mention();
    quiet.disable_decorations = true;
    let (view, _) = view_with(vec![quiet], "hi @bob", 7);
    let plugin_state = suggest_state(view.state()).unwrap();
    assert!(plugin_state.decorations().is_empty());
}

#[test]
fn test_handler_converts_match_on_exit() {
    let suggester = Suggester::new(mention())
        .unwrap()
        .on_change(|props: &SuggestChangeProps, tr| {
            let m = &props.suggest_match;
            if props.exit_reason() == Some(ExitReason::MoveEnd) {
                let atom = Slice::atom(Node::new("mention").with_attr("id", m.query.full.clone()));
                tr.replace(m.range.from, m.range.to, atom).unwrap();
            } else if props.exit_reason() == Some(ExitReason::Split) {
                ignore_match(tr, m, true);
            }
        });
    let state = EditorState::builder(Doc::new())
        .plugin(SuggestPlugin::new(vec![suggester]).unwrap())
        .build();
    let mut view = EditorView::new(state);

    for ch in "@ann ".chars() {
        let mut tr = view.state().tr();
        tr.insert_text(&ch.to_string()).unwrap();
        view.dispatch(tr);
    }

    let doc = view.state().doc();
    assert_eq!(doc.text_content(), "\u{FFFC} ");
    let id = doc.atom_at(0).unwrap().attrs.get("id").cloned();
    assert_eq!(id.as_deref(), Some("ann"));
    assert!(active_match(view.state()).is_none());
}

#[test]
fn test_configuration_errors() {
    let err = SuggestPlugin::from_configs([mention(), mention()]).unwrap_err();
    assert_eq!(err.to_string(), "duplicate suggester name `mention`");

    let mut broken = mention();
    broken.valid_prefix_characters = "(".to_string();
    assert!(matches!(
        Suggester::new(broken),
        Err(SuggestError::InvalidPattern {
            field: "valid_prefix_characters",
            ..
        })
    ));
}

#[test]
fn test_config_from_json() {
    let config: SuggesterConfig = serde_json::from_str(
        r#"{"name": "tag", "char": {"regex": "[#+]"}, "priority": 3, "invalid_marks": ["code"]}"#,
    )
    .unwrap();
    assert_eq!(config.priority, 3);
    assert_eq!(config.invalid_marks, vec!["code".to_string()]);
    assert_eq!(config.supported_characters, r"\w+");

    let plugin = SuggestPlugin::from_configs([config]).unwrap();
    let state = EditorState::builder(Doc::from_text("x +rust"))
        .selection(Selection::cursor(7))
        .plugin(plugin)
        .build();
    let found = active_match(&state).unwrap();
    assert_eq!(found.char, "+");
    assert_eq!(found.query.full, "rust");
}
