use std::sync::Once;

use scriptorium_core::{update, AppState, FileCandidate, Msg, ValidationPolicy};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn candidate(name: &str, size_bytes: u64) -> FileCandidate {
    FileCandidate {
        path: format!("/tmp/{name}"),
        name: name.to_string(),
        size_bytes,
    }
}

fn pick(state: AppState, names: &[&str]) -> AppState {
    let candidates = names.iter().map(|name| candidate(name, 1024)).collect();
    let (state, _effects) = update(state, Msg::FilesPicked(candidates));
    state
}

#[test]
fn only_matching_suffix_enters_pending_set() {
    init_logging();
    let state = AppState::new();
    let state = pick(
        state,
        &["letter.docx", "notes.txt", "scan.pdf", "reply.docx"],
    );
    let view = state.view();

    assert_eq!(view.pending.len(), 2);
    assert_eq!(view.pending[0].name, "letter.docx");
    assert_eq!(view.pending[1].name, "reply.docx");

    let stats = view.last_pick.unwrap();
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.rejected, 2);
}

#[test]
fn default_policy_is_case_sensitive() {
    init_logging();
    let state = pick(AppState::new(), &["UPPER.DOCX", "mixed.Docx", "plain.docx"]);
    let view = state.view();

    assert_eq!(view.pending.len(), 1);
    assert_eq!(view.pending[0].name, "plain.docx");
    assert_eq!(view.last_pick.unwrap().rejected, 2);
}

#[test]
fn case_insensitive_policy_accepts_upper_suffix() {
    init_logging();
    let policy = ValidationPolicy {
        ignore_suffix_case: true,
        ..ValidationPolicy::default()
    };
    let state = pick(
        AppState::with_policy(policy),
        &["UPPER.DOCX", "mixed.Docx", "still.txt"],
    );
    let view = state.view();

    assert_eq!(view.pending.len(), 2);
    assert_eq!(view.last_pick.unwrap().rejected, 1);
}

#[test]
fn double_extension_is_rejected_by_suffix_match() {
    init_logging();
    let state = pick(AppState::new(), &["file.docx.txt"]);
    assert!(state.view().pending.is_empty());
    assert_eq!(state.view().last_pick.unwrap().rejected, 1);
}

#[test]
fn duplicate_filenames_are_kept() {
    init_logging();
    let state = pick(AppState::new(), &["same.docx"]);
    let state = pick(state, &["same.docx"]);

    // Repeated selection of the same filename is not guarded against.
    assert_eq!(state.view().pending.len(), 2);
}

#[test]
fn process_enabled_iff_pending_nonempty() {
    init_logging();
    let state = AppState::new();
    assert!(!state.view().process_enabled);

    let state = pick(state, &["a.docx", "b.docx"]);
    assert!(state.view().process_enabled);

    let (state, _effects) = update(state, Msg::FileRemoved { index: 1 });
    assert!(state.view().process_enabled);

    let (state, _effects) = update(state, Msg::FileRemoved { index: 0 });
    assert!(!state.view().process_enabled);
}

#[test]
fn remove_out_of_range_is_ignored() {
    init_logging();
    let state = pick(AppState::new(), &["a.docx"]);
    let (state, effects) = update(state, Msg::FileRemoved { index: 5 });

    assert_eq!(state.view().pending.len(), 1);
    assert!(effects.is_empty());
}

#[test]
fn process_click_with_empty_pending_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::ProcessClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().phase, scriptorium_core::Phase::Idle);
}

#[test]
fn sizes_are_rendered_human_readable() {
    init_logging();
    let (state, _effects) = update(
        AppState::new(),
        Msg::FilesPicked(vec![candidate("big.docx", 2_097_152)]),
    );
    assert_eq!(state.view().pending[0].size, "2.0 MB");
}
