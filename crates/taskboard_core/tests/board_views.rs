use std::rc::Rc;
use taskboard_core::{
    Board, Component, DataTransfer, DropEffect, ElementHandle, Entity, EntityStatus, EventKind,
    FormRules, HostEvent, MemoryDocument, ObservableStore, RawSubmission, RenderHost,
    DROPPABLE_CLASS, INVALID_INPUT_NOTICE, PLAIN_TEXT_KIND,
};

struct Fixture {
    document: MemoryDocument,
    store: Rc<ObservableStore>,
    board: Board,
}

fn fixture() -> Fixture {
    let document = MemoryDocument::with_board_templates();
    let host: Rc<dyn RenderHost> = Rc::new(document.clone());
    let store = Rc::new(ObservableStore::new());
    let board = Board::mount(host, Rc::clone(&store), FormRules::default()).expect("board mounts");
    Fixture {
        document,
        store,
        board,
    }
}

fn titles(fixture: &Fixture, status: EntityStatus) -> Vec<String> {
    let list = fixture
        .board
        .list(status)
        .list_element()
        .expect("list element");
    fixture
        .document
        .children(list)
        .expect("list children")
        .into_iter()
        .map(|item| {
            let heading = fixture.document.query(item, "h2").expect("item heading");
            fixture.document.text(heading).expect("heading text")
        })
        .collect()
}

fn item_element(fixture: &Fixture, entity: &Entity) -> ElementHandle {
    fixture
        .document
        .element_by_id(&entity.id.to_string())
        .expect("item element")
}

/// Simulates drag-start on the item, then drag-over and drop on the target list.
fn drag(fixture: &Fixture, entity: &Entity, target: EntityStatus) -> HostEvent {
    let item = item_element(fixture, entity);
    let mut start = HostEvent::with_transfer(EventKind::DragStart, DataTransfer::new());
    fixture.document.dispatch(item, &mut start).expect("drag start");
    let transfer = start.transfer.expect("transfer populated");

    let list = fixture.board.list(target).list_element().expect("target list");
    let mut over = HostEvent::with_transfer(EventKind::DragOver, transfer.clone());
    fixture.document.dispatch(list, &mut over).expect("drag over");

    let mut dropped = HostEvent::with_transfer(EventKind::Drop, transfer);
    fixture.document.dispatch(list, &mut dropped).expect("drop");
    over
}

fn submit(fixture: &Fixture, title: &str, description: &str, people: &str) -> HostEvent {
    fixture
        .board
        .form
        .fill(&RawSubmission {
            title: title.to_string(),
            description: description.to_string(),
            assignee_count: people.to_string(),
        })
        .expect("fill form");
    let form = fixture.board.form.mount().element();
    let mut event = HostEvent::new(EventKind::Submit);
    fixture.document.dispatch(form, &mut event).expect("submit");
    event
}

#[test]
fn board_mounts_form_first_then_lists_in_order() {
    let fixture = fixture();
    let app = fixture.document.element_by_id("app").expect("app host");
    let ids: Vec<Option<String>> = fixture
        .document
        .children(app)
        .expect("app children")
        .into_iter()
        .map(|child| fixture.document.element_id(child).expect("element id"))
        .collect();
    assert_eq!(
        ids,
        vec![
            Some("user-input".to_string()),
            Some("active-entities".to_string()),
            Some("finished-entities".to_string()),
        ]
    );

    let heading = fixture
        .document
        .query(fixture.board.finished.mount().element(), "h2")
        .expect("list heading");
    assert_eq!(
        fixture.document.text(heading).expect("heading text"),
        "FINISHED PROJECTS"
    );
    assert!(fixture
        .document
        .element_by_id("active-entities-list")
        .is_ok());
}

#[test]
fn added_entity_moves_from_active_to_finished_on_drop() {
    let fixture = fixture();
    let id = fixture
        .store
        .add("Build bridge", "A long enough description", 3);

    assert_eq!(titles(&fixture, EntityStatus::Active), vec!["Build bridge"]);
    assert!(titles(&fixture, EntityStatus::Finished).is_empty());

    let entity = fixture.store.get(id).expect("entity stored");
    let over = drag(&fixture, &entity, EntityStatus::Finished);
    assert!(over.default_prevented(), "drag-over must permit the drop");

    assert!(titles(&fixture, EntityStatus::Active).is_empty());
    assert_eq!(titles(&fixture, EntityStatus::Finished), vec!["Build bridge"]);
    assert_eq!(
        fixture.store.get(id).expect("entity stored").status,
        EntityStatus::Finished
    );

    let finished = fixture
        .board
        .finished
        .list_element()
        .expect("finished list");
    assert!(!fixture
        .document
        .has_class(finished, DROPPABLE_CLASS)
        .expect("class lookup"));
}

#[test]
fn repeated_moves_keep_document_size_bounded() {
    let fixture = fixture();
    let ids: Vec<_> = (0..10)
        .map(|n| fixture.store.add(format!("entity {n}"), "some description", 2))
        .collect();
    let settled = fixture.document.live_nodes();

    for round in 0..100 {
        let target = if round % 2 == 0 {
            EntityStatus::Finished
        } else {
            EntityStatus::Active
        };
        fixture.store.move_status(ids[0], target);
    }

    assert_eq!(fixture.document.live_nodes(), settled);
    assert_eq!(titles(&fixture, EntityStatus::Active).len(), 10);
}

#[test]
fn drag_start_sets_plain_text_id_and_move_effect() {
    let fixture = fixture();
    let id = fixture.store.add("Payload", "payload description", 1);
    let entity = fixture.store.get(id).expect("entity stored");

    let mut start = HostEvent::new(EventKind::DragStart);
    fixture
        .document
        .dispatch(item_element(&fixture, &entity), &mut start)
        .expect("drag start");

    let transfer = start.transfer.expect("transfer created");
    assert_eq!(transfer.first_type(), Some(PLAIN_TEXT_KIND));
    assert_eq!(transfer.get_data(PLAIN_TEXT_KIND), Some(id.to_string().as_str()));
    assert_eq!(transfer.effect_allowed, DropEffect::Move);
}

#[test]
fn drag_over_toggles_droppable_only_for_plain_text() {
    let fixture = fixture();
    let list = fixture.board.active.list_element().expect("active list");

    let mut foreign = DataTransfer::new();
    foreign.set_data("text/uri-list", "https://example.invalid");
    let mut over = HostEvent::with_transfer(EventKind::DragOver, foreign);
    fixture.document.dispatch(list, &mut over).expect("drag over");
    assert!(!over.default_prevented());
    assert!(!fixture
        .document
        .has_class(list, DROPPABLE_CLASS)
        .expect("class lookup"));

    let mut plain = DataTransfer::new();
    plain.set_data(PLAIN_TEXT_KIND, "anything");
    let mut over = HostEvent::with_transfer(EventKind::DragOver, plain);
    fixture.document.dispatch(list, &mut over).expect("drag over");
    assert!(over.default_prevented());
    assert!(fixture
        .document
        .has_class(list, DROPPABLE_CLASS)
        .expect("class lookup"));

    let mut leave = HostEvent::new(EventKind::DragLeave);
    fixture.document.dispatch(list, &mut leave).expect("drag leave");
    assert!(!fixture
        .document
        .has_class(list, DROPPABLE_CLASS)
        .expect("class lookup"));
}

#[test]
fn drop_onto_own_list_or_with_bad_payload_changes_nothing() {
    let fixture = fixture();
    let id = fixture.store.add("Stay", "stays active", 2);
    let entity = fixture.store.get(id).expect("entity stored");
    let before = fixture.store.snapshot();

    drag(&fixture, &entity, EntityStatus::Active);
    assert_eq!(fixture.store.snapshot(), before);

    let list = fixture.board.finished.list_element().expect("finished list");
    let mut garbage = DataTransfer::new();
    garbage.set_data(PLAIN_TEXT_KIND, "not-an-id");
    let mut dropped = HostEvent::with_transfer(EventKind::Drop, garbage);
    fixture.document.dispatch(list, &mut dropped).expect("drop");

    assert_eq!(fixture.store.snapshot(), before);
    assert_eq!(titles(&fixture, EntityStatus::Active), vec!["Stay"]);
}

#[test]
fn lists_show_exactly_their_status_in_insertion_order() {
    let fixture = fixture();
    let ids: Vec<_> = ["one", "two", "three", "four"]
        .iter()
        .map(|title| fixture.store.add(*title, "some description", 2))
        .collect();

    fixture.store.move_status(ids[2], EntityStatus::Finished);
    fixture.store.move_status(ids[0], EntityStatus::Finished);
    fixture.store.move_status(ids[3], EntityStatus::Finished);
    fixture.store.move_status(ids[3], EntityStatus::Active);

    assert_eq!(titles(&fixture, EntityStatus::Active), vec!["two", "four"]);
    assert_eq!(titles(&fixture, EntityStatus::Finished), vec!["one", "three"]);
    assert_eq!(fixture.board.active.item_count(), 2);

    let finished: Vec<_> = fixture
        .board
        .finished
        .filtered()
        .iter()
        .map(|entity| entity.id)
        .collect();
    assert_eq!(finished, vec![ids[0], ids[2]]);
}

#[test]
fn item_renders_assignee_label() {
    let fixture = fixture();
    let single = fixture.store.add("Solo", "solo description", 1);
    let team = fixture.store.add("Team", "team description", 4);

    for (id, expected) in [(single, "1 person assigned"), (team, "4 persons assigned")] {
        let entity = fixture.store.get(id).expect("entity stored");
        let label = fixture
            .document
            .query(item_element(&fixture, &entity), "h3")
            .expect("label element");
        assert_eq!(fixture.document.text(label).expect("label text"), expected);
    }
}

#[test]
fn valid_submit_creates_entity_and_clears_inputs() {
    let fixture = fixture();

    let event = submit(&fixture, "Build bridge", "A long enough description", "3");

    assert!(event.default_prevented());
    assert!(fixture.document.take_notices().is_empty());
    let snapshot = fixture.store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "Build bridge");
    assert_eq!(snapshot[0].assignee_count, 3);
    assert_eq!(titles(&fixture, EntityStatus::Active), vec!["Build bridge"]);

    let cleared = fixture.board.form.raw_values().expect("raw values");
    assert_eq!(cleared, RawSubmission::default());
}

#[test]
fn invalid_submit_raises_notice_clears_inputs_and_skips_store() {
    let fixture = fixture();

    let event = submit(&fixture, "Build bridge", "A long enough description", "9");

    assert!(event.default_prevented());
    assert_eq!(fixture.document.take_notices(), vec![INVALID_INPUT_NOTICE]);
    assert!(fixture.store.is_empty());
    assert_eq!(
        fixture.board.form.raw_values().expect("raw values"),
        RawSubmission::default()
    );
}

#[test]
fn board_mounted_after_entities_exist_paints_current_state() {
    let document = MemoryDocument::with_board_templates();
    let store = Rc::new(ObservableStore::new());
    let early = store.add("Early", "added before mount", 2);
    store.move_status(early, EntityStatus::Finished);
    store.add("Later", "still active", 1);

    let host: Rc<dyn RenderHost> = Rc::new(document.clone());
    let board = Board::mount(host, store, FormRules::default()).expect("board mounts");

    assert_eq!(board.active.item_count(), 1);
    assert_eq!(board.active.filtered()[0].title, "Later");
    assert_eq!(board.finished.item_count(), 1);
    assert_eq!(board.finished.filtered()[0].title, "Early");
    assert!(document.element_by_id(&early.to_string()).is_ok());
}
