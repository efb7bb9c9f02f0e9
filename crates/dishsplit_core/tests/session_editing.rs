use dishsplit_core::{DishError, RosterError, Session, SessionError};
use std::collections::HashSet;

fn session_with(people: &[&str]) -> Session {
    let mut session = Session::new();
    for name in people {
        session.add_or_update_person(name, None).unwrap();
    }
    session
}

fn id_of(session: &Session, name: &str) -> dishsplit_core::PersonId {
    session.roster().find_by_name(name).unwrap().id
}

#[test]
fn roster_stays_unique_across_adds_and_edits() {
    let mut session = Session::new();
    let inputs = [
        ("Asha", None),
        ("Ben", None),
        (" Asha", None),
        ("Chen", None),
        ("Ben", Some(2)),
        ("Dev", Some(0)),
        ("Asha", Some(1)),
        ("Chen ", Some(2)),
    ];
    for (name, edit_index) in inputs {
        let _ = session.add_or_update_person(name, edit_index);
    }

    let names = session.roster().names();
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
    assert_eq!(names, vec!["Dev", "Asha", "Chen"]);
}

#[test]
fn editing_person_by_index_reads_back_new_value() {
    let mut session = session_with(&["A", "B", "C"]);
    session.add_or_update_person("Bea", Some(1)).unwrap();

    assert_eq!(session.roster().get(1).unwrap().name, "Bea");
    assert_eq!(session.roster().names(), vec!["A", "Bea", "C"]);
}

#[test]
fn rejected_person_edit_leaves_roster_unchanged() {
    let mut session = session_with(&["A", "B"]);
    let before = session.clone();

    assert_eq!(
        session.add_or_update_person("  ", None).unwrap_err(),
        SessionError::Roster(RosterError::EmptyName)
    );
    assert_eq!(
        session.add_or_update_person("A", Some(1)).unwrap_err(),
        SessionError::Roster(RosterError::DuplicateName("A".to_string()))
    );
    assert_eq!(session, before);
}

#[test]
fn renaming_person_propagates_to_dishes() {
    let mut session = session_with(&["A", "B"]);
    let a = id_of(&session, "A");
    let b = id_of(&session, "B");
    session.add_or_update_dish("Pizza", "100", &[a, b], None).unwrap();

    session.add_or_update_person("Alex", Some(0)).unwrap();

    let snapshot = session.to_snapshot();
    assert_eq!(snapshot.dishes[0].shared_by, vec!["Alex", "B"]);
}

#[test]
fn deleting_person_cascades_out_of_shared_dishes() {
    let mut session = session_with(&["A", "B", "C"]);
    let a = id_of(&session, "A");
    let b = id_of(&session, "B");
    let c = id_of(&session, "C");
    session.add_or_update_dish("Pizza", "90", &[a, b, c], None).unwrap();
    session.toggle_selection(b).unwrap();

    let removed = session.delete_person(1).unwrap();
    assert_eq!(removed.name, "B");
    assert_eq!(session.roster().names(), vec!["A", "C"]);
    assert_eq!(session.ledger().get(0).unwrap().shared_by, vec![a, c]);
    assert!(session.selection().is_empty());
}

#[test]
fn deleting_sole_sharer_is_rejected() {
    let mut session = session_with(&["A", "B"]);
    let a = id_of(&session, "A");
    let b = id_of(&session, "B");
    session.add_or_update_dish("Tea", "30", &[a], None).unwrap();
    session.add_or_update_dish("Naan", "40", &[a, b], None).unwrap();
    let before = session.clone();

    let err = session.delete_person(0).unwrap_err();
    assert_eq!(
        err,
        SessionError::PersonInUse {
            name: "A".to_string(),
            dishes: vec!["Tea".to_string()],
        }
    );
    assert_eq!(session, before);

    session.delete_dish(0).unwrap();
    session.delete_person(0).unwrap();
    assert_eq!(session.ledger().get(0).unwrap().shared_by, vec![b]);
}

#[test]
fn zero_price_dish_is_rejected_and_ledger_unchanged() {
    let mut session = session_with(&["A"]);
    let a = id_of(&session, "A");

    let err = session.add_or_update_dish("Cake", "0", &[a], None).unwrap_err();
    assert!(matches!(err, SessionError::Dish(DishError::InvalidPrice(_))));
    assert!(session.ledger().is_empty());
}

#[test]
fn dish_with_unknown_sharer_is_rejected() {
    let mut session = session_with(&["A"]);
    let stranger = uuid::Uuid::new_v4();

    let err = session
        .add_or_update_dish("Soup", "20", &[stranger], None)
        .unwrap_err();
    assert_eq!(err, SessionError::Dish(DishError::UnknownSharer(stranger)));
}

#[test]
fn editing_and_deleting_dishes_by_index() {
    let mut session = session_with(&["A", "B"]);
    let a = id_of(&session, "A");
    let b = id_of(&session, "B");
    session.add_or_update_dish("Tea", "30", &[a], None).unwrap();
    session.add_or_update_dish("Naan", "40", &[a, b], None).unwrap();
    session.add_or_update_dish("Dal", "60", &[b], None).unwrap();

    session.add_or_update_dish(" Masala Tea ", "35.5", &[a, b], Some(0)).unwrap();
    let edited = session.ledger().get(0).unwrap();
    assert_eq!(edited.name, "Masala Tea");
    assert_eq!(edited.price, 35.5);
    assert_eq!(edited.shared_by, vec![a, b]);

    let removed = session.delete_dish(1).unwrap();
    assert_eq!(removed.name, "Naan");
    let names: Vec<_> = session.ledger().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Masala Tea", "Dal"]);

    assert!(matches!(
        session.delete_dish(5).unwrap_err(),
        SessionError::Dish(DishError::IndexOutOfRange { index: 5, len: 2 })
    ));
}

#[test]
fn commit_dish_uses_and_clears_selection() {
    let mut session = session_with(&["A", "B"]);
    let a = id_of(&session, "A");
    let b = id_of(&session, "B");

    assert!(session.toggle_selection(a).unwrap());
    assert!(session.toggle_selection(b).unwrap());
    assert!(!session.toggle_selection(a).unwrap());
    assert_eq!(session.selection(), &[b]);

    let err = session.commit_dish("Chaat", "", None).unwrap_err();
    assert_eq!(err, SessionError::Dish(DishError::MissingField("price")));
    assert_eq!(session.selection(), &[b]);

    session.commit_dish("Chaat", "25", None).unwrap();
    assert!(session.selection().is_empty());
    assert_eq!(session.ledger().get(0).unwrap().shared_by, vec![b]);
}

#[test]
fn begin_dish_edit_loads_sharers_into_selection() {
    let mut session = session_with(&["A", "B"]);
    let a = id_of(&session, "A");
    let b = id_of(&session, "B");
    session.add_or_update_dish("Naan", "40", &[b, a], None).unwrap();

    let dish = session.begin_dish_edit(0).unwrap();
    assert_eq!(dish.name, "Naan");
    assert_eq!(session.selection(), &[b, a]);

    session.toggle_selection(a).unwrap();
    session.commit_dish("Naan", "40", Some(0)).unwrap();
    assert_eq!(session.ledger().get(0).unwrap().shared_by, vec![b]);
    assert_eq!(session.ledger().len(), 1);
}

#[test]
fn toggling_unknown_person_fails() {
    let mut session = session_with(&["A"]);
    let stranger = uuid::Uuid::new_v4();
    assert_eq!(
        session.toggle_selection(stranger).unwrap_err(),
        SessionError::UnknownPerson(stranger)
    );
}

#[test]
fn tax_input_is_parsed_before_use() {
    let mut session = Session::new();
    assert_eq!(session.set_tax("").unwrap(), 0.0);
    assert_eq!(session.set_tax("20").unwrap(), 20.0);

    assert!(matches!(
        session.set_tax("-1"),
        Err(SessionError::InvalidTax(_))
    ));
    assert_eq!(session.tax(), 20.0);
}
