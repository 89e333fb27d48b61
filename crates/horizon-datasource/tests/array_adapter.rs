//! Integration tests for `ArrayAdapter` driving a bound view.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::{MirrorView, init_tracing};
use horizon_datasource::DataSourceError;
use horizon_datasource::config::AdapterConfig;
use horizon_datasource::model::{
    ArrayAdapter, DataSource, FallbackDataSource, Location, ProtocolCall, ProtocolValue,
    RegistrationKind, RowAnimation, SupplementaryKind, UpdateOp, default_identifier,
};
use parking_lot::Mutex;

type Adapter = ArrayAdapter<String, String, Vec<String>>;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn bound(adapter: Adapter) -> (Arc<Adapter>, Arc<MirrorView>) {
    init_tracing();
    let adapter = Arc::new(adapter);
    let view = MirrorView::watching(&adapter);
    adapter.bind_view(&view);
    (adapter, view)
}

#[test]
fn move_to_end_of_section() {
    let (adapter, view) = bound(Adapter::new(strings(&["A", "B", "C"])));

    adapter
        .move_item(Location::row(0), Location::row(2))
        .unwrap();

    assert_eq!(adapter.all_items(), strings(&["B", "C", "A"]));
    assert_eq!(
        view.batches(),
        vec![vec![UpdateOp::MoveRow {
            from: Location::row(0),
            to: Location::row(2),
        }]]
    );
    assert!(view.mismatches().is_empty());
}

#[test]
fn append_to_second_section() {
    let (adapter, view) = bound(
        Adapter::with_sections(
            strings(&["S0", "S1"]),
            vec![strings(&["x", "y"]), strings(&["z"])],
        )
        .unwrap(),
    );

    adapter.append(strings(&["w"]), 1).unwrap();

    assert_eq!(adapter.items_in_section(1).unwrap(), strings(&["z", "w"]));
    assert_eq!(
        view.last_batch(),
        Some(vec![UpdateOp::InsertRows(vec![Location::new(1, 1)])])
    );
    assert_eq!(view.counts(), vec![2, 2]);
}

#[test]
fn insert_at_unsorted_offsets() {
    let (adapter, view) = bound(Adapter::new(strings(&["a", "b", "c"])));

    adapter
        .insert(strings(&["late", "early", "middle"]), &[3, 0, 1], 0)
        .unwrap();

    assert_eq!(
        adapter.all_items(),
        strings(&["early", "a", "middle", "b", "c", "late"])
    );
    assert_eq!(
        view.last_batch(),
        Some(vec![UpdateOp::InsertRows(vec![
            Location::row(0),
            Location::row(2),
            Location::row(5),
        ])])
    );
    assert!(view.mismatches().is_empty());
}

#[test]
fn insert_length_mismatch_changes_nothing() {
    let (adapter, view) = bound(Adapter::new(strings(&["a"])));

    let err = adapter
        .insert(strings(&["x"]), &[0, 1], 0)
        .unwrap_err();

    assert!(matches!(err, DataSourceError::CountMismatch { .. }));
    assert_eq!(adapter.all_items(), strings(&["a"]));
    assert!(view.batches().is_empty());
}

#[test]
fn out_of_range_mutations_are_rejected() {
    let (adapter, view) = bound(Adapter::new(strings(&["a", "b"])));

    assert!(adapter.remove_at(Location::row(2)).unwrap_err().is_out_of_range());
    assert!(adapter.remove_range(1..3, 0).unwrap_err().is_out_of_range());
    assert!(
        adapter
            .remove_indexes(&BTreeSet::from([0, 5]), 0)
            .unwrap_err()
            .is_out_of_range()
    );
    assert!(
        adapter
            .replace_at(Location::new(1, 0), "x".into())
            .unwrap_err()
            .is_out_of_range()
    );
    assert!(
        adapter
            .move_item(Location::row(0), Location::row(2))
            .unwrap_err()
            .is_out_of_range()
    );
    assert!(adapter.append(strings(&["x"]), 1).unwrap_err().is_out_of_range());

    assert_eq!(adapter.all_items(), strings(&["a", "b"]));
    assert!(view.batches().is_empty());
}

#[test]
fn mixed_mutations_keep_view_consistent() {
    let (adapter, view) = bound(
        Adapter::with_sections(
            strings(&["Inbox", "Archive"]),
            vec![strings(&["m1", "m2", "m3"]), strings(&["old"])],
        )
        .unwrap(),
    );

    adapter.remove_indexes(&BTreeSet::from([0, 2]), 0).unwrap();
    adapter
        .move_item(Location::new(1, 0), Location::new(0, 0))
        .unwrap();
    adapter.replace_at(Location::new(0, 1), "m2*".into()).unwrap();
    adapter.append_section("Spam".into(), strings(&["s1", "s2"])).unwrap();
    adapter.remove_section(1).unwrap();
    adapter.insert(strings(&["s0"]), &[0], 1).unwrap();
    adapter.remove_last_section().unwrap();

    assert_eq!(adapter.section_count(), 1);
    assert_eq!(adapter.all_items(), strings(&["old", "m2*"]));
    assert_eq!(view.counts(), vec![2]);
    assert!(view.mismatches().is_empty(), "{:?}", view.mismatches());
    assert_eq!(view.batches().len(), 7);
}

#[test]
fn remove_all_keeps_single_section_when_flat() {
    let (adapter, view) = bound(Adapter::new(strings(&["a", "b"])));

    adapter.remove_all().unwrap();

    assert_eq!(adapter.len(), 0);
    assert_eq!(adapter.section_count(), 1);
    assert_eq!(view.last_batch(), Some(vec![UpdateOp::ReloadAll]));
    assert_eq!(view.counts(), vec![0]);
}

#[test]
fn replace_items_and_sections() {
    let (adapter, view) = bound(Adapter::new(strings(&["a"])));

    adapter
        .replace_sections(strings(&["One", "Two"]), vec![strings(&["x"]), vec![]])
        .unwrap();
    assert!(adapter.is_sectioned());
    assert_eq!(view.counts(), vec![1, 0]);

    let err = adapter
        .replace_sections(strings(&["One"]), vec![])
        .unwrap_err();
    assert_eq!(err, DataSourceError::count_mismatch(1, 0));

    adapter.replace_items(strings(&["p", "q"])).unwrap();
    assert!(!adapter.is_sectioned());
    assert_eq!(view.counts(), vec![2]);
    assert_eq!(
        adapter.append_section("Nope".into(), vec![]).unwrap_err(),
        DataSourceError::NotSectioned {
            operation: "append_section"
        }
    );
}

#[test]
fn location_lookup_round_trip() {
    let adapter = Adapter::with_sections(
        strings(&["A", "B"]),
        vec![strings(&["a0", "a1"]), strings(&["b0"])],
    )
    .unwrap();

    for item in adapter.all_items() {
        let location = adapter.location_of(&item).unwrap();
        assert_eq!(adapter.item_at(location), Some(item));
    }
    assert_eq!(adapter.location_of(&"missing".to_string()), None);
}

#[test]
fn batches_carry_configured_animation() {
    let config = AdapterConfig::from_toml_str("row_animation = \"bottom\"").unwrap();
    let (adapter, view) = bound(Adapter::new(strings(&["a"])).with_config(&config));

    adapter.append(strings(&["b"]), 0).unwrap();
    adapter.set_row_animation(RowAnimation::None);
    adapter.remove_at(Location::row(0)).unwrap();

    assert_eq!(
        view.animations(),
        vec![RowAnimation::Bottom, RowAnimation::None]
    );
}

#[test]
fn unbound_adapter_still_signals() {
    let adapter = Adapter::new(strings(&["a"]));
    let committed = Arc::new(Mutex::new(0usize));
    let committed_clone = committed.clone();
    adapter.signals().updates_committed.connect(move |_| {
        *committed_clone.lock() += 1;
    });

    adapter.append(strings(&["b"]), 0).unwrap();
    {
        let view = MirrorView::watching(&Arc::new(Adapter::new(vec![])));
        adapter.bind_view(&view);
        assert!(adapter.is_view_bound());
    }
    assert!(!adapter.is_view_bound());
    adapter.append(strings(&["c"]), 0).unwrap();

    assert_eq!(*committed.lock(), 2);
    assert_eq!(adapter.len(), 3);
}

struct TitleCell;
struct DetailCell;
struct SectionHeader;

#[test]
fn cells_by_type_name_with_resolver() {
    let adapter = Adapter::with_sections(
        strings(&["Titles", "Details"]),
        vec![strings(&["Intro"]), strings(&["line one", "line two"])],
    )
    .unwrap();

    adapter
        .register_cell_type::<TitleCell, _, _>(Vec::new, |view: &mut Vec<String>, item: &String, _| {
            view.push(item.to_uppercase());
        })
        .unwrap();
    adapter
        .register_cell_type::<DetailCell, _, _>(Vec::new, |view: &mut Vec<String>, item: &String, location| {
            view.push(format!("{}. {item}", location.item() + 1));
        })
        .unwrap();
    adapter.set_cell_identifier_resolver(|_: Option<&String>, location: Location| {
        if location.section() == 0 {
            default_identifier::<TitleCell>()
        } else {
            default_identifier::<DetailCell>()
        }
    });

    assert_eq!(
        adapter.registered_identifiers(RegistrationKind::Cell),
        strings(&["DetailCell", "TitleCell"])
    );

    let (identifier, view) = adapter.create_cell(Location::new(0, 0)).unwrap();
    assert_eq!(identifier, "TitleCell");
    assert_eq!(view, strings(&["INTRO"]));

    let (identifier, view) = adapter.create_cell(Location::new(1, 1)).unwrap();
    assert_eq!(identifier, "DetailCell");
    assert_eq!(view, strings(&["2. line two"]));

    let configure = adapter.cell_configuration("DetailCell").unwrap();
    let mut reused = Vec::new();
    configure(&mut reused, &"x".to_string(), Location::new(1, 0));
    assert_eq!(reused, strings(&["1. x"]));
}

#[test]
fn identifier_kinds_do_not_mix() {
    let adapter = Adapter::new(strings(&["a"]));
    adapter
        .register_cell("Shared", Vec::new, |_: &mut Vec<String>, _: &String, _| {})
        .unwrap();

    let err = adapter
        .register_supplementary_view(
            SupplementaryKind::Header,
            "Shared",
            Vec::new,
            |_: &mut Vec<String>, _: SupplementaryKind, _: Location| {},
        )
        .unwrap_err();

    assert_eq!(
        err,
        DataSourceError::DuplicateKindConflict {
            identifier: "Shared".into(),
            existing: "cell",
            requested: "supplementary view",
        }
    );
}

#[test]
fn headers_and_footers() {
    let adapter = Adapter::with_sections(
        strings(&["One", "Two"]),
        vec![strings(&["a"]), strings(&["b"])],
    )
    .unwrap();
    for kind in [SupplementaryKind::Header, SupplementaryKind::Footer] {
        adapter
            .register_supplementary_view_type::<SectionHeader, _, _>(
                kind,
                Vec::new,
                |view: &mut Vec<String>, kind: SupplementaryKind, location: Location| {
                    view.push(format!("{} {}", kind.name(), location.section()));
                },
            )
            .unwrap();
    }

    let (identifier, view) = adapter
        .create_supplementary_view(SupplementaryKind::Footer, Location::new(1, 0))
        .unwrap();
    assert_eq!(identifier, "SectionHeader");
    assert_eq!(view, strings(&["footer 1"]));

    let mut reused = Vec::new();
    adapter
        .configure_supplementary_view(&mut reused, SupplementaryKind::Header, Location::new(0, 0))
        .unwrap();
    assert_eq!(reused, strings(&["header 0"]));

    adapter.set_supplementary_identifier_resolver(|_: SupplementaryKind, _: Location| {
        "Unregistered".to_string()
    });
    assert_eq!(
        adapter
            .create_supplementary_view(SupplementaryKind::Header, Location::new(0, 0))
            .unwrap_err(),
        DataSourceError::unknown_identifier("Unregistered")
    );
    adapter.clear_supplementary_identifier_resolver();
    assert!(
        adapter
            .supplementary_identifier(SupplementaryKind::Header, Location::new(0, 0))
            .is_ok()
    );
}

#[derive(Default)]
struct Controller {
    selected: Mutex<Vec<Location>>,
}

impl FallbackDataSource for Controller {
    fn handle(&self, call: &ProtocolCall) -> Option<ProtocolValue> {
        match call {
            ProtocolCall::DidSelectRow(location) => {
                self.selected.lock().push(*location);
                Some(ProtocolValue::Unit)
            }
            ProtocolCall::HeightForSupplementary { .. } => Some(ProtocolValue::Length(28.0)),
            ProtocolCall::CanMoveRow(location) => Some(ProtocolValue::Bool(location.item() > 0)),
            _ => None,
        }
    }
}

#[test]
fn fallback_receives_unowned_calls() {
    let adapter = Adapter::new(strings(&["a", "b"]));
    let controller = Arc::new(Controller::default());
    adapter.set_fallback(&controller);

    assert_eq!(
        adapter.forward(ProtocolCall::DidSelectRow(Location::row(1))),
        Ok(ProtocolValue::Unit)
    );
    assert_eq!(
        adapter.forward(ProtocolCall::HeightForSupplementary {
            kind: SupplementaryKind::Header,
            section: 0,
        }),
        Ok(ProtocolValue::Length(28.0))
    );
    assert_eq!(
        adapter.forward(ProtocolCall::CanMoveRow(Location::row(0))),
        Ok(ProtocolValue::Bool(false))
    );
    assert_eq!(
        adapter.forward(ProtocolCall::CommitDelete(Location::row(0))),
        Err(DataSourceError::UnhandledProtocolMethod {
            method: "commit_delete"
        })
    );
    assert_eq!(*controller.selected.lock(), vec![Location::row(1)]);

    adapter.clear_fallback();
    assert!(
        adapter
            .forward(ProtocolCall::DidSelectRow(Location::row(0)))
            .is_err()
    );
}
