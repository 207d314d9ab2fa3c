//! Property-based tests for undo/redo over arbitrary edit sequences.

use core_grid::schema::ID_COL;
use core_model::{EditError, Grid, TableKind, TableModel};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize),
    Delete(usize),
    Set(usize, usize, String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::Insert),
        (0usize..8).prop_map(Op::Delete),
        (0usize..8, 0usize..4, "[A-Za-z0-9_-]{0,6}").prop_map(|(r, c, v)| Op::Set(r, c, v)),
    ]
}

fn type_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("TC".to_string()),
        Just("UCB".to_string()),
        Just("END".to_string()),
    ]
}

fn identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "TC-[A-Z]{1,3}_AUT[1-9][0-9]{0,2}",
        "[a-z]{1,5}",
    ]
}

/// Three-column scenario grids with arbitrary (often non-canonical) ids.
fn loaded_grid() -> impl Strategy<Value = Grid> {
    prop::collection::vec((type_tag(), identifier(), "[a-z]{0,3}"), 0..6).prop_map(|rows| {
        Grid::from_ragged(rows.into_iter().map(|(t, id, note)| vec![t, id, note]).collect())
    })
}

/// Run `op`, reducing indices into range half the time so most ops succeed.
fn run(model: &mut TableModel, op: &Op) -> Result<(), EditError> {
    let rows = model.row_count();
    let cols = model.column_count().max(1);
    match op {
        Op::Insert(at) => model.insert_row(if at % 2 == 0 { at % (rows + 1) } else { *at }),
        Op::Delete(at) => model.delete_row(if at % 2 == 0 { at % rows.max(1) } else { *at }),
        Op::Set(r, c, v) => model.set_cell(r % rows.max(1), c % cols, v.clone()),
    }
}

proptest! {
    // Undoing every successful op restores the loaded grid cell-for-cell.
    #[test]
    fn undo_everything_round_trips(
        start in prop_oneof![Just(Grid::empty()), loaded_grid()],
        ops in prop::collection::vec(op(), 0..24),
    ) {
        let mut model = TableModel::standalone(TableKind::Scenario);
        model.load_data(start.clone());
        let mut applied = 0usize;
        for op in &ops {
            if run(&mut model, op).is_ok() {
                applied += 1;
            }
        }
        prop_assert_eq!(model.undo_depth(), applied);
        for _ in 0..applied {
            prop_assert!(model.undo().is_ok());
        }
        prop_assert_eq!(model.undo(), Err(EditError::NoOp));
        prop_assert_eq!(model.grid(), &start);
    }

    // For any single op, `undo(); redo()` equals applying it once.
    #[test]
    fn redo_inverts_undo(start in loaded_grid(), op in op(), objects in any::<bool>()) {
        let kind = if objects { TableKind::Objects } else { TableKind::Scenario };
        let mut once = TableModel::standalone(kind);
        once.load_data(start.clone());
        let mut replayed = TableModel::standalone(kind);
        replayed.load_data(start);
        if run(&mut once, &op).is_ok() {
            prop_assert!(run(&mut replayed, &op).is_ok());
            replayed.undo().unwrap();
            replayed.redo().unwrap();
            prop_assert_eq!(replayed.grid(), once.grid());
            prop_assert!(!replayed.can_redo());
        }
    }

    // Any fresh mutation after an undo discards the redo history.
    #[test]
    fn fresh_edit_clears_redo(start in loaded_grid(), first in op(), second in op()) {
        let mut model = TableModel::standalone(TableKind::Scenario);
        model.load_data(start);
        prop_assume!(run(&mut model, &first).is_ok());
        model.undo().unwrap();
        prop_assert!(model.can_redo());
        if run(&mut model, &second).is_ok() {
            prop_assert_eq!(model.redo(), Err(EditError::NoOp));
        } else {
            prop_assert!(model.can_redo());
        }
    }

    // Structural changes always leave TC identifiers contiguous from 1.
    #[test]
    fn structural_ops_keep_identifiers_contiguous(
        start in loaded_grid(),
        ops in prop::collection::vec(op(), 1..16),
    ) {
        let mut model = TableModel::standalone(TableKind::Scenario);
        model.load_data(start);
        let mut structural = false;
        for op in &ops {
            let ok = run(&mut model, op).is_ok();
            structural = match op {
                Op::Insert(_) | Op::Delete(_) => structural || ok,
                // A later set may legitimately break the numbering again.
                Op::Set(..) => structural && !ok,
            };
        }
        prop_assume!(structural);
        let ids: Vec<String> = (0..model.row_count())
            .filter(|r| model.cell_value(*r, 0) == Ok("TC"))
            .map(|r| model.cell_value(r, ID_COL).unwrap().to_string())
            .collect();
        let abbr = ids
            .first()
            .and_then(|id| id.strip_prefix("TC-"))
            .and_then(|rest| rest.split('_').next())
            .unwrap_or("UM")
            .to_string();
        for (i, id) in ids.iter().enumerate() {
            prop_assert_eq!(id, &format!("TC-{abbr}_AUT{}", i + 1));
        }
    }
}
