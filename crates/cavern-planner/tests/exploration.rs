//! Exploration driven through the in-memory host.

use cavern_core::{Cavern, CavernError, ExplorationState, NodeId, Tile};
use cavern_planner::{ExplorationSession, Explorer, StepOutcome};
use cavern_sim::ExplorationSim;

/// Corridor 1-2-3-4-5 along a row.
fn corridor() -> Cavern {
    let mut builder = Cavern::builder();
    for id in 1..=5u64 {
        builder = builder.node(id, Tile::new(0, id as i64));
    }
    for id in 1..5u64 {
        builder = builder.edge(id, id + 1, 1);
    }
    builder.build().unwrap()
}

/// 5x5 grid with every horizontal edge in row 0 and every vertical edge,
/// plus a few rungs so the graph has cycles.
fn comb() -> Cavern {
    let id = |row: u64, column: u64| row * 5 + column + 1;
    let mut builder = Cavern::builder();
    for row in 0..5u64 {
        for column in 0..5u64 {
            builder = builder.node(id(row, column), Tile::new(row as i64, column as i64));
        }
    }
    for column in 0..4 {
        builder = builder.edge(id(0, column), id(0, column + 1), 1);
    }
    for row in 0..4 {
        for column in 0..5 {
            builder = builder.edge(id(row, column), id(row + 1, column), 1);
        }
    }
    builder = builder
        .edge(id(2, 1), id(2, 2), 1)
        .edge(id(4, 3), id(4, 4), 1)
        .edge(id(3, 0), id(3, 1), 1);
    builder.build().unwrap()
}

fn run(sim: &mut ExplorationSim) -> Vec<StepOutcome> {
    let explorer = Explorer::new();
    let mut session = ExplorationSession::new();
    let mut outcomes = Vec::new();
    loop {
        let outcome = explorer.step(&mut session, sim).unwrap();
        outcomes.push(outcome);
        if outcome == StepOutcome::Arrived {
            return outcomes;
        }
    }
}

#[test]
fn test_corridor_takes_four_moves_without_forks() {
    let mut sim = ExplorationSim::new(corridor(), NodeId(1), NodeId(5)).unwrap();
    let explorer = Explorer::new();
    let mut session = ExplorationSession::new();

    while explorer.step(&mut session, &mut sim).unwrap() != StepOutcome::Arrived {
        assert!(session.forks().is_empty());
    }

    assert_eq!(sim.steps(), 4);
    assert_eq!(
        sim.history(),
        &[NodeId(1), NodeId(2), NodeId(3), NodeId(4), NodeId(5)]
    );
    assert_eq!(session.moves(), 4);
    assert!(session.forks().is_empty());
}

#[test]
fn test_nearest_branch_first_then_backtrack() {
    // A=1 forks to B=2 (distance 3) and C=3 (distance 1). C is a dead end;
    // the orb T=4 hangs off B.
    let cavern = Cavern::builder()
        .node(1, Tile::new(2, 2))
        .node(2, Tile::new(0, 3))
        .node(3, Tile::new(0, 1))
        .node(4, Tile::new(0, 0))
        .edge(1, 2, 1)
        .edge(1, 3, 1)
        .edge(2, 4, 1)
        .build()
        .unwrap();
    let mut sim = ExplorationSim::new(cavern, NodeId(1), NodeId(4)).unwrap();

    let outcomes = run(&mut sim);

    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Advanced {
                from: NodeId(1),
                to: NodeId(3),
                fork: true
            },
            StepOutcome::Backtracked {
                fork: NodeId(1),
                replayed: 1
            },
            StepOutcome::Advanced {
                from: NodeId(1),
                to: NodeId(2),
                fork: false
            },
            StepOutcome::Advanced {
                from: NodeId(2),
                to: NodeId(4),
                fork: false
            },
            StepOutcome::Arrived,
        ]
    );
    assert_eq!(
        sim.history(),
        &[NodeId(1), NodeId(3), NodeId(1), NodeId(2), NodeId(4)]
    );
}

#[test]
fn test_every_target_in_comb_is_found() {
    for target in 1..=25u64 {
        let mut sim = ExplorationSim::new(comb(), NodeId(1), NodeId(target)).unwrap();
        let report = Explorer::new().explore(&mut sim).unwrap();

        assert_eq!(sim.current_location(), NodeId(target));
        assert_eq!(sim.distance_to_target(), 0);
        assert_eq!(report.target, NodeId(target));
        assert_eq!(report.moves, sim.steps());
    }
}

#[test]
fn test_bookkeeping_invariants_hold_every_step() {
    let mut sim = ExplorationSim::new(comb(), NodeId(5), NodeId(21)).unwrap();
    let explorer = Explorer::new();
    let mut session = ExplorationSession::new();
    let mut last_visited = 0;

    loop {
        let path_before = session.path().len();
        let outcome = explorer.step(&mut session, &mut sim).unwrap();

        assert!(session.visited().len() >= last_visited);
        last_visited = session.visited().len();

        match outcome {
            StepOutcome::Arrived => break,
            StepOutcome::Advanced { to, .. } => {
                assert_eq!(sim.current_location(), to);
                assert_eq!(session.path().len(), path_before + 1);
                assert!(!session.visited().contains(&to));
            }
            StepOutcome::Backtracked { fork, replayed } => {
                assert_eq!(sim.current_location(), fork);
                assert_eq!(session.path().len(), path_before - replayed);
            }
        }
    }

    assert_eq!(sim.current_location(), NodeId(21));
}

#[test]
fn test_unreachable_orb_is_fatal() {
    let cavern = Cavern::builder()
        .node(1, Tile::new(0, 0))
        .node(2, Tile::new(0, 1))
        .node(3, Tile::new(1, 0))
        .node(9, Tile::new(5, 5))
        .edge(1, 2, 1)
        .edge(1, 3, 1)
        .build()
        .unwrap();
    let mut sim = ExplorationSim::new(cavern, NodeId(1), NodeId(9)).unwrap();

    let err = Explorer::new().explore(&mut sim).unwrap_err();
    assert!(matches!(err, CavernError::BacktrackUnderflow { .. }));
    assert!(!err.is_recoverable());
}
