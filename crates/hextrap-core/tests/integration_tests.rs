//! Integration tests for the Hextrap engine.
//!
//! These tests drive complete rounds through the turn controller.

use hextrap_core::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::time::Duration;

fn h(column: i32, row: i32) -> HexCoordinate {
    HexCoordinate::new(column, row)
}

fn controller_with(config: GameConfig, agent: HexCoordinate, obstacles: &[HexCoordinate]) -> TurnController {
    let board = BoardState::from_parts(config.topology(), agent, obstacles.iter().copied()).unwrap();
    TurnController::with_board(config, board).unwrap()
}

/// Play a whole round with a bot, checking invariants after every turn.
/// Returns the terminal event.
fn play_round(controller: &mut TurnController, bot: &mut Trapper) -> TurnEvent {
    let max_turns = controller.board().topology().cell_count();
    let hold = controller.config().hold_duration();
    let mut previous_obstacles = controller.board().obstacles().clone();

    for _ in 0..max_turns {
        let cell = bot.choose_cell(controller.board()).expect("open cell while round is live");
        let events = controller.place_obstacle(cell).unwrap();

        let board = controller.board();
        assert!(!board.is_blocked(&board.agent().position()));
        assert!(board.obstacles().is_superset(&previous_obstacles));
        assert_eq!(board.obstacles().len(), previous_obstacles.len() + 1);
        previous_obstacles = board.obstacles().clone();

        let last = events.last().cloned().unwrap();
        if last.is_terminal() {
            return last;
        }

        // Clicks during the hold are dropped
        assert_eq!(
            controller.place_obstacle(cell),
            Err(GameError::NotAcceptingInput)
        );
        assert_eq!(controller.advance(hold), vec![TurnEvent::InputReopened]);
    }

    panic!("round did not finish within {} turns", max_turns);
}

#[test]
fn test_scenario_open_center_is_not_captured_on_first_turn() {
    let topology = GridTopology::new(11, 10);
    let start = topology.center();
    assert_eq!(start, h(5, 4));

    // Four steps north reach row 0; every other edge is five steps away
    let route = shortest_escape_route(start, &HashSet::new(), &topology).unwrap();
    assert_eq!(route.len(), 5);
    assert_eq!(route.last().unwrap().row, 0);

    let config = GameConfig {
        width: 11,
        height: 10,
        ..Default::default()
    };
    let mut controller = controller_with(config, start, &[]);
    let events = controller.place_obstacle(h(1, 1)).unwrap();
    assert!(matches!(events[1], TurnEvent::AgentMoved { from, .. } if from == start));
}

#[test]
fn test_scenario_surrounding_all_six_neighbors_captures() {
    let config = GameConfig::default();
    let topology = config.topology();
    let center = topology.center();
    let ring = topology.neighbors(&center);
    assert_eq!(ring.len(), 6);

    for blocked in 0..6 {
        let board = BoardState::from_parts(topology, center, ring[..blocked].to_vec()).unwrap();
        assert!(board.escape_route().is_some(), "{} neighbors blocked", blocked);
    }

    let mut controller = controller_with(config, center, &ring[..5]);
    let events = controller.place_obstacle(ring[5]).unwrap();
    assert!(matches!(events[1], TurnEvent::AgentCaptured { at, captured: true, .. } if at == center));
    assert_eq!(controller.board().agent().position(), center);
    assert_eq!(controller.board().round_state(), RoundState::Captured);
}

#[test]
fn test_scenario_tie_break_is_deterministic() {
    let config = GameConfig {
        width: 5,
        height: 5,
        ..Default::default()
    };

    // East and NorthEast are equally short; blocking East must send the token NorthEast
    for _ in 0..5 {
        let mut controller = controller_with(config.clone(), h(2, 2), &[]);
        let events = controller.place_obstacle(h(3, 2)).unwrap();
        assert!(matches!(
            events[1],
            TurnEvent::AgentMoved { to, facing: Direction::NorthEast, .. } if to == h(2, 1)
        ));
    }
}

#[test]
fn test_reset_from_every_phase() {
    let config = GameConfig {
        seed: Some(5),
        ..Default::default()
    };
    let expected_obstacles = config.obstacle_count();
    let topology = config.topology();
    let center = topology.center();
    let ring = topology.neighbors(&center);

    let mut fresh = TurnController::new(config.clone()).unwrap();

    let mut animating = controller_with(config.clone(), center, &[]);
    animating.place_obstacle(h(1, 1)).unwrap();

    let mut captured = controller_with(config.clone(), center, &ring[..5]);
    captured.place_obstacle(ring[5]).unwrap();

    let mut escaped = controller_with(config.clone(), h(1, 5), &[]);
    escaped.place_obstacle(h(9, 9)).unwrap();
    assert_eq!(escaped.phase(), ControllerPhase::Escaped);

    for controller in [&mut fresh, &mut animating, &mut captured, &mut escaped] {
        let events = controller.apply_action(PlayerAction::Reset).unwrap();
        assert_eq!(
            events,
            vec![TurnEvent::RoundReset {
                agent: center,
                obstacles: controller.board().sorted_obstacles(),
            }]
        );
        assert!(controller.is_accepting_input());
        assert_eq!(controller.board().agent().position(), center);
        assert_eq!(controller.board().obstacles().len(), expected_obstacles);
        assert!(!controller.board().is_blocked(&center));
    }
}

#[test]
fn test_seeded_controllers_generate_identical_boards() {
    let config = GameConfig {
        seed: Some(99),
        ..Default::default()
    };
    let a = TurnController::new(config.clone()).unwrap();
    let b = TurnController::with_rng(config, StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a.board().snapshot(), b.board().snapshot());
}

#[test]
fn test_bot_rounds_always_finish() {
    for (seed, difficulty) in (0..12u64).zip(
        [BotDifficulty::Easy, BotDifficulty::Medium, BotDifficulty::Hard]
            .into_iter()
            .cycle(),
    ) {
        let config = GameConfig {
            seed: Some(seed),
            hold_duration_ms: 250,
            ..Default::default()
        };
        let mut controller = TurnController::new(config).unwrap();
        let mut bot = Trapper::with_seed(difficulty, seed);

        let terminal = play_round(&mut controller, &mut bot);
        match terminal {
            TurnEvent::AgentCaptured { at, .. } => {
                assert_eq!(controller.phase(), ControllerPhase::Captured);
                assert_eq!(controller.board().agent().position(), at);
                assert!(controller.board().escape_route().is_none());
            }
            TurnEvent::AgentEscaped { to, .. } => {
                assert_eq!(controller.phase(), ControllerPhase::Escaped);
                assert!(controller.board().topology().is_boundary(&to));
            }
            other => panic!("unexpected terminal event {:?}", other),
        }
        assert_eq!(controller.rounds_played(), 1);
    }
}

#[test]
fn test_events_carry_full_obstacle_set() {
    let config = GameConfig::default();
    let mut controller = controller_with(config, h(5, 5), &[h(2, 2), h(8, 8)]);
    let events = controller.place_obstacle(h(1, 8)).unwrap();

    match &events[1] {
        TurnEvent::AgentMoved { obstacles, .. } => {
            assert_eq!(obstacles, &vec![h(1, 8), h(2, 2), h(8, 8)]);
        }
        other => panic!("expected a move, got {:?}", other),
    }
}
