use std::collections::{HashMap, VecDeque};

use glam::DVec2;
use raycast_maze_core::{
    CellCoord, Command, DisplayMode, Event, GridMap, WinMode, WinReason, START_CELL,
};
use raycast_maze_system_win_condition::WinCondition;
use raycast_maze_world::{apply, query, World};

fn configure(world: &mut World, win_mode: WinMode) {
    let mut events = Vec::new();
    apply(
        world,
        Command::ConfigureMaze {
            columns: 15,
            rows: 15,
            win_mode,
            display_mode: DisplayMode::Windowed,
        },
        &mut events,
    );
}

fn step(world: &mut World, system: &mut WinCondition, displacement: DVec2) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, Command::MovePlayer { displacement }, &mut events);

    let mut pending = events.clone();
    loop {
        let mut commands = Vec::new();
        system.handle(&pending, &mut commands);
        if commands.is_empty() {
            return events;
        }
        pending.clear();
        for command in commands {
            apply(world, command, &mut pending);
        }
        events.extend(pending.iter().cloned());
    }
}

fn completions(events: &[Event]) -> Vec<WinReason> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::LevelCompleted { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect()
}

fn route(grid: &GridMap, goal: CellCoord) -> Vec<CellCoord> {
    let mut parents = HashMap::new();
    let mut queue = VecDeque::from([START_CELL]);
    let _ = parents.insert(START_CELL, START_CELL);

    while let Some(cell) = queue.pop_front() {
        if cell == goal {
            break;
        }
        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        for (next_column, next_row) in [
            (column + 1, row),
            (column - 1, row),
            (column, row + 1),
            (column, row - 1),
        ] {
            if !grid.get(next_column, next_row).is_passable() {
                continue;
            }
            let next = CellCoord::new(next_column as u32, next_row as u32);
            if !parents.contains_key(&next) {
                let _ = parents.insert(next, cell);
                queue.push_back(next);
            }
        }
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != START_CELL {
        cursor = *parents.get(&cursor).expect("goal reachable from start");
        path.push(cursor);
    }
    path.reverse();
    path
}

#[test]
fn threshold_mode_completes_after_enough_cells() {
    let mut world = World::new(21);
    configure(&mut world, WinMode::ThresholdOnly);
    let mut system = WinCondition::new(WinMode::ThresholdOnly, 1);

    let events = step(&mut world, &mut system, DVec2::ZERO);
    assert_eq!(completions(&events), vec![WinReason::ExploredThreshold]);
    assert_eq!(query::level(&world), 2);
    assert_eq!(query::distinct_visited(&world), 0);
}

#[test]
fn finish_only_mode_never_completes_by_exploring() {
    let mut world = World::new(21);
    configure(&mut world, WinMode::FinishOnly);
    let mut system = WinCondition::new(WinMode::FinishOnly, 1);

    for _ in 0..50 {
        let events = step(&mut world, &mut system, DVec2::new(0.05, 0.0));
        assert!(completions(&events).is_empty());
    }
    assert_eq!(query::level(&world), 1);
}

#[test]
fn walking_onto_the_finish_completes_the_level() {
    let mut world = World::new(13);
    configure(&mut world, WinMode::FinishOnly);
    let mut system = WinCondition::new(WinMode::FinishOnly, u32::MAX);
    let finish = query::finish(&world).expect("finish placed");
    let path = route(query::grid(&world), finish);

    let mut reasons = Vec::new();
    'walk: for pair in path.windows(2) {
        let heading = pair[1].center() - pair[0].center();
        for _ in 0..10 {
            let events = step(&mut world, &mut system, heading * 0.1);
            reasons = completions(&events);
            if !reasons.is_empty() {
                break 'walk;
            }
        }
    }

    assert_eq!(reasons, vec![WinReason::ReachedFinish]);
    assert_eq!(query::level(&world), 2);
}

#[test]
fn each_completion_is_followed_by_a_fresh_maze() {
    let mut world = World::new(5);
    configure(&mut world, WinMode::Both);
    let mut system = WinCondition::new(WinMode::Both, 1);

    for expected_level in 2..6 {
        let events = step(&mut world, &mut system, DVec2::ZERO);
        let completed = events
            .iter()
            .position(|event| matches!(event, Event::LevelCompleted { .. }))
            .expect("level completed");
        assert!(matches!(
            events.get(completed + 1),
            Some(Event::MazeGenerated { level, .. }) if *level == expected_level
        ));
    }
}
