//! Tessera Quickstart: a small sliding-block board from scratch.
//!
//! Demonstrates:
//!   1. Building a grid from a GridConfig
//!   2. Inserting single- and multi-cell occupants
//!   3. Registering a constraint and an action
//!   4. Moving and rotating occupants, observing events
//!   5. Translating the whole grid and reading metrics
//!
//! Run with:
//!   cargo run --example quickstart

use tessera_core::{Direction, Point};
use tessera_grid::{Grid, GridConfig, GridEvent, Occupant};
use tessera_space::Region;

// ─── Board parameters ───────────────────────────────────────────

const WIDTH: i32 = 6;
const HEIGHT: i32 = 5;

/// The exit cell; reaching it with the key block wins.
const EXIT: Point = Point::new(5, 2);

fn print_board(grid: &Grid<char>) {
    let mut row = None;
    let mut line = String::new();
    grid.render(|p, occupants| {
        if row != Some(p.y) {
            if row.is_some() {
                println!("  {line}");
                line.clear();
            }
            row = Some(p.y);
        }
        let glyph = occupants
            .first()
            .and_then(|o| o.payload())
            .unwrap_or('.');
        line.push(glyph);
    });
    println!("  {line}");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tessera Quickstart ===\n");

    // 1. A 6x5 board.
    let grid: Grid<char> = Grid::with_config(GridConfig::new(WIDTH, HEIGHT))?;
    println!("Board: {}", grid.region());

    // 2. The key block (2 cells wide), a wall and a vertical bar.
    let key = Occupant::from_payload_with_id('K', "key", Point::new(0, 2), [Point::new(1, 2)]);
    let wall = Occupant::from_payload('#', Point::new(3, 0), [Point::new(3, 1)]);
    let bar = Occupant::from_payload('|', Point::new(4, 2), [Point::new(4, 3), Point::new(4, 4)])
        .with_pivot(Point::new(4, 3));
    grid.insert_all(&[key.clone(), wall, bar.clone()])?;
    print_board(&grid);

    // 3. Walls never move; reaching the exit is announced.
    grid.add_constraint_with(None, Some("walls are fixed".into()), |mover, _| {
        mover.payload() == Some('#')
    });
    grid.add_action(
        |mover, candidate| mover.id() == Some("key") && candidate.contains(&EXIT),
        |_, _| println!("\n  >> key block reaches the exit"),
    );
    let events = grid.subscribe_channel();

    // 4. Slide the key right until the bar blocks it, rotate the bar out of
    //    the way, then finish the slide.
    while key.step(Direction::Right).is_ok_and(|moved| moved) {}
    println!("\nKey blocked at {}", key.top_left());

    bar.rotate_quarter()?;
    println!("Bar rotated to {:?}", bar.shape().as_slice());
    while key.step(Direction::Right).is_ok_and(|moved| moved) {}
    print_board(&grid);

    let moved = events
        .try_iter()
        .filter(|e| matches!(e, GridEvent::ItemMoved(_)))
        .count();
    println!("\n{moved} committed moves observed on the channel");

    // 5. Shift the whole board and look at it through a viewport.
    grid.move_xy(10, 10);
    grid.set_viewport(Region::new(Point::new(13, 12), 3, 1)?);
    println!("\nBoard translated to {}; viewport row:", grid.top_left());
    print_board(&grid);

    println!("\nMetrics: {:?}", grid.metrics());
    println!("Done.");
    Ok(())
}
