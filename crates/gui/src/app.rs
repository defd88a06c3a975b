//! The game loop

use std::thread;
use std::time::Instant;

use chess_duel_core::config::Config;
use chess_duel_core::{Engine, GameBoard, Orientation, PgnArchive, Session, UciEngine};
use macroquad::input::prevent_quit;
use macroquad::window::next_frame;
use shakmaty::Color;
use tracing::{info, warn};

use crate::error::AppError;
use crate::input;
use crate::render::Renderer;
use crate::sprites::SpriteSet;

/// Plays one game against the configured engine and saves it.
///
/// The engine is started and the sprites are loaded before the first frame;
/// failing either ends the program before any play.
pub async fn run(config: Config, human: Color) -> Result<(), AppError> {
    let layout = config.display.layout(Orientation::for_side(human));

    let mut engine = UciEngine::spawn(&config.engine)?;
    let sprites = SpriteSet::load(&config.resource_dir).await?;
    let renderer = Renderer::new(&config.display, layout, sprites);

    let mut session = Session::new(GameBoard::new(), human, layout);
    info!("Human plays {:?} against {}", human, engine.name());

    // Closing the window becomes an event so the game can still be saved
    prevent_quit();

    let frame_time = config.display.frame_time();
    let move_time = config.engine.move_time();

    loop {
        let tick = Instant::now();

        for event in input::poll() {
            if let Some(played) = session.handle_event(event) {
                println!("{}", played);
            }
        }

        renderer.draw(&session);
        next_frame().await;

        session.check_game_over();
        if session.is_over() {
            break;
        }

        if let Some(played) = session.engine_turn(&mut engine, move_time)? {
            println!("{}", played);
            renderer.draw(&session);
            next_frame().await;
        }
        if session.is_over() {
            break;
        }

        if let Some(rest) = frame_time.checked_sub(tick.elapsed()) {
            thread::sleep(rest);
        }
    }

    let result = session.finish();
    info!("Game over after {} plies: {}", session.board().moves().len(), result);

    let archive = PgnArchive::new(&config.pgn_path);
    let count = archive.save_game(session.board(), human, engine.name(), result)?;

    println!();
    match result.winner() {
        Some(side) => println!("Result: {} ({:?} wins)", result, side),
        None => println!("Result: {}", result),
    }
    println!("Game saved to {} ({} games)", archive.path().display(), count);

    if let Err(e) = engine.quit() {
        warn!("Engine did not shut down cleanly: {}", e);
    }

    Ok(())
}
