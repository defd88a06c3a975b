use std::io;
use std::process;

use chess_duel_core::config::{Config, CONFIG_FILE};
use chess_duel_core::prompt::choose_color;
use chess_duel_core::Orientation;
use macroquad::window::Conf;
use macroquad::Window;
use tracing::error;

mod app;
mod error;
mod input;
mod render;
mod sprites;

fn main() {
    tracing_subscriber::fmt::init();

    println!("Chess Duel");
    println!("==========");
    println!();

    let config = match Config::load(CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load {}: {}", CONFIG_FILE, e);
            process::exit(1);
        }
    };

    // Asked on the terminal before the window opens
    let human = match choose_color(&mut io::stdin().lock(), &mut io::stdout()) {
        Ok(color) => color,
        Err(e) => {
            error!("No side chosen: {}", e);
            process::exit(1);
        }
    };

    let size = config.display.layout(Orientation::for_side(human)).window_size() as i32;
    let conf = Conf {
        window_title: "Chess Duel".to_owned(),
        window_width: size,
        window_height: size,
        window_resizable: false,
        ..Default::default()
    };

    Window::from_config(conf, async move {
        if let Err(e) = app::run(config, human).await {
            error!("{}", e);
            process::exit(1);
        }
    });
}
