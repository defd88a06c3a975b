//! Startup side selection

use shakmaty::Color;
use std::io::{self, BufRead, Write};

/// Asks which side the human plays until the answer is `1` (White) or `2` (Black)
pub fn choose_color<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Color> {
    writeln!(output, "Choose the side you want to play:")?;
    writeln!(output, "1. White")?;
    writeln!(output, "2. Black")?;

    loop {
        write!(output, "Enter 1 or 2: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no side chosen before end of input",
            ));
        }

        match line.trim() {
            "1" => return Ok(Color::White),
            "2" => return Ok(Color::Black),
            _ => {}
        }
    }
}
