//! Console I/O and the start / destination prompts.

use std::io::{self, BufRead, Write};

use rf_core::{EdgeId, Point2};

/// What the user typed for a location.
#[derive(Clone, Debug, PartialEq)]
pub enum LocationInput {
    /// A network coordinate, to be snapped to the nearest edge.
    Coordinate(Point2),
    /// A literal edge ID.
    EdgeId(EdgeId),
}

impl LocationInput {
    /// Interpret a command-line value: `"x,y"` is a coordinate, anything
    /// else an edge ID.
    pub fn from_arg(arg: &str) -> Self {
        let arg = arg.trim();
        if let Some((x, y)) = arg.split_once(',') {
            if let (Ok(x), Ok(y)) = (x.trim().parse(), y.trim().parse()) {
                return LocationInput::Coordinate(Point2::new(x, y));
            }
        }
        LocationInput::EdgeId(EdgeId::from(arg))
    }
}

/// Line-oriented console over any reader / writer pair.
pub struct Console<R, W> {
    input:  R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Print `question` without a newline and read the answer, trimmed.
    /// End of input reads as an empty answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_owned())
    }

    /// Ask for a location, `label` being `"start"` or `"destination"`.
    ///
    /// A numeric first answer is taken as X and Y is asked for next.  If
    /// the first answer is not a number, or Y is not, the first answer is
    /// the edge ID.  `preset` answers the whole question (see
    /// [`LocationInput::from_arg`]).
    pub fn location(&mut self, label: &str, preset: Option<&str>) -> io::Result<LocationInput> {
        if let Some(arg) = preset {
            return Ok(LocationInput::from_arg(arg));
        }
        let first = self.ask(&format!("Enter {label} X coordinate (or edge ID): "))?;
        let Ok(x) = first.parse::<f64>() else {
            return Ok(LocationInput::EdgeId(EdgeId::from(first)));
        };
        let second = self.ask(&format!("Enter {label} Y coordinate: "))?;
        Ok(match second.parse::<f64>() {
            Ok(y) => LocationInput::Coordinate(Point2::new(x, y)),
            Err(_) => LocationInput::EdgeId(EdgeId::from(first)),
        })
    }
}
