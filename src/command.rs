//! Host command grammar.
//!
//! ```text
//! save | help | #dumpgeo#
//! f | b | e | m | h  [ ++ | -- | <number> ]     (no argument means ++)
//! r | g
//! ```

use std::str::FromStr;

pub const HELP: &str = "Valid cmds:
 f b e m h [++|--|<float>]
 r (flip)
 g (geometry)
 save
 help
";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
  Save,
  Help,
  /// Full model dump of the current polyhedron.
  DumpModel,
  /// Wireframe dump of the current polyhedron.
  DumpWireframe,
  Face(f32),
  Bar(f32),
  Slot(f32),
  Mode(f32),
  Hue(f32),
  Flip,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
  #[error("empty command")]
  Empty,
  #[error("unknown command `{0}`")]
  Unknown(String),
  #[error("invalid argument `{arg}` for `{cmd}`")]
  InvalidArgument { cmd: char, arg: String },
  #[error("`{0}` takes no argument")]
  UnexpectedArgument(char),
}

/// `""` and `"++"` step forward, `"--"` steps back, anything else is a number.
pub fn parse_delta(arg: &str) -> Option<f32> {
  match arg {
    "" | "++" => Some(1.0),
    "--" => Some(-1.0),
    _ => arg.parse::<f32>().ok().filter(|d| d.is_finite()),
  }
}

impl FromStr for Command {
  type Err = CommandError;

  fn from_str(msg: &str) -> Result<Self, Self::Err> {
    let msg = msg.trim();
    match msg {
      "" => return Err(CommandError::Empty),
      "save" => return Ok(Command::Save),
      "help" => return Ok(Command::Help),
      "#dumpgeo#" => return Ok(Command::DumpModel),
      _ => {}
    }

    let mut chars = msg.chars();
    let Some(cmd) = chars.next() else {
      return Err(CommandError::Empty);
    };
    let arg = chars.as_str().trim_start();

    let delta = || {
      parse_delta(arg).ok_or_else(|| CommandError::InvalidArgument {
        cmd,
        arg: arg.to_string(),
      })
    };
    let bare = |command| {
      if arg.is_empty() {
        Ok(command)
      } else {
        Err(CommandError::UnexpectedArgument(cmd))
      }
    };

    match cmd {
      'f' => delta().map(Command::Face),
      'b' => delta().map(Command::Bar),
      'e' => delta().map(Command::Slot),
      'm' => delta().map(Command::Mode),
      'h' => delta().map(Command::Hue),
      'r' => bare(Command::Flip),
      'g' => bare(Command::DumpWireframe),
      _ => Err(CommandError::Unknown(msg.to_string())),
    }
  }
}
