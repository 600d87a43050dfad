use anyhow::{anyhow, bail, Context, Result};
use fortress_core::{Action, CreatureId, StructureKind};

pub const USAGE: &str = "\
commands:
  minutes <n>                 set the session length (1-180)
  start | pause | reset       control the focus timer
  tick [n]                    let n seconds pass (default 1)
  run                         count down in real time until done or paused
  build <wall|tower|hatchery> upgrade a structure
  find                        look for a wild creature
  feed|calm|walk <id>         work on taming a wild creature
  raid <daily|practice>       defend against a raid
  status | log | help | quit";

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Tick(u32),
    Run,
    Status,
    Log,
    Help,
    Quit,
}

/// Parse a line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "minutes" | "min" => Command::Act(Action::SetMinutes {
            input: rest.join(" "),
        }),
        "start" => Command::Act(Action::Start),
        "pause" => Command::Act(Action::Pause),
        "reset" => Command::Act(Action::Reset),
        "tick" => match rest.first() {
            Some(n) => Command::Tick(
                n.parse()
                    .with_context(|| format!("'{}' is not a number of seconds", n))?,
            ),
            None => Command::Tick(1),
        },
        "run" => Command::Run,
        "build" => {
            let kind: StructureKind = argument(&rest, "build")?
                .parse()
                .map_err(|err: String| anyhow!(err))?;
            Command::Act(Action::Build { kind })
        }
        "find" => Command::Act(Action::FindCreature),
        "feed" => Command::Act(Action::Feed {
            id: creature_id(&rest, "feed")?,
        }),
        "calm" => Command::Act(Action::Calm {
            id: creature_id(&rest, "calm")?,
        }),
        "walk" => Command::Act(Action::Walk {
            id: creature_id(&rest, "walk")?,
        }),
        "raid" => {
            let daily = match argument(&rest, "raid")?.to_ascii_lowercase().as_str() {
                "daily" => true,
                "practice" => false,
                other => bail!("unknown raid kind '{}'", other),
            };
            Command::Act(Action::Raid { daily })
        }
        "status" => Command::Status,
        "log" => Command::Log,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

fn argument<'a>(rest: &[&'a str], verb: &str) -> Result<&'a str> {
    rest.first()
        .copied()
        .ok_or_else(|| anyhow!("'{}' needs an argument", verb))
}

fn creature_id(rest: &[&str], verb: &str) -> Result<CreatureId> {
    let raw = argument(rest, verb)?;
    raw.parse()
        .with_context(|| format!("'{}' is not a creature id", raw))
}
