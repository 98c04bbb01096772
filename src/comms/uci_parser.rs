use tracing::debug;

#[derive(Debug, PartialEq)]
pub enum UciCommand {
    /// "uci" cmd, sent at startup
    Uci,
    /// "isready" cmd, to check if engine is ready
    IsReady,
    /// "ucinewgame" cmd, to setup a new game state
    UciNewGame,
    /// "position" cmd, to setup the board
    Position {
        startpos: bool,
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// "go" cmd, to start search + time controls
    Go(GoParams),
    /// "stop" cmd, to stop search
    Stop,
    /// "debug on|off" cmd, toggles verbose logging
    Debug(bool),
    /// "setoption" cmd, to configure engine options
    SetOption { name: String, value: String },
    /// "quit" cmd, to exit
    Quit,
    /// unknown or unsupported cmd
    Unknown(String),
}

/// Time control tokens are skipped along with their values.
#[derive(Debug, PartialEq, Default, Clone, Copy)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub infinite: bool,
}

pub fn parse_line(line: &str) -> UciCommand {
    debug!("UCI <- {line}");
    let parts: Vec<&str> = line.split_ascii_whitespace().collect();
    if parts.is_empty() {
        return UciCommand::Unknown(line.to_string());
    }

    match parts[0] {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "position" => parse_position(&parts[1..]),
        "go" => parse_go(&parts[1..]),
        "ucinewgame" => UciCommand::UciNewGame,
        "setoption" => parse_setoption(&parts[1..]),
        "debug" => match parts.get(1) {
            Some(&"on") => UciCommand::Debug(true),
            Some(&"off") => UciCommand::Debug(false),
            _ => UciCommand::Unknown(line.to_string()),
        },
        _ => UciCommand::Unknown(line.to_string()),
    }
}

fn parse_position(parts: &[&str]) -> UciCommand {
    let mut fen: Option<String> = None;
    let mut moves: Vec<String> = Vec::new();
    let mut startpos = false;

    let moves_idx = parts.iter().position(|&p| p == "moves");

    let position_parts = if let Some(idx) = moves_idx {
        &parts[..idx]
    } else {
        parts
    };

    match position_parts.first() {
        Some(&"startpos") => startpos = true,
        Some(&"fen") => fen = Some(position_parts[1..].join(" ")),
        _ => {}
    }

    if let Some(idx) = moves_idx {
        moves = parts[idx + 1..].iter().map(|s| s.to_string()).collect();
    }

    UciCommand::Position {
        startpos,
        fen,
        moves,
    }
}

fn parse_go(parts: &[&str]) -> UciCommand {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < parts.len() {
        let value = parts.get(i + 1);
        match parts[i] {
            "wtime" | "btime" | "winc" | "binc" | "movestogo" | "movetime" => {
                debug!("Ignoring go token {} {:?}", parts[i], value);
                i += 1;
            }
            "depth" => {
                params.depth = value.and_then(|v| v.parse().ok());
                i += 1;
            }
            "infinite" => params.infinite = true,
            _ => {}
        }
        i += 1;
    }

    UciCommand::Go(params)
}

fn parse_setoption(parts: &[&str]) -> UciCommand {
    // setoption name <name> [value <value>]
    let mut name = String::new();
    let mut value = String::new();
    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            "name" => {
                i += 1;
                while i < parts.len() && parts[i] != "value" {
                    if !name.is_empty() {
                        name.push(' ');
                    }
                    name.push_str(parts[i]);
                    i += 1;
                }
            }
            "value" => {
                i += 1;
                while i < parts.len() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(parts[i]);
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    UciCommand::SetOption { name, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("uci", UciCommand::Uci)]
    #[test_case("isready", UciCommand::IsReady)]
    #[test_case("  ucinewgame  ", UciCommand::UciNewGame)]
    #[test_case("stop", UciCommand::Stop)]
    #[test_case("quit", UciCommand::Quit)]
    #[test_case("debug on", UciCommand::Debug(true))]
    #[test_case("debug off", UciCommand::Debug(false))]
    fn test_simple_commands(line: &str, expected: UciCommand) {
        assert_eq!(parse_line(line), expected);
    }

    #[test_case(""; "empty line")]
    #[test_case("debug maybe"; "bad debug flag")]
    #[test_case("register later"; "unsupported")]
    fn test_unknown(line: &str) {
        assert_eq!(parse_line(line), UciCommand::Unknown(line.to_string()));
    }

    #[test]
    fn test_position_startpos_with_moves() {
        assert_eq!(
            parse_line("position startpos moves e2e4 e7e5"),
            UciCommand::Position {
                startpos: true,
                fen: None,
                moves: vec!["e2e4".into(), "e7e5".into()],
            }
        );
    }

    #[test]
    fn test_position_fen() {
        let fen = "3rkb1r/p2nqppp/5n2/1B2p1B1/4P3/1Q6/PPP2PPP/2KR3R w k - 3 13";
        assert_eq!(
            parse_line(&format!("position fen {fen} moves d1d6")),
            UciCommand::Position {
                startpos: false,
                fen: Some(fen.to_string()),
                moves: vec!["d1d6".into()],
            }
        );
    }

    #[test]
    fn test_go_params() {
        let UciCommand::Go(params) = parse_line("go wtime 1000 btime 2000 winc 10 depth 4") else {
            panic!("expected a go command");
        };
        assert_eq!(params.depth, Some(4));
        assert!(!params.infinite);

        // a time control value is never mistaken for a token
        let UciCommand::Go(params) = parse_line("go movestogo 30 wtime 5000 infinite") else {
            panic!("expected a go command");
        };
        assert_eq!(params.depth, None);
        assert!(params.infinite);

        assert_eq!(
            parse_line("go infinite"),
            UciCommand::Go(GoParams {
                infinite: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_setoption() {
        assert_eq!(
            parse_line("setoption name LogFile value true"),
            UciCommand::SetOption {
                name: "LogFile".into(),
                value: "true".into(),
            }
        );
        assert_eq!(
            parse_line("setoption name Clear Hash"),
            UciCommand::SetOption {
                name: "Clear Hash".into(),
                value: String::new(),
            }
        );
    }
}
