use super::*;

#[test]
fn parses_search_with_defaults() {
    let cli = Cli::try_parse_from(["suplink", "search", "hex bolts", "India"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Search {
            product,
            country,
            mode,
            user_id,
            json,
        } => {
            assert_eq!(product, "hex bolts");
            assert_eq!(country, "India");
            assert_eq!(mode, SearchMode::Quick);
            assert!(user_id.is_none());
            assert!(!json);
        }
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn parses_search_mode_case_insensitively() {
    let cli = Cli::try_parse_from([
        "suplink", "search", "valves", "Kenya", "--mode", "DEEP", "--json", "--user-id", "u-42",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            mode: SearchMode::Deep,
            json: true,
            user_id: Some(ref id),
            ..
        } if id == "u-42"
    ));
}

#[test]
fn rejects_unknown_mode() {
    let result = Cli::try_parse_from(["suplink", "search", "valves", "Kenya", "--mode", "slow"]);
    assert!(result.is_err());
}

#[test]
fn search_requires_country() {
    assert!(Cli::try_parse_from(["suplink", "search", "valves"]).is_err());
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["suplink", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Ping
        }
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["suplink", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Migrate
        }
    ));
}

#[test]
fn command_is_required() {
    assert!(Cli::try_parse_from(["suplink"]).is_err());
}

#[test]
fn parses_analyzed_command() {
    let cli = Cli::try_parse_from(["suplink", "analyzed", "17", "--json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Analyzed { ref search_id, json: true } if search_id == "17"
    ));
}
