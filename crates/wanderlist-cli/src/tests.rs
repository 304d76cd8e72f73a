use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["wanderlist"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert_eq!(cli.view, ViewArg::List);
    assert!(cli.departure.is_none());
    assert!(!cli.json);
}

#[test]
fn parses_list_command() {
    let cli = Cli::try_parse_from(["wanderlist", "list"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::List)));
}

#[test]
fn parses_show_with_name() {
    let cli = Cli::try_parse_from(["wanderlist", "show", "Lisbon"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Show { ref place }) if place == "Lisbon"
    ));
}

#[test]
fn parses_add_with_negative_longitude() {
    let cli = Cli::try_parse_from([
        "wanderlist", "add", "--lat", "41.1579", "--lng", "-8.6291", "--yes",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Add { lat, lng, yes }) => {
            assert!((lat - 41.1579).abs() < f64::EPSILON);
            assert!((lng + 8.6291).abs() < f64::EPSILON);
            assert!(yes);
        }
        other => panic!("expected add command, got {other:?}"),
    }
}

#[test]
fn add_requires_both_coordinates() {
    let result = Cli::try_parse_from(["wanderlist", "add", "--lat", "41.1"]);
    assert!(result.is_err());
}

#[test]
fn parses_delete_without_confirmation_flag() {
    let cli = Cli::try_parse_from(["wanderlist", "delete", "abc"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Delete { ref place, yes: false }) if place == "abc"
    ));
}

#[test]
fn departure_is_normalized() {
    let cli = Cli::try_parse_from(["wanderlist", "--departure", " lys ", "list"])
        .expect("expected valid cli args");
    assert_eq!(cli.departure.as_deref(), Some("LYS"));
}

#[test]
fn global_flags_follow_the_subcommand() {
    let cli = Cli::try_parse_from(["wanderlist", "list", "--view", "map", "--json"])
        .expect("expected valid cli args");
    assert_eq!(cli.view, ViewArg::Map);
    assert!(cli.json);
    assert_eq!(ViewMode::from(cli.view), ViewMode::Map);
}

#[test]
fn invalid_departure_is_rejected() {
    assert!(Cli::try_parse_from(["wanderlist", "--departure", "PARIS"]).is_err());
    assert!(Cli::try_parse_from(["wanderlist", "--departure", "P4R"]).is_err());
}

#[test]
fn parses_flights_command() {
    let cli = Cli::try_parse_from(["wanderlist", "flights", "--from", "par", "--to", "Lisbon"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Flights { ref from, ref to }) if from == "PAR" && to == "Lisbon"
    ));
}

#[test]
fn parses_geocode_command() {
    let cli = Cli::try_parse_from(["wanderlist", "geocode", "--lat", "48.85", "--lng", "2.35"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Geocode { .. })));
}
