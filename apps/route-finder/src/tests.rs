//! End-to-end runs against an in-memory network and a fake route service.

#[cfg(test)]
mod helpers {
    use std::path::Path;

    use rf_core::{EdgeId, Permissions, Point2, RunConfig, SimRng};
    use rf_network::{RoadNetwork, RoadNetworkBuilder};
    use rf_sumo::{Route, RouteService, SumoResult};

    use crate::app::{self, Outcome, Presets, SessionFactory};
    use crate::prompt::Console;

    /// ```text
    ///   J0 ──A──▶ J1 ──B──▶ J2 ──C──▶ J3
    ///   (0,0)    (100,0)   (200,0)   (300,0)
    /// ```
    /// plus a pedestrian-only `W` from J2 down to (200,-100).
    pub fn network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        b.add_junction("J0", Point2::new(0.0, 0.0));
        b.add_junction("J1", Point2::new(100.0, 0.0));
        b.add_junction("J2", Point2::new(200.0, 0.0));
        b.add_junction("J3", Point2::new(300.0, 0.0));
        b.add_junction("J4", Point2::new(200.0, -100.0));
        b.add_simple_edge("A", "J0", "J1", Permissions::All).unwrap();
        b.add_simple_edge("B", "J1", "J2", Permissions::All).unwrap();
        b.add_simple_edge("C", "J2", "J3", Permissions::All).unwrap();
        b.add_simple_edge("W", "J2", "J4", Permissions::from_attrs(Some("pedestrian"), None))
            .unwrap();
        b.build()
    }

    /// `A → C` is `A B C`; a pair of equal edges has no route; anything
    /// else routes directly.
    pub struct FakeService;

    impl RouteService for FakeService {
        fn find_route(&mut self, from: &EdgeId, to: &EdgeId, _vtype: &str) -> SumoResult<Option<Route>> {
            let edges: Vec<EdgeId> = match (from.as_str(), to.as_str()) {
                ("A", "C") => ["A", "B", "C"].iter().map(|s| EdgeId::from(*s)).collect(),
                (a, b) if a == b => Vec::new(),
                _ => vec![from.clone(), to.clone()],
            };
            Ok(Route::from_edges(edges))
        }
    }

    #[derive(Default)]
    pub struct FakeSessions {
        pub opened: usize,
    }

    impl SessionFactory for FakeSessions {
        fn open(&mut self) -> SumoResult<Box<dyn RouteService>> {
            self.opened += 1;
            Ok(Box::new(FakeService))
        }
    }

    pub fn config(dir: &Path) -> RunConfig {
        RunConfig {
            routes_out: dir.join("data").join("route.rou.xml"),
            settings_out: dir.join("data").join("settings.xml"),
            background_vehicles: 5,
            seed: Some(11),
            launch_gui: false,
            ..RunConfig::default()
        }
    }

    pub struct RunResult {
        pub outcome:  Outcome,
        pub console:  String,
        pub sessions: FakeSessions,
    }

    pub fn run(config: &RunConfig, presets: Presets, input: &str) -> RunResult {
        let net = network();
        let mut sessions = FakeSessions::default();
        let mut out = Vec::new();
        let mut rng = SimRng::new(config.seed.unwrap_or(0));
        let outcome = {
            let mut console = Console::new(input.as_bytes(), &mut out);
            app::run(config, &net, &presets, &mut sessions, &mut console, &mut rng).unwrap()
        };
        RunResult { outcome, console: String::from_utf8(out).unwrap(), sessions }
    }

    pub fn presets(start: &str, end: &str) -> Presets {
        Presets { start: Some(start.to_owned()), end: Some(end.to_owned()) }
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use super::helpers::*;
    use crate::app::{Outcome, Presets};

    #[test]
    fn edge_ids_a_to_c() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let r = run(&config, presets("A", "C"), "");

        assert_eq!(r.outcome, Outcome::Written { vehicles: 6 });
        // One session for the primary route, one for the background traffic.
        assert_eq!(r.sessions.opened, 2);

        let routes = std::fs::read_to_string(&config.routes_out).unwrap();
        assert!(routes.contains(r#"<vehicle id="route_highlight" type="highlighted_car" depart="2">"#), "{routes}");
        assert!(routes.contains(r#"edges="A B C""#), "{routes}");
        assert_eq!(routes.matches("<vehicle ").count(), 6);

        let settings = std::fs::read_to_string(&config.settings_out).unwrap();
        assert_eq!(settings.matches("<selection ").count(), 3);
        for id in ["A", "B", "C"] {
            assert!(settings.contains(&format!(r#"<selection id="{id}""#)));
        }

        assert!(r.console.contains("Found 3 valid edges for routing"), "{}", r.console);
        assert!(r.console.contains("Selected start edge: A"));
        assert!(r.console.contains("Selected destination edge: C"));
        assert!(r.console.contains("Route found! Edges: A -> B -> C"));
        assert!(r.console.contains("Added random vehicle 0: "));
        assert!(r.console.contains("Successfully added 5 random vehicles after "));
    }

    #[test]
    fn edge_table_lists_valid_edges() {
        let dir = tempfile::tempdir().unwrap();
        let r = run(&config(dir.path()), presets("A", "C"), "");
        assert!(r.console.contains("ID\t\tStart(x,y)\t\tEnd(x,y)\n"));
        assert!(r.console.contains(&"-".repeat(50)));
        assert!(r.console.contains("B               (100.0,0.0)\t\t(200.0,0.0)"), "{}", r.console);
        assert!(!r.console.contains("W   "));
    }

    #[test]
    fn interactive_edge_ids() {
        let dir = tempfile::tempdir().unwrap();
        let r = run(&config(dir.path()), Presets::default(), "A\nC\n");
        assert!(matches!(r.outcome, Outcome::Written { .. }));
        assert!(r.console.contains("Enter start X coordinate (or edge ID): "));
        assert!(r.console.contains("Enter destination X coordinate (or edge ID): "));
        assert!(!r.console.contains("Y coordinate"));
    }

    #[test]
    fn interactive_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let r = run(&config(dir.path()), Presets::default(), "50\n1\n250\n-1.5\n");
        assert!(matches!(r.outcome, Outcome::Written { .. }));
        assert!(r.console.contains("Enter start Y coordinate: "));
        assert!(r.console.contains("Selected start edge: A"));
        assert!(r.console.contains("Selected destination edge: C"));
    }

    #[test]
    fn unknown_start_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let r = run(&config, Presets::default(), "nowhere\n");
        assert_eq!(r.outcome, Outcome::InvalidStart);
        assert!(r.console.contains("Error: Invalid start location"));
        assert_eq!(r.sessions.opened, 0);
        assert!(!config.routes_out.exists());
        assert!(!config.settings_out.exists());
    }

    #[test]
    fn pedestrian_edge_is_not_a_valid_start() {
        let dir = tempfile::tempdir().unwrap();
        let r = run(&config(dir.path()), presets("W", "C"), "");
        assert_eq!(r.outcome, Outcome::InvalidStart);
    }

    #[test]
    fn far_destination_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let r = run(&config, presets("A", "5000,5000"), "");
        assert_eq!(r.outcome, Outcome::InvalidDestination);
        assert!(r.console.contains("Error: Invalid destination location"));
        assert!(!config.routes_out.exists());
    }

    #[test]
    fn no_route_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let r = run(&config, presets("B", "B"), "");
        assert_eq!(r.outcome, Outcome::NoRoute);
        assert!(r.console.contains("No route found between selected locations"));
        assert_eq!(r.sessions.opened, 1);
        assert!(!config.routes_out.exists());
    }

    #[test]
    fn zero_background_still_has_highlight() {
        let dir = tempfile::tempdir().unwrap();
        let config = rf_core::RunConfig { background_vehicles: 0, ..config(dir.path()) };
        let r = run(&config, presets("A", "C"), "");
        assert_eq!(r.outcome, Outcome::Written { vehicles: 1 });
        assert!(r.console.contains("Successfully added 0 random vehicles after 0 attempts"));
        // Only the primary route needs a session.
        assert_eq!(r.sessions.opened, 1);
        let routes = std::fs::read_to_string(&config.routes_out).unwrap();
        assert!(routes.contains("route_highlight"));
    }

    #[test]
    fn zero_attempts_opens_no_background_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = rf_core::RunConfig { max_attempts: 0, ..config(dir.path()) };
        let r = run(&config, presets("A", "C"), "");
        assert_eq!(r.outcome, Outcome::Written { vehicles: 1 });
        assert_eq!(r.sessions.opened, 1);
    }

    #[test]
    fn settings_write_failure_leaves_no_route_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let config = rf_core::RunConfig {
            settings_out: blocker.join("settings.xml"),
            ..config(dir.path())
        };

        let net = network();
        let mut sessions = FakeSessions::default();
        let mut out = Vec::new();
        let mut rng = rf_core::SimRng::new(11);
        let mut console = crate::prompt::Console::new("".as_bytes(), &mut out);
        let result = crate::app::run(
            &config,
            &net,
            &presets("A", "C"),
            &mut sessions,
            &mut console,
            &mut rng,
        );

        assert!(result.is_err());
        assert!(!config.routes_out.exists());
    }
}

// ── Prompt ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod prompt {
    use rf_core::{EdgeId, Point2};

    use crate::prompt::{Console, LocationInput};

    fn ask(input: &str) -> LocationInput {
        let mut out = Vec::new();
        Console::new(input.as_bytes(), &mut out).location("start", None).unwrap()
    }

    #[test]
    fn coordinate_pair() {
        assert_eq!(ask("1.5\n-2\n"), LocationInput::Coordinate(Point2::new(1.5, -2.0)));
    }

    #[test]
    fn non_numeric_is_edge_id() {
        assert_eq!(ask("  E0 \n"), LocationInput::EdgeId(EdgeId::from("E0")));
    }

    #[test]
    fn bad_y_falls_back_to_edge_id() {
        assert_eq!(ask("12\nfoo\n"), LocationInput::EdgeId(EdgeId::from("12")));
    }

    #[test]
    fn end_of_input() {
        assert_eq!(ask(""), LocationInput::EdgeId(EdgeId::from("")));
    }

    #[test]
    fn command_line_values() {
        assert_eq!(
            LocationInput::from_arg("3, -4.5"),
            LocationInput::Coordinate(Point2::new(3.0, -4.5))
        );
        assert_eq!(LocationInput::from_arg("E0"), LocationInput::EdgeId(EdgeId::from("E0")));
        assert_eq!(LocationInput::from_arg("a,b"), LocationInput::EdgeId(EdgeId::from("a,b")));
    }
}

// ── CLI ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cli {
    use std::io::Write;

    use clap::Parser;

    use crate::Args;

    #[test]
    fn defaults() {
        let config = Args::try_parse_from(["route_finder"]).unwrap().run_config().unwrap();
        assert_eq!(config, rf_core::RunConfig::default());
    }

    #[test]
    fn flags_override() {
        let args = Args::try_parse_from([
            "route_finder",
            "--vehicles", "3",
            "--max-attempts", "10",
            "--seed", "7",
            "--no-gui",
            "--session-per-query",
            "--start", "-5,2",
        ])
        .unwrap();
        assert_eq!(args.start.as_deref(), Some("-5,2"));
        let config = args.run_config().unwrap();
        assert_eq!(config.background_vehicles, 3);
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.seed, Some(7));
        assert!(!config.launch_gui);
        assert!(config.session_per_query);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "background_vehicles": 20, "seed": 1 }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_owned();

        let config = Args::try_parse_from(["route_finder", "--config", &path, "--seed", "2"])
            .unwrap()
            .run_config()
            .unwrap();
        assert_eq!(config.background_vehicles, 20);
        assert_eq!(config.seed, Some(2));
    }
}
