//! Unit tests for rf-scene.

#[cfg(test)]
mod helpers {
    use rf_core::EdgeId;
    use rf_sumo::{Route, RouteService, SumoResult};

    pub fn e(s: &str) -> EdgeId {
        EdgeId::from(s)
    }

    pub fn route(ids: &[&str]) -> Route {
        Route::from_edges(ids.iter().map(|s| e(s)).collect()).unwrap()
    }

    pub fn valid() -> Vec<EdgeId> {
        ["A", "B", "C", "D"].iter().map(|s| e(s)).collect()
    }

    /// Route service driven by a closure over the call number (0-based).
    pub struct FnService<F> {
        pub calls: usize,
        answer:    F,
    }

    impl<F> FnService<F>
    where
        F: FnMut(usize, &EdgeId, &EdgeId) -> SumoResult<Option<Route>>,
    {
        pub fn new(answer: F) -> Self {
            Self { calls: 0, answer }
        }
    }

    impl<F> RouteService for FnService<F>
    where
        F: FnMut(usize, &EdgeId, &EdgeId) -> SumoResult<Option<Route>>,
    {
        fn find_route(&mut self, from: &EdgeId, to: &EdgeId, _vtype: &str) -> SumoResult<Option<Route>> {
            let n = self.calls;
            self.calls += 1;
            (self.answer)(n, from, to)
        }
    }

    /// Always finds `from → to`.
    pub fn always(_: usize, from: &EdgeId, to: &EdgeId) -> SumoResult<Option<Route>> {
        Ok(Route::from_edges(vec![from.clone(), to.clone()]))
    }

    pub fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }
}

// ── Vehicles & scene ──────────────────────────────────────────────────────────

#[cfg(test)]
mod scene {
    use super::helpers::*;
    use crate::{Scene, VehicleEntry, VehicleType, HIGHLIGHT_ID};

    #[test]
    fn vtype_attributes() {
        let attrs = VehicleType::CAR.attributes();
        let pairs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        assert_eq!(
            pairs,
            [
                ("id", "car"),
                ("accel", "2.6"),
                ("decel", "4.5"),
                ("sigma", "0.5"),
                ("length", "5"),
                ("maxSpeed", "70"),
                ("color", "0,0,1"),
            ]
        );
        assert_eq!(VehicleType::HIGHLIGHTED_CAR.attributes()[6].1, "1,0,0");
    }

    #[test]
    fn depart_attr_format() {
        let mut v = VehicleEntry::highlight(&route(&["A"]), 2.0);
        assert_eq!(v.depart_attr(), "2");
        v.depart = 17.3;
        assert_eq!(v.depart_attr(), "17.3");
        v.depart = 0.0;
        assert_eq!(v.depart_attr(), "0");
    }

    #[test]
    fn background_ids_and_type() {
        let v = VehicleEntry::background(7, route(&["A", "B"]), 12.5);
        assert_eq!(v.id, "random_vehicle_7");
        assert_eq!(v.vtype, "car");
        assert_eq!(v.edges_attr(), "A B");
    }

    #[test]
    fn highlight_alone() {
        let scene = Scene::new(&route(&["A", "B", "C"]), 2.0);
        let all = scene.sorted_vehicles();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, HIGHLIGHT_ID);
        assert_eq!(all[0].vtype, "highlighted_car");
        assert_eq!(scene.vehicle_count(), 1);
    }

    #[test]
    fn sorted_by_departure_ties_stable() {
        let scene = Scene::new(&route(&["A"]), 2.0).with_background(vec![
            VehicleEntry::background(0, route(&["B"]), 150.2),
            VehicleEntry::background(1, route(&["C"]), 2.0),
            VehicleEntry::background(2, route(&["D"]), 0.4),
            VehicleEntry::background(3, route(&["D"]), 2.0),
        ]);
        let ids: Vec<&str> = scene.sorted_vehicles().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(
            ids,
            ["random_vehicle_2", "route_highlight", "random_vehicle_1", "random_vehicle_3", "random_vehicle_0"]
        );
    }

    #[test]
    fn highlight_edges_deduplicated_in_order() {
        let scene = Scene::new(&route(&["A", "B", "A", "C", "B"]), 2.0);
        let edges: Vec<&str> = scene.highlight_edges().iter().map(|e| e.as_str()).collect();
        assert_eq!(edges, ["A", "B", "C"]);
    }
}

// ── Sampler ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampler {
    use rf_core::SimRng;
    use rf_sumo::SumoError;

    use super::helpers::*;
    use crate::{BackgroundSampler, SceneError, Scene};

    #[test]
    fn reaches_target() {
        let mut service = FnService::new(always);
        let mut rng = SimRng::new(1);
        let mut seen = Vec::new();
        let report = BackgroundSampler::default()
            .sample(&mut service, &valid(), &mut rng, |v| seen.push(v.id.clone()))
            .unwrap();
        assert_eq!(report.added(), 50);
        assert_eq!(report.attempts, 50);
        assert_eq!(service.calls, 50);
        assert_eq!(seen.first().map(String::as_str), Some("random_vehicle_0"));
        assert_eq!(seen.last().map(String::as_str), Some("random_vehicle_49"));
    }

    #[test]
    fn thirty_after_thousand_attempts() {
        let mut service = FnService::new(|n, from, to| {
            if n < 30 { always(n, from, to) } else { Ok(None) }
        });
        let mut rng = SimRng::new(2);
        let report = BackgroundSampler::default()
            .sample(&mut service, &valid(), &mut rng, |_| {})
            .unwrap();
        assert_eq!(report.added(), 30);
        assert_eq!(report.attempts, 1_000);
        assert_eq!(service.calls, 1_000);

        let scene = Scene::new(&route(&["A", "B", "C"]), 2.0).with_background(report.vehicles);
        assert_eq!(scene.vehicle_count(), 31);
        let departs: Vec<f64> = scene.sorted_vehicles().iter().map(|v| v.depart).collect();
        assert!(departs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn never_exceeds_limits() {
        for seed in 0..20u64 {
            let mut rng = SimRng::new(seed);
            let mut coin = SimRng::new(seed + 100);
            let mut service = FnService::new(move |n, from, to| {
                if coin.gen_range(0..4) == 0 { always(n, from, to) } else { Ok(None) }
            });
            let sampler = BackgroundSampler { target: 50, max_attempts: 120, ..Default::default() };
            let report = sampler.sample(&mut service, &valid(), &mut rng, |_| {}).unwrap();
            assert!(report.added() <= 50);
            assert!(report.attempts <= 120);
            assert_eq!(report.attempts, service.calls);
        }
    }

    #[test]
    fn departures_in_window_at_tenths() {
        let mut service = FnService::new(always);
        let mut rng = SimRng::new(3);
        let report = BackgroundSampler::default()
            .sample(&mut service, &valid(), &mut rng, |_| {})
            .unwrap();
        for v in &report.vehicles {
            assert!((0.0..200.0).contains(&v.depart), "{}", v.depart);
            let written: f64 = v.depart_attr().parse().unwrap();
            assert_eq!(written, v.depart);
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let run = |seed| {
            let mut service = FnService::new(always);
            let mut rng = SimRng::new(seed);
            BackgroundSampler::default()
                .sample(&mut service, &valid(), &mut rng, |_| {})
                .unwrap()
                .vehicles
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn empty_valid_set() {
        let mut service = FnService::new(always);
        let mut rng = SimRng::new(4);
        let report = BackgroundSampler::default()
            .sample(&mut service, &[], &mut rng, |_| {})
            .unwrap();
        assert_eq!(report.added(), 0);
        assert_eq!(report.attempts, 0);
        assert_eq!(service.calls, 0);
    }

    #[test]
    fn service_failure_aborts() {
        let mut service = FnService::new(|n, from, to| {
            if n < 3 { always(n, from, to) } else { Err(SumoError::Closed) }
        });
        let mut rng = SimRng::new(5);
        let err = BackgroundSampler::default()
            .sample(&mut service, &valid(), &mut rng, |_| {})
            .unwrap_err();
        assert!(matches!(err, SceneError::Routing(SumoError::Closed)));
        assert_eq!(service.calls, 4);
    }
}

// ── XML ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod xml {
    use super::helpers::*;
    use crate::xml::{render_routes, render_settings};
    use crate::{write_scene, Scene, VehicleEntry};

    fn scene_abc() -> Scene {
        Scene::new(&route(&["A", "B", "C"]), 2.0)
    }

    #[test]
    fn highlight_route_document() {
        let xml = text(render_routes(&scene_abc()).unwrap());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<vehicle id="route_highlight" type="highlighted_car" depart="2">"#), "{xml}");
        assert!(xml.contains(r#"edges="A B C""#), "{xml}");
        assert!(xml.contains(r#"<vType id="car" accel="2.6" decel="4.5" sigma="0.5" length="5" maxSpeed="70" color="0,0,1"/>"#), "{xml}");
        assert!(xml.contains(r#"id="highlighted_car""#));
        assert!(xml.trim_end().ends_with("</routes>"));
    }

    #[test]
    fn vehicles_written_in_departure_order() {
        let scene = scene_abc().with_background(vec![
            VehicleEntry::background(0, route(&["D"]), 90.0),
            VehicleEntry::background(1, route(&["B"]), 0.5),
        ]);
        let xml = text(render_routes(&scene).unwrap());
        let pos = |id: &str| xml.find(&format!(r#"id="{id}""#)).unwrap();
        assert!(pos("random_vehicle_1") < pos("route_highlight"));
        assert!(pos("route_highlight") < pos("random_vehicle_0"));
        assert!(xml.contains(r#"depart="0.5""#));
        assert!(xml.contains(r#"depart="90""#));
    }

    #[test]
    fn vtypes_precede_vehicles() {
        let xml = text(render_routes(&scene_abc()).unwrap());
        assert!(xml.find("<vType").unwrap() < xml.find("<vehicle").unwrap());
        assert_eq!(xml.matches("<vType").count(), 2);
    }

    #[test]
    fn settings_select_each_route_edge_once() {
        let scene = Scene::new(&route(&["A", "B", "A", "C"]), 2.0);
        let xml = text(render_settings(&scene).unwrap());
        for id in ["A", "B", "C"] {
            let tag = format!(r#"<selection id="{id}" color="255,0,0" width="4"/>"#);
            assert_eq!(xml.matches(&tag).count(), 1, "{xml}");
        }
        assert_eq!(xml.matches("<selection ").count(), 3);
        assert!(xml.contains(r#"<viewport x="0" y="0" zoom="100"/>"#));
        assert!(xml.contains(r#"<scheme name="real world">"#));
        assert!(xml.contains(r#"<colorScheme name="selection" value="0.7,0.7,0.7"/>"#));
        assert!(xml.contains(r#"<selections friendlyPos="true">"#));
    }

    #[test]
    fn edge_ids_escaped() {
        let scene = Scene::new(&route(&["a&b"]), 2.0);
        let xml = text(render_settings(&scene).unwrap());
        assert!(xml.contains(r#"id="a&amp;b""#), "{xml}");
    }

    #[test]
    fn files_created_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("data").join("route.rou.xml");
        let settings = dir.path().join("data").join("settings.xml");

        std::fs::create_dir_all(routes.parent().unwrap()).unwrap();
        std::fs::write(&routes, "stale").unwrap();

        write_scene(&routes, &settings, &scene_abc()).unwrap();

        let r = std::fs::read_to_string(&routes).unwrap();
        assert!(!r.contains("stale"));
        assert!(r.contains("route_highlight"));
        assert!(std::fs::read_to_string(&settings).unwrap().contains("<viewsettings>"));
    }

    #[test]
    fn parent_directories_created() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("a").join("b").join("route.rou.xml");
        let settings = dir.path().join("c").join("settings.xml");
        write_scene(&routes, &settings, &scene_abc()).unwrap();
        assert!(routes.is_file());
        assert!(settings.is_file());
    }

    #[test]
    fn unusable_settings_dir_leaves_routes_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("route.rou.xml");
        // A regular file where the settings directory should be.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let settings = blocker.join("settings.xml");

        std::fs::write(&routes, "previous").unwrap();
        assert!(write_scene(&routes, &settings, &scene_abc()).is_err());
        assert_eq!(std::fs::read_to_string(&routes).unwrap(), "previous");
    }
}
