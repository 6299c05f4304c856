#[cfg(test)]
mod tests {
    use crate::*;
    use serde_json::json;
    use web_time::Duration;

    fn tabs_with_stack() -> NavigationNode {
        NavigationNode::branch(
            1,
            vec![
                NavigationNode::leaf("home.index", "tab-0"),
                NavigationNode::branch(
                    2,
                    vec![
                        NavigationNode::leaf("account.list", "s-0"),
                        NavigationNode::leaf("account.detail", "s-1"),
                        NavigationNode::branch(0, vec![NavigationNode::leaf("account.modal", "s-2")]),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_resolve_nested_navigators() {
        let scene = resolve_active_leaf(Some(&tabs_with_stack()));
        assert_eq!(scene, SceneSnapshot::new("account.modal", "s-2"));
    }

    #[test]
    fn test_resolve_absent_state() {
        assert!(resolve_active_leaf(None).is_empty());
    }

    #[test]
    fn test_resolve_single_leaf() {
        let leaf = NavigationNode::leaf("a.list", "k1").with_param("id", 3);
        let active = try_resolve_active_leaf(&leaf).unwrap();
        assert_eq!(active.route_name, "a.list");
        assert_eq!(active.instance_key, "k1");
        assert_eq!(active.params.get("id"), Some(&json!(3)));
    }

    #[test]
    fn test_resolve_deep_tree() {
        let mut node = NavigationNode::leaf("deep.scene", "bottom");
        for i in 0..1_000 {
            node = NavigationNode::branch(1, vec![NavigationNode::leaf("x.y", format!("side-{i}")), node]);
        }
        let scene = resolve_active_leaf(Some(&node));
        assert_eq!(scene.route_name(), Some("deep.scene"));
        assert_eq!(scene.instance_key(), Some("bottom"));
    }

    #[test]
    fn test_index_out_of_range() {
        let node = NavigationNode::branch(
            0,
            vec![NavigationNode::branch(3, vec![NavigationNode::leaf("a.b", "k")])],
        );
        assert_eq!(
            try_resolve_active_leaf(&node),
            Err(NavStateError::ActiveIndexOutOfRange {
                index: 3,
                len: 1,
                depth: 1
            })
        );
        assert!(resolve_active_leaf(Some(&node)).is_empty());
    }

    #[test]
    fn test_empty_branch_and_incomplete_leaf() {
        let empty = NavigationNode::branch(0, vec![]);
        assert_eq!(
            try_resolve_active_leaf(&empty),
            Err(NavStateError::EmptyBranch { depth: 0 })
        );

        let no_key: NavigationNode = from_json(r#"{"routeName": "a.list"}"#).unwrap();
        assert_eq!(
            try_resolve_active_leaf(&no_key),
            Err(NavStateError::MissingInstanceKey)
        );

        let nothing: NavigationNode = from_json("{}").unwrap();
        assert_eq!(
            try_resolve_active_leaf(&nothing),
            Err(NavStateError::MissingRouteName)
        );
    }

    #[test]
    fn test_host_state_json() {
        let state: NavigationNode = from_json(
            r#"{
                "key": "root",
                "isTransitioning": false,
                "index": 1,
                "routes": [
                    {"routeName": "a.list", "key": "k1", "params": null},
                    {"routeName": "b.detail", "key": "k2", "params": {"id": 42}}
                ]
            }"#,
        )
        .unwrap();
        let active = try_resolve_active_leaf(&state).unwrap();
        assert_eq!(active.snapshot(), SceneSnapshot::new("b.detail", "k2"));
        assert_eq!(active.params.get("id"), Some(&json!(42)));
    }

    #[test]
    fn test_branch_with_unusable_index() {
        for index in ["-1", "null", "\"0\"", "1.5"] {
            let state: NavigationNode = from_json(&format!(
                r#"{{"routeName": "tabs.root", "key": "root", "index": {index},
                    "routes": [{{"routeName": "a.list", "key": "k1"}}]}}"#
            ))
            .unwrap();
            assert!(!state.is_leaf(), "index {index}");
            assert_eq!(
                try_resolve_active_leaf(&state),
                Err(NavStateError::InvalidActiveIndex { depth: 0 })
            );
            assert!(resolve_active_leaf(Some(&state)).is_empty());
        }

        let no_index: NavigationNode =
            from_json(r#"{"routeName": "tabs.root", "key": "root", "routes": [{"routeName": "a.list", "key": "k1"}]}"#)
                .unwrap();
        assert!(resolve_active_leaf(Some(&no_index)).is_empty());
    }

    #[test]
    fn test_action_json() {
        let a: NavAction = from_json(
            r#"{"type": "Navigation/RESET", "index": 0,
                "actions": [{"type": "Navigation/NAVIGATE", "routeName": "b.detail", "params": {"id": 42}}]}"#,
        )
        .unwrap();
        assert_eq!(a.kind, ActionKind::Reset);
        assert_eq!(a.actions[0].kind, ActionKind::Navigate);

        let custom: NavAction = from_json(r#"{"type": "account/LOADED"}"#).unwrap();
        assert_eq!(custom.kind, ActionKind::Other("account/LOADED".into()));
        assert_eq!(custom.kind.to_string(), "account/LOADED");
    }

    #[test]
    fn test_transition_params_from_action() {
        let nav = NavAction::navigate().with_param("id", 7);
        assert_eq!(nav.transition_params().get("id"), Some(&json!(7)));

        let reset = NavAction::reset(vec![
            NavAction::navigate().with_param("id", 42),
            NavAction::navigate().with_param("id", 99),
        ])
        .with_param("ignored", true);
        let params = reset.transition_params();
        assert_eq!(params.get("id"), Some(&json!(42)));
        assert!(!params.contains_key("ignored"));

        assert!(NavAction::reset(vec![]).transition_params().is_empty());
        assert!(NavAction::complete_transition().transition_params().is_empty());
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("account", "detail", '.').unwrap(), "account.detail");
        // "a.b" + "c" would collide with "a" + "b.c"
        assert_eq!(
            canonical_name("a.b", "c", '.'),
            Err(RouteError::SeparatorInModule("a.b".into()))
        );
        assert_eq!(canonical_name("a", "b.c", '.').unwrap(), "a.b.c");
        assert_eq!(canonical_name("", "c", '.'), Err(RouteError::EmptyModule));
        assert_eq!(canonical_name("a", "", '.'), Err(RouteError::EmptyScene));
    }

    #[test]
    fn test_canonical_url_key_order() {
        let cfg = TrackerConfig::default();
        let p1: Params = from_json(r#"{"b": 2, "a": "x", "c": [1, 2]}"#).unwrap();
        let p2: Params = from_json(r#"{"c": [1, 2], "a": "x", "b": 2}"#).unwrap();
        let u1 = canonical_url("b.detail", &p1, &cfg);
        assert_eq!(u1, canonical_url("b.detail", &p2, &cfg));
        insta::assert_snapshot!(u1, @"b.detail?a=x&b=2&c=%5B1%2C2%5D");
    }

    #[test]
    fn test_canonical_url_filters_internal_params() {
        let cfg = TrackerConfig {
            internal_params: vec!["transitionKey".into()],
            ..TrackerConfig::default()
        };
        let params: Params =
            from_json(r#"{"id": 42, "_navKey": "abc", "transitionKey": 1, "q": "a b&c"}"#).unwrap();
        assert_eq!(
            canonical_url("b.detail", &params, &cfg),
            "b.detail?id=42&q=a%20b%26c"
        );
        assert_eq!(canonical_url("b.detail", &Params::new(), &cfg), "b.detail");
    }

    #[test]
    fn test_canonical_url_string_and_number_differ() {
        let cfg = TrackerConfig::default();
        let text: Params = from_json(r#"{"id": "42"}"#).unwrap();
        let number: Params = from_json(r#"{"id": 42}"#).unwrap();
        assert_eq!(canonical_url("b.detail", &text, &cfg), "b.detail?id=%2242%22");
        assert_eq!(canonical_url("b.detail", &number, &cfg), "b.detail?id=42");

        let flag: Params = from_json(r#"{"on": "true", "off": false, "tag": "new"}"#).unwrap();
        assert_eq!(
            canonical_url("b.detail", &flag, &cfg),
            "b.detail?off=false&on=%22true%22&tag=new"
        );
    }

    #[test]
    fn test_route_identity_equality() {
        let cfg = TrackerConfig::default();
        let params: Params = from_json(r#"{"id": 1}"#).unwrap();
        let a = RouteIdentity::new("b.detail", &params, &cfg);
        let b = RouteIdentity::from_parts("b.detail", "b.detail?id=1");
        assert_eq!(a, b);
        assert_ne!(a, RouteIdentity::from_parts("b.detail", "b.detail"));
        assert_eq!(RouteIdentity::null(&cfg).canonical_url, "null");
    }

    #[test]
    fn test_config_partial() {
        let cfg: TrackerConfig = from_json(r#"{"max_in_flight_timings": 4}"#).unwrap();
        assert_eq!(cfg.max_in_flight_timings, 4);
        assert_eq!(cfg.route_separator, '.');
        assert_eq!(cfg.max_pending_resumes, 256);
        assert!(cfg.report_pages);
        assert!(cfg.is_internal_param("_hidden"));
        assert!(!cfg.is_internal_param("id"));
    }

    #[test]
    fn test_clock_deterministic() {
        let clock = TestClock::default();
        let t0 = clock.now();
        let shared = clock.clone();
        shared.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - t0, Duration::from_millis(250));
    }
}
