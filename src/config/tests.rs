use super::*;

#[test]
fn defaults_match_local_stack() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.database.url, DEFAULT_DATABASE_URL);
    assert_eq!(settings.database.max_connections.get(), 10);
    assert_eq!(settings.cache.url, DEFAULT_CACHE_URL);
    assert_eq!(settings.cache.ttl, Duration::from_secs(300));
    assert_eq!(settings.cache.key_prefix, "post:");
    assert_eq!(settings.search.url, DEFAULT_SEARCH_URL);
    assert_eq!(settings.search.index, "posts");
    assert_eq!(settings.posts.tag_search_warn_threshold, 500);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.ttl_seconds = Some(60);

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_ttl_seconds: Some(30),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.cache.ttl, Duration::from_secs(30));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_ttl_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.ttl_seconds = Some(0);

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "cache.ttl_seconds"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn service_urls_must_use_expected_scheme() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("mysql://root@localhost/blog".to_string());
    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, reason }) => {
            assert_eq!(key, "database.url");
            assert!(reason.contains("mysql"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut raw = RawSettings::default();
    raw.cache.url = Some("not a url".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid { key: "cache.url", .. })
    ));
}

#[test]
fn blank_database_url_falls_back_to_default() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.database.url, DEFAULT_DATABASE_URL);
}

#[test]
fn uppercase_index_names_are_rejected() {
    let mut raw = RawSettings::default();
    raw.search.index = Some("Posts".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "search.index",
            ..
        })
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["scriven"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "scriven",
        "serve",
        "--server-host",
        "127.0.0.1",
        "--database-url",
        "postgres://override",
        "--search-index",
        "posts_v2",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("127.0.0.1"));
            assert_eq!(
                serve.overrides.database.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(
                serve.overrides.search.search_index.as_deref(),
                Some("posts_v2")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_reindex_arguments() {
    let args = CliArgs::parse_from([
        "scriven",
        "reindex",
        "--search-url",
        "http://search:9200",
        "--concurrency",
        "8",
    ]);

    match args.command.expect("reindex command") {
        Command::Reindex(reindex) => {
            assert_eq!(
                reindex.search.search_url.as_deref(),
                Some("http://search:9200")
            );
            assert_eq!(reindex.concurrency, 8);
            assert!(reindex.database.database_url.is_none());
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn reindex_concurrency_has_default() {
    let args = CliArgs::parse_from(["scriven", "reindex"]);
    match args.command.expect("reindex command") {
        Command::Reindex(reindex) => assert_eq!(reindex.concurrency, DEFAULT_REINDEX_CONCURRENCY),
        _ => panic!("wrong command parsed"),
    }
}
