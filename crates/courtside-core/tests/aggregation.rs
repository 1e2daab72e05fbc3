mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeZone;
use chrono::Utc;
use common::*;
use courtside_core::domain::{
    ReportOutcome,
    SkipReason,
    SourceReport,
    FALLBACK_PROVENANCE,
};
use courtside_core::infrastructure::config::{
    CourtsideConfig,
    RateLimitConfig,
    SourceFileConfig,
};
use courtside_core::{
    CoreContext,
    CoreError,
    HealthStatus,
    MatchFilter,
};
use courtside_source_api::{
    ErrorKind,
    SourceError,
    SourceRegistry,
};

fn outcome<'a>(sources: &'a [SourceReport], id: &str) -> &'a ReportOutcome {
    &sources
        .iter()
        .find(|report| report.source == id)
        .unwrap_or_else(|| panic!("no report for {id}"))
        .outcome
}

fn tip_off() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 16, 0, 30, 0).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_slow_primary_yields_secondary_teams() {
    let mut config = CourtsideConfig::default();
    source_timeout(&mut config, "espn", 500);

    let ctx = context(
        config,
        vec![
            Arc::new(
                FakeSource::live("espn")
                    .with_teams(league("espn"))
                    .delayed(Duration::from_secs(5)),
            ),
            Arc::new(FakeSource::live("nba").with_teams(league("nba"))),
            Arc::new(seed()),
        ],
    );

    let teams = ctx.data_service.get_teams().await;

    assert_eq!(teams.records.len(), 30);
    assert!(teams.records.iter().all(|r| r.provenance.as_str() == "nba"));
    assert!(teams.records.iter().all(|r| r.data.conference.is_some()));
    assert!(teams.partial);
    assert!(!teams.stale);
    assert!(matches!(
        outcome(&teams.sources, "espn"),
        ReportOutcome::Failed {
            kind: ErrorKind::Timeout,
            ..
        }
    ));
    assert_eq!(
        outcome(&teams.sources, "nba"),
        &ReportOutcome::Ok { records: 30 }
    );
}

#[tokio::test(start_paused = true)]
async fn test_all_live_sources_failing_serves_seed() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(
                FakeSource::live("espn")
                    .with_teams(league("espn"))
                    .failing(SourceError::Unreachable("connection refused".to_string())),
            ),
            Arc::new(
                FakeSource::live("nba")
                    .with_teams(league("nba"))
                    .failing(SourceError::ParseError("unexpected resultSets".to_string())),
            ),
            Arc::new(seed()),
        ],
    );

    let teams = ctx.data_service.get_teams().await;

    assert_eq!(teams.records.len(), 30);
    assert!(teams
        .records
        .iter()
        .all(|r| r.provenance.as_str() == FALLBACK_PROVENANCE));
    assert!(teams.partial);
    assert!(teams.stale);

    let health = ctx.data_service.get_health();
    assert_eq!(health["nba"].last_error_kind, Some(ErrorKind::ParseError));
    assert_eq!(health["espn"].status, HealthStatus::Degraded);
    assert_eq!(health["static-seed"].status, HealthStatus::Healthy);
}

#[tokio::test(start_paused = true)]
async fn test_unconfigured_odds_is_not_partial() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(FakeSource::live("espn").with_games(vec![
                game("401", "BOS", "GSW", tip_off()),
                game("402", "MIA", "LAL", tip_off()),
            ])),
            Arc::new(FakeSource::live("odds-api").with_odds(Vec::new()).unconfigured()),
            Arc::new(seed()),
        ],
    );

    let matches = ctx.data_service.get_matches(&MatchFilter::default()).await;

    assert_eq!(matches.records.len(), 2);
    assert!(matches.records.iter().all(|r| r.data.betting_odds.is_none()));
    assert!(!matches.partial);
    assert!(!matches.stale);
    assert_eq!(
        outcome(&matches.sources, "odds-api"),
        &ReportOutcome::Skipped {
            reason: SkipReason::NotConfigured,
            retry_after_ms: None,
        }
    );

    let health = ctx.data_service.get_health();
    assert_eq!(health["odds-api"].status, HealthStatus::NotConfigured);
    assert_eq!(health["odds-api"].skipped_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_request_deadline_bounds_the_call() {
    let mut config = CourtsideConfig::default();
    config.aggregator.request_timeout_ms = 300;

    let espn = FakeSource::live("espn")
        .with_teams(league("espn"))
        .delayed(Duration::from_secs(3600));
    let nba = FakeSource::live("nba")
        .with_teams(league("nba"))
        .delayed(Duration::from_secs(3600));
    let ctx = context(config, vec![Arc::new(espn), Arc::new(nba), Arc::new(seed())]);

    let started = tokio::time::Instant::now();
    let teams = ctx.data_service.get_teams().await;

    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(teams.partial);
    assert_eq!(teams.records.len(), 30);
    assert!(teams.records.iter().all(|r| r.provenance.is_fallback()));
    for id in ["espn", "nba"] {
        assert!(matches!(
            outcome(&teams.sources, id),
            ReportOutcome::Failed {
                kind: ErrorKind::Timeout,
                ..
            }
        ));
    }
}

#[tokio::test(start_paused = true)]
async fn test_expired_deadline_without_fallback_returns_empty() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![Arc::new(
            FakeSource::live("espn")
                .with_teams(league("espn"))
                .delayed(Duration::from_secs(60)),
        )],
    );

    let teams = ctx
        .data_service
        .get_teams_within(Duration::from_millis(100))
        .await;

    assert!(teams.records.is_empty());
    assert!(teams.partial);
    assert!(!teams.stale);
}

#[tokio::test(start_paused = true)]
async fn test_odds_attach_to_their_fixture_only() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(FakeSource::live("espn").with_games(vec![
                game("401", "BOS", "GS", tip_off()),
                game("402", "MIA", "LAL", tip_off()),
            ])),
            Arc::new(FakeSource::live("odds-api").with_odds(vec![
                quote(
                    "evt-1",
                    "Boston Celtics",
                    "Golden State Warriors",
                    tip_off(),
                    &[(1.5, 2.6), (1.7, 2.4)],
                ),
                // Same pairing two days later must not join
                quote(
                    "evt-2",
                    "Boston Celtics",
                    "Golden State Warriors",
                    tip_off() + chrono::Duration::days(2),
                    &[(1.9, 1.9)],
                ),
            ])),
        ],
    );

    let matches = ctx.data_service.get_matches(&MatchFilter::default()).await;
    assert_eq!(matches.records.len(), 2);

    let boston = matches
        .records
        .iter()
        .find(|r| r.data.key == "20240115:GSW@BOS")
        .unwrap();
    let odds = boston.data.betting_odds.as_ref().unwrap();
    assert_eq!(odds.data.event_id, "evt-1");
    assert_eq!(odds.data.home_price, Some(1.6));
    assert_eq!(odds.data.away_price, Some(2.5));
    assert_eq!(odds.data.bookmaker_count, 2);
    assert_eq!(odds.provenance.as_str(), "odds-api");

    let miami = matches
        .records
        .iter()
        .find(|r| r.data.key == "20240115:LAL@MIA")
        .unwrap();
    assert!(miami.data.betting_odds.is_none());
    assert!(!matches.partial);
}

#[tokio::test(start_paused = true)]
async fn test_team_aliases_collapse_to_one_record() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(
                FakeSource::live("espn").with_teams(vec![team("9", "Golden State Warriors", "GS")]),
            ),
            Arc::new(FakeSource::live("nba").with_teams(vec![team(
                "1610612744",
                "Golden State Warriors",
                "GSW",
            )])),
        ],
    );

    let teams = ctx.data_service.get_teams().await;

    assert_eq!(teams.records.len(), 1);
    assert_eq!(teams.records[0].provenance.as_str(), "espn");
    assert_eq!(teams.records[0].data.id, "9");
    assert_eq!(teams.records[0].data.division.as_deref(), Some("Pacific"));
    assert!(!teams.partial);
}

#[tokio::test(start_paused = true)]
async fn test_evening_game_joins_across_providers() {
    // ESPN carries the real tip-off; stats.nba.com only has GAME_DATE 2024-01-15,
    // which its mapper places at 19:00 Eastern (00:00Z on the 16th)
    let espn_tip = Utc.with_ymd_and_hms(2024, 1, 15, 20, 30, 0).unwrap();
    let nba_tip = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();

    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(
                FakeSource::live("espn").with_games(vec![game("401", "BOS", "GSW", espn_tip)]),
            ),
            Arc::new(FakeSource::live("nba").with_games(vec![game(
                "0022300555",
                "BOS",
                "GSW",
                nba_tip,
            )])),
            Arc::new(FakeSource::live("odds-api").with_odds(vec![quote(
                "evt-1",
                "Boston Celtics",
                "Golden State Warriors",
                espn_tip,
                &[(1.6, 2.4)],
            )])),
        ],
    );

    let filter = MatchFilter {
        from: chrono::NaiveDate::from_ymd_opt(2024, 1, 15),
        to: chrono::NaiveDate::from_ymd_opt(2024, 1, 15),
        ..Default::default()
    };
    let matches = ctx.data_service.get_matches(&filter).await;

    assert_eq!(matches.records.len(), 1);
    let record = &matches.records[0];
    assert_eq!(record.data.key, "20240115:GSW@BOS");
    assert_eq!(record.provenance.as_str(), "espn");
    assert_eq!(record.data.source_id, "401");
    assert!(record.data.betting_odds.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_source_is_skipped() {
    let mut config = CourtsideConfig::default();
    config.sources.insert(
        "espn".to_string(),
        SourceFileConfig {
            rate_limit: Some(RateLimitConfig {
                max_requests: 1,
                window_secs: 60,
            }),
            ..Default::default()
        },
    );

    let espn = FakeSource::live("espn").with_teams(league("espn"));
    let espn_calls = espn.call_counter();
    let ctx = context(
        config,
        vec![
            Arc::new(espn),
            Arc::new(FakeSource::live("nba").with_teams(league("nba"))),
        ],
    );

    let first = ctx.data_service.get_teams().await;
    assert!(!first.partial);
    assert!(first.records.iter().all(|r| r.provenance.as_str() == "espn"));

    let second = ctx.data_service.get_teams().await;
    assert_eq!(espn_calls.load(Ordering::SeqCst), 1);
    assert!(second.partial);
    assert!(second.records.iter().all(|r| r.provenance.as_str() == "nba"));
    match outcome(&second.sources, "espn") {
        ReportOutcome::Skipped {
            reason: SkipReason::RateLimited,
            retry_after_ms: Some(ms),
        } => assert!(*ms > 0 && *ms <= 60_000),
        other => panic!("unexpected outcome {other:?}"),
    }

    // A rate-limit skip is not a failure
    let health = ctx.data_service.get_health();
    assert_eq!(health["espn"].failure_count, 0);
    assert_eq!(health["espn"].skipped_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_metrics_ledger_and_idempotence() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(FakeSource::live("espn").with_games(vec![
                final_game("401", "BOS", "GSW", tip_off(), 110, 100),
                final_game("402", "MIA", "LAL", tip_off(), 101, 99),
                game("403", "DEN", "PHX", tip_off() + chrono::Duration::days(1)),
            ])),
            Arc::new(FakeSource::live("odds-api").with_odds(vec![
                quote(
                    "evt-1",
                    "Boston Celtics",
                    "Golden State Warriors",
                    tip_off(),
                    &[(1.6, 2.4)],
                ),
                quote("evt-2", "Miami Heat", "Los Angeles Lakers", tip_off(), &[(2.7, 1.5)]),
            ])),
        ],
    );

    let first = ctx.data_service.get_metrics().await;
    let second = ctx.data_service.get_metrics().await;

    assert_eq!(first.total_matches, 3);
    assert_eq!(first.matches_with_odds, 2);
    assert_eq!(first.matches_by_status["final"], 2);
    assert_eq!(first.matches_by_status["scheduled"], 1);
    assert_eq!(first.total_picks, 2);
    assert_eq!(first.successful_picks, 1);
    assert!((first.win_rate - 50.0).abs() < 1e-9);
    assert!((first.total_profit - -4.0).abs() < 1e-9);
    assert!((first.current_balance - 96.0).abs() < 1e-9);
    assert!((first.roi - -20.0).abs() < 1e-9);
    assert!((first.average_odds.unwrap() - 1.55).abs() < 1e-9);
    assert!(!first.partial);

    let mut second = second;
    second.generated_at = first.generated_at;
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn test_get_match_by_key_or_source_id() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(
                FakeSource::live("espn").with_games(vec![game("401", "BOS", "GSW", tip_off())]),
            ),
            Arc::new(FakeSource::live("odds-api").with_odds(vec![quote(
                "evt-1",
                "Boston Celtics",
                "Golden State Warriors",
                tip_off(),
                &[(1.6, 2.4)],
            )])),
        ],
    );

    let by_key = ctx.data_service.get_match("20240115:gsw@bos").await;
    let record = by_key.record.unwrap();
    assert_eq!(record.data.source_id, "401");
    assert!(record.data.betting_odds.is_some());

    let by_id = ctx.data_service.get_match("401").await;
    assert_eq!(by_id.record.unwrap().data.key, "20240115:GSW@BOS");

    let missing = ctx.data_service.get_match("20240115:LAL@MIA").await;
    assert!(missing.record.is_none());
    assert!(!missing.partial);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_failures_mark_source_down() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(
                FakeSource::live("espn")
                    .with_teams(league("espn"))
                    .failing(SourceError::Unauthorized("HTTP 401".to_string())),
            ),
            Arc::new(FakeSource::live("nba").with_teams(league("nba"))),
        ],
    );

    for _ in 0..3 {
        ctx.data_service.get_teams().await;
    }

    let health = ctx.data_service.get_health();
    assert_eq!(health["espn"].status, HealthStatus::Down);
    assert_eq!(health["espn"].consecutive_failures, 3);
    assert_eq!(health["espn"].last_error_kind, Some(ErrorKind::Unauthorized));
    assert_eq!(health["nba"].status, HealthStatus::Healthy);
    assert_eq!(health["nba"].success_count, 3);

    let summary = ctx.data_service.get_team_summary().await;
    assert_eq!(summary.sources["espn"].status, HealthStatus::Down);
    assert!(summary.partial);
}

#[tokio::test(start_paused = true)]
async fn test_team_summary_counts() {
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(FakeSource::live("espn").with_teams(league("espn"))),
            Arc::new(FakeSource::live("odds-api").with_odds(Vec::new()).unconfigured()),
            Arc::new(seed()),
        ],
    );

    let summary = ctx.data_service.get_team_summary().await;

    assert_eq!(summary.total_teams, 30);
    assert_eq!(summary.by_conference["East"], 15);
    assert_eq!(summary.by_conference["West"], 15);
    assert_eq!(summary.by_division.len(), 6);
    assert_eq!(summary.by_division["Pacific"], 5);
    assert_eq!(summary.sources.len(), 3);
    assert!(!summary.sources["odds-api"].configured);
    assert_eq!(summary.sources["odds-api"].status, HealthStatus::NotConfigured);
    assert!(!summary.partial);
    assert!(!summary.stale);
}

#[test]
fn test_unknown_source_in_priority_list_fails_startup() {
    let mut config = CourtsideConfig::default();
    config.fallback.teams = vec!["sportradar".to_string()];

    let mut registry = SourceRegistry::new();
    registry
        .register(Arc::new(FakeSource::live("espn").with_teams(Vec::new())))
        .unwrap();

    let err = CoreContext::with_registry(config, registry).err().unwrap();
    assert!(matches!(
        err,
        CoreError::UnknownSourceInPriority { ref source_id, .. } if source_id == "sportradar"
    ));
}

#[test]
fn test_duplicate_source_registration_fails() {
    let mut registry = SourceRegistry::new();
    registry
        .register(Arc::new(FakeSource::live("espn")))
        .unwrap();

    let err = registry
        .register(Arc::new(FakeSource::live("espn")))
        .unwrap_err();
    assert!(matches!(CoreError::from(err), CoreError::DuplicateSource(id) if id == "espn"));
    assert_eq!(registry.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_match_detail_includes_rosters_and_stats() {
    let espn = FakeSource::live("espn")
        .with_games(vec![game("401", "BOS", "GSW", tip_off())])
        .with_rosters(roster("espn", 20), points_per_game(118.5));
    let queries = espn.roster_queries();
    let ctx = context(CourtsideConfig::default(), vec![Arc::new(espn)]);

    let detail = ctx.data_service.get_match_detail("20240115:GSW@BOS").await;

    let record = detail.record.unwrap();
    assert_eq!(record.provenance.as_str(), "espn");
    assert_eq!(record.data.game.source_id, "401");
    assert_eq!(record.data.home.team_key, "BOS");
    assert_eq!(record.data.away.team_key, "GSW");

    let home = &record.data.home;
    assert_eq!(home.roster.records.len(), 15);
    assert!(home.roster.records.iter().all(|r| r.provenance.as_str() == "espn"));
    assert_eq!(home.stats.records[0].data.value, Some(118.5));
    assert!(!detail.partial);
    assert!(!detail.stale);

    // The match came from ESPN, so ESPN gets its own team ids
    let queries = queries.lock().unwrap();
    assert_eq!(queries.len(), 4);
    assert!(queries
        .iter()
        .any(|q| q.team_id.as_deref() == Some("gsw") && q.abbreviation == "GSW"));
    assert!(queries.iter().all(|q| q.team_id.is_some()));
}

#[tokio::test(start_paused = true)]
async fn test_match_detail_survives_roster_failure() {
    let espn = FakeSource::live("espn")
        .with_rosters(roster("espn", 3), points_per_game(110.0))
        .failing(SourceError::Unreachable("connection refused".to_string()));
    let queries = espn.roster_queries();
    let ctx = context(
        CourtsideConfig::default(),
        vec![
            Arc::new(espn),
            Arc::new(FakeSource::live("nba").with_games(vec![game(
                "0022300555",
                "BOS",
                "GSW",
                tip_off(),
            )])),
        ],
    );

    let detail = ctx.data_service.get_match_detail("0022300555").await;

    let record = detail.record.unwrap();
    assert_eq!(record.provenance.as_str(), "nba");
    assert!(record.data.home.roster.records.is_empty());
    assert!(record.data.away.stats.records.is_empty());
    assert!(record.data.home.roster.partial);
    assert!(detail.partial);
    assert!(matches!(
        outcome(&record.data.home.roster.sources, "espn"),
        ReportOutcome::Failed {
            kind: ErrorKind::Unreachable,
            ..
        }
    ));

    // NBA ids mean nothing to ESPN; only the tricode is passed on
    let queries = queries.lock().unwrap();
    assert_eq!(queries.len(), 4);
    assert!(queries.iter().all(|q| q.team_id.is_none()));
    assert!(queries.iter().any(|q| q.abbreviation == "BOS"));
}

#[tokio::test(start_paused = true)]
async fn test_match_detail_for_unknown_match_skips_rosters() {
    let espn = FakeSource::live("espn")
        .with_games(vec![game("401", "BOS", "GSW", tip_off())])
        .with_rosters(roster("espn", 5), Vec::new());
    let queries = espn.roster_queries();
    let ctx = context(CourtsideConfig::default(), vec![Arc::new(espn)]);

    let detail = ctx.data_service.get_match_detail("20240115:LAL@MIA").await;

    assert!(detail.record.is_none());
    assert!(!detail.partial);
    assert!(queries.lock().unwrap().is_empty());
}
