use std::collections::{
    BTreeMap,
    HashMap,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{
    NaiveDate,
    Utc,
};
use courtside_source_api::{
    Capability,
    ErrorKind,
    GameQuery,
    OddsQuery,
    OddsQuote,
    RosterQuery,
    SourceClient,
    SourceRegistry,
    SourceResult,
    Team,
    TeamQuery,
};
use tokio::task::JoinSet;
use tokio::time::{
    timeout,
    Instant,
};

use super::fallback::{
    is_partial,
    is_stale,
    FallbackPolicy,
};
use super::health_tracker::HealthTracker;
use super::rate_limiter::RateLimiter;
use crate::domain::matches::odds_key;
use crate::domain::summary::count_groups;
use crate::domain::team_keys::{
    enrich_team,
    team_key,
};
use crate::domain::{
    metrics,
    Aggregated,
    AggregatedMetrics,
    AttemptState,
    BettingOdds,
    FetchResult,
    HealthRecord,
    HealthStatus,
    LedgerSettings,
    Match,
    MatchDetail,
    MatchFilter,
    Record,
    Selected,
    SkipReason,
    SourceAttempt,
    SourceReport,
    SourceSummary,
    TeamDetail,
    TeamSummary,
    ROSTER_LIMIT,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MATCH_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Overall bound on one aggregation request
    pub request_timeout: Duration,
    pub source_timeouts: HashMap<String, Duration>,
    pub ledger: LedgerSettings,
    pub match_limit: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            source_timeouts: HashMap::new(),
            ledger: LedgerSettings::default(),
            match_limit: DEFAULT_MATCH_LIMIT,
        }
    }
}

type Attempts<T> = Vec<SourceAttempt<Vec<T>>>;

/// Names one side of a match to roster sources
#[derive(Debug, Clone)]
struct TeamLookup {
    /// Source that supplied the match; only it understands `team_id`
    origin: String,
    team_id: String,
    team_key: String,
}

impl TeamLookup {
    fn home(record: &Record<Match>) -> Self {
        Self {
            origin: record.provenance.as_str().to_string(),
            team_id: record.data.home.id.clone(),
            team_key: record.data.home_key.clone(),
        }
    }

    fn away(record: &Record<Match>) -> Self {
        Self {
            origin: record.provenance.as_str().to_string(),
            team_id: record.data.away.id.clone(),
            team_key: record.data.away_key.clone(),
        }
    }

    fn query_for(&self, source_id: &str) -> RosterQuery {
        RosterQuery {
            team_id: (source_id == self.origin).then(|| self.team_id.clone()),
            abbreviation: self.team_key.clone(),
        }
    }
}

/// Fans requests out to every capable source, merges what comes back and
/// records how each source behaved.
///
/// Source failures never escape: every operation answers with the best data
/// available within the request deadline.
pub struct DataService {
    registry: Arc<SourceRegistry>,
    policy: FallbackPolicy,
    limiter: Arc<RateLimiter>,
    health: Arc<HealthTracker>,
    settings: ServiceSettings,
}

impl DataService {
    pub fn new(
        registry: Arc<SourceRegistry>, policy: FallbackPolicy, limiter: Arc<RateLimiter>,
        health: Arc<HealthTracker>, settings: ServiceSettings,
    ) -> Self {
        for source in registry.iter() {
            health.mark_configured(source.id(), source.is_configured());
        }

        Self {
            registry,
            policy,
            limiter,
            health,
            settings,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    fn source_timeout(&self, source_id: &str) -> Duration {
        self.settings
            .source_timeouts
            .get(source_id)
            .copied()
            .unwrap_or(DEFAULT_SOURCE_TIMEOUT)
    }

    /// Dispatch and collect for one capability. Returns one attempt per
    /// consulted source, in priority order.
    async fn fan_out<T, F, Fut>(
        &self, capability: Capability, deadline: Duration, fetch: F,
    ) -> Attempts<T>
    where
        T: Send + 'static,
        F: Fn(Arc<dyn SourceClient>) -> Fut,
        Fut: Future<Output = SourceResult<Vec<T>>> + Send + 'static,
    {
        let entity = capability.as_str();
        let mut settled: HashMap<String, SourceAttempt<Vec<T>>> = HashMap::new();
        let mut in_flight = Vec::new();
        let mut tasks = JoinSet::new();

        for id in self.policy.order(capability) {
            let Some(source) = self.registry.get(id) else {
                continue;
            };
            let tier = source.tier();

            if !source.is_configured() {
                settled.insert(
                    id.to_string(),
                    SourceAttempt::skipped(id, tier, SkipReason::NotConfigured, None),
                );
                continue;
            }

            if let Err(limited) = self.limiter.acquire(id) {
                settled.insert(
                    id.to_string(),
                    SourceAttempt::skipped(
                        id,
                        tier,
                        SkipReason::RateLimited,
                        Some(limited.retry_after),
                    ),
                );
                continue;
            }

            let per_source = self.source_timeout(id);
            let request = fetch(source.clone());
            let source_id = id.to_string();

            tasks.spawn(async move {
                let started = Instant::now();
                let result = match timeout(per_source, request).await {
                    Ok(Ok(value)) => FetchResult::Ok {
                        value,
                        fetched_at: Utc::now(),
                        origin: source_id.clone(),
                    },
                    Ok(Err(e)) => FetchResult::Failed {
                        reason: e.kind(),
                        message: e.message().to_string(),
                    },
                    Err(_elapsed) => FetchResult::Failed {
                        reason: ErrorKind::Timeout,
                        message: format!("No response within {} ms", per_source.as_millis()),
                    },
                };

                SourceAttempt {
                    source: source_id,
                    tier,
                    latency: Some(started.elapsed()),
                    state: AttemptState::Dispatched(result),
                }
            });
            in_flight.push((id.to_string(), tier));
        }

        let collected = timeout(deadline, async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(attempt) => {
                        settled.insert(attempt.source.clone(), attempt);
                    }
                    Err(e) => {
                        tracing::error!(entity, error = %e, "Source task failed");
                    }
                }
            }
        })
        .await;

        let deadline_expired = collected.is_err();
        if deadline_expired {
            tasks.abort_all();
            tracing::warn!(
                entity,
                deadline_ms = deadline.as_millis() as u64,
                "Request deadline expired, abandoning unfinished sources"
            );
        }

        for (id, tier) in in_flight {
            if settled.contains_key(&id) {
                continue;
            }
            let (reason, message) = if deadline_expired {
                (
                    ErrorKind::Timeout,
                    format!("Request deadline of {} ms expired", deadline.as_millis()),
                )
            } else {
                (
                    ErrorKind::Unreachable,
                    "Source task ended without a result".to_string(),
                )
            };
            settled.insert(
                id.clone(),
                SourceAttempt {
                    source: id,
                    tier,
                    latency: deadline_expired.then_some(deadline),
                    state: AttemptState::Dispatched(FetchResult::Failed { reason, message }),
                },
            );
        }

        let attempts: Attempts<T> = self
            .policy
            .order(capability)
            .into_iter()
            .filter_map(|id| settled.remove(id))
            .collect();

        for attempt in &attempts {
            self.health.record_attempt(attempt);
            log_attempt(entity, attempt);
        }

        attempts
    }

    async fn team_attempts(&self, deadline: Duration) -> Attempts<Team> {
        let query = TeamQuery::default();
        self.fan_out(Capability::Teams, deadline, move |source| {
            let query = query.clone();
            async move { source.fetch_teams(&query).await }
        })
        .await
    }

    async fn match_attempts(&self, query: GameQuery, deadline: Duration) -> Attempts<Match> {
        let attempts = self
            .fan_out(Capability::Games, deadline, move |source| {
                let query = query.clone();
                async move { source.fetch_games(&query).await }
            })
            .await;

        attempts
            .into_iter()
            .map(|attempt| {
                let source = attempt.source.clone();
                attempt.map(|games| {
                    games
                        .into_iter()
                        .map(|game| Match::from_game(game, &source))
                        .collect()
                })
            })
            .collect()
    }

    async fn odds_attempts(&self, deadline: Duration) -> Attempts<OddsQuote> {
        let query = OddsQuery::default();
        self.fan_out(Capability::Odds, deadline, move |source| {
            let query = query.clone();
            async move { source.fetch_odds(&query).await }
        })
        .await
    }

    fn odds_by_key(
        &self, attempts: &[SourceAttempt<Vec<OddsQuote>>],
    ) -> HashMap<String, Record<BettingOdds>> {
        self.policy
            .merge_list(Capability::Odds, attempts, |quote, _| odds_key(quote))
            .into_iter()
            .map(|record| {
                let key = odds_key(&record.data);
                (key, record.map(BettingOdds::from_quote))
            })
            .collect()
    }

    pub async fn get_teams(&self) -> Aggregated<Team> {
        self.get_teams_within(self.settings.request_timeout).await
    }

    pub async fn get_teams_within(&self, deadline: Duration) -> Aggregated<Team> {
        let attempts = self.team_attempts(deadline).await;

        let mut records = self
            .policy
            .merge_list(Capability::Teams, &attempts, team_key);
        for record in &mut records {
            enrich_team(&mut record.data);
        }

        Aggregated {
            partial: is_partial(&attempts),
            stale: is_stale(&records),
            sources: reports(&attempts),
            records,
        }
    }

    pub async fn get_matches(&self, filter: &MatchFilter) -> Aggregated<Match> {
        self.get_matches_within(filter, self.settings.request_timeout)
            .await
    }

    pub async fn get_matches_within(
        &self, filter: &MatchFilter, deadline: Duration,
    ) -> Aggregated<Match> {
        let mut matches = self.collect_matches(filter, deadline).await;
        matches
            .records
            .truncate(filter.limit.unwrap_or(self.settings.match_limit));
        matches
    }

    /// Merged, filtered and sorted matches with odds attached; no limit
    async fn collect_matches(
        &self, filter: &MatchFilter, deadline: Duration,
    ) -> Aggregated<Match> {
        let query = GameQuery {
            from: filter.from,
            to: filter.to,
        };

        let (game_attempts, odds_attempts) = tokio::join!(
            self.match_attempts(query, deadline),
            self.odds_attempts(deadline)
        );

        let mut records = self
            .policy
            .merge_list(Capability::Games, &game_attempts, |m, _| m.key.clone());
        records.retain(|record| filter.matches(&record.data));

        let mut odds = self.odds_by_key(&odds_attempts);
        for record in &mut records {
            record.data.betting_odds = odds.remove(&record.data.key);
        }

        records.sort_by(|a, b| {
            a.data
                .scheduled_at
                .cmp(&b.data.scheduled_at)
                .then_with(|| a.data.key.cmp(&b.data.key))
        });

        let mut sources = reports(&game_attempts);
        sources.extend(reports(&odds_attempts));

        Aggregated {
            partial: is_partial(&game_attempts) || is_partial(&odds_attempts),
            stale: matches_stale(&records),
            sources,
            records,
        }
    }

    /// Looks a match up by source-local id or natural key
    pub async fn get_match(&self, id: &str) -> Selected<Match> {
        let id = id.trim();
        let day = key_date(id);
        let query = GameQuery {
            from: day,
            to: day,
        };
        let deadline = self.settings.request_timeout;

        let (game_attempts, odds_attempts) = tokio::join!(
            self.match_attempts(query, deadline),
            self.odds_attempts(deadline)
        );

        let mut record = self
            .policy
            .select_one(Capability::Games, &game_attempts, |m| {
                m.source_id == id || m.key.eq_ignore_ascii_case(id)
            });

        if let Some(record) = record.as_mut() {
            record.data.betting_odds = self
                .odds_by_key(&odds_attempts)
                .remove(&record.data.key);
        }

        let mut sources = reports(&game_attempts);
        sources.extend(reports(&odds_attempts));

        Selected {
            partial: is_partial(&game_attempts) || is_partial(&odds_attempts),
            stale: record
                .as_ref()
                .is_some_and(|r| matches_stale(std::slice::from_ref(r))),
            sources,
            record,
        }
    }

    /// A match with both teams' rosters (at most [`ROSTER_LIMIT`] players) and
    /// season statistics. Roster lookups get whatever remains of the request
    /// deadline after the match itself resolved.
    pub async fn get_match_detail(&self, id: &str) -> Selected<MatchDetail> {
        let started = Instant::now();
        let selected = self.get_match(id).await;
        let Some(record) = selected.record else {
            return Selected {
                record: None,
                partial: selected.partial,
                stale: selected.stale,
                sources: selected.sources,
            };
        };

        let deadline = self
            .settings
            .request_timeout
            .saturating_sub(started.elapsed());
        let (home, away) = tokio::join!(
            self.team_detail(TeamLookup::home(&record), deadline),
            self.team_detail(TeamLookup::away(&record), deadline)
        );

        Selected {
            partial: selected.partial || home.partial() || away.partial(),
            stale: selected.stale || home.stale() || away.stale(),
            sources: selected.sources,
            record: Some(record.map(|game| MatchDetail { game, home, away })),
        }
    }

    async fn team_detail(&self, lookup: TeamLookup, deadline: Duration) -> TeamDetail {
        let roster_lookup = lookup.clone();
        let stats_lookup = lookup.clone();

        let (roster_attempts, stats_attempts) = tokio::join!(
            self.fan_out(Capability::Rosters, deadline, move |source| {
                let query = roster_lookup.query_for(source.id());
                async move { source.fetch_roster(&query).await }
            }),
            self.fan_out(Capability::Rosters, deadline, move |source| {
                let query = stats_lookup.query_for(source.id());
                async move { source.fetch_team_stats(&query).await }
            })
        );

        let mut players = self
            .policy
            .first_answer(Capability::Rosters, &roster_attempts);
        players.truncate(ROSTER_LIMIT);
        let stats = self
            .policy
            .first_answer(Capability::Rosters, &stats_attempts);

        TeamDetail {
            team_key: lookup.team_key,
            roster: Aggregated {
                partial: is_partial(&roster_attempts),
                stale: is_stale(&players),
                sources: reports(&roster_attempts),
                records: players,
            },
            stats: Aggregated {
                partial: is_partial(&stats_attempts),
                stale: is_stale(&stats),
                sources: reports(&stats_attempts),
                records: stats,
            },
        }
    }

    pub async fn get_metrics(&self) -> AggregatedMetrics {
        let matches = self
            .collect_matches(&MatchFilter::default(), self.settings.request_timeout)
            .await;

        metrics::compute(
            &matches.records,
            self.settings.ledger,
            matches.partial,
            matches.stale,
        )
    }

    pub async fn get_team_summary(&self) -> TeamSummary {
        let teams = self.get_teams().await;
        let (by_conference, by_division) = count_groups(&teams.records);

        let sources = self
            .registry
            .iter()
            .map(|source| {
                let configured = source.is_configured();
                let status = self
                    .health
                    .get(source.id())
                    .map(|record| record.status)
                    .unwrap_or(if configured {
                        HealthStatus::Unknown
                    } else {
                        HealthStatus::NotConfigured
                    });

                (
                    source.id().to_string(),
                    SourceSummary {
                        name: source.metadata().name.clone(),
                        tier: source.tier(),
                        configured,
                        status,
                    },
                )
            })
            .collect();

        TeamSummary {
            total_teams: teams.records.len(),
            by_conference,
            by_division,
            sources,
            partial: teams.partial,
            stale: teams.stale,
        }
    }

    /// Health counters only; never contacts a source
    pub fn get_health(&self) -> BTreeMap<String, HealthRecord> {
        self.health.snapshot()
    }
}

fn reports<T>(attempts: &[SourceAttempt<Vec<T>>]) -> Vec<SourceReport> {
    attempts
        .iter()
        .map(|attempt| attempt.report(attempt.ok().map_or(0, |(items, _)| items.len())))
        .collect()
}

fn matches_stale(records: &[Record<Match>]) -> bool {
    is_stale(records)
        || records
            .iter()
            .filter_map(|r| r.data.betting_odds.as_ref())
            .any(Record::is_stale)
}

/// Calendar date carried by a natural key (`yyyymmdd:...`)
fn key_date(id: &str) -> Option<NaiveDate> {
    let (date, teams) = id.split_once(':')?;
    if !teams.contains('@') {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}

fn log_attempt<T>(entity: &str, attempt: &SourceAttempt<Vec<T>>) {
    let latency_ms = attempt.latency.map(|d| d.as_millis() as u64);

    match &attempt.state {
        AttemptState::Dispatched(FetchResult::Ok { value, .. }) => {
            tracing::debug!(
                source = %attempt.source,
                entity,
                records = value.len(),
                latency_ms,
                "Source fetch succeeded"
            );
        }
        AttemptState::Dispatched(FetchResult::Failed { reason, message }) => {
            tracing::warn!(
                source = %attempt.source,
                entity,
                kind = reason.as_str(),
                latency_ms,
                error = %message,
                "Source fetch failed"
            );
        }
        AttemptState::Skipped {
            reason: SkipReason::RateLimited,
            retry_after,
        } => {
            tracing::info!(
                source = %attempt.source,
                entity,
                retry_after_ms = retry_after.map(|d| d.as_millis() as u64),
                "Source skipped, rate limit reached"
            );
        }
        AttemptState::Skipped {
            reason: SkipReason::NotConfigured,
            ..
        } => {
            tracing::debug!(source = %attempt.source, entity, "Source skipped, not configured");
        }
    }
}
