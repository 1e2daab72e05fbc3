use std::collections::{
    HashMap,
    HashSet,
};

use courtside_source_api::{
    Capability,
    SourceRegistry,
    SourceTier,
};

use crate::domain::{
    CoreError,
    CoreResult,
    Provenance,
    Record,
    SourceAttempt,
};

const CAPABILITIES: [Capability; 4] = [
    Capability::Teams,
    Capability::Games,
    Capability::Odds,
    Capability::Rosters,
];

/// Decides which obtained results win. Never performs I/O.
///
/// Each capability has a fixed source order: listed live sources, then
/// unlisted live sources in registration order, then fallback-tier sources.
#[derive(Debug, Clone)]
pub struct FallbackPolicy {
    orders: HashMap<Capability, Vec<(String, SourceTier)>>,
}

impl FallbackPolicy {
    pub fn from_priorities(
        registry: &SourceRegistry, priorities: &[(Capability, Vec<String>)],
    ) -> CoreResult<Self> {
        let mut orders = HashMap::new();

        for capability in CAPABILITIES {
            let listed = priorities
                .iter()
                .find(|(c, _)| *c == capability)
                .map(|(_, ids)| ids.as_slice())
                .unwrap_or_default();

            orders.insert(capability, Self::resolve(registry, capability, listed)?);
        }

        Ok(Self { orders })
    }

    fn resolve(
        registry: &SourceRegistry, capability: Capability, listed: &[String],
    ) -> CoreResult<Vec<(String, SourceTier)>> {
        let mut seen = HashSet::new();
        let mut ranked = Vec::new();

        for id in listed {
            let Some(source) = registry.get(id) else {
                return Err(CoreError::UnknownSourceInPriority {
                    entity: capability.as_str().to_string(),
                    source_id: id.clone(),
                });
            };
            if !source.capabilities().supports(capability) {
                tracing::warn!(
                    source = %id,
                    entity = capability.as_str(),
                    "Source listed in priority does not provide this entity, ignoring"
                );
                continue;
            }
            if seen.insert(id.clone()) {
                ranked.push((id.clone(), source.tier()));
            }
        }

        for source in registry.with_capability(capability) {
            if seen.insert(source.id().to_string()) {
                ranked.push((source.id().to_string(), source.tier()));
            }
        }

        // Stable, so list order survives within each tier
        ranked.sort_by_key(|(_, tier)| matches!(tier, SourceTier::Fallback));
        Ok(ranked)
    }

    /// Source ids consulted for a capability, highest priority first
    pub fn order(&self, capability: Capability) -> Vec<&str> {
        self.orders
            .get(&capability)
            .map(|ranked| ranked.iter().map(|(id, _)| id.as_str()).collect())
            .unwrap_or_default()
    }

    fn rank(&self, capability: Capability, source: &str) -> usize {
        self.orders
            .get(&capability)
            .and_then(|ranked| ranked.iter().position(|(id, _)| id == source))
            .unwrap_or(usize::MAX)
    }

    fn by_rank<'a, T>(
        &self, capability: Capability, attempts: &'a [SourceAttempt<Vec<T>>],
    ) -> Vec<&'a SourceAttempt<Vec<T>>> {
        let mut ranked: Vec<_> = attempts.iter().collect();
        ranked.sort_by(|a, b| {
            self.rank(capability, &a.source)
                .cmp(&self.rank(capability, &b.source))
                .then_with(|| a.source.cmp(&b.source))
        });
        ranked
    }

    /// Union of live `Ok` results deduplicated by natural key, the
    /// highest-priority version winning each key. Fallback results are used
    /// only when no live source returned `Ok`.
    pub fn merge_list<T, K>(
        &self, capability: Capability, attempts: &[SourceAttempt<Vec<T>>], key: K,
    ) -> Vec<Record<T>>
    where
        T: Clone,
        K: Fn(&T, &str) -> String,
    {
        let ranked = self.by_rank(capability, attempts);
        let live_ok = ranked
            .iter()
            .any(|a| a.tier == SourceTier::Live && a.ok().is_some());
        let tier = if live_ok {
            SourceTier::Live
        } else {
            SourceTier::Fallback
        };

        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for attempt in ranked.into_iter().filter(|a| a.tier == tier) {
            let Some((items, fetched_at)) = attempt.ok() else {
                continue;
            };
            let provenance = Provenance::for_attempt(&attempt.source, attempt.tier);

            for item in items {
                if seen.insert(key(item, &attempt.source)) {
                    merged.push(Record::new(item.clone(), provenance.clone(), fetched_at));
                }
            }
        }

        merged
    }

    /// Highest-priority live `Ok` result holding a matching entity, else the
    /// fallback tier's, else `None`
    pub fn select_one<T, P>(
        &self, capability: Capability, attempts: &[SourceAttempt<Vec<T>>], predicate: P,
    ) -> Option<Record<T>>
    where
        T: Clone,
        P: Fn(&T) -> bool,
    {
        let ranked = self.by_rank(capability, attempts);

        [SourceTier::Live, SourceTier::Fallback]
            .into_iter()
            .find_map(|tier| {
                ranked.iter().filter(|a| a.tier == tier).find_map(|attempt| {
                    let (items, fetched_at) = attempt.ok()?;
                    let item = items.iter().find(|item| predicate(item))?;
                    Some(Record::new(
                        item.clone(),
                        Provenance::for_attempt(&attempt.source, attempt.tier),
                        fetched_at,
                    ))
                })
            })
    }

    /// Provenance-tagged records of the single best-ranked source that answered,
    /// live tier first. For payloads that are only meaningful whole, like a roster.
    pub fn first_answer<T: Clone>(
        &self, capability: Capability, attempts: &[SourceAttempt<Vec<T>>],
    ) -> Vec<Record<T>> {
        let ranked = self.by_rank(capability, attempts);

        [SourceTier::Live, SourceTier::Fallback]
            .into_iter()
            .find_map(|tier| {
                ranked.iter().filter(|a| a.tier == tier).find_map(|attempt| {
                    let (items, fetched_at) = attempt.ok()?;
                    let provenance = Provenance::for_attempt(&attempt.source, attempt.tier);
                    Some(
                        items
                            .iter()
                            .map(|item| Record::new(item.clone(), provenance.clone(), fetched_at))
                            .collect::<Vec<_>>(),
                    )
                })
            })
            .unwrap_or_default()
    }
}

/// A configured source, live or fallback, did not contribute
pub fn is_partial<T>(attempts: &[SourceAttempt<T>]) -> bool {
    attempts.iter().any(SourceAttempt::did_not_contribute)
}

pub fn is_stale<T>(records: &[Record<T>]) -> bool {
    records.iter().any(Record::is_stale)
}


#[cfg(test)]
mod proptests {
    use courtside_source_api::ErrorKind;
    use proptest::prelude::*;

    use super::tests::{
        by_value,
        failed,
        ok,
        registry,
    };
    use super::*;

    const LIVE: [&str; 2] = ["espn", "nba"];

    fn attempt_strategy() -> impl Strategy<Value = Vec<SourceAttempt<Vec<String>>>> {
        (
            proptest::collection::vec(any::<bool>(), 2),
            any::<bool>(),
            proptest::collection::vec(0usize..=4, 2),
        )
            .prop_map(|(live_ok, seed_ok, sizes)| {
                let pool = ["BOS", "LAL", "MIA", "DEN", "PHX"];
                let mut attempts: Vec<_> = LIVE
                    .iter()
                    .zip(live_ok)
                    .zip(sizes)
                    .map(|((id, ok_flag), n)| {
                        if ok_flag {
                            ok(id, SourceTier::Live, &pool[..n])
                        } else {
                            failed(id, ErrorKind::Timeout)
                        }
                    })
                    .collect();
                if seed_ok {
                    attempts.push(ok("static-seed", SourceTier::Fallback, &pool));
                }
                attempts
            })
    }

    proptest! {
        /// Property: provenance per key is the highest-priority `Ok` source,
        /// whatever order the attempts arrive in
        #[test]
        fn test_merge_is_order_independent(
            attempts in attempt_strategy(),
            rotation in 0usize..3,
        ) {
            let policy = FallbackPolicy::from_priorities(&registry(), &[]).unwrap();
            let expected = policy.merge_list(Capability::Teams, &attempts, by_value);

            let mut shuffled = attempts.clone();
            let len = shuffled.len();
            shuffled.rotate_left(rotation % len.max(1));
            shuffled.reverse();
            let merged = policy.merge_list(Capability::Teams, &shuffled, by_value);

            prop_assert_eq!(&merged, &expected);

            let first_ok = LIVE
                .iter()
                .find(|id| attempts.iter().any(|a| a.source == **id && a.ok().is_some()));
            for record in &merged {
                let winner = LIVE
                    .iter()
                    .find(|id| {
                        attempts.iter().any(|a| {
                            a.source == **id
                                && a.ok().is_some_and(|(items, _)| items.contains(&record.data))
                        })
                    })
                    .copied()
                    .unwrap_or(crate::domain::FALLBACK_PROVENANCE);
                prop_assert_eq!(record.provenance.as_str(), winner);
            }
            if first_ok.is_some() {
                prop_assert!(!is_stale(&merged));
            }
        }
    }
}
