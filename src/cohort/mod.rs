//! Cohort statistics: grouping users by (age bucket, interest category,
//! commitment level) and comparing one user against their peer group.
//!
//! Aggregates are materialized in `cohort_statistics` and refreshed by a
//! background worker draining an explicit job queue; write paths enqueue and
//! return without waiting, so comparisons are eventually consistent with the
//! underlying interest rows.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::CohortConfig;
use crate::database::{Database, DbResult};
use crate::types::{IntentLevel, SkillLevel};

/// One discrete age bracket. Boundaries come from configuration; the label is
/// what keys the aggregate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBucket {
    pub label: String,
    pub min_age: i32,
    /// Exclusive upper bound; None for the oldest bucket.
    pub max_age_excl: Option<i32>,
}

impl AgeBucket {
    /// Map an age-range minimum onto its bucket. `bounds` is the ascending
    /// list of lower bounds above the implicit "under" bracket.
    pub fn for_age(age_min: i32, bounds: &[i32]) -> Self {
        let first = bounds.first().copied().unwrap_or(i32::MAX);
        if age_min < first {
            return Self {
                label: format!("under-{}", first),
                min_age: 0,
                max_age_excl: Some(first),
            };
        }

        for (i, &lower) in bounds.iter().enumerate() {
            match bounds.get(i + 1) {
                Some(&next) if age_min < next => {
                    return Self {
                        label: format!("{}-{}", lower, next - 1),
                        min_age: lower,
                        max_age_excl: Some(next),
                    }
                }
                Some(_) => continue,
                None => {
                    return Self {
                        label: format!("{}-plus", lower),
                        min_age: lower,
                        max_age_excl: None,
                    }
                }
            }
        }
        unreachable!("bounds is non-empty and age_min >= first bound")
    }
}

/// A single pending aggregate refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecomputeJob {
    pub bucket: AgeBucket,
    pub category: String,
    pub intent_level: IntentLevel,
}

/// Handle to the recompute worker. Enqueueing never blocks the caller; a
/// full queue drops the job with a log line, since the maintenance endpoint
/// can always backfill.
#[derive(Clone)]
pub struct RecomputeQueue {
    tx: mpsc::Sender<RecomputeJob>,
}

impl RecomputeQueue {
    /// Spawn the worker loop and return the enqueue handle.
    pub fn start(db: Database, queue_depth: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<RecomputeJob>(queue_depth);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(e) = update_cohort_statistics(&db, &job).await {
                    // Background failures are logged, never surfaced to the
                    // request that triggered them.
                    tracing::error!(
                        bucket = %job.bucket.label,
                        category = %job.category,
                        intent_level = job.intent_level.as_str(),
                        "cohort recompute failed: {}",
                        e
                    );
                }
            }
        });
        Self { tx }
    }

    pub fn enqueue(&self, job: RecomputeJob) {
        if let Err(e) = self.tx.try_send(job) {
            tracing::warn!("cohort recompute queue full, dropping job: {}", e);
        }
    }

    /// Queue with no worker attached; jobs land in the returned receiver.
    #[cfg(test)]
    pub fn detached(depth: usize) -> (Self, mpsc::Receiver<RecomputeJob>) {
        let (tx, rx) = mpsc::channel(depth);
        (Self { tx }, rx)
    }
}

/// Enqueue refreshes for a commitment-level change. Membership changed in
/// both the old and new cohort, so both need a recompute; an unchanged level
/// means no membership change and no work.
pub fn schedule_commitment_change(
    queue: &RecomputeQueue,
    bucket: &AgeBucket,
    category: &str,
    old_level: IntentLevel,
    new_level: IntentLevel,
) {
    if old_level == new_level {
        return;
    }
    for level in [old_level, new_level] {
        queue.enqueue(RecomputeJob {
            bucket: bucket.clone(),
            category: category.to_string(),
            intent_level: level,
        });
    }
}

/// Recompute one (bucket, category, level) aggregate from the interest rows.
/// Idempotent: unchanged underlying data produces the same row.
pub async fn update_cohort_statistics(db: &Database, job: &RecomputeJob) -> DbResult<()> {
    let levels = db
        .cohort_member_skill_levels(
            job.bucket.min_age,
            job.bucket.max_age_excl,
            &job.category,
            job.intent_level.as_str(),
        )
        .await?;

    if levels.is_empty() {
        return db
            .delete_cohort_statistics(&job.bucket.label, &job.category, job.intent_level.as_str())
            .await;
    }

    let aggregate = Aggregate::from_levels(&levels);
    db.upsert_cohort_statistics(
        &job.bucket.label,
        &job.category,
        job.intent_level.as_str(),
        aggregate.member_count,
        aggregate.avg_skill_level,
        &aggregate.counts_json(),
    )
    .await
}

/// Recompute every triple present in the interest table. O(distinct triples);
/// used by the maintenance endpoint and initial backfill.
pub async fn update_all_cohort_statistics(db: &Database, cfg: &CohortConfig) -> DbResult<usize> {
    let raw = db.distinct_interest_triples().await?;

    // Distinct age minima can collapse into one bucket; dedupe after mapping.
    let mut jobs: Vec<RecomputeJob> = Vec::new();
    for (age_min, category, intent_level) in raw {
        let Some(intent_level) = IntentLevel::parse(&intent_level) else {
            tracing::warn!("skipping interest row with unknown intent level: {}", intent_level);
            continue;
        };
        let job = RecomputeJob {
            bucket: AgeBucket::for_age(age_min, &cfg.bucket_lower_bounds),
            category,
            intent_level,
        };
        if !jobs.contains(&job) {
            jobs.push(job);
        }
    }

    let count = jobs.len();
    for job in &jobs {
        update_cohort_statistics(db, job).await?;
    }
    Ok(count)
}

/// Enqueue a refresh of every cohort the user belongs to. Used as backfill
/// when a user opts into comparisons, since their rows were previously
/// excluded from the aggregates.
pub async fn schedule_user_recompute(
    db: &Database,
    cfg: &CohortConfig,
    queue: &RecomputeQueue,
    user_id: Uuid,
) -> DbResult<()> {
    let Some(user) = db.find_user(user_id).await? else {
        return Ok(());
    };
    let bucket = AgeBucket::for_age(user.age_range_min, &cfg.bucket_lower_bounds);
    for interest in db.list_interests(user_id).await? {
        let Some(intent_level) = IntentLevel::parse(&interest.intent_level) else {
            continue;
        };
        queue.enqueue(RecomputeJob {
            bucket: bucket.clone(),
            category: interest.category,
            intent_level,
        });
    }
    Ok(())
}

/// In-memory aggregate of a cohort's skill levels.
struct Aggregate {
    member_count: i64,
    avg_skill_level: f64,
    counts: BTreeMap<&'static str, i64>,
}

impl Aggregate {
    fn from_levels(levels: &[String]) -> Self {
        let mut counts: BTreeMap<&'static str, i64> = BTreeMap::new();
        let mut rank_sum = 0i64;
        let mut counted = 0i64;
        for level in levels {
            let Some(parsed) = SkillLevel::parse(level) else {
                tracing::warn!("skipping unknown skill level in aggregate: {}", level);
                continue;
            };
            *counts.entry(parsed.as_str()).or_default() += 1;
            rank_sum += parsed.rank() as i64;
            counted += 1;
        }
        let avg = if counted > 0 {
            rank_sum as f64 / counted as f64
        } else {
            0.0
        };
        Self {
            member_count: counted,
            avg_skill_level: avg,
            counts,
        }
    }

    fn counts_json(&self) -> Value {
        json!(self.counts)
    }
}

/// A single user's standing against their cohort.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub category: String,
    pub age_bucket: String,
    pub intent_level: String,
    pub member_count: i64,
    pub avg_skill_level: f64,
    pub user_skill_level: String,
    /// Share of cohort members with a strictly lower skill level, 0-100.
    pub percentile: f64,
    /// Which statistic the product surfaces as the headline number.
    pub statistic: String,
}

/// Comparison for one of the user's interest categories. None when the user
/// has no interest there or no aggregate has been computed yet for their
/// bucket - absence of data is not an error.
///
/// Opt-in is the caller's responsibility: handlers check the preference flag
/// before calling this.
pub async fn get_user_comparison(
    db: &Database,
    cfg: &CohortConfig,
    user_id: Uuid,
    category: &str,
) -> DbResult<Option<Comparison>> {
    let Some(user) = db.find_user(user_id).await? else {
        return Ok(None);
    };
    let Some(interest) = db.find_interest_by_category(user_id, category).await? else {
        return Ok(None);
    };
    let Some(user_level) = SkillLevel::parse(&interest.skill_level) else {
        return Ok(None);
    };

    let bucket = AgeBucket::for_age(user.age_range_min, &cfg.bucket_lower_bounds);
    let Some(stats) = db
        .find_cohort_statistics(&bucket.label, category, &interest.intent_level)
        .await?
    else {
        return Ok(None);
    };

    let percentile = percentile_from_counts(&stats.skill_level_counts, user_level);
    Ok(Some(Comparison {
        category: category.to_string(),
        age_bucket: stats.age_bucket,
        intent_level: stats.intent_level,
        member_count: stats.member_count,
        avg_skill_level: stats.avg_skill_level,
        user_skill_level: interest.skill_level,
        percentile,
        statistic: cfg.comparison_statistic.clone(),
    }))
}

/// Comparisons across every interest category the user holds. Categories
/// without cohort data are simply absent.
pub async fn get_all_user_comparisons(
    db: &Database,
    cfg: &CohortConfig,
    user_id: Uuid,
) -> DbResult<Vec<Comparison>> {
    let interests = db.list_interests(user_id).await?;
    let mut comparisons = Vec::new();
    for interest in interests {
        if let Some(c) = get_user_comparison(db, cfg, user_id, &interest.category).await? {
            comparisons.push(c);
        }
    }
    Ok(comparisons)
}

/// Percentile = members with a strictly lower skill level / total, 0-100.
fn percentile_from_counts(counts: &Value, user_level: SkillLevel) -> f64 {
    let Some(map) = counts.as_object() else {
        return 0.0;
    };
    let mut below = 0i64;
    let mut total = 0i64;
    for (level, count) in map {
        let count = count.as_i64().unwrap_or(0);
        total += count;
        if let Some(parsed) = SkillLevel::parse(level) {
            if parsed.rank() < user_level.rank() {
                below += count;
            }
        }
    }
    if total == 0 {
        return 0.0;
    }
    below as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: &[i32] = &[13, 18, 25, 35, 50];

    #[test]
    fn buckets_cover_the_whole_range() {
        assert_eq!(AgeBucket::for_age(8, BOUNDS).label, "under-13");
        assert_eq!(AgeBucket::for_age(12, BOUNDS).label, "under-13");
        assert_eq!(AgeBucket::for_age(13, BOUNDS).label, "13-17");
        assert_eq!(AgeBucket::for_age(17, BOUNDS).label, "13-17");
        assert_eq!(AgeBucket::for_age(18, BOUNDS).label, "18-24");
        assert_eq!(AgeBucket::for_age(34, BOUNDS).label, "25-34");
        assert_eq!(AgeBucket::for_age(35, BOUNDS).label, "35-49");
        assert_eq!(AgeBucket::for_age(50, BOUNDS).label, "50-plus");
        assert_eq!(AgeBucket::for_age(90, BOUNDS).label, "50-plus");
    }

    #[test]
    fn bucket_windows_are_half_open() {
        let teen = AgeBucket::for_age(15, BOUNDS);
        assert_eq!(teen.min_age, 13);
        assert_eq!(teen.max_age_excl, Some(18));

        let oldest = AgeBucket::for_age(64, BOUNDS);
        assert_eq!(oldest.min_age, 50);
        assert_eq!(oldest.max_age_excl, None);
    }

    #[test]
    fn aggregate_counts_and_average() {
        let levels: Vec<String> = ["beginner", "beginner", "intermediate", "expert"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let agg = Aggregate::from_levels(&levels);
        assert_eq!(agg.member_count, 4);
        // ranks: 1 + 1 + 3 + 5 = 10
        assert!((agg.avg_skill_level - 2.5).abs() < f64::EPSILON);
        assert_eq!(agg.counts.get("beginner"), Some(&2));
        assert_eq!(agg.counts.get("expert"), Some(&1));
    }

    #[test]
    fn aggregate_skips_unknown_levels() {
        let levels: Vec<String> = ["beginner", "corrupted"].iter().map(|s| s.to_string()).collect();
        let agg = Aggregate::from_levels(&levels);
        assert_eq!(agg.member_count, 1);
    }

    #[test]
    fn percentile_counts_strictly_lower_members() {
        let counts = json!({ "beginner": 4, "intermediate": 3, "expert": 3 });
        // 4 of 10 below intermediate
        let p = percentile_from_counts(&counts, SkillLevel::Intermediate);
        assert!((p - 40.0).abs() < 1e-9);
        // nobody below beginner
        assert_eq!(percentile_from_counts(&counts, SkillLevel::Beginner), 0.0);
        // 7 of 10 below expert
        let p = percentile_from_counts(&counts, SkillLevel::Expert);
        assert!((p - 70.0).abs() < 1e-9);
    }

    #[test]
    fn percentile_of_empty_cohort_is_zero() {
        assert_eq!(percentile_from_counts(&json!({}), SkillLevel::Expert), 0.0);
        assert_eq!(percentile_from_counts(&json!(null), SkillLevel::Expert), 0.0);
    }

    #[tokio::test]
    async fn commitment_change_enqueues_old_and_new() {
        let (queue, mut rx) = RecomputeQueue::detached(8);
        let bucket = AgeBucket::for_age(15, BOUNDS);

        schedule_commitment_change(
            &queue,
            &bucket,
            "music",
            IntentLevel::Casual,
            IntentLevel::Competitive,
        );

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.intent_level, IntentLevel::Casual);
        assert_eq!(second.intent_level, IntentLevel::Competitive);
        assert_eq!(first.category, "music");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unchanged_commitment_enqueues_nothing() {
        let (queue, mut rx) = RecomputeQueue::detached(8);
        let bucket = AgeBucket::for_age(15, BOUNDS);

        schedule_commitment_change(
            &queue,
            &bucket,
            "music",
            IntentLevel::Dedicated,
            IntentLevel::Dedicated,
        );
        assert!(rx.try_recv().is_err());
    }
}
