//! Views derived from the candidate repository: the recruiter leaderboard and
//! candidate reassignment.
//!
//! Bulk reassignment issues one write per candidate without an enclosing
//! transaction. A failure part way through leaves earlier writes in place and
//! is reported in the [`ReassignmentOutcome`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::store::{CandidateFilter, Store};
use crate::types::{CandidateStatus, LeaderboardEntry, ReassignFailure, ReassignmentOutcome};
use crate::validation::ValidationErrors;

fn rate(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Per-recruiter pipeline counts for every active admin and recruiter,
/// best success rate first. Ties go to the larger book, then the lower id.
pub fn leaderboard(store: &dyn Store) -> Result<Vec<LeaderboardEntry>> {
    let mut entries = Vec::new();

    for recruiter in store.list_recruiters()? {
        let candidates = store.search_candidates(&CandidateFilter::new().recruiter(recruiter.id))?;

        let count = |status: CandidateStatus| {
            candidates.iter().filter(|c| c.status == status).count() as i64
        };
        let total = candidates.len() as i64;
        let hired = count(CandidateStatus::Hired);
        let interview = count(CandidateStatus::Interview);
        let offer = count(CandidateStatus::Offer);
        let rejected = count(CandidateStatus::Rejected);

        entries.push(LeaderboardEntry {
            recruiter_id: recruiter.id,
            recruiter_name: recruiter.full_name,
            total,
            hired,
            interview,
            offer,
            rejected,
            success_rate: rate(hired, total),
            conversion_rate: rate(interview + offer + hired, total),
        });
    }

    entries.sort_by(|a, b| {
        b.success_rate
            .partial_cmp(&a.success_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.recruiter_id.cmp(&b.recruiter_id))
    });

    Ok(entries)
}

/// `None` unassigns. Otherwise the target must be an active admin or recruiter.
pub fn check_recruiter_target(store: &dyn Store, target: Option<i64>) -> Result<()> {
    let Some(id) = target else {
        return Ok(());
    };

    match store.get_user(id)? {
        Some(user) if user.is_active && user.role.is_recruiter() => Ok(()),
        _ => Err(ValidationErrors::single(
            "recruiter_id",
            format!("User {id} is not an active admin or recruiter"),
        )
        .into()),
    }
}

pub fn reassign_candidate(
    store: &dyn Store,
    candidate_id: i64,
    target: Option<i64>,
    now: DateTime<Utc>,
) -> Result<()> {
    check_recruiter_target(store, target)?;
    store.set_candidate_recruiter(candidate_id, target, now)
}

/// Reassigns each candidate in turn and counts the outcome. Only an invalid
/// target fails the whole call.
pub fn reassign_candidates(
    store: &dyn Store,
    candidate_ids: &[i64],
    target: Option<i64>,
    now: DateTime<Utc>,
) -> Result<ReassignmentOutcome> {
    check_recruiter_target(store, target)?;

    let mut outcome = ReassignmentOutcome {
        attempted: candidate_ids.len(),
        ..Default::default()
    };

    for &candidate_id in candidate_ids {
        match store.set_candidate_recruiter(candidate_id, target, now) {
            Ok(()) => outcome.succeeded += 1,
            Err(e) => {
                let reason = match e {
                    Error::NotFound => "candidate not found".to_string(),
                    other => {
                        tracing::warn!(candidate_id, "reassignment failed: {other}");
                        other.to_string()
                    }
                };
                outcome.failed.push(ReassignFailure { candidate_id, reason });
            }
        }
    }

    tracing::info!(
        attempted = outcome.attempted,
        succeeded = outcome.succeeded,
        failed = outcome.failed.len(),
        target = ?target,
        "bulk reassignment finished"
    );

    Ok(outcome)
}

/// Moves every candidate currently owned by `from` to `target`.
pub fn reassign_from(
    store: &dyn Store,
    from: i64,
    target: Option<i64>,
    now: DateTime<Utc>,
) -> Result<ReassignmentOutcome> {
    let ids: Vec<i64> = store
        .search_candidates(&CandidateFilter::new().recruiter(from))?
        .into_iter()
        .map(|c| c.id)
        .collect();

    reassign_candidates(store, &ids, target, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::store::SqliteStore;
    use crate::types::{CandidateInput, NewCandidate, NewUser, Role, User};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn test_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn add_user(store: &SqliteStore, username: &str, role: Role) -> User {
        store
            .create_user(&NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "h".to_string(),
                full_name: username.to_uppercase(),
                role,
                created_at: now(),
            })
            .unwrap()
    }

    fn add_candidates(store: &SqliteStore, recruiter: Option<i64>, statuses: &[CandidateStatus]) -> Vec<i64> {
        statuses
            .iter()
            .map(|&status| {
                let n = store.list_candidates().unwrap().len();
                store
                    .create_candidate(&NewCandidate {
                        input: CandidateInput {
                            first_name: "C".to_string(),
                            last_name: n.to_string(),
                            email: format!("c{n}@example.com"),
                            status,
                            recruiter_id: recruiter,
                            ..Default::default()
                        },
                        created_by: None,
                        created_at: now(),
                    })
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_leaderboard_rates_and_ordering() {
        use CandidateStatus::*;

        let store = test_store();
        let a = add_user(&store, "alice", Role::Recruiter);
        let b = add_user(&store, "bob", Role::Recruiter);
        let c = add_user(&store, "carol", Role::Admin);
        let d = add_user(&store, "dave", Role::Recruiter);
        add_user(&store, "vera", Role::Viewer);

        // alice and bob tie on 50% success; bob has the larger book.
        add_candidates(&store, Some(a.id), &[Hired, Applied]);
        add_candidates(&store, Some(b.id), &[Hired, Hired, Interview, Rejected]);
        // carol and dave tie on everything; lower id wins.
        add_candidates(&store, Some(c.id), &[Offer]);
        add_candidates(&store, Some(d.id), &[Offer]);

        let board = leaderboard(&store).unwrap();
        let order: Vec<i64> = board.iter().map(|e| e.recruiter_id).collect();
        assert_eq!(order, vec![b.id, a.id, c.id, d.id]);

        let bob = &board[0];
        assert_eq!(bob.total, 4);
        assert_eq!(bob.hired, 2);
        assert_eq!(bob.rejected, 1);
        assert!((bob.success_rate - 50.0).abs() < f64::EPSILON);
        assert!((bob.conversion_rate - 75.0).abs() < f64::EPSILON);

        assert!((board[2].conversion_rate - 100.0).abs() < f64::EPSILON);
        assert!(board.iter().all(|e| e.recruiter_name != "VERA"));
    }

    #[test]
    fn test_leaderboard_zero_candidates() {
        let store = test_store();
        add_user(&store, "alice", Role::Recruiter);

        let board = leaderboard(&store).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].total, 0);
        assert_eq!(board[0].success_rate, 0.0);
        assert_eq!(board[0].conversion_rate, 0.0);
    }

    #[test]
    fn test_bulk_reassign_reports_partial_failure() {
        let store = test_store();
        let from = add_user(&store, "alice", Role::Recruiter);
        let to = add_user(&store, "bob", Role::Recruiter);
        let ids = add_candidates(&store, Some(from.id), &[CandidateStatus::Applied; 2]);

        let outcome = reassign_candidates(&store, &[ids[0], 9999, ids[1]], Some(to.id), now()).unwrap();

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 2);
        assert!(!outcome.is_complete());
        assert_eq!(
            outcome.failed,
            vec![ReassignFailure {
                candidate_id: 9999,
                reason: "candidate not found".to_string()
            }]
        );
        for id in ids {
            assert_eq!(store.get_candidate(id).unwrap().unwrap().recruiter_id, Some(to.id));
        }
    }

    #[test]
    fn test_reassign_target_must_be_active_recruiter() {
        let store = test_store();
        let viewer = add_user(&store, "vera", Role::Viewer);
        let retired = add_user(&store, "rex", Role::Recruiter);
        store.toggle_user_active(retired.id, now()).unwrap();
        let ids = add_candidates(&store, None, &[CandidateStatus::Applied]);

        for target in [viewer.id, retired.id, 9999] {
            assert!(matches!(
                reassign_candidates(&store, &ids, Some(target), now()),
                Err(Error::Validation(_))
            ));
        }
        assert_eq!(store.get_candidate(ids[0]).unwrap().unwrap().recruiter_id, None);
    }

    #[test]
    fn test_reassign_from_and_unassign() {
        let store = test_store();
        let alice = add_user(&store, "alice", Role::Recruiter);
        let bob = add_user(&store, "bob", Role::Recruiter);
        add_candidates(&store, Some(alice.id), &[CandidateStatus::Applied; 3]);
        let kept = add_candidates(&store, Some(bob.id), &[CandidateStatus::Offer]);

        let outcome = reassign_from(&store, alice.id, Some(bob.id), now()).unwrap();
        assert_eq!((outcome.attempted, outcome.succeeded), (3, 3));

        let mine = store.search_candidates(&CandidateFilter::new().recruiter(bob.id)).unwrap();
        assert_eq!(mine.len(), 4);

        reassign_candidate(&store, kept[0], None, now()).unwrap();
        let loose = store.search_candidates(&CandidateFilter::new().unassigned()).unwrap();
        assert_eq!(loose.iter().map(|c| c.id).collect::<Vec<_>>(), kept);
    }
}
