//! Integration tests for committing wish/progress transitions.
//!
//! Verifies that:
//! - Public and secret status are written together
//! - The progress row is created lazily and stays unique per wish
//! - A transition planned against an old version is rejected as stale
//! - Reopening wipes every stored note and photo
//! - The overview listing joins wish and owner details

use assert_matches::assert_matches;
use chrono::Utc;
use sqlx::PgPool;
use wishlist_core::progress::{
    apply_owner_status, apply_partner_action, PartnerAction, ProgressState, SecretStatus,
};
use wishlist_core::roles::Role;
use wishlist_core::wish::{validate_new_wish, WishStatus};
use wishlist_db::models::account::{Account, CreateAccount};
use wishlist_db::models::progress::WishProgress;
use wishlist_db::models::wish::Wish;
use wishlist_db::repositories::{
    AccountRepo, CommitOutcome, TransitionCommit, WishProgressRepo, WishRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn account(pool: &PgPool, email: &str, role: Role) -> Account {
    AccountRepo::create(
        pool,
        &CreateAccount {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
            linking_code: Some("ABC123".to_string()),
        },
    )
    .await
    .unwrap()
}

async fn pending_wish(pool: &PgPool, owner_id: i64) -> Wish {
    let fields = validate_new_wish("Concert tickets", None, "experience", None, None, None).unwrap();
    WishRepo::create(pool, owner_id, &fields, None)
        .await
        .unwrap()
        .0
}

/// Plan `action` against the stored state and commit it.
async fn act(
    pool: &PgPool,
    wish: &Wish,
    partner_id: i64,
    action: PartnerAction,
) -> (Wish, WishProgress) {
    let current = match WishProgressRepo::find_by_wish(pool, wish.id).await.unwrap() {
        Some(p) => p.state().unwrap(),
        None => ProgressState::not_started(),
    };
    let transition = apply_partner_action(&current, action, Utc::now()).unwrap();
    let outcome = WishProgressRepo::commit_transition(
        pool,
        &TransitionCommit {
            wish_id: wish.id,
            expected_version: wish.version,
            partner_id: Some(partner_id),
            transition: &transition,
        },
    )
    .await
    .unwrap();
    match outcome {
        CommitOutcome::Applied { wish, progress } => (wish, progress),
        CommitOutcome::Stale => panic!("unexpected stale commit"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_partner_creates_progress(pool: PgPool) {
    let alice = account(&pool, "alice@example.com", Role::Wisher).await;
    let bob = account(&pool, "bob@example.com", Role::Partner).await;
    let fields = validate_new_wish("Cookbook", None, "food", Some("low"), None, None).unwrap();

    let (wish, progress) = WishRepo::create(&pool, alice.id, &fields, Some(bob.id))
        .await
        .unwrap();
    let progress = progress.expect("progress created for linked partner");
    assert_eq!(progress.wish_id, wish.id);
    assert_eq!(progress.partner_id, Some(bob.id));
    assert_eq!(progress.secret_status().unwrap(), SecretStatus::NotStarted);
    assert_eq!(wish.status().unwrap(), WishStatus::Pending);
}

/// Secret stages bump the version but leave the wish's own timestamp alone;
/// only the public flip to done moves it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_secret_stages_keep_wish_updated_at(pool: PgPool) {
    let alice = account(&pool, "alice@example.com", Role::Wisher).await;
    let bob = account(&pool, "bob@example.com", Role::Partner).await;
    let created = pending_wish(&pool, alice.id).await;

    let (wish, _) = act(&pool, &created, bob.id, PartnerAction::WillDo).await;
    assert_eq!(wish.version, created.version + 1);
    assert_eq!(wish.updated_at, created.updated_at);

    let (wish, _) = act(
        &pool,
        &wish,
        bob.id,
        PartnerAction::in_progress(Some("looking")).unwrap(),
    )
    .await;
    assert_eq!(wish.updated_at, created.updated_at);

    let (wish, _) = act(
        &pool,
        &wish,
        bob.id,
        PartnerAction::done(Some("got them!"), ["url1"]).unwrap(),
    )
    .await;
    assert!(wish.updated_at > created.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partner_flow_commits_both_records(pool: PgPool) {
    let alice = account(&pool, "alice@example.com", Role::Wisher).await;
    let bob = account(&pool, "bob@example.com", Role::Partner).await;
    let wish = pending_wish(&pool, alice.id).await;
    assert!(WishProgressRepo::find_by_wish(&pool, wish.id)
        .await
        .unwrap()
        .is_none());

    let (wish, progress) = act(&pool, &wish, bob.id, PartnerAction::WillDo).await;
    assert_eq!(wish.status, "pending");
    assert_eq!(progress.secret_status, "will_do");

    let (wish, progress) = act(
        &pool,
        &wish,
        bob.id,
        PartnerAction::in_progress(Some("looking")).unwrap(),
    )
    .await;
    assert_eq!(progress.private_note.as_deref(), Some("looking"));

    let (wish, progress) = act(
        &pool,
        &wish,
        bob.id,
        PartnerAction::done(Some("got them!"), ["url1", "url2"]).unwrap(),
    )
    .await;
    assert_eq!(wish.status().unwrap(), WishStatus::Done);
    assert_eq!(progress.secret_status().unwrap(), SecretStatus::Done);
    assert_eq!(progress.completion_photos.as_deref(), Some("url1,url2"));
    assert!(progress.completed_at.is_some());
    assert_eq!(progress.private_note.as_deref(), Some("looking"));

    let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wish_progress WHERE wish_id = $1")
        .bind(wish.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows.0, 1, "exactly one progress row per wish");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_version_is_rejected(pool: PgPool) {
    let alice = account(&pool, "alice@example.com", Role::Wisher).await;
    let bob = account(&pool, "bob@example.com", Role::Partner).await;
    let stale = pending_wish(&pool, alice.id).await;

    // Someone else commits first, bumping the version.
    act(&pool, &stale, bob.id, PartnerAction::WillDo).await;

    let transition = apply_owner_status(&ProgressState::not_started(), WishStatus::Done, Utc::now())
        .unwrap();
    let outcome = WishProgressRepo::commit_transition(
        &pool,
        &TransitionCommit {
            wish_id: stale.id,
            expected_version: stale.version,
            partner_id: None,
            transition: &transition,
        },
    )
    .await
    .unwrap();
    assert_matches!(outcome, CommitOutcome::Stale);

    let progress = WishProgressRepo::find_by_wish(&pool, stale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(progress.secret_status, "will_do", "stale commit wrote nothing");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reopen_wipes_stored_fields_and_keeps_partner(pool: PgPool) {
    let alice = account(&pool, "alice@example.com", Role::Wisher).await;
    let bob = account(&pool, "bob@example.com", Role::Partner).await;
    let wish = pending_wish(&pool, alice.id).await;
    let (wish, _) = act(
        &pool,
        &wish,
        bob.id,
        PartnerAction::in_progress(Some("looking")).unwrap(),
    )
    .await;
    let (wish, progress) = act(
        &pool,
        &wish,
        bob.id,
        PartnerAction::done(Some("got them!"), ["url1"]).unwrap(),
    )
    .await;

    let transition =
        apply_owner_status(&progress.state().unwrap(), WishStatus::Pending, Utc::now()).unwrap();
    let outcome = WishProgressRepo::commit_transition(
        &pool,
        &TransitionCommit {
            wish_id: wish.id,
            expected_version: wish.version,
            partner_id: None,
            transition: &transition,
        },
    )
    .await
    .unwrap();

    let (wish, progress) = match outcome {
        CommitOutcome::Applied { wish, progress } => (wish, progress),
        CommitOutcome::Stale => panic!("unexpected stale commit"),
    };
    assert_eq!(wish.status, "pending");
    assert_eq!(progress.secret_status, "not_started");
    assert_eq!(progress.private_note, None);
    assert_eq!(progress.completion_note, None);
    assert_eq!(progress.completion_photos, None);
    assert_eq!(progress.completed_at, None);
    assert_eq!(progress.partner_id, Some(bob.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_done_without_partner_leaves_partner_unset(pool: PgPool) {
    let alice = account(&pool, "alice@example.com", Role::Wisher).await;
    let wish = pending_wish(&pool, alice.id).await;

    let transition = apply_owner_status(&ProgressState::not_started(), WishStatus::Done, Utc::now())
        .unwrap();
    let outcome = WishProgressRepo::commit_transition(
        &pool,
        &TransitionCommit {
            wish_id: wish.id,
            expected_version: wish.version,
            partner_id: None,
            transition: &transition,
        },
    )
    .await
    .unwrap();
    assert_matches!(
        outcome,
        CommitOutcome::Applied { ref wish, ref progress }
            if wish.status == "done" && progress.partner_id.is_none()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overview_joins_wish_and_owner(pool: PgPool) {
    let alice = account(&pool, "alice@example.com", Role::Wisher).await;
    let bob = account(&pool, "bob@example.com", Role::Partner).await;
    let first = pending_wish(&pool, alice.id).await;
    let second = pending_wish(&pool, alice.id).await;
    act(&pool, &first, bob.id, PartnerAction::WillDo).await;
    act(&pool, &second, bob.id, PartnerAction::WillDo).await;

    let rows = WishProgressRepo::list_overview(&pool, &[alice.id])
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].progress.wish_id, second.id, "newest progress first");
    assert_eq!(rows[0].owner_id, alice.id);
    assert_eq!(rows[0].owner_name, "alice");
    assert_eq!(rows[0].wish_title, "Concert tickets");

    let view = rows[1].view().unwrap();
    assert_eq!(view.wish_status, WishStatus::Pending);
    assert_eq!(view.progress.secret_status, SecretStatus::WillDo);

    let batch = WishProgressRepo::list_for_wishes(&pool, &[first.id, second.id])
        .await
        .unwrap();
    assert_eq!(batch.len(), 2);
}
