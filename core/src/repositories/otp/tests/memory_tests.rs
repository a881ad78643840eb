//! Unit tests for the in-memory OTP store

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::repositories::otp::{InMemoryOtpStore, OtpStore};

const PHONE: &str = "0901234567";

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn record_at(phone: &str, purpose: OtpPurpose, code: &str, at: DateTime<Utc>) -> OtpRecord {
    OtpRecord::new(
        phone.to_string(),
        code.to_string(),
        purpose,
        at,
        Duration::minutes(5),
    )
}

#[tokio::test]
async fn test_insert_and_find_latest_valid() {
    let store = InMemoryOtpStore::new();
    let record = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());

    let saved = store.insert(record.clone()).await.unwrap();
    assert_eq!(saved, record);

    let found = store
        .find_latest_valid(PHONE, OtpPurpose::Verify, base_time())
        .await
        .unwrap();
    assert_eq!(found, Some(record));
}

#[tokio::test]
async fn test_duplicate_id_is_rejected() {
    let store = InMemoryOtpStore::new();
    let record = record_at(PHONE, OtpPurpose::Login, "111111", base_time());

    store.insert(record.clone()).await.unwrap();
    assert!(store.insert(record).await.is_err());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_lookup_is_purpose_scoped() {
    let store = InMemoryOtpStore::new();
    store
        .insert(record_at(PHONE, OtpPurpose::Verify, "111111", base_time()))
        .await
        .unwrap();

    let found = store
        .find_latest_valid(PHONE, OtpPurpose::Login, base_time())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_latest_record_wins() {
    let store = InMemoryOtpStore::new();
    let older = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());
    let newer = record_at(
        PHONE,
        OtpPurpose::Verify,
        "222222",
        base_time() + Duration::seconds(30),
    );
    // insertion order must not matter when timestamps differ
    store.insert(newer.clone()).await.unwrap();
    store.insert(older).await.unwrap();

    let found = store
        .find_latest_valid(PHONE, OtpPurpose::Verify, base_time() + Duration::minutes(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, newer.id);
}

#[tokio::test]
async fn test_same_instant_ties_go_to_latest_insert() {
    let store = InMemoryOtpStore::new();
    let first = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());
    let second = record_at(PHONE, OtpPurpose::Verify, "222222", base_time());
    store.insert(first).await.unwrap();
    store.insert(second.clone()).await.unwrap();

    let found = store
        .find_latest_valid(PHONE, OtpPurpose::Verify, base_time())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, second.id);
}

#[tokio::test]
async fn test_expired_and_verified_records_are_invisible() {
    let store = InMemoryOtpStore::new();
    let record = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());
    store.insert(record.clone()).await.unwrap();

    let at_expiry = record.expires_at;
    assert!(store
        .find_latest_valid(PHONE, OtpPurpose::Verify, at_expiry)
        .await
        .unwrap()
        .is_none());

    let verified = record
        .register_attempt("111111", base_time())
        .unwrap()
        .next;
    assert!(store.update(&verified, 0).await.unwrap());
    assert!(store
        .find_latest_valid(PHONE, OtpPurpose::Verify, base_time())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_count_since_spans_purposes_and_excludes_boundary() {
    let store = InMemoryOtpStore::new();
    store
        .insert(record_at(PHONE, OtpPurpose::Verify, "111111", base_time()))
        .await
        .unwrap();
    store
        .insert(record_at(
            PHONE,
            OtpPurpose::Login,
            "222222",
            base_time() + Duration::minutes(1),
        ))
        .await
        .unwrap();
    store
        .insert(record_at("0907654321", OtpPurpose::Login, "333333", base_time()))
        .await
        .unwrap();

    assert_eq!(
        store
            .count_since(PHONE, base_time() - Duration::seconds(1))
            .await
            .unwrap(),
        2
    );
    // created_at == since is outside the window
    assert_eq!(store.count_since(PHONE, base_time()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_is_compare_and_swap() {
    let store = InMemoryOtpStore::new();
    let record = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());
    store.insert(record.clone()).await.unwrap();

    let first = record.register_attempt("000000", base_time()).unwrap().next;
    assert!(store.update(&first, 0).await.unwrap());

    // a second writer that also read attempts == 0 loses
    let stale = record.register_attempt("000000", base_time()).unwrap().next;
    assert!(!store.update(&stale, 0).await.unwrap());

    let stored = store.get(record.id).await.unwrap();
    assert_eq!(stored.attempts, 1);
}

#[tokio::test]
async fn test_update_refuses_verified_and_exhausted_rows() {
    let store = InMemoryOtpStore::new();
    let record = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());
    store.insert(record.clone()).await.unwrap();

    let verified = record.register_attempt("111111", base_time()).unwrap().next;
    assert!(store.update(&verified, 0).await.unwrap());

    let mut again = verified.clone();
    again.attempts = 2;
    assert!(!store.update(&again, 1).await.unwrap());

    let mut exhausted = record_at(PHONE, OtpPurpose::Login, "222222", base_time());
    exhausted.attempts = 3;
    store.insert(exhausted.clone()).await.unwrap();
    let mut next = exhausted.clone();
    next.attempts = 4;
    assert!(!store.update(&next, 3).await.unwrap());
}

#[tokio::test]
async fn test_update_missing_row_returns_false() {
    let store = InMemoryOtpStore::new();
    let record = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());

    assert!(!store.update(&record, 0).await.unwrap());
}

#[tokio::test]
async fn test_delete_older_than_ignores_state() {
    let store = InMemoryOtpStore::new();
    let old = record_at(PHONE, OtpPurpose::Verify, "111111", base_time());
    let old_verified = {
        let r = record_at(PHONE, OtpPurpose::Login, "222222", base_time());
        r.register_attempt("222222", base_time()).unwrap().next
    };
    let fresh = record_at(
        PHONE,
        OtpPurpose::Verify,
        "333333",
        base_time() + Duration::hours(25),
    );
    store.insert(old).await.unwrap();
    store.insert(old_verified).await.unwrap();
    store.insert(fresh.clone()).await.unwrap();

    let deleted = store
        .delete_older_than(base_time() + Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(deleted, 2);
    let remaining = store.all().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, fresh.id);
}
