mod common;

use chrono::Utc;
use stellarmix::management::*;
use stellarmix::types::Playlist;
use tempfile::tempdir;

fn playlist(id: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: format!("Playlist {}", id),
        uri: format!("spotify:playlist:{}", id),
        images: vec![],
        description: None,
        owner: None,
    }
}

#[tokio::test]
async fn test_values_survive_reopen() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;

    storage.set("greeting", "hello").await.unwrap();
    drop(storage);

    let reopened = common::open_storage(&dir).await;
    assert_eq!(reopened.get("greeting").await.as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;

    assert!(!storage.contains(KEY_SPOTIFY_TOKEN).await);
    assert!(!storage.path().exists());
}

#[tokio::test]
async fn test_corrupt_file_is_ignored() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("storage.json"), "not json").unwrap();

    let storage = common::open_storage(&dir).await;
    assert_eq!(storage.get(KEY_IS_LOGGED_IN).await, None);
}

#[tokio::test]
async fn test_persist_login_writes_all_keys() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;
    let credentials = CredentialManager::new(storage.clone());

    let before = Utc::now().timestamp_millis();
    let credential = credentials.persist_login("abc", 3600).await.unwrap();

    assert!(credential.is_logged_in);
    assert_eq!(storage.get(KEY_SPOTIFY_TOKEN).await.as_deref(), Some("abc"));
    assert_eq!(storage.get(KEY_IS_LOGGED_IN).await.as_deref(), Some("true"));

    let expiry: i64 = storage
        .get(KEY_TOKEN_EXPIRY_TIME)
        .await
        .unwrap()
        .parse()
        .unwrap();
    assert!(expiry >= before + 3_600_000);
    assert!(credential.has_valid_token(before));
}

#[tokio::test]
async fn test_logout_clears_credential_keys() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;
    common::log_in(&storage, "abc").await;
    PlaylistCache::new(storage.clone())
        .persist(&[playlist("keep")])
        .await
        .unwrap();

    let credentials = CredentialManager::new(storage.clone());
    credentials.clear().await.unwrap();
    // Clearing twice is harmless
    credentials.clear().await.unwrap();

    assert!(!storage.contains(KEY_SPOTIFY_TOKEN).await);
    assert!(!storage.contains(KEY_TOKEN_EXPIRY_TIME).await);
    assert!(!storage.contains(KEY_IS_LOGGED_IN).await);
    // Playlists are not part of the credential
    assert!(storage.contains(KEY_SPOTIFY_PLAYLISTS).await);

    let credential = credentials.load().await;
    assert!(!credential.is_logged_in);
    assert_eq!(credential.access_token, None);
}

#[tokio::test]
async fn test_logged_in_flag_without_token_is_logged_out() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;
    storage.set(KEY_IS_LOGGED_IN, "true").await.unwrap();

    let credentials = CredentialManager::new(storage);
    let credential = credentials.load().await;

    assert!(!credential.is_logged_in);
    assert_eq!(credentials.access_token().await, None);
}

#[tokio::test]
async fn test_mark_logged_out_keeps_expiry() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;
    common::log_in(&storage, "abc").await;

    CredentialManager::new(storage.clone())
        .mark_logged_out()
        .await
        .unwrap();

    assert_eq!(storage.get(KEY_SPOTIFY_TOKEN).await, None);
    assert_eq!(storage.get(KEY_IS_LOGGED_IN).await.as_deref(), Some("false"));
    assert!(storage.contains(KEY_TOKEN_EXPIRY_TIME).await);
}

#[test]
fn test_expired_credential() {
    let credential = Credential {
        access_token: Some("abc".to_string()),
        expires_at: Some(1_000),
        is_logged_in: true,
    };

    assert!(credential.is_expired(1_000));
    assert!(!credential.has_valid_token(2_000));
    assert!(credential.has_valid_token(999));

    let no_expiry = Credential {
        expires_at: None,
        ..credential
    };
    assert!(no_expiry.is_expired(0));
}

#[tokio::test]
async fn test_playlist_cache() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;
    let cache = PlaylistCache::new(storage.clone());

    assert!(cache.load().await.is_empty());

    cache
        .persist(&[playlist("one"), playlist("two")])
        .await
        .unwrap();

    let reopened = PlaylistCache::new(common::open_storage(&dir).await);
    assert_eq!(reopened.load().await.len(), 2);
    assert_eq!(reopened.get(2).await.map(|p| p.id), Some("two".to_string()));
    assert_eq!(reopened.get(0).await, None);
    assert_eq!(reopened.get(3).await, None);
}

#[tokio::test]
async fn test_corrupt_playlist_cache_is_empty() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;
    storage.set(KEY_SPOTIFY_PLAYLISTS, "[{oops").await.unwrap();

    assert!(PlaylistCache::new(storage).load().await.is_empty());
}

#[tokio::test]
async fn test_huge_lifetime_saturates() {
    let dir = tempdir().unwrap();
    let storage = common::open_storage(&dir).await;
    let credentials = CredentialManager::new(storage.clone());

    let credential = credentials.persist_login("abc", u64::MAX).await.unwrap();

    assert_eq!(credential.expires_at, Some(i64::MAX));
    assert!(credential.has_valid_token(Utc::now().timestamp_millis()));
    assert_eq!(
        storage.get(KEY_TOKEN_EXPIRY_TIME).await,
        Some(i64::MAX.to_string())
    );
}
