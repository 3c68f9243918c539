#[cfg(test)]
mod test {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::Value;
    use std::fs;

    use crate::cache::{CacheLookup, CachedToken, FileTokenStore, MemoryTokenStore, TokenStore};
    use crate::tests::common::token_expiring_in;

    fn fixed_token(client_id: &str) -> CachedToken {
        CachedToken::new(
            client_id.to_owned(),
            "token-value-123".to_owned(),
            Utc.timestamp_opt(1_900_000_000, 123_000_000).unwrap(),
        )
    }

    #[test]
    fn token_expiring_exactly_now_is_not_valid() {
        let now = Utc::now();
        let token = CachedToken::new("id".to_owned(), "t".to_owned(), now);
        assert!(!token.is_valid_at(now));
        assert!(token.is_valid_at(now - Duration::seconds(1)));
        assert!(!token.is_valid_at(now + Duration::seconds(1)));
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        let token = fixed_token("client-a");

        store.write(&token).await.unwrap();

        assert_eq!(store.read("client-a").await, Some(token.clone()));
        assert_eq!(store.lookup("client-a").await, CacheLookup::Found(token));
    }

    #[tokio::test]
    async fn file_store_survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let token = fixed_token("client-a");
        FileTokenStore::new(dir.path())
            .unwrap()
            .write(&token)
            .await
            .unwrap();

        let reopened = FileTokenStore::new(dir.path()).unwrap();
        assert_eq!(reopened.read("client-a").await, Some(token));
    }

    #[tokio::test]
    async fn file_record_holds_token_and_iso_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        store.write(&fixed_token("client-a")).await.unwrap();

        let raw = fs::read_to_string(store.record_path("client-a")).unwrap();
        let record: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(record["access_token"], "token-value-123");
        let expires_at = record["expires_at"].as_str().unwrap();
        assert!(expires_at.starts_with("2030-03-17T17:46:40.123"), "got {}", expires_at);
        assert!(record.get("client_identity").is_none());
    }

    #[tokio::test]
    async fn missing_record_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        assert_eq!(store.lookup("nobody").await, CacheLookup::Missing);
        assert_eq!(store.read("nobody").await, None);
    }

    #[tokio::test]
    async fn unparsable_records_fail_soft() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();

        fs::write(store.record_path("garbage"), "{not json").unwrap();
        fs::write(
            store.record_path("bad-time"),
            r#"{"access_token":"abc","expires_at":"next tuesday"}"#,
        )
        .unwrap();
        fs::write(store.record_path("no-token"), r#"{"expires_at":"2030-01-01T00:00:00Z"}"#).unwrap();

        for id in ["garbage", "bad-time", "no-token"] {
            assert!(
                matches!(store.lookup(id).await, CacheLookup::Malformed(_)),
                "record '{}' should be malformed",
                id
            );
            assert_eq!(store.read(id).await, None);
        }
    }

    #[tokio::test]
    async fn write_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        store.write(&token_expiring_in("client-a", "old", 60)).await.unwrap();
        let newer = token_expiring_in("client-a", "new", 3600);
        store.write(&newer).await.unwrap();

        assert_eq!(store.read("client-a").await, Some(newer));
        // no temporary files left behind
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_record_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        store.write(&fixed_token("client-a")).await.unwrap();

        store.delete("client-a").await.unwrap();
        assert_eq!(store.read("client-a").await, None);
        store.delete("client-a").await.unwrap();
    }

    #[tokio::test]
    async fn identities_cannot_escape_the_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        let path = store.record_path("../team/a");
        assert_eq!(path.parent(), Some(dir.path()));

        let token = fixed_token("../team/a");
        store.write(&token).await.unwrap();
        assert_eq!(store.read("../team/a").await, Some(token));
    }

    #[tokio::test]
    async fn store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("lsw-rest-api").join("tokens");
        let store = FileTokenStore::new(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn records_are_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        store.write(&fixed_token("client-a")).await.unwrap();

        let mode = fs::metadata(store.record_path("client-a"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600, "permissions mismatch (expected 0600)");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn overwriting_a_readable_record_makes_it_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        let path = store.record_path("client-a");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        store.write(&fixed_token("client-a")).await.unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();
        // a directory in place of the record makes the final rename fail
        fs::create_dir(store.record_path("client-a")).unwrap();
        fs::write(store.record_path("client-a").join("keep"), "x").unwrap();

        assert!(store.write(&fixed_token("client-a")).await.is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn memory_store_keeps_one_record_per_identity() {
        let store = MemoryTokenStore::new();
        assert!(store.is_empty().await);

        store.write(&token_expiring_in("a", "first", 60)).await.unwrap();
        store.write(&token_expiring_in("a", "second", 60)).await.unwrap();
        store.write(&token_expiring_in("b", "other", 60)).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert_eq!(store.read("a").await.unwrap().access_token, "second");

        store.delete("a").await.unwrap();
        store.delete("a").await.unwrap();
        assert_eq!(store.lookup("a").await, CacheLookup::Missing);
        assert_eq!(store.len().await, 1);
    }
}
