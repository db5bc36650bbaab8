//! Integration Tests for the Config Cache
//!
//! Exercises save/load through the public API against a real filesystem.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread::{self, sleep};
use std::time::Duration;

use config_cache::cache::{CacheSettings, JsonCodec, RecordCodec};
use config_cache::{CacheError, CacheLookup, ConfigCache, ConfigMap, MissReason};
use serde_json::{json, Value};
use tempfile::TempDir;

// == Helper Functions ==

fn config_of(value: Value) -> ConfigMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

fn read_envelope(path: &Path) -> Value {
    let bytes = fs::read(path).expect("cache file should be readable");
    serde_json::from_slice(&bytes).expect("cache file should be JSON")
}

// == Save Tests ==

#[test]
fn test_save_creates_default_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join("x");
    let cache = ConfigCache::new(Some(dir.clone()));

    assert!(cache.save(&config_of(json!({"a": 1})), None, None)?);

    let path = dir.join("config.cache");
    assert!(path.is_file());
    assert_eq!(read_envelope(&path), json!({"expires": null, "config": {"a": 1}}));

    let (config, hit) = cache.load(None)?.into_parts();
    assert!(hit);
    assert_eq!(config, config_of(json!({"a": 1})));
    Ok(())
}

#[test]
fn test_save_with_profile_creates_profile_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().to_path_buf()));

    cache.save(&config_of(json!({"test": "ok"})), Some("staging"), None)?;

    assert!(temp_dir.path().join("config.staging.cache").is_file());
    assert!(!temp_dir.path().join("config.cache").exists());
    Ok(())
}

#[test]
fn test_save_records_expiry_timestamp() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().to_path_buf()));

    let before = chrono::Utc::now().timestamp();
    cache.save(&config_of(json!({"a": 1})), None, Some(3600))?;
    let after = chrono::Utc::now().timestamp();

    let envelope = read_envelope(&temp_dir.path().join("config.cache"));
    let expires = envelope["expires"].as_i64().expect("expires should be an integer");
    assert!(expires >= before + 3600 && expires <= after + 3600);
    Ok(())
}

#[test]
fn test_save_into_nested_missing_directory() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let nested = temp_dir.path().join("test").join("test");
    let cache = ConfigCache::new(Some(nested.clone()));

    assert!(cache.save(&config_of(json!({"test": "ok"})), None, None)?);
    assert!(nested.join("config.cache").is_file());
    Ok(())
}

#[test]
fn test_save_directory_blocked_by_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, b"file")?;
    let cache = ConfigCache::new(Some(blocker.join("cache")));

    let result = cache.save(&config_of(json!({"a": 1})), None, None);
    assert!(matches!(result, Err(CacheError::DirectoryCreateFailed { .. })));
    Ok(())
}

#[test]
fn test_concurrent_saves_into_missing_directory() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join("shared").join("cache");
    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let cache = ConfigCache::new(Some(dir.clone()));
            thread::spawn(move || {
                let profile = format!("worker{}", i);
                barrier.wait();
                cache.save(&config_of(json!({"worker": i})), Some(profile.as_str()), None)
            })
        })
        .collect();

    for handle in handles {
        let saved = handle.join().expect("worker panicked")?;
        assert!(saved);
    }

    let cache = ConfigCache::new(Some(dir));
    for i in 0..workers {
        let lookup = cache.load(Some(format!("worker{}", i).as_str()))?;
        assert_eq!(lookup, CacheLookup::Hit(config_of(json!({"worker": i}))));
    }
    Ok(())
}

#[test]
fn test_concurrent_saves_to_same_file_leave_a_complete_record() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_path_buf();
    let workers = 4;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let cache = ConfigCache::new(Some(dir.clone()));
            thread::spawn(move || {
                barrier.wait();
                for round in 0..20 {
                    cache.save(&config_of(json!({"worker": i, "round": round})), None, None)?;
                }
                Ok::<_, CacheError>(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked")?;
    }

    let config = ConfigCache::new(Some(dir)).load(None)?.into_config();
    assert_eq!(config.len(), 2);
    assert_eq!(config["round"], json!(19));
    Ok(())
}

// == Load Tests ==

#[test]
fn test_load_from_missing_directory() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().join("wrong")));

    let lookup = cache.load(None)?;
    assert_eq!(lookup, CacheLookup::Miss(MissReason::NotFound));
    assert_eq!(lookup.into_config(), ConfigMap::new());
    Ok(())
}

#[test]
fn test_load_without_directory() -> anyhow::Result<()> {
    let cache = ConfigCache::new(None);

    assert_eq!(cache.load(None)?.into_parts(), (ConfigMap::new(), false));
    assert!(!cache.save(&config_of(json!({"a": 1})), None, None)?);
    Ok(())
}

#[test]
fn test_load_missing_profile() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().to_path_buf()));
    cache.save(&config_of(json!({"a": 1})), None, None)?;

    assert_eq!(
        cache.load(Some("empty"))?,
        CacheLookup::Miss(MissReason::NotFound)
    );
    Ok(())
}

#[test]
fn test_load_expires_after_ttl() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().join("x")));

    cache.save(&config_of(json!({"a": 1})), None, Some(1))?;
    assert!(cache.load(None)?.is_hit());

    // Wait for the expiry second to pass completely
    sleep(Duration::from_millis(2100));

    let lookup = cache.load(None)?;
    assert_eq!(lookup, CacheLookup::Miss(MissReason::Expired));
    assert_eq!(lookup.into_parts(), (ConfigMap::new(), false));
    Ok(())
}

#[test]
fn test_load_corrupt_file_raises() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().to_path_buf()));
    fs::write(temp_dir.path().join("config.cache"), b"\x00\x01garbage")?;

    match cache.load(None) {
        Err(CacheError::DecodeFailed { path, .. }) => {
            assert_eq!(path, temp_dir.path().join("config.cache"));
        }
        other => panic!("expected DecodeFailed, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_load_with_file_as_base_directory_misses() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let not_a_dir = temp_dir.path().join("notadir");
    fs::write(&not_a_dir, b"plain file")?;
    let cache = ConfigCache::new(Some(not_a_dir));

    assert_eq!(cache.load(None)?, CacheLookup::Miss(MissReason::NotFound));
    Ok(())
}

#[test]
fn test_float_values_load_unchanged() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().to_path_buf()));
    let config = config_of(json!({"x": 1.0715660391465826e-75, "ratio": 0.1}));

    cache.save(&config, None, None)?;

    assert_eq!(cache.load(None)?, CacheLookup::Hit(config));
    Ok(())
}

#[test]
fn test_load_unreadable_path_raises() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cache = ConfigCache::new(Some(temp_dir.path().to_path_buf()));
    fs::create_dir(temp_dir.path().join("config.cache"))?;

    assert!(matches!(
        cache.load(None),
        Err(CacheError::ReadFailed { .. })
    ));
    Ok(())
}

#[test]
fn test_load_record_written_by_hand() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = CacheSettings::new(Some(temp_dir.path().to_path_buf())).with_prefix("app");
    let cache = ConfigCache::with_settings(settings);

    let record = JsonCodec.decode(br#"{"config": {"db": {"host": "localhost"}}}"#)?;
    fs::write(temp_dir.path().join("app.prod.cache"), JsonCodec.encode(&record)?)?;

    assert_eq!(
        cache.load(Some("prod"))?,
        CacheLookup::Hit(config_of(json!({"db": {"host": "localhost"}})))
    );
    Ok(())
}
