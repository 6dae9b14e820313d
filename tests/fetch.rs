// tests/fetch.rs

//! Source fetching against a local HTTP server.

mod common;

use common::setup_recipe_dir;
use pantry::hash::hash_bytes;
use pantry::recipe::{Kitchen, KitchenConfig, RecipeRegistry};
use pantry::{Error, Version};
use std::fs;

const ARCHIVE: &[u8] = b"not really a tarball, but the bytes are what matter";

#[test]
fn test_fetch_verifies_and_caches() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/hello-2.12.tar.gz")
        .with_status(200)
        .with_body(ARCHIVE)
        .expect(1)
        .create();

    let sha = hash_bytes(ARCHIVE);
    let (temp, recipes) = setup_recipe_dir("hello", &server.url(), "2.12", sha.as_str());
    let mut registry = RecipeRegistry::new();
    registry.scan_dir(&recipes).unwrap();
    let hello = registry.get("hello").unwrap();

    let cache = temp.path().join("cache");
    let kitchen = Kitchen::new(KitchenConfig::default().with_source_cache(&cache)).unwrap();
    let version = Version::parse("2.12").unwrap();

    let path = kitchen.fetch(hello.as_ref(), &version).unwrap();
    assert_eq!(fs::read(&path).unwrap(), ARCHIVE);
    assert!(kitchen.sources_cached(hello.as_ref(), &version));

    // Served from the cache; the server sees exactly one request
    let again = kitchen.fetch(hello.as_ref(), &version).unwrap();
    assert_eq!(again, path);
    mock.assert();

    assert!(kitchen.verify_archive(&path, &sha).is_ok());
}

#[test]
fn test_fetch_rejects_tampered_archive() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/hello-2.12.tar.gz")
        .with_status(200)
        .with_body(b"tampered upstream archive")
        .create();

    let declared = hash_bytes(ARCHIVE);
    let (temp, recipes) = setup_recipe_dir("hello", &server.url(), "2.12", declared.as_str());
    let mut registry = RecipeRegistry::new();
    registry.scan_dir(&recipes).unwrap();
    let hello = registry.get("hello").unwrap();

    let cache = temp.path().join("cache");
    let kitchen = Kitchen::new(KitchenConfig::default().with_source_cache(&cache)).unwrap();
    let version = Version::parse("2.12").unwrap();

    let err = kitchen.fetch(hello.as_ref(), &version).unwrap_err();
    assert!(err.is_integrity());
    assert!(matches!(err, Error::ChecksumMismatch { .. }));

    // Nothing unverified is left behind
    assert!(!kitchen.sources_cached(hello.as_ref(), &version));
    assert_eq!(fs::read_dir(&cache).unwrap().count(), 0);
}

#[test]
fn test_fetch_http_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/hello-2.12.tar.gz")
        .with_status(404)
        .create();

    let (temp, recipes) = setup_recipe_dir("hello", &server.url(), "2.12", hash_bytes(ARCHIVE).as_str());
    let mut registry = RecipeRegistry::new();
    registry.scan_dir(&recipes).unwrap();
    let hello = registry.get("hello").unwrap();

    let kitchen =
        Kitchen::new(KitchenConfig::default().with_source_cache(temp.path().join("cache"))).unwrap();
    let err = kitchen
        .fetch(hello.as_ref(), &Version::parse("2.12").unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::DownloadError(_)));
    assert!(!err.is_integrity());
}

#[test]
fn test_force_download_refreshes_cache() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/hello-2.12.tar.gz")
        .with_status(200)
        .with_body(ARCHIVE)
        .expect(2)
        .create();

    let (temp, recipes) = setup_recipe_dir("hello", &server.url(), "2.12", hash_bytes(ARCHIVE).as_str());
    let mut registry = RecipeRegistry::new();
    registry.scan_dir(&recipes).unwrap();
    let hello = registry.get("hello").unwrap();

    let config = KitchenConfig::default()
        .with_source_cache(temp.path().join("cache"))
        .with_force_download(true);
    let kitchen = Kitchen::new(config).unwrap();
    let version = Version::parse("2.12").unwrap();

    kitchen.fetch(hello.as_ref(), &version).unwrap();
    kitchen.fetch(hello.as_ref(), &version).unwrap();
    mock.assert();
}
