//! End-to-end checks of the catalog, partitioner, and album store against
//! real directory trees.

use showroom::album::{AddOutcome, AlbumError, AlbumStore, FilePort, MemoryPort};
use showroom::catalog::{Catalog, CatalogPayload, GalleryQuery};
use showroom::config::{CatalogConfig, ShowroomConfig, load_config};
use showroom::crawl::{MemoryFs, OsLister, crawl};
use showroom::drag::{DragController, DragState};
use showroom::model_images::resolve_model_images;
use showroom::partition::Partitioner;
use showroom::slug::SlugResolver;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_files(root: &Path, paths: &[&str]) {
    for rel in paths {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "fake image").unwrap();
    }
}

fn catalog_at(root: &Path) -> Catalog<OsLister> {
    Catalog::new(
        OsLister,
        CatalogConfig {
            root: root.to_path_buf(),
            ..CatalogConfig::default()
        },
    )
}

#[test]
fn catalog_of_small_tree() {
    let tmp = TempDir::new().unwrap();
    write_files(tmp.path(), &["modelA/x.jpg", "modelA/y.jpg", "cover.png"]);
    let catalog = catalog_at(tmp.path());

    let images = catalog.query(&GalleryQuery::default().category("all"));
    assert_eq!(images.len(), 3);

    let payload = catalog.fetch();
    assert_eq!(payload.categories, vec!["General", "modelA"]);

    let category_of = |path: &str| {
        payload
            .images
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.category.clone())
            .unwrap_or_else(|| panic!("{path} missing from {:?}", payload.images))
    };
    assert_eq!(category_of("cover.png"), "General");
    assert_eq!(category_of("modelA/x.jpg"), "modelA");
    assert_eq!(category_of("modelA/y.jpg"), "modelA");
}

#[test]
fn create_album_validates_name() {
    let mut store = AlbumStore::open(MemoryPort::new()).unwrap();

    assert!(matches!(store.create_album(""), Err(AlbumError::NameInvalid)));
    store.create_album("Favorites").unwrap();

    let albums = store.list_albums();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].name, "Favorites");
    assert!(albums[0].images.is_empty());
}

#[test]
fn remove_leaves_album_in_place() {
    let mut store = AlbumStore::open(MemoryPort::new()).unwrap();
    let id = store.create_album("Favorites").unwrap().id;

    store.add_image(id, "/modelA/x.jpg").unwrap();
    store.remove_image(id, "/modelA/x.jpg").unwrap();

    let album = store.album(id).expect("album survives removing its last image");
    assert!(album.images.is_empty());
}

#[test]
fn every_third_fallback_for_unknown_products() {
    let images = ["a", "b", "c", "d", "e", "f"];
    let p = Partitioner::default().partition("unknown-slug", &images);
    assert_eq!(p.exterior, vec!["a", "d"]);
    assert_eq!(p.interior, vec!["b", "c", "e", "f"]);
}

#[test]
fn missing_root_serves_degraded_payload() {
    let tmp = TempDir::new().unwrap();
    let catalog = catalog_at(&tmp.path().join("does-not-exist"));

    assert_eq!(
        catalog.fetch(),
        CatalogPayload {
            categories: vec!["General".to_string()],
            images: Vec::new(),
        }
    );
    let json = serde_json::to_string(&catalog.fetch()).unwrap();
    assert_eq!(json, r#"{"categories":["General"],"images":[]}"#);
}

#[test]
fn duplicate_add_keeps_single_entry() {
    let mut store = AlbumStore::open(MemoryPort::new()).unwrap();
    let id = store.create_album("Launch").unwrap().id;

    assert_eq!(store.add_image(id, "p.jpg").unwrap(), AddOutcome::Added);
    assert_eq!(
        store.add_image(id, "p.jpg").unwrap(),
        AddOutcome::AlreadyPresent
    );
    assert_eq!(store.album(id).unwrap().images, vec!["p.jpg"]);
}

#[test]
fn crawler_output_matches_supported_files_exactly() {
    let tmp = TempDir::new().unwrap();
    write_files(
        tmp.path(),
        &[
            "a.JPG",
            "b/c.jpeg",
            "b/d/e.PNG",
            "b/d/f/g.webp",
            "h.gif",
            "notes.txt",
            "b/raw.cr2",
            "node_modules/pkg/icon.png",
            "b/thumbs/t.jpg",
        ],
    );
    let skip = ShowroomConfig::default().catalog.skip_dirs;

    let mut found: Vec<String> = crawl(OsLister, tmp.path(), &skip)
        .map(|f| f.relative_path)
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec!["a.JPG", "b/c.jpeg", "b/d/e.PNG", "b/d/f/g.webp", "h.gif"]
    );
}

#[test]
fn repeated_scans_agree() {
    let fs = MemoryFs::new()
        .with_file("/r/fleet/orbit/1.jpg")
        .with_file("/r/fleet/2.jpg")
        .with_file("/r/3.jpg");
    let catalog = Catalog::new(
        fs,
        CatalogConfig {
            root: "/r".into(),
            ..CatalogConfig::default()
        },
    );
    assert_eq!(catalog.scan(), catalog.scan());
}

#[test]
fn product_detail_flow() {
    let tmp = TempDir::new().unwrap();
    write_files(
        tmp.path(),
        &[
            "public/images/models/voyager_xl/01.jpg",
            "public/images/models/voyager_xl/02.jpg",
            "public/images/models/voyager_xl/03.jpg",
            "public/images/models/voyager_xl/04.jpg",
            "public/images/models/voyager_xl/05.jpg",
            "public/images/models/voyager_xl/06.jpg",
            "public/images/models/orbit-7/exterior/01.jpg",
            "public/images/models/orbit-7/interior/01.jpg",
        ],
    );
    let config = load_config(tmp.path()).unwrap();
    let resolver = SlugResolver::new(&config.slugs);
    let partitioner = Partitioner::new(&config.partition);

    let voyager = resolve_model_images(&OsLister, &resolver, &config.models, "voyager-xl");
    let p = voyager.partition(&partitioner);
    assert_eq!(p.exterior.len(), 5);
    assert_eq!(p.interior, vec!["/images/models/voyager_xl/06.jpg"]);

    let orbit = resolve_model_images(&OsLister, &resolver, &config.models, "orbit-7");
    let p = orbit.partition(&partitioner);
    assert_eq!(p.exterior, vec!["/images/models/orbit-7/exterior/01.jpg"]);
    assert_eq!(p.interior, vec!["/images/models/orbit-7/interior/01.jpg"]);
}

#[test]
fn albums_survive_reopen_through_file_port() {
    let tmp = TempDir::new().unwrap();
    let id = {
        let mut store = AlbumStore::open(FilePort::new(tmp.path(), "showroom.albums")).unwrap();
        let id = store.create_album("Favorites").unwrap().id;
        let mut drag = DragController::new();
        drag.begin("modelA/x.jpg");
        drag.drop_on(&mut store, id).unwrap();
        assert_eq!(drag.state(), &DragState::Idle);
        id
    };

    let store = AlbumStore::open(FilePort::new(tmp.path(), "showroom.albums")).unwrap();
    assert_eq!(store.album(id).unwrap().images, vec!["modelA/x.jpg"]);
}
