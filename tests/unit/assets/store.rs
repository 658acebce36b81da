use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([0, 0, 255, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn memory_store(files: &[(&str, Vec<u8>)]) -> AssetStore {
    let mut src = MemoryAssetSource::new();
    for (name, bytes) in files {
        src.insert(name, bytes.clone()).unwrap();
    }
    AssetStore::new(src, AssetStoreOpts { threads: Some(2) })
}

#[test]
fn normalize_rel_path_basic() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path(r"a\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn callback_fires_immediately_when_nothing_pending() {
    let mut store = memory_store(&[]);
    let fired = Rc::new(RefCell::new(0));
    let f = fired.clone();
    store.on_all_loaded(move || *f.borrow_mut() += 1);
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn queued_callbacks_fire_once_in_registration_order() {
    let mut store = memory_store(&[("a.png", png_bytes(2, 3)), ("b.png", png_bytes(1, 1))]);
    store.load_asset("a.png").unwrap();
    store.load_asset("b.png").unwrap();
    store.load_asset("./a.png").unwrap();
    assert_eq!(store.pending(), 2);

    let log = Rc::new(RefCell::new(Vec::new()));
    for i in 0..3 {
        let l = log.clone();
        store.on_all_loaded(move || l.borrow_mut().push(i));
    }
    assert!(log.borrow().is_empty());

    store.load_pending().unwrap();
    assert_eq!(store.pending(), 0);
    assert_eq!(*log.borrow(), vec![0, 1, 2]);

    store.load_pending().unwrap();
    assert_eq!(*log.borrow(), vec![0, 1, 2]);

    let a = store.get_asset("a.png").unwrap();
    assert_eq!((a.width(), a.height()), (2, 3));
}

#[test]
fn use_before_completion_is_an_asset_error() {
    let mut store = memory_store(&[("a.png", png_bytes(1, 1))]);
    store.load_asset("a.png").unwrap();
    let err = store.get_asset("a.png").unwrap_err();
    assert!(matches!(err, ReelError::Asset(_)));
    assert!(err.to_string().contains("before loading completed"));
    assert!(matches!(
        store.get_asset("missing.png"),
        Err(ReelError::Asset(_))
    ));
}

#[test]
fn failed_load_settles_and_reports() {
    let mut store = memory_store(&[("ok.png", png_bytes(1, 1)), ("bad.png", b"nope".to_vec())]);
    store.load_asset("ok.png").unwrap();
    store.load_asset("bad.png").unwrap();
    store.load_asset("gone.png").unwrap();

    let fired = Rc::new(RefCell::new(false));
    let f = fired.clone();
    store.on_all_loaded(move || *f.borrow_mut() = true);

    let err = store.load_pending().unwrap_err();
    assert!(err.to_string().contains("bad.png"), "{err}");
    assert!(*fired.borrow());
    assert_eq!(store.pending(), 0);
    assert!(store.get_asset("ok.png").is_ok());
    assert!(store.get_asset("gone.png").is_err());
}

#[test]
fn zero_threads_is_rejected() {
    let mut store = AssetStore::new(MemoryAssetSource::new(), AssetStoreOpts { threads: Some(0) });
    store.load_asset("x.png").unwrap();
    assert!(store.load_pending().is_err());
}

#[test]
fn fs_source_reads_relative_to_root() {
    let dir = std::env::temp_dir().join(format!("reelplay_fs_source_{}", std::process::id()));
    std::fs::create_dir_all(dir.join("img")).unwrap();
    std::fs::write(dir.join("img/a.png"), png_bytes(4, 4)).unwrap();

    let mut store = AssetStore::new(FsAssetSource::new(&dir), AssetStoreOpts::default());
    store.load_asset("img/a.png").unwrap();
    store.load_pending().unwrap();
    assert_eq!(store.get_asset("img/a.png").unwrap().width(), 4);

    let _ = std::fs::remove_dir_all(&dir);
}
