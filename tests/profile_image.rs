use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tweetbox::{
    reset_data, seed_demo_data, AccountError, Accounts, AccountsConfig, KvStore, MemoryStore,
    NewUserAccount,
};

/// Memory store whose upload writes can be made to fail.
#[derive(Default)]
struct FlakyUploadStore {
    inner: MemoryStore,
    fail_uploads: AtomicBool,
}

impl KvStore for FlakyUploadStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        if key.starts_with("upload:") && self.fail_uploads.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.inner.delete(key)
    }
}

fn sample_gif() -> Vec<u8> {
    let img = RgbaImage::from_pixel(120, 80, Rgba([200, 30, 30, 255]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::Gif)
        .unwrap();
    buf.into_inner()
}

fn accounts() -> Accounts<MemoryStore> {
    Accounts::new(Arc::new(MemoryStore::new()))
}

fn valid_attrs() -> NewUserAccount {
    NewUserAccount::new("abcde", "123456")
        .with_email("a@a.com")
        .with_phone("010-2222-0000")
}

#[test]
fn test_profile_image_is_saved() {
    let accounts = accounts();
    let user = accounts.create(valid_attrs()).unwrap();

    let urls = accounts.attach_profile_image(user.id, &sample_gif(), "sample.gif").unwrap();

    assert_eq!(urls.original_url, "/uploads/user/profile_image/1/sample.gif");
    assert_eq!(accounts.find(user.id).unwrap().unwrap().profile_image.as_deref(), Some("sample.gif"));
}

#[test]
fn test_profile_thumb_image_url() {
    let accounts = accounts();
    let user = accounts.create(valid_attrs()).unwrap();

    let urls = accounts.attach_profile_image(user.id, &sample_gif(), "sample.gif").unwrap();

    assert_eq!(urls.thumbnail_url, "/uploads/user/profile_image/1/thumb_sample.gif");
    assert_eq!(accounts.profile_image_urls(user.id).unwrap(), Some(urls));
}

#[test]
fn test_uploads_are_readable_and_thumbnail_is_smaller() {
    let accounts = accounts();
    let user = accounts.create(valid_attrs()).unwrap();
    let original = sample_gif();

    let urls = accounts.attach_profile_image(user.id, &original, "sample.gif").unwrap();

    assert_eq!(accounts.read_upload(&urls.original_url).unwrap(), Some(original));

    let thumb = accounts.read_upload(&urls.thumbnail_url).unwrap().unwrap();
    assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Gif);
    let thumb = image::load_from_memory(&thumb).unwrap();
    assert!(thumb.width() <= 50 && thumb.height() <= 50);
    assert_eq!(thumb.width(), 50);
}

#[test]
fn test_replacing_image_drops_old_files() {
    let accounts = accounts();
    let user = accounts.create(valid_attrs()).unwrap();

    let first = accounts.attach_profile_image(user.id, &sample_gif(), "first.gif").unwrap();
    let second = accounts.attach_profile_image(user.id, &sample_gif(), "second.gif").unwrap();

    assert!(accounts.read_upload(&first.original_url).unwrap().is_none());
    assert!(accounts.read_upload(&first.thumbnail_url).unwrap().is_none());
    assert!(accounts.read_upload(&second.original_url).unwrap().is_some());
    assert!(accounts.read_upload(&second.thumbnail_url).unwrap().is_some());
    assert_eq!(accounts.profile_image_urls(user.id).unwrap(), Some(second));
}

#[test]
fn test_failed_replacement_keeps_current_image() {
    let store = Arc::new(FlakyUploadStore::default());
    let accounts = Accounts::new(store.clone());
    let user = accounts.create(valid_attrs()).unwrap();
    let first = accounts.attach_profile_image(user.id, &sample_gif(), "first.gif").unwrap();

    store.fail_uploads.store(true, Ordering::SeqCst);
    let err = accounts.attach_profile_image(user.id, &sample_gif(), "second.gif").unwrap_err();
    assert!(matches!(err, AccountError::Store(_)));

    assert!(accounts.read_upload(&first.original_url).unwrap().is_some());
    assert!(accounts.read_upload(&first.thumbnail_url).unwrap().is_some());
    assert_eq!(accounts.profile_image_urls(user.id).unwrap(), Some(first));
}

#[test]
fn test_reuploading_same_filename_keeps_files() {
    let accounts = accounts();
    let user = accounts.create(valid_attrs()).unwrap();

    accounts.attach_profile_image(user.id, &sample_gif(), "sample.gif").unwrap();
    let urls = accounts.attach_profile_image(user.id, &sample_gif(), "sample.gif").unwrap();

    assert!(accounts.read_upload(&urls.original_url).unwrap().is_some());
    assert!(accounts.read_upload(&urls.thumbnail_url).unwrap().is_some());
}

#[test]
fn test_upload_root_comes_from_config() {
    let config = AccountsConfig {
        upload_root: "/media".to_string(),
        ..AccountsConfig::default()
    };
    let accounts = Accounts::with_config(Arc::new(MemoryStore::new()), config);
    let user = accounts.create(valid_attrs()).unwrap();

    let urls = accounts.attach_profile_image(user.id, &sample_gif(), "sample.gif").unwrap();
    assert_eq!(urls.original_url, "/media/user/profile_image/1/sample.gif");
}

#[test]
fn test_invalid_uploads_are_rejected_without_writes() {
    let accounts = accounts();
    let user = accounts.create(valid_attrs()).unwrap();

    let err = accounts.attach_profile_image(user.id, b"GIF89a broken", "sample.gif").unwrap_err();
    assert!(matches!(err, AccountError::Image(_)));

    let err = accounts.attach_profile_image(user.id, &sample_gif(), "../").unwrap_err();
    assert!(matches!(err, AccountError::Validation(_)));

    assert!(accounts.profile_image_urls(user.id).unwrap().is_none());
    assert!(matches!(
        accounts.attach_profile_image(7, &sample_gif(), "sample.gif"),
        Err(AccountError::NotFound(_))
    ));
}

#[test]
fn test_seed_is_idempotent_and_reset_clears_everything() {
    let store = Arc::new(MemoryStore::new());
    let accounts = Accounts::new(Arc::clone(&store));

    seed_demo_data(&accounts).unwrap();
    seed_demo_data(&accounts).unwrap();

    let users = accounts.list().unwrap();
    assert_eq!(users.len(), 3);
    let tester = accounts.find_by_name("tester").unwrap().unwrap();
    assert_eq!(accounts.favorite_tweets_of(tester.id).unwrap().len(), 1);

    accounts.attach_profile_image(tester.id, &sample_gif(), "sample.gif").unwrap();

    reset_data(store.as_ref(), accounts.config()).unwrap();
    assert!(store.is_empty());
}
