//! Profile image uploads, stored in the KV store keyed by their URL.

use std::io::Cursor;

use tracing::{debug, info};

use crate::config::*;
use crate::core::errors::{AccountError, AccountResult, Field, Rule, ValidationErrors};
use crate::core::helpers::sanitize_filename;
use crate::core::store::KvStore;
use crate::models::ProfileImageUrls;
use crate::users::Accounts;

pub fn profile_image_dir(upload_root: &str, user_id: u64) -> String {
    format!("{}/user/profile_image/{}", upload_root, user_id)
}

pub fn profile_image_urls(upload_root: &str, user_id: u64, filename: &str) -> ProfileImageUrls {
    let dir = profile_image_dir(upload_root, user_id);
    let encoded = urlencoding::encode(filename);
    ProfileImageUrls {
        original_url: format!("{}/{}", dir, encoded),
        thumbnail_url: format!("{}/{}{}", dir, THUMBNAIL_PREFIX, encoded),
    }
}

/// Shrink `data` to fit a `size`×`size` box, keeping its format.
pub fn generate_thumbnail(data: &[u8], size: u32) -> Result<Vec<u8>, image::ImageError> {
    let format = image::guess_format(data)?;
    let img = image::load_from_memory_with_format(data, format)?;

    let thumbnail = if img.width() <= size && img.height() <= size {
        img
    } else {
        img.thumbnail(size, size)
    };

    let mut output = Cursor::new(Vec::new());
    thumbnail.write_to(&mut output, format)?;
    Ok(output.into_inner())
}

impl<S: KvStore> Accounts<S> {
    /// Store an uploaded image and its thumbnail for `user_id`.
    pub fn attach_profile_image(
        &self,
        user_id: u64,
        data: &[u8],
        original_filename: &str,
    ) -> AccountResult<ProfileImageUrls> {
        let filename = sanitize_filename(original_filename).ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add(Field::ProfileImage, Rule::Blank);
            AccountError::from(errors)
        })?;
        let mut user = self.require_user(user_id)?;

        let thumbnail = generate_thumbnail(data, self.config.thumbnail_size)?;
        debug!(user_id, format = ?image::guess_format(data).ok(), bytes = data.len(), "thumbnail generated");

        let urls = profile_image_urls(&self.config.upload_root, user_id, &filename);

        self.store.set(&upload_key(&urls.original_url), data)?;
        self.store.set(&upload_key(&urls.thumbnail_url), &thumbnail)?;

        let previous = user.profile_image.replace(filename.clone());
        self.store.set_json(&user_key(user_id), &user)?;

        // old files go only once the record points at the new ones
        if let Some(previous) = previous.filter(|p| *p != filename) {
            let old = profile_image_urls(&self.config.upload_root, user_id, &previous);
            self.store.delete(&upload_key(&old.original_url))?;
            self.store.delete(&upload_key(&old.thumbnail_url))?;
        }

        info!(user_id, url = %urls.original_url, "profile image stored");
        Ok(urls)
    }

    pub fn profile_image_urls(&self, user_id: u64) -> AccountResult<Option<ProfileImageUrls>> {
        let user = self.require_user(user_id)?;
        Ok(user
            .profile_image
            .as_deref()
            .map(|filename| profile_image_urls(&self.config.upload_root, user_id, filename)))
    }

    /// Bytes stored under an upload URL.
    pub fn read_upload(&self, url: &str) -> AccountResult<Option<Vec<u8>>> {
        Ok(self.store.get(&upload_key(url))?)
    }
}
