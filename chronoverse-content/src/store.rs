//! Content store over an in-memory image

use chronoverse_core::content::ContentBucket;
use chronoverse_core::time::HourKey;
use chronoverse_core::traits::{ContentStore, StoreError};

use crate::image::ContentImage;

/// [`ContentStore`] backed by a fully readable image, e.g. memory-mapped
/// flash or a file loaded on the host
pub struct ImageContentStore<'a> {
    image: ContentImage<'a>,
}

impl<'a> ImageContentStore<'a> {
    pub fn new(image: ContentImage<'a>) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &ContentImage<'a> {
        &self.image
    }
}

impl ContentStore for ImageContentStore<'_> {
    fn load_bucket(&mut self, hour: HourKey) -> Result<ContentBucket, StoreError> {
        Ok(self.image.load(hour)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageBuilder;
    use chronoverse_core::content::ContentEntry;
    use chronoverse_core::resolver::{ContentResolver, ResolveStatus};
    use chronoverse_core::time::{MinuteKey, Timestamp};

    #[test]
    fn test_resolves_through_image() {
        let mut bucket = ContentBucket::new(HourKey::new(5).unwrap());
        bucket.insert(
            MinuteKey::from_minute(7).unwrap(),
            ContentEntry::new("Psalm (Psalms)", "The Lord is my shepherd"),
        );
        let mut builder = ImageBuilder::new();
        builder.insert(&bucket).unwrap();
        let bytes = builder.build().unwrap();

        let store = ImageContentStore::new(ContentImage::parse(&bytes).unwrap());
        let mut resolver = ContentResolver::new(store);

        let resolution = resolver.resolve(&Timestamp::new(5, 7, 0, 0).unwrap());
        assert_eq!(resolution.status, ResolveStatus::Found);
        assert_eq!(resolution.payload.time_text.as_str(), "05:07");
        assert_eq!(resolution.payload.label.as_deref(), Some("[Psalms]"));

        let resolution = resolver.resolve(&Timestamp::new(6, 7, 0, 0).unwrap());
        assert_eq!(
            resolution.status,
            ResolveStatus::LoadFailed(StoreError::NotFound)
        );
        assert!(resolution.payload.is_blank());
    }
}
