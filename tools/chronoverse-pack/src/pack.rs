//! Directory scan and image assembly

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chronoverse_content::{parse_bucket_json, parse_resource_name, ImageBuilder};
use chronoverse_core::time::HourKey;

/// What went into an image
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Entry count per packed hour
    pub hours: Vec<(HourKey, usize)>,
    /// Hours with no file in the input directory
    pub missing: Vec<HourKey>,
}

pub struct Packed {
    pub image: Vec<u8>,
    pub summary: PackSummary,
}

/// Bucket files in `dir` keyed by hour
pub fn discover(dir: &Path, prefix: &str) -> Result<BTreeMap<HourKey, PathBuf>> {
    let mut files = BTreeMap::new();
    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        let name = entry.file_name();
        let Some(hour) = name.to_str().and_then(|n| parse_resource_name(prefix, n)) else {
            continue;
        };
        files.insert(hour, entry.path());
    }
    Ok(files)
}

/// Parse every bucket in `dir` and lay them out as one image
pub fn pack_dir(dir: &Path, prefix: &str) -> Result<Packed> {
    let files = discover(dir, prefix)?;
    if files.is_empty() {
        bail!(
            "no files named {}HH.json in {}",
            prefix,
            dir.display()
        );
    }

    let mut builder = ImageBuilder::new();
    let mut summary = PackSummary::default();
    for (&hour, path) in &files {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let bucket = parse_bucket_json(hour, &bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        builder
            .insert(&bucket)
            .with_context(|| format!("encoding hour {}", hour))?;
        summary.hours.push((hour, bucket.len()));
    }
    summary.missing = HourKey::all().filter(|h| !files.contains_key(h)).collect();

    let image = builder.build().context("building image")?;
    Ok(Packed { image, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronoverse_content::{ContentImage, DEFAULT_PREFIX};
    use chronoverse_core::time::MinuteKey;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) {
        fs::write(dir.path().join(name), body).unwrap();
    }

    #[test]
    fn test_discover_skips_other_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bible_verses_hour05.json", "{}");
        write(&dir, "bible_verses_hour24.json", "{}");
        write(&dir, "bible_verses_hour25.json", "{}");
        write(&dir, "notes.txt", "");

        let files = discover(dir.path(), DEFAULT_PREFIX).unwrap();
        let hours: Vec<u8> = files.keys().map(|h| h.get()).collect();
        assert_eq!(hours, [5, 24]);
    }

    #[test]
    fn test_pack_and_read_back() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "bible_verses_hour05.json",
            r#"{"07": {"reference": "Psalm 23:1 (Psalms)", "text": "The Lord is my shepherd"},
                "08": {"reference": "Psalm 23:2 (Psalms)"}}"#,
        );

        let packed = pack_dir(dir.path(), DEFAULT_PREFIX).unwrap();
        assert_eq!(packed.summary.hours, [(HourKey::new(5).unwrap(), 1)]);
        assert_eq!(packed.summary.missing.len(), 23);

        let image = ContentImage::parse(&packed.image).unwrap();
        let bucket = image.load(HourKey::new(5).unwrap()).unwrap();
        let entry = bucket.get(MinuteKey::from_minute(7).unwrap()).unwrap();
        assert_eq!(entry.text, "The Lord is my shepherd");
        assert!(image.header().slot(HourKey::new(6).unwrap()).is_none());
    }

    #[test]
    fn test_bad_json_names_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bible_verses_hour01.json", "not json");

        let err = pack_dir(dir.path(), DEFAULT_PREFIX).err().unwrap();
        assert!(format!("{err:#}").contains("bible_verses_hour01.json"));
    }

    #[test]
    fn test_empty_dir_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(pack_dir(dir.path(), DEFAULT_PREFIX).is_err());
    }

    #[test]
    fn test_custom_prefix() {
        let dir = TempDir::new().unwrap();
        write(&dir, "quotes_03.json", r#"{"00": {"reference": "A", "text": "B"}}"#);

        let packed = pack_dir(dir.path(), "quotes_").unwrap();
        assert_eq!(packed.summary.hours.len(), 1);
        assert!(pack_dir(dir.path(), DEFAULT_PREFIX).is_err());
    }
}
