use std::collections::HashMap;

use crate::contract::ResourceTag;

pub const BACKUP_TAG_KEY: &str = "Backup";
pub const BACKUP_TAG_KEY_LOWER: &str = "backup";
pub const BACKUP_ENABLED_VALUE: &str = "true";

pub fn tag_map(tags: &[ResourceTag]) -> HashMap<&str, &str> {
    tags.iter()
        .map(|tag| (tag.key.as_str(), tag.value.as_str()))
        .collect()
}

/// Value of the `Backup` tag, falling back to `backup`. Only these two
/// spellings of the key are recognised.
pub fn backup_tag_value<'a>(tags: &HashMap<&'a str, &'a str>) -> Option<&'a str> {
    tags.get(BACKUP_TAG_KEY)
        .or_else(|| tags.get(BACKUP_TAG_KEY_LOWER))
        .copied()
}

pub fn is_backup_enabled(tags: &[ResourceTag]) -> bool {
    backup_tag_value(&tag_map(tags)) == Some(BACKUP_ENABLED_VALUE)
}
