//! Collision-resistant asset names: `<millis>-<suffix>.<ext>`.
//!
//! Nothing in the name comes from the uploaded file, so user text can never
//! steer where an asset lands.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use super::media::extension_for;

const SUFFIX_LEN: usize = 10;

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Wall-clock millis, clamped so successive calls never go backwards.
fn next_millis() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let previous = LAST_MILLIS.fetch_max(now, Ordering::SeqCst);
    previous.max(now)
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

pub fn generate(media_type: &str) -> String {
    format!(
        "{:013}-{}.{}",
        next_millis(),
        random_suffix(),
        extension_for(media_type)
    )
}

/// Creation time embedded in a generated name.
pub fn timestamp_of(name: &str) -> Option<DateTime<Utc>> {
    let (millis, _) = name.split_once('-')?;
    if millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    DateTime::from_timestamp_millis(millis.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::asset::is_valid_name;

    #[test]
    fn names_are_unique_and_valid() {
        let names: HashSet<String> = (0..500).map(|_| generate("image/png")).collect();
        assert_eq!(names.len(), 500);
        assert!(names.iter().all(|n| is_valid_name(n) && n.ends_with(".png")));
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut last = 0;
        for _ in 0..100 {
            let name = generate("image/jpeg");
            let ts = timestamp_of(&name).unwrap().timestamp_millis();
            assert!(ts >= last);
            last = ts;
        }
    }

    #[test]
    fn unrecognised_type_gets_default_extension() {
        assert!(generate("image/x-made-up").ends_with(".bin"));
    }

    #[test]
    fn timestamp_of_foreign_names() {
        assert!(timestamp_of("photo.jpg").is_none());
        assert!(timestamp_of("abc-def.jpg").is_none());
        let ts = timestamp_of("1718000000000-abcdefghij.jpg").unwrap();
        assert_eq!(ts.timestamp_millis(), 1_718_000_000_000);
    }
}
