//! Best-effort enrichment of free-text analysis: platform, niche and audience size.
//!
//! These are text heuristics. False positives and misses are expected.

use std::sync::LazyLock;

use regex::Regex;

use crate::records::{DEFAULT_AUDIENCE, DEFAULT_NICHE};

/// Platform label meaning "the user did not pick one".
pub const ALL_PLATFORMS: &str = "All Platforms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::YouTube,
        Platform::Instagram,
        Platform::TikTok,
        Platform::Twitter,
    ];

    /// Used when nothing in the text names a platform.
    pub const FALLBACK: Platform = Platform::YouTube;

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::Twitter => "Twitter",
        }
    }

    /// Case-insensitive lookup by label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label))
    }

    /// Niche assumed for a platform when the text does not state one.
    #[must_use]
    pub fn default_niche(self) -> &'static str {
        match self {
            Platform::Instagram => "Lifestyle",
            Platform::YouTube | Platform::TikTok => "Entertainment",
            Platform::Twitter => "Commentary",
        }
    }
}

static PLATFORM_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)youtube|instagram|tiktok|twitter").expect("valid platform regex")
});

static NICHE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)niche:?\s*([^.,:;\n]+)",
        r"(?i)category:?\s*([^.,:;\n]+)",
        r"(?i)content\s*(?:type|category):?\s*([^.,:;\n]+)",
        r"(?i)primarily\s*(?:in|focuses\s*on):?\s*([^.,:;\n]+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid niche regex"))
    .collect()
});

static AUDIENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)([0-9.]+\s*[mk])\s*followers",
        r"(?i)followers:?\s*([0-9.]+\s*[mk])",
        r"(?i)audience\s*(?:size|of):?\s*([0-9.]+\s*[mk])",
        r"(?i)subscribers?\s*(?:base|count):?\s*([0-9.]+\s*[mk])",
        r"(?i)([0-9.]+\s*[mk])\s*subscribers",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid audience regex"))
    .collect()
});

/// Most frequently mentioned platform in `text`.
///
/// Ties go to the platform mentioned first. `None` when no platform is named.
#[must_use]
pub fn detect_platform(text: &str) -> Option<Platform> {
    // (platform, count) in order of first mention
    let mut counts: Vec<(Platform, usize)> = Vec::new();
    for m in PLATFORM_MENTION.find_iter(text) {
        let Some(platform) = Platform::from_label(m.as_str()) else {
            continue;
        };
        match counts.iter_mut().find(|(p, _)| *p == platform) {
            Some((_, n)) => *n += 1,
            None => counts.push((platform, 1)),
        }
    }

    let mut best: Option<(Platform, usize)> = None;
    for (platform, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((platform, n));
        }
    }
    best.map(|(p, _)| p)
}

/// Platform to file a record under.
///
/// A non-blank user selection other than [`ALL_PLATFORMS`] wins. Otherwise the
/// text is scanned, falling back to [`Platform::FALLBACK`].
#[must_use]
pub fn resolve_platform(selected: Option<&str>, text: &str) -> String {
    match selected.map(str::trim) {
        Some(choice) if !choice.is_empty() && !choice.eq_ignore_ascii_case(ALL_PLATFORMS) => {
            choice.to_string()
        }
        _ => detect_platform(text)
            .unwrap_or(Platform::FALLBACK)
            .label()
            .to_string(),
    }
}

/// Niche label stated in `text`, else the platform default, else "General".
#[must_use]
pub fn extract_niche(text: &str, platform: &str) -> String {
    for pattern in NICHE_PATTERNS.iter() {
        let found = pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty());
        if let Some(niche) = found {
            return niche.to_string();
        }
    }

    Platform::from_label(platform)
        .map_or(DEFAULT_NICHE, Platform::default_niche)
        .to_string()
}

/// Audience size such as `"12.5M"` stated in `text`, else "Unknown".
#[must_use]
pub fn extract_audience(text: &str) -> String {
    AUDIENCE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text).and_then(|c| c.get(1)))
        .map_or_else(
            || DEFAULT_AUDIENCE.to_string(),
            |m| m.as_str().trim().to_uppercase(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_platform_picks_most_frequent() {
        let text = "Big on TikTok. Also posts to instagram, and Instagram reels do well on INSTAGRAM.";
        assert_eq!(detect_platform(text), Some(Platform::Instagram));
    }

    #[test]
    fn detect_platform_ties_go_to_first_mention() {
        let text = "Twitter threads and YouTube videos.";
        assert_eq!(detect_platform(text), Some(Platform::Twitter));
    }

    #[test]
    fn detect_platform_none_without_mentions() {
        assert_eq!(detect_platform("A podcaster with a loyal following."), None);
    }

    #[test]
    fn resolve_platform_respects_user_choice() {
        assert_eq!(resolve_platform(Some("Twitch"), "all about YouTube"), "Twitch");
    }

    #[test]
    fn resolve_platform_scans_for_all_platforms() {
        assert_eq!(
            resolve_platform(Some("All Platforms"), "mostly on tiktok"),
            "TikTok"
        );
        assert_eq!(resolve_platform(None, "tiktok and TikTok"), "TikTok");
    }

    #[test]
    fn resolve_platform_falls_back_to_youtube() {
        assert_eq!(resolve_platform(None, "no platform named here"), "YouTube");
        assert_eq!(resolve_platform(Some("  "), ""), "YouTube");
    }

    #[test]
    fn extract_niche_reads_cue_words() {
        assert_eq!(
            extract_niche("Niche: Gaming and esports. Huge reach.", "YouTube"),
            "Gaming and esports"
        );
        assert_eq!(
            extract_niche("Content category: fitness, mostly", "YouTube"),
            "fitness"
        );
        assert_eq!(
            extract_niche("She primarily focuses on skincare; rarely anything else", "TikTok"),
            "skincare"
        );
    }

    #[test]
    fn extract_niche_first_pattern_wins() {
        let text = "Category: Comedy. Niche: Pranks.";
        assert_eq!(extract_niche(text, "YouTube"), "Pranks");
    }

    #[test]
    fn extract_niche_falls_back_to_platform_table() {
        assert_eq!(extract_niche("nothing useful", "instagram"), "Lifestyle");
        assert_eq!(extract_niche("nothing useful", "Twitter"), "Commentary");
        assert_eq!(extract_niche("nothing useful", "TikTok"), "Entertainment");
        assert_eq!(extract_niche("nothing useful", "Twitch"), "General");
    }

    #[test]
    fn extract_audience_matches_number_and_unit() {
        assert_eq!(extract_audience("He has 250m followers worldwide"), "250M");
        assert_eq!(extract_audience("Followers: 3.4k and growing"), "3.4K");
        assert_eq!(extract_audience("An audience of 12 M"), "12 M");
        assert_eq!(extract_audience("subscriber count: 90k"), "90K");
        assert_eq!(extract_audience("over 5.5M subscribers on the main channel"), "5.5M");
    }

    #[test]
    fn extract_audience_unknown_without_match() {
        assert_eq!(extract_audience("a sizeable audience"), "Unknown");
        assert_eq!(extract_audience("millions of followers"), "Unknown");
    }
}
