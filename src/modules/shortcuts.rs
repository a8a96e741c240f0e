// Named destinations offered by the toolbar's site selector.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    pub name: &'static str,
    pub url: &'static str,
}

/// In selector order.
pub const SHORTCUTS: [Shortcut; 5] = [
    Shortcut { name: "Google", url: "https://www.google.com" },
    Shortcut { name: "Discord", url: "https://discord.com" },
    Shortcut { name: "Spotify", url: "https://www.spotify.com" },
    Shortcut { name: "Amazon", url: "https://www.amazon.com" },
    Shortcut { name: "YouTube", url: "https://www.youtube.com" },
];

pub fn lookup(name: &str) -> Option<&'static Shortcut> {
    SHORTCUTS.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Google", "https://www.google.com")]
    #[case("Discord", "https://discord.com")]
    #[case("Spotify", "https://www.spotify.com")]
    #[case("Amazon", "https://www.amazon.com")]
    #[case("YouTube", "https://www.youtube.com")]
    fn test_lookup(#[case] name: &str, #[case] url: &str) {
        assert_eq!(lookup(name).map(|s| s.url), Some(url));
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(lookup("youtube").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_targets_are_valid_urls() {
        for shortcut in &SHORTCUTS {
            assert!(url::Url::parse(shortcut.url).is_ok(), "{}", shortcut.name);
        }
    }
}
