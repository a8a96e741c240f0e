// Pure navigation logic - no Tauri imports allowed.
// Address-bar interpretation and the command dispatcher over a page view.

use url::Url;
use crate::settings::SearchEngine;

/// Turns address-bar text into a navigation target.
///
/// Anything that parses as an absolute URL is returned exactly as typed;
/// everything else becomes a search. `google.com` and `localhost:3000` are
/// treated like the engine treats them: the first has no scheme and is
/// searched for, the second parses with scheme `localhost`.
///
/// This never touches the network and never fails.
pub fn resolve_address(input: &str, engine: SearchEngine) -> String {
    match Url::parse(input) {
        Ok(u) if !u.scheme().is_empty() => input.to_string(),
        _ => engine.query_url(input),
    }
}

/// The command surface of an embedded page view.
pub trait PageView {
    fn load(&self, url: &str) -> Result<(), String>;
    fn back(&self) -> Result<(), String>;
    fn forward(&self) -> Result<(), String>;
    fn reload(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    Back,
    Forward,
    Reload,
    Navigate(String),
}

/// Sends `command` to the active view. Returns false when there is no
/// active view, in which case nothing happens.
pub fn dispatch<V: PageView + ?Sized>(view: Option<&V>, command: &NavCommand) -> bool {
    let Some(view) = view else {
        return false;
    };

    let result = match command {
        NavCommand::Back => view.back(),
        NavCommand::Forward => view.forward(),
        NavCommand::Reload => view.reload(),
        NavCommand::Navigate(url) => view.load(url),
    };

    if let Err(e) = result {
        log::warn!("[Navigation] {:?} failed: {}", command, e);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;

    // --- resolve_address tests ---

    #[rstest]
    #[case("https://example.com")]
    #[case("http://example.com/path?query=1#top")]
    #[case("file:///home/user/doc.html")]
    #[case("about:blank")]
    #[case("mailto:someone@example.com")]
    #[case("localhost:3000")]
    fn test_absolute_urls_unchanged(#[case] input: &str) {
        assert_eq!(resolve_address(input, SearchEngine::Google), input);
    }

    #[rstest]
    #[case("rust", "https://www.google.com/search?q=rust")]
    #[case("google.com", "https://www.google.com/search?q=google.com")]
    #[case("c++", "https://www.google.com/search?q=c++")]
    #[case("café", "https://www.google.com/search?q=café")]
    #[case("", "https://www.google.com/search?q=")]
    fn test_schemeless_input_searched_verbatim(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve_address(input, SearchEngine::Google), expected);
    }

    #[rstest]
    #[case("openai chat gpt", "https://www.google.com/search?q=openai+chat+gpt")]
    #[case("what is tauri", "https://www.google.com/search?q=what+is+tauri")]
    #[case("two  spaces", "https://www.google.com/search?q=two++spaces")]
    #[case("https://example.com with words", "https://www.google.com/search?q=https://example.com+with+words")]
    fn test_spaces_become_plus(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve_address(input, SearchEngine::Google), expected);
    }

    #[test]
    fn test_configured_engine_is_used() {
        assert_eq!(
            resolve_address("hello world", SearchEngine::DuckDuckGo),
            "https://duckduckgo.com/?q=hello+world"
        );
    }

    // --- dispatch tests ---

    #[derive(Default)]
    struct RecordingView {
        calls: RefCell<Vec<String>>,
        fail: bool,
    }

    impl RecordingView {
        fn record(&self, call: String) -> Result<(), String> {
            self.calls.borrow_mut().push(call);
            if self.fail {
                Err("webview destroyed".to_string())
            } else {
                Ok(())
            }
        }
    }

    impl PageView for RecordingView {
        fn load(&self, url: &str) -> Result<(), String> {
            self.record(format!("load {}", url))
        }
        fn back(&self) -> Result<(), String> {
            self.record("back".to_string())
        }
        fn forward(&self) -> Result<(), String> {
            self.record("forward".to_string())
        }
        fn reload(&self) -> Result<(), String> {
            self.record("reload".to_string())
        }
    }

    #[test]
    fn test_dispatch_routes_commands() {
        let view = RecordingView::default();
        let commands = [
            NavCommand::Back,
            NavCommand::Forward,
            NavCommand::Reload,
            NavCommand::Navigate("https://discord.com".to_string()),
        ];
        for command in &commands {
            assert!(dispatch(Some(&view), command));
        }

        assert_eq!(
            *view.calls.borrow(),
            vec!["back", "forward", "reload", "load https://discord.com"]
        );
    }

    #[test]
    fn test_dispatch_without_view_is_noop() {
        assert!(!dispatch::<RecordingView>(None, &NavCommand::Reload));
    }

    #[test]
    fn test_dispatch_swallows_view_errors() {
        let view = RecordingView { fail: true, ..Default::default() };
        assert!(dispatch(Some(&view), &NavCommand::Back));
        assert_eq!(view.calls.borrow().len(), 1);
    }
}
