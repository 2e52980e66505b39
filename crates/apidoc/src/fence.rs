//! Code fence tracking for the annotation scanner.
//!
//! Tag markers inside fenced code blocks are literal text.

/// Tracks code fence state during line-by-line scanning.
///
/// Fences use three or more backticks or tildes. The closing fence must use
/// the same character, be at least as long as the opening one, and carry
/// nothing but trailing whitespace.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(u8, usize)>,
}

impl FenceTracker {
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line (container prefix already removed).
    ///
    /// Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, content: &str) -> bool {
        let trimmed = content.trim_start();
        match self.open {
            Some((ch, len)) => {
                let run = run_length(trimmed, ch);
                let closes = run >= len && trimmed[run..].trim().is_empty();
                if closes {
                    self.open = None;
                }
                closes
            }
            None => match opening(trimmed) {
                Some(fence) => {
                    self.open = Some(fence);
                    true
                }
                None => false,
            },
        }
    }
}

/// Whether `content` starts a fenced code block.
pub(crate) fn opens_fence(content: &str) -> bool {
    opening(content.trim_start()).is_some()
}

fn opening(trimmed: &str) -> Option<(u8, usize)> {
    let ch = *trimmed.as_bytes().first()?;
    if ch != b'`' && ch != b'~' {
        return None;
    }
    let run = run_length(trimmed, ch);
    // A backtick fence's info string cannot contain backticks.
    if run < 3 || (ch == b'`' && trimmed[run..].contains('`')) {
        return None;
    }
    Some((ch, run))
}

fn run_length(s: &str, ch: u8) -> usize {
    s.bytes().take_while(|&b| b == ch).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        assert!(!FenceTracker::default().in_fence());
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::default();
        assert!(tracker.update("```js"));
        assert!(tracker.in_fence());
        assert!(!tracker.update("@param {T} x"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence_ignores_backticks() {
        let mut tracker = FenceTracker::default();
        assert!(tracker.update("~~~"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
        assert!(tracker.update("~~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_shorter_fence_does_not_close() {
        let mut tracker = FenceTracker::default();
        tracker.update("````");
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_with_text_does_not_close() {
        let mut tracker = FenceTracker::default();
        tracker.update("```");
        assert!(!tracker.update("``` js"));
        assert!(tracker.in_fence());
        assert!(tracker.update("   ```  "));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_opens_fence() {
        assert!(opens_fence("```"));
        assert!(opens_fence("  ~~~ toml"));
        assert!(!opens_fence("``"));
        assert!(!opens_fence("``` a`b"));
        assert!(!opens_fence("text ```"));
    }
}
