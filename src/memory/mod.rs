mod filesystem;
mod in_memory;
mod locks;
mod storage;

pub use filesystem::FilesystemMemoryStore;
pub use in_memory::InMemoryStore;
pub use locks::{UserLockGuard, UserLocks};
pub use storage::MemoryStore;

use crate::models::History;

pub const MAX_HISTORY_TURNS: usize = 20; // 10 user/assistant exchanges

pub const DEFAULT_USER_ID: &str = "default_user";

/// Map a caller-supplied identifier to a filesystem-safe storage key.
///
/// Every UTF-16 code unit outside `[A-Za-z0-9]` becomes `_`, so `"user!1"`
/// and `"user_1"` resolve to the same key and share one history. Characters
/// beyond the BMP count twice: `"😀"` maps to `"__"`.
pub fn sanitize_user_id(user_id: &str) -> String {
    let mut key = String::with_capacity(user_id.len());
    for c in user_id.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c);
        } else {
            key.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    key
}

/// Drop turns from the oldest end until at most `max_turns` remain.
pub fn truncate_history(history: &mut History, max_turns: usize) {
    if history.len() > max_turns {
        let excess = history.len() - max_turns;
        history.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Turn;

    #[test]
    fn sanitize_replaces_non_alphanumeric() {
        assert_eq!(sanitize_user_id("user!1"), "user_1");
        assert_eq!(sanitize_user_id("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_user_id("wx-openid:42"), "wx_openid_42");
        assert_eq!(sanitize_user_id("用户"), "__");
    }

    #[test]
    fn sanitize_counts_utf16_units() {
        assert_eq!(sanitize_user_id("😀"), "__");
        assert_eq!(sanitize_user_id("a😀b"), "a__b");
        assert_eq!(sanitize_user_id("😀"), sanitize_user_id("!?"));
        assert_ne!(sanitize_user_id("😀"), sanitize_user_id("!"));
    }

    #[test]
    fn truncate_keeps_most_recent() {
        let mut history: History = (0..25).map(|i| Turn::user(i.to_string())).collect();
        truncate_history(&mut history, MAX_HISTORY_TURNS);
        assert_eq!(history.len(), MAX_HISTORY_TURNS);
        assert_eq!(history.first().unwrap().content, "5");
        assert_eq!(history.last().unwrap().content, "24");
    }

    #[test]
    fn truncate_leaves_short_history_alone() {
        let mut history = vec![Turn::user("hi"), Turn::assistant("hello")];
        truncate_history(&mut history, MAX_HISTORY_TURNS);
        assert_eq!(history.len(), 2);
    }
}
