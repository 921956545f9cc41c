//! Build a SessionContext for one test session.

use crate::types::SessionContext;
use data_loader::{ItemId, TestSession};

/// Gather the sets the backfill filters consult
///
/// `base` is the ranked list for the session's last item, when there is one.
pub fn build_session_context(session: &TestSession, base: Option<&[ItemId]>) -> SessionContext {
    let mut context = SessionContext::new(session.locale.clone());
    context.seen_items.extend(session.items.iter().cloned());
    if let Some(base) = base {
        context.ranked_items.extend(base.iter().cloned());
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_session_context() {
        let session = TestSession {
            items: vec!["P".to_string(), "Q".to_string(), "P".to_string()],
            locale: "JP".to_string(),
        };
        let base = vec!["A".to_string(), "B".to_string()];

        let context = build_session_context(&session, Some(&base));
        assert_eq!(context.locale, "JP");
        assert_eq!(context.seen_items.len(), 2);
        assert!(context.seen_items.contains("Q"));
        assert!(context.ranked_items.contains("A"));
        assert!(context.ranked_items.contains("B"));
    }

    #[test]
    fn test_build_session_context_without_base() {
        let session = TestSession {
            items: vec!["P".to_string()],
            locale: "DE".to_string(),
        };
        let context = build_session_context(&session, None);
        assert!(context.ranked_items.is_empty());
        assert!(context.seen_items.contains("P"));
    }
}
