use std::{
    borrow::Cow,
    time::{Duration, Instant},
};

use http::{Extensions, HeaderMap};

/// Request scoped values passed explicitly through every interceptor.
///
/// Interceptors may read or replace the context before calling the next step.
/// Nothing here is enforced by the chain: a deadline is only honored by
/// whoever checks it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    metadata: HeaderMap,
    extensions: Extensions,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline, keeping the current one if it is earlier.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });

        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_metadata(mut self, metadata: HeaderMap) -> Self {
        self.metadata = metadata;

        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn metadata(&self) -> &HeaderMap {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut HeaderMap {
        &mut self.metadata
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// What is being called.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallInfo {
    full_method: Cow<'static, str>,
}

impl CallInfo {
    /// `full_method` has the form `/package.Service/Method`.
    pub fn new(full_method: impl Into<Cow<'static, str>>) -> Self {
        Self {
            full_method: full_method.into(),
        }
    }

    pub fn full_method(&self) -> &str {
        &self.full_method
    }

    pub fn service(&self) -> Option<&str> {
        self.split().map(|(service, _)| service)
    }

    pub fn method(&self) -> Option<&str> {
        self.split().map(|(_, method)| method)
    }

    fn split(&self) -> Option<(&str, &str)> {
        self.full_method.strip_prefix('/')?.split_once('/')
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn earlier_deadline_wins() {
        let now = Instant::now();

        let context = Context::new()
            .with_deadline(now + Duration::from_secs(5))
            .with_deadline(now + Duration::from_secs(10));

        assert_eq!(context.deadline(), Some(now + Duration::from_secs(5)));
        assert!(!context.is_expired());

        let context = context.with_deadline(now);

        assert_eq!(context.deadline(), Some(now));
        assert!(context.is_expired());
        assert_eq!(context.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn context_without_deadline_never_expires() {
        let context = Context::new();

        assert!(!context.is_expired());
        assert!(context.remaining().is_none());
    }

    #[test]
    fn metadata_and_extensions_survive_clone() {
        let mut context = Context::new();

        context
            .metadata_mut()
            .insert("x-request-id", HeaderValue::from_static("42"));
        context.extensions_mut().insert(7_u32);

        let cloned = context.clone();

        assert_eq!(cloned.metadata()["x-request-id"], "42");
        assert_eq!(cloned.extensions().get::<u32>(), Some(&7));
    }

    #[test]
    fn call_info_splits_full_method() {
        let info = CallInfo::new("/orders.v1.Orders/Create");

        assert_eq!(info.full_method(), "/orders.v1.Orders/Create");
        assert_eq!(info.service(), Some("orders.v1.Orders"));
        assert_eq!(info.method(), Some("Create"));

        let info = CallInfo::new("malformed");

        assert_eq!(info.service(), None);
        assert_eq!(info.method(), None);
    }
}
