// Copyright (c) 2021 MASSA LABS <info@massa.net>
//! Structured trace events: `don_trace!("onboarding.node.register", {"node": name})`
//! emits a `tracing` trace record whose message is the event name followed by
//! its JSON parameters, so traces can be grepped and parsed back.

/// Re-exported so the macro resolves from crates that do not depend on them.
#[doc(hidden)]
pub use serde_json as __serde_json;
#[doc(hidden)]
pub use tracing as __tracing;

#[macro_export]
macro_rules! don_trace {
    ($evt:expr, $params:tt) => {
        $crate::__tracing::trace!(
            "don_trace:{}:{}",
            $evt,
            $crate::__serde_json::json!($params)
        );
    };
}
