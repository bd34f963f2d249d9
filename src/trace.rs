//! Logging hooks for the detection pipeline.
//!
//! With the `tracing` feature the macros below forward to `tracing` spans and
//! events. Without it a span is a unit guard and events only evaluate their
//! field expressions, so call sites compile identically either way.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($fields:tt)*)?) => {
        tracing::info_span!($name $(, $($fields)*)?)
    };
}

/// Info-level event with named fields.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

/// Warn-level event for work that failed and was skipped.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::warn!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($fields:tt)*)?) => {
        $crate::trace::SpanOff
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use {trace_event, trace_span, trace_warn};

/// Stand-in for an entered span when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct SpanOff;

#[cfg(not(feature = "tracing"))]
impl SpanOff {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
