/// Reports a completed step to the user.
///
/// Routed through `tracing` at INFO level under the `orchestrate::success` target, so the
/// CLI formatter can render it with its own glyph.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "orchestrate::success", $($arg)*)
    };
}
