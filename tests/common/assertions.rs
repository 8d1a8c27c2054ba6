//! Domain-specific assertion macros for dxterm harnesses.
//!
//! They wrap `pretty_assertions` so a failing comparison shows which code or
//! title diverged.

/// Assert the exact `(system, code)` list of a `Selection`, in order.
///
/// ```rust
/// assert_codes!(selection, [(CodingSystem::Icd11, "5A10"), (CodingSystem::Ayurveda, "AY-221")]);
/// ```
#[macro_export]
macro_rules! assert_codes {
    ($selection:expr, [$(($system:expr, $code:expr)),* $(,)?]) => {{
        let selection: &dxterm_core::Selection = &$selection;
        let actual: Vec<(dxterm_core::CodingSystem, &str)> = selection
            .codes
            .iter()
            .map(|c| (c.system, c.code.as_str()))
            .collect();
        let expected: Vec<(dxterm_core::CodingSystem, &str)> = vec![$(($system, $code)),*];
        pretty_assertions::assert_eq!(actual, expected, "codes of {:?}", selection.name);
    }};
}

/// Assert that every suggestion's display name contains `needle`, ignoring
/// case.
#[macro_export]
macro_rules! assert_titles_contain {
    ($suggestions:expr, $needle:expr) => {{
        let needle = $needle.to_lowercase();
        for s in $suggestions.iter() {
            let name: &str = s.display_name();
            if !name.to_lowercase().contains(&needle) {
                panic!(
                    "assert_titles_contain! failed: {:?} does not contain {:?}",
                    name, needle
                );
            }
        }
    }};
}

/// Assert the display names of a suggestion list, in order.
#[macro_export]
macro_rules! assert_titles {
    ($suggestions:expr, [$($title:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $suggestions.iter().map(|s| s.display_name()).collect();
        let expected: Vec<&str> = vec![$($title),*];
        pretty_assertions::assert_eq!(actual, expected);
    }};
}

/// Assert the pipeline's search status matches a pattern.
///
/// ```rust
/// assert_status!(pipeline, SearchStatus::Unavailable(_));
/// ```
#[macro_export]
macro_rules! assert_status {
    ($pipeline:expr, $pattern:pat) => {{
        let status = &$pipeline.state().status;
        if !matches!(status, $pattern) {
            panic!(
                "assert_status! failed:\n  expected: {}\n  actual:   {:?}",
                stringify!($pattern),
                status
            );
        }
    }};
}
