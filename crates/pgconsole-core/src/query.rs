//! Query Builder (C2): turns a Console's view state into query text.

use crate::console::Console;
use crate::view::{ViewId, ViewSpec};

/// Builds the query text for `console`'s active view.
///
/// Mirrors spec.md §4.2's three rules: fixed templates pass through
/// unchanged; *long-activity* substitutes `min_age` into both of its
/// placeholders; *user-functions* substitutes the 1-based sort column
/// into its `ORDER BY`.
pub fn build_query(console: &Console) -> String {
    let spec: &ViewSpec = console.current_view.spec();
    match console.current_view {
        ViewId::LongActivity => spec
            .query_template
            .replace("{0}", &console.min_age)
            .replace("{0}", &console.min_age),
        ViewId::UserFunctions => {
            let sort = console.sort_state(ViewId::UserFunctions);
            let order_by = sort.order_key + 1;
            spec.query_template.replace("{0}", &order_by.to_string())
        }
        _ => spec.query_template.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;

    #[test]
    fn fixed_template_views_pass_through_unchanged() {
        let console = Console::new(0);
        let q = build_query(&console);
        assert_eq!(q, ViewId::Databases.spec().query_template);
    }

    #[test]
    fn long_activity_substitutes_min_age_into_both_placeholders() {
        let mut console = Console::new(0);
        console.set_view(ViewId::LongActivity);
        console.set_min_age("00:05:00").unwrap();
        let q = build_query(&console);
        assert_eq!(q.matches("00:05:00").count(), 2);
        assert!(!q.contains("{0}"));
    }

    #[test]
    fn user_functions_substitutes_one_based_order_by() {
        let mut console = Console::new(0);
        console.set_view(ViewId::UserFunctions);
        // default sort key is sort_min (3) -> ORDER BY 4
        let q = build_query(&console);
        assert!(q.trim_end().ends_with("ORDER BY 4"));

        console.advance_sort(true);
        let q2 = build_query(&console);
        assert!(q2.trim_end().ends_with("ORDER BY 5"));
    }
}
