//! Constants shared across the Steward workspace

/// Gap between consecutive sort keys when appending or prepending tasks.
///
/// Large enough that midpoint insertions between neighbors survive many
/// rounds before approaching float precision limits.
pub const SORT_KEY_GAP: f64 = 100.0;

/// Maximum query limit for task listings
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Storage key prefix for saved filter collections
pub const SAVED_FILTER_KEY_PREFIX: &str = "steward.saved-filters.";

/// Filename for the persisted task collection
pub const TASKS_FILENAME: &str = "tasks.json";

/// Supported date formats
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_gap() {
        assert!(SORT_KEY_GAP > 0.0);
        assert_eq!(SORT_KEY_GAP, 100.0);
    }

    #[test]
    fn test_query_limits() {
        assert_eq!(MAX_QUERY_LIMIT, 1000);
    }

    #[test]
    fn test_saved_filter_key_prefix() {
        assert!(SAVED_FILTER_KEY_PREFIX.ends_with('.'));
    }

    #[test]
    fn test_tasks_filename() {
        assert_eq!(TASKS_FILENAME, "tasks.json");
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(DATE_FORMATS.len(), 3);
        assert!(DATE_FORMATS.contains(&"%Y-%m-%d"));
    }
}
