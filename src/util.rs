/// Unwraps an `Option`, running `$log` and then `$return` when it is `None`.
#[macro_export]
macro_rules! some_or {
    ($result: expr, $log: expr, $return: expr) => {
        match $result {
            Some(v) => v,
            None => {
                $log;
                $return;
            }
        }
    };
}

/// Strips the `file://` prefix Foundation URLs carry when the host passes a path as a string.
pub fn strip_file_url(path: &str) -> &str {
    path.strip_prefix("file://").unwrap_or(path)
}
