use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;
use url::Url;

/// Everything except unreserved characters and `/` gets percent-encoded
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Convert a filesystem path into a URI reference suitable for a SARIF `artifactLocation`.
///
/// Absolute paths become `file://` URIs. Relative paths have their backslashes replaced with
/// forward slashes and are then percent-encoded, keeping the slashes intact.
///
/// This is a pure string transformation; the filesystem is never consulted.
///
/// ```
/// # use sarif_convert::uri::to_uri;
/// assert_eq!(to_uri(r"src\my app\main.py"), "src/my%20app/main.py");
/// ```
pub fn to_uri<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if path.is_absolute() {
        if let Ok(url) = Url::from_file_path(path) {
            return url.into();
        }
    }
    let posix = path.to_string_lossy().replace('\\', "/");
    utf8_percent_encode(&posix, PATH_SEGMENT).to_string()
}
