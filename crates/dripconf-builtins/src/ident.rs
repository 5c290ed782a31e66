//! Process identity for log and metric prefixes

use std::ffi::OsStr;
use std::path::Path;

/// Basename of the running executable, as given in `argv[0]`.
///
/// Empty when the process was started without an `argv[0]`.
pub fn process_ident() -> String {
    std::env::args_os()
        .next()
        .map(|arg0| ident_from(&arg0))
        .unwrap_or_default()
}

fn ident_from(arg0: &OsStr) -> String {
    Path::new(arg0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/usr/local/bin/worker", "worker")]
    #[case("worker", "worker")]
    #[case("./bin/worker-2", "worker-2")]
    #[case("", "")]
    fn test_ident_from(#[case] arg0: &str, #[case] expected: &str) {
        assert_eq!(ident_from(OsStr::new(arg0)), expected);
    }

    #[test]
    fn test_process_ident_is_a_basename() {
        let ident = process_ident();
        assert!(!ident.contains('/'));
    }
}
