//! Resolution of the argument string passed to `go test`.

/// Arguments used when the invocation supplies none.
pub const DEFAULT_TEST_ARGS: &str = "-coverprofile=/tmp/coverage.out -short -timeout=10s ./...";

/// Join the invocation's trailing tokens with single spaces.
///
/// Falls back to `default` when nothing was supplied. The tokens are not
/// validated; `go test` is the authority on what it accepts.
pub fn resolve_test_args(raw: &[String], default: &str) -> String {
    let args = raw.join(" ");
    if args.is_empty() {
        return default.to_string();
    }
    args
}
