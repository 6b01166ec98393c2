//! Command: print version information.

/// Print the hm version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    let version = option_env!("HM_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    println!("hm {version}");
}
