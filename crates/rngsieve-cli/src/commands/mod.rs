pub mod dump;
pub mod list;
pub mod run;

/// Print an error to stderr and exit non-zero.
pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
