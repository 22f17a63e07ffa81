//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point.
// One JSON command per stdin line, one JSON outcome per stdout line.
// FORMAT (log): seq|level|category|message

fn main() {
    if let Err(e) = gridpad_lib::run() {
        eprintln!("gridpad: {}", e);
        std::process::exit(1);
    }
}
