fn main() {
    if let Err(e) = shotdiff::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
