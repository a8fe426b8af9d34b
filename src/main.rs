fn main() {
    if let Err(err) = table_continuity::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
