fn main() {
    if let Err(err) = history_timeline::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
