fn main() {
    if let Err(e) = spindle::runtime::run() {
        eprintln!("spindle: {e}");
        std::process::exit(1);
    }
}
