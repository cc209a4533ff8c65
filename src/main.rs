fn main() {
    if let Err(e) = healthwise_lib::run() {
        eprintln!("healthwise: {e}");
        std::process::exit(1);
    }
}
