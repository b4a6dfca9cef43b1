fn main() {
    if let Err(err) = replacement_planner::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
