fn main() {
    aifl::cli::run();
}
