fn main() -> Result<(), Box<dyn std::error::Error>> {
    filter_builder::run()
}
