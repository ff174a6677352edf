fn main() -> anyhow::Result<()> {
    env_logger::init();
    stdgp::cli::run()
}
