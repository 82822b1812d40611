use moodjournal::Cli;

fn main() -> anyhow::Result<()> {
    Cli::run()
}
