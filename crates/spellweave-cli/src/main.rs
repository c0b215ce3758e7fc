mod command;
mod config;
mod model;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
