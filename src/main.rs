use clap::Parser;
use love_donuts::{config::DemoConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::init_logger();
    love_donuts::start(DemoConfig::parse())
}
