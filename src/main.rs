use flow_cubes::{DemoConfig, flow};

fn main() -> anyhow::Result<()> {
    let config = DemoConfig::from_env()?;
    flow::run(config)
}
