mod app;
mod config;
mod input;
mod model;
mod render;
mod session;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
