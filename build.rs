//! Build script that renders the `crossdeploy(1)` man page into `OUT_DIR`.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    for watched in ["build.rs", "src/cli/mod.rs"] {
        writeln!(stdout, "cargo:rerun-if-changed={watched}")?;
    }

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR was not set"))?;
    render_man_page(&out_dir)?;
    Ok(())
}

fn render_man_page(out_dir: &Path) -> io::Result<()> {
    let command = Cli::command();
    let page = out_dir.join(format!("{}.1", command.get_name()));

    let mut rendered = Vec::new();
    Man::new(command).render(&mut rendered)?;
    fs::write(page, rendered)
}
