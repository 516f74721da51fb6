use clap::{
    CommandFactory, Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotplay::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Spotify track, playlist or album URIs/links, or artist names
    inputs: Vec<String>,

    /// List available playback devices and exit
    #[clap(short = 'l', long)]
    list_devices: bool,

    /// Playback device name (case-insensitive)
    #[clap(short = 'd', long, value_name = "NAME")]
    device: Option<String>,

    /// Print shell completions and exit
    #[clap(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    if cli.list_devices {
        if let Err(e) = cli::list_devices().await {
            error!("{}", e);
        }
        return;
    }

    if cli.inputs.is_empty() {
        let _ = Cli::command().print_help();
        return;
    }

    if let Err(e) = cli::play(cli.inputs, cli.device).await {
        error!("{}", e);
    }
}
