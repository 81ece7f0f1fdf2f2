/// g2-groups - offline stanza tool
///
/// Prints group request stanzas and decodes group responses
use g2_groups::cli;
use g2_groups::config::{Command, Config};
use g2_groups::Result;
use log::{debug, info};

fn main() -> Result<()> {
    let config = Config::from_args();

    // Initialize logger with appropriate level based on verbose flag
    let log_level = if config.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    match &config.command {
        Command::Build { operation } => {
            debug!("Building request for {:?}", operation);
            let request = cli::build_request(operation);
            print!("{}", cli::render_node(&request, config.format)?);
        }
        Command::Extract { file } => {
            info!("Extracting group metadata from {}", file.display());
            let metadata = cli::extract_file(file)?;
            println!("{}", cli::render_metadata(&metadata)?);
        }
    }

    Ok(())
}
