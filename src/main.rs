mod cli;

use clap::Parser;
use cli::Cli;
use console::style;
use slide_narration_video::component::NarratedVideo;
use slide_narration_video::component::narrated_video::{
    EncodeSettings, RunReport, check_capabilities,
};
use slide_narration_video::{PipelineError, init};
use std::process::ExitCode;

fn run(cli: &Cli) -> Result<RunReport, PipelineError> {
    let mut settings = cli.settings();
    if let Some(config_path) = &cli.config {
        settings
            .apply_config_file(config_path)
            .map_err(PipelineError::Config)?;
    }
    settings.validate().map_err(PipelineError::Config)?;

    check_capabilities(&EncodeSettings::from_settings(&settings))?;

    NarratedVideo::new(settings).run()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init::init(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            report.print_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
