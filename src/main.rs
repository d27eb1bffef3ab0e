use anyhow::Context;
use rowedit::logging::{self, LogLevel, Logger};
use rowedit::{config::USAGE, error, CliOptions, Config, TuiApplication};

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = CliOptions::parse(&args).context("invalid command line")?;

    if options.show_help {
        print!("{}", USAGE);
        return Ok(());
    }
    if options.show_version {
        println!("rowedit {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // 端末を汚さないよう stderr には出さない
    let logger = match &options.debug_log {
        Some(path) => Logger::for_development().without_stderr().with_file_output(path),
        None => Logger::new(LogLevel::Error).without_stderr(),
    };
    logging::init(logger).context("failed to set up logging")?;

    let config = Config::load(options.config.as_deref())
        .context("failed to load configuration")?
        .apply_options(&options);
    let seeds = config.seed_records().context("failed to load seed records")?;

    let mut app = TuiApplication::new(&config, &seeds)?;
    app.run()?;

    Ok(())
}
