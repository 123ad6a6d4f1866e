use clap::Parser;
use log::*;
#[cfg(debug_assertions)]
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::{
    append::rolling_file::{
        RollingFileAppender,
        policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use referee_console::{
    backend::HttpBackend,
    config::Config,
    console_input::{ConsoleInput, HELP},
    session::Session,
    view::{RecordingCanvas, RetainedPanel},
};
use std::{error::Error, path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader};

const APP_NAME: &str = "referee-console";
const LOG_TARGET: &str = "referee_console";

type Console = Session<HttpBackend, RetainedPanel, RecordingCanvas>;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,

    #[clap(long, short)]
    /// Backend to connect to, overrides the config file
    backend_url: Option<String>,

    #[clap(long, short)]
    /// Show the field view at startup
    field: bool,
}

fn init_logging(args: &Cli) -> Result<(), Box<dyn Error>> {
    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_base_path = match &args.log_location {
        Some(path) => path.clone(),
        None => directories::BaseDirs::new()
            .ok_or("Could not find a directory to store logs")?
            .data_local_dir()
            .join("rsk-console-logs"),
    };
    let log_path = log_base_path.join(format!("{APP_NAME}-log.txt"));
    let archived_log_path = log_base_path.join(format!("{APP_NAME}-log-{{}}.txt.gz"));

    #[cfg(debug_assertions)]
    println!("Log path: {}", log_path.display());

    // Only log to the console in debug mode
    #[cfg(debug_assertions)]
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    // Setup the file log roller
    let roller = FixedWindowRoller::builder().build(
        archived_log_path
            .to_str()
            .ok_or("Log location is not valid unicode")?,
        args.num_old_logs,
    )?;
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(log_path, Box::new(file_policy))?;

    // Everything else only logs errors
    let root = Root::builder().appender("file_appender");
    #[cfg(debug_assertions)]
    let root = root.appender("console");
    let root = root.build(LevelFilter::Error);

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)));

    #[cfg(debug_assertions)]
    let log_config = log_config.appender(Appender::builder().build("console", Box::new(console)));

    let log_config = log_config
        .logger(Logger::builder().build(LOG_TARGET, log_level))
        .logger(Logger::builder().build("rsk_common", log_level))
        .build(root)?;

    log4rs::init_config(log_config)?;
    log_panics::init();
    Ok(())
}

fn load_config() -> Result<Config, Box<dyn Error>> {
    info!(
        "Reading config file from {:?}",
        confy::get_configuration_file_path(APP_NAME, None)?
    );

    let config: Config = match confy::load(APP_NAME, None) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file, overwriting with default. Error: {e}");
            let config = Config::default();
            confy::store(APP_NAME, None, &config)?;
            config
        }
    };
    Ok(config)
}

/// Applies one typed command, returning `false` when the console should exit
fn apply(console: &mut Console, input: ConsoleInput) -> bool {
    match input {
        ConsoleInput::Action(action) => console.perform(action),
        ConsoleInput::ShowField(None) => console.toggle_field(),
        ConsoleInput::ShowField(Some(true)) => console.show_field(),
        ConsoleInput::ShowField(Some(false)) => console.hide_field(),
        ConsoleInput::FpsLimit(limit) => console.set_fps_limit(limit),
        ConsoleInput::Landmark(on) => console.set_landmark(on),
        ConsoleInput::TimedCircle(on) => console.set_timed_circle(on),
        ConsoleInput::Drag { from, to, button } => {
            console.pointer_down(from[0], from[1], button);
            console.pointer_move(to[0], to[1]);
            console.pointer_up(to[0], to[1]);
        }
        ConsoleInput::Help => println!("{HELP}"),
        ConsoleInput::Quit => return false,
    }
    true
}

async fn run(config: Config, show_field: bool) -> Result<(), Box<dyn Error>> {
    info!("Connecting to {}", config.connection.url);
    let backend = Arc::new(HttpBackend::new(
        &config.connection.url,
        config.connection.request_timeout(),
    )?);
    let [width, height] = config.field.canvas_size();
    let mut console = Session::connect(
        backend,
        &config,
        RetainedPanel::new(),
        RecordingCanvas::new(width, height),
    )
    .await?;

    console.start();
    if show_field {
        console.show_field();
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = console.next_event() => match event {
                Some(event) => console.handle(event),
                None => break,
            },
            line = lines.next_line() => match line? {
                None => break,
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match line.parse::<ConsoleInput>() {
                    Ok(input) => {
                        if !apply(&mut console, input) {
                            break;
                        }
                    }
                    Err(e) => println!("{e}"),
                },
            },
        }

        for change in console.panel_mut().take_changes() {
            println!("{change}");
        }
    }

    console.shutdown();
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logging(&args)?;

    let mut config = load_config()?;
    if let Some(url) = args.backend_url {
        config.connection.url = url;
    }
    let show_field = args.field || config.field.show_at_startup;

    info!("Starting the referee console");
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config, show_field))
}
