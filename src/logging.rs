use std::env;
use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::Result;
use log::LevelFilter;

/// Route log output to a file under the state directory; the terminal is
/// owned by the UI, so nothing may write to stdout or stderr.
pub fn init_logging(debug: bool) -> Result<()> {
    let log_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_dir = state_dir();
    fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("gst.log");

    env_logger::Builder::new()
        .filter_level(log_level)
        .target(env_logger::Target::Pipe(Box::new(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?,
        )))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    log::info!("logging initialized at {log_level}");
    Ok(())
}

fn state_dir() -> PathBuf {
    if let Some(xdg_state) = env::var_os("XDG_STATE_HOME") {
        return PathBuf::from(xdg_state).join("gst");
    }
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".local/state").join("gst");
    }
    PathBuf::from("/tmp/gst")
}
