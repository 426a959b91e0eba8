use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;
use termcolor::{Color, ColorSpec, WriteColor};

pub use log::{debug, error, info, trace, warn};

pub const DEFAULT_FILTER: &str = "easel=info,sketches=info";

/// Installs the colored terminal logger. `RUST_LOG` overrides
/// [`DEFAULT_FILTER`]. Safe to call more than once.
pub fn init_logger() {
    init_logger_with(DEFAULT_FILTER);
}

pub fn init_logger_with(default_filter: &str) {
    let mut builder =
        Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.filter_module("png", LevelFilter::Warn);

    builder.format(|_buf, record| {
        let writer =
            termcolor::BufferWriter::stderr(termcolor::ColorChoice::Auto);
        let mut buffer = writer.buffer();
        let mut spec = ColorSpec::new();

        spec.set_fg(Some(match record.level() {
            log::Level::Trace => Color::Cyan,
            log::Level::Debug => Color::Blue,
            log::Level::Info => Color::Green,
            log::Level::Warn => Color::Yellow,
            log::Level::Error => Color::Red,
        }));

        buffer.set_color(&spec)?;
        let target = record.module_path().unwrap_or(record.target());
        write!(buffer, "[{}][{}]", record.level(), target)?;
        buffer.reset()?;
        writeln!(buffer, " {}", record.args())?;
        writer.print(&buffer)?;
        Ok(())
    });

    let _ = builder.try_init();
}
