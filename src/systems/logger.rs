use std::{fs::OpenOptions, io::Write, path::Path};

use flume::Sender;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use once_cell::sync::Lazy;

use crate::consts::LOG_FILE;

enum Message {
    Line(String),
    Flush(Sender<()>),
}

/// Lines are written by a dedicated thread, so logging never blocks on the file.
static LOG: Lazy<Sender<Message>> = Lazy::new(|| {
    let (tx, rx) = flume::unbounded::<Message>();
    let path = LOG_FILE.clone();
    std::thread::spawn(move || {
        let mut file = match open(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Failed to open the log file {}: {e}", path.display());
                None
            }
        };
        let mut buffer = String::new();
        while let Ok(message) = rx.recv() {
            buffer.clear();
            let mut flushed = Vec::new();
            for message in std::iter::once(message).chain(rx.try_iter()) {
                match message {
                    Message::Line(line) => {
                        buffer.push_str(&line);
                        buffer.push('\n');
                    }
                    Message::Flush(done) => flushed.push(done),
                }
            }
            if let Some(file) = file.as_mut() {
                if let Err(e) = file.write_all(buffer.as_bytes()) {
                    eprintln!("Failed to write the log file: {e}");
                }
            }
            for done in flushed {
                let _ = done.send(());
            }
        }
    });
    tx
});

fn open(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

struct FileLogger;

static LOGGER: FileLogger = FileLogger;

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = LOG.send(Message::Line(format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        )));
    }

    fn flush(&self) {
        let (tx, rx) = flume::bounded(1);
        if LOG.send(Message::Flush(tx)).is_ok() {
            let _ = rx.recv();
        }
    }
}

/// Installs the file logger. `Info` by default, `Debug` when verbose.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    Ok(())
}
