use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use slot_io::platform::open_log_file_secure_append;
use slot_io::{Call, Dispatcher, Node, RootResolver, Verb};
use tempfile::tempdir;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// Appends written bytes into a shared in-memory buffer.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn slot_mutations_emit_info_events() {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let layer = tsfmt::layer()
        .with_writer(make_writer)
        .with_ansi(false)
        .compact();
    let dispatch = tracing::Dispatch::new(registry().with(EnvFilter::new("info")).with(layer));

    let td = tempdir().unwrap();
    let d = Dispatcher::local(RootResolver::new(td.path()).unwrap());
    tracing::dispatcher::with_default(&dispatch, || {
        d.invoke(
            Call::new(Verb::FileSave)
                .with_value("/logged.txt")
                .with_child(Node::leaf("x")),
        )
        .unwrap();
        d.invoke(Call::new(Verb::FolderCreate).with_value("/made"))
            .unwrap();
    });

    let contents = String::from_utf8_lossy(&buf.lock().unwrap()).to_string();
    assert!(contents.contains("Saved file"), "contents={contents}");
    assert!(contents.contains("Created folder"), "contents={contents}");
    assert!(!contents.contains("resolved path"), "debug events filtered at info");
}

#[test]
fn file_logging_writes_to_custom_path() {
    let td = tempdir().expect("tempdir");
    let log_path: PathBuf = td.path().join("logs/slot_io_test.log");

    if slot_io::path_has_symlink_ancestor(&log_path).unwrap() {
        eprintln!(
            "Skipping file logging test: path has symlink ancestor: {}",
            log_path.display()
        );
        return;
    }

    let file = open_log_file_secure_append(&log_path).expect("open_log_file_secure_append");
    let (writer, guard): (tracing_appender::non_blocking::NonBlocking, WorkerGuard) =
        tracing_appender::non_blocking(file);
    let file_layer = tsfmt::layer()
        .with_writer(move || writer.clone())
        .with_target(false)
        .compact();
    let dispatch = tracing::Dispatch::new(registry().with(EnvFilter::new("info")).with(file_layer));

    tracing::dispatcher::with_default(&dispatch, || {
        tracing::info!("file-logging-test: written");
    });
    drop(guard);

    let contents = std::fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("file-logging-test"), "contents={contents}");
}
