use crate::layout::{LayoutBuilder, LayoutDocument};
use crate::pipeline::{Conversion, Converter, LoadedLayout};
use crate::source::FigmaFile;
use crate::{Error, Result, ScreenPolicy};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Layout(String, String, oneshot::Sender<Result<LoadedLayout>>),
    Convert(String, String, oneshot::Sender<Result<Conversion>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly converter backed by a dedicated worker thread.
///
/// The worker owns a `Converter` (and with it the blocking HTTP clients) and
/// executes commands sent from async tasks one at a time.
#[derive(Clone)]
pub struct AsyncConverter {
    cmd_tx: Sender<Command>,
}

impl AsyncConverter {
    /// Move an already wired `Converter` onto a worker thread.
    pub fn spawn(converter: Converter) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        thread::spawn(move || run_worker(converter, cmd_rx));
        Self { cmd_tx }
    }

    /// Build the remote-backed converter on the worker thread itself.
    #[cfg(feature = "remote")]
    pub async fn from_config(config: crate::ConverterConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            // The blocking clients must be created off the async runtime
            let converter = match Converter::from_config(config) {
                Ok(c) => c,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));
            run_worker(converter, cmd_rx);
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    /// Cached-or-fresh layout for a design URL
    pub async fn layout(&self, design_url: &str, framework: &str) -> Result<LoadedLayout> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Layout(design_url.to_string(), framework.to_string(), tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Layout canceled: {}", e)))?
    }

    /// Full conversion of a design URL into a bundle
    pub async fn convert(&self, design_url: &str, framework: &str) -> Result<Conversion> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Convert(design_url.to_string(), framework.to_string(), tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Convert canceled: {}", e)))?
    }

    /// Shut down the worker.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Other("Converter worker has shut down".into()))
    }
}

fn run_worker(converter: Converter, cmd_rx: mpsc::Receiver<Command>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            Command::Layout(url, framework, resp) => {
                let _ = resp.send(converter.load_layout(&url, &framework));
            }
            Command::Convert(url, framework, resp) => {
                let _ = resp.send(converter.convert(&url, &framework));
            }
            Command::Close(resp) => {
                let _ = resp.send(Ok(()));
                break;
            }
        }
    }
}

/// Normalize independent documents concurrently on the blocking pool.
///
/// Results come back in input order; one malformed document does not
/// affect the others.
pub async fn build_many(files: Vec<FigmaFile>, policy: ScreenPolicy) -> Vec<Result<LayoutDocument>> {
    let builder = LayoutBuilder::with_policy(policy);
    let tasks = files
        .into_iter()
        .map(|file| tokio::task::spawn_blocking(move || builder.build(&file)));

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| {
            joined
                .map_err(|e| Error::Other(format!("Build task failed: {}", e)))
                .and_then(|built| built)
        })
        .collect()
}
