use std::collections::VecDeque;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use client_logging::{client_info, client_warn};
use scriptorium_client::{ArtifactWriter, Bytes, ClientSettings, ServiceError};
use scriptorium_core::{update, AppState, Msg, Phase, ValidationPolicy};

use crate::cli::Cli;
use crate::effects::{AppMsg, EffectRunner};
use crate::persistence;
use crate::render;
use crate::selection;

pub fn run(args: Cli) -> Result<()> {
    let settings = ClientSettings {
        base_url: args.server.clone(),
        poll_interval: Duration::from_secs(args.poll_interval.max(1)),
        request_timeout: Duration::from_secs(args.request_timeout),
        ..ClientSettings::default()
    };
    let policy = ValidationPolicy {
        ignore_suffix_case: args.any_case,
        ..ValidationPolicy::default()
    };

    let candidates = selection::gather_candidates(&args.inputs)?;
    let runner =
        EffectRunner::new(settings).map_err(|err| anyhow!("cannot set up client: {err}"))?;
    let (msg_tx, msg_rx) = mpsc::channel();
    runner.spawn_event_pump(msg_tx);

    let mut session = Session {
        state: AppState::with_policy(policy),
        runner,
        writer: ArtifactWriter::new(args.output.clone()),
        output_dir: args.output,
        want_preview: args.preview,
        allow_prompt: !args.no_input && std::io::stdin().is_terminal(),
        completed_handled: false,
        preview_queue: VecDeque::new(),
        preview_pending: false,
        downloads_expected: 0,
        downloads_done: 0,
        download_failures: 0,
    };

    session.dispatch(Msg::FilesPicked(candidates));
    {
        let view = session.state.view();
        if !view.process_enabled {
            let rejected = view.last_pick.map(|stats| stats.rejected).unwrap_or(0);
            bail!("nothing to process: {rejected} file(s) did not match the required suffix");
        }
    }
    session.dispatch(Msg::ProcessClicked);

    loop {
        let msg = msg_rx.recv().context("engine event channel closed")?;
        match msg {
            AppMsg::Core(msg) => session.dispatch(msg),
            AppMsg::Download { file_name, result } => session.handle_download(&file_name, result),
        }

        match session.state.phase() {
            Phase::Completed => {
                session.on_completed();
                if session.finished() {
                    return session.finish();
                }
            }
            Phase::Error => {
                if !session.try_retry()? {
                    bail!("processing failed: {}", session.state.view().message);
                }
            }
            _ => {}
        }
    }
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    writer: ArtifactWriter,
    output_dir: PathBuf,
    want_preview: bool,
    allow_prompt: bool,
    completed_handled: bool,
    preview_queue: VecDeque<String>,
    preview_pending: bool,
    downloads_expected: usize,
    downloads_done: usize,
    download_failures: usize,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::PreviewLoaded { .. } | Msg::PreviewFailed { .. }) {
            self.preview_pending = false;
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            render::print_view(&state.view());
        }
        self.state = state;
        self.runner.run(effects);
    }

    /// First time through: queue downloads for every artifact and, when
    /// asked for, previews. Later calls only keep the preview queue moving.
    fn on_completed(&mut self) {
        if !self.completed_handled {
            self.completed_handled = true;
            let view = self.state.view();
            let mut names: Vec<String> = view
                .results
                .iter()
                .filter_map(|row| row.processed_name.clone())
                .collect();
            if let Some(compiled) = &view.compiled {
                names.push(compiled.name.clone());
            }
            self.downloads_expected = names.len();
            for name in &names {
                client_info!("downloading {}", name);
                self.runner.download(name);
            }
            if self.want_preview {
                self.preview_queue.extend(names);
            }
        }
        self.pump_previews();
    }

    fn pump_previews(&mut self) {
        if self.preview_pending {
            return;
        }
        if let Some(file_name) = self.preview_queue.pop_front() {
            self.preview_pending = true;
            self.dispatch(Msg::PreviewRequested { file_name });
        }
    }

    fn handle_download(&mut self, file_name: &str, result: Result<Bytes, ServiceError>) {
        self.downloads_done += 1;
        match result {
            Ok(bytes) => match self.writer.write(file_name, &bytes) {
                Ok(path) => {
                    client_info!("saved {}", path.display());
                    println!("Saved {}", path.display());
                }
                Err(err) => {
                    self.download_failures += 1;
                    client_warn!("could not save {}: {}", file_name, err);
                    eprintln!("Could not save {file_name}: {err}");
                }
            },
            Err(err) => {
                self.download_failures += 1;
                client_warn!("download of {} failed: {}", file_name, err);
                eprintln!("Download of {file_name} failed: {err}");
            }
        }
    }

    fn finished(&self) -> bool {
        self.completed_handled
            && self.downloads_done == self.downloads_expected
            && self.preview_queue.is_empty()
            && !self.preview_pending
    }

    fn finish(self) -> Result<()> {
        let view = self.state.view();
        persistence::save_batch_record(&self.output_dir, &view);
        println!(
            "Done: {} artifact(s) saved, {} failure(s).",
            self.downloads_expected - self.download_failures,
            self.download_failures
        );
        if self.download_failures > 0 {
            bail!("{} download(s) failed", self.download_failures);
        }
        Ok(())
    }

    /// Retry is strictly user-initiated; without a terminal (or with
    /// --no-input) a failure ends the run.
    fn try_retry(&mut self) -> Result<bool> {
        if !self.allow_prompt || !self.state.view().retry_available {
            return Ok(false);
        }

        print!("Retry from upload? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            return Ok(false);
        }

        self.completed_handled = false;
        self.preview_queue.clear();
        self.preview_pending = false;
        self.downloads_expected = 0;
        self.downloads_done = 0;
        self.download_failures = 0;
        self.dispatch(Msg::RetryClicked);
        Ok(true)
    }
}
