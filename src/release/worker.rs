//! Background release execution for interactive front-ends
//!
//! At most one worker runs at a time. The worker owns its own clone of the
//! project context and reports through a channel; the controller side never
//! blocks while a release is in flight.

use super::{ReleaseOutcome, ReleaseRequest, ReleaseWorkflow};
use crate::core::context::ProjectContext;
use crate::core::error::{ShipError, ShipResult};
use crate::ui::log::{LogLine, LogSink};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

/// Message from the worker thread
#[derive(Debug, Clone)]
pub enum WorkerEvent {
  Log(LogLine),
  /// Always the last event of a run
  Finished(Result<ReleaseOutcome, String>),
}

/// Forwards log lines over the worker channel
struct ChannelSink {
  tx: Mutex<Sender<WorkerEvent>>,
}

impl LogSink for ChannelSink {
  fn emit(&self, line: LogLine) {
    if let Ok(tx) = self.tx.lock() {
      // Receiver gone means nobody is listening anymore
      let _ = tx.send(WorkerEvent::Log(line));
    }
  }
}

/// Owns the single in-flight release worker
pub struct ReleaseController {
  ctx: ProjectContext,
  events: Option<Receiver<WorkerEvent>>,
  handle: Option<JoinHandle<()>>,
}

impl ReleaseController {
  pub fn new(ctx: ProjectContext) -> Self {
    Self {
      ctx,
      events: None,
      handle: None,
    }
  }

  pub fn context(&self) -> &ProjectContext {
    &self.ctx
  }

  /// True between `start` and the delivery of `Finished`
  pub fn is_running(&self) -> bool {
    self.events.is_some()
  }

  /// Launch a release on a worker thread
  pub fn start(&mut self, request: ReleaseRequest) -> ShipResult<()> {
    if self.is_running() {
      return Err(ShipError::with_help(
        "A release is already running",
        "Wait for it to finish before starting another one.",
      ));
    }

    let (tx, rx) = mpsc::channel();
    let ctx = self.ctx.clone();
    let handle = thread::Builder::new()
      .name("tagship-release".to_string())
      .spawn(move || {
        let done = tx.clone();
        let sink = ChannelSink { tx: Mutex::new(tx) };
        let result = ReleaseWorkflow::new(&ctx, &sink).run(&request).map_err(|err| {
          tracing::error!(error = %err, "release worker failed");
          sink.error(&err.to_string());
          err.to_string()
        });
        let _ = done.send(WorkerEvent::Finished(result));
      })?;

    tracing::debug!("release worker started");
    self.events = Some(rx);
    self.handle = Some(handle);
    Ok(())
  }

  /// Drain pending events without blocking
  ///
  /// A worker that dies without reporting produces a synthetic failure so the
  /// front-end always sees `Finished`.
  pub fn poll(&mut self) -> Vec<WorkerEvent> {
    let mut out = Vec::new();
    let Some(rx) = &self.events else {
      return out;
    };

    let mut done = false;
    while !done {
      match rx.try_recv() {
        Ok(event) => {
          done = matches!(event, WorkerEvent::Finished(_));
          out.push(event);
        }
        Err(TryRecvError::Empty) => break,
        Err(TryRecvError::Disconnected) => {
          out.push(WorkerEvent::Finished(Err("Release worker stopped unexpectedly".to_string())));
          done = true;
        }
      }
    }

    if done {
      self.finish();
    }
    out
  }

  /// Block until the running release finishes, returning every event
  pub fn wait(&mut self) -> Vec<WorkerEvent> {
    let mut out = Vec::new();
    let Some(rx) = self.events.take() else {
      return out;
    };

    for event in rx.iter() {
      let finished = matches!(event, WorkerEvent::Finished(_));
      out.push(event);
      if finished {
        break;
      }
    }
    if !matches!(out.last(), Some(WorkerEvent::Finished(_))) {
      out.push(WorkerEvent::Finished(Err("Release worker stopped unexpectedly".to_string())));
    }
    self.finish();
    out
  }

  fn finish(&mut self) {
    self.events = None;
    if let Some(handle) = self.handle.take()
      && handle.join().is_err()
    {
      tracing::error!("release worker panicked");
    }
  }
}
