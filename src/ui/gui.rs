//! Graphical release front-end
//!
//! The window never runs git itself. It hands a `ReleaseRequest` to the
//! `ReleaseController` and renders whatever the worker streams back, so the
//! UI thread stays responsive for the whole run.

use crate::core::context::ProjectContext;
use crate::core::error::{ShipError, ShipResult};
use crate::manifest::increment;
use crate::release::{CommitPolicy, ReleaseController, ReleaseRequest, VersionChoice, WorkerEvent};
use crate::ui::log::{LogLevel, LogLine};
use eframe::egui;
use std::time::Duration;

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Open the window and block until it is closed
pub fn run(ctx: ProjectContext) -> ShipResult<()> {
  let title = format!("tagship - {}", ctx.root.display());
  let options = eframe::NativeOptions {
    viewport: egui::ViewportBuilder::default()
      .with_title(title.clone())
      .with_inner_size([560.0, 480.0]),
    ..Default::default()
  };

  eframe::run_native(&title, options, Box::new(move |_cc| Box::new(ShipApp::new(ctx))))
    .map_err(|e| ShipError::message(format!("GUI failed: {}", e)))
}

struct ShipApp {
  controller: ReleaseController,
  current: String,
  version: String,
  fix: bool,
  log: Vec<LogLine>,
  error: Option<String>,
}

impl ShipApp {
  fn new(ctx: ProjectContext) -> Self {
    let mut app = Self {
      controller: ReleaseController::new(ctx),
      current: String::new(),
      version: String::new(),
      fix: false,
      log: Vec::new(),
      error: None,
    };
    app.refresh_version();
    app
  }

  /// Reload the primary manifest and suggest the next patch version
  fn refresh_version(&mut self) {
    match self.controller.context().version_store().read_raw() {
      Ok(current) => {
        self.version = increment(&current);
        self.current = current;
      }
      Err(err) => {
        self.current = "unknown".to_string();
        self.log.push(LogLine::new(LogLevel::Warn, err.to_string()));
      }
    }
  }

  fn start(&mut self) {
    let request = if self.fix {
      ReleaseRequest::fix()
    } else {
      let requested = self.version.trim();
      let choice = if requested.is_empty() {
        VersionChoice::Increment
      } else {
        VersionChoice::Explicit(requested.to_string())
      };
      ReleaseRequest::new_release(choice).with_policy(CommitPolicy::Tolerant)
    };

    self.log.clear();
    if let Err(err) = self.controller.start(request) {
      self.error = Some(err.to_string());
    }
  }

  fn drain_events(&mut self) {
    for event in self.controller.poll() {
      match event {
        WorkerEvent::Log(line) => self.log.push(line),
        WorkerEvent::Finished(Ok(outcome)) => {
          self.log.push(LogLine::new(LogLevel::Success, format!("Finished {}", outcome.tag)));
          self.refresh_version();
        }
        WorkerEvent::Finished(Err(message)) => self.error = Some(message),
      }
    }
  }
}

impl eframe::App for ShipApp {
  fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    self.drain_events();
    let running = self.controller.is_running();

    egui::CentralPanel::default().show(ctx, |ui| {
      ui.heading("Release");
      ui.label(format!("Current version: {}", self.current));
      ui.add_space(8.0);

      ui.horizontal(|ui| {
        ui.label("New version:");
        ui.add_enabled(
          !running && !self.fix,
          egui::TextEdit::singleline(&mut self.version).hint_text("auto"),
        );
      });
      ui.add_enabled(
        !running,
        egui::Checkbox::new(&mut self.fix, "Fix mode (rebuild current version)"),
      );
      ui.add_space(8.0);

      let label = if running { "Working..." } else { "Release" };
      if ui.add_enabled(!running, egui::Button::new(label)).clicked() {
        self.start();
      }

      ui.separator();
      egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
        for line in &self.log {
          ui.colored_label(color_for(line.level), line.to_string());
        }
      });
    });

    if let Some(message) = self.error.clone() {
      let mut open = true;
      egui::Window::new("Release failed")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
          ui.label(message.as_str());
        });
      if !open {
        self.error = None;
      }
    }

    if self.controller.is_running() {
      ctx.request_repaint_after(REPAINT_INTERVAL);
    }
  }
}

fn color_for(level: LogLevel) -> egui::Color32 {
  match level {
    LogLevel::Step => egui::Color32::LIGHT_BLUE,
    LogLevel::Info => egui::Color32::GRAY,
    LogLevel::Success => egui::Color32::LIGHT_GREEN,
    LogLevel::Warn => egui::Color32::YELLOW,
    LogLevel::Error => egui::Color32::LIGHT_RED,
  }
}
