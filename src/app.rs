use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::PathBuf;
use tracing::{info, warn};

use gantt_timeline::timeline::{JumpOutcome, ScrollOutcome};
use gantt_timeline::{Scale, ScrollCoordinator, TaskInterval, TimelineResult};

use crate::settings::AppSettings;
use crate::ui;

/// Width assumed until the chart has been laid out once.
const INITIAL_CONTAINER_WIDTH: f32 = 960.0;

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Main application state.
pub struct TimelineApp {
    pub tasks: Vec<TaskInterval>,
    pub coordinator: ScrollCoordinator,
    pub selected_task: Option<String>,
    pub jump_date: NaiveDate,

    settings: AppSettings,
    settings_path: PathBuf,

    /// Offset reported by the chart last frame.
    last_scroll_left: f32,
    /// Immediate scroll write from a jump that needed no new window.
    scroll_to: Option<f32>,

    pub status_message: String,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> TimelineResult<Self> {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let settings_path = AppSettings::default_path();
        let settings = AppSettings::load(&settings_path);
        let now = now();
        let tasks = Self::sample_tasks(now);
        let coordinator = ScrollCoordinator::new(
            settings.scale,
            &tasks,
            settings.window,
            INITIAL_CONTAINER_WIDTH,
            now,
        )?;
        info!(scale = %settings.scale, tasks = tasks.len(), "timeline ready");

        Ok(Self {
            tasks,
            coordinator,
            selected_task: None,
            jump_date: now.date(),
            settings,
            settings_path,
            last_scroll_left: 0.0,
            scroll_to: None,
            status_message: "Ready".to_string(),
        })
    }

    /// Tasks spread across minutes, days and months so every scale has
    /// something to show.
    fn sample_tasks(now: NaiveDateTime) -> Vec<TaskInterval> {
        let today = now.date().and_time(NaiveTime::MIN);
        vec![
            TaskInterval::new(
                "Stand-up",
                today + Duration::hours(13) + Duration::minutes(21),
                today + Duration::hours(13) + Duration::minutes(47),
            ),
            TaskInterval::new(
                "Requirements",
                today - Duration::days(9),
                today + Duration::days(4),
            ),
            TaskInterval::new(
                "UI Design",
                today + Duration::days(3),
                today + Duration::days(18),
            ),
            TaskInterval::new(
                "Backend",
                today + Duration::days(6),
                today + Duration::days(45),
            ),
            TaskInterval::new(
                "Testing & QA",
                today + Duration::days(40),
                today + Duration::days(60),
            ),
            TaskInterval::new(
                "Roadmap",
                today - Duration::days(200),
                today + Duration::days(500),
            ),
        ]
    }

    pub fn scale(&self) -> Scale {
        self.coordinator.scale()
    }

    // --- Task sets ---

    pub fn load_sample(&mut self) {
        let tasks = Self::sample_tasks(now());
        self.replace_tasks(tasks);
        self.status_message = "Sample tasks loaded".to_string();
    }

    pub fn open_tasks(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Tasks", &["json", "csv", "txt"])
            .pick_file()
        else {
            return;
        };

        match gantt_timeline::io::load_tasks(&path) {
            Ok((tasks, skipped)) => {
                let count = tasks.len();
                self.replace_tasks(tasks);
                self.status_message = if skipped > 0 {
                    format!("Loaded {count} tasks ({skipped} rows skipped)")
                } else {
                    format!("Loaded {count} tasks")
                };
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load tasks");
                self.status_message = format!("Error loading: {e}");
            }
        }
    }

    fn replace_tasks(&mut self, tasks: Vec<TaskInterval>) {
        self.tasks = tasks;
        self.selected_task = None;
        self.scroll_to = None;
        if let Err(e) = self.coordinator.reset_to_tasks(&self.tasks, now()) {
            self.status_message = format!("Could not build timeline: {e}");
        }
    }

    // --- Navigation ---

    pub fn set_scale(&mut self, scale: Scale) {
        if let Err(e) = self.coordinator.set_scale(scale) {
            self.status_message = format!("Could not switch scale: {e}");
            return;
        }
        self.scroll_to = None;
        self.settings.scale = scale;
        if let Err(e) = self.settings.save(&self.settings_path) {
            warn!(error = %e, "failed to save settings");
        }
        self.status_message = format!("Scale: {}", scale.title());
    }

    pub fn jump_to_today(&mut self) {
        let outcome = self.coordinator.scroll_to_today(now());
        self.apply_jump(outcome);
    }

    pub fn jump_to_selected_date(&mut self) {
        let date = self.jump_date.and_time(NaiveTime::MIN);
        let outcome = self.coordinator.scroll_to_date(date);
        self.apply_jump(outcome);
    }

    fn jump_to_task(&mut self, id: &str) {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return;
        };
        let outcome = self.coordinator.scroll_to_task(task);
        self.status_message = format!("'{}' starts {}", task.name, task.start.format("%Y-%m-%d %H:%M"));
        self.apply_jump(outcome);
    }

    fn apply_jump(&mut self, outcome: TimelineResult<JumpOutcome>) {
        match outcome {
            Ok(JumpOutcome::Scroll(px)) => self.scroll_to = Some(px),
            // The coordinator hands the offset back on the next flush
            Ok(JumpOutcome::Pending(_)) => self.scroll_to = None,
            Err(e) => self.status_message = format!("Cannot jump there: {e}"),
        }
    }

    /// Feed the chart's reported geometry back into the coordinator.
    fn after_chart(&mut self, ctx: &egui::Context, frame: &ui::timeline_chart::ChartFrame) {
        if let Err(e) = self.coordinator.set_container_width(frame.container_width) {
            warn!(error = %e, "ignoring chart width");
        }

        if frame.scroll_left != self.coordinator.scroll_left() {
            match self.coordinator.on_scroll(frame.scroll_left) {
                Ok(ScrollOutcome::ShiftedLeft(_) | ScrollOutcome::ShiftedRight(_)) => {
                    ctx.request_repaint();
                }
                Ok(ScrollOutcome::Recomputed(_) | ScrollOutcome::Deferred) => {}
                Err(e) => self.status_message = format!("Timeline limit reached: {e}"),
            }
        }
        self.last_scroll_left = frame.scroll_left;

        if let Some(id) = &frame.clicked_task {
            self.selected_task = Some(id.clone());
        } else if frame.clicked_empty {
            self.selected_task = None;
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let should_open = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::O));
        let should_jump_today = ctx.input(|i| i.key_pressed(egui::Key::Home));
        if should_open {
            self.open_tasks();
        }
        if should_jump_today {
            self.jump_to_today();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let window = self.coordinator.window();
                        if let (Some(first), Some(last)) = (window.first(), window.last()) {
                            ui.label(
                                egui::RichText::new(format!(
                                    "Window: {} – {}",
                                    first.format("%Y-%m-%d"),
                                    last.format("%Y-%m-%d")
                                ))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                            );
                            ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        }
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.tasks.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: task list
        let mut task_action = ui::task_table::TaskTableAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(200.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                task_action = ui::task_table::show_task_table(
                    &self.tasks,
                    self.selected_task.as_deref(),
                    ui,
                );
            });

        match task_action {
            ui::task_table::TaskTableAction::Jump(id) => {
                self.jump_to_task(&id);
                self.selected_task = Some(id);
            }
            ui::task_table::TaskTableAction::Open => self.open_tasks(),
            ui::task_table::TaskTableAction::None => {}
        }

        // A committed window's write wins over an immediate jump.
        let immediate = self.scroll_to.take();
        let scroll_to = self.coordinator.flush(self.last_scroll_left).or(immediate);

        // Central panel: timeline chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut chart = ui::timeline_chart::ChartFrame::default();
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            chart = ui::timeline_chart::show_timeline_chart(
                &self.coordinator,
                &self.tasks,
                self.selected_task.as_deref(),
                scroll_to,
                now(),
                ui,
            );
        });
        self.after_chart(ctx, &chart);

        if self.coordinator.is_in_flight() || self.scroll_to.is_some() {
            ctx.request_repaint();
        }
    }
}
