use chrono::NaiveDateTime;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use gantt_timeline::timeline::coords;
use gantt_timeline::timeline::{GroupSpan, MarkKind, ScrollCoordinator, TaskGeometry, VisiblePeriod};
use gantt_timeline::TaskInterval;

use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const GROUP_HEADER_HEIGHT: f32 = theme::GROUP_HEADER_HEIGHT;

/// What happened inside the chart this frame.
#[derive(Debug, Clone, Default)]
pub struct ChartFrame {
    /// Horizontal scroll offset after layout.
    pub scroll_left: f32,
    /// Width of the visible part of the chart.
    pub container_width: f32,
    /// Task whose bar was clicked.
    pub clicked_task: Option<String>,
    /// Background clicked (clears selection).
    pub clicked_empty: bool,
}

/// Render the timeline chart area (right panel).
///
/// `scroll_to` is a pending scroll write from the coordinator; it is applied
/// before layout so the new window and its offset appear in the same frame.
pub fn show_timeline_chart(
    coordinator: &ScrollCoordinator,
    tasks: &[TaskInterval],
    selected_task: Option<&str>,
    scroll_to: Option<f32>,
    now: NaiveDateTime,
    ui: &mut Ui,
) -> ChartFrame {
    let mut frame = ChartFrame::default();
    let available = ui.available_size();
    let chart_width = coordinator.total_width_px();
    let chart_height = HEADER_HEIGHT + (tasks.len() as f32 * (ROW_HEIGHT + ROW_PADDING)) + 40.0;

    let mut area = egui::ScrollArea::both().auto_shrink([false, false]);
    if let Some(offset) = scroll_to {
        area = area.horizontal_scroll_offset(offset);
    }

    let output = area.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(
            Vec2::new(chart_width, chart_height.max(available.y)),
            Sense::click(),
        );
        let origin = response.rect.min;
        let clip = ui.clip_rect();
        let mut consumed_click = false;

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

        let periods = coordinator.visible_periods();
        draw_period_columns(&painter, origin, &periods, response.rect.bottom());
        draw_timeline_header(&painter, origin, clip, &periods, &coordinator.group_spans());

        // Alternating row backgrounds, limited to what is materialised
        let rendered_left = origin.x + coordinator.periods_offset_px();
        let rendered_right = periods
            .last()
            .map(|p| origin.x + p.offset_px + p.width_px)
            .unwrap_or(rendered_left);
        for i in 0..tasks.len() {
            let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING);
            if i % 2 == 0 {
                painter.rect_filled(
                    Rect::from_min_max(
                        Pos2::new(rendered_left, y),
                        Pos2::new(rendered_right, y + ROW_HEIGHT + ROW_PADDING),
                    ),
                    0.0,
                    Color32::from_white_alpha(4),
                );
            }
        }

        if let Some(px) = coordinator.today_marker_px(now) {
            draw_today_line(&painter, origin, origin.x + px, response.rect.bottom());
        }

        for (i, task) in tasks.iter().enumerate() {
            let Some(geometry) = coordinator.task_geometry(task) else {
                continue;
            };
            let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING) + ROW_PADDING;
            let is_selected = selected_task == Some(task.id.as_str());
            let bar_rect = draw_task_bar(&painter, origin, geometry, task, i, y, is_selected);

            let bar_response = ui.interact(
                bar_rect,
                ui.make_persistent_id(("task-bar", &task.id)),
                Sense::click(),
            );
            if bar_response.clicked() {
                frame.clicked_task = Some(task.id.clone());
                consumed_click = true;
            }
            if bar_response.hovered() {
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    egui::Id::new(("task-tip", &task.id)),
                    |ui| {
                        ui.strong(&task.name);
                        ui.label(format!(
                            "{} → {}",
                            task.start.format("%d/%m/%Y %H:%M"),
                            task.end.format("%d/%m/%Y %H:%M"),
                        ));
                    },
                );
            }
        }

        // Date under the cursor, in the header band
        if let Some(pointer) = response.hover_pos() {
            if pointer.y < origin.y + HEADER_HEIGHT {
                let window = coordinator.window();
                if let Some(date) =
                    coords::pixel_to_date(window.periods(), pointer.x - origin.x, window.config())
                {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new("period-tip"),
                        |ui| {
                            ui.label(window.config().period_header(date));
                        },
                    );
                }
            }
        }

        if response.clicked() && !consumed_click {
            frame.clicked_empty = true;
        }
    });

    frame.scroll_left = output.state.offset.x;
    frame.container_width = output.inner_rect.width();
    frame
}

fn draw_period_columns(painter: &egui::Painter, origin: Pos2, periods: &[VisiblePeriod], bottom: f32) {
    for period in periods {
        let x = origin.x + period.offset_px;
        if period.mark == MarkKind::Weekend {
            painter.rect_filled(
                Rect::from_min_max(
                    Pos2::new(x, origin.y + HEADER_HEIGHT),
                    Pos2::new(x + period.width_px, bottom),
                ),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        let stroke = match (period.group_header.is_some(), period.mark) {
            (true, _) => Stroke::new(1.0, theme::BORDER_SUBTLE),
            (false, MarkKind::Major | MarkKind::Weekend) => Stroke::new(0.5, theme::GRID_MAJOR),
            (false, MarkKind::Minor) => Stroke::new(0.5, theme::GRID_MINOR),
        };
        painter.line_segment(
            [Pos2::new(x, origin.y + GROUP_HEADER_HEIGHT), Pos2::new(x, bottom)],
            stroke,
        );
    }
}

fn draw_timeline_header(
    painter: &egui::Painter,
    origin: Pos2,
    clip: Rect,
    periods: &[VisiblePeriod],
    groups: &[GroupSpan],
) {
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return;
    };
    let left = origin.x + first.offset_px;
    let right = origin.x + last.offset_px + last.width_px;

    painter.rect_filled(
        Rect::from_min_max(Pos2::new(left, origin.y), Pos2::new(right, origin.y + HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    // Group row: titles stick to the left edge of the viewport while their span is on screen
    for group in groups {
        let start = origin.x + group.start_px;
        let end = origin.x + group.end_px;
        painter.rect_filled(
            Rect::from_min_max(
                Pos2::new(start, origin.y),
                Pos2::new(end, origin.y + GROUP_HEADER_HEIGHT),
            ),
            0.0,
            theme::BG_GROUP_HEADER,
        );
        painter.line_segment(
            [Pos2::new(start, origin.y), Pos2::new(start, origin.y + GROUP_HEADER_HEIGHT)],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        let text_x = start.max(clip.left()).min(end - 40.0).max(start) + 5.0;
        painter.text(
            Pos2::new(text_x, origin.y + GROUP_HEADER_HEIGHT / 2.0),
            egui::Align2::LEFT_CENTER,
            &group.title,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }

    for period in periods {
        let x = origin.x + period.offset_px;
        let color = match period.mark {
            MarkKind::Major => theme::TEXT_SECONDARY,
            MarkKind::Minor | MarkKind::Weekend => theme::TEXT_DIM,
        };
        painter.text(
            Pos2::new(x + 3.0, origin.y + GROUP_HEADER_HEIGHT + 11.0),
            egui::Align2::LEFT_CENTER,
            &period.label,
            theme::font_sub(),
            color,
        );
    }

    painter.line_segment(
        [
            Pos2::new(left, origin.y + HEADER_HEIGHT),
            Pos2::new(right, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, x: f32, bottom: f32) {
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    geometry: TaskGeometry,
    task: &TaskInterval,
    index: usize,
    y: f32,
    is_selected: bool,
) -> Rect {
    let inset = theme::BAR_INSET;
    // Keep zero-length tasks clickable
    let bar_width = geometry.width_px.max(4.0);
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + geometry.left_px, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, theme::task_color(index));

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_width > 30.0 {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(bar_rect)
            .galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    bar_rect
}
