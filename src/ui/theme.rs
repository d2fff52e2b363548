//! Fixed slate palette for the timeline. Chart painting reads these constants
//! directly; `apply_theme` only adjusts the egui defaults the panels show.

use egui::{Color32, FontId, Stroke, Visuals};

// Surfaces, darkest first
pub const BG_DARK: Color32 = Color32::from_rgb(19, 22, 29);
pub const BG_PANEL: Color32 = Color32::from_rgb(26, 30, 38);
pub const BG_HEADER: Color32 = Color32::from_rgb(32, 37, 47);
pub const BG_GROUP_HEADER: Color32 = Color32::from_rgb(40, 46, 58);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 48);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(56, 132, 196, 50);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(48, 55, 68);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(120, 180, 235);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 231, 238);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 161, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(96, 106, 122);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

pub const ACCENT: Color32 = Color32::from_rgb(56, 132, 196);
pub const TODAY_LINE: Color32 = Color32::from_rgb(232, 84, 84);
pub const GRID_MAJOR: Color32 = Color32::from_rgb(50, 57, 70);
pub const GRID_MINOR: Color32 = Color32::from_rgb(34, 39, 49);

// Layout, in points
pub const ROW_HEIGHT: f32 = 28.0;
pub const ROW_GAP: f32 = 4.0;
pub const GROUP_HEADER_HEIGHT: f32 = 22.0;
/// Group row plus the period label row.
pub const HEADER_HEIGHT: f32 = GROUP_HEADER_HEIGHT + 24.0;
pub const BAR_ROUNDING: f32 = 3.0;
pub const BAR_INSET: f32 = 4.0;
pub const SIDE_PANEL_WIDTH: f32 = 280.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;

fn proportional(size: f32) -> FontId {
    FontId::proportional(size)
}

pub fn font_header() -> FontId {
    proportional(12.5)
}

pub fn font_sub() -> FontId {
    proportional(10.0)
}

pub fn font_bar() -> FontId {
    proportional(11.0)
}

pub fn font_small() -> FontId {
    proportional(9.0)
}

pub fn font_menu() -> FontId {
    proportional(13.0)
}

pub fn font_status() -> FontId {
    proportional(11.0)
}

/// Bar fills, cycled by row.
const TASK_COLORS: [Color32; 6] = [
    Color32::from_rgb(56, 132, 196),
    Color32::from_rgb(72, 160, 120),
    Color32::from_rgb(196, 128, 56),
    Color32::from_rgb(150, 98, 190),
    Color32::from_rgb(200, 86, 110),
    Color32::from_rgb(60, 170, 180),
];

/// Bar color for the task at `index` in the list.
pub fn task_color(index: usize) -> Color32 {
    TASK_COLORS[index % TASK_COLORS.len()]
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_DARK;
    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, BORDER_ACCENT);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    ctx.set_visuals(visuals);
}
