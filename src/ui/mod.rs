pub mod task_table;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
