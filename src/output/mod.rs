pub mod formatter;

pub use formatter::{
    format_json, format_leaderboard, format_points, format_race_cell, format_standings,
    format_tsv, should_use_colors,
};
