pub mod formatter;
pub mod report;
pub mod summary;

pub use formatter::{
    format_profile_detail, format_score, format_scored_table, format_tsv, should_use_colors,
    ScoredProfile,
};
pub use report::{build_rows, render_csv, render_json, write_reports, ReportRow};
pub use summary::{format_summary, summarize, Summary};
