pub mod formatter;

pub use formatter::{
    export_csv, export_filename, export_json, export_txt, format_summary, format_tsv,
    render_export, should_use_colors, ExportData, ExportFormat,
};
