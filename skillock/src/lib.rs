pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    export_dataset, init_target, load_dataset, record_summary, resolve_data_dir, run_breakdowns,
    verify_dataset, BreakdownOptions, BreakdownOutcome, Dataset, VerifyReport,
};
