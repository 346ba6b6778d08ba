pub mod duration_series;
pub mod fill_policies;
pub mod producer_labels;
