// Feature extraction: turning documents into numeric rows.

pub mod count;
pub mod readability;
pub mod traits;
