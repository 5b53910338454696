//! Maps UI service errors to cityscope_core::AppError for consistent user-facing messages.

mod weather;
