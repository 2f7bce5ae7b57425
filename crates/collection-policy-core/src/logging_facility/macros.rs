//! Canonical logging macros
//!
//! Every operation on a policy document logs through these so that the
//! `component`, `op` and `event` fields stay uniform.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use collection_policy_core::log_op_start;
/// log_op_start!("from_xml");
/// log_op_start!("add_content_model", pid = "islandora:sp_basic_image");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use collection_policy_core::log_op_end;
/// log_op_end!("from_xml", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted to `ExError` so the kind and stable code are
/// recorded alongside the event.
///
/// The `err_kind` and `err_code` keys are spelled out because tracing field
/// names must be identifiers; they must match `FIELD_ERR_KIND` and
/// `FIELD_ERR_CODE` in `core_types::schema`.
///
/// # Example
///
/// ```
/// # use collection_policy_core::{log_op_error, errors::PolicyError};
/// let err = PolicyError::Parse { message: "unexpected EOF".to_string() };
/// log_op_error!("from_xml", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
